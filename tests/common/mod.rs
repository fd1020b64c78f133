/*
 *
 *  *
 *  *      Copyright (c) 2018-2025, SnackCloud All rights reserved.
 *  *
 *  *   Redistribution and use in source and binary forms, with or without
 *  *   modification, are permitted provided that the following conditions are met:
 *  *
 *  *   Redistributions of source code must retain the above copyright notice,
 *  *   this list of conditions and the following disclaimer.
 *  *   Redistributions in binary form must reproduce the above copyright
 *  *   notice, this list of conditions and the following disclaimer in the
 *  *   documentation and/or other materials provided with the distribution.
 *  *   Neither the name of the www.snackcloud.cn developer nor the names of its
 *  *   contributors may be used to endorse or promote products derived from
 *  *   this software without specific prior written permission.
 *  *   Author: SnackCloud
 *  *
 *
 */


//!
//! Shared fixtures.
//!
#![allow(dead_code)]

use batchmark::prelude::*;

pub const POSTS: usize = 20;
pub const COMMENTS: usize = 3;

pub fn config(url: &str, batch_size: usize) -> BatchConfig {
    BatchConfig::new(url)
        .expect("valid url")
        .set_post_count(POSTS)
        .set_post_comment_count(COMMENTS)
        .set_batch_size(batch_size)
}

pub fn count(conn: &mut dyn BatchExecutor, sql: &str) -> i64 {
    conn.query_scalar(sql).expect("count query")
}

/// Recreate the schema, run every phase and check what is left behind.
pub fn run_and_verify(data_source: &DataSource, kind: StrategyKind) -> BatchReport {
    let cfg = data_source.config().clone();
    let mut harness = BatchHarness::new(&cfg, kind.into_strategy()).expect("harness");
    let provider = BatchEntityProvider::new();
    data_source.in_connection(|conn| {
        provider.recreate_schema(conn)?;
        let report = harness.run(conn)?;

        // the bulk delete only matches version > 0 and the re-insert writes version 0
        assert_eq!(provider.count_posts(conn)?, cfg.get_post_count() as i64);
        assert_eq!(
            provider.count_post_comments(conn)?,
            (cfg.get_post_count() * cfg.get_post_comment_count()) as i64
        );
        assert_eq!(count(conn, "select count(*) from Post where version <> 0"), 0);
        assert_eq!(count(conn, "select count(*) from PostComment where version <> 0"), 0);
        Ok(report)
    }).expect("full run")
}
