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
//! Batchmark measures how prepared statement batching changes the cost of
//! inserting, updating and deleting rows of two related tables, `Post` and
//! `PostComment`.
//!
//! ```toml
//! [dependencies]
//! batchmark = "0.1.0"
//! ```
//!
//! ## Feature.
//!
//! * ```sqlite-sync``` - to use sqlite (default)
//! * ```mysql-sync``` - to use mysql
//! * ```postgres-sync``` - to use postgres
//!
//! ## Flush rule.
//!
//! After each parameter binding the harness hands the statement to the
//! strategy's `on_statement`, bumps that statement's counter and calls
//! `on_flush` whenever the counter is a multiple of the batch size. `on_end`
//! runs once after every statement loop.
//!
//! ## Example
//!
//! ```ignore
//! use batchmark::prelude::*;
//!
//! let cfg = BatchConfig::new("sqlite::memory:")?
//!     .set_post_count(1000)
//!     .set_post_comment_count(4)
//!     .set_batch_size(50);
//! let data_source = DataSource::new(cfg.clone())?;
//! let mut harness = BatchHarness::new(&cfg, Batching)?;
//! let report = data_source.in_connection(|conn| {
//!     BatchEntityProvider::new().recreate_schema(conn)?;
//!     harness.run(conn)
//! })?;
//! println!("{}", report);
//! ```
//!
mod errors;
mod config;
mod platform;
mod value;
mod entity;
mod statement;
mod strategy;
mod report;
mod harness;
mod pool;
pub mod driver;

#[doc(inline)]
pub use errors::{BatchError, Result};
#[doc(inline)]
pub use config::{BatchConfig, ENV_BATCH_SIZE, ENV_POST_COMMENT_COUNT, ENV_POST_COUNT, ENV_URL};
#[doc(inline)]
pub use platform::Platform;
#[doc(inline)]
pub use value::{format_params, BatchValue, Params};
#[doc(inline)]
pub use entity::{post_comment_id, BatchEntityProvider, Post, PostComment, POST_COMMENT_TABLE, POST_TABLE};
#[doc(inline)]
pub use statement::PreparedStatement;
#[doc(inline)]
pub use strategy::{BatchStrategy, Batching, NoBatching, StrategyKind};
#[doc(inline)]
pub use report::{BatchReport, Phase, PhaseTiming};
#[doc(inline)]
pub use harness::*;
#[doc(inline)]
pub use pool::{in_transaction, DataSource, PoolStatus, Transaction};
#[doc(inline)]
pub use driver::{BatchExecutor, DbDriver};

pub mod prelude {
    pub use crate::{
        BatchConfig, BatchEntityProvider, BatchError, BatchExecutor, BatchHarness, BatchReport,
        BatchStrategy, BatchValue, Batching, DataSource, NoBatching, Phase, Platform,
        PreparedStatement, Result, StrategyKind,
    };
}
