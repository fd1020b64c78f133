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
//! The two benchmark entities and their schema.
//!
use tracing::info;
use crate::driver::BatchExecutor;
use crate::errors::Result;
use crate::platform::Platform;

pub const POST_TABLE: &str = "Post";
pub const POST_COMMENT_TABLE: &str = "PostComment";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Post {
    pub id: i64,
    pub title: String,
    pub version: i32,
}

impl Post {
    /// The `i`-th post of a run.
    pub fn numbered(i: usize) -> Self {
        Post {
            id: i as i64,
            title: format!("Post no. {}", i),
            version: 0,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PostComment {
    pub id: i64,
    pub post_id: i64,
    pub review: String,
    pub version: i32,
}

impl PostComment {
    /// The `j`-th comment of post `i` when every post has `per_post` comments.
    pub fn numbered(i: usize, j: usize, per_post: usize) -> Self {
        PostComment {
            id: post_comment_id(i, j, per_post),
            post_id: i as i64,
            review: format!("Post comment {}", j),
            version: 0,
        }
    }
}

/// Comment ids are dense: post `i` owns `per_post * i .. per_post * (i + 1)`.
pub fn post_comment_id(i: usize, j: usize, per_post: usize) -> i64 {
    (per_post * i + j) as i64
}

/// Creates and drops the schema the harness runs against.
#[derive(Debug, Default, Clone, Copy)]
pub struct BatchEntityProvider;

impl BatchEntityProvider {
    pub fn new() -> Self {
        BatchEntityProvider
    }

    /// Tables in creation order.
    pub fn entities(&self) -> [&'static str; 2] {
        [POST_TABLE, POST_COMMENT_TABLE]
    }

    pub fn create_statements(&self, platform: Platform) -> Vec<String> {
        let engine = match platform {
            Platform::Mysql => " engine=InnoDB",
            _ => "",
        };
        vec![
            format!(
                "create table {} (id bigint not null, title varchar(255), version integer not null, primary key (id)){}",
                POST_TABLE, engine
            ),
            format!(
                "create table {} (id bigint not null, post_id bigint, review varchar(255), version integer not null, primary key (id), \
                 foreign key (post_id) references {} (id)){}",
                POST_COMMENT_TABLE, POST_TABLE, engine
            ),
        ]
    }

    pub fn drop_statements(&self) -> Vec<String> {
        self.entities().iter()
            .rev()
            .map(|table| format!("drop table if exists {}", table))
            .collect()
    }

    pub fn create_schema(&self, conn: &mut dyn BatchExecutor) -> Result<()> {
        for sql in self.create_statements(conn.platform()) {
            conn.execute_update(&sql)?;
        }
        info!("Created tables {:?} on {}", self.entities(), conn.platform());
        Ok(())
    }

    pub fn drop_schema(&self, conn: &mut dyn BatchExecutor) -> Result<()> {
        for sql in self.drop_statements() {
            conn.execute_update(&sql)?;
        }
        Ok(())
    }

    pub fn recreate_schema(&self, conn: &mut dyn BatchExecutor) -> Result<()> {
        self.drop_schema(conn)?;
        self.create_schema(conn)
    }

    pub fn count_posts(&self, conn: &mut dyn BatchExecutor) -> Result<i64> {
        conn.query_scalar(&format!("select count(*) from {}", POST_TABLE))
    }

    pub fn count_post_comments(&self, conn: &mut dyn BatchExecutor) -> Result<i64> {
        conn.query_scalar(&format!("select count(*) from {}", POST_COMMENT_TABLE))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::recording::RecordingExecutor;

    #[test]
    fn numbering() {
        assert_eq!(Post::numbered(3), Post { id: 3, title: "Post no. 3".to_string(), version: 0 });
        let comment = PostComment::numbered(2, 1, 4);
        assert_eq!(comment.id, 9);
        assert_eq!(comment.post_id, 2);
        assert_eq!(comment.review, "Post comment 1");
    }

    #[test]
    fn comment_ids_do_not_collide() {
        let mut ids: Vec<i64> = (0..5)
            .flat_map(|i| (0..3).map(move |j| post_comment_id(i, j, 3)))
            .collect();
        ids.dedup();
        assert_eq!(ids, (0..15).collect::<Vec<i64>>());
    }

    #[test]
    fn children_are_dropped_first() {
        let provider = BatchEntityProvider::new();
        assert_eq!(provider.drop_statements(), vec![
            "drop table if exists PostComment".to_string(),
            "drop table if exists Post".to_string(),
        ]);
    }

    #[test]
    fn mysql_tables_use_innodb() {
        let provider = BatchEntityProvider::new();
        assert!(provider.create_statements(Platform::Mysql).iter().all(|s| s.ends_with("engine=InnoDB")));
        assert!(provider.create_statements(Platform::Sqlite).iter().all(|s| !s.contains("engine")));
    }

    #[test]
    fn recreate_drops_then_creates() {
        let mut conn = RecordingExecutor::new();
        BatchEntityProvider::new().recreate_schema(&mut conn).unwrap();
        let updates = conn.updates();
        assert_eq!(updates.len(), 4);
        assert!(updates[0].starts_with("drop table if exists PostComment"));
        assert!(updates[3].starts_with("create table PostComment"));
    }
}
