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
//! The batch insert / update / delete harness.
//!
use std::time::{Duration, Instant};
use tracing::{debug, info};
use crate::config::BatchConfig;
use crate::driver::BatchExecutor;
use crate::entity::{Post, PostComment};
use crate::errors::{BatchError, Result};
use crate::platform::Platform;
use crate::report::{BatchReport, Phase, PhaseTiming};
use crate::statement::PreparedStatement;
use crate::strategy::BatchStrategy;

pub const INSERT_POST: &str = "insert into Post (title, version, id) values (?, ?, ?)";
pub const INSERT_POST_COMMENT: &str = "insert into PostComment (post_id, review, version, id) values (?, ?, ?, ?)";
pub const UPDATE_POST: &str = "update Post set version = ? where id = ?";
pub const UPDATE_POST_COMMENT: &str = "update PostComment set version = ? where id = ?";
pub const DELETE_POST: &str = "delete from Post where id = ?";
pub const DELETE_POST_COMMENT: &str = "delete from PostComment where id = ?";
pub const BULK_UPDATE_POST: &str = "update Post set version = version + 1";
pub const BULK_UPDATE_POST_COMMENT: &str = "update PostComment set version = version + 1";
pub const BULK_DELETE_POST_COMMENT: &str = "delete from PostComment where version > 0";
pub const BULK_DELETE_POST: &str = "delete from Post where version > 0";

/// Drives batched inserts, updates and deletes of posts and their comments
/// through a [`BatchStrategy`] and times each phase.
///
/// The connection is borrowed: the harness never opens, commits or rolls back
/// anything, and any error is returned as soon as it happens.
pub struct BatchHarness<S: BatchStrategy> {
    strategy: S,
    post_count: usize,
    post_comment_count: usize,
    batch_size: usize,
    timings: Vec<PhaseTiming>,
}

impl<S: BatchStrategy> BatchHarness<S> {
    pub fn new(cfg: &BatchConfig, strategy: S) -> Result<Self> {
        if cfg.get_batch_size() == 0 {
            return Err(BatchError::InvalidBatchSize(0));
        }
        Ok(BatchHarness {
            strategy,
            post_count: cfg.get_post_count(),
            post_comment_count: cfg.get_post_comment_count(),
            batch_size: cfg.get_batch_size(),
            timings: Vec::new(),
        })
    }

    /// Timings recorded by phases run on their own; `run` moves its timings into the report.
    pub fn timings(&self) -> &[PhaseTiming] {
        &self.timings
    }

    /// Insert, update, then delete everything, returning the timings.
    pub fn run(&mut self, conn: &mut dyn BatchExecutor) -> Result<BatchReport> {
        self.timings.clear();
        let mut report = BatchReport::new(
            self.strategy.name(),
            &conn.platform().to_string(),
            self.batch_size,
            self.post_count,
            self.post_comment_count,
        );
        self.batch_insert(conn)?;
        self.batch_update(conn)?;
        self.batch_delete(conn)?;
        report.phases = std::mem::take(&mut self.timings);
        Ok(report)
    }

    fn execute_statement(&self, conn: &mut dyn BatchExecutor, statement: &mut PreparedStatement) -> Result<()> {
        self.strategy.on_statement(conn, statement)?;
        let count = statement.increment();
        if count % self.batch_size as u64 == 0 {
            debug!("Flushing {} after {} statements", statement.sql(), count);
            self.strategy.on_flush(conn, statement)?;
        }
        Ok(())
    }

    pub fn batch_insert(&mut self, conn: &mut dyn BatchExecutor) -> Result<()> {
        let mut post_statement = PreparedStatement::prepare(&*conn, INSERT_POST);
        let mut post_comment_statement = PreparedStatement::prepare(&*conn, INSERT_POST_COMMENT);

        info!("Test batch insert");
        let start = Instant::now();

        for i in 0..self.post_count {
            let post = Post::numbered(i);
            post_statement.set(1, post.title)?;
            post_statement.set(2, post.version)?;
            post_statement.set(3, post.id)?;
            self.execute_statement(conn, &mut post_statement)?;
        }
        self.strategy.on_end(conn, &mut post_statement)?;
        for i in 0..self.post_count {
            for j in 0..self.post_comment_count {
                let comment = PostComment::numbered(i, j, self.post_comment_count);
                post_comment_statement.set(1, comment.post_id)?;
                post_comment_statement.set(2, comment.review)?;
                post_comment_statement.set(3, comment.version)?;
                post_comment_statement.set(4, comment.id)?;
                self.execute_statement(conn, &mut post_comment_statement)?;
            }
        }
        self.strategy.on_end(conn, &mut post_comment_statement)?;

        self.record(conn.platform(), Phase::Insert, start.elapsed(), &[&post_statement, &post_comment_statement]);
        Ok(())
    }

    pub fn batch_update(&mut self, conn: &mut dyn BatchExecutor) -> Result<()> {
        let mut post_statement = PreparedStatement::prepare(&*conn, UPDATE_POST);
        let mut post_comment_statement = PreparedStatement::prepare(&*conn, UPDATE_POST_COMMENT);

        info!("Test batch update");
        let start = Instant::now();

        for i in 0..self.post_count {
            post_statement.set(1, 1)?;
            post_statement.set(2, Post::numbered(i).id)?;
            self.execute_statement(conn, &mut post_statement)?;
        }
        self.strategy.on_end(conn, &mut post_statement)?;
        for i in 0..self.post_count {
            for j in 0..self.post_comment_count {
                post_comment_statement.set(1, 1)?;
                post_comment_statement.set(2, crate::entity::post_comment_id(i, j, self.post_comment_count))?;
                self.execute_statement(conn, &mut post_comment_statement)?;
            }
        }
        self.strategy.on_end(conn, &mut post_comment_statement)?;

        self.record(conn.platform(), Phase::Update, start.elapsed(), &[&post_statement, &post_comment_statement]);

        info!("Test bulk update");
        let start = Instant::now();
        conn.execute_update(BULK_UPDATE_POST)?;
        conn.execute_update(BULK_UPDATE_POST_COMMENT)?;
        self.record_bulk(conn.platform(), Phase::BulkUpdate, start.elapsed(), 2);
        Ok(())
    }

    pub fn batch_delete(&mut self, conn: &mut dyn BatchExecutor) -> Result<()> {
        let mut post_statement = PreparedStatement::prepare(&*conn, DELETE_POST);
        let mut post_comment_statement = PreparedStatement::prepare(&*conn, DELETE_POST_COMMENT);

        info!("Test batch delete");
        let start = Instant::now();

        // children go first, PostComment.post_id references Post.id
        for i in 0..self.post_count {
            for j in 0..self.post_comment_count {
                post_comment_statement.set(1, crate::entity::post_comment_id(i, j, self.post_comment_count))?;
                self.execute_statement(conn, &mut post_comment_statement)?;
            }
        }
        self.strategy.on_end(conn, &mut post_comment_statement)?;
        for i in 0..self.post_count {
            post_statement.set(1, Post::numbered(i).id)?;
            self.execute_statement(conn, &mut post_statement)?;
        }
        self.strategy.on_end(conn, &mut post_statement)?;

        self.record(conn.platform(), Phase::Delete, start.elapsed(), &[&post_comment_statement, &post_statement]);

        self.batch_insert(conn)?;

        info!("Test bulk delete");
        let start = Instant::now();
        conn.execute_update(BULK_DELETE_POST_COMMENT)?;
        conn.execute_update(BULK_DELETE_POST)?;
        self.record_bulk(conn.platform(), Phase::BulkDelete, start.elapsed(), 2);
        Ok(())
    }

    fn record(&mut self, platform: Platform, phase: Phase, elapsed: Duration, statements: &[&PreparedStatement]) {
        let timing = PhaseTiming {
            phase,
            elapsed,
            statements: statements.iter().map(|s| s.statement_count()).sum(),
            executions: statements.iter().map(|s| s.executions()).sum(),
        };
        self.push(platform, timing);
    }

    fn record_bulk(&mut self, platform: Platform, phase: Phase, elapsed: Duration, statements: u64) {
        let timing = PhaseTiming {
            phase,
            elapsed,
            statements,
            executions: statements,
        };
        self.push(platform, timing);
    }

    fn push(&mut self, platform: Platform, timing: PhaseTiming) {
        info!(
            "{}.{} for {} took {} millis",
            self.strategy.name(),
            timing.phase.test_name(),
            platform,
            timing.millis()
        );
        self.timings.push(timing);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::recording::{Call, RecordingExecutor};
    use crate::strategy::{Batching, NoBatching};
    use crate::value::BatchValue;

    fn config(posts: usize, comments: usize, batch_size: usize) -> BatchConfig {
        BatchConfig::default()
            .set_post_count(posts)
            .set_post_comment_count(comments)
            .set_batch_size(batch_size)
    }

    #[test]
    fn zero_batch_size_is_rejected() {
        assert!(matches!(
            BatchHarness::new(&config(1, 1, 0), Batching),
            Err(BatchError::InvalidBatchSize(0))
        ));
    }

    #[test]
    fn no_batching_sends_every_statement() {
        let mut conn = RecordingExecutor::new();
        let mut harness = BatchHarness::new(&config(3, 2, 1), NoBatching).unwrap();
        harness.batch_insert(&mut conn).unwrap();
        assert_eq!(conn.executes(), 9);
        assert!(conn.batches().is_empty());
        assert_eq!(conn.calls[0], Call::Execute(
            INSERT_POST.to_string(),
            vec![BatchValue::Text("Post no. 0".to_string()), BatchValue::Int(0), BatchValue::Bigint(0)],
        ));
        assert_eq!(conn.calls[3], Call::Execute(
            INSERT_POST_COMMENT.to_string(),
            vec![BatchValue::Bigint(0), BatchValue::Text("Post comment 0".to_string()), BatchValue::Int(0), BatchValue::Bigint(0)],
        ));
    }

    #[test]
    fn flush_every_batch_size_statements_and_once_at_the_end() {
        let mut conn = RecordingExecutor::new();
        let mut harness = BatchHarness::new(&config(10, 0, 3), Batching).unwrap();
        harness.batch_insert(&mut conn).unwrap();
        assert_eq!(conn.batches(), vec![3, 3, 3, 1]);

        let timing = &harness.timings()[0];
        assert_eq!(timing.phase, Phase::Insert);
        assert_eq!(timing.statements, 10);
        assert_eq!(timing.executions, 4);
    }

    #[test]
    fn counters_are_per_statement() {
        let mut conn = RecordingExecutor::new();
        let mut harness = BatchHarness::new(&config(10, 1, 5), Batching).unwrap();
        harness.batch_insert(&mut conn).unwrap();
        // the comment counter starts from zero instead of continuing the post counter
        assert_eq!(conn.batches(), vec![5, 5, 5, 5]);
    }

    #[test]
    fn run_visits_every_phase_in_order() {
        let mut conn = RecordingExecutor::new();
        let mut harness = BatchHarness::new(&config(2, 2, 2), Batching).unwrap();
        let report = harness.run(&mut conn).unwrap();
        let phases: Vec<Phase> = report.phases.iter().map(|t| t.phase).collect();
        assert_eq!(phases, vec![
            Phase::Insert,
            Phase::Update,
            Phase::BulkUpdate,
            Phase::Delete,
            Phase::Insert,
            Phase::BulkDelete,
        ]);
        assert_eq!(report.strategy, "Batching");
        assert_eq!(report.platform, "SQLite");
        assert_eq!(conn.updates(), vec![
            BULK_UPDATE_POST,
            BULK_UPDATE_POST_COMMENT,
            BULK_DELETE_POST_COMMENT,
            BULK_DELETE_POST,
        ]);
        assert!(harness.timings().is_empty());
    }

    #[test]
    fn comments_are_deleted_before_posts() {
        let mut conn = RecordingExecutor::new();
        let mut harness = BatchHarness::new(&config(2, 1, 1), NoBatching).unwrap();
        harness.batch_delete(&mut conn).unwrap();
        let deletes: Vec<&str> = conn.calls.iter()
            .filter_map(|c| match c {
                Call::Execute(sql, _) if sql.starts_with("delete") => Some(sql.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(deletes, vec![DELETE_POST_COMMENT, DELETE_POST_COMMENT, DELETE_POST, DELETE_POST]);
    }

    #[test]
    fn updates_bind_version_then_id() {
        let mut conn = RecordingExecutor::new();
        let mut harness = BatchHarness::new(&config(1, 2, 1), NoBatching).unwrap();
        harness.batch_update(&mut conn).unwrap();
        assert_eq!(conn.calls[2], Call::Execute(
            UPDATE_POST_COMMENT.to_string(),
            vec![BatchValue::Int(1), BatchValue::Bigint(1)],
        ));
    }

    #[test]
    fn errors_stop_the_run() {
        let mut conn = RecordingExecutor::failing_at(2);
        let mut harness = BatchHarness::new(&config(5, 1, 1), NoBatching).unwrap();
        let err = harness.run(&mut conn).unwrap_err();
        assert!(matches!(err, BatchError::DatabaseError(_)));
        assert_eq!(conn.executes(), 2);
        assert!(!conn.calls.iter().any(|c| matches!(c, Call::Rollback)));
    }
}
