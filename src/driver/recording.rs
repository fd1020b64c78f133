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

use crate::driver::BatchExecutor;
use crate::errors::{BatchError, Result};
use crate::platform::Platform;
use crate::value::BatchValue;

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Start,
    Commit,
    Rollback,
    Execute(String, Vec<BatchValue>),
    Batch(String, Vec<Vec<BatchValue>>),
    Update(String),
    Scalar(String),
}

/// Records every call instead of talking to a database.
#[derive(Debug, Default)]
pub struct RecordingExecutor {
    pub calls: Vec<Call>,
    /// Fail the n-th (0-based) execute/batch/update call.
    pub fail_at: Option<usize>,
    /// Fail every commit after recording it.
    pub fail_commit: bool,
    executed: usize,
}

impl RecordingExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_at(n: usize) -> Self {
        RecordingExecutor { fail_at: Some(n), ..Self::default() }
    }

    pub fn failing_commit() -> Self {
        RecordingExecutor { fail_commit: true, ..Self::default() }
    }

    fn tick(&mut self) -> Result<()> {
        let current = self.executed;
        self.executed += 1;
        if self.fail_at == Some(current) {
            return Err(BatchError::DatabaseError(format!("injected failure at call {}", current)));
        }
        Ok(())
    }

    pub fn executes(&self) -> usize {
        self.calls.iter().filter(|c| matches!(c, Call::Execute(..))).count()
    }

    pub fn batches(&self) -> Vec<usize> {
        self.calls.iter()
            .filter_map(|c| match c {
                Call::Batch(_, batch) => Some(batch.len()),
                _ => None,
            })
            .collect()
    }

    pub fn updates(&self) -> Vec<&str> {
        self.calls.iter()
            .filter_map(|c| match c {
                Call::Update(sql) => Some(sql.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl BatchExecutor for RecordingExecutor {
    fn platform(&self) -> Platform {
        Platform::Sqlite
    }

    fn start(&mut self) -> Result<()> {
        self.calls.push(Call::Start);
        Ok(())
    }

    fn commit(&mut self) -> Result<()> {
        self.calls.push(Call::Commit);
        if self.fail_commit {
            return Err(BatchError::DatabaseError("injected commit failure".to_string()));
        }
        Ok(())
    }

    fn rollback(&mut self) -> Result<()> {
        self.calls.push(Call::Rollback);
        Ok(())
    }

    fn execute(&mut self, sql: &str, params: &[BatchValue]) -> Result<u64> {
        self.tick()?;
        self.calls.push(Call::Execute(sql.to_string(), params.to_vec()));
        Ok(1)
    }

    fn execute_batch(&mut self, sql: &str, batch: &[Vec<BatchValue>]) -> Result<u64> {
        self.tick()?;
        self.calls.push(Call::Batch(sql.to_string(), batch.to_vec()));
        Ok(batch.len() as u64)
    }

    fn execute_update(&mut self, sql: &str) -> Result<u64> {
        self.tick()?;
        self.calls.push(Call::Update(sql.to_string()));
        Ok(0)
    }

    fn query_scalar(&mut self, sql: &str) -> Result<i64> {
        self.calls.push(Call::Scalar(sql.to_string()));
        Ok(0)
    }
}
