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
//! Client side prepared statements.
//!
use tracing::debug;
use crate::driver::BatchExecutor;
use crate::errors::{BatchError, Result};
use crate::value::{format_params, BatchValue, Params};

/// A statement with positional parameters and a pending batch.
///
/// Binding is 1-based. Bound values survive an execution or `add_batch`, so a
/// loop only rebinds what changes; `clear_parameters` resets them. The
/// statement also carries the counter the flush rule is evaluated against.
#[derive(Debug, Clone)]
pub struct PreparedStatement {
    sql: String,
    parameters: Params,
    batch: Vec<Params>,
    statement_count: u64,
    executions: u64,
}

impl PreparedStatement {
    pub fn new<S: Into<String>>(sql: S) -> Self {
        PreparedStatement {
            sql: sql.into(),
            parameters: Vec::new(),
            batch: Vec::new(),
            statement_count: 0,
            executions: 0,
        }
    }

    /// Prepare `sql` for the connection's platform.
    pub fn prepare(conn: &dyn BatchExecutor, sql: &str) -> Self {
        Self::new(conn.platform().render(sql).into_owned())
    }

    pub fn sql(&self) -> &str {
        &self.sql
    }

    /// Bind `value` to the placeholder at `index`.
    pub fn set<V: Into<BatchValue>>(&mut self, index: usize, value: V) -> Result<()> {
        if index == 0 {
            return Err(BatchError::InvalidParameterIndex(index));
        }
        if self.parameters.len() < index {
            self.parameters.resize(index, BatchValue::Null);
        }
        self.parameters[index - 1] = value.into();
        Ok(())
    }

    pub fn parameters(&self) -> &[BatchValue] {
        &self.parameters
    }

    pub fn clear_parameters(&mut self) {
        self.parameters.clear();
    }

    /// Queue the currently bound parameters.
    pub fn add_batch(&mut self) {
        self.batch.push(self.parameters.clone());
    }

    /// Number of parameter sets waiting for `execute_batch`.
    pub fn pending(&self) -> usize {
        self.batch.len()
    }

    /// Execute the bound parameters right away.
    pub fn execute_update(&mut self, conn: &mut dyn BatchExecutor) -> Result<u64> {
        debug!("==> [Batchmark]  Preparing: {}", self.sql);
        debug!("==> [Batchmark] Parameters: {}", format_params(&self.parameters));
        let affected_rows = conn.execute(&self.sql, &self.parameters)?;
        self.executions += 1;
        Ok(affected_rows)
    }

    /// Submit the pending batch in one go. Nothing pending means nothing is sent.
    pub fn execute_batch(&mut self, conn: &mut dyn BatchExecutor) -> Result<u64> {
        if self.batch.is_empty() {
            return Ok(0);
        }
        let batch = std::mem::take(&mut self.batch);
        debug!("==> [Batchmark]  Executing batch of {}: {}", batch.len(), self.sql);
        let affected_rows = conn.execute_batch(&self.sql, &batch)?;
        self.executions += 1;
        Ok(affected_rows)
    }

    /// Count one more bound statement and return the new total.
    pub fn increment(&mut self) -> u64 {
        self.statement_count += 1;
        self.statement_count
    }

    pub fn statement_count(&self) -> u64 {
        self.statement_count
    }

    /// Round trips issued so far, single executions and batches alike.
    pub fn executions(&self) -> u64 {
        self.executions
    }
}
