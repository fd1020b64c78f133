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
//! How a bound statement reaches the database.
//!
use std::fmt;
use std::str::FromStr;
use serde::Serialize;
use crate::driver::BatchExecutor;
use crate::errors::{BatchError, Result};
use crate::statement::PreparedStatement;

/// The three hooks the harness calls while it walks a statement loop.
///
/// `on_statement` runs after every binding, `on_flush` whenever the statement
/// counter reaches a multiple of the batch size, and `on_end` once after the
/// loop.
pub trait BatchStrategy {
    fn name(&self) -> &'static str;

    fn on_statement(&self, conn: &mut dyn BatchExecutor, statement: &mut PreparedStatement) -> Result<()>;

    fn on_flush(&self, conn: &mut dyn BatchExecutor, statement: &mut PreparedStatement) -> Result<()>;

    fn on_end(&self, conn: &mut dyn BatchExecutor, statement: &mut PreparedStatement) -> Result<()>;
}

impl<S: BatchStrategy + ?Sized> BatchStrategy for Box<S> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn on_statement(&self, conn: &mut dyn BatchExecutor, statement: &mut PreparedStatement) -> Result<()> {
        (**self).on_statement(conn, statement)
    }

    fn on_flush(&self, conn: &mut dyn BatchExecutor, statement: &mut PreparedStatement) -> Result<()> {
        (**self).on_flush(conn, statement)
    }

    fn on_end(&self, conn: &mut dyn BatchExecutor, statement: &mut PreparedStatement) -> Result<()> {
        (**self).on_end(conn, statement)
    }
}

/// Every statement is its own round trip.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoBatching;

impl BatchStrategy for NoBatching {
    fn name(&self) -> &'static str {
        "NoBatching"
    }

    fn on_statement(&self, conn: &mut dyn BatchExecutor, statement: &mut PreparedStatement) -> Result<()> {
        statement.execute_update(conn).map(|_| ())
    }

    fn on_flush(&self, _conn: &mut dyn BatchExecutor, _statement: &mut PreparedStatement) -> Result<()> {
        Ok(())
    }

    fn on_end(&self, _conn: &mut dyn BatchExecutor, _statement: &mut PreparedStatement) -> Result<()> {
        Ok(())
    }
}

/// Statements are queued and sent together on every flush and at the end.
#[derive(Debug, Default, Clone, Copy)]
pub struct Batching;

impl BatchStrategy for Batching {
    fn name(&self) -> &'static str {
        "Batching"
    }

    fn on_statement(&self, _conn: &mut dyn BatchExecutor, statement: &mut PreparedStatement) -> Result<()> {
        statement.add_batch();
        Ok(())
    }

    fn on_flush(&self, conn: &mut dyn BatchExecutor, statement: &mut PreparedStatement) -> Result<()> {
        statement.execute_batch(conn).map(|_| ())
    }

    fn on_end(&self, conn: &mut dyn BatchExecutor, statement: &mut PreparedStatement) -> Result<()> {
        statement.execute_batch(conn).map(|_| ())
    }
}

/// Strategy selector for configuration and the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, clap::ValueEnum)]
pub enum StrategyKind {
    NoBatching,
    Batching,
}

impl StrategyKind {
    pub fn all() -> [StrategyKind; 2] {
        [StrategyKind::NoBatching, StrategyKind::Batching]
    }

    pub fn into_strategy(self) -> Box<dyn BatchStrategy> {
        match self {
            StrategyKind::NoBatching => Box::new(NoBatching),
            StrategyKind::Batching => Box::new(Batching),
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            StrategyKind::NoBatching => write!(f, "no-batching"),
            StrategyKind::Batching => write!(f, "batching"),
        }
    }
}

impl FromStr for StrategyKind {
    type Err = BatchError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().replace('_', "-").as_str() {
            "no-batching" | "none" => Ok(StrategyKind::NoBatching),
            "batching" | "batch" => Ok(StrategyKind::Batching),
            other => Err(BatchError::ConfigError(format!("unknown batch strategy `{}`", other))),
        }
    }
}
