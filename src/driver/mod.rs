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
//! Blocking database drivers.
//!
use std::ops::{Deref, DerefMut};
use crate::errors::Result;
use crate::platform::Platform;
use crate::value::BatchValue;

#[cfg(feature = "sqlite-sync")]
pub mod sqlite;
#[cfg(feature = "mysql-sync")]
pub mod mysql;
#[cfg(feature = "postgres-sync")]
pub mod postgres;
#[cfg(test)]
pub(crate) mod recording;

#[cfg(feature = "sqlite-sync")]
use crate::driver::sqlite::Sqlite;
#[cfg(feature = "mysql-sync")]
use crate::driver::mysql::MySQL;
#[cfg(feature = "postgres-sync")]
use crate::driver::postgres::Postgres;

/// A borrowed connection the harness executes statements on.
///
/// Transaction boundaries belong to whoever lends the connection out; the
/// harness itself never calls `start`, `commit` or `rollback`.
pub trait BatchExecutor {
    fn platform(&self) -> Platform;

    fn start(&mut self) -> Result<()>;

    fn commit(&mut self) -> Result<()>;

    fn rollback(&mut self) -> Result<()>;

    /// Execute one prepared statement with a single parameter set.
    fn execute(&mut self, sql: &str, params: &[BatchValue]) -> Result<u64>;

    /// Execute every parameter set against one prepared statement, in order.
    fn execute_batch(&mut self, sql: &str, batch: &[Vec<BatchValue>]) -> Result<u64>;

    /// Execute a plain statement without parameters.
    fn execute_update(&mut self, sql: &str) -> Result<u64>;

    /// Fetch the first column of the first row as an integer.
    fn query_scalar(&mut self, sql: &str) -> Result<i64>;
}

pub enum DbDriver {
    #[cfg(feature = "sqlite-sync")]
    SqliteDriver(Box<Sqlite>),
    #[cfg(feature = "mysql-sync")]
    MysqlDriver(Box<MySQL>),
    #[cfg(feature = "postgres-sync")]
    PostgresDriver(Box<Postgres>),
}

impl Deref for DbDriver {
    type Target = dyn BatchExecutor;

    fn deref(&self) -> &Self::Target {
        match *self {
            #[cfg(feature = "sqlite-sync")]
            DbDriver::SqliteDriver(ref sqlite) => sqlite.as_ref(),
            #[cfg(feature = "mysql-sync")]
            DbDriver::MysqlDriver(ref mysql) => mysql.as_ref(),
            #[cfg(feature = "postgres-sync")]
            DbDriver::PostgresDriver(ref postgres) => postgres.as_ref(),
        }
    }
}

impl DerefMut for DbDriver {
    fn deref_mut(&mut self) -> &mut Self::Target {
        match *self {
            #[cfg(feature = "sqlite-sync")]
            DbDriver::SqliteDriver(ref mut sqlite) => sqlite.as_mut(),
            #[cfg(feature = "mysql-sync")]
            DbDriver::MysqlDriver(ref mut mysql) => mysql.as_mut(),
            #[cfg(feature = "postgres-sync")]
            DbDriver::PostgresDriver(ref mut postgres) => postgres.as_mut(),
        }
    }
}
