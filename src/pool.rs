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
//! Data sources lending out connections.
//!
use tracing::{info, warn};
use crate::config::BatchConfig;
use crate::driver::{BatchExecutor, DbDriver};
use crate::errors::{BatchError, Result};
use crate::platform::Platform;

#[cfg(feature = "sqlite-sync")]
use crate::driver::sqlite::{self, Sqlite, SqlitePool};
#[cfg(feature = "mysql-sync")]
use crate::driver::mysql::{self as mmysql, MySQL, MysqlPool};
#[cfg(feature = "postgres-sync")]
use crate::driver::postgres::{self as mpostgres, Postgres, PostgresPool};

#[derive(Clone)]
pub enum DBPool {
    #[cfg(feature = "sqlite-sync")]
    SqlitePool(SqlitePool),
    #[cfg(feature = "mysql-sync")]
    MysqlPool(MysqlPool),
    #[cfg(feature = "postgres-sync")]
    PostgresPool(PostgresPool),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolStatus {
    pub size: usize,
    pub available: usize,
}

/// A configured pool for one platform.
#[derive(Clone)]
pub struct DataSource {
    pool: DBPool,
    cfg: BatchConfig,
}

impl DataSource {
    pub fn new(cfg: BatchConfig) -> Result<Self> {
        cfg.validate()?;
        let platform = cfg.get_platform();
        let pool = match platform {
            #[cfg(feature = "sqlite-sync")]
            Platform::Sqlite => DBPool::SqlitePool(sqlite::init_sqlite_pool(&cfg)?),
            #[cfg(feature = "mysql-sync")]
            Platform::Mysql => DBPool::MysqlPool(mmysql::init_mysql_pool(&cfg)?),
            #[cfg(feature = "postgres-sync")]
            Platform::Postgres => DBPool::PostgresPool(mpostgres::init_postgres_pool(&cfg)?),
            #[allow(unreachable_patterns)]
            _ => {
                return Err(BatchError::UnsupportedPlatform(
                    format!("{} support is not enabled in this build", platform)
                ));
            }
        };
        info!("Initialized {} data source", platform);
        Ok(DataSource { pool, cfg })
    }

    pub fn config(&self) -> &BatchConfig {
        &self.cfg
    }

    pub fn platform(&self) -> Platform {
        self.cfg.get_platform()
    }

    /// Take a connection out of the pool.
    pub fn database(&self) -> Result<DbDriver> {
        match self.pool {
            #[cfg(feature = "sqlite-sync")]
            DBPool::SqlitePool(ref pool) => Ok(DbDriver::SqliteDriver(Box::new(Sqlite::new(pool.get()?)))),
            #[cfg(feature = "mysql-sync")]
            DBPool::MysqlPool(ref pool) => Ok(DbDriver::MysqlDriver(Box::new(MySQL::new(pool.get()?)))),
            #[cfg(feature = "postgres-sync")]
            DBPool::PostgresPool(ref pool) => Ok(DbDriver::PostgresDriver(Box::new(Postgres::new(pool.get()?)))),
        }
    }

    pub fn status(&self) -> PoolStatus {
        let state = match self.pool {
            #[cfg(feature = "sqlite-sync")]
            DBPool::SqlitePool(ref pool) => pool.state(),
            #[cfg(feature = "mysql-sync")]
            DBPool::MysqlPool(ref pool) => pool.state(),
            #[cfg(feature = "postgres-sync")]
            DBPool::PostgresPool(ref pool) => pool.state(),
        };
        PoolStatus {
            size: state.connections as usize,
            available: state.idle_connections as usize,
        }
    }

    /// Run `f` on a pooled connection inside a transaction.
    ///
    /// Commits when `f` succeeds; otherwise rolls back and returns the error of `f`.
    pub fn in_connection<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut dyn BatchExecutor) -> Result<T>,
    {
        let mut driver = self.database()?;
        in_transaction(&mut *driver, f)
    }
}

/// A transaction on a borrowed connection, rolled back on drop unless finished.
pub struct Transaction<'a> {
    conn: &'a mut dyn BatchExecutor,
    committed: bool,
    rolled_back: bool,
}

impl<'a> Transaction<'a> {
    pub fn begin(conn: &'a mut dyn BatchExecutor) -> Result<Self> {
        conn.start()?;
        Ok(Transaction { conn, committed: false, rolled_back: false })
    }

    pub fn connection(&mut self) -> &mut dyn BatchExecutor {
        &mut *self.conn
    }

    pub fn commit(&mut self) -> Result<()> {
        self.conn.commit()?;
        self.committed = true;
        Ok(())
    }

    pub fn rollback(&mut self) -> Result<()> {
        self.rolled_back = true;
        self.conn.rollback()
    }
}

impl<'a> Drop for Transaction<'a> {
    fn drop(&mut self) {
        if !self.committed && !self.rolled_back {
            if let Err(err) = self.conn.rollback() {
                warn!("Rollback of unfinished transaction failed: {}", err);
            }
        }
    }
}

/// Transaction scope over an already borrowed connection.
///
/// A failed commit or a panic in `f` still ends in a rollback, so the
/// connection goes back to its pool outside any transaction.
pub fn in_transaction<T, F>(conn: &mut dyn BatchExecutor, f: F) -> Result<T>
where
    F: FnOnce(&mut dyn BatchExecutor) -> Result<T>,
{
    let mut tx = Transaction::begin(conn)?;
    match f(tx.connection()) {
        Ok(value) => {
            tx.commit()?;
            Ok(value)
        }
        Err(err) => {
            if let Err(rollback_err) = tx.rollback() {
                warn!("Rollback failed after `{}`: {}", err, rollback_err);
            }
            Err(err)
        }
    }
}
