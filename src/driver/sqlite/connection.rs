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

use std::fmt;
use std::path::{Path, PathBuf};
use r2d2::Pool;
use rusqlite::{Connection, Error, OpenFlags};
use crate::config::BatchConfig;
use crate::errors::{BatchError, Result};
use crate::platform::Platform;

pub type SqlitePool = Pool<SqliteConnectionManager>;
pub type SqliteConnection = r2d2::PooledConnection<SqliteConnectionManager>;


#[derive(Debug)]
enum Source {
    File(PathBuf),
    Memory,
}

type InitFn = dyn Fn(&mut Connection) -> std::result::Result<(), rusqlite::Error> + Send + Sync + 'static;

pub struct SqliteConnectionManager {
    source: Source,
    flags: OpenFlags,
    init: Option<Box<InitFn>>,
}

impl fmt::Debug for SqliteConnectionManager {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut builder = f.debug_struct("SqliteConnectionManager");
        let _ = builder.field("source", &self.source);
        let _ = builder.field("flags", &self.flags);
        let _ = builder.field("init", &self.init.as_ref().map(|_| "InitFn"));
        builder.finish()
    }
}

impl SqliteConnectionManager {

    pub fn new(cfg: &BatchConfig) -> Result<Self> {
        if cfg.get_platform() != Platform::Sqlite {
            return Err(BatchError::UnsupportedPlatform(
                format!("expected SQLite, got {}", cfg.get_platform())
            ));
        }
        let file_path = cfg.get_database_path()
            .ok_or_else(|| BatchError::ConfigError("missing sqlite database path".to_string()))?;

        let manager = if file_path == ":memory:" {
            Self::memory()
        } else {
            Self::file(file_path)
        };
        // PostComment.post_id references Post.id
        Ok(manager.with_init(|c| c.execute_batch("PRAGMA foreign_keys = ON;")))
    }

    /// Creates a new `SqliteConnectionManager` from file.
    ///
    /// See `rusqlite::Connection::open`
    pub fn file<P: AsRef<Path>>(path: P) -> Self {
        Self {
            source: Source::File(path.as_ref().to_path_buf()),
            flags: OpenFlags::default(),
            init: None,
        }
    }

    /// Creates a new `SqliteConnectionManager` from memory.
    pub fn memory() -> Self {
        Self {
            source: Source::Memory,
            flags: OpenFlags::default(),
            init: None,
        }
    }

    /// Run `init` on every new connection, e.g. to set PRAGMAs.
    pub fn with_init<F>(self, init: F) -> Self
    where
        F: Fn(&mut Connection) -> std::result::Result<(), rusqlite::Error> + Send + Sync + 'static,
    {
        let init: Option<Box<InitFn>> = Some(Box::new(init));
        Self { init, ..self }
    }
}

impl r2d2::ManageConnection for SqliteConnectionManager {
    type Connection = Connection;
    type Error = rusqlite::Error;

    fn connect(&self) -> std::result::Result<Connection, Error> {
        match self.source {
            Source::File(ref path) => Connection::open_with_flags(path, self.flags),
            Source::Memory => Connection::open_in_memory_with_flags(self.flags),
        }
            .and_then(|mut c| match self.init {
                None => Ok(c),
                Some(ref init) => init(&mut c).map(|_| c),
            })
    }

    fn is_valid(&self, conn: &mut Connection) -> std::result::Result<(), Error> {
        conn.execute_batch("")
    }

    fn has_broken(&self, conn: &mut Connection) -> bool {
        self.is_valid(conn).is_err()
    }
}

///
/// Create a connection pool
/// cfg Configuration information
///
pub fn init_sqlite_pool(cfg: &BatchConfig) -> Result<SqlitePool> {
    let manager = SqliteConnectionManager::new(cfg)?;

    // every in-memory connection is its own database
    let max_size = if cfg.is_memory() && cfg.get_max_size() > 1 {
        tracing::warn!("SQLite :memory: database limits the pool to a single connection");
        1
    } else {
        cfg.get_max_size()
    };

    let mut builder = r2d2::Pool::builder()
        .connection_timeout(cfg.get_connection_timeout())
        .max_size(max_size);
    if cfg.is_memory() {
        // closing the only connection would drop the database with it
        builder = builder.idle_timeout(None).max_lifetime(None);
    }
    let pool = builder
        .build(manager)
        .map_err(|e| {
            BatchError::PoolError(format!("Failed to create SQLite connection pool: {}", e))
        })?;

    // Testing connections
    let conn = pool.get().map_err(|e| {
        BatchError::PoolError(format!("Failed to get connection from pool: {}", e))
    })?;

    conn.query_row("SELECT 1", [], |row| row.get::<_, i64>(0)).map_err(|e| {
        BatchError::DatabaseError(format!("SQLite connection test failed: {}", e))
    })?;

    Ok(pool)
}
