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

use mysql::{Conn, Error, Opts};
use mysql::prelude::Queryable;
use crate::config::BatchConfig;
use crate::errors::{BatchError, Result};

pub type MysqlPool = r2d2::Pool<MysqlConnectionManager>;
pub type MysqlConnection = r2d2::PooledConnection<MysqlConnectionManager>;


#[derive(Clone, Debug)]
pub struct MysqlConnectionManager {
    params: Opts,
}

impl MysqlConnectionManager {
    pub fn new(cfg: &BatchConfig) -> Result<Self> {
        let opts = Opts::from_url(cfg.get_url())
            .map_err(|e| BatchError::ConfigError(format!("Invalid MySQL URL: {}", e)))?;
        Ok(Self { params: opts })
    }
}

impl r2d2::ManageConnection for MysqlConnectionManager {
    type Connection = Conn;
    type Error = Error;

    fn connect(&self) -> std::result::Result<Conn, Error> {
        Conn::new(self.params.clone())
    }

    fn is_valid(&self, conn: &mut Conn) -> std::result::Result<(), Error> {
        match conn.ping() {
            Ok(_) => Ok(()),
            Err(_) => {
                // fall back to a round trip when ping is refused
                conn.query_drop("SELECT 1").map_err(|e| {
                    tracing::warn!("Connection validation failed: {}", e);
                    e
                })
            }
        }
    }

    fn has_broken(&self, conn: &mut Conn) -> bool {
        conn.ping().is_err()
    }
}

///
/// Create a connection pool
///
/// cfg Configuration information
///
pub fn init_mysql_pool(cfg: &BatchConfig) -> Result<MysqlPool> {
    let manager = MysqlConnectionManager::new(cfg)?;

    let pool = r2d2::Pool::builder()
        .connection_timeout(cfg.get_connection_timeout())
        .max_size(cfg.get_max_size())
        .build(manager)
        .map_err(|e| {
            BatchError::PoolError(format!("Failed to create MySQL connection pool: {}", e))
        })?;

    // Testing connections
    let mut conn = pool.get().map_err(|e| {
        BatchError::PoolError(format!("Failed to get connection from pool: {}", e))
    })?;

    conn.query_drop("SELECT 1").map_err(|e| {
        BatchError::DatabaseError(format!("MySQL connection test failed: {}", e))
    })?;

    Ok(pool)
}
