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

use std::str::FromStr;
use crate::config::BatchConfig;
use crate::errors::{BatchError, Result};

pub type PostgresPool = r2d2::Pool<PostgresConnectionManager>;
pub type PostgresConnection = r2d2::PooledConnection<PostgresConnectionManager>;


#[derive(Clone, Debug)]
pub struct PostgresConnectionManager {
    config: postgres::Config,
    application_name: Option<String>,
}

impl PostgresConnectionManager {

    pub fn new(cfg: &BatchConfig) -> Result<Self> {
        let mut config = postgres::Config::from_str(cfg.get_url())
            .map_err(|e| BatchError::ConfigError(format!("Invalid PostgreSQL URL: {}", e)))?;
        config.connect_timeout(cfg.get_connection_timeout());
        Ok(Self {
            config,
            application_name: Some("batchmark".to_string()),
        })
    }
}

impl r2d2::ManageConnection for PostgresConnectionManager {
    type Connection = postgres::Client;
    type Error = postgres::Error;

    fn connect(&self) -> std::result::Result<Self::Connection, Self::Error> {
        let mut config = self.config.clone();
        if let Some(app_name) = &self.application_name {
            config.application_name(app_name);
        }
        config.connect(postgres::NoTls)
    }

    fn is_valid(&self, conn: &mut Self::Connection) -> std::result::Result<(), Self::Error> {
        conn.simple_query("SELECT 1").map(|_| ())
    }

    fn has_broken(&self, conn: &mut Self::Connection) -> bool {
        conn.is_closed()
    }
}

///
/// Create a connection pool
///
/// cfg Configuration information
///
pub fn init_postgres_pool(cfg: &BatchConfig) -> Result<PostgresPool> {
    let manager = PostgresConnectionManager::new(cfg)?;

    let pool = r2d2::Pool::builder()
        .connection_timeout(cfg.get_connection_timeout())
        .max_size(cfg.get_max_size())
        .build(manager)
        .map_err(|e| {
            BatchError::PoolError(format!("Failed to create PostgreSQL connection pool: {}", e))
        })?;

    let mut conn = pool.get().map_err(|e| {
        BatchError::PoolError(format!("Failed to get connection from pool: {}", e))
    })?;

    conn.simple_query("SELECT 1").map_err(|e| {
        BatchError::DatabaseError(format!("PostgreSQL connection test failed: {}", e))
    })?;

    Ok(pool)
}
