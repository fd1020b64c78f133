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
//! Common Errors.
//!
use std::fmt;

pub type Result<T> = std::result::Result<T, BatchError>;

#[derive(Debug)]
pub enum BatchError {
    /// Raised by the database driver while executing a statement.
    DatabaseError(String),
    /// The data source url or an environment value could not be understood.
    ConfigError(String),
    PoolError(String),
    SerializeError(String),
    /// The url scheme names a database this build has no driver for.
    UnsupportedPlatform(String),
    /// A flush happens every `batch_size` statements, so zero is meaningless.
    InvalidBatchSize(usize),
    /// Positional parameters start at 1.
    InvalidParameterIndex(usize),
}

impl fmt::Display for BatchError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            BatchError::DatabaseError(ref err) => write!(f, "Database Error: {}", err),
            BatchError::ConfigError(ref err) => write!(f, "Config Error: {}", err),
            BatchError::PoolError(ref err) => write!(f, "Pool Error: {}", err),
            BatchError::SerializeError(ref err) => write!(f, "Serialize Error: {}", err),
            BatchError::UnsupportedPlatform(ref err) => write!(f, "Unsupported Platform: {}", err),
            BatchError::InvalidBatchSize(size) => write!(f, "Invalid batch size: {}, expected at least 1", size),
            BatchError::InvalidParameterIndex(index) => write!(f, "Invalid parameter index: {}, positions start at 1", index),
        }
    }
}

impl std::error::Error for BatchError {}

#[cfg(feature = "sqlite-sync")]
impl From<rusqlite::Error> for BatchError {
    fn from(err: rusqlite::Error) -> Self {
        BatchError::DatabaseError(err.to_string())
    }
}

#[cfg(feature = "mysql-sync")]
impl From<mysql::Error> for BatchError {
    fn from(err: mysql::Error) -> Self {
        BatchError::DatabaseError(err.to_string())
    }
}

#[cfg(feature = "postgres-sync")]
impl From<postgres::Error> for BatchError {
    fn from(err: postgres::Error) -> Self {
        BatchError::DatabaseError(err.to_string())
    }
}

impl From<r2d2::Error> for BatchError {
    fn from(err: r2d2::Error) -> Self {
        BatchError::PoolError(err.to_string())
    }
}

impl From<serde_json::Error> for BatchError {
    fn from(err: serde_json::Error) -> Self {
        BatchError::SerializeError(err.to_string())
    }
}

impl From<url::ParseError> for BatchError {
    fn from(err: url::ParseError) -> Self {
        BatchError::ConfigError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_the_offending_value() {
        assert_eq!(
            BatchError::InvalidBatchSize(0).to_string(),
            "Invalid batch size: 0, expected at least 1"
        );
        assert_eq!(
            BatchError::ConfigError("bad".to_string()).to_string(),
            "Config Error: bad"
        );
    }

    #[test]
    fn url_errors_become_config_errors() {
        let err: BatchError = url::Url::parse("not a url").unwrap_err().into();
        assert!(matches!(err, BatchError::ConfigError(_)));
    }
}
