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


use std::time::Duration;
use percent_encoding::percent_decode_str;
use url::Url;
use crate::errors::{BatchError, Result};
use crate::platform::Platform;

pub const ENV_URL: &str = "BATCHMARK_URL";
pub const ENV_POST_COUNT: &str = "BATCHMARK_POST_COUNT";
pub const ENV_POST_COMMENT_COUNT: &str = "BATCHMARK_POST_COMMENT_COUNT";
pub const ENV_BATCH_SIZE: &str = "BATCHMARK_BATCH_SIZE";

const MEMORY_URL: &str = "sqlite::memory:";

#[derive(Clone, Debug)]
pub struct BatchConfig {
    url: String,
    platform: Platform,
    database_path: Option<String>,
    post_count: usize,
    post_comment_count: usize,
    batch_size: usize,
    max_size: u32,
    connection_timeout: Duration,
}

impl Default for BatchConfig {
    fn default() -> Self {
        BatchConfig {
            url: MEMORY_URL.to_string(),
            platform: Platform::Sqlite,
            database_path: Some(":memory:".to_string()),
            post_count: 1000,
            post_comment_count: 4,
            batch_size: 1,
            // The harness drives a single borrowed connection.
            max_size: 1,
            connection_timeout: Duration::from_secs(6),
        }
    }
}

impl BatchConfig {

    pub fn new(url: &str) -> Result<Self> {
        BatchConfig::default().set_url(url)
    }

    /// Build a config from `BATCHMARK_*` environment variables, falling back to defaults.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = match lookup(ENV_URL) {
            Some(url) => BatchConfig::new(&url)?,
            None => BatchConfig::default(),
        };
        if let Some(value) = lookup(ENV_POST_COUNT) {
            cfg.post_count = parse_count(ENV_POST_COUNT, &value)?;
        }
        if let Some(value) = lookup(ENV_POST_COMMENT_COUNT) {
            cfg.post_comment_count = parse_count(ENV_POST_COMMENT_COUNT, &value)?;
        }
        if let Some(value) = lookup(ENV_BATCH_SIZE) {
            cfg.batch_size = parse_count(ENV_BATCH_SIZE, &value)?;
        }
        cfg.validate()?;
        Ok(cfg)
    }

    /// parse the url into a platform and, for sqlite, a database path
    fn parse_url(mut self) -> Result<Self> {
        let url = Url::parse(&self.url)?;
        let scheme = url.scheme();
        let platform = Platform::from_scheme(scheme)
            .ok_or_else(|| BatchError::UnsupportedPlatform(scheme.to_string()))?;
        self.database_path = match platform {
            Platform::Sqlite => {
                let db_file = if url.cannot_be_a_base() {
                    url.path().to_string()
                } else {
                    let host = url.host_str().unwrap_or_default();
                    let path = url.path();
                    let path = if path == "/" { "" } else { path };
                    format!("{}{}", host, path)
                };
                if db_file.is_empty() {
                    return Err(BatchError::ConfigError(format!("missing sqlite database path in `{}`", self.url)));
                }
                let db_file = percent_decode_str(&db_file)
                    .decode_utf8()
                    .map_err(|e| BatchError::ConfigError(format!("sqlite database path in `{}` is not utf-8: {}", self.url, e)))?;
                Some(db_file.into_owned())
            }
            _ => None,
        };
        self.platform = platform;
        Ok(self)
    }

    /// Reject settings the flush rule cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.batch_size == 0 {
            return Err(BatchError::InvalidBatchSize(self.batch_size));
        }
        if self.max_size == 0 {
            return Err(BatchError::ConfigError("pool max size must be at least 1".to_string()));
        }
        Ok(())
    }

    pub fn set_url(mut self, url: &str) -> Result<Self> {
        self.url = url.to_string();
        self.parse_url()
    }

    pub fn get_url(&self) -> &str {
        &self.url
    }

    pub fn get_platform(&self) -> Platform {
        self.platform
    }

    /// The sqlite database file, or `:memory:`.
    pub fn get_database_path(&self) -> Option<&str> {
        self.database_path.as_deref()
    }

    pub fn is_memory(&self) -> bool {
        self.database_path.as_deref() == Some(":memory:")
    }

    pub fn set_post_count(mut self, post_count: usize) -> Self {
        self.post_count = post_count;
        self
    }

    pub fn get_post_count(&self) -> usize {
        self.post_count
    }

    pub fn set_post_comment_count(mut self, post_comment_count: usize) -> Self {
        self.post_comment_count = post_comment_count;
        self
    }

    pub fn get_post_comment_count(&self) -> usize {
        self.post_comment_count
    }

    pub fn set_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    pub fn get_batch_size(&self) -> usize {
        self.batch_size
    }

    pub fn set_max_size(mut self, max_size: u32) -> Self {
        self.max_size = max_size;
        self
    }

    pub fn get_max_size(&self) -> u32 {
        self.max_size
    }

    pub fn set_connection_timeout(mut self, connection_timeout: Duration) -> Self {
        self.connection_timeout = connection_timeout;
        self
    }

    pub fn get_connection_timeout(&self) -> Duration {
        self.connection_timeout
    }
}

fn parse_count(key: &str, value: &str) -> Result<usize> {
    value.trim().parse::<usize>().map_err(|e| {
        BatchError::ConfigError(format!("{}=`{}` is not a count: {}", key, value, e))
    })
}
