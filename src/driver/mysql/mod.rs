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
//! MySQL modules.
//!

mod connection;

pub use connection::*;

use mysql::prelude::Queryable;
use crate::driver::BatchExecutor;
use crate::errors::Result;
use crate::platform::Platform;
use crate::value::BatchValue;

pub struct MySQL {
    conn: MysqlConnection,
}

impl MySQL {
    pub fn new(conn: MysqlConnection) -> Self {
        MySQL { conn }
    }
}

impl BatchExecutor for MySQL {
    fn platform(&self) -> Platform {
        Platform::Mysql
    }

    fn start(&mut self) -> Result<()> {
        self.conn.query_drop("START TRANSACTION")?;
        Ok(())
    }

    fn commit(&mut self) -> Result<()> {
        self.conn.query_drop("COMMIT")?;
        Ok(())
    }

    fn rollback(&mut self) -> Result<()> {
        self.conn.query_drop("ROLLBACK")?;
        Ok(())
    }

    fn execute(&mut self, sql: &str, params: &[BatchValue]) -> Result<u64> {
        let stmt = self.conn.prep(sql)?;
        self.conn.exec_drop(&stmt, to_mysql_params(params))?;
        Ok(self.conn.affected_rows())
    }

    fn execute_batch(&mut self, sql: &str, batch: &[Vec<BatchValue>]) -> Result<u64> {
        let stmt = self.conn.prep(sql)?;
        let mut affected_rows = 0u64;
        for params in batch {
            self.conn.exec_drop(&stmt, to_mysql_params(params))?;
            affected_rows += self.conn.affected_rows();
        }
        Ok(affected_rows)
    }

    fn execute_update(&mut self, sql: &str) -> Result<u64> {
        self.conn.query_drop(sql)?;
        Ok(self.conn.affected_rows())
    }

    fn query_scalar(&mut self, sql: &str) -> Result<i64> {
        let value: Option<i64> = self.conn.query_first(sql)?;
        Ok(value.unwrap_or_default())
    }
}

fn to_mysql_params(params: &[BatchValue]) -> mysql::Params {
    if params.is_empty() {
        return mysql::Params::Empty;
    }
    mysql::Params::Positional(params.iter().map(to_mysql_value).collect())
}

fn to_mysql_value(value: &BatchValue) -> mysql::Value {
    match value {
        BatchValue::Null => mysql::Value::NULL,
        BatchValue::Int(v) => mysql::Value::Int(i64::from(*v)),
        BatchValue::Bigint(v) => mysql::Value::Int(*v),
        BatchValue::Text(v) => mysql::Value::Bytes(v.as_bytes().to_vec()),
    }
}
