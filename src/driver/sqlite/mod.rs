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
//! SQLite modules.
//!

mod connection;

pub use connection::*;

use rusqlite::params_from_iter;
use rusqlite::types::{ToSqlOutput, Value, ValueRef};
use rusqlite::ToSql;
use crate::driver::BatchExecutor;
use crate::errors::Result;
use crate::platform::Platform;
use crate::value::BatchValue;

pub struct Sqlite {
    conn: SqliteConnection,
}

impl Sqlite {
    pub fn new(conn: SqliteConnection) -> Self {
        Sqlite { conn }
    }
}

impl BatchExecutor for Sqlite {
    fn platform(&self) -> Platform {
        Platform::Sqlite
    }

    fn start(&mut self) -> Result<()> {
        self.conn.execute_batch("BEGIN TRANSACTION")?;
        Ok(())
    }

    fn commit(&mut self) -> Result<()> {
        self.conn.execute_batch("COMMIT TRANSACTION")?;
        Ok(())
    }

    fn rollback(&mut self) -> Result<()> {
        self.conn.execute_batch("ROLLBACK TRANSACTION")?;
        Ok(())
    }

    fn execute(&mut self, sql: &str, params: &[BatchValue]) -> Result<u64> {
        let mut stmt = self.conn.prepare_cached(sql)?;
        let affected_rows = stmt.execute(params_from_iter(params.iter()))?;
        Ok(affected_rows as u64)
    }

    fn execute_batch(&mut self, sql: &str, batch: &[Vec<BatchValue>]) -> Result<u64> {
        // SQLite has no wire protocol, so a batch is the cached statement run back to back.
        let mut stmt = self.conn.prepare_cached(sql)?;
        let mut affected_rows = 0u64;
        for params in batch {
            affected_rows += stmt.execute(params_from_iter(params.iter()))? as u64;
        }
        Ok(affected_rows)
    }

    fn execute_update(&mut self, sql: &str) -> Result<u64> {
        let affected_rows = self.conn.execute(sql, [])?;
        Ok(affected_rows as u64)
    }

    fn query_scalar(&mut self, sql: &str) -> Result<i64> {
        let value = self.conn.query_row(sql, [], |row| row.get::<_, i64>(0))?;
        Ok(value)
    }
}

impl ToSql for BatchValue {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(match self {
            BatchValue::Null => ToSqlOutput::Owned(Value::Null),
            BatchValue::Int(v) => ToSqlOutput::Owned(Value::Integer(i64::from(*v))),
            BatchValue::Bigint(v) => ToSqlOutput::Owned(Value::Integer(*v)),
            BatchValue::Text(v) => ToSqlOutput::Borrowed(ValueRef::Text(v.as_bytes())),
        })
    }
}
