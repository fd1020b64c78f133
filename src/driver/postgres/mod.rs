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
//! PostgreSQL modules.
//!

mod connection;

pub use connection::*;

use std::collections::HashMap;
use postgres::Statement;
use postgres::types::{ToSql, Type};
use crate::driver::BatchExecutor;
use crate::errors::Result;
use crate::platform::Platform;
use crate::value::BatchValue;

pub struct Postgres {
    conn: PostgresConnection,
    /// Statements prepared on this connection, keyed by sql.
    statements: HashMap<String, Statement>,
}

impl Postgres {
    pub fn new(conn: PostgresConnection) -> Self {
        Postgres { conn, statements: HashMap::new() }
    }

    fn prepare_cached(&mut self, sql: &str) -> Result<Statement> {
        let conn = &mut self.conn;
        cached_statement(&mut self.statements, sql, |sql| Ok(conn.prepare(sql)?))
    }
}

impl BatchExecutor for Postgres {
    fn platform(&self) -> Platform {
        Platform::Postgres
    }

    fn start(&mut self) -> Result<()> {
        self.conn.batch_execute("BEGIN")?;
        Ok(())
    }

    fn commit(&mut self) -> Result<()> {
        self.conn.batch_execute("COMMIT")?;
        Ok(())
    }

    fn rollback(&mut self) -> Result<()> {
        self.conn.batch_execute("ROLLBACK")?;
        Ok(())
    }

    fn execute(&mut self, sql: &str, params: &[BatchValue]) -> Result<u64> {
        let stmt = self.prepare_cached(sql)?;
        let values = to_postgres_values(params, stmt.params());
        let affected_rows = self.conn.execute(&stmt, &as_refs(&values))?;
        Ok(affected_rows)
    }

    fn execute_batch(&mut self, sql: &str, batch: &[Vec<BatchValue>]) -> Result<u64> {
        let stmt = self.prepare_cached(sql)?;
        let mut affected_rows = 0u64;
        for params in batch {
            let values = to_postgres_values(params, stmt.params());
            affected_rows += self.conn.execute(&stmt, &as_refs(&values))?;
        }
        Ok(affected_rows)
    }

    fn execute_update(&mut self, sql: &str) -> Result<u64> {
        let affected_rows = self.conn.execute(sql, &[])?;
        Ok(affected_rows)
    }

    fn query_scalar(&mut self, sql: &str) -> Result<i64> {
        let row = self.conn.query_one(sql, &[])?;
        Ok(row.try_get::<_, i64>(0)?)
    }
}

/// Look `sql` up in `cache`, preparing and remembering it on a miss.
fn cached_statement<T, F>(cache: &mut HashMap<String, T>, sql: &str, prepare: F) -> Result<T>
where
    T: Clone,
    F: FnOnce(&str) -> Result<T>,
{
    if let Some(stmt) = cache.get(sql) {
        return Ok(stmt.clone());
    }
    let stmt = prepare(sql)?;
    cache.insert(sql.to_string(), stmt.clone());
    Ok(stmt)
}

/// `types` are the parameter types the server inferred for the statement.
fn to_postgres_values(params: &[BatchValue], types: &[Type]) -> Vec<Box<dyn ToSql + Sync>> {
    params.iter()
        .enumerate()
        .map(|(i, value)| -> Box<dyn ToSql + Sync> {
            match value {
                BatchValue::Null => typed_null(types.get(i)),
                BatchValue::Int(v) => Box::new(*v),
                BatchValue::Bigint(v) => Box::new(*v),
                BatchValue::Text(v) => Box::new(v.clone()),
            }
        })
        .collect()
}

/// A NULL whose rust type passes the driver's type check for `ty`.
fn typed_null(ty: Option<&Type>) -> Box<dyn ToSql + Sync> {
    match ty {
        Some(ty) if <i64 as ToSql>::accepts(ty) => Box::new(Option::<i64>::None),
        Some(ty) if <i32 as ToSql>::accepts(ty) => Box::new(Option::<i32>::None),
        Some(ty) if <i16 as ToSql>::accepts(ty) => Box::new(Option::<i16>::None),
        Some(ty) if <f64 as ToSql>::accepts(ty) => Box::new(Option::<f64>::None),
        Some(ty) if <f32 as ToSql>::accepts(ty) => Box::new(Option::<f32>::None),
        Some(ty) if <bool as ToSql>::accepts(ty) => Box::new(Option::<bool>::None),
        Some(ty) if <Vec<u8> as ToSql>::accepts(ty) => Box::new(Option::<Vec<u8>>::None),
        _ => Box::new(Option::<String>::None),
    }
}

fn as_refs(values: &[Box<dyn ToSql + Sync>]) -> Vec<&(dyn ToSql + Sync)> {
    values.iter().map(|v| v.as_ref()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::BytesMut;
    use postgres::types::IsNull;

    #[test]
    fn statements_are_prepared_once_per_sql() {
        let mut cache = HashMap::new();
        let mut prepared = Vec::new();
        for sql in ["insert into Post values ($1)", "delete from Post", "insert into Post values ($1)"] {
            cached_statement(&mut cache, sql, |sql| {
                prepared.push(sql.to_string());
                Ok(prepared.len())
            }).unwrap();
        }
        assert_eq!(prepared, vec!["insert into Post values ($1)", "delete from Post"]);
        assert_eq!(cache.get("insert into Post values ($1)"), Some(&1));
    }

    #[test]
    fn failed_prepares_are_not_cached() {
        let mut cache: HashMap<String, usize> = HashMap::new();
        let err = cached_statement(&mut cache, "bogus", |_| {
            Err(crate::errors::BatchError::DatabaseError("syntax error".to_string()))
        });
        assert!(err.is_err());
        assert!(cache.is_empty());
    }

    #[test]
    fn nulls_bind_to_numeric_and_text_columns() {
        for ty in [Type::INT8, Type::INT4, Type::INT2, Type::TEXT, Type::VARCHAR] {
            let values = to_postgres_values(&[BatchValue::Null], std::slice::from_ref(&ty));
            let mut buf = BytesMut::new();
            let bound = values[0].to_sql_checked(&ty, &mut buf);
            assert!(matches!(bound, Ok(IsNull::Yes)), "NULL rejected for {}", ty);
        }
    }

    #[test]
    fn values_keep_their_types() {
        let values = to_postgres_values(
            &[BatchValue::Bigint(7), BatchValue::Int(1), BatchValue::Text("Post no. 7".into())],
            &[Type::INT8, Type::INT4, Type::VARCHAR],
        );
        let mut buf = BytesMut::new();
        assert!(values[0].to_sql_checked(&Type::INT8, &mut buf).is_ok());
        assert!(values[1].to_sql_checked(&Type::INT4, &mut buf).is_ok());
        assert!(values[2].to_sql_checked(&Type::VARCHAR, &mut buf).is_ok());
    }
}
