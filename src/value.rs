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
//! Positional parameter values.
//!
use std::fmt;

/// A value bound to one `?` of a prepared statement.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum BatchValue {
    #[default]
    Null,
    Int(i32),
    Bigint(i64),
    Text(String),
}

/// Parameters of one statement execution, in placeholder order.
pub type Params = Vec<BatchValue>;

impl BatchValue {
    pub fn is_null(&self) -> bool {
        *self == BatchValue::Null
    }
}

impl fmt::Display for BatchValue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            BatchValue::Null => write!(f, "NULL"),
            BatchValue::Int(v) => write!(f, "{}(Integer)", v),
            BatchValue::Bigint(v) => write!(f, "{}(Long)", v),
            BatchValue::Text(v) => write!(f, "{}(String)", v),
        }
    }
}

impl From<i32> for BatchValue {
    fn from(v: i32) -> Self {
        BatchValue::Int(v)
    }
}

impl From<i64> for BatchValue {
    fn from(v: i64) -> Self {
        BatchValue::Bigint(v)
    }
}

impl From<String> for BatchValue {
    fn from(v: String) -> Self {
        BatchValue::Text(v)
    }
}

impl From<&str> for BatchValue {
    fn from(v: &str) -> Self {
        BatchValue::Text(v.to_string())
    }
}

impl<T: Into<BatchValue>> From<Option<T>> for BatchValue {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(BatchValue::Null)
    }
}

/// Render parameters the way they are logged: `a(String), 1(Integer)`.
pub fn format_params(params: &[BatchValue]) -> String {
    params.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conversions() {
        assert_eq!(BatchValue::from(1), BatchValue::Int(1));
        assert_eq!(BatchValue::from(1i64), BatchValue::Bigint(1));
        assert_eq!(BatchValue::from("a"), BatchValue::Text("a".to_string()));
        assert!(BatchValue::from(None::<i64>).is_null());
    }

    #[test]
    fn params_are_logged_with_their_types() {
        let params: Params = vec!["Post no. 1".into(), 0.into(), 1i64.into()];
        assert_eq!(format_params(&params), "Post no. 1(String), 0(Integer), 1(Long)");
    }
}
