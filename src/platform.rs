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
//! Database platforms.
//!
use std::borrow::Cow;
use std::fmt;
use serde::Serialize;

/// The database a data source url points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Platform {
    Sqlite,
    Mysql,
    Postgres,
}

impl Platform {
    /// Match a url scheme.
    pub fn from_scheme(scheme: &str) -> Option<Self> {
        match scheme {
            "sqlite" => Some(Platform::Sqlite),
            "mysql" => Some(Platform::Mysql),
            "postgres" | "postgresql" => Some(Platform::Postgres),
            _ => None,
        }
    }

    /// Rewrite `?` placeholders into the platform's positional form.
    ///
    /// PostgreSQL numbers its placeholders (`$1`, `$2`, ...). Question marks inside
    /// single quoted literals are left alone.
    pub fn render<'a>(&self, sql: &'a str) -> Cow<'a, str> {
        match self {
            Platform::Postgres if sql.contains('?') => {
                let mut out = String::with_capacity(sql.len() + 8);
                let mut index = 0;
                let mut quoted = false;
                for ch in sql.chars() {
                    match ch {
                        '\'' => {
                            quoted = !quoted;
                            out.push(ch);
                        }
                        '?' if !quoted => {
                            index += 1;
                            out.push('$');
                            out.push_str(&index.to_string());
                        }
                        _ => out.push(ch),
                    }
                }
                Cow::Owned(out)
            }
            _ => Cow::Borrowed(sql),
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Platform::Sqlite => write!(f, "SQLite"),
            Platform::Mysql => write!(f, "MySQL"),
            Platform::Postgres => write!(f, "PostgreSQL"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn postgres_placeholders_are_numbered() {
        let sql = Platform::Postgres.render("insert into Post (title, version, id) values (?, ?, ?)");
        assert_eq!(sql, "insert into Post (title, version, id) values ($1, $2, $3)");
    }

    #[test]
    fn quoted_question_marks_survive() {
        let sql = Platform::Postgres.render("update Post set title = '?' where id = ?");
        assert_eq!(sql, "update Post set title = '?' where id = $1");
    }

    #[test]
    fn other_platforms_borrow_the_input() {
        let sql = "delete from Post where id = ?";
        assert!(matches!(Platform::Sqlite.render(sql), Cow::Borrowed(_)));
        assert!(matches!(Platform::Mysql.render(sql), Cow::Borrowed(_)));
    }

    #[test]
    fn schemes() {
        assert_eq!(Platform::from_scheme("postgresql"), Some(Platform::Postgres));
        assert_eq!(Platform::from_scheme("sqlite"), Some(Platform::Sqlite));
        assert_eq!(Platform::from_scheme("oracle"), None);
    }
}
