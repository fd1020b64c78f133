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
//! Timings collected while a harness runs.
//!
use std::fmt;
use std::time::Duration;
use chrono::{DateTime, Utc};
use serde::Serialize;
use crate::errors::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Phase {
    Insert,
    Update,
    BulkUpdate,
    Delete,
    BulkDelete,
}

impl Phase {
    /// Name used in the timing log line.
    pub fn test_name(&self) -> &'static str {
        match self {
            Phase::Insert => "testInsert",
            Phase::Update => "testUpdate",
            Phase::BulkUpdate => "testBulkUpdate",
            Phase::Delete => "testDelete",
            Phase::BulkDelete => "testBulkDelete",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.test_name())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PhaseTiming {
    pub phase: Phase,
    pub elapsed: Duration,
    /// Statements bound during the phase.
    pub statements: u64,
    /// Round trips issued, single executions and batches alike.
    pub executions: u64,
}

impl PhaseTiming {
    pub fn millis(&self) -> u128 {
        self.elapsed.as_millis()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub strategy: String,
    pub platform: String,
    pub batch_size: usize,
    pub post_count: usize,
    pub post_comment_count: usize,
    pub started_at: DateTime<Utc>,
    pub phases: Vec<PhaseTiming>,
}

impl BatchReport {
    pub fn new(strategy: &str, platform: &str, batch_size: usize, post_count: usize, post_comment_count: usize) -> Self {
        BatchReport {
            strategy: strategy.to_string(),
            platform: platform.to_string(),
            batch_size,
            post_count,
            post_comment_count,
            started_at: Utc::now(),
            phases: Vec::new(),
        }
    }

    pub fn record(&mut self, timing: PhaseTiming) {
        self.phases.push(timing);
    }

    /// First timing recorded for `phase`.
    ///
    /// The delete phase re-inserts the rows, so `Phase::Insert` can appear twice.
    pub fn phase(&self, phase: Phase) -> Option<&PhaseTiming> {
        self.phases.iter().find(|t| t.phase == phase)
    }

    pub fn phases_of(&self, phase: Phase) -> impl Iterator<Item = &PhaseTiming> {
        self.phases.iter().filter(move |t| t.phase == phase)
    }

    pub fn total(&self) -> Duration {
        self.phases.iter().map(|t| t.elapsed).sum()
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl fmt::Display for BatchReport {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(
            f,
            "{} on {} (batch size {}, {} posts x {} comments)",
            self.strategy, self.platform, self.batch_size, self.post_count, self.post_comment_count
        )?;
        for timing in &self.phases {
            writeln!(
                f,
                "  {:<16} {:>8} ms  {:>8} statements  {:>8} round trips",
                timing.phase.test_name(),
                timing.millis(),
                timing.statements,
                timing.executions
            )?;
        }
        write!(f, "  {:<16} {:>8} ms", "total", self.total().as_millis())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn timing(phase: Phase, millis: u64) -> PhaseTiming {
        PhaseTiming { phase, elapsed: Duration::from_millis(millis), statements: 10, executions: 2 }
    }

    #[test]
    fn lookup_and_total() {
        let mut report = BatchReport::new("Batching", "SQLite", 5, 10, 4);
        report.record(timing(Phase::Insert, 3));
        report.record(timing(Phase::Delete, 4));
        report.record(timing(Phase::Insert, 5));
        assert_eq!(report.phase(Phase::Insert).map(|t| t.millis()), Some(3));
        assert_eq!(report.phases_of(Phase::Insert).count(), 2);
        assert!(report.phase(Phase::BulkDelete).is_none());
        assert_eq!(report.total(), Duration::from_millis(12));
    }

    #[test]
    fn json_carries_the_phases() {
        let mut report = BatchReport::new("NoBatching", "SQLite", 1, 1, 1);
        report.record(timing(Phase::BulkUpdate, 1));
        let json: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();
        assert_eq!(json["strategy"], "NoBatching");
        assert_eq!(json["phases"][0]["phase"], "BulkUpdate");
        assert_eq!(json["phases"][0]["statements"], 10);
    }

    #[test]
    fn display_lists_every_phase() {
        let mut report = BatchReport::new("Batching", "SQLite", 5, 10, 4);
        report.record(timing(Phase::Update, 2));
        let text = report.to_string();
        assert!(text.starts_with("Batching on SQLite"));
        assert!(text.contains("testUpdate"));
        assert!(text.contains("total"));
    }
}
