use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One candidate value pulled from the input, before validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    /// 1-based data record number (header rows not counted).
    pub position: usize,
    /// `None` when the row has no such column.
    pub value: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum InputFormat {
    #[default]
    Csv,
    Lines,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Csv,
    Json,
}

impl OutputFormat {
    pub fn file_name(&self) -> &'static str {
        match self {
            OutputFormat::Csv => "oib_report.csv",
            OutputFormat::Json => "oib_report.json",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordStatus {
    Valid,
    /// Blank input the field policy allows.
    Empty,
    Invalid,
}

impl RecordStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordStatus::Valid => "valid",
            RecordStatus::Empty => "empty",
            RecordStatus::Invalid => "invalid",
        }
    }
}

impl fmt::Display for RecordStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordOutcome {
    pub position: usize,
    pub value: Option<String>,
    pub status: RecordStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_key: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSummary {
    pub total: usize,
    pub valid: usize,
    pub empty: usize,
    pub invalid: usize,
}

impl ReportSummary {
    pub fn record(&mut self, status: RecordStatus) {
        self.total += 1;
        match status {
            RecordStatus::Valid => self.valid += 1,
            RecordStatus::Empty => self.empty += 1,
            RecordStatus::Invalid => self.invalid += 1,
        }
    }

    pub fn all_accepted(&self) -> bool {
        self.invalid == 0
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationReport {
    pub job: String,
    pub generated_at: DateTime<Utc>,
    pub summary: ReportSummary,
    pub outcomes: Vec<RecordOutcome>,
}

/// What a finished run produced.
#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub summary: ReportSummary,
    pub written: Vec<String>,
}

impl RunOutcome {
    /// Process exit code for a finished run: 1 when any record was rejected.
    pub fn exit_code(&self) -> i32 {
        if self.summary.all_accepted() {
            0
        } else {
            1
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_counts() {
        let mut summary = ReportSummary::default();
        summary.record(RecordStatus::Valid);
        summary.record(RecordStatus::Empty);
        summary.record(RecordStatus::Invalid);
        summary.record(RecordStatus::Valid);

        assert_eq!(summary.total, 4);
        assert_eq!(summary.valid, 2);
        assert_eq!(summary.empty, 1);
        assert_eq!(summary.invalid, 1);
        assert!(!summary.all_accepted());
    }

    #[test]
    fn test_run_exit_code_follows_invalid_count() {
        let mut summary = ReportSummary::default();
        summary.record(RecordStatus::Valid);
        summary.record(RecordStatus::Empty);
        let clean = RunOutcome {
            summary,
            written: vec![],
        };
        assert_eq!(clean.exit_code(), 0);

        summary.record(RecordStatus::Invalid);
        let failed = RunOutcome {
            summary,
            written: vec!["out/oib_report.csv".to_string()],
        };
        assert_eq!(failed.exit_code(), 1);
    }

    #[test]
    fn test_output_format_file_names() {
        assert_eq!(OutputFormat::Csv.file_name(), "oib_report.csv");
        assert_eq!(OutputFormat::Json.file_name(), "oib_report.json");
    }

    #[test]
    fn test_status_serializes_lowercase() {
        let json = serde_json::to_string(&RecordStatus::Invalid).unwrap();
        assert_eq!(json, "\"invalid\"");
    }
}
