pub mod engine;
pub mod oib;
pub mod pipeline;

pub use crate::domain::model::{Record, RecordOutcome, ReportSummary, ValidationReport};
pub use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;
