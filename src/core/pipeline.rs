use crate::core::oib::Oib;
use crate::domain::field::{self, FieldError, FieldPolicy, InputContext, InputState};
use crate::domain::model::{
    InputFormat, OutputFormat, Record, RecordOutcome, RecordStatus, ReportSummary,
    ValidationReport,
};
use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
use crate::utils::error::{CheckError, Result};
use crate::utils::validation::validate_delimiter;
use std::io::Write;
use std::path::Path;
use zip::write::{FileOptions, ZipWriter};

pub const DEFAULT_COLUMN: &str = "oib";

pub struct BatchPipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
}

impl<S: Storage, C: ConfigProvider> BatchPipeline<S, C> {
    pub fn new(storage: S, config: C) -> Self {
        Self { storage, config }
    }

    fn extract_csv(&self, text: &str) -> Result<Vec<Record>> {
        let delimiter = validate_delimiter("source.delimiter", self.config.delimiter())?;
        let has_headers = self.config.has_headers();

        let mut reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(has_headers)
            .flexible(true)
            .from_reader(text.as_bytes());

        let index = if has_headers {
            let name = self.config.column().unwrap_or(DEFAULT_COLUMN);
            let headers = reader.headers()?;
            headers
                .iter()
                .position(|header| header.trim().eq_ignore_ascii_case(name))
                .ok_or_else(|| CheckError::InputError {
                    message: format!(
                        "column '{}' not found in header ({})",
                        name,
                        headers.iter().collect::<Vec<_>>().join(", ")
                    ),
                })?
        } else {
            column_index(self.config.column())?
        };
        tracing::debug!("Reading OIB values from column {}", index);

        // csv 会跳过空行，这里把它们补回来，保证行号和必填检查不丢
        let input = text.as_bytes();
        let mut records = Vec::new();
        let mut row = csv::StringRecord::new();
        loop {
            let from = reader.position().byte() as usize;
            let more = reader.read_record(&mut row)?;
            let to = if more {
                reader.position().byte() as usize
            } else {
                input.len()
            };

            for _ in 0..blank_lines_before(input, from, to) {
                records.push(Record {
                    position: records.len() + 1,
                    value: Some(String::new()),
                });
            }
            if !more {
                break;
            }
            records.push(Record {
                position: records.len() + 1,
                value: row.get(index).map(str::to_string),
            });
        }
        Ok(records)
    }

    /// Applies `only_invalid` to the rows that get written out.
    fn selected(&self, report: &ValidationReport) -> ValidationReport {
        let mut selected = report.clone();
        if self.config.only_invalid() {
            selected
                .outcomes
                .retain(|outcome| outcome.status == RecordStatus::Invalid);
        }
        selected
    }
}

fn column_index(column: Option<&str>) -> Result<usize> {
    match column {
        None => Ok(0),
        Some(value) => value
            .trim()
            .parse::<usize>()
            .map_err(|_| CheckError::InvalidConfigValueError {
                field: "source.column".to_string(),
                value: value.to_string(),
                reason: "Column must be a zero based index when the input has no header row"
                    .to_string(),
            }),
    }
}

/// Counts the blank lines the CSV reader skipped at the start of `input[from..to]`.
///
/// `from` may sit right after a record's last field or after its terminator,
/// so a break that only closes the previous record is not counted.
fn blank_lines_before(input: &[u8], from: usize, to: usize) -> usize {
    let to = to.min(input.len());
    let from = from.min(to);
    let chunk = &input[from..to];
    let gap_len = chunk
        .iter()
        .position(|b| !matches!(b, b'\r' | b'\n'))
        .unwrap_or(chunk.len());
    let before = &input[..from];

    let mut gap = &chunk[..gap_len];
    if before.last() == Some(&b'\r') && gap.first() == Some(&b'\n') {
        gap = &gap[1..];
    }

    let mut breaks = 0;
    let mut i = 0;
    while i < gap.len() {
        if gap[i] == b'\r' && gap.get(i + 1) == Some(&b'\n') {
            i += 1;
        }
        breaks += 1;
        i += 1;
    }

    if matches!(before.last(), None | Some(b'\n' | b'\r')) {
        breaks
    } else {
        breaks.saturating_sub(1)
    }
}

fn extract_lines(text: &str) -> Vec<Record> {
    text.lines()
        .enumerate()
        .map(|(i, line)| Record {
            position: i + 1,
            value: Some(line.to_string()),
        })
        .collect()
}

/// Runs one record through the field rules and the checksum.
pub fn evaluate(record: &Record, policy: FieldPolicy, context: InputContext) -> RecordOutcome {
    let value = record.value.as_deref().map(field::normalize);
    let state = field::validate_input(record.value.as_deref(), policy, context);

    let (status, reason) = match state {
        InputState::Accepted if value.as_deref().is_some_and(field::has_content) => {
            (RecordStatus::Valid, None)
        }
        InputState::Accepted => (RecordStatus::Empty, None),
        InputState::Invalid(FieldError::InvalidIdentifier) => {
            let detail = value
                .as_deref()
                .and_then(|v| Oib::parse(v).err())
                .map(|e| format!("{} ({})", FieldError::InvalidIdentifier, e))
                .unwrap_or_else(|| FieldError::InvalidIdentifier.to_string());
            (RecordStatus::Invalid, Some(detail))
        }
        InputState::Invalid(err) => (RecordStatus::Invalid, Some(err.to_string())),
    };

    let sort_key = value
        .as_deref()
        .filter(|v| field::has_content(v))
        .map(field::sort_key);

    RecordOutcome {
        position: record.position,
        value,
        status,
        reason,
        sort_key,
    }
}

pub fn render_csv(report: &ValidationReport) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(["position", "value", "status", "reason"])?;
    for outcome in &report.outcomes {
        writer.write_record([
            outcome.position.to_string().as_str(),
            outcome.value.as_deref().unwrap_or(""),
            outcome.status.as_str(),
            outcome.reason.as_deref().unwrap_or(""),
        ])?;
    }
    writer.into_inner().map_err(|e| CheckError::IoError(e.into_error()))
}

pub fn render_json(report: &ValidationReport) -> Result<Vec<u8>> {
    Ok(serde_json::to_vec_pretty(report)?)
}

fn render(format: OutputFormat, report: &ValidationReport) -> Result<Vec<u8>> {
    match format {
        OutputFormat::Csv => render_csv(report),
        OutputFormat::Json => render_json(report),
    }
}

fn output_file(dir: &str, name: &str) -> String {
    Path::new(dir).join(name).to_string_lossy().into_owned()
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for BatchPipeline<S, C> {
    async fn extract(&self) -> Result<Vec<Record>> {
        let path = self.config.input_path();
        tracing::debug!("Loading input from: {}", path);

        let data = self.storage.read_file(path).await?;
        let text = String::from_utf8(data).map_err(|e| CheckError::InputError {
            message: format!("{} is not valid UTF-8: {}", path, e),
        })?;
        let text = text.trim_start_matches('\u{feff}');

        let mut records = match self.config.input_format() {
            InputFormat::Csv => self.extract_csv(text)?,
            InputFormat::Lines => extract_lines(text),
        };

        if let Some(max) = self.config.max_records() {
            if records.len() > max {
                tracing::info!("✂️ Limiting input to the first {} of {} records", max, records.len());
                records.truncate(max);
            }
        }

        Ok(records)
    }

    async fn transform(&self, records: Vec<Record>) -> Result<ValidationReport> {
        let policy = self.config.field_policy();
        let context = self.config.input_context();
        tracing::debug!("Field policy: {:?}, context: {:?}", policy, context);

        let mut summary = ReportSummary::default();
        let outcomes: Vec<RecordOutcome> = records
            .iter()
            .map(|record| {
                let outcome = evaluate(record, policy, context);
                if outcome.status == RecordStatus::Invalid {
                    tracing::debug!(
                        "Record {} rejected: {}",
                        outcome.position,
                        outcome.reason.as_deref().unwrap_or("")
                    );
                }
                summary.record(outcome.status);
                outcome
            })
            .collect();

        Ok(ValidationReport {
            job: self.config.job_name().to_string(),
            generated_at: chrono::Utc::now(),
            summary,
            outcomes,
        })
    }

    async fn load(&self, report: ValidationReport) -> Result<Vec<String>> {
        let report = self.selected(&report);
        let output_dir = self.config.output_path();

        let mut rendered = Vec::new();
        for format in self.config.output_formats() {
            rendered.push((*format, render(*format, &report)?));
        }

        if let Some(archive) = self.config.archive_name() {
            tracing::debug!("Creating ZIP archive with {} files", rendered.len());

            let zip_data = {
                let mut zip = ZipWriter::new(std::io::Cursor::new(Vec::new()));
                for (format, data) in &rendered {
                    zip.start_file::<_, ()>(format.file_name(), FileOptions::default())?;
                    zip.write_all(data)?;
                }
                let cursor = zip.finish()?;
                cursor.into_inner()
            };

            let path = output_file(output_dir, archive);
            self.storage.write_file(&path, &zip_data).await?;
            return Ok(vec![path]);
        }

        let mut written = Vec::with_capacity(rendered.len());
        for (format, data) in rendered {
            let path = output_file(output_dir, format.file_name());
            self.storage.write_file(&path, &data).await?;
            written.push(path);
        }
        Ok(written)
    }
}
