use crate::domain::field::{FieldPolicy, InputContext};
use crate::domain::model::{InputFormat, OutputFormat, Record, ValidationReport};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
    fn exists(&self, path: &str) -> impl std::future::Future<Output = bool> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn job_name(&self) -> &str;
    fn input_path(&self) -> &str;
    fn input_format(&self) -> InputFormat;
    /// Header name, or zero based index when the input has no header row.
    fn column(&self) -> Option<&str>;
    fn has_headers(&self) -> bool;
    fn delimiter(&self) -> char;
    fn max_records(&self) -> Option<usize>;
    fn field_policy(&self) -> FieldPolicy;
    fn input_context(&self) -> InputContext;
    fn output_path(&self) -> &str;
    fn output_formats(&self) -> &[OutputFormat];
    fn only_invalid(&self) -> bool;
    /// Archive file name when compression is on.
    fn archive_name(&self) -> Option<&str>;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<Vec<Record>>;
    async fn transform(&self, records: Vec<Record>) -> Result<ValidationReport>;
    async fn load(&self, report: ValidationReport) -> Result<Vec<String>>;
}
