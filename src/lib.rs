pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::CliConfig;

pub use crate::adapters::LocalStorage;
pub use crate::config::toml_config::TomlConfig;
pub use crate::core::oib::{check_digit, complete, validate, Oib, OibError};
pub use crate::core::{engine::ValidationEngine, pipeline::BatchPipeline};
pub use crate::domain::field::{FieldError, FieldPolicy, InputContext, InputState};
pub use crate::utils::error::{CheckError, Result};
