//! Acceptance rules for an OIB entered into a form field.
//!
//! The checksum in [`crate::core::oib`] only answers "is this a valid OIB".
//! A form field also has to decide what to do with blank or missing input,
//! which depends on whether the field is required and on how it is submitted.

use crate::core::oib;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FieldPolicy {
    pub required: bool,
    /// Field collects data from visitors instead of holding content.
    pub information_collector: bool,
}

/// How the value reached us.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum InputContext {
    /// Edited as part of a content object.
    #[default]
    Object,
    /// Submitted through an information collection form.
    Collection,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FieldError {
    #[error("Input required.")]
    Required,

    #[error("Personal identification number is not valid.")]
    InvalidIdentifier,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputState {
    Accepted,
    Invalid(FieldError),
}

impl InputState {
    pub fn is_accepted(&self) -> bool {
        matches!(self, InputState::Accepted)
    }
}

pub fn normalize(raw: &str) -> String {
    raw.trim().to_string()
}

pub fn has_content(raw: &str) -> bool {
    !raw.trim().is_empty()
}

pub fn sort_key(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Decides whether a submitted value is acceptable for the field.
///
/// `value` is `None` when nothing was submitted for the field at all, which
/// is stricter than an empty submission for collection forms.
///
/// Only empty or whitespace-only input counts as blank. `"0"` is content and
/// goes through the checksum, unlike PHP's `empty()` which treats it as blank.
pub fn validate_input(
    value: Option<&str>,
    policy: FieldPolicy,
    context: InputContext,
) -> InputState {
    let required = match context {
        InputContext::Object => policy.required && !policy.information_collector,
        InputContext::Collection => policy.required,
    };

    let Some(raw) = value else {
        return match context {
            InputContext::Object if !required => InputState::Accepted,
            _ => InputState::Invalid(FieldError::Required),
        };
    };

    let data = raw.trim();
    if data.is_empty() {
        if required {
            return InputState::Invalid(FieldError::Required);
        }
        return InputState::Accepted;
    }

    if !oib::validate(data) {
        return InputState::Invalid(FieldError::InvalidIdentifier);
    }

    InputState::Accepted
}
