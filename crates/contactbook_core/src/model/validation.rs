//! Field and record validation rules for contacts.
//!
//! # Responsibility
//! - Check name/email constraints for interactive form input.
//! - Check the full field set of records read back from storage.
//!
//! # Invariants
//! - Rules are evaluated independently; callers receive every violation in
//!   rule order, never just the first one.
//! - Validation is pure and never mutates its input.

use crate::model::timestamp::parse_timestamp;
use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Maximum name length in characters, measured after trimming.
pub const NAME_MAX_CHARS: usize = 100;
/// Maximum email length in characters, measured after trimming.
pub const EMAIL_MAX_CHARS: usize = 254;

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"));

/// Contact field a validation message is keyed by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContactField {
    Id,
    Name,
    Email,
    CreatedAt,
    UpdatedAt,
}

impl ContactField {
    /// Wire name of the field in persisted JSON.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Name => "name",
            Self::Email => "email",
            Self::CreatedAt => "createdAt",
            Self::UpdatedAt => "updatedAt",
        }
    }
}

impl Display for ContactField {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One violated validation rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    /// Name is missing or empty after trimming.
    NameRequired,
    /// Trimmed name is longer than [`NAME_MAX_CHARS`].
    NameTooLong,
    /// Name is non-empty but consists only of whitespace.
    WhitespaceOnlyName,
    /// Email is missing or empty after trimming.
    EmailRequired,
    /// Trimmed email is longer than [`EMAIL_MAX_CHARS`].
    EmailTooLong,
    /// Email does not match `local@domain.tld`.
    InvalidEmailFormat,
    /// Stored record has no usable id.
    IdRequired,
    /// Stored timestamp is present but does not parse.
    InvalidTimestamp(ContactField),
    /// Stored `updatedAt` is earlier than `createdAt`.
    TimestampOrder,
}

impl ValidationError {
    /// Field the violation should be displayed next to.
    pub fn field(&self) -> ContactField {
        match self {
            Self::NameRequired | Self::NameTooLong | Self::WhitespaceOnlyName => {
                ContactField::Name
            }
            Self::EmailRequired | Self::EmailTooLong | Self::InvalidEmailFormat => {
                ContactField::Email
            }
            Self::IdRequired => ContactField::Id,
            Self::InvalidTimestamp(field) => *field,
            Self::TimestampOrder => ContactField::UpdatedAt,
        }
    }
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NameRequired => write!(f, "name required"),
            Self::NameTooLong => write!(f, "name too long"),
            Self::WhitespaceOnlyName => write!(f, "whitespace-only name"),
            Self::EmailRequired => write!(f, "email required"),
            Self::EmailTooLong => write!(f, "email too long"),
            Self::InvalidEmailFormat => write!(f, "invalid email format"),
            Self::IdRequired => write!(f, "id required"),
            Self::InvalidTimestamp(field) => write!(f, "invalid {field} timestamp"),
            Self::TimestampOrder => write!(f, "updatedAt precedes createdAt"),
        }
    }
}

impl Error for ValidationError {}

/// How strictly a single form field is checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationMode {
    /// Live feedback while typing: an empty field is not reported yet.
    Realtime,
    /// Blur/submit checks: every rule applies.
    Strict,
}

/// Strict name checks.
pub fn validate_name(name: Option<&str>) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let raw = name.unwrap_or_default();
    let trimmed = raw.trim();

    if trimmed.is_empty() {
        errors.push(ValidationError::NameRequired);
    }
    if trimmed.chars().count() > NAME_MAX_CHARS {
        errors.push(ValidationError::NameTooLong);
    }
    if !raw.is_empty() && trimmed.is_empty() {
        errors.push(ValidationError::WhitespaceOnlyName);
    }

    errors
}

/// Strict email checks.
pub fn validate_email(email: Option<&str>) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let trimmed = email.unwrap_or_default().trim();

    if trimmed.is_empty() {
        errors.push(ValidationError::EmailRequired);
        return errors;
    }
    if trimmed.chars().count() > EMAIL_MAX_CHARS {
        errors.push(ValidationError::EmailTooLong);
    }
    if !EMAIL_RE.is_match(trimmed) {
        errors.push(ValidationError::InvalidEmailFormat);
    }

    errors
}

/// Name checks applied only once the field has content.
pub fn validate_name_realtime(name: &str) -> Vec<ValidationError> {
    if name.is_empty() {
        return Vec::new();
    }
    validate_name(Some(name))
}

/// Email checks applied only once the field has content.
pub fn validate_email_realtime(email: &str) -> Vec<ValidationError> {
    if email.is_empty() {
        return Vec::new();
    }
    validate_email(Some(email))
}

/// Checks one form field with the requested strictness.
pub fn validate_field(
    field: ContactField,
    value: &str,
    mode: ValidationMode,
) -> Vec<ValidationError> {
    match (field, mode) {
        (ContactField::Name, ValidationMode::Realtime) => validate_name_realtime(value),
        (ContactField::Name, ValidationMode::Strict) => validate_name(Some(value)),
        (ContactField::Email, ValidationMode::Realtime) => validate_email_realtime(value),
        (ContactField::Email, ValidationMode::Strict) => validate_email(Some(value)),
        _ => Vec::new(),
    }
}

/// Validates the editable subset (name, email) of a contact.
pub fn validate_form(name: Option<&str>, email: Option<&str>) -> Vec<ValidationError> {
    let mut errors = validate_name(name);
    errors.extend(validate_email(email));
    errors
}

/// Validates the full field set of a stored record.
///
/// Timestamps are optional here; when present they must parse, and
/// `updatedAt` must not precede `createdAt`.
pub fn validate_record_fields(
    id: Option<&str>,
    name: Option<&str>,
    email: Option<&str>,
    created_at: Option<&str>,
    updated_at: Option<&str>,
) -> Vec<ValidationError> {
    let mut errors = validate_form(name, email);

    if id.map_or(true, |value| value.trim().is_empty()) {
        errors.push(ValidationError::IdRequired);
    }

    let created = created_at.map(parse_timestamp);
    let updated = updated_at.map(parse_timestamp);
    if matches!(created, Some(None)) {
        errors.push(ValidationError::InvalidTimestamp(ContactField::CreatedAt));
    }
    if matches!(updated, Some(None)) {
        errors.push(ValidationError::InvalidTimestamp(ContactField::UpdatedAt));
    }
    if let (Some(Some(created)), Some(Some(updated))) = (created, updated) {
        if updated < created {
            errors.push(ValidationError::TimestampOrder);
        }
    }

    errors
}
