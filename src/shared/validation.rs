//! Field-level validation helpers shared by the resource services.
//!
//! DTOs declare their rules with `#[derive(Validate)]`; the resulting
//! [`ValidationErrors`] are flattened into [`FieldErrors`], a `field -> [message]`
//! map that the API returns with status 422. Rules that need the database
//! (uniqueness, foreign-key existence) are added to the same map by the services.

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{ValidationError, ValidationErrors};

use crate::core::error::{AppError, Result};
use crate::shared::constants::{MAX_PRICE_CENTS, PRICE_SCALE};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn single(field: &str, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    /// Collect the outcome of `Validate::validate` into a field map
    pub fn from_result(result: std::result::Result<(), ValidationErrors>) -> Self {
        match result {
            Ok(()) => Self::new(),
            Err(errors) => errors.into(),
        }
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    pub fn has(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    /// `Ok(())` when nothing failed, otherwise a 422 validation error
    pub fn into_result(self) -> Result<()> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(AppError::Validation(self))
        }
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .0
            .iter()
            .map(|(field, messages)| format!("{}: {}", field, messages.join(" ")))
            .collect();
        write!(f, "{}", parts.join("; "))
    }
}

impl From<ValidationErrors> for FieldErrors {
    fn from(errors: ValidationErrors) -> Self {
        let mut out = Self::new();
        for (field, field_errors) in errors.field_errors() {
            for error in field_errors.iter() {
                out.add(&field, describe(&field, error));
            }
        }
        out
    }
}

/// Human-readable field name ("category_id" -> "category id")
fn label(field: &str) -> String {
    field.replace('_', " ")
}

pub fn required_message(field: &str) -> String {
    format!("The {} field is required.", label(field))
}

pub fn taken_message(field: &str) -> String {
    format!("The {} has already been taken.", label(field))
}

pub fn invalid_selection_message(field: &str) -> String {
    format!("The selected {} is invalid.", label(field))
}

/// A JSON value of the wrong type, e.g. a number where a UUID string belongs
pub fn invalid_type_message(field: &str, detail: &str) -> String {
    format!("The {} field has an invalid value: {}.", label(field), detail)
}

fn param(error: &ValidationError, key: &str) -> Option<String> {
    match error.params.get(key)? {
        serde_json::Value::Number(n) => Some(match (n.as_i64(), n.as_f64()) {
            (Some(i), _) => i.to_string(),
            (None, Some(f)) if f.fract() == 0.0 => format!("{}", f as i64),
            _ => n.to_string(),
        }),
        serde_json::Value::String(s) => Some(s.clone()),
        _ => None,
    }
}

/// Turn a validator error code into a message naming the field
fn describe(field: &str, error: &ValidationError) -> String {
    if let Some(message) = &error.message {
        return message.to_string();
    }

    let name = label(field);
    match error.code.as_ref() {
        "required" => required_message(field),
        "length" => match param(error, "max") {
            Some(max) => format!(
                "The {} field must not be greater than {} characters.",
                name, max
            ),
            None => format!("The {} field has an invalid length.", name),
        },
        "range" => match (param(error, "min"), param(error, "max")) {
            (Some(min), Some(max)) => {
                format!("The {} field must be between {} and {}.", name, min, max)
            }
            _ => format!("The {} field is out of range.", name),
        },
        "min" => format!(
            "The {} field must be at least {}.",
            name,
            param(error, "min").unwrap_or_default()
        ),
        "max" => format!(
            "The {} field must not be greater than {}.",
            name,
            param(error, "max").unwrap_or_default()
        ),
        _ => format!("The {} field is invalid.", name),
    }
}

/// Unwrap a field the DTO rules already marked as required
pub fn require<T>(field: &str, value: Option<T>) -> Result<T> {
    value.ok_or_else(|| AppError::Validation(FieldErrors::single(field, required_message(field))))
}

/// Strip surrounding whitespace from single-line text input
pub fn trimmed(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string())
}

// =============================================================================
// CUSTOM RULES
// =============================================================================

/// A present string must contain something other than whitespace
pub fn not_blank(value: &str) -> std::result::Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("required"));
    }
    Ok(())
}

pub fn max_price() -> Decimal {
    Decimal::new(MAX_PRICE_CENTS, PRICE_SCALE)
}

/// Price must lie in `[0, 999999.99]`
pub fn validate_price(price: &Decimal) -> std::result::Result<(), ValidationError> {
    if price.is_sign_negative() && !price.is_zero() {
        let mut error = ValidationError::new("min");
        error.add_param(Cow::Borrowed("min"), &"0");
        return Err(error);
    }
    if *price > max_price() {
        let mut error = ValidationError::new("max");
        error.add_param(Cow::Borrowed("max"), &max_price().to_string());
        return Err(error);
    }
    Ok(())
}
