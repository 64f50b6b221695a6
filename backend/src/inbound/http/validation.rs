//! Shared validation helpers for inbound HTTP adapters.

use serde_json::json;

use crate::domain::{Error, ItemKind, ListingValidationError, UpgradeError};

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    MissingField,
    InvalidNumber,
    LevelOutOfRange,
    NotAnUpgrade,
    InvalidLabel,
    InvalidPrice,
    DescriptionTooLong,
    UnknownItemKind,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            ErrorCode::MissingField => "missing_field",
            ErrorCode::InvalidNumber => "invalid_number",
            ErrorCode::LevelOutOfRange => "level_out_of_range",
            ErrorCode::NotAnUpgrade => "not_an_upgrade",
            ErrorCode::InvalidLabel => "invalid_label",
            ErrorCode::InvalidPrice => "invalid_price",
            ErrorCode::DescriptionTooLong => "description_too_long",
            ErrorCode::UnknownItemKind => "unknown_item_kind",
        }
    }
}

/// Newtype wrapper for HTTP field names to provide type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(&self) -> &str {
        self.0
    }
}

fn field_error(field: &str, message: impl Into<String>, code: ErrorCode) -> Error {
    Error::invalid_request(message).with_details(json!({
        "field": field,
        "code": code.as_str(),
    }))
}

pub(crate) fn missing_field_error(field: FieldName) -> Error {
    field_error(
        field.as_str(),
        format!("{} is required", field.as_str()),
        ErrorCode::MissingField,
    )
}

/// Parse a required small unsigned number from a query string value.
pub(crate) fn parse_level(value: Option<&str>, field: FieldName) -> Result<u8, Error> {
    let raw = value.ok_or_else(|| missing_field_error(field))?;
    raw.trim().parse::<u8>().map_err(|_| {
        Error::invalid_request(format!("{} must be a whole number", field.as_str())).with_details(
            json!({
                "field": field.as_str(),
                "value": raw,
                "code": ErrorCode::InvalidNumber.as_str(),
            }),
        )
    })
}

/// Require a query string value to be present.
pub(crate) fn require<'a>(value: Option<&'a str>, field: FieldName) -> Result<&'a str, Error> {
    value.ok_or_else(|| missing_field_error(field))
}

pub(crate) fn map_upgrade_error(err: UpgradeError) -> Error {
    let message = err.to_string();
    match err {
        UpgradeError::LevelOutOfRange { level, .. } => Error::invalid_request(message)
            .with_details(json!({
                "field": "level",
                "value": level,
                "code": ErrorCode::LevelOutOfRange.as_str(),
            })),
        UpgradeError::NotAnUpgrade {
            installed,
            requested,
            ..
        } => Error::invalid_request(message).with_details(json!({
            "field": "level",
            "installed": installed,
            "value": requested,
            "code": ErrorCode::NotAnUpgrade.as_str(),
        })),
        UpgradeError::InvalidLabel { field } => {
            field_error(field, message, ErrorCode::InvalidLabel)
        }
    }
}

pub(crate) fn map_listing_validation_error(err: ListingValidationError) -> Error {
    let message = err.to_string();
    match err {
        ListingValidationError::InvalidPrice { .. } => {
            field_error("price", message, ErrorCode::InvalidPrice)
        }
        ListingValidationError::DescriptionTooLong { .. } => {
            field_error("description", message, ErrorCode::DescriptionTooLong)
        }
        ListingValidationError::UnknownItemKind { .. } => {
            field_error("item_type", message, ErrorCode::UnknownItemKind)
        }
    }
}

/// Parse the wire name of an inventory item kind.
pub(crate) fn parse_item_kind(value: &str) -> Result<ItemKind, Error> {
    value.parse::<ItemKind>().map_err(map_listing_validation_error)
}
