//! Field parsing utilities for MLS export records
//!
//! This module provides helper functions for decoding the fixed-position
//! export fields with strict range checking: a value that does not fit its
//! declared width is an error, never a silent truncation.

use csv::StringRecord;
use tracing::warn;

use crate::constants::field_name;
use crate::{Error, Result};

/// Get a field value by position
fn get_field(record: &StringRecord, index: usize) -> Result<&str> {
    record
        .get(index)
        .ok_or_else(|| Error::invalid_field(field_name(index), "missing from record"))
}

/// Parse a required u16 field
pub fn parse_required_u16(record: &StringRecord, index: usize) -> Result<u16> {
    let value = get_field(record, index)?;
    value
        .parse::<u16>()
        .map_err(|e| Error::invalid_field(field_name(index), format!("'{}' ({})", value, e)))
}

/// Parse a required u32 field
pub fn parse_required_u32(record: &StringRecord, index: usize) -> Result<u32> {
    let value = get_field(record, index)?;
    value
        .parse::<u32>()
        .map_err(|e| Error::invalid_field(field_name(index), format!("'{}' ({})", value, e)))
}

/// Parse a required f64 field
pub fn parse_required_f64(record: &StringRecord, index: usize) -> Result<f64> {
    let value = get_field(record, index)?;
    value
        .parse::<f64>()
        .map_err(|e| Error::invalid_field(field_name(index), format!("'{}' ({})", value, e)))
}

/// Parse a required boolean field
///
/// MLS exports write `1`/`0`; the literals `true`/`false` in any case are
/// accepted as well.
pub fn parse_required_bool(record: &StringRecord, index: usize) -> Result<bool> {
    let value = get_field(record, index)?;
    match value {
        "1" => Ok(true),
        "0" => Ok(false),
        other => match other.to_ascii_lowercase().as_str() {
            "true" => Ok(true),
            "false" => Ok(false),
            _ => Err(Error::invalid_field(
                field_name(index),
                format!("'{}' is not a boolean literal", value),
            )),
        },
    }
}

/// Parse an optional u16 field; an empty value yields 0
pub fn parse_optional_u16(record: &StringRecord, index: usize) -> Result<u16> {
    let value = get_field(record, index)?;
    if value.is_empty() {
        return Ok(0);
    }
    value
        .parse::<u16>()
        .map_err(|e| Error::invalid_field(field_name(index), format!("'{}' ({})", value, e)))
}

/// Parse an optional i16 field; an empty value yields 0
pub fn parse_optional_i16(record: &StringRecord, index: usize) -> Result<i16> {
    let value = get_field(record, index)?;
    if value.is_empty() {
        return Ok(0);
    }
    value
        .parse::<i16>()
        .map_err(|e| Error::invalid_field(field_name(index), format!("'{}' ({})", value, e)))
}

/// Parse the combined cell identifier leniently
///
/// Unlike every other field, a cell identifier that fails to parse or does
/// not fit `u32` keeps its record: decomposition proceeds from zero and a
/// warning is logged. Missing and empty values take the same path.
pub fn parse_lenient_cell_id(record: &StringRecord, index: usize) -> u32 {
    let Some(value) = record.get(index) else {
        return 0;
    };
    match value.parse::<u32>() {
        Ok(cell_id) => cell_id,
        Err(e) => {
            warn!(
                "Unparsable cell identifier '{}', deriving site and sector from zero: {}",
                value, e
            );
            0
        }
    }
}
