//! Individual record parsing for MLS cell exports
//!
//! This module converts one raw export record into a validated
//! [`CellObservation`], deriving the site and sector identity from the
//! combined cell identifier as part of record assembly.

use csv::StringRecord;

use super::field_parsers::{
    parse_lenient_cell_id, parse_optional_i16, parse_optional_u16, parse_required_bool,
    parse_required_f64, parse_required_u16, parse_required_u32,
};
use crate::app::models::{CellIdentity, CellObservation};
use crate::constants::fields;
use crate::{Error, Result};

/// Parse a single cell observation from an export record
///
/// The record must carry at least 14 fields in export column order. Any
/// unparsable or out-of-range required field rejects the whole record with
/// an error naming the field; the combined cell identifier alone degrades
/// to zero instead of rejecting.
pub fn parse_cell_record(record: &StringRecord) -> Result<CellObservation> {
    if record.len() < fields::MIN_FIELDS {
        return Err(Error::invalid_field(
            "record",
            format!(
                "expected at least {} fields, found {}",
                fields::MIN_FIELDS,
                record.len()
            ),
        ));
    }

    let radio = record.get(fields::RADIO).unwrap_or_default().to_string();
    let mcc = parse_required_u16(record, fields::MCC)?;
    let mnc = parse_required_u16(record, fields::MNC)?;
    let tac = parse_required_u16(record, fields::TAC)?;
    let pci = parse_optional_u16(record, fields::PCI)?;
    let lon = parse_required_f64(record, fields::LON)?;
    let lat = parse_required_f64(record, fields::LAT)?;
    let range = parse_required_u32(record, fields::RANGE)?;
    let samples = parse_required_u32(record, fields::SAMPLES)?;
    let changeable = parse_required_bool(record, fields::CHANGEABLE)?;
    let created = parse_required_u32(record, fields::CREATED)?;
    let updated = parse_required_u32(record, fields::UPDATED)?;
    let average_signal = parse_optional_i16(record, fields::AVERAGE_SIGNAL)?;

    // The one deliberately lenient field: site and sector are always
    // derived together, from zero when the identifier is unusable
    let cell_id = parse_lenient_cell_id(record, fields::CELL_ID);
    let identity = CellIdentity::from_cell_id(cell_id);

    Ok(CellObservation {
        radio,
        mcc,
        mnc,
        tac,
        pci,
        lon,
        lat,
        range,
        samples,
        changeable,
        created,
        updated,
        average_signal,
        site_id: identity.site_id,
        sector_id: identity.sector_id,
    })
}
