//! Row validation: RawRow -> ContactRecord

use contracts::{ContactRecord, RawRow};

/// Required first-name column
pub const FIRST_NAME_HEADER: &str = "FirstName";
/// Required phone column
pub const PHONE_HEADER: &str = "Phone";
/// Optional notes column
pub const NOTES_HEADER: &str = "Notes";

/// Validate one row
///
/// Returns a record iff `FirstName` and `Phone` are present and non-blank
/// after trimming. Headers must match exactly. Values are kept verbatim;
/// numeric phones are rendered as text.
pub fn validate_row(row: &RawRow) -> Option<ContactRecord> {
    let first_name = required(row, FIRST_NAME_HEADER)?;
    let phone = required(row, PHONE_HEADER)?;
    let notes = required(row, NOTES_HEADER).unwrap_or_default();

    Some(ContactRecord {
        first_name,
        phone,
        notes,
    })
}

fn required(row: &RawRow, header: &str) -> Option<String> {
    let value = row.get(header)?;
    if value.is_blank() {
        return None;
    }
    Some(value.as_text().into_owned())
}
