//! Client-side CSV parsing for outbreak uploads.
//!
//! The format is `pincode,disease_name,cases,date,advice` with a mandatory
//! header line that is skipped without inspection. Fields are split on bare
//! commas; quoting and escaped commas are not supported.

use serde::{Deserialize, Serialize};

/// Column order expected in uploaded files.
pub const CSV_HEADER: &str = "pincode,disease_name,cases,date,advice";

/// One parsed CSV line, before server-side normalization.
///
/// Text fields are `None` when the line had fewer columns; they are left out
/// of the JSON body. `cases` is `None` when the column did not start with an
/// integer and is sent as `null`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CsvRow {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pincode: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disease_name: Option<String>,
    #[serde(default)]
    pub cases: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub advice: Option<String>,
}

/// Body of the admin upload request.
#[derive(Debug, Serialize)]
pub struct UploadRequest<'a> {
    pub data: &'a [CsvRow],
}

/// Parse a whole file. The first line is always dropped and blank lines are
/// skipped. Rows with unparsable `cases` are kept.
#[must_use]
pub fn parse_csv(text: &str) -> Vec<CsvRow> {
    text.split('\n')
        .skip(1)
        .filter(|line| !line.trim().is_empty())
        .map(parse_row)
        .collect()
}

/// Split one line into the five positional fields. Extra columns are ignored.
#[must_use]
pub fn parse_row(line: &str) -> CsvRow {
    let mut fields = line.split(',').map(str::trim);
    let pincode = fields.next().map(str::to_owned);
    let disease_name = fields.next().map(str::to_owned);
    let cases = fields.next().and_then(parse_leading_int);
    let date = fields.next().map(str::to_owned);
    let advice = fields.next().map(str::to_owned);
    CsvRow { pincode, disease_name, cases, date, advice }
}

/// Parse the integer prefix of `raw` in base 10.
///
/// Leading whitespace and one sign are accepted; parsing stops at the first
/// non-digit (`"12 cases"` → 12). Returns `None` when no digits lead the
/// string or the value does not fit in an `i64`.
#[must_use]
pub fn parse_leading_int(raw: &str) -> Option<i64> {
    let s = raw.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }
    let magnitude: i64 = digits[..end].parse().ok()?;
    Some(if negative { -magnitude } else { magnitude })
}

#[cfg(test)]
#[path = "csv_test.rs"]
mod tests;
