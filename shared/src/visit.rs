use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{FetchError, VisitError};

/// Identifier of a place on the map (ISO-style country code).
pub type PlaceId = String;

/// One visit event. The wire shape keeps the `country` key used by saved data.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VisitRecord {
    pub year: i32,
    #[serde(rename = "country")]
    pub place: PlaceId,
}

impl VisitRecord {
    pub fn new(year: i32, place: impl Into<PlaceId>) -> Self {
        Self {
            year,
            place: place.into(),
        }
    }
}

/// Check a place id and return it trimmed.
pub fn validate_place(place: &str) -> Result<&str, VisitError> {
    let place = place.trim();
    if place.is_empty() {
        return Err(VisitError::Validation("a place must be selected".into()));
    }
    Ok(place)
}

/// Parse the year selector's value. Blank means nothing was selected.
pub fn parse_year_input(raw: &str) -> Result<i32, VisitError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(VisitError::Validation("a year must be selected".into()));
    }
    raw.parse::<i32>()
        .map_err(|_| VisitError::Validation(format!("`{raw}` is not a whole year")))
}

/// Decode the persisted collection. Entries without an integral numeric
/// `year` and a non-empty string `country` are dropped; a non-array value
/// decodes to nothing.
pub fn decode_persisted(value: &Value) -> Vec<VisitRecord> {
    let Value::Array(items) = value else {
        return Vec::new();
    };
    items
        .iter()
        .filter_map(|item| {
            let year = integral_year(item.get("year")?)?;
            let place = place_field(item)?;
            Some(VisitRecord::new(year, place))
        })
        .collect()
}

/// Decode the bootstrap data set. `year` may be a number or a string with a
/// leading integer ("1999", " 2004 ", "2010-06").
pub fn decode_bootstrap(value: &Value) -> Result<Vec<VisitRecord>, FetchError> {
    let Value::Array(items) = value else {
        return Err(FetchError::Malformed("expected an array of visits".into()));
    };
    Ok(items
        .iter()
        .filter_map(|item| {
            let year = match item.get("year")? {
                Value::Number(n) => n
                    .as_i64()
                    .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64))
                    .and_then(|y| i32::try_from(y).ok())?,
                Value::String(s) => parse_leading_int(s)?,
                _ => return None,
            };
            let place = place_field(item)?;
            Some(VisitRecord::new(year, place))
        })
        .collect())
}

pub fn encode(records: &[VisitRecord]) -> Result<Value, serde_json::Error> {
    serde_json::to_value(records)
}

fn integral_year(value: &Value) -> Option<i32> {
    let Value::Number(n) = value else {
        return None;
    };
    let year = match n.as_i64() {
        Some(y) => y,
        None => {
            let f = n.as_f64()?;
            if !f.is_finite() || f.fract() != 0.0 {
                return None;
            }
            f as i64
        }
    };
    i32::try_from(year).ok()
}

fn place_field(item: &Value) -> Option<&str> {
    let place = item.get("country")?.as_str()?.trim();
    (!place.is_empty()).then_some(place)
}

/// Leading-integer parse: optional whitespace, optional sign, then digits.
/// Trailing garbage is ignored.
fn parse_leading_int(raw: &str) -> Option<i32> {
    let s = raw.trim_start();
    let (sign, rest) = match s.as_bytes().first()? {
        b'-' => (-1i64, &s[1..]),
        b'+' => (1, &s[1..]),
        _ => (1, s),
    };
    let digits_end = rest
        .bytes()
        .position(|b| !b.is_ascii_digit())
        .unwrap_or(rest.len());
    if digits_end == 0 {
        return None;
    }
    let magnitude: i64 = rest[..digits_end].parse().ok()?;
    i32::try_from(sign * magnitude).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn serializes_with_country_key() {
        let value = encode(&[VisitRecord::new(1999, "FR")]).unwrap();
        assert_eq!(value, json!([{ "year": 1999, "country": "FR" }]));
    }

    #[test]
    fn persisted_drops_malformed_entries() {
        let value = json!([
            { "year": 1999, "country": "FR" },
            { "year": "2001", "country": "DE" },
            { "year": 2002.5, "country": "IT" },
            { "year": 2003, "country": 7 },
            { "year": 2004, "country": "" },
            { "country": "ES" },
            null,
            { "year": 2005.0, "country": "JP" },
        ]);
        assert_eq!(
            decode_persisted(&value),
            vec![VisitRecord::new(1999, "FR"), VisitRecord::new(2005, "JP")]
        );
    }

    #[test]
    fn persisted_non_array_is_empty() {
        assert!(decode_persisted(&json!({ "year": 1999 })).is_empty());
        assert!(decode_persisted(&Value::Null).is_empty());
    }

    #[test]
    fn bootstrap_coerces_string_years() {
        let value = json!([
            { "year": "1999", "country": "FR" },
            { "year": " 2004 ", "country": "US" },
            { "year": "2010-06", "country": "BR" },
            { "year": 2011.9, "country": "CA" },
            { "year": "abc", "country": "XX" },
            { "year": true, "country": "YY" },
            { "year": 2012, "country": null },
        ]);
        assert_eq!(
            decode_bootstrap(&value).unwrap(),
            vec![
                VisitRecord::new(1999, "FR"),
                VisitRecord::new(2004, "US"),
                VisitRecord::new(2010, "BR"),
                VisitRecord::new(2011, "CA"),
            ]
        );
    }

    #[test]
    fn bootstrap_rejects_non_array() {
        assert!(matches!(
            decode_bootstrap(&json!({ "visits": [] })),
            Err(FetchError::Malformed(_))
        ));
    }

    #[test]
    fn leading_int_parse() {
        assert_eq!(parse_leading_int("42"), Some(42));
        assert_eq!(parse_leading_int("-7x"), Some(-7));
        assert_eq!(parse_leading_int("+"), None);
        assert_eq!(parse_leading_int(""), None);
        assert_eq!(parse_leading_int("99999999999"), None);
    }

    #[test]
    fn year_input_validation() {
        assert_eq!(parse_year_input("2001"), Ok(2001));
        assert!(matches!(parse_year_input(""), Err(VisitError::Validation(_))));
        assert!(matches!(
            parse_year_input("20.5"),
            Err(VisitError::Validation(_))
        ));
    }

    #[test]
    fn place_validation_trims() {
        assert_eq!(validate_place(" FR "), Ok("FR"));
        assert!(matches!(validate_place("  "), Err(VisitError::Validation(_))));
    }
}
