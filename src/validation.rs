use chrono::NaiveDate;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Invalid date for {0}: {1}. Expected YYYY-MM-DD")]
    InvalidDate(&'static str, String),

    #[error("Invalid range: {0}")]
    InvalidRange(String),
}

/// Parse an optional `YYYY-MM-DD` query parameter; blank counts as absent.
pub fn validate_date(name: &'static str, value: Option<&str>) -> Result<Option<NaiveDate>, ValidationError> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(raw) => NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .map(Some)
            .map_err(|_| ValidationError::InvalidDate(name, raw.to_string())),
    }
}

pub fn validate_date_range(
    from: Option<&str>,
    to: Option<&str>,
) -> Result<(Option<NaiveDate>, Option<NaiveDate>), ValidationError> {
    let from = validate_date("from", from)?;
    let to = validate_date("to", to)?;

    if let (Some(from), Some(to)) = (from, to) {
        if from > to {
            return Err(ValidationError::InvalidRange(format!(
                "from ({}) must not be after to ({})",
                from, to
            )));
        }
    }

    Ok((from, to))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_and_missing_dates_are_unbounded() {
        assert_eq!(validate_date_range(None, Some("  ")).unwrap(), (None, None));
    }

    #[test]
    fn accepts_ordered_range() {
        let (from, to) = validate_date_range(Some("2014-04-18"), Some("2014-05-01")).unwrap();
        assert_eq!(from, NaiveDate::from_ymd_opt(2014, 4, 18));
        assert_eq!(to, NaiveDate::from_ymd_opt(2014, 5, 1));
    }

    #[test]
    fn rejects_malformed_and_reversed_ranges() {
        assert!(matches!(
            validate_date_range(Some("18/04/2014"), None),
            Err(ValidationError::InvalidDate("from", _))
        ));
        assert!(matches!(
            validate_date_range(Some("2014-05-02"), Some("2014-05-01")),
            Err(ValidationError::InvalidRange(_))
        ));
    }
}
