use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("Invalid --set format: '{0}'. Expected KEY=VALUE.")]
    InvalidAssignment(String),

    #[error("Invalid {expected} value for '{key}': '{value}'")]
    InvalidValue {
        key: String,
        value: String,
        expected: &'static str,
    },

    #[error("Invalid range for '{key}': '{value}'. Expected 'LOW,HIGH' (e.g., '-1.0,1.0').")]
    InvalidRange { key: String, value: String },
}

/// Splits `key=value` at the first `=`. Surrounding whitespace is trimmed from both sides.
pub fn parse_assignment(pair: &str) -> Result<(&str, &str), ParseError> {
    let (key, value) = pair
        .split_once('=')
        .ok_or_else(|| ParseError::InvalidAssignment(pair.to_string()))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(ParseError::InvalidAssignment(pair.to_string()));
    }
    Ok((key, value.trim()))
}

pub fn parse_value<T: FromStr>(
    key: &str,
    value: &str,
    expected: &'static str,
) -> Result<T, ParseError> {
    value.parse().map_err(|_| ParseError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
        expected,
    })
}

/// Parses `LOW,HIGH`, optionally wrapped in square brackets as TOML writes arrays.
pub fn parse_range(key: &str, value: &str) -> Result<(f64, f64), ParseError> {
    let invalid = || ParseError::InvalidRange {
        key: key.to_string(),
        value: value.to_string(),
    };
    let inner = value
        .trim()
        .trim_start_matches('[')
        .trim_end_matches(']');
    let (lo, hi) = inner.split_once(',').ok_or_else(invalid)?;
    let lo = lo.trim().parse().map_err(|_| invalid())?;
    let hi = hi.trim().parse().map_err(|_| invalid())?;
    Ok((lo, hi))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assignment_splits_at_first_equals_sign() {
        assert_eq!(
            parse_assignment("run.num-steps=500"),
            Ok(("run.num-steps", "500"))
        );
        assert_eq!(parse_assignment(" a = b=c "), Ok(("a", "b=c")));
    }

    #[test]
    fn assignment_without_key_or_equals_is_rejected() {
        assert!(matches!(
            parse_assignment("run.num-steps"),
            Err(ParseError::InvalidAssignment(_))
        ));
        assert!(matches!(
            parse_assignment("=5"),
            Err(ParseError::InvalidAssignment(_))
        ));
    }

    #[test]
    fn value_parsing_reports_key_and_expected_type() {
        assert_eq!(parse_value::<u64>("run.num-steps", "42", "integer"), Ok(42));
        let err = parse_value::<f64>("integrator.friction", "fast", "float").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid float value for 'integrator.friction': 'fast'"
        );
    }

    #[test]
    fn range_accepts_plain_and_bracketed_forms() {
        assert_eq!(parse_range("initial.x-range", "-1,1"), Ok((-1.0, 1.0)));
        assert_eq!(
            parse_range("initial.y-range", "[-0.5, 0.5]"),
            Ok((-0.5, 0.5))
        );
        assert!(parse_range("initial.x-range", "1.0").is_err());
        assert!(parse_range("initial.x-range", "a,b").is_err());
    }
}
