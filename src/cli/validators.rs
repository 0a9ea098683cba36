//! CLI argument validators.

use crate::constants::MAX_WORKERS;

/// Parse a chunk duration in seconds (finite, greater than zero).
pub fn parse_chunk_secs(s: &str) -> Result<f64, String> {
    let value: f64 = s
        .parse()
        .map_err(|_| format!("'{s}' is not a valid number"))?;

    if !value.is_finite() || value <= 0.0 {
        return Err(format!("chunk duration must be greater than 0, got {value}"));
    }

    Ok(value)
}

/// Parse a worker count in `1..=MAX_WORKERS`.
pub fn parse_workers(s: &str) -> Result<usize, String> {
    let value: usize = s
        .parse()
        .map_err(|_| format!("'{s}' is not a valid worker count"))?;

    if !(1..=MAX_WORKERS).contains(&value) {
        return Err(format!(
            "workers must be between 1 and {MAX_WORKERS}, got {value}"
        ));
    }

    Ok(value)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_chunk_secs_valid() {
        assert_eq!(parse_chunk_secs("300").ok(), Some(300.0));
        assert_eq!(parse_chunk_secs("0.5").ok(), Some(0.5));
    }

    #[test]
    fn test_parse_chunk_secs_invalid() {
        assert!(parse_chunk_secs("0").is_err());
        assert!(parse_chunk_secs("-1").is_err());
        assert!(parse_chunk_secs("inf").is_err());
        assert!(parse_chunk_secs("NaN").is_err());
        assert!(parse_chunk_secs("abc").unwrap_err().contains("not a valid number"));
    }

    #[test]
    fn test_parse_workers_bounds() {
        assert_eq!(parse_workers("1").ok(), Some(1));
        assert_eq!(parse_workers("32").ok(), Some(32));
        assert!(parse_workers("0").is_err());
        assert!(parse_workers("33").unwrap_err().contains("between 1 and 32"));
        assert!(parse_workers("-2").is_err());
    }
}
