//! Parsing of human-readable durations such as `3m`, `250ms` or `1m30s`.

use std::time::Duration;

/// Parse a duration made of one or more `<number><unit>` segments.
///
/// Supported units are `ms`, `s`, `m` and `h`. Segments add up, so `1h30m`
/// is ninety minutes.
///
/// # Examples
///
/// ```rust
/// use config_reloader::duration::parse_duration;
/// use std::time::Duration;
///
/// assert_eq!(parse_duration("3m").unwrap(), Duration::from_secs(180));
/// assert_eq!(parse_duration("1m30s").unwrap(), Duration::from_secs(90));
/// ```
pub fn parse_duration(s: &str) -> Result<Duration, String> {
    let s = s.trim();
    if s.is_empty() {
        return Err("empty duration string".to_string());
    }

    let mut total = Duration::ZERO;
    let mut rest = s;
    while !rest.is_empty() {
        let digits = rest
            .find(|c: char| !c.is_ascii_digit())
            .ok_or_else(|| format!("duration '{}' is missing a unit suffix", s))?;
        if digits == 0 {
            return Err(format!("invalid duration '{}': expected a number", s));
        }

        let (num_part, tail) = rest.split_at(digits);
        let value: u64 = num_part
            .parse()
            .map_err(|e| format!("invalid duration number '{}': {}", num_part, e))?;

        let unit_len = tail
            .find(|c: char| c.is_ascii_digit())
            .unwrap_or(tail.len());
        let (unit, next) = tail.split_at(unit_len);

        let segment = match unit {
            "ms" => Duration::from_millis(value),
            "s" => Duration::from_secs(value),
            "m" => Duration::from_secs(value.saturating_mul(60)),
            "h" => Duration::from_secs(value.saturating_mul(60 * 60)),
            _ => {
                return Err(format!(
                    "unsupported duration unit '{}'; expected ms, s, m, or h",
                    unit
                ));
            }
        };

        total = total.saturating_add(segment);
        rest = next;
    }

    Ok(total)
}
