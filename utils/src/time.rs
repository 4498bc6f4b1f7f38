//! Duration formatting and parsing for configuration and logs.

const MINUTE: u64 = 60;
const HOUR: u64 = 60 * MINUTE;
const DAY: u64 = 24 * HOUR;

/// Format seconds as the two most significant units, e.g. `5d 0h`.
pub fn format_duration(secs: u64) -> String {
    if secs < MINUTE {
        format!("{secs}s")
    } else if secs < HOUR {
        format!("{}m {}s", secs / MINUTE, secs % MINUTE)
    } else if secs < DAY {
        format!("{}h {}m", secs / HOUR, (secs % HOUR) / MINUTE)
    } else {
        format!("{}d {}h", secs / DAY, (secs % DAY) / HOUR)
    }
}

/// Parse `90`, `90s`, `15m`, `6h` or `5d` into seconds.
pub fn parse_duration(input: &str) -> Option<u64> {
    let input = input.trim();
    let (digits, unit) = match input.find(|c: char| !c.is_ascii_digit()) {
        Some(i) => input.split_at(i),
        None => (input, "s"),
    };
    let value: u64 = digits.parse().ok()?;
    let scale = match unit {
        "s" => 1,
        "m" => MINUTE,
        "h" => HOUR,
        "d" => DAY,
        _ => return None,
    };
    value.checked_mul(scale)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats() {
        assert_eq!(format_duration(42), "42s");
        assert_eq!(format_duration(125), "2m 5s");
        assert_eq!(format_duration(5 * DAY), "5d 0h");
    }

    #[test]
    fn parses() {
        assert_eq!(parse_duration("30"), Some(30));
        assert_eq!(parse_duration("15m"), Some(900));
        assert_eq!(parse_duration("14d"), Some(14 * DAY));
        assert_eq!(parse_duration("3w"), None);
        assert_eq!(parse_duration("m"), None);
    }
}
