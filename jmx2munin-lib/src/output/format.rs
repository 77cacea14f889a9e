use crate::registry::Number;

/// The Munin token for a value that is unknown or could not be resolved.
pub const UNKNOWN: &str = "U";

/// Format a number for a `.value` line.
///
/// Integers print exactly. Floats are rounded to at most two fraction digits, with trailing
/// zeros and a dangling `.` removed. NaN and infinities print as [`UNKNOWN`].
#[must_use]
pub fn format_number(value: Number) -> String {
    match value {
        _ if value.is_unknown() => UNKNOWN.to_string(),
        Number::Integer(i) => i.to_string(),
        Number::Float(f) => {
            let mut s = format!("{f:.2}");
            while s.ends_with('0') {
                let _ = s.pop();
            }
            if s.ends_with('.') {
                let _ = s.pop();
            }
            if s == "-0" {
                return "0".to_string();
            }
            s
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn float(f: f64) -> String {
        format_number(Number::Float(f))
    }

    #[test]
    fn test_integers_are_exact() {
        assert_eq!(format_number(Number::Integer(0)), "0");
        assert_eq!(format_number(Number::Integer(1_234_567)), "1234567");
        assert_eq!(format_number(Number::Integer(i64::MIN)), "-9223372036854775808");
    }

    #[test]
    fn test_two_fraction_digits() {
        assert_eq!(float(0.957), "0.96");
        assert_eq!(float(12.3456), "12.35");
        assert_eq!(float(-1.234), "-1.23");
    }

    #[test]
    fn test_trailing_zeros_removed() {
        assert_eq!(float(0.5), "0.5");
        assert_eq!(float(3.0), "3");
        assert_eq!(float(0.999), "1");
        assert_eq!(float(1_000_000.0), "1000000");
    }

    #[test]
    fn test_negative_zero() {
        assert_eq!(float(-0.0), "0");
        assert_eq!(float(-0.001), "0");
    }

    #[test]
    fn test_non_finite_is_unknown() {
        assert_eq!(float(f64::NAN), UNKNOWN);
        assert_eq!(float(f64::INFINITY), UNKNOWN);
        assert_eq!(float(f64::NEG_INFINITY), UNKNOWN);
    }
}
