//! Number formatting for stat display.

/// Format a statistic with at most two fraction digits and no thousands
/// separators. Trailing zeros (and a bare trailing dot) are trimmed, so
/// `4.5` stays `4.5` and `12.0` becomes `12`.
pub fn format_stat(value: f64) -> String {
    let rounded = format!("{value:.2}");
    let trimmed = rounded.trim_end_matches('0').trim_end_matches('.');
    if trimmed.is_empty() || trimmed == "-0" {
        "0".to_owned()
    } else {
        trimmed.to_owned()
    }
}

/// Format a round-result score, zero-padded to at least two characters
/// (`3` renders as `03` in the result matrix).
pub fn pad_score(value: f64) -> String {
    let s = format_stat(value);
    if s.len() < 2 { format!("0{s}") } else { s }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_significant_fraction_digits() {
        assert_eq!(format_stat(4.5), "4.5");
        assert_eq!(format_stat(4.567), "4.57");
        assert_eq!(format_stat(0.25), "0.25");
    }

    #[test]
    fn trims_trailing_zeros_and_dot() {
        assert_eq!(format_stat(12.0), "12");
        assert_eq!(format_stat(3.10), "3.1");
    }

    #[test]
    fn no_thousands_separators() {
        assert_eq!(format_stat(1234.5), "1234.5");
        assert_eq!(format_stat(1_000_000.0), "1000000");
    }

    #[test]
    fn negative_zero_collapses() {
        assert_eq!(format_stat(-0.001), "0");
        assert_eq!(format_stat(0.0), "0");
    }

    #[test]
    fn scores_pad_to_two_chars() {
        assert_eq!(pad_score(3.0), "03");
        assert_eq!(pad_score(12.0), "12");
        assert_eq!(pad_score(4.5), "4.5");
        assert_eq!(pad_score(0.0), "00");
    }
}
