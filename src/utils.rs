/// Compact rendering for large counts: 1.2M, 3.4K; small values pass
/// through unchanged.
pub fn format_large_number(value: i64) -> String {
    if value >= 1_000_000 {
        format!("{:.1}M", value as f64 / 1_000_000.0)
    } else if value >= 1_000 {
        format!("{:.1}K", value as f64 / 1_000.0)
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_millions_and_thousands() {
        assert_eq!(format_large_number(2_500_000), "2.5M");
        assert_eq!(format_large_number(1_000_000), "1.0M");
        assert_eq!(format_large_number(12_300), "12.3K");
        assert_eq!(format_large_number(1_000), "1.0K");
    }

    #[test]
    fn small_and_negative_values_pass_through() {
        assert_eq!(format_large_number(999), "999");
        assert_eq!(format_large_number(0), "0");
        assert_eq!(format_large_number(-1500), "-1500");
    }
}
