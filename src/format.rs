/// Unit labels tried in order before falling through to millions.
const UNITS: [&str; 2] = ["", "mil"];
const MILLIONS: &str = "milhões";

/// Renders a magnitude on a human scale with two decimals.
///
/// | Value              | Output            |
/// |--------------------|-------------------|
/// | < 1 000            | `999.00`          |
/// | < 1 000 000        | `1.50 mil`        |
/// | >= 1 000 000       | `2.00 milhões`    |
///
/// A non-empty `prefix` (e.g. `"R$"`) is placed in front, separated by a space.
/// There is no unit beyond millions.
pub fn format_number(value: f64, prefix: &str) -> String {
    let mut scaled = value;
    for unit in UNITS {
        if scaled < 1000.0 {
            return join(prefix, scaled, unit);
        }
        scaled /= 1000.0;
    }
    join(prefix, scaled, MILLIONS)
}

fn join(prefix: &str, value: f64, unit: &str) -> String {
    let number = format!("{value:.2}");
    [prefix, number.as_str(), unit]
        .into_iter()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_boundaries() {
        assert_eq!(format_number(0.0, ""), "0.00");
        assert_eq!(format_number(999.0, ""), "999.00");
        assert_eq!(format_number(1000.0, ""), "1.00 mil");
        assert_eq!(format_number(999_999.0, ""), "1000.00 mil");
        assert_eq!(format_number(1_000_000.0, ""), "1.00 milhões");
    }

    #[test]
    fn test_format_no_unit_beyond_millions() {
        assert_eq!(format_number(5_000_000_000.0, ""), "5000.00 milhões");
    }

    #[test]
    fn test_format_with_prefix() {
        assert_eq!(format_number(1500.0, "R$"), "R$ 1.50 mil");
        assert_eq!(format_number(12.346, "R$"), "R$ 12.35");
    }
}
