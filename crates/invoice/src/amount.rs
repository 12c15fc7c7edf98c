use std::sync::LazyLock;

use regex::Regex;

static NUMERIC_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[+-]?(?:\d+\.?\d*|\.\d+)(?:[eE][+-]?\d+)?")
        .expect("numeric prefix pattern is a valid regex")
});

/// Reads the leading number of a form field value.
///
/// Leading whitespace is skipped and trailing garbage ignored (`"12kg"` is 12).
/// A comma is accepted as the decimal separator. Anything that does not start
/// with a number, or overflows, reads as 0.
pub fn parse_amount(raw: &str) -> f64 {
    let normalized = raw.trim_start().replacen(',', ".", 1);
    NUMERIC_PREFIX
        .find(&normalized)
        .and_then(|found| found.as_str().parse::<f64>().ok())
        .filter(|value| value.is_finite())
        .unwrap_or(0.0)
}

/// Two-decimal rendering used for row totals (`"20.00"`).
///
/// Exact half-cent ties round away from zero like the browser's `toFixed(2)`;
/// `{:.2}` alone rounds them to even.
pub fn format_amount(value: f64) -> String {
    let value = round_half_cent_tie(value);
    // Avoid printing "-0.00" for values that round to zero.
    let value = if (value * 100.0).round() == 0.0 { 0.0 } else { value };
    format!("{value:.2}")
}

/// Resolves a value lying exactly on a half cent; anything else is returned as is.
fn round_half_cent_tie(value: f64) -> f64 {
    let doubled_cents = value * 200.0;
    // The fused residual is zero only when the product was computed exactly.
    let exact = value.mul_add(200.0, -doubled_cents) == 0.0;
    if exact && doubled_cents.fract() == 0.0 && doubled_cents % 2.0 != 0.0 {
        (doubled_cents / 2.0).round() / 100.0
    } else {
        value
    }
}

/// Summary cell rendering (`"25.00 €"`).
pub fn format_euros(value: f64) -> String {
    format!("{} €", format_amount(value))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::LineItem;

    #[test]
    fn parses_like_a_browser_number_field() {
        assert_eq!(parse_amount("2"), 2.0);
        assert_eq!(parse_amount(" 10.5"), 10.5);
        assert_eq!(parse_amount("3.75€"), 3.75);
        assert_eq!(parse_amount(".5"), 0.5);
        assert_eq!(parse_amount("-4"), -4.0);
        assert_eq!(parse_amount("1e2"), 100.0);
    }

    #[test]
    fn comma_is_a_decimal_separator() {
        assert_eq!(parse_amount("12,5"), 12.5);
    }

    #[test]
    fn unreadable_input_is_zero() {
        assert_eq!(parse_amount(""), 0.0);
        assert_eq!(parse_amount("abc"), 0.0);
        assert_eq!(parse_amount("-"), 0.0);
        assert_eq!(parse_amount("1e999"), 0.0);
    }

    #[test]
    fn half_cent_ties_round_away_from_zero() {
        assert_eq!(format_amount(18.125), "18.13");
        assert_eq!(format_amount(0.125), "0.13");
        assert_eq!(format_amount(-18.125), "-18.13");
        assert_eq!(format_amount(LineItem::new(1.25, 14.5).line_total()), "18.13");
    }

    #[test]
    fn values_just_below_a_tie_round_down() {
        // 1.005 and 2.675 are stored slightly below the half cent.
        assert_eq!(format_amount(1.005), "1.00");
        assert_eq!(format_amount(2.675), "2.67");
    }

    #[test]
    fn formats_two_decimals_with_currency() {
        assert_eq!(format_amount(20.0), "20.00");
        assert_eq!(format_amount(-0.001), "0.00");
        assert_eq!(format_euros(25.0), "25.00 €");
        assert_eq!(format_euros(1234.5), "1234.50 €");
    }
}
