//! Currency display for subunit amounts.

use rust_decimal::Decimal;

/// Formats an amount in subunits (hundredths) as a currency string, e.g.
/// `123_456` NGN becomes `"₦1,234.56"`.
///
/// Known ISO codes get their symbol; anything else is prefixed with the
/// upper-cased code and a space (`"KES 1,234.56"`). Negative amounts carry a
/// leading minus before the symbol.
#[must_use]
pub fn format_subunits(subunits: i64, currency: &str) -> String {
    let amount = Decimal::new(subunits, 2);
    let sign = if amount.is_sign_negative() { "-" } else { "" };
    let rendered = format!("{:.2}", amount.abs());
    let (whole, fraction) = rendered.split_once('.').unwrap_or((rendered.as_str(), "00"));

    let code = currency.trim().to_uppercase();
    let prefix = match symbol_for(&code) {
        Some(symbol) => symbol.to_string(),
        None => format!("{code} "),
    };

    format!("{sign}{prefix}{}.{fraction}", group_thousands(whole))
}

fn symbol_for(code: &str) -> Option<&'static str> {
    match code {
        "NGN" => Some("₦"),
        "USD" => Some("$"),
        "GHS" => Some("GH₵"),
        "ZAR" => Some("R"),
        "GBP" => Some("£"),
        "EUR" => Some("€"),
        _ => None,
    }
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_naira_with_grouping() {
        assert_eq!(format_subunits(123_456, "NGN"), "₦1,234.56");
    }

    #[test]
    fn formats_zero() {
        assert_eq!(format_subunits(0, "NGN"), "₦0.00");
    }

    #[test]
    fn formats_small_amounts_with_padding() {
        assert_eq!(format_subunits(5, "USD"), "$0.05");
    }

    #[test]
    fn formats_millions() {
        assert_eq!(format_subunits(123_456_789, "USD"), "$1,234,567.89");
    }

    #[test]
    fn lowercase_code_is_recognised() {
        assert_eq!(format_subunits(250_000, "ngn"), "₦2,500.00");
    }

    #[test]
    fn unknown_code_is_prefixed() {
        assert_eq!(format_subunits(100_000, "kes"), "KES 1,000.00");
    }

    #[test]
    fn negative_amounts_keep_sign_before_symbol() {
        assert_eq!(format_subunits(-150, "GBP"), "-£1.50");
    }

    #[test]
    fn group_thousands_boundaries() {
        assert_eq!(group_thousands("1"), "1");
        assert_eq!(group_thousands("123"), "123");
        assert_eq!(group_thousands("1234"), "1,234");
        assert_eq!(group_thousands("123456"), "123,456");
    }
}
