use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};

// Decimal's own is_sign_positive does no zero check, which gets weird
// around "-0"; this is positive as in "strictly greater than zero".
pub fn is_positive(d: &Decimal) -> bool {
    d.is_sign_positive() && !d.is_zero()
}

/// Parses a German/Italian-formatted currency amount, like "1.234,56 €".
/// The currency sign, any whitespace (incl. non-breaking spaces) and `.`
/// thousands separators are stripped; `,` is the decimal separator.
/// Returns None if nothing parseable remains.
pub fn parse_eur_decimal_opt(text: &str) -> Option<Decimal> {
    let cleaned: String = text
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '€' && *c != '.')
        .map(|c| if c == ',' { '.' } else { c })
        .collect();
    if cleaned.is_empty() {
        return None;
    }
    Decimal::from_str(&cleaned).ok()
}

/// Lenient variant of parse_eur_decimal_opt. Unparseable input resolves to
/// zero, so rows with garbled or absent amounts still flow through instead
/// of aborting a whole statement.
pub fn parse_eur_decimal(text: &str) -> Decimal {
    parse_eur_decimal_opt(text).unwrap_or(Decimal::ZERO)
}

pub fn round_cents(d: &Decimal) -> Decimal {
    d.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Renders a Decimal in German convention with two decimal places:
/// `.` groups thousands, `,` separates decimals. No currency sign.
pub fn format_eur(d: &Decimal) -> String {
    let plain = format!("{:.2}", round_cents(d));
    let (sign, unsigned) = match plain.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", plain.as_str()),
    };
    // Guaranteed by the {:.2} format above
    let (int_part, frac_part) = unsigned.split_once('.').unwrap();

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, c) in int_part.chars().enumerate() {
        let rem = int_part.len() - i;
        if i > 0 && rem % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(c);
    }
    format!("{sign}{grouped},{frac_part}")
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    use super::{format_eur, parse_eur_decimal, parse_eur_decimal_opt, round_cents};

    #[test]
    fn test_parse_eur_decimal() {
        assert_eq!(parse_eur_decimal("1.234,56"), dec!(1234.56));
        assert_eq!(parse_eur_decimal("1.234,56 €"), dec!(1234.56));
        assert_eq!(parse_eur_decimal("-12,50"), dec!(-12.50));
        assert_eq!(parse_eur_decimal("0,01"), dec!(0.01));
        // Non-breaking and narrow non-breaking spaces show up in some
        // statement renderings.
        assert_eq!(parse_eur_decimal("1\u{00a0}234,00"), dec!(1234));
        assert_eq!(parse_eur_decimal("1\u{202f}234,00"), dec!(1234));
        // Never fails
        assert_eq!(parse_eur_decimal(""), Decimal::ZERO);
        assert_eq!(parse_eur_decimal("abc"), Decimal::ZERO);
        assert_eq!(parse_eur_decimal("  "), Decimal::ZERO);
    }

    #[test]
    fn test_parse_eur_decimal_opt() {
        assert_eq!(parse_eur_decimal_opt("100,00"), Some(dec!(100)));
        assert_eq!(parse_eur_decimal_opt(""), None);
        assert_eq!(parse_eur_decimal_opt("n/a"), None);
    }

    #[test]
    fn test_round_cents() {
        assert_eq!(round_cents(&dec!(1.005)), dec!(1.01));
        assert_eq!(round_cents(&dec!(-1.005)), dec!(-1.01));
        assert_eq!(round_cents(&dec!(2)), dec!(2.00));
    }

    #[test]
    fn test_format_eur() {
        assert_eq!(format_eur(&dec!(1234.56)), "1.234,56");
        assert_eq!(format_eur(&dec!(1234567.8)), "1.234.567,80");
        assert_eq!(format_eur(&dec!(-950)), "-950,00");
        assert_eq!(format_eur(&dec!(0)), "0,00");
        assert_eq!(format_eur(&dec!(999)), "999,00");
        assert_eq!(format_eur(&dec!(1000)), "1.000,00");
    }
}
