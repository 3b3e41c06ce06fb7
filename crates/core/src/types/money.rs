//! Monetary-string parsing.
//!
//! WooCommerce transmits every monetary amount as a decimal string
//! (`"19.99"`). The mirror keeps the original string verbatim and derives a
//! `Decimal` alongside it so the database can sort and compare numerically.

use rust_decimal::Decimal;

/// Parse a WooCommerce monetary string into a [`Decimal`].
///
/// The derived amount exists for numeric sorting, so an unparsable string
/// degrades to zero rather than poisoning the whole order record. The
/// original string is stored unmodified either way.
#[must_use]
pub fn parse_total(total: &str) -> Decimal {
    total.trim().parse().unwrap_or(Decimal::ZERO)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_total() {
        assert_eq!(parse_total("19.99"), Decimal::new(1999, 2));
        assert_eq!(parse_total("0"), Decimal::ZERO);
        assert_eq!(parse_total(" 120.50 "), Decimal::new(12050, 2));
    }

    #[test]
    fn test_parse_total_garbage_is_zero() {
        assert_eq!(parse_total(""), Decimal::ZERO);
        assert_eq!(parse_total("free"), Decimal::ZERO);
    }

    #[test]
    fn test_parse_total_negative() {
        assert_eq!(parse_total("-5.00"), Decimal::new(-500, 2));
    }
}
