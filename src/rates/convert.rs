//! Pure currency conversion over a rate table.

use crate::rates::models::RateTable;

/// Converts an amount between two currencies using the table's base as the
/// pivot.
///
/// Missing rate entries default the multiplier to 1.0. That is a lossy
/// fallback carried over deliberately: an unknown currency passes through
/// at face value instead of failing the whole computation.
pub fn convert(amount: f64, from: &str, to: &str, table: &RateTable) -> f64 {
    if from == to {
        return amount;
    }

    if table.base == from {
        return amount * table.rate(to).unwrap_or(1.0);
    }

    let from_rate = table.rate(from).unwrap_or(1.0);
    let to_rate = table.rate(to).unwrap_or(1.0);

    (amount / from_rate) * to_rate
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rates::models::RateOrigin;
    use std::collections::HashMap;

    fn usd_table() -> RateTable {
        let rates = HashMap::from([
            ("EUR".to_string(), 0.85),
            ("GBP".to_string(), 0.73),
            ("INR".to_string(), 83.0),
        ]);
        RateTable::new("USD", rates, RateOrigin::BuiltIn)
    }

    #[test]
    fn test_identity() {
        let table = usd_table();
        assert_eq!(convert(15.99, "USD", "USD", &table), 15.99);
        assert_eq!(convert(100.0, "EUR", "EUR", &table), 100.0);
        // Identity needs no table entry at all
        assert_eq!(convert(5.0, "XYZ", "XYZ", &table), 5.0);
    }

    #[test]
    fn test_from_base() {
        let table = usd_table();
        assert!((convert(15.99, "USD", "INR", &table) - 1327.17).abs() < 1e-9);
        assert!((convert(10.0, "USD", "EUR", &table) - 8.5).abs() < 1e-9);
    }

    #[test]
    fn test_cross_rate() {
        let table = usd_table();
        // EUR -> GBP via USD: (10 / 0.85) * 0.73
        let got = convert(10.0, "EUR", "GBP", &table);
        assert!((got - 10.0 / 0.85 * 0.73).abs() < 1e-9);
    }

    #[test]
    fn test_to_base_cross() {
        let table = usd_table();
        // EUR -> USD: (10 / 0.85) * 1
        let got = convert(10.0, "EUR", "USD", &table);
        assert!((got - 10.0 / 0.85).abs() < 1e-9);
    }

    #[test]
    fn test_round_trip() {
        let table = usd_table();
        let there = convert(15.99, "USD", "INR", &table);
        let back = convert(there, "INR", "USD", &table);
        assert!((back - 15.99).abs() < 1e-9);

        let there = convert(42.0, "EUR", "GBP", &table);
        let back = convert(there, "GBP", "EUR", &table);
        assert!((back - 42.0).abs() < 1e-9);
    }

    #[test]
    fn test_missing_rate_defaults_to_one() {
        let table = usd_table();
        // Unknown target passes through at face value
        assert_eq!(convert(12.0, "USD", "XYZ", &table), 12.0);
        // Unknown source treated as 1: (12 / 1) * 0.85
        assert!((convert(12.0, "XYZ", "EUR", &table) - 10.2).abs() < 1e-9);
    }
}
