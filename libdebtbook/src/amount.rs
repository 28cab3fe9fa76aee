use anyhow::{anyhow, Result};
use rust_decimal::{prelude::ToPrimitive, Decimal, RoundingStrategy};

use std::str::FromStr;

/// Parse the decimal text matched by the `amount` rule. Anything beyond
/// `Decimal::MAX` is out of range.
pub fn parse_nominal(s: &str) -> Result<Decimal> {
    Decimal::from_str(s).map_err(|_| anyhow!(format!("amount out of range: '{}'", s)))
}

/// Stores keep amounts as floating point columns.
pub fn to_stored(nominal: Decimal) -> Result<f64> {
    nominal
        .to_f64()
        .ok_or(anyhow!(format!("amount not storable: '{}'", nominal)))
}

/// Read a stored amount back through its shortest decimal form, so `0.1`
/// comes back as exactly `0.1`.
pub fn from_stored(stored: f64) -> Result<Decimal> {
    if !stored.is_finite() {
        return Err(anyhow!(format!("amount out of range: '{}'", stored)));
    }
    Decimal::from_str(&stored.to_string())
        .map(|nominal| nominal.normalize())
        .map_err(|_| anyhow!(format!("amount out of range: '{}'", stored)))
}

pub fn to_cents(nominal: Decimal) -> Decimal {
    nominal.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

#[cfg(test)]
mod tests {
    use crate::amount::{from_stored, parse_nominal, to_cents, to_stored};

    use anyhow::Result;
    use rust_decimal_macros::dec;

    #[test]
    fn parse_integer_and_fraction() -> Result<()> {
        assert_eq!(parse_nominal("50")?, dec!(50));
        assert_eq!(parse_nominal("12.5")?, dec!(12.5));
        assert_eq!(parse_nominal("0")?, dec!(0));
        Ok(())
    }

    #[test]
    fn parse_up_to_decimal_max() -> Result<()> {
        let nines = "9".repeat(28);
        assert_eq!(parse_nominal(&nines)?.to_string(), nines);
        assert!(parse_nominal(&"9".repeat(29)).is_err());
        Ok(())
    }

    #[test]
    fn parse_overflowing_amount() {
        let huge = "9".repeat(400);
        assert_eq!(
            format!("{}", parse_nominal(&huge).unwrap_err()),
            format!("amount out of range: '{}'", huge)
        );
    }

    #[test]
    fn stored_amounts_come_back_exact() -> Result<()> {
        assert_eq!(from_stored(to_stored(dec!(0.1))?)?, dec!(0.1));
        assert_eq!(from_stored(to_stored(dec!(10000000.3))?)?, dec!(10000000.3));
        assert_eq!(from_stored(1e16)?, dec!(10000000000000000));
        assert_eq!(from_stored(12.50)?.to_string(), "12.5");
        assert!(from_stored(f64::INFINITY).is_err());
        assert!(from_stored(1e300).is_err());
        Ok(())
    }

    #[test]
    fn round_to_cents() {
        assert_eq!(to_cents(dec!(3.333)), dec!(3.33));
        assert_eq!(to_cents(dec!(0.005)), dec!(0.01));
        assert_eq!(to_cents(dec!(6)), dec!(6));
    }
}
