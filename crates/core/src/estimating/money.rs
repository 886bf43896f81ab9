use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Serialize, Serializer};

/// Rounds to cents (midpoint away from zero) and pins the scale so `8500` renders as `8500.00`.
pub fn round_currency(value: Decimal) -> Decimal {
    let mut rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(2);
    rounded
}

pub(crate) fn serialize_currency<S>(value: &Decimal, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    Serialize::serialize(&round_currency(*value), serializer)
}

/// Renders a fraction such as `0.10` as `"10%"`.
pub(crate) fn serialize_percent<S>(value: &Decimal, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    let points = (*value * Decimal::ONE_HUNDRED).normalize();
    serializer.serialize_str(&format!("{points}%"))
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::round_currency;

    #[test]
    fn whole_amounts_gain_two_decimal_places() {
        assert_eq!(round_currency(Decimal::from(8500)).to_string(), "8500.00");
    }

    #[test]
    fn midpoints_round_away_from_zero() {
        assert_eq!(round_currency(Decimal::new(10005, 3)).to_string(), "10.01");
        assert_eq!(round_currency(Decimal::new(-10005, 3)).to_string(), "-10.01");
    }

    #[test]
    fn extra_precision_is_dropped() {
        assert_eq!(round_currency(Decimal::new(1912499, 3)).to_string(), "1912.50");
    }
}
