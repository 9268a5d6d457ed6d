use bigdecimal::{BigDecimal, RoundingMode};

/// Number of decimal places kept for stored monetary values.
pub const CURRENCY_SCALE: i64 = 2;

/// Round to currency precision, half away from zero (`-0.625` becomes `-0.63`).
pub fn round_currency(value: &BigDecimal) -> BigDecimal {
    value.with_scale_round(CURRENCY_SCALE, RoundingMode::HalfUp)
}
