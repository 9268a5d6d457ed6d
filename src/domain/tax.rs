use bigdecimal::{BigDecimal, One};
use uuid::Uuid;

use super::money::round_currency;

#[derive(Debug, Clone)]
pub struct TaxRate {
    pub id: Uuid,
    pub name: String,
    /// Fractional rate, e.g. `0.10` for 10%.
    pub amount: BigDecimal,
    pub included_in_price: bool,
}

impl TaxRate {
    /// Tax contained in, or added on top of, `taxable` under this rate.
    pub fn compute(&self, taxable: &BigDecimal) -> BigDecimal {
        if self.included_in_price {
            let divisor = BigDecimal::one() + &self.amount;
            let net = taxable / &divisor;
            round_currency(&(taxable - &net))
        } else {
            round_currency(&(taxable * &self.amount))
        }
    }
}
