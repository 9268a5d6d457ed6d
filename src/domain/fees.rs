use std::fmt;
use std::str::FromStr;

use bigdecimal::BigDecimal;
use uuid::Uuid;

use super::errors::DomainError;
use super::money::round_currency;
use super::order::Order;

/// How an enterprise fee turns an order into a charge.
#[derive(Debug, Clone, PartialEq)]
pub enum FeeCalculator {
    FlatRate { amount: BigDecimal },
    /// `percent` is a whole percentage, e.g. `5` for 5% of the item total.
    FlatPercentItemTotal { percent: BigDecimal },
    PerItem { amount: BigDecimal },
}

impl FeeCalculator {
    pub fn compute(&self, order: &Order) -> BigDecimal {
        let raw = match self {
            FeeCalculator::FlatRate { amount } => amount.clone(),
            FeeCalculator::FlatPercentItemTotal { percent } => {
                &order.item_total * percent / &BigDecimal::from(100)
            }
            FeeCalculator::PerItem { amount } => {
                let quantity: i64 = order.line_items.iter().map(|li| i64::from(li.quantity)).sum();
                amount * &BigDecimal::from(quantity)
            }
        };
        round_currency(&raw)
    }

    /// Storage form: `(calculator_type, calculator_amount)`.
    pub fn to_parts(&self) -> (CalculatorType, BigDecimal) {
        match self {
            FeeCalculator::FlatRate { amount } => (CalculatorType::FlatRate, amount.clone()),
            FeeCalculator::FlatPercentItemTotal { percent } => {
                (CalculatorType::FlatPercentItemTotal, percent.clone())
            }
            FeeCalculator::PerItem { amount } => (CalculatorType::PerItem, amount.clone()),
        }
    }

    pub fn from_parts(kind: CalculatorType, amount: BigDecimal) -> Self {
        match kind {
            CalculatorType::FlatRate => FeeCalculator::FlatRate { amount },
            CalculatorType::FlatPercentItemTotal => {
                FeeCalculator::FlatPercentItemTotal { percent: amount }
            }
            CalculatorType::PerItem => FeeCalculator::PerItem { amount },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalculatorType {
    FlatRate,
    FlatPercentItemTotal,
    PerItem,
}

impl CalculatorType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CalculatorType::FlatRate => "flat_rate",
            CalculatorType::FlatPercentItemTotal => "flat_percent_item_total",
            CalculatorType::PerItem => "per_item",
        }
    }
}

impl fmt::Display for CalculatorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CalculatorType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "flat_rate" => Ok(CalculatorType::FlatRate),
            "flat_percent_item_total" => Ok(CalculatorType::FlatPercentItemTotal),
            "per_item" => Ok(CalculatorType::PerItem),
            other => Err(DomainError::Internal(format!(
                "unknown calculator type '{}'",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct EnterpriseFee {
    pub id: Uuid,
    pub enterprise_id: Uuid,
    pub name: String,
    pub calculator: FeeCalculator,
}
