use bigdecimal::{BigDecimal, Zero};
use uuid::Uuid;

use super::errors::DomainError;
use super::order::{Adjustment, AdjustmentKind, Order};

/// A discount code offered by an enterprise, worth a fixed `amount`.
#[derive(Debug, Clone, PartialEq)]
pub struct Voucher {
    pub id: Uuid,
    pub code: String,
    pub enterprise_id: Uuid,
    pub amount: BigDecimal,
}

impl Voucher {
    /// Discount this voucher grants on `order`: its amount, capped by the
    /// order's pre-discount total, as a negative value.
    pub fn compute_amount(&self, order: &Order) -> BigDecimal {
        let total = order.total().max(BigDecimal::zero());
        -(self.amount.clone().min(total))
    }

    /// Apply the voucher to `order` as an adjustment labelled with `code`.
    pub fn create_adjustment(&self, code: &str, order: &mut Order) -> Result<Uuid, DomainError> {
        if order.voucher_adjustment().is_some() {
            return Err(DomainError::InvalidInput(format!(
                "order {} already has a voucher",
                order.number
            )));
        }

        let adjustment = Adjustment::new(
            AdjustmentKind::Voucher,
            Some(self.id),
            code,
            self.compute_amount(order),
        );
        let id = adjustment.id;
        order.adjustments.push(adjustment);
        if !order.vouchers.iter().any(|v| v.id == self.id) {
            order.vouchers.push(self.clone());
        }
        Ok(id)
    }
}
