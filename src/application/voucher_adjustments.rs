use bigdecimal::{BigDecimal, Zero};

use crate::domain::money::round_currency;
use crate::domain::order::{Adjustment, AdjustmentKind, Order};

/// Keeps an order's voucher adjustments in proportion to its current totals.
///
/// Call [`calculate`](Self::calculate) after anything that changes the order's
/// totals (tax, shipping, fees). Repeated calls on an unchanged order leave the
/// stored values untouched.
pub struct VoucherAdjustmentsService<'a> {
    order: Option<&'a mut Order>,
}

impl<'a> VoucherAdjustmentsService<'a> {
    pub fn new(order: Option<&'a mut Order>) -> Self {
        Self { order }
    }

    pub fn calculate(self) {
        let Some(order) = self.order else {
            return;
        };
        let Some(voucher) = order.applied_voucher().cloned() else {
            return;
        };

        let amount = voucher.compute_amount(order);
        let total = order.total();
        let voucher_rate = if total.is_zero() {
            BigDecimal::zero()
        } else {
            &amount / &total
        };

        log::debug!(
            "recalculating voucher {} on order {} (rate {})",
            voucher.code,
            order.number,
            voucher_rate
        );

        if order.additional_tax_total > BigDecimal::zero() {
            handle_tax_excluded_from_price(order, &voucher_rate);
            return;
        }

        // Tax on the discount is only split out when prices exclude tax.
        order
            .adjustments
            .retain(|a| a.kind != AdjustmentKind::VoucherTax);
        if order.included_tax_total > BigDecimal::zero() {
            handle_tax_included_in_price(order, amount, &voucher_rate);
        } else if let Some(adjustment) = order.voucher_adjustment_mut() {
            adjustment.amount = amount;
            adjustment.included_tax = BigDecimal::zero();
        }
    }
}

fn handle_tax_excluded_from_price(order: &mut Order, voucher_rate: &BigDecimal) {
    let total = order.total();
    let tax_amount = round_currency(&(voucher_rate * &order.additional_tax_total));
    let amount = round_currency(&(voucher_rate * &(&total - &order.additional_tax_total)));

    let Some(adjustment) = order.voucher_adjustment_mut() else {
        return;
    };
    adjustment.amount = amount;
    adjustment.included_tax = BigDecimal::zero();
    let originator_id = adjustment.originator_id;
    let label = format!("Tax {}", adjustment.label);

    match order.voucher_tax_adjustment_mut() {
        Some(tax_adjustment) => tax_adjustment.amount = tax_amount,
        None => order.adjustments.push(Adjustment::new(
            AdjustmentKind::VoucherTax,
            originator_id,
            label,
            tax_amount,
        )),
    }
}

fn handle_tax_included_in_price(order: &mut Order, amount: BigDecimal, voucher_rate: &BigDecimal) {
    let included_tax = round_currency(&(voucher_rate * &order.included_tax_total));

    if let Some(adjustment) = order.voucher_adjustment_mut() {
        adjustment.amount = amount;
        adjustment.included_tax = included_tax;
    }
}
