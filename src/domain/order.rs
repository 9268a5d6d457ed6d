use std::fmt;
use std::str::FromStr;

use bigdecimal::{BigDecimal, Zero};
use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::errors::DomainError;
use super::fees::EnterpriseFee;
use super::tax::TaxRate;
use super::voucher::Voucher;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdjustmentKind {
    Voucher,
    /// Tax share of a voucher discount when prices exclude tax.
    VoucherTax,
    Tax,
    Shipping,
    EnterpriseFee,
}

impl AdjustmentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AdjustmentKind::Voucher => "voucher",
            AdjustmentKind::VoucherTax => "voucher_tax",
            AdjustmentKind::Tax => "tax",
            AdjustmentKind::Shipping => "shipping",
            AdjustmentKind::EnterpriseFee => "enterprise_fee",
        }
    }

    pub fn is_voucher(&self) -> bool {
        matches!(self, AdjustmentKind::Voucher | AdjustmentKind::VoucherTax)
    }

    pub fn is_fee(&self) -> bool {
        matches!(self, AdjustmentKind::Shipping | AdjustmentKind::EnterpriseFee)
    }
}

impl fmt::Display for AdjustmentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AdjustmentKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "voucher" => Ok(AdjustmentKind::Voucher),
            "voucher_tax" => Ok(AdjustmentKind::VoucherTax),
            "tax" => Ok(AdjustmentKind::Tax),
            "shipping" => Ok(AdjustmentKind::Shipping),
            "enterprise_fee" => Ok(AdjustmentKind::EnterpriseFee),
            other => Err(DomainError::Internal(format!(
                "unknown adjustment kind '{}'",
                other
            ))),
        }
    }
}

/// A monetary line altering an order's total. Discounts carry a negative
/// `amount`; `included_tax` is the tax already contained in `amount`.
#[derive(Debug, Clone, PartialEq)]
pub struct Adjustment {
    pub id: Uuid,
    pub kind: AdjustmentKind,
    /// Voucher, tax rate or fee that produced this adjustment.
    pub originator_id: Option<Uuid>,
    pub label: String,
    pub amount: BigDecimal,
    pub included_tax: BigDecimal,
}

impl Adjustment {
    pub fn new(
        kind: AdjustmentKind,
        originator_id: Option<Uuid>,
        label: impl Into<String>,
        amount: BigDecimal,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            originator_id,
            label: label.into(),
            amount,
            included_tax: BigDecimal::zero(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LineItem {
    pub id: Uuid,
    pub variant_id: Uuid,
    pub quantity: i32,
    pub price: BigDecimal,
}

impl LineItem {
    pub fn amount(&self) -> BigDecimal {
        &self.price * &BigDecimal::from(self.quantity)
    }
}

#[derive(Debug, Clone)]
pub struct Order {
    pub id: Uuid,
    pub number: String,
    pub email: String,
    pub state: String,
    pub user_id: Option<Uuid>,
    pub distributor_id: Option<Uuid>,
    pub order_cycle_id: Option<Uuid>,
    pub item_total: BigDecimal,
    pub additional_tax_total: BigDecimal,
    pub included_tax_total: BigDecimal,
    pub line_items: Vec<LineItem>,
    pub adjustments: Vec<Adjustment>,
    /// Vouchers whose adjustments sit on this order.
    pub vouchers: Vec<Voucher>,
    pub created_at: DateTime<Utc>,
}

impl Order {
    pub fn new(number: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            number: number.into(),
            email: email.into(),
            state: "cart".to_string(),
            user_id: None,
            distributor_id: None,
            order_cycle_id: None,
            item_total: BigDecimal::zero(),
            additional_tax_total: BigDecimal::zero(),
            included_tax_total: BigDecimal::zero(),
            line_items: Vec::new(),
            adjustments: Vec::new(),
            vouchers: Vec::new(),
            created_at: Utc::now(),
        }
    }

    /// Shipping and enterprise fees.
    pub fn fee_total(&self) -> BigDecimal {
        self.adjustments
            .iter()
            .filter(|a| a.kind.is_fee())
            .map(|a| &a.amount)
            .sum()
    }

    /// Order total before voucher discounts.
    pub fn total(&self) -> BigDecimal {
        &self.item_total + &self.fee_total() + &self.additional_tax_total
    }

    pub fn voucher_total(&self) -> BigDecimal {
        self.adjustments
            .iter()
            .filter(|a| a.kind.is_voucher())
            .map(|a| &a.amount)
            .sum()
    }

    /// Sum of every non-tax adjustment; tax is reported through the tax totals.
    pub fn adjustment_total(&self) -> BigDecimal {
        &self.fee_total() + &self.voucher_total()
    }

    /// What the customer pays once vouchers are applied.
    pub fn payable_total(&self) -> BigDecimal {
        &self.total() + &self.voucher_total()
    }

    pub fn voucher_adjustment(&self) -> Option<&Adjustment> {
        self.adjustments
            .iter()
            .find(|a| a.kind == AdjustmentKind::Voucher)
    }

    pub fn voucher_adjustment_mut(&mut self) -> Option<&mut Adjustment> {
        self.adjustments
            .iter_mut()
            .find(|a| a.kind == AdjustmentKind::Voucher)
    }

    pub fn voucher_tax_adjustment(&self) -> Option<&Adjustment> {
        self.adjustments
            .iter()
            .find(|a| a.kind == AdjustmentKind::VoucherTax)
    }

    pub fn voucher_tax_adjustment_mut(&mut self) -> Option<&mut Adjustment> {
        self.adjustments
            .iter_mut()
            .find(|a| a.kind == AdjustmentKind::VoucherTax)
    }

    /// The voucher behind the order's voucher adjustment, if any.
    pub fn applied_voucher(&self) -> Option<&Voucher> {
        let adjustment = self.voucher_adjustment()?;
        let voucher_id = adjustment.originator_id?;
        self.vouchers.iter().find(|v| v.id == voucher_id)
    }

    pub fn line_item_mut(&mut self, id: Uuid) -> Option<&mut LineItem> {
        self.line_items.iter_mut().find(|li| li.id == id)
    }

    /// Replace every tax adjustment with one per rate, taxing the line items.
    pub fn create_tax_charge(&mut self, rates: &[TaxRate]) {
        self.adjustments.retain(|a| a.kind != AdjustmentKind::Tax);

        let taxable: BigDecimal = self.line_items.iter().map(LineItem::amount).sum();
        for rate in rates {
            let tax = rate.compute(&taxable);
            let mut adjustment =
                Adjustment::new(AdjustmentKind::Tax, Some(rate.id), rate.name.clone(), BigDecimal::zero());
            if rate.included_in_price {
                adjustment.included_tax = tax;
            } else {
                adjustment.amount = tax;
            }
            self.adjustments.push(adjustment);
        }
    }

    /// Set the single shipping charge, replacing any previous one.
    pub fn set_shipping_fee(&mut self, label: impl Into<String>, amount: BigDecimal) {
        let label = label.into();
        match self
            .adjustments
            .iter_mut()
            .find(|a| a.kind == AdjustmentKind::Shipping)
        {
            Some(existing) => {
                existing.label = label;
                existing.amount = amount;
            }
            None => self
                .adjustments
                .push(Adjustment::new(AdjustmentKind::Shipping, None, label, amount)),
        }
    }

    /// Recompute enterprise fee adjustments from the order cycle's fees.
    pub fn update_distribution_charge(&mut self, fees: &[EnterpriseFee]) {
        self.adjustments
            .retain(|a| a.kind != AdjustmentKind::EnterpriseFee);

        for fee in fees {
            let amount = fee.calculator.compute(self);
            self.adjustments.push(Adjustment::new(
                AdjustmentKind::EnterpriseFee,
                Some(fee.id),
                fee.name.clone(),
                amount,
            ));
        }
    }

    /// Recompute stored totals from line items and tax adjustments.
    pub fn update_order(&mut self) {
        self.item_total = self.line_items.iter().map(LineItem::amount).sum();

        let (additional, included) = self
            .adjustments
            .iter()
            .filter(|a| a.kind == AdjustmentKind::Tax)
            .fold(
                (BigDecimal::zero(), BigDecimal::zero()),
                |(additional, included), a| (additional + &a.amount, included + &a.included_tax),
            );
        self.additional_tax_total = additional;
        self.included_tax_total = included;
    }
}
