use std::collections::HashMap;

use uuid::Uuid;

use super::errors::DomainError;
use super::fees::EnterpriseFee;
use super::order::Order;
use super::order_cycle::OrderCycle;
use super::tax::TaxRate;
use super::user::User;

/// Which orders a listing may draw from.
#[derive(Debug, Clone, PartialEq)]
pub enum OrderScope {
    All,
    /// Orders distributed by one of these enterprises.
    DistributedBy(Vec<Uuid>),
    /// Orders distributed by, or sold in an order cycle coordinated by, one
    /// of these enterprises.
    EditableBy(Vec<Uuid>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderSort {
    NewestFirst,
    OldestFirst,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrderQuery {
    pub scope: OrderScope,
    pub distributor_ids: Option<Vec<Uuid>>,
    pub order_cycle_ids: Option<Vec<Uuid>>,
    pub sort: OrderSort,
    /// 1-based.
    pub page: i64,
    pub per_page: i64,
}

impl OrderQuery {
    /// Rows to skip, or `None` when the page lies past any addressable row.
    pub fn offset(&self) -> Option<i64> {
        self.page.saturating_sub(1).checked_mul(self.per_page)
    }
}

#[derive(Debug, Clone)]
pub struct ListResult {
    pub items: Vec<Order>,
    pub total: i64,
}

pub trait OrderRepository: Send + Sync + 'static {
    fn create(&self, order: &Order) -> Result<(), DomainError>;
    fn find_by_number(&self, number: &str) -> Result<Option<Order>, DomainError>;
    fn list(&self, query: &OrderQuery) -> Result<ListResult, DomainError>;
    /// Persist totals, line-item quantities and the full adjustment set.
    fn save(&self, order: &Order) -> Result<(), DomainError>;
}

pub trait OrderCycleRepository: Send + Sync + 'static {
    fn find_by_id(&self, id: Uuid) -> Result<Option<OrderCycle>, DomainError>;
    fn coordinator_fees(&self, order_cycle_id: Uuid) -> Result<Vec<EnterpriseFee>, DomainError>;
    /// Variant ids keyed by supplying enterprise.
    fn supplied_variants(
        &self,
        enterprise_ids: &[Uuid],
    ) -> Result<HashMap<Uuid, Vec<Uuid>>, DomainError>;
}

pub trait TaxRateRepository: Send + Sync + 'static {
    fn all(&self) -> Result<Vec<TaxRate>, DomainError>;
}

pub trait UserRepository: Send + Sync + 'static {
    fn find_by_api_key(&self, api_key: &str) -> Result<Option<User>, DomainError>;
}

/// A rendered invoice document.
#[derive(Debug, Clone, PartialEq)]
pub struct Invoice {
    pub filename: String,
    pub content_type: String,
    pub body: String,
}

pub trait InvoiceRenderer: Send + Sync + 'static {
    fn render(&self, order: &Order) -> Result<Invoice, DomainError>;
}

pub trait OrderMailer: Send + Sync + 'static {
    fn confirm_email_for_customer(&self, order: &Order, resend: bool) -> Result<(), DomainError>;
    fn invoice_email(&self, order: &Order, invoice: &Invoice) -> Result<(), DomainError>;
}
