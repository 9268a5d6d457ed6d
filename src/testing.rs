//! In-memory implementations of every port, for service and handler tests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use uuid::Uuid;

use crate::application::admin_orders::{AdminOrderService, Ports};
use crate::application::invoice::HtmlInvoiceRenderer;
use crate::domain::errors::DomainError;
use crate::domain::fees::EnterpriseFee;
use crate::domain::order::Order;
use crate::domain::order_cycle::OrderCycle;
use crate::domain::ports::{
    Invoice, ListResult, OrderCycleRepository, OrderMailer, OrderQuery, OrderRepository,
    OrderScope, OrderSort, TaxRateRepository, UserRepository,
};
use crate::domain::tax::TaxRate;
use crate::domain::user::User;

pub use crate::domain::order_cycle::test_support::manager_of;

pub fn admin() -> User {
    User {
        admin: true,
        ..manager_of(vec![])
    }
}

#[derive(Default)]
struct State {
    orders: Vec<Order>,
    order_cycles: Vec<OrderCycle>,
    fees: HashMap<Uuid, Vec<EnterpriseFee>>,
    supplied: HashMap<Uuid, Vec<Uuid>>,
    tax_rates: Vec<TaxRate>,
    users: HashMap<String, User>,
    mail: Vec<String>,
}

#[derive(Clone, Default)]
pub struct InMemory {
    state: Arc<Mutex<State>>,
}

impl InMemory {
    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().expect("in-memory state poisoned")
    }

    pub fn service(&self) -> AdminOrderService {
        let ports = Ports {
            orders: Arc::new(self.clone()),
            order_cycles: Arc::new(self.clone()),
            tax_rates: Arc::new(self.clone()),
            users: Arc::new(self.clone()),
            mailer: Arc::new(self.clone()),
            invoices: Arc::new(HtmlInvoiceRenderer),
        };
        AdminOrderService::new(ports, 15)
    }

    pub fn add_order(&self, order: Order) {
        self.state().orders.push(order);
    }

    pub fn add_order_cycle(&self, order_cycle: OrderCycle) {
        self.state().order_cycles.push(order_cycle);
    }

    pub fn add_fee(&self, order_cycle_id: Uuid, fee: EnterpriseFee) {
        self.state().fees.entry(order_cycle_id).or_default().push(fee);
    }

    pub fn add_supplied(&self, enterprise_id: Uuid, variant_ids: Vec<Uuid>) {
        self.state().supplied.insert(enterprise_id, variant_ids);
    }

    pub fn add_tax_rate(&self, rate: TaxRate) {
        self.state().tax_rates.push(rate);
    }

    pub fn add_user(&self, api_key: &str, user: User) {
        self.state().users.insert(api_key.to_string(), user);
    }

    pub fn order(&self, number: &str) -> Option<Order> {
        self.state().orders.iter().find(|o| o.number == number).cloned()
    }

    /// One entry per mail request: `confirm:<number>[:resend]` or
    /// `invoice:<number>:<filename>`.
    pub fn sent_mail(&self) -> Vec<String> {
        self.state().mail.clone()
    }
}

impl OrderRepository for InMemory {
    fn create(&self, order: &Order) -> Result<(), DomainError> {
        self.add_order(order.clone());
        Ok(())
    }

    fn find_by_number(&self, number: &str) -> Result<Option<Order>, DomainError> {
        Ok(self.order(number))
    }

    fn list(&self, query: &OrderQuery) -> Result<ListResult, DomainError> {
        let state = self.state();
        let coordinator_of = |order: &Order| {
            order.order_cycle_id.and_then(|id| {
                state
                    .order_cycles
                    .iter()
                    .find(|oc| oc.id == id)
                    .map(|oc| oc.coordinator_id)
            })
        };

        let mut matching: Vec<Order> = state
            .orders
            .iter()
            .filter(|o| match &query.scope {
                OrderScope::All => true,
                OrderScope::DistributedBy(ids) => in_ids(o.distributor_id, ids),
                OrderScope::EditableBy(ids) => {
                    in_ids(o.distributor_id, ids) || in_ids(coordinator_of(o), ids)
                }
            })
            .filter(|o| {
                query
                    .distributor_ids
                    .as_ref()
                    .map_or(true, |ids| in_ids(o.distributor_id, ids))
            })
            .filter(|o| {
                query
                    .order_cycle_ids
                    .as_ref()
                    .map_or(true, |ids| in_ids(o.order_cycle_id, ids))
            })
            .cloned()
            .collect();

        match query.sort {
            OrderSort::NewestFirst => matching.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
            OrderSort::OldestFirst => matching.sort_by(|a, b| a.created_at.cmp(&b.created_at)),
        }

        let total = matching.len() as i64;
        let offset = query
            .offset()
            .and_then(|offset| usize::try_from(offset).ok())
            .unwrap_or(usize::MAX);
        let items = matching
            .into_iter()
            .skip(offset)
            .take(query.per_page as usize)
            .collect();
        Ok(ListResult { items, total })
    }

    fn save(&self, order: &Order) -> Result<(), DomainError> {
        let mut state = self.state();
        let existing = state
            .orders
            .iter_mut()
            .find(|o| o.id == order.id)
            .ok_or(DomainError::NotFound)?;
        *existing = order.clone();
        Ok(())
    }
}

fn in_ids(id: Option<Uuid>, ids: &[Uuid]) -> bool {
    id.is_some_and(|id| ids.contains(&id))
}

impl OrderCycleRepository for InMemory {
    fn find_by_id(&self, id: Uuid) -> Result<Option<OrderCycle>, DomainError> {
        Ok(self.state().order_cycles.iter().find(|oc| oc.id == id).cloned())
    }

    fn coordinator_fees(&self, order_cycle_id: Uuid) -> Result<Vec<EnterpriseFee>, DomainError> {
        Ok(self
            .state()
            .fees
            .get(&order_cycle_id)
            .cloned()
            .unwrap_or_default())
    }

    fn supplied_variants(
        &self,
        enterprise_ids: &[Uuid],
    ) -> Result<HashMap<Uuid, Vec<Uuid>>, DomainError> {
        Ok(self
            .state()
            .supplied
            .iter()
            .filter(|(id, _)| enterprise_ids.contains(id))
            .map(|(id, variants)| (*id, variants.clone()))
            .collect())
    }
}

impl TaxRateRepository for InMemory {
    fn all(&self) -> Result<Vec<TaxRate>, DomainError> {
        Ok(self.state().tax_rates.clone())
    }
}

impl UserRepository for InMemory {
    fn find_by_api_key(&self, api_key: &str) -> Result<Option<User>, DomainError> {
        Ok(self.state().users.get(api_key).cloned())
    }
}

impl OrderMailer for InMemory {
    fn confirm_email_for_customer(&self, order: &Order, resend: bool) -> Result<(), DomainError> {
        let entry = if resend {
            format!("confirm:{}:resend", order.number)
        } else {
            format!("confirm:{}", order.number)
        };
        self.state().mail.push(entry);
        Ok(())
    }

    fn invoice_email(&self, order: &Order, invoice: &Invoice) -> Result<(), DomainError> {
        self.state()
            .mail
            .push(format!("invoice:{}:{}", order.number, invoice.filename));
        Ok(())
    }
}
