use std::sync::Arc;

use uuid::Uuid;

use crate::application::voucher_adjustments::VoucherAdjustmentsService;
use crate::domain::errors::DomainError;
use crate::domain::order::Order;
use crate::domain::order_cycle::ManagerPermissions;
use crate::domain::ports::{
    Invoice, InvoiceRenderer, OrderCycleRepository, OrderMailer, OrderQuery, OrderRepository,
    OrderScope, OrderSort, TaxRateRepository, UserRepository,
};
use crate::domain::user::User;
use crate::serializers::order_cycle::OrderCycleSerializer;

pub const MAX_PER_PAGE: i64 = 100;
/// Page size of the managed-orders listing when none is requested.
pub const MANAGED_PER_PAGE: i64 = 25;

/// Everything the admin order workflows talk to.
#[derive(Clone)]
pub struct Ports {
    pub orders: Arc<dyn OrderRepository>,
    pub order_cycles: Arc<dyn OrderCycleRepository>,
    pub tax_rates: Arc<dyn TaxRateRepository>,
    pub users: Arc<dyn UserRepository>,
    pub mailer: Arc<dyn OrderMailer>,
    pub invoices: Arc<dyn InvoiceRenderer>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrderFilter {
    pub distributor_ids: Option<Vec<Uuid>>,
    pub order_cycle_ids: Option<Vec<Uuid>>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

#[derive(Debug, Clone)]
pub struct OrderPage {
    pub items: Vec<Order>,
    pub total: i64,
    pub page: i64,
    pub per_page: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineItemChange {
    pub id: Uuid,
    pub quantity: i32,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrderChanges {
    pub email: Option<String>,
    pub line_items: Vec<LineItemChange>,
}

#[derive(Clone)]
pub struct AdminOrderService {
    ports: Ports,
    orders_per_page: i64,
}

impl AdminOrderService {
    pub fn new(ports: Ports, orders_per_page: i64) -> Self {
        Self {
            ports,
            orders_per_page,
        }
    }

    pub fn authenticate(&self, api_key: Option<&str>) -> Result<User, DomainError> {
        let api_key = api_key
            .filter(|k| !k.is_empty())
            .ok_or(DomainError::Unauthorized)?;
        self.ports
            .users
            .find_by_api_key(api_key)?
            .ok_or(DomainError::Unauthorized)
    }

    /// Orders distributed by the user's enterprises, newest first.
    pub fn index(&self, user: &User, filter: OrderFilter) -> Result<OrderPage, DomainError> {
        let scope = if user.admin {
            OrderScope::All
        } else {
            OrderScope::DistributedBy(user.enterprise_ids.clone())
        };
        self.list(
            scope,
            OrderSort::NewestFirst,
            filter,
            self.orders_per_page,
        )
    }

    /// Every order the user may edit, oldest first.
    pub fn managed(
        &self,
        user: &User,
        page: Option<i64>,
        per_page: Option<i64>,
    ) -> Result<OrderPage, DomainError> {
        let scope = if user.admin {
            OrderScope::All
        } else {
            OrderScope::EditableBy(user.enterprise_ids.clone())
        };
        let filter = OrderFilter {
            page,
            per_page,
            ..OrderFilter::default()
        };
        self.list(scope, OrderSort::OldestFirst, filter, MANAGED_PER_PAGE)
    }

    pub fn resend(&self, user: &User, number: &str) -> Result<(), DomainError> {
        let order = self.authorized_order(user, number)?;
        self.ports.mailer.confirm_email_for_customer(&order, true)?;
        log::info!("confirmation email for order {} resent by {}", order.number, user.email);
        Ok(())
    }

    pub fn invoice(&self, user: &User, number: &str) -> Result<Invoice, DomainError> {
        let order = self.authorized_order(user, number)?;
        let invoice = self.ports.invoices.render(&order)?;
        self.ports.mailer.invoice_email(&order, &invoice)?;
        log::info!("invoice {} emailed for order {}", invoice.filename, order.number);
        Ok(invoice)
    }

    /// Apply admin edits, then bring fees, tax and vouchers back in line.
    pub fn update(
        &self,
        user: &User,
        number: &str,
        changes: OrderChanges,
    ) -> Result<Order, DomainError> {
        let mut order = self.authorized_order(user, number)?;

        if let Some(email) = changes.email {
            if email.trim().is_empty() {
                return Err(DomainError::InvalidInput("email must not be blank".to_string()));
            }
            order.email = email;
        }
        for change in changes.line_items {
            if change.quantity <= 0 {
                return Err(DomainError::InvalidInput(format!(
                    "quantity for line item {} must be positive",
                    change.id
                )));
            }
            let line_item = order.line_item_mut(change.id).ok_or_else(|| {
                DomainError::InvalidInput(format!("unknown line item {}", change.id))
            })?;
            line_item.quantity = change.quantity;
        }

        self.update_distribution_charge(&mut order)?;
        self.ports.orders.save(&order)?;
        Ok(order)
    }

    /// Recompute enterprise fees, tax and voucher adjustments for `order`.
    pub fn update_distribution_charge(&self, order: &mut Order) -> Result<(), DomainError> {
        order.update_order();

        let fees = match order.order_cycle_id {
            Some(order_cycle_id) => self.ports.order_cycles.coordinator_fees(order_cycle_id)?,
            None => Vec::new(),
        };
        order.update_distribution_charge(&fees);

        let rates = self.ports.tax_rates.all()?;
        order.create_tax_charge(&rates);
        order.update_order();

        VoucherAdjustmentsService::new(Some(order)).calculate();
        Ok(())
    }

    pub fn order_cycle(&self, user: &User, id: Uuid) -> Result<OrderCycleSerializer, DomainError> {
        let order_cycle = self
            .ports
            .order_cycles
            .find_by_id(id)?
            .ok_or(DomainError::NotFound)?;
        let supplied = self
            .ports
            .order_cycles
            .supplied_variants(&order_cycle.participant_ids())?;

        let permissions = ManagerPermissions::new(user, &order_cycle, &supplied);
        Ok(OrderCycleSerializer::new(&order_cycle, user, &permissions))
    }

    fn authorized_order(&self, user: &User, number: &str) -> Result<Order, DomainError> {
        let order = self
            .ports
            .orders
            .find_by_number(number)?
            .ok_or(DomainError::NotFound)?;

        let coordinator_id = match order.order_cycle_id {
            Some(id) if !user.admin => self
                .ports
                .order_cycles
                .find_by_id(id)?
                .map(|oc| oc.coordinator_id),
            _ => None,
        };
        if !user.can_manage_order(&order, coordinator_id) {
            log::warn!("user {} denied access to order {}", user.email, order.number);
            return Err(DomainError::Forbidden);
        }
        Ok(order)
    }

    fn list(
        &self,
        scope: OrderScope,
        sort: OrderSort,
        filter: OrderFilter,
        default_per_page: i64,
    ) -> Result<OrderPage, DomainError> {
        let page = filter.page.unwrap_or(1).max(1);
        let per_page = filter
            .per_page
            .unwrap_or(default_per_page)
            .clamp(1, MAX_PER_PAGE);

        let result = self.ports.orders.list(&OrderQuery {
            scope,
            distributor_ids: filter.distributor_ids,
            order_cycle_ids: filter.order_cycle_ids,
            sort,
            page,
            per_page,
        })?;

        Ok(OrderPage {
            items: result.items,
            total: result.total,
            page,
            per_page,
        })
    }
}
