use uuid::Uuid;

use super::order::Order;

/// An admin-side user and the enterprises they manage.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub admin: bool,
    pub enterprise_ids: Vec<Uuid>,
}

impl User {
    pub fn manages(&self, enterprise_id: Uuid) -> bool {
        self.admin || self.enterprise_ids.contains(&enterprise_id)
    }

    /// Whether the user may act on `order` from the admin. `coordinator_id` is
    /// the coordinator of the order's order cycle, when it has one.
    pub fn can_manage_order(&self, order: &Order, coordinator_id: Option<Uuid>) -> bool {
        self.admin
            || order.distributor_id.is_some_and(|d| self.manages(d))
            || coordinator_id.is_some_and(|c| self.manages(c))
    }
}
