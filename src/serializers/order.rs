use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::order::Order;

/// Order row for admin listings. Money is rendered as decimal strings.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct OrderSerializer {
    pub id: Uuid,
    pub number: String,
    pub email: String,
    pub state: String,
    pub distributor_id: Option<Uuid>,
    pub order_cycle_id: Option<Uuid>,
    pub item_total: String,
    pub adjustment_total: String,
    pub total: String,
    pub created_at: String,
    pub edit_path: String,
}

impl From<&Order> for OrderSerializer {
    fn from(order: &Order) -> Self {
        Self {
            id: order.id,
            number: order.number.clone(),
            email: order.email.clone(),
            state: order.state.clone(),
            distributor_id: order.distributor_id,
            order_cycle_id: order.order_cycle_id,
            item_total: order.item_total.to_string(),
            adjustment_total: order.adjustment_total().to_string(),
            total: order.payable_total().to_string(),
            created_at: order.created_at.to_rfc3339(),
            edit_path: format!("/admin/orders/{}/edit", order.number),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderListSerializer {
    pub items: Vec<OrderSerializer>,
    pub total: i64,
    pub page: i64,
    pub per_page: i64,
}
