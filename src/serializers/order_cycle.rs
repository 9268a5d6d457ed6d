use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::order_cycle::{Exchange, OrderCycle, OrderCyclePermissions};
use crate::domain::user::User;

/// Variant ids keyed by enterprise id.
pub type VariantsByEnterprise = BTreeMap<Uuid, Vec<Uuid>>;

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct IdSerializer {
    pub id: Uuid,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct ExchangeSerializer {
    pub id: Uuid,
    pub sender_id: Uuid,
    pub receiver_id: Uuid,
    pub incoming: bool,
    /// `{variant_id: true}` for each variant in the exchange.
    #[schema(value_type = Object)]
    pub variants: BTreeMap<Uuid, bool>,
    pub pickup_time: Option<String>,
    pub pickup_instructions: Option<String>,
}

impl From<Exchange> for ExchangeSerializer {
    fn from(exchange: Exchange) -> Self {
        Self {
            id: exchange.id,
            sender_id: exchange.sender_id,
            receiver_id: exchange.receiver_id,
            incoming: exchange.incoming,
            variants: exchange.variant_ids.into_iter().map(|v| (v, true)).collect(),
            pickup_time: exchange.pickup_time,
            pickup_instructions: exchange.pickup_instructions,
        }
    }
}

/// An order cycle as seen by one admin user.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct OrderCycleSerializer {
    pub id: Uuid,
    pub name: String,
    /// `YYYY-MM-DD HH:MM:SS +ZZZZ`, or empty when unset.
    pub orders_open_at: String,
    pub orders_close_at: String,
    pub coordinator_id: Uuid,
    pub exchanges: Vec<ExchangeSerializer>,
    #[schema(value_type = Object)]
    pub editable_variants_for_incoming_exchanges: VariantsByEnterprise,
    #[schema(value_type = Object)]
    pub editable_variants_for_outgoing_exchanges: VariantsByEnterprise,
    #[schema(value_type = Object)]
    pub visible_variants_for_outgoing_exchanges: VariantsByEnterprise,
    pub viewing_as_coordinator: bool,
    pub coordinator_fees: Vec<IdSerializer>,
}

impl OrderCycleSerializer {
    pub fn new(
        order_cycle: &OrderCycle,
        viewer: &User,
        permissions: &dyn OrderCyclePermissions,
    ) -> Self {
        let mut exchanges = permissions.order_cycle_exchanges();
        exchanges.sort_by_key(|e| e.id);

        let enterprises = permissions.visible_enterprises();

        Self {
            id: order_cycle.id,
            name: order_cycle.name.clone(),
            orders_open_at: format_time(order_cycle.orders_open_at),
            orders_close_at: format_time(order_cycle.orders_close_at),
            coordinator_id: order_cycle.coordinator_id,
            exchanges: exchanges.into_iter().map(ExchangeSerializer::from).collect(),
            editable_variants_for_incoming_exchanges: variants_by_enterprise(&enterprises, |e| {
                permissions.editable_variants_for_incoming_exchanges_from(e)
            }),
            editable_variants_for_outgoing_exchanges: variants_by_enterprise(&enterprises, |e| {
                permissions.editable_variants_for_outgoing_exchanges_to(e)
            }),
            visible_variants_for_outgoing_exchanges: variants_by_enterprise(&enterprises, |e| {
                permissions.visible_variants_for_outgoing_exchanges_to(e)
            }),
            viewing_as_coordinator: viewer.manages(order_cycle.coordinator_id),
            coordinator_fees: order_cycle
                .coordinator_fee_ids
                .iter()
                .map(|&id| IdSerializer { id })
                .collect(),
        }
    }
}

/// Enterprises with no variants are left out.
fn variants_by_enterprise(
    enterprises: &[Uuid],
    variants_for: impl Fn(Uuid) -> Vec<Uuid>,
) -> VariantsByEnterprise {
    enterprises
        .iter()
        .filter_map(|&enterprise_id| {
            let variants = variants_for(enterprise_id);
            (!variants.is_empty()).then_some((enterprise_id, variants))
        })
        .collect()
}

fn format_time(time: Option<DateTime<Utc>>) -> String {
    time.map(|t| t.format("%Y-%m-%d %H:%M:%S %z").to_string())
        .unwrap_or_default()
}
