use std::collections::{BTreeSet, HashMap};

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::user::User;

/// A movement of variants into (`incoming`) or out of the order cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct Exchange {
    pub id: Uuid,
    pub sender_id: Uuid,
    pub receiver_id: Uuid,
    pub incoming: bool,
    pub variant_ids: Vec<Uuid>,
    pub pickup_time: Option<String>,
    pub pickup_instructions: Option<String>,
}

impl Exchange {
    /// The enterprise on the far side of the coordinator.
    pub fn participant_id(&self) -> Uuid {
        if self.incoming {
            self.sender_id
        } else {
            self.receiver_id
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrderCycle {
    pub id: Uuid,
    pub name: String,
    pub orders_open_at: Option<DateTime<Utc>>,
    pub orders_close_at: Option<DateTime<Utc>>,
    pub coordinator_id: Uuid,
    pub coordinator_fee_ids: Vec<Uuid>,
    pub exchanges: Vec<Exchange>,
}

impl OrderCycle {
    pub fn incoming_exchanges(&self) -> impl Iterator<Item = &Exchange> {
        self.exchanges.iter().filter(|e| e.incoming)
    }

    pub fn outgoing_exchanges(&self) -> impl Iterator<Item = &Exchange> {
        self.exchanges.iter().filter(|e| !e.incoming)
    }

    pub fn outgoing_exchange_to(&self, receiver_id: Uuid) -> Option<&Exchange> {
        self.outgoing_exchanges().find(|e| e.receiver_id == receiver_id)
    }

    /// Every enterprise taking part, coordinator first.
    pub fn participant_ids(&self) -> Vec<Uuid> {
        let mut ids = vec![self.coordinator_id];
        for exchange in &self.exchanges {
            let id = exchange.participant_id();
            if !ids.contains(&id) {
                ids.push(id);
            }
        }
        ids
    }

    /// Variants that have come into the cycle through incoming exchanges.
    pub fn incoming_variant_ids(&self) -> Vec<Uuid> {
        let set: BTreeSet<Uuid> = self
            .incoming_exchanges()
            .flat_map(|e| e.variant_ids.iter().copied())
            .collect();
        set.into_iter().collect()
    }
}

/// What a user may see and edit inside one order cycle.
pub trait OrderCyclePermissions {
    fn visible_enterprises(&self) -> Vec<Uuid>;
    fn order_cycle_exchanges(&self) -> Vec<Exchange>;
    fn editable_variants_for_incoming_exchanges_from(&self, enterprise_id: Uuid) -> Vec<Uuid>;
    fn editable_variants_for_outgoing_exchanges_to(&self, enterprise_id: Uuid) -> Vec<Uuid>;
    fn visible_variants_for_outgoing_exchanges_to(&self, enterprise_id: Uuid) -> Vec<Uuid>;
}

/// Permissions derived from the enterprises a user manages.
///
/// Whoever manages the coordinator (or is an admin) sees the whole cycle.
/// Other managers see the coordinator, their own enterprises and the hubs
/// receiving variants they supply, and only the exchanges that touch them.
pub struct ManagerPermissions<'a> {
    user: &'a User,
    order_cycle: &'a OrderCycle,
    /// Variants each participating enterprise supplies.
    supplied_variants: &'a HashMap<Uuid, Vec<Uuid>>,
}

impl<'a> ManagerPermissions<'a> {
    pub fn new(
        user: &'a User,
        order_cycle: &'a OrderCycle,
        supplied_variants: &'a HashMap<Uuid, Vec<Uuid>>,
    ) -> Self {
        Self {
            user,
            order_cycle,
            supplied_variants,
        }
    }

    fn coordinates(&self) -> bool {
        self.user.manages(self.order_cycle.coordinator_id)
    }

    fn supplied_by(&self, enterprise_id: Uuid) -> &[Uuid] {
        self.supplied_variants
            .get(&enterprise_id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    fn supplied_by_managed(&self, variant_id: &Uuid) -> bool {
        self.supplied_variants
            .iter()
            .any(|(enterprise_id, variants)| {
                self.user.manages(*enterprise_id) && variants.contains(variant_id)
            })
    }

    fn receives_managed_variants(&self, enterprise_id: Uuid) -> bool {
        self.order_cycle
            .outgoing_exchange_to(enterprise_id)
            .is_some_and(|e| e.variant_ids.iter().any(|v| self.supplied_by_managed(v)))
    }
}

impl OrderCyclePermissions for ManagerPermissions<'_> {
    fn visible_enterprises(&self) -> Vec<Uuid> {
        let participants = self.order_cycle.participant_ids();
        if self.coordinates() {
            return participants;
        }
        participants
            .into_iter()
            .filter(|id| {
                *id == self.order_cycle.coordinator_id
                    || self.user.manages(*id)
                    || self.receives_managed_variants(*id)
            })
            .collect()
    }

    fn order_cycle_exchanges(&self) -> Vec<Exchange> {
        let coordinates = self.coordinates();
        self.order_cycle
            .exchanges
            .iter()
            .filter(|e| coordinates || self.user.manages(e.participant_id()))
            .cloned()
            .collect()
    }

    fn editable_variants_for_incoming_exchanges_from(&self, enterprise_id: Uuid) -> Vec<Uuid> {
        if self.coordinates() || self.user.manages(enterprise_id) {
            self.supplied_by(enterprise_id).to_vec()
        } else {
            Vec::new()
        }
    }

    fn editable_variants_for_outgoing_exchanges_to(&self, enterprise_id: Uuid) -> Vec<Uuid> {
        let hub_manager = self.user.manages(enterprise_id)
            && self.order_cycle.outgoing_exchange_to(enterprise_id).is_some();
        if self.coordinates() || hub_manager {
            self.order_cycle.incoming_variant_ids()
        } else {
            Vec::new()
        }
    }

    fn visible_variants_for_outgoing_exchanges_to(&self, enterprise_id: Uuid) -> Vec<Uuid> {
        if self.coordinates() {
            return self.order_cycle.incoming_variant_ids();
        }
        let Some(exchange) = self.order_cycle.outgoing_exchange_to(enterprise_id) else {
            return Vec::new();
        };
        if self.user.manages(enterprise_id) {
            return self.order_cycle.incoming_variant_ids();
        }
        exchange
            .variant_ids
            .iter()
            .filter(|v| self.supplied_by_managed(v))
            .copied()
            .collect()
    }
}
