use std::collections::HashMap;

use diesel::prelude::*;
use uuid::Uuid;

use crate::db::DbPool;
use crate::domain::errors::DomainError;
use crate::domain::fees::{EnterpriseFee, FeeCalculator};
use crate::domain::order_cycle::{Exchange, OrderCycle};
use crate::domain::ports::OrderCycleRepository;
use crate::schema::{
    coordinator_fees, enterprise_fees, exchange_variants, exchanges, order_cycles, variants,
};

use super::models::{EnterpriseFeeRow, ExchangeRow, OrderCycleRow};

pub struct DieselOrderCycleRepository {
    pool: DbPool,
}

impl DieselOrderCycleRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl OrderCycleRepository for DieselOrderCycleRepository {
    fn find_by_id(&self, id: Uuid) -> Result<Option<OrderCycle>, DomainError> {
        let mut conn = self.pool.get()?;

        let row = order_cycles::table
            .find(id)
            .select(OrderCycleRow::as_select())
            .first(&mut conn)
            .optional()?;
        let Some(row) = row else {
            return Ok(None);
        };

        let exchange_rows = exchanges::table
            .filter(exchanges::order_cycle_id.eq(id))
            .select(ExchangeRow::as_select())
            .order(exchanges::id.asc())
            .load(&mut conn)?;
        let exchange_ids: Vec<Uuid> = exchange_rows.iter().map(|e| e.id).collect();

        let mut variants_by_exchange: HashMap<Uuid, Vec<Uuid>> = HashMap::new();
        let pairs: Vec<(Uuid, Uuid)> = exchange_variants::table
            .filter(exchange_variants::exchange_id.eq_any(exchange_ids))
            .select((exchange_variants::exchange_id, exchange_variants::variant_id))
            .order(exchange_variants::variant_id.asc())
            .load(&mut conn)?;
        for (exchange_id, variant_id) in pairs {
            variants_by_exchange
                .entry(exchange_id)
                .or_default()
                .push(variant_id);
        }

        let coordinator_fee_ids = coordinator_fees::table
            .filter(coordinator_fees::order_cycle_id.eq(id))
            .select(coordinator_fees::enterprise_fee_id)
            .order(coordinator_fees::enterprise_fee_id.asc())
            .load(&mut conn)?;

        let exchanges = exchange_rows
            .into_iter()
            .map(|e| Exchange {
                variant_ids: variants_by_exchange.remove(&e.id).unwrap_or_default(),
                id: e.id,
                sender_id: e.sender_id,
                receiver_id: e.receiver_id,
                incoming: e.incoming,
                pickup_time: e.pickup_time,
                pickup_instructions: e.pickup_instructions,
            })
            .collect();

        Ok(Some(OrderCycle {
            id: row.id,
            name: row.name,
            orders_open_at: row.orders_open_at,
            orders_close_at: row.orders_close_at,
            coordinator_id: row.coordinator_id,
            coordinator_fee_ids,
            exchanges,
        }))
    }

    fn coordinator_fees(&self, order_cycle_id: Uuid) -> Result<Vec<EnterpriseFee>, DomainError> {
        let mut conn = self.pool.get()?;

        let rows = coordinator_fees::table
            .inner_join(enterprise_fees::table)
            .filter(coordinator_fees::order_cycle_id.eq(order_cycle_id))
            .select(EnterpriseFeeRow::as_select())
            .order(enterprise_fees::name.asc())
            .load(&mut conn)?;

        rows.into_iter()
            .map(|row| {
                Ok(EnterpriseFee {
                    id: row.id,
                    enterprise_id: row.enterprise_id,
                    name: row.name,
                    calculator: FeeCalculator::from_parts(
                        row.calculator_type.parse()?,
                        row.calculator_amount,
                    ),
                })
            })
            .collect()
    }

    fn supplied_variants(
        &self,
        enterprise_ids: &[Uuid],
    ) -> Result<HashMap<Uuid, Vec<Uuid>>, DomainError> {
        let mut conn = self.pool.get()?;

        let pairs: Vec<(Uuid, Uuid)> = variants::table
            .filter(variants::supplier_id.eq_any(enterprise_ids.to_vec()))
            .select((variants::supplier_id, variants::id))
            .order(variants::id.asc())
            .load(&mut conn)?;

        let mut supplied: HashMap<Uuid, Vec<Uuid>> = HashMap::new();
        for (supplier_id, variant_id) in pairs {
            supplied.entry(supplier_id).or_default().push(variant_id);
        }
        Ok(supplied)
    }
}
