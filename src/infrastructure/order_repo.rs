use std::collections::HashMap;

use diesel::pg::Pg;
use diesel::prelude::*;
use diesel::upsert::excluded;
use uuid::Uuid;

use crate::db::DbPool;
use crate::domain::errors::DomainError;
use crate::domain::order::{Adjustment, AdjustmentKind, LineItem, Order};
use crate::domain::ports::{ListResult, OrderQuery, OrderRepository, OrderScope, OrderSort};
use crate::domain::voucher::Voucher;
use crate::schema::{adjustments, line_items, order_cycles, orders, vouchers};

use super::models::{
    AdjustmentRow, LineItemRow, NewAdjustmentRow, NewLineItemRow, NewOrderRow, OrderRow,
    VoucherRow,
};

// ── Error conversions (infrastructure concern only) ──────────────────────────

impl From<diesel::result::Error> for DomainError {
    fn from(e: diesel::result::Error) -> Self {
        DomainError::Internal(e.to_string())
    }
}

impl From<r2d2::Error> for DomainError {
    fn from(e: r2d2::Error) -> Self {
        DomainError::Internal(e.to_string())
    }
}

// ── Row mapping ──────────────────────────────────────────────────────────────

fn order_from_rows(
    row: OrderRow,
    line_items: Vec<LineItemRow>,
    adjustments: Vec<AdjustmentRow>,
    vouchers: Vec<VoucherRow>,
) -> Result<Order, DomainError> {
    Ok(Order {
        id: row.id,
        number: row.number,
        email: row.email,
        state: row.state,
        user_id: row.user_id,
        distributor_id: row.distributor_id,
        order_cycle_id: row.order_cycle_id,
        item_total: row.item_total,
        additional_tax_total: row.additional_tax_total,
        included_tax_total: row.included_tax_total,
        line_items: line_items
            .into_iter()
            .map(|li| LineItem {
                id: li.id,
                variant_id: li.variant_id,
                quantity: li.quantity,
                price: li.price,
            })
            .collect(),
        adjustments: adjustments
            .into_iter()
            .map(adjustment_from_row)
            .collect::<Result<_, _>>()?,
        vouchers: vouchers
            .into_iter()
            .map(|v| Voucher {
                id: v.id,
                code: v.code,
                enterprise_id: v.enterprise_id,
                amount: v.amount,
            })
            .collect(),
        created_at: row.created_at,
    })
}

fn adjustment_from_row(row: AdjustmentRow) -> Result<Adjustment, DomainError> {
    Ok(Adjustment {
        id: row.id,
        kind: row.kind.parse()?,
        originator_id: row.originator_id,
        label: row.label,
        amount: row.amount,
        included_tax: row.included_tax,
    })
}

fn adjustment_rows(order: &Order) -> Vec<NewAdjustmentRow> {
    order
        .adjustments
        .iter()
        .map(|a| NewAdjustmentRow {
            id: a.id,
            order_id: order.id,
            originator_id: a.originator_id,
            kind: a.kind.as_str().to_string(),
            label: a.label.clone(),
            amount: a.amount.clone(),
            included_tax: a.included_tax.clone(),
        })
        .collect()
}

// ── Repository ────────────────────────────────────────────────────────────────

pub struct DieselOrderRepository {
    pool: DbPool,
}

impl DieselOrderRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Orders matching the query's scope and filters, unsorted and unpaged.
fn filtered(query: &OrderQuery, coordinated: &[Uuid]) -> orders::BoxedQuery<'static, Pg> {
    let mut boxed = orders::table.into_boxed();

    match &query.scope {
        OrderScope::All => {}
        OrderScope::DistributedBy(ids) => {
            boxed = boxed.filter(orders::distributor_id.eq_any(ids.clone()));
        }
        OrderScope::EditableBy(ids) => {
            boxed = boxed.filter(
                orders::distributor_id
                    .eq_any(ids.clone())
                    .or(orders::order_cycle_id.eq_any(coordinated.to_vec())),
            );
        }
    }
    if let Some(ids) = &query.distributor_ids {
        boxed = boxed.filter(orders::distributor_id.eq_any(ids.clone()));
    }
    if let Some(ids) = &query.order_cycle_ids {
        boxed = boxed.filter(orders::order_cycle_id.eq_any(ids.clone()));
    }
    boxed
}

impl OrderRepository for DieselOrderRepository {
    fn create(&self, order: &Order) -> Result<(), DomainError> {
        let mut conn = self.pool.get()?;

        conn.transaction::<_, DomainError, _>(|conn| {
            diesel::insert_into(orders::table)
                .values(&NewOrderRow {
                    id: order.id,
                    number: order.number.clone(),
                    email: order.email.clone(),
                    state: order.state.clone(),
                    user_id: order.user_id,
                    distributor_id: order.distributor_id,
                    order_cycle_id: order.order_cycle_id,
                    item_total: order.item_total.clone(),
                    additional_tax_total: order.additional_tax_total.clone(),
                    included_tax_total: order.included_tax_total.clone(),
                    total: order.payable_total(),
                    created_at: order.created_at,
                })
                .execute(conn)?;

            let new_line_items: Vec<NewLineItemRow> = order
                .line_items
                .iter()
                .map(|li| NewLineItemRow {
                    id: li.id,
                    order_id: order.id,
                    variant_id: li.variant_id,
                    quantity: li.quantity,
                    price: li.price.clone(),
                })
                .collect();
            if !new_line_items.is_empty() {
                diesel::insert_into(line_items::table)
                    .values(&new_line_items)
                    .execute(conn)?;
            }

            let new_adjustments = adjustment_rows(order);
            if !new_adjustments.is_empty() {
                diesel::insert_into(adjustments::table)
                    .values(&new_adjustments)
                    .execute(conn)?;
            }

            Ok(())
        })
    }

    fn find_by_number(&self, number: &str) -> Result<Option<Order>, DomainError> {
        let mut conn = self.pool.get()?;

        let order = orders::table
            .filter(orders::number.eq(number))
            .select(OrderRow::as_select())
            .first(&mut conn)
            .optional()?;

        let Some(order) = order else {
            return Ok(None);
        };

        let line_items = LineItemRow::belonging_to(&order)
            .select(LineItemRow::as_select())
            .order(line_items::created_at.asc())
            .load(&mut conn)?;

        let adjustments = AdjustmentRow::belonging_to(&order)
            .select(AdjustmentRow::as_select())
            .order(adjustments::created_at.asc())
            .load(&mut conn)?;

        let voucher_ids: Vec<Uuid> = adjustments
            .iter()
            .filter(|a| a.kind == AdjustmentKind::Voucher.as_str())
            .filter_map(|a| a.originator_id)
            .collect();
        let vouchers = if voucher_ids.is_empty() {
            Vec::new()
        } else {
            vouchers::table
                .filter(vouchers::id.eq_any(voucher_ids))
                .select(VoucherRow::as_select())
                .load(&mut conn)?
        };

        order_from_rows(order, line_items, adjustments, vouchers).map(Some)
    }

    fn list(&self, query: &OrderQuery) -> Result<ListResult, DomainError> {
        let mut conn = self.pool.get()?;

        conn.transaction::<_, DomainError, _>(|conn| {
            let coordinated: Vec<Uuid> = match &query.scope {
                OrderScope::EditableBy(ids) => order_cycles::table
                    .filter(order_cycles::coordinator_id.eq_any(ids.clone()))
                    .select(order_cycles::id)
                    .load(conn)?,
                _ => Vec::new(),
            };

            let total: i64 = filtered(query, &coordinated).count().get_result(conn)?;
            let Some(offset) = query.offset() else {
                return Ok(ListResult {
                    items: Vec::new(),
                    total,
                });
            };

            let sorted = match query.sort {
                OrderSort::NewestFirst => {
                    filtered(query, &coordinated).order(orders::created_at.desc())
                }
                OrderSort::OldestFirst => filtered(query, &coordinated)
                    .order((orders::created_at.asc(), orders::number.asc())),
            };
            let rows = sorted
                .select(OrderRow::as_select())
                .limit(query.per_page)
                .offset(offset)
                .load(conn)?;

            let mut adjustments_by_order: HashMap<Uuid, Vec<AdjustmentRow>> = HashMap::new();
            for adjustment in AdjustmentRow::belonging_to(&rows)
                .select(AdjustmentRow::as_select())
                .load(conn)?
            {
                adjustments_by_order
                    .entry(adjustment.order_id)
                    .or_default()
                    .push(adjustment);
            }

            let items = rows
                .into_iter()
                .map(|row| {
                    let adjustments = adjustments_by_order.remove(&row.id).unwrap_or_default();
                    order_from_rows(row, vec![], adjustments, vec![])
                })
                .collect::<Result<_, _>>()?;

            Ok(ListResult { items, total })
        })
    }

    fn save(&self, order: &Order) -> Result<(), DomainError> {
        let mut conn = self.pool.get()?;

        conn.transaction::<_, DomainError, _>(|conn| {
            let updated = diesel::update(orders::table.find(order.id))
                .set((
                    orders::email.eq(&order.email),
                    orders::state.eq(&order.state),
                    orders::item_total.eq(&order.item_total),
                    orders::additional_tax_total.eq(&order.additional_tax_total),
                    orders::included_tax_total.eq(&order.included_tax_total),
                    orders::total.eq(order.payable_total()),
                    orders::updated_at.eq(diesel::dsl::now),
                ))
                .execute(conn)?;
            if updated == 0 {
                return Err(DomainError::NotFound);
            }

            for li in &order.line_items {
                diesel::update(line_items::table.find(li.id))
                    .set((
                        line_items::quantity.eq(li.quantity),
                        line_items::price.eq(&li.price),
                    ))
                    .execute(conn)?;
            }

            let rows = adjustment_rows(order);
            let kept: Vec<Uuid> = rows.iter().map(|a| a.id).collect();
            diesel::delete(
                adjustments::table
                    .filter(adjustments::order_id.eq(order.id))
                    .filter(adjustments::id.ne_all(kept)),
            )
            .execute(conn)?;

            if !rows.is_empty() {
                diesel::insert_into(adjustments::table)
                    .values(&rows)
                    .on_conflict(adjustments::id)
                    .do_update()
                    .set((
                        adjustments::kind.eq(excluded(adjustments::kind)),
                        adjustments::originator_id.eq(excluded(adjustments::originator_id)),
                        adjustments::label.eq(excluded(adjustments::label)),
                        adjustments::amount.eq(excluded(adjustments::amount)),
                        adjustments::included_tax.eq(excluded(adjustments::included_tax)),
                        adjustments::updated_at.eq(diesel::dsl::now),
                    ))
                    .execute(conn)?;
            }

            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use bigdecimal::BigDecimal;
    use diesel::prelude::*;
    use uuid::Uuid;

    use super::DieselOrderRepository;
    use crate::application::voucher_adjustments::VoucherAdjustmentsService;
    use crate::domain::order::test_support::line_item;
    use crate::domain::order::Order;
    use crate::domain::ports::{OrderQuery, OrderRepository, OrderScope, OrderSort};
    use crate::domain::tax::TaxRate;
    use crate::domain::voucher::Voucher;
    use crate::infrastructure::models::VoucherRow;
    use crate::infrastructure::test_db::{insert_enterprise, setup_db};
    use crate::schema::vouchers;

    fn query(scope: OrderScope, page: i64, per_page: i64) -> OrderQuery {
        OrderQuery {
            scope,
            distributor_ids: None,
            order_cycle_ids: None,
            sort: OrderSort::NewestFirst,
            page,
            per_page,
        }
    }

    fn order_at(hub: Uuid, number: &str) -> Order {
        let mut order = Order::new(number, "customer@example.com");
        order.distributor_id = Some(hub);
        order.line_items = vec![line_item(110, 1)];
        order.update_order();
        order
    }

    #[tokio::test]
    async fn create_and_find_by_number_roundtrip() {
        let (_container, pool) = setup_db().await;
        let hub = insert_enterprise(&pool, "Hub");
        let repo = DieselOrderRepository::new(pool);
        let mut order = order_at(hub, "R100");
        order.set_shipping_fee("Delivery", BigDecimal::from(50));

        repo.create(&order).expect("create failed");

        let found = repo
            .find_by_number("R100")
            .expect("find failed")
            .expect("order should exist");
        assert_eq!(found.id, order.id);
        assert_eq!(found.line_items.len(), 1);
        assert_eq!(found.total(), BigDecimal::from(160));
        assert!(repo.find_by_number("R404").expect("find failed").is_none());
    }

    #[tokio::test]
    async fn save_persists_recalculated_voucher_adjustments() {
        let (_container, pool) = setup_db().await;
        let hub = insert_enterprise(&pool, "Hub");
        let voucher = Voucher {
            id: Uuid::new_v4(),
            code: "new_code".to_string(),
            enterprise_id: hub,
            amount: BigDecimal::from(10),
        };
        {
            let mut conn = pool.get().expect("Failed to get connection");
            diesel::insert_into(vouchers::table)
                .values(&VoucherRow {
                    id: voucher.id,
                    code: voucher.code.clone(),
                    enterprise_id: voucher.enterprise_id,
                    amount: voucher.amount.clone(),
                })
                .execute(&mut conn)
                .expect("voucher insert failed");
        }
        let repo = DieselOrderRepository::new(pool);
        let mut order = order_at(hub, "R200");
        voucher
            .create_adjustment(&voucher.code, &mut order)
            .expect("voucher applies");
        repo.create(&order).expect("create failed");

        let mut loaded = repo
            .find_by_number("R200")
            .expect("find failed")
            .expect("order should exist");
        loaded.create_tax_charge(&[TaxRate {
            id: Uuid::new_v4(),
            name: "Tax 1".to_string(),
            amount: BigDecimal::from_str("0.10").expect("valid decimal"),
            included_in_price: false,
        }]);
        loaded.set_shipping_fee("Delivery", BigDecimal::from(50));
        loaded.update_order();
        VoucherAdjustmentsService::new(Some(&mut loaded)).calculate();
        repo.save(&loaded).expect("save failed");

        let reloaded = repo
            .find_by_number("R200")
            .expect("find failed")
            .expect("order should exist");
        let adjustment = reloaded.voucher_adjustment().expect("voucher adjustment");
        assert_eq!(adjustment.amount, BigDecimal::from_str("-9.36").expect("valid"));
        let tax = reloaded.voucher_tax_adjustment().expect("voucher tax adjustment");
        assert_eq!(tax.amount, BigDecimal::from_str("-0.64").expect("valid"));
        assert_eq!(reloaded.applied_voucher(), Some(&voucher));
    }

    #[tokio::test]
    async fn list_scopes_and_paginates() {
        let (_container, pool) = setup_db().await;
        let hub = insert_enterprise(&pool, "Hub");
        let other = insert_enterprise(&pool, "Other hub");
        let repo = DieselOrderRepository::new(pool);

        for i in 0..5 {
            repo.create(&order_at(hub, &format!("R{}", i)))
                .expect("create failed");
        }
        repo.create(&order_at(other, "R9")).expect("create failed");

        let page1 = repo
            .list(&query(OrderScope::DistributedBy(vec![hub]), 1, 3))
            .expect("list page 1 failed");
        assert_eq!(page1.total, 5);
        assert_eq!(page1.items.len(), 3);

        let page2 = repo
            .list(&query(OrderScope::DistributedBy(vec![hub]), 2, 3))
            .expect("list page 2 failed");
        assert_eq!(page2.items.len(), 2);

        let all = repo.list(&query(OrderScope::All, 1, 20)).expect("list failed");
        assert_eq!(all.total, 6);

        let beyond = repo
            .list(&query(OrderScope::DistributedBy(vec![hub]), i64::MAX, 100))
            .expect("list past the end failed");
        assert_eq!(beyond.total, 5);
        assert!(beyond.items.is_empty());
    }

    #[tokio::test]
    async fn list_returns_empty_when_no_orders() {
        let (_container, pool) = setup_db().await;
        let repo = DieselOrderRepository::new(pool);

        let result = repo
            .list(&query(OrderScope::EditableBy(vec![Uuid::new_v4()]), 1, 20))
            .expect("list failed");

        assert_eq!(result.total, 0);
        assert!(result.items.is_empty());
    }
}
