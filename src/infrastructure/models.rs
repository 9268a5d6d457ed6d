use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::schema::{
    adjustments, enterprise_fees, exchanges, line_items, order_cycles, order_outbox, orders,
    tax_rates, users, variants, vouchers,
};

#[derive(Debug, Clone, Serialize, Deserialize, Queryable, Selectable, Identifiable)]
#[diesel(table_name = orders)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct OrderRow {
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
    pub total: BigDecimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = orders)]
pub struct NewOrderRow {
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
    pub total: BigDecimal,
    pub created_at: DateTime<Utc>,
}

#[derive(
    Debug, Clone, Serialize, Deserialize, Queryable, Selectable, Identifiable, Associations,
)]
#[diesel(table_name = line_items)]
#[diesel(belongs_to(OrderRow, foreign_key = order_id))]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct LineItemRow {
    pub id: Uuid,
    pub order_id: Uuid,
    pub variant_id: Uuid,
    pub quantity: i32,
    pub price: BigDecimal,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = line_items)]
pub struct NewLineItemRow {
    pub id: Uuid,
    pub order_id: Uuid,
    pub variant_id: Uuid,
    pub quantity: i32,
    pub price: BigDecimal,
}

#[derive(
    Debug, Clone, Serialize, Deserialize, Queryable, Selectable, Identifiable, Associations,
)]
#[diesel(table_name = adjustments)]
#[diesel(belongs_to(OrderRow, foreign_key = order_id))]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct AdjustmentRow {
    pub id: Uuid,
    pub order_id: Uuid,
    pub originator_id: Option<Uuid>,
    pub kind: String,
    pub label: String,
    pub amount: BigDecimal,
    pub included_tax: BigDecimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = adjustments)]
pub struct NewAdjustmentRow {
    pub id: Uuid,
    pub order_id: Uuid,
    pub originator_id: Option<Uuid>,
    pub kind: String,
    pub label: String,
    pub amount: BigDecimal,
    pub included_tax: BigDecimal,
}

#[derive(Debug, Clone, Queryable, Selectable, Identifiable, Insertable)]
#[diesel(table_name = vouchers)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct VoucherRow {
    pub id: Uuid,
    pub code: String,
    pub enterprise_id: Uuid,
    pub amount: BigDecimal,
}

#[derive(Debug, Clone, Queryable, Selectable, Identifiable, Insertable)]
#[diesel(table_name = order_cycles)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct OrderCycleRow {
    pub id: Uuid,
    pub name: String,
    pub orders_open_at: Option<DateTime<Utc>>,
    pub orders_close_at: Option<DateTime<Utc>>,
    pub coordinator_id: Uuid,
}

#[derive(Debug, Clone, Queryable, Selectable, Identifiable, Insertable)]
#[diesel(table_name = exchanges)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ExchangeRow {
    pub id: Uuid,
    pub order_cycle_id: Uuid,
    pub sender_id: Uuid,
    pub receiver_id: Uuid,
    pub incoming: bool,
    pub pickup_time: Option<String>,
    pub pickup_instructions: Option<String>,
}

#[derive(Debug, Clone, Queryable, Selectable, Identifiable, Insertable)]
#[diesel(table_name = enterprise_fees)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct EnterpriseFeeRow {
    pub id: Uuid,
    pub enterprise_id: Uuid,
    pub name: String,
    pub calculator_type: String,
    pub calculator_amount: BigDecimal,
}

#[derive(Debug, Clone, Queryable, Selectable, Identifiable, Insertable)]
#[diesel(table_name = tax_rates)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TaxRateRow {
    pub id: Uuid,
    pub name: String,
    pub amount: BigDecimal,
    pub included_in_price: bool,
}

#[derive(Debug, Clone, Queryable, Selectable, Identifiable, Insertable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct UserRow {
    pub id: Uuid,
    pub email: String,
    pub api_key: Option<String>,
    pub admin: bool,
}

#[derive(Debug, Clone, Queryable, Selectable, Identifiable, Insertable)]
#[diesel(table_name = variants)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct VariantRow {
    pub id: Uuid,
    pub supplier_id: Uuid,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Queryable, Selectable, Identifiable)]
#[diesel(table_name = order_outbox)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct OutboxEventRow {
    pub id: Uuid,
    pub aggregate_type: String,
    pub aggregate_id: String,
    pub event_type: String,
    pub payload: Value,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = order_outbox)]
pub struct NewOutboxEventRow {
    pub id: Uuid,
    pub aggregate_type: String,
    pub aggregate_id: String,
    pub event_type: String,
    pub payload: Value,
}
