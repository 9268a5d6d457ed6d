use diesel::prelude::*;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::db::DbPool;
use crate::domain::errors::DomainError;
use crate::domain::order::Order;
use crate::domain::ports::{Invoice, OrderMailer};
use crate::schema::order_outbox;

use super::models::NewOutboxEventRow;

pub const CONFIRM_EMAIL_EVENT: &str = "ConfirmEmailForCustomer";
pub const INVOICE_EMAIL_EVENT: &str = "InvoiceEmail";

/// Queues order emails as outbox rows. Debezium's EventRouter SMT derives the
/// Kafka topic from `aggregate_type`; a mail worker consumes the topic.
pub struct OutboxOrderMailer {
    pool: DbPool,
}

impl OutboxOrderMailer {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn enqueue(&self, order: &Order, event_type: &str, payload: Value) -> Result<(), DomainError> {
        let mut conn = self.pool.get()?;

        diesel::insert_into(order_outbox::table)
            .values(&NewOutboxEventRow {
                id: Uuid::new_v4(),
                aggregate_type: "Order".to_string(),
                aggregate_id: order.id.to_string(),
                event_type: event_type.to_string(),
                payload,
            })
            .execute(&mut conn)?;

        log::debug!("queued {} for order {}", event_type, order.number);
        Ok(())
    }
}

impl OrderMailer for OutboxOrderMailer {
    fn confirm_email_for_customer(&self, order: &Order, resend: bool) -> Result<(), DomainError> {
        self.enqueue(
            order,
            CONFIRM_EMAIL_EVENT,
            json!({
                "order_id": order.id,
                "number": order.number,
                "email": order.email,
                "total": order.payable_total().to_string(),
                "resend": resend
            }),
        )
    }

    fn invoice_email(&self, order: &Order, invoice: &Invoice) -> Result<(), DomainError> {
        self.enqueue(
            order,
            INVOICE_EMAIL_EVENT,
            json!({
                "order_id": order.id,
                "number": order.number,
                "email": order.email,
                "attachment": {
                    "filename": invoice.filename,
                    "content_type": invoice.content_type,
                    "body": invoice.body
                }
            }),
        )
    }
}

#[cfg(test)]
mod tests {
    use diesel::prelude::*;

    use super::{OutboxOrderMailer, CONFIRM_EMAIL_EVENT, INVOICE_EMAIL_EVENT};
    use crate::application::invoice::HtmlInvoiceRenderer;
    use crate::domain::order::test_support::{line_item, order_with_line_items};
    use crate::domain::ports::{InvoiceRenderer, OrderMailer};
    use crate::infrastructure::models::OutboxEventRow;
    use crate::infrastructure::test_db::setup_db;
    use crate::schema::order_outbox;

    #[tokio::test]
    async fn writes_one_outbox_event_per_email() {
        let (_container, pool) = setup_db().await;
        let mailer = OutboxOrderMailer::new(pool.clone());
        let order = order_with_line_items(vec![line_item(10, 2)]);
        let invoice = HtmlInvoiceRenderer.render(&order).expect("renders");

        mailer
            .confirm_email_for_customer(&order, true)
            .expect("confirm failed");
        mailer.invoice_email(&order, &invoice).expect("invoice failed");

        let mut conn = pool.get().expect("Failed to get connection");
        let events: Vec<OutboxEventRow> = order_outbox::table
            .filter(order_outbox::aggregate_id.eq(order.id.to_string()))
            .order(order_outbox::created_at.asc())
            .select(OutboxEventRow::as_select())
            .load(&mut conn)
            .expect("query failed");

        assert_eq!(events.len(), 2);
        assert!(events.iter().all(|e| e.aggregate_type == "Order"));
        let confirm = events
            .iter()
            .find(|e| e.event_type == CONFIRM_EMAIL_EVENT)
            .expect("confirm event");
        assert_eq!(confirm.payload["resend"], true);
        let invoice_event = events
            .iter()
            .find(|e| e.event_type == INVOICE_EMAIL_EVENT)
            .expect("invoice event");
        assert_eq!(
            invoice_event.payload["attachment"]["filename"],
            format!("invoice-{}.html", order.number)
        );
    }
}
