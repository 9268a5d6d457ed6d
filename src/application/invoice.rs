use std::fmt::Write;

use bigdecimal::{BigDecimal, Zero};

use crate::domain::errors::DomainError;
use crate::domain::order::Order;
use crate::domain::ports::{Invoice, InvoiceRenderer};

/// Renders a self-contained HTML invoice for emailing to the customer.
#[derive(Debug, Default, Clone)]
pub struct HtmlInvoiceRenderer;

impl InvoiceRenderer for HtmlInvoiceRenderer {
    fn render(&self, order: &Order) -> Result<Invoice, DomainError> {
        let mut body = String::new();
        write_invoice(&mut body, order).map_err(|e| DomainError::Internal(e.to_string()))?;

        Ok(Invoice {
            filename: format!("invoice-{}.html", order.number),
            content_type: "text/html; charset=utf-8".to_string(),
            body,
        })
    }
}

fn write_invoice(out: &mut String, order: &Order) -> std::fmt::Result {
    writeln!(out, "<!DOCTYPE html>")?;
    writeln!(
        out,
        "<html><head><meta charset=\"UTF-8\"><title>Invoice {}</title></head><body>",
        escape(&order.number)
    )?;
    writeln!(out, "<h1>Invoice {}</h1>", escape(&order.number))?;
    writeln!(out, "<p>{}</p>", escape(&order.email))?;
    writeln!(out, "<p>{}</p>", order.created_at.format("%Y-%m-%d"))?;

    writeln!(out, "<table class=\"line-items\">")?;
    writeln!(out, "<tr><th>Item</th><th>Qty</th><th>Price</th><th>Total</th></tr>")?;
    for li in &order.line_items {
        writeln!(
            out,
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
            li.variant_id,
            li.quantity,
            li.price,
            li.amount()
        )?;
    }
    writeln!(out, "</table>")?;

    writeln!(out, "<table class=\"adjustments\">")?;
    for adjustment in &order.adjustments {
        writeln!(
            out,
            "<tr><td>{}</td><td>{}</td></tr>",
            escape(&adjustment.label),
            adjustment.amount
        )?;
    }
    writeln!(out, "</table>")?;

    writeln!(out, "<p class=\"item-total\">Item total: {}</p>", order.item_total)?;
    if order.included_tax_total > BigDecimal::zero() {
        writeln!(out, "<p class=\"included-tax\">Includes tax: {}</p>", order.included_tax_total)?;
    }
    writeln!(out, "<p class=\"total\">Total: {}</p>", order.payable_total())?;
    writeln!(out, "</body></html>")
}

fn escape(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            c => escaped.push(c),
        }
    }
    escaped
}
