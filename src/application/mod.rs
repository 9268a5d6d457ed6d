pub mod admin_orders;
pub mod invoice;
pub mod voucher_adjustments;
