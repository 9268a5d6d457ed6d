//! JSON shapes returned by the admin API.

pub mod order;
pub mod order_cycle;
