pub mod errors;
pub mod fees;
pub mod money;
pub mod order;
pub mod order_cycle;
pub mod ports;
pub mod tax;
pub mod user;
pub mod voucher;
