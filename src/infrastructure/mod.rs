pub mod models;
pub mod order_cycle_repo;
pub mod order_repo;
pub mod outbox_mailer;
pub mod tax_rate_repo;
pub mod user_repo;

#[cfg(test)]
pub(crate) mod test_db;
