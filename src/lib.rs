pub mod application;
pub mod config;
pub mod db;
pub mod domain;
pub mod errors;
pub mod handlers;
pub mod infrastructure;
pub mod schema;
pub mod serializers;

#[cfg(test)]
mod testing;

use std::sync::Arc;

use actix_web::{middleware::Logger, web, App, HttpServer};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};

use application::admin_orders::{AdminOrderService, Ports};
use application::invoice::HtmlInvoiceRenderer;
use domain::errors::DomainError;
use infrastructure::order_cycle_repo::DieselOrderCycleRepository;
use infrastructure::order_repo::DieselOrderRepository;
use infrastructure::outbox_mailer::OutboxOrderMailer;
use infrastructure::tax_rate_repo::DieselTaxRateRepository;
use infrastructure::user_repo::DieselUserRepository;

pub use db::{create_pool, DbPool};

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Run any pending Diesel migrations against the pool's database.
pub fn run_migrations(pool: &DbPool) -> Result<(), DomainError> {
    let mut conn = pool.get()?;
    conn.run_pending_migrations(MIGRATIONS)
        .map_err(|e| DomainError::Internal(e.to_string()))?;
    Ok(())
}

/// Wire the admin order service to the Postgres-backed adapters.
pub fn build_service(pool: DbPool, orders_per_page: i64) -> AdminOrderService {
    let ports = Ports {
        orders: Arc::new(DieselOrderRepository::new(pool.clone())),
        order_cycles: Arc::new(DieselOrderCycleRepository::new(pool.clone())),
        tax_rates: Arc::new(DieselTaxRateRepository::new(pool.clone())),
        users: Arc::new(DieselUserRepository::new(pool.clone())),
        mailer: Arc::new(OutboxOrderMailer::new(pool)),
        invoices: Arc::new(HtmlInvoiceRenderer),
    };
    AdminOrderService::new(ports, orders_per_page)
}

/// Register every route. The `AdminOrderService` is expected as app data.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/admin")
            .service(
                web::scope("/orders")
                    .route("", web::get().to(handlers::orders::index))
                    .route("/managed", web::get().to(handlers::orders::managed))
                    .route("/{number}", web::put().to(handlers::orders::update))
                    .route("/{number}/resend", web::post().to(handlers::orders::resend))
                    .route("/{number}/invoice", web::post().to(handlers::orders::invoice)),
            )
            .route(
                "/order_cycles/{id}",
                web::get().to(handlers::order_cycles::show),
            ),
    )
    .route("/api-docs/openapi.json", web::get().to(handlers::openapi_json));
}

/// Build and return an actix-web `Server` bound to `host:port`.
///
/// The caller is responsible for `.await`-ing (or `tokio::spawn`-ing) the
/// returned server.
pub fn build_server(
    service: AdminOrderService,
    host: &str,
    port: u16,
) -> std::io::Result<actix_web::dev::Server> {
    let service = web::Data::new(service);
    Ok(HttpServer::new(move || {
        App::new()
            .app_data(service.clone())
            .wrap(Logger::default())
            .configure(configure)
    })
    .bind((host.to_string(), port))?
    .run())
}
