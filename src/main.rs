use dotenvy::dotenv;
use hub_order_service::config::AppConfig;
use hub_order_service::{build_server, build_service, create_pool, run_migrations};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let config = AppConfig::from_env().map_err(std::io::Error::other)?;
    let pool = create_pool(&config.database_url).map_err(std::io::Error::other)?;
    run_migrations(&pool).map_err(std::io::Error::other)?;

    log::info!("Starting server at http://{}:{}", config.host, config.port);

    let service = build_service(pool, config.orders_per_page);
    build_server(service, &config.host, config.port)?.await
}
