use checkout_service::config::AppConfig;
use checkout_service::{build_server, create_pool, run_migrations, AppState};
use dotenvy::dotenv;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let config = AppConfig::from_env().unwrap_or_else(|e| {
        log::error!("Invalid configuration: {e}");
        std::process::exit(1);
    });

    let pool = create_pool(&config.database_url, config.pool_size);
    run_migrations(&pool);

    let state = AppState::new(pool, &config).unwrap_or_else(|e| {
        log::error!("Could not set up the payment provider client: {e}");
        std::process::exit(1);
    });

    log::info!("Starting server at http://{}:{}", config.host, config.port);
    log::info!("API docs at http://{}:{}/swagger-ui/", config.host, config.port);

    build_server(state, &config.host, config.port)?.await
}
