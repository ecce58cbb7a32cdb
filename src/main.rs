use axum::serve;
use multitenant_rs::api::routes::create_router;
use multitenant_rs::config::AppConfig;
use multitenant_rs::seed;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file if it exists
    dotenvy::dotenv().ok();

    use env_logger::Builder;
    use log::LevelFilter;

    Builder::new().filter_level(LevelFilter::Info).init();

    println!("multitenant-rs: Tenant Resolution Service");

    // Load configuration
    let config = AppConfig::load()?;
    println!(
        "Configuration loaded: server={}:{}",
        config.server.host, config.server.port
    );

    let state = multitenant_rs::build_state(&config)?;

    // Load seed data for demonstration (optional)
    if std::env::var("LOAD_SEED_DATA").unwrap_or_default() == "true" {
        println!("Loading seed data...");
        seed::load_seed_data(state.store.as_ref()).await?;
        println!("Seed data loaded successfully");
    }

    let app = create_router(state);

    let bind_address = config.server_address();
    let listener = TcpListener::bind(&bind_address).await?;
    println!(
        "multitenant-rs server running on http://{}",
        bind_address
    );

    serve(listener, app).await?;

    Ok(())
}
