use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;

use checkin_server::config::Config;
use checkin_server::inject::inject_placeholders;
use checkin_server::state::AppState;
use checkin_server::store::PgStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init();

    let config = Config::load()?;

    let store = PgStore::connect(&config.database_url)
        .await
        .context("Could not connect to the database")?;
    log::info!("Connected to database");
    store
        .migrate()
        .await
        .context("Could not apply database migrations")?;

    match inject_placeholders(&config.assets_dir(), &config.placeholders()).await {
        Ok(count) => log::info!("Injected {} frontend placeholder(s)", count),
        Err(err) => log::warn!("Placeholder injection failed: {:#}", err),
    }

    let routes = config.routes();
    let state = AppState::new(Arc::new(store), config.frontend_dir.clone());
    let app = checkin_server::app(state, &routes);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    log::info!("Starting check-in HTTP server on http://{}", addr);
    log::info!("Students at {}, check-ins at {}", routes.students, routes.checkins);
    axum::Server::bind(&addr)
        .serve(app.into_make_service())
        .await?;
    Ok(())
}
