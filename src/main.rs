use crate::app::App;
use crate::config::AppConfig;
use crate::db::init_db;
use crate::responses::html_error_response;
use crate::router::handle;
use astra::Server;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

mod app;
mod auth;
mod config;
mod db;
mod domain;
mod errors;
mod geo;
mod messages;
mod notifier;
mod responses;
mod router;
mod templates;

#[cfg(test)]
mod tests;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("booking_desk=info")),
        )
        .init();

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("configuration error: {e}");
            std::process::exit(1);
        }
    };

    let app = App::new(config);

    if let Err(e) = init_db(&app.db, &app.config.schema_path) {
        error!("database initialization failed: {e}");
        std::process::exit(1);
    }

    let addr = app.config.bind_addr;
    info!(%addr, workers = app.config.max_workers, "starting server");

    let server = Server::bind(&addr).max_workers(app.config.max_workers);

    let result = server.serve(move |req, _info| match handle(req, &app) {
        Ok(resp) => resp,
        Err(err) => html_error_response(err),
    });

    if let Err(e) = result {
        error!("server ended with error: {e}");
    }

    info!("server shut down cleanly");
}
