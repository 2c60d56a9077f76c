mod config;
mod db;
mod error;
mod middleware;
mod models;
mod routes;
mod services;
mod utils;

#[cfg(test)]
mod test_support;

use std::io;

use actix_web::{middleware::Logger, web, App, HttpServer};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use config::{AppConfig, LogFormat};

const DEFAULT_LOG_FILTER: &str = "coffee_journal_backend=info,actix_web=info";

fn init_tracing(format: LogFormat) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    match format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Pretty => builder.init(),
    }
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Invalid configuration: {e}");
            return Err(io::Error::other(e));
        }
    };

    init_tracing(config.log_format);

    info!("connecting to database");
    let db = db::establish_connection(&config.database)
        .await
        .map_err(io::Error::other)?;
    db::init_schema(&db).await.map_err(io::Error::other)?;

    let mailer = services::mailer::build_mailer(config.mail.as_ref()).map_err(io::Error::other)?;
    if config.mail.is_none() {
        info!("MAIL_API_KEY not set, tokens will only be logged");
    }
    if config.admin_key.is_none() {
        info!("ADMIN_KEY not set, admin endpoints are disabled");
    }

    let bind = (config.server.host.clone(), config.server.port);
    let json_limit = config.server.json_limit;

    let db_data = web::Data::new(db.clone());
    let mailer_data = web::Data::from(mailer);
    let config_data = web::Data::new(config);

    info!(host = %bind.0, port = bind.1, "starting server");

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .app_data(db_data.clone())
            .app_data(mailer_data.clone())
            .app_data(config_data.clone())
            .app_data(routes::json_config(json_limit))
            .configure(routes::configure_routes)
    })
        .bind(bind)?
        .run()
        .await?;

    if let Err(e) = db::close(db).await {
        error!(error = %e, "failed to close database cleanly");
    }

    Ok(())
}
