use actix_web::{web, App, HttpServer};
use docfactory::config::AppConfig;
use docfactory::registry::TemplateRegistry;
use docfactory::services;
use docfactory::state::AppState;
use env_logger::Env;
use log::{error, info};
use std::io;

#[actix_web::main]
async fn main() -> io::Result<()> {
    env_logger::init_from_env(Env::default().default_filter_or("info"));

    let config = AppConfig::from_env().map_err(|e| {
        error!("Invalid configuration: {}", e);
        io::Error::new(io::ErrorKind::InvalidInput, e)
    })?;

    let registry = TemplateRegistry::load(&config.templates_dir).map_err(|e| {
        error!("Could not load the template registry: {}", e);
        io::Error::other(e)
    })?;
    info!(
        "Template registry at {} ({} document types)",
        registry.dir().display(),
        registry.document_types().count()
    );

    let state = AppState::new(registry, config.max_upload_bytes());
    let max_upload_bytes = config.max_upload_bytes();

    info!("Server running at http://{}:{}", config.host, config.port);

    HttpServer::new(move || {
        App::new()
            .app_data(web::JsonConfig::default().limit(max_upload_bytes))
            .app_data(web::PayloadConfig::new(max_upload_bytes))
            .app_data(web::Data::new(state.clone()))
            .service(services::templates::configure_routes())
            .service(services::documents::configure_routes())
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
