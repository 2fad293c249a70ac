use std::sync::Arc;

use actix_cors::Cors;
use actix_web::middleware::Logger;
use actix_web::{web, App, HttpServer};
use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use pneumo_screen::model::ModelWrapper;
use pneumo_screen::remote::InferenceClient;
use pneumo_screen::{configure, AppState, Classifier, Config, LocalClassifier, Mode, RemoteClassifier};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::parse();

    // The model is loaded once here; a missing artifact stops startup.
    let classifier: Arc<dyn Classifier> = match config.mode {
        Mode::Local => {
            let model = ModelWrapper::load(&config.model, config.layout)
                .with_context(|| format!("cannot start in local mode with {}", config.model.display()))?;
            Arc::new(LocalClassifier::new(Arc::new(model)))
        }
        Mode::Remote => {
            let client = InferenceClient::new(config.endpoint.clone(), config.timeout())?;
            info!(endpoint = %client.endpoint(), timeout_secs = config.timeout_secs, "using remote inference");
            Arc::new(RemoteClassifier::new(client))
        }
    };

    let state = web::Data::new(AppState::new(classifier, config.report_style()));

    info!(bind = %config.bind, mode = ?config.mode, "server running at http://{}", config.bind);

    HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allow_any_method()
            .allow_any_header();

        App::new()
            .wrap(cors)
            .wrap(Logger::default())
            .app_data(state.clone())
            .configure(configure)
    })
    .bind(&config.bind)?
    .run()
    .await?;

    Ok(())
}
