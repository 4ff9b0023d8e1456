use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{App, HttpServer, middleware, web};

mod config;
mod error;
mod gemini;
mod handler;
#[cfg(test)]
mod mock;
mod provider;

use config::Config;
use gemini::GeminiImageClient;
use provider::ImageGenerationClient;

pub struct AppState {
    pub config: Config,
    pub image_client: Arc<dyn ImageGenerationClient>,
}

fn init_tracing() {
    // Routes actix's `log` records (request logger) into tracing.
    if let Err(e) = tracing_log::LogTracer::init() {
        eprintln!("log bridge already installed: {}", e);
    }

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "trex_image_gen=debug,actix_web=info".into()),
        )
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("tracing subscriber already installed: {}", e);
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();

    init_tracing();

    let config = Config::from_env().map_err(|e| {
        tracing::error!("Invalid configuration: {}", e);
        std::io::Error::new(std::io::ErrorKind::InvalidInput, e)
    })?;
    let port = config.port;

    let image_client = GeminiImageClient::new(&config).map_err(|e| {
        tracing::error!("Failed to build Gemini client: {}", e);
        std::io::Error::other(e)
    })?;

    tracing::info!("trex-image-gen starting");
    tracing::info!("  Model: {}", image_client.model());
    tracing::info!("  Gemini API: {}", config.gemini_base_url);
    tracing::info!(
        "  Generation timeout: {}s",
        config.generation_timeout.as_secs()
    );

    let state = web::Data::new(AppState {
        config,
        image_client: Arc::new(image_client),
    });

    tracing::info!("Listening on 0.0.0.0:{}", port);

    HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allow_any_method()
            .allow_any_header()
            .expose_any_header();

        App::new()
            .app_data(state.clone())
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .configure(handler::configure)
    })
    .bind(format!("0.0.0.0:{}", port))?
    .run()
    .await?;

    tracing::info!("Shutting down");

    Ok(())
}
