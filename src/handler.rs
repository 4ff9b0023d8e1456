use actix_web::{HttpRequest, HttpResponse, error::JsonPayloadError, web};
use serde::{Deserialize, Serialize};

use crate::AppState;
use crate::error::{GenerateError, ProviderError};

#[derive(Debug, Deserialize)]
pub struct GenerateImageRequest {
    pub prompt: Option<String>,
}

#[derive(Serialize)]
struct HealthResponse<'a> {
    status: &'static str,
    model: &'a str,
    message: &'static str,
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(health)).service(
        web::resource("/generate-image")
            .app_data(json_config())
            .route(web::post().to(generate_image)),
    );
}

/// Malformed or non-JSON bodies answer with the same `{"error": ...}` shape
/// as every other rejection.
fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err: JsonPayloadError, _req: &HttpRequest| {
        tracing::warn!("Rejected generate-image body: {}", err);
        GenerateError::InvalidRequest(format!(
            "request body must be a JSON object with a 'prompt' field: {}",
            err
        ))
        .into()
    })
}

pub async fn health(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(HealthResponse {
        status: "online",
        model: state.image_client.model(),
        message: "Trex AI Image Generator is running 🦖🔥",
    })
}

fn validate_prompt(prompt: Option<String>) -> Result<String, GenerateError> {
    match prompt {
        Some(p) if !p.is_empty() => Ok(p),
        Some(_) => Err(GenerateError::InvalidRequest(
            "prompt must not be empty".to_string(),
        )),
        None => Err(GenerateError::InvalidRequest(
            "prompt is required".to_string(),
        )),
    }
}

pub async fn generate_image(
    state: web::Data<AppState>,
    body: web::Json<GenerateImageRequest>,
) -> Result<HttpResponse, GenerateError> {
    let prompt = validate_prompt(body.into_inner().prompt).inspect_err(|e| {
        tracing::warn!("Rejected generate-image request: {}", e);
    })?;

    tracing::info!("Generating image for: {}", prompt);

    // Dropping this future (client disconnect or deadline) aborts the
    // outbound provider call.
    let deadline = state.config.generation_timeout;
    let result = tokio::time::timeout(deadline, state.image_client.generate_image(&prompt))
        .await
        .unwrap_or(Err(ProviderError::Timeout(deadline)));

    let images = result.map_err(|e| {
        tracing::error!("Image generation failed for '{}': {}", prompt, e);
        GenerateError::from(e)
    })?;

    let image = images.into_first().ok_or_else(|| {
        tracing::error!("No image data returned for '{}'", prompt);
        GenerateError::NoImageProduced
    })?;

    tracing::info!(
        "Generated {} bytes ({}) for: {}",
        image.bytes.len(),
        image.mime_type,
        prompt
    );

    Ok(HttpResponse::Ok().content_type("image/png").body(image.bytes))
}
