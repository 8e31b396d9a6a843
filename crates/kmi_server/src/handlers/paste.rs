//! Paste create and fetch handlers.

use crate::error::ApiError;
use crate::AppState;
use axum::extract::{FromRequest, Host, Multipart, Path, Request, State};
use axum::Form;
use hyper::header;
use kmi_core::ident;
use serde::Deserialize;

/// Request field carrying the paste payload.
const PAYLOAD_FIELD: &str = "kmi";

#[derive(Deserialize)]
struct CreateForm {
    kmi: Option<String>,
}

/// Create a paste and return its locator.
///
/// The payload comes from a multipart part or an urlencoded form field
/// named `kmi`. The locator embeds the request's `Host` header so the
/// returned URL is valid from the client's point of view.
///
/// # Errors
/// Returns a client error when the payload field is absent; no store state
/// changes in that case.
pub async fn create_paste(
    State(state): State<AppState>,
    Host(host): Host,
    request: Request,
) -> Result<String, ApiError> {
    let text = extract_payload(request).await?;

    let id = state
        .store
        .insert_generated(&text, state.config.ttl, state.config.collision_retries);
    tracing::info!(%id, bytes = text.len(), "paste created");

    Ok(format!("http://{}/{}", host, id))
}

/// Fetch a paste by identifier.
///
/// # Errors
/// Returns not-found for unknown ids and for tokens that do not have the
/// identifier shape.
pub async fn fetch_paste(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<String, ApiError> {
    if !ident::is_valid_token(&id) {
        return Err(ApiError::NotFound);
    }
    state
        .store
        .get(&id)
        .map(|text| text.to_string())
        .ok_or(ApiError::NotFound)
}

/// Pull the `kmi` payload out of a multipart or urlencoded request body.
async fn extract_payload(request: Request) -> Result<String, ApiError> {
    let content_type = request
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_string();

    if content_type.starts_with("multipart/form-data") {
        let mut multipart = Multipart::from_request(request, &())
            .await
            .map_err(|_| missing_field())?;
        while let Some(field) = multipart.next_field().await.map_err(|_| missing_field())? {
            if field.name() == Some(PAYLOAD_FIELD) {
                return field.text().await.map_err(|_| missing_field());
            }
        }
        return Err(missing_field());
    }

    if content_type.starts_with("application/x-www-form-urlencoded") {
        let Form(form) = Form::<CreateForm>::from_request(request, &())
            .await
            .map_err(|_| missing_field())?;
        return form.kmi.ok_or_else(missing_field);
    }

    Err(missing_field())
}

fn missing_field() -> ApiError {
    ApiError::BadRequest(format!("No '{}' field provided", PAYLOAD_FIELD))
}
