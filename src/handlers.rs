use std::sync::Arc;

use anyhow::{anyhow, bail, Context};
use axum::body::Bytes;
use axum::extract::multipart::MultipartRejection;
use axum::extract::rejection::HostRejection;
use axum::extract::{Host, Multipart, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use log::info;

use crate::dispatch::dispatch;
use crate::error::AppError;
use crate::gateway::CallGateway;
use crate::storage::UploadStore;
use crate::types::{BroadcastRequest, SendVoiceResponse, StatusResponse};

pub struct AppState {
    pub gateway: Arc<dyn CallGateway>,
    pub uploads: UploadStore,
    pub public_base_url: Option<String>,
}

struct AudioUpload {
    file_name: Option<String>,
    contents: Bytes,
}

/// Decodes the `phoneNumbers` field: a non-empty JSON array of strings.
pub fn parse_destinations(raw: &str) -> anyhow::Result<Vec<String>> {
    let numbers: Vec<String> = serde_json::from_str(raw)
        .context("phoneNumbers must be a JSON array of strings")?;
    if numbers.is_empty() {
        bail!("phoneNumbers must contain at least one number");
    }
    Ok(numbers)
}

fn public_base(state: &AppState, host: Option<&str>) -> anyhow::Result<String> {
    if let Some(base) = &state.public_base_url {
        return Ok(base.clone());
    }
    let host = host
        .filter(|h| !h.is_empty())
        .ok_or_else(|| anyhow!("cannot determine public host"))?;
    Ok(format!("https://{}", host))
}

pub async fn send_voice(
    State(state): State<Arc<AppState>>,
    host: Result<Host, HostRejection>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<impl IntoResponse, AppError> {
    let mut multipart = multipart?;
    let mut audio = None;
    let mut phone_numbers = None;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().map(str::to_owned);
        match name.as_deref() {
            Some("audio") => {
                let file_name = field.file_name().map(str::to_owned);
                let contents = field.bytes().await?;
                audio = Some(AudioUpload {
                    file_name,
                    contents,
                });
            }
            Some("phoneNumbers") => phone_numbers = Some(field.text().await?),
            _ => {}
        }
    }

    let audio = audio.ok_or_else(|| anyhow!("missing audio file"))?;
    let phone_numbers = phone_numbers.ok_or_else(|| anyhow!("missing phoneNumbers"))?;
    let destinations = parse_destinations(&phone_numbers)?;
    let host = host.ok().map(|Host(host)| host);
    let base = public_base(&state, host.as_deref())?;

    let stored = state
        .uploads
        .save(audio.file_name.as_deref(), &audio.contents)
        .await?;
    let request = BroadcastRequest {
        audio_url: format!("{}/uploads/{}", base, stored.file_name),
        destinations,
    };

    info!(
        "Broadcasting {} to {} number(s)",
        request.audio_url,
        request.destinations.len()
    );
    let report = dispatch(state.gateway.as_ref(), &request).await;

    Ok((
        StatusCode::OK,
        Json(SendVoiceResponse {
            success: true,
            results: report.outcomes,
        }),
    ))
}

pub async fn status() -> impl IntoResponse {
    Json(StatusResponse {
        status: "online".to_string(),
    })
}
