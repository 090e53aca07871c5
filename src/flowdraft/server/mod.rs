// SPDX-License-Identifier: MIT

use axum::{
    extract::{rejection::JsonRejection, State},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::adk::error::FlowdraftError;
use crate::flowdraft::config::ServerSettings;
use crate::flowdraft::generator::WorkflowGenerator;
use crate::flowdraft::workflow::Workflow;

pub const LIVENESS_MESSAGE: &str = "Backend is running!";

#[derive(Clone)]
pub struct AppState {
    pub generator: Arc<WorkflowGenerator>,
}

#[derive(Debug, Deserialize)]
pub struct GenerateRequest {
    pub description: String,
}

/// Body of every `/generate_workflow` response
#[derive(Debug, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum GenerateResponse {
    Workflow { workflow: Workflow },
    Error { error: String },
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StatusMessage {
    pub message: String,
}

pub fn router(generator: WorkflowGenerator) -> Router {
    let state = AppState {
        generator: Arc::new(generator),
    };

    Router::new()
        .route("/", get(root))
        .route("/generate_workflow", post(generate_workflow))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

pub async fn serve(
    settings: &ServerSettings,
    generator: WorkflowGenerator,
) -> Result<(), FlowdraftError> {
    let app = router(generator);

    let addr = settings.socket_addr()?;
    log::info!("Listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn root() -> Json<StatusMessage> {
    Json(StatusMessage {
        message: LIVENESS_MESSAGE.to_string(),
    })
}

async fn generate_workflow(
    State(state): State<AppState>,
    payload: Result<Json<GenerateRequest>, JsonRejection>,
) -> Json<GenerateResponse> {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            log::warn!("Rejected request body: {}", rejection.body_text());
            return Json(GenerateResponse::Error {
                error: rejection.body_text(),
            });
        }
    };

    match state.generator.generate(&request.description).await {
        Ok(workflow) => Json(GenerateResponse::Workflow { workflow }),
        Err(e) => {
            log::error!("Workflow generation failed: {}", e);
            Json(GenerateResponse::Error {
                error: e.to_string(),
            })
        }
    }
}
