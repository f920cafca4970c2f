use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use crate::application::ports::{
    DocumentDeliveryError, FolderSummary, ROOT_FOLDER_ID, SiteSummary,
};
use crate::presentation::state::AppState;

use super::error_response::error_response;

#[derive(Serialize)]
pub struct SiteResponse {
    pub id: String,
    pub name: String,
    pub display_name: Option<String>,
    pub web_url: Option<String>,
}

impl From<SiteSummary> for SiteResponse {
    fn from(site: SiteSummary) -> Self {
        Self {
            id: site.id,
            name: site.name,
            display_name: site.display_name,
            web_url: site.web_url,
        }
    }
}

#[derive(Serialize)]
pub struct FolderResponse {
    pub id: String,
    pub name: String,
    pub child_count: Option<u64>,
}

impl From<FolderSummary> for FolderResponse {
    fn from(folder: FolderSummary) -> Self {
        Self {
            id: folder.id,
            name: folder.name,
            child_count: folder.child_count,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct FolderQuery {
    pub parent_id: Option<String>,
}

fn not_configured() -> Response {
    error_response(
        StatusCode::SERVICE_UNAVAILABLE,
        "SharePoint integration is not configured",
    )
}

fn upstream_failure(e: DocumentDeliveryError) -> Response {
    tracing::error!(error = %e, "SharePoint request failed");
    error_response(
        StatusCode::BAD_GATEWAY,
        format!("SharePoint request failed: {}", e),
    )
}

#[tracing::instrument(skip(state))]
pub async fn list_sites_handler(State(state): State<AppState>) -> Response {
    let Some(delivery) = &state.document_delivery else {
        return not_configured();
    };

    match delivery.list_sites().await {
        Ok(sites) => {
            let body: Vec<SiteResponse> = sites.into_iter().map(SiteResponse::from).collect();
            (StatusCode::OK, Json(body)).into_response()
        }
        Err(e) => upstream_failure(e),
    }
}

#[tracing::instrument(skip(state))]
pub async fn list_folders_handler(
    State(state): State<AppState>,
    Path(site_id): Path<String>,
    Query(query): Query<FolderQuery>,
) -> Response {
    let Some(delivery) = &state.document_delivery else {
        return not_configured();
    };

    let parent_id = query.parent_id.as_deref().unwrap_or(ROOT_FOLDER_ID);
    match delivery.list_folders(&site_id, parent_id).await {
        Ok(folders) => {
            let body: Vec<FolderResponse> =
                folders.into_iter().map(FolderResponse::from).collect();
            (StatusCode::OK, Json(body)).into_response()
        }
        Err(e) => upstream_failure(e),
    }
}
