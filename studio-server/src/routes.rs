//! API route handlers.
//!
//! Every handler takes the session lock for the duration of its work,
//! except generation, which releases it while waiting on the network.

use std::sync::PoisonError;

use axum::{
    extract::{Path, Query, State},
    http::header,
    response::{Html, IntoResponse, Response},
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use studio_core::{
    ComponentTemplate, EnhancementRequest, EnhancementResponse, GenerationRequest, Panel,
    PropertyValue, PropertyValueMap, Revision, StudioError, StudioState, TemplateCategory,
};

use crate::{ApiError, AppState};

/// Snapshot of the session returned by mutating endpoints.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StateView {
    /// Selected template id.
    pub active_template: Option<String>,
    /// Current property values.
    pub values: PropertyValueMap,
    /// History cursor.
    pub cursor: usize,
    /// Number of revisions.
    pub revision_count: usize,
    /// Whether undo is possible.
    pub can_undo: bool,
    /// Whether redo is possible.
    pub can_redo: bool,
}

impl StateView {
    /// Capture the session state.
    #[must_use]
    pub fn of(studio: &StudioState) -> Self {
        let history = studio.history();
        Self {
            active_template: studio.active_template().map(|t| t.id.clone()),
            values: studio.values().clone(),
            cursor: history.cursor(),
            revision_count: history.len(),
            can_undo: history.can_undo(),
            can_redo: history.can_redo(),
        }
    }
}

/// Result of an undo or redo.
#[derive(Debug, Serialize)]
pub struct StepResult {
    /// Whether the cursor moved.
    pub changed: bool,
    /// Session state afterwards.
    pub state: StateView,
}

/// Revision list with the cursor.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryView {
    /// History cursor.
    pub cursor: usize,
    /// Every revision, oldest first.
    pub revisions: Vec<Revision>,
}

impl HistoryView {
    fn of(studio: &StudioState) -> Self {
        Self {
            cursor: studio.history().cursor(),
            revisions: studio.history().revisions().to_vec(),
        }
    }
}

/// Catalog listing filters.
#[derive(Debug, Default, Deserialize)]
pub struct CatalogQuery {
    /// Free-text search.
    pub q: Option<String>,
    /// Restrict to one category.
    pub category: Option<TemplateCategory>,
}

/// Body of `POST /api/select`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectRequest {
    /// Template to select.
    pub template_id: String,
}

/// Body of `POST /api/property`.
///
/// Either a typed `value` or a `raw` form string, which is validated
/// against the property's panel field.
#[derive(Debug, Deserialize)]
pub struct PropertyEdit {
    /// Property name.
    pub name: String,
    /// Typed value.
    #[serde(default)]
    pub value: Option<PropertyValue>,
    /// Raw form input.
    #[serde(default)]
    pub raw: Option<String>,
}

/// Preview output format.
#[derive(Debug, Default, Deserialize)]
pub struct PreviewQuery {
    /// `html` for the mountable markup; JSON otherwise.
    pub format: Option<String>,
}

/// Result of a successful generation.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateResult {
    /// Always `true`.
    pub success: bool,
    /// Id of the new template.
    pub template_id: String,
    /// Session state afterwards.
    pub state: StateView,
}

/// List catalog entries.
pub async fn list_catalog(
    State(state): State<AppState>,
    Query(query): Query<CatalogQuery>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let studio = state.studio.lock().await;
    let catalog = studio.catalog();
    let hits: Vec<&str> = catalog
        .search(query.q.as_deref().unwrap_or_default())
        .into_iter()
        .map(|t| t.id.as_str())
        .collect();

    let entries: Vec<_> = catalog
        .entries()
        .into_iter()
        .filter(|e| query.category.is_none() || query.category == Some(e.category))
        .filter(|e| hits.contains(&e.id))
        .collect();

    Ok(Json(serde_json::to_value(entries).map_err(StudioError::from)?))
}

/// Get one template, including its body and schema.
pub async fn get_template(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ComponentTemplate>, ApiError> {
    let studio = state.studio.lock().await;
    let template = studio
        .catalog()
        .get(&id)
        .cloned()
        .ok_or(StudioError::TemplateNotFound(id))?;
    Ok(Json(template))
}

/// Select a template.
#[tracing::instrument(name = "select_template", skip(state, body), fields(template = %body.template_id))]
pub async fn select_template(
    State(state): State<AppState>,
    Json(body): Json<SelectRequest>,
) -> Result<Json<StateView>, ApiError> {
    let mut studio = state.studio.lock().await;
    studio.select_template(&body.template_id)?;
    Ok(Json(StateView::of(&studio)))
}

/// Set one property of the selected template.
#[tracing::instrument(name = "set_property", skip(state, body), fields(property = %body.name))]
pub async fn set_property(
    State(state): State<AppState>,
    Json(body): Json<PropertyEdit>,
) -> Result<Json<StateView>, ApiError> {
    let mut studio = state.studio.lock().await;
    let value = match (body.value, body.raw) {
        (Some(value), _) => value,
        (None, Some(raw)) => {
            let panel = studio.panel().ok_or(StudioError::NoSelection)?;
            let field = panel
                .field(&body.name)
                .ok_or_else(|| StudioError::PropertyNotFound(body.name.clone()))?;
            field.parse_input(&raw)?
        }
        (None, None) => {
            return Err(ApiError::BadRequest(
                "either 'value' or 'raw' is required".to_string(),
            ))
        }
    };
    studio.set_property(&body.name, value)?;
    Ok(Json(StateView::of(&studio)))
}

/// Reset the selected template's properties to their defaults.
pub async fn reset_properties(State(state): State<AppState>) -> Result<Json<StateView>, ApiError> {
    let mut studio = state.studio.lock().await;
    studio.reset_properties()?;
    Ok(Json(StateView::of(&studio)))
}

/// Property panel for the selected template.
pub async fn get_panel(State(state): State<AppState>) -> Result<Json<Panel>, ApiError> {
    let studio = state.studio.lock().await;
    Ok(Json(studio.panel().ok_or(StudioError::NoSelection)?))
}

/// Latest preview output.
pub async fn get_preview(
    State(state): State<AppState>,
    Query(query): Query<PreviewQuery>,
) -> Result<Response, ApiError> {
    let output = state
        .preview
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .output()
        .cloned()
        .ok_or(StudioError::NoSelection)?;

    if query.format.as_deref() == Some("html") {
        Ok(Html(output.to_html()).into_response())
    } else {
        Ok(Json(output).into_response())
    }
}

/// Current session state.
pub async fn get_state(State(state): State<AppState>) -> Json<StateView> {
    let studio = state.studio.lock().await;
    Json(StateView::of(&studio))
}

/// Step back one revision.
pub async fn undo(State(state): State<AppState>) -> Json<StepResult> {
    let mut studio = state.studio.lock().await;
    let changed = studio.undo();
    Json(StepResult {
        changed,
        state: StateView::of(&studio),
    })
}

/// Step forward one revision.
pub async fn redo(State(state): State<AppState>) -> Json<StepResult> {
    let mut studio = state.studio.lock().await;
    let changed = studio.redo();
    Json(StepResult {
        changed,
        state: StateView::of(&studio),
    })
}

/// Revision list.
pub async fn get_history(State(state): State<AppState>) -> Json<HistoryView> {
    let studio = state.studio.lock().await;
    Json(HistoryView::of(&studio))
}

/// Jump to a revision.
pub async fn restore_revision(
    State(state): State<AppState>,
    Path(index): Path<usize>,
) -> Result<Json<StateView>, ApiError> {
    let mut studio = state.studio.lock().await;
    studio.restore(index)?;
    Ok(Json(StateView::of(&studio)))
}

/// Star a revision.
pub async fn star_revision(
    State(state): State<AppState>,
    Path(index): Path<usize>,
) -> Result<Json<HistoryView>, ApiError> {
    let mut studio = state.studio.lock().await;
    studio.star(index)?;
    Ok(Json(HistoryView::of(&studio)))
}

/// Remove a revision's star.
pub async fn unstar_revision(
    State(state): State<AppState>,
    Path(index): Path<usize>,
) -> Result<Json<HistoryView>, ApiError> {
    let mut studio = state.studio.lock().await;
    studio.unstar(index)?;
    Ok(Json(HistoryView::of(&studio)))
}

/// Download the revision history.
pub async fn export_history(State(state): State<AppState>) -> impl IntoResponse {
    let document = state.studio.lock().await.export(Utc::now());
    let disposition = format!("attachment; filename=\"{}\"", document.file_name());
    ([(header::CONTENT_DISPOSITION, disposition)], Json(document))
}

/// Generate a component and select it.
///
/// The session lock is released while the generator is working; a newer
/// request started in the meantime makes this one stale.
#[tracing::instrument(name = "generate", skip(state, request))]
pub async fn generate(
    State(state): State<AppState>,
    Json(request): Json<GenerationRequest>,
) -> Result<Json<GenerateResult>, ApiError> {
    if request.description.trim().is_empty() {
        return Err(ApiError::BadRequest("description is required".to_string()));
    }
    let generator = state.generator().ok_or(ApiError::GeneratorUnavailable)?;

    let ticket = state.studio.lock().await.begin_generation();
    let response = generator.generate(&request).await?;

    let mut studio = state.studio.lock().await;
    let template_id = studio.complete_generation(ticket, &request, response)?;
    Ok(Json(GenerateResult {
        success: true,
        template_id,
        state: StateView::of(&studio),
    }))
}

/// Ask the generator for improvement suggestions.
#[tracing::instrument(name = "enhance", skip(state, request))]
pub async fn enhance(
    State(state): State<AppState>,
    Json(request): Json<EnhancementRequest>,
) -> Result<Json<EnhancementResponse>, ApiError> {
    if request.component_code.trim().is_empty() {
        return Err(ApiError::BadRequest("componentCode is required".to_string()));
    }
    let generator = state.generator().ok_or(ApiError::GeneratorUnavailable)?;

    let response = generator.enhance(&request).await?;
    if !response.success {
        let error = response
            .error
            .unwrap_or_else(|| "unknown error".to_string());
        return Err(StudioError::Generation(error).into());
    }
    Ok(Json(response))
}
