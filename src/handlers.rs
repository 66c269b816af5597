use crate::errors::AppError;
use crate::form::FormView;
use crate::state::{AppState, HostedForm};
use crate::tasks::TaskInput;
use crate::ui::render_form;
use axum::{
    Form, Json,
    extract::{Path, State},
    response::{Html, Redirect},
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

type FormFields = HashMap<String, String>;

#[derive(Debug, Deserialize)]
pub struct CredentialRequest {
    pub credential: String,
}

#[derive(Debug, Deserialize)]
pub struct ActionRequest {
    pub action: String,
}

#[derive(Debug, Serialize)]
pub struct ClockResponse {
    pub time_now: String,
}

pub async fn index(State(state): State<AppState>) -> Html<String> {
    let mut form = state.form.lock().await;
    let view = form.take_view();
    Html(render_form(&view, &state.widget))
}

pub async fn sign_in(
    State(state): State<AppState>,
    Form(input): Form<CredentialRequest>,
) -> Redirect {
    let mut form = state.form.lock().await;
    if let Err(err) = form.handle_credential(&input.credential, Utc::now()).await {
        debug!("sign-in rejected: {err}");
    }
    Redirect::to("/")
}

pub async fn change_action(
    State(state): State<AppState>,
    Form(fields): Form<FormFields>,
) -> Redirect {
    let mut form = state.form.lock().await;
    apply_fields(&mut form, &fields).await;
    Redirect::to("/")
}

pub async fn add_task(State(state): State<AppState>, Form(fields): Form<FormFields>) -> Redirect {
    let mut form = state.form.lock().await;
    apply_fields(&mut form, &fields).await;
    if let Err(err) = form.add_task_block().await {
        debug!("task block not added: {err}");
    }
    Redirect::to("/")
}

pub async fn remove_task(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    Form(fields): Form<FormFields>,
) -> Redirect {
    let mut form = state.form.lock().await;
    apply_fields(&mut form, &fields).await;
    if let Err(err) = form.remove_task_block(id) {
        debug!("{err}");
    }
    Redirect::to("/")
}

pub async fn submit(
    State(state): State<AppState>,
    Form(fields): Form<FormFields>,
) -> Result<Redirect, AppError> {
    submit_to_completion(&state, Some(fields)).await?;
    Ok(Redirect::to("/"))
}

pub async fn get_form(State(state): State<AppState>) -> Json<FormView> {
    Json(state.form.lock().await.take_view())
}

pub async fn get_clock(State(state): State<AppState>) -> Json<ClockResponse> {
    let time_now = state.form.lock().await.view().time_now;
    Json(ClockResponse { time_now })
}

pub async fn api_sign_in(
    State(state): State<AppState>,
    Json(input): Json<CredentialRequest>,
) -> Json<FormView> {
    let mut form = state.form.lock().await;
    if let Err(err) = form.handle_credential(&input.credential, Utc::now()).await {
        debug!("sign-in rejected: {err}");
    }
    Json(form.take_view())
}

pub async fn api_set_action(
    State(state): State<AppState>,
    Json(input): Json<ActionRequest>,
) -> Json<FormView> {
    let mut form = state.form.lock().await;
    if let Err(err) = form.set_action(&input.action).await {
        debug!("action change incomplete: {err}");
    }
    Json(form.take_view())
}

pub async fn api_add_task(State(state): State<AppState>) -> Json<FormView> {
    let mut form = state.form.lock().await;
    if let Err(err) = form.add_task_block().await {
        debug!("task block not added: {err}");
    }
    Json(form.take_view())
}

pub async fn api_update_task(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    Json(input): Json<TaskInput>,
) -> Result<Json<FormView>, AppError> {
    let mut form = state.form.lock().await;
    form.update_task_block(id, input)?;
    Ok(Json(form.take_view()))
}

pub async fn api_remove_task(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<FormView>, AppError> {
    let mut form = state.form.lock().await;
    form.remove_task_block(id)?;
    Ok(Json(form.take_view()))
}

pub async fn api_submit(State(state): State<AppState>) -> Result<Json<FormView>, AppError> {
    submit_to_completion(&state, None).await?;
    Ok(Json(state.form.lock().await.take_view()))
}

/// Runs the submission on its own task so a dropped request cannot leave it half done.
async fn submit_to_completion(state: &AppState, fields: Option<FormFields>) -> Result<(), AppError> {
    let form = Arc::clone(&state.form);
    tokio::spawn(async move {
        let mut form = form.lock().await;
        if let Some(fields) = fields {
            apply_fields(&mut form, &fields).await;
        }
        if let Err(err) = form.submit().await {
            debug!("submission not accepted: {err}");
        }
    })
    .await
    .map_err(AppError::internal)
}

/// Copies posted field values into the form before the requested step runs.
async fn apply_fields(form: &mut HostedForm, fields: &FormFields) {
    for id in form.task_ids() {
        if !fields.contains_key(&format!("task_name_{id}")) {
            continue;
        }
        let field = |name: &str| fields.get(&format!("{name}_{id}")).cloned().unwrap_or_default();
        let input = TaskInput {
            task_for: field("task_for"),
            task_for_other: field("task_for_other"),
            task_name: field("task_name"),
            task_details: field("task_details"),
            my_role: field("my_role"),
        };
        if let Err(err) = form.update_task_block(id, input) {
            debug!("{err}");
        }
    }

    if let Some(action) = fields.get("action") {
        if let Err(err) = form.set_action(action).await {
            debug!("action change incomplete: {err}");
        }
    }
}
