use std::sync::Arc;

use axum::Json;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::{StatusCode, header};
use axum::response::IntoResponse;
use task_manager_app::{TaskService, TaskStore, TaskView};
use task_manager_core::TaskDraft;
use task_manager_core::id::TaskId;
use tracing::info;
use validator::Validate;

use super::error::ServerError;
use super::schemas::{ListTasksParams, TaskPayload};
use super::{AppState, TASKS_PATH};

/// Run a blocking service call on the blocking thread pool.
async fn blocking<S, T, F>(service: Arc<TaskService<S>>, f: F) -> Result<T, ServerError>
where
    S: Send + Sync + 'static,
    T: Send + 'static,
    F: FnOnce(&TaskService<S>) -> anyhow::Result<T> + Send + 'static,
{
    tokio::task::spawn_blocking(move || f(&service))
        .await
        .map_err(|e| ServerError::Internal(format!("task join error: {e}")))?
        .map_err(ServerError::from)
}

fn parse_id(raw: &str) -> Result<TaskId, ServerError> {
    raw.parse()
        .map_err(|_| ServerError::invalid_field("id", format!("'{raw}' is not a valid task id")))
}

fn draft_from(body: Result<Json<TaskPayload>, JsonRejection>) -> Result<TaskDraft, ServerError> {
    let Json(payload) = body?;
    payload.validate()?;
    Ok(payload.into())
}

pub async fn list<S>(
    State(state): State<AppState<S>>,
    params: Result<Query<ListTasksParams>, QueryRejection>,
) -> Result<Json<Vec<TaskView>>, ServerError>
where
    S: TaskStore + Send + Sync + 'static,
{
    let Query(params) = params?;
    let query = params.into_query()?;
    let views = blocking(state.service(), move |service| service.list_tasks(&query)).await?;
    Ok(Json(views))
}

pub async fn show<S>(
    State(state): State<AppState<S>>,
    Path(raw): Path<String>,
) -> Result<Json<TaskView>, ServerError>
where
    S: TaskStore + Send + Sync + 'static,
{
    let id = parse_id(&raw)?;
    blocking(state.service(), move |service| service.get_task(id))
        .await?
        .map(Json)
        .ok_or_else(|| ServerError::task_not_found(id))
}

pub async fn create<S>(
    State(state): State<AppState<S>>,
    body: Result<Json<TaskPayload>, JsonRejection>,
) -> Result<impl IntoResponse, ServerError>
where
    S: TaskStore + Send + Sync + 'static,
{
    let draft = draft_from(body)?;
    let view = blocking(state.service(), move |service| service.create_task(draft)).await?;
    info!(id = %view.id, "Task created");
    let location = format!("{TASKS_PATH}/{}", view.id);
    Ok((StatusCode::CREATED, [(header::LOCATION, location)], Json(view)))
}

pub async fn update<S>(
    State(state): State<AppState<S>>,
    Path(raw): Path<String>,
    body: Result<Json<TaskPayload>, JsonRejection>,
) -> Result<StatusCode, ServerError>
where
    S: TaskStore + Send + Sync + 'static,
{
    let id = parse_id(&raw)?;
    let draft = draft_from(body)?;
    match blocking(state.service(), move |service| service.update_task(id, draft)).await? {
        Some(_) => {
            info!(%id, "Task updated");
            Ok(StatusCode::NO_CONTENT)
        }
        None => Err(ServerError::task_not_found(id)),
    }
}

pub async fn delete<S>(
    State(state): State<AppState<S>>,
    Path(raw): Path<String>,
) -> Result<StatusCode, ServerError>
where
    S: TaskStore + Send + Sync + 'static,
{
    let id = parse_id(&raw)?;
    if blocking(state.service(), move |service| service.delete_task(id)).await? {
        info!(%id, "Task deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ServerError::task_not_found(id))
    }
}
