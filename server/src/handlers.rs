//! Request handlers for the todo routes.
//!
//! Every handler validates first, then makes at most one store call, so a
//! request is either fully applied or rejected with nothing written.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Html;
use axum::Json;
use todo_core::{mapper, CreatedResponse, ListResponse, MessageResponse, UpdateTodo, WireTodo};
use tracing::info;

use crate::error::{ApiError, ApiResult};
use crate::store::TodoStore;

const HOME_PAGE: &str = include_str!("../static/home.html");

pub async fn home() -> Html<&'static str> {
    Html(HOME_PAGE)
}

pub async fn list_todos<S: TodoStore>(State(store): State<S>) -> ApiResult<Json<ListResponse>> {
    let todos = store
        .find_all()
        .await
        .map_err(ApiError::store("failed to fetch todos"))?;
    Ok(Json(ListResponse {
        data: todos.iter().map(mapper::to_wire).collect(),
    }))
}

pub async fn create_todo<S: TodoStore>(
    State(store): State<S>,
    payload: Result<Json<WireTodo>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<CreatedResponse>)> {
    let Json(input) = payload?;
    let todo = mapper::new_item(input)?;
    let id = store
        .insert(todo)
        .await
        .map_err(ApiError::store("failed to save todo"))?;

    info!(%id, "created todo");
    Ok((
        StatusCode::CREATED,
        Json(CreatedResponse {
            message: "todo created".to_string(),
            todo_id: id.to_string(),
        }),
    ))
}

pub async fn update_todo<S: TodoStore>(
    State(store): State<S>,
    payload: Result<Json<UpdateTodo>, JsonRejection>,
) -> ApiResult<Json<MessageResponse>> {
    let Json(input) = payload?;
    let (id, patch) = mapper::to_patch(input)?;
    store
        .update_by_id(id, patch)
        .await
        .map_err(ApiError::store("failed to update todo"))?;

    info!(%id, "updated todo");
    Ok(Json(MessageResponse {
        message: "todo updated".to_string(),
    }))
}

pub async fn delete_todo<S: TodoStore>(
    State(store): State<S>,
    Path(raw_id): Path<String>,
) -> ApiResult<Json<MessageResponse>> {
    let id = mapper::parse_id(&raw_id)?;
    store
        .delete_by_id(id)
        .await
        .map_err(ApiError::store("failed to delete todo"))?;

    info!(%id, "deleted todo");
    Ok(Json(MessageResponse {
        message: "todo deleted".to_string(),
    }))
}
