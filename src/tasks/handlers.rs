use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::{
    auth::{
        authorize::{authorize, current_user, Action},
        jwt::AuthUser,
        repo::User,
    },
    error::ApiError,
    state::AppState,
    tasks::{
        dto::{
            CreateTaskRequest, MemberTasksQuery, MessageResponse, TaskFilter,
            UpdateStatusRequest, UpdatedTaskResponse,
        },
        repo::{Task, TaskStatus},
    },
};

pub fn task_routes() -> Router<AppState> {
    Router::new()
        .route("/tasks", get(list_tasks))
        .route("/tasks-send", post(create_task))
        .route("/tasks/:id", put(update_status).delete(delete_task))
        .route("/tasks-member", get(member_tasks))
}

#[instrument(skip(state))]
pub async fn list_tasks(
    State(state): State<AppState>,
    Query(filter): Query<TaskFilter>,
) -> Result<Json<Vec<Task>>, ApiError> {
    let status = filter.status()?;
    let tasks = Task::list(
        &state.db,
        status,
        filter.assigned_to().as_deref(),
        filter.created_by().as_deref(),
    )
    .await?;
    Ok(Json(tasks))
}

#[instrument(skip(state, payload))]
pub async fn create_task(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Json(payload): Json<CreateTaskRequest>,
) -> Result<(StatusCode, Json<Task>), ApiError> {
    let actor = current_user(&state.db, &claims).await?;
    authorize(&actor, Action::CreateTask)?;

    let new = payload.validate()?;

    // Names on the wire, ids in the store: both references must resolve.
    let assignee = User::find_by_name(&state.db, &new.assigned_to)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("No user named {}", new.assigned_to)))?;
    let creator = User::find_by_name(&state.db, &new.created_by)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("No user named {}", new.created_by)))?;

    let task = Task::create(
        &state.db,
        &new.title,
        new.description.as_deref(),
        assignee.id,
        creator.id,
        new.status,
    )
    .await?;

    info!(task_id = %task.id, assigned_to = %task.assigned_to, "task created");
    Ok((StatusCode::CREATED, Json(task)))
}

#[instrument(skip(state, payload))]
pub async fn update_status(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateStatusRequest>,
) -> Result<Json<UpdatedTaskResponse>, ApiError> {
    let task_ref = Task::find_ref(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Task not found".into()))?;

    let actor = current_user(&state.db, &claims).await?;
    authorize(
        &actor,
        Action::UpdateTaskStatus {
            assignee: task_ref.assigned_to,
        },
    )?;

    let status: TaskStatus = payload
        .status
        .parse()
        .map_err(|_| ApiError::InvalidInput(format!("Invalid status: {}", payload.status)))?;

    // The task can disappear between the lookup and the write.
    let task = Task::update_status(&state.db, id, status)
        .await?
        .ok_or_else(|| ApiError::NotFound("Task not found".into()))?;

    info!(task_id = %task.id, status = %task.status, user_id = %actor.id, "task status updated");
    Ok(Json(UpdatedTaskResponse {
        message: "Task status updated".into(),
        task,
    }))
}

#[instrument(skip(state))]
pub async fn delete_task(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, ApiError> {
    let actor = current_user(&state.db, &claims).await?;
    authorize(&actor, Action::DeleteTask)?;

    // Strict semantics: a repeat delete is a 404, not a silent success.
    if !Task::delete(&state.db, id).await? {
        warn!(task_id = %id, "delete of absent task");
        return Err(ApiError::NotFound("Task not found".into()));
    }

    info!(task_id = %id, user_id = %actor.id, "task deleted");
    Ok(Json(MessageResponse {
        message: "Task deleted".into(),
    }))
}

#[instrument(skip(state))]
pub async fn member_tasks(
    State(state): State<AppState>,
    Query(query): Query<MemberTasksQuery>,
) -> Result<Json<Vec<Task>>, ApiError> {
    let email = query
        .assigned_to
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ApiError::InvalidInput("assignedTo email is required".into()))?;

    let user = User::find_by_email(&state.db, email)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".into()))?;

    let tasks = Task::list_for_assignee(&state.db, user.id).await?;
    Ok(Json(tasks))
}
