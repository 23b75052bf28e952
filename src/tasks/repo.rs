use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

/// Task lifecycle state. New tasks default to `ToDo`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "task_status")]
pub enum TaskStatus {
    ToDo,
    InProgress,
    Done,
}

impl FromStr for TaskStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ToDo" => Ok(TaskStatus::ToDo),
            "InProgress" => Ok(TaskStatus::InProgress),
            "Done" => Ok(TaskStatus::Done),
            other => Err(format!("unknown status: {other}")),
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TaskStatus::ToDo => "ToDo",
            TaskStatus::InProgress => "InProgress",
            TaskStatus::Done => "Done",
        };
        f.write_str(s)
    }
}

/// Task as exposed over the API. Storage references users by id; this view
/// joins the current display names back in, so a rename is reflected on the
/// next read instead of orphaning the assignment.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub assigned_to: String,
    pub created_by: String,
    pub status: TaskStatus,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// The slice of a task row the authorization check needs.
#[derive(Debug, Clone, Copy, FromRow)]
pub struct TaskRef {
    pub id: Uuid,
    pub assigned_to: Uuid,
}

const TASK_VIEW: &str = r#"
    SELECT t.id, t.title, t.description,
           a.name AS assigned_to, c.name AS created_by,
           t.status, t.created_at, t.updated_at
    FROM tasks t
    JOIN users a ON a.id = t.assigned_to
    JOIN users c ON c.id = t.created_by
"#;

impl Task {
    /// Conjunction of the provided filters; an absent filter is unconstrained.
    /// Order is the store's natural order.
    pub async fn list(
        db: &PgPool,
        status: Option<TaskStatus>,
        assigned_to: Option<&str>,
        created_by: Option<&str>,
    ) -> anyhow::Result<Vec<Task>> {
        let sql = format!(
            r#"{TASK_VIEW}
            WHERE ($1::task_status IS NULL OR t.status = $1)
              AND ($2::text IS NULL OR a.name = $2)
              AND ($3::text IS NULL OR c.name = $3)
            "#
        );
        let tasks = sqlx::query_as::<_, Task>(&sql)
            .bind(status)
            .bind(assigned_to)
            .bind(created_by)
            .fetch_all(db)
            .await?;
        Ok(tasks)
    }

    pub async fn list_for_assignee(db: &PgPool, assignee: Uuid) -> anyhow::Result<Vec<Task>> {
        let sql = format!("{TASK_VIEW} WHERE t.assigned_to = $1");
        let tasks = sqlx::query_as::<_, Task>(&sql)
            .bind(assignee)
            .fetch_all(db)
            .await?;
        Ok(tasks)
    }

    pub async fn create(
        db: &PgPool,
        title: &str,
        description: Option<&str>,
        assigned_to: Uuid,
        created_by: Uuid,
        status: TaskStatus,
    ) -> anyhow::Result<Task> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            WITH ins AS (
                INSERT INTO tasks (title, description, assigned_to, created_by, status)
                VALUES ($1, $2, $3, $4, $5)
                RETURNING id, title, description, assigned_to, created_by,
                          status, created_at, updated_at
            )
            SELECT ins.id, ins.title, ins.description,
                   a.name AS assigned_to, c.name AS created_by,
                   ins.status, ins.created_at, ins.updated_at
            FROM ins
            JOIN users a ON a.id = ins.assigned_to
            JOIN users c ON c.id = ins.created_by
            "#,
        )
        .bind(title)
        .bind(description)
        .bind(assigned_to)
        .bind(created_by)
        .bind(status)
        .fetch_one(db)
        .await?;
        Ok(task)
    }

    pub async fn find_ref(db: &PgPool, id: Uuid) -> anyhow::Result<Option<TaskRef>> {
        let task = sqlx::query_as::<_, TaskRef>(
            "SELECT id, assigned_to FROM tasks WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(db)
        .await?;
        Ok(task)
    }

    /// Last write wins on concurrent updates; there is no version column.
    pub async fn update_status(
        db: &PgPool,
        id: Uuid,
        status: TaskStatus,
    ) -> anyhow::Result<Option<Task>> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            WITH upd AS (
                UPDATE tasks
                SET status = $2, updated_at = now()
                WHERE id = $1
                RETURNING id, title, description, assigned_to, created_by,
                          status, created_at, updated_at
            )
            SELECT upd.id, upd.title, upd.description,
                   a.name AS assigned_to, c.name AS created_by,
                   upd.status, upd.created_at, upd.updated_at
            FROM upd
            JOIN users a ON a.id = upd.assigned_to
            JOIN users c ON c.id = upd.created_by
            "#,
        )
        .bind(id)
        .bind(status)
        .fetch_optional(db)
        .await?;
        Ok(task)
    }

    /// Strict delete: reports whether a row was actually removed, so a repeat
    /// delete surfaces as not-found rather than silent success.
    pub async fn delete(db: &PgPool, id: Uuid) -> anyhow::Result<bool> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
