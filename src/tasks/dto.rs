use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::tasks::repo::{Task, TaskStatus};

/// Query parameters for the task list. All three are optional and combined as
/// a conjunction; blank values count as absent, like the original client sent
/// them.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskFilter {
    pub status: Option<String>,
    pub assigned_to: Option<String>,
    pub created_by: Option<String>,
}

impl TaskFilter {
    pub fn status(&self) -> Result<Option<TaskStatus>, ApiError> {
        match normalize(self.status.as_deref()) {
            None => Ok(None),
            Some(s) => s
                .parse()
                .map(Some)
                .map_err(|_| ApiError::InvalidInput(format!("Invalid status filter: {s}"))),
        }
    }

    pub fn assigned_to(&self) -> Option<String> {
        normalize(self.assigned_to.as_deref())
    }

    pub fn created_by(&self) -> Option<String> {
        normalize(self.created_by.as_deref())
    }
}

fn normalize(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskRequest {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub assigned_to: String,
    pub created_by: String,
    #[serde(default)]
    pub status: Option<String>,
}

/// A create request after validation: trimmed, non-empty, status resolved.
#[derive(Debug, PartialEq, Eq)]
pub struct NewTask {
    pub title: String,
    pub description: Option<String>,
    pub assigned_to: String,
    pub created_by: String,
    pub status: TaskStatus,
}

impl CreateTaskRequest {
    pub fn validate(self) -> Result<NewTask, ApiError> {
        let title = self.title.trim().to_string();
        let assigned_to = self.assigned_to.trim().to_string();
        let created_by = self.created_by.trim().to_string();

        if title.is_empty() {
            return Err(ApiError::InvalidInput("Title is required".into()));
        }
        if assigned_to.is_empty() {
            return Err(ApiError::InvalidInput("assignedTo is required".into()));
        }
        if created_by.is_empty() {
            return Err(ApiError::InvalidInput("createdBy is required".into()));
        }

        let status = match normalize(self.status.as_deref()) {
            None => TaskStatus::ToDo,
            Some(s) => s
                .parse()
                .map_err(|_| ApiError::InvalidInput(format!("Invalid status: {s}")))?,
        };

        let description = self
            .description
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty());

        Ok(NewTask {
            title,
            description,
            assigned_to,
            created_by,
            status,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: String,
}

#[derive(Debug, Serialize)]
pub struct UpdatedTaskResponse {
    pub message: String,
    pub task: Task,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberTasksQuery {
    pub assigned_to: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(title: &str, assigned_to: &str, created_by: &str) -> CreateTaskRequest {
        CreateTaskRequest {
            title: title.into(),
            description: None,
            assigned_to: assigned_to.into(),
            created_by: created_by.into(),
            status: None,
        }
    }

    #[test]
    fn validate_trims_and_defaults_status() {
        let new = request("  Ship it  ", " Maya Member ", "Mike Manager")
            .validate()
            .unwrap();
        assert_eq!(new.title, "Ship it");
        assert_eq!(new.assigned_to, "Maya Member");
        assert_eq!(new.status, TaskStatus::ToDo);
    }

    #[test]
    fn validate_rejects_blank_required_fields() {
        assert!(request("   ", "Maya Member", "Mike Manager").validate().is_err());
        assert!(request("T", "  ", "Mike Manager").validate().is_err());
        assert!(request("T", "Maya Member", "").validate().is_err());
    }

    #[test]
    fn validate_rejects_unknown_status() {
        let mut req = request("T", "Maya Member", "Mike Manager");
        req.status = Some("Archived".into());
        let err = req.validate().unwrap_err();
        assert!(matches!(err, ApiError::InvalidInput(_)));
    }

    #[test]
    fn validate_accepts_explicit_status() {
        let mut req = request("T", "Maya Member", "Mike Manager");
        req.status = Some("InProgress".into());
        assert_eq!(req.validate().unwrap().status, TaskStatus::InProgress);
    }

    #[test]
    fn blank_description_becomes_none() {
        let mut req = request("T", "Maya Member", "Mike Manager");
        req.description = Some("   ".into());
        assert_eq!(req.validate().unwrap().description, None);
    }

    #[test]
    fn filter_treats_blank_values_as_absent() {
        let filter = TaskFilter {
            status: Some("".into()),
            assigned_to: Some("  ".into()),
            created_by: None,
        };
        assert_eq!(filter.status().unwrap(), None);
        assert_eq!(filter.assigned_to(), None);
        assert_eq!(filter.created_by(), None);
    }

    #[test]
    fn filter_rejects_unknown_status() {
        let filter = TaskFilter {
            status: Some("Archived".into()),
            ..Default::default()
        };
        assert!(filter.status().is_err());
    }

    #[test]
    fn filter_passes_known_status_through() {
        let filter = TaskFilter {
            status: Some("Done".into()),
            ..Default::default()
        };
        assert_eq!(filter.status().unwrap(), Some(TaskStatus::Done));
    }
}
