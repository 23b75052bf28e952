use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::jwt::Claims;
use crate::auth::repo::{Role, User};
use crate::error::ApiError;

/// Re-resolves the acting user from the store. Token claims prove identity;
/// the current record is authoritative for name and role, so a stale role
/// claim cannot widen access.
pub async fn current_user(db: &PgPool, claims: &Claims) -> Result<User, ApiError> {
    User::find_by_id(db, claims.sub)
        .await?
        .ok_or_else(|| ApiError::Unauthenticated("User no longer exists".into()))
}

/// Capability required by a mutating operation. Every write path funnels
/// through [`authorize`] with one of these instead of carrying its own ad hoc
/// role check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Allowed for Admin and Manager.
    CreateTask,
    /// Allowed for Admin and Manager.
    DeleteTask,
    /// Allowed for the task's assignee, Admin and Manager.
    UpdateTaskStatus { assignee: Uuid },
    /// Allowed for Admin only.
    ManageUsers,
}

/// Decides whether `user` may perform `action`. The caller is expected to pass
/// a user freshly loaded from the store, not one reconstructed from token
/// claims, so a role change takes effect on the next request.
pub fn authorize(user: &User, action: Action) -> Result<(), ApiError> {
    let allowed = match action {
        Action::CreateTask | Action::DeleteTask => user.role.is_privileged(),
        Action::UpdateTaskStatus { assignee } => assignee == user.id || user.role.is_privileged(),
        Action::ManageUsers => user.role == Role::Admin,
    };

    if allowed {
        Ok(())
    } else {
        Err(ApiError::Forbidden(format!(
            "Not authorized to {}",
            action.describe()
        )))
    }
}

impl Action {
    fn describe(self) -> &'static str {
        match self {
            Action::CreateTask => "create tasks",
            Action::DeleteTask => "delete tasks",
            Action::UpdateTaskStatus { .. } => "update this task",
            Action::ManageUsers => "manage users",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::OffsetDateTime;

    fn user(role: Role) -> User {
        User {
            id: Uuid::new_v4(),
            name: "Test User".into(),
            email: "test@example.com".into(),
            password_hash: "unused".into(),
            role,
            created_at: OffsetDateTime::UNIX_EPOCH,
        }
    }

    #[test]
    fn assignee_may_update_own_task() {
        let member = user(Role::Member);
        let action = Action::UpdateTaskStatus { assignee: member.id };
        assert!(authorize(&member, action).is_ok());
    }

    #[test]
    fn other_member_may_not_update_task() {
        let member = user(Role::Member);
        let action = Action::UpdateTaskStatus { assignee: Uuid::new_v4() };
        let err = authorize(&member, action).unwrap_err();
        assert!(matches!(err, ApiError::Forbidden(_)));
    }

    #[test]
    fn privileged_roles_update_any_task() {
        let action = Action::UpdateTaskStatus { assignee: Uuid::new_v4() };
        assert!(authorize(&user(Role::Admin), action).is_ok());
        assert!(authorize(&user(Role::Manager), action).is_ok());
    }

    #[test]
    fn members_may_not_create_or_delete_tasks() {
        let member = user(Role::Member);
        assert!(authorize(&member, Action::CreateTask).is_err());
        assert!(authorize(&member, Action::DeleteTask).is_err());
        assert!(authorize(&user(Role::Manager), Action::CreateTask).is_ok());
        assert!(authorize(&user(Role::Admin), Action::DeleteTask).is_ok());
    }

    #[test]
    fn only_admin_manages_users() {
        assert!(authorize(&user(Role::Admin), Action::ManageUsers).is_ok());
        assert!(authorize(&user(Role::Manager), Action::ManageUsers).is_err());
        assert!(authorize(&user(Role::Member), Action::ManageUsers).is_err());
    }
}
