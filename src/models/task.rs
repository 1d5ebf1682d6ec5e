use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use super::{Entity, User};

/// Join table backing the Task ↔ User assignment relation.
pub const TASK_USERS_TABLE: &str = "task_users";

/// Represents a task as stored in the database and returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Task {
    /// Identifier assigned by the store on creation.
    pub id: i32,
    pub name: String,
    pub content: String,
    /// Free-form status text, e.g. "In Progress".
    pub status: String,
    /// Opaque deadline string; not parsed as a date.
    pub deadline: String,
    /// Assigned users. Only present when the relation was loaded explicitly.
    #[sqlx(skip)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub users: Option<Vec<User>>,
}

/// The persisted columns of a task, before an id exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct NewTask {
    pub name: String,
    pub content: String,
    pub status: String,
    pub deadline: String,
}

/// A user reference inside a create payload.
///
/// Clients may send the whole user object; only its id is used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct UserRef {
    pub id: i32,
}

/// Body of `POST /tasks`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateTaskRequest {
    pub name: String,
    pub content: String,
    pub status: String,
    pub deadline: String,
    #[serde(default)]
    pub users: Option<Vec<UserRef>>,
}

/// Body of `PUT /tasks`. Absent fields keep their stored value.
#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct UpdateTaskRequest {
    pub id: i32,
    pub name: Option<String>,
    pub content: Option<String>,
    pub status: Option<String>,
    pub deadline: Option<String>,
}

/// Body of `DELETE /tasks`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RemoveTaskRequest {
    pub id: i32,
}

impl CreateTaskRequest {
    /// Splits the payload into the task columns and the ids of its assignees.
    pub fn into_parts(self) -> (NewTask, Vec<i32>) {
        let user_ids = self
            .users
            .unwrap_or_default()
            .into_iter()
            .map(|user| user.id)
            .collect();
        let draft = NewTask {
            name: self.name,
            content: self.content,
            status: self.status,
            deadline: self.deadline,
        };
        (draft, user_ids)
    }
}

impl Task {
    /// Overwrites every field present in `changes`.
    pub fn apply(&mut self, changes: UpdateTaskRequest) {
        if let Some(name) = changes.name {
            self.name = name;
        }
        if let Some(content) = changes.content {
            self.content = content;
        }
        if let Some(status) = changes.status {
            self.status = status;
        }
        if let Some(deadline) = changes.deadline {
            self.deadline = deadline;
        }
    }
}

impl Entity for Task {
    type Draft = NewTask;

    const LABEL: &'static str = "Task";
    const TABLE: &'static str = "tasks";
    const COLUMNS: &'static [&'static str] = &["id", "name", "content", "status", "deadline"];
    const NAME_COLUMN: &'static str = "name";

    fn id(&self) -> i32 {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn from_draft(id: i32, draft: NewTask) -> Self {
        Self {
            id,
            name: draft.name,
            content: draft.content,
            status: draft.status,
            deadline: draft.deadline,
            users: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Task {
        Task::from_draft(
            1,
            NewTask {
                name: "Do the dishes".into(),
                content: "Wash all dishes".into(),
                status: "In Progress".into(),
                deadline: "2024-12-31T23:59:59Z".into(),
            },
        )
    }

    #[test]
    fn test_create_request_accepts_full_user_objects() {
        let request: CreateTaskRequest = serde_json::from_value(json!({
            "name": "Do the dishes",
            "content": "Wash all dishes",
            "status": "In Progress",
            "deadline": "2024-12-31T23:59:59Z",
            "users": [
                { "id": 3, "email": "ada@example.com", "firstname": "Ada" },
                { "id": 5 }
            ]
        }))
        .unwrap();

        let (draft, user_ids) = request.into_parts();
        assert_eq!(draft.name, "Do the dishes");
        assert_eq!(user_ids, vec![3, 5]);
    }

    #[test]
    fn test_create_request_without_users() {
        let request: CreateTaskRequest = serde_json::from_value(json!({
            "name": "a", "content": "b", "status": "c", "deadline": "d"
        }))
        .unwrap();
        let (_, user_ids) = request.into_parts();
        assert!(user_ids.is_empty());
    }

    #[test]
    fn test_apply_only_overwrites_present_fields() {
        let mut task = sample();
        task.apply(UpdateTaskRequest {
            id: 1,
            status: Some("Done".into()),
            ..Default::default()
        });

        assert_eq!(task.status, "Done");
        assert_eq!(task.name, "Do the dishes");
        assert_eq!(task.deadline, "2024-12-31T23:59:59Z");
    }

    #[test]
    fn test_unloaded_users_are_not_serialized() {
        let value = serde_json::to_value(sample()).unwrap();
        assert!(value.get("users").is_none());

        let mut task = sample();
        task.users = Some(Vec::new());
        let value = serde_json::to_value(task).unwrap();
        assert_eq!(value["users"], json!([]));
    }
}
