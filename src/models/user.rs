use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use super::Entity;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct User {
    pub id: i32,
    pub email: String,
    pub firstname: String,
    pub surname: String,
    pub role: String,
}

/// Body of `POST /users`; also the draft handed to the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct NewUser {
    pub email: String,
    pub firstname: String,
    pub surname: String,
    pub role: String,
}

pub type CreateUserRequest = NewUser;

#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct UpdateUserRequest {
    pub id: i32,
    pub email: Option<String>,
    pub firstname: Option<String>,
    pub surname: Option<String>,
    pub role: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RemoveUserRequest {
    pub id: i32,
}

impl User {
    pub fn apply(&mut self, changes: UpdateUserRequest) {
        if let Some(email) = changes.email {
            self.email = email;
        }
        if let Some(firstname) = changes.firstname {
            self.firstname = firstname;
        }
        if let Some(surname) = changes.surname {
            self.surname = surname;
        }
        if let Some(role) = changes.role {
            self.role = role;
        }
    }
}

impl Entity for User {
    type Draft = NewUser;

    const LABEL: &'static str = "User";
    const TABLE: &'static str = "users";
    const COLUMNS: &'static [&'static str] = &["id", "email", "firstname", "surname", "role"];
    // Users have no `name` column; lookups by name match the first name.
    const NAME_COLUMN: &'static str = "firstname";

    fn id(&self) -> i32 {
        self.id
    }

    fn name(&self) -> &str {
        &self.firstname
    }

    fn from_draft(id: i32, draft: NewUser) -> Self {
        Self {
            id,
            email: draft.email,
            firstname: draft.firstname,
            surname: draft.surname,
            role: draft.role,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_apply() {
        let mut user = User::from_draft(
            4,
            NewUser {
                email: "ada@example.com".into(),
                firstname: "Ada".into(),
                surname: "Lovelace".into(),
                role: "admin".into(),
            },
        );
        user.apply(UpdateUserRequest {
            id: 4,
            role: Some("member".into()),
            ..Default::default()
        });

        assert_eq!(user.id, 4);
        assert_eq!(user.role, "member");
        assert_eq!(user.email, "ada@example.com");
        assert_eq!(user.name(), "Ada");
    }
}
