//! Use-cases behind the `/users` routes.

use std::sync::Arc;

use crate::error::AppError;
use crate::models::{CreateUserRequest, Entity, RemoveUserRequest, UpdateUserRequest, User};
use crate::store::{Lookup, Repository};

pub struct UserService {
    store: Arc<dyn Repository<User>>,
}

impl UserService {
    pub fn new(store: Arc<dyn Repository<User>>) -> Self {
        Self { store }
    }

    pub async fn find_all(&self) -> Result<Vec<User>, AppError> {
        self.store.find_all().await
    }

    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] when no user has this id.
    pub async fn find_by_id(&self, id: i32) -> Result<User, AppError> {
        self.find(Lookup::Id(id))
            .await?
            .ok_or_else(|| AppError::missing_id(User::LABEL, id))
    }

    /// Looks a user up by exact first name.
    pub async fn find_by_name(&self, name: &str) -> Result<User, AppError> {
        self.find(Lookup::Name(name))
            .await?
            .ok_or_else(|| AppError::missing_name(User::LABEL, name))
    }

    pub async fn create(&self, request: CreateUserRequest) -> Result<User, AppError> {
        let user = self.store.insert(request).await?;
        log::info!("Created user {}", user.id);
        Ok(user)
    }

    pub async fn update(&self, request: UpdateUserRequest) -> Result<User, AppError> {
        let mut user = self.find_by_id(request.id).await?;
        user.apply(request);
        self.store.save(&user).await
    }

    /// Deletes the user, dropping any task assignments, and returns its last
    /// known state.
    pub async fn remove(&self, request: RemoveUserRequest) -> Result<User, AppError> {
        let user = self.find_by_id(request.id).await?;
        self.store.remove(&user).await?;
        log::info!("Removed user {}", user.id);
        Ok(user)
    }

    async fn find(&self, lookup: Lookup<'_>) -> Result<Option<User>, AppError> {
        self.store.find_one(lookup).await
    }
}
