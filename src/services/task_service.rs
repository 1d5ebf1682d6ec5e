//! Use-cases behind the `/tasks` routes.

use std::sync::Arc;

use crate::error::AppError;
use crate::models::{CreateTaskRequest, Entity, RemoveTaskRequest, Task, UpdateTaskRequest};
use crate::store::{Lookup, TaskStore};

pub struct TaskService {
    store: Arc<dyn TaskStore>,
}

impl TaskService {
    pub fn new(store: Arc<dyn TaskStore>) -> Self {
        Self { store }
    }

    /// All tasks, without their assignees.
    ///
    /// # Errors
    ///
    /// Returns a persistence failure propagated from the store.
    pub async fn find_all(&self) -> Result<Vec<Task>, AppError> {
        self.store.find_all().await
    }

    /// The task with primary key `id`, with its assignees loaded.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] when no task has this id.
    pub async fn find_by_id(&self, id: i32) -> Result<Task, AppError> {
        let mut task = self
            .store
            .find_one(Lookup::Id(id))
            .await?
            .ok_or_else(|| AppError::missing_id(Task::LABEL, id))?;
        task.users = Some(self.store.assignees(task.id).await?);
        Ok(task)
    }

    /// The first task whose name equals `name` exactly.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] when no name matches.
    pub async fn find_by_name(&self, name: &str) -> Result<Task, AppError> {
        self.store
            .find_one(Lookup::Name(name))
            .await?
            .ok_or_else(|| AppError::missing_name(Task::LABEL, name))
    }

    /// Persists a new task and links the users listed in the request.
    ///
    /// The returned task carries its assigned id and its assignees.
    pub async fn create(&self, request: CreateTaskRequest) -> Result<Task, AppError> {
        let (draft, user_ids) = request.into_parts();
        let mut task = self.store.insert_with_assignees(draft, &user_ids).await?;
        task.users = Some(self.store.assignees(task.id).await?);

        log::info!("Created task {} with {} assignee(s)", task.id, user_ids.len());
        Ok(task)
    }

    /// Overwrites the fields present in `request` on the stored task.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] when `request.id` does not exist; the
    /// store is left untouched in that case.
    pub async fn update(&self, request: UpdateTaskRequest) -> Result<Task, AppError> {
        let mut task = self
            .store
            .find_one(Lookup::Id(request.id))
            .await?
            .ok_or_else(|| AppError::missing_id(Task::LABEL, request.id))?;
        task.apply(request);
        self.store.save(&task).await
    }

    /// Deletes the task and returns its last known state.
    pub async fn remove(&self, request: RemoveTaskRequest) -> Result<Task, AppError> {
        let task = self
            .store
            .find_one(Lookup::Id(request.id))
            .await?
            .ok_or_else(|| AppError::missing_id(Task::LABEL, request.id))?;
        self.store.remove(&task).await?;

        log::info!("Removed task {}", task.id);
        Ok(task)
    }
}
