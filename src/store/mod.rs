//! Persistence collaborator.
//!
//! Services never talk to sqlx directly; they hold an `Arc<dyn ...>` over the
//! traits below. `Store` is the handle the process entry point opens at
//! startup and closes on shutdown.

pub mod memory;
pub mod postgres;

use futures::future::BoxFuture;
use std::sync::Arc;

use crate::config::Config;
use crate::error::AppError;
use crate::models::{Entity, NewTask, Task, User};

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Predicate for `Repository::find_one`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookup<'a> {
    /// Primary key equality.
    Id(i32),
    /// Exact, case-sensitive match on the entity's name column.
    Name(&'a str),
}

/// Generic repository keyed by entity type.
pub trait Repository<E: Entity>: Send + Sync {
    /// Every row of the entity's table.
    fn find_all(&self) -> BoxFuture<'_, Result<Vec<E>, AppError>>;

    /// The first row matching `lookup`, if any.
    fn find_one<'a>(&'a self, lookup: Lookup<'a>) -> BoxFuture<'a, Result<Option<E>, AppError>>;

    /// Persists a new row and returns it with its assigned id.
    fn insert(&self, draft: E::Draft) -> BoxFuture<'_, Result<E, AppError>>;

    /// Overwrites the stored row with the same id. Fails with `NotFound` if
    /// the row no longer exists.
    fn save<'a>(&'a self, entity: &'a E) -> BoxFuture<'a, Result<E, AppError>>;

    /// Deletes the stored row with the same id. Fails with `NotFound` if the
    /// row no longer exists.
    fn remove<'a>(&'a self, entity: &'a E) -> BoxFuture<'a, Result<(), AppError>>;
}

/// The Task ↔ User relation. Loading it is always an explicit call.
pub trait Assignees: Send + Sync {
    /// Persists a new task together with its links to `user_ids`, as one
    /// unit. An unknown user id is a persistence failure and nothing is written.
    fn insert_with_assignees<'a>(
        &'a self,
        draft: NewTask,
        user_ids: &'a [i32],
    ) -> BoxFuture<'a, Result<Task, AppError>>;

    /// Users assigned to the task, ordered by id.
    fn assignees(&self, task_id: i32) -> BoxFuture<'_, Result<Vec<User>, AppError>>;
}

/// Everything the task service needs from storage.
pub trait TaskStore: Repository<Task> + Assignees {}

impl<T: Repository<Task> + Assignees + ?Sized> TaskStore for T {}

/// The storage backend selected by configuration.
pub enum Store {
    Postgres(Arc<PgStore>),
    Memory(Arc<MemoryStore>),
}

impl Store {
    /// Connects to the configured backend. For Postgres the pending
    /// migrations are applied before the store is handed out.
    pub async fn open(config: &Config) -> Result<Self, AppError> {
        if config.uses_memory_store() {
            log::warn!("Using the in-memory store; data is lost on shutdown");
            return Ok(Store::Memory(Arc::new(MemoryStore::new())));
        }

        let store = PgStore::connect(&config.database_url, config.max_connections).await?;
        store.migrate().await?;
        log::info!("Connected to Postgres, migrations applied");
        Ok(Store::Postgres(Arc::new(store)))
    }

    pub fn tasks(&self) -> Arc<dyn TaskStore> {
        match self {
            Store::Postgres(store) => Arc::clone(store) as Arc<dyn TaskStore>,
            Store::Memory(store) => Arc::clone(store) as Arc<dyn TaskStore>,
        }
    }

    pub fn users(&self) -> Arc<dyn Repository<User>> {
        match self {
            Store::Postgres(store) => Arc::clone(store) as Arc<dyn Repository<User>>,
            Store::Memory(store) => Arc::clone(store) as Arc<dyn Repository<User>>,
        }
    }

    /// Releases pooled connections. A no-op for the in-memory store.
    pub async fn close(&self) {
        if let Store::Postgres(store) = self {
            store.close().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[actix_web::test]
    async fn test_open_memory_store() {
        let config = Config::from_lookup(3000, |key| {
            (key == "DATABASE_URL").then(|| "memory".to_string())
        })
        .unwrap();

        let store = Store::open(&config).await.unwrap();
        assert!(matches!(store, Store::Memory(_)));
        assert!(store.tasks().find_all().await.unwrap().is_empty());
        assert!(store.users().find_all().await.unwrap().is_empty());
        store.close().await;
    }
}
