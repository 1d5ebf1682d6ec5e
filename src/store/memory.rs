use futures::future::BoxFuture;
use std::collections::{BTreeMap, BTreeSet};
use tokio::sync::Mutex;

use super::{Assignees, Lookup, Repository};
use crate::error::AppError;
use crate::models::{task::TASK_USERS_TABLE, Entity, NewTask, Task, User};

/// In-process store with the same observable behaviour as `PgStore`:
/// sequential ids starting at 1, join rows removed with either side, and a
/// task create with unknown user ids rejected as a whole.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

#[derive(Debug)]
struct Rows<E> {
    last_id: i32,
    rows: BTreeMap<i32, E>,
}

impl<E> Default for Rows<E> {
    fn default() -> Self {
        Self {
            last_id: 0,
            rows: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Default)]
struct Tables {
    tasks: Rows<Task>,
    users: Rows<User>,
    /// `(task_id, user_id)` pairs.
    task_users: BTreeSet<(i32, i32)>,
}

/// Access to one entity's rows, plus the cascade to run when a row goes.
trait Table<E> {
    fn rows(&mut self) -> &mut Rows<E>;

    fn cascade(&mut self, id: i32);
}

impl Table<Task> for Tables {
    fn rows(&mut self) -> &mut Rows<Task> {
        &mut self.tasks
    }

    fn cascade(&mut self, id: i32) {
        self.task_users.retain(|(task_id, _)| *task_id != id);
    }
}

impl Table<User> for Tables {
    fn rows(&mut self) -> &mut Rows<User> {
        &mut self.users
    }

    fn cascade(&mut self, id: i32) {
        self.task_users.retain(|(_, user_id)| *user_id != id);
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<E> Repository<E> for MemoryStore
where
    E: Entity,
    Tables: Table<E>,
{
    fn find_all(&self) -> BoxFuture<'_, Result<Vec<E>, AppError>> {
        Box::pin(async move {
            let mut tables = self.tables.lock().await;
            Ok(Table::<E>::rows(&mut *tables).rows.values().cloned().collect())
        })
    }

    fn find_one<'a>(&'a self, lookup: Lookup<'a>) -> BoxFuture<'a, Result<Option<E>, AppError>> {
        Box::pin(async move {
            let mut tables = self.tables.lock().await;
            let rows = &Table::<E>::rows(&mut *tables).rows;
            let found = match lookup {
                Lookup::Id(id) => rows.get(&id),
                Lookup::Name(name) => rows.values().find(|row| row.name() == name),
            };
            Ok(found.cloned())
        })
    }

    fn insert(&self, draft: E::Draft) -> BoxFuture<'_, Result<E, AppError>> {
        Box::pin(async move {
            let mut tables = self.tables.lock().await;
            let rows = Table::<E>::rows(&mut *tables);
            rows.last_id += 1;
            let entity = E::from_draft(rows.last_id, draft);
            rows.rows.insert(entity.id(), entity.clone());
            Ok(entity)
        })
    }

    fn save<'a>(&'a self, entity: &'a E) -> BoxFuture<'a, Result<E, AppError>> {
        Box::pin(async move {
            let mut tables = self.tables.lock().await;
            match Table::<E>::rows(&mut *tables).rows.get_mut(&entity.id()) {
                Some(stored) => {
                    *stored = entity.clone();
                    Ok(entity.clone())
                }
                None => Err(AppError::missing_id(E::LABEL, entity.id())),
            }
        })
    }

    fn remove<'a>(&'a self, entity: &'a E) -> BoxFuture<'a, Result<(), AppError>> {
        Box::pin(async move {
            let mut tables = self.tables.lock().await;
            let id = entity.id();
            if Table::<E>::rows(&mut *tables).rows.remove(&id).is_none() {
                return Err(AppError::missing_id(E::LABEL, id));
            }
            Table::<E>::cascade(&mut *tables, id);
            Ok(())
        })
    }
}

impl Assignees for MemoryStore {
    fn insert_with_assignees<'a>(
        &'a self,
        draft: NewTask,
        user_ids: &'a [i32],
    ) -> BoxFuture<'a, Result<Task, AppError>> {
        Box::pin(async move {
            let mut tables = self.tables.lock().await;

            // Checked before anything is written so a rejected create leaves no row.
            if let Some(unknown) = user_ids
                .iter()
                .find(|id| !tables.users.rows.contains_key(*id))
            {
                return Err(AppError::PersistenceFailure(format!(
                    "insert into {} violates foreign key on user_id: {} does not exist",
                    TASK_USERS_TABLE, unknown
                )));
            }

            tables.tasks.last_id += 1;
            let task = Task::from_draft(tables.tasks.last_id, draft);
            tables.tasks.rows.insert(task.id, task.clone());
            tables
                .task_users
                .extend(user_ids.iter().map(|user_id| (task.id, *user_id)));
            Ok(task)
        })
    }

    fn assignees(&self, task_id: i32) -> BoxFuture<'_, Result<Vec<User>, AppError>> {
        Box::pin(async move {
            let tables = self.tables.lock().await;
            let users = tables
                .task_users
                .range((task_id, i32::MIN)..=(task_id, i32::MAX))
                .filter_map(|(_, user_id)| tables.users.rows.get(user_id).cloned())
                .collect();
            Ok(users)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NewUser;

    fn draft_task(name: &str) -> NewTask {
        NewTask {
            name: name.into(),
            content: "content".into(),
            status: "Todo".into(),
            deadline: "2024-12-31".into(),
        }
    }

    async fn add_task(store: &MemoryStore, name: &str) -> Task {
        Repository::<Task>::insert(store, draft_task(name)).await.unwrap()
    }

    async fn add_user(store: &MemoryStore, firstname: &str) -> User {
        let draft = NewUser {
            email: format!("{}@example.com", firstname.to_lowercase()),
            firstname: firstname.into(),
            surname: "Doe".into(),
            role: "member".into(),
        };
        Repository::<User>::insert(store, draft).await.unwrap()
    }

    #[actix_web::test]
    async fn test_ids_are_sequential_per_table() {
        let store = MemoryStore::new();
        let first = add_task(&store, "a").await;
        let second = add_task(&store, "b").await;
        let user = add_user(&store, "Ada").await;

        assert_eq!((first.id, second.id, user.id), (1, 2, 1));
    }

    #[actix_web::test]
    async fn test_ids_are_not_reused_after_remove() {
        let store = MemoryStore::new();
        let first = add_task(&store, "a").await;
        Repository::<Task>::remove(&store, &first).await.unwrap();
        let second = add_task(&store, "b").await;

        assert_eq!(second.id, 2);
    }

    #[actix_web::test]
    async fn test_name_lookup_is_exact() {
        let store = MemoryStore::new();
        add_task(&store, "Dishes").await;

        let hit = Repository::<Task>::find_one(&store, Lookup::Name("Dishes")).await.unwrap();
        let miss = Repository::<Task>::find_one(&store, Lookup::Name("dishes")).await.unwrap();
        assert_eq!(hit.map(|task| task.name), Some("Dishes".to_string()));
        assert!(miss.is_none());
    }

    #[actix_web::test]
    async fn test_create_with_unknown_user_writes_nothing() {
        let store = MemoryStore::new();
        let user = add_user(&store, "Ada").await;

        let result = store
            .insert_with_assignees(draft_task("a"), &[user.id, 99])
            .await;
        assert!(matches!(result, Err(AppError::PersistenceFailure(_))));

        let tables = store.tables.lock().await;
        assert!(tables.tasks.rows.is_empty());
        assert!(tables.task_users.is_empty());
        assert_eq!(tables.tasks.last_id, 0);
    }

    #[actix_web::test]
    async fn test_removing_either_side_drops_join_rows() {
        let store = MemoryStore::new();
        let ada = add_user(&store, "Ada").await;
        let bob = add_user(&store, "Bob").await;
        let task = store
            .insert_with_assignees(draft_task("a"), &[bob.id, ada.id])
            .await
            .unwrap();

        assert_eq!(
            store.assignees(task.id).await.unwrap(),
            vec![ada.clone(), bob.clone()]
        );

        Repository::<User>::remove(&store, &ada).await.unwrap();
        assert_eq!(store.assignees(task.id).await.unwrap(), vec![bob]);

        Repository::<Task>::remove(&store, &task).await.unwrap();
        assert!(store.tables.lock().await.task_users.is_empty());
    }

    #[actix_web::test]
    async fn test_save_and_remove_missing_rows() {
        let store = MemoryStore::new();
        let mut ghost = add_task(&store, "ghost").await;
        Repository::<Task>::remove(&store, &ghost).await.unwrap();
        ghost.status = "Done".into();

        assert!(matches!(
            Repository::<Task>::save(&store, &ghost).await,
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            Repository::<Task>::remove(&store, &ghost).await,
            Err(AppError::NotFound(_))
        ));
    }
}
