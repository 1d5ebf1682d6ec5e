use futures::future::BoxFuture;
use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;

use super::{Assignees, Lookup, Repository};
use crate::error::AppError;
use crate::models::{task::TASK_USERS_TABLE, Entity, NewTask, NewUser, Task, User};

const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(5);

/// Postgres-backed store. Cloning the pool is cheap; one `PgStore` serves
/// both entities.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

/// `SELECT <columns> FROM <table> <tail>` for the entity's mapping.
fn select_sql<E: Entity>(tail: &str) -> String {
    format!("SELECT {} FROM {} {}", E::COLUMNS.join(", "), E::TABLE, tail)
}

/// `SELECT` for `find_one`, with `$1` bound to the id or the name.
fn lookup_sql<E: Entity>(lookup: &Lookup<'_>) -> String {
    match lookup {
        Lookup::Id(_) => select_sql::<E>("WHERE id = $1"),
        Lookup::Name(_) => {
            select_sql::<E>(&format!("WHERE {} = $1 ORDER BY id LIMIT 1", E::NAME_COLUMN))
        }
    }
}

fn returning<E: Entity>() -> String {
    format!("RETURNING {}", E::COLUMNS.join(", "))
}

fn insert_task_sql() -> String {
    format!(
        "INSERT INTO {} (name, content, status, deadline) VALUES ($1, $2, $3, $4) {}",
        Task::TABLE,
        returning::<Task>()
    )
}

impl PgStore {
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, AppError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(ACQUIRE_TIMEOUT)
            .connect(database_url)
            .await?;
        Ok(Self { pool })
    }

    /// Applies the migrations embedded from `migrations/`.
    pub async fn migrate(&self) -> Result<(), AppError> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }

    async fn delete_row(&self, table: &str, label: &str, id: i32) -> Result<(), AppError> {
        let sql = format!("DELETE FROM {} WHERE id = $1", table);
        let result = sqlx::query(&sql).bind(id).execute(&self.pool).await?;

        if result.rows_affected() == 0 {
            return Err(AppError::missing_id(label, id));
        }
        Ok(())
    }
}

impl Repository<Task> for PgStore {
    fn find_all(&self) -> BoxFuture<'_, Result<Vec<Task>, AppError>> {
        Box::pin(async move {
            let sql = select_sql::<Task>("ORDER BY id");
            let tasks = sqlx::query_as::<_, Task>(&sql).fetch_all(&self.pool).await?;
            Ok(tasks)
        })
    }

    fn find_one<'a>(&'a self, lookup: Lookup<'a>) -> BoxFuture<'a, Result<Option<Task>, AppError>> {
        Box::pin(async move {
            let sql = lookup_sql::<Task>(&lookup);
            let query = sqlx::query_as::<_, Task>(&sql);
            let task = match lookup {
                Lookup::Id(id) => query.bind(id).fetch_optional(&self.pool).await?,
                Lookup::Name(name) => query.bind(name).fetch_optional(&self.pool).await?,
            };
            Ok(task)
        })
    }

    fn insert(&self, draft: NewTask) -> BoxFuture<'_, Result<Task, AppError>> {
        Box::pin(async move {
            let sql = insert_task_sql();
            let task = sqlx::query_as::<_, Task>(&sql)
                .bind(draft.name)
                .bind(draft.content)
                .bind(draft.status)
                .bind(draft.deadline)
                .fetch_one(&self.pool)
                .await?;
            Ok(task)
        })
    }

    fn save<'a>(&'a self, task: &'a Task) -> BoxFuture<'a, Result<Task, AppError>> {
        Box::pin(async move {
            let sql = format!(
                "UPDATE {} SET name = $1, content = $2, status = $3, deadline = $4 WHERE id = $5 {}",
                Task::TABLE,
                returning::<Task>()
            );
            sqlx::query_as::<_, Task>(&sql)
                .bind(&task.name)
                .bind(&task.content)
                .bind(&task.status)
                .bind(&task.deadline)
                .bind(task.id)
                .fetch_optional(&self.pool)
                .await?
                .ok_or_else(|| AppError::missing_id(Task::LABEL, task.id))
        })
    }

    fn remove<'a>(&'a self, task: &'a Task) -> BoxFuture<'a, Result<(), AppError>> {
        // Join rows go with the task through ON DELETE CASCADE.
        Box::pin(self.delete_row(Task::TABLE, Task::LABEL, task.id))
    }
}

impl Repository<User> for PgStore {
    fn find_all(&self) -> BoxFuture<'_, Result<Vec<User>, AppError>> {
        Box::pin(async move {
            let sql = select_sql::<User>("ORDER BY id");
            let users = sqlx::query_as::<_, User>(&sql).fetch_all(&self.pool).await?;
            Ok(users)
        })
    }

    fn find_one<'a>(&'a self, lookup: Lookup<'a>) -> BoxFuture<'a, Result<Option<User>, AppError>> {
        Box::pin(async move {
            let sql = lookup_sql::<User>(&lookup);
            let query = sqlx::query_as::<_, User>(&sql);
            let user = match lookup {
                Lookup::Id(id) => query.bind(id).fetch_optional(&self.pool).await?,
                Lookup::Name(name) => query.bind(name).fetch_optional(&self.pool).await?,
            };
            Ok(user)
        })
    }

    fn insert(&self, draft: NewUser) -> BoxFuture<'_, Result<User, AppError>> {
        Box::pin(async move {
            let sql = format!(
                "INSERT INTO {} (email, firstname, surname, role) VALUES ($1, $2, $3, $4) {}",
                User::TABLE,
                returning::<User>()
            );
            let user = sqlx::query_as::<_, User>(&sql)
                .bind(draft.email)
                .bind(draft.firstname)
                .bind(draft.surname)
                .bind(draft.role)
                .fetch_one(&self.pool)
                .await?;
            Ok(user)
        })
    }

    fn save<'a>(&'a self, user: &'a User) -> BoxFuture<'a, Result<User, AppError>> {
        Box::pin(async move {
            let sql = format!(
                "UPDATE {} SET email = $1, firstname = $2, surname = $3, role = $4 WHERE id = $5 {}",
                User::TABLE,
                returning::<User>()
            );
            sqlx::query_as::<_, User>(&sql)
                .bind(&user.email)
                .bind(&user.firstname)
                .bind(&user.surname)
                .bind(&user.role)
                .bind(user.id)
                .fetch_optional(&self.pool)
                .await?
                .ok_or_else(|| AppError::missing_id(User::LABEL, user.id))
        })
    }

    fn remove<'a>(&'a self, user: &'a User) -> BoxFuture<'a, Result<(), AppError>> {
        Box::pin(self.delete_row(User::TABLE, User::LABEL, user.id))
    }
}

impl Assignees for PgStore {
    fn insert_with_assignees<'a>(
        &'a self,
        draft: NewTask,
        user_ids: &'a [i32],
    ) -> BoxFuture<'a, Result<Task, AppError>> {
        Box::pin(async move {
            let insert_task = insert_task_sql();
            let insert_link = format!(
                "INSERT INTO {} (task_id, user_id) VALUES ($1, $2) ON CONFLICT DO NOTHING",
                TASK_USERS_TABLE
            );

            // Dropping the transaction on an early `?` rolls the task row back.
            let mut tx = self.pool.begin().await?;
            let task = sqlx::query_as::<_, Task>(&insert_task)
                .bind(draft.name)
                .bind(draft.content)
                .bind(draft.status)
                .bind(draft.deadline)
                .fetch_one(&mut *tx)
                .await?;
            for user_id in user_ids {
                sqlx::query(&insert_link)
                    .bind(task.id)
                    .bind(*user_id)
                    .execute(&mut *tx)
                    .await?;
            }
            tx.commit().await?;
            Ok(task)
        })
    }

    fn assignees(&self, task_id: i32) -> BoxFuture<'_, Result<Vec<User>, AppError>> {
        Box::pin(async move {
            let columns = User::COLUMNS
                .iter()
                .map(|column| format!("u.{}", column))
                .collect::<Vec<_>>()
                .join(", ");
            let sql = format!(
                "SELECT {} FROM {} u JOIN {} tu ON tu.user_id = u.id WHERE tu.task_id = $1 ORDER BY u.id",
                columns,
                User::TABLE,
                TASK_USERS_TABLE
            );
            let users = sqlx::query_as::<_, User>(&sql)
                .bind(task_id)
                .fetch_all(&self.pool)
                .await?;
            Ok(users)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_sql_uses_mapping() {
        assert_eq!(
            select_sql::<Task>("ORDER BY id"),
            "SELECT id, name, content, status, deadline FROM tasks ORDER BY id"
        );
        assert_eq!(
            lookup_sql::<User>(&Lookup::Name("Ada")),
            "SELECT id, email, firstname, surname, role FROM users WHERE firstname = $1 ORDER BY id LIMIT 1"
        );
        assert_eq!(
            lookup_sql::<Task>(&Lookup::Id(1)),
            "SELECT id, name, content, status, deadline FROM tasks WHERE id = $1"
        );
    }
}
