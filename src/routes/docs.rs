//! OpenAPI documents served by Swagger UI under `/api-docs`.

use utoipa::OpenApi;

use super::{tasks, users};
use crate::models::{
    CreateTaskRequest, NewUser, RemoveTaskRequest, RemoveUserRequest, Task, UpdateTaskRequest,
    UpdateUserRequest, User, UserRef,
};

/// Where the generated document is served; Swagger UI loads it from here.
pub const OPENAPI_URL: &str = "/api-docs/openapi.json";

#[derive(OpenApi)]
#[openapi(
    info(title = "task-service", description = "CRUD over tasks and their assigned users"),
    paths(
        tasks::list_tasks,
        tasks::create_task,
        tasks::update_task,
        tasks::delete_task,
        tasks::find_task_by_id,
        tasks::find_task_by_name,
    ),
    components(schemas(
        Task,
        User,
        UserRef,
        CreateTaskRequest,
        UpdateTaskRequest,
        RemoveTaskRequest,
    )),
    tags((name = "tasks", description = "Task management"))
)]
pub struct TaskApiDoc;

#[derive(OpenApi)]
#[openapi(
    info(title = "user-service", description = "CRUD over users"),
    paths(
        users::list_users,
        users::create_user,
        users::update_user,
        users::delete_user,
        users::find_user_by_id,
        users::find_user_by_name,
    ),
    components(schemas(User, NewUser, UpdateUserRequest, RemoveUserRequest)),
    tags((name = "users", description = "User management"))
)]
pub struct UserApiDoc;
