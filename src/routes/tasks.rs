use crate::{
    error::AppError,
    models::{CreateTaskRequest, Entity, RemoveTaskRequest, Task, UpdateTaskRequest},
    services::TaskService,
};
use actix_web::{delete, get, post, put, web, HttpResponse, Responder};

use super::parse_id;

/// Registers the task service and mounts its routes under `/tasks`.
pub fn config(cfg: &mut web::ServiceConfig, service: web::Data<TaskService>) {
    cfg.app_data(service).service(
        web::scope("/tasks")
            .service(list_tasks)
            .service(create_task)
            .service(update_task)
            .service(delete_task)
            .service(find_task_by_id)
            .service(find_task_by_name),
    );
}

/// Retrieves every task.
///
/// ## Responses:
/// - `200 OK`: JSON array of `Task` objects, without assignees.
/// - `500 Internal Server Error`: On persistence failures.
#[utoipa::path(
    get,
    path = "/tasks",
    tag = "tasks",
    responses(
        (status = 200, description = "Every task, without assignees", body = Vec<Task>),
        (status = 500, description = "Persistence failure"),
    )
)]
#[get("")]
pub async fn list_tasks(service: web::Data<TaskService>) -> Result<impl Responder, AppError> {
    let tasks = service.find_all().await?;
    Ok(HttpResponse::Ok().json(tasks))
}

/// Creates a task.
///
/// ## Request Body:
/// - `name`, `content`, `status`, `deadline`: strings, all required.
/// - `users` (optional): array of user objects; only their `id` is read.
///
/// ## Responses:
/// - `200 OK`: The stored `Task` with its assigned `id` and `users`.
/// - `500 Internal Server Error`: On persistence failures, including unknown
///   user ids and bodies missing a required field.
#[utoipa::path(
    post,
    path = "/tasks",
    tag = "tasks",
    request_body = CreateTaskRequest,
    responses(
        (status = 200, description = "The stored task with its id and assignees", body = Task),
        (status = 500, description = "Persistence failure, including unknown user ids or an undecodable body"),
    )
)]
#[post("")]
pub async fn create_task(
    service: web::Data<TaskService>,
    body: web::Json<CreateTaskRequest>,
) -> Result<impl Responder, AppError> {
    let task = service.create(body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(task))
}

/// Updates the fields present in the body of the task identified by `id`.
///
/// ## Responses:
/// - `200 OK`: The updated `Task`.
/// - `404 Not Found`: If no task has this id, or the body carries no usable id.
/// - `500 Internal Server Error`: On persistence failures.
#[utoipa::path(
    put,
    path = "/tasks",
    tag = "tasks",
    request_body = UpdateTaskRequest,
    responses(
        (status = 200, description = "The updated task", body = Task),
        (status = 404, description = "No task has this id"),
        (status = 500, description = "Persistence failure"),
    )
)]
#[put("")]
pub async fn update_task(
    service: web::Data<TaskService>,
    body: web::Json<UpdateTaskRequest>,
) -> Result<impl Responder, AppError> {
    let task = service.update(body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(task))
}

/// Deletes the task identified by the `id` in the body.
///
/// ## Responses:
/// - `200 OK`: The removed `Task` as it was before deletion.
/// - `404 Not Found`: If no task has this id, or the body carries no usable id.
/// - `500 Internal Server Error`: On persistence failures.
#[utoipa::path(
    delete,
    path = "/tasks",
    tag = "tasks",
    request_body = RemoveTaskRequest,
    responses(
        (status = 200, description = "The removed task", body = Task),
        (status = 404, description = "No task has this id"),
        (status = 500, description = "Persistence failure"),
    )
)]
#[delete("")]
pub async fn delete_task(
    service: web::Data<TaskService>,
    body: web::Json<RemoveTaskRequest>,
) -> Result<impl Responder, AppError> {
    let task = service.remove(body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(task))
}

/// Retrieves a task and its assignees by id.
///
/// ## Path Parameters:
/// - `id`: The task id. Non-numeric values are reported as not found.
///
/// ## Responses:
/// - `200 OK`: The `Task`, including `users`.
/// - `404 Not Found`: If no task has this id.
/// - `500 Internal Server Error`: On persistence failures.
#[utoipa::path(
    get,
    path = "/tasks/findById/{id}",
    tag = "tasks",
    params(("id" = String, Path, description = "Task id")),
    responses(
        (status = 200, description = "The task with its assignees", body = Task),
        (status = 404, description = "No task has this id"),
        (status = 500, description = "Persistence failure"),
    )
)]
#[get("/findById/{id}")]
pub async fn find_task_by_id(
    service: web::Data<TaskService>,
    id: web::Path<String>,
) -> Result<impl Responder, AppError> {
    let id = parse_id(Task::LABEL, &id)?;
    let task = service.find_by_id(id).await?;
    Ok(HttpResponse::Ok().json(task))
}

/// Retrieves the first task whose name equals the path segment exactly.
#[utoipa::path(
    get,
    path = "/tasks/findByName/{name}",
    tag = "tasks",
    params(("name" = String, Path, description = "Exact task name")),
    responses(
        (status = 200, description = "The first task with this name", body = Task),
        (status = 404, description = "No task has this name"),
        (status = 500, description = "Persistence failure"),
    )
)]
#[get("/findByName/{name}")]
pub async fn find_task_by_name(
    service: web::Data<TaskService>,
    name: web::Path<String>,
) -> Result<impl Responder, AppError> {
    let task = service.find_by_name(&name).await?;
    Ok(HttpResponse::Ok().json(task))
}
