use crate::{
    error::AppError,
    models::{CreateUserRequest, Entity, NewUser, RemoveUserRequest, UpdateUserRequest, User},
    services::UserService,
};
use actix_web::{delete, get, post, put, web, HttpResponse, Responder};

use super::parse_id;

/// Registers the user service and mounts its routes under `/users`.
pub fn config(cfg: &mut web::ServiceConfig, service: web::Data<UserService>) {
    cfg.app_data(service).service(
        web::scope("/users")
            .service(list_users)
            .service(create_user)
            .service(update_user)
            .service(delete_user)
            .service(find_user_by_id)
            .service(find_user_by_name),
    );
}

#[utoipa::path(
    get,
    path = "/users",
    tag = "users",
    responses(
        (status = 200, description = "Every user", body = Vec<User>),
        (status = 500, description = "Persistence failure"),
    )
)]
#[get("")]
pub async fn list_users(service: web::Data<UserService>) -> Result<impl Responder, AppError> {
    let users = service.find_all().await?;
    Ok(HttpResponse::Ok().json(users))
}

/// Creates a user from `email`, `firstname`, `surname` and `role`.
#[utoipa::path(
    post,
    path = "/users",
    tag = "users",
    request_body = NewUser,
    responses(
        (status = 200, description = "The stored user with its id", body = User),
        (status = 500, description = "Persistence failure or an undecodable body"),
    )
)]
#[post("")]
pub async fn create_user(
    service: web::Data<UserService>,
    body: web::Json<CreateUserRequest>,
) -> Result<impl Responder, AppError> {
    let user = service.create(body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(user))
}

#[utoipa::path(
    put,
    path = "/users",
    tag = "users",
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "The updated user", body = User),
        (status = 404, description = "No user has this id"),
        (status = 500, description = "Persistence failure"),
    )
)]
#[put("")]
pub async fn update_user(
    service: web::Data<UserService>,
    body: web::Json<UpdateUserRequest>,
) -> Result<impl Responder, AppError> {
    let user = service.update(body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(user))
}

/// Deletes a user; the user is also dropped from every task it was assigned to.
#[utoipa::path(
    delete,
    path = "/users",
    tag = "users",
    request_body = RemoveUserRequest,
    responses(
        (status = 200, description = "The removed user", body = User),
        (status = 404, description = "No user has this id"),
        (status = 500, description = "Persistence failure"),
    )
)]
#[delete("")]
pub async fn delete_user(
    service: web::Data<UserService>,
    body: web::Json<RemoveUserRequest>,
) -> Result<impl Responder, AppError> {
    let user = service.remove(body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(user))
}

#[utoipa::path(
    get,
    path = "/users/findById/{id}",
    tag = "users",
    params(("id" = String, Path, description = "User id")),
    responses(
        (status = 200, description = "The user", body = User),
        (status = 404, description = "No user has this id"),
        (status = 500, description = "Persistence failure"),
    )
)]
#[get("/findById/{id}")]
pub async fn find_user_by_id(
    service: web::Data<UserService>,
    id: web::Path<String>,
) -> Result<impl Responder, AppError> {
    let id = parse_id(User::LABEL, &id)?;
    let user = service.find_by_id(id).await?;
    Ok(HttpResponse::Ok().json(user))
}

/// Matches `firstname` exactly; users have no separate name field.
#[utoipa::path(
    get,
    path = "/users/findByName/{name}",
    tag = "users",
    params(("name" = String, Path, description = "Exact first name")),
    responses(
        (status = 200, description = "The first user with this first name", body = User),
        (status = 404, description = "No user has this first name"),
        (status = 500, description = "Persistence failure"),
    )
)]
#[get("/findByName/{name}")]
pub async fn find_user_by_name(
    service: web::Data<UserService>,
    name: web::Path<String>,
) -> Result<impl Responder, AppError> {
    let user = service.find_by_name(&name).await?;
    Ok(HttpResponse::Ok().json(user))
}
