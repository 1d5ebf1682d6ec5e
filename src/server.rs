//! Process bootstrap shared by the `task-service` and `user-service` binaries.

use actix_cors::Cors;
use actix_web::middleware::{Logger, NormalizePath};
use actix_web::{web, App, HttpServer};
use std::io;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::config::Config;
use crate::routes::{self, docs, health};
use crate::services::{TaskService, UserService};
use crate::store::Store;

/// Which of the two microservices this process runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Tasks,
    Users,
}

impl Resource {
    pub fn service_name(&self) -> &'static str {
        match self {
            Resource::Tasks => "task-service",
            Resource::Users => "user-service",
        }
    }

    /// Port used when neither `SERVER_PORT` nor `PORT` is set.
    pub fn default_port(&self) -> u16 {
        match self {
            Resource::Tasks => 3000,
            Resource::Users => 3001,
        }
    }
}

/// Swagger UI for the resource's routes. The UI is at `/api-docs/index.html`
/// and the document it renders at `/api-docs/openapi.json`.
pub fn api_docs(resource: Resource) -> SwaggerUi {
    let openapi = match resource {
        Resource::Tasks => docs::TaskApiDoc::openapi(),
        Resource::Users => docs::UserApiDoc::openapi(),
    };
    SwaggerUi::new("/api-docs/{_:.*}").url(docs::OPENAPI_URL, openapi)
}

/// The service a process mounts, wired to its store.
#[derive(Clone)]
enum Mount {
    Tasks(web::Data<TaskService>),
    Users(web::Data<UserService>),
}

impl Mount {
    fn new(resource: Resource, store: &Store) -> Self {
        match resource {
            Resource::Tasks => Mount::Tasks(web::Data::new(TaskService::new(store.tasks()))),
            Resource::Users => Mount::Users(web::Data::new(UserService::new(store.users()))),
        }
    }

    fn configure(&self, cfg: &mut web::ServiceConfig) {
        match self {
            Mount::Tasks(service) => routes::tasks::config(cfg, service.clone()),
            Mount::Users(service) => routes::users::config(cfg, service.clone()),
        }
    }
}

/// Loads configuration, opens the store, serves until shutdown and then
/// closes the store.
pub async fn run(resource: Resource) -> io::Result<()> {
    let config = Config::from_env(resource.default_port()).map_err(io::Error::other)?;
    let store = Store::open(&config).await.map_err(io::Error::other)?;

    log::info!(
        "Starting {} at {}",
        resource.service_name(),
        config.server_url()
    );
    let result = serve(resource, &config, &store).await;

    store.close().await;
    log::info!("{} stopped", resource.service_name());
    result
}

async fn serve(resource: Resource, config: &Config, store: &Store) -> io::Result<()> {
    let mount = Mount::new(resource, store);

    HttpServer::new(move || {
        let mount = mount.clone();
        App::new()
            .app_data(web::Data::new(resource))
            .app_data(routes::json_config())
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600),
            )
            .wrap(Logger::default())
            .wrap(NormalizePath::trim())
            .service(health::health)
            .service(api_docs(resource))
            .configure(move |cfg| mount.configure(cfg))
    })
    .bind((config.server_host.as_str(), config.server_port))?
    .run()
    .await
}
