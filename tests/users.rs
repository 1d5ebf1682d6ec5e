use actix_web::middleware::NormalizePath;
use actix_web::{http::StatusCode, test, web, App};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use std::sync::Arc;
use taskboard::models::User;
use taskboard::routes::{self, health};
use taskboard::server::Resource;
use taskboard::services::UserService;
use taskboard::store::MemoryStore;

fn ada() -> Value {
    json!({
        "email": "ada@example.com",
        "firstname": "Ada",
        "surname": "Lovelace",
        "role": "admin"
    })
}

#[actix_rt::test]
async fn test_user_crud_flow() {
    let service = web::Data::new(UserService::new(Arc::new(MemoryStore::new())));
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(Resource::Users))
            .app_data(routes::json_config())
            .wrap(NormalizePath::trim())
            .service(health::health)
            .configure(|cfg| routes::users::config(cfg, service)),
    )
    .await;

    // Create
    let req = test::TestRequest::post()
        .uri("/users")
        .set_json(ada())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let created: User = test::read_body_json(resp).await;
    assert_eq!(created.firstname, "Ada");
    assert_eq!(created.role, "admin");

    // Find by id and by first name
    let req = test::TestRequest::get()
        .uri(&format!("/users/findById/{}", created.id))
        .to_request();
    let fetched: User = test::call_and_read_body_json(&app, req).await;
    assert_eq!(fetched, created);

    let req = test::TestRequest::get()
        .uri("/users/findByName/Ada")
        .to_request();
    let by_name: User = test::call_and_read_body_json(&app, req).await;
    assert_eq!(by_name, created);

    let req = test::TestRequest::get()
        .uri("/users/findByName/Lovelace")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    // Update
    let req = test::TestRequest::put()
        .uri("/users")
        .set_json(json!({ "id": created.id, "role": "member" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let updated: User = test::read_body_json(resp).await;
    assert_eq!(updated.role, "member");
    assert_eq!(updated.email, "ada@example.com");

    // List
    let req = test::TestRequest::get().uri("/users").to_request();
    let users: Vec<User> = test::call_and_read_body_json(&app, req).await;
    assert_eq!(users, vec![updated.clone()]);

    // Delete
    let req = test::TestRequest::delete()
        .uri("/users")
        .set_json(json!({ "id": created.id }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let removed: User = test::read_body_json(resp).await;
    assert_eq!(removed, updated);

    let req = test::TestRequest::get()
        .uri(&format!("/users/findById/{}", created.id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    // Health reports the service name
    let req = test::TestRequest::get().uri("/health").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["service"], "user-service");
}

#[actix_rt::test]
async fn test_user_lookups_that_miss() {
    let service = web::Data::new(UserService::new(Arc::new(MemoryStore::new())));
    let app = test::init_service(
        App::new()
            .app_data(routes::json_config())
            .configure(|cfg| routes::users::config(cfg, service)),
    )
    .await;

    for uri in ["/users/findById/1", "/users/findById/x1", "/users/findByName/Nobody"] {
        let req = test::TestRequest::get().uri(uri).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND, "GET {}", uri);
    }

    let req = test::TestRequest::put()
        .uri("/users")
        .set_json(json!({ "id": 9, "email": "ghost@example.com" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let req = test::TestRequest::post()
        .uri("/users")
        .set_json(json!({ "email": "missing-names@example.com" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
}
