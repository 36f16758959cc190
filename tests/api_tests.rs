use hms_backend::{AppConfig, DatabaseService};
use rocket::http::{ContentType, Header, Status};
use rocket::local::blocking::{Client, LocalResponse};
use serde_json::{Value, json};
use serial_test::serial;
use tempfile::TempDir;

struct TestClient {
    client: Client,
    _temp_dir: TempDir, // Keep alive for cleanup
}

fn test_config(temp_dir: &TempDir) -> AppConfig {
    // Nested directory so pool setup has to create it
    let database_url = temp_dir.path().join("data").join("app.db");

    AppConfig {
        database_url: database_url.to_string_lossy().to_string(),
        secret_key: "test-secret-key".to_string(),
        ..AppConfig::default()
    }
}

fn create_test_client() -> TestClient {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let rocket = hms_backend::build_rocket(test_config(&temp_dir));
    let client = Client::tracked(rocket).expect("valid rocket instance");

    TestClient {
        client,
        _temp_dir: temp_dir,
    }
}

fn json_body(response: LocalResponse<'_>) -> Value {
    let body = response.into_string().expect("response body");
    serde_json::from_str(&body).expect("JSON response body")
}

fn bearer(token: &str) -> Header<'static> {
    Header::new("Authorization", format!("Bearer {token}"))
}

fn login(client: &Client, username: &str, password: &str) -> String {
    let response = client
        .post("/api/auth/login")
        .header(ContentType::Form)
        .body(format!("username={username}&password={password}"))
        .dispatch();
    assert_eq!(response.status(), Status::Ok);

    let body = json_body(response);
    assert_eq!(body["token_type"], "bearer");
    body["access_token"]
        .as_str()
        .expect("access token")
        .to_string()
}

fn admin_token(client: &Client) -> String {
    login(client, "admin", "admin123")
}

fn post_json(client: &Client, token: &str, uri: &str, body: Value) -> (Status, Value) {
    let response = client
        .post(uri.to_string())
        .header(ContentType::JSON)
        .header(bearer(token))
        .body(body.to_string())
        .dispatch();
    let status = response.status();
    (status, json_body(response))
}

fn put_json(client: &Client, token: &str, uri: &str, body: Value) -> (Status, Value) {
    let response = client
        .put(uri.to_string())
        .header(ContentType::JSON)
        .header(bearer(token))
        .body(body.to_string())
        .dispatch();
    let status = response.status();
    (status, json_body(response))
}

fn get(client: &Client, token: &str, uri: &str) -> (Status, Value) {
    let response = client.get(uri.to_string()).header(bearer(token)).dispatch();
    let status = response.status();
    (status, json_body(response))
}

fn delete(client: &Client, token: &str, uri: &str) -> (Status, Value) {
    let response = client
        .delete(uri.to_string())
        .header(bearer(token))
        .dispatch();
    let status = response.status();
    (status, json_body(response))
}

fn tag_counts(client: &Client, token: &str) -> Vec<(String, i64)> {
    let (status, tags) = get(client, token, "/api/knowledge/tag");
    assert_eq!(status, Status::Ok);

    tags.as_array()
        .expect("tag list")
        .iter()
        .map(|tag| {
            (
                tag["name"].as_str().expect("tag name").to_string(),
                tag["usage_count"].as_i64().expect("usage count"),
            )
        })
        .collect()
}

fn usage_of(counts: &[(String, i64)], name: &str) -> Option<i64> {
    counts
        .iter()
        .find(|(tag, _)| tag == name)
        .map(|(_, count)| *count)
}

#[test]
#[serial]
fn test_root_and_health() {
    let test_client = create_test_client();
    let client = &test_client.client;

    let response = client.get("/health").dispatch();
    assert_eq!(response.status(), Status::Ok);
    assert_eq!(json_body(response), json!({ "status": "healthy" }));

    let response = client.get("/").dispatch();
    assert_eq!(response.status(), Status::Ok);
    let body = json_body(response);
    assert_eq!(body["version"], "1.0.0");
    assert!(body["message"].as_str().unwrap().contains("Nanya Hospital"));
}

#[test]
#[serial]
fn test_protected_routes_require_bearer_token() {
    let test_client = create_test_client();
    let client = &test_client.client;

    let response = client.get("/api/users").dispatch();
    assert_eq!(response.status(), Status::Unauthorized);
    assert_eq!(
        response.headers().get_one("WWW-Authenticate"),
        Some("Bearer")
    );
    assert_eq!(json_body(response)["detail"], "Not authenticated");

    let response = client
        .get("/api/knowledge")
        .header(bearer("not.a.token"))
        .dispatch();
    assert_eq!(response.status(), Status::Unauthorized);
    assert_eq!(json_body(response)["detail"], "Could not validate credentials");

    let response = client
        .get("/api/archive")
        .header(Header::new("Authorization", "Token abc"))
        .dispatch();
    assert_eq!(response.status(), Status::Unauthorized);
    assert_eq!(json_body(response)["detail"], "Invalid authorization format");
}

#[test]
#[serial]
fn test_login_and_current_user() {
    let test_client = create_test_client();
    let client = &test_client.client;

    let token = admin_token(client);

    let (status, me) = get(client, &token, "/api/auth/me");
    assert_eq!(status, Status::Ok);
    assert_eq!(me["username"], "admin");
    assert_eq!(me["email"], "admin@example.com");
    assert_eq!(me["status"], true);
    assert!(me.get("password").is_none());

    let (status, body) = post_json(client, &token, "/api/auth/logout", json!({}));
    assert_eq!(status, Status::Ok);
    assert!(body["message"].is_string());
}

#[test]
#[serial]
fn test_login_rejects_bad_credentials() {
    let test_client = create_test_client();
    let client = &test_client.client;

    for body in [
        "username=admin&password=wrong",
        "username=nobody&password=admin123",
    ] {
        let response = client
            .post("/api/auth/login")
            .header(ContentType::Form)
            .body(body)
            .dispatch();
        assert_eq!(response.status(), Status::Unauthorized);
        assert_eq!(
            response.headers().get_one("WWW-Authenticate"),
            Some("Bearer")
        );
        assert_eq!(
            json_body(response)["detail"],
            "Incorrect username or password"
        );
    }
}

#[test]
#[serial]
fn test_register_is_public_and_hides_password() {
    let test_client = create_test_client();
    let client = &test_client.client;

    let response = client
        .post("/api/auth/register")
        .header(ContentType::JSON)
        .body(
            json!({
                "username": "nurse",
                "name": "Night Nurse",
                "email": "nurse@example.com",
                "password": "secret-pass"
            })
            .to_string(),
        )
        .dispatch();
    assert_eq!(response.status(), Status::Ok);
    let user = json_body(response);
    assert_eq!(user["username"], "nurse");
    assert!(user.get("password").is_none());

    let token = login(client, "nurse", "secret-pass");
    let (status, me) = get(client, &token, "/api/auth/me");
    assert_eq!(status, Status::Ok);
    assert_eq!(me["id"], user["id"]);
}

#[test]
#[serial]
fn test_user_crud_and_uniqueness() {
    let test_client = create_test_client();
    let client = &test_client.client;
    let token = admin_token(client);

    let (status, user) = post_json(
        client,
        &token,
        "/api/users",
        json!({
            "username": "doctor",
            "name": "Dr. House",
            "email": "house@example.com",
            "password": "vicodin"
        }),
    );
    assert_eq!(status, Status::Ok);
    let user_id = user["id"].as_i64().unwrap();

    let (status, body) = post_json(
        client,
        &token,
        "/api/users",
        json!({
            "username": "doctor",
            "name": "Another",
            "email": "another@example.com",
            "password": "pw"
        }),
    );
    assert_eq!(status, Status::BadRequest);
    assert!(body["detail"].is_string());

    let (status, _) = post_json(
        client,
        &token,
        "/api/users",
        json!({
            "username": "another",
            "name": "Another",
            "email": "house@example.com",
            "password": "pw"
        }),
    );
    assert_eq!(status, Status::BadRequest);

    let (status, users) = get(client, &token, "/api/users?skip=0&limit=10");
    assert_eq!(status, Status::Ok);
    assert_eq!(users.as_array().unwrap().len(), 2);

    let (status, users) = get(client, &token, "/api/users?skip=1&limit=10");
    assert_eq!(status, Status::Ok);
    assert_eq!(users.as_array().unwrap().len(), 1);
    assert_eq!(users[0]["username"], "doctor");

    let uri = format!("/api/users/{user_id}");
    let (status, updated) = put_json(client, &token, &uri, json!({ "name": "Gregory House" }));
    assert_eq!(status, Status::Ok);
    assert_eq!(updated["name"], "Gregory House");
    assert_eq!(updated["email"], "house@example.com");

    let (status, body) = delete(client, &token, &uri);
    assert_eq!(status, Status::Ok);
    assert!(body["message"].as_str().unwrap().contains("deleted successfully"));

    let (status, body) = get(client, &token, &uri);
    assert_eq!(status, Status::NotFound);
    assert_eq!(body["detail"], "User not found");
}

#[test]
#[serial]
fn test_disabled_user_is_refused() {
    let test_client = create_test_client();
    let client = &test_client.client;
    let admin = admin_token(client);

    let (status, user) = post_json(
        client,
        &admin,
        "/api/users",
        json!({
            "username": "temp",
            "name": "Temp Staff",
            "email": "temp@example.com",
            "password": "temp-pass"
        }),
    );
    assert_eq!(status, Status::Ok);

    let temp_token = login(client, "temp", "temp-pass");

    let uri = format!("/api/users/{}", user["id"]);
    let (status, updated) = put_json(client, &admin, &uri, json!({ "status": false }));
    assert_eq!(status, Status::Ok);
    assert_eq!(updated["status"], false);

    // Previously issued tokens stop working
    let (status, body) = get(client, &temp_token, "/api/auth/me");
    assert_eq!(status, Status::BadRequest);
    assert_eq!(body["detail"], "Inactive user");

    let response = client
        .post("/api/auth/login")
        .header(ContentType::Form)
        .body("username=temp&password=temp-pass")
        .dispatch();
    assert_eq!(response.status(), Status::BadRequest);
    assert_eq!(json_body(response)["detail"], "Inactive user");
}

#[test]
#[serial]
fn test_role_delete_is_blocked_while_assigned() {
    let test_client = create_test_client();
    let client = &test_client.client;
    let token = admin_token(client);

    let (status, role) = post_json(
        client,
        &token,
        "/api/users/roles",
        json!({ "name": "nurse", "description": "Ward staff", "permissions": "archive:read" }),
    );
    assert_eq!(status, Status::Ok);
    let role_id = role["id"].as_i64().unwrap();

    let (status, _) = post_json(client, &token, "/api/users/roles", json!({ "name": "nurse" }));
    assert_eq!(status, Status::BadRequest);

    let (status, user) = post_json(
        client,
        &token,
        "/api/users",
        json!({
            "username": "ward",
            "name": "Ward Nurse",
            "email": "ward@example.com",
            "password": "pw",
            "role_id": role_id
        }),
    );
    assert_eq!(status, Status::Ok);
    assert_eq!(user["role_id"], role_id);

    let role_uri = format!("/api/users/roles/{role_id}");
    let (status, _) = delete(client, &token, &role_uri);
    assert_eq!(status, Status::BadRequest);

    // Unassign with an explicit null, then the role can go
    let user_uri = format!("/api/users/{}", user["id"]);
    let (status, updated) = put_json(client, &token, &user_uri, json!({ "role_id": null }));
    assert_eq!(status, Status::Ok);
    assert!(updated["role_id"].is_null());

    let (status, _) = delete(client, &token, &role_uri);
    assert_eq!(status, Status::Ok);

    let (status, roles) = get(client, &token, "/api/users/roles");
    assert_eq!(status, Status::Ok);
    let names: Vec<&str> = roles
        .as_array()
        .unwrap()
        .iter()
        .map(|role| role["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["admin"]);
}

#[test]
#[serial]
fn test_archive_category_tree_rules() {
    let test_client = create_test_client();
    let client = &test_client.client;
    let token = admin_token(client);

    let (status, parent) = post_json(
        client,
        &token,
        "/api/archive/category",
        json!({ "name": "Records" }),
    );
    assert_eq!(status, Status::Ok);
    let parent_id = parent["id"].as_i64().unwrap();

    let (status, child) = post_json(
        client,
        &token,
        "/api/archive/category",
        json!({ "name": "Radiology", "parent_id": parent_id }),
    );
    assert_eq!(status, Status::Ok);
    let child_id = child["id"].as_i64().unwrap();

    let (status, _) = post_json(
        client,
        &token,
        "/api/archive/category",
        json!({ "name": "Orphan", "parent_id": 9999 }),
    );
    assert_eq!(status, Status::NotFound);

    // A category cannot become a descendant of itself
    let parent_uri = format!("/api/archive/category/{parent_id}");
    let (status, _) = put_json(client, &token, &parent_uri, json!({ "parent_id": child_id }));
    assert_eq!(status, Status::BadRequest);

    let (status, body) = delete(client, &token, &parent_uri);
    assert_eq!(status, Status::BadRequest);
    assert_eq!(body["detail"], "Cannot delete category with children");

    let (status, archive) = post_json(
        client,
        &token,
        "/api/archive",
        json!({ "title": "Chest X-ray", "category_id": child_id }),
    );
    assert_eq!(status, Status::Ok);

    let child_uri = format!("/api/archive/category/{child_id}");
    let (status, body) = delete(client, &token, &child_uri);
    assert_eq!(status, Status::BadRequest);
    assert_eq!(body["detail"], "Cannot delete category with archives");

    let (status, _) = delete(client, &token, &format!("/api/archive/{}", archive["id"]));
    assert_eq!(status, Status::Ok);

    let (status, _) = delete(client, &token, &child_uri);
    assert_eq!(status, Status::Ok);
    let (status, _) = delete(client, &token, &parent_uri);
    assert_eq!(status, Status::Ok);

    let (status, categories) = get(client, &token, "/api/archive/category");
    assert_eq!(status, Status::Ok);
    assert!(categories.as_array().unwrap().is_empty());
}

#[test]
#[serial]
fn test_archive_round_trip_and_update() {
    let test_client = create_test_client();
    let client = &test_client.client;
    let token = admin_token(client);

    let (_, me) = get(client, &token, "/api/auth/me");
    let (_, category) = post_json(
        client,
        &token,
        "/api/archive/category",
        json!({ "name": "Contracts" }),
    );

    let (status, created) = post_json(
        client,
        &token,
        "/api/archive",
        json!({
            "title": "Supplier agreement",
            "description": "Signed copy",
            "file_path": "/files/agreement.pdf",
            "category_id": category["id"]
        }),
    );
    assert_eq!(status, Status::Ok);
    assert_eq!(created["archive_type"], "document");
    assert_eq!(created["created_by"], me["id"]);

    let uri = format!("/api/archive/{}", created["id"]);
    let (status, fetched) = get(client, &token, &uri);
    assert_eq!(status, Status::Ok);
    assert_eq!(fetched, created);

    let (status, updated) = put_json(
        client,
        &token,
        &uri,
        json!({ "archive_type": "image", "category_id": null }),
    );
    assert_eq!(status, Status::Ok);
    assert_eq!(updated["archive_type"], "image");
    assert!(updated["category_id"].is_null());
    assert_eq!(updated["title"], "Supplier agreement");
    assert_eq!(updated["description"], "Signed copy");

    let (status, _) = put_json(client, &token, &uri, json!({ "category_id": 9999 }));
    assert_eq!(status, Status::NotFound);

    let (status, body) = get(client, &token, "/api/archive/9999");
    assert_eq!(status, Status::NotFound);
    assert_eq!(body["detail"], "Archive not found");
}

#[test]
#[serial]
fn test_archive_pagination_and_filters() {
    let test_client = create_test_client();
    let client = &test_client.client;
    let token = admin_token(client);

    let (_, category) = post_json(
        client,
        &token,
        "/api/archive/category",
        json!({ "name": "Scans" }),
    );

    for n in 1..=25 {
        let mut body = json!({ "title": format!("Record {n}") });
        if n % 5 == 0 {
            body["category_id"] = category["id"].clone();
        }
        let (status, _) = post_json(client, &token, "/api/archive", body);
        assert_eq!(status, Status::Ok);
    }

    let (status, page) = get(client, &token, "/api/archive?page=2&page_size=10");
    assert_eq!(status, Status::Ok);
    let titles: Vec<String> = page
        .as_array()
        .unwrap()
        .iter()
        .map(|archive| archive["title"].as_str().unwrap().to_string())
        .collect();
    let expected: Vec<String> = (11..=20).map(|n| format!("Record {n}")).collect();
    assert_eq!(titles, expected);

    let (status, page) = get(client, &token, "/api/archive");
    assert_eq!(status, Status::Ok);
    assert_eq!(page.as_array().unwrap().len(), 10);

    let (status, page) = get(client, &token, "/api/archive?page=3&page_size=10");
    assert_eq!(status, Status::Ok);
    assert_eq!(page.as_array().unwrap().len(), 5);

    // "Record 2" matches 2 and 20 through 25
    let (status, page) = get(client, &token, "/api/archive?name=Record%202&page_size=50");
    assert_eq!(status, Status::Ok);
    assert_eq!(page.as_array().unwrap().len(), 7);

    let uri = format!("/api/archive?category_id={}&page_size=50", category["id"]);
    let (status, page) = get(client, &token, &uri);
    assert_eq!(status, Status::Ok);
    assert_eq!(page.as_array().unwrap().len(), 5);

    let (status, _) = get(client, &token, "/api/archive?page=0");
    assert_eq!(status, Status::BadRequest);
    let (status, _) = get(client, &token, "/api/archive?page_size=0");
    assert_eq!(status, Status::BadRequest);
}

#[test]
#[serial]
fn test_tag_usage_follows_article_lifecycle() {
    let test_client = create_test_client();
    let client = &test_client.client;
    let token = admin_token(client);

    let (status, article) = post_json(
        client,
        &token,
        "/api/knowledge",
        json!({ "title": "Hand hygiene", "content": "Wash hands", "tags": "a, b, a" }),
    );
    assert_eq!(status, Status::Ok);
    assert_eq!(article["tags"], "a, b, a");

    let counts = tag_counts(client, &token);
    assert_eq!(usage_of(&counts, "a"), Some(2));
    assert_eq!(usage_of(&counts, "b"), Some(1));

    let (status, _) = post_json(
        client,
        &token,
        "/api/knowledge",
        json!({ "title": "Gloves", "content": "Wear gloves", "tags": "b,c" }),
    );
    assert_eq!(status, Status::Ok);

    let counts = tag_counts(client, &token);
    assert_eq!(usage_of(&counts, "b"), Some(2));
    assert_eq!(usage_of(&counts, "c"), Some(1));

    let uri = format!("/api/knowledge/{}", article["id"]);
    let (status, updated) = put_json(client, &token, &uri, json!({ "tags": "b" }));
    assert_eq!(status, Status::Ok);
    assert_eq!(updated["tags"], "b");

    let counts = tag_counts(client, &token);
    assert_eq!(usage_of(&counts, "a"), Some(0));
    assert_eq!(usage_of(&counts, "b"), Some(2));

    // Updating other fields leaves tag counts alone
    let (status, _) = put_json(client, &token, &uri, json!({ "title": "Hand hygiene 101" }));
    assert_eq!(status, Status::Ok);
    assert_eq!(usage_of(&tag_counts(client, &token), "b"), Some(2));

    let (status, _) = delete(client, &token, &uri);
    assert_eq!(status, Status::Ok);

    let counts = tag_counts(client, &token);
    assert_eq!(usage_of(&counts, "a"), Some(0));
    assert_eq!(usage_of(&counts, "b"), Some(1));
    assert_eq!(usage_of(&counts, "c"), Some(1));

    let (status, _) = get(client, &token, &uri);
    assert_eq!(status, Status::NotFound);
}

#[test]
#[serial]
fn test_publish_transitions() {
    let test_client = create_test_client();
    let client = &test_client.client;
    let token = admin_token(client);

    let (status, draft) = post_json(
        client,
        &token,
        "/api/knowledge",
        json!({ "title": "Triage", "content": "Steps" }),
    );
    assert_eq!(status, Status::Ok);
    assert_eq!(draft["status"], "draft");
    assert!(draft["published_at"].is_null());

    let publish_uri = format!("/api/knowledge/{}/publish", draft["id"]);
    let (status, published) = put_json(client, &token, &publish_uri, json!({}));
    assert_eq!(status, Status::Ok);
    assert_eq!(published["status"], "published");
    assert!(published["published_at"].is_string());

    // Publishing again keeps the first timestamp
    let (status, again) = put_json(client, &token, &publish_uri, json!({}));
    assert_eq!(status, Status::Ok);
    assert_eq!(again["published_at"], published["published_at"]);

    let unpublish_uri = format!("/api/knowledge/{}/unpublish", draft["id"]);
    let (status, unpublished) = put_json(client, &token, &unpublish_uri, json!({}));
    assert_eq!(status, Status::Ok);
    assert_eq!(unpublished["status"], "draft");
    assert!(unpublished["published_at"].is_null());

    // Status changes through a regular update follow the same rules
    let uri = format!("/api/knowledge/{}", draft["id"]);
    let (status, updated) = put_json(client, &token, &uri, json!({ "status": "published" }));
    assert_eq!(status, Status::Ok);
    assert!(updated["published_at"].is_string());

    let (status, updated) = put_json(client, &token, &uri, json!({ "status": "draft" }));
    assert_eq!(status, Status::Ok);
    assert!(updated["published_at"].is_null());

    let (status, created) = post_json(
        client,
        &token,
        "/api/knowledge",
        json!({ "title": "Live", "content": "Now", "status": "published" }),
    );
    assert_eq!(status, Status::Ok);
    assert!(created["published_at"].is_string());

    let (status, _) = put_json(client, &token, &uri, json!({ "status": "archived" }));
    assert_eq!(status, Status::UnprocessableEntity);

    let (status, _) = put_json(client, &token, "/api/knowledge/9999/publish", json!({}));
    assert_eq!(status, Status::NotFound);
}

#[test]
#[serial]
fn test_knowledge_listing_filters() {
    let test_client = create_test_client();
    let client = &test_client.client;
    let token = admin_token(client);

    let (_, category) = post_json(
        client,
        &token,
        "/api/knowledge/category",
        json!({ "name": "Nursing" }),
    );

    let articles = [
        json!({ "title": "Wound care", "content": "Dressings", "status": "published",
                "category_id": category["id"] }),
        json!({ "title": "Fever", "content": "Check temperature", "tags": "pediatrics" }),
        json!({ "title": "Falls", "content": "Bed rails", "status": "published" }),
    ];
    for article in articles {
        let (status, _) = post_json(client, &token, "/api/knowledge", article);
        assert_eq!(status, Status::Ok);
    }

    let (status, all) = get(client, &token, "/api/knowledge");
    assert_eq!(status, Status::Ok);
    assert_eq!(all.as_array().unwrap().len(), 3);

    let (_, published) = get(client, &token, "/api/knowledge?status=published");
    assert_eq!(published.as_array().unwrap().len(), 2);

    let (_, by_tag) = get(client, &token, "/api/knowledge?search=pediatric");
    assert_eq!(by_tag.as_array().unwrap().len(), 1);
    assert_eq!(by_tag[0]["title"], "Fever");

    let (_, by_content) = get(client, &token, "/api/knowledge?search=rails");
    assert_eq!(by_content[0]["title"], "Falls");

    let uri = format!("/api/knowledge?category_id={}", category["id"]);
    let (_, by_category) = get(client, &token, &uri);
    assert_eq!(by_category.as_array().unwrap().len(), 1);
    assert_eq!(by_category[0]["title"], "Wound care");

    let (_, paged) = get(client, &token, "/api/knowledge?skip=1&limit=1");
    assert_eq!(paged.as_array().unwrap().len(), 1);
    assert_eq!(paged[0]["title"], "Fever");

    let category_uri = format!("/api/knowledge/category/{}", category["id"]);
    let (status, body) = delete(client, &token, &category_uri);
    assert_eq!(status, Status::BadRequest);
    assert_eq!(body["detail"], "Cannot delete category with articles");
}

#[test]
#[serial]
fn test_unknown_route_renders_json_detail() {
    let test_client = create_test_client();
    let client = &test_client.client;

    let response = client.get("/api/does-not-exist").dispatch();
    assert_eq!(response.status(), Status::NotFound);
    assert_eq!(response.content_type(), Some(ContentType::JSON));
    assert!(json_body(response)["detail"].is_string());
}

#[test]
#[serial]
fn test_admin_seeding_is_idempotent() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let config = test_config(&temp_dir);

    let database = DatabaseService::new(&config.database_url).expect("database");
    assert!(database.seed_default_admin(&config.admin_password).unwrap());
    assert!(!database.seed_default_admin(&config.admin_password).unwrap());

    let admin = database.get_user_by_username("admin").unwrap().unwrap();
    assert!(admin.verify_password("admin123").unwrap());
    assert_eq!(database.list_roles().unwrap().len(), 1);
    assert_eq!(database.list_users(0, 100).unwrap().len(), 1);
}

#[test]
#[serial]
fn test_archive_paging_rejects_out_of_range_pages() {
    let test_client = create_test_client();
    let client = &test_client.client;
    let token = admin_token(client);

    let (status, _) = post_json(client, &token, "/api/archive", json!({ "title": "Record" }));
    assert_eq!(status, Status::Ok);

    let max = i64::MAX;
    let uri = format!("/api/archive?page={max}&page_size={max}");
    let (status, body) = get(client, &token, &uri);
    assert_eq!(status, Status::BadRequest);
    assert_eq!(body["detail"], "page is out of range");

    // The farthest addressable page is simply empty
    let uri = format!("/api/archive?page={max}&page_size=1");
    let (status, page) = get(client, &token, &uri);
    assert_eq!(status, Status::Ok);
    assert!(page.as_array().unwrap().is_empty());
}

#[test]
#[serial]
fn test_knowledge_category_tree_rules() {
    let test_client = create_test_client();
    let client = &test_client.client;
    let token = admin_token(client);

    let (status, root) = post_json(
        client,
        &token,
        "/api/knowledge/category",
        json!({ "name": "Clinical", "description": "Clinical guidance" }),
    );
    assert_eq!(status, Status::Ok);
    let root_id = root["id"].as_i64().unwrap();

    let (status, child) = post_json(
        client,
        &token,
        "/api/knowledge/category",
        json!({ "name": "Cardiology", "description": "Heart", "parent_id": root_id }),
    );
    assert_eq!(status, Status::Ok);
    let child_id = child["id"].as_i64().unwrap();

    let (status, grandchild) = post_json(
        client,
        &token,
        "/api/knowledge/category",
        json!({ "name": "ECG", "parent_id": child_id }),
    );
    assert_eq!(status, Status::Ok);
    assert_eq!(grandchild["parent_id"], child_id);

    let (status, body) = post_json(
        client,
        &token,
        "/api/knowledge/category",
        json!({ "name": "Orphan", "parent_id": 9999 }),
    );
    assert_eq!(status, Status::NotFound);
    assert_eq!(body["detail"], "Parent category not found");

    let root_uri = format!("/api/knowledge/category/{root_id}");
    for parent_id in [root_id, grandchild["id"].as_i64().unwrap()] {
        let (status, body) = put_json(client, &token, &root_uri, json!({ "parent_id": parent_id }));
        assert_eq!(status, Status::BadRequest);
        assert_eq!(
            body["detail"],
            "Category cannot be moved under itself or its descendants"
        );
    }

    let (status, body) = put_json(client, &token, &root_uri, json!({ "parent_id": 9999 }));
    assert_eq!(status, Status::NotFound);
    assert_eq!(body["detail"], "Parent category not found");

    let (status, body) = delete(client, &token, &root_uri);
    assert_eq!(status, Status::BadRequest);
    assert_eq!(body["detail"], "Cannot delete category with children");

    // Rename and detach; the description is left alone
    let child_uri = format!("/api/knowledge/category/{child_id}");
    let (status, updated) = put_json(
        client,
        &token,
        &child_uri,
        json!({ "name": "Cardiac care", "parent_id": null }),
    );
    assert_eq!(status, Status::Ok);
    assert_eq!(updated["name"], "Cardiac care");
    assert_eq!(updated["description"], "Heart");
    assert!(updated["parent_id"].is_null());

    let (status, body) = delete(client, &token, &root_uri);
    assert_eq!(status, Status::Ok);
    assert_eq!(body["message"], "Knowledge category deleted successfully");

    let (status, body) = put_json(client, &token, &root_uri, json!({ "name": "Gone" }));
    assert_eq!(status, Status::NotFound);
    assert_eq!(body["detail"], "Knowledge category not found");

    let (status, body) = post_json(
        client,
        &token,
        "/api/knowledge",
        json!({ "title": "Lost", "content": "No home", "category_id": root_id }),
    );
    assert_eq!(status, Status::NotFound);
    assert_eq!(body["detail"], "Knowledge category not found");

    let (status, categories) = get(client, &token, "/api/knowledge/category");
    assert_eq!(status, Status::Ok);
    let names: Vec<&str> = categories
        .as_array()
        .unwrap()
        .iter()
        .map(|category| category["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Cardiac care", "ECG"]);
}

#[test]
#[serial]
fn test_role_update_merges_and_checks_name() {
    let test_client = create_test_client();
    let client = &test_client.client;
    let token = admin_token(client);

    let (status, role) = post_json(
        client,
        &token,
        "/api/users/roles",
        json!({ "name": "clerk", "description": "Front desk", "permissions": "archive:read" }),
    );
    assert_eq!(status, Status::Ok);
    let uri = format!("/api/users/roles/{}", role["id"]);

    let (status, updated) = put_json(
        client,
        &token,
        &uri,
        json!({ "permissions": "archive:read,archive:write" }),
    );
    assert_eq!(status, Status::Ok);
    assert_eq!(updated["name"], "clerk");
    assert_eq!(updated["description"], "Front desk");
    assert_eq!(updated["permissions"], "archive:read,archive:write");

    // Keeping its own name is not a clash
    let (status, updated) = put_json(
        client,
        &token,
        &uri,
        json!({ "name": "clerk", "description": null }),
    );
    assert_eq!(status, Status::Ok);
    assert!(updated["description"].is_null());

    let (status, body) = put_json(client, &token, &uri, json!({ "name": "admin" }));
    assert_eq!(status, Status::BadRequest);
    assert_eq!(body["detail"], "Role name already exists");

    let (status, body) = put_json(client, &token, "/api/users/roles/9999", json!({ "name": "x" }));
    assert_eq!(status, Status::NotFound);
    assert_eq!(body["detail"], "Role not found");
}

#[test]
#[serial]
fn test_user_update_rehashes_password_and_checks_email() {
    let test_client = create_test_client();
    let client = &test_client.client;
    let token = admin_token(client);

    let (status, user) = post_json(
        client,
        &token,
        "/api/users",
        json!({
            "username": "pharmacist",
            "name": "Pharmacist",
            "email": "pharmacy@example.com",
            "password": "first-pass"
        }),
    );
    assert_eq!(status, Status::Ok);
    let uri = format!("/api/users/{}", user["id"]);

    let (status, body) = put_json(client, &token, &uri, json!({ "email": "admin@example.com" }));
    assert_eq!(status, Status::BadRequest);
    assert_eq!(body["detail"], "Email already exists");

    // Re-submitting its own email is fine
    let (status, _) = put_json(client, &token, &uri, json!({ "email": "pharmacy@example.com" }));
    assert_eq!(status, Status::Ok);

    let (status, updated) = put_json(client, &token, &uri, json!({ "password": "second-pass" }));
    assert_eq!(status, Status::Ok);
    assert!(updated.get("password").is_none());

    let response = client
        .post("/api/auth/login")
        .header(ContentType::Form)
        .body("username=pharmacist&password=first-pass")
        .dispatch();
    assert_eq!(response.status(), Status::Unauthorized);

    let new_token = login(client, "pharmacist", "second-pass");
    let (status, me) = get(client, &new_token, "/api/auth/me");
    assert_eq!(status, Status::Ok);
    assert_eq!(me["email"], "pharmacy@example.com");
}
