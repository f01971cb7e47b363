use std::net::SocketAddr;
use std::sync::Arc;

use reqwest::StatusCode as HttpStatusCode;
use serde_json::{json, Value};
use service::customer::repository::mock::InMemoryCustomerRepository;
use tokio::net::TcpListener;

use server::{routes, startup::build_cors, ServerState};

struct TestApp {
    base_url: String,
    client: reqwest::Client,
}

impl TestApp {
    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn create(&self, name: &str, email: &str) -> reqwest::Response {
        self.client
            .post(self.url("/api/customers"))
            .json(&json!({"name": name, "email": email}))
            .send()
            .await
            .expect("send create")
    }

    async fn list(&self) -> Vec<Value> {
        self.client
            .get(self.url("/api/customers"))
            .send()
            .await
            .expect("send list")
            .json::<Vec<Value>>()
            .await
            .expect("list body")
    }
}

/// Spawn the router on an ephemeral port backed by the in-memory store.
async fn start_server() -> anyhow::Result<TestApp> {
    let state = ServerState::new(Arc::new(InMemoryCustomerRepository::new()));
    let app = routes::build_router(state, build_cors());
    let listener = TcpListener::bind((std::net::Ipv4Addr::LOCALHOST, 0)).await?;
    let addr: SocketAddr = listener.local_addr()?;
    let base_url = format!("http://{}:{}", addr.ip(), addr.port());

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await { eprintln!("server error: {}", e); }
    });

    Ok(TestApp { base_url, client: reqwest::Client::new() })
}

#[tokio::test]
async fn e2e_public_health() -> anyhow::Result<()> {
    let app = start_server().await?;
    let res = app.client.get(app.url("/health")).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let body = res.json::<Value>().await?;
    assert_eq!(body["status"], "ok");
    Ok(())
}

#[tokio::test]
async fn e2e_create_get_update_delete() -> anyhow::Result<()> {
    let app = start_server().await?;

    let res = app.create("Alice", "validuser@gmail.com").await;
    assert_eq!(res.status(), HttpStatusCode::CREATED);
    let created = res.json::<Value>().await?;
    let id = created["id"].as_i64().expect("numeric id");
    assert_eq!(created["email"], "validuser@gmail.com");

    let got = app.client.get(app.url(&format!("/api/customers/{id}"))).send().await?;
    assert_eq!(got.status(), HttpStatusCode::OK);
    assert_eq!(got.json::<Value>().await?, created);

    // update keeps the path id even when the body carries another one
    let res = app
        .client
        .put(app.url(&format!("/api/customers/{id}")))
        .json(&json!({"id": 999, "name": "Alice B", "email": "alice.b@yahoo.com"}))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let updated = res.json::<Value>().await?;
    assert_eq!(updated, json!({"id": id, "name": "Alice B", "email": "alice.b@yahoo.com"}));

    let res = app.client.delete(app.url(&format!("/api/customers/{id}"))).send().await?;
    assert_eq!(res.status(), HttpStatusCode::NO_CONTENT);
    let res = app.client.get(app.url(&format!("/api/customers/{id}"))).send().await?;
    assert_eq!(res.status(), HttpStatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn e2e_invalid_email_is_rejected_and_not_stored() -> anyhow::Result<()> {
    let app = start_server().await?;
    let res = app.create("Bob", "ab@gmail.com").await;
    assert_eq!(res.status(), HttpStatusCode::BAD_REQUEST);
    let body = res.json::<Value>().await?;
    assert_eq!(body["error"], "Validation Error");
    assert_eq!(body["detail"], "invalid email format");
    assert!(app.list().await.is_empty());
    Ok(())
}

#[tokio::test]
async fn e2e_batch_is_all_or_nothing() -> anyhow::Result<()> {
    let app = start_server().await?;
    let res = app
        .client
        .post(app.url("/api/customers/batch"))
        .json(&json!([
            {"name": "Good One", "email": "good_one@gmail.com"},
            {"name": "Bad Apple", "email": "validuser@randomdomain.com"},
        ]))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::BAD_REQUEST);
    let body = res.json::<Value>().await?;
    assert!(body["detail"].as_str().unwrap_or_default().contains("Bad Apple"));
    assert!(app.list().await.is_empty());

    let res = app
        .client
        .post(app.url("/api/customers/batch"))
        .json(&json!([
            {"name": "Good One", "email": "good_one@gmail.com"},
            {"name": "Good Two", "email": "good_two@hotmail.com"},
        ]))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::CREATED);
    assert_eq!(res.json::<Vec<Value>>().await?.len(), 2);
    assert_eq!(app.list().await.len(), 2);
    Ok(())
}

#[tokio::test]
async fn e2e_null_email_is_a_validation_error() -> anyhow::Result<()> {
    let app = start_server().await?;
    let res = app
        .client
        .post(app.url("/api/customers"))
        .json(&json!({"name": "Bob", "email": null}))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::BAD_REQUEST);
    let body = res.json::<Value>().await?;
    assert_eq!(body["detail"], "invalid email format");

    let res = app
        .client
        .post(app.url("/api/customers/batch"))
        .json(&json!([
            {"name": "Good One", "email": "good_one@gmail.com"},
            {"name": "Nully", "email": null},
        ]))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::BAD_REQUEST);
    let body = res.json::<Value>().await?;
    assert_eq!(body["detail"], "invalid email format for customer: Nully");
    assert!(app.list().await.is_empty());
    Ok(())
}

#[tokio::test]
async fn e2e_update_missing_id_creates_nothing()-> anyhow::Result<()> {
    let app = start_server().await?;
    let res = app
        .client
        .put(app.url("/api/customers/4242"))
        .json(&json!({"name": "Nobody", "email": "bad"}))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::NOT_FOUND);
    assert!(app.list().await.is_empty());
    Ok(())
}

#[tokio::test]
async fn e2e_non_positive_id_is_not_found() -> anyhow::Result<()> {
    let app = start_server().await?;
    let res = app.client.get(app.url("/api/customers/0")).send().await?;
    assert_eq!(res.status(), HttpStatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn e2e_list_sorted_and_delete_all() -> anyhow::Result<()> {
    let app = start_server().await?;
    for (name, email) in [("carol", "carol_c@gmail.com"), ("alice", "alice_a@gmail.com"), ("bob", "bobby_b@gmail.com")] {
        assert_eq!(app.create(name, email).await.status(), HttpStatusCode::CREATED);
    }
    let names: Vec<String> = app
        .list()
        .await
        .iter()
        .map(|c| c["name"].as_str().unwrap_or_default().to_string())
        .collect();
    assert_eq!(names, ["alice", "bob", "carol"]);

    let res = app.client.delete(app.url("/api/customers/all")).send().await?;
    assert_eq!(res.status(), HttpStatusCode::NO_CONTENT);
    assert!(app.list().await.is_empty());
    Ok(())
}

#[tokio::test]
async fn e2e_search_by_name_ignores_case() -> anyhow::Result<()> {
    let app = start_server().await?;
    app.create("alice smith", "alice_s@gmail.com").await;
    app.create("bob jones", "bobby_j@gmail.com").await;

    let res = app.client.get(app.url("/api/customers/searchbyname?name=ALICE")).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let found = res.json::<Vec<Value>>().await?;
    assert_eq!(found.len(), 1);
    assert_eq!(found[0]["name"], "alice smith");
    Ok(())
}

#[tokio::test]
async fn e2e_search_by_email_requires_full_address() -> anyhow::Result<()> {
    let app = start_server().await?;
    app.create("John", "johnny@gmail.com").await;

    let res = app.client.get(app.url("/api/customers/searchbyemail?email=john")).send().await?;
    assert_eq!(res.status(), HttpStatusCode::BAD_REQUEST);

    let res = app
        .client
        .get(app.url("/api/customers/searchbyemail"))
        .query(&[("email", "JOHNNY@gmail.com")])
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    assert_eq!(res.json::<Vec<Value>>().await?.len(), 1);
    Ok(())
}

#[tokio::test]
async fn e2e_greetings_and_name_book() -> anyhow::Result<()> {
    let app = start_server().await?;

    assert_eq!(app.client.get(app.url("/hello")).send().await?.text().await?, "Hello, World!");
    assert_eq!(app.client.get(app.url("/greet")).send().await?.text().await?, "Hello, Guest");
    assert_eq!(app.client.get(app.url("/greet?name=Ada")).send().await?.text().await?, "Hello, Ada");
    assert_eq!(app.client.get(app.url("/square/7")).send().await?.json::<i32>().await?, 49);

    let res = app.client.post(app.url("/names")).json(&json!({"name": "Ada"})).send().await?;
    assert_eq!(res.status(), HttpStatusCode::CREATED);
    let names = app.client.get(app.url("/names")).send().await?.json::<Vec<String>>().await?;
    assert_eq!(names, ["Ada"]);
    Ok(())
}

#[tokio::test]
async fn e2e_openapi_document_served() -> anyhow::Result<()> {
    let app = start_server().await?;
    let res = app.client.get(app.url("/api-docs/openapi.json")).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let doc = res.json::<Value>().await?;
    assert!(doc["paths"]["/api/customers"].is_object());
    Ok(())
}
