//! Small greeting endpoints kept alongside the customer API.
//!
//! The name book is owned by `ServerState`; it is created with the router and
//! cleared by `ServerState::teardown` when the server stops.

use axum::{extract::{Path, Query, State}, http::StatusCode, Json};
use serde::Deserialize;
use tokio::sync::RwLock;
use tracing::info;

use crate::{errors::JsonApiError, state::ServerState};

#[derive(Debug, Default)]
pub struct NameBook {
    names: RwLock<Vec<String>>,
}

impl NameBook {
    pub fn new() -> Self { Self::default() }

    pub async fn add(&self, name: String) {
        self.names.write().await.push(name);
    }

    /// Names in insertion order.
    pub async fn list(&self) -> Vec<String> {
        self.names.read().await.clone()
    }

    /// Empty the book, returning how many names were held.
    pub async fn clear(&self) -> usize {
        let mut names = self.names.write().await;
        let n = names.len();
        names.clear();
        n
    }
}

fn guest() -> String { "Guest".to_string() }

#[derive(Debug, Deserialize)]
pub struct GreetQuery {
    #[serde(default = "guest")]
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct NameInput {
    pub name: String,
}

pub async fn hello() -> &'static str {
    "Hello, World!"
}

pub async fn greet(Query(q): Query<GreetQuery>) -> String {
    format!("Hello, {}", q.name)
}

pub async fn square(Path(num): Path<i32>) -> Result<Json<i32>, JsonApiError> {
    num.checked_mul(num).map(Json).ok_or_else(|| {
        JsonApiError::new(StatusCode::BAD_REQUEST, "Validation Error", Some(format!("{num} squared overflows")))
    })
}

pub async fn add_name(
    State(state): State<ServerState>,
    Json(input): Json<NameInput>,
) -> Result<(StatusCode, String), JsonApiError> {
    let name = input.name.trim().to_string();
    if name.is_empty() {
        return Err(JsonApiError::new(StatusCode::BAD_REQUEST, "Validation Error", Some("name required".into())));
    }
    state.names.add(name.clone()).await;
    info!(%name, "name_added");
    Ok((StatusCode::CREATED, format!("Name added successfully: {name}")))
}

pub async fn list_names(State(state): State<ServerState>) -> Json<Vec<String>> {
    Json(state.names.list().await)
}
