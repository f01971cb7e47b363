use axum::{extract::{Path, Query, State}, http::StatusCode, Json};
use serde::Deserialize;
use service::customer::{Customer, CustomerInput};
use tracing::{info, warn};

use crate::{errors::JsonApiError, state::ServerState};

#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct NameQuery { pub name: String }

#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct EmailQuery { pub email: String }

#[utoipa::path(
    get, path = "/api/customers", tag = "customers",
    responses(
        (status = 200, description = "All customers ordered by name", body = [crate::openapi::CustomerDoc]),
        (status = 500, description = "List Failed")
    )
)]
pub async fn list(State(state): State<ServerState>) -> Result<Json<Vec<Customer>>, JsonApiError> {
    let list = state.customers.list_all().await?;
    info!(count = list.len(), "list customers");
    Ok(Json(list))
}

#[utoipa::path(
    get, path = "/api/customers/{id}", tag = "customers",
    params(("id" = i64, Path, description = "Customer ID")),
    responses(
        (status = 200, description = "OK", body = crate::openapi::CustomerDoc),
        (status = 404, description = "Not Found")
    )
)]
pub async fn get(State(state): State<ServerState>, Path(id): Path<i64>) -> Result<Json<Customer>, JsonApiError> {
    if id <= 0 {
        warn!(id, "invalid customer id");
        return Err(JsonApiError::not_found("customer"));
    }
    match state.customers.get(id).await? {
        Some(c) => Ok(Json(c)),
        None => Err(JsonApiError::not_found("customer")),
    }
}

#[utoipa::path(
    post, path = "/api/customers", tag = "customers",
    request_body = crate::openapi::CustomerInputDoc,
    responses(
        (status = 201, description = "Created", body = crate::openapi::CustomerDoc),
        (status = 400, description = "Validation Error", body = crate::openapi::ErrorBody)
    )
)]
pub async fn create(
    State(state): State<ServerState>,
    Json(input): Json<CustomerInput>,
) -> Result<(StatusCode, Json<Customer>), JsonApiError> {
    let created = state.customers.create(input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(
    post, path = "/api/customers/batch", tag = "customers",
    request_body = [crate::openapi::CustomerInputDoc],
    responses(
        (status = 201, description = "All customers created", body = [crate::openapi::CustomerDoc]),
        (status = 400, description = "Validation Error; nothing was created", body = crate::openapi::ErrorBody)
    )
)]
pub async fn batch_create(
    State(state): State<ServerState>,
    Json(inputs): Json<Vec<CustomerInput>>,
) -> Result<(StatusCode, Json<Vec<Customer>>), JsonApiError> {
    let created = state.customers.batch_create(inputs).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(
    put, path = "/api/customers/{id}", tag = "customers",
    params(("id" = i64, Path, description = "Customer ID")),
    request_body = crate::openapi::CustomerInputDoc,
    responses(
        (status = 200, description = "Updated", body = crate::openapi::CustomerDoc),
        (status = 404, description = "Not Found")
    )
)]
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(input): Json<CustomerInput>,
) -> Result<Json<Customer>, JsonApiError> {
    match state.customers.update(id, input).await? {
        Some(c) => Ok(Json(c)),
        None => Err(JsonApiError::not_found("customer")),
    }
}

#[utoipa::path(
    delete, path = "/api/customers/{id}", tag = "customers",
    params(("id" = i64, Path, description = "Customer ID")),
    responses(
        (status = 204, description = "Deleted, or nothing to delete"),
        (status = 500, description = "Delete Failed")
    )
)]
pub async fn delete(State(state): State<ServerState>, Path(id): Path<i64>) -> Result<StatusCode, JsonApiError> {
    state.customers.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    delete, path = "/api/customers/all", tag = "customers",
    responses(
        (status = 204, description = "All customers deleted"),
        (status = 500, description = "Delete Failed")
    )
)]
pub async fn delete_all(State(state): State<ServerState>) -> Result<StatusCode, JsonApiError> {
    state.customers.delete_all().await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get, path = "/api/customers/searchbyname", tag = "customers",
    params(NameQuery),
    responses((status = 200, description = "Matches, possibly none", body = [crate::openapi::CustomerDoc]))
)]
pub async fn search_by_name(
    State(state): State<ServerState>,
    Query(q): Query<NameQuery>,
) -> Result<Json<Vec<Customer>>, JsonApiError> {
    let found = state.customers.search_by_name(&q.name).await?;
    info!(query = %q.name, count = found.len(), "search customers by name");
    Ok(Json(found))
}

#[utoipa::path(
    get, path = "/api/customers/searchbyemail", tag = "customers",
    params(EmailQuery),
    responses(
        (status = 200, description = "Matches, possibly none", body = [crate::openapi::CustomerDoc]),
        (status = 400, description = "Query is not an acceptable email", body = crate::openapi::ErrorBody)
    )
)]
pub async fn search_by_email(
    State(state): State<ServerState>,
    Query(q): Query<EmailQuery>,
) -> Result<Json<Vec<Customer>>, JsonApiError> {
    let found = state.customers.search_by_email(&q.email).await?;
    info!(query = %q.email, count = found.len(), "search customers by email");
    Ok(Json(found))
}
