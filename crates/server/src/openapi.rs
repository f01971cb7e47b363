use utoipa::OpenApi;
use utoipa::ToSchema;

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

#[derive(ToSchema)]
pub struct CustomerDoc { pub id: i64, pub name: String, pub email: String }

/// `email` must be accepted by the email rule on create and batch-create.
#[derive(ToSchema)]
pub struct CustomerInputDoc { pub name: String, pub email: String }

#[derive(ToSchema)]
pub struct ErrorBody { pub error: String, pub detail: Option<String> }

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::customers::list,
        crate::routes::customers::get,
        crate::routes::customers::create,
        crate::routes::customers::batch_create,
        crate::routes::customers::update,
        crate::routes::customers::delete,
        crate::routes::customers::delete_all,
        crate::routes::customers::search_by_name,
        crate::routes::customers::search_by_email,
    ),
    components(
        schemas(
            HealthResponse,
            CustomerDoc,
            CustomerInputDoc,
            ErrorBody,
        )
    ),
    tags(
        (name = "health"),
        (name = "customers")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_customer_paths() {
        let doc = ApiDoc::openapi();
        for path in ["/health", "/api/customers", "/api/customers/{id}", "/api/customers/batch", "/api/customers/searchbyemail"] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }
    }
}
