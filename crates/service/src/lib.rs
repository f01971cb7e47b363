//! Service layer providing the customer business rules on top of models.
//! - Separates business logic from data access via `CustomerRepository`.
//! - Reuses the email rule and entity definition from the `models` crate.
//! - Reports failures through `ServiceError`.

pub mod errors;
pub mod customer;
#[cfg(test)]
pub mod test_support;

pub use customer::CustomerService;
