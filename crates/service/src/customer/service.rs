use std::sync::Arc;

use models::customer::is_valid_email;
use tracing::{debug, info, instrument, warn};

use super::domain::{Customer, CustomerDraft, CustomerInput};
use super::repository::CustomerRepository;
use crate::errors::ServiceError;

const INVALID_EMAIL: &str = "invalid email format";

/// Customer business service independent of web framework.
///
/// Creation paths enforce the email rule before anything reaches storage.
/// Absence is reported as `None` or an empty list, never as an error.
pub struct CustomerService<R: CustomerRepository + ?Sized> {
    repo: Arc<R>,
}

impl<R: CustomerRepository + ?Sized> CustomerService<R> {
    pub fn new(repo: Arc<R>) -> Self { Self { repo } }

    /// All customers ordered by name.
    pub async fn list_all(&self) -> Result<Vec<Customer>, ServiceError> {
        self.repo.find_all_ordered_by_name().await
    }

    pub async fn get(&self, id: i64) -> Result<Option<Customer>, ServiceError> {
        self.repo.find_by_id(id).await
    }

    /// Create one customer after checking its email.
    ///
    /// # Examples
    /// ```
    /// use service::customer::{repository::mock::InMemoryCustomerRepository, CustomerInput, CustomerService};
    /// use std::sync::Arc;
    /// let svc = CustomerService::new(Arc::new(InMemoryCustomerRepository::new()));
    /// let c = tokio_test::block_on(svc.create(CustomerInput::new("Alice", "alice01@gmail.com"))).unwrap();
    /// assert_eq!(c.id, 1);
    /// assert!(tokio_test::block_on(svc.create(CustomerInput::new("Bob", "bob@gmail.com"))).is_err());
    /// ```
    #[instrument(skip(self, input), fields(name = %input.name))]
    pub async fn create(&self, input: CustomerInput) -> Result<Customer, ServiceError> {
        if !is_valid_email(&input.email) {
            warn!(email = %input.email, "customer_rejected_invalid_email");
            return Err(ServiceError::InvalidInput(INVALID_EMAIL.into()));
        }
        let created = self.repo.save(CustomerDraft::new(input)).await?;
        info!(id = created.id, "customer_created");
        Ok(created)
    }

    /// Create many customers, all or none. Every email is checked before the
    /// first write; the error names the first offending customer.
    #[instrument(skip(self, inputs), fields(count = inputs.len()))]
    pub async fn batch_create(&self, inputs: Vec<CustomerInput>) -> Result<Vec<Customer>, ServiceError> {
        if let Some(bad) = inputs.iter().find(|c| !is_valid_email(&c.email)) {
            warn!(name = %bad.name, email = %bad.email, "customer_batch_rejected_invalid_email");
            return Err(ServiceError::InvalidInput(format!("{INVALID_EMAIL} for customer: {}", bad.name)));
        }
        let created = self.repo.save_all(inputs.into_iter().map(CustomerDraft::new).collect()).await?;
        info!(count = created.len(), "customer_batch_created");
        Ok(created)
    }

    /// Replace name and email of an existing customer. Returns `None` when the
    /// id is unknown.
    ///
    /// The email is not re-validated here, unlike `create`.
    #[instrument(skip(self, input))]
    pub async fn update(&self, id: i64, input: CustomerInput) -> Result<Option<Customer>, ServiceError> {
        if !self.repo.exists_by_id(id).await? {
            debug!("customer_update_skipped_missing");
            return Ok(None);
        }
        match self.repo.save(CustomerDraft::with_id(id, input)).await {
            Ok(updated) => {
                info!("customer_updated");
                Ok(Some(updated))
            }
            // deleted between the existence check and the write
            Err(ServiceError::NotFound(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Remove one customer; unknown ids are ignored.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: i64) -> Result<(), ServiceError> {
        self.repo.delete_by_id(id).await?;
        info!("customer_deleted");
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn delete_all(&self) -> Result<(), ServiceError> {
        self.repo.delete_all().await?;
        info!("customers_cleared");
        Ok(())
    }

    /// Case-insensitive substring search on name. The query is not validated.
    pub async fn search_by_name(&self, name: &str) -> Result<Vec<Customer>, ServiceError> {
        let found = self.repo.find_by_name_containing(name).await?;
        debug!(query = %name, count = found.len(), "customer_search_by_name");
        Ok(found)
    }

    /// Case-insensitive substring search on email.
    ///
    /// The query itself must pass the email rule, so partial fragments such as
    /// `"john"` are rejected.
    pub async fn search_by_email(&self, email: &str) -> Result<Vec<Customer>, ServiceError> {
        if !is_valid_email(email) {
            return Err(ServiceError::InvalidInput(INVALID_EMAIL.into()));
        }
        let found = self.repo.find_by_email_containing(email).await?;
        debug!(query = %email, count = found.len(), "customer_search_by_email");
        Ok(found)
    }
}
