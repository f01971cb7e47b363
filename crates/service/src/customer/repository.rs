use async_trait::async_trait;

use super::domain::{Customer, CustomerDraft};
use crate::errors::ServiceError;

/// Storage abstraction for customer records.
///
/// Substring searches are case-insensitive and treat the query literally.
#[async_trait]
pub trait CustomerRepository: Send + Sync {
    async fn find_all_ordered_by_name(&self) -> Result<Vec<Customer>, ServiceError>;
    async fn find_by_id(&self, id: i64) -> Result<Option<Customer>, ServiceError>;
    async fn exists_by_id(&self, id: i64) -> Result<bool, ServiceError>;
    /// Insert when `draft.id` is `None`, otherwise overwrite that row.
    /// Overwriting a missing row fails with `ServiceError::NotFound`.
    async fn save(&self, draft: CustomerDraft) -> Result<Customer, ServiceError>;
    /// Save every draft or none of them. Results keep the input order.
    async fn save_all(&self, drafts: Vec<CustomerDraft>) -> Result<Vec<Customer>, ServiceError>;
    async fn delete_by_id(&self, id: i64) -> Result<(), ServiceError>;
    async fn delete_all(&self) -> Result<(), ServiceError>;
    async fn find_by_name_containing(&self, fragment: &str) -> Result<Vec<Customer>, ServiceError>;
    async fn find_by_email_containing(&self, fragment: &str) -> Result<Vec<Customer>, ServiceError>;
}

/// In-memory repository for tests and database-less runs
pub mod mock {
    use super::*;
    use std::collections::BTreeMap;
    use tokio::sync::Mutex;

    #[derive(Default)]
    struct State {
        last_id: i64,
        rows: BTreeMap<i64, Customer>, // key: id
    }

    impl State {
        fn write(&mut self, draft: CustomerDraft) -> Customer {
            let id = draft.id.unwrap_or_else(|| {
                self.last_id += 1;
                self.last_id
            });
            let row = Customer { id, name: draft.name, email: draft.email };
            self.rows.insert(id, row.clone());
            row
        }

        fn check_target(&self, draft: &CustomerDraft) -> Result<(), ServiceError> {
            match draft.id {
                Some(id) if !self.rows.contains_key(&id) => Err(ServiceError::not_found("customer")),
                _ => Ok(()),
            }
        }

        fn matching(&self, pred: impl Fn(&Customer) -> bool) -> Vec<Customer> {
            self.rows.values().filter(|c| pred(c)).cloned().collect()
        }
    }

    #[derive(Default)]
    pub struct InMemoryCustomerRepository {
        state: Mutex<State>,
    }

    impl InMemoryCustomerRepository {
        pub fn new() -> Self { Self::default() }

        /// Number of stored rows.
        pub async fn len(&self) -> usize {
            self.state.lock().await.rows.len()
        }

        pub async fn is_empty(&self) -> bool {
            self.len().await == 0
        }
    }

    fn contains_ignore_case(haystack: &str, fragment: &str) -> bool {
        haystack.to_lowercase().contains(&fragment.to_lowercase())
    }

    #[async_trait]
    impl CustomerRepository for InMemoryCustomerRepository {
        async fn find_all_ordered_by_name(&self) -> Result<Vec<Customer>, ServiceError> {
            let state = self.state.lock().await;
            let mut all: Vec<Customer> = state.rows.values().cloned().collect();
            // stable sort keeps id order among equal names
            all.sort_by(|a, b| a.name.cmp(&b.name));
            Ok(all)
        }

        async fn find_by_id(&self, id: i64) -> Result<Option<Customer>, ServiceError> {
            Ok(self.state.lock().await.rows.get(&id).cloned())
        }

        async fn exists_by_id(&self, id: i64) -> Result<bool, ServiceError> {
            Ok(self.state.lock().await.rows.contains_key(&id))
        }

        async fn save(&self, draft: CustomerDraft) -> Result<Customer, ServiceError> {
            let mut state = self.state.lock().await;
            state.check_target(&draft)?;
            Ok(state.write(draft))
        }

        async fn save_all(&self, drafts: Vec<CustomerDraft>) -> Result<Vec<Customer>, ServiceError> {
            let mut state = self.state.lock().await;
            for draft in &drafts {
                state.check_target(draft)?;
            }
            Ok(drafts.into_iter().map(|d| state.write(d)).collect())
        }

        async fn delete_by_id(&self, id: i64) -> Result<(), ServiceError> {
            self.state.lock().await.rows.remove(&id);
            Ok(())
        }

        async fn delete_all(&self) -> Result<(), ServiceError> {
            self.state.lock().await.rows.clear();
            Ok(())
        }

        async fn find_by_name_containing(&self, fragment: &str) -> Result<Vec<Customer>, ServiceError> {
            let state = self.state.lock().await;
            Ok(state.matching(|c| contains_ignore_case(&c.name, fragment)))
        }

        async fn find_by_email_containing(&self, fragment: &str) -> Result<Vec<Customer>, ServiceError> {
            let state = self.state.lock().await;
            Ok(state.matching(|c| contains_ignore_case(&c.email, fragment)))
        }
    }

}
