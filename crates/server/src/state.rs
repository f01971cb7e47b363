use std::sync::Arc;

use service::customer::{CustomerRepository, CustomerService};
use tracing::info;

use crate::routes::greetings::NameBook;

/// Shared router state. Cloning is cheap; everything lives behind `Arc`.
#[derive(Clone)]
pub struct ServerState {
    pub customers: Arc<CustomerService<dyn CustomerRepository>>,
    pub names: Arc<NameBook>,
}

impl ServerState {
    pub fn new(repo: Arc<dyn CustomerRepository>) -> Self {
        Self {
            customers: Arc::new(CustomerService::new(repo)),
            names: Arc::new(NameBook::new()),
        }
    }

    /// Release process-scoped demo state once the server has stopped.
    pub async fn teardown(&self) {
        let dropped = self.names.clear().await;
        info!(dropped, "name_book_cleared");
    }
}
