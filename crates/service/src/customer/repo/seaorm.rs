use sea_orm::sea_query::{Expr, Func};
use sea_orm::{
    ActiveModelTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait, NotSet, PaginatorTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};

use models::customer;

use crate::customer::domain::{Customer, CustomerDraft};
use crate::customer::repository::CustomerRepository;
use crate::errors::ServiceError;

/// SeaORM-backed repository implementation.
pub struct SeaOrmCustomerRepository {
    pub db: DatabaseConnection,
}

impl SeaOrmCustomerRepository {
    pub fn new(db: DatabaseConnection) -> Self { Self { db } }

    async fn find_containing(&self, column: customer::Column, fragment: &str) -> Result<Vec<Customer>, ServiceError> {
        let pattern = format!("%{}%", escape_like(&fragment.to_lowercase()));
        Ok(customer::Entity::find()
            .filter(Expr::expr(Func::lower(Expr::col(column))).like(pattern))
            .order_by_asc(customer::Column::Id)
            .all(&self.db)
            .await?)
    }
}

/// Escape LIKE metacharacters so the fragment matches literally.
/// Postgres uses `\` as the default LIKE escape.
fn escape_like(fragment: &str) -> String {
    let mut out = String::with_capacity(fragment.len());
    for ch in fragment.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}

async fn write_draft<C: ConnectionTrait>(conn: &C, draft: CustomerDraft) -> Result<Customer, ServiceError> {
    match draft.id {
        None => {
            let am = customer::ActiveModel { id: NotSet, name: Set(draft.name), email: Set(draft.email) };
            Ok(am.insert(conn).await?)
        }
        Some(id) => {
            let am = customer::ActiveModel { id: Set(id), name: Set(draft.name), email: Set(draft.email) };
            match am.update(conn).await {
                Ok(m) => Ok(m),
                Err(DbErr::RecordNotUpdated) => Err(ServiceError::not_found("customer")),
                Err(e) => Err(e.into()),
            }
        }
    }
}

#[async_trait::async_trait]
impl CustomerRepository for SeaOrmCustomerRepository {
    async fn find_all_ordered_by_name(&self) -> Result<Vec<Customer>, ServiceError> {
        Ok(customer::Entity::find()
            .order_by_asc(customer::Column::Name)
            .order_by_asc(customer::Column::Id)
            .all(&self.db)
            .await?)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Customer>, ServiceError> {
        Ok(customer::Entity::find_by_id(id).one(&self.db).await?)
    }

    async fn exists_by_id(&self, id: i64) -> Result<bool, ServiceError> {
        let n = customer::Entity::find_by_id(id).count(&self.db).await?;
        Ok(n > 0)
    }

    async fn save(&self, draft: CustomerDraft) -> Result<Customer, ServiceError> {
        write_draft(&self.db, draft).await
    }

    async fn save_all(&self, drafts: Vec<CustomerDraft>) -> Result<Vec<Customer>, ServiceError> {
        let txn = self.db.begin().await?;
        let mut saved = Vec::with_capacity(drafts.len());
        for draft in drafts {
            // dropping `txn` on the error path rolls the batch back
            saved.push(write_draft(&txn, draft).await?);
        }
        txn.commit().await?;
        Ok(saved)
    }

    async fn delete_by_id(&self, id: i64) -> Result<(), ServiceError> {
        customer::Entity::delete_by_id(id).exec(&self.db).await?;
        Ok(())
    }

    async fn delete_all(&self) -> Result<(), ServiceError> {
        customer::Entity::delete_many().exec(&self.db).await?;
        Ok(())
    }

    async fn find_by_name_containing(&self, fragment: &str) -> Result<Vec<Customer>, ServiceError> {
        self.find_containing(customer::Column::Name, fragment).await
    }

    async fn find_by_email_containing(&self, fragment: &str) -> Result<Vec<Customer>, ServiceError> {
        self.find_containing(customer::Column::Email, fragment).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::customer::domain::CustomerInput;
    use crate::test_support::{db_tests_disabled, get_db};
    use uuid::Uuid;

    #[test]
    fn escape_like_quotes_metacharacters() {
        assert_eq!(escape_like("50%_off\\"), "50\\%\\_off\\\\");
        assert_eq!(escape_like("plain"), "plain");
    }

    #[tokio::test]
    async fn customer_crud_repository() -> Result<(), anyhow::Error> {
        if db_tests_disabled() { return Ok(()); }
        let repo = SeaOrmCustomerRepository::new(get_db().await?);

        let tag = Uuid::new_v4().simple().to_string();
        let created = repo
            .save(CustomerDraft::new(CustomerInput::new(format!("Repo {tag}"), format!("repo_{tag}@gmail.com"))))
            .await?;
        assert!(repo.exists_by_id(created.id).await?);

        let by_name = repo.find_by_name_containing(&format!("REPO {}", tag.to_uppercase())).await?;
        assert_eq!(by_name.iter().map(|c| c.id).collect::<Vec<_>>(), vec![created.id]);

        let by_email = repo.find_by_email_containing(&format!("repo_{tag}@GMAIL")).await?;
        assert_eq!(by_email.len(), 1);

        let updated = repo
            .save(CustomerDraft::with_id(created.id, CustomerInput::new("Renamed", format!("renamed_{tag}@yahoo.com"))))
            .await?;
        assert_eq!(updated.id, created.id);
        assert_eq!(repo.find_by_id(created.id).await?.unwrap().name, "Renamed");

        repo.delete_by_id(created.id).await?;
        assert!(!repo.exists_by_id(created.id).await?);
        Ok(())
    }

    #[tokio::test]
    async fn overwrite_of_missing_row_is_not_found() -> Result<(), anyhow::Error> {
        if db_tests_disabled() { return Ok(()); }
        let repo = SeaOrmCustomerRepository::new(get_db().await?);
        let err = repo
            .save(CustomerDraft::with_id(i64::MAX, CustomerInput::new("ghost", "ghost_user@gmail.com")))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
        Ok(())
    }

    #[tokio::test]
    async fn save_all_rolls_back_on_failure() -> Result<(), anyhow::Error> {
        if db_tests_disabled() { return Ok(()); }
        let repo = SeaOrmCustomerRepository::new(get_db().await?);

        let tag = Uuid::new_v4().simple().to_string();
        let drafts = vec![
            CustomerDraft::new(CustomerInput::new(format!("Batch {tag}"), format!("batch_{tag}@gmail.com"))),
            CustomerDraft::with_id(i64::MAX, CustomerInput::new("ghost", "ghost_user@gmail.com")),
        ];
        assert!(repo.save_all(drafts).await.is_err());
        assert!(repo.find_by_name_containing(&tag).await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn wildcards_in_search_are_literal() -> Result<(), anyhow::Error> {
        if db_tests_disabled() { return Ok(()); }
        let repo = SeaOrmCustomerRepository::new(get_db().await?);

        let tag = Uuid::new_v4().simple().to_string();
        let c = repo.save(CustomerDraft::new(CustomerInput::new(format!("{tag}_x"), "wild_card@gmail.com"))).await?;
        assert!(repo.find_by_name_containing(&format!("{tag}%")).await?.is_empty());
        assert_eq!(repo.find_by_name_containing(&format!("{tag}_")).await?.len(), 1);
        repo.delete_by_id(c.id).await?;
        Ok(())
    }
}
