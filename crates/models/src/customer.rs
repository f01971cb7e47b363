use once_cell::sync::Lazy;
use regex::Regex;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "customer")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub name: String,
    pub email: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

static EMAIL_SHAPE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9+_.-]+@[A-Za-z0-9.-]+\.com$").expect("valid email regex"));

/// Mail providers accepted as the first label of the domain.
pub const ALLOWED_PROVIDERS: [&str; 6] = ["gmail", "yahoo", "outlook", "hotmail", "icloud", "example"];

/// Local parts must be strictly longer than this.
pub const MIN_LOCAL_PART_EXCLUSIVE: usize = 5;

/// Narrow acceptance policy for customer emails. Not RFC validation.
///
/// An address passes when it has the `local@domain.com` shape, exactly one
/// `@`, a local part longer than five characters and a domain that starts with
/// an allowed provider label. Anything between the provider and the trailing
/// `.com` is tolerated, so `gmail.co.com` passes.
///
/// ```
/// use models::customer::is_valid_email;
/// assert!(is_valid_email("someone@gmail.com"));
/// assert!(!is_valid_email("ab@gmail.com"));
/// ```
pub fn is_valid_email(email: &str) -> bool {
    if !EMAIL_SHAPE_RE.is_match(email) {
        return false;
    }

    let mut parts = email.split('@');
    let (Some(local), Some(domain), None) = (parts.next(), parts.next(), parts.next()) else {
        return false;
    };
    if local.len() <= MIN_LOCAL_PART_EXCLUSIVE {
        return false;
    }

    let domain = domain.to_lowercase();
    ALLOWED_PROVIDERS.iter().any(|provider| {
        domain
            .strip_prefix(provider)
            .is_some_and(|rest| rest.starts_with('.'))
            && domain.ends_with(".com")
    })
}
