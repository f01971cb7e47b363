//! Entity definitions and model-level rules for the customer store.

pub mod errors;
pub mod db;
pub mod customer;

#[cfg(test)]
mod tests;
