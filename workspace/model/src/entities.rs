//! This file serves as the root for all SeaORM entity modules.
//! We define the data models for the finance tracking application here.

pub mod account;
pub mod category;
pub mod transaction;

pub mod prelude {
    //! A prelude module for easy importing of all entities.
    pub use super::account::Entity as Account;
    pub use super::category::Entity as Category;
    pub use super::transaction::Entity as Transaction;
}
