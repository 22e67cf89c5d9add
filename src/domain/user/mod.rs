//! User domain
//!
//! Accounts, their validation rules and the store lookup used by login.

mod entity;
mod repository;
mod validation;

pub use entity::User;
pub use repository::UserStore;
pub use validation::{
    validate_email, validate_password, validate_person_name, validate_username,
    UserValidationError,
};
