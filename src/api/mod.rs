//! Typed request functions for the LibraryHub REST endpoints.
//!
//! Each resource wraps the shared [`ApiClient`](crate::services::gateway::ApiClient),
//! so token injection, envelope unwrapping and 401 handling apply uniformly.

pub mod auth;
pub mod books;
pub mod loans;
pub mod users;

pub use auth::AuthApi;
pub use books::BooksApi;
pub use loans::LoansApi;
pub use users::UsersApi;
