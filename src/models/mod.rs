//! Data models for LibraryHub

pub mod auth;
pub mod book;
pub mod loan;
pub mod user;

// Re-export commonly used types
pub use auth::{AuthUser, ChangePassword, Login, LoginResponse, Register};
pub use book::{Book, BookLoan, BookStatus, CreateBook, Language, UpdateBook};
pub use loan::{CreateLoan, Loan, LoanBook, UpdateLoan};
pub use user::{Role, UpdateUser, User, UserLanguage};
