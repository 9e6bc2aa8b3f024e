//! Book model and related types

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Catalogue language, sent to the backend under its Ukrainian name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Language {
    #[serde(rename = "Українська")]
    Ukrainian,
    #[serde(rename = "Англійська")]
    English,
    #[serde(rename = "Німецька")]
    German,
    #[serde(rename = "Французька")]
    French,
    #[serde(rename = "Іспанська")]
    Spanish,
    #[serde(rename = "Румунська")]
    Romanian,
    #[serde(rename = "Словацька")]
    Slovak,
}

impl Language {
    pub const ALL: [Language; 7] = [
        Language::Ukrainian,
        Language::English,
        Language::German,
        Language::French,
        Language::Spanish,
        Language::Romanian,
        Language::Slovak,
    ];

    /// Wire value
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::Ukrainian => "Українська",
            Language::English => "Англійська",
            Language::German => "Німецька",
            Language::French => "Французька",
            Language::Spanish => "Іспанська",
            Language::Romanian => "Румунська",
            Language::Slovak => "Словацька",
        }
    }

    fn english_name(&self) -> &'static str {
        match self {
            Language::Ukrainian => "ukrainian",
            Language::English => "english",
            Language::German => "german",
            Language::French => "french",
            Language::Spanish => "spanish",
            Language::Romanian => "romanian",
            Language::Slovak => "slovak",
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Language {
    type Err = String;

    /// Accepts the wire value or the English name, case-insensitively
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Language::ALL
            .into_iter()
            .find(|l| l.english_name() == wanted || l.as_str().to_lowercase() == wanted)
            .ok_or_else(|| format!("Invalid language: {}", s))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BookStatus {
    New,
    Good,
    Damaged,
    Lost,
}

impl BookStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookStatus::New => "New",
            BookStatus::Good => "Good",
            BookStatus::Damaged => "Damaged",
            BookStatus::Lost => "Lost",
        }
    }
}

impl std::fmt::Display for BookStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for BookStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "new" => Ok(BookStatus::New),
            "good" => Ok(BookStatus::Good),
            "damaged" => Ok(BookStatus::Damaged),
            "lost" => Ok(BookStatus::Lost),
            _ => Err(format!("Invalid book status: {}", s)),
        }
    }
}

/// Loan entry embedded in a book's history
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BookLoan {
    pub id: i64,
    pub issue_date: String,
    pub due_date: String,
    pub is_returned: bool,
    pub return_date: Option<String>,
    pub user_id: i64,
}

/// Book as returned by the API
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub id: i64,
    pub book_title: String,
    pub publisher: String,
    /// Kept as sent; older records may carry languages outside [`Language`]
    pub language: String,
    pub location: String,
    pub year: i32,
    pub status: String,
    #[serde(default)]
    pub loan_history: Vec<BookLoan>,
}

impl Book {
    /// Whether a loan in the history is still open
    pub fn is_on_loan(&self) -> bool {
        self.loan_history.iter().any(|l| !l.is_returned)
    }
}

/// Create book request
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateBook {
    #[validate(length(min = 1, message = "Title is required"))]
    pub title: String,
    #[validate(length(min = 1, message = "Publisher is required"))]
    pub publisher: String,
    pub language: Language,
    #[validate(range(min = 1900, message = "Year must be 1900 or later"))]
    pub year: i32,
    #[validate(length(min = 1, message = "Location is required"))]
    pub location: String,
    pub status: BookStatus,
}

/// Update book request, absent fields are left untouched
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateBook {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, message = "Title is required"))]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, message = "Publisher is required"))]
    pub publisher: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<Language>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 1900, message = "Year must be 1900 or later"))]
    pub year: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, message = "Location is required"))]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<BookStatus>,
}
