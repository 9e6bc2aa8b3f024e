//! Loan model and related types

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

/// Book summary attached to a loan
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoanBook {
    pub id: i64,
    pub title: String,
    pub status: String,
}

/// Loan as returned by the API. Dates are kept as the server sends them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Loan {
    pub id: i64,
    pub issue_date: String,
    pub due_date: String,
    pub is_returned: bool,
    pub return_date: Option<String>,
    pub user_id: i64,
    pub book: Option<LoanBook>,
}

/// Create loan request. Dates serialize as `YYYY-MM-DD`.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_create_loan_dates"))]
pub struct CreateLoan {
    pub issue_date: NaiveDate,
    pub due_date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_returned: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub return_date: Option<NaiveDate>,
    pub user_id: i64,
    pub book_id: i64,
}

/// Update loan request, absent fields are left untouched
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateLoan {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issue_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_returned: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub return_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub book_id: Option<i64>,
}

impl UpdateLoan {
    /// Mark a loan as returned on `date`
    pub fn returned_on(date: NaiveDate) -> Self {
        Self {
            is_returned: Some(true),
            return_date: Some(date),
            ..Self::default()
        }
    }
}

fn validate_create_loan_dates(loan: &CreateLoan) -> Result<(), ValidationError> {
    if loan.due_date < loan.issue_date {
        let mut err = ValidationError::new("due_before_issue");
        err.message = Some("Due date cannot be before the issue date".into());
        return Err(err);
    }
    Ok(())
}
