//! Loan management requests

use chrono::NaiveDate;
use validator::Validate;

use crate::{
    error::AppResult,
    models::loan::{CreateLoan, Loan, UpdateLoan},
    services::gateway::ApiClient,
};

#[derive(Clone, Debug)]
pub struct LoansApi {
    client: ApiClient,
}

impl LoansApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn list(&self) -> AppResult<Vec<Loan>> {
        self.client.get("/loans").await
    }

    pub async fn get(&self, id: i64) -> AppResult<Loan> {
        self.client.get(&format!("/loans/{}", id)).await
    }

    /// Lend a book to a user
    pub async fn create(&self, loan: &CreateLoan) -> AppResult<Loan> {
        loan.validate()?;
        let created: Loan = self.client.post("/loans", loan).await?;
        tracing::info!(
            "Created loan {} (book {}, user {})",
            created.id,
            loan.book_id,
            loan.user_id
        );
        Ok(created)
    }

    pub async fn update(&self, id: i64, loan: &UpdateLoan) -> AppResult<Loan> {
        loan.validate()?;
        self.client.put(&format!("/loans/{}", id), loan).await
    }

    /// Close a loan by marking it returned on `date`
    pub async fn mark_returned(&self, id: i64, date: NaiveDate) -> AppResult<Loan> {
        self.update(id, &UpdateLoan::returned_on(date)).await
    }

    pub async fn delete(&self, id: i64) -> AppResult<()> {
        self.client.delete(&format!("/loans/{}", id)).await?;
        tracing::info!("Deleted loan {}", id);
        Ok(())
    }
}
