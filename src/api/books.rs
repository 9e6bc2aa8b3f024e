//! Book catalogue requests

use validator::Validate;

use crate::{
    error::AppResult,
    models::book::{Book, CreateBook, UpdateBook},
    services::gateway::ApiClient,
};

#[derive(Clone, Debug)]
pub struct BooksApi {
    client: ApiClient,
}

impl BooksApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn list(&self) -> AppResult<Vec<Book>> {
        self.client.get("/books").await
    }

    pub async fn get(&self, id: i64) -> AppResult<Book> {
        self.client.get(&format!("/books/{}", id)).await
    }

    pub async fn create(&self, book: &CreateBook) -> AppResult<Book> {
        book.validate()?;
        let created: Book = self.client.post("/books", book).await?;
        tracing::info!("Created book {} '{}'", created.id, created.book_title);
        Ok(created)
    }

    pub async fn update(&self, id: i64, book: &UpdateBook) -> AppResult<Book> {
        book.validate()?;
        self.client.put(&format!("/books/{}", id), book).await
    }

    pub async fn delete(&self, id: i64) -> AppResult<()> {
        self.client.delete(&format!("/books/{}", id)).await?;
        tracing::info!("Deleted book {}", id);
        Ok(())
    }
}
