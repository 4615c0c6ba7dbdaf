//! [ExpenseApi] implementation for the REST backend.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder};

use crate::{
    Error,
    api::{ApiError, ExpenseApi, ExpenseQuery},
    dto::{ExpenseDto, ExpenseListDto},
    expense::{Expense, ExpenseId, NewExpense},
    logging::log_response_body,
};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Talks to the expense endpoints of the REST backend.
///
/// Expenses live under `{base_url}/api/expenses`.
#[derive(Debug, Clone)]
pub struct HttpExpenseApi {
    client: Client,
    base_url: String,
    access_token: Option<String>,
}

impl HttpExpenseApi {
    /// Create a client for the backend at `base_url`.
    ///
    /// `access_token` is sent as a bearer token with every request.
    ///
    /// # Errors
    /// Returns [Error::HttpClient] if the HTTP client could not be built.
    pub fn new(base_url: &str, access_token: Option<String>) -> Result<Self, Error> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|error| Error::HttpClient(error.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_owned(),
            access_token,
        })
    }

    fn expenses_url(&self) -> String {
        format!("{}/api/expenses", self.base_url)
    }

    fn expense_url(&self, id: &ExpenseId) -> String {
        format!("{}/api/expenses/{}", self.base_url, id)
    }

    fn request(&self, method: Method, url: &str) -> RequestBuilder {
        let builder = self.client.request(method, url);

        match &self.access_token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Send the request and return the response body of a successful response.
    async fn send(&self, builder: RequestBuilder) -> Result<String, ApiError> {
        let response = builder.send().await.map_err(|error| {
            tracing::error!("could not send request to backend: {error}");
            ApiError::Network(error.to_string())
        })?;

        let status = response.status();
        let url = response.url().clone();
        let body = response
            .text()
            .await
            .map_err(|error| ApiError::Network(error.to_string()))?;

        log_response_body(url.as_str(), status.as_u16(), &body);

        match classify_status(status.as_u16()) {
            Some(error) => Err(error),
            None => Ok(body),
        }
    }
}

#[async_trait]
impl ExpenseApi for HttpExpenseApi {
    async fn list_expenses(&self, query: ExpenseQuery) -> Result<Vec<Expense>, ApiError> {
        let mut builder = self.request(Method::GET, &self.expenses_url());

        if let Some(month) = query.month {
            builder = builder.query(&[("month", month.to_string())]);
        }

        let body = self.send(builder).await?;
        decode_expense_list(&body)
    }

    async fn create_expense(&self, expense: &NewExpense) -> Result<Expense, ApiError> {
        let builder = self.request(Method::POST, &self.expenses_url()).json(expense);

        let body = self.send(builder).await?;
        decode_expense(&body)
    }

    async fn update_expense(
        &self,
        id: &ExpenseId,
        expense: &NewExpense,
    ) -> Result<Expense, ApiError> {
        let builder = self.request(Method::PUT, &self.expense_url(id)).json(expense);

        let body = self.send(builder).await?;
        decode_expense(&body)
    }

    async fn delete_expense(&self, id: &ExpenseId) -> Result<(), ApiError> {
        let builder = self.request(Method::DELETE, &self.expense_url(id));

        self.send(builder).await.map(|_| ())
    }
}

/// Map an HTTP status code to the error it represents.
///
/// # Returns
/// `None` for success codes (2xx).
pub fn classify_status(status: u16) -> Option<ApiError> {
    match status {
        200..=299 => None,
        401 => Some(ApiError::Unauthenticated),
        404 => Some(ApiError::NotFound),
        status => Some(ApiError::Status(status)),
    }
}

/// Decode a list response body into expenses.
///
/// Unusable records are skipped; see [ExpenseDto::into_expense].
///
/// # Errors
/// Returns [ApiError::Decode] if the body is not a list or page of expenses.
pub fn decode_expense_list(body: &str) -> Result<Vec<Expense>, ApiError> {
    serde_json::from_str::<ExpenseListDto>(body)
        .map(ExpenseListDto::into_expenses)
        .map_err(|error| ApiError::Decode(error.to_string()))
}

/// Decode a single expense response body.
///
/// # Errors
/// Returns [ApiError::Decode] if the body is not an expense or the expense is
/// unusable.
pub fn decode_expense(body: &str) -> Result<Expense, ApiError> {
    serde_json::from_str::<ExpenseDto>(body)
        .map_err(|error| ApiError::Decode(error.to_string()))?
        .into_expense()
        .map_err(|error| ApiError::Decode(error.to_string()))
}
