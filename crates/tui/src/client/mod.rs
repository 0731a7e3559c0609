use api_types::{
    account::AccountTxn,
    transaction::{TransactionKind, TransactionRecord},
};
use history::TransactionSource;
use reqwest::{Method, RequestBuilder, Response, Url};
use serde::Deserialize;
use thiserror::Error;

use crate::error::{AppError, Result};

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("unauthorized")]
    Unauthorized,
    #[error("forbidden")]
    Forbidden,
    #[error("not found")]
    NotFound,
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("server error: {0}")]
    Server(String),
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    #[serde(alias = "message")]
    error: String,
}

#[derive(Debug, Clone)]
pub struct Client {
    base_url: Url,
    http: reqwest::Client,
    token: Option<String>,
}

impl Client {
    pub fn new(base_url: &str, token: Option<&str>) -> Result<Self> {
        // Url::join drops the last segment unless the base ends with a slash.
        let normalized = if base_url.ends_with('/') {
            base_url.to_string()
        } else {
            format!("{base_url}/")
        };
        let base_url = Url::parse(&normalized)
            .map_err(|err| AppError::Setting(format!("invalid base_url: {err}")))?;
        Ok(Self {
            base_url,
            http: reqwest::Client::new(),
            token: token.map(str::to_string),
        })
    }

    fn endpoint(&self, path: &str) -> std::result::Result<Url, ClientError> {
        self.base_url
            .join(path)
            .map_err(|err| ClientError::Server(format!("invalid base_url: {err}")))
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        let builder = self.http.request(method, url);
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    pub async fn transactions_by_customer(
        &self,
        customer_id: i64,
    ) -> std::result::Result<Vec<TransactionRecord>, ClientError> {
        let endpoint = self.endpoint(&format!("transaction/list/customer/{customer_id}"))?;
        let res = self.request(Method::GET, endpoint).send().await?;

        if res.status().is_success() {
            return Ok(res.json::<Vec<TransactionRecord>>().await?);
        }
        Err(error_from(res).await)
    }

    pub async fn deposit(&self, txn: &AccountTxn) -> std::result::Result<String, ClientError> {
        self.send_txn(Method::PUT, "account/deposit", txn).await
    }

    pub async fn withdraw(&self, txn: &AccountTxn) -> std::result::Result<String, ClientError> {
        self.send_txn(Method::PUT, "account/withdraw", txn).await
    }

    pub async fn transfer(&self, txn: &AccountTxn) -> std::result::Result<String, ClientError> {
        self.send_txn(Method::POST, "account/transferFunds", txn).await
    }

    /// Sends a validated entry to the endpoint matching its kind.
    pub async fn submit(
        &self,
        kind: TransactionKind,
        txn: &AccountTxn,
    ) -> std::result::Result<String, ClientError> {
        match kind {
            TransactionKind::Deposit => self.deposit(txn).await,
            TransactionKind::Withdraw => self.withdraw(txn).await,
            TransactionKind::Transfer => self.transfer(txn).await,
        }
    }

    async fn send_txn(
        &self,
        method: Method,
        path: &str,
        txn: &AccountTxn,
    ) -> std::result::Result<String, ClientError> {
        let endpoint = self.endpoint(path)?;
        let res = self.request(method, endpoint).json(txn).send().await?;

        if res.status().is_success() {
            return Ok(res.text().await?);
        }
        Err(error_from(res).await)
    }
}

impl TransactionSource for Client {
    type Error = ClientError;

    fn fetch_transactions(
        &self,
        owner_id: i64,
    ) -> impl Future<Output = std::result::Result<Vec<TransactionRecord>, ClientError>> + Send {
        self.transactions_by_customer(owner_id)
    }
}

async fn error_from(res: Response) -> ClientError {
    let status = res.status().as_u16();
    let body = res.text().await.unwrap_or_default();
    status_error(status, error_message(&body))
}

fn error_message(body: &str) -> String {
    if let Ok(err) = serde_json::from_str::<ErrorResponse>(body) {
        return err.error;
    }
    let trimmed = body.trim();
    if trimmed.is_empty() {
        "unknown error".to_string()
    } else {
        trimmed.to_string()
    }
}

fn status_error(status: u16, body: String) -> ClientError {
    match status {
        401 => ClientError::Unauthorized,
        403 => ClientError::Forbidden,
        404 => ClientError::NotFound,
        409 => ClientError::Conflict(body),
        400 | 422 => ClientError::Validation(body),
        _ => ClientError::Server(body),
    }
}
