//! A REST client for the Sbanken open banking API.

use reqwest::{Client as HttpClient, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use time::{Duration, OffsetDateTime};
use tokio::sync::Mutex;

use crate::{
    Error,
    account::Account,
    dates::format_iso_date,
    ledger::TransactionRecord,
    provider::{
        TransactionQuery,
        models::{ApiResponse, Customer, TokenResponse},
    },
};

/// The identity server that issues access tokens.
pub const DEFAULT_TOKEN_URL: &str = "https://auth.sbanken.no/identityserver/connect/token";
/// The base URL for the banking and customer APIs.
pub const DEFAULT_API_URL: &str = "https://api.sbanken.no";

const ACCOUNTS_PATH: &str = "/exec.bank/api/v1/Accounts";
const TRANSACTIONS_PATH: &str = "/exec.bank/api/v1/Transactions";
const CUSTOMERS_PATH: &str = "/exec.customers/api/v1/Customers";

/// Tokens are renewed this long before the identity server says they expire.
const TOKEN_EXPIRY_MARGIN: Duration = Duration::seconds(30);

/// The client ID and secret for an Sbanken API application.
#[derive(Clone)]
pub struct Credentials {
    /// The application's client ID.
    pub client_id: String,
    /// The application's secret.
    pub client_secret: String,
}

// Keep the secret out of logs.
impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"********")
            .finish()
    }
}

#[derive(Debug, Clone)]
struct AccessToken {
    value: String,
    expires_at: OffsetDateTime,
}

impl AccessToken {
    fn is_fresh(&self) -> bool {
        OffsetDateTime::now_utc() + TOKEN_EXPIRY_MARGIN < self.expires_at
    }
}

/// Client for the Sbanken API using the client credentials grant.
///
/// The access token is requested on first use and reused until it is about
/// to expire.
#[derive(Debug)]
pub struct SbankenClient {
    http_client: HttpClient,
    credentials: Credentials,
    token_url: String,
    api_url: String,
    token: Mutex<Option<AccessToken>>,
}

impl SbankenClient {
    /// Create a client for the production Sbanken API.
    pub fn new(credentials: Credentials) -> Self {
        Self::with_urls(credentials, DEFAULT_TOKEN_URL, DEFAULT_API_URL)
    }

    /// Create a client that talks to different servers, e.g. a local mock.
    pub fn with_urls(credentials: Credentials, token_url: &str, api_url: &str) -> Self {
        Self {
            http_client: HttpClient::new(),
            credentials,
            token_url: token_url.to_owned(),
            api_url: api_url.trim_end_matches('/').to_owned(),
            token: Mutex::new(None),
        }
    }

    /// Request a new access token from the identity server.
    ///
    /// # Errors
    /// Returns [Error::AuthenticationError] if the identity server rejects
    /// the credentials and [Error::HttpError] if it cannot be reached.
    pub async fn authenticate(&self) -> Result<(), Error> {
        let token = self.request_token().await?;
        *self.token.lock().await = Some(token);

        Ok(())
    }

    /// Get the signed in customer's details.
    pub async fn get_customer(&self, customer_id: &str) -> Result<Customer, Error> {
        let url = format!("{}{CUSTOMERS_PATH}", self.api_url);
        let request = self.http_client.get(url);

        self.send::<Customer>(request, customer_id)
            .await?
            .into_item()
    }

    /// List the customer's accounts.
    pub async fn get_accounts(&self, customer_id: &str) -> Result<Vec<Account>, Error> {
        let url = format!("{}{ACCOUNTS_PATH}", self.api_url);
        let request = self.http_client.get(url);

        self.send::<Account>(request, customer_id)
            .await?
            .into_items()
    }

    /// Get the transactions for one account within a date range.
    pub async fn get_transactions(
        &self,
        query: &TransactionQuery,
    ) -> Result<Vec<TransactionRecord>, Error> {
        let url = format!(
            "{}{TRANSACTIONS_PATH}/{}",
            self.api_url, query.account_id
        );
        let request = self.http_client.get(url).query(&[
            ("startDate", format_iso_date(query.start_date)),
            ("endDate", format_iso_date(query.end_date)),
        ]);

        self.send::<TransactionRecord>(request, &query.customer_id)
            .await?
            .into_items()
    }

    async fn send<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        customer_id: &str,
    ) -> Result<ApiResponse<T>, Error> {
        let token = self.access_token().await?;

        let response = request
            .bearer_auth(token)
            .header("customerId", customer_id)
            .send()
            .await
            .map_err(|error| Error::HttpError(format!("request failed: {error}")))?;

        let response = check_status(response).await?;

        response
            .json::<ApiResponse<T>>()
            .await
            .map_err(|error| Error::HttpError(format!("could not read the response: {error}")))
    }

    async fn access_token(&self) -> Result<String, Error> {
        let mut token = self.token.lock().await;

        match token.as_ref() {
            Some(current) if current.is_fresh() => Ok(current.value.clone()),
            _ => {
                tracing::debug!("requesting a new Sbanken access token");
                let new_token = self.request_token().await?;
                let value = new_token.value.clone();
                *token = Some(new_token);
                Ok(value)
            }
        }
    }

    async fn request_token(&self) -> Result<AccessToken, Error> {
        let response = self
            .http_client
            .post(&self.token_url)
            // The identity server expects URL encoded credentials in the basic auth header.
            .basic_auth(
                urlencoding::encode(&self.credentials.client_id),
                Some(urlencoding::encode(&self.credentials.client_secret)),
            )
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await
            .map_err(|error| Error::HttpError(format!("token request failed: {error}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::error!("token request was rejected with {status}: {body}");
            return Err(Error::AuthenticationError(format!("{status}: {body}")));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|error| Error::AuthenticationError(format!("invalid token: {error}")))?;

        let expires_at = OffsetDateTime::now_utc()
            .checked_add(Duration::seconds(token.expires_in))
            .ok_or_else(|| {
                Error::AuthenticationError(format!(
                    "token lifetime of {} seconds is out of range",
                    token.expires_in
                ))
            })?;

        Ok(AccessToken {
            value: token.access_token,
            expires_at,
        })
    }
}

/// Turn a non-success status into an error, keeping the body for the message.
async fn check_status(response: Response) -> Result<Response, Error> {
    let status = response.status();

    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    tracing::warn!("Sbanken API responded with {status}: {body}");

    // Error bodies usually carry the usual envelope, prefer its message.
    match serde_json::from_str::<ApiResponse<serde_json::Value>>(&body) {
        Ok(envelope) if envelope.is_error => Err(envelope.into_provider_error()),
        _ => Err(Error::HttpError(format!("{status}: {body}"))),
    }
}
