//! Wire types for the Sbanken REST API.

use serde::{Deserialize, Serialize};

use crate::Error;

/// The envelope wrapping every Sbanken API response.
///
/// List endpoints fill `items` and single-item endpoints fill `item`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct ApiResponse<T> {
    #[serde(default)]
    pub is_error: bool,
    #[serde(default)]
    pub error_type: Option<String>,
    #[serde(default)]
    pub error_message: Option<String>,
    #[serde(default = "Option::default")]
    pub item: Option<T>,
    #[serde(default = "Option::default")]
    pub items: Option<Vec<T>>,
}

impl<T> ApiResponse<T> {
    /// Take the list of items, or the provider's error.
    pub fn into_items(self) -> Result<Vec<T>, Error> {
        if self.is_error {
            return Err(self.into_provider_error());
        }

        Ok(self.items.unwrap_or_default())
    }

    /// Take the single item, or the provider's error.
    pub fn into_item(self) -> Result<T, Error> {
        if self.is_error {
            return Err(self.into_provider_error());
        }

        self.item.ok_or_else(|| Error::ProviderError {
            error_type: "MissingItem".to_owned(),
            message: "the response did not contain an item".to_owned(),
        })
    }

    pub fn into_provider_error(self) -> Error {
        Error::ProviderError {
            error_type: self.error_type.unwrap_or_default(),
            message: self.error_message.unwrap_or_default(),
        }
    }
}

/// The access token returned by the identity server.
#[derive(Debug, Deserialize)]
pub(super) struct TokenResponse {
    pub access_token: String,
    /// Lifetime of the token in seconds.
    pub expires_in: i64,
    #[allow(dead_code)]
    pub token_type: String,
}

/// The signed in customer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    /// The customer's national identity number.
    pub customer_id: String,
    /// The customer's first name.
    #[serde(default)]
    pub first_name: String,
    /// The customer's last name.
    #[serde(default)]
    pub last_name: String,
    /// The customer's email address, if they have one.
    #[serde(default)]
    pub email_address: Option<String>,
}

impl Customer {
    /// The customer's first and last name.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_owned()
    }
}
