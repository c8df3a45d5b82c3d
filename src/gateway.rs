//! Order API gateway
//!
//! The transport the checkout and tracking flows talk to. Implementations wrap an
//! HTTP client; tests use the generated [`MockOrderGateway`].

use async_trait::async_trait;
use mockall::automock;
use thiserror::Error;

use crate::{
    checkout::{OrderSubmission, ProfileUpdate},
    context::User,
    orders::{ApiOrder, OrderPage},
    products::Product,
    settings::RemoteSettings,
};

/// Errors returned by the order API.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GatewayError {
    /// The request never reached the server.
    #[error("network error: {0}")]
    Network(String),

    /// The server refused the request.
    #[error("request rejected with status {status}")]
    Rejected {
        /// HTTP status code
        status: u16,

        /// Message supplied by the server, if any
        message: Option<String>,
    },

    /// The requested resource does not exist.
    #[error("not found")]
    NotFound,
}

impl GatewayError {
    /// The single message shown to the customer.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            GatewayError::Network(_) => "Network error. Please check your connection.".to_string(),
            GatewayError::NotFound => "Order not found".to_string(),
            GatewayError::Rejected { message, .. } => message
                .as_deref()
                .filter(|message| !message.trim().is_empty())
                .unwrap_or("Something went wrong")
                .to_string(),
        }
    }
}

/// Remote order API.
#[automock]
#[async_trait]
pub trait OrderGateway: Send + Sync {
    /// Place an order.
    async fn create_order(&self, submission: &OrderSubmission) -> Result<ApiOrder, GatewayError>;

    /// Fetch a single order by its order number.
    async fn get_order(&self, order_number: &str) -> Result<ApiOrder, GatewayError>;

    /// Fetch a page of the signed-in customer's orders.
    async fn list_orders(&self, page: u32, per_page: u32) -> Result<OrderPage, GatewayError>;

    /// Update the signed-in customer's profile.
    async fn update_profile(&self, update: &ProfileUpdate) -> Result<User, GatewayError>;

    /// Fetch the menu.
    async fn list_products(&self) -> Result<Vec<Product>, GatewayError>;

    /// Fetch the store settings.
    async fn store_settings(&self) -> Result<RemoteSettings, GatewayError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn network_errors_have_one_message() {
        let err = GatewayError::Network("connection reset".to_string());

        assert_eq!(err.user_message(), "Network error. Please check your connection.");
    }

    #[test]
    fn rejections_prefer_the_server_message() {
        let with_message = GatewayError::Rejected {
            status: 422,
            message: Some("Store is closed".to_string()),
        };
        let without_message = GatewayError::Rejected {
            status: 500,
            message: None,
        };

        assert_eq!(with_message.user_message(), "Store is closed");
        assert_eq!(without_message.user_message(), "Something went wrong");
    }

    #[test]
    fn not_found_message() {
        assert_eq!(GatewayError::NotFound.user_message(), "Order not found");
    }
}
