//! Order submission payloads
//!
//! Serialised exactly as the order API expects them. Optional values are omitted
//! rather than sent as `null`.

use serde::Serialize;
use smallvec::SmallVec;

use crate::checkout::{OrderType, PaymentMethod};

/// Body of the order creation call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderSubmission {
    /// Customer's full name
    pub customer_name: String,

    /// Customer's phone number, as entered
    pub customer_phone: String,

    /// Delivery or collection
    pub order_type: OrderType,

    /// Delivery or contact address
    pub delivery_address: String,

    /// Address latitude
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivery_latitude: Option<f64>,

    /// Address longitude
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivery_longitude: Option<f64>,

    /// Cash or card
    pub payment_method: PaymentMethod,

    /// Special instructions
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,

    /// Ordered lines
    #[serde(rename = "items")]
    pub line_items: Vec<SubmissionLine>,
}

/// A single ordered line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubmissionLine {
    /// Catalog size reference
    #[serde(rename = "product_size_id")]
    pub size_ref: u64,

    /// Number of units
    pub quantity: u32,

    /// Selected add-on ids
    pub addon_ids: SmallVec<[u64; 4]>,
}

/// Body of the profile update call made when the customer saves their address.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProfileUpdate {
    /// New display name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// New phone number
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,

    /// New default address
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_address: Option<String>,

    /// Default address latitude
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_address_latitude: Option<f64>,

    /// Default address longitude
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_address_longitude: Option<f64>,
}

impl ProfileUpdate {
    /// An update that only replaces the default address.
    #[must_use]
    pub fn default_address(
        address: impl Into<String>,
        latitude: Option<f64>,
        longitude: Option<f64>,
    ) -> Self {
        Self {
            default_address: Some(address.into()),
            default_address_latitude: latitude,
            default_address_longitude: longitude,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use smallvec::smallvec;
    use testresult::TestResult;

    use super::*;

    #[test]
    fn serialises_with_api_field_names() -> TestResult {
        let submission = OrderSubmission {
            customer_name: "Thandi".to_string(),
            customer_phone: "0821234567".to_string(),
            order_type: OrderType::Collection,
            delivery_address: "12 Main Road, Mdantsane".to_string(),
            delivery_latitude: None,
            delivery_longitude: None,
            payment_method: PaymentMethod::Card,
            notes: None,
            line_items: vec![SubmissionLine {
                size_ref: 12,
                quantity: 2,
                addon_ids: smallvec![3, 1],
            }],
        };

        assert_eq!(
            serde_json::to_value(&submission)?,
            json!({
                "customer_name": "Thandi",
                "customer_phone": "0821234567",
                "order_type": "collection",
                "delivery_address": "12 Main Road, Mdantsane",
                "payment_method": "card",
                "items": [{"product_size_id": 12, "quantity": 2, "addon_ids": [3, 1]}]
            })
        );

        Ok(())
    }

    #[test]
    fn profile_update_only_sends_address() -> TestResult {
        let update = ProfileUpdate::default_address("12 Main Road", Some(-33.0), Some(27.8));

        assert_eq!(
            serde_json::to_value(&update)?,
            json!({
                "default_address": "12 Main Road",
                "default_address_latitude": -33.0,
                "default_address_longitude": 27.8
            })
        );

        Ok(())
    }
}
