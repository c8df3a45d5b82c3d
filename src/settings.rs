//! Store settings
//!
//! Settings are fetched from the store API. Every field the API may leave out has a
//! fallback, and the whole object falls back to defaults if the fetch fails.

use std::{fs, path::Path};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::prices::Price;

/// Store name used when the API does not provide one.
pub const DEFAULT_STORE_NAME: &str = "Kasi Bites";

/// Delivery fee used when the API does not provide one, in rand.
pub const DEFAULT_DELIVERY_FEE: u32 = 30;

/// Delivery radius used when the API does not provide one.
pub const DEFAULT_DELIVERY_RADIUS_KM: f64 = 0.5;

/// Store latitude used when the API does not provide one.
pub const DEFAULT_STORE_LATITUDE: f64 = -33.011_664;

/// Store longitude used when the API does not provide one.
pub const DEFAULT_STORE_LONGITUDE: f64 = 27.866_664;

/// Errors raised while loading settings from a file.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// IO error reading the settings file
    #[error("Failed to read settings file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse settings: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// The configured delivery radius is not a positive number.
    #[error("delivery radius must be positive, got {0}")]
    InvalidRadius(f64),
}

/// The subset of store settings the pricing and eligibility rules read.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeliverySettings {
    /// Flat delivery fee
    pub fee_amount: Price,

    /// Furthest distance from the store that is still delivered to
    pub max_radius_km: f64,

    /// Store latitude in degrees
    pub store_latitude: f64,

    /// Store longitude in degrees
    pub store_longitude: f64,

    /// Minimum order amount
    pub minimum_order_amount: Price,

    /// Whether the store is currently taking orders
    pub is_store_open: bool,
}

impl Default for DeliverySettings {
    fn default() -> Self {
        StoreSettings::default().delivery()
    }
}

/// Settings as served by the store settings endpoint. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RemoteSettings {
    /// Store name
    #[serde(default)]
    pub store_name: Option<String>,

    /// Store street address
    #[serde(default)]
    pub store_address: Option<String>,

    /// Store phone number
    #[serde(default)]
    pub store_phone: Option<String>,

    /// Store latitude
    #[serde(default)]
    pub store_latitude: Option<f64>,

    /// Store longitude
    #[serde(default)]
    pub store_longitude: Option<f64>,

    /// Delivery fee
    #[serde(default)]
    pub delivery_fee: Option<Price>,

    /// Delivery radius in kilometres
    #[serde(default)]
    pub delivery_radius_km: Option<f64>,

    /// Minimum order amount
    #[serde(default)]
    pub minimum_order_amount: Option<Price>,

    /// Whether the store is open
    #[serde(default)]
    pub is_store_open: Option<bool>,
}

/// Resolved store settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreSettings {
    /// Store name
    pub store_name: String,

    /// Store street address
    #[serde(default)]
    pub store_address: Option<String>,

    /// Store phone number
    #[serde(default)]
    pub store_phone: Option<String>,

    /// Store latitude
    pub store_latitude: f64,

    /// Store longitude
    pub store_longitude: f64,

    /// Delivery fee
    pub delivery_fee: Price,

    /// Delivery radius in kilometres
    pub delivery_radius_km: f64,

    /// Minimum order amount
    pub minimum_order_amount: Price,

    /// Whether the store is open
    pub is_store_open: bool,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            store_name: DEFAULT_STORE_NAME.to_string(),
            store_address: None,
            store_phone: None,
            store_latitude: DEFAULT_STORE_LATITUDE,
            store_longitude: DEFAULT_STORE_LONGITUDE,
            delivery_fee: Price::from_rand(DEFAULT_DELIVERY_FEE),
            delivery_radius_km: DEFAULT_DELIVERY_RADIUS_KM,
            minimum_order_amount: Price::ZERO,
            is_store_open: true,
        }
    }
}

impl StoreSettings {
    /// Resolve fetched settings, filling any missing field from the defaults.
    ///
    /// `None` means the fetch failed or returned nothing, in which case the defaults
    /// are used as a whole.
    pub fn merge_with_defaults(remote: Option<RemoteSettings>) -> Self {
        let defaults = Self::default();

        let Some(remote) = remote else {
            tracing::warn!("store settings unavailable, using defaults");

            return defaults;
        };

        Self {
            store_name: remote
                .store_name
                .filter(|name| !name.is_empty())
                .unwrap_or(defaults.store_name),
            store_address: remote.store_address,
            store_phone: remote.store_phone,
            store_latitude: remote.store_latitude.unwrap_or(defaults.store_latitude),
            store_longitude: remote.store_longitude.unwrap_or(defaults.store_longitude),
            delivery_fee: remote.delivery_fee.unwrap_or(defaults.delivery_fee),
            delivery_radius_km: remote
                .delivery_radius_km
                .unwrap_or(defaults.delivery_radius_km),
            minimum_order_amount: remote
                .minimum_order_amount
                .unwrap_or(defaults.minimum_order_amount),
            is_store_open: remote.is_store_open.unwrap_or(defaults.is_store_open),
        }
    }

    /// Load settings from a YAML file, filling missing fields from the defaults.
    ///
    /// # Errors
    ///
    /// Returns a [`SettingsError`] if the file cannot be read or parsed, or if the
    /// delivery radius is not positive.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let contents = fs::read_to_string(path)?;
        let remote: RemoteSettings = serde_norway::from_str(&contents)?;
        let settings = Self::merge_with_defaults(Some(remote));

        if settings.delivery_radius_km <= 0.0 || !settings.delivery_radius_km.is_finite() {
            return Err(SettingsError::InvalidRadius(settings.delivery_radius_km));
        }

        Ok(settings)
    }

    /// The settings consumed by pricing and delivery eligibility.
    #[must_use]
    pub fn delivery(&self) -> DeliverySettings {
        DeliverySettings {
            fee_amount: self.delivery_fee,
            max_radius_km: self.delivery_radius_km,
            store_latitude: self.store_latitude,
            store_longitude: self.store_longitude,
            minimum_order_amount: self.minimum_order_amount,
            is_store_open: self.is_store_open,
        }
    }
}
