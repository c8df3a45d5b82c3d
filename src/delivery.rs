//! Delivery eligibility
//!
//! Decides whether an address can be delivered to, based on its great-circle
//! distance from the store.

use std::fmt;

use tracing::{debug, info};

use crate::{checkout::OrderType, settings::DeliverySettings};

/// Mean Earth radius used by the haversine formula, in kilometres.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Distances below this are described as "very close".
const VERY_CLOSE_KM: f64 = 0.1;

/// A point on the globe, in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    /// Latitude in degrees
    pub latitude: f64,

    /// Longitude in degrees
    pub longitude: f64,
}

impl Coordinates {
    /// Creates new coordinates.
    #[must_use]
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Pairs up an optional latitude and longitude.
    #[must_use]
    pub fn from_parts(latitude: Option<f64>, longitude: Option<f64>) -> Option<Self> {
        Some(Self::new(latitude?, longitude?))
    }
}

/// Great-circle distance between two points in kilometres.
pub fn haversine_km(from: Coordinates, to: Coordinates) -> f64 {
    let lat1 = from.latitude.to_radians();
    let lat2 = to.latitude.to_radians();
    let d_lat = (to.latitude - from.latitude).to_radians();
    let d_lon = (to.longitude - from.longitude).to_radians();

    let a = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);

    2.0 * EARTH_RADIUS_KM * a.sqrt().atan2((1.0 - a).sqrt())
}

/// Outcome of checking an address against the delivery radius.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Eligibility {
    /// Distance from the store, if the address has coordinates.
    pub distance_km: Option<f64>,

    /// Whether delivery may be selected.
    pub is_available: bool,
}

impl Eligibility {
    /// Check whether the given destination is within the store's delivery radius.
    ///
    /// Without coordinates the address cannot be ruled out, so delivery stays
    /// available.
    pub fn check(destination: Option<Coordinates>, settings: &DeliverySettings) -> Self {
        let Some(destination) = destination else {
            debug!("no coordinates for delivery address, assuming deliverable");

            return Self {
                distance_km: None,
                is_available: true,
            };
        };

        let store = Coordinates::new(settings.store_latitude, settings.store_longitude);

        Self::for_distance(haversine_km(store, destination), settings.max_radius_km)
    }

    /// Eligibility for a known distance. The radius is inclusive.
    pub fn for_distance(distance_km: f64, max_radius_km: f64) -> Self {
        Self {
            distance_km: Some(distance_km),
            is_available: distance_km <= max_radius_km,
        }
    }

    /// Short description of the distance for display next to the address.
    #[must_use]
    pub fn note(&self) -> Option<DistanceNote> {
        self.distance_km.map(DistanceNote)
    }
}

/// Human readable distance from the store.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DistanceNote(f64);

impl fmt::Display for DistanceNote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 < VERY_CLOSE_KM {
            f.write_str("Very close to store")
        } else {
            write!(f, "{:.1}km from store", self.0)
        }
    }
}

/// Holds the customer's order type choice and applies the out-of-range policy.
///
/// Once an address turns out to be out of range, a delivery order is switched to
/// collection. It is never switched back automatically.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderTypeSelector {
    order_type: OrderType,
    delivery_allowed: bool,
}

impl Default for OrderTypeSelector {
    fn default() -> Self {
        Self {
            order_type: OrderType::Delivery,
            delivery_allowed: true,
        }
    }
}

impl OrderTypeSelector {
    /// The current order type.
    #[must_use]
    pub const fn order_type(&self) -> OrderType {
        self.order_type
    }

    /// Whether delivery may currently be chosen.
    #[must_use]
    pub const fn delivery_allowed(&self) -> bool {
        self.delivery_allowed
    }

    /// Select an order type. Selecting delivery is ignored while it is not allowed.
    ///
    /// Returns `true` if the selection took effect.
    pub fn select(&mut self, order_type: OrderType) -> bool {
        if order_type == OrderType::Delivery && !self.delivery_allowed {
            return false;
        }

        self.order_type = order_type;

        true
    }

    /// Apply a fresh eligibility result.
    ///
    /// Returns `true` if the order type was forced from delivery to collection.
    pub fn reconcile(&mut self, eligibility: &Eligibility) -> bool {
        self.delivery_allowed = eligibility.is_available;

        if !eligibility.is_available && self.order_type == OrderType::Delivery {
            info!(
                distance_km = ?eligibility.distance_km,
                "address outside delivery radius, switching to collection"
            );

            self.order_type = OrderType::Collection;

            return true;
        }

        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const STORE: Coordinates = Coordinates::new(-33.011_664, 27.866_664);

    fn settings(max_radius_km: f64) -> DeliverySettings {
        DeliverySettings {
            max_radius_km,
            ..DeliverySettings::default()
        }
    }

    #[test]
    fn distance_to_self_is_zero() {
        assert!(haversine_km(STORE, STORE).abs() < 1e-12);
    }

    #[test]
    fn distance_is_symmetric() {
        let other = Coordinates::new(-33.96, 18.60);

        let there = haversine_km(STORE, other);
        let back = haversine_km(other, STORE);

        assert!((there - back).abs() < 1e-9);
    }

    #[test]
    fn one_degree_of_latitude_is_about_111_km() {
        let a = Coordinates::new(0.0, 0.0);
        let b = Coordinates::new(1.0, 0.0);

        assert!((haversine_km(a, b) - 111.19).abs() < 0.01);
    }

    #[test]
    fn radius_boundary_is_inclusive() {
        assert!(Eligibility::for_distance(5.0, 5.0).is_available);
        assert!(!Eligibility::for_distance(5.0001, 5.0).is_available);
    }

    #[test]
    fn missing_coordinates_are_available() {
        let eligibility = Eligibility::check(None, &settings(0.5));

        assert!(eligibility.is_available);
        assert_eq!(eligibility.distance_km, None);
    }

    #[test]
    fn far_address_is_not_available() {
        let cape_town = Coordinates::new(-33.92, 18.42);

        let eligibility = Eligibility::check(Some(cape_town), &settings(0.5));

        assert!(!eligibility.is_available);
    }

    #[test]
    fn distance_note_formats() {
        assert_eq!(DistanceNote(0.05).to_string(), "Very close to store");
        assert_eq!(DistanceNote(0.43).to_string(), "0.4km from store");
    }

    #[test]
    fn selector_forces_collection_once_out_of_range() {
        let mut selector = OrderTypeSelector::default();

        let switched = selector.reconcile(&Eligibility::for_distance(3.0, 0.5));

        assert!(switched);
        assert_eq!(selector.order_type(), OrderType::Collection);
        assert!(!selector.select(OrderType::Delivery));
    }

    #[test]
    fn selector_does_not_switch_back_when_in_range_again() {
        let mut selector = OrderTypeSelector::default();

        selector.reconcile(&Eligibility::for_distance(3.0, 0.5));
        let switched = selector.reconcile(&Eligibility::for_distance(0.2, 0.5));

        assert!(!switched);
        assert_eq!(selector.order_type(), OrderType::Collection);
        assert!(selector.select(OrderType::Delivery));
        assert_eq!(selector.order_type(), OrderType::Delivery);
    }

    #[test]
    fn selector_leaves_collection_alone() {
        let mut selector = OrderTypeSelector::default();
        selector.select(OrderType::Collection);

        let switched = selector.reconcile(&Eligibility::for_distance(3.0, 0.5));

        assert!(!switched);
        assert_eq!(selector.order_type(), OrderType::Collection);
    }
}
