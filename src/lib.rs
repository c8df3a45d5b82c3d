//! Bites
//!
//! Bites is the cart and checkout core of a food-ordering app: a persistent cart with
//! line merging and quantity bounds, delivery eligibility by distance from the store,
//! checkout validation and order submission, and order status tracking.

pub mod cart;
pub mod checkout;
pub mod context;
pub mod delivery;
pub mod fixtures;
pub mod gateway;
pub mod items;
pub mod orders;
pub mod prelude;
pub mod prices;
pub mod pricing;
pub mod products;
pub mod quantity;
pub mod receipt;
pub mod settings;
pub mod utils;
