//! Cart Fixtures

use serde::Deserialize;

use crate::products::Size;

/// Wrapper for cart selections in YAML
#[derive(Debug, Deserialize)]
pub struct CartFixture {
    /// Selections, in the order they are added
    pub selections: Vec<SelectionFixture>,
}

/// A product selection, referencing the menu by product key
#[derive(Debug, Deserialize)]
pub struct SelectionFixture {
    /// Product key in the menu fixture
    pub product: String,

    /// Chosen size
    pub size: Size,

    /// Chosen add-on ids
    #[serde(default)]
    pub addons: Vec<u64>,

    /// Requested quantity
    #[serde(default = "one")]
    pub quantity: i64,
}

fn one() -> i64 {
    1
}
