//! Menu Fixtures

use rust_decimal::Decimal;
use rustc_hash::FxHashMap;
use rusty_money::iso;
use serde::Deserialize;

use crate::{
    fixtures::FixtureError,
    prices::{CURRENCY, Price},
    products::{CatalogAddon, Product, ProductSize, Size},
};

/// Wrapper for products in YAML
#[derive(Debug, Deserialize)]
pub struct MenuFixture {
    /// Map of product key -> product fixture
    pub products: FxHashMap<String, ProductFixture>,
}

/// Product Fixture
#[derive(Debug, Deserialize)]
pub struct ProductFixture {
    /// Product id
    pub id: u64,

    /// Product name
    pub name: String,

    /// Description
    #[serde(default)]
    pub description: Option<String>,

    /// Image URL
    #[serde(default)]
    pub image_url: Option<String>,

    /// Whether the product can be ordered
    #[serde(default = "available")]
    pub available: bool,

    /// Whether the product is featured
    #[serde(default)]
    pub featured: bool,

    /// Sale price (e.g., "39.99 ZAR")
    #[serde(default)]
    pub sale_price: Option<String>,

    /// Sizes keyed by size label
    pub sizes: FxHashMap<Size, SizeFixture>,

    /// Add-ons
    #[serde(default)]
    pub addons: Vec<AddonFixture>,
}

/// Size Fixture
#[derive(Debug, Deserialize)]
pub struct SizeFixture {
    /// Size reference
    pub id: u64,

    /// Price (e.g., "45.00 ZAR")
    pub price: String,
}

/// Add-on Fixture
#[derive(Debug, Deserialize)]
pub struct AddonFixture {
    /// Add-on id
    pub id: u64,

    /// Add-on name
    pub name: String,

    /// Price (e.g., "10.00 ZAR")
    pub price: String,

    /// Whether the add-on can be selected
    #[serde(default = "available")]
    pub available: bool,
}

fn available() -> bool {
    true
}

impl TryFrom<ProductFixture> for Product {
    type Error = FixtureError;

    fn try_from(fixture: ProductFixture) -> Result<Self, Self::Error> {
        let mut sizes = fixture
            .sizes
            .into_iter()
            .map(|(size, size_fixture)| {
                Ok(ProductSize {
                    id: size_fixture.id,
                    size,
                    price: parse_price(&size_fixture.price)?,
                })
            })
            .collect::<Result<Vec<_>, FixtureError>>()?;

        sizes.sort_by_key(|size| size.size);

        let addons = fixture
            .addons
            .into_iter()
            .map(|addon| {
                Ok(CatalogAddon {
                    id: addon.id,
                    name: addon.name,
                    description: None,
                    price: parse_price(&addon.price)?,
                    is_available: addon.available,
                })
            })
            .collect::<Result<Vec<_>, FixtureError>>()?;

        Ok(Product {
            id: fixture.id,
            name: fixture.name,
            description: fixture.description,
            image_url: fixture.image_url,
            is_available: fixture.available,
            is_featured: fixture.featured,
            sale_price: fixture.sale_price.as_deref().map(parse_price).transpose()?,
            sizes,
            addons,
        })
    }
}

/// Parse price string (e.g., "45.00 ZAR") into a price
///
/// # Errors
///
/// Returns an error if the string is not in the format "AMOUNT CURRENCY", if the
/// amount is not a non-negative decimal, or if the currency is not the store's.
pub fn parse_price(s: &str) -> Result<Price, FixtureError> {
    let parts: Vec<&str> = s.split_whitespace().collect();

    let [amount, currency_code] = parts.as_slice() else {
        return Err(FixtureError::InvalidPrice(format!(
            "Expected format 'AMOUNT CURRENCY', got: {s}"
        )));
    };

    let amount = amount
        .parse::<Decimal>()
        .map_err(|_err| FixtureError::InvalidPrice(s.to_string()))?;

    let currency = match *currency_code {
        "ZAR" => iso::ZAR,
        "GBP" => iso::GBP,
        "USD" => iso::USD,
        "EUR" => iso::EUR,
        other => return Err(FixtureError::UnknownCurrency(other.to_string())),
    };

    if currency != CURRENCY {
        return Err(FixtureError::CurrencyMismatch(
            CURRENCY.iso_alpha_code.to_string(),
            currency.iso_alpha_code.to_string(),
        ));
    }

    Price::new(amount).map_err(|_err| FixtureError::InvalidPrice(s.to_string()))
}
