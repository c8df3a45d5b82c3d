//! Fixtures

use std::{fs, path::PathBuf};

use rustc_hash::FxHashMap;
use thiserror::Error;

use crate::{
    cart::{Cart, MemoryStore},
    fixtures::{carts::CartFixture, menu::MenuFixture},
    products::{CartAddition, Catalog, CatalogError, Product},
    quantity::Quantity,
    settings::{SettingsError, StoreSettings},
};

pub mod carts;
pub mod menu;

/// Fixture Parsing Errors
#[derive(Debug, Error)]
pub enum FixtureError {
    /// IO error reading fixture files
    #[error("Failed to read fixture file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Invalid price format
    #[error("Invalid price format: {0}")]
    InvalidPrice(String),

    /// Unknown currency code
    #[error("Unknown currency code: {0}")]
    UnknownCurrency(String),

    /// Currency other than the store's
    #[error("Currency mismatch: expected {0}, found {1}")]
    CurrencyMismatch(String, String),

    /// Product not found
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// No selections loaded
    #[error("No selections loaded; cannot create cart")]
    NoSelections,

    /// Not enough selections in fixture
    #[error("Not enough selections in fixture, available: {available}, requested: {requested}")]
    NotEnoughSelections {
        /// Number of selections defined in the fixture
        available: usize,
        /// Number of selections requested
        requested: usize,
    },

    /// Selection does not resolve against the menu
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// Settings fixture error
    #[error(transparent)]
    Settings(#[from] SettingsError),
}

/// Fixture
#[derive(Debug)]
pub struct Fixture {
    /// Base path for fixture files
    base_path: PathBuf,

    /// Products by fixture key
    products: FxHashMap<String, Product>,

    /// Cart selections, resolved against the menu
    selections: Vec<CartAddition>,

    /// Store settings
    settings: StoreSettings,
}

impl Fixture {
    /// Create a new empty fixture with default base path
    pub fn new() -> Self {
        Self::with_base_path("./fixtures")
    }

    /// Create a new empty fixture with custom base path
    pub fn with_base_path(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
            products: FxHashMap::default(),
            selections: Vec::new(),
            settings: StoreSettings::default(),
        }
    }

    /// Load products from a YAML fixture file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or a price is invalid.
    pub fn load_menu(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        let file_path = self.base_path.join("menu").join(format!("{name}.yml"));
        let contents = fs::read_to_string(&file_path)?;
        let fixture: MenuFixture = serde_norway::from_str(&contents)?;

        for (key, product_fixture) in fixture.products {
            let product = Product::try_from(product_fixture)?;

            self.products.insert(key, product);
        }

        Ok(self)
    }

    /// Load cart selections from a YAML fixture file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or if a selection does
    /// not resolve against the loaded menu.
    pub fn load_cart(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        let file_path = self.base_path.join("carts").join(format!("{name}.yml"));
        let contents = fs::read_to_string(&file_path)?;
        let fixture: CartFixture = serde_norway::from_str(&contents)?;

        for selection in fixture.selections {
            let product = self.product(&selection.product)?;

            let size_id = product
                .sizes
                .iter()
                .find(|size| size.size == selection.size)
                .map(|size| size.id)
                .ok_or_else(|| FixtureError::ProductNotFound(selection.product.clone()))?;

            let addition = product.selection(
                size_id,
                &selection.addons,
                Quantity::clamped(selection.quantity),
            )?;

            self.selections.push(addition);
        }

        Ok(self)
    }

    /// Load store settings from a YAML fixture file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or holds invalid settings.
    pub fn load_settings(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        let file_path = self.base_path.join("settings").join(format!("{name}.yml"));

        self.settings = StoreSettings::from_yaml_file(file_path)?;

        Ok(self)
    }

    /// Load a complete fixture set (menu, cart and settings with the same name)
    ///
    /// # Errors
    ///
    /// Returns an error if any of the fixture files cannot be loaded.
    pub fn from_set(name: &str) -> Result<Self, FixtureError> {
        let mut fixture = Self::new();

        fixture
            .load_menu(name)?
            .load_cart(name)?
            .load_settings(name)?;

        Ok(fixture)
    }

    /// Get a product by its string key
    ///
    /// # Errors
    ///
    /// Returns an error if the product is not found.
    pub fn product(&self, key: &str) -> Result<&Product, FixtureError> {
        self.products
            .get(key)
            .ok_or_else(|| FixtureError::ProductNotFound(key.to_string()))
    }

    /// Get all resolved cart selections
    pub fn selections(&self) -> &[CartAddition] {
        &self.selections
    }

    /// Get the store settings
    pub fn settings(&self) -> &StoreSettings {
        &self.settings
    }

    /// Build a catalog from the loaded menu, ordered by product id
    pub fn catalog(&self) -> Catalog {
        let mut products: Vec<Product> = self.products.values().cloned().collect();

        products.sort_by_key(|product| product.id);

        Catalog::new(products)
    }

    /// Create a cart holding the first `n` selections, or all of them
    ///
    /// # Errors
    ///
    /// Returns an error if no selections are loaded or fewer than `n` exist.
    pub fn cart(&self, n: Option<usize>) -> Result<Cart<MemoryStore>, FixtureError> {
        if self.selections.is_empty() {
            return Err(FixtureError::NoSelections);
        }

        if let Some(n) = n
            && n > self.selections.len()
        {
            return Err(FixtureError::NotEnoughSelections {
                requested: n,
                available: self.selections.len(),
            });
        }

        let mut cart = Cart::default();

        for addition in self
            .selections
            .iter()
            .take(n.unwrap_or(self.selections.len()))
        {
            cart.add(addition.clone());
        }

        Ok(cart)
    }
}

impl Default for Fixture {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use tempfile::tempdir;
    use testresult::TestResult;

    use crate::prices::Price;

    use super::*;

    fn write_fixture(base: &Path, category: &str, name: &str, contents: &str) -> TestResult {
        let dir = base.join(category);

        fs::create_dir_all(&dir)?;
        fs::write(dir.join(format!("{name}.yml")), contents)?;

        Ok(())
    }

    #[test]
    fn fixture_loads_the_default_set() -> TestResult {
        let fixture = Fixture::from_set("kasi")?;

        assert!(fixture.catalog().len() >= 3);
        assert!(!fixture.selections().is_empty());
        assert_eq!(fixture.settings().store_name, "Kasi Bites");

        Ok(())
    }

    #[test]
    fn settings_fill_missing_fields_from_defaults() -> TestResult {
        let mut fixture = Fixture::new();
        fixture.load_settings("wide")?;

        let delivery = fixture.settings().delivery();

        assert_eq!(fixture.settings().store_name, "Kasi Bites Express");
        assert_eq!(delivery.fee_amount, Price::from_rand(25));
        assert!((delivery.max_radius_km - 5.0).abs() < f64::EPSILON);
        assert!(delivery.is_store_open);

        Ok(())
    }

    #[test]
    fn cart_adds_selections_and_merges_duplicates() -> TestResult {
        let dir = tempdir()?;

        write_fixture(
            dir.path(),
            "menu",
            "test",
            r#"
products:
  fries:
    id: 1
    name: Fries
    sizes:
      large: { id: 12, price: "45.00 ZAR" }
    addons:
      - { id: 3, name: Cheese, price: "10.00 ZAR" }
"#,
        )?;

        write_fixture(
            dir.path(),
            "carts",
            "test",
            r"
selections:
  - { product: fries, size: large, quantity: 2 }
  - { product: fries, size: large, addons: [3] }
  - { product: fries, size: large }
",
        )?;

        let mut fixture = Fixture::with_base_path(dir.path());
        fixture.load_menu("test")?.load_cart("test")?;

        let cart = fixture.cart(None)?;

        assert_eq!(cart.items().len(), 2);
        assert_eq!(cart.item_count(), 4);
        assert_eq!(cart.subtotal(), Price::from_rand(45 * 3 + 55));

        assert!(matches!(
            fixture.cart(Some(4)),
            Err(FixtureError::NotEnoughSelections { requested: 4, available: 3 })
        ));

        Ok(())
    }

    #[test]
    fn cart_selection_must_exist_on_menu() -> TestResult {
        let dir = tempdir()?;

        write_fixture(dir.path(), "menu", "empty", "products: {}\n")?;
        write_fixture(
            dir.path(),
            "carts",
            "empty",
            "selections:\n  - { product: burger, size: small }\n",
        )?;

        let mut fixture = Fixture::with_base_path(dir.path());
        fixture.load_menu("empty")?;

        assert!(matches!(
            fixture.load_cart("empty"),
            Err(FixtureError::ProductNotFound(key)) if key == "burger"
        ));
        assert!(matches!(fixture.cart(None), Err(FixtureError::NoSelections)));

        Ok(())
    }
}
