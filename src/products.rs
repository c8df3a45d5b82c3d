//! Products
//!
//! Read-only catalog records as served by the store API, plus the pricing rules used
//! when a customer picks a size and add-ons for a product.

use std::fmt;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use thiserror::Error;

use crate::{prices::Price, quantity::Quantity};

/// Errors raised while resolving catalog selections.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    /// No product with the given id exists in the catalog.
    #[error("product {0} not found")]
    ProductNotFound(u64),

    /// The product is not currently available to order.
    #[error("product {0} is not available")]
    ProductUnavailable(u64),

    /// The product has no size with the given id.
    #[error("size {size} not found for product {product}")]
    SizeNotFound {
        /// Product id
        product: u64,

        /// Requested size id
        size: u64,
    },

    /// The product has no add-on with the given id.
    #[error("add-on {addon} not found for product {product}")]
    AddonNotFound {
        /// Product id
        product: u64,

        /// Requested add-on id
        addon: u64,
    },

    /// The add-on exists but is not currently available.
    #[error("add-on {0} is not available")]
    AddonUnavailable(u64),
}

/// Portion size of a product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Size {
    /// Small portion
    #[serde(alias = "small")]
    Small,

    /// Medium portion
    #[serde(alias = "medium")]
    Medium,

    /// Large portion
    #[serde(alias = "large")]
    Large,
}

impl Size {
    /// Display label for the size.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Size::Small => "Small",
            Size::Medium => "Medium",
            Size::Large => "Large",
        }
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Add-on as attached to a cart line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddOn {
    /// Add-on id, unique within its product
    pub id: u64,

    /// Add-on name
    pub name: String,

    /// Add-on price
    pub price: Price,
}

/// A purchasable size of a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductSize {
    /// Size id, referenced by order lines
    pub id: u64,

    /// Portion size
    pub size: Size,

    /// Price for this size
    pub price: Price,
}

/// Add-on as listed in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogAddon {
    /// Add-on id
    pub id: u64,

    /// Add-on name
    pub name: String,

    /// Optional description
    #[serde(default)]
    pub description: Option<String>,

    /// Add-on price
    pub price: Price,

    /// Whether the add-on can currently be selected
    #[serde(default = "available")]
    pub is_available: bool,
}

impl From<&CatalogAddon> for AddOn {
    fn from(addon: &CatalogAddon) -> Self {
        AddOn {
            id: addon.id,
            name: addon.name.clone(),
            price: addon.price,
        }
    }
}

/// Product
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Product id
    pub id: u64,

    /// Product name
    pub name: String,

    /// Optional description
    #[serde(default)]
    pub description: Option<String>,

    /// Optional image
    #[serde(default)]
    pub image_url: Option<String>,

    /// Whether the product can be ordered
    #[serde(default = "available")]
    pub is_available: bool,

    /// Whether the product is promoted on the home screen
    #[serde(default)]
    pub is_featured: bool,

    /// Sale price overriding every size price when set
    #[serde(default)]
    pub sale_price: Option<Price>,

    /// Available sizes
    #[serde(default)]
    pub sizes: Vec<ProductSize>,

    /// Add-ons offered with this product
    #[serde(default)]
    pub addons: Vec<CatalogAddon>,
}

fn available() -> bool {
    true
}

impl Product {
    /// Find one of this product's sizes by id.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::SizeNotFound`] if the product has no such size.
    pub fn size(&self, size_id: u64) -> Result<&ProductSize, CatalogError> {
        self.sizes
            .iter()
            .find(|size| size.id == size_id)
            .ok_or(CatalogError::SizeNotFound {
                product: self.id,
                size: size_id,
            })
    }

    /// Base price of one unit in the given size, before add-ons.
    ///
    /// A sale price replaces the size price for every size.
    #[must_use]
    pub fn unit_base_price(&self, size: &ProductSize) -> Price {
        self.sale_price.unwrap_or(size.price)
    }

    /// Add-ons that may currently be selected.
    pub fn available_addons(&self) -> impl Iterator<Item = &CatalogAddon> {
        self.addons.iter().filter(|addon| addon.is_available)
    }

    /// Resolve a customer's selection into the arguments for adding it to the cart.
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogError`] if the product is unavailable, or the size or any
    /// add-on cannot be resolved.
    pub fn selection(
        &self,
        size_id: u64,
        addon_ids: &[u64],
        quantity: Quantity,
    ) -> Result<CartAddition, CatalogError> {
        if !self.is_available {
            return Err(CatalogError::ProductUnavailable(self.id));
        }

        let size = self.size(size_id)?;

        let addons = addon_ids
            .iter()
            .map(|&addon_id| {
                let addon = self
                    .addons
                    .iter()
                    .find(|addon| addon.id == addon_id)
                    .ok_or(CatalogError::AddonNotFound {
                        product: self.id,
                        addon: addon_id,
                    })?;

                if addon.is_available {
                    Ok(AddOn::from(addon))
                } else {
                    Err(CatalogError::AddonUnavailable(addon_id))
                }
            })
            .collect::<Result<SmallVec<[AddOn; 4]>, _>>()?;

        Ok(CartAddition {
            name: self.name.clone(),
            size: size.size,
            quantity,
            base_price: self.unit_base_price(size),
            size_ref: Some(size.id),
            addons,
            image_url: self.image_url.clone(),
        })
    }
}

/// Everything needed to add a product selection to the cart.
#[derive(Debug, Clone, PartialEq)]
pub struct CartAddition {
    /// Product name
    pub name: String,

    /// Chosen size
    pub size: Size,

    /// Requested quantity
    pub quantity: Quantity,

    /// Unit price before add-ons
    pub base_price: Price,

    /// Catalog size reference
    pub size_ref: Option<u64>,

    /// Chosen add-ons
    pub addons: SmallVec<[AddOn; 4]>,

    /// Product image
    pub image_url: Option<String>,
}

impl CartAddition {
    /// Price of one unit including add-ons.
    #[must_use]
    pub fn unit_price(&self) -> Price {
        self.base_price + self.addons.iter().map(|addon| addon.price).sum::<Price>()
    }

    /// Price of the whole selection, as shown on the "add to cart" button.
    #[must_use]
    pub fn line_price(&self) -> Price {
        self.unit_price().times(self.quantity)
    }
}

/// The product catalog, indexed by product id.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    products: Vec<Product>,
    index: FxHashMap<u64, usize>,
}

impl Catalog {
    /// Build a catalog from a product listing.
    #[must_use]
    pub fn new(products: Vec<Product>) -> Self {
        let index = products
            .iter()
            .enumerate()
            .map(|(idx, product)| (product.id, idx))
            .collect();

        Self { products, index }
    }

    /// Look up a product by id.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::ProductNotFound`] if the id is unknown.
    pub fn product(&self, id: u64) -> Result<&Product, CatalogError> {
        self.index
            .get(&id)
            .and_then(|&idx| self.products.get(idx))
            .ok_or(CatalogError::ProductNotFound(id))
    }

    /// Products that can currently be ordered, in listing order.
    pub fn available(&self) -> impl Iterator<Item = &Product> {
        self.products.iter().filter(|product| product.is_available)
    }

    /// Featured products that can currently be ordered.
    pub fn featured(&self) -> impl Iterator<Item = &Product> {
        self.available().filter(|product| product.is_featured)
    }

    /// Number of products in the catalog.
    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Check if the catalog is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}
