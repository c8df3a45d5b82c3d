//! Items

use std::fmt::{self, Display, Formatter};

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use uuid::Uuid;

use crate::{
    prices::Price,
    products::{AddOn, Size},
    quantity::Quantity,
};

/// Opaque, unique identifier of a cart line.
///
/// New lines get a time-ordered UUID, but any string read back from a snapshot is
/// accepted as is.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LineItemId(String);

impl LineItemId {
    /// Generates a fresh, time-ordered id.
    #[must_use]
    pub fn generate() -> Self {
        Self::from(Uuid::now_v7())
    }

    /// The id as stored.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<Uuid> for LineItemId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid.to_string())
    }
}

impl From<String> for LineItemId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for LineItemId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl Display for LineItemId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Add-on ids of a line, sorted ascending. Two lines with the same name, size and
/// signature are the same line.
pub type AddonSignature = SmallVec<[u64; 4]>;

/// Builds the signature for a set of add-ons.
pub fn addon_signature(addons: &[AddOn]) -> AddonSignature {
    let mut ids: AddonSignature = addons.iter().map(|addon| addon.id).collect();

    ids.sort_unstable();

    ids
}

/// A line in the cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    /// Unique line id
    pub id: LineItemId,

    /// Product reference
    pub product_id: String,

    /// Catalog size reference; required by the time the order is placed
    #[serde(default, rename = "productSizeId", skip_serializing_if = "Option::is_none")]
    pub size_ref: Option<u64>,

    /// Product name
    pub name: String,

    /// Portion size
    pub size: Size,

    /// Number of units
    pub quantity: Quantity,

    /// Price of one unit including add-ons
    #[serde(rename = "price")]
    pub unit_price: Price,

    /// Selected add-ons
    #[serde(default, skip_serializing_if = "SmallVec::is_empty")]
    pub addons: SmallVec<[AddOn; 4]>,

    /// Product image
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl LineItem {
    /// Price of the whole line.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.unit_price.times(self.quantity)
    }

    /// Add-on signature of this line.
    #[must_use]
    pub fn signature(&self) -> AddonSignature {
        addon_signature(&self.addons)
    }

    /// Checks whether this line is the same line as the given name, size and signature.
    #[must_use]
    pub fn matches(&self, name: &str, size: Size, signature: &[u64]) -> bool {
        self.name == name && self.size == size && self.signature().as_slice() == signature
    }

    /// Ids of the selected add-ons, in selection order.
    pub fn addon_ids(&self) -> impl Iterator<Item = u64> + '_ {
        self.addons.iter().map(|addon| addon.id)
    }
}
