//! Offerings, packages and store products.
//!
//! An offering is the set of packages the paywall presents. Offerings are
//! fetched from the purchase service and treated as read-only afterwards.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// The duration class of a package, as configured on the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PackageType {
    Lifetime,
    Annual,
    SixMonth,
    ThreeMonth,
    TwoMonth,
    Monthly,
    Weekly,
    Custom,
    #[default]
    Unknown,
}

/// A product as listed by the platform store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreProduct {
    /// Store product identifier.
    pub identifier: String,
    /// Localized title.
    pub title: String,
    /// Localized description.
    #[serde(default)]
    pub description: String,
    /// Localized, formatted price (e.g. `"$4.99"`).
    pub price_string: String,
    /// Numeric price in `currency_code`.
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub currency_code: String,
}

/// A purchasable package inside an offering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Package {
    /// Package identifier (e.g. `$rc_monthly`).
    pub identifier: String,
    #[serde(default)]
    pub package_type: PackageType,
    pub product: StoreProduct,
    /// Identifier of the offering this package belongs to.
    pub offering_identifier: String,
}

impl Package {
    /// Returns the display price string of the underlying product.
    #[must_use]
    pub fn price_string(&self) -> &str {
        &self.product.price_string
    }

    /// Returns the product title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.product.title
    }
}

/// A bundle of packages presented together.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Offering {
    pub identifier: String,
    #[serde(default)]
    pub server_description: String,
    #[serde(default)]
    pub available_packages: Vec<Package>,
}

impl Offering {
    /// Looks up a package by identifier.
    #[must_use]
    pub fn package(&self, identifier: &str) -> Option<&Package> {
        self.available_packages
            .iter()
            .find(|p| p.identifier == identifier)
    }

    /// Returns the first package of the given type.
    #[must_use]
    pub fn package_of_type(&self, package_type: PackageType) -> Option<&Package> {
        self.available_packages
            .iter()
            .find(|p| p.package_type == package_type)
    }

    #[must_use]
    pub fn monthly(&self) -> Option<&Package> {
        self.package_of_type(PackageType::Monthly)
    }

    #[must_use]
    pub fn annual(&self) -> Option<&Package> {
        self.package_of_type(PackageType::Annual)
    }

    #[must_use]
    pub fn lifetime(&self) -> Option<&Package> {
        self.package_of_type(PackageType::Lifetime)
    }

    /// Returns true if the offering has nothing to sell.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.available_packages.is_empty()
    }
}

/// The full offerings catalog.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Offerings {
    /// The offering marked current on the dashboard, if any.
    #[serde(default)]
    pub current: Option<Offering>,
    /// Every offering keyed by identifier.
    #[serde(default)]
    pub all: HashMap<String, Offering>,
}

impl Offerings {
    /// Builds a catalog whose current offering is `offering`.
    #[must_use]
    pub fn with_current(offering: Offering) -> Self {
        let mut all = HashMap::new();
        all.insert(offering.identifier.clone(), offering.clone());
        Self {
            current: Some(offering),
            all,
        }
    }

    /// Looks up an offering by identifier.
    #[must_use]
    pub fn get(&self, identifier: &str) -> Option<&Offering> {
        self.all.get(identifier)
    }
}
