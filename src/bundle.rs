//! Bundle documents as the source of charm references.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::errors::Result;
use crate::fetcher::{IconFetcher, IconMap};

/// The parts of a bundle that icon fetching needs.
///
/// Fields not listed here are ignored when deserializing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BundleData {
    /// Services keyed by service name.
    #[serde(default)]
    pub services: BTreeMap<String, ServiceSpec>,
    /// Default series for charms that do not name one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub series: Option<String>,
}

/// A single service in a bundle.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServiceSpec {
    /// Charm reference, e.g. `cs:trusty/wordpress-5`.
    pub charm: String,
    #[serde(default)]
    pub num_units: u32,
    #[serde(default)]
    pub annotations: BTreeMap<String, String>,
}

impl BundleData {
    /// Parses a bundle from a JSON document.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Returns each service's charm reference, ordered by service name.
    pub fn charm_refs(&self) -> Vec<&str> {
        self.services
            .values()
            .map(|service| service.charm.as_str())
            .collect()
    }
}

/// Fetches the icons for every charm used by `bundle`.
pub fn fetch_bundle_icons(fetcher: &dyn IconFetcher, bundle: &BundleData) -> Result<IconMap> {
    fetcher.fetch_icons(&bundle.charm_refs())
}
