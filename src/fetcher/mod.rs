//! Icon fetching module.
//!
//! Turns charm references into icon SVG data, either as inline links to a
//! remote URL or by downloading each unique icon over HTTP.

mod http;
mod link;

use std::collections::{HashMap, HashSet};

use tracing::debug;

use crate::errors::Result;
use crate::reference::CharmRef;

pub use http::{HttpClient, HttpFetcher, HttpResponse, UreqClient};
pub use link::{escape_xml, LinkFetcher};

/// Icon data keyed by charm path (see [`CharmRef::path`]).
pub type IconMap = HashMap<String, Vec<u8>>;

/// Number of icons fetched at once when no limit is configured.
pub const DEFAULT_CONCURRENCY: usize = 10;

/// Retrieves icons for a batch of charm references.
///
/// Implementations return exactly one entry per distinct charm path, or a
/// single error and no icons at all.
pub trait IconFetcher {
    fn fetch_icons(&self, refs: &[&str]) -> Result<IconMap>;
}

/// Parses every reference and drops those whose path was already seen.
///
/// Fails on the first unparseable reference before any icon is fetched.
pub(crate) fn unique_refs(refs: &[&str]) -> Result<Vec<(String, CharmRef)>> {
    let mut seen = HashSet::new();
    let mut unique = Vec::new();
    for raw in refs {
        let charm = CharmRef::parse(raw)?;
        let path = charm.path();
        if !seen.insert(path.clone()) {
            debug!(charm = %raw, path = %path, "skipping duplicate icon");
            continue;
        }
        unique.push((path, charm));
    }
    Ok(unique)
}
