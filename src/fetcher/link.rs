use std::sync::Arc;

use crate::errors::Result;
use crate::reference::CharmRef;

use super::{unique_refs, IconFetcher, IconMap};

/// Produces icons as SVG documents that link to the remote icon, so the
/// diagram references it instead of embedding its data.
pub struct LinkFetcher {
    icon_url: Arc<dyn Fn(&CharmRef) -> String + Send + Sync>,
}

impl LinkFetcher {
    /// Creates a fetcher that links each charm to the URL `icon_url` returns.
    pub fn new<F>(icon_url: F) -> Self
    where
        F: Fn(&CharmRef) -> String + Send + Sync + 'static,
    {
        Self {
            icon_url: Arc::new(icon_url),
        }
    }
}

impl IconFetcher for LinkFetcher {
    fn fetch_icons(&self, refs: &[&str]) -> Result<IconMap> {
        let icons = unique_refs(refs)?
            .into_iter()
            .map(|(path, charm)| {
                let svg = format!(
                    concat!(
                        "<svg xmlns:xlink=\"http://www.w3.org/1999/xlink\">\n",
                        "\t<image width=\"96\" height=\"96\" xlink:href=\"{}\" />\n",
                        "</svg>"
                    ),
                    escape_xml(&(self.icon_url)(&charm))
                );
                (path, svg.into_bytes())
            })
            .collect();
        Ok(icons)
    }
}

/// Escapes `text` for use in XML character data or a quoted attribute.
pub fn escape_xml(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '"' => escaped.push_str("&#34;"),
            '\'' => escaped.push_str("&#39;"),
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '\t' => escaped.push_str("&#x9;"),
            '\n' => escaped.push_str("&#xA;"),
            '\r' => escaped.push_str("&#xD;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
