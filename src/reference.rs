use std::fmt;
use std::str::FromStr;

use crate::errors::{IconError, Result};

/// Where a charm is published.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Schema {
    /// The public charm store (`cs:`).
    Store,
    /// A charm from a local repository (`local:`).
    Local,
}

impl Schema {
    /// Returns the string representation used as the reference prefix.
    pub fn as_str(&self) -> &'static str {
        match self {
            Schema::Store => "cs",
            Schema::Local => "local",
        }
    }
}

/// A parsed charm reference such as `cs:~user/trusty/wordpress-5`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CharmRef {
    pub schema: Schema,
    pub user: Option<String>,
    pub series: Option<String>,
    pub name: String,
    pub revision: Option<u32>,
}

impl CharmRef {
    /// Parses a raw reference of the form
    /// `schema:[~user/][series/]name[-revision]`.
    pub fn parse(raw: &str) -> Result<Self> {
        let fail = |message: String| IconError::Parse {
            reference: raw.to_string(),
            message,
        };

        let (schema, rest) = raw
            .split_once(':')
            .ok_or_else(|| fail("charm URL has no schema".to_string()))?;
        let schema = match schema {
            "cs" => Schema::Store,
            "local" => Schema::Local,
            other => return Err(fail(format!("charm URL has invalid schema {:?}", other))),
        };

        let mut parts: Vec<&str> = rest.split('/').collect();

        let mut user = None;
        if let Some(&first) = parts.first() {
            if let Some(name) = first.strip_prefix('~') {
                if schema == Schema::Local {
                    return Err(fail("local charm URL with user name".to_string()));
                }
                if !is_valid_user(name) {
                    return Err(fail(format!("charm URL has invalid user name {:?}", name)));
                }
                user = Some(name.to_string());
                parts.remove(0);
            }
        }

        let (series, name_rev) = match parts.as_slice() {
            [name_rev] => (None, *name_rev),
            [series, name_rev] => {
                if !is_valid_series(series) {
                    return Err(fail(format!("charm URL has invalid series {:?}", series)));
                }
                (Some(series.to_string()), *name_rev)
            }
            _ => return Err(fail("charm URL has invalid form".to_string())),
        };

        let (name, revision) = split_revision(name_rev)
            .map_err(|rev| fail(format!("charm URL has invalid revision {:?}", rev)))?;
        if !is_valid_name(name) {
            return Err(fail(format!("charm URL has invalid charm name {:?}", name)));
        }

        Ok(Self {
            schema,
            user,
            series,
            name: name.to_string(),
            revision,
        })
    }

    /// Returns the reference without its schema, e.g. `~user/trusty/wordpress-5`.
    ///
    /// This is the key icons are stored under, so references differing only
    /// by schema share an icon.
    pub fn path(&self) -> String {
        let mut path = String::new();
        if let Some(user) = &self.user {
            path.push('~');
            path.push_str(user);
            path.push('/');
        }
        if let Some(series) = &self.series {
            path.push_str(series);
            path.push('/');
        }
        path.push_str(&self.name);
        if let Some(revision) = self.revision {
            path.push('-');
            path.push_str(&revision.to_string());
        }
        path
    }
}

impl fmt::Display for CharmRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.schema.as_str(), self.path())
    }
}

impl FromStr for CharmRef {
    type Err = IconError;

    fn from_str(s: &str) -> Result<Self> {
        CharmRef::parse(s)
    }
}

/// Splits a trailing all-digit `-N` segment off as the revision.
///
/// Returns the offending text when the revision does not fit in a `u32`.
fn split_revision(name_rev: &str) -> std::result::Result<(&str, Option<u32>), &str> {
    match name_rev.rsplit_once('-') {
        Some((name, rev)) if !rev.is_empty() && rev.bytes().all(|b| b.is_ascii_digit()) => {
            let revision = rev.parse::<u32>().map_err(|_| rev)?;
            Ok((name, Some(revision)))
        }
        _ => Ok((name_rev, None)),
    }
}

fn is_valid_user(user: &str) -> bool {
    let mut chars = user.chars();
    match chars.next() {
        Some(c) if c.is_ascii_lowercase() || c.is_ascii_digit() => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '.' | '-'))
}

fn is_valid_series(series: &str) -> bool {
    let mut chars = series.chars();
    match chars.next() {
        Some(c) if c.is_ascii_lowercase() => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
}

// Every hyphen-separated segment needs a letter so that `-5` always reads
// as a revision.
fn is_valid_name(name: &str) -> bool {
    if !name.starts_with(|c: char| c.is_ascii_lowercase()) {
        return false;
    }
    name.split('-').all(|segment| {
        !segment.is_empty()
            && segment
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
            && segment.chars().any(|c| c.is_ascii_lowercase())
    })
}
