//! Resource URI parsing and template matching.
//!
//! Resource URIs look like `scheme://path?key=value&key=value`. A template is
//! a URI whose path contains `{name}` placeholders, e.g.
//! `accounts://{account_id}/transactions`. Matching a concrete URI against a
//! template binds every placeholder to exactly one path segment.
//!
//! Keys and values are taken verbatim: nothing is percent-decoded on parse
//! and nothing is percent-encoded on build.
//!
//! ```rust
//! use openfinance_core::uri::ResourceUri;
//!
//! let resource = ResourceUri::match_template(
//!     "accounts://{account_id}/transactions",
//!     "accounts://abc123/transactions?page=2",
//! )?;
//! assert_eq!(resource.path_param("account_id"), Some("abc123"));
//! assert_eq!(resource.query_params()["page"], vec![String::from("2")]);
//! # Ok::<(), openfinance_core::UriError>(())
//! ```

mod query;

use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};
use std::sync::LazyLock;

use regex::Regex;

use crate::error::UriError;

pub use query::{get_int, get_string, get_string_array, get_time, QueryParams, TimeLayout};

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{([^{}]+)\}").expect("placeholder pattern is valid"));

/// A parsed resource URI.
///
/// Path and query parameters are filled in while parsing or matching and are
/// read-only afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceUri {
    full: String,
    scheme: String,
    path: String,
    path_params: BTreeMap<String, String>,
    query_params: QueryParams,
}

impl ResourceUri {
    /// Splits `uri` into scheme, path and query parameters.
    ///
    /// Repeated query keys accumulate in order of appearance; a key without
    /// `=` gets an empty value.
    pub fn parse(uri: &str) -> Result<Self, UriError> {
        let (scheme, remainder) = uri
            .split_once("://")
            .ok_or_else(|| UriError::Malformed {
                uri: uri.to_owned(),
            })?;

        let (path, query) = match remainder.split_once('?') {
            Some((path, query)) => (path, Some(query)),
            None => (remainder, None),
        };

        let mut query_params = QueryParams::new();
        for part in query.into_iter().flat_map(|q| q.split('&')) {
            if part.is_empty() {
                continue;
            }
            let (key, value) = part.split_once('=').unwrap_or((part, ""));
            query_params
                .entry(key.to_owned())
                .or_default()
                .push(value.to_owned());
        }

        Ok(Self {
            full: uri.to_owned(),
            scheme: scheme.to_owned(),
            path: path.to_owned(),
            path_params: BTreeMap::new(),
            query_params,
        })
    }

    /// Matches `concrete` against `template`, binding placeholders to path segments.
    ///
    /// Query placeholders in the template are documentation only; the returned
    /// query parameters are whatever the concrete URI carries.
    pub fn match_template(template: &str, concrete: &str) -> Result<Self, UriError> {
        UriTemplate::parse(template)?.match_uri(concrete)
    }

    /// Fills every `{name}` placeholder in `template` and appends `query_params`.
    ///
    /// Any query string on the template itself is dropped. Query keys are
    /// emitted in sorted order, values in their given order.
    pub fn build(
        template: &str,
        path_params: &BTreeMap<String, String>,
        query_params: &QueryParams,
    ) -> Result<String, UriError> {
        let base = template.split_once('?').map_or(template, |(base, _)| base);

        if let Some(missing) = PLACEHOLDER
            .captures_iter(base)
            .map(|caps| caps[1].to_owned())
            .find(|name| !path_params.contains_key(name))
        {
            return Err(UriError::MissingPathParam { name: missing });
        }

        let mut uri = PLACEHOLDER
            .replace_all(base, |caps: &regex::Captures<'_>| {
                path_params
                    .get(&caps[1])
                    .cloned()
                    .unwrap_or_default()
            })
            .into_owned();

        let pairs = query_params
            .iter()
            .flat_map(|(key, values)| values.iter().map(move |value| format!("{key}={value}")))
            .collect::<Vec<_>>();
        if !pairs.is_empty() {
            uri.push('?');
            uri.push_str(&pairs.join("&"));
        }

        Ok(uri)
    }

    pub fn full(&self) -> &str {
        &self.full
    }

    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn path_param(&self, name: &str) -> Option<&str> {
        self.path_params.get(name).map(String::as_str)
    }

    pub fn path_params(&self) -> &BTreeMap<String, String> {
        &self.path_params
    }

    pub fn query_params(&self) -> &QueryParams {
        &self.query_params
    }
}

impl Display for ResourceUri {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.full)
    }
}

/// A template compiled once and matched many times.
#[derive(Debug, Clone)]
pub struct UriTemplate {
    raw: String,
    scheme: String,
    names: Vec<String>,
    pattern: Regex,
}

impl UriTemplate {
    pub fn parse(template: &str) -> Result<Self, UriError> {
        let parsed = ResourceUri::parse(template)?;

        let mut pattern = String::from("^");
        let mut names = Vec::new();
        let mut cursor = 0;
        for caps in PLACEHOLDER.captures_iter(&parsed.path) {
            let whole = caps.get(0).expect("capture group 0 always participates");
            pattern.push_str(&regex::escape(&parsed.path[cursor..whole.start()]));
            pattern.push_str("([^/]+)");
            names.push(caps[1].to_owned());
            cursor = whole.end();
        }
        pattern.push_str(&regex::escape(&parsed.path[cursor..]));
        pattern.push('$');

        let pattern = Regex::new(&pattern).map_err(|error| UriError::InvalidTemplate {
            template: template.to_owned(),
            reason: error.to_string(),
        })?;

        Ok(Self {
            raw: template.to_owned(),
            scheme: parsed.scheme,
            names,
            pattern,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    /// Placeholder names in declaration order.
    pub fn param_names(&self) -> &[String] {
        &self.names
    }

    pub fn match_uri(&self, concrete: &str) -> Result<ResourceUri, UriError> {
        let mut resource = ResourceUri::parse(concrete)?;

        if self.scheme != resource.scheme {
            return Err(UriError::SchemeMismatch {
                expected: self.scheme.clone(),
                actual: resource.scheme,
            });
        }

        let caps = self
            .pattern
            .captures(&resource.path)
            .ok_or_else(|| UriError::PathMismatch {
                template: self.raw.clone(),
                path: resource.path.clone(),
            })?;

        // Repeated names are not supported: the last occurrence wins.
        let bound = self
            .names
            .iter()
            .enumerate()
            .filter_map(|(index, name)| {
                caps.get(index + 1)
                    .map(|value| (name.clone(), value.as_str().to_owned()))
            })
            .collect::<Vec<_>>();
        resource.path_params.extend(bound);

        Ok(resource)
    }
}
