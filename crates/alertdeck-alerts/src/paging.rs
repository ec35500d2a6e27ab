//! Pagination metadata returned alongside listings

use std::collections::BTreeMap;

use alertdeck_http::header::HeaderMap;

const TOTAL_HEADERS: [&str; 2] = ["x-total-count", "total"];

/// Totals and navigation links parsed from response headers
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Paging {
    pub total: Option<u64>,
    /// `rel` name to URL, e.g. `next`, `prev`, `last`
    pub links: BTreeMap<String, String>,
}

impl Paging {
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let total = TOTAL_HEADERS
            .iter()
            .filter_map(|name| headers.get(*name))
            .filter_map(|value| value.to_str().ok())
            .find_map(|value| value.trim().parse().ok());

        let links = headers
            .get_all("link")
            .iter()
            .filter_map(|value| value.to_str().ok())
            .flat_map(parse_link_header)
            .collect();

        Self { total, links }
    }

    pub fn link(&self, rel: &str) -> Option<&str> {
        self.links.get(rel).map(String::as_str)
    }

    pub fn has_next(&self) -> bool {
        self.links.contains_key("next")
    }
}

/// Parse `<url>; rel="next", <url>; rel="last"` into `(rel, url)` pairs.
/// URLs may contain commas, so entries are delimited by the `<...>`
/// brackets. Entries without a `rel` parameter are skipped.
fn parse_link_header(value: &str) -> Vec<(String, String)> {
    let mut links = Vec::new();
    let mut rest = value;
    while let Some(open) = rest.find('<') {
        let Some(close) = rest[open..].find('>').map(|i| open + i) else {
            break;
        };
        let url = rest[open + 1..close].trim();
        let after = &rest[close + 1..];
        let params_end = after.find('<').unwrap_or(after.len());
        let rel = after[..params_end].split(';').find_map(|param| {
            let (key, value) = param.split_once('=')?;
            (key.trim() == "rel").then(|| {
                value
                    .trim()
                    .trim_end_matches(',')
                    .trim()
                    .trim_matches('"')
                    .to_string()
            })
        });
        if let Some(rel) = rel {
            links.push((rel, url.to_string()));
        }
        rest = &after[params_end..];
    }
    links
}

/// One page of a listing
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub paging: Paging,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, paging: Paging) -> Self {
        Self { items, paging }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            paging: self.paging,
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
