//! Bookmarkable state of the invoices list: search text and page.

use std::fmt;
use url::form_urlencoded;

/// Path of the invoices list.
pub const INVOICES_PATH: &str = "/invoices";

/// `query` and `page` as carried in the list's query string.
///
/// `query` is omitted from the query string when empty. A missing, zero or
/// unparsable `page` reads as 1.
///
/// ```
/// use invoice_kit::location::ListLocation;
///
/// let loc = ListLocation::parse("?query=lee+robinson&page=2");
/// assert_eq!(loc.query, "lee robinson");
/// assert_eq!(loc.page, 2);
/// assert_eq!(loc.to_query_string(), "query=lee+robinson&page=2");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ListLocation {
    pub query: String,
    pub page: u32,
}

impl Default for ListLocation {
    fn default() -> Self {
        ListLocation {
            query: String::new(),
            page: 1,
        }
    }
}

impl ListLocation {
    /// Parse a query string, with or without the leading `?`.
    pub fn parse(search: &str) -> Self {
        let mut location = ListLocation::default();
        let raw = search.strip_prefix('?').unwrap_or(search);

        for (key, value) in form_urlencoded::parse(raw.as_bytes()) {
            match key.as_ref() {
                "query" => location.query = value.into_owned(),
                "page" => location.page = value.parse().ok().filter(|p| *p >= 1).unwrap_or(1),
                _ => {}
            }
        }
        location
    }

    /// New search text. Always starts over at page 1.
    pub fn with_query(&self, query: impl Into<String>) -> Self {
        ListLocation {
            query: query.into(),
            page: 1,
        }
    }

    /// Same search on another page (at least 1).
    pub fn with_page(&self, page: u32) -> Self {
        ListLocation {
            query: self.query.clone(),
            page: page.max(1),
        }
    }

    /// Encoded query string without the leading `?`.
    pub fn to_query_string(&self) -> String {
        let mut out = form_urlencoded::Serializer::new(String::new());
        if !self.query.is_empty() {
            out.append_pair("query", &self.query);
        }
        out.append_pair("page", &self.page.to_string());
        out.finish()
    }

    /// Link to this location.
    pub fn href(&self) -> String {
        format!("{}?{}", INVOICES_PATH, self.to_query_string())
    }

    /// Link to `page` of the current search, as used by pagination controls.
    pub fn page_href(&self, page: u32) -> String {
        self.with_page(page).href()
    }
}

impl fmt::Display for ListLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.href())
    }
}
