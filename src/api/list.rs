use percent_encoding::utf8_percent_encode;
use serde::{Serialize, Serializer};
use std::{fmt, str::FromStr};

use crate::api::{filter::Filter, id::PageToken, URI_COMPONENT};

/// One page of a list call.
#[derive(Debug, Clone, PartialEq)]
pub struct ListResponse<T> {
    pub items: Vec<T>,
    pub total_size: i32,
    pub next_page_token: PageToken,
}

impl<T> ListResponse<T> {
    /// Whether the server signalled the end of the enumeration.
    pub fn is_last_page(&self) -> bool {
        self.next_page_token.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

impl Default for SortOrder {
    fn default() -> Self {
        SortOrder::Ascending
    }
}

/// `field`, `field asc` or `field desc`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortBy {
    pub field: String,
    pub order: SortOrder,
}

impl SortBy {
    pub fn ascending(field: impl Into<String>) -> Self {
        SortBy {
            field: field.into(),
            order: SortOrder::Ascending,
        }
    }

    pub fn descending(field: impl Into<String>) -> Self {
        SortBy {
            field: field.into(),
            order: SortOrder::Descending,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid sort specification {0:?}, expected `field`, `field asc` or `field desc`")]
pub struct InvalidSortBy(String);

impl FromStr for SortBy {
    type Err = InvalidSortBy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split_whitespace();
        let field = parts.next().ok_or_else(|| InvalidSortBy(s.to_owned()))?;
        let order = match parts.next() {
            None | Some("asc") => SortOrder::Ascending,
            Some("desc") | Some("des") => SortOrder::Descending,
            Some(_) => return Err(InvalidSortBy(s.to_owned())),
        };
        if parts.next().is_some() {
            return Err(InvalidSortBy(s.to_owned()));
        }
        Ok(SortBy {
            field: field.to_owned(),
            order,
        })
    }
}

impl fmt::Display for SortBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.order {
            SortOrder::Ascending => write!(f, "{}", self.field),
            SortOrder::Descending => write!(f, "{} desc", self.field),
        }
    }
}

impl Serialize for SortBy {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Pagination, ordering and filtering shared by every list call.
///
/// Unset options are left out of the request entirely.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListOptions {
    pub page_token: Option<PageToken>,
    pub page_size: Option<i32>,
    pub sort_by: Option<SortBy>,
    pub filter: Option<String>,
}

impl ListOptions {
    pub fn new() -> Self {
        ListOptions::default()
    }

    pub fn page_token(mut self, token: impl Into<PageToken>) -> Self {
        self.page_token = Some(token.into());
        self
    }

    pub fn page_size(mut self, size: i32) -> Self {
        self.page_size = Some(size);
        self
    }

    pub fn sort_by(mut self, sort_by: SortBy) -> Self {
        self.sort_by = Some(sort_by);
        self
    }

    /// Sets an already encoded filter expression.
    pub fn raw_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    /// Sets a typed filter. The server unescapes the value once more after
    /// the query string is decoded, so the JSON is encoded here first.
    pub fn filter(self, filter: &Filter) -> Self {
        let json = filter.to_string();
        self.raw_filter(utf8_percent_encode(&json, URI_COMPONENT).to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sort_by_defaults_to_ascending() {
        let sort = "created_at".parse::<SortBy>().unwrap();
        assert_eq!(sort, SortBy::ascending("created_at"));
        assert_eq!("name asc".parse::<SortBy>().unwrap(), SortBy::ascending("name"));
    }

    #[test]
    fn sort_by_descending() {
        let sort = "created_at desc".parse::<SortBy>().unwrap();
        assert_eq!(sort.order, SortOrder::Descending);
        assert_eq!(sort.to_string(), "created_at desc");
    }

    #[test]
    fn sort_by_rejects_garbage() {
        assert!("".parse::<SortBy>().is_err());
        assert!("name sideways".parse::<SortBy>().is_err());
        assert!("name asc extra".parse::<SortBy>().is_err());
    }

    #[test]
    fn typed_filter_is_encoded() {
        let options = ListOptions::new().filter(&Filter::new().equals("name", "a+b 100%"));
        let filter = options.filter.unwrap();
        assert!(!filter.contains('+'));
        assert!(!filter.contains('{'));
        assert!(filter.contains("a%2Bb%20100%25"));

        let raw = ListOptions::new().raw_filter("%7B%7D");
        assert_eq!(raw.filter.as_deref(), Some("%7B%7D"));
    }

    #[test]
    fn last_page_is_empty_token() {
        let page = ListResponse::<()> {
            items: vec![],
            total_size: 0,
            next_page_token: PageToken::default(),
        };
        assert!(page.is_last_page());
    }
}
