//! List query request body.
//!
//! Pagination and sort are passed through untouched. The filter travels as
//! either an inline `filterGroup` or a `savedFilterId`, never both.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::assembler::FilterSelection;
use crate::defaults::{PAGE, PAGE_LIMIT, PAGE_LIMIT_MAX};
use crate::error::Error;
use crate::models::FilterNode;

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Asc => write!(f, "asc"),
            Self::Desc => write!(f, "desc"),
        }
    }
}

impl FromStr for SortOrder {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            _ => Err(Error::InvalidInput(format!(
                "sort order must be asc or desc, got: {}",
                s
            ))),
        }
    }
}

/// Body of a list query sent to the remote query engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    pub page: u32,
    pub limit: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<SortOrder>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter_group: Option<FilterNode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saved_filter_id: Option<String>,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            page: PAGE,
            limit: PAGE_LIMIT,
            sort_by: None,
            sort_order: None,
            filter_group: None,
            saved_filter_id: None,
        }
    }
}

impl ListQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the page; pages are 1-based, 0 is clamped to 1.
    pub fn page(mut self, page: u32) -> Self {
        self.page = page.max(PAGE);
        self
    }

    /// Set the page size, clamped to `1..=PAGE_LIMIT_MAX`.
    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = limit.clamp(1, PAGE_LIMIT_MAX);
        self
    }

    pub fn sort(mut self, sort_by: impl Into<String>, order: SortOrder) -> Self {
        self.sort_by = Some(sort_by.into());
        self.sort_order = Some(order);
        self
    }

    /// Apply a filter selection, replacing any previous filter.
    pub fn filter(mut self, selection: FilterSelection) -> Self {
        self.filter_group = None;
        self.saved_filter_id = None;
        match selection {
            FilterSelection::None => {}
            FilterSelection::Tree(node) => self.filter_group = Some(node),
            FilterSelection::Saved(id) => self.saved_filter_id = Some(id),
        }
        self
    }

    /// The filter this query carries.
    pub fn selection(&self) -> FilterSelection {
        match (&self.saved_filter_id, &self.filter_group) {
            (Some(id), _) => FilterSelection::Saved(id.clone()),
            (None, Some(node)) => FilterSelection::Tree(node.clone()),
            (None, None) => FilterSelection::None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{FilterGroup, FilterRule};
    use crate::operators::Operator;
    use serde_json::json;

    #[test]
    fn test_default_query_has_no_filter_params() {
        let json = serde_json::to_value(ListQuery::new()).unwrap();
        assert_eq!(json, json!({"page": 1, "limit": 50}));
    }

    #[test]
    fn test_tree_selection_serializes_filter_group() {
        let node: FilterNode =
            FilterGroup::or(vec![FilterRule::single("name", Operator::Contains, "acme").into()]).into();
        let query = ListQuery::new()
            .sort("createdAt", SortOrder::Desc)
            .filter(FilterSelection::Tree(node));

        let json = serde_json::to_value(&query).unwrap();
        assert_eq!(json["sortBy"], "createdAt");
        assert_eq!(json["sortOrder"], "desc");
        assert_eq!(json["filterGroup"]["logic"], "OR");
        assert!(json.get("savedFilterId").is_none());
    }

    #[test]
    fn test_saved_selection_excludes_filter_group() {
        let node: FilterNode = FilterRule::single("a", Operator::Equals, "1").into();
        let query = ListQuery::new()
            .filter(FilterSelection::Tree(node))
            .filter(FilterSelection::Saved("flt_3".to_string()));

        let json = serde_json::to_value(&query).unwrap();
        assert_eq!(json["savedFilterId"], "flt_3");
        assert!(json.get("filterGroup").is_none());
        assert_eq!(query.selection(), FilterSelection::Saved("flt_3".to_string()));
    }

    #[test]
    fn test_page_and_limit_are_clamped() {
        let query = ListQuery::new().page(0).limit(10_000);
        assert_eq!(query.page, 1);
        assert_eq!(query.limit, PAGE_LIMIT_MAX);
        assert_eq!(ListQuery::new().limit(0).limit, 1);
    }

    #[test]
    fn test_sort_order_parsing() {
        assert_eq!("DESC".parse::<SortOrder>().unwrap(), SortOrder::Desc);
        assert!("sideways".parse::<SortOrder>().is_err());
    }
}
