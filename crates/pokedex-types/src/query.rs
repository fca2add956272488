//! Listing parameters for the species table.
//!
//! [`ListParams`] is the raw query string as the dashboard sends it.
//! [`ListRequest`] is the normalized form the data layer executes:
//! filters that are empty or unparseable are dropped rather than
//! rejected, and page bounds are clamped to sane values.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::{SortField, SortOrder};

/// Page served when `pageNumber` is absent.
pub const DEFAULT_PAGE_NUMBER: i32 = 1;

/// Page length used when `pageSize` is absent.
pub const DEFAULT_PAGE_SIZE: i32 = 25;

/// Raw query parameters of `GET /api/pokemon`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct ListParams {
    /// 1-based page index.
    pub page_number: Option<i32>,
    /// Page length.
    pub page_size: Option<i32>,
    /// Exact dex number, as text.
    pub number_filter: Option<String>,
    /// Name substring.
    pub name_filter: Option<String>,
    /// Type label substring.
    pub type_filter: Option<String>,
    /// Generation label substring.
    pub generation_filter: Option<String>,
    /// Move name substring.
    pub move_filter: Option<String>,
    /// Sort key.
    pub sort_by: Option<String>,
    /// `asc` or `desc`.
    pub sort_order: Option<String>,
}

/// Filters applied to the species table. All present filters must match.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpeciesFilters {
    /// Exact dex number.
    pub number: Option<i32>,
    /// Case-insensitive substring of the name.
    pub name: Option<String>,
    /// Case-insensitive substring of any type label.
    pub type_label: Option<String>,
    /// Case-insensitive substring of the generation label.
    pub generation: Option<String>,
    /// Case-insensitive substring of any move name.
    pub move_name: Option<String>,
}

impl SpeciesFilters {
    /// Whether no filter is set.
    pub const fn is_empty(&self) -> bool {
        self.number.is_none()
            && self.name.is_none()
            && self.type_label.is_none()
            && self.generation.is_none()
            && self.move_name.is_none()
    }
}

/// A normalized listing request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListRequest {
    /// 1-based page index, at least 1.
    pub page_number: i32,
    /// Page length, at least 0.
    pub page_size: i32,
    /// Row filters.
    pub filters: SpeciesFilters,
    /// Primary sort key. Ties are always broken by ascending number.
    pub sort_by: SortField,
    /// Direction of the primary sort key.
    pub sort_order: SortOrder,
}

impl Default for ListRequest {
    fn default() -> Self {
        Self {
            page_number: DEFAULT_PAGE_NUMBER,
            page_size: DEFAULT_PAGE_SIZE,
            filters: SpeciesFilters::default(),
            sort_by: SortField::Number,
            sort_order: SortOrder::Asc,
        }
    }
}

impl ListRequest {
    /// Create a request for one page with no filters, ascending by number.
    pub fn page(page_number: i32, page_size: i32) -> Self {
        Self {
            page_number: page_number.max(1),
            page_size: page_size.max(0),
            ..Self::default()
        }
    }

    /// Set the sort key and direction.
    #[must_use]
    pub const fn sorted(mut self, sort_by: SortField, sort_order: SortOrder) -> Self {
        self.sort_by = sort_by;
        self.sort_order = sort_order;
        self
    }

    /// Replace the filters.
    #[must_use]
    pub fn with_filters(mut self, filters: SpeciesFilters) -> Self {
        self.filters = filters;
        self
    }

    /// Number of rows to skip before the page starts.
    pub fn offset(&self) -> i64 {
        i64::from(self.page_number)
            .saturating_sub(1)
            .saturating_mul(i64::from(self.page_size))
    }

    /// Number of rows on a full page.
    pub fn limit(&self) -> i64 {
        i64::from(self.page_size)
    }
}

impl From<ListParams> for ListRequest {
    fn from(params: ListParams) -> Self {
        let filters = SpeciesFilters {
            number: non_empty(params.number_filter).and_then(|n| n.trim().parse::<i32>().ok()),
            name: non_empty(params.name_filter),
            type_label: non_empty(params.type_filter),
            generation: non_empty(params.generation_filter),
            move_name: non_empty(params.move_filter),
        };

        // An unrecognized key falls back to ascending by number, whatever
        // direction was requested.
        let (sort_by, sort_order) = match params.sort_by.as_deref().and_then(SortField::parse) {
            Some(field) => (field, SortOrder::parse(params.sort_order.as_deref())),
            None => (SortField::Number, SortOrder::Asc),
        };

        Self::page(
            params.page_number.unwrap_or(DEFAULT_PAGE_NUMBER),
            params.page_size.unwrap_or(DEFAULT_PAGE_SIZE),
        )
        .sorted(sort_by, sort_order)
        .with_filters(filters)
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_first_page_of_25_by_number() {
        let request = ListRequest::from(ListParams::default());
        assert_eq!(request, ListRequest::default());
        assert_eq!(request.page_size, 25);
        assert_eq!(request.offset(), 0);
        assert!(request.filters.is_empty());
    }

    #[test]
    fn offset_is_zero_based_from_one_based_page() {
        let request = ListRequest::page(3, 10);
        assert_eq!(request.offset(), 20);
        assert_eq!(request.limit(), 10);
    }

    #[test]
    fn out_of_range_pages_are_clamped() {
        let request = ListRequest::from(ListParams {
            page_number: Some(0),
            page_size: Some(-5),
            ..ListParams::default()
        });
        assert_eq!(request.page_number, 1);
        assert_eq!(request.page_size, 0);
        assert_eq!(request.offset(), 0);

        let huge = ListRequest::page(i32::MAX, i32::MAX);
        assert_eq!(
            huge.offset(),
            i64::from(i32::MAX - 1) * i64::from(i32::MAX)
        );
    }

    #[test]
    fn unparseable_number_filter_is_ignored() {
        let request = ListRequest::from(ListParams {
            number_filter: Some(String::from("pika")),
            ..ListParams::default()
        });
        assert_eq!(request.filters.number, None);

        let request = ListRequest::from(ListParams {
            number_filter: Some(String::from(" 25 ")),
            ..ListParams::default()
        });
        assert_eq!(request.filters.number, Some(25));
    }

    #[test]
    fn empty_text_filters_are_absent() {
        let request = ListRequest::from(ListParams {
            name_filter: Some(String::new()),
            type_filter: Some(String::from("fire")),
            move_filter: Some(String::new()),
            ..ListParams::default()
        });
        assert_eq!(request.filters.name, None);
        assert_eq!(request.filters.type_label.as_deref(), Some("fire"));
        assert_eq!(request.filters.move_name, None);
    }

    #[test]
    fn recognized_sort_key_honors_direction() {
        let request = ListRequest::from(ListParams {
            sort_by: Some(String::from("Height")),
            sort_order: Some(String::from("DESC")),
            ..ListParams::default()
        });
        assert_eq!(request.sort_by, SortField::Height);
        assert_eq!(request.sort_order, SortOrder::Desc);
    }

    #[test]
    fn unknown_sort_key_falls_back_to_ascending_number() {
        let request = ListRequest::from(ListParams {
            sort_by: Some(String::from("speed")),
            sort_order: Some(String::from("desc")),
            ..ListParams::default()
        });
        assert_eq!(request.sort_by, SortField::Number);
        assert_eq!(request.sort_order, SortOrder::Asc);
    }

    #[test]
    fn params_deserialize_from_camel_case() {
        let params: ListParams = serde_json::from_value(serde_json::json!({
            "pageNumber": 2,
            "pageSize": 10,
            "typeFilter": "water",
            "sortBy": "name",
        }))
        .unwrap_or_default();
        assert_eq!(params.page_number, Some(2));
        assert_eq!(params.page_size, Some(10));
        assert_eq!(params.type_filter.as_deref(), Some("water"));
        assert_eq!(params.sort_by.as_deref(), Some("name"));
    }
}
