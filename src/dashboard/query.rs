//! The query parameters shared by the dashboard tabs.

use serde::{Deserialize, Serialize};
use time::Date;

use crate::dates::{empty_string_as_none, format_iso_date};

/// The direction to sort the transactions table in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    pub fn reverse(self) -> Self {
        match self {
            SortOrder::Asc => SortOrder::Desc,
            SortOrder::Desc => SortOrder::Asc,
        }
    }

    pub fn as_query_value(self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

/// The date range and table options picked on the dashboard.
///
/// Every field is optional so that a bare `/dashboard` shows the defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct DashboardQuery {
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub start_date: Option<Date>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub end_date: Option<Date>,
    /// The column to sort the table by.
    #[serde(default)]
    pub sort: Option<String>,
    #[serde(default)]
    pub order: Option<SortOrder>,
    /// Text the visible columns must contain.
    #[serde(default)]
    pub filter: Option<String>,
    /// The "Enable Sorting" switch.
    #[serde(default)]
    pub sorting: Option<bool>,
    /// The "Enable Filtering" switch.
    #[serde(default)]
    pub filtering: Option<bool>,
    /// Set by the table options form.
    ///
    /// Unchecked checkboxes are not submitted, so a missing switch only means
    /// "off" when the request came from the form.
    #[serde(default)]
    pub from_form: bool,
}

impl DashboardQuery {
    /// Whether the table can be sorted, on unless switched off.
    pub fn sorting_enabled(&self) -> bool {
        self.sorting.unwrap_or(!self.from_form)
    }

    /// Whether the table is filtered, off unless switched on.
    pub fn filtering_enabled(&self) -> bool {
        self.filtering.unwrap_or(false)
    }

    /// The filter text, if filtering is enabled and the text isn't blank.
    pub fn active_filter(&self) -> Option<&str> {
        if !self.filtering_enabled() {
            return None;
        }

        self.filter
            .as_deref()
            .map(str::trim)
            .filter(|filter| !filter.is_empty())
    }

    /// The column and direction to sort by, if sorting is enabled.
    pub fn active_sort(&self) -> Option<(&str, SortOrder)> {
        if !self.sorting_enabled() {
            return None;
        }

        self.sort
            .as_deref()
            .filter(|column| !column.is_empty())
            .map(|column| (column, self.order.unwrap_or_default()))
    }

    /// The query for a header link that sorts by `column`.
    ///
    /// Picking the current sort column again flips the order.
    pub fn sorted_by(&self, column: &str) -> Self {
        let order = match self.active_sort() {
            Some((current, order)) if current == column => order.reverse(),
            _ => SortOrder::Asc,
        };

        Self {
            sort: Some(column.to_owned()),
            order: Some(order),
            from_form: false,
            ..self.clone()
        }
    }

    /// Resolve the switches into explicit values so that links keep them.
    pub fn normalized(&self) -> Self {
        Self {
            sorting: Some(self.sorting_enabled()),
            filtering: Some(self.filtering_enabled()),
            from_form: false,
            ..self.clone()
        }
    }

    /// Encode the options that are set as a URL query string.
    pub fn to_query_string(&self) -> Result<String, serde_urlencoded::ser::Error> {
        let mut pairs: Vec<(&str, String)> = Vec::new();

        if let Some(start_date) = self.start_date {
            pairs.push(("start_date", format_iso_date(start_date)));
        }
        if let Some(end_date) = self.end_date {
            pairs.push(("end_date", format_iso_date(end_date)));
        }
        if let Some(sort) = &self.sort {
            pairs.push(("sort", sort.clone()));
        }
        if let Some(order) = self.order {
            pairs.push(("order", order.as_query_value().to_owned()));
        }
        if let Some(filter) = &self.filter {
            pairs.push(("filter", filter.clone()));
        }
        if let Some(sorting) = self.sorting {
            pairs.push(("sorting", sorting.to_string()));
        }
        if let Some(filtering) = self.filtering {
            pairs.push(("filtering", filtering.to_string()));
        }

        serde_urlencoded::to_string(pairs)
    }
}

#[cfg(test)]
mod tests {
    use time::macros::date;

    use super::{DashboardQuery, SortOrder};

    #[test]
    fn empty_dates_are_none() {
        let query: DashboardQuery =
            serde_html_form::from_str("start_date=&end_date=2024-01-31").unwrap();

        assert_eq!(query.start_date, None);
        assert_eq!(query.end_date, Some(date!(2024 - 01 - 31)));
    }

    #[test]
    fn invalid_date_is_rejected() {
        let got = serde_html_form::from_str::<DashboardQuery>("start_date=31/01/2024");

        assert!(got.is_err());
    }

    #[test]
    fn switch_defaults() {
        let query = DashboardQuery::default();

        assert!(query.sorting_enabled());
        assert!(!query.filtering_enabled());
    }

    #[test]
    fn unchecked_switches_from_form_are_off() {
        let query: DashboardQuery = serde_html_form::from_str("from_form=true").unwrap();

        assert!(!query.sorting_enabled());
        assert!(!query.filtering_enabled());
    }

    #[test]
    fn checked_switches_from_form_are_on() {
        let query: DashboardQuery =
            serde_html_form::from_str("from_form=true&sorting=true&filtering=true&filter=x")
                .unwrap();

        assert!(query.sorting_enabled());
        assert_eq!(query.active_filter(), Some("x"));
    }

    #[test]
    fn filter_is_ignored_when_filtering_is_off() {
        let query = DashboardQuery {
            filter: Some("rema".to_owned()),
            ..Default::default()
        };

        assert_eq!(query.active_filter(), None);
    }

    #[test]
    fn blank_filter_is_ignored() {
        let query = DashboardQuery {
            filter: Some("   ".to_owned()),
            filtering: Some(true),
            ..Default::default()
        };

        assert_eq!(query.active_filter(), None);
    }

    #[test]
    fn sort_is_ignored_when_sorting_is_off() {
        let query = DashboardQuery {
            sort: Some("amount".to_owned()),
            sorting: Some(false),
            ..Default::default()
        };

        assert_eq!(query.active_sort(), None);
    }

    #[test]
    fn sorting_by_same_column_flips_order() {
        let query = DashboardQuery::default().sorted_by("amount");
        assert_eq!(query.active_sort(), Some(("amount", SortOrder::Asc)));

        let query = query.sorted_by("amount");
        assert_eq!(query.active_sort(), Some(("amount", SortOrder::Desc)));

        let query = query.sorted_by("text");
        assert_eq!(query.active_sort(), Some(("text", SortOrder::Asc)));
    }

    #[test]
    fn query_string_round_trips_through_form_decoding() {
        let query = DashboardQuery {
            start_date: Some(date!(2024 - 01 - 01)),
            end_date: Some(date!(2024 - 03 - 31)),
            sort: Some("amount".to_owned()),
            order: Some(SortOrder::Desc),
            filter: Some("kiwi & co".to_owned()),
            sorting: Some(true),
            filtering: Some(true),
            from_form: false,
        };

        let query_string = query.to_query_string().unwrap();
        let decoded: DashboardQuery = serde_html_form::from_str(&query_string).unwrap();

        assert_eq!(decoded, query);
    }
}
