use chrono::NaiveDate;
use serde::Deserialize;
use strum::{Display, EnumString};

/// Column the admin reservation listing is ordered by
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum SortKey {
    #[default]
    Time,
    Table,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

/// Admin listing parameters exactly as received, before defaults are applied
#[derive(Debug, Clone, Default, Deserialize)]
#[cfg_attr(
    feature = "openapi",
    derive(utoipa::IntoParams),
    into_params(parameter_in = Query)
)]
pub struct RawListing {
    /// Day to list, `YYYY-MM-DD`
    pub date: Option<String>,
    /// Case-insensitive substring of the customer name
    pub customer: Option<String>,
    /// Table number
    pub table: Option<String>,
    /// `time` (default) or `table`
    pub sort_by: Option<String>,
    /// `asc` (default) or `desc`
    pub sort_order: Option<String>,
    /// 1-based page number
    pub page: Option<String>,
    /// Rows per page, at most 100
    pub per_page: Option<String>,
}

/// Resolved filters, ordering and pagination for the admin reservation listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReservationListing {
    pub date: Option<NaiveDate>,
    pub customer: Option<String>,
    pub table: Option<i32>,
    pub sort_by: SortKey,
    pub sort_order: SortOrder,
    /// 1-based page number
    pub page: u64,
    pub per_page: u64,
}

impl ReservationListing {
    pub const DEFAULT_PER_PAGE: u64 = 10;
    pub const MAX_PER_PAGE: u64 = 100;

    /// Applies defaults; values that do not parse are treated as absent
    pub fn resolve(raw: &RawListing) -> Self {
        let non_blank = |value: &Option<String>| {
            value
                .as_deref()
                .map(str::trim)
                .filter(|value| !value.is_empty())
                .map(str::to_owned)
        };

        let sort_order = match non_blank(&raw.sort_order) {
            None => SortOrder::Asc,
            // Anything other than an explicit ascending request sorts descending
            Some(order) => order.parse().unwrap_or(SortOrder::Desc),
        };

        let per_page = parse_positive(non_blank(&raw.per_page))
            .unwrap_or(Self::DEFAULT_PER_PAGE)
            .min(Self::MAX_PER_PAGE);
        // Keeps the row offset `(page - 1) * per_page` within a signed 64-bit value
        let last_page = i64::MAX as u64 / per_page;
        let page = parse_positive(non_blank(&raw.page))
            .unwrap_or(1)
            .min(last_page);

        Self {
            date: non_blank(&raw.date)
                .and_then(|date| NaiveDate::parse_from_str(&date, "%Y-%m-%d").ok()),
            customer: non_blank(&raw.customer),
            table: non_blank(&raw.table).and_then(|table| table.parse().ok()),
            sort_by: non_blank(&raw.sort_by)
                .and_then(|key| key.parse().ok())
                .unwrap_or_default(),
            sort_order,
            page,
            per_page,
        }
    }
}

impl Default for ReservationListing {
    fn default() -> Self {
        Self::resolve(&RawListing::default())
    }
}

/// Parses an integer and clamps it to at least 1
fn parse_positive(value: Option<String>) -> Option<u64> {
    value
        .and_then(|value| value.parse::<i64>().ok())
        .map(|value| value.max(1) as u64)
}
