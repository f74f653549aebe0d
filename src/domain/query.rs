//! Typed list queries
//!
//! Callers hand in raw strings (`filters[status]=pending`, `order_by=status`);
//! each aggregate declares which fields it accepts through [`FilterField`] and
//! [`SortField`]. Unknown filter keys are dropped, an unknown sort column is an
//! error, so nothing caller-supplied reaches SQL as an identifier.

use crate::domain::DomainResult;
use crate::shared::errors::DomainError;
use crate::shared::types::PageRequest;
use crate::shared::validations::validate_pagination;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl SortDirection {
    /// `asc`/`desc` in any case; anything else yields the default.
    pub fn parse_or_default(value: Option<&str>) -> Self {
        match value.map(|v| v.trim().to_ascii_lowercase()).as_deref() {
            Some("asc") => Self::Asc,
            Some("desc") => Self::Desc,
            _ => Self::default(),
        }
    }
}

/// Comparison applied to one filter field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterValue {
    Eq(String),
    In(Vec<String>),
}

impl FilterValue {
    /// A JSON array of strings becomes `In`, anything else `Eq`.
    /// Empty values (and empty arrays) are skipped.
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }
        if raw.starts_with('[') {
            if let Ok(values) = serde_json::from_str::<Vec<String>>(raw) {
                let values: Vec<String> = values.into_iter().filter(|v| !v.is_empty()).collect();
                return if values.is_empty() {
                    None
                } else {
                    Some(Self::In(values))
                };
            }
        }
        Some(Self::Eq(raw.to_string()))
    }
}

pub trait FilterField: Copy + PartialEq + Sized {
    fn from_key(key: &str) -> Option<Self>;
}

pub trait SortField: Copy + PartialEq + Sized {
    fn from_column(column: &str) -> Option<Self>;
    fn default_column() -> Self;
}

/// List query as received from the outside world.
#[derive(Debug, Clone, Default)]
pub struct ListQuery {
    pub search: Option<String>,
    pub filters: Vec<(String, String)>,
    pub order_by: Option<String>,
    pub order_direction: Option<String>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

/// Validated list query for one aggregate.
#[derive(Debug, Clone)]
pub struct FetchParams<F, S> {
    pub search: Option<String>,
    pub filters: Vec<(F, FilterValue)>,
    pub order_by: S,
    pub direction: SortDirection,
    pub page: PageRequest,
}

impl<F: FilterField, S: SortField> FetchParams<F, S> {
    pub fn from_query(query: &ListQuery, default_limit: u64) -> DomainResult<Self> {
        let order_by = match query.order_by.as_deref().map(str::trim) {
            None | Some("") => S::default_column(),
            Some(column) => S::from_column(column)
                .ok_or_else(|| DomainError::InvalidSortColumn(column.to_string()))?,
        };

        let filters = query
            .filters
            .iter()
            .filter_map(|(key, raw)| Some((F::from_key(key)?, FilterValue::parse(raw)?)))
            .collect();

        let search = query
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string);

        Ok(Self {
            search,
            filters,
            order_by,
            direction: SortDirection::parse_or_default(query.order_direction.as_deref()),
            page: validate_pagination(query.page, query.limit, default_limit),
        })
    }

    /// Replace whatever the caller asked for on `field` with `value`.
    pub fn force_filter(mut self, field: F, value: impl Into<String>) -> Self {
        self.filters.retain(|(f, _)| *f != field);
        self.filters.push((field, FilterValue::Eq(value.into())));
        self
    }
}

impl<F: FilterField, S: SortField> Default for FetchParams<F, S> {
    fn default() -> Self {
        Self {
            search: None,
            filters: Vec::new(),
            order_by: S::default_column(),
            direction: SortDirection::default(),
            page: PageRequest::default(),
        }
    }
}

/// Declares a string-keyed allow-list enum.
macro_rules! allow_list {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $key:literal),* $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub enum $name {
            $($variant),*
        }

        impl $name {
            #[allow(dead_code)]
            pub fn as_str(&self) -> &'static str {
                match *self {
                    $(Self::$variant => $key),*
                }
            }

            fn lookup(key: &str) -> Option<Self> {
                match key {
                    $($key => Some(Self::$variant),)*
                    _ => None,
                }
            }
        }
    };
}

pub(crate) use allow_list;
