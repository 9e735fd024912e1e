//! Search/filter/sort/paginate composition for listing endpoints.
//!
//! [`ListQuery`] is the untyped view of a query string. Each resource
//! resolves it against its own [`QueryField`] set, which decides what can be
//! searched, filtered and sorted on.

use std::collections::{BTreeMap, HashMap};

use serde_json::Value;

use super::pagination::{MAX_OFFSET, PaginationOptions, SortOrder, calculate_pagination};
use crate::error::DomainError;

/// Query parameters with a fixed meaning; everything else is a filter.
pub const RESERVED_PARAMS: [&str; 7] = [
    "searchTerm",
    "sort",
    "sortBy",
    "sortOrder",
    "page",
    "limit",
    "fields",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortKey {
    pub field: String,
    pub order: SortOrder,
}

/// A parsed but not yet validated listing query.
#[derive(Debug, Clone)]
pub struct ListQuery {
    pub search_term: Option<String>,
    pub filters: BTreeMap<String, String>,
    pub sort: Vec<SortKey>,
    pub page: u64,
    pub limit: u64,
    pub fields: Option<Vec<String>>,
}

impl ListQuery {
    /// Build a query from raw parameters. `default_limit` applies when the
    /// caller did not send a usable `limit`.
    pub fn from_params(params: &HashMap<String, String>, default_limit: u64) -> Self {
        let mut options = PaginationOptions::from_params(params);
        if options.limit.filter(|&l| l > 0).is_none() {
            options.limit = Some(default_limit);
        }
        let pagination = calculate_pagination(&options);

        let sort = match params.get("sort").map(|s| s.trim()) {
            Some(raw) if !raw.is_empty() => parse_sort(raw),
            _ => vec![SortKey {
                field: pagination.sort_by.clone(),
                order: pagination.sort_order,
            }],
        };

        let filters = params
            .iter()
            .filter(|(key, _)| !RESERVED_PARAMS.contains(&key.as_str()))
            .map(|(key, value)| (key.clone(), value.trim().to_string()))
            .collect();

        let fields = params
            .get("fields")
            .map(|raw| split_list(raw))
            .filter(|fields| !fields.is_empty());

        Self {
            search_term: params
                .get("searchTerm")
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
            filters,
            sort,
            page: pagination.page,
            limit: pagination.limit,
            fields,
        }
    }

    pub fn skip(&self) -> u64 {
        (self.page - 1).saturating_mul(self.limit)
    }

    /// Resolve field names against a resource's field set.
    ///
    /// Filters and sort keys naming unknown fields are dropped. A filter on a
    /// known field with a value of the wrong shape is a validation error, and
    /// so is a page whose offset does not fit a database OFFSET.
    pub fn resolve<F: QueryField>(&self) -> Result<TypedQuery<F>, DomainError> {
        let offset = (self.page - 1).checked_mul(self.limit);
        if self.limit > MAX_OFFSET || offset.is_none_or(|skip| skip > MAX_OFFSET) {
            return Err(DomainError::Validation("Page is out of range".to_string()));
        }

        let mut filters = Vec::new();
        for (name, value) in &self.filters {
            let Some(field) = F::parse(name).filter(|f| f.filterable()) else {
                continue;
            };
            field.check_value(value).map_err(|reason| {
                DomainError::Validation(format!("Invalid value for filter '{name}': {reason}"))
            })?;
            filters.push((field, value.clone()));
        }

        let mut sort: Vec<(F, SortOrder)> = self
            .sort
            .iter()
            .filter_map(|key| {
                F::parse(&key.field)
                    .filter(|f| f.sortable())
                    .map(|f| (f, key.order))
            })
            .collect();
        if sort.is_empty() {
            sort.push((F::DEFAULT_SORT, SortOrder::Desc));
        }

        Ok(TypedQuery {
            search_term: self.search_term.clone(),
            filters,
            sort,
            page: self.page,
            limit: self.limit,
        })
    }
}

/// Field vocabulary of one listable resource.
pub trait QueryField: Copy + Eq + Send + Sync + 'static {
    /// Field used when no usable sort key was given (newest first).
    const DEFAULT_SORT: Self;

    /// Map an API field name (camelCase) to a field.
    fn parse(name: &str) -> Option<Self>;

    /// Fields `searchTerm` is matched against.
    fn searchable() -> &'static [Self];

    fn filterable(&self) -> bool;

    fn sortable(&self) -> bool;

    /// Check that a filter value has the right shape for this field.
    fn check_value(&self, _value: &str) -> Result<(), String> {
        Ok(())
    }
}

/// A listing query resolved against a resource's fields.
#[derive(Debug, Clone)]
pub struct TypedQuery<F> {
    pub search_term: Option<String>,
    pub filters: Vec<(F, String)>,
    pub sort: Vec<(F, SortOrder)>,
    pub page: u64,
    pub limit: u64,
}

impl<F: QueryField> TypedQuery<F> {
    pub fn skip(&self) -> u64 {
        (self.page - 1).saturating_mul(self.limit)
    }

    /// Add an equality filter, replacing any caller-supplied one on the same field.
    pub fn with_filter(mut self, field: F, value: impl Into<String>) -> Self {
        self.filters.retain(|(f, _)| *f != field);
        self.filters.push((field, value.into()));
        self
    }
}

/// Keep only the requested keys of a JSON object. `id` is always kept.
pub fn project_fields(value: Value, fields: &[String]) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .filter(|(key, _)| key == "id" || fields.iter().any(|f| f == key))
                .collect(),
        ),
        other => other,
    }
}

fn parse_sort(raw: &str) -> Vec<SortKey> {
    split_list(raw)
        .into_iter()
        .map(|token| match token.strip_prefix('-') {
            Some(field) => SortKey {
                field: field.to_string(),
                order: SortOrder::Desc,
            },
            None => SortKey {
                field: token.trim_start_matches('+').to_string(),
                order: SortOrder::Asc,
            },
        })
        .filter(|key| !key.field.is_empty())
        .collect()
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split([',', ' '])
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}
