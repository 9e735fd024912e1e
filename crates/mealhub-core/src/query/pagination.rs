//! Page/limit/skip/sort normalization.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE: u64 = 1;
pub const DEFAULT_LIMIT: u64 = 10;
pub const DEFAULT_SORT_BY: &str = "createdAt";

/// Largest OFFSET/LIMIT a database will accept (a signed 64-bit integer).
pub const MAX_OFFSET: u64 = i64::MAX as u64;

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" | "ascending" | "1" => Ok(Self::Asc),
            "desc" | "descending" | "-1" => Ok(Self::Desc),
            other => Err(format!("unknown sort order '{other}'")),
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Asc => f.write_str("asc"),
            Self::Desc => f.write_str("desc"),
        }
    }
}

/// Raw, possibly missing pagination inputs.
#[derive(Debug, Clone, Default)]
pub struct PaginationOptions {
    pub page: Option<u64>,
    pub limit: Option<u64>,
    pub sort_by: Option<String>,
    pub sort_order: Option<SortOrder>,
}

impl PaginationOptions {
    /// Read `page`, `limit`, `sortBy` and `sortOrder` from query parameters.
    ///
    /// Values that do not parse are treated as absent.
    pub fn from_params(params: &HashMap<String, String>) -> Self {
        let number = |key: &str| {
            params
                .get(key)
                .and_then(|v| v.trim().parse::<u64>().ok())
        };

        Self {
            page: number("page"),
            limit: number("limit"),
            sort_by: params
                .get("sortBy")
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
            sort_order: params.get("sortOrder").and_then(|s| s.parse().ok()),
        }
    }
}

/// Normalized pagination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pagination {
    pub page: u64,
    pub limit: u64,
    pub skip: u64,
    pub sort_by: String,
    pub sort_order: SortOrder,
}

/// Fill in defaults and compute the number of records to skip.
///
/// Zero is treated like a missing value for both `page` and `limit`.
pub fn calculate_pagination(options: &PaginationOptions) -> Pagination {
    let page = options.page.filter(|&p| p > 0).unwrap_or(DEFAULT_PAGE);
    let limit = options.limit.filter(|&l| l > 0).unwrap_or(DEFAULT_LIMIT);

    Pagination {
        page,
        limit,
        skip: (page - 1).saturating_mul(limit),
        sort_by: options
            .sort_by
            .clone()
            .unwrap_or_else(|| DEFAULT_SORT_BY.to_string()),
        sort_order: options.sort_order.unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_defaults() {
        let result = calculate_pagination(&PaginationOptions::default());
        assert_eq!(
            result,
            Pagination {
                page: 1,
                limit: 10,
                skip: 0,
                sort_by: "createdAt".to_string(),
                sort_order: SortOrder::Desc,
            }
        );
    }

    #[test]
    fn test_skip_is_computed_from_page_and_limit() {
        let result = calculate_pagination(&PaginationOptions {
            page: Some(3),
            limit: Some(6),
            ..Default::default()
        });
        assert_eq!(result.skip, 12);
    }

    #[test]
    fn test_zero_and_garbage_fall_back_to_defaults() {
        let options = PaginationOptions::from_params(&params(&[
            ("page", "0"),
            ("limit", "abc"),
            ("sortOrder", "sideways"),
        ]));
        let result = calculate_pagination(&options);
        assert_eq!(result.page, 1);
        assert_eq!(result.limit, 10);
        assert_eq!(result.sort_order, SortOrder::Desc);
    }

    #[test]
    fn test_limit_has_no_upper_bound() {
        let options = PaginationOptions::from_params(&params(&[("limit", "5000")]));
        assert_eq!(calculate_pagination(&options).limit, 5000);
    }

    #[test]
    fn test_sort_params_are_read() {
        let options =
            PaginationOptions::from_params(&params(&[("sortBy", "title"), ("sortOrder", "asc")]));
        let result = calculate_pagination(&options);
        assert_eq!(result.sort_by, "title");
        assert_eq!(result.sort_order, SortOrder::Asc);
    }
}
