use serde::Deserialize;
use utoipa::ToSchema;

/// Query-string pagination parameters shared by every list endpoint.
/// Non-numeric values fail axum's Query extraction, matching "absent".
#[derive(Debug, Deserialize, ToSchema)]
pub struct PaginationQuery {
    pub page: Option<u64>,
    pub limit: Option<u64>,
}

/// Normalized pagination: `page` defaults to 1 (a `page=0` is clamped up),
/// `limit` defaults per endpoint and is capped at 100. No upper bound on
/// `page` itself — pages past the end legitimately return empty lists.
#[derive(Debug, Clone, Copy)]
pub struct Pagination {
    pub page: u64,
    pub limit: u64,
}

impl Pagination {
    pub fn new(page: Option<u64>, limit: Option<u64>, default_limit: u64) -> Self {
        Self {
            page: page.unwrap_or(1).max(1),
            limit: limit.unwrap_or(default_limit).clamp(1, 100),
        }
    }

    pub fn skip(&self) -> u64 {
        (self.page - 1) * self.limit
    }

    pub fn take(&self) -> u64 {
        self.limit
    }

    pub fn total_pages(&self, total: u64) -> u64 {
        total_pages(total, self.limit)
    }
}

pub fn total_pages(total: u64, limit: u64) -> u64 {
    if limit == 0 {
        0
    } else {
        total.div_ceil(limit)
    }
}
