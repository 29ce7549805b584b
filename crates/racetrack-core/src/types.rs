use crate::{
    Result,
    constants::{DEFAULT_PAGE, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT},
    error::Error,
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Privilege level attached to a user account.
///
/// Stored as lowercase text (`"user"`, `"admin"`) in the database and in
/// session payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    User,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "user" => Ok(Role::User),
            "admin" => Ok(Role::Admin),
            other => Err(Error::UnknownRole(other.to_string())),
        }
    }
}

/// The identity stored in a session once a user has logged in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    pub id: i64,
    pub username: String,
    pub role: Role,
}

impl SessionUser {
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

/// A clamped `(page, limit)` pair taken from a list request.
///
/// `page` is always at least 1 and `limit` is always within
/// `1..=MAX_PAGE_LIMIT`, so [`PageRequest::offset`] never underflows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u32,
    limit: u32,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_PAGE_LIMIT,
        }
    }
}

impl PageRequest {
    pub fn new(page: i64, limit: i64) -> Self {
        Self {
            page: page.clamp(1, u32::MAX as i64) as u32,
            limit: limit.clamp(1, MAX_PAGE_LIMIT as i64) as u32,
        }
    }

    /// Build a request from raw query-string values.
    ///
    /// Missing or unparsable values fall back to the defaults rather than
    /// failing the request.
    ///
    /// ```
    /// use racetrack_core::PageRequest;
    ///
    /// let req = PageRequest::parse(Some("3"), Some("abc"));
    /// assert_eq!(req.page(), 3);
    /// assert_eq!(req.limit(), 10);
    /// assert_eq!(req.offset(), 20);
    /// ```
    pub fn parse(page: Option<&str>, limit: Option<&str>) -> Self {
        let page = page
            .and_then(|p| p.trim().parse::<i64>().ok())
            .unwrap_or(DEFAULT_PAGE as i64);
        let limit = limit
            .and_then(|l| l.trim().parse::<i64>().ok())
            .filter(|l| *l > 0)
            .unwrap_or(DEFAULT_PAGE_LIMIT as i64);
        Self::new(page, limit)
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    pub fn offset(&self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.limit)
    }
}

/// Pagination block returned next to every paginated listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationMeta {
    pub current_page: u32,
    pub per_page: u32,
    pub total_items: u64,
    pub total_pages: u64,
}

impl PaginationMeta {
    /// `total_pages` is `ceil(total_items / limit)`; an empty table has zero pages.
    pub fn new(request: PageRequest, total_items: u64) -> Self {
        let limit = u64::from(request.limit());
        Self {
            current_page: request.page(),
            per_page: request.limit(),
            total_items,
            total_pages: total_items.div_ceil(limit),
        }
    }
}

/// A page of rows plus its pagination block.
///
/// Serializes as `{"data": [...], "pagination": {...}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub data: Vec<T>,
    pub pagination: PaginationMeta,
}

impl<T> Page<T> {
    pub fn new(data: Vec<T>, request: PageRequest, total_items: u64) -> Self {
        Self {
            data,
            pagination: PaginationMeta::new(request, total_items),
        }
    }
}
