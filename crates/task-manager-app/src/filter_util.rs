//! Conversion of raw query inputs into [`TaskQuery`] values.

use task_manager_core::{ParseStatusError, TaskOrder, TaskQuery, TaskStatus};
use thiserror::Error;
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{Date, OffsetDateTime, PrimitiveDateTime, UtcOffset};

/// Error type returned while constructing task queries from user-facing inputs.
#[derive(Debug, Error)]
pub enum QueryBuildError {
    /// The `status` parameter names no known status.
    #[error(transparent)]
    InvalidStatus(#[from] ParseStatusError),
    /// A creation bound could not be parsed as a timestamp.
    #[error("invalid {field} timestamp '{value}' (expected RFC 3339 or YYYY-MM-DD)")]
    InvalidTimestamp {
        /// Query parameter carrying the value.
        field: &'static str,
        /// The rejected input.
        value: String,
    },
}

impl QueryBuildError {
    /// Name of the query parameter that was rejected.
    #[must_use]
    pub const fn field(&self) -> &'static str {
        match self {
            Self::InvalidStatus(_) => "status",
            Self::InvalidTimestamp { field, .. } => *field,
        }
    }
}

/// Result alias for query construction helpers.
pub type QueryBuildResult<T> = Result<T, QueryBuildError>;

/// Builder that accepts user-facing strings and normalizes them into [`TaskQuery`] values.
#[derive(Debug, Clone, Default)]
pub struct TaskQueryBuilder {
    status: Option<TaskStatus>,
    created_after: Option<OffsetDateTime>,
    created_before: Option<OffsetDateTime>,
    order: TaskOrder,
}

impl TaskQueryBuilder {
    /// Create an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure the status filter from a name or ordinal (blank inputs become `None`).
    ///
    /// # Errors
    /// Returns an error if the token names no known status.
    pub fn with_status(mut self, status: Option<String>) -> QueryBuildResult<Self> {
        self.status = match status.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(token) => Some(token.parse()?),
        };
        Ok(self)
    }

    /// Configure the creation time bounds (both exclusive).
    ///
    /// # Errors
    /// Returns an error if either timestamp fails to parse.
    pub fn with_created_range(
        mut self,
        after: Option<String>,
        before: Option<String>,
    ) -> QueryBuildResult<Self> {
        self.created_after = parse_optional_timestamp("createdAfter", after)?;
        self.created_before = parse_optional_timestamp("createdBefore", before)?;
        Ok(self)
    }

    /// Configure ordering from raw `orderBy` / `orderDirection` values.
    #[must_use]
    pub fn with_order(mut self, order_by: Option<&str>, order_direction: Option<&str>) -> Self {
        self.order = TaskOrder::from_params(order_by, order_direction);
        self
    }

    /// Build the final [`TaskQuery`].
    #[must_use]
    pub const fn build(self) -> TaskQuery {
        TaskQuery {
            status: self.status,
            created_after: self.created_after,
            created_before: self.created_before,
            order: self.order,
        }
    }
}

/// Parse a timestamp given as RFC 3339, a naive `YYYY-MM-DDTHH:MM:SS`, or a bare date.
///
/// Inputs without an offset are taken as UTC; a bare date means midnight.
///
/// # Errors
/// Returns the RFC 3339 parse error if no accepted form matches.
pub fn parse_timestamp(s: &str) -> Result<OffsetDateTime, time::error::Parse> {
    let trimmed = s.trim();
    let rfc3339 = match OffsetDateTime::parse(trimmed, &Rfc3339) {
        Ok(parsed) => return Ok(parsed),
        Err(err) => err,
    };
    let naive = format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]");
    if let Ok(parsed) = PrimitiveDateTime::parse(trimmed, naive) {
        return Ok(parsed.assume_utc());
    }
    let date_only = format_description!("[year]-[month]-[day]");
    Date::parse(trimmed, date_only)
        .map(|date| date.midnight().assume_utc())
        .map_err(|_| rfc3339)
}

/// Normalize timestamps to UTC to avoid offset mismatches across interfaces.
#[must_use]
pub const fn normalize_timestamp(dt: OffsetDateTime) -> OffsetDateTime {
    dt.to_offset(UtcOffset::UTC)
}

fn parse_optional_timestamp(
    field: &'static str,
    value: Option<String>,
) -> QueryBuildResult<Option<OffsetDateTime>> {
    let Some(raw) = value else {
        return Ok(None);
    };
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    let parsed = parse_timestamp(trimmed).map_err(|_| QueryBuildError::InvalidTimestamp {
        field,
        value: trimmed.to_owned(),
    })?;
    Ok(Some(normalize_timestamp(parsed)))
}
