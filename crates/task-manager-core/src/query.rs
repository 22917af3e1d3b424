use std::cmp::Ordering;

use time::OffsetDateTime;

use crate::{Task, TaskStatus};

/// Field used to order query results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortKey {
    /// Case-insensitive title comparison; exact case only breaks ties.
    Title,
    /// Status ordinal (`Pending < InProgress < Completed`).
    Status,
    /// Creation time.
    CreatedAt,
}

impl SortKey {
    /// Resolve a user-facing key (`title`, `status`, `createdAt`), ignoring case.
    #[must_use]
    pub fn parse(token: &str) -> Option<Self> {
        let normalized = token.trim().to_ascii_lowercase().replace(['-', '_'], "");
        match normalized.as_str() {
            "title" => Some(Self::Title),
            "status" => Some(Self::Status),
            "createdat" => Some(Self::CreatedAt),
            _ => None,
        }
    }
}

/// Direction applied to a [`SortKey`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SortDirection {
    /// Smallest first.
    #[default]
    Asc,
    /// Largest first.
    Desc,
}

impl SortDirection {
    /// `desc` (any case) selects descending; anything else is ascending.
    #[must_use]
    pub fn parse(token: Option<&str>) -> Self {
        match token {
            Some(raw) if raw.trim().eq_ignore_ascii_case("desc") => Self::Desc,
            _ => Self::Asc,
        }
    }
}

/// Ordering applied after filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskOrder {
    /// Field to compare.
    pub key: SortKey,
    /// Comparison direction.
    pub direction: SortDirection,
}

impl Default for TaskOrder {
    /// Newest first.
    fn default() -> Self {
        Self {
            key: SortKey::CreatedAt,
            direction: SortDirection::Desc,
        }
    }
}

impl TaskOrder {
    /// Build an ordering from raw `orderBy` / `orderDirection` values.
    ///
    /// A missing, blank, or unrecognized key falls back to [`TaskOrder::default`]
    /// and ignores the direction.
    #[must_use]
    pub fn from_params(order_by: Option<&str>, order_direction: Option<&str>) -> Self {
        order_by
            .filter(|raw| !raw.trim().is_empty())
            .and_then(SortKey::parse)
            .map_or_else(Self::default, |key| Self {
                key,
                direction: SortDirection::parse(order_direction),
            })
    }

    fn compare(self, a: &Task, b: &Task) -> Ordering {
        let ordering = match self.key {
            SortKey::Title => compare_titles(&a.title, &b.title),
            SortKey::Status => a.status.cmp(&b.status),
            SortKey::CreatedAt => a.created_at.cmp(&b.created_at),
        };
        match self.direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    }
}

/// `"apple"` sorts before `"Banana"`; `"Apple"` before `"apple"`.
fn compare_titles(a: &str, b: &str) -> Ordering {
    a.chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase))
        .then_with(|| a.cmp(b))
}

/// Filter and ordering specification evaluated against an in-memory collection.
///
/// Every present filter must match (logical AND); an absent filter matches
/// everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskQuery {
    /// Exact status match.
    pub status: Option<TaskStatus>,
    /// Keep tasks created strictly after this instant.
    pub created_after: Option<OffsetDateTime>,
    /// Keep tasks created strictly before this instant.
    pub created_before: Option<OffsetDateTime>,
    /// Result ordering.
    pub order: TaskOrder,
}

impl TaskQuery {
    /// Query with no filters and the default ordering.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true when `task` satisfies every filter clause.
    #[must_use]
    pub fn matches(&self, task: &Task) -> bool {
        if self.status.is_some_and(|status| task.status != status) {
            return false;
        }
        if self.created_after.is_some_and(|bound| task.created_at <= bound) {
            return false;
        }
        if self.created_before.is_some_and(|bound| task.created_at >= bound) {
            return false;
        }
        true
    }

    /// Filter `tasks`, then sort the survivors (stable, so ties keep input order).
    #[must_use]
    pub fn apply(&self, tasks: Vec<Task>) -> Vec<Task> {
        let mut selected: Vec<Task> = tasks.into_iter().filter(|task| self.matches(task)).collect();
        let order = self.order;
        selected.sort_by(|a, b| order.compare(a, b));
        selected
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TaskDraft;
    use time::{Duration, macros::datetime};

    fn task(title: &str, status: TaskStatus, created_at: OffsetDateTime) -> Task {
        Task::create(TaskDraft::new(title, "desc", status), created_at)
    }

    fn titles(tasks: &[Task]) -> Vec<&str> {
        tasks.iter().map(|t| t.title.as_str()).collect()
    }

    #[test]
    fn orders_by_title_in_both_directions() {
        let now = datetime!(2026-02-01 00:00 UTC);
        let tasks = vec![
            task("Zebra", TaskStatus::Pending, now),
            task("Apple", TaskStatus::Pending, now),
            task("Banana", TaskStatus::Pending, now),
        ];

        let asc = TaskQuery {
            order: TaskOrder::from_params(Some("title"), Some("asc")),
            ..TaskQuery::default()
        };
        assert_eq!(titles(&asc.apply(tasks.clone())), ["Apple", "Banana", "Zebra"]);

        let desc = TaskQuery {
            order: TaskOrder::from_params(Some("TITLE"), Some("DESC")),
            ..TaskQuery::default()
        };
        assert_eq!(titles(&desc.apply(tasks)), ["Zebra", "Banana", "Apple"]);
    }

    #[test]
    fn orders_status_by_ordinal() {
        let now = datetime!(2026-02-01 00:00 UTC);
        let tasks = vec![
            task("done", TaskStatus::Completed, now),
            task("todo", TaskStatus::Pending, now),
            task("doing", TaskStatus::InProgress, now),
        ];
        let query = TaskQuery {
            order: TaskOrder::from_params(Some("status"), None),
            ..TaskQuery::default()
        };
        assert_eq!(titles(&query.apply(tasks)), ["todo", "doing", "done"]);
    }

    #[test]
    fn default_order_is_newest_first() {
        let base = datetime!(2026-02-01 00:00 UTC);
        let tasks = vec![
            task("middle", TaskStatus::Pending, base),
            task("oldest", TaskStatus::Pending, base - Duration::days(1)),
            task("newest", TaskStatus::Pending, base + Duration::days(1)),
        ];
        assert_eq!(titles(&TaskQuery::new().apply(tasks)), ["newest", "middle", "oldest"]);
    }

    #[test]
    fn order_params_fall_back_to_created_desc() {
        let fallback = TaskOrder::default();
        assert_eq!(TaskOrder::from_params(None, Some("asc")), fallback);
        assert_eq!(TaskOrder::from_params(Some("  "), Some("asc")), fallback);
        assert_eq!(TaskOrder::from_params(Some("priority"), Some("asc")), fallback);

        let created_asc = TaskOrder::from_params(Some("createdAt"), None);
        assert_eq!(created_asc.key, SortKey::CreatedAt);
        assert_eq!(created_asc.direction, SortDirection::Asc);

        let unknown_direction = TaskOrder::from_params(Some("title"), Some("sideways"));
        assert_eq!(unknown_direction.direction, SortDirection::Asc);
    }

    #[test]
    fn filters_by_status() {
        let now = datetime!(2026-02-01 00:00 UTC);
        let tasks = vec![
            task("a", TaskStatus::Pending, now),
            task("b", TaskStatus::InProgress, now),
            task("c", TaskStatus::Pending, now),
        ];
        let query = TaskQuery {
            status: Some(TaskStatus::Pending),
            ..TaskQuery::default()
        };
        let result = query.apply(tasks);
        assert_eq!(result.len(), 2);
        assert!(result.iter().all(|t| t.status == TaskStatus::Pending));

        let none = TaskQuery {
            status: Some(TaskStatus::Completed),
            ..TaskQuery::default()
        };
        assert!(none.apply(result).is_empty());
    }

    #[test]
    fn created_after_is_exclusive() {
        let d = datetime!(2026-02-01 00:00 UTC);
        let tasks = vec![
            task("old", TaskStatus::Pending, d - Duration::days(5)),
            task("recent 1", TaskStatus::Pending, d + Duration::days(1)),
            task("recent 2", TaskStatus::Pending, d + Duration::days(2)),
            task("boundary", TaskStatus::Pending, d),
        ];
        let query = TaskQuery {
            created_after: Some(d),
            ..TaskQuery::default()
        };
        assert_eq!(titles(&query.apply(tasks)), ["recent 2", "recent 1"]);
    }

    #[test]
    fn created_before_is_exclusive() {
        let d = datetime!(2026-02-10 00:00 UTC);
        let tasks = vec![
            task("old 1", TaskStatus::Pending, d - Duration::days(5)),
            task("old 2", TaskStatus::Pending, d - Duration::days(2)),
            task("new", TaskStatus::Pending, d + Duration::days(2)),
            task("boundary", TaskStatus::Pending, d),
        ];
        let query = TaskQuery {
            created_before: Some(d),
            ..TaskQuery::default()
        };
        assert_eq!(titles(&query.apply(tasks)), ["old 2", "old 1"]);
    }

    #[test]
    fn combined_filters_intersect() {
        let start = datetime!(2026-02-01 00:00 UTC);
        let end = datetime!(2026-02-10 00:00 UTC);
        let tasks = vec![
            task("before", TaskStatus::Pending, start - Duration::days(5)),
            task("in range", TaskStatus::Pending, start + Duration::days(2)),
            task("wrong status", TaskStatus::Completed, start + Duration::days(3)),
            task("after", TaskStatus::Pending, end + Duration::days(5)),
        ];
        let query = TaskQuery {
            status: Some(TaskStatus::Pending),
            created_after: Some(start),
            created_before: Some(end),
            ..TaskQuery::default()
        };
        assert_eq!(titles(&query.apply(tasks)), ["in range"]);
    }

    #[test]
    fn title_order_ignores_case() {
        let now = datetime!(2026-02-01 00:00 UTC);
        let tasks = vec![
            task("Zebra", TaskStatus::Pending, now),
            task("apple", TaskStatus::Pending, now),
            task("Banana", TaskStatus::Pending, now),
            task("Apple", TaskStatus::Pending, now),
        ];
        let asc = TaskQuery {
            order: TaskOrder::from_params(Some("title"), Some("asc")),
            ..TaskQuery::default()
        };
        assert_eq!(
            titles(&asc.apply(tasks.clone())),
            ["Apple", "apple", "Banana", "Zebra"]
        );

        let desc = TaskQuery {
            order: TaskOrder::from_params(Some("title"), Some("desc")),
            ..TaskQuery::default()
        };
        assert_eq!(
            titles(&desc.apply(tasks)),
            ["Zebra", "Banana", "apple", "Apple"]
        );
    }

    #[test]
    fn ties_keep_input_order() {
        let now = datetime!(2026-02-01 00:00 UTC);
        let tasks = vec![
            task("first", TaskStatus::Pending, now),
            task("second", TaskStatus::Pending, now),
            task("third", TaskStatus::Pending, now),
        ];
        let query = TaskQuery {
            order: TaskOrder::from_params(Some("status"), Some("desc")),
            ..TaskQuery::default()
        };
        assert_eq!(titles(&query.apply(tasks)), ["first", "second", "third"]);
    }
}
