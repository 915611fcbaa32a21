//! Common types used throughout forum-archive
//!
//! This module contains shared type definitions, type aliases,
//! and utility types used across multiple modules.

use crate::error::{Error, Result};
use chrono::{DateTime, SecondsFormat, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Type Aliases
// ============================================================================

/// JSON value type (re-exported from serde_json)
pub type JsonValue = serde_json::Value;

/// One post or comment record, kept exactly as the server returned it
pub type Record = JsonValue;

// ============================================================================
// Query Name
// ============================================================================

/// The queries the archiver knows how to run
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryName {
    /// All posts, listed by time window
    Posts,
    /// All comments, listed by time window
    Comments,
    /// Comments of a single post, one request per post
    PostComments,
}

impl QueryName {
    /// Every known query, in declaration order
    pub const ALL: [QueryName; 3] = [Self::Posts, Self::Comments, Self::PostComments];

    /// Name used on the command line and in directory names
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Posts => "posts",
            Self::Comments => "comments",
            Self::PostComments => "post_comments",
        }
    }

    /// Whether this query is paginated by time window
    pub fn is_bulk(self) -> bool {
        matches!(self, Self::Posts | Self::Comments)
    }
}

impl fmt::Display for QueryName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QueryName {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|q| q.as_str() == s)
            .ok_or_else(|| Error::unknown_query(s))
    }
}

// ============================================================================
// Time Window
// ============================================================================

/// Half-open interval `[after, before)` of item creation times
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimeWindow {
    after: DateTime<Utc>,
    before: DateTime<Utc>,
}

impl TimeWindow {
    /// Create a window, rejecting `after > before`
    pub fn new(after: DateTime<Utc>, before: DateTime<Utc>) -> Result<Self> {
        if after > before {
            return Err(Error::invalid_value(
                "window",
                format!(
                    "after ({}) is later than before ({})",
                    format_timestamp(after),
                    format_timestamp(before)
                ),
            ));
        }
        Ok(Self { after, before })
    }

    /// Lower bound (inclusive)
    pub fn after(&self) -> DateTime<Utc> {
        self.after
    }

    /// Upper bound (exclusive)
    pub fn before(&self) -> DateTime<Utc> {
        self.before
    }

    /// Length of the window
    pub fn span(&self) -> TimeDelta {
        self.before - self.after
    }

    /// Arithmetic mean of the two bounds
    pub fn midpoint(&self) -> DateTime<Utc> {
        self.after + self.span() / 2
    }

    /// Split at the midpoint into `(after, middle)` and `(middle, before)`
    pub fn split(&self) -> (TimeWindow, TimeWindow) {
        let middle = self.midpoint();
        (
            Self {
                after: self.after,
                before: middle,
            },
            Self {
                after: middle,
                before: self.before,
            },
        )
    }

    /// Whether both halves of a split would still be at least `min_span` long
    pub fn can_split(&self, min_span: TimeDelta) -> bool {
        self.span() / 2 >= min_span && self.midpoint() > self.after
    }

    /// Whether a timestamp falls inside the window
    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        self.after <= at && at < self.before
    }

    /// File name stem used when a page for this window is persisted
    pub fn file_stem(&self) -> String {
        format!(
            "{}-{}",
            format_timestamp(self.after),
            format_timestamp(self.before)
        )
    }
}

impl fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}",
            format_timestamp(self.after),
            format_timestamp(self.before)
        )
    }
}

/// Render a timestamp the way queries and file names expect it
///
/// RFC 3339 in UTC, fractional seconds only when non-zero.
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

/// Parse an RFC 3339 timestamp into UTC
pub fn parse_timestamp(s: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| Error::invalid_value("timestamp", format!("'{s}': {e}")))
}

// ============================================================================
// Backoff Type
// ============================================================================

/// Type of backoff for retries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackoffType {
    /// Constant delay between retries
    Constant,
    /// Linear increase in delay
    Linear,
    /// Exponential increase in delay
    #[default]
    Exponential,
}

// ============================================================================
// Unsplittable Window Policy
// ============================================================================

/// What to do with a full page whose window is too narrow to bisect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnsplittablePolicy {
    /// Abort the run with `Error::UnsplittableWindow`
    #[default]
    Fail,
    /// Save the (possibly truncated) page, warn, and move on
    SaveTruncated,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use test_case::test_case;

    fn ts(y: i32, mo: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, 0, 0, 0).unwrap()
    }

    #[test_case("posts", QueryName::Posts)]
    #[test_case("comments", QueryName::Comments)]
    #[test_case("post_comments", QueryName::PostComments)]
    fn test_query_name_parse(input: &str, expected: QueryName) {
        assert_eq!(input.parse::<QueryName>().unwrap(), expected);
        assert_eq!(expected.to_string(), input);
    }

    #[test]
    fn test_query_name_unknown() {
        let err = "bogus".parse::<QueryName>().unwrap_err();
        assert!(matches!(err, Error::UnknownQuery { ref name } if name == "bogus"));
    }

    #[test]
    fn test_query_name_is_bulk() {
        assert!(QueryName::Posts.is_bulk());
        assert!(QueryName::Comments.is_bulk());
        assert!(!QueryName::PostComments.is_bulk());
    }

    #[test]
    fn test_query_name_serde() {
        let q: QueryName = serde_json::from_str("\"post_comments\"").unwrap();
        assert_eq!(q, QueryName::PostComments);
    }

    #[test]
    fn test_window_rejects_inverted_bounds() {
        assert!(TimeWindow::new(ts(2001, 1, 1), ts(2000, 1, 1)).is_err());
        assert!(TimeWindow::new(ts(2000, 1, 1), ts(2000, 1, 1)).is_ok());
    }

    #[test]
    fn test_split_covers_window() {
        let window = TimeWindow::new(ts(1900, 1, 1), ts(2100, 1, 1)).unwrap();
        let (left, right) = window.split();
        let middle = window.midpoint();

        assert_eq!(left.after(), window.after());
        assert_eq!(left.before(), middle);
        assert_eq!(right.after(), middle);
        assert_eq!(right.before(), window.before());
        assert!(window.after() <= middle && middle <= window.before());
    }

    #[test]
    fn test_midpoint_is_mean() {
        let window = TimeWindow::new(ts(2000, 1, 1), ts(2000, 1, 3)).unwrap();
        assert_eq!(window.midpoint(), ts(2000, 1, 2));

        let odd = TimeWindow::new(
            ts(2000, 1, 1),
            ts(2000, 1, 1) + TimeDelta::seconds(1),
        )
        .unwrap();
        assert_eq!(odd.midpoint(), ts(2000, 1, 1) + TimeDelta::milliseconds(500));
    }

    #[test]
    fn test_can_split() {
        let min = TimeDelta::milliseconds(1);
        let wide = TimeWindow::new(ts(2000, 1, 1), ts(2000, 1, 2)).unwrap();
        assert!(wide.can_split(min));

        let narrow = TimeWindow::new(ts(2000, 1, 1), ts(2000, 1, 1) + min).unwrap();
        assert!(!narrow.can_split(min));

        let empty = TimeWindow::new(ts(2000, 1, 1), ts(2000, 1, 1)).unwrap();
        assert!(!empty.can_split(min));
    }

    #[test]
    fn test_contains_is_half_open() {
        let window = TimeWindow::new(ts(2000, 1, 1), ts(2000, 1, 2)).unwrap();
        assert!(window.contains(ts(2000, 1, 1)));
        assert!(!window.contains(ts(2000, 1, 2)));
    }

    #[test]
    fn test_file_stem() {
        let window = TimeWindow::new(ts(1900, 1, 1), ts(2100, 1, 1)).unwrap();
        assert_eq!(window.file_stem(), "1900-01-01T00:00:00Z-2100-01-01T00:00:00Z");

        let (_, right) = TimeWindow::new(ts(2000, 1, 1), ts(2000, 1, 1) + TimeDelta::seconds(1))
            .unwrap()
            .split();
        assert_eq!(
            right.file_stem(),
            "2000-01-01T00:00:00.500Z-2000-01-01T00:00:01Z"
        );
    }

    #[test]
    fn test_parse_timestamp() {
        assert_eq!(parse_timestamp("2000-01-01T00:00:00Z").unwrap(), ts(2000, 1, 1));
        assert_eq!(
            parse_timestamp("2000-01-01T01:00:00+01:00").unwrap(),
            ts(2000, 1, 1)
        );
        assert!(parse_timestamp("yesterday").is_err());
    }

    #[test]
    fn test_policy_serde() {
        let p: UnsplittablePolicy = serde_json::from_str("\"save_truncated\"").unwrap();
        assert_eq!(p, UnsplittablePolicy::SaveTruncated);
        assert_eq!(UnsplittablePolicy::default(), UnsplittablePolicy::Fail);
    }
}
