//! Archive configuration
//!
//! Everything a run needs is loaded from an optional YAML file. Every field
//! has a default, so an empty file (or no file at all) archives from the
//! built-in forum endpoints with the stock settings.

use crate::engine::{sentinel_window, SyncConfig};
use crate::error::{Error, Result, ResultExt};
use crate::http::{HttpClientConfig, RateLimiterConfig};
use crate::pagination::BisectConfig;
use crate::query::QueryCatalog;
use crate::types::{BackoffType, QueryName, UnsplittablePolicy};
use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Built-in server endpoints
pub const DEFAULT_ENDPOINTS: [(&str, &str); 2] = [
    ("ea", "https://forum-bots.effectivealtruism.org/graphql"),
    ("lw", "https://www.lesswrong.com/graphql"),
];

// ============================================================================
// Top-Level Archive Config
// ============================================================================

/// Complete archive configuration loaded from YAML
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArchiveConfig {
    /// Root directory for saved pages
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Records requested per page
    #[serde(default = "default_page_size")]
    pub page_size: usize,

    /// Lower bound of the initial window
    #[serde(default = "default_start")]
    pub start: DateTime<Utc>,

    /// Upper bound of the initial window
    #[serde(default = "default_end")]
    pub end: DateTime<Utc>,

    /// Narrowest window a split may produce, in milliseconds
    #[serde(default = "default_min_window_ms")]
    pub min_window_ms: u64,

    /// Handling of full pages that cannot be split
    #[serde(default)]
    pub on_unsplittable: UnsplittablePolicy,

    /// User-Agent header sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Server short name to GraphQL endpoint; replaces the built-in table
    #[serde(default = "default_endpoints")]
    pub endpoints: BTreeMap<String, String>,

    /// Query template overrides
    #[serde(default)]
    pub queries: HashMap<QueryName, String>,

    /// HTTP client configuration
    #[serde(default)]
    pub http: HttpConfig,
}

impl Default for ArchiveConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            page_size: default_page_size(),
            start: default_start(),
            end: default_end(),
            min_window_ms: default_min_window_ms(),
            on_unsplittable: UnsplittablePolicy::default(),
            user_agent: default_user_agent(),
            endpoints: default_endpoints(),
            queries: HashMap::new(),
            http: HttpConfig::default(),
        }
    }
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_page_size() -> usize {
    100
}

fn default_start() -> DateTime<Utc> {
    sentinel_window().after()
}

fn default_end() -> DateTime<Utc> {
    sentinel_window().before()
}

fn default_min_window_ms() -> u64 {
    1
}

fn default_user_agent() -> String {
    format!("forum-archive/{}", env!("CARGO_PKG_VERSION"))
}

fn default_endpoints() -> BTreeMap<String, String> {
    DEFAULT_ENDPOINTS
        .iter()
        .map(|(name, url)| ((*name).to_string(), (*url).to_string()))
        .collect()
}

impl ArchiveConfig {
    /// Load and validate a config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_yaml(&content)
    }

    /// Parse and validate a YAML document
    pub fn from_yaml(content: &str) -> Result<Self> {
        let config: Self = if content.trim().is_empty() {
            Self::default()
        } else {
            serde_yaml::from_str(content)?
        };
        config.validate()?;
        Ok(config)
    }

    /// Check values that serde cannot
    pub fn validate(&self) -> Result<()> {
        if self.page_size == 0 {
            return Err(Error::invalid_value("page_size", "must be at least 1"));
        }
        if self.start >= self.end {
            return Err(Error::invalid_value(
                "start",
                format!("{} is not before end {}", self.start, self.end),
            ));
        }
        if self.min_window_ms == 0 {
            return Err(Error::invalid_value("min_window_ms", "must be at least 1"));
        }
        if self.endpoints.is_empty() {
            return Err(Error::invalid_value("endpoints", "no servers configured"));
        }
        for (name, endpoint) in &self.endpoints {
            url::Url::parse(endpoint)
                .with_context(|| format!("Invalid endpoint for server '{name}'"))?;
        }
        self.catalog()?;
        Ok(())
    }

    /// Endpoint for a server short name
    pub fn endpoint(&self, server: &str) -> Result<&str> {
        self.endpoints
            .get(server)
            .map(String::as_str)
            .ok_or_else(|| Error::UnknownServer {
                name: server.to_string(),
                known: self.server_names().join(", "),
            })
    }

    /// Configured server names, sorted
    pub fn server_names(&self) -> Vec<&str> {
        self.endpoints.keys().map(String::as_str).collect()
    }

    /// HTTP client settings
    pub fn http_client_config(&self) -> HttpClientConfig {
        let backoff = &self.http.retry_backoff;
        let mut builder = HttpClientConfig::builder()
            .max_retries(self.http.max_retries)
            .backoff(
                backoff.backoff_type,
                Duration::from_millis(backoff.initial_ms),
                Duration::from_millis(backoff.max_ms),
            )
            .user_agent(&self.user_agent);

        if let Some(seconds) = self.http.timeout_seconds {
            builder = builder.timeout(Duration::from_secs(seconds));
        }
        if let Some(ref rate_limit) = self.http.rate_limit {
            builder = builder.rate_limit(rate_limit.clone());
        }

        builder.build()
    }

    /// Window and bisection settings for the engine
    pub fn sync_config(&self) -> Result<SyncConfig> {
        let min_window_ms = i64::try_from(self.min_window_ms)
            .map_err(|_| Error::invalid_value("min_window_ms", "out of range"))?;
        let bisect = BisectConfig::default()
            .with_page_size(self.page_size)
            .with_min_window(TimeDelta::milliseconds(min_window_ms))
            .with_policy(self.on_unsplittable);

        Ok(SyncConfig::new()
            .with_bounds(self.start, self.end)?
            .with_bisect(bisect))
    }

    /// Query catalog with any configured overrides applied
    pub fn catalog(&self) -> Result<QueryCatalog> {
        QueryCatalog::with_overrides(&self.queries)
    }
}

// ============================================================================
// HTTP Config
// ============================================================================

/// HTTP client configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Request timeout in seconds, none by default
    #[serde(default)]
    pub timeout_seconds: Option<u64>,

    /// Maximum number of retries
    #[serde(default)]
    pub max_retries: u32,

    /// Retry backoff configuration
    #[serde(default)]
    pub retry_backoff: BackoffConfig,

    /// Rate limiting, off by default
    #[serde(default)]
    pub rate_limit: Option<RateLimiterConfig>,
}

/// Backoff configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackoffConfig {
    /// Type of backoff
    #[serde(rename = "type", default)]
    pub backoff_type: BackoffType,

    /// Initial delay in milliseconds
    #[serde(default = "default_initial_ms")]
    pub initial_ms: u64,

    /// Maximum delay in milliseconds
    #[serde(default = "default_max_ms")]
    pub max_ms: u64,
}

impl Default for BackoffConfig {
    fn default() -> Self {
        Self {
            backoff_type: BackoffType::Exponential,
            initial_ms: default_initial_ms(),
            max_ms: default_max_ms(),
        }
    }
}

fn default_initial_ms() -> u64 {
    500
}

fn default_max_ms() -> u64 {
    30000
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    #[test]
    fn test_default_config() {
        let config = ArchiveConfig::default();
        assert_eq!(config.output_dir, PathBuf::from("."));
        assert_eq!(config.page_size, 100);
        assert_eq!(config.min_window_ms, 1);
        assert_eq!(config.on_unsplittable, UnsplittablePolicy::Fail);
        assert_eq!(config.server_names(), vec!["ea", "lw"]);
        assert!(config.user_agent.starts_with("forum-archive/"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_empty_document() {
        let config = ArchiveConfig::from_yaml("").unwrap();
        assert_eq!(config.page_size, 100);
        assert_eq!(
            config.endpoint("lw").unwrap(),
            "https://www.lesswrong.com/graphql"
        );
    }

    #[test]
    fn test_parse_full_config() {
        let yaml = r#"
output_dir: "/srv/archive"
page_size: 50
start: "2015-01-01T00:00:00Z"
end: "2025-01-01T00:00:00Z"
min_window_ms: 1000
on_unsplittable: save_truncated
user_agent: "my-archiver/2.0"
endpoints:
  local: "http://127.0.0.1:3000/graphql"
queries:
  post_comments: "{ comments(input: {terms: {postId: \"{{ terms.post_id }}\"}}) { results { _id } } }"
http:
  timeout_seconds: 30
  max_retries: 3
  retry_backoff:
    type: linear
    initial_ms: 100
  rate_limit:
    requests_per_second: 2
"#;

        let config = ArchiveConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.output_dir, PathBuf::from("/srv/archive"));
        assert_eq!(config.page_size, 50);
        assert_eq!(
            config.start,
            Utc.with_ymd_and_hms(2015, 1, 1, 0, 0, 0).unwrap()
        );
        assert_eq!(config.on_unsplittable, UnsplittablePolicy::SaveTruncated);
        assert_eq!(config.server_names(), vec!["local"]);
        assert!(config.queries.contains_key(&QueryName::PostComments));
        assert_eq!(config.http.timeout_seconds, Some(30));
        assert_eq!(config.http.retry_backoff.backoff_type, BackoffType::Linear);
        assert_eq!(config.http.retry_backoff.max_ms, 30000);
        assert_eq!(
            config.http.rate_limit,
            Some(RateLimiterConfig::new(2, 1))
        );
    }

    #[test_case("page_size: 0", "page_size" ; "zero page size")]
    #[test_case("min_window_ms: 0", "min_window_ms" ; "zero min window")]
    #[test_case("start: \"2020-01-01T00:00:00Z\"\nend: \"2020-01-01T00:00:00Z\"", "start" ; "empty range")]
    #[test_case("endpoints: {}", "endpoints" ; "no endpoints")]
    fn test_validate_rejects(yaml: &str, field: &str) {
        match ArchiveConfig::from_yaml(yaml).unwrap_err() {
            Error::InvalidConfigValue { field: f, .. } => assert_eq!(f, field),
            other => panic!("Expected InvalidConfigValue, got {other:?}"),
        }
    }

    #[test]
    fn test_validate_rejects_bad_endpoint_url() {
        let err = ArchiveConfig::from_yaml("endpoints:\n  bad: \"not a url\"").unwrap_err();
        assert!(err.to_string().contains("server 'bad'"));
    }

    #[test]
    fn test_parse_rejects_unknown_query_override() {
        assert!(ArchiveConfig::from_yaml("queries:\n  bogus: \"{}\"").is_err());
    }

    #[test]
    fn test_unknown_server_lists_known() {
        let config = ArchiveConfig::default();
        let err = config.endpoint("bogus").unwrap_err();
        assert_eq!(err.to_string(), "Unknown server 'bogus' (known: ea, lw)");
    }

    #[test]
    fn test_http_client_config_defaults_are_single_shot() {
        let http = ArchiveConfig::default().http_client_config();
        assert!(http.timeout.is_none());
        assert_eq!(http.max_retries, 0);
        assert!(http.rate_limit.is_none());
        assert_eq!(http.initial_backoff, Duration::from_millis(500));
    }

    #[test]
    fn test_http_client_config_mapping() {
        let mut config = ArchiveConfig::default();
        config.user_agent = "custom/1.0".to_string();
        config.http.timeout_seconds = Some(10);
        config.http.max_retries = 2;
        config.http.rate_limit = Some(RateLimiterConfig::new(5, 2));

        let http = config.http_client_config();
        assert_eq!(http.timeout, Some(Duration::from_secs(10)));
        assert_eq!(http.max_retries, 2);
        assert_eq!(http.user_agent, "custom/1.0");
        assert_eq!(http.rate_limit, Some(RateLimiterConfig::new(5, 2)));
    }

    #[test]
    fn test_sync_config_mapping() {
        let mut config = ArchiveConfig::default();
        config.page_size = 25;
        config.min_window_ms = 60_000;
        config.on_unsplittable = UnsplittablePolicy::SaveTruncated;

        let sync = config.sync_config().unwrap();
        assert_eq!(sync.window, sentinel_window());
        assert_eq!(sync.page_size(), 25);
        assert_eq!(sync.bisect.min_window, TimeDelta::minutes(1));
        assert_eq!(sync.bisect.on_unsplittable, UnsplittablePolicy::SaveTruncated);
    }

    #[test]
    fn test_catalog_rejects_override_missing_placeholder() {
        let mut config = ArchiveConfig::default();
        config
            .queries
            .insert(QueryName::Posts, "{ posts { results { _id } } }".to_string());
        assert!(config.catalog().is_err());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("archive.yaml");
        std::fs::write(&path, "page_size: 10\n").unwrap();

        let config = ArchiveConfig::load(&path).unwrap();
        assert_eq!(config.page_size, 10);
    }

    #[test]
    fn test_load_missing_file() {
        let err = ArchiveConfig::load("/nonexistent/archive.yaml").unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }
}
