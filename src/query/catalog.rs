//! Query templates and request rendering

use crate::error::{Error, Result};
use crate::template::{self, TemplateContext};
use crate::types::{format_timestamp, QueryName, TimeWindow};
use serde_json::json;
use std::collections::{BTreeMap, BTreeSet, HashMap};

const POSTS_QUERY: &str = r#"
{
  posts(input: {terms: {limit: {{ terms.limit }}, after: "{{ terms.after }}", before: "{{ terms.before }}"}}){
    results {
      _id
      title
      postedAt
      htmlBody
      user {
        username
      }
    }
  }
}
"#;

const COMMENTS_QUERY: &str = r#"
{
  comments(input: {terms: {limit: {{ terms.limit }}, after: "{{ terms.after }}", before: "{{ terms.before }}"}}){
    results {
      _id
      postedAt
      postId
      htmlBody
      parentCommentId
      user {
        username
      }
    }
  }
}
"#;

const POST_COMMENTS_QUERY: &str = r#"
{
  comments(input: {terms: {view: "postCommentsOld", postId: "{{ terms.post_id }}"}}){
    results {
      _id
      postedAt
      postId
      htmlBody
      parentCommentId
      user {
        username
      }
    }
  }
}
"#;

/// Parameters for one query, tagged by shape
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryRequest {
    /// Page through a time window
    Window {
        /// Maximum records per page
        limit: usize,
        /// Creation-time window to list
        window: TimeWindow,
    },
    /// Everything attached to one post
    Post {
        /// Post identifier
        post_id: String,
    },
}

impl QueryRequest {
    /// Create a windowed request
    pub fn window(limit: usize, window: TimeWindow) -> Self {
        Self::Window { limit, window }
    }

    /// Create a single-post request
    pub fn post(post_id: impl Into<String>) -> Self {
        Self::Post {
            post_id: post_id.into(),
        }
    }

    /// Shape of this request
    pub fn kind(&self) -> RequestKind {
        match self {
            Self::Window { .. } => RequestKind::Window,
            Self::Post { .. } => RequestKind::Post,
        }
    }

    fn to_context(&self) -> TemplateContext {
        let terms = match self {
            Self::Window { limit, window } => json!({
                "limit": limit,
                "after": format_timestamp(window.after()),
                "before": format_timestamp(window.before()),
            }),
            Self::Post { post_id } => json!({ "post_id": post_id }),
        };
        TemplateContext::with_terms(terms)
    }
}

/// The request shape a query accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestKind {
    /// Limit plus time window
    Window,
    /// Single post identifier
    Post,
}

impl RequestKind {
    /// Request shape accepted by a query
    pub fn for_query(query: QueryName) -> Self {
        if query.is_bulk() {
            Self::Window
        } else {
            Self::Post
        }
    }

    /// Placeholders a template of this kind must use, no more and no fewer
    pub fn variables(self) -> BTreeSet<String> {
        let names: &[&str] = match self {
            Self::Window => &["terms.after", "terms.before", "terms.limit"],
            Self::Post => &["terms.post_id"],
        };
        names.iter().map(|s| (*s).to_string()).collect()
    }
}

/// Query templates keyed by query name
#[derive(Debug, Clone)]
pub struct QueryCatalog {
    templates: BTreeMap<QueryName, String>,
}

impl QueryCatalog {
    /// Catalog with the built-in forum queries
    pub fn new() -> Self {
        let templates = [
            (QueryName::Posts, POSTS_QUERY),
            (QueryName::Comments, COMMENTS_QUERY),
            (QueryName::PostComments, POST_COMMENTS_QUERY),
        ]
        .into_iter()
        .map(|(name, query)| (name, query.to_string()))
        .collect();

        Self { templates }
    }

    /// Catalog with some built-in templates replaced
    ///
    /// Every override is checked against the placeholders its query kind
    /// requires.
    pub fn with_overrides(overrides: &HashMap<QueryName, String>) -> Result<Self> {
        let mut catalog = Self::new();
        for (name, query) in overrides {
            validate_template(*name, query)?;
            catalog.templates.insert(*name, query.clone());
        }
        Ok(catalog)
    }

    /// Raw template for a query
    pub fn template(&self, query: QueryName) -> &str {
        self.templates.get(&query).map_or("", String::as_str)
    }

    /// Render a request into a concrete GraphQL document
    pub fn render(&self, query: QueryName, request: &QueryRequest) -> Result<String> {
        let expected = RequestKind::for_query(query);
        if request.kind() != expected {
            return Err(Error::template(format!(
                "query '{query}' takes a {expected:?} request, got {:?}",
                request.kind()
            )));
        }

        template::render(self.template(query), &request.to_context())
    }

    /// Key under `data` that holds the results for a query
    pub fn response_field(query: QueryName) -> &'static str {
        match query {
            QueryName::Posts => "posts",
            QueryName::Comments | QueryName::PostComments => "comments",
        }
    }

    /// Dotted path to the result list in a response body
    pub fn results_path(query: QueryName) -> String {
        format!("data.{}.results", Self::response_field(query))
    }
}

impl Default for QueryCatalog {
    fn default() -> Self {
        Self::new()
    }
}

fn validate_template(query: QueryName, template: &str) -> Result<()> {
    let expected = RequestKind::for_query(query).variables();
    let found = template::extract_variables(template);
    if found != expected {
        return Err(Error::template(format!(
            "template for '{query}' must use exactly {{{{ {} }}}}, found [{}]",
            expected.into_iter().collect::<Vec<_>>().join(" }}, {{ "),
            found.into_iter().collect::<Vec<_>>().join(", ")
        )));
    }
    Ok(())
}
