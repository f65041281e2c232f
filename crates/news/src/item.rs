use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use url::{Host, Url};

use newsfeed_core::{DomainError, DomainResult, NewsItemId};
use newsfeed_render::{AsJson, SanitizePolicy, Value};

use crate::Category;

pub const MAX_TITLE_LEN: usize = 1024;
pub const MAX_DESCRIPTION_LEN: usize = 4096;
pub const MAX_CITY_LEN: usize = 128;
pub const MAX_TAGS_LEN: usize = 1024;

/// Input for creating a news item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewNewsItem {
    pub title: String,
    pub link: String,
    /// Raw HTML as submitted.
    pub description: String,
    pub category: Option<Category>,
    pub city: String,
    /// Comma-separated tag list.
    pub tags: String,
}

/// A published news item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewsItem {
    id: NewsItemId,
    title: String,
    link: String,
    description: String,
    category: Option<Category>,
    city: String,
    tags: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl NewsItem {
    /// Validate `input` and build a new item stamped with `now`.
    pub fn create(id: NewsItemId, input: NewNewsItem, now: DateTime<Utc>) -> DomainResult<Self> {
        check_len("title", &input.title, MAX_TITLE_LEN)?;
        check_len("description", &input.description, MAX_DESCRIPTION_LEN)?;
        check_len("city", &input.city, MAX_CITY_LEN)?;
        check_len("tags", &input.tags, MAX_TAGS_LEN)?;
        check_link(&input.link)?;

        Ok(Self {
            id,
            title: input.title,
            link: input.link,
            description: input.description,
            category: input.category,
            city: input.city,
            tags: input.tags,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn id(&self) -> NewsItemId {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn link(&self) -> &str {
        &self.link
    }

    /// Description exactly as stored (unsanitized).
    pub fn raw_description(&self) -> &str {
        &self.description
    }

    /// Description cleaned with the safe-subset policy, safe to embed.
    pub fn description_html(&self) -> String {
        SanitizePolicy::safe(false).clean(&self.description)
    }

    pub fn category(&self) -> Option<Category> {
        self.category
    }

    pub fn city(&self) -> &str {
        &self.city
    }

    /// Individual tags, trimmed, empty entries skipped.
    pub fn tags(&self) -> Vec<&str> {
        self.tags
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .collect()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Replace the description, bumping `updated_at`.
    pub fn set_description(&mut self, description: String, now: DateTime<Utc>) -> DomainResult<()> {
        check_len("description", &description, MAX_DESCRIPTION_LEN)?;
        self.description = description;
        self.updated_at = now;
        Ok(())
    }
}

impl AsJson for NewsItem {
    fn as_json(&self) -> Value {
        Value::map([
            ("id", Value::Uuid(*self.id.as_uuid())),
            ("title", Value::from(self.title.as_str())),
            ("link", Value::from(self.link.as_str())),
            ("description", Value::from(self.description_html())),
            ("category", self.category.map_or(Value::Null, Value::from_enum)),
            ("city", Value::from(self.city.as_str())),
            ("tags", Value::list(self.tags().into_iter().map(Value::from))),
            ("created_at", Value::from(self.created_at)),
            ("updated_at", Value::from(self.updated_at)),
        ])
    }

    fn type_name(&self) -> &'static str {
        "NewsItem"
    }
}

fn check_len(field: &str, value: &str, max: usize) -> DomainResult<()> {
    let len = value.chars().count();
    if len > max {
        return Err(DomainError::validation(format!(
            "{field} is {len} characters long (max {max})"
        )));
    }
    Ok(())
}

fn check_link(link: &str) -> DomainResult<()> {
    let url = Url::parse(link)
        .map_err(|e| DomainError::validation(format!("link is not a valid URL: {e}")))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(DomainError::validation("link must be an http(s) URL"));
    }
    match url.host() {
        Some(Host::Domain(domain)) if is_hostname(domain) => Ok(()),
        Some(Host::Ipv4(_) | Host::Ipv6(_)) => Ok(()),
        Some(Host::Domain(_)) => Err(DomainError::validation("link host is not a valid hostname")),
        None => Err(DomainError::validation("link has no host")),
    }
}

/// Dot separated labels of ASCII letters, digits and inner hyphens.
/// `Url` has already lowered the host and punycode-encoded any Unicode.
fn is_hostname(domain: &str) -> bool {
    let domain = domain.strip_suffix('.').unwrap_or(domain);
    !domain.is_empty()
        && domain.split('.').all(|label| {
            !label.is_empty()
                && label.len() <= 63
                && !label.starts_with('-')
                && !label.ends_with('-')
                && label.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'-')
        })
}
