//! Site configuration (_config.yml)

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site
    pub title: String,
    pub description: String,
    pub language: String,
    pub timezone: String,

    // URL
    pub url: String,

    // Directory
    pub static_dir: String,
    pub public_dir: String,
    pub pagination_dir: String,

    // Date format (Moment.js style) and chrono locale name
    pub date_format: String,
    pub date_locale: String,

    // Listing
    pub per_page: usize,

    #[serde(default)]
    pub cms: CmsConfig,
    #[serde(default)]
    pub preview: PreviewConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub comments: CommentsConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "Spacetraveling".to_string(),
            description: String::new(),
            language: "pt-BR".to_string(),
            timezone: String::new(),

            url: "http://localhost:3000".to_string(),

            static_dir: "static".to_string(),
            public_dir: "public".to_string(),
            pagination_dir: "page".to_string(),

            date_format: "DD MMM YYYY".to_string(),
            date_locale: "pt_BR".to_string(),

            per_page: 1,

            cms: CmsConfig::default(),
            preview: PreviewConfig::default(),
            server: ServerConfig::default(),
            comments: CommentsConfig::default(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: SiteConfig = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Apply secrets and endpoints supplied through the environment.
    ///
    /// - `PRISMIC_ENDPOINT`: CMS API root
    /// - `PRISMIC_ACCESS_TOKEN`: CMS access token
    /// - `PREVIEW_SECRET`: key used to sign the preview cookie
    pub fn apply_env(&mut self) {
        if let Ok(endpoint) = std::env::var("PRISMIC_ENDPOINT") {
            self.cms.endpoint = endpoint;
        }
        if let Ok(token) = std::env::var("PRISMIC_ACCESS_TOKEN") {
            self.cms.access_token = Some(token).filter(|t| !t.is_empty());
        }
        if let Ok(secret) = std::env::var("PREVIEW_SECRET") {
            self.preview.secret = Some(secret).filter(|s| !s.is_empty());
        }

        tracing::debug!(
            endpoint = %self.cms.endpoint,
            has_access_token = self.cms.access_token.is_some(),
            preview_enabled = self.preview.secret.is_some(),
            "environment overrides applied"
        );
    }

    /// Base URL without a trailing slash
    pub fn base_url(&self) -> &str {
        self.url.trim_end_matches('/')
    }

    /// Whether the site is served over TLS
    pub fn is_https(&self) -> bool {
        self.url.starts_with("https://")
    }
}

/// Headless CMS connection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CmsConfig {
    /// API root, e.g. `https://my-repo.cdn.prismic.io/api/v2`
    pub endpoint: String,
    pub access_token: Option<String>,
    /// Custom type holding blog posts
    pub document_type: String,
    /// Request timeout in seconds
    pub timeout: u64,
}

impl Default for CmsConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://spacetraveling.cdn.prismic.io/api/v2".to_string(),
            access_token: None,
            document_type: "posts".to_string(),
            timeout: 10,
        }
    }
}

/// Preview cookie settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PreviewConfig {
    pub cookie_name: String,
    /// Signing key; preview mode is disabled without one
    pub secret: Option<String>,
    /// Cookie lifetime in seconds; a session cookie when unset
    pub max_age: Option<u64>,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            cookie_name: "spacetraveling_preview".to_string(),
            secret: None,
            max_age: None,
        }
    }
}

/// Development server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub ip: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            ip: "localhost".to_string(),
            port: 3000,
        }
    }
}

/// Utterances comment widget settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CommentsConfig {
    pub enable: bool,
    pub repo: String,
    pub issue_term: String,
    pub theme: String,
}

impl Default for CommentsConfig {
    fn default() -> Self {
        Self {
            enable: false,
            repo: String::new(),
            issue_term: "pathname".to_string(),
            theme: "github-dark".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SiteConfig::default();
        assert_eq!(config.title, "Spacetraveling");
        assert_eq!(config.cms.document_type, "posts");
        assert_eq!(config.per_page, 1);
        assert!(config.preview.secret.is_none());
    }

    #[test]
    fn test_parse_config() {
        let yaml = r#"
title: My Blog
url: https://blog.example.com/
per_page: 5
cms:
  endpoint: https://repo.cdn.prismic.io/api/v2
  document_type: post
comments:
  enable: true
  repo: someone/blog-comments
"#;
        let config: SiteConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.title, "My Blog");
        assert_eq!(config.per_page, 5);
        assert_eq!(config.cms.document_type, "post");
        assert_eq!(config.cms.timeout, 10);
        assert!(config.comments.enable);
        assert_eq!(config.comments.issue_term, "pathname");
        assert_eq!(config.base_url(), "https://blog.example.com");
        assert!(config.is_https());
    }
}
