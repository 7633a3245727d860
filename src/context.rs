use std::path::PathBuf;

use anyhow::bail;
use serde::Serialize;

/// Site-wide values shown in every page and in the feeds.
#[derive(Serialize, Debug, Clone)]
pub(crate) struct SiteMetadata {
    pub title: String,
    pub description: String,
    pub author: String,
    /// Absolute base URL without trailing `/`.
    pub url: String,
}

impl SiteMetadata {
    pub fn new(
        title: String,
        description: String,
        author: String,
        url: &str,
    ) -> anyhow::Result<Self> {
        let url = url.trim().trim_end_matches('/');
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            bail!("site url must start with http:// or https://, got {url:?}");
        }
        Ok(Self {
            title,
            description,
            author,
            url: url.to_string(),
        })
    }

    /// Reads `BLOG_NAME`, `BLOG_DESCRIPTION`, `BLOG_AUTHOR` and `BLOG_URL`.
    pub fn from_env() -> anyhow::Result<Self> {
        let var = |name: &str| std::env::var(name).unwrap_or_default();
        let url = std::env::var("BLOG_URL").unwrap_or("http://localhost".to_string());
        Self::new(
            var("BLOG_NAME"),
            var("BLOG_DESCRIPTION"),
            var("BLOG_AUTHOR"),
            &url,
        )
    }

    pub fn absolute(&self, path: &str) -> String {
        format!("{}{}", self.url, path)
    }
}

#[derive(Debug)]
pub(crate) struct Context {
    pub article_dir: PathBuf,
    pub out_dir: PathBuf,
    pub public_dir: PathBuf,
    pub template_dir: PathBuf,

    pub site: SiteMetadata,

    /// Skip malformed documents instead of failing the build.
    pub allow_partial: bool,
    /// Fail the build when two tags share a slug.
    pub strict_tags: bool,
}

#[cfg(test)]
pub(crate) fn test_site() -> SiteMetadata {
    SiteMetadata::new(
        "w Blog".to_string(),
        "Sharing good stuff".to_string(),
        "Test Author".to_string(),
        "http://example.com/",
    )
    .unwrap()
}
