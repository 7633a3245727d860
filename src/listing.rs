//! Listing payloads for the home page and tag pages, plus page routes.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::Serialize;

use crate::{
    document::{Collection, Document},
    index::{TagGroup, TagIndex},
};

pub(crate) const DISPLAY_DATE_FORMAT: &str = "%B %d, %Y";

/// What a listing shows and where it lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ListingConfig {
    pub title: String,
    pub route: String,
    /// Highlighted in the tag navigation.
    pub selected_tag: Option<String>,
    pub skip_untitled: bool,
}

impl ListingConfig {
    pub fn home() -> Self {
        Self {
            title: "Home".to_string(),
            route: "/".to_string(),
            selected_tag: None,
            skip_untitled: true,
        }
    }

    pub fn for_tag(label: &str) -> Self {
        Self {
            title: label.to_string(),
            route: tag_route(label),
            selected_tag: Some(label.to_string()),
            skip_untitled: false,
        }
    }
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub(crate) struct ListingEntry {
    pub title: String,
    pub path: String,
    pub date: NaiveDate,
    pub display_date: String,
    #[serde(rename = "abstract")]
    pub abstract_text: String,
}

impl From<&Document> for ListingEntry {
    fn from(doc: &Document) -> Self {
        Self {
            title: doc.title.clone(),
            path: doc.path.clone(),
            date: doc.date,
            display_date: doc.date.format(DISPLAY_DATE_FORMAT).to_string(),
            abstract_text: doc.abstract_text.clone(),
        }
    }
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub(crate) struct Listing {
    pub title: String,
    pub route: String,
    pub selected_tag: Option<String>,
    pub entries: Vec<ListingEntry>,
}

/// `documents` must already be in display order.
pub(crate) fn build_listing<'a>(
    config: &ListingConfig,
    documents: impl IntoIterator<Item = &'a Document>,
) -> Listing {
    let entries = documents
        .into_iter()
        .filter(|d| !(config.skip_untitled && d.title.is_empty()))
        .map(ListingEntry::from)
        .collect();

    Listing {
        title: config.title.clone(),
        route: config.route.clone(),
        selected_tag: config.selected_tag.clone(),
        entries,
    }
}

pub(crate) fn home_listing(collection: &Collection) -> Listing {
    build_listing(&ListingConfig::home(), collection.all())
}

/// An unknown tag yields an empty listing.
pub(crate) fn tag_listing(index: &TagIndex, label: &str) -> Listing {
    let config = ListingConfig::for_tag(label);
    match index.get(label) {
        Some(group) => group_listing(&config, group),
        None => build_listing(&config, std::iter::empty()),
    }
}

fn group_listing(config: &ListingConfig, group: &TagGroup) -> Listing {
    build_listing(config, group.documents.iter().copied())
}

pub(crate) fn tag_route(label: &str) -> String {
    format!("/tags/{}/", crate::index::slugify(label))
}

/// Output file for a route: `/a/b/` and `/a/b` become `a/b/index.html`,
/// `/a/b.html` stays as is.
pub(crate) fn route_to_file(out_dir: &Path, route: &str) -> PathBuf {
    let relative = route.trim_matches('/');
    if relative.is_empty() {
        return out_dir.join("index.html");
    }
    let path = out_dir.join(relative);
    if relative.ends_with(".html") {
        path
    } else {
        path.join("index.html")
    }
}
