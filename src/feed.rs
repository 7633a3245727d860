//! RSS 2.0 and Atom feeds over the whole collection.

use atom_syndication::{
    ContentBuilder, EntryBuilder, Feed, FeedBuilder, FixedDateTime, LinkBuilder, Text,
};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use rss::{Category, Channel, ChannelBuilder, GuidBuilder, Item, ItemBuilder};

use crate::{
    context::SiteMetadata,
    document::{Collection, Document},
};

pub(crate) const RSS_PATH: &str = "rss.xml";
pub(crate) const ATOM_PATH: &str = "atom.xml";

/// Per-document projection shared by both feed formats.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct FeedEntry {
    pub title: String,
    pub url: String,
    pub guid: String,
    pub date: NaiveDate,
    pub description: String,
    pub content: String,
    pub categories: Vec<String>,
}

impl FeedEntry {
    fn new(site: &SiteMetadata, doc: &Document) -> Self {
        let url = site.absolute(&doc.path);
        let description = if doc.abstract_text.is_empty() {
            doc.excerpt.clone()
        } else {
            doc.abstract_text.clone()
        };
        Self {
            title: doc.title.clone(),
            guid: url.clone(),
            url,
            date: doc.date,
            description,
            content: doc.body_html.clone(),
            categories: doc.tags.clone(),
        }
    }
}

/// Every document, untitled ones included, newest first.
pub(crate) fn feed_entries(site: &SiteMetadata, collection: &Collection) -> Vec<FeedEntry> {
    collection
        .all()
        .iter()
        .map(|doc| FeedEntry::new(site, doc))
        .collect()
}

fn midnight_utc(date: NaiveDate) -> FixedDateTime {
    date.and_time(NaiveTime::MIN).and_utc().fixed_offset()
}

fn rss_item(entry: &FeedEntry) -> Item {
    let guid = GuidBuilder::default()
        .value(entry.guid.clone())
        .permalink(true)
        .build();
    let categories: Vec<_> = entry
        .categories
        .iter()
        .map(|tag| Category {
            name: tag.clone(),
            domain: None,
        })
        .collect();

    ItemBuilder::default()
        .title(Some(entry.title.clone()))
        .link(Some(entry.url.clone()))
        .guid(Some(guid))
        .pub_date(Some(midnight_utc(entry.date).to_rfc2822()))
        .description(Some(entry.description.clone()))
        .content(Some(entry.content.clone()))
        .categories(categories)
        .build()
}

pub(crate) fn rss_channel(site: &SiteMetadata, entries: &[FeedEntry]) -> Channel {
    ChannelBuilder::default()
        .title(site.title.clone())
        .link(site.url.clone())
        .description(site.description.clone())
        .items(entries.iter().map(rss_item).collect::<Vec<_>>())
        .build()
}

pub(crate) fn atom_feed(site: &SiteMetadata, entries: &[FeedEntry]) -> Feed {
    // entries are newest first
    let updated = entries
        .first()
        .map(|e| midnight_utc(e.date))
        .unwrap_or_else(|| DateTime::<Utc>::UNIX_EPOCH.fixed_offset());

    let atom_entries: Vec<_> = entries
        .iter()
        .map(|e| {
            let published = midnight_utc(e.date);
            EntryBuilder::default()
                .title(e.title.as_str())
                .id(e.guid.clone())
                .updated(published)
                .published(Some(published))
                .links(vec![LinkBuilder::default()
                    .href(e.url.clone())
                    .rel("alternate")
                    .build()])
                .summary(Some(Text::from(e.description.as_str())))
                .content(Some(
                    ContentBuilder::default()
                        .value(Some(e.content.clone()))
                        .content_type(Some("html".to_string()))
                        .build(),
                ))
                .build()
        })
        .collect();

    FeedBuilder::default()
        .title(site.title.as_str())
        .id(format!("{}/", site.url))
        .updated(updated)
        .subtitle(Some(Text::from(site.description.as_str())))
        .links(vec![
            LinkBuilder::default()
                .href(format!("{}/", site.url))
                .rel("alternate")
                .build(),
            LinkBuilder::default()
                .href(site.absolute(&format!("/{ATOM_PATH}")))
                .rel("self")
                .build(),
        ])
        .entries(atom_entries)
        .build()
}
