use std::{
    cmp::Ordering,
    collections::{hash_map::Entry, HashMap},
    path::{Path, PathBuf},
};

use chrono::NaiveDate;

use crate::{
    error::{DocumentError, LoadErrors},
    listing::route_to_file,
};

/// One markdown source after loading. Never mutated once built.
#[derive(Debug, Clone)]
pub(crate) struct Document {
    /// Route of the detail page, always starting with `/`.
    pub path: String,
    pub title: String,
    pub date: NaiveDate,
    pub abstract_text: String,
    pub tags: Vec<String>,
    pub body_html: String,
    pub excerpt: String,

    /// Source file relative to the article directory.
    pub source: PathBuf,
}

impl Document {
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}

/// Ordering shared by every listing and the feeds: newest first.
/// Ties fall back to title, then path, so output never depends on load order.
pub(crate) fn sort_article(a: &Document, b: &Document) -> Ordering {
    b.date
        .cmp(&a.date)
        .then_with(|| a.title.cmp(&b.title))
        .then_with(|| a.path.cmp(&b.path))
}

/// The loaded documents, sorted once with [`sort_article`].
#[derive(Debug, Default)]
pub(crate) struct Collection {
    documents: Vec<Document>,
}

impl Collection {
    /// Fails when two documents would be written to the same output file,
    /// so `/post` and `/post/` count as duplicates.
    pub fn new(mut documents: Vec<Document>) -> Result<Self, LoadErrors> {
        let mut seen: HashMap<PathBuf, &PathBuf> = HashMap::new();
        let mut errors = vec![];
        for doc in documents.iter() {
            match seen.entry(route_to_file(Path::new(""), &doc.path)) {
                Entry::Occupied(first) => errors.push(DocumentError::DuplicatePath {
                    path: doc.path.clone(),
                    first: (*first.get()).clone(),
                    second: doc.source.clone(),
                }),
                Entry::Vacant(slot) => {
                    slot.insert(&doc.source);
                }
            }
        }
        if !errors.is_empty() {
            return Err(LoadErrors(errors));
        }

        documents.sort_by(sort_article);
        Ok(Self { documents })
    }

    pub fn all(&self) -> &[Document] {
        &self.documents
    }

    pub fn tagged<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a Document> + 'a {
        self.documents.iter().filter(move |d| d.has_tag(tag))
    }

    pub fn get(&self, path: &str) -> Option<&Document> {
        self.documents.iter().find(|d| d.path == path)
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

#[cfg(test)]
pub(crate) fn sample(title: &str, date: &str, tags: &[&str], path: &str) -> Document {
    Document {
        path: path.to_string(),
        title: title.to_string(),
        date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
        abstract_text: format!("about {title}"),
        tags: tags.iter().map(|t| t.to_string()).collect(),
        body_html: format!("<p>{title} body</p>\n"),
        excerpt: format!("{title} body"),
        source: PathBuf::from(format!("{}.md", path.trim_matches('/'))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collection_is_sorted_newest_first() {
        let c = Collection::new(vec![
            sample("A", "2024-01-01", &["go"], "/a"),
            sample("B", "2024-02-01", &["go", "rust"], "/b"),
            sample("C", "2023-12-31", &[], "/c"),
        ])
        .unwrap();
        let titles: Vec<_> = c.all().iter().map(|d| d.title.as_str()).collect();
        assert_eq!(titles, ["B", "A", "C"]);
        assert_eq!(c.len(), 3);
    }

    #[test]
    fn get_finds_by_path() {
        let c = Collection::new(vec![
            sample("A", "2024-01-01", &[], "/a"),
            sample("B", "2024-02-01", &[], "/b/"),
        ])
        .unwrap();
        assert_eq!(c.get("/a").map(|d| d.title.as_str()), Some("A"));
        assert_eq!(c.get("/b/").map(|d| d.title.as_str()), Some("B"));
        assert!(c.get("/missing").is_none());
    }

    #[test]
    fn same_date_breaks_ties_by_title() {
        let c = Collection::new(vec![
            sample("zeta", "2024-01-01", &[], "/z"),
            sample("alpha", "2024-01-01", &[], "/a"),
        ])
        .unwrap();
        assert_eq!(c.all()[0].title, "alpha");
    }

    #[test]
    fn tagged_filters_by_label() {
        let c = Collection::new(vec![
            sample("A", "2024-01-01", &["go"], "/a"),
            sample("B", "2024-02-01", &["go", "rust"], "/b"),
        ])
        .unwrap();
        let rust: Vec<_> = c.tagged("rust").map(|d| d.title.as_str()).collect();
        assert_eq!(rust, ["B"]);
        assert_eq!(c.tagged("python").count(), 0);
    }

    #[test]
    fn duplicate_paths_are_rejected() {
        let mut second = sample("B", "2024-02-01", &[], "/same");
        second.source = PathBuf::from("other.md");
        let err = Collection::new(vec![sample("A", "2024-01-01", &[], "/same"), second])
            .unwrap_err();
        assert_eq!(err.0.len(), 1);
        assert!(matches!(
            &err.0[0],
            DocumentError::DuplicatePath { path, second, .. }
                if path == "/same" && second == &PathBuf::from("other.md")
        ));
    }

    #[test]
    fn same_output_file_is_a_duplicate() {
        let mut second = sample("B", "2024-02-01", &[], "/same/");
        second.source = PathBuf::from("other.md");
        let mut third = sample("C", "2024-03-01", &[], "/same/index.html");
        third.source = PathBuf::from("third.md");
        let err = Collection::new(vec![sample("A", "2024-01-01", &[], "/same"), second, third])
            .unwrap_err();
        assert_eq!(err.0.len(), 2);
        assert!(err
            .0
            .iter()
            .all(|e| matches!(e, DocumentError::DuplicatePath { .. })));
    }

    #[test]
    fn empty_collection() {
        let c = Collection::new(vec![]).unwrap();
        assert!(c.is_empty());
        assert!(c.all().is_empty());
    }
}
