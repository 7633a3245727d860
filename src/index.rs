use std::collections::{BTreeMap, BTreeSet};

use log::debug;

use crate::{
    document::{Collection, Document},
    error::DocumentError,
};

/// Kebab-case slug for a tag label.
///
/// Words are split on every non-alphanumeric character and at lower-to-upper
/// and letter/digit boundaries, then lowercased and joined with `-`.
/// `"C++"` and `"c  "` both become `"c"`.
pub(crate) fn slugify(label: &str) -> String {
    let mut words: Vec<String> = vec![];
    let mut current = String::new();
    let mut prev: Option<char> = None;

    for c in label.chars() {
        if !c.is_alphanumeric() {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            prev = None;
            continue;
        }
        if let Some(p) = prev {
            let camel = p.is_lowercase() && c.is_uppercase();
            let digit_edge = p.is_numeric() != c.is_numeric();
            if (camel || digit_edge) && !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
        }
        current.extend(c.to_lowercase());
        prev = Some(c);
    }
    if !current.is_empty() {
        words.push(current);
    }

    words.join("-")
}

#[derive(Debug)]
pub(crate) struct TagGroup<'a> {
    pub label: String,
    pub slug: String,
    /// Newest first.
    pub documents: Vec<&'a Document>,
}

impl TagGroup<'_> {
    pub fn count(&self) -> usize {
        self.documents.len()
    }
}

/// Tag label to group, iterated in alphabetical order of label.
#[derive(Debug, Default)]
pub(crate) struct TagIndex<'a> {
    groups: BTreeMap<String, TagGroup<'a>>,
}

impl<'a> TagIndex<'a> {
    pub fn build(collection: &'a Collection) -> Self {
        let labels: BTreeSet<&str> = collection
            .all()
            .iter()
            .flat_map(|d| d.tags.iter().map(String::as_str))
            .collect();

        // collection order is newest first, so every group inherits it
        let groups: BTreeMap<_, _> = labels
            .into_iter()
            .map(|label| {
                let group = TagGroup {
                    label: label.to_string(),
                    slug: slugify(label),
                    documents: collection.tagged(label).collect(),
                };
                (label.to_string(), group)
            })
            .collect();
        debug!("indexed {} tag(s)", groups.len());

        Self { groups }
    }

    pub fn get(&self, label: &str) -> Option<&TagGroup<'a>> {
        self.groups.get(label)
    }

    pub fn groups(&self) -> impl Iterator<Item = &TagGroup<'a>> {
        self.groups.values()
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Slugs shared by more than one label. Labels are listed alphabetically.
    pub fn collisions(&self) -> Vec<DocumentError> {
        let mut by_slug: BTreeMap<&str, Vec<String>> = BTreeMap::new();
        for group in self.groups.values() {
            by_slug
                .entry(group.slug.as_str())
                .or_default()
                .push(group.label.clone());
        }
        by_slug
            .into_iter()
            .filter(|(_, labels)| labels.len() > 1)
            .map(|(slug, labels)| DocumentError::TagSlugCollision {
                slug: slug.to_string(),
                labels,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::sample;

    fn scenario() -> Collection {
        Collection::new(vec![
            sample("A", "2024-01-01", &["go"], "/a"),
            sample("B", "2024-02-01", &["go", "rust"], "/b"),
        ])
        .unwrap()
    }

    #[test]
    fn counts_per_tag() {
        let c = scenario();
        let index = TagIndex::build(&c);
        assert_eq!(index.len(), 2);
        assert_eq!(index.get("go").unwrap().count(), 2);
        assert_eq!(index.get("rust").unwrap().count(), 1);
        assert!(index.get("python").is_none());
    }

    #[test]
    fn count_matches_documents_carrying_tag() {
        let c = Collection::new(vec![
            sample("A", "2024-01-01", &["x", "y"], "/a"),
            sample("B", "2024-01-02", &["y"], "/b"),
            sample("C", "2024-01-03", &["x", "y", "z"], "/c"),
            sample("D", "2024-01-04", &[], "/d"),
        ])
        .unwrap();
        let index = TagIndex::build(&c);
        for group in index.groups() {
            assert_eq!(group.count(), c.tagged(&group.label).count());
        }
    }

    #[test]
    fn groups_are_sorted_newest_first() {
        let c = scenario();
        let index = TagIndex::build(&c);
        let titles: Vec<_> = index
            .get("go")
            .unwrap()
            .documents
            .iter()
            .map(|d| d.title.as_str())
            .collect();
        assert_eq!(titles, ["B", "A"]);
    }

    #[test]
    fn groups_iterate_alphabetically() {
        let c = Collection::new(vec![sample("A", "2024-01-01", &["zig", "ada", "go"], "/a")])
            .unwrap();
        let index = TagIndex::build(&c);
        let labels: Vec<_> = index.groups().map(|g| g.label.as_str()).collect();
        assert_eq!(labels, ["ada", "go", "zig"]);
    }

    #[test]
    fn untagged_documents_join_no_group() {
        let c = Collection::new(vec![sample("A", "2024-01-01", &[], "/a")]).unwrap();
        let index = TagIndex::build(&c);
        assert_eq!(index.len(), 0);
        assert!(index.collisions().is_empty());
    }

    #[test]
    fn slug_normalization() {
        assert_eq!(slugify("C++"), "c");
        assert_eq!(slugify("c  "), "c");
        assert_eq!(slugify("Hello World"), "hello-world");
        assert_eq!(slugify("fooBar"), "foo-bar");
        assert_eq!(slugify("  Rust / WebAssembly "), "rust-web-assembly");
        assert_eq!(slugify("es2015"), "es-2015");
        assert_eq!(slugify("GraphQL"), "graph-ql");
        assert_eq!(slugify("node.js"), "node-js");
        assert_eq!(slugify("+++"), "");
    }

    #[test]
    fn colliding_slugs_are_reported() {
        let c = Collection::new(vec![
            sample("A", "2024-01-01", &["C++", "rust"], "/a"),
            sample("B", "2024-01-02", &["c  "], "/b"),
        ])
        .unwrap();
        let index = TagIndex::build(&c);
        let collisions = index.collisions();
        assert_eq!(collisions.len(), 1);
        match &collisions[0] {
            DocumentError::TagSlugCollision { slug, labels } => {
                assert_eq!(slug, "c");
                assert_eq!(labels, &["C++".to_string(), "c  ".to_string()]);
            }
            other => panic!("unexpected {other:?}"),
        }
    }
}
