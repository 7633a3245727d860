use std::{
    collections::{HashSet, VecDeque},
    path::{Path, PathBuf},
    sync::LazyLock,
};

use chrono::{DateTime, NaiveDate};
use log::{debug, info, warn};
use pulldown_cmark::{html, Event, Options, Parser, TagEnd};
use regex::{Regex, RegexBuilder};
use serde::Deserialize;

use crate::{
    document::{Collection, Document},
    error::{DocumentError, LoadErrors},
    index::slugify,
    listing::route_to_file,
};

const EXCERPT_LENGTH: usize = 250;

static FRONTMATTER: LazyLock<Regex> = LazyLock::new(|| {
    RegexBuilder::new(r"\A---[ \t]*\r?\n(.*?)^---[ \t]*(?:\r?\n|\z)(.*)")
        .dot_matches_new_line(true)
        .multi_line(true)
        .build()
        .unwrap()
});

#[derive(Deserialize, Debug, Default)]
struct FrontMatter {
    title: Option<String>,
    date: Option<String>,
    #[serde(rename = "abstract")]
    abstract_text: Option<String>,
    tags: Option<TagList>,
    path: Option<String>,
}

/// `tags: [a, b]` or `tags: a, b`
#[derive(Deserialize, Debug)]
#[serde(untagged)]
enum TagList {
    List(Vec<String>),
    Joined(String),
}

impl TagList {
    fn labels(self) -> Vec<String> {
        let raw = match self {
            TagList::List(v) => v,
            TagList::Joined(s) => s.split(',').map(|s| s.to_string()).collect(),
        };
        let mut seen = HashSet::new();
        raw.into_iter()
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .filter(|t| seen.insert(t.clone()))
            .collect()
    }
}

fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(value).ok().map(|d| d.date_naive()))
}

/// `posts/hello.md` becomes `/posts/hello/`.
fn derive_path(source: &Path) -> String {
    let stem = source.with_extension("");
    let parts: Vec<_> = stem
        .components()
        .map(|c| c.as_os_str().to_string_lossy().to_string())
        .collect();
    format!("/{}/", parts.join("/"))
}

fn normalize_path(path: &str) -> String {
    let path = path.trim();
    if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{path}")
    }
}

/// Routes whose output file belongs to a generated page.
fn is_reserved(path: &str) -> bool {
    let file = route_to_file(Path::new(""), path);
    file == Path::new("index.html")
        || file == Path::new("about/index.html")
        || file.starts_with("tags")
        || file == Path::new(crate::feed::RSS_PATH)
        || file == Path::new(crate::feed::ATOM_PATH)
}

/// `.` and `..` segments would move the page outside the output directory.
fn has_relative_segment(path: &str) -> bool {
    path.split('/').any(|seg| seg == "." || seg == "..")
}

pub(crate) fn render_markdown(body: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_FOOTNOTES);

    let parser = Parser::new_ext(body, options).map(|event| match event {
        Event::SoftBreak => Event::HardBreak,
        _ => event,
    });

    let mut body_html = String::new();
    html::push_html(&mut body_html, parser);
    body_html
}

/// Plain text of the body, pruned at a word boundary.
pub(crate) fn excerpt(body: &str) -> String {
    let mut text = String::new();
    for event in Parser::new(body) {
        match event {
            Event::Text(t) | Event::Code(t) => text.push_str(&t),
            Event::SoftBreak
            | Event::HardBreak
            | Event::End(TagEnd::Paragraph)
            | Event::End(TagEnd::Heading(_))
            | Event::End(TagEnd::Item) => text.push(' '),
            _ => {}
        }
    }
    let text = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if text.chars().count() <= EXCERPT_LENGTH {
        return text;
    }

    let cut: String = text.chars().take(EXCERPT_LENGTH).collect();
    let pruned = match cut.rfind(' ') {
        Some(i) => &cut[..i],
        None => cut.as_str(),
    };
    format!("{}…", pruned.trim_end())
}

/// `source` is relative to the article directory and only used for routes
/// and error reports.
pub(crate) fn parse_document(source: &Path, content: &str) -> Result<Document, DocumentError> {
    let (front, body) = match FRONTMATTER.captures(content) {
        Some(caps) => {
            let header = caps.get(1).map_or("", |m| m.as_str());
            let front: FrontMatter = if header.trim().is_empty() {
                FrontMatter::default()
            } else {
                serde_yaml_ng::from_str(header).map_err(|e| {
                    DocumentError::malformed(source, format!("invalid frontmatter: {e}"))
                })?
            };
            (front, caps.get(2).map_or("", |m| m.as_str()))
        }
        None => (FrontMatter::default(), content),
    };

    let date = match front.date.as_deref() {
        Some(raw) => parse_date(raw)
            .ok_or_else(|| DocumentError::malformed(source, format!("invalid date {raw:?}")))?,
        None => return Err(DocumentError::malformed(source, "missing date")),
    };

    let tags = front.tags.map(TagList::labels).unwrap_or_default();
    if let Some(bad) = tags.iter().find(|t| slugify(t).is_empty()) {
        return Err(DocumentError::malformed(
            source,
            format!("tag {bad:?} has no letters or digits"),
        ));
    }

    let path = match front.path.as_deref() {
        Some(p) if !p.trim().is_empty() => normalize_path(p),
        _ => derive_path(source),
    };
    if has_relative_segment(&path) {
        return Err(DocumentError::malformed(
            source,
            format!("path {path:?} must not contain . or .. segments"),
        ));
    }
    if is_reserved(&path) {
        return Err(DocumentError::malformed(
            source,
            format!("path {path:?} is reserved for generated pages"),
        ));
    }

    Ok(Document {
        path,
        title: front.title.unwrap_or_default().trim().to_string(),
        date,
        abstract_text: front.abstract_text.unwrap_or_default().trim().to_string(),
        tags,
        body_html: render_markdown(body),
        excerpt: excerpt(body),
        source: source.to_path_buf(),
    })
}

/// Every `.md` file under `article_dir`, breadth-first, sorted per directory.
fn discover(article_dir: &Path, errors: &mut Vec<DocumentError>) -> Vec<PathBuf> {
    let mut files = vec![];
    let mut q = VecDeque::new();
    q.push_back(PathBuf::new());
    while let Some(path) = q.pop_front() {
        let dir = article_dir.join(&path);
        let entries = match std::fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(source) => {
                errors.push(DocumentError::Io { file: dir, source });
                continue;
            }
        };
        let mut entries: Vec<_> = entries.filter_map(Result::ok).collect();
        entries.sort_by_key(|e| e.file_name());

        for entry in entries {
            let relative = path.join(entry.file_name());
            let file_type = match entry.file_type() {
                Ok(t) => t,
                Err(source) => {
                    errors.push(DocumentError::Io {
                        file: relative,
                        source,
                    });
                    continue;
                }
            };
            if file_type.is_dir() {
                q.push_back(relative);
            } else if relative.extension().is_some_and(|ext| ext == "md") {
                files.push(relative);
            } else {
                debug!("ignoring {relative:?}");
            }
        }
    }
    files
}

/// Load every document under `article_dir`.
///
/// All failures are collected before returning. With `allow_partial`,
/// malformed documents are skipped with a warning; duplicate paths still fail.
pub(crate) fn load(article_dir: &Path, allow_partial: bool) -> Result<Collection, LoadErrors> {
    let mut errors = vec![];
    let files = discover(article_dir, &mut errors);

    let mut documents = vec![];
    for file in files {
        let parsed = std::fs::read_to_string(article_dir.join(&file))
            .map_err(|source| DocumentError::Io {
                file: file.clone(),
                source,
            })
            .and_then(|content| parse_document(&file, &content));
        match parsed {
            Ok(doc) => documents.push(doc),
            Err(e) => errors.push(e),
        }
    }

    if !errors.is_empty() {
        if !allow_partial {
            return Err(LoadErrors(errors));
        }
        for e in errors.iter() {
            warn!("skipping: {e}");
        }
    }

    info!("loaded {} document(s)", documents.len());
    Collection::new(documents)
}
