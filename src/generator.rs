use std::path::PathBuf;

use anyhow::Context as _;
use handlebars::Handlebars;
use log::{info, warn};

use crate::{
    context::Context,
    document::{Collection, Document},
    error::LoadErrors,
    feed::{self, ATOM_PATH, RSS_PATH},
    index::TagIndex,
    listing::{self, route_to_file, DISPLAY_DATE_FORMAT},
    loader,
    renderer::{generate_renderer, render_tag_menu},
};

use self::data::{AboutPageData, ArticlePageData, ListPageData};

mod data;
mod utils;

/// What a finished build produced.
#[derive(Debug, Default)]
pub(crate) struct BuildReport {
    pub documents: usize,
    pub tags: usize,
    /// Every written file, in write order.
    pub written: Vec<PathBuf>,
    pub warnings: Vec<String>,
}

struct PageWriter<'a> {
    ctx: &'a Context,
    handlebars: Handlebars<'static>,
    written: Vec<PathBuf>,
}

impl PageWriter<'_> {
    fn render<T: serde::Serialize>(
        &mut self,
        template: &str,
        route: &str,
        data: &T,
    ) -> anyhow::Result<()> {
        let path = route_to_file(&self.ctx.out_dir, route);
        let fd = utils::create_output(&path)?;
        self.handlebars
            .render_to_write(template, data, fd)
            .with_context(|| format!("while generating {route}"))?;
        self.written.push(path);
        Ok(())
    }

    fn write(&mut self, name: &str, contents: &str) -> anyhow::Result<()> {
        let path = self.ctx.out_dir.join(name);
        std::fs::write(&path, contents).with_context(|| format!("while writing {path:?}"))?;
        self.written.push(path);
        Ok(())
    }

    fn article(&mut self, doc: &Document) -> anyhow::Result<()> {
        let ctx = self.ctx;
        let data = ArticlePageData {
            site: &ctx.site,
            title: &doc.title,
            display_date: doc.date.format(DISPLAY_DATE_FORMAT).to_string(),
            tags: &doc.tags,
            body: &doc.body_html,
        };
        self.render("post", &doc.path, &data)
            .with_context(|| format!("from {:?}", doc.source))
    }
}

/// Runs one full build: load, index, write pages and feeds.
pub(crate) fn generate(ctx: &Context) -> anyhow::Result<BuildReport> {
    let collection = loader::load(&ctx.article_dir, ctx.allow_partial)?;
    if collection.is_empty() {
        warn!("no documents found in {:?}", ctx.article_dir);
    }
    let index = TagIndex::build(&collection);

    let mut report = BuildReport {
        documents: collection.len(),
        tags: index.len(),
        ..Default::default()
    };

    let collisions = index.collisions();
    if ctx.strict_tags && !collisions.is_empty() {
        return Err(LoadErrors(collisions).into());
    }
    for collision in collisions {
        warn!("{collision}; the last label alphabetically owns the page");
        report.warnings.push(collision.to_string());
    }

    utils::prepare_out_dir(&ctx.out_dir, &ctx.public_dir)?;
    let mut writer = PageWriter {
        ctx,
        handlebars: generate_renderer(&ctx.template_dir)?,
        written: vec![],
    };

    write_pages(&mut writer, &collection, &index)?;
    write_feeds(&mut writer, &collection)?;

    report.written = writer.written;
    info!(
        "built {} document(s), {} tag(s), {} file(s)",
        report.documents,
        report.tags,
        report.written.len()
    );
    Ok(report)
}

fn write_pages(
    writer: &mut PageWriter,
    collection: &Collection,
    index: &TagIndex,
) -> anyhow::Result<()> {
    let ctx = writer.ctx;
    let site = &ctx.site;

    for doc in collection.all() {
        writer.article(doc)?;
    }

    let home = listing::home_listing(collection);
    let data = ListPageData {
        site,
        title: &home.title,
        listing: &home,
        tag_menu: render_tag_menu(index, None),
    };
    writer.render("index", &home.route, &data)?;

    // alphabetical, so a colliding slug ends up with the last label
    for group in index.groups() {
        let tag = listing::tag_listing(index, &group.label);
        let data = ListPageData {
            site,
            title: &tag.title,
            listing: &tag,
            tag_menu: render_tag_menu(index, Some(&group.label)),
        };
        writer.render("tag", &tag.route, &data)?;
    }

    let about = AboutPageData {
        site,
        title: "About",
    };
    writer.render("about", "/about/", &about)?;

    Ok(())
}

fn write_feeds(writer: &mut PageWriter, collection: &Collection) -> anyhow::Result<()> {
    let ctx = writer.ctx;
    let site = &ctx.site;
    let entries = feed::feed_entries(site, collection);

    let rss = feed::rss_channel(site, &entries).to_string();
    let atom = feed::atom_feed(site, &entries).to_string();
    writer.write(RSS_PATH, &rss)?;
    writer.write(ATOM_PATH, &atom)?;
    Ok(())
}
