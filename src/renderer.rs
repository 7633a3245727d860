use std::path::Path;

use anyhow::Context;
use handlebars::{handlebars_helper, Handlebars};
use maud::html;

use crate::{index::TagIndex, listing::tag_route};

handlebars_helper!(tag_href: |label: str| tag_route(label));

pub(crate) const TEMPLATES: [&str; 4] = ["index", "tag", "post", "about"];

pub(crate) fn generate_renderer(template_dir: &Path) -> anyhow::Result<Handlebars<'static>> {
    let mut handlebars = Handlebars::new();
    handlebars.register_helper("tag_href", Box::new(tag_href));
    for name in TEMPLATES {
        let file = format!("{name}.hbs");
        handlebars
            .register_template_file(name, template_dir.join(&file))
            .context(file)?;
    }
    handlebars.register_partial(
        "layout",
        std::fs::read_to_string(template_dir.join("layout.hbs")).context("layout.hbs")?,
    )?;

    Ok(handlebars)
}

/// Sidebar listing every tag with its count.
pub(crate) fn render_tag_menu(index: &TagIndex, selected: Option<&str>) -> String {
    html! {
        div.tag-menu {
            h1 { "Topics" }
            ul.tags {
                @for group in index.groups() {
                    @let is_selected = selected == Some(group.label.as_str());
                    li {
                        a.selected[is_selected] href=(tag_route(&group.label)) {
                            (group.label) " (" (group.count()) ")"
                        }
                    }
                }
            }
        }
    }
    .into_string()
}
