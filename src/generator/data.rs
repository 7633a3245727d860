use serde::Serialize;

use crate::{context::SiteMetadata, listing::Listing};

#[derive(Serialize, Debug)]
pub(super) struct ArticlePageData<'a> {
    pub site: &'a SiteMetadata,
    pub title: &'a str,
    pub display_date: String,
    pub tags: &'a [String],
    pub body: &'a str,
}

#[derive(Serialize, Debug)]
pub(super) struct ListPageData<'a> {
    pub site: &'a SiteMetadata,
    pub title: &'a str,
    pub listing: &'a Listing,
    pub tag_menu: String,
}

#[derive(Serialize, Debug)]
pub(super) struct AboutPageData<'a> {
    pub site: &'a SiteMetadata,
    pub title: &'static str,
}
