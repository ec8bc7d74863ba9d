//! Page links for listing tables.

use serde::Serialize;

use crate::api::envelope::PaginationDescriptor;
use crate::filters::{FilterState, PAGE_KEY};

pub const DEFAULT_ITEMS_PER_PAGE: u32 = 15;

fn get_pages(
    total_pages: u32,
    current_page: u32,
    left_edge: u32,
    left_current: u32,
    right_current: u32,
    right_edge: u32,
) -> Vec<Option<u32>> {
    let last_page = total_pages;

    if last_page == 0 {
        return vec![];
    }

    let mut pages = Vec::new();

    let left_end = left_edge.saturating_add(1).min(last_page.saturating_add(1));
    pages.extend((1..left_end).map(Some));

    let mid_start = left_end.max(current_page.saturating_sub(left_current));
    let mid_end = current_page
        .saturating_add(right_current)
        .saturating_add(1)
        .min(last_page.saturating_add(1));

    if mid_start > left_end {
        pages.push(None);
    }
    pages.extend((mid_start..mid_end).map(Some));

    let right_start = mid_end.max(last_page.saturating_sub(right_edge).saturating_add(1));

    if right_start > mid_end {
        pages.push(None);
    }
    pages.extend((right_start..=last_page).map(Some));

    pages
}

/// One entry of the rendered page list; `None` values render as a gap.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PageLink {
    pub number: Option<u32>,
    pub url: Option<String>,
    pub current: bool,
}

/// Page links derived from a [`PaginationDescriptor`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PaginationControl {
    pub descriptor: PaginationDescriptor,
    pub links: Vec<PageLink>,
    pub previous: Option<String>,
    pub next: Option<String>,
}

impl PaginationControl {
    /// Builds links for `path`; each link changes only the page parameter of
    /// `query`. The control is inert when there is a single page.
    pub fn new(descriptor: PaginationDescriptor, path: &str, query: &FilterState) -> Self {
        if descriptor.last_page <= 1 {
            return Self {
                descriptor,
                links: Vec::new(),
                previous: None,
                next: None,
            };
        }

        let current = descriptor.current();
        let link_to = |page: u32| page_url(path, query, page);

        let links = get_pages(descriptor.last_page, current, 2, 2, 4, 2)
            .into_iter()
            .map(|number| PageLink {
                url: number.map(link_to),
                current: number == Some(current),
                number,
            })
            .collect();

        let previous = (current > 1).then(|| link_to(current - 1));
        let next = (current < descriptor.last_page).then(|| link_to(current + 1));

        Self {
            descriptor,
            links,
            previous,
            next,
        }
    }

    pub fn is_inert(&self) -> bool {
        self.links.is_empty()
    }
}

fn page_url(path: &str, query: &FilterState, page: u32) -> String {
    if page <= 1 {
        query.without(PAGE_KEY).to_url(path)
    } else {
        query.with(PAGE_KEY, page.to_string()).to_url(path)
    }
}
