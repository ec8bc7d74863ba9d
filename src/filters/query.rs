//! Sanitized list request derived from raw search params.

use crate::domain::resource::Resource;
use crate::domain::types::PageNumber;
use crate::filters::{FilterState, PAGE_KEY};

/// Page plus recognized filters for one list call.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ListQuery {
    pub page: PageNumber,
    pub per_page: Option<u32>,
    pub filters: FilterState,
}

impl ListQuery {
    /// Coerces `page` and keeps only the keys accepted by `recognized`.
    pub fn sanitize(params: &FilterState, recognized: impl Fn(&str) -> bool) -> Self {
        let page = PageNumber::coerce(params.first(PAGE_KEY));
        let mut filters = params.clone();
        filters.retain(|key| key != PAGE_KEY && recognized(key));

        Self {
            page,
            per_page: None,
            filters,
        }
    }

    /// Sanitizes `params` against the filters recognized by `R`.
    pub fn for_resource<R: Resource>(params: &FilterState) -> Self {
        Self::sanitize(params, R::recognizes)
    }

    pub fn per_page(mut self, per_page: u32) -> Self {
        self.per_page = Some(per_page);
        self
    }

    pub fn page(mut self, page: PageNumber) -> Self {
        self.page = page;
        self
    }

    /// Query pairs sent to the remote API. `page` is always present.
    pub fn to_pairs(&self) -> Vec<(String, String)> {
        let mut pairs: Vec<(String, String)> = self
            .filters
            .to_pairs()
            .into_iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        pairs.push((PAGE_KEY.to_string(), self.page.to_string()));
        if let Some(per_page) = self.per_page {
            pairs.push(("per_page".to_string(), per_page.to_string()));
        }
        pairs
    }
}
