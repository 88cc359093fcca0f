// Client-side pagination, sorting and filtering of fetched collections

pub mod filter;


use crate::entity::Entity;
use serde::{Deserialize, Serialize};

/// Sort direction for a table column
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

/// Column sort instruction
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SortSpec {
    pub key: String,
    pub direction: SortDirection,
}

impl SortSpec {
    pub fn asc(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            direction: SortDirection::Asc,
        }
    }

    pub fn desc(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            direction: SortDirection::Desc,
        }
    }
}

/// One page request against an in-memory collection
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PageRequest {
    /// 1-based page index (0 is treated as 1)
    pub page: usize,
    /// Rows per page (0 is treated as 1)
    pub page_size: usize,
    pub sort: Option<SortSpec>,
    pub filter: Option<String>,
}

impl PageRequest {
    /// Normalized `(page, page_size)`
    fn normalize(&self) -> (usize, usize) {
        (self.page.max(1), self.page_size.max(1))
    }
}

/// Projection of a collection for the table view
#[derive(Clone, Debug, PartialEq)]
pub struct PageResult {
    pub items: Vec<Entity>,
    /// Size of the filtered set, not of the whole collection
    pub total_matching: usize,
    pub page: usize,
    pub page_size: usize,
}

impl PageResult {
    pub fn page_count(&self) -> usize {
        self.total_matching.div_ceil(self.page_size.max(1))
    }
}

/// Filter, then stable-sort, then slice
///
/// Without a sort the filtered order is kept. Pages past the end are empty
/// but still report `total_matching`.
pub fn project(items: &[Entity], request: &PageRequest) -> PageResult {
    let (page, page_size) = request.normalize();

    let mut matching = filter::apply_filter(items, request.filter.as_deref());

    if let Some(sort) = &request.sort {
        // slice::sort_by is stable: equal keys keep their filtered order
        matching.sort_by(|a, b| {
            let ord = filter::compare_values(a.get(&sort.key), b.get(&sort.key));
            match sort.direction {
                SortDirection::Asc => ord,
                SortDirection::Desc => ord.reverse(),
            }
        });
    }

    let total_matching = matching.len();
    let items = matching
        .into_iter()
        .skip((page - 1).saturating_mul(page_size))
        .take(page_size)
        .cloned()
        .collect();

    PageResult {
        items,
        total_matching,
        page,
        page_size,
    }
}

/// Table controls bound to a list view (page, page size, sort, filter text)
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TableParams {
    page: usize,
    page_size: usize,
    sort: Option<SortSpec>,
    filter: String,
}

impl TableParams {
    /// First page, `page_size` rows, ascending on `sort_key`
    pub fn new(page_size: usize, sort_key: &str) -> Self {
        Self {
            page: 1,
            page_size: page_size.max(1),
            sort: Some(SortSpec::asc(sort_key)),
            filter: String::new(),
        }
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn sort(&self) -> Option<&SortSpec> {
        self.sort.as_ref()
    }

    pub fn filter(&self) -> &str {
        &self.filter
    }

    pub fn set_page(&mut self, page: usize) {
        self.page = page.max(1);
    }

    /// Changing the page size returns to the first page
    pub fn set_page_size(&mut self, page_size: usize) {
        self.page_size = page_size.max(1);
        self.page = 1;
    }

    pub fn set_sort(&mut self, sort: Option<SortSpec>) {
        self.sort = sort;
    }

    /// Changing the filter text returns to the first page
    pub fn set_filter(&mut self, filter: impl Into<String>) {
        let filter = filter.into();
        if filter != self.filter {
            self.filter = filter;
            self.page = 1;
        }
    }

    pub fn request(&self) -> PageRequest {
        PageRequest {
            page: self.page,
            page_size: self.page_size,
            sort: self.sort.clone(),
            filter: (!self.filter.is_empty()).then(|| self.filter.clone()),
        }
    }
}

impl Default for TableParams {
    fn default() -> Self {
        Self::new(10, "name")
    }
}
