//! Filter, sort, and paginate composition over in-memory mapping rows.
//!
//! [`TableQuery`] is plain state owned by the caller. Mutating it follows the
//! table header rules (changing filters returns to the first page, clicking the
//! sorted column again flips its direction) and [`TableQuery::evaluate`] turns
//! it into the slice of rows to show. Records are only borrowed, never reordered
//! in place.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::{
    columns::ColumnAccessor,
    filter::{FilterPredicate, FilterSet},
    paginate::{PageSlot, PageWindow, page_numbers},
    sort::{SortDirective, SortKey},
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableQuery {
    filters: FilterSet,
    sort: Option<SortKey>,
    page: usize,
}

impl Default for TableQuery {
    fn default() -> Self {
        TableQuery {
            filters: FilterSet::default(),
            sort: None,
            page: 1,
        }
    }
}

impl TableQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn filters(&self) -> &FilterSet {
        &self.filters
    }

    pub fn sort(&self) -> Option<&SortKey> {
        self.sort.as_ref()
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn apply_filter(&mut self, predicate: FilterPredicate) {
        self.filters.apply(predicate);
        self.page = 1;
    }

    pub fn clear_filter(&mut self, column: &str) {
        self.filters.clear(column);
        self.page = 1;
    }

    pub fn clear_all_filters(&mut self) {
        self.filters.clear_all();
        self.page = 1;
    }

    /// Header-click semantics: same column flips direction, any other column sorts ascending.
    pub fn set_sort(&mut self, column: &str) {
        self.sort = Some(match self.sort.take() {
            Some(current) if current.column == column => SortKey {
                direction: current.direction.flipped(),
                ..current
            },
            _ => SortKey::asc(column),
        });
    }

    pub fn set_sort_key(&mut self, key: SortKey) {
        self.sort = Some(key);
    }

    pub fn apply_sort_directive(&mut self, directive: &SortDirective) {
        match directive.direction {
            Some(direction) => self.set_sort_key(SortKey {
                column: directive.column.clone(),
                direction,
            }),
            None => self.set_sort(&directive.column),
        }
    }

    pub fn clear_sort(&mut self) {
        self.sort = None;
    }

    /// Selects a 1-based page. Out-of-range pages are clamped when evaluated.
    pub fn set_page(&mut self, page: usize) {
        self.page = page.max(1);
    }

    /// Filters, then sorts, then slices `records` for the current page.
    pub fn evaluate<'a, R, A>(
        &self,
        records: &'a [R],
        accessor: &A,
        page_size: usize,
    ) -> QueryPage<'a, R>
    where
        A: ColumnAccessor<R> + ?Sized,
    {
        let mut matched: Vec<&'a R> = records
            .iter()
            .filter(|record| {
                self.filters
                    .matches_all(|column| accessor.column_value(*record, column))
            })
            .collect();

        if let Some(key) = &self.sort {
            let mut keyed = matched
                .into_iter()
                .map(|record| (accessor.column_value(record, &key.column), record))
                .collect::<Vec<_>>();
            keyed.sort_by(|(left, _), (right, _)| key.compare(left, right));
            matched = keyed.into_iter().map(|(_, record)| record).collect();
        }

        let window = PageWindow::new(self.page, page_size, matched.len());
        debug!(
            "Query matched {} of {} row(s); page {} of {}",
            matched.len(),
            records.len(),
            window.page,
            window.total_pages
        );
        let items = matched[window.start_index..window.end_index].to_vec();
        QueryPage { items, window }
    }
}

/// One evaluated page of rows plus the pagination metadata needed to render a pager.
#[derive(Debug, Clone)]
pub struct QueryPage<'a, R> {
    pub items: Vec<&'a R>,
    pub window: PageWindow,
}

impl<R> QueryPage<'_, R> {
    pub fn total_items(&self) -> usize {
        self.window.total_items
    }

    pub fn total_pages(&self) -> usize {
        self.window.total_pages
    }

    pub fn current_page(&self) -> usize {
        self.window.page
    }

    pub fn page_size(&self) -> usize {
        self.window.page_size
    }

    pub fn start_index(&self) -> usize {
        self.window.start_index
    }

    /// Exclusive end of this page within the filtered and sorted rows.
    pub fn end_index(&self) -> usize {
        self.window.end_index
    }

    pub fn page_numbers(&self) -> Vec<PageSlot> {
        page_numbers(self.window.page, self.window.total_pages)
    }
}
