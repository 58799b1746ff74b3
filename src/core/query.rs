//! Dispatch list queries - filtering, sorting, pagination, and summary
//! counters over the arrival store

use serde::Serialize;

use crate::core::status::ArrivalStatus;
use crate::entities::arrival::ArrivalRecord;

/// Fixed page size of the dispatch list
pub const PAGE_SIZE: usize = 10;

/// Cap on the pending-pickup / pending-delivery preview lists
pub const PREVIEW_LIMIT: usize = 5;

/// Active dispatch-list filter
///
/// `None` means "All" for the three exact-match dimensions. The model
/// filter is only meaningful while a make filter is active; with the make
/// filter on "All" it is ignored.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ArrivalFilter {
    /// Case-insensitive substring matched against VIN and lot number
    pub search: String,
    pub make: Option<String>,
    pub model: Option<String>,
    pub status: Option<ArrivalStatus>,
}

impl ArrivalFilter {
    pub fn matches(&self, record: &ArrivalRecord) -> bool {
        if !self.search.is_empty() {
            let haystack = format!("{}{}", record.vin, record.lot_number).to_lowercase();
            if !haystack.contains(&self.search.to_lowercase()) {
                return false;
            }
        }
        if let Some(make) = &self.make {
            if &record.make != make {
                return false;
            }
            if let Some(model) = &self.model {
                if &record.model != model {
                    return false;
                }
            }
        }
        if let Some(status) = self.status {
            if record.status != status {
                return false;
            }
        }
        true
    }
}

/// Records matching a filter, insertion order preserved
pub fn filter_records<'a>(
    records: &'a [ArrivalRecord],
    filter: &ArrivalFilter,
) -> Vec<&'a ArrivalRecord> {
    records.iter().filter(|r| filter.matches(r)).collect()
}

/// Stable sort by display-priority rank
///
/// Ties keep their insertion order so pagination stays reproducible.
pub fn sort_by_display_priority(records: &mut [&ArrivalRecord]) {
    records.sort_by_key(|r| r.status.display_priority());
}

/// One page of sorted, filtered results
#[derive(Debug, Clone)]
pub struct PageResult<'a> {
    pub items: Vec<&'a ArrivalRecord>,
    /// 1-based index of this page
    pub page: usize,
    pub total_pages: usize,
    pub total_matches: usize,
}

/// Rendered element of the page-button strip
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageControl {
    Page(usize),
    Ellipsis,
}

/// Page-button strip for the current position
///
/// Up to five pages render in full; beyond that the strip collapses to
/// first/last plus a two-page window around the current page, with
/// ellipsis markers over the gaps.
pub fn page_controls(current: usize, total: usize) -> Vec<PageControl> {
    if total <= 5 {
        return (1..=total).map(PageControl::Page).collect();
    }

    let lo = current.saturating_sub(2).max(2);
    let hi = (current + 2).min(total - 1);

    let mut controls = vec![PageControl::Page(1)];
    if lo > 2 {
        controls.push(PageControl::Ellipsis);
    }
    controls.extend((lo..=hi).map(PageControl::Page));
    if hi < total - 1 {
        controls.push(PageControl::Ellipsis);
    }
    controls.push(PageControl::Page(total));
    controls
}

/// Summary counters over the dispatch list
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DispatchSummary {
    pub total: usize,
    pub delivered: usize,
    pub fixing: usize,
    pub ready: usize,
}

pub fn summarize(records: &[ArrivalRecord]) -> DispatchSummary {
    let mut summary = DispatchSummary {
        total: records.len(),
        ..Default::default()
    };
    for record in records {
        match record.status {
            ArrivalStatus::Delivered => summary.delivered += 1,
            ArrivalStatus::Fixing => summary.fixing += 1,
            ArrivalStatus::ReadyToSell => summary.ready += 1,
            _ => {}
        }
    }
    summary
}

/// A capped preview list with an overflow count
#[derive(Debug, Clone)]
pub struct Preview<'a> {
    pub items: Vec<&'a ArrivalRecord>,
    /// Matching records beyond the preview cap
    pub overflow: usize,
}

fn preview_by_status(records: &[ArrivalRecord], status: ArrivalStatus) -> Preview<'_> {
    let matching: Vec<&ArrivalRecord> =
        records.iter().filter(|r| r.status == status).collect();
    let overflow = matching.len().saturating_sub(PREVIEW_LIMIT);
    let mut items = matching;
    items.truncate(PREVIEW_LIMIT);
    Preview { items, overflow }
}

/// Paid vehicles awaiting collection
pub fn pending_pickup(records: &[ArrivalRecord]) -> Preview<'_> {
    preview_by_status(records, ArrivalStatus::Paid)
}

/// Collected vehicles awaiting delivery
pub fn pending_delivery(records: &[ArrivalRecord]) -> Preview<'_> {
    preview_by_status(records, ArrivalStatus::PickedUp)
}

/// Stateful dispatch-list view: the active filter plus the current page
///
/// Any filter change snaps the view back to the first page.
#[derive(Debug, Clone)]
pub struct DispatchView {
    filter: ArrivalFilter,
    page: usize,
}

impl Default for DispatchView {
    fn default() -> Self {
        Self::new()
    }
}

impl DispatchView {
    pub fn new() -> Self {
        Self {
            filter: ArrivalFilter::default(),
            page: 1,
        }
    }

    pub fn filter(&self) -> &ArrivalFilter {
        &self.filter
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn set_search(&mut self, term: impl Into<String>) {
        self.filter.search = term.into();
        self.page = 1;
    }

    /// Selecting "All" makes (None) also disables the model filter
    pub fn set_make(&mut self, make: Option<String>) {
        self.filter.make = make;
        self.filter.model = None;
        self.page = 1;
    }

    pub fn set_model(&mut self, model: Option<String>) {
        self.filter.model = model;
        self.page = 1;
    }

    pub fn set_status(&mut self, status: Option<ArrivalStatus>) {
        self.filter.status = status;
        self.page = 1;
    }

    /// Jump to a 1-based page
    pub fn set_page(&mut self, page: usize) {
        self.page = page.max(1);
    }

    /// Filter, sort, and slice out the current page
    pub fn results<'a>(&self, records: &'a [ArrivalRecord]) -> PageResult<'a> {
        let mut matching = filter_records(records, &self.filter);
        sort_by_display_priority(&mut matching);

        let total_matches = matching.len();
        let total_pages = total_matches.div_ceil(PAGE_SIZE);
        let start = (self.page - 1) * PAGE_SIZE;
        let items = if start < total_matches {
            matching[start..(start + PAGE_SIZE).min(total_matches)].to_vec()
        } else {
            Vec::new()
        };

        PageResult {
            items,
            page: self.page,
            total_pages,
            total_matches,
        }
    }

    /// Page-button strip for the current result set
    pub fn controls(&self, records: &[ArrivalRecord]) -> Vec<PageControl> {
        page_controls(self.page, self.results(records).total_pages)
    }
}
