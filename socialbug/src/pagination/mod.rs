mod loader;
pub mod sources;

pub use loader::{ListLoader, PageSource};

use socialbug_api::endpoints::{Page, PageInfo, DEFAULT_SORT};
use socialbug_api::{ApiError, CancellationToken};

/// Parameters identifying one requested page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageQuery<F> {
    pub filter: F,
    pub page: u32,
    pub size: u32,
    pub sort: String,
}

/// How a fetched page is merged into what is shown
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageMode {
    /// Paged table: each page replaces the previous one
    Replace,
    /// Infinite scroll: page 0 starts over, later pages append
    Accumulate,
}

/// An issued fetch. Its result is only applied while it is still the latest one.
#[derive(Debug, Clone)]
pub struct FetchTicket<F> {
    id: u64,
    pub query: PageQuery<F>,
    pub cancel: CancellationToken,
}

/// What happened to a completed fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    Applied,
    /// A newer query was issued meanwhile; the result was dropped
    Superseded,
    Cancelled,
}

/// What a list screen should render
#[derive(Debug, PartialEq)]
pub enum ListView<'a, T> {
    Loading,
    Error(&'a str),
    Empty,
    Loaded(&'a [T]),
}

/// Pagination state machine shared by every list screen
///
/// Issuing a query hands out a [`FetchTicket`] and cancels the previous one.
/// Results come back through [`ListController::apply`], which drops anything
/// not produced by the latest ticket, so completion order never matters.
#[derive(Debug)]
pub struct ListController<T, F> {
    mode: PageMode,
    query: PageQuery<F>,
    records: Vec<T>,
    info: Option<PageInfo>,
    loading: bool,
    error: Option<String>,
    in_flight: Option<FetchTicket<F>>,
    next_ticket: u64,
}

impl<T, F: Clone + PartialEq> ListController<T, F> {
    pub fn new(mode: PageMode, filter: F, size: u32) -> Self {
        Self {
            mode,
            query: PageQuery {
                filter,
                page: 0,
                size,
                sort: DEFAULT_SORT.to_string(),
            },
            records: Vec::new(),
            info: None,
            loading: false,
            error: None,
            in_flight: None,
            next_ticket: 0,
        }
    }

    pub fn with_sort(mut self, sort: impl Into<String>) -> Self {
        self.query.sort = sort.into();
        self
    }

    pub fn query(&self) -> &PageQuery<F> {
        &self.query
    }

    pub fn records(&self) -> &[T] {
        &self.records
    }

    pub fn page_info(&self) -> Option<PageInfo> {
        self.info
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn view(&self) -> ListView<'_, T> {
        if let Some(error) = &self.error {
            return ListView::Error(error);
        }
        if self.loading && self.records.is_empty() {
            return ListView::Loading;
        }
        if self.records.is_empty() {
            if self.info.is_none() {
                return ListView::Loading;
            }
            return ListView::Empty;
        }
        ListView::Loaded(&self.records)
    }

    /// Switch filter (status tab); always restarts from page 0
    pub fn set_filter(&mut self, filter: F) -> FetchTicket<F> {
        self.query.filter = filter;
        self.query.page = 0;
        self.issue()
    }

    pub fn set_page(&mut self, page: u32) -> FetchTicket<F> {
        self.query.page = page;
        self.issue()
    }

    /// Fetch the current query again, e.g. after a mutation
    pub fn refresh(&mut self) -> FetchTicket<F> {
        self.issue()
    }

    /// No-op without a loaded page or when it was the last one
    ///
    /// Counts from the last page that actually arrived, so a page that
    /// failed is requested again rather than skipped.
    pub fn next_page(&mut self) -> Option<FetchTicket<F>> {
        let info = self.info?;
        if info.last {
            return None;
        }
        // Scrolling ahead while a page is still arriving would skip it
        if self.mode == PageMode::Accumulate && self.loading {
            return None;
        }
        Some(self.set_page(info.number + 1))
    }

    /// No-op without a loaded page, on the first page, or at index 0
    pub fn prev_page(&mut self) -> Option<FetchTicket<F>> {
        let info = self.info?;
        if info.first || info.number == 0 {
            return None;
        }
        Some(self.set_page(info.number - 1))
    }

    /// Apply a completed fetch if it belongs to the latest ticket
    pub fn apply(
        &mut self,
        ticket: &FetchTicket<F>,
        result: Result<Page<T>, ApiError>,
    ) -> Applied {
        let current = self
            .in_flight
            .as_ref()
            .is_some_and(|t| t.id == ticket.id && t.query == self.query);

        if !current {
            tracing::debug!(page = ticket.query.page, "Discarding superseded page");
            return Applied::Superseded;
        }

        if ticket.cancel.is_cancelled() || matches!(result, Err(ApiError::Cancelled)) {
            return Applied::Cancelled;
        }

        self.in_flight = None;
        self.loading = false;

        match result {
            Ok(page) => {
                self.info = Some(page.info());
                match self.mode {
                    PageMode::Accumulate if ticket.query.page > 0 => {
                        // Drop whatever this page contributed before, so a
                        // refetch replaces its slice instead of repeating it
                        let offset = ticket.query.page as usize * ticket.query.size as usize;
                        self.records.truncate(offset);
                        self.records.extend(page.content)
                    }
                    _ => self.records = page.content,
                }
            }
            Err(e) => {
                tracing::error!(page = ticket.query.page, "Failed to load page: {}", e);
                self.error = Some(e.to_string());
            }
        }
        Applied::Applied
    }

    /// Cancel whatever is in flight (screen unmounted)
    pub fn cancel(&mut self) {
        if let Some(ticket) = self.in_flight.take() {
            ticket.cancel.cancel();
        }
        self.loading = false;
    }

    fn issue(&mut self) -> FetchTicket<F> {
        if let Some(previous) = self.in_flight.take() {
            previous.cancel.cancel();
        }

        self.next_ticket += 1;
        let ticket = FetchTicket {
            id: self.next_ticket,
            query: self.query.clone(),
            cancel: CancellationToken::new(),
        };

        self.loading = true;
        self.error = None;
        self.in_flight = Some(ticket.clone());
        ticket
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use socialbug_api::StatusCode;

    fn page(content: Vec<u32>, number: u32, total_pages: u32) -> Page<u32> {
        Page {
            size: content.len() as u32,
            content,
            number,
            first: number == 0,
            last: number + 1 >= total_pages,
            total_pages,
            total_elements: 0,
        }
    }

    fn table() -> ListController<u32, &'static str> {
        ListController::new(PageMode::Replace, "ACTIVE", 2)
    }

    #[test]
    fn stale_page_never_overwrites_newer_one() {
        let mut list = table();
        let first = list.set_page(0);
        let second = list.set_page(1);

        assert!(first.cancel.is_cancelled());
        assert_eq!(list.apply(&second, Ok(page(vec![3, 4], 1, 3))), Applied::Applied);
        assert_eq!(list.apply(&first, Ok(page(vec![1, 2], 0, 3))), Applied::Superseded);

        assert_eq!(list.records(), &[3, 4]);
        assert_eq!(list.page_info().map(|i| i.number), Some(1));
        assert!(!list.is_loading());
    }

    #[test]
    fn stale_page_arriving_first_is_also_dropped() {
        let mut list = table();
        let first = list.set_page(0);
        let second = list.set_page(1);

        assert_eq!(list.apply(&first, Ok(page(vec![1, 2], 0, 3))), Applied::Superseded);
        assert!(list.is_loading());
        assert_eq!(list.apply(&second, Ok(page(vec![3, 4], 1, 3))), Applied::Applied);
        assert_eq!(list.records(), &[3, 4]);
    }

    #[test]
    fn changing_filter_resets_page_and_cancels_previous() {
        let mut list = table();
        let t = list.set_page(2);
        list.apply(&t, Ok(page(vec![5], 2, 3)));

        let old = list.set_page(1);
        let new = list.set_filter("COMPLETED");
        assert!(old.cancel.is_cancelled());
        assert_eq!(new.query.page, 0);
        assert_eq!(new.query.filter, "COMPLETED");
        assert_eq!(list.apply(&old, Ok(page(vec![9], 1, 3))), Applied::Superseded);
    }

    #[test]
    fn next_page_is_noop_on_last_page() {
        let mut list = table();
        assert!(list.next_page().is_none(), "no page loaded yet");

        let t = list.set_page(0);
        list.apply(&t, Ok(page(vec![1], 0, 1)));
        assert!(list.next_page().is_none());
        assert_eq!(list.query().page, 0);
    }

    #[test]
    fn prev_page_is_noop_on_first_page() {
        let mut list = table();
        let t = list.set_page(0);
        list.apply(&t, Ok(page(vec![1, 2], 0, 2)));
        assert!(list.prev_page().is_none());
        assert_eq!(list.query().page, 0);

        let t = list.next_page().unwrap();
        assert_eq!(t.query.page, 1);
        list.apply(&t, Ok(page(vec![3], 1, 2)));
        let t = list.prev_page().unwrap();
        assert_eq!(t.query.page, 0);
    }

    #[test]
    fn prev_page_never_goes_negative() {
        let mut list = table();
        let t = list.set_page(0);
        // A server that does not flag the first page
        let mut p = page(vec![1], 0, 2);
        p.first = false;
        list.apply(&t, Ok(p));
        assert!(list.prev_page().is_none());
    }

    #[test]
    fn error_is_cleared_when_next_fetch_starts() {
        let mut list = table();
        let t = list.set_page(0);
        list.apply(
            &t,
            Err(ApiError::RequestFailed {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                message: "boom".to_string(),
            }),
        );
        assert_eq!(list.error(), Some("boom"));
        assert_eq!(list.view(), ListView::Error("boom"));

        list.refresh();
        assert_eq!(list.error(), None);
        assert!(list.is_loading());
    }

    #[test]
    fn empty_page_is_distinct_from_error_and_loading() {
        let mut list = table();
        assert_eq!(list.view(), ListView::Loading);
        let t = list.set_page(0);
        assert_eq!(list.view(), ListView::Loading);
        list.apply(&t, Ok(page(vec![], 0, 0)));
        assert_eq!(list.view(), ListView::Empty);
    }

    #[test]
    fn cancelled_result_is_not_applied() {
        let mut list = table();
        let t = list.set_page(0);
        assert_eq!(list.apply(&t, Err(ApiError::Cancelled)), Applied::Cancelled);
        assert_eq!(list.error(), None);

        list.cancel();
        assert!(t.cancel.is_cancelled());
        assert_eq!(list.apply(&t, Ok(page(vec![1], 0, 1))), Applied::Superseded);
        assert!(list.records().is_empty());
    }

    #[test]
    fn accumulate_appends_then_restarts_on_page_zero() {
        let mut feed: ListController<u32, ()> = ListController::new(PageMode::Accumulate, (), 2);
        for (n, content) in [vec![1, 2], vec![3, 4], vec![5, 6]].into_iter().enumerate() {
            let t = feed.set_page(n as u32);
            feed.apply(&t, Ok(page(content, n as u32, 5)));
        }
        assert_eq!(feed.records(), &[1, 2, 3, 4, 5, 6]);

        let t = feed.set_page(0);
        feed.apply(&t, Ok(page(vec![10, 11], 0, 5)));
        assert_eq!(feed.records(), &[10, 11]);
    }

    #[test]
    fn retried_page_is_not_accumulated_twice() {
        let mut feed: ListController<u32, ()> = ListController::new(PageMode::Accumulate, (), 2);
        let t = feed.set_page(0);
        feed.apply(&t, Ok(page(vec![1, 2], 0, 3)));

        let attempt = feed.set_page(1);
        let retry = feed.set_page(1);
        assert_eq!(feed.apply(&retry, Ok(page(vec![3, 4], 1, 3))), Applied::Applied);
        assert_eq!(feed.apply(&attempt, Ok(page(vec![3, 4], 1, 3))), Applied::Superseded);
        assert_eq!(feed.apply(&retry, Ok(page(vec![3, 4], 1, 3))), Applied::Superseded);
        assert_eq!(feed.records(), &[1, 2, 3, 4]);
    }

    #[test]
    fn refreshing_accumulated_page_replaces_its_records() {
        let mut feed: ListController<u32, ()> = ListController::new(PageMode::Accumulate, (), 2);
        let t = feed.set_page(0);
        feed.apply(&t, Ok(page(vec![1, 2], 0, 3)));
        let t = feed.next_page().unwrap();
        feed.apply(&t, Ok(page(vec![3, 4], 1, 3)));

        let t = feed.refresh();
        assert_eq!(t.query.page, 1);
        assert_eq!(feed.apply(&t, Ok(page(vec![3, 4], 1, 3))), Applied::Applied);
        assert_eq!(feed.records(), &[1, 2, 3, 4]);
    }

    #[test]
    fn failed_page_is_retried_not_skipped() {
        let mut feed: ListController<u32, ()> = ListController::new(PageMode::Accumulate, (), 2);
        let t = feed.set_page(0);
        feed.apply(&t, Ok(page(vec![1, 2], 0, 3)));

        let t = feed.next_page().unwrap();
        feed.apply(
            &t,
            Err(ApiError::RequestFailed {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                message: "boom".to_string(),
            }),
        );
        assert_eq!(feed.error(), Some("boom"));

        let retry = feed.next_page().unwrap();
        assert_eq!(retry.query.page, 1);
        feed.apply(&retry, Ok(page(vec![3, 4], 1, 3)));
        assert_eq!(feed.error(), None);
        assert_eq!(feed.records(), &[1, 2, 3, 4]);
    }

    #[test]
    fn table_pages_from_the_page_on_screen() {
        let mut list = table();
        let t = list.set_page(0);
        list.apply(&t, Ok(page(vec![1, 2], 0, 3)));
        let t = list.set_page(2);
        list.apply(
            &t,
            Err(ApiError::RequestFailed {
                status: StatusCode::BAD_GATEWAY,
                message: "down".to_string(),
            }),
        );

        assert_eq!(list.next_page().unwrap().query.page, 1);
    }

    #[test]
    fn accumulate_does_not_scroll_ahead_while_loading() {
        let mut feed: ListController<u32, ()> = ListController::new(PageMode::Accumulate, (), 2);
        let t = feed.set_page(0);
        feed.apply(&t, Ok(page(vec![1, 2], 0, 3)));

        let _pending = feed.next_page().unwrap();
        assert!(feed.next_page().is_none());
        assert_eq!(feed.query().page, 1);
    }
}
