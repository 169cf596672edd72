use super::{Applied, FetchTicket, ListController, PageMode, PageQuery};
use async_trait::async_trait;
use socialbug_api::endpoints::Page;
use socialbug_api::{ApiError, CancellationToken};
use std::sync::Arc;
use tokio::sync::mpsc;

/// Fetches one page of a listing
#[async_trait]
pub trait PageSource: Send + Sync + 'static {
    type Item: Send + 'static;
    type Filter: Clone + PartialEq + Send + Sync + 'static;

    async fn fetch(
        &self,
        query: &PageQuery<Self::Filter>,
        cancel: &CancellationToken,
    ) -> Result<Page<Self::Item>, ApiError>;
}

type Completion<S> = (
    FetchTicket<<S as PageSource>::Filter>,
    Result<Page<<S as PageSource>::Item>, ApiError>,
);

/// Runs a [`ListController`] against a [`PageSource`]
///
/// Every fetch runs as its own task and reports back over a channel. Results
/// are applied in whatever order they arrive; the controller decides which
/// ones still count.
pub struct ListLoader<S: PageSource> {
    source: Arc<S>,
    list: ListController<S::Item, S::Filter>,
    data_tx: mpsc::UnboundedSender<Completion<S>>,
    data_rx: mpsc::UnboundedReceiver<Completion<S>>,
}

impl<S: PageSource> ListLoader<S> {
    pub fn new(source: S, mode: PageMode, filter: S::Filter, size: u32) -> Self {
        let (data_tx, data_rx) = mpsc::unbounded_channel();
        Self {
            source: Arc::new(source),
            list: ListController::new(mode, filter, size),
            data_tx,
            data_rx,
        }
    }

    pub fn list(&self) -> &ListController<S::Item, S::Filter> {
        &self.list
    }

    pub fn set_filter(&mut self, filter: S::Filter) {
        let ticket = self.list.set_filter(filter);
        self.spawn(ticket);
    }

    pub fn set_page(&mut self, page: u32) {
        let ticket = self.list.set_page(page);
        self.spawn(ticket);
    }

    pub fn refresh(&mut self) {
        let ticket = self.list.refresh();
        self.spawn(ticket);
    }

    /// Returns false when there is no next page to load
    pub fn next_page(&mut self) -> bool {
        match self.list.next_page() {
            Some(ticket) => {
                self.spawn(ticket);
                true
            }
            None => false,
        }
    }

    /// Returns false when already on the first page
    pub fn prev_page(&mut self) -> bool {
        match self.list.prev_page() {
            Some(ticket) => {
                self.spawn(ticket);
                true
            }
            None => false,
        }
    }

    /// Apply every result that has already arrived
    pub fn settle(&mut self) -> usize {
        let mut applied = 0;
        while let Ok((ticket, result)) = self.data_rx.try_recv() {
            if self.list.apply(&ticket, result) == Applied::Applied {
                applied += 1;
            }
        }
        applied
    }

    /// Wait until the latest fetch has been applied
    pub async fn wait_idle(&mut self) {
        while self.list.is_loading() {
            // The loader holds a sender, so the channel never closes here
            let Some((ticket, result)) = self.data_rx.recv().await else {
                break;
            };
            self.list.apply(&ticket, result);
        }
    }

    pub fn cancel(&mut self) {
        self.list.cancel();
    }

    fn spawn(&self, ticket: FetchTicket<S::Filter>) {
        tracing::debug!(page = ticket.query.page, "Loading page");
        let source = self.source.clone();
        let data_tx = self.data_tx.clone();

        tokio::spawn(async move {
            let result = source.fetch(&ticket.query, &ticket.cancel).await;
            let _ = data_tx.send((ticket, result));
        });
    }
}

impl<S: PageSource> Drop for ListLoader<S> {
    fn drop(&mut self) {
        self.list.cancel();
    }
}
