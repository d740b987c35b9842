//! State of one "available" pane of the dual-list selector.
//!
//! Requests may overlap while the user pages or types. Each request gets a
//! ticket; only the most recently issued ticket may change what is shown.
//!
//! When a fetch fails, the previously displayed page stays on screen and the
//! error is kept for display until the next successful response.

use super::{DualSelectPage, DualSelectProvider};
use crate::api::{ApiError, ApiResult};

/// Ticket for an in-flight pane request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaneRequest {
    seq: u64,
    pub page: u32,
    pub search: String,
}

/// Outcome of handing a response to the pane.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaneUpdate {
    /// The response replaced the displayed page.
    Applied,
    /// The request failed; the previous page is still displayed.
    Failed,
    /// A newer request was issued meanwhile; the response was dropped.
    Stale,
}

pub struct DualSelectPane<P: DualSelectProvider> {
    provider: P,
    issued: u64,
    page: u32,
    search: String,
    displayed: Option<DualSelectPage<P::Record>>,
    error: Option<ApiError>,
}

impl<P: DualSelectProvider> DualSelectPane<P> {
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            issued: 0,
            page: 1,
            search: String::new(),
            displayed: None,
            error: None,
        }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Page currently displayed (1 before anything loaded).
    pub fn page(&self) -> u32 {
        self.page
    }

    /// Search term of the displayed page.
    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn displayed(&self) -> Option<&DualSelectPage<P::Record>> {
        self.displayed.as_ref()
    }

    /// Error of the most recent request, if it failed.
    pub fn error(&self) -> Option<&ApiError> {
        self.error.as_ref()
    }

    /// Take the stored error, e.g. to report it elsewhere.
    pub fn take_error(&mut self) -> Option<ApiError> {
        self.error.take()
    }

    /// Issue a ticket for a new request; any older ticket becomes stale.
    pub fn begin(&mut self, page: u32, search: &str) -> PaneRequest {
        self.issued += 1;
        PaneRequest {
            seq: self.issued,
            page: page.max(1),
            search: search.to_string(),
        }
    }

    /// Apply the response for `request`.
    pub fn complete(
        &mut self,
        request: PaneRequest,
        result: ApiResult<DualSelectPage<P::Record>>,
    ) -> PaneUpdate {
        if request.seq != self.issued {
            tracing::debug!(
                page = request.page,
                search = %request.search,
                "Dropping stale dual select response"
            );
            return PaneUpdate::Stale;
        }

        match result {
            Ok(page) => {
                self.page = request.page;
                self.search = request.search;
                self.displayed = Some(page);
                self.error = None;
                PaneUpdate::Applied
            }
            Err(e) => {
                tracing::warn!(
                    page = request.page,
                    search = %request.search,
                    error = %e,
                    "Dual select fetch failed, keeping previous page"
                );
                self.error = Some(e);
                PaneUpdate::Failed
            }
        }
    }

    /// Fetch `(page, search)` from the provider and apply it.
    pub async fn load(&mut self, page: u32, search: &str) -> PaneUpdate {
        let request = self.begin(page, search);
        let result = self.provider.fetch(request.page, &request.search).await;
        self.complete(request, result)
    }
}
