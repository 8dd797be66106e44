//! Latest-wins import controller.
//!
//! Every import takes a fresh [`ImportTicket`]. A result is applied only if
//! its ticket is still the one the dashboard is loading; anything older is
//! discarded. All mutation happens between awaits on the caller's task, so
//! the locks below are never held across a suspension point.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::watch;
use tracing::Instrument;

use pdm_common::{
    AnalysisResult, AssetId, DashboardState, ImportMode, ImportTicket, Result, ViewState,
};

use super::source::AnalysisSource;
use crate::logging::{event_names, generate_run_id, LogContext};

/// An import that has been started but not yet completed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportRequest {
    pub ticket: ImportTicket,
    pub asset: AssetId,
    pub mode: ImportMode,
}

/// What happened to a completed import.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportOutcome {
    /// The result (or failure) is now on screen.
    Applied(ImportTicket),
    /// A newer import was started first; the result was dropped.
    Discarded(ImportTicket),
}

impl ImportOutcome {
    pub fn ticket(&self) -> ImportTicket {
        match self {
            ImportOutcome::Applied(t) | ImportOutcome::Discarded(t) => *t,
        }
    }

    pub fn is_applied(&self) -> bool {
        matches!(self, ImportOutcome::Applied(_))
    }
}

pub struct ImportController<S> {
    source: S,
    ctx: LogContext,
    last_ticket: AtomicU64,
    state: watch::Sender<DashboardState>,
    view: Mutex<ViewState>,
}

impl<S: AnalysisSource> ImportController<S> {
    pub fn new(source: S) -> Self {
        let (state, _) = watch::channel(DashboardState::Empty);
        ImportController {
            source,
            ctx: LogContext::new(generate_run_id()),
            last_ticket: AtomicU64::new(0),
            state,
            view: Mutex::new(ViewState::default()),
        }
    }

    pub fn with_context(mut self, ctx: LogContext) -> Self {
        self.ctx = ctx;
        self
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Snapshot of the dashboard panel.
    pub fn state(&self) -> DashboardState {
        self.state.borrow().clone()
    }

    /// Receiver notified on every applied transition.
    pub fn subscribe(&self) -> watch::Receiver<DashboardState> {
        self.state.subscribe()
    }

    pub fn view(&self) -> ViewState {
        *self.view.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Apply a UI toggle.
    pub fn update_view<R>(&self, f: impl FnOnce(&mut ViewState) -> R) -> R {
        let mut view = self.view.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut view)
    }

    /// Open the tag summary modal; fails inline without a result.
    pub fn open_tag_summary(&self) -> Result<()> {
        let state = self.state();
        self.update_view(|view| view.open_tag_summary(&state))
    }

    /// Start an import and move the panel to Loading.
    ///
    /// A blank asset is rejected without touching any state. An import
    /// already in flight is superseded.
    pub fn begin(&self, asset: &str, mode: ImportMode) -> Result<ImportRequest> {
        let asset = match AssetId::parse(asset) {
            Ok(asset) => asset,
            Err(err) => {
                tracing::warn!(
                    target: event_names::IMPORT_REJECTED,
                    run_id = %self.ctx.run_id,
                    stage = "import",
                    error = %err,
                    "import rejected"
                );
                return Err(err);
            }
        };
        let ticket = ImportTicket(self.last_ticket.fetch_add(1, Ordering::Relaxed) + 1);

        let mut superseded = None;
        self.state.send_modify(|state| {
            superseded = state.loading_ticket();
            *state = DashboardState::Loading {
                ticket,
                asset: asset.clone(),
                mode,
            };
        });
        self.update_view(ViewState::on_import_started);

        if let Some(old) = superseded {
            tracing::info!(
                target: event_names::IMPORT_SUPERSEDED,
                run_id = %self.ctx.run_id,
                stage = "import",
                superseded = old.0,
                by = ticket.0,
                "import superseded"
            );
        }
        tracing::info!(
            target: event_names::IMPORT_STARTED,
            run_id = %self.ctx.run_id,
            stage = "import",
            asset = %asset,
            mode = %mode,
            ticket = ticket.0,
            "import started"
        );

        Ok(ImportRequest {
            ticket,
            asset,
            mode,
        })
    }

    /// Deliver the outcome of `ticket`.
    pub fn complete(&self, ticket: ImportTicket, result: Result<AnalysisResult>) -> ImportOutcome {
        let failure = result.as_ref().err().map(ToString::to_string);
        let mut result = Some(result);

        let applied = self.state.send_if_modified(|state| {
            if state.loading_ticket() != Some(ticket) {
                return false;
            }
            *state = match result.take() {
                Some(Ok(analysis)) => DashboardState::Ready(Arc::new(analysis)),
                Some(Err(err)) => DashboardState::Failed {
                    message: err.to_string(),
                },
                None => return false,
            };
            true
        });

        if !applied {
            tracing::info!(
                target: event_names::IMPORT_SUPERSEDED,
                run_id = %self.ctx.run_id,
                stage = "import",
                ticket = ticket.0,
                "stale import result discarded"
            );
            return ImportOutcome::Discarded(ticket);
        }

        match failure {
            Some(message) => tracing::warn!(
                target: event_names::ANALYSIS_FAILED,
                run_id = %self.ctx.run_id,
                stage = "import",
                ticket = ticket.0,
                error = %message,
                "import failed"
            ),
            None => tracing::info!(
                target: event_names::IMPORT_APPLIED,
                run_id = %self.ctx.run_id,
                stage = "import",
                ticket = ticket.0,
                "import applied"
            ),
        }
        ImportOutcome::Applied(ticket)
    }

    /// Run one import end to end.
    ///
    /// Errors only for a rejected asset selection; analysis failures land in
    /// [`DashboardState::Failed`].
    pub async fn import(&self, asset: &str, mode: ImportMode) -> Result<ImportOutcome> {
        let request = self.begin(asset, mode)?;
        let span = tracing::info_span!(
            "import",
            run_id = %self.ctx.run_id,
            asset = %request.asset,
            ticket = request.ticket.0,
        );
        let result = self
            .source
            .analyze(&request.asset, request.mode)
            .instrument(span)
            .await;
        Ok(self.complete(request.ticket, result))
    }
}
