//! Interaction controller: the state machine between the display surface,
//! the simulated backend, and the logging pipeline.
//!
//! Every intent that changes what the grid shows takes a request number.
//! Only the completion carrying the most recent number moves the phase out of
//! [`Phase::Loading`]; earlier completions that land late are discarded.

use std::{any::Any, error::Error as StdError, panic::AssertUnwindSafe, sync::Arc};

use anyhow::anyhow;
use futures::FutureExt;
use parking_lot::Mutex;
use serde::Serialize;
use shared::{
    domain::Product,
    error::CatalogError,
    protocol::{FilterModel, Intent, SortModel},
};
use tokio::{sync::watch, task::JoinHandle};

use crate::{backend::CatalogBackend, loader::DataLoader, logger::Logger};

pub const DISPLAY_ERROR_MESSAGE: &str = "An error occurred while displaying products";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Loading,
    Ready,
    Errored,
}

/// What the display surface renders from.
#[derive(Debug, Clone, PartialEq)]
pub struct InteractionState {
    pub phase: Phase,
    pub records: Arc<[Product]>,
    pub is_loading: bool,
    pub active_filter_value: String,
    pub active_sort: SortModel,
    pub error: Option<String>,
}

impl Default for InteractionState {
    fn default() -> Self {
        Self {
            phase: Phase::Idle,
            records: Arc::from(Vec::new()),
            is_loading: false,
            active_filter_value: String::new(),
            active_sort: SortModel::default(),
            error: None,
        }
    }
}

struct Book {
    state: InteractionState,
    latest_request: u64,
    initialized: bool,
}

impl Book {
    fn start_operation(&mut self) -> u64 {
        self.latest_request += 1;
        self.state.error = None;
        self.state.phase = Phase::Loading;
        self.latest_request
    }

    fn is_latest(&self, request: u64) -> bool {
        if self.latest_request == request {
            return true;
        }
        tracing::debug!(
            request,
            latest = self.latest_request,
            "superseded completion left phase untouched"
        );
        false
    }

    fn settle(&mut self) {
        self.state.phase = if self.state.error.is_some() {
            Phase::Errored
        } else {
            Phase::Ready
        };
    }
}

struct Shared {
    loader: DataLoader,
    backend: Arc<dyn CatalogBackend>,
    logger: Logger,
    book: Mutex<Book>,
    published: watch::Sender<InteractionState>,
}

impl Shared {
    fn update<R>(&self, change: impl FnOnce(&mut Book) -> R) -> R {
        let mut book = self.book.lock();
        let result = change(&mut *book);
        book.state.is_loading = book.state.phase == Phase::Loading;
        self.published.send_replace(book.state.clone());
        result
    }

    fn finish_operation(&self, request: u64, failure: Option<CatalogError>) {
        if let Some(err) = &failure {
            let context = match err {
                CatalogError::Sort { .. } => "Sort operation failed",
                _ => "Filter operation failed",
            };
            self.logger.error(context, err);
        }

        self.update(|book| {
            if !book.is_latest(request) {
                return;
            }
            if let Some(err) = failure {
                book.state.error = Some(err.user_message().to_string());
            }
            book.settle();
        });
    }
}

/// Handle to a filter or sort operation that has been started.
///
/// Dropping it does not cancel the operation.
pub struct PendingOperation {
    request: u64,
    handle: JoinHandle<()>,
}

impl PendingOperation {
    pub fn request(&self) -> u64 {
        self.request
    }

    /// Waits until the operation has settled into the controller state.
    pub async fn settled(self) {
        if let Err(err) = self.handle.await {
            tracing::warn!(request = self.request, error = %err, "operation task ended abnormally");
        }
    }
}

#[derive(Clone)]
pub struct InteractionController {
    shared: Arc<Shared>,
}

impl InteractionController {
    pub fn new(loader: DataLoader, backend: Arc<dyn CatalogBackend>, logger: Logger) -> Self {
        let (published, _) = watch::channel(InteractionState::default());
        Self {
            shared: Arc::new(Shared {
                loader,
                backend,
                logger,
                book: Mutex::new(Book {
                    state: InteractionState::default(),
                    latest_request: 0,
                    initialized: false,
                }),
                published,
            }),
        }
    }

    pub fn logger(&self) -> &Logger {
        &self.shared.logger
    }

    pub fn snapshot(&self) -> InteractionState {
        self.shared.book.lock().state.clone()
    }

    pub fn phase(&self) -> Phase {
        self.shared.book.lock().state.phase
    }

    /// Receives a fresh snapshot after every state change.
    pub fn subscribe(&self) -> watch::Receiver<InteractionState> {
        self.shared.published.subscribe()
    }

    /// Loads the product list. Runs once per controller; later calls are
    /// logged and ignored.
    pub async fn initialize(&self) -> Phase {
        let already_initialized =
            std::mem::replace(&mut self.shared.book.lock().initialized, true);
        if already_initialized {
            self.shared
                .logger
                .warn("Products already loaded; ignoring repeated initialization");
            return self.phase();
        }
        let request = self.shared.update(Book::start_operation);

        match self.shared.loader.load().await {
            Ok(products) => {
                let records: Arc<[Product]> = Arc::from(products);
                self.shared.update(|book| {
                    book.state.records = records;
                    if book.is_latest(request) {
                        book.settle();
                    }
                });
            }
            Err(err) => {
                let err = CatalogError::from(err);
                self.shared.logger.error("Failed to load products", &err);
                self.shared.update(|book| {
                    book.state.records = Arc::from(Vec::new());
                    book.state.error = Some(err.user_message().to_string());
                    if book.is_latest(request) || book.state.phase != Phase::Loading {
                        book.settle();
                    }
                });
            }
        }

        self.phase()
    }

    /// Starts a filter operation unless it would move from an empty filter to
    /// an empty filter. Must be called from within a Tokio runtime.
    pub fn filter_changed(&self, model: FilterModel) -> Option<PendingOperation> {
        let term = model.term();
        let effective = {
            let book = self.shared.book.lock();
            !term.is_empty() || !book.state.active_filter_value.is_empty()
        };
        if !effective {
            tracing::debug!("filter cleared while already empty; nothing to apply");
            return None;
        }

        self.shared
            .logger
            .info(format!("Applying filter: {}", describe(&model)));
        let request = self.shared.update(|book| {
            book.state.active_filter_value = term;
            book.start_operation()
        });
        Some(self.spawn_operation(request, Intent::Filter(model)))
    }

    /// Starts a sort operation. Must be called from within a Tokio runtime.
    pub fn sort_changed(&self, model: SortModel) -> PendingOperation {
        self.shared
            .logger
            .info(format!("Applying sort: {}", describe(&model)));
        let request = self.shared.update(|book| {
            book.state.active_sort = model.clone();
            book.start_operation()
        });
        self.spawn_operation(request, Intent::Sort(model))
    }

    pub async fn apply_filter(&self, model: FilterModel) {
        if let Some(operation) = self.filter_changed(model) {
            operation.settled().await;
        }
    }

    pub async fn apply_sort(&self, model: SortModel) {
        self.sort_changed(model).settled().await;
    }

    /// Records a rendering fault reported by the display surface.
    pub fn display_error(&self, cause: &(dyn StdError + 'static)) {
        self.shared.logger.error("DataGrid error occurred", cause);
        self.shared.update(|book| {
            book.state.error = Some(DISPLAY_ERROR_MESSAGE.to_string());
            if book.state.phase != Phase::Loading {
                book.state.phase = Phase::Errored;
            }
        });
    }

    fn spawn_operation(&self, request: u64, intent: Intent) -> PendingOperation {
        let shared = Arc::clone(&self.shared);
        let handle = tokio::spawn(async move {
            let outcome = AssertUnwindSafe(shared.backend.execute(&intent))
                .catch_unwind()
                .await
                .unwrap_or_else(|panic| {
                    Err(anyhow!(
                        "backend panicked: {}",
                        panic_message(panic.as_ref())
                    ))
                });

            let failure = outcome.err().map(|source| match intent {
                Intent::Filter(_) => CatalogError::Filter { source },
                Intent::Sort(_) => CatalogError::Sort { source },
            });
            shared.finish_operation(request, failure);
        });
        PendingOperation { request, handle }
    }
}

fn describe<T: Serialize + std::fmt::Debug>(model: &T) -> String {
    serde_json::to_string(model).unwrap_or_else(|_| format!("{model:?}"))
}

fn panic_message(panic: &(dyn Any + Send)) -> &str {
    if let Some(message) = panic.downcast_ref::<&str>() {
        message
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message
    } else {
        "non-string panic payload"
    }
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
