//! Shared page handle: the document plus its loading state.

use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::watch;

use crate::dom::Document;

/// Loading state of the host document, as exposed by `document.readyState`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadyState {
    /// The document is still being parsed.
    Loading,
    /// Parsing finished, subresources may still be loading.
    Interactive,
    /// The `load` event has fired.
    Complete,
}

/// A document that may still be loading.
///
/// Cloning is cheap and all clones share the same document and state.
#[derive(Debug, Clone)]
pub struct Page {
    document: Arc<Mutex<Document>>,
    state: Arc<watch::Sender<ReadyState>>,
}

impl Page {
    pub fn new(document: Document, state: ReadyState) -> Self {
        let (tx, _) = watch::channel(state);
        Self {
            document: Arc::new(Mutex::new(document)),
            state: Arc::new(tx),
        }
    }

    /// A page whose `load` event has already fired.
    pub fn loaded(document: Document) -> Self {
        Self::new(document, ReadyState::Complete)
    }

    pub fn ready_state(&self) -> ReadyState {
        *self.state.borrow()
    }

    /// Parsing finished; does not fire `load`.
    pub fn mark_interactive(&self) {
        self.state.send_if_modified(|state| {
            if *state == ReadyState::Loading {
                *state = ReadyState::Interactive;
                true
            } else {
                false
            }
        });
    }

    /// Fires the `load` event.
    pub fn finish_loading(&self) {
        self.state.send_replace(ReadyState::Complete);
    }

    /// Resolves once the document can be rendered into.
    ///
    /// Returns immediately unless the document is still loading, in which
    /// case it waits for the `load` event once.
    pub async fn when_document_ready(&self) {
        let mut rx = self.state.subscribe();
        if *rx.borrow_and_update() != ReadyState::Loading {
            return;
        }
        trace!("document still loading, waiting for load event");
        // `self` keeps the sender alive, so this only resolves on `load`.
        let _ = rx.wait_for(|state| *state == ReadyState::Complete).await;
    }

    /// Runs `f` with exclusive access to the document.
    pub fn with_document<R>(&self, f: impl FnOnce(&mut Document) -> R) -> R {
        let mut doc = self.document.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut doc)
    }

    /// Serialised HTML of the current document.
    pub fn html(&self) -> String {
        self.with_document(|doc| doc.to_string())
    }
}
