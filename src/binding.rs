//! One-shot state binding for UI layers.
//!
//! A [`MetadataBinding`] runs a single collection when mounted and publishes
//! `{ metadata, loading, error }` through a watch channel that a UI layer can
//! observe. A collection failure lands in `error` and leaves `metadata` unset.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::collector::{AggregateMetadata, MetadataCollector};
use crate::config::MetadataConfig;

/// Observable state of a binding.
#[derive(Debug, Clone, PartialEq)]
pub struct BindingState {
    /// The collected record once loading finished successfully
    pub metadata: Option<AggregateMetadata>,
    /// True until the collection settles
    pub loading: bool,
    /// Description of the collection failure, if any
    pub error: Option<String>,
}

impl Default for BindingState {
    fn default() -> Self {
        Self {
            metadata: None,
            loading: true,
            error: None,
        }
    }
}

/// Runs one collection per mount and exposes its state.
pub struct MetadataBinding {
    state: Arc<watch::Sender<BindingState>>,
    mounted: AtomicBool,
}

impl Default for MetadataBinding {
    fn default() -> Self {
        Self::new()
    }
}

impl MetadataBinding {
    /// An unmounted binding in the loading state.
    pub fn new() -> Self {
        let (state, _) = watch::channel(BindingState::default());
        Self {
            state: Arc::new(state),
            mounted: AtomicBool::new(false),
        }
    }

    /// Current state snapshot.
    pub fn state(&self) -> BindingState {
        self.state.borrow().clone()
    }

    /// Receiver notified on every state change.
    pub fn subscribe(&self) -> watch::Receiver<BindingState> {
        self.state.subscribe()
    }

    /// Starts the collection on the current Tokio runtime.
    ///
    /// Returns `None` if this binding was already mounted.
    pub fn mount(
        &self,
        collector: Arc<MetadataCollector>,
        config: MetadataConfig,
    ) -> Option<JoinHandle<()>> {
        if self.mounted.swap(true, Ordering::SeqCst) {
            log::debug!("Metadata binding already mounted, ignoring");
            return None;
        }

        let state = Arc::clone(&self.state);
        Some(tokio::spawn(async move {
            let next = match collector.collect(&config).await {
                Ok(metadata) => BindingState {
                    metadata: Some(metadata),
                    loading: false,
                    error: None,
                },
                Err(e) => {
                    log::error!("Metadata collection failed: {}", e);
                    BindingState {
                        metadata: None,
                        loading: false,
                        error: Some(e.to_string()),
                    }
                }
            };
            state.send_replace(next);
        }))
    }

    /// Waits until the collection settles and returns the final state.
    pub async fn settled(&self) -> BindingState {
        let mut receiver = self.subscribe();
        let settled = match receiver.wait_for(|state| !state.loading).await {
            Ok(state) => state.clone(),
            // The sender lives in self, so the channel cannot close while we wait
            Err(_) => self.state(),
        };
        settled
    }
}
