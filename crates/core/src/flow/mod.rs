//! Per-view state machines. Each flow owns its state and advances it only
//! through a pure `reduce(state, event) -> state` step; the async controllers
//! turn backend outcomes into events.

pub mod form;
pub mod history;
pub mod model_info;

/// State of a fetch-once-on-mount view.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchState<T> {
    Loading,
    Loaded(T),
    Errored(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum FetchEvent<T> {
    FetchSucceeded(T),
    FetchFailed(String),
}

impl<T> FetchState<T> {
    pub fn reduce(self, event: FetchEvent<T>) -> Self {
        match (self, event) {
            (FetchState::Loading, FetchEvent::FetchSucceeded(value)) => FetchState::Loaded(value),
            (FetchState::Loading, FetchEvent::FetchFailed(message)) => FetchState::Errored(message),
            // Loaded and Errored are terminal.
            (done, _) => done,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, FetchState::Loading)
    }
}

impl<T> Default for FetchState<T> {
    fn default() -> Self {
        FetchState::Loading
    }
}
