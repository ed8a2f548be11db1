//! View-level state holders.
//!
//! Each view owns its cached data and recovers every backend error at its
//! own boundary: failures become a dismissable error message instead of
//! propagating. Nothing is shared between views.

pub mod alarms;
pub mod analytics;
pub mod endpoints;

pub use alarms::AlarmsView;
pub use analytics::AnalyticsView;
pub use endpoints::{EndpointsView, TestOutcome};

/// Loading state of a view's primary data.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum LoadState<T> {
    #[default]
    Idle,
    Loading,
    Loaded(T),
    Failed {
        message: String,
    },
}

impl<T> LoadState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, LoadState::Loading)
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            LoadState::Loaded(data) => Some(data),
            _ => None,
        }
    }

    pub fn data_mut(&mut self) -> Option<&mut T> {
        match self {
            LoadState::Loaded(data) => Some(data),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            LoadState::Failed { message } => Some(message),
            _ => None,
        }
    }

    /// Close an error banner. A failed load becomes an empty loaded state.
    pub fn dismiss_error(&mut self)
    where
        T: Default,
    {
        if matches!(self, LoadState::Failed { .. }) {
            *self = LoadState::Loaded(T::default());
        }
    }
}
