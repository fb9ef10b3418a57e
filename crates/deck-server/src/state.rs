//! Shared handler state.

use std::sync::Arc;

use deck_db::service::DeckService;

use crate::focus::FocusDriver;

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<DeckService>,
    pub focus: Arc<FocusDriver>,
}

impl AppState {
    /// Wrap `service` and create a focus driver with the given countdown length.
    #[must_use]
    pub fn new(service: DeckService, focus_duration_secs: u32) -> Self {
        let service = Arc::new(service);
        let focus = Arc::new(FocusDriver::new(Arc::clone(&service), focus_duration_secs));
        Self { service, focus }
    }
}
