use std::sync::Arc;

use tokio::sync::RwLock;

use crate::{
    models::{DetailState, Envelope, PlotLength, TitleId},
    services::providers::MovieGateway,
};

pub const DETAIL_NOT_FOUND_MESSAGE: &str = "Not found.";
pub const DETAIL_FAILED_MESSAGE: &str = "Failed to load details.";

/// Loads one title's full record for the detail view.
///
/// Independent of the search session: opening a title never touches the
/// result list or its loading flag.
pub struct DetailViewer {
    gateway: Arc<dyn MovieGateway>,
    state: RwLock<DetailState>,
}

impl DetailViewer {
    pub fn new(gateway: Arc<dyn MovieGateway>) -> Self {
        Self {
            gateway,
            state: RwLock::new(DetailState::default()),
        }
    }

    pub async fn snapshot(&self) -> DetailState {
        self.state.read().await.clone()
    }

    pub async fn open(&self, id: &TitleId) -> DetailState {
        {
            let mut state = self.state.write().await;
            state.loading = true;
            state.error = None;
        }

        let outcome = self.gateway.title_detail(id, PlotLength::Full).await;

        let mut state = self.state.write().await;
        state.loading = false;
        match outcome {
            Ok(Envelope::Found(detail)) => {
                state.selected = Some(detail);
                state.error = None;
            }
            Ok(Envelope::Empty { message }) => {
                tracing::info!(title_id = %id, message = ?message, "Detail lookup found nothing");
                state.selected = None;
                state.error = Some(DETAIL_NOT_FOUND_MESSAGE.to_string());
            }
            Err(e) => {
                tracing::warn!(title_id = %id, error = %e, "Detail lookup failed");
                state.selected = None;
                state.error = Some(DETAIL_FAILED_MESSAGE.to_string());
            }
        }
        state.clone()
    }

    pub async fn close(&self) -> DetailState {
        let mut state = self.state.write().await;
        state.selected = None;
        state.error = None;
        state.clone()
    }
}
