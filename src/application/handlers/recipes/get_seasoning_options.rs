//! GetSeasoningOptionsHandler - what the mini-app offers for a session.

use std::sync::Arc;

use serde::Serialize;

use crate::domain::catalog::{Catalog, SeasoningOption};
use crate::domain::conversation::RecordingError;
use crate::domain::cooking::CookingStatus;
use crate::domain::foundation::{DishId, SessionId};
use crate::ports::CookingSessionRepository;

#[derive(Debug, Clone)]
pub struct GetSeasoningOptionsQuery {
    pub session_id: SessionId,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeasoningOptionsView {
    pub session_id: SessionId,
    pub dish_id: DishId,
    pub dish_name: String,
    pub status: CookingStatus,
    pub seasonings: Vec<SeasoningOption>,
}

pub struct GetSeasoningOptionsHandler {
    catalog: Arc<Catalog>,
    sessions: Arc<dyn CookingSessionRepository>,
}

impl GetSeasoningOptionsHandler {
    pub fn new(catalog: Arc<Catalog>, sessions: Arc<dyn CookingSessionRepository>) -> Self {
        Self { catalog, sessions }
    }

    pub async fn handle(
        &self,
        query: GetSeasoningOptionsQuery,
    ) -> Result<SeasoningOptionsView, RecordingError> {
        let session = self
            .sessions
            .find_by_id(&query.session_id)
            .await?
            .ok_or(RecordingError::SessionNotFound(query.session_id))?;
        let dish_id = session.dish_id().clone();

        Ok(SeasoningOptionsView {
            session_id: query.session_id,
            dish_name: self
                .catalog
                .dish(&dish_id)
                .map(|d| d.name.clone())
                .unwrap_or_else(|| dish_id.to_string()),
            status: session.status(),
            seasonings: self.catalog.seasoning_options(&dish_id),
            dish_id,
        })
    }
}
