//! GetRecipeHandler - Query handler for the recorded recipe of a session.

use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;

use crate::domain::catalog::Catalog;
use crate::domain::conversation::RecordingError;
use crate::domain::cooking::{CommentSource, CookingStatus, TasteStatus};
use crate::domain::foundation::{
    CommentId, DishId, FamilySpaceId, MemberId, SeasoningId, SessionId, Timestamp,
};
use crate::ports::{
    CommentRepository, CookingSessionRepository, MemberDirectory, PhotoStorage,
    SessionSeasoningRepository,
};

#[derive(Debug, Clone)]
pub struct GetRecipeQuery {
    pub session_id: SessionId,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecipeView {
    pub session_id: SessionId,
    pub family_space_id: FamilySpaceId,
    pub member_id: MemberId,
    pub dish_id: DishId,
    pub dish_name: String,
    pub status: CookingStatus,
    pub servings: Option<i32>,
    pub taste_status: Option<TasteStatus>,
    pub slot_a_satisfied: bool,
    pub slot_b_satisfied: bool,
    pub started_at: Timestamp,
    pub completed_at: Option<Timestamp>,
    pub seasonings: Vec<RecipeSeasoningView>,
    pub comments: Vec<RecipeCommentView>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecipeSeasoningView {
    pub seasoning_id: SeasoningId,
    pub name: String,
    pub is_slot_a: bool,
    pub is_slot_b: bool,
    /// Time-limited signed link; absent when no photo was taken.
    pub photo_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecipeCommentView {
    pub id: CommentId,
    pub member_id: MemberId,
    pub author_name: Option<String>,
    pub content: String,
    pub source: CommentSource,
    pub created_at: Timestamp,
}

pub struct GetRecipeHandler {
    catalog: Arc<Catalog>,
    sessions: Arc<dyn CookingSessionRepository>,
    seasonings: Arc<dyn SessionSeasoningRepository>,
    comments: Arc<dyn CommentRepository>,
    members: Arc<dyn MemberDirectory>,
    photos: Arc<dyn PhotoStorage>,
    photo_url_ttl_secs: i64,
}

impl GetRecipeHandler {
    pub fn new(
        catalog: Arc<Catalog>,
        sessions: Arc<dyn CookingSessionRepository>,
        seasonings: Arc<dyn SessionSeasoningRepository>,
        comments: Arc<dyn CommentRepository>,
        members: Arc<dyn MemberDirectory>,
        photos: Arc<dyn PhotoStorage>,
        photo_url_ttl_secs: i64,
    ) -> Self {
        Self {
            catalog,
            sessions,
            seasonings,
            comments,
            members,
            photos,
            photo_url_ttl_secs,
        }
    }

    pub async fn handle(&self, query: GetRecipeQuery) -> Result<RecipeView, RecordingError> {
        let session = self
            .sessions
            .find_by_id(&query.session_id)
            .await?
            .ok_or(RecordingError::SessionNotFound(query.session_id))?;

        let mut seasonings = Vec::new();
        for record in self.seasonings.find_by_session(&query.session_id).await? {
            let photo_url = match record.photo_path() {
                Some(path) => Some(
                    self.photos
                        .signed_url(path, self.photo_url_ttl_secs)
                        .map_err(|e| RecordingError::infrastructure(e.to_string()))?,
                ),
                None => None,
            };
            seasonings.push(RecipeSeasoningView {
                seasoning_id: record.seasoning_id().clone(),
                name: self.catalog.seasoning_name(record.seasoning_id()),
                is_slot_a: record.is_slot_a(),
                is_slot_b: record.is_slot_b(),
                photo_url,
            });
        }

        let mut authors: HashMap<MemberId, Option<String>> = HashMap::new();
        let mut comments = Vec::new();
        for comment in self.comments.find_by_session(&query.session_id).await? {
            if !authors.contains_key(&comment.member_id) {
                let name = self
                    .members
                    .find_by_id(&comment.member_id)
                    .await?
                    .map(|m| m.display_name);
                authors.insert(comment.member_id, name);
            }
            comments.push(RecipeCommentView {
                id: comment.id,
                member_id: comment.member_id,
                author_name: authors.get(&comment.member_id).cloned().flatten(),
                content: comment.content,
                source: comment.source,
                created_at: comment.created_at,
            });
        }

        let dish_name = self
            .catalog
            .dish(session.dish_id())
            .map(|d| d.name.clone())
            .unwrap_or_else(|| session.dish_id().to_string());

        Ok(RecipeView {
            session_id: *session.id(),
            family_space_id: *session.family_space_id(),
            member_id: *session.member_id(),
            dish_id: session.dish_id().clone(),
            dish_name,
            status: session.status(),
            servings: session.servings().map(|s| s.value()),
            taste_status: session.taste_status(),
            slot_a_satisfied: session.slot_a_satisfied(),
            slot_b_satisfied: session.slot_b_satisfied(),
            started_at: *session.started_at(),
            completed_at: session.completed_at().copied(),
            seasonings,
            comments,
        })
    }
}
