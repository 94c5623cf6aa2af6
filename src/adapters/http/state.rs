//! Shared application state for the HTTP surface.

use std::sync::Arc;

use crate::adapters::line::SignatureVerifier;
use crate::application::handlers::{
    AdmitLineMemberHandler, GetRecipeHandler, GetSeasoningOptionsHandler,
    HandleChatEventHandler, PostCommentHandler, RecordingWorkflow, SubmitSeasoningsHandler,
};

/// Cloned per request; every dependency is behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub workflow: RecordingWorkflow,
    pub signature_verifier: Arc<SignatureVerifier>,
}

impl AppState {
    pub fn new(workflow: RecordingWorkflow, signature_verifier: SignatureVerifier) -> Self {
        Self {
            workflow,
            signature_verifier: Arc::new(signature_verifier),
        }
    }

    pub fn handle_chat_event_handler(&self) -> HandleChatEventHandler {
        HandleChatEventHandler::new(self.workflow.clone())
    }

    pub fn submit_seasonings_handler(&self) -> SubmitSeasoningsHandler {
        SubmitSeasoningsHandler::new(self.workflow.clone())
    }

    pub fn post_comment_handler(&self) -> PostCommentHandler {
        PostCommentHandler::new(self.workflow.ports().clone(), self.workflow.guard().clone())
    }

    pub fn admit_line_member_handler(&self) -> AdmitLineMemberHandler {
        let ports = self.workflow.ports();
        AdmitLineMemberHandler::new(ports.members.clone(), ports.states.clone())
    }

    pub fn get_recipe_handler(&self) -> GetRecipeHandler {
        let ports = self.workflow.ports();
        GetRecipeHandler::new(
            ports.catalog.clone(),
            ports.sessions.clone(),
            ports.seasonings.clone(),
            ports.comments.clone(),
            ports.members.clone(),
            ports.photos.clone(),
            self.workflow.settings().photo_url_ttl_secs,
        )
    }

    pub fn get_seasoning_options_handler(&self) -> GetSeasoningOptionsHandler {
        let ports = self.workflow.ports();
        GetSeasoningOptionsHandler::new(ports.catalog.clone(), ports.sessions.clone())
    }
}
