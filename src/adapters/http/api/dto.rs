//! Request and response bodies of the JSON API.
//!
//! Requests use the camelCase keys the mini-app and web client send.

use serde::{Deserialize, Serialize};

use crate::application::handlers::{PostCommentResult, SubmitSeasoningsResult};
use crate::domain::conversation::{ConversationState, LifecycleState};
use crate::domain::foundation::{CommentId, LineUserId, MemberId, SessionId};

/// `POST /api/liff/seasonings`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitSeasoningsRequest {
    #[serde(default)]
    pub session_id: String,
    /// Required; an empty list is a valid submission.
    #[serde(default)]
    pub seasonings: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitSeasoningsResponse {
    pub success: bool,
    pub session_id: SessionId,
    pub state: LifecycleState,
    pub photo_queue_length: usize,
}

impl From<SubmitSeasoningsResult> for SubmitSeasoningsResponse {
    fn from(result: SubmitSeasoningsResult) -> Self {
        Self {
            success: true,
            session_id: result.session_id,
            state: result.state,
            photo_queue_length: result.photo_queue_length,
        }
    }
}

/// `POST /api/comments`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostCommentRequest {
    pub session_id: SessionId,
    pub member_id: MemberId,
    pub content: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostCommentResponse {
    pub comment_id: CommentId,
    pub notified: usize,
    pub awaiting_reply: usize,
}

impl From<PostCommentResult> for PostCommentResponse {
    fn from(result: PostCommentResult) -> Self {
        Self {
            comment_id: result.comment.id,
            notified: result.notified,
            awaiting_reply: result.awaiting_reply,
        }
    }
}

/// `POST /api/members/line`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdmitMemberRequest {
    pub line_user_id: LineUserId,
    pub member_id: MemberId,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdmitMemberResponse {
    pub success: bool,
    pub line_user_id: LineUserId,
    pub state: LifecycleState,
    pub version: i64,
}

impl From<ConversationState> for AdmitMemberResponse {
    fn from(state: ConversationState) -> Self {
        Self {
            success: true,
            line_user_id: state.line_user_id().clone(),
            state: state.lifecycle(),
            version: state.version(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn submit_request_reads_camel_case_keys() {
        let request: SubmitSeasoningsRequest = serde_json::from_value(json!({
            "sessionId": "abc",
            "seasonings": ["miso_red", "no_dashi"]
        }))
        .unwrap();

        assert_eq!(request.session_id, "abc");
        assert_eq!(
            request.seasonings,
            Some(vec!["miso_red".to_string(), "no_dashi".to_string()])
        );
    }

    #[test]
    fn submit_request_tolerates_missing_session_id() {
        let request: SubmitSeasoningsRequest =
            serde_json::from_value(json!({ "seasonings": [] })).unwrap();

        assert!(request.session_id.is_empty());
    }

    #[test]
    fn submit_request_distinguishes_missing_from_empty_seasonings() {
        let missing: SubmitSeasoningsRequest =
            serde_json::from_value(json!({ "sessionId": "abc" })).unwrap();
        let empty: SubmitSeasoningsRequest =
            serde_json::from_value(json!({ "sessionId": "abc", "seasonings": [] })).unwrap();

        assert_eq!(missing.seasonings, None);
        assert_eq!(empty.seasonings, Some(Vec::new()));
    }

    #[test]
    fn admit_request_rejects_empty_line_user_id() {
        let result: Result<AdmitMemberRequest, _> = serde_json::from_value(json!({
            "lineUserId": "",
            "memberId": MemberId::new(),
        }));

        assert!(result.is_err());
    }
}
