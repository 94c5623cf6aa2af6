//! HandleChatEventHandler - Command handler for webhook chat events.

use crate::domain::conversation::{InboundEvent, RecordingError};
use crate::domain::foundation::{CommandMetadata, LineUserId};

use super::workflow::{Delivery, RecordingWorkflow, WorkflowOutcome};

/// One verified chat event.
#[derive(Debug, Clone)]
pub struct HandleChatEventCommand {
    pub line_user_id: LineUserId,
    pub reply_token: String,
    pub event: InboundEvent,
}

pub struct HandleChatEventHandler {
    workflow: RecordingWorkflow,
}

impl HandleChatEventHandler {
    pub fn new(workflow: RecordingWorkflow) -> Self {
        Self { workflow }
    }

    pub async fn handle(
        &self,
        cmd: HandleChatEventCommand,
        metadata: CommandMetadata,
    ) -> Result<WorkflowOutcome, RecordingError> {
        self.workflow
            .process(
                &cmd.line_user_id,
                cmd.event,
                Delivery::Reply(cmd.reply_token),
                &metadata,
            )
            .await
    }
}
