use derive_builder::Builder;
use serde::{Deserialize, Serialize};

use crate::{
    client::{assistants_beta, OpenAiClient},
    ApiResponseOrError,
};

use super::{null_as_empty, Metadata};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(default)]
pub struct Run {
    pub id: String,
    /// Always `thread.run`.
    pub object: String,
    pub created_at: i64,
    /// The ID of the thread associated with this run.
    pub thread_id: String,
    /// The ID of the assistant used for this run.
    pub assistant_id: String,
    /// The status of the run. Driven by the server; this crate only reads it.
    pub status: RunStatus,
    /// Details on the action required to continue the run. Will be null if no action is required.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required_action: Option<RequiredAction>,
    /// The last error that occurred during this run.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_error: Option<LastError>,

    /// The time at which the run will expire.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<i64>,
    /// The time at which the run was started.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub started_at: Option<i64>,
    /// The time at which the run was cancelled.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cancelled_at: Option<i64>,
    /// The time at which the run failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failed_at: Option<i64>,
    /// The time at which the run was completed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<i64>,

    /// The model used for this run.
    pub model: String,
    /// The instructions given to the assistant.
    pub instructions: String,
    /// The tools used for this run.
    pub tools: Vec<RunTool>,
    /// The files used for this run.
    pub file_ids: Vec<String>,
    #[serde(deserialize_with = "null_as_empty")]
    pub metadata: Metadata,
}

impl Run {
    /// Tool calls the caller has to resolve and submit with
    /// [`OpenAiClient::submit_tool_outputs`]. Empty unless the run is waiting on them.
    pub fn pending_tool_calls(&self) -> &[RunToolCall] {
        self.required_action
            .as_ref()
            .map(|action| action.submit_tool_outputs.tool_calls.as_slice())
            .unwrap_or_default()
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    #[default]
    Queued,
    InProgress,
    RequiresAction,
    Cancelling,
    Cancelled,
    Failed,
    Completed,
    Expired,
}

impl RunStatus {
    /// Whether the server will make no further transitions from this status.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            RunStatus::Cancelled | RunStatus::Failed | RunStatus::Completed | RunStatus::Expired
        )
    }

    pub fn requires_action(&self) -> bool {
        *self == RunStatus::RequiresAction
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RunStatus::Queued => "queued",
            RunStatus::InProgress => "in_progress",
            RunStatus::RequiresAction => "requires_action",
            RunStatus::Cancelling => "cancelling",
            RunStatus::Cancelled => "cancelled",
            RunStatus::Failed => "failed",
            RunStatus::Completed => "completed",
            RunStatus::Expired => "expired",
        }
    }
}

impl std::fmt::Display for RunStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Default)]
#[serde(default)]
pub struct RequiredAction {
    /// Currently always `submit_tool_outputs`.
    #[serde(rename = "type")]
    pub kind: String,
    pub submit_tool_outputs: SubmitToolOutputs,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Default)]
#[serde(default)]
pub struct SubmitToolOutputs {
    pub tool_calls: Vec<RunToolCall>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Default)]
#[serde(default)]
pub struct RunTool {
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Default)]
#[serde(default)]
pub struct RunToolCall {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub function: Function,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Default)]
#[serde(default)]
pub struct Function {
    pub name: String,
    /// JSON-encoded arguments, as generated by the model. Not validated.
    pub arguments: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Default)]
#[serde(default)]
pub struct LastError {
    /// One of `server_error` or `rate_limit_exceeded`.
    pub code: String,
    pub message: String,
}

#[derive(Serialize, Builder, Debug, Clone, PartialEq, Default)]
#[builder(pattern = "owned")]
#[builder(name = "CreateRunBuilder")]
#[builder(setter(strip_option, into))]
pub struct CreateRunRequest {
    /// ID of the assistant to use.
    pub assistant_id: String,
    /// Overrides the assistant's model for this run.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[builder(default)]
    pub model: Option<String>,
    /// Overrides the assistant's instructions for this run.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[builder(default)]
    pub instructions: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[builder(default)]
    pub metadata: Option<Metadata>,
}

impl CreateRunRequest {
    pub fn builder(assistant_id: impl Into<String>) -> CreateRunBuilder {
        CreateRunBuilder::create_empty().assistant_id(assistant_id)
    }
}

/// The result of one tool call. Empty fields are left out of the request
/// body, so an empty `output` is sent without the `output` key.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Default)]
pub struct ToolOutputs {
    /// The ID of the tool call in the `required_action` object the output is being submitted for.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub tool_call_id: String,
    /// The output of the tool call to be submitted to continue the run.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub output: String,
}

impl ToolOutputs {
    pub fn new(tool_call_id: impl Into<String>, output: impl Into<String>) -> Self {
        Self {
            tool_call_id: tool_call_id.into(),
            output: output.into(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Default)]
pub struct ToolOutputsRequest {
    pub tool_outputs: Vec<ToolOutputs>,
}

impl FromIterator<ToolOutputs> for ToolOutputsRequest {
    fn from_iter<I: IntoIterator<Item = ToolOutputs>>(iter: I) -> Self {
        Self {
            tool_outputs: iter.into_iter().collect(),
        }
    }
}

impl OpenAiClient {
    /// Starts a run of an assistant on a thread. The returned run is
    /// normally `queued`; use [`OpenAiClient::retrieve_run`] to follow it.
    pub async fn create_run(
        &self,
        thread_id: &str,
        request: CreateRunRequest,
    ) -> ApiResponseOrError<Run> {
        self.post(format!("threads/{thread_id}/runs"), request, assistants_beta())
            .await
    }

    pub async fn retrieve_run(&self, thread_id: &str, run_id: &str) -> ApiResponseOrError<Run> {
        self.get(format!("threads/{thread_id}/runs/{run_id}"), assistants_beta())
            .await
    }

    /// Sends the results of the calls listed in [`Run::pending_tool_calls`]
    /// back to a run that is in `requires_action`.
    pub async fn submit_tool_outputs(
        &self,
        thread_id: &str,
        run_id: &str,
        request: ToolOutputsRequest,
    ) -> ApiResponseOrError<Run> {
        self.post(
            format!("threads/{thread_id}/runs/{run_id}/submit_tool_outputs"),
            request,
            assistants_beta(),
        )
        .await
    }
}
