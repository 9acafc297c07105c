use serde::{Deserialize, Serialize};

use crate::{
    client::{assistants_beta, OpenAiClient},
    ApiResponseOrError,
};

use super::{messages::ThreadMessage, null_as_empty, Metadata};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(default)]
pub struct Thread {
    pub id: String,
    /// Always `thread`.
    pub object: String,
    pub created_at: i64,
    #[serde(deserialize_with = "null_as_empty")]
    pub metadata: Metadata,
}

#[derive(Debug, Serialize, Clone, PartialEq, Default)]
pub struct ThreadRequest {
    /// Messages to start the thread with.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub messages: Vec<ThreadMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
}

#[derive(Debug, Serialize, Clone, PartialEq, Default)]
pub struct ModifyThreadRequest {
    pub metadata: Metadata,
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq, Default)]
#[serde(default)]
pub struct ThreadDeleteStatus {
    pub id: String,
    pub object: String,
    pub deleted: bool,
}

impl OpenAiClient {
    pub async fn create_thread(&self, request: ThreadRequest) -> ApiResponseOrError<Thread> {
        self.post("threads", request, assistants_beta()).await
    }

    pub async fn retrieve_thread(&self, thread_id: &str) -> ApiResponseOrError<Thread> {
        self.get(format!("threads/{thread_id}"), assistants_beta())
            .await
    }

    /// Replaces the thread's metadata. Only metadata can be modified.
    pub async fn modify_thread(
        &self,
        thread_id: &str,
        request: ModifyThreadRequest,
    ) -> ApiResponseOrError<Thread> {
        self.post(format!("threads/{thread_id}"), request, assistants_beta())
            .await
    }

    pub async fn delete_thread(&self, thread_id: &str) -> ApiResponseOrError<ThreadDeleteStatus> {
        self.delete(format!("threads/{thread_id}"), assistants_beta())
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::tests::test_client;
    use mockito::{Matcher, Server};
    use serde_json::json;

    fn thread_json() -> serde_json::Value {
        json!({
            "id": "thread_1",
            "object": "thread",
            "created_at": 1699012949,
            "metadata": { "modified": "true", "user": "abc123" }
        })
    }

    #[tokio::test]
    async fn create_thread_with_initial_message() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/threads")
            .match_header("openai-beta", "assistants=v1")
            .match_body(Matcher::Json(json!({
                "messages": [{ "role": "user", "content": "Hello, what is AI?" }]
            })))
            .with_status(200)
            .with_body(thread_json().to_string())
            .expect(1)
            .create_async()
            .await;

        let request = ThreadRequest {
            messages: vec![ThreadMessage::user("Hello, what is AI?")],
            metadata: None,
        };
        let thread = test_client(&server).create_thread(request).await.unwrap();

        assert_eq!(thread.id, "thread_1");
        assert_eq!(thread.metadata["user"], json!("abc123"));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn retrieve_and_modify_thread() {
        let mut server = Server::new_async().await;
        let retrieve = server
            .mock("GET", "/threads/thread_1")
            .match_header("openai-beta", "assistants=v1")
            .with_status(200)
            .with_body(thread_json().to_string())
            .expect(1)
            .create_async()
            .await;
        let modify = server
            .mock("POST", "/threads/thread_1")
            .match_header("openai-beta", "assistants=v1")
            .match_body(Matcher::Json(json!({
                "metadata": { "modified": "true", "user": "abc123" }
            })))
            .with_status(200)
            .with_body(thread_json().to_string())
            .expect(1)
            .create_async()
            .await;

        let client = test_client(&server);
        let thread = client.retrieve_thread("thread_1").await.unwrap();
        let modified = client
            .modify_thread(
                "thread_1",
                ModifyThreadRequest {
                    metadata: thread.metadata.clone(),
                },
            )
            .await
            .unwrap();

        assert_eq!(modified, thread);
        retrieve.assert_async().await;
        modify.assert_async().await;
    }

    #[tokio::test]
    async fn delete_thread_reports_status() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("DELETE", "/threads/thread_1")
            .match_header("openai-beta", "assistants=v1")
            .with_status(200)
            .with_body(
                json!({ "id": "thread_1", "object": "thread.deleted", "deleted": true })
                    .to_string(),
            )
            .expect(1)
            .create_async()
            .await;

        let status = test_client(&server).delete_thread("thread_1").await.unwrap();

        assert!(status.deleted);
        assert_eq!(status.object, "thread.deleted");
        mock.assert_async().await;
    }
}
