use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::debug;

use super::queries;
use super::types::*;
use crate::error::{BotError, Result};

/// Raw query node operations, without any retry behavior
#[async_trait]
pub trait QueryNodeApi: Send + Sync {
    async fn active_council_members(&self) -> Result<ActiveCouncilMembersQuery>;
    async fn post_by_id(&self, post_id: &str) -> Result<PostByIdQuery>;
    async fn forum_thread_by_id(&self, thread_id: &str) -> Result<ForumThreadByIdQuery>;
    async fn members_by_handles(&self, handles: &[String]) -> Result<MembershipsQuery>;
    async fn workers_by_account(&self, account: &str) -> Result<WorkersByAccountQuery>;
    async fn application_by_id(&self, application_id: &str) -> Result<ApplicationByIdQuery>;
    async fn worker_by_id(&self, worker_id: &str) -> Result<WorkerByIdQuery>;
    async fn member_by_id(&self, member_id: &str) -> Result<MembershipsQuery>;
    async fn opening_by_id(&self, opening_id: &str) -> Result<OpeningByIdQuery>;
    async fn get_storage_nodes(&self) -> Result<GetStorageNodesQuery>;
    async fn get_storage_bags_by_node_endpoint(
        &self,
        node_endpoint: &str,
    ) -> Result<GetStorageBagsByNodeEndpointQuery>;
}

#[derive(Serialize)]
struct GraphQlRequest<'a> {
    query: &'a str,
    variables: serde_json::Value,
}

#[derive(Deserialize)]
struct GraphQlResponse<T> {
    data: Option<T>,
    #[serde(default)]
    errors: Vec<GraphQlError>,
}

#[derive(Deserialize)]
struct GraphQlError {
    message: String,
}

/// GraphQL-over-HTTP client for the query node
#[derive(Clone)]
pub struct HttpQueryNode {
    endpoint: String,
    http_client: reqwest::Client,
}

impl HttpQueryNode {
    pub fn new(endpoint: &str) -> Self {
        Self {
            endpoint: endpoint.to_string(),
            http_client: reqwest::Client::new(),
        }
    }

    async fn request<T: DeserializeOwned>(
        &self,
        query: &str,
        variables: serde_json::Value,
    ) -> Result<T> {
        debug!("POST {} ({} bytes of query)", self.endpoint, query.len());

        let response = self
            .http_client
            .post(&self.endpoint)
            .json(&GraphQlRequest { query, variables })
            .send()
            .await?
            .error_for_status()?;

        let body: GraphQlResponse<T> = response.json().await?;
        decode_response(body)
    }
}

fn decode_response<T>(body: GraphQlResponse<T>) -> Result<T> {
    if !body.errors.is_empty() {
        let message = body
            .errors
            .iter()
            .map(|e| e.message.as_str())
            .collect::<Vec<_>>()
            .join("; ");
        return Err(BotError::GraphQl { message });
    }

    body.data.ok_or_else(|| BotError::GraphQl {
        message: "response contained neither data nor errors".to_string(),
    })
}

#[async_trait]
impl QueryNodeApi for HttpQueryNode {
    async fn active_council_members(&self) -> Result<ActiveCouncilMembersQuery> {
        self.request(queries::ACTIVE_COUNCIL_MEMBERS, json!({})).await
    }

    async fn post_by_id(&self, post_id: &str) -> Result<PostByIdQuery> {
        self.request(queries::POST_BY_ID, json!({ "postId": post_id }))
            .await
    }

    async fn forum_thread_by_id(&self, thread_id: &str) -> Result<ForumThreadByIdQuery> {
        self.request(queries::FORUM_THREAD_BY_ID, json!({ "threadId": thread_id }))
            .await
    }

    async fn members_by_handles(&self, handles: &[String]) -> Result<MembershipsQuery> {
        self.request(queries::MEMBERS_BY_HANDLES, json!({ "handles": handles }))
            .await
    }

    async fn workers_by_account(&self, account: &str) -> Result<WorkersByAccountQuery> {
        self.request(queries::WORKERS_BY_ACCOUNT, json!({ "account": account }))
            .await
    }

    async fn application_by_id(&self, application_id: &str) -> Result<ApplicationByIdQuery> {
        self.request(
            queries::APPLICATION_BY_ID,
            json!({ "applicationId": application_id }),
        )
        .await
    }

    async fn worker_by_id(&self, worker_id: &str) -> Result<WorkerByIdQuery> {
        self.request(queries::WORKER_BY_ID, json!({ "workerId": worker_id }))
            .await
    }

    async fn member_by_id(&self, member_id: &str) -> Result<MembershipsQuery> {
        self.request(queries::MEMBER_BY_ID, json!({ "memberId": member_id }))
            .await
    }

    async fn opening_by_id(&self, opening_id: &str) -> Result<OpeningByIdQuery> {
        self.request(queries::OPENING_BY_ID, json!({ "openingId": opening_id }))
            .await
    }

    async fn get_storage_nodes(&self) -> Result<GetStorageNodesQuery> {
        self.request(queries::GET_STORAGE_NODES, json!({})).await
    }

    async fn get_storage_bags_by_node_endpoint(
        &self,
        node_endpoint: &str,
    ) -> Result<GetStorageBagsByNodeEndpointQuery> {
        self.request(
            queries::GET_STORAGE_BAGS_BY_NODE_ENDPOINT,
            json!({ "nodeEndpoint": node_endpoint }),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_data() {
        let body: GraphQlResponse<MembershipsQuery> = serde_json::from_str(
            r#"{ "data": { "memberships": [] } }"#,
        )
        .unwrap();
        let data = decode_response(body).unwrap();
        assert_eq!(data.memberships, Some(vec![]));
    }

    #[test]
    fn test_decode_errors() {
        let body: GraphQlResponse<MembershipsQuery> = serde_json::from_str(
            r#"{ "data": null, "errors": [{ "message": "boom" }, { "message": "bang" }] }"#,
        )
        .unwrap();
        match decode_response(body) {
            Err(BotError::GraphQl { message }) => assert_eq!(message, "boom; bang"),
            other => panic!("unexpected result: {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_decode_without_data() {
        let body: GraphQlResponse<MembershipsQuery> = serde_json::from_str("{}").unwrap();
        assert!(decode_response(body).is_err());
    }
}
