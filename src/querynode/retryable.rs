use std::sync::Arc;
use tracing::debug;

use super::client::QueryNodeApi;
use super::retry::retry_query;
use super::types::*;
use crate::config::RetryConfig;
use crate::error::Result;

/// Query node client that retries empty responses.
///
/// Every operation takes the same parameters as the underlying [`QueryNodeApi`]
/// call and shares one retry policy. Calls are independent: nothing is cached
/// and identical in-flight calls are not merged.
pub struct RetryableQueryNode<A> {
    api: A,
    retry: RetryConfig,
}

impl<A: QueryNodeApi> RetryableQueryNode<A> {
    pub fn new(api: A, retry: RetryConfig) -> Self {
        Self { api, retry }
    }

    pub async fn active_council_members(&self) -> Result<ActiveCouncilMembersQuery> {
        debug!("Fetching CMs...");
        let api = &self.api;
        retry_query(
            &self.retry,
            "activeCouncilMembers",
            |r: &ActiveCouncilMembersQuery| r.is_empty(),
            move || api.active_council_members(),
        )
        .await
    }

    pub async fn post_by_id(&self, id: &str) -> Result<PostByIdQuery> {
        debug!("Fetching post[{}]...", id);
        let api = &self.api;
        retry_query(
            &self.retry,
            "postById",
            |r: &PostByIdQuery| r.is_empty(),
            move || api.post_by_id(id),
        )
        .await
    }

    pub async fn forum_thread_by_id(&self, id: &str) -> Result<ForumThreadByIdQuery> {
        debug!("Fetching thread[{}]...", id);
        let api = &self.api;
        retry_query(
            &self.retry,
            "forumThreadById",
            |r: &ForumThreadByIdQuery| r.is_empty(),
            move || api.forum_thread_by_id(id),
        )
        .await
    }

    pub async fn members_by_handles(&self, handles: &[String]) -> Result<MembershipsQuery> {
        debug!("Fetching bulk of {} member(s)...", handles.len());
        let api = &self.api;
        retry_query(
            &self.retry,
            "membersByHandles",
            |r: &MembershipsQuery| r.is_empty(),
            move || api.members_by_handles(handles),
        )
        .await
    }

    pub async fn workers_by_account(&self, account: &str) -> Result<WorkersByAccountQuery> {
        debug!("Fetching workers[{}]...", account);
        let api = &self.api;
        retry_query(
            &self.retry,
            "workersByAccount",
            |r: &WorkersByAccountQuery| r.is_empty(),
            move || api.workers_by_account(account),
        )
        .await
    }

    pub async fn application_by_id(&self, application_id: &str) -> Result<ApplicationByIdQuery> {
        debug!("Fetching application[{}]...", application_id);
        let api = &self.api;
        retry_query(
            &self.retry,
            "applicationById",
            |r: &ApplicationByIdQuery| r.is_empty(),
            move || api.application_by_id(application_id),
        )
        .await
    }

    pub async fn worker_by_id(&self, worker_id: &str) -> Result<WorkerByIdQuery> {
        debug!("Fetching worker[{}]...", worker_id);
        let api = &self.api;
        retry_query(
            &self.retry,
            "workerById",
            |r: &WorkerByIdQuery| r.is_empty(),
            move || api.worker_by_id(worker_id),
        )
        .await
    }

    pub async fn member_by_id(&self, member_id: &str) -> Result<MembershipsQuery> {
        debug!("Fetching member[{}]...", member_id);
        let api = &self.api;
        retry_query(
            &self.retry,
            "memberById",
            |r: &MembershipsQuery| r.is_empty(),
            move || api.member_by_id(member_id),
        )
        .await
    }

    pub async fn opening_by_id(&self, opening_id: &str) -> Result<OpeningByIdQuery> {
        debug!("Fetching opening[{}]...", opening_id);
        let api = &self.api;
        retry_query(
            &self.retry,
            "openingById",
            |r: &OpeningByIdQuery| r.is_empty(),
            move || api.opening_by_id(opening_id),
        )
        .await
    }

    pub async fn get_storage_nodes(&self) -> Result<GetStorageNodesQuery> {
        debug!("Fetching storage nodes");
        let api = &self.api;
        retry_query(
            &self.retry,
            "getStorageNodes",
            |r: &GetStorageNodesQuery| r.is_empty(),
            move || api.get_storage_nodes(),
        )
        .await
    }

    pub async fn get_storage_bags_by_node_endpoint(
        &self,
        endpoint: &str,
    ) -> Result<GetStorageBagsByNodeEndpointQuery> {
        debug!("Fetching storage bags for {}", endpoint);
        let api = &self.api;
        retry_query(
            &self.retry,
            "getStorageBagsByNodeEndpoint",
            |r: &GetStorageBagsByNodeEndpointQuery| r.is_empty(),
            move || api.get_storage_bags_by_node_endpoint(endpoint),
        )
        .await
    }
}

/// Shared query node type
pub type SharedQueryNode<A> = Arc<RetryableQueryNode<A>>;

pub fn create_shared_query_node<A: QueryNodeApi>(
    api: A,
    retry: RetryConfig,
) -> SharedQueryNode<A> {
    Arc::new(RetryableQueryNode::new(api, retry))
}
