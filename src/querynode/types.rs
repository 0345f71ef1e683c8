//! Response payloads of the query node operations.
//!
//! Every query response exposes one "expected field". The field being absent
//! (or an empty list) is what [`QueryPayload::is_empty`] reports, and is how the
//! retry wrapper tells a lagging query node apart from a usable answer.

use serde::Deserialize;

/// A query response with a designated expected field
pub trait QueryPayload {
    /// True when the expected field is missing or holds no entries
    fn is_empty(&self) -> bool;
}

fn list_is_empty<T>(list: &Option<Vec<T>>) -> bool {
    list.as_ref().map(|l| l.is_empty()).unwrap_or(true)
}

/// Short reference to a membership, embedded in most entities
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberRef {
    pub id: String,
    pub handle: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Membership {
    pub id: String,
    pub handle: String,
    pub root_account: String,
    pub controller_account: String,
    #[serde(default)]
    pub is_verified: bool,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkingGroupRef {
    pub name: String,
}

// Council

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CouncilMember {
    pub id: String,
    pub member: MemberRef,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElectedCouncil {
    pub id: String,
    #[serde(default)]
    pub council_members: Vec<CouncilMember>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveCouncilMembersQuery {
    pub elected_councils: Option<Vec<ElectedCouncil>>,
}

impl QueryPayload for ActiveCouncilMembersQuery {
    fn is_empty(&self) -> bool {
        list_is_empty(&self.elected_councils)
    }
}

impl ActiveCouncilMembersQuery {
    /// Handles of all members sitting in the active council(s)
    pub fn member_handles(&self) -> Vec<String> {
        self.elected_councils
            .iter()
            .flatten()
            .flat_map(|c| c.council_members.iter())
            .map(|cm| cm.member.handle.clone())
            .collect()
    }
}

// Forum

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForumCategoryRef {
    pub id: String,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForumThreadRef {
    pub id: String,
    pub title: String,
    pub category: ForumCategoryRef,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForumPost {
    pub id: String,
    pub text: String,
    pub created_at: String,
    pub author: MemberRef,
    pub thread: ForumThreadRef,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostByIdQuery {
    pub forum_post_by_unique_input: Option<ForumPost>,
}

impl QueryPayload for PostByIdQuery {
    fn is_empty(&self) -> bool {
        self.forum_post_by_unique_input.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForumThread {
    pub id: String,
    pub title: String,
    pub created_at: String,
    pub author: MemberRef,
    pub category: ForumCategoryRef,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForumThreadByIdQuery {
    pub forum_thread_by_unique_input: Option<ForumThread>,
}

impl QueryPayload for ForumThreadByIdQuery {
    fn is_empty(&self) -> bool {
        self.forum_thread_by_unique_input.is_none()
    }
}

// Members

/// Shared by `membersByHandles` and `memberById`
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MembershipsQuery {
    pub memberships: Option<Vec<Membership>>,
}

impl QueryPayload for MembershipsQuery {
    fn is_empty(&self) -> bool {
        list_is_empty(&self.memberships)
    }
}

impl MembershipsQuery {
    pub fn find_by_handle(&self, handle: &str) -> Option<&Membership> {
        self.memberships
            .as_ref()
            .and_then(|m| m.iter().find(|m| m.handle == handle))
    }
}

// Working groups

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Worker {
    pub id: String,
    pub runtime_id: u64,
    pub group: WorkingGroupRef,
    pub membership: MemberRef,
    pub role_account: String,
    #[serde(default)]
    pub is_lead: bool,
    #[serde(default)]
    pub is_active: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkersByAccountQuery {
    pub workers: Option<Vec<Worker>>,
}

impl QueryPayload for WorkersByAccountQuery {
    fn is_empty(&self) -> bool {
        list_is_empty(&self.workers)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkerByIdQuery {
    pub worker_by_unique_input: Option<Worker>,
}

impl QueryPayload for WorkerByIdQuery {
    fn is_empty(&self) -> bool {
        self.worker_by_unique_input.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpeningMetadata {
    pub title: Option<String>,
    pub short_description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Opening {
    pub id: String,
    pub group: WorkingGroupRef,
    #[serde(rename = "type")]
    pub opening_type: String,
    pub reward_per_block: String,
    pub metadata: Option<OpeningMetadata>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpeningByIdQuery {
    pub working_group_opening_by_unique_input: Option<Opening>,
}

impl QueryPayload for OpeningByIdQuery {
    fn is_empty(&self) -> bool {
        self.working_group_opening_by_unique_input.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpeningRef {
    pub id: String,
    pub group: WorkingGroupRef,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    pub id: String,
    pub role_account: String,
    pub applicant: MemberRef,
    pub opening: OpeningRef,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationByIdQuery {
    pub working_group_application_by_unique_input: Option<Application>,
}

impl QueryPayload for ApplicationByIdQuery {
    fn is_empty(&self) -> bool {
        self.working_group_application_by_unique_input.is_none()
    }
}

// Storage

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageBucketOperatorMetadata {
    pub node_endpoint: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageNode {
    pub id: String,
    pub operator_metadata: Option<StorageBucketOperatorMetadata>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetStorageNodesQuery {
    pub storage_buckets: Option<Vec<StorageNode>>,
}

impl QueryPayload for GetStorageNodesQuery {
    fn is_empty(&self) -> bool {
        list_is_empty(&self.storage_buckets)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StorageBagRef {
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageBucketBags {
    pub id: String,
    #[serde(default)]
    pub bags: Vec<StorageBagRef>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetStorageBagsByNodeEndpointQuery {
    pub storage_buckets: Option<Vec<StorageBucketBags>>,
}

impl QueryPayload for GetStorageBagsByNodeEndpointQuery {
    fn is_empty(&self) -> bool {
        list_is_empty(&self.storage_buckets)
    }
}
