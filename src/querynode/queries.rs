//! GraphQL documents sent to the query node

pub const ACTIVE_COUNCIL_MEMBERS: &str = r#"
query activeCouncilMembers {
  electedCouncils(where: { endedAtBlock_eq: null }) {
    id
    councilMembers {
      id
      member { id handle }
    }
  }
}"#;

pub const POST_BY_ID: &str = r#"
query postById($postId: ID!) {
  forumPostByUniqueInput(where: { id: $postId }) {
    id
    text
    createdAt
    author { id handle }
    thread {
      id
      title
      category { id title }
    }
  }
}"#;

pub const FORUM_THREAD_BY_ID: &str = r#"
query forumThreadById($threadId: ID!) {
  forumThreadByUniqueInput(where: { id: $threadId }) {
    id
    title
    createdAt
    author { id handle }
    category { id title }
  }
}"#;

pub const MEMBERS_BY_HANDLES: &str = r#"
query membersByHandles($handles: [String!]) {
  memberships(where: { handle_in: $handles }) {
    id
    handle
    rootAccount
    controllerAccount
    isVerified
  }
}"#;

pub const MEMBER_BY_ID: &str = r#"
query memberById($memberId: ID!) {
  memberships(where: { id_eq: $memberId }) {
    id
    handle
    rootAccount
    controllerAccount
    isVerified
  }
}"#;

pub const WORKERS_BY_ACCOUNT: &str = r#"
query workersByAccount($account: String!) {
  workers(where: { membership: { controllerAccount_eq: $account } }) {
    id
    runtimeId
    group { name }
    membership { id handle }
    roleAccount
    isLead
    isActive
  }
}"#;

pub const WORKER_BY_ID: &str = r#"
query workerById($workerId: ID!) {
  workerByUniqueInput(where: { id: $workerId }) {
    id
    runtimeId
    group { name }
    membership { id handle }
    roleAccount
    isLead
    isActive
  }
}"#;

pub const APPLICATION_BY_ID: &str = r#"
query applicationById($applicationId: ID!) {
  workingGroupApplicationByUniqueInput(where: { id: $applicationId }) {
    id
    roleAccount
    applicant { id handle }
    opening {
      id
      group { name }
    }
  }
}"#;

pub const OPENING_BY_ID: &str = r#"
query openingById($openingId: ID!) {
  workingGroupOpeningByUniqueInput(where: { id: $openingId }) {
    id
    group { name }
    type
    rewardPerBlock
    metadata { title shortDescription }
  }
}"#;

pub const GET_STORAGE_NODES: &str = r#"
query getStorageNodes {
  storageBuckets(where: { operatorStatus_json: { isTypeOf_eq: "StorageBucketOperatorStatusActive" } }) {
    id
    operatorMetadata { nodeEndpoint }
  }
}"#;

pub const GET_STORAGE_BAGS_BY_NODE_ENDPOINT: &str = r#"
query getStorageBagsByNodeEndpoint($nodeEndpoint: String!) {
  storageBuckets(where: { operatorMetadata: { nodeEndpoint_contains: $nodeEndpoint } }) {
    id
    bags { id }
  }
}"#;
