//! Access to the Joystream query node (GraphQL)
//!
//! [`HttpQueryNode`] speaks GraphQL over HTTP; [`RetryableQueryNode`] wraps any
//! [`QueryNodeApi`] and retries responses whose expected field came back empty.

mod client;
mod queries;
mod retry;
mod retryable;
pub mod types;

pub use client::{HttpQueryNode, QueryNodeApi};
pub use retryable::{create_shared_query_node, RetryableQueryNode, SharedQueryNode};
