//! Scan filtering, request validation and in-memory tables for scanlite.
//!
//! A request flows through [`handler::ScanliteHandler`]: the JSON body is
//! checked by [`validation::validate_request`], then run by
//! [`provider::ScanliteProvider`] against [`state::DynamoDBServiceState`].
#![allow(missing_docs, clippy::doc_markdown, clippy::module_name_repetitions)]

pub mod compare;
pub mod config;
pub mod error;
pub mod filter;
pub mod handler;
pub mod provider;
pub mod schema;
pub mod state;
pub mod storage;
pub mod validation;

pub use compare::{ValueOrdering, compare_values};
pub use config::ScanliteConfig;
pub use filter::evaluate_filter;
pub use handler::ScanliteHandler;
pub use provider::ScanliteProvider;
pub use validation::{TypedRequest, validate_request};
