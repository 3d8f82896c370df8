//! Model types for scanlite.
//!
//! This crate provides the wire and checked types shared by the validation
//! engine and the scan provider. Wire inputs keep the loose request form;
//! checked requests are only ever built by request validation.
#![allow(clippy::doc_markdown)]
#![allow(clippy::module_name_repetitions)]
#![allow(missing_docs)]

pub mod attribute_value;
pub mod error;
pub mod input;
pub mod number;
pub mod operations;
pub mod output;
pub mod request;
pub mod types;

pub use attribute_value::{AttributeValue, AttributeValueError, Item, RawAttributeValue};
pub use error::{DynamoDBError, DynamoDBErrorCode};
pub use number::{Number, NumberError};
pub use operations::DynamoDBOperation;
