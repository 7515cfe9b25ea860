// Flyyer URL Library
// Canonical parameter encoding and signing for Flyyer image-rendering URLs

pub mod config;
pub mod constants;
pub mod error;
pub mod href; // URL assembly for project and render addressing
pub mod logging;
pub mod params;
pub mod query; // qs-compatible query encoding
pub mod signature; // HMAC and JWT signing

pub use error::FlyyerError;
pub use href::{ProjectUrl, RenderUrl};
pub use params::{Meta, MetaField, ParameterMap, ParameterSet, ParameterValue};
pub use query::{encode_query, encode_query_sorted};
pub use signature::{sign, Signature, Strategy};
