//! Parameter model
//!
//! - [`value`]: recursive value tree and ordered maps
//! - [`meta`]: meta fields with textual/typed key aliasing
//! - [`assembler`]: per-request canonical parameter set

pub mod assembler;
pub mod meta;
pub mod value;

pub use assembler::{
    build_parameter_set, current_cache_buster, CacheBuster, DerivedFields, ParameterAssembler,
    ParameterSet,
};
pub use meta::{Meta, MetaField, MetaKey};
pub use value::{ParameterMap, ParameterValue};
