//! Canonical parameter set assembly
//!
//! A [`ParameterSet`] is built fresh for every URL: derived fields are read
//! from [`Meta`] first, then the caller's variables are laid over them with a
//! shallow overwrite, so a variable named like a derived field wins.

use crate::constants::{
    PARAM_AGENT, PARAM_CACHE_BUSTER, PARAM_DEFAULT_IMAGE, PARAM_HEIGHT, PARAM_ID,
    PARAM_RESOLUTION, PARAM_WIDTH,
};

use super::meta::{Meta, MetaField};
use super::value::{ParameterMap, ParameterValue};

/// Whether the cache-busting `__v` field is part of the set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheBuster {
    Include,
    /// Used for signing input so signatures stay stable across calls
    Exclude,
}

/// Current wall-clock cache buster (Unix seconds)
///
/// Never stable across calls by construction; it exists to defeat crawler
/// and CDN caches when the caller gives no explicit version.
pub fn current_cache_buster() -> ParameterValue {
    ParameterValue::from(chrono::Utc::now().timestamp())
}

/// Fields derived from meta, before variables are applied
///
/// Absent sources are stored as [`ParameterValue::Null`].
#[derive(Debug, Clone, PartialEq)]
pub struct DerivedFields {
    /// `None` when the set was built with [`CacheBuster::Exclude`]
    pub cache_buster: Option<ParameterValue>,
    pub id: ParameterValue,
    pub width: ParameterValue,
    pub height: ParameterValue,
    pub resolution: ParameterValue,
    pub agent: ParameterValue,
    /// Fallback image, only emitted by project URLs
    pub default_image: Option<ParameterValue>,
}

impl DerivedFields {
    fn to_map(&self) -> ParameterMap {
        let mut map = ParameterMap::with_capacity(7);
        if let Some(v) = &self.cache_buster {
            map.insert(PARAM_CACHE_BUSTER, v.clone());
        }
        map.insert(PARAM_ID, self.id.clone());
        map.insert(PARAM_WIDTH, self.width.clone());
        map.insert(PARAM_HEIGHT, self.height.clone());
        map.insert(PARAM_RESOLUTION, self.resolution.clone());
        map.insert(PARAM_AGENT, self.agent.clone());
        if let Some(default_image) = &self.default_image {
            map.insert(PARAM_DEFAULT_IMAGE, default_image.clone());
        }
        map
    }
}

/// Canonical parameters for one URL
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterSet {
    derived: DerivedFields,
    variables: ParameterMap,
}

impl ParameterSet {
    pub fn derived(&self) -> &DerivedFields {
        &self.derived
    }

    pub fn variables(&self) -> &ParameterMap {
        &self.variables
    }

    pub fn cache_buster(&self) -> Option<&ParameterValue> {
        self.derived.cache_buster.as_ref()
    }

    /// Same set with `__v` removed
    pub fn without_cache_buster(&self) -> ParameterSet {
        let mut set = self.clone();
        set.derived.cache_buster = None;
        set
    }

    /// Derived fields overlaid with variables (variables win on collision)
    pub fn to_map(&self) -> ParameterMap {
        let mut map = self.derived.to_map();
        map.merge(&self.variables);
        map
    }

    pub fn to_value(&self) -> ParameterValue {
        ParameterValue::Map(self.to_map())
    }
}

/// Builds a [`ParameterSet`] from meta and variables
#[derive(Debug, Clone, Copy)]
pub struct ParameterAssembler<'a> {
    meta: &'a Meta,
    variables: &'a ParameterMap,
    default_image: Option<&'a str>,
}

impl<'a> ParameterAssembler<'a> {
    pub fn new(meta: &'a Meta, variables: &'a ParameterMap) -> Self {
        Self {
            meta,
            variables,
            default_image: None,
        }
    }

    pub fn with_default_image(mut self, default_image: Option<&'a str>) -> Self {
        self.default_image = default_image;
        self
    }

    /// Never fails; missing inputs simply produce null derived fields
    pub fn assemble(&self, cache_buster: CacheBuster) -> ParameterSet {
        let field = |f: MetaField| self.meta.field(f).cloned().unwrap_or_default();

        let cache_buster = match cache_buster {
            CacheBuster::Include => Some(
                self.meta
                    .field(MetaField::Version)
                    .cloned()
                    .unwrap_or_else(current_cache_buster),
            ),
            CacheBuster::Exclude => None,
        };

        ParameterSet {
            derived: DerivedFields {
                cache_buster,
                id: field(MetaField::Id),
                width: field(MetaField::Width),
                height: field(MetaField::Height),
                resolution: field(MetaField::Resolution),
                agent: field(MetaField::Agent),
                default_image: self.default_image.map(ParameterValue::from),
            },
            variables: self.variables.clone(),
        }
    }
}

/// Build the canonical parameter set for one request
pub fn build_parameter_set(
    meta: &Meta,
    variables: &ParameterMap,
    exclude_cache_buster: bool,
) -> ParameterSet {
    let cache_buster = if exclude_cache_buster {
        CacheBuster::Exclude
    } else {
        CacheBuster::Include
    };
    ParameterAssembler::new(meta, variables).assemble(cache_buster)
}
