//! URL assembly
//!
//! Two addressing schemes are supported:
//!
//! ## Project URLs
//! ```text
//! https://cdn.flyyer.io/v2/{project}/{signature}/{sorted query}{path}
//! https://cdn.flyyer.io/v2/{project}/jwt-{token}?__v={v}
//! ```
//!
//! ## Render URLs
//! ```text
//! https://cdn.flyyer.io/render/v2/{tenant}/{deck}/{template}[.{version}][.{extension}]?{query}
//! https://cdn.flyyer.io/render/v2/{tenant}?__jwt={token}&__v={v}
//! ```
//!
//! In token mode only the cache buster stays visible next to the token.

use tracing::debug;

use crate::constants::{
    JWT_SEGMENT_PREFIX, PARAM_CACHE_BUSTER, PARAM_HMAC, PARAM_JWT, PROJECT_BASE_URL,
    RENDER_BASE_URL,
};
use crate::error::FlyyerError;
use crate::params::{CacheBuster, Meta, ParameterAssembler, ParameterMap, ParameterSet};
use crate::query::{encode_query_sorted, QueryEncoder};
use crate::signature::{normalize_path, RenderRoute, Signature, Signer, SigningTarget};

/// Query carrying only the cache buster (and optionally the token first)
fn cache_buster_query(params: &ParameterSet, token: Option<&str>) -> String {
    let mut map = ParameterMap::with_capacity(2);
    if let Some(token) = token {
        map.insert(PARAM_JWT, token);
    }
    if let Some(v) = params.cache_buster() {
        map.insert(PARAM_CACHE_BUSTER, v.clone());
    }
    QueryEncoder::default().encode_map(&map)
}

/// Project + path addressed URL
#[derive(Debug, Clone, Default)]
pub struct ProjectUrl {
    pub project: Option<String>,
    /// Request path; `/` when absent, a leading `/` is added when missing
    pub path: Option<String>,
    /// Fallback image emitted as `_def`
    pub default_image: Option<String>,
    pub variables: ParameterMap,
    pub meta: Meta,
    pub secret: Option<String>,
    pub strategy: Option<String>,
}

impl ProjectUrl {
    pub fn new(project: impl Into<String>) -> Self {
        Self {
            project: Some(project.into()),
            ..Default::default()
        }
    }

    pub fn path_safe(&self) -> String {
        normalize_path(self.path.as_deref().unwrap_or(""))
    }

    pub fn parameter_set(&self, cache_buster: CacheBuster) -> ParameterSet {
        ParameterAssembler::new(&self.meta, &self.variables)
            .with_default_image(self.default_image.as_deref())
            .assemble(cache_buster)
    }

    /// Sorted query string including `__v`
    pub fn querystring(&self) -> String {
        encode_query_sorted(&self.parameter_set(CacheBuster::Include).to_value())
    }

    pub fn sign(&self) -> Result<Signature, FlyyerError> {
        let project = self
            .project
            .as_deref()
            .ok_or(FlyyerError::MissingRequiredField("project"))?;
        let params = self.parameter_set(CacheBuster::Exclude);
        self.sign_with(project, &params)
    }

    fn sign_with(&self, project: &str, params: &ParameterSet) -> Result<Signature, FlyyerError> {
        let path = self.path_safe();
        let target = SigningTarget::Project {
            project,
            path: &path,
        };
        match Signer::from_config(self.strategy.as_deref(), self.secret.as_deref())? {
            Some(signer) => signer.sign(target, params),
            None => Ok(Signature::Unsigned),
        }
    }

    pub fn href(&self) -> Result<String, FlyyerError> {
        let project = self
            .project
            .as_deref()
            .ok_or(FlyyerError::MissingRequiredField("project"))?;

        let params = self.parameter_set(CacheBuster::Include);
        let signature = self.sign_with(project, &params)?;

        let href = match &signature {
            Signature::Token(token) => format!(
                "{}/{}/{}{}?{}",
                PROJECT_BASE_URL,
                project,
                JWT_SEGMENT_PREFIX,
                token,
                cache_buster_query(&params, None)
            ),
            Signature::Unsigned | Signature::Hmac(_) => format!(
                "{}/{}/{}/{}{}",
                PROJECT_BASE_URL,
                project,
                signature,
                encode_query_sorted(&params.to_value()),
                self.path_safe()
            ),
        };

        debug!(
            project = %project,
            signed = signature.is_signed(),
            "Built project URL"
        );

        Ok(href)
    }
}

/// Tenant/deck/template addressed URL
#[derive(Debug, Clone, Default)]
pub struct RenderUrl {
    pub tenant: Option<String>,
    pub deck: Option<String>,
    pub template: Option<String>,
    pub version: Option<u64>,
    pub extension: Option<String>,
    pub variables: ParameterMap,
    pub meta: Meta,
    pub secret: Option<String>,
    pub strategy: Option<String>,
}

impl RenderUrl {
    pub fn new(
        tenant: impl Into<String>,
        deck: impl Into<String>,
        template: impl Into<String>,
    ) -> Self {
        Self {
            tenant: Some(tenant.into()),
            deck: Some(deck.into()),
            template: Some(template.into()),
            ..Default::default()
        }
    }

    pub fn parameter_set(&self, cache_buster: CacheBuster) -> ParameterSet {
        ParameterAssembler::new(&self.meta, &self.variables).assemble(cache_buster)
    }

    /// Tenant plus route, or the first missing required field
    fn route(&self) -> Result<(&str, RenderRoute), FlyyerError> {
        let tenant = self
            .tenant
            .as_deref()
            .ok_or(FlyyerError::MissingRequiredField("tenant"))?;
        let deck = self
            .deck
            .as_ref()
            .ok_or(FlyyerError::MissingRequiredField("deck"))?;
        let template = self
            .template
            .as_ref()
            .ok_or(FlyyerError::MissingRequiredField("template"))?;

        Ok((
            tenant,
            RenderRoute {
                deck: deck.clone(),
                template: template.clone(),
                version: self.version,
                extension: self.extension.clone(),
            },
        ))
    }

    /// Insertion-ordered query; `__hmac` is appended last when HMAC signed
    fn querystring(&self, params: &ParameterSet, signature: &Signature) -> String {
        let mut map = params.to_map();
        if let Signature::Hmac(digest) = signature {
            map.insert(PARAM_HMAC, digest.as_str());
        }
        QueryEncoder::default().encode_map(&map)
    }

    pub fn href(&self) -> Result<String, FlyyerError> {
        let (tenant, route) = self.route()?;
        let signer = Signer::from_config(self.strategy.as_deref(), self.secret.as_deref())?;

        let params = self.parameter_set(CacheBuster::Include);
        let signature = match &signer {
            Some(signer) => signer.sign(SigningTarget::Render(&route), &params)?,
            None => Signature::Unsigned,
        };

        let base = format!("{}/{}", RENDER_BASE_URL, tenant);
        let href = match &signature {
            Signature::Token(token) => {
                format!("{}?{}", base, cache_buster_query(&params, Some(token)))
            }
            Signature::Unsigned | Signature::Hmac(_) => {
                let mut href = format!("{}/{}/{}", base, route.deck, route.template);
                if let Some(version) = route.version {
                    href.push_str(&format!(".{}", version));
                }
                if let Some(extension) = &route.extension {
                    href.push_str(&format!(".{}", extension));
                }
                href.push('?');
                href.push_str(&self.querystring(&params, &signature));
                href
            }
        };

        debug!(
            tenant = %tenant,
            deck = %route.deck,
            template = %route.template,
            signed = signature.is_signed(),
            "Built render URL"
        );

        Ok(href)
    }
}
