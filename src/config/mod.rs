// Configuration module

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::FlyyerError;
use crate::href::{ProjectUrl, RenderUrl};
use crate::params::{Meta, ParameterMap};
use crate::signature::Signer;

/// Project + path target
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct ProjectTarget {
    #[serde(default)]
    pub project: Option<String>,
    #[serde(default)]
    pub path: Option<String>,
    /// Fallback image (`default` in the file)
    #[serde(default, rename = "default", skip_serializing_if = "Option::is_none")]
    pub default_image: Option<String>,
}

/// Tenant/deck/template target
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct RenderTarget {
    #[serde(default)]
    pub tenant: Option<String>,
    #[serde(default)]
    pub deck: Option<String>,
    #[serde(default)]
    pub template: Option<String>,
    #[serde(default)]
    pub version: Option<u64>,
    #[serde(default)]
    pub extension: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// `HMAC` or `JWT`, case-insensitive
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strategy: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project: Option<ProjectTarget>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub render: Option<RenderTarget>,
    #[serde(default)]
    pub meta: Meta,
    #[serde(default)]
    pub variables: ParameterMap,
}

/// URL builder selected by a [`Config`]
#[derive(Debug, Clone)]
pub enum UrlBuilder {
    Project(ProjectUrl),
    Render(RenderUrl),
}

impl UrlBuilder {
    pub fn href(&self) -> Result<String, FlyyerError> {
        match self {
            UrlBuilder::Project(url) => url.href(),
            UrlBuilder::Render(url) => url.href(),
        }
    }
}

impl Config {
    pub fn from_yaml_with_env(yaml: &str) -> Result<Self, FlyyerError> {
        // Replace ${VAR_NAME} with environment variable values
        let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
            .map_err(|e| FlyyerError::Config(e.to_string()))?;

        let mut missing = None;
        let substituted = re.replace_all(yaml, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| {
                missing.get_or_insert_with(|| var_name.to_string());
                String::new()
            })
        });

        if let Some(var_name) = missing {
            return Err(FlyyerError::Config(format!(
                "Environment variable '{}' is referenced but not set",
                var_name
            )));
        }

        serde_yaml::from_str(&substituted).map_err(|e| FlyyerError::Config(e.to_string()))
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, FlyyerError> {
        let yaml = std::fs::read_to_string(path)
            .map_err(|e| FlyyerError::Config(format!("Failed to read config file: {}", e)))?;
        Self::from_yaml_with_env(&yaml)
    }

    pub fn validate(&self) -> Result<(), FlyyerError> {
        match (&self.project, &self.render) {
            (Some(_), Some(_)) => {
                return Err(FlyyerError::Config(
                    "Only one of `project` or `render` may be configured".to_string(),
                ))
            }
            (None, None) => {
                return Err(FlyyerError::Config(
                    "One of `project` or `render` must be configured".to_string(),
                ))
            }
            _ => {}
        }

        Signer::from_config(self.strategy.as_deref(), self.secret.as_deref())?;
        Ok(())
    }

    /// Builder for the configured target
    pub fn url_builder(&self) -> Result<UrlBuilder, FlyyerError> {
        self.validate()?;

        if let Some(project) = &self.project {
            return Ok(UrlBuilder::Project(ProjectUrl {
                project: project.project.clone(),
                path: project.path.clone(),
                default_image: project.default_image.clone(),
                variables: self.variables.clone(),
                meta: self.meta.clone(),
                secret: self.secret.clone(),
                strategy: self.strategy.clone(),
            }));
        }

        let render = self.render.clone().unwrap_or_default();
        Ok(UrlBuilder::Render(RenderUrl {
            tenant: render.tenant,
            deck: render.deck,
            template: render.template,
            version: render.version,
            extension: render.extension,
            variables: self.variables.clone(),
            meta: self.meta.clone(),
            secret: self.secret.clone(),
            strategy: self.strategy.clone(),
        }))
    }

    pub fn href(&self) -> Result<String, FlyyerError> {
        self.url_builder()?.href()
    }
}
