//! URL signing
//!
//! Turns a canonical [`ParameterSet`] into one of three results:
//!
//! - [`Signature::Unsigned`]: neither strategy nor secret configured, rendered
//!   as the `_` placeholder
//! - [`Signature::Hmac`]: 16 hex characters of HMAC-SHA256
//! - [`Signature::Token`]: an HS256 token carrying the whole payload
//!
//! Signing input never includes the `__v` cache buster.

pub mod hmac;
pub mod jwt;

use std::fmt;
use std::str::FromStr;

use tracing::debug;

use crate::constants::{DEFAULT_PATH, UNSIGNED_PLACEHOLDER};
use crate::error::FlyyerError;
use crate::params::ParameterSet;

pub use self::hmac::{project_signing_input, render_signing_input, truncated_digest};
pub use self::jwt::{project_token, render_token, verify_token};

/// Signing strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    Hmac,
    Jwt,
}

impl Strategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Hmac => "HMAC",
            Self::Jwt => "JWT",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Strategy {
    type Err = FlyyerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("hmac") {
            Ok(Strategy::Hmac)
        } else if s.eq_ignore_ascii_case("jwt") {
            Ok(Strategy::Jwt)
        } else {
            Err(FlyyerError::UnknownStrategy(s.to_string()))
        }
    }
}

/// Routing fields of a render URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderRoute {
    pub deck: String,
    pub template: String,
    pub version: Option<u64>,
    pub extension: Option<String>,
}

/// What a signature is bound to besides the parameters
#[derive(Debug, Clone, Copy)]
pub enum SigningTarget<'a> {
    /// Project identifier and request path (normalised to start with `/`)
    Project { project: &'a str, path: &'a str },
    Render(&'a RenderRoute),
}

/// Resolved strategy with its secret
#[derive(Clone, PartialEq, Eq)]
pub struct Signer {
    strategy: Strategy,
    secret: String,
}

impl fmt::Debug for Signer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signer")
            .field("strategy", &self.strategy)
            .field("secret", &"<redacted>")
            .finish()
    }
}

impl Signer {
    pub fn new(strategy: Strategy, secret: impl Into<String>) -> Self {
        Self {
            strategy,
            secret: secret.into(),
        }
    }

    /// Resolve the caller's strategy/secret pair
    ///
    /// Both absent means unsigned (`Ok(None)`). One without the other, or an
    /// unrecognised strategy name, is an error.
    pub fn from_config(
        strategy: Option<&str>,
        secret: Option<&str>,
    ) -> Result<Option<Signer>, FlyyerError> {
        match (strategy, secret) {
            (None, None) => Ok(None),
            (Some(_), None) => Err(FlyyerError::MissingSecret),
            (None, Some(_)) => Err(FlyyerError::MissingStrategy),
            (Some(strategy), Some(secret)) => Ok(Some(Signer::new(strategy.parse()?, secret))),
        }
    }

    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    pub fn sign(
        &self,
        target: SigningTarget<'_>,
        params: &ParameterSet,
    ) -> Result<Signature, FlyyerError> {
        let signature = match (self.strategy, target) {
            (Strategy::Hmac, SigningTarget::Project { project, path }) => {
                let input = project_signing_input(project, &normalize_path(path), params);
                Signature::Hmac(truncated_digest(self.secret.as_bytes(), input.as_bytes()))
            }
            (Strategy::Hmac, SigningTarget::Render(route)) => {
                let input = render_signing_input(route, params);
                Signature::Hmac(truncated_digest(self.secret.as_bytes(), input.as_bytes()))
            }
            (Strategy::Jwt, SigningTarget::Project { path, .. }) => Signature::Token(
                project_token(&self.secret, &normalize_path(path), params)?,
            ),
            (Strategy::Jwt, SigningTarget::Render(route)) => {
                Signature::Token(render_token(&self.secret, route, params)?)
            }
        };

        debug!(
            strategy = %self.strategy,
            variables = params.variables().len(),
            "Signed parameters"
        );

        Ok(signature)
    }
}

/// Result of signing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Signature {
    Unsigned,
    Hmac(String),
    Token(String),
}

impl Signature {
    pub fn as_str(&self) -> &str {
        match self {
            Signature::Unsigned => UNSIGNED_PLACEHOLDER,
            Signature::Hmac(digest) => digest,
            Signature::Token(token) => token,
        }
    }

    pub fn is_signed(&self) -> bool {
        !matches!(self, Signature::Unsigned)
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sign parameters for a target, resolving the strategy/secret pair first
pub fn sign(
    strategy: Option<&str>,
    secret: Option<&str>,
    target: SigningTarget<'_>,
    params: &ParameterSet,
) -> Result<Signature, FlyyerError> {
    match Signer::from_config(strategy, secret)? {
        Some(signer) => signer.sign(target, params),
        None => Ok(Signature::Unsigned),
    }
}

/// Ensure a request path starts with `/`; absent paths become `/`
pub fn normalize_path(path: &str) -> String {
    if path.is_empty() {
        DEFAULT_PATH.to_string()
    } else if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{}", path)
    }
}
