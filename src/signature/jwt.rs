//! HS256 token payloads
//!
//! The remote decoder reads short claim names. Two payload shapes exist:
//!
//! - project: `{"params": {i, w, h, r, u, def, var}, "path": "/..."}`, absent
//!   meta fields omitted
//! - render: `{d, t, v, e, i, w, h, r, u, var}`, absent fields as `null`
//!
//! The cache buster is never part of a payload.

use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::Serialize;

use crate::error::FlyyerError;
use crate::params::{ParameterMap, ParameterSet, ParameterValue};

use super::RenderRoute;

#[derive(Debug, Serialize)]
struct ProjectParams<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    i: Option<&'a ParameterValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    w: Option<&'a ParameterValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    h: Option<&'a ParameterValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    r: Option<&'a ParameterValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    u: Option<&'a ParameterValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    def: Option<&'a ParameterValue>,
    var: &'a ParameterMap,
}

#[derive(Debug, Serialize)]
struct ProjectClaims<'a> {
    params: ProjectParams<'a>,
    path: &'a str,
}

#[derive(Debug, Serialize)]
struct RenderClaims<'a> {
    d: &'a str,
    t: &'a str,
    v: Option<u64>,
    e: Option<&'a str>,
    i: &'a ParameterValue,
    w: &'a ParameterValue,
    h: &'a ParameterValue,
    r: &'a ParameterValue,
    u: &'a ParameterValue,
    var: &'a ParameterMap,
}

fn encode_claims<T: Serialize>(claims: &T, secret: &str) -> Result<String, FlyyerError> {
    let token = encode(
        &Header::new(Algorithm::HS256),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?;
    Ok(token)
}

/// Token for a project URL
pub fn project_token(
    secret: &str,
    path: &str,
    params: &ParameterSet,
) -> Result<String, FlyyerError> {
    let derived = params.derived();
    let claims = ProjectClaims {
        params: ProjectParams {
            i: derived.id.non_null(),
            w: derived.width.non_null(),
            h: derived.height.non_null(),
            r: derived.resolution.non_null(),
            u: derived.agent.non_null(),
            def: derived.default_image.as_ref().and_then(ParameterValue::non_null),
            var: params.variables(),
        },
        path,
    };
    encode_claims(&claims, secret)
}

/// Token for a render URL
pub fn render_token(
    secret: &str,
    route: &RenderRoute,
    params: &ParameterSet,
) -> Result<String, FlyyerError> {
    let derived = params.derived();
    let claims = RenderClaims {
        d: &route.deck,
        t: &route.template,
        v: route.version,
        e: route.extension.as_deref(),
        i: &derived.id,
        w: &derived.width,
        h: &derived.height,
        r: &derived.resolution,
        u: &derived.agent,
        var: params.variables(),
    };
    encode_claims(&claims, secret)
}

/// Verify an HS256 token and return its payload
///
/// Payloads carry no registered claims, so expiry and not-before checks are
/// disabled.
pub fn verify_token(token: &str, secret: &str) -> Result<serde_json::Value, FlyyerError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = false;
    validation.validate_nbf = false;
    validation.required_spec_claims.clear();

    let data = decode::<serde_json::Value>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )?;
    Ok(data.claims)
}
