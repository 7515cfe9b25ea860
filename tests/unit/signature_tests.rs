// Signing unit tests

use flyyer::params::build_parameter_set;
use flyyer::signature::{
    render_signing_input, sign, verify_token, RenderRoute, Signature, SigningTarget,
};
use flyyer::{FlyyerError, Meta, MetaField, ParameterMap, ParameterValue};

const SECRET: &str = "sg1j0HVy9bsMihJqa8Qwu8ZYgCYHG0tx";

fn golden_meta() -> Meta {
    Meta::new()
        .with(MetaField::Id, "dev forgot to slugify")
        .with(MetaField::Width, "100")
        .with(MetaField::Height, 200)
}

fn title() -> ParameterMap {
    vec![("title", "Hello world!")].into_iter().collect()
}

#[test]
fn test_hmac_golden_vector_is_deterministic() {
    let target = SigningTarget::Project {
        project: "project",
        path: "/collections/col",
    };
    for _ in 0..3 {
        let params = build_parameter_set(&golden_meta(), &title(), false);
        let signature = sign(Some("HMAC"), Some(SECRET), target, &params).unwrap();
        assert_eq!(signature, Signature::Hmac("361b2a456daf8415".to_string()));
    }
}

#[test]
fn test_hmac_changes_with_path_and_project() {
    let params = build_parameter_set(&golden_meta(), &title(), true);
    let base = sign(
        Some("HMAC"),
        Some(SECRET),
        SigningTarget::Project { project: "project", path: "/a" },
        &params,
    )
    .unwrap();
    let other_path = sign(
        Some("HMAC"),
        Some(SECRET),
        SigningTarget::Project { project: "project", path: "/b" },
        &params,
    )
    .unwrap();
    let other_project = sign(
        Some("HMAC"),
        Some(SECRET),
        SigningTarget::Project { project: "other", path: "/a" },
        &params,
    )
    .unwrap();

    assert_ne!(base, other_path);
    assert_ne!(base, other_project);
}

#[test]
fn test_unsigned_sentinel() {
    let params = build_parameter_set(&Meta::new(), &ParameterMap::new(), false);
    let route = RenderRoute {
        deck: "d".to_string(),
        template: "t".to_string(),
        version: None,
        extension: None,
    };
    let signature = sign(None, None, SigningTarget::Render(&route), &params).unwrap();
    assert_eq!(signature.as_str(), "_");
}

#[test]
fn test_error_scenarios() {
    let params = build_parameter_set(&Meta::new(), &ParameterMap::new(), false);
    let target = SigningTarget::Project { project: "p", path: "/" };

    assert!(matches!(
        sign(Some("HMAC"), None, target, &params),
        Err(FlyyerError::MissingSecret)
    ));
    assert!(matches!(
        sign(None, Some(SECRET), target, &params),
        Err(FlyyerError::MissingStrategy)
    ));
    assert!(matches!(
        sign(Some("XYZ"), Some(SECRET), target, &params),
        Err(FlyyerError::UnknownStrategy(_))
    ));
}

#[test]
fn test_jwt_round_trip_matches_parameter_set() {
    let params = build_parameter_set(&golden_meta(), &title(), false);
    let signature = sign(
        Some("jwt"),
        Some(SECRET),
        SigningTarget::Project { project: "project", path: "collections/col" },
        &params,
    )
    .unwrap();

    let payload = verify_token(signature.as_str(), SECRET).unwrap();
    let derived = params.derived();

    assert_eq!(payload["path"], "/collections/col");
    assert_eq!(payload["params"]["i"], serde_json::to_value(&derived.id).unwrap());
    assert_eq!(payload["params"]["w"], serde_json::to_value(&derived.width).unwrap());
    assert_eq!(payload["params"]["h"], serde_json::to_value(&derived.height).unwrap());
    assert_eq!(
        payload["params"]["var"],
        serde_json::to_value(params.variables()).unwrap()
    );
    assert!(payload["params"].get("r").is_none());
    assert!(payload["params"].get("u").is_none());
}

#[test]
fn test_jwt_wrong_secret_is_rejected() {
    let params = build_parameter_set(&Meta::new(), &ParameterMap::new(), true);
    let signature = sign(
        Some("JWT"),
        Some(SECRET),
        SigningTarget::Project { project: "project", path: "/" },
        &params,
    )
    .unwrap();

    assert!(verify_token(signature.as_str(), SECRET).is_ok());
    assert!(verify_token(signature.as_str(), "sg1j0HVy9bsMihJqa8Qwu8ZYgCYHG0ty").is_err());
}

#[test]
fn test_render_signing_input_keeps_json_variable_order() {
    let variables = ParameterValue::from(serde_json::json!({"title": "T", "alpha": "A"}))
        .as_map()
        .cloned()
        .unwrap();
    let params = build_parameter_set(&Meta::new(), &variables, true);
    let route = RenderRoute {
        deck: "d".to_string(),
        template: "t".to_string(),
        version: None,
        extension: None,
    };

    assert_eq!(render_signing_input(&route, &params), "d#t###title=T&alpha=A");
}
