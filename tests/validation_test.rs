//! Opt-in context validation and template options

use pretty_assertions::assert_eq;
use serde_json::json;
use std::fs;
use tempfile::TempDir;
use typelit::kinds::{bigint, date, json, number, string};
use typelit::{
    typelit, FixSuggestion, Template, TemplateOptions, TypelitError, Validation, ViolationKind,
};

fn session_template(options: TemplateOptions) -> Template {
    Template::builder()
        .text("Hi ")
        .var(string(["session", "user", "name"]))
        .text(", you are ")
        .var(number(["session", "user", "age"]))
        .text(". Token: ")
        .var(string(["session", "token"]))
        .options(options)
        .build()
        .unwrap()
}

// ═══════════════════════════════════════════════════════════════
// Explicit Validation
// ═══════════════════════════════════════════════════════════════

#[test]
fn validate_reports_every_violation() {
    let template = session_template(TemplateOptions::default());
    let ctx = json!({"session": {"user": {"name": 7}}});
    let err = template.validate(&ctx).unwrap_err();

    let errors = match &err {
        TypelitError::ContextInvalid { errors } => errors,
        other => panic!("expected ContextInvalid, got {other}"),
    };
    assert_eq!(errors.len(), 3);
    assert!(errors.iter().any(|e| e.path == "/session"
        && e.kind
            == ViolationKind::MissingRequired {
                field: "token".to_string()
            }));
    assert!(errors.iter().any(|e| e.path == "/session/user"
        && e.kind
            == ViolationKind::MissingRequired {
                field: "age".to_string()
            }));
    assert!(errors
        .iter()
        .any(|e| e.path == "/session/user/name"
            && matches!(e.kind, ViolationKind::TypeMismatch { .. })));
    assert!(err.to_string().starts_with("[TYPELIT-040] Context does not match template: 3 errors"));
    assert!(err.fix_suggestion().is_some());
}

#[test]
fn validate_accepts_well_formed_context() {
    let template = session_template(TemplateOptions::default());
    let ctx = json!({"session": {"user": {"name": "Toto", "age": 23}, "token": "t"}});
    assert!(template.validate(&ctx).is_ok());
}

#[test]
fn bigint_schema_rejects_fractions() {
    let template = typelit!(bigint("n")).unwrap();
    assert!(template.validate(&json!({"n": 3})).is_ok());
    let err = template.validate(&json!({"n": 3.5})).unwrap_err();
    assert_eq!(err.code(), "TYPELIT-040");
}

#[test]
fn bigint_integral_floats_validate_and_render() {
    let template = typelit!(bigint("n")).unwrap();
    let ctx = json!({"n": 3.0});
    assert!(template.validate(&ctx).is_ok());
    assert_eq!(template.render(&ctx).unwrap(), "3");
}

#[test]
fn bigint_i128_bounds() {
    let template = typelit!(bigint("n")).unwrap();
    let max: serde_json::Value =
        serde_json::from_str(&format!("{{\"n\": {}}}", i128::MAX)).unwrap();
    assert!(template.validate(&max).is_ok());
    assert_eq!(template.render(&max).unwrap(), i128::MAX.to_string());

    let huge = json!({"n": 1e300});
    assert!(template.validate(&huge).is_err());
    assert!(template.render(&huge).is_err());
}

#[test]
fn invalid_date_fails_validation() {
    let template = typelit!(date("at")).unwrap();
    let err = template.validate(&json!({"at": "yesterday"})).unwrap_err();
    match err {
        TypelitError::ContextInvalid { errors } => {
            assert_eq!(errors.len(), 1);
            assert_eq!(errors[0].path, "/at");
        }
        other => panic!("expected ContextInvalid, got {other}"),
    }
    assert!(template.render(&json!({"at": "yesterday"})).is_err());

    let ok = json!({"at": "2006-01-02T08:04:05Z"});
    assert!(template.validate(&ok).is_ok());
    assert!(template.render(&ok).is_ok());
}

#[test]
fn json_leaf_accepts_anything() {
    let template = typelit!(json("data")).unwrap();
    assert!(template.validate(&json!({"data": null})).is_ok());
    assert!(template.validate(&json!({"data": [1, {"x": 2}]})).is_ok());
    assert!(template.validate(&json!({})).is_err());
}

// ═══════════════════════════════════════════════════════════════
// Validation on Render
// ═══════════════════════════════════════════════════════════════

#[test]
fn on_render_validation_runs_before_extraction() {
    let template = session_template(TemplateOptions::default().validation(Validation::OnRender));
    let err = template.render(&json!({"session": {}})).unwrap_err();
    assert_eq!(err.code(), "TYPELIT-040");

    let off = session_template(TemplateOptions::default());
    let err = off.render(&json!({"session": {}})).unwrap_err();
    assert_eq!(err.code(), "TYPELIT-030");
}

#[test]
fn on_render_validation_passes_good_context() {
    let template = session_template(TemplateOptions::default().validation(Validation::OnRender));
    let ctx = json!({"session": {"user": {"name": "Toto", "age": 23}, "token": "abc"}});
    assert_eq!(
        template.render(&ctx).unwrap(),
        "Hi Toto, you are 23. Token: abc"
    );
}

// ═══════════════════════════════════════════════════════════════
// Options Loading
// ═══════════════════════════════════════════════════════════════

#[test]
fn options_from_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("typelit.toml");
    fs::write(&path, "validation = \"render\"\ncapacity_hint = 32\n").unwrap();

    let options = TemplateOptions::load(&path).unwrap();
    assert_eq!(options.validation, Validation::OnRender);
    assert_eq!(options.capacity_hint, 32);

    let template = session_template(options);
    assert_eq!(template.options().validation, Validation::OnRender);
}

#[test]
fn options_file_parse_error() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("typelit.toml");
    fs::write(&path, "capacity_hint = \"big\"").unwrap();

    let err = TemplateOptions::load(&path).unwrap_err();
    assert_eq!(err.code(), "TYPELIT-050");
}

#[test]
fn env_overrides_apply_over_file_values() {
    let options = TemplateOptions::from_toml_str("capacity_hint = 8")
        .unwrap()
        .with_env_from(|key| (key == "TYPELIT_VALIDATION").then(|| "on_render".to_string()))
        .unwrap();
    assert_eq!(options.validation, Validation::OnRender);
    assert_eq!(options.capacity_hint, 8);
}
