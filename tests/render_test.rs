//! Rendering tests
//!
//! Tests the full pipeline: placeholders → Template → render(context)

use pretty_assertions::assert_eq;
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;
use typelit::kinds::{self, bigint, boolean, date, json, number, string};
use typelit::{typelit, FixSuggestion, Placeholder, Template, TypelitError};

// ═══════════════════════════════════════════════════════════════
// Basic Rendering
// ═══════════════════════════════════════════════════════════════

#[test]
fn hello_world() {
    let template = typelit!("Hello ", string("hello"), "!").unwrap();
    assert_eq!(template.render(&json!({"hello": "World"})).unwrap(), "Hello World!");
    assert_eq!(template.render(&json!({"hello": ""})).unwrap(), "Hello !");
    assert_eq!(template.render(&json!({"hello": "Alice"})).unwrap(), "Hello Alice!");
}

#[test]
fn session_end_to_end() {
    let template = typelit!(
        "Hi ",
        string(["session", "user", "name"]),
        ", you are ",
        number(["session", "user", "age"]),
        ". Your session token is ",
        string(["session", "token"]),
        "."
    )
    .unwrap();

    let ctx = json!({
        "session": {
            "user": {"name": "Toto", "age": 23},
            "token": "asdgfhjkasdgfjk"
        }
    });
    assert_eq!(
        template.render(&ctx).unwrap(),
        "Hi Toto, you are 23. Your session token is asdgfhjkasdgfjk."
    );
}

#[test]
fn render_from_serialize_struct() {
    #[derive(Serialize)]
    struct User {
        name: String,
        age: u32,
    }
    #[derive(Serialize)]
    struct Session {
        user: User,
        token: String,
    }
    #[derive(Serialize)]
    struct Ctx {
        session: Session,
    }

    let template = typelit!(
        string(["session", "user", "name"]),
        " (",
        number(["session", "user", "age"]),
        ") ",
        string(["session", "token"])
    )
    .unwrap();
    let ctx = Ctx {
        session: Session {
            user: User {
                name: "Toto".to_string(),
                age: 23,
            },
            token: "t0k".to_string(),
        },
    };
    assert_eq!(template.render(&ctx).unwrap(), "Toto (23) t0k");
}

#[test]
fn zero_placeholders_ignore_input() {
    let template = typelit!("just text").unwrap();
    assert_eq!(template.render(&json!(null)).unwrap(), "just text");
    assert_eq!(template.render(&json!({"anything": [1, 2]})).unwrap(), "just text");
    assert_eq!(template.render(&42).unwrap(), "just text");
    assert_eq!(template.fragments(), ["just text"]);
}

#[test]
fn empty_template() {
    let template = typelit!().unwrap();
    assert_eq!(template.render(&json!({})).unwrap(), "");
}

#[test]
fn placeholders_render_in_order_with_repeats() {
    let template = typelit!(string("a"), "-", string("b"), "-", string("a")).unwrap();
    assert_eq!(template.render(&json!({"a": "1", "b": "2"})).unwrap(), "1-2-1");
}

#[test]
fn template_new_with_explicit_parts() {
    let placeholders: Vec<Arc<dyn Placeholder>> = vec![
        string("first").unwrap().into_placeholder(),
        string("last").unwrap().into_placeholder(),
    ];
    let template = Template::new(
        vec!["<".to_string(), " ".to_string(), ">".to_string()],
        placeholders,
    )
    .unwrap();
    assert_eq!(
        template.render(&json!({"first": "Ada", "last": "Lovelace"})).unwrap(),
        "<Ada Lovelace>"
    );
}

#[test]
fn extra_context_keys_are_ignored() {
    let template = typelit!(string(["user", "name"])).unwrap();
    let ctx = json!({"user": {"name": "Ada", "email": "ada@example.com"}, "other": 1});
    assert_eq!(template.render(&ctx).unwrap(), "Ada");
}

// ═══════════════════════════════════════════════════════════════
// Built-in Kinds
// ═══════════════════════════════════════════════════════════════

#[test]
fn number_coercion() {
    let template = typelit!(number("n")).unwrap();
    let cases = [
        (json!(0), "0"),
        (json!(1138), "1138"),
        (json!(-1), "-1"),
        (json!(2.5), "2.5"),
        (json!(std::f64::consts::PI), "3.141592653589793"),
    ];
    for (value, expected) in cases {
        assert_eq!(template.render(&json!({ "n": value })).unwrap(), expected);
    }
}

#[test]
fn boolean_coercion() {
    let template = typelit!(boolean("b")).unwrap();
    assert_eq!(template.render(&json!({"b": true})).unwrap(), "true");
    assert_eq!(template.render(&json!({"b": false})).unwrap(), "false");
}

#[test]
fn bigint_coercion() {
    let template = typelit!(bigint("n")).unwrap();
    assert_eq!(
        template.render(&json!({"n": 9007199254740991_i64})).unwrap(),
        "9007199254740991"
    );
    assert_eq!(
        template.render(&json!({"n": u64::MAX})).unwrap(),
        "18446744073709551615"
    );
}

#[test]
fn bigint_i128_round_trip() {
    #[derive(Serialize)]
    struct Ledger {
        big: i128,
        small: i128,
    }

    let template = typelit!(bigint("big"), " ", bigint("small")).unwrap();
    let ctx = Ledger {
        big: i128::MAX,
        small: i128::MIN,
    };
    assert_eq!(
        template.render(&ctx).unwrap(),
        format!("{} {}", i128::MAX, i128::MIN)
    );

    let parsed: serde_json::Value =
        serde_json::from_str(r#"{"big":170141183460469231731687303715884105727,"small":0}"#)
            .unwrap();
    assert_eq!(
        template.render(&parsed).unwrap(),
        "170141183460469231731687303715884105727 0"
    );
}

#[test]
fn bigint_beyond_i128_is_mismatch() {
    let template = typelit!(bigint("n")).unwrap();
    let ctx: serde_json::Value =
        serde_json::from_str(r#"{"n":170141183460469231731687303715884105728}"#).unwrap();
    let err = template.render(&ctx).unwrap_err();
    assert_eq!(err.code(), "TYPELIT-032");
    assert!(err.to_string().contains("out of range"));
}

#[test]
fn number_exponent_form() {
    let template = typelit!(number("n")).unwrap();
    assert_eq!(template.render(&json!({"n": 1e21})).unwrap(), "1e+21");
    assert_eq!(template.render(&json!({"n": 1e-7})).unwrap(), "1e-7");
}

#[test]
fn date_formatting() {
    let template = typelit!("at ", date("at")).unwrap();
    assert_eq!(
        template.render(&json!({"at": "2006-01-02T08:04:05Z"})).unwrap(),
        "at Mon Jan 02 2006 08:04:05 GMT+0000 (Coordinated Universal Time)"
    );
}

#[test]
fn date_with_offset_is_normalized_to_utc() {
    let template = typelit!(date("at")).unwrap();
    assert_eq!(
        template.render(&json!({"at": "2006-01-02T10:04:05+02:00"})).unwrap(),
        "Mon Jan 02 2006 08:04:05 GMT+0000 (Coordinated Universal Time)"
    );
}

#[test]
fn json_uses_two_space_indent() {
    let template = typelit!("data: ", json("data")).unwrap();
    let rendered = template
        .render(&json!({"data": {"name": "Ada", "tags": ["a", "b"]}}))
        .unwrap();
    assert_eq!(
        rendered,
        "data: {\n  \"name\": \"Ada\",\n  \"tags\": [\n    \"a\",\n    \"b\"\n  ]\n}"
    );
}

#[test]
fn json_scalars() {
    let template = typelit!(json("v")).unwrap();
    assert_eq!(template.render(&json!({"v": null})).unwrap(), "null");
    assert_eq!(template.render(&json!({"v": "x"})).unwrap(), "\"x\"");
    assert_eq!(template.render(&json!({"v": []})).unwrap(), "[]");
}

#[test]
fn shared_kind_statics() {
    let name = kinds::STRING.var("name").unwrap();
    let template = typelit!(&name, "/", &name).unwrap();
    assert_eq!(template.render(&json!({"name": "x"})).unwrap(), "x/x");
    assert_eq!(name.leaf(), kinds::STRING.leaf());
}

// ═══════════════════════════════════════════════════════════════
// Render Errors
// ═══════════════════════════════════════════════════════════════

#[test]
fn missing_path_errors() {
    let template = typelit!(string(["user", "name"])).unwrap();
    let err = template.render(&json!({"user": {}})).unwrap_err();
    match &err {
        TypelitError::PathNotFound { path, full_path } => {
            assert_eq!(path, "user.name");
            assert_eq!(full_path, "user.name");
        }
        other => panic!("expected PathNotFound, got {other}"),
    }
    assert!(err.is_context_error());
    assert!(err.fix_suggestion().is_some());
}

#[test]
fn missing_top_level_errors() {
    let template = typelit!(string(["user", "name"])).unwrap();
    let err = template.render(&json!({})).unwrap_err();
    assert!(matches!(err, TypelitError::PathNotFound { ref path, .. } if path == "user"));
}

#[test]
fn traversal_through_primitive_errors() {
    let template = typelit!(string(["price", "currency"])).unwrap();
    let err = template.render(&json!({"price": 12})).unwrap_err();
    match err {
        TypelitError::InvalidTraversal {
            segment,
            value_type,
            full_path,
        } => {
            assert_eq!(segment, "currency");
            assert_eq!(value_type, "number");
            assert_eq!(full_path, "price.currency");
        }
        other => panic!("expected InvalidTraversal, got {other}"),
    }
}

#[test]
fn arrays_are_not_indexed() {
    let template = typelit!(string(["items", "0"])).unwrap();
    let err = template.render(&json!({"items": ["first"]})).unwrap_err();
    assert_eq!(err.code(), "TYPELIT-031");

    assert_eq!(template.render(&json!({"items": {"0": "first"}})).unwrap(), "first");
}

#[test]
fn leaf_type_mismatch_errors() {
    let template = typelit!("Age: ", number("age")).unwrap();
    let err = template.render(&json!({"age": "23"})).unwrap_err();
    match err {
        TypelitError::LeafTypeMismatch {
            path,
            expected,
            details,
        } => {
            assert_eq!(path, "age");
            assert_eq!(expected, "number");
            assert_eq!(details, "found string");
        }
        other => panic!("expected LeafTypeMismatch, got {other}"),
    }
}

#[test]
fn null_is_not_a_string() {
    let template = typelit!(string("name")).unwrap();
    let err = template.render(&json!({"name": null})).unwrap_err();
    assert_eq!(err.code(), "TYPELIT-032");
}

#[test]
fn non_string_map_keys_fail_serialization() {
    use std::collections::BTreeMap;

    let template = typelit!(string("a")).unwrap();
    let mut ctx = BTreeMap::new();
    ctx.insert(vec![1u8], "x");
    let err = template.render(&ctx).unwrap_err();
    assert_eq!(err.code(), "TYPELIT-033");
}

#[test]
fn invalid_paths_fail_build() {
    let err = typelit!(string(Vec::<String>::new())).unwrap_err();
    assert_eq!(err.code(), "TYPELIT-001");

    let err = typelit!(string(typelit::Path::dotted("a..b"))).unwrap_err();
    assert_eq!(err.code(), "TYPELIT-002");
}

#[test]
fn fragment_count_mismatch() {
    let err = Template::new(
        vec!["only".to_string(), "two".to_string(), "three".to_string()],
        vec![string("x").unwrap().into_placeholder()],
    )
    .unwrap_err();
    assert!(matches!(
        err,
        TypelitError::FragmentCountMismatch {
            fragments: 3,
            placeholders: 1
        }
    ));
}

// ═══════════════════════════════════════════════════════════════
// Concurrency
// ═══════════════════════════════════════════════════════════════

#[test]
fn concurrent_renders() {
    let template = typelit!("#", number("i")).unwrap();
    let handles: Vec<_> = (0..8)
        .map(|i| {
            let template = template.clone();
            std::thread::spawn(move || template.render(&json!({ "i": i })).unwrap())
        })
        .collect();
    let rendered: Vec<String> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert_eq!(rendered, (0..8).map(|i| format!("#{i}")).collect::<Vec<_>>());
}

// ═══════════════════════════════════════════════════════════════
// Logging
// ═══════════════════════════════════════════════════════════════

#[test]
fn build_and_render_under_subscriber() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new("typelit=trace"))
        .with_test_writer()
        .try_init();

    let template = typelit!("v=", json("v")).unwrap();
    assert_eq!(template.render(&json!({"v": 1})).unwrap(), "v=1");
    assert!(typelit!(string("v"), number("v")).is_err());
}
