#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use regdash_core::{UnknownRangePolicy, WeekStart};
use regdash_server::auth::Role;
use regdash_server::config;

#[test]
fn deny_unknown_fields_nested() {
    let bad = r#"
version: 1
loader:
  debounce_msec: 300 # typo should fail
"#;

    let err = config::load_from_str(bad).expect_err("must fail");
    assert_eq!(err.client_code().as_str(), "BAD_REQUEST");
}

#[test]
fn ok_minimal_config() {
    let cfg = config::load_from_str("version: 1\n").expect("must parse");
    assert_eq!(cfg.version, 1);
    assert_eq!(cfg.server.listen, "0.0.0.0:8080");
    assert_eq!(cfg.loader.debounce_ms, 300);
    assert_eq!(cfg.loader.default_page, 1);
    assert_eq!(cfg.loader.default_limit, 10);
    assert_eq!(cfg.loader.week_start, WeekStart::Monday);
    assert_eq!(cfg.loader.unknown_range, UnknownRangePolicy::Fallback);
    assert_eq!(cfg.form.total_steps, 4);
    assert!(cfg.auth.tokens.is_empty());
    assert!(cfg.seed.is_empty());
}

#[test]
fn full_config() {
    let ok = r#"
version: 1
server: { listen: "127.0.0.1:9000" }
loader:
  debounce_ms: 0
  default_limit: 25
  max_page_limit: 50
  week_start: sunday
  unknown_range: reject
  utc_offset_minutes: -300
auth:
  tokens:
    - { token: "t1", user_id: "alice", role: admin }
    - { token: "t2", user_id: "bob" }
form: { total_steps: 3 }
seed:
  - { full_name: "Ada", email: "ada@example.com", current_step: 3, created_at: "2024-01-10T09:00:00Z" }
"#;
    let cfg = config::load_from_str(ok).expect("must parse");
    assert_eq!(cfg.loader.week_start, WeekStart::Sunday);
    assert_eq!(cfg.loader.unknown_range, UnknownRangePolicy::Reject);
    assert_eq!(cfg.loader.utc_offset().unwrap().local_minus_utc(), -300 * 60);
    assert_eq!(cfg.auth.tokens[0].role, Role::Admin);
    assert_eq!(cfg.auth.tokens[1].role, Role::Viewer);
    assert_eq!(cfg.seed.len(), 1);
}

#[test]
fn unsupported_version() {
    let err = config::load_from_str("version: 2\n").expect_err("must fail");
    assert_eq!(err.client_code().as_str(), "UNSUPPORTED_VERSION");
}

#[test]
fn out_of_range_values() {
    let cases = [
        "version: 1\nloader: { debounce_ms: 10001 }\n",
        "version: 1\nloader: { max_page_limit: 0 }\n",
        "version: 1\nloader: { default_limit: 0 }\n",
        "version: 1\nloader: { default_limit: 200, max_page_limit: 100 }\n",
        "version: 1\nloader: { default_page: 0 }\n",
        "version: 1\nloader: { utc_offset_minutes: 900 }\n",
        "version: 1\nloader: { week_start: tuesday }\n",
        "version: 1\nform: { total_steps: 0 }\n",
        "version: 1\nauth: { tokens: [ { token: \"\", user_id: \"a\" } ] }\n",
        "version: 1\nauth: { tokens: [ { token: \"x\", user_id: \"a\" }, { token: \"x\", user_id: \"b\" } ] }\n",
        "version: 1\nseed: [ { full_name: \"Ada\", email: \"nope\", current_step: 1 } ]\n",
    ];
    for c in cases {
        let err = config::load_from_str(c).expect_err(c);
        assert_eq!(err.client_code().as_str(), "BAD_REQUEST", "{c}");
    }
}

#[test]
fn missing_file_is_internal() {
    let err = config::load_from_file("/nonexistent/regdash.yaml").expect_err("must fail");
    assert_eq!(err.client_code().as_str(), "INTERNAL");
}
