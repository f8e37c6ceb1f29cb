// txn-namer-core/tests/namer_integration_tests.rs
use anyhow::Result;

use txn_namer_core::{
    NamerConfig, NamePriority, StaticRequest, TransactionNamer, ATTR_CUSTOM_REQUEST_REFERER,
    ATTR_CUSTOM_REQUEST_URI, ATTR_REQUEST_REFERER, ATTR_REQUEST_URI,
};

fn namer_from(yaml: &str) -> Result<TransactionNamer> {
    Ok(TransactionNamer::new(&NamerConfig::from_yaml_str(yaml)?))
}

#[test_log::test]
fn full_pipeline_groups_obfuscates_and_appends() -> Result<()> {
    let namer = namer_from(
        r#"
httpservlet_transaction_namer:
  name_grouper:
    enabled: true
    patterns:
      - "(/user/\\d+)"
  name_obfuscator:
    enabled: true
    patterns:
      - "/user/<id>"
  append_parameters:
    enabled: true
    parameters:
      - name: X-Req-Id
        type: header
      - name: sid
        type: cookie
"#,
    )?;

    let request = StaticRequest::new("/user/77/profile")
        .with_header("X-Req-Id", "abc")
        .with_cookie("sid", "s-1");
    let result = namer.name(&request);

    let name = result.name.expect("pipeline should produce a name");
    assert_eq!(name.components, vec!["HTTPServlet", "/user/<id>", "abc/s-1"]);
    assert_eq!(name.priority, NamePriority::CustomHigh);
    assert_eq!(result.attributes[ATTR_REQUEST_URI], "/user/<id>");
    assert_eq!(result.attributes[ATTR_CUSTOM_REQUEST_URI], "/user/<id>");
    Ok(())
}

#[test]
fn name_has_two_components_without_appended_parameters() -> Result<()> {
    let namer = namer_from(
        r#"
httpservlet_transaction_namer:
  name_obfuscator:
    enabled: true
    patterns: ["/orders/<id>"]
  append_parameters:
    enabled: true
    parameters:
      - name: X-Req-Id
        type: header
"#,
    )?;

    // The declared header is absent, so no suffix component is produced.
    let result = namer.name(&StaticRequest::new("/orders/42"));
    let name = result.name.unwrap();
    assert_eq!(name.components, vec!["HTTPServlet", "/orders/<id>"]);
    Ok(())
}

#[test]
fn referer_is_obfuscated_independently() -> Result<()> {
    let namer = namer_from(
        r#"
httpservlet_transaction_namer:
  name_obfuscator:
    enabled: true
    patterns:
      - "(?<obfuscatedVin>[A-Za-z\\d]{11}\\d{6})"
"#,
    )?;

    let request = StaticRequest::new("/vehicleimage/WV1ZZZ7HZHH161837")
        .with_header("Referer", "/compare/WV1ZZZ7HZHH161838");
    let result = namer.name(&request);

    assert_eq!(
        result.attributes[ATTR_REQUEST_URI],
        "/vehicleimage/<obfuscatedVin>"
    );
    assert_eq!(
        result.attributes[ATTR_REQUEST_REFERER],
        "/compare/<obfuscatedVin>"
    );
    assert_eq!(
        result.attributes[ATTR_CUSTOM_REQUEST_REFERER],
        "/compare/<obfuscatedVin>"
    );
    Ok(())
}

#[test]
fn no_referer_emits_only_uri_attributes() -> Result<()> {
    let namer = namer_from(
        r#"
httpservlet_transaction_namer:
  name_obfuscator:
    enabled: true
    patterns: ["/orders/<id>"]
"#,
    )?;

    let result = namer.name(&StaticRequest::new("/orders/42"));
    assert_eq!(result.attributes.len(), 2);
    assert!(result.attributes.contains_key(ATTR_REQUEST_URI));
    assert!(result.attributes.contains_key(ATTR_CUSTOM_REQUEST_URI));
    Ok(())
}

#[test]
fn disabled_obfuscation_emits_no_attributes() -> Result<()> {
    let namer = namer_from(
        r#"
httpservlet_transaction_namer:
  name_grouper:
    enabled: true
    patterns: ["(/user/\\d+)"]
"#,
    )?;

    let result = namer.name(&StaticRequest::new("/user/12"));
    assert!(result.attributes.is_empty());
    assert_eq!(
        result.name.unwrap().components,
        vec!["HTTPServlet", "/user/12"]
    );
    Ok(())
}

#[test]
fn grouped_uri_feeds_the_obfuscator() -> Result<()> {
    let namer = namer_from(
        r#"
httpservlet_transaction_namer:
  name_grouper:
    enabled: true
    patterns: ["(/api/v\\d+/orders/\\d+)"]
  name_obfuscator:
    enabled: true
    patterns: ["/api/<version>/orders/<id>"]
"#,
    )?;

    let result = namer.name(&StaticRequest::new("/api/v2/orders/42/lines?page=3"));
    assert_eq!(
        result.name.unwrap().components,
        vec!["HTTPServlet", "/api/<version>/orders/<id>"]
    );
    Ok(())
}

// Conformance pin for the leading-slash decision: a single leading '/' is
// stripped before segment splitting and re-prepended to the output, and
// relative URIs never grow one.
#[test]
fn obfuscates_with_and_without_leading_slash() -> Result<()> {
    let namer = namer_from(
        r#"
httpservlet_transaction_namer:
  name_obfuscator:
    enabled: true
    patterns: ["orders/<id>"]
"#,
    )?;

    let absolute = namer.name(&StaticRequest::new("/orders/42"));
    assert_eq!(
        absolute.name.unwrap().components,
        vec!["HTTPServlet", "/orders/<id>"]
    );

    let relative = namer.name(&StaticRequest::new("orders/42"));
    assert_eq!(
        relative.name.unwrap().components,
        vec!["HTTPServlet", "orders/<id>"]
    );
    Ok(())
}

#[test]
fn unmatched_rules_degrade_to_identity() -> Result<()> {
    let namer = namer_from(
        r#"
httpservlet_transaction_namer:
  name_grouper:
    enabled: true
    patterns: ["/checkout/(\\d+)"]
  name_obfuscator:
    enabled: true
    patterns: ["/checkout/<id>"]
"#,
    )?;

    let result = namer.name(&StaticRequest::new("/health"));
    assert_eq!(result.name.unwrap().components, vec!["HTTPServlet", "/health"]);
    assert_eq!(result.attributes[ATTR_REQUEST_URI], "/health");
    Ok(())
}

#[test_log::test]
fn invalid_rule_is_skipped_and_later_rules_still_apply() -> Result<()> {
    let namer = namer_from(
        r#"
httpservlet_transaction_namer:
  name_obfuscator:
    enabled: true
    patterns:
      - "/broken/["
      - "/orders/<id>"
"#,
    )?;

    let result = namer.name(&StaticRequest::new("/orders/42"));
    assert_eq!(
        result.name.unwrap().components,
        vec!["HTTPServlet", "/orders/<id>"]
    );
    Ok(())
}

// Exact single-pass behavior only: re-applying a namer to its own output is
// not guaranteed to be a fixed point.
#[test]
fn obfuscation_is_single_pass() -> Result<()> {
    let namer = namer_from(
        r#"
httpservlet_transaction_namer:
  name_obfuscator:
    enabled: true
    patterns: ["/orders/<id>"]
"#,
    )?;

    let first = namer.name(&StaticRequest::new("/orders/42"));
    assert_eq!(first.attributes[ATTR_REQUEST_URI], "/orders/<id>");
    Ok(())
}
