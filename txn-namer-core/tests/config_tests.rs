// txn-namer-core/tests/config_tests.rs
use anyhow::Result;
use std::io::Write;
use tempfile::NamedTempFile;

use txn_namer_core::config::NamerConfig;

#[test]
fn test_load_from_file() -> Result<()> {
    let yaml_content = r#"
httpservlet_transaction_namer:
  name_grouper:
    enabled: true
    patterns:
      - "/user/(\\d+)"
  name_obfuscator:
    enabled: true
    patterns:
      - "/orders/<id>"
      - "(?<vin>[A-Za-z\\d]{11}\\d{6})"
  append_parameters:
    enabled: true
    parameters:
      - name: X-Req-Id
        type: header
      - name: sid
        type: cookie
"#;
    let mut file = NamedTempFile::new()?;
    file.write_all(yaml_content.as_bytes())?;
    let config = NamerConfig::load_from_file(file.path())?;

    assert_eq!(config.name_grouper.pattern_strings(), vec![r"/user/(\d+)"]);
    assert_eq!(
        config.name_obfuscator.pattern_strings(),
        vec!["/orders/<id>", r"(?<vin>[A-Za-z\d]{11}\d{6})"]
    );
    let decls = config.append_parameters.declarations();
    assert_eq!(decls.len(), 2);
    assert_eq!(decls[0].name.as_deref(), Some("X-Req-Id"));
    assert_eq!(decls[0].kind.as_deref(), Some("header"));
    Ok(())
}

#[test]
fn test_patterns_accept_space_delimited_string() -> Result<()> {
    let config = NamerConfig::from_yaml_str(
        r#"
httpservlet_transaction_namer:
  name_obfuscator:
    enabled: true
    patterns: "/orders/<id> /user/<uid>"
"#,
    )?;
    assert_eq!(
        config.name_obfuscator.pattern_strings(),
        vec!["/orders/<id>", "/user/<uid>"]
    );
    Ok(())
}

#[test]
fn test_enabled_accepts_string_values() -> Result<()> {
    let config = NamerConfig::from_yaml_str(
        r#"
httpservlet_transaction_namer:
  name_grouper:
    enabled: "True"
    patterns: ["/a/(\\d+)"]
  name_obfuscator:
    enabled: "yes"
    patterns: ["/b/<x>"]
"#,
    )?;
    // "True" reads as enabled; any other string reads as disabled.
    assert_eq!(config.name_grouper.pattern_strings(), vec![r"/a/(\d+)"]);
    assert!(config.name_obfuscator.pattern_strings().is_empty());
    Ok(())
}

#[test]
fn test_absent_section_disables_everything() -> Result<()> {
    let config = NamerConfig::from_yaml_str("other_section:\n  key: value\n")?;
    assert!(config.name_grouper.pattern_strings().is_empty());
    assert!(config.name_obfuscator.pattern_strings().is_empty());
    assert!(config.append_parameters.declarations().is_empty());
    Ok(())
}

#[test]
fn test_enabled_without_patterns_is_a_noop() -> Result<()> {
    let config = NamerConfig::from_yaml_str(
        r#"
httpservlet_transaction_namer:
  name_obfuscator:
    enabled: true
"#,
    )?;
    assert!(config.name_obfuscator.pattern_strings().is_empty());
    Ok(())
}

#[test]
fn test_disabled_feature_ignores_its_patterns() -> Result<()> {
    let config = NamerConfig::from_yaml_str(
        r#"
httpservlet_transaction_namer:
  name_grouper:
    enabled: false
    patterns: ["/user/(\\d+)"]
"#,
    )?;
    assert!(config.name_grouper.pattern_strings().is_empty());
    Ok(())
}

#[test]
fn test_malformed_parameter_entries_still_parse() -> Result<()> {
    // Entries missing `name` or `type` survive parsing; the appender skips
    // them later with a warning.
    let config = NamerConfig::from_yaml_str(
        r#"
httpservlet_transaction_namer:
  append_parameters:
    enabled: true
    parameters:
      - name: X-Req-Id
      - type: cookie
      - name: sid
        type: cookie
"#,
    )?;
    assert_eq!(config.append_parameters.declarations().len(), 3);
    Ok(())
}
