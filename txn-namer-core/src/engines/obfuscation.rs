// txn-namer-core/src/engines/obfuscation.rs
//! Redacts matching URI spans or segments with named placeholders.
//!
//! Obfuscation rules are evaluated in priority order; the first rule that
//! succeeds ends the scan. Named-capture rules rewrite every occurrence of
//! their inner pattern anywhere in the URI and stop the scan
//! unconditionally. Segment-template rules first require the URI to have at
//! least as many path segments as the template and the compiled pattern to
//! match somewhere in the URI, then rewrite the URI segment by segment,
//! emitting the placeholder text wherever the template has one.
//!
//! A single leading `/` is stripped before splitting so absolute paths do
//! not produce a spurious empty segment, and is re-prepended to the output.
//! When nothing applies, the URI passes through unchanged.
//!
//! License: MIT OR APACHE 2.0

use log::debug;
use regex::NoExpand;
use std::sync::Arc;

use crate::rules::compiler::{is_placeholder_segment, CompiledRuleSets, ObfuscationRule};

/// Applies the ordered obfuscation rule set to request URIs.
#[derive(Debug)]
pub struct ObfuscationEngine {
    rules: Arc<CompiledRuleSets>,
}

impl ObfuscationEngine {
    pub fn new(rules: Arc<CompiledRuleSets>) -> Self {
        Self { rules }
    }

    /// True when at least one obfuscation rule compiled.
    pub fn is_enabled(&self) -> bool {
        !self.rules.obfuscations.rules.is_empty()
    }

    /// Returns the obfuscated form of `uri`, or `uri` unchanged when no rule
    /// applies.
    pub fn obfuscate(&self, uri: &str) -> String {
        debug!("Name Obfuscator - checking URI: {uri}");
        let mut output = String::new();

        for rule in &self.rules.obfuscations.rules {
            match rule {
                ObfuscationRule::NamedCapture { name, regex, .. } => {
                    debug!("Name Obfuscator - checking against named capture: {}", rule.raw());
                    // Global replacement, and the scan always ends here; a
                    // non-matching inner pattern yields the URI unchanged.
                    output = regex
                        .replace_all(uri, NoExpand(&format!("<{name}>")))
                        .into_owned();
                    break;
                }
                ObfuscationRule::SegmentTemplate { segments, regex, .. } => {
                    debug!("Name Obfuscator - checking against pattern: {}", regex.as_str());
                    let (prefix, trimmed) = match uri.strip_prefix('/') {
                        Some(rest) => ("/", rest),
                        None => ("", uri),
                    };
                    let uri_segments: Vec<&str> = trimmed.split('/').collect();
                    if segments.len() > uri_segments.len() {
                        continue;
                    }
                    if regex.find(uri).is_none() {
                        continue;
                    }
                    debug!("Name Obfuscator - URI matched pattern: {}", rule.raw());
                    let mut parts: Vec<&str> = Vec::with_capacity(uri_segments.len());
                    for (i, uri_segment) in uri_segments.iter().enumerate() {
                        match segments.get(i) {
                            Some(template) if is_placeholder_segment(template) => {
                                parts.push(template.as_str());
                            }
                            // Literal template segments and any URI segments
                            // past the template's end pass through as-is.
                            _ => parts.push(uri_segment),
                        }
                    }
                    output = format!("{prefix}{}", parts.join("/"));
                    break;
                }
            }
        }

        if output.is_empty() {
            debug!("Name Obfuscator - no patterns matched to: {uri}");
            return uri.to_string();
        }
        debug!("Name Obfuscator - obfuscated URI: {output}");
        output
    }
}
