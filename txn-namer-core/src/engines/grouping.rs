// txn-namer-core/src/engines/grouping.rs
//! Collapses structurally similar URIs to one canonical group name.
//!
//! Grouping rules are plain regexes evaluated in priority order with
//! unanchored, first-match semantics. The first rule whose capture groups
//! concatenate to a non-empty string wins; a match with no captures (or only
//! empty ones) falls through to the next rule. When nothing groups, the URI
//! passes through unchanged.
//!
//! License: MIT OR APACHE 2.0

use log::debug;
use std::sync::Arc;

use crate::rules::compiler::CompiledRuleSets;

/// Applies the ordered grouping rule set to request URIs.
#[derive(Debug)]
pub struct GroupingEngine {
    rules: Arc<CompiledRuleSets>,
}

impl GroupingEngine {
    pub fn new(rules: Arc<CompiledRuleSets>) -> Self {
        Self { rules }
    }

    /// True when at least one grouping rule compiled.
    pub fn is_enabled(&self) -> bool {
        !self.rules.groupings.rules.is_empty()
    }

    /// Returns the canonical group name for `uri`, or `uri` unchanged when
    /// no rule produces one.
    pub fn group(&self, uri: &str) -> String {
        debug!("Name Grouper - grouping URI: {uri}");
        for regex in &self.rules.groupings.rules {
            debug!("Name Grouper - checking against pattern: {}", regex.as_str());
            if let Some(caps) = regex.captures(uri) {
                let mut grouped = String::new();
                for i in 1..caps.len() {
                    // Non-participating groups contribute nothing.
                    if let Some(m) = caps.get(i) {
                        grouped.push_str(m.as_str());
                    }
                }
                if grouped.is_empty() {
                    debug!("Name Grouper - URI matched but not grouped; check the pattern's capture groups");
                } else {
                    debug!("Name Grouper - grouped URI: {grouped}");
                    return grouped;
                }
            }
        }
        debug!("Name Grouper - no (or group-less) matches for URI: {uri}");
        uri.to_string()
    }
}
