//! compiler.rs - Manages the compilation and caching of naming rules.
//!
//! This module converts raw configured pattern strings into compiled rule
//! objects ready for matching, and keeps a thread-safe, global cache so that
//! many naming instances built from the same configuration share one
//! compiled rule set.
//!
//! Two rule dialects coexist in the obfuscation list:
//!
//! * *segment templates* like `/orders/<id>` or
//!   `/vehicleimage/<vin,[A-Za-z\d]{11}\d{6}>/etc`, matched and rewritten
//!   path-segment by path-segment;
//! * *named captures* like `(?<vin>[A-Za-z\d]{11}\d{6})`, applied as a
//!   global substring replacement.
//!
//! An invalid configured pattern is logged and skipped; it never fails the
//! rule set as a whole.
//!
//! License: MIT OR APACHE 2.0

use lazy_static::lazy_static;
use log::{debug, warn};
use regex::Regex;
use std::collections::hash_map::DefaultHasher;
use std::collections::{HashMap, HashSet};
use std::hash::{Hash, Hasher};
use std::sync::{Arc, RwLock};

use crate::config::{NamerConfig, MAX_PATTERN_LENGTH};
use crate::errors::NamerError;

lazy_static! {
    /// Recognizes a rule written entirely as one named capture group.
    static ref NAMED_CAPTURE_FORM: Regex = Regex::new(r"^\(\?<\w+>.*\)$").unwrap();
    /// Extracts the capture name and inner pattern from that form.
    static ref NAMED_CAPTURE_PARTS: Regex = Regex::new(r"^\(\?<(\w+)>(.*)\)$").unwrap();
}

/// Returns true when a template segment is a `<...>` placeholder.
pub(crate) fn is_placeholder_segment(segment: &str) -> bool {
    segment.starts_with('<') && segment.ends_with('>')
}

/// A single compiled obfuscation rule, in one of the two dialects.
#[derive(Debug)]
pub enum ObfuscationRule {
    /// A `/`-delimited template of literal and placeholder segments.
    SegmentTemplate {
        /// The original configured rule string, used for dedup.
        raw: String,
        /// Template segments with extended placeholders rewritten to their
        /// display form (`<name,regex>` becomes `<name>`).
        segments: Vec<String>,
        /// The whole template compiled to one regex, placeholders
        /// substituted with their matching fragments.
        regex: Regex,
    },
    /// A `(?<name>regex)` rule applied as a global replacement.
    NamedCapture {
        raw: String,
        /// The capture name; matches are replaced with `<name>`.
        name: String,
        /// The inner pattern, compiled on its own.
        regex: Regex,
    },
}

impl ObfuscationRule {
    /// The configured rule string this rule was compiled from.
    pub fn raw(&self) -> &str {
        match self {
            ObfuscationRule::SegmentTemplate { raw, .. } => raw,
            ObfuscationRule::NamedCapture { raw, .. } => raw,
        }
    }
}

/// The ordered, deduplicated obfuscation rule set.
#[derive(Debug, Default)]
pub struct CompiledObfuscations {
    pub rules: Vec<ObfuscationRule>,
}

/// The ordered, deduplicated grouping rule set. Grouping rules carry no
/// template structure; each is a plain regex.
#[derive(Debug, Default)]
pub struct CompiledGroupings {
    pub rules: Vec<Regex>,
}

/// All compiled rule state shared by one naming instance.
#[derive(Debug, Default)]
pub struct CompiledRuleSets {
    pub obfuscations: CompiledObfuscations,
    pub groupings: CompiledGroupings,
}

lazy_static! {
    /// A thread-safe, global cache for compiled rule sets.
    /// The key is a hash of the `NamerConfig`.
    static ref COMPILED_RULES_CACHE: RwLock<HashMap<u64, Arc<CompiledRuleSets>>> =
        RwLock::new(HashMap::new());
}

/// Hashes the `NamerConfig` to create a stable, unique key for the cache.
///
/// Rule order is semantically significant (it defines evaluation priority),
/// so the config is hashed as-is, without sorting.
fn hash_config(config: &NamerConfig) -> u64 {
    let mut hasher = DefaultHasher::new();
    config.hash(&mut hasher);
    hasher.finish()
}

/// Compiles one obfuscation rule string into its tagged representation.
pub fn compile_obfuscation_rule(raw: &str) -> Result<ObfuscationRule, NamerError> {
    if raw.len() > MAX_PATTERN_LENGTH {
        return Err(NamerError::PatternLengthExceeded(
            raw.to_string(),
            raw.len(),
            MAX_PATTERN_LENGTH,
        ));
    }

    if NAMED_CAPTURE_FORM.is_match(raw) {
        // NAMED_CAPTURE_PARTS matches everything NAMED_CAPTURE_FORM does.
        let caps = NAMED_CAPTURE_PARTS
            .captures(raw)
            .ok_or_else(|| NamerError::Fatal(format!("named-capture parse failed for '{raw}'")))?;
        let name = caps[1].to_string();
        let inner = &caps[2];
        let regex = Regex::new(inner)
            .map_err(|e| NamerError::RuleCompilationError(raw.to_string(), e))?;
        debug!("Compiled named-capture rule '{raw}' (name: {name})");
        return Ok(ObfuscationRule::NamedCapture {
            raw: raw.to_string(),
            name,
            regex,
        });
    }

    let mut fragments: Vec<String> = Vec::new();
    let mut segments: Vec<String> = Vec::new();
    for segment in raw.split('/') {
        if is_placeholder_segment(segment) {
            if let Some((name_part, regex_part)) = segment.split_once(',') {
                // Extended placeholder: the embedded regex (sans the
                // trailing '>') matches at this position, and the segment
                // displays as `<name>`.
                fragments.push(regex_part[..regex_part.len() - 1].to_string());
                segments.push(format!("{name_part}>"));
            } else {
                fragments.push("[^/]+".to_string());
                segments.push(segment.to_string());
            }
        } else {
            // Literal segments are used verbatim; operators own the
            // escaping of regex metacharacters.
            fragments.push(segment.to_string());
            segments.push(segment.to_string());
        }
    }
    let pattern = fragments.join("/");
    // Template segments align index-by-index with URI segments, and URI
    // segments are split with a single leading '/' stripped; strip the
    // template's leading empty segment the same way so absolute templates
    // line up with absolute paths.
    if raw.starts_with('/') {
        segments.remove(0);
    }
    let regex =
        Regex::new(&pattern).map_err(|e| NamerError::RuleCompilationError(raw.to_string(), e))?;
    debug!("Compiled segment-template rule '{raw}' to pattern '{pattern}'");
    Ok(ObfuscationRule::SegmentTemplate {
        raw: raw.to_string(),
        segments,
        regex,
    })
}

/// Compiles the obfuscation rule strings, preserving order, deduplicating by
/// raw rule string, and skipping (with a warning) any rule that fails to
/// compile.
pub fn compile_obfuscation_rules(patterns: &[String]) -> CompiledObfuscations {
    debug!("Starting compilation of {} obfuscation rules.", patterns.len());
    let mut seen: HashSet<&str> = HashSet::new();
    let mut rules = Vec::new();
    for raw in patterns {
        if !seen.insert(raw.as_str()) {
            continue;
        }
        match compile_obfuscation_rule(raw) {
            Ok(rule) => rules.push(rule),
            Err(e) => warn!("Skipping obfuscation rule: {e}"),
        }
    }
    debug!("Finished compiling obfuscation rules. Total compiled: {}.", rules.len());
    CompiledObfuscations { rules }
}

/// Compiles the grouping rule strings with the same order/dedup/skip policy.
pub fn compile_grouping_rules(patterns: &[String]) -> CompiledGroupings {
    debug!("Starting compilation of {} grouping rules.", patterns.len());
    let mut seen: HashSet<&str> = HashSet::new();
    let mut rules = Vec::new();
    for raw in patterns {
        if !seen.insert(raw.as_str()) {
            continue;
        }
        if raw.len() > MAX_PATTERN_LENGTH {
            warn!(
                "Skipping grouping rule '{raw}': pattern length ({}) exceeds maximum allowed ({MAX_PATTERN_LENGTH})",
                raw.len()
            );
            continue;
        }
        match Regex::new(raw) {
            Ok(regex) => rules.push(regex),
            Err(e) => warn!("Skipping grouping rule '{raw}': {e}"),
        }
    }
    debug!("Finished compiling grouping rules. Total compiled: {}.", rules.len());
    CompiledGroupings { rules }
}

/// Gets a `CompiledRuleSets` instance from the cache or compiles it if not
/// found.
///
/// This is the public entry point for retrieving compiled rules. It returns
/// an `Arc` to a `CompiledRuleSets` instance, allowing for cheap sharing
/// across naming instances and worker threads.
pub fn get_or_compile_rules(config: &NamerConfig) -> Arc<CompiledRuleSets> {
    let cache_key = hash_config(config);

    // Attempt to acquire a read lock first.
    {
        let cache = COMPILED_RULES_CACHE.read().unwrap();
        if let Some(rules) = cache.get(&cache_key) {
            debug!("Serving compiled rules from cache for key: {cache_key}");
            return Arc::clone(rules);
        }
    } // Read lock is released here.

    debug!("Compiled rules not found in cache. Compiling now.");
    let compiled = Arc::new(CompiledRuleSets {
        obfuscations: compile_obfuscation_rules(&config.name_obfuscator.pattern_strings()),
        groupings: compile_grouping_rules(&config.name_grouper.pattern_strings()),
    });

    COMPILED_RULES_CACHE
        .write()
        .unwrap()
        .insert(cache_key, Arc::clone(&compiled));

    debug!("Successfully compiled and cached rules for key: {cache_key}");
    compiled
}
