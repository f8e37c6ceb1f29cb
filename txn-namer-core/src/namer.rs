// txn-namer-core/src/namer.rs
//! The naming pipeline: group, obfuscate, append.
//!
//! [`TransactionNamer`] is built once from a [`NamerConfig`], compiles its
//! rule sets through the shared cache, and is immutable afterward; `name()`
//! takes `&self` and only allocates per-call buffers, so one instance can
//! serve many concurrent requests.
//!
//! License: MIT OR APACHE 2.0

use log::{debug, info};
use std::collections::HashMap;
use std::sync::Arc;

use crate::config::NamerConfig;
use crate::engines::grouping::GroupingEngine;
use crate::engines::obfuscation::ObfuscationEngine;
use crate::params::ParameterAppender;
use crate::request::RequestView;
use crate::rules::compiler::{get_or_compile_rules, CompiledRuleSets};

/// First component of every produced transaction name.
pub const TRANSACTION_CATEGORY: &str = "HTTPServlet";

/// Attribute key the UI reads the request URI from.
pub const ATTR_REQUEST_URI: &str = "request.uri";
/// Fallback attribute key in case `request.uri` is excluded downstream.
pub const ATTR_CUSTOM_REQUEST_URI: &str = "custom.request.uri";
/// Attribute key the UI reads the referer from.
pub const ATTR_REQUEST_REFERER: &str = "request.headers.referer";
/// Fallback attribute key in case the referer attribute is excluded downstream.
pub const ATTR_CUSTOM_REQUEST_REFERER: &str = "custom.request.headers.referer";

/// Priority the produced name carries toward the downstream naming
/// authority. The pipeline always emits `CustomHigh`: its result overrides
/// default or automatic naming.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum NamePriority {
    CustomHigh,
}

/// A produced transaction name: ordered non-empty components plus the
/// override priority.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionName {
    /// `[category, uri]` or `[category, uri, appended-parameters]`.
    pub components: Vec<String>,
    pub priority: NamePriority,
}

/// Everything one `name()` call produces: the name (absent when the URI
/// reduced to empty, in which case the caller keeps its prior name) and the
/// side-channel attributes to emit on the transaction event.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NamingResult {
    pub name: Option<TransactionName>,
    pub attributes: HashMap<String, String>,
}

/// Derives normalized transaction names from request URIs by applying the
/// configured grouping, obfuscation, and parameter-appending rules in fixed
/// order.
#[derive(Debug)]
pub struct TransactionNamer {
    grouping: GroupingEngine,
    obfuscation: ObfuscationEngine,
    appender: ParameterAppender,
}

impl TransactionNamer {
    /// Builds a namer from configuration. Compiled rule sets are shared via
    /// the global cache, so building several namers from equal configs
    /// compiles once.
    pub fn new(config: &NamerConfig) -> Self {
        info!("Transaction namer - initializing.");
        let rules: Arc<CompiledRuleSets> = get_or_compile_rules(config);
        let namer = Self {
            grouping: GroupingEngine::new(Arc::clone(&rules)),
            obfuscation: ObfuscationEngine::new(rules),
            appender: ParameterAppender::from_declarations(config.append_parameters.declarations()),
        };
        if namer.is_grouping_enabled() {
            info!("Name Grouper - enabled.");
        }
        if namer.is_obfuscation_enabled() {
            info!("Name Obfuscator - enabled.");
        }
        if namer.is_parameter_appending_enabled() {
            info!("Append Parameters - enabled.");
        }
        namer
    }

    pub fn is_grouping_enabled(&self) -> bool {
        self.grouping.is_enabled()
    }

    pub fn is_obfuscation_enabled(&self) -> bool {
        self.obfuscation.is_enabled()
    }

    pub fn is_parameter_appending_enabled(&self) -> bool {
        self.appender.is_enabled()
    }

    /// Runs the pipeline for one request. Never fails: a rule that cannot be
    /// applied is skipped, and the worst outcome is the identity transform.
    pub fn name(&self, request: &dyn RequestView) -> NamingResult {
        let mut uri = request.uri().to_string();
        let mut attributes = HashMap::new();

        if self.is_grouping_enabled() {
            uri = self.grouping.group(&uri);
        }

        if self.is_obfuscation_enabled() {
            uri = self.obfuscation.obfuscate(&uri);
            // Emitted under both the visible and the custom key so the
            // obfuscated value survives either being excluded downstream.
            attributes.insert(ATTR_REQUEST_URI.to_string(), uri.clone());
            attributes.insert(ATTR_CUSTOM_REQUEST_URI.to_string(), uri.clone());

            if let Some(referer) = request.header("referer") {
                let obfuscated_referer = self.obfuscation.obfuscate(referer);
                attributes.insert(ATTR_REQUEST_REFERER.to_string(), obfuscated_referer.clone());
                attributes.insert(ATTR_CUSTOM_REQUEST_REFERER.to_string(), obfuscated_referer);
            }
        }

        let suffix = if self.is_parameter_appending_enabled() {
            self.appender.append(request)
        } else {
            String::new()
        };

        let name = if uri.is_empty() {
            None
        } else {
            let mut components = vec![TRANSACTION_CATEGORY.to_string(), uri];
            if !suffix.is_empty() {
                components.push(suffix);
            }
            debug!("Transaction namer - setting transaction name to: {}", components[1..].join("/"));
            Some(TransactionName {
                components,
                priority: NamePriority::CustomHigh,
            })
        };

        NamingResult { name, attributes }
    }
}
