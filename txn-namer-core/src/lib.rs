// txn-namer-core/src/lib.rs
//! # Transaction Namer Core Library
//!
//! `txn-namer-core` derives normalized, human-meaningful transaction names
//! from incoming HTTP request URIs by applying operator-configured rewrite
//! rules. It groups structurally equivalent URIs (`/user/123` and
//! `/user/456` become one name), redacts sensitive path segments with named
//! placeholders, and appends selected request metadata (headers, cookies,
//! query parameters) to the name.
//!
//! The library is designed to be pure and host-independent: it never touches
//! a live HTTP stack, performs no I/O at request time, and consumes requests
//! only through the [`RequestView`] trait supplied by the host.
//!
//! ## Modules
//!
//! * `config`: Defines the `httpservlet_transaction_namer` configuration
//!   section and YAML loading.
//! * `rules`: Compiles configured pattern strings into rule objects and
//!   caches the compiled sets.
//! * `engines`: The grouping and obfuscation matching engines.
//! * `params`: Resolves declared request parameters into the name suffix.
//! * `request`: The request-side seam (`RequestView`, `StaticRequest`).
//! * `namer`: The pipeline orchestrating the engines in fixed order.
//! * `errors`: The library error type.
//!
//! ## Usage Example
//!
//! ```rust
//! use txn_namer_core::{NamerConfig, StaticRequest, TransactionNamer};
//! use anyhow::Result;
//!
//! fn main() -> Result<()> {
//!     let config = NamerConfig::from_yaml_str(
//!         r#"
//! httpservlet_transaction_namer:
//!   name_obfuscator:
//!     enabled: true
//!     patterns:
//!       - "/orders/<id>"
//! "#,
//!     )?;
//!
//!     let namer = TransactionNamer::new(&config);
//!     let request = StaticRequest::new("/orders/42");
//!     let result = namer.name(&request);
//!
//!     let name = result.name.expect("non-empty URI always names");
//!     assert_eq!(name.components, vec!["HTTPServlet", "/orders/<id>"]);
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! Configuration loading uses `anyhow::Error` with context; an invalid
//! configured pattern is logged and skipped, never fatal. The per-request
//! entry point [`TransactionNamer::name`] is infallible: the worst outcome
//! of partially invalid configuration is the identity transform.
//!
//! ## Design Principles
//!
//! * **Immutable after construction:** rule sets are compiled once and
//!   shared; `name()` runs concurrently over one instance with no locking.
//! * **Host-agnostic:** the `RequestView` trait decouples the pipeline from
//!   any servlet or framework types.
//! * **Degrade, never abort:** every failure mode has a safe local fallback.
//!
//! ---
//! License: MIT OR Apache-2.0

pub mod config;
pub mod engines;
pub mod errors;
pub mod namer;
pub mod params;
pub mod request;
pub mod rules;

/// Re-exports the public configuration types for the naming section.
pub use config::{
    AppendParametersConfig, FeatureConfig, NamerConfig, ParameterDecl, PatternList, Toggle,
    MAX_PATTERN_LENGTH,
};

/// Re-exports the custom error type for clear error reporting.
pub use errors::NamerError;

/// Re-exports the naming pipeline and its output types.
pub use namer::{
    NamePriority, NamingResult, TransactionName, TransactionNamer, ATTR_CUSTOM_REQUEST_REFERER,
    ATTR_CUSTOM_REQUEST_URI, ATTR_REQUEST_REFERER, ATTR_REQUEST_URI, TRANSACTION_CATEGORY,
};

/// Re-exports the request-side seam.
pub use request::{Cookie, RequestView, StaticRequest};

/// Re-exports the appended-parameter types.
pub use params::{AppendedParameter, ParamType, ParameterAppender};

/// Re-exports the matching engines for hosts that drive them directly.
pub use engines::grouping::GroupingEngine;
pub use engines::obfuscation::ObfuscationEngine;

// Re-export key types from the rules::compiler module for advanced usage.
pub use rules::compiler::{
    compile_grouping_rules, compile_obfuscation_rules, get_or_compile_rules, CompiledGroupings,
    CompiledObfuscations, CompiledRuleSets, ObfuscationRule,
};
