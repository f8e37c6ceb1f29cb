// txn-namer-core/src/engines/mod.rs
//! Concrete matching engines of the naming pipeline.
//! License: MIT OR APACHE 2.0

pub mod grouping;
pub mod obfuscation;
