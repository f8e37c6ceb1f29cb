// txn-namer-core/src/rules/mod.rs
//! Rule compilation for the naming pipeline.
//! License: MIT OR APACHE 2.0

pub mod compiler;
