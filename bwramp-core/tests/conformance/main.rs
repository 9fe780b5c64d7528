//! Conformance harness: session output contract.
//!
//! Downstream analysis and report tooling parse the session document by
//! key. These tests pin the parts of it that other tools depend on:
//!
//! - Stop-reason registry: exact list, order and validator
//! - Output schema: top-level keys, `meta` merge rules, per-step fields,
//!   role markers and `selected`

mod output_schema;
mod stop_reason_registry;
