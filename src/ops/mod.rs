//! Operator implementations.
//!
//! Operations are grouped by category; each category module exposes the
//! operator types and the pure shape-inference functions the graph builder
//! calls before any data flows.

pub mod reduction;
