//! Core types & traits: domain-agnostic contracts for tools and protocol.

pub mod error;
pub mod mcp;
pub mod tool;
