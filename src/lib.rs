// ABOUTME: Library root for rollgate - exposes the pipeline components for testing.
// ABOUTME: The main binary is in main.rs.

pub mod cloud;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod exec;
pub mod expose;
pub mod identity;
pub mod output;
pub mod pipeline;
pub mod provision;
pub mod publish;
pub mod rollout;
pub mod types;
