//! Shared fixtures for tests across the workspace.

pub mod sse;
