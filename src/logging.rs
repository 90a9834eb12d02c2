//! Structured logging utilities for the resolver.
//!
//! This module provides helper functions for consistent, structured
//! logging across the application using the `tracing` crate.

/// Log source map loading event.
pub fn log_loading_map(path: &str) {
    tracing::info!(map = path, "Loading source map");
}

/// Log a parsed map.
pub fn log_map_parsed(origin: &str, bytes: usize, segments: usize, sources: usize) {
    tracing::info!(origin, bytes, segments, sources, "Source map parsed");
}

/// Log a rejected map.
pub fn log_map_rejected(origin: &str, reason: &str) {
    tracing::warn!(origin, reason, "Source map rejected");
}

/// Log the outcome of one query.
pub fn log_query_resolved(query: &str, resolved: bool) {
    tracing::debug!(query, resolved, "Query resolved");
}

/// Log stack trace parsing.
pub fn log_frames_parsed(frames: usize) {
    tracing::debug!(frames, "Stack trace parsed");
}

/// Log batch start.
pub fn log_batch_start(queries: usize) {
    tracing::info!(queries, "Starting batch resolution");
}

/// Log batch completion.
pub fn log_batch_complete(resolved: usize, total: usize) {
    tracing::info!(resolved, total, "Batch resolution completed");
}

/// Log configuration file use.
pub fn log_config_loaded(path: &str) {
    tracing::debug!(path, "Configuration loaded");
}
