//! Integration tests for Layer 2: Prefabs
//!
//! Tests for instancing templates and propagating template edits.

mod fixtures;
mod instancing;
