//! Integration tests for Layer 1: Storage
//!
//! Tests for the storage contract, pooled and associative stores, and the
//! entity manager.

mod associative;
mod contract;
mod fixtures;
