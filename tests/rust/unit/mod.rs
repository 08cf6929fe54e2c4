//! Unit tests - Tests for individual components in isolation
//!
//! These tests exercise the public API of one module at a time.

mod condition_tree_tests;
mod entity_catalog_tests;
mod validator_tests;
