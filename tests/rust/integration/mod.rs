//! Integration tests - Tests that drive the full builder pipeline
//!
//! These tests verify that entity resolution, parameter binding, rendering
//! and validation work together through `QueryBuilder::build`.

mod config_driven_tests;
mod query_scenario_tests;
