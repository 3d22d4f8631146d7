//! Test Helper Utilities
//!
//! Shared utilities for mla-report integration tests

pub mod dataset;

pub use dataset::{scenario_dataset, test_config, TestDataset};
