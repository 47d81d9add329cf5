//! Integration tests for tree snapshots and patches

mod apply_patch;
mod patch_scenarios;
mod tree_lifecycle;
