//! Integration tests for the merkleprint hashing pipeline

mod cli_commands;
mod config_layering;
mod hasher_verification;
mod pipeline_determinism;
mod tree_structure;
