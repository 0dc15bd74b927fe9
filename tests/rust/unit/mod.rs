//! Unit tests - crate-level tests that need no external services
//!
//! These tests exercise the public parsing and decoding API directly.

mod parser_robustness_tests;
mod projection_conversion_tests;
