//! Library integration tests: full generator runs against temporary trees.

mod common;
mod generate_tests;
mod scan_tests;
