//! kernmake-lib: build-graph generation for freestanding kernel images
//!
//! The crate turns a kernel source tree laid out as one directory per module
//! into a dependency-ordered Makefile:
//! - `source`: discovers modules and classifies their sources by kind
//! - `plan`: derives object lists, archives and the link order
//! - `graph`: validates the resulting rule graph
//! - `render`: serializes a plan in the Make dialect
//! - `generate`: drives a full run against a single output writer
//! - `init`: scaffolds a new project

pub mod config;
pub mod consts;
pub mod generate;
pub mod graph;
pub mod init;
pub mod plan;
pub mod render;
pub mod source;
pub mod util;
