//! Bundle content parsers.

pub mod sourcemap;

pub use sourcemap::find_source_map;
