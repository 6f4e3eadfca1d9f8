//! Marker directory discovery
//!
//! Walks a root directory up to a depth limit and collects every directory
//! that directly contains the marker file.

mod tree;

pub use tree::{find_marker_dirs, resolve_root, sort_dirs};
