//! Release version stamping.
//!
//! Releases are numbered `major.minor.YYYYMMDD`, where the last component is
//! the date the release was cut.

use std::sync::LazyLock;

pub const MAJOR: u32 = 1;
pub const MINOR: u32 = 3;
/// Release date, `YYYYMMDD`
pub const PATCH_DATE: &str = "20250916";

/// Full version string, e.g. `1.3.20250916`
pub static FULL: LazyLock<String> = LazyLock::new(|| format!("{MAJOR}.{MINOR}.{PATCH_DATE}"));
