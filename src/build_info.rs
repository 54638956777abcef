//! Build metadata embedded by `build.rs`.

include!(concat!(env!("OUT_DIR"), "/build_info.rs"));

/// `"<commit> (<date>)"`, shown by `simulator --version`.
pub fn version_string() -> String {
    format!("{} ({})", BUILD_COMMIT, BUILD_DATE)
}
