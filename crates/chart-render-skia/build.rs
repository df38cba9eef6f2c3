// File: crates/chart-render-skia/build.rs
// Summary: Links the Windows system libraries Skia needs, only when the `raster` feature is on.

fn main() {
    let raster = std::env::var_os("CARGO_FEATURE_RASTER").is_some();
    let windows = std::env::var("CARGO_CFG_TARGET_OS").as_deref() == Ok("windows");
    if raster && windows {
        // RegOpenKeyExW, RegQueryInfoKeyW, etc.
        println!("cargo:rustc-link-lib=advapi32");
    }
}
