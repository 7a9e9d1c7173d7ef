//! Build script for Font Detective.
//!
//! Only the desktop shell needs Tauri code generation. The core library
//! builds without it, so `tauri_build` runs behind the `desktop` feature.

fn main() {
    println!("cargo:rerun-if-changed=tauri.conf.json");

    #[cfg(feature = "desktop")]
    tauri_build::build();
}
