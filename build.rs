use std::time::{SystemTime, UNIX_EPOCH};

fn emit_build_version() {
    let n = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0);
    println!("cargo:rustc-env=GREENGATE_BUILD_N={n}");
}

fn main() {
    emit_build_version();
    println!("cargo:rerun-if-changed=assets/enzymes.json");
}
