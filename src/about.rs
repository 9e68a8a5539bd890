pub const GREENGATE_VERSION: &str = env!("CARGO_PKG_VERSION");
pub const GREENGATE_BUILD_N: &str = env!("GREENGATE_BUILD_N");

pub fn version_cli_text() -> String {
    format!(
        "GreenGate {}\nBuild {}\nIn-silico GreenGate cloning",
        GREENGATE_VERSION, GREENGATE_BUILD_N
    )
}
