use std::path::Path;
use std::process::{Command, Output};

use wiremock::MockServer;

/// Base URL of a mock backend, in the form the CLI accepts.
pub fn api_url(server: &MockServer) -> String {
    format!("http://127.0.0.1:{}", server.address().port())
}

/// Run the CLI with a custom HOME directory for isolated session storage.
pub fn run_cli_with_env(args: &[&str], home: &Path, api: &str) -> Output {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_heartbeat"));
    cmd.args(args);
    cmd.env("HOME", home);
    cmd.env("XDG_DATA_HOME", home.join("data"));
    cmd.env("NO_COLOR", "1");
    cmd.env_remove("RUST_LOG");
    cmd.env_remove("HEARTBEAT_PASSWORD");
    if !args.contains(&"--api") {
        cmd.env("HEARTBEAT_API", api);
    }
    cmd.output().expect("Failed to execute CLI")
}

/// Run the CLI with a custom HOME and expect success.
pub fn run_cli_with_env_success(args: &[&str], home: &Path, api: &str) -> String {
    let output = run_cli_with_env(args, home, api);
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        panic!("CLI command failed: {:?}\nstderr: {}", args, stderr);
    }
    String::from_utf8_lossy(&output.stdout).to_string()
}

/// Run the CLI with a custom HOME and expect failure, returning stderr.
pub fn run_cli_with_env_failure(args: &[&str], home: &Path, api: &str) -> String {
    let output = run_cli_with_env(args, home, api);
    if output.status.success() {
        panic!(
            "CLI command should have failed: {:?}\nstdout: {}",
            args,
            String::from_utf8_lossy(&output.stdout)
        );
    }
    String::from_utf8_lossy(&output.stderr).to_string()
}
