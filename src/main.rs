//! Binary entrypoint that launches the DiskML chat service.

use std::process::ExitCode;

use diskml_chat::start_diskml_chat;

/// Start the service against the configured generation endpoint.
fn main() -> ExitCode {
    start_diskml_chat::run()
}
