#[cfg(not(target_arch = "wasm32"))]
fn main() -> std::process::ExitCode {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();

    match stp_widget::host::run() {
        Ok(()) => std::process::ExitCode::SUCCESS,
        Err(error) => {
            tracing::error!("{error}");
            std::process::ExitCode::FAILURE
        }
    }
}

// The browser build mounts the widget from `stp-widget-wasm` instead.
#[cfg(target_arch = "wasm32")]
fn main() {}
