// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Tukey — native web shell, desktop host.
//
// Entry point. Initialises logging and the shell services, then serves bridge
// calls as JSON lines: one request per stdin line, one reply per stdout line.
// Toasts are delivered by a dedicated task draining the UI queue.

use std::process::ExitCode;
use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tukey_bridge::traits::PlatformBridge;
use tukey_core::ShellConfig;
use tukey_shell::calls;

use tukey_app::services::data_dir::data_dir;
use tukey_app::Shell;

#[tokio::main]
async fn main() -> ExitCode {
    tukey_app::init_logging();
    tracing::info!("Tukey starting");

    let config = ShellConfig::load_or_init(&data_dir());
    let platform: Arc<dyn PlatformBridge> = Arc::from(tukey_bridge::platform_bridge());
    let (shell, events) = match Shell::init(platform, config) {
        Ok(s) => s,
        Err(e) => {
            tracing::error!(error = %e, "shell initialisation failed");
            return ExitCode::FAILURE;
        }
    };

    let ui_task = tokio::spawn(events.run(shell.platform()));

    let status = match serve(&shell).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "bridge I/O failed");
            ExitCode::FAILURE
        }
    };

    // Dropping the shell closes the UI queue once pending toasts are shown.
    drop(shell);
    if let Err(e) = ui_task.await {
        tracing::warn!(error = %e, "UI task ended abnormally");
    }
    tracing::info!("Tukey stopped");
    status
}

/// Answer bridge calls until stdin closes.
async fn serve(shell: &Shell) -> std::io::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        // Saves do blocking file I/O.
        let bridge = shell.bridge();
        let reply = tokio::task::spawn_blocking(move || calls::handle_message(&bridge, &line))
            .await
            .map_err(std::io::Error::other)?;

        stdout.write_all(reply.as_bytes()).await?;
        stdout.write_all(b"\n").await?;
        stdout.flush().await?;
    }
    tracing::debug!("stdin closed");
    Ok(())
}
