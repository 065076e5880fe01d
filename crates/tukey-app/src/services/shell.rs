// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Shell services — everything a host needs after start-up, built once.
//
// The storage bridge is shared behind an `Arc` because bridge calls run on
// worker threads while the UI queue is drained elsewhere.

use std::sync::Arc;

use tracing::info;
use tukey_bridge::traits::PlatformBridge;
use tukey_core::error::Result;
use tukey_core::ShellConfig;
use tukey_shell::chooser::FileChooserSlot;
use tukey_shell::download::DownloadInterceptor;
use tukey_shell::{ui_queue, StorageBridge, UiEvents, UiHandle};

pub struct Shell {
    config: ShellConfig,
    platform: Arc<dyn PlatformBridge>,
    bridge: Arc<StorageBridge>,
    chooser: FileChooserSlot,
    downloads: DownloadInterceptor,
    ui: UiHandle,
}

impl Shell {
    /// Build all services for `platform`.
    ///
    /// Returns the receiving end of the UI queue separately: whoever owns the
    /// UI thread takes it.
    pub fn init(platform: Arc<dyn PlatformBridge>, config: ShellConfig) -> Result<(Self, UiEvents)> {
        let (ui, events) = ui_queue();
        let bridge = StorageBridge::for_platform(platform.as_ref(), &config, ui.clone())?;

        info!(
            platform = platform.platform_name(),
            entry_url = %config.entry_url,
            bridge_name = %config.bridge_name,
            "shell initialised"
        );

        let shell = Self {
            chooser: FileChooserSlot::new(ui.clone()),
            downloads: DownloadInterceptor::new(&config),
            bridge: Arc::new(bridge),
            platform,
            config,
            ui,
        };
        Ok((shell, events))
    }

    pub fn config(&self) -> &ShellConfig {
        &self.config
    }

    pub fn platform(&self) -> Arc<dyn PlatformBridge> {
        self.platform.clone()
    }

    pub fn bridge(&self) -> Arc<StorageBridge> {
        self.bridge.clone()
    }

    pub fn chooser(&self) -> &FileChooserSlot {
        &self.chooser
    }

    pub fn downloads(&self) -> &DownloadInterceptor {
        &self.downloads
    }

    pub fn ui(&self) -> &UiHandle {
        &self.ui
    }
}
