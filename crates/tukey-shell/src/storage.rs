// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Storage bridge — the object hosted content calls to save files.
//
// Every failure (bad filename, bad base64, content index refusal, I/O) is
// logged, turned into a toast, and reported as `success: false`. Nothing
// propagates to the caller as an error and nothing is retried.

use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::{alphabet, Engine as _};
use tracing::{error, info, instrument};

use tukey_bridge::traits::PlatformBridge;
use tukey_core::error::{Result, TukeyError};
use tukey_core::messages;
use tukey_core::types::{
    RequestId, SaveContent, SaveRequest, SaveResult, StorageCapability, ToastDuration,
};
use tukey_core::ShellConfig;

use crate::strategy::{DirectFilesystem, IndexedInsert, SavedLocation, WriteStrategy};
use crate::ui::UiHandle;

/// Standard alphabet; padding optional and non-zero trailing bits accepted,
/// like `android.util.Base64.DEFAULT`.
const LENIENT_BASE64: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_padding_mode(DecodePaddingMode::Indifferent)
        .with_decode_allow_trailing_bits(true),
);

/// Decode base64 text, ignoring embedded whitespace and line breaks.
pub fn decode_base64(input: &str) -> Result<Vec<u8>> {
    let compact: String = input.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    LENIENT_BASE64
        .decode(compact.as_bytes())
        .map_err(|e| TukeyError::Decode(e.to_string()))
}

/// The JavaScript-facing storage bridge.
///
/// `Send + Sync`: save calls may come from any thread. Toasts are posted to
/// the UI queue rather than shown directly.
pub struct StorageBridge {
    strategy: Box<dyn WriteStrategy>,
    ui: UiHandle,
}

impl StorageBridge {
    pub fn new(strategy: Box<dyn WriteStrategy>, ui: UiHandle) -> Self {
        Self { strategy, ui }
    }

    /// Build the bridge for a platform, choosing the write strategy once.
    ///
    /// The indexed strategy is used when the platform reports the capability
    /// and exposes a content index, unless the config forces direct writes.
    pub fn for_platform(
        platform: &dyn PlatformBridge,
        config: &ShellConfig,
        ui: UiHandle,
    ) -> Result<Self> {
        let capability = if config.force_legacy_storage {
            StorageCapability::LegacyFilesystem
        } else {
            platform.storage_capability()
        };

        let strategy: Box<dyn WriteStrategy> = match (capability, platform.content_index()) {
            (StorageCapability::IndexedDownloads, Some(index)) => {
                Box::new(IndexedInsert::new(index))
            }
            _ => {
                let dir = match &config.downloads_dir {
                    Some(dir) => dir.clone(),
                    None => platform.public_downloads_dir()?,
                };
                Box::new(DirectFilesystem::new(dir))
            }
        };

        info!(
            platform = platform.platform_name(),
            capability = %strategy.capability(),
            "storage bridge ready"
        );
        Ok(Self::new(strategy, ui))
    }

    /// Capability of the strategy this bridge writes through.
    pub fn capability(&self) -> StorageCapability {
        self.strategy.capability()
    }

    /// Save UTF-8 text.
    pub fn save_text(&self, content: &str, filename: &str, mime_type: Option<&str>) -> SaveResult {
        self.save(SaveRequest::text(
            content,
            filename,
            mime_type.map(str::to_owned),
        ))
    }

    /// Save base64-encoded bytes.
    pub fn save_base64(
        &self,
        base64_content: &str,
        filename: &str,
        mime_type: Option<&str>,
    ) -> SaveResult {
        self.save(SaveRequest::base64(
            base64_content,
            filename,
            mime_type.map(str::to_owned),
        ))
    }

    /// Run one save request to completion and announce the outcome.
    #[instrument(
        skip_all,
        fields(request_id = %RequestId::new(), filename = %request.filename)
    )]
    pub fn save(&self, request: SaveRequest) -> SaveResult {
        match self.try_save(&request) {
            Ok(location) => {
                info!(location = %location.resolved(), "file saved");
                self.ui.toast(location.toast_message(), ToastDuration::Long);
                SaveResult::saved(location.resolved())
            }
            Err(e) => {
                error!(error = %e, "save failed");
                let message = messages::save_failed(&e);
                self.ui.toast(message.clone(), ToastDuration::Long);
                SaveResult::failed(message)
            }
        }
    }

    fn try_save(&self, request: &SaveRequest) -> Result<SavedLocation> {
        request.validate()?;
        let bytes = match &request.content {
            SaveContent::Text(text) => text.as_bytes().to_vec(),
            SaveContent::Base64(encoded) => decode_base64(encoded)?,
        };
        self.strategy.write(request, &bytes)
    }

    /// Post a short toast. Fire-and-forget.
    pub fn notify(&self, message: &str) {
        self.ui.toast(message, ToastDuration::Short);
    }

    /// Lets hosted content detect that it runs inside the shell.
    pub fn is_bridge_active(&self) -> bool {
        true
    }
}
