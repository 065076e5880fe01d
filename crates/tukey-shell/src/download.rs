// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Download interception.
//
// A web view cannot save `blob:` URLs itself. For those the host injects a
// script that reads the blob back as base64 and hands it to the bridge's
// `saveBase64File`. Every other URL is passed to the system to open.

use chrono::{NaiveDate, Utc};

use tukey_core::messages;
use tukey_core::types::ToastDuration;
use tukey_core::ShellConfig;

use crate::ui::UiHandle;

/// What the host should do with a download request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadAction {
    /// Evaluate `script` in the page.
    FetchBlob { script: String },
    /// Hand `url` to the system (browser, download manager).
    OpenExternal { url: String },
}

pub struct DownloadInterceptor {
    bridge_name: String,
    filename_prefix: String,
}

impl DownloadInterceptor {
    pub fn new(config: &ShellConfig) -> Self {
        Self {
            bridge_name: config.bridge_name.clone(),
            filename_prefix: config.backup_filename_prefix.clone(),
        }
    }

    /// Decide how to handle `url`, dating blob backups with today's UTC date.
    pub fn intercept(&self, url: &str) -> DownloadAction {
        self.intercept_on(url, Utc::now().date_naive())
    }

    pub fn intercept_on(&self, url: &str, date: NaiveDate) -> DownloadAction {
        tracing::debug!(url, "download requested");
        if url.starts_with("blob:") {
            DownloadAction::FetchBlob {
                script: self.blob_fetch_script(url, &self.backup_filename(date)),
            }
        } else {
            DownloadAction::OpenExternal {
                url: url.to_string(),
            }
        }
    }

    /// `<prefix>YYYY-MM-DD.json`
    pub fn backup_filename(&self, date: NaiveDate) -> String {
        format!("{}{}.json", self.filename_prefix, date.format("%Y-%m-%d"))
    }

    /// Tell the user an external download could not be started.
    pub fn report_open_failure(&self, ui: &UiHandle, url: &str) {
        tracing::warn!(url, "could not open download externally");
        ui.toast(messages::DOWNLOAD_UNAVAILABLE, ToastDuration::Short);
    }

    fn blob_fetch_script(&self, url: &str, filename: &str) -> String {
        // Values go in as JSON string literals, which are valid JS literals.
        let url = js_string(url);
        let filename = js_string(filename);
        let bridge = js_string(&self.bridge_name);
        format!(
            "(function() {{\
               var xhr = new XMLHttpRequest();\
               xhr.open('GET', {url}, true);\
               xhr.responseType = 'blob';\
               xhr.onload = function() {{\
                 var reader = new FileReader();\
                 reader.onloadend = function() {{\
                   var base64 = reader.result.split(',')[1];\
                   window[{bridge}].saveBase64File(base64, {filename}, 'application/json');\
                 }};\
                 reader.readAsDataURL(xhr.response);\
               }};\
               xhr.send();\
             }})();"
        )
    }
}

fn js_string(value: &str) -> String {
    serde_json::Value::String(value.to_owned()).to_string()
}
