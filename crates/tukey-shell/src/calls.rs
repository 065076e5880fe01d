// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Bridge call protocol.
//
// Hosts that talk to their page through string messages (IPC handlers,
// JSON lines on stdio) encode each bridge method call as one JSON object:
//
//   {"id": 7, "method": "saveFile", "content": "…", "filename": "a.txt", "mimeType": null}
//
// and get back `{"id": 7, "result": true}` or `{"id": 7, "error": "…"}`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::storage::StorageBridge;

/// One call on the bridge surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "camelCase")]
pub enum BridgeCall {
    #[serde(rename_all = "camelCase")]
    SaveFile {
        content: String,
        filename: String,
        #[serde(default)]
        mime_type: Option<String>,
    },
    #[serde(rename_all = "camelCase")]
    SaveBase64File {
        base64_content: String,
        filename: String,
        #[serde(default)]
        mime_type: Option<String>,
    },
    ShowToast {
        message: String,
    },
    IsBridgeActive,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BridgeReply {
    pub id: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Execute a call and return its JavaScript-visible result.
///
/// Saves return a boolean, `showToast` returns null.
pub fn dispatch(bridge: &StorageBridge, call: BridgeCall) -> Value {
    match call {
        BridgeCall::SaveFile {
            content,
            filename,
            mime_type,
        } => Value::Bool(
            bridge
                .save_text(&content, &filename, mime_type.as_deref())
                .success,
        ),
        BridgeCall::SaveBase64File {
            base64_content,
            filename,
            mime_type,
        } => Value::Bool(
            bridge
                .save_base64(&base64_content, &filename, mime_type.as_deref())
                .success,
        ),
        BridgeCall::ShowToast { message } => {
            bridge.notify(&message);
            Value::Null
        }
        BridgeCall::IsBridgeActive => Value::Bool(bridge.is_bridge_active()),
    }
}

/// Handle one JSON-encoded request and encode the reply.
///
/// The `id` is read before the call itself so that a request with a bad
/// method or missing arguments still gets its error matched to it.
pub fn handle_message(bridge: &StorageBridge, message: &str) -> String {
    let reply = match serde_json::from_str::<Value>(message) {
        Ok(mut request) => {
            let id = request
                .as_object_mut()
                .and_then(|fields| fields.remove("id"))
                .unwrap_or(Value::Null);
            match serde_json::from_value::<BridgeCall>(request) {
                Ok(call) => BridgeReply {
                    id,
                    result: Some(dispatch(bridge, call)),
                    error: None,
                },
                Err(e) => malformed(id, &e),
            }
        }
        Err(e) => malformed(Value::Null, &e),
    };
    // Serializing a reply built from `Value`s and strings cannot fail.
    serde_json::to_string(&reply).unwrap_or_default()
}

fn malformed(id: Value, e: &serde_json::Error) -> BridgeReply {
    tracing::warn!(error = %e, %id, "malformed bridge call");
    BridgeReply {
        id,
        result: None,
        error: Some(format!("malformed bridge call: {e}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strategy::DirectFilesystem;
    use crate::ui::{ui_queue, UiEvent, UiEvents};
    use serde_json::json;
    use tukey_core::types::ToastDuration;

    fn bridge(dir: &std::path::Path) -> (StorageBridge, UiEvents) {
        let (ui, events) = ui_queue();
        (StorageBridge::new(Box::new(DirectFilesystem::new(dir)), ui), events)
    }

    #[test]
    fn parses_camel_case_calls() {
        let call: BridgeCall = serde_json::from_value(json!({
            "method": "saveBase64File",
            "base64Content": "aGk=",
            "filename": "hi.txt",
            "mimeType": "text/plain"
        }))
        .unwrap();
        assert_eq!(
            call,
            BridgeCall::SaveBase64File {
                base64_content: "aGk=".into(),
                filename: "hi.txt".into(),
                mime_type: Some("text/plain".into()),
            }
        );
    }

    #[test]
    fn mime_type_may_be_absent_or_null() {
        for raw in [
            json!({"method": "saveFile", "content": "x", "filename": "a"}),
            json!({"method": "saveFile", "content": "x", "filename": "a", "mimeType": null}),
        ] {
            let call: BridgeCall = serde_json::from_value(raw).unwrap();
            assert!(matches!(call, BridgeCall::SaveFile { mime_type: None, .. }));
        }
    }

    #[test]
    fn save_file_round_trip_through_messages() {
        let tmp = tempfile::tempdir().unwrap();
        let (bridge, _events) = bridge(tmp.path());

        let reply = handle_message(
            &bridge,
            r#"{"id":1,"method":"saveFile","content":"hello world","filename":"note.txt","mimeType":"text/plain"}"#,
        );
        assert_eq!(
            serde_json::from_str::<Value>(&reply).unwrap(),
            json!({"id": 1, "result": true})
        );
        assert_eq!(std::fs::read(tmp.path().join("note.txt")).unwrap(), b"hello world");
    }

    #[test]
    fn bad_base64_returns_false() {
        let tmp = tempfile::tempdir().unwrap();
        let (bridge, _events) = bridge(tmp.path());
        let result = dispatch(
            &bridge,
            BridgeCall::SaveBase64File {
                base64_content: "not-base64!!".into(),
                filename: "x.bin".into(),
                mime_type: None,
            },
        );
        assert_eq!(result, Value::Bool(false));
    }

    #[test]
    fn show_toast_returns_null_and_queues() {
        let tmp = tempfile::tempdir().unwrap();
        let (bridge, mut events) = bridge(tmp.path());
        let result = dispatch(&bridge, BridgeCall::ShowToast { message: "hi".into() });
        assert_eq!(result, Value::Null);
        assert_eq!(
            events.try_next(),
            Some(UiEvent::Toast {
                message: "hi".into(),
                duration: ToastDuration::Short,
            })
        );
    }

    #[test]
    fn is_bridge_active_takes_no_arguments() {
        let tmp = tempfile::tempdir().unwrap();
        let (bridge, _events) = bridge(tmp.path());
        let reply = handle_message(&bridge, r#"{"method":"isBridgeActive"}"#);
        assert_eq!(
            serde_json::from_str::<Value>(&reply).unwrap(),
            json!({"id": null, "result": true})
        );
    }

    #[test]
    fn missing_arguments_keep_request_id() {
        let tmp = tempfile::tempdir().unwrap();
        let (bridge, _events) = bridge(tmp.path());
        let reply: Value =
            serde_json::from_str(&handle_message(&bridge, r#"{"id":7,"method":"saveFile"}"#))
                .unwrap();
        assert_eq!(reply["id"], json!(7));
        assert!(reply["error"].as_str().unwrap().starts_with("malformed bridge call"));
        assert!(reply.get("result").is_none());
    }

    #[test]
    fn non_json_line_replies_with_null_id() {
        let tmp = tempfile::tempdir().unwrap();
        let (bridge, _events) = bridge(tmp.path());
        let reply: Value = serde_json::from_str(&handle_message(&bridge, "not json")).unwrap();
        assert_eq!(reply["id"], Value::Null);
        assert!(reply["error"].is_string());
    }

    #[test]
    fn unknown_method_is_reported() {
        let tmp = tempfile::tempdir().unwrap();
        let (bridge, _events) = bridge(tmp.path());
        let reply: Value =
            serde_json::from_str(&handle_message(&bridge, r#"{"method":"formatDisk"}"#)).unwrap();
        assert!(reply["error"].as_str().unwrap().starts_with("malformed bridge call"));
        assert!(reply.get("result").is_none());
    }
}
