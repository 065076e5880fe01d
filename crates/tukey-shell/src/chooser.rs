// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// File chooser slot.
//
// The web view hands over one callback per `<input type=file>` request. At
// most one is held; a new request replaces the old callback without calling
// it, so the earlier page request simply never resolves.

use std::sync::Mutex;

use tukey_core::messages;
use tukey_core::types::ToastDuration;

use crate::ui::UiHandle;

/// Receives the chosen resources: `Some(vec![uri])`, or `None` on cancel.
pub type ChooserCallback = Box<dyn FnOnce(Option<Vec<String>>) + Send>;

/// How a picker activity finished.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChooserOutcome {
    Selected(String),
    Cancelled,
}

impl ChooserOutcome {
    /// Interpret an activity result: only an OK result carrying a URI counts
    /// as a selection.
    pub fn from_activity_result(ok: bool, data: Option<String>) -> Self {
        match data {
            Some(uri) if ok && !uri.is_empty() => Self::Selected(uri),
            _ => Self::Cancelled,
        }
    }

    fn into_selection(self) -> Option<Vec<String>> {
        match self {
            Self::Selected(uri) => Some(vec![uri]),
            Self::Cancelled => None,
        }
    }
}

/// Single-slot register for the pending chooser callback.
pub struct FileChooserSlot {
    pending: Mutex<Option<ChooserCallback>>,
    ui: UiHandle,
}

impl FileChooserSlot {
    pub fn new(ui: UiHandle) -> Self {
        Self {
            pending: Mutex::new(None),
            ui,
        }
    }

    /// Store `callback` as the pending request.
    ///
    /// Returns `true` if a previous callback was replaced (and dropped).
    pub fn begin(&self, callback: ChooserCallback) -> bool {
        let replaced = self
            .pending
            .lock()
            .expect("chooser lock poisoned")
            .replace(callback)
            .is_some();
        if replaced {
            tracing::debug!("pending file chooser request replaced");
        }
        replaced
    }

    /// Drop the pending callback after the picker failed to start, without
    /// calling it, and tell the user.
    pub fn abort(&self) {
        tracing::warn!("could not start file chooser");
        self.pending.lock().expect("chooser lock poisoned").take();
        self.ui
            .toast(messages::FILE_CHOOSER_UNAVAILABLE, ToastDuration::Short);
    }

    /// Deliver the outcome to the pending callback and clear the slot.
    ///
    /// Returns `false` when nothing was pending.
    pub fn complete(&self, outcome: ChooserOutcome) -> bool {
        let callback = self.pending.lock().expect("chooser lock poisoned").take();
        match callback {
            Some(cb) => {
                cb(outcome.into_selection());
                true
            }
            None => {
                tracing::debug!("chooser result with no pending request ignored");
                false
            }
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.lock().expect("chooser lock poisoned").is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::{ui_queue, UiEvent};
    use std::sync::Arc;

    type Seen = Arc<Mutex<Vec<Option<Vec<String>>>>>;

    fn recorder() -> (Seen, impl Fn() -> ChooserCallback) {
        let seen: Seen = Arc::default();
        let make = {
            let seen = seen.clone();
            move || -> ChooserCallback {
                let seen = seen.clone();
                Box::new(move |r| seen.lock().unwrap().push(r))
            }
        };
        (seen, make)
    }

    #[test]
    fn selection_delivers_single_uri() {
        let (ui, _events) = ui_queue();
        let slot = FileChooserSlot::new(ui);
        let (seen, cb) = recorder();

        assert!(!slot.begin(cb()));
        assert!(slot.complete(ChooserOutcome::Selected("content://media/1".into())));
        assert_eq!(
            *seen.lock().unwrap(),
            vec![Some(vec!["content://media/1".to_string()])]
        );
        assert!(!slot.is_pending());
    }

    #[test]
    fn cancel_delivers_none() {
        let (ui, _events) = ui_queue();
        let slot = FileChooserSlot::new(ui);
        let (seen, cb) = recorder();

        slot.begin(cb());
        slot.complete(ChooserOutcome::from_activity_result(false, None));
        assert_eq!(*seen.lock().unwrap(), vec![None]);
    }

    #[test]
    fn second_request_silently_replaces_first() {
        let (ui, _events) = ui_queue();
        let slot = FileChooserSlot::new(ui);
        let (first_seen, first) = recorder();
        let (second_seen, second) = recorder();

        slot.begin(first());
        assert!(slot.begin(second()));
        slot.complete(ChooserOutcome::Selected("content://x".into()));

        assert!(first_seen.lock().unwrap().is_empty());
        assert_eq!(second_seen.lock().unwrap().len(), 1);
    }

    #[test]
    fn completion_without_request_is_ignored() {
        let (ui, _events) = ui_queue();
        let slot = FileChooserSlot::new(ui);
        assert!(!slot.complete(ChooserOutcome::Cancelled));
    }

    #[test]
    fn abort_drops_callback_without_calling_it() {
        let (ui, mut events) = ui_queue();
        let slot = FileChooserSlot::new(ui);
        let (seen, cb) = recorder();

        slot.begin(cb());
        slot.abort();
        assert!(!slot.is_pending());
        assert!(!slot.complete(ChooserOutcome::Cancelled));
        assert!(seen.lock().unwrap().is_empty());
        assert_eq!(
            events.try_next(),
            Some(UiEvent::Toast {
                message: "Cannot open file chooser".into(),
                duration: ToastDuration::Short,
            })
        );
    }

    #[test]
    fn ok_result_without_data_is_cancel() {
        assert_eq!(
            ChooserOutcome::from_activity_result(true, None),
            ChooserOutcome::Cancelled
        );
        assert_eq!(
            ChooserOutcome::from_activity_result(true, Some("content://a".into())),
            ChooserOutcome::Selected("content://a".into())
        );
    }
}
