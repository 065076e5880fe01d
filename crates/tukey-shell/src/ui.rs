// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// UI event queue.
//
// Bridge calls arrive on whatever thread the web view uses for script
// callbacks. Anything user-visible is posted here instead and delivered by
// the single owner of `UiEvents`, which lives on the UI thread.
//
// Hosts that pump the queue from their own loop install a waker; it runs after
// every post so the host can schedule a drain on its UI thread.

use std::fmt;
use std::sync::{Arc, OnceLock};

use tokio::sync::mpsc;
use tukey_bridge::traits::NativeToast;
use tukey_core::types::ToastDuration;

/// Something the UI thread has to show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    Toast {
        message: String,
        duration: ToastDuration,
    },
}

type Waker = Box<dyn Fn() + Send + Sync>;

/// Sending side of the queue. Cheap to clone, usable from any thread.
#[derive(Clone)]
pub struct UiHandle {
    tx: mpsc::UnboundedSender<UiEvent>,
    waker: Arc<OnceLock<Waker>>,
}

impl fmt::Debug for UiHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UiHandle")
            .field("closed", &self.tx.is_closed())
            .field("waker", &self.waker.get().is_some())
            .finish()
    }
}

/// Receiving side of the queue, owned by the UI thread.
#[derive(Debug)]
pub struct UiEvents {
    rx: mpsc::UnboundedReceiver<UiEvent>,
}

/// Create a connected handle/receiver pair.
pub fn ui_queue() -> (UiHandle, UiEvents) {
    let (tx, rx) = mpsc::unbounded_channel();
    let handle = UiHandle {
        tx,
        waker: Arc::default(),
    };
    (handle, UiEvents { rx })
}

impl UiHandle {
    /// Install the waker for every clone of this handle. Only the first
    /// call takes effect; returns whether this one did.
    pub fn set_waker(&self, waker: impl Fn() + Send + Sync + 'static) -> bool {
        let installed = self.waker.set(Box::new(waker)).is_ok();
        if !installed {
            tracing::debug!("UI waker already installed");
        }
        installed
    }

    /// Post an event and wake the host. Never blocks; a closed queue only
    /// drops the event.
    pub fn post(&self, event: UiEvent) {
        if let Err(e) = self.tx.send(event) {
            tracing::debug!(event = ?e.0, "UI queue closed, event dropped");
            return;
        }
        if let Some(wake) = self.waker.get() {
            wake();
        }
    }

    pub fn toast(&self, message: impl Into<String>, duration: ToastDuration) {
        self.post(UiEvent::Toast {
            message: message.into(),
            duration,
        });
    }
}

impl UiEvents {
    /// Next pending event without waiting.
    pub fn try_next(&mut self) -> Option<UiEvent> {
        self.rx.try_recv().ok()
    }

    /// Deliver everything currently queued. Returns the number of events.
    ///
    /// Used where the host pumps the queue from its own main loop (the
    /// Android main looper).
    pub fn drain<T: NativeToast + ?Sized>(&mut self, toast: &T) -> usize {
        let mut delivered = 0;
        while let Some(event) = self.try_next() {
            deliver(toast, event);
            delivered += 1;
        }
        delivered
    }

    /// Deliver events until every `UiHandle` has been dropped.
    pub async fn run<T: NativeToast + ?Sized>(mut self, toast: Arc<T>) {
        while let Some(event) = self.rx.recv().await {
            deliver(toast.as_ref(), event);
        }
        tracing::debug!("UI queue closed");
    }
}

fn deliver<T: NativeToast + ?Sized>(toast: &T, event: UiEvent) {
    match event {
        UiEvent::Toast { message, duration } => {
            if let Err(e) = toast.show_toast(&message, duration) {
                tracing::warn!(error = %e, "failed to show toast");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::RecordingToast;

    #[test]
    fn drain_delivers_in_order() {
        let (ui, mut events) = ui_queue();
        ui.toast("one", ToastDuration::Short);
        ui.toast("two", ToastDuration::Long);

        let toast = RecordingToast::default();
        assert_eq!(events.drain(&toast), 2);
        assert_eq!(
            toast.shown(),
            vec![
                ("one".to_string(), ToastDuration::Short),
                ("two".to_string(), ToastDuration::Long),
            ]
        );
        assert_eq!(events.drain(&toast), 0);
    }

    #[test]
    fn post_from_other_thread_is_queued() {
        let (ui, mut events) = ui_queue();
        std::thread::spawn(move || ui.toast("from worker", ToastDuration::Short))
            .join()
            .unwrap();

        assert_eq!(
            events.try_next(),
            Some(UiEvent::Toast {
                message: "from worker".into(),
                duration: ToastDuration::Short,
            })
        );
    }

    #[test]
    fn post_after_receiver_dropped_is_silent() {
        let (ui, events) = ui_queue();
        drop(events);
        ui.toast("nobody listening", ToastDuration::Short);
    }

    #[test]
    fn waker_runs_after_each_post_from_any_clone() {
        use std::sync::atomic::{AtomicUsize, Ordering};

        let (ui, mut events) = ui_queue();
        let wakes = Arc::new(AtomicUsize::new(0));
        let counter = wakes.clone();
        assert!(ui.set_waker(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        }));
        assert!(!ui.set_waker(|| {}));

        let worker = ui.clone();
        std::thread::spawn(move || worker.toast("saved", ToastDuration::Long))
            .join()
            .unwrap();
        ui.toast("hi", ToastDuration::Short);

        assert_eq!(wakes.load(Ordering::SeqCst), 2);
        assert_eq!(events.drain(&RecordingToast::default()), 2);
    }

    #[test]
    fn waker_skipped_when_queue_closed() {
        use std::sync::atomic::{AtomicBool, Ordering};

        let (ui, events) = ui_queue();
        let woke = Arc::new(AtomicBool::new(false));
        let flag = woke.clone();
        ui.set_waker(move || flag.store(true, Ordering::SeqCst));
        drop(events);

        ui.toast("nobody listening", ToastDuration::Short);
        assert!(!woke.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn run_ends_when_handles_dropped() {
        let (ui, events) = ui_queue();
        let toast = Arc::new(RecordingToast::default());
        ui.toast("hello", ToastDuration::Long);
        drop(ui);

        events.run(toast.clone()).await;
        assert_eq!(toast.shown().len(), 1);
    }
}
