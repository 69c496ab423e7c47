/// Drag-over visual feedback.
///
/// Hosts fire `dragover` continuously (browsers roughly every 50ms) while a
/// drag hovers a target. [`DragFeedback`] turns that stream into a steady
/// "active" state:
///
/// - A leading-edge throttle (default 100ms) lets the first event of each
///   window through and drops the rest. There is no trailing call.
/// - Each event let through adds the active class and replaces the pending
///   removal deadline with `now + decay` (default 150ms).
/// - Events dropped by the throttle still push the removal deadline out, so
///   event spacing between half the throttle window and the full window
///   cannot open a gap in the active state.
/// - When the deadline passes ([`TimerHook::fire_due`]) the class is removed.
///
/// The observer, if any, is told about transitions only: once when the
/// state turns active and once when it turns inactive.
use crate::settings::DropSettings;
use crate::surface::{DropTarget, TimerHook};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Receives `true` when the target becomes active and `false` when it stops.
pub type ActiveObserver = Arc<dyn Fn(bool) + Send + Sync>;

#[derive(Debug, Default)]
struct FeedbackState {
    last_pulse: Option<Instant>,
    remove_at: Option<Instant>,
    active: bool,
}

pub struct DragFeedback {
    target: DropTarget,
    class: String,
    throttle: Duration,
    decay: Duration,
    observer: Option<ActiveObserver>,
    state: Mutex<FeedbackState>,
}

impl DragFeedback {
    pub fn new(
        target: DropTarget,
        settings: &DropSettings,
        observer: Option<ActiveObserver>,
    ) -> Self {
        Self {
            target,
            class: settings.active_class.clone(),
            throttle: settings.throttle(),
            decay: settings.decay(),
            observer,
            state: Mutex::new(FeedbackState::default()),
        }
    }

    /// Feed one raw `dragover`. Returns `true` if the throttle let it through.
    pub fn drag_over(&self, now: Instant) -> bool {
        let (pulsed, became_active) = {
            let mut state = self.state.lock();
            let pulse = state
                .last_pulse
                .is_none_or(|last| now.saturating_duration_since(last) >= self.throttle);

            if pulse {
                state.last_pulse = Some(now);
                state.remove_at = Some(now + self.decay);
                self.target.add_class(&self.class);
                let became_active = !state.active;
                state.active = true;
                (true, became_active)
            } else {
                if state.active {
                    let extended = now + self.decay;
                    state.remove_at =
                        Some(state.remove_at.map_or(extended, |at| at.max(extended)));
                }
                (false, false)
            }
        };

        if became_active {
            self.notify(true);
        }
        pulsed
    }

    /// Drop the active state immediately and cancel the pending deadline.
    pub fn clear(&self) {
        let was_active = {
            let mut state = self.state.lock();
            state.remove_at = None;
            std::mem::replace(&mut state.active, false)
        };
        self.target.remove_class(&self.class);
        if was_active {
            self.notify(false);
        }
    }

    pub fn is_active(&self) -> bool {
        self.state.lock().active
    }

    fn notify(&self, active: bool) {
        if let Some(observer) = &self.observer {
            observer(active);
        }
    }
}

impl TimerHook for DragFeedback {
    fn fire_due(&self, now: Instant) {
        let expired = {
            let mut state = self.state.lock();
            match state.remove_at {
                Some(at) if at <= now => {
                    state.remove_at = None;
                    state.active = false;
                    self.target.remove_class(&self.class);
                    true
                }
                _ => false,
            }
        };
        if expired {
            self.notify(false);
        }
    }

    fn deadline(&self) -> Option<Instant> {
        self.state.lock().remove_at
    }
}
