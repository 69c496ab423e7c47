/// Event binding -- the public entry point.
///
/// [`attach`] registers three listeners on a drop target:
///
/// - `dragenter` stops propagation and prevents the default action.
/// - `dragover` does the same, sets the drop-effect hint to `Copy`, and
///   feeds the throttled [`DragFeedback`].
/// - `drop` stops the event, clears the active class, and resolves the
///   payload through [`DropResolver`].
///
/// It also registers the feedback's decay deadline as a timer hook on the
/// target. The returned [`Teardown`] removes all of it.
use crate::error::Result;
use crate::event::{DragEvent, DragEventKind, DropEffect};
use crate::feedback::{ActiveObserver, DragFeedback};
use crate::model::DroppedBatch;
use crate::resolver::{DropCallback, DropResolver, Resolution};
use crate::settings::DropSettings;
use crate::surface::{DropTarget, ListenerId, Surface, TargetRef};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, info};

#[derive(Clone, Default)]
pub struct AttachOptions {
    pub settings: DropSettings,
    /// Told when the target turns active or inactive.
    pub on_active_change: Option<ActiveObserver>,
}

impl AttachOptions {
    pub fn new(settings: DropSettings) -> Self {
        Self {
            settings,
            on_active_change: None,
        }
    }

    pub fn on_active_change(mut self, observer: impl Fn(bool) + Send + Sync + 'static) -> Self {
        self.on_active_change = Some(Arc::new(observer));
        self
    }
}

/// Bind drag-and-drop handling to a target.
///
/// `target` is a selector resolved through `surface`, or a target handle.
/// `ondrop` receives every resolved drop: on the dispatching thread for flat
/// file drops, on a background thread for item drops.
pub fn attach<'a>(
    surface: &Surface,
    target: impl Into<TargetRef<'a>>,
    options: AttachOptions,
    ondrop: impl Fn(Result<DroppedBatch>) + Send + Sync + 'static,
) -> Result<Teardown> {
    options.settings.validate()?;
    let target = surface.resolve(target.into())?;

    let feedback = Arc::new(DragFeedback::new(
        target.clone(),
        &options.settings,
        options.on_active_change,
    ));
    let resolver = Arc::new(DropResolver::new(&options.settings));
    let ondrop: DropCallback = Arc::new(ondrop);

    let enter = target.add_listener(DragEventKind::Enter, Arc::new(stop_event));

    let over = {
        let feedback = Arc::clone(&feedback);
        target.add_listener(
            DragEventKind::Over,
            Arc::new(move |ev: &mut DragEvent| {
                stop_event(ev);
                ev.data.drop_effect = DropEffect::Copy;
                feedback.drag_over(ev.timestamp);
            }),
        )
    };

    let on_drop = {
        let feedback = Arc::clone(&feedback);
        target.add_listener(
            DragEventKind::Drop,
            Arc::new(move |ev: &mut DragEvent| {
                stop_event(ev);
                feedback.clear();
                let resolution = Resolution::from_transfer(&mut ev.data, ev.point);
                // Detached: teardown does not cancel in-flight traversals.
                let _ = resolver.dispatch(resolution, Arc::clone(&ondrop));
            }),
        )
    };

    let timer = target.add_timer(feedback.clone());

    info!("Attached drag-and-drop to {}", target.selector());
    Ok(Teardown {
        target,
        feedback,
        listeners: [enter, over, on_drop],
        timer,
        removed: AtomicBool::new(false),
    })
}

fn stop_event(ev: &mut DragEvent) {
    ev.stop_propagation();
    ev.prevent_default();
}

/// Detaches what [`attach`] registered. Safe to call more than once.
pub struct Teardown {
    target: DropTarget,
    feedback: Arc<DragFeedback>,
    listeners: [ListenerId; 3],
    timer: ListenerId,
    removed: AtomicBool,
}

impl Teardown {
    /// Remove the active class, the three listeners and the decay timer.
    pub fn remove(&self) {
        if self.removed.swap(true, Ordering::SeqCst) {
            debug!("Teardown of {} already done", self.target.selector());
            return;
        }
        self.feedback.clear();
        for id in self.listeners {
            self.target.remove_listener(id);
        }
        self.target.remove_timer(self.timer);
        info!("Detached drag-and-drop from {}", self.target.selector());
    }

    pub fn is_removed(&self) -> bool {
        self.removed.load(Ordering::SeqCst)
    }

    pub fn target(&self) -> &DropTarget {
        &self.target
    }

    /// Whether the target is currently showing drag-over feedback.
    pub fn is_active(&self) -> bool {
        self.feedback.is_active()
    }
}
