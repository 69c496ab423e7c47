/// Drop targets and the surface that owns them.
///
/// A [`Surface`] plays the role of the document: it owns named targets and
/// resolves selectors to them. A [`DropTarget`] carries the state a DOM node
/// would: a class list, a listener set per drag event kind, and timer hooks
/// the host pumps with [`DropTarget::tick`].
///
/// Time is host-driven. A frame-based host calls [`Surface::tick`] once per
/// frame and uses [`Surface::next_deadline`] to schedule its next wake-up.
///
/// Handles are cheap to clone (`Arc` inside); clones refer to the same target.
use crate::error::{DropError, Result};
use crate::event::{DragEvent, DragEventKind};
use parking_lot::{Mutex, RwLock};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// An event listener. Runs on the dispatching thread.
pub type Listener = Arc<dyn Fn(&mut DragEvent) + Send + Sync>;

/// A deadline-driven callback registered on a target.
pub trait TimerHook: Send + Sync {
    /// Run any work whose deadline is at or before `now`.
    fn fire_due(&self, now: Instant);

    /// The earliest pending deadline, if any.
    fn deadline(&self) -> Option<Instant>;
}

/// Identifies a registered listener or timer hook for removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// A target given either by selector or by handle.
pub enum TargetRef<'a> {
    Selector(&'a str),
    Target(DropTarget),
}

impl<'a> From<&'a str> for TargetRef<'a> {
    fn from(selector: &'a str) -> Self {
        Self::Selector(selector)
    }
}

impl From<DropTarget> for TargetRef<'_> {
    fn from(target: DropTarget) -> Self {
        Self::Target(target)
    }
}

impl From<&DropTarget> for TargetRef<'_> {
    fn from(target: &DropTarget) -> Self {
        Self::Target(target.clone())
    }
}

/// Registry of drop targets.
#[derive(Default)]
pub struct Surface {
    targets: RwLock<Vec<DropTarget>>,
}

impl Surface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a target for `selector`, or return the existing one.
    pub fn create_target(&self, selector: &str) -> DropTarget {
        if let Some(existing) = self.query_selector(selector) {
            return existing;
        }
        let target = DropTarget::new(selector);
        self.targets.write().push(target.clone());
        target
    }

    pub fn query_selector(&self, selector: &str) -> Option<DropTarget> {
        self.targets
            .read()
            .iter()
            .find(|t| t.selector() == selector)
            .cloned()
    }

    pub fn resolve(&self, target: TargetRef<'_>) -> Result<DropTarget> {
        match target {
            TargetRef::Target(t) => Ok(t),
            TargetRef::Selector(selector) => {
                self.query_selector(selector)
                    .ok_or_else(|| DropError::TargetNotFound {
                        selector: selector.to_string(),
                    })
            }
        }
    }

    /// Remove a target from the registry. Existing handles stay usable.
    pub fn remove_target(&self, selector: &str) -> bool {
        let mut targets = self.targets.write();
        let before = targets.len();
        targets.retain(|t| t.selector() != selector);
        targets.len() != before
    }

    /// Pump due timers on every target.
    pub fn tick(&self, now: Instant) {
        let targets = self.targets.read().clone();
        for target in &targets {
            target.tick(now);
        }
    }

    /// Earliest pending timer deadline across all targets.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.targets
            .read()
            .iter()
            .filter_map(DropTarget::next_deadline)
            .min()
    }
}

struct TargetInner {
    selector: String,
    classes: RwLock<Vec<String>>,
    listeners: Mutex<Vec<(ListenerId, DragEventKind, Listener)>>,
    timers: Mutex<Vec<(ListenerId, Arc<dyn TimerHook>)>>,
    next_id: AtomicU64,
}

#[derive(Clone)]
pub struct DropTarget {
    inner: Arc<TargetInner>,
}

impl fmt::Debug for DropTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DropTarget")
            .field("selector", &self.inner.selector)
            .field("classes", &*self.inner.classes.read())
            .field("listeners", &self.inner.listeners.lock().len())
            .field("timers", &self.inner.timers.lock().len())
            .finish()
    }
}

impl DropTarget {
    /// A standalone target, not registered on any surface.
    pub fn new(selector: &str) -> Self {
        Self {
            inner: Arc::new(TargetInner {
                selector: selector.to_string(),
                classes: RwLock::new(Vec::new()),
                listeners: Mutex::new(Vec::new()),
                timers: Mutex::new(Vec::new()),
                next_id: AtomicU64::new(0),
            }),
        }
    }

    pub fn selector(&self) -> &str {
        &self.inner.selector
    }

    /// True if both handles refer to the same target.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    // ── Class list ─────────────────────────────────────

    pub fn has_class(&self, class: &str) -> bool {
        self.inner.classes.read().iter().any(|c| c == class)
    }

    /// Add a class. Returns `true` if it was not already present.
    pub fn add_class(&self, class: &str) -> bool {
        let mut classes = self.inner.classes.write();
        if classes.iter().any(|c| c == class) {
            return false;
        }
        classes.push(class.to_string());
        true
    }

    /// Remove a class. Returns `true` if it was present.
    pub fn remove_class(&self, class: &str) -> bool {
        let mut classes = self.inner.classes.write();
        let before = classes.len();
        classes.retain(|c| c != class);
        classes.len() != before
    }

    pub fn classes(&self) -> Vec<String> {
        self.inner.classes.read().clone()
    }

    // ── Listeners ──────────────────────────────────────

    fn next_id(&self) -> ListenerId {
        ListenerId(self.inner.next_id.fetch_add(1, Ordering::Relaxed))
    }

    pub fn add_listener(&self, kind: DragEventKind, listener: Listener) -> ListenerId {
        let id = self.next_id();
        self.inner.listeners.lock().push((id, kind, listener));
        id
    }

    /// Returns `true` if the listener was registered.
    pub fn remove_listener(&self, id: ListenerId) -> bool {
        let mut listeners = self.inner.listeners.lock();
        let before = listeners.len();
        listeners.retain(|(lid, _, _)| *lid != id);
        listeners.len() != before
    }

    pub fn listener_count(&self, kind: DragEventKind) -> usize {
        self.inner
            .listeners
            .lock()
            .iter()
            .filter(|(_, k, _)| *k == kind)
            .count()
    }

    /// Invoke every listener registered for the event's kind, in
    /// registration order. Returns how many ran.
    ///
    /// Listeners are snapshotted first, so a listener may add or remove
    /// listeners (including itself) without deadlocking.
    pub fn dispatch(&self, event: &mut DragEvent) -> usize {
        let matching: Vec<Listener> = self
            .inner
            .listeners
            .lock()
            .iter()
            .filter(|(_, kind, _)| *kind == event.kind)
            .map(|(_, _, l)| Arc::clone(l))
            .collect();
        for listener in &matching {
            listener(event);
        }
        matching.len()
    }

    // ── Timers ─────────────────────────────────────────

    pub fn add_timer(&self, hook: Arc<dyn TimerHook>) -> ListenerId {
        let id = self.next_id();
        self.inner.timers.lock().push((id, hook));
        id
    }

    pub fn remove_timer(&self, id: ListenerId) -> bool {
        let mut timers = self.inner.timers.lock();
        let before = timers.len();
        timers.retain(|(tid, _)| *tid != id);
        timers.len() != before
    }

    pub fn tick(&self, now: Instant) {
        let hooks: Vec<Arc<dyn TimerHook>> = self
            .inner
            .timers
            .lock()
            .iter()
            .map(|(_, h)| Arc::clone(h))
            .collect();
        for hook in hooks {
            hook.fire_due(now);
        }
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.inner
            .timers
            .lock()
            .iter()
            .filter_map(|(_, h)| h.deadline())
            .min()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;
    use std::time::Duration;

    #[test]
    fn create_target_is_idempotent_per_selector() {
        let surface = Surface::new();
        let a = surface.create_target("#zone");
        let b = surface.create_target("#zone");
        assert!(a.ptr_eq(&b));
        assert!(surface.query_selector("#other").is_none());
    }

    #[test]
    fn removed_target_no_longer_resolves() {
        let surface = Surface::new();
        let t = surface.create_target("#zone");
        assert!(surface.remove_target("#zone"));
        assert!(!surface.remove_target("#zone"));
        assert!(surface.query_selector("#zone").is_none());
        assert!(t.add_class("still-usable"));
    }

    #[test]
    fn resolve_reports_missing_selector() {
        let surface = Surface::new();
        let err = surface.resolve("#missing".into()).unwrap_err();
        assert!(matches!(err, DropError::TargetNotFound { ref selector } if selector == "#missing"));
    }

    #[test]
    fn resolve_accepts_unregistered_handles() {
        let surface = Surface::new();
        let t = DropTarget::new("#loose");
        assert!(surface.resolve((&t).into()).unwrap().ptr_eq(&t));
    }

    #[test]
    fn class_list_add_remove() {
        let t = DropTarget::new("#t");
        assert!(t.add_class("drag"));
        assert!(!t.add_class("drag"));
        assert!(t.has_class("drag"));
        assert_eq!(t.classes(), ["drag"]);
        assert!(t.remove_class("drag"));
        assert!(!t.remove_class("drag"));
        assert!(!t.has_class("drag"));
    }

    #[test]
    fn dispatch_runs_only_matching_listeners() {
        let t = DropTarget::new("#t");
        let hits = Arc::new(AtomicUsize::new(0));
        let h = hits.clone();
        let id = t.add_listener(
            DragEventKind::Over,
            Arc::new(move |ev: &mut DragEvent| {
                ev.prevent_default();
                h.fetch_add(1, Ordering::SeqCst);
            }),
        );

        let mut over = DragEvent::over(Instant::now());
        assert_eq!(t.dispatch(&mut over), 1);
        assert!(over.is_default_prevented());

        let mut enter = DragEvent::enter(Instant::now());
        assert_eq!(t.dispatch(&mut enter), 0);
        assert_eq!(hits.load(Ordering::SeqCst), 1);

        assert!(t.remove_listener(id));
        assert!(!t.remove_listener(id));
        assert_eq!(t.dispatch(&mut DragEvent::over(Instant::now())), 0);
    }

    #[test]
    fn listener_may_remove_itself() {
        let t = DropTarget::new("#t");
        let t2 = t.clone();
        let slot = Arc::new(Mutex::new(None::<ListenerId>));
        let slot2 = slot.clone();
        let id = t.add_listener(
            DragEventKind::Drop,
            Arc::new(move |_: &mut DragEvent| {
                if let Some(id) = *slot2.lock() {
                    t2.remove_listener(id);
                }
            }),
        );
        *slot.lock() = Some(id);
        t.dispatch(&mut DragEvent::drop(Instant::now(), Default::default()));
        assert_eq!(t.listener_count(DragEventKind::Drop), 0);
    }

    struct Deadline(Mutex<Option<Instant>>, AtomicUsize);

    impl TimerHook for Deadline {
        fn fire_due(&self, now: Instant) {
            let mut d = self.0.lock();
            if d.is_some_and(|d| d <= now) {
                *d = None;
                self.1.fetch_add(1, Ordering::SeqCst);
            }
        }

        fn deadline(&self) -> Option<Instant> {
            *self.0.lock()
        }
    }

    #[test]
    fn surface_tick_fires_due_timers() {
        let surface = Surface::new();
        let t = surface.create_target("#t");
        let start = Instant::now();
        let hook = Arc::new(Deadline(
            Mutex::new(Some(start + Duration::from_millis(50))),
            AtomicUsize::new(0),
        ));
        let id = t.add_timer(hook.clone());

        assert_eq!(surface.next_deadline(), Some(start + Duration::from_millis(50)));
        surface.tick(start + Duration::from_millis(10));
        assert_eq!(hook.1.load(Ordering::SeqCst), 0);
        surface.tick(start + Duration::from_millis(60));
        assert_eq!(hook.1.load(Ordering::SeqCst), 1);
        assert_eq!(surface.next_deadline(), None);

        assert!(t.remove_timer(id));
    }
}
