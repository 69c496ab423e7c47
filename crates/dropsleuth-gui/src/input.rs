/// Translate egui's file drag-and-drop input into drag events.
///
/// egui does not emit `dragenter` / `dragover` / `drop`; it exposes the files
/// hovering the window (`raw.hovered_files`) and the files released this
/// frame (`raw.dropped_files`). [`DragTranslator`] turns one frame of that
/// into the event sequence a DOM drop zone would see:
///
/// - first hovered frame with the pointer inside the zone: `dragenter`
/// - every hovered frame inside the zone: `dragover`
/// - hover ends or the pointer leaves: `dragleave`
/// - files released inside the zone: `drop`
///
/// Drops where every file has a native path use the items path, so folders
/// are flattened. Byte-only drops (the web backend) fall back to the flat
/// file list with the pointer position.
use dropsleuth_core::entry::fs::FsEntry;
use dropsleuth_core::event::{DataTransfer, DragEvent};
use dropsleuth_core::model::{DropPoint, DroppedFile};
use egui::{Pos2, Rect};
use std::time::Instant;

/// The slice of egui input the translator needs for one frame.
#[derive(Debug, Clone)]
pub struct FrameInput {
    pub now: Instant,
    /// Files are being dragged over the window.
    pub hovering: bool,
    /// Pointer position, when the backend reports one during the drag.
    pub pointer: Option<Pos2>,
    pub dropped: Vec<egui::DroppedFile>,
}

impl FrameInput {
    /// Snapshot this frame's drag input.
    pub fn capture(ctx: &egui::Context) -> Self {
        ctx.input(|i| Self {
            now: Instant::now(),
            hovering: !i.raw.hovered_files.is_empty(),
            pointer: i.pointer.hover_pos().or_else(|| i.pointer.interact_pos()),
            dropped: i.raw.dropped_files.clone(),
        })
    }
}

/// Tracks whether a drag is inside the zone across frames.
#[derive(Debug, Default)]
pub struct DragTranslator {
    inside: bool,
}

impl DragTranslator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_inside(&self) -> bool {
        self.inside
    }

    /// Produce the events for one frame against the zone's screen rect.
    pub fn translate(&mut self, zone: Rect, input: FrameInput, page_size: usize) -> Vec<DragEvent> {
        let mut events = Vec::new();
        // Native backends often stop reporting the pointer while an OS drag
        // is in progress. Treat a missing position as over the zone.
        let pointer_inside = input.pointer.is_none_or(|pos| zone.contains(pos));
        let point = input
            .pointer
            .map(|pos| DropPoint::new(pos.x, pos.y))
            .unwrap_or_default();

        if input.hovering && pointer_inside {
            if !self.inside {
                self.inside = true;
                events.push(DragEvent::enter(input.now).at(point));
            }
            events.push(DragEvent::over(input.now).at(point));
        } else if self.inside && input.dropped.is_empty() {
            self.inside = false;
            events.push(DragEvent::leave(input.now).at(point));
        }

        if !input.dropped.is_empty() {
            if pointer_inside {
                let data = data_transfer(input.dropped, page_size);
                events.push(DragEvent::drop(input.now, data).at(point));
            } else {
                tracing::debug!("Ignoring {} file(s) dropped outside the zone", input.dropped.len());
            }
            self.inside = false;
        }
        events
    }
}

/// Build the data transfer for a drop.
pub fn data_transfer(dropped: Vec<egui::DroppedFile>, page_size: usize) -> DataTransfer {
    if dropped.iter().all(|f| f.path.is_some()) {
        let items = dropped
            .into_iter()
            .filter_map(|f| f.path)
            .map(|path| FsEntry::from_path(path, page_size))
            .collect();
        return DataTransfer::with_items(items);
    }
    DataTransfer::with_files(dropped.into_iter().map(legacy_file).collect())
}

/// A flat file handle from whatever the backend supplied.
fn legacy_file(file: egui::DroppedFile) -> DroppedFile {
    let name = if !file.name.is_empty() {
        file.name.clone()
    } else {
        file.path
            .as_deref()
            .and_then(|p| p.file_name())
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "unnamed".to_string())
    };
    let size = match (&file.bytes, &file.path) {
        (Some(bytes), _) => bytes.len() as u64,
        (None, Some(path)) => std::fs::metadata(path).map(|m| m.len()).unwrap_or(0),
        (None, None) => 0,
    };
    let handle = DroppedFile::new(&name, size).with_modified(file.last_modified);
    match file.path {
        Some(path) => handle.with_path(path),
        None => handle,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dropsleuth_core::event::DragEventKind;
    use std::sync::Arc;

    fn zone() -> Rect {
        Rect::from_min_size(egui::pos2(100.0, 100.0), egui::vec2(200.0, 100.0))
    }

    fn frame(hovering: bool, pointer: Option<Pos2>, dropped: Vec<egui::DroppedFile>) -> FrameInput {
        FrameInput {
            now: Instant::now(),
            hovering,
            pointer,
            dropped,
        }
    }

    fn kinds(events: &[DragEvent]) -> Vec<DragEventKind> {
        events.iter().map(|e| e.kind).collect()
    }

    fn web_file(name: &str, len: usize) -> egui::DroppedFile {
        egui::DroppedFile {
            name: name.to_string(),
            bytes: Some(Arc::from(vec![0u8; len])),
            ..Default::default()
        }
    }

    #[test]
    fn hover_inside_emits_enter_once_then_over() {
        let mut t = DragTranslator::new();
        let inside = Some(egui::pos2(150.0, 150.0));
        assert_eq!(
            kinds(&t.translate(zone(), frame(true, inside, vec![]), 100)),
            [DragEventKind::Enter, DragEventKind::Over]
        );
        assert_eq!(
            kinds(&t.translate(zone(), frame(true, inside, vec![]), 100)),
            [DragEventKind::Over]
        );
        assert!(t.is_inside());
    }

    #[test]
    fn hover_outside_emits_nothing() {
        let mut t = DragTranslator::new();
        let events = t.translate(zone(), frame(true, Some(egui::pos2(5.0, 5.0)), vec![]), 100);
        assert!(events.is_empty());
    }

    #[test]
    fn leaving_emits_leave() {
        let mut t = DragTranslator::new();
        t.translate(zone(), frame(true, None, vec![]), 100);
        let events = t.translate(zone(), frame(false, None, vec![]), 100);
        assert_eq!(kinds(&events), [DragEventKind::Leave]);
        assert!(!t.is_inside());
    }

    #[test]
    fn byte_only_drop_uses_flat_files_with_point() {
        let mut t = DragTranslator::new();
        let pos = egui::pos2(120.0, 130.0);
        let events = t.translate(
            zone(),
            frame(false, Some(pos), vec![web_file("a.png", 10), web_file("b.png", 20)]),
            100,
        );
        assert_eq!(kinds(&events), [DragEventKind::Drop]);
        let ev = &events[0];
        assert_eq!(ev.point, DropPoint::new(120.0, 130.0));
        assert!(ev.data.items.is_none());
        let sizes: Vec<u64> = ev.data.files.iter().map(|f| f.size).collect();
        assert_eq!(sizes, [10, 20]);
        assert_eq!(ev.data.files[0].name.as_str(), "a.png");
    }

    #[test]
    fn path_drop_uses_items() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("A");
        std::fs::create_dir(&dir).unwrap();
        let dropped = vec![egui::DroppedFile {
            path: Some(dir),
            ..Default::default()
        }];
        let data = data_transfer(dropped, 100);
        let items = data.items.expect("items path");
        assert_eq!(items.len(), 1);
        assert!(items[0].is_directory());
        assert_eq!(items[0].name(), "A");
    }

    #[test]
    fn drop_outside_is_ignored_and_resets() {
        let mut t = DragTranslator::new();
        t.translate(zone(), frame(true, Some(egui::pos2(150.0, 150.0)), vec![]), 100);
        let events = t.translate(
            zone(),
            frame(false, Some(egui::pos2(1.0, 1.0)), vec![web_file("x", 1)]),
            100,
        );
        assert!(events.iter().all(|e| e.kind != DragEventKind::Drop));
        assert!(!t.is_inside());
    }

    #[test]
    fn unnamed_file_falls_back_to_path_then_placeholder() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("named.txt");
        std::fs::write(&path, "hello").unwrap();
        let f = legacy_file(egui::DroppedFile {
            path: Some(path),
            ..Default::default()
        });
        assert_eq!(f.name.as_str(), "named.txt");
        assert_eq!(f.size, 5);

        let f = legacy_file(egui::DroppedFile::default());
        assert_eq!(f.name.as_str(), "unnamed");
        assert_eq!(f.size, 0);
    }
}
