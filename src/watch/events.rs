//! Translation of raw `notify` events into change events.

use crate::types::ChangeEvent;
use notify::event::{ModifyKind, RenameMode};
use notify::{Event, EventKind};
use std::path::PathBuf;
use std::sync::mpsc;

/// Channel carrying change events from a source to the daemon.
pub fn change_channel() -> (mpsc::Sender<ChangeEvent>, mpsc::Receiver<ChangeEvent>) {
    mpsc::channel()
}

/// Convert one `notify` event into zero or more change events.
///
/// Rename halves that arrive unpaired degrade to deletes (`From`) and creates
/// (`To`); the reconciler treats both as ordinary idempotent updates.
pub fn convert_event(event: &Event) -> Vec<ChangeEvent> {
    let each = |make: fn(PathBuf) -> ChangeEvent| -> Vec<ChangeEvent> {
        event.paths.iter().cloned().map(make).collect()
    };

    match &event.kind {
        EventKind::Create(_) => each(ChangeEvent::Created),
        EventKind::Remove(_) => each(ChangeEvent::Deleted),
        EventKind::Modify(ModifyKind::Name(mode)) => match (mode, event.paths.as_slice()) {
            (_, [from, to, ..]) => vec![ChangeEvent::Renamed {
                from: from.clone(),
                to: to.clone(),
            }],
            (RenameMode::From, [path]) => vec![ChangeEvent::Deleted(path.clone())],
            (RenameMode::To, [path]) => vec![ChangeEvent::Created(path.clone())],
            (_, [path]) if path.exists() => vec![ChangeEvent::Created(path.clone())],
            (_, [path]) => vec![ChangeEvent::Deleted(path.clone())],
            _ => Vec::new(),
        },
        EventKind::Modify(_) => each(ChangeEvent::Changed),
        _ => Vec::new(),
    }
}
