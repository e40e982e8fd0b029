//! Undo/redo across the raster and the shape layer.
//!
//! Two linear stacks are kept. The raster stack holds full checkpoints (raster
//! plus the shape list at that moment) and always has at least one entry. The
//! transform stack holds before/after shape lists for drag and resize
//! gestures. Undo and redo consult the transform stack first.

use crate::shapes::Shape;

/// Default number of entries kept per stack.
pub const DEFAULT_HISTORY_LIMIT: usize = 50;

/// A full restore point.
#[derive(Debug, Clone)]
pub struct Checkpoint<R> {
    pub raster: R,
    pub shapes: Vec<Shape>,
}

/// Shape lists around one drag or resize.
#[derive(Debug, Clone)]
pub struct TransformEntry {
    pub before: Vec<Shape>,
    pub after: Vec<Shape>,
}

/// What an undo or redo restores.
#[derive(Debug, Clone)]
pub enum HistoryStep<R> {
    /// Replace the shape list only; the raster is untouched.
    Shapes(Vec<Shape>),
    /// Replace raster and shape list.
    Checkpoint(Checkpoint<R>),
}

/// Linear checkpoint stack with a current index.
#[derive(Debug, Clone)]
struct RasterStack<R> {
    entries: Vec<Checkpoint<R>>,
    index: usize,
}

/// Linear transform stack; `cursor` counts applied entries.
#[derive(Debug, Clone, Default)]
struct TransformStack {
    entries: Vec<TransformEntry>,
    cursor: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Target {
    Transform,
    Raster,
}

/// The two-stack history engine.
#[derive(Debug, Clone)]
pub struct HistoryEngine<R> {
    raster: RasterStack<R>,
    transforms: TransformStack,
    limit: usize,
}

impl<R: Clone> HistoryEngine<R> {
    /// Start a history whose only entry is `initial`.
    pub fn new(initial: Checkpoint<R>, limit: usize) -> Self {
        Self {
            raster: RasterStack {
                entries: vec![initial],
                index: 0,
            },
            transforms: TransformStack::default(),
            limit: limit.max(1),
        }
    }

    /// Drop everything and start over from `initial`.
    pub fn reset(&mut self, initial: Checkpoint<R>) {
        self.raster.entries = vec![initial];
        self.raster.index = 0;
        self.transforms = TransformStack::default();
    }

    /// Record a new raster checkpoint, discarding redo entries of both stacks.
    pub fn push_checkpoint(&mut self, checkpoint: Checkpoint<R>) {
        self.raster.entries.truncate(self.raster.index + 1);
        self.transforms.entries.truncate(self.transforms.cursor);
        self.raster.entries.push(checkpoint);
        if self.raster.entries.len() > self.limit {
            self.raster.entries.remove(0);
        }
        self.raster.index = self.raster.entries.len() - 1;
        log::debug!(
            "checkpoint pushed ({} raster, {} transform entries)",
            self.raster.entries.len(),
            self.transforms.entries.len()
        );
    }

    /// Record a completed drag or resize.
    pub fn push_transform(&mut self, before: Vec<Shape>, after: Vec<Shape>) {
        self.transforms.entries.truncate(self.transforms.cursor);
        self.transforms.entries.push(TransformEntry { before, after });
        if self.transforms.entries.len() > self.limit {
            self.transforms.entries.remove(0);
        }
        self.transforms.cursor = self.transforms.entries.len();
    }

    pub fn can_undo(&self) -> bool {
        self.undo_target().is_some()
    }

    pub fn can_redo(&self) -> bool {
        self.redo_target().is_some()
    }

    fn undo_target(&self) -> Option<Target> {
        if self.transforms.cursor > 0 {
            Some(Target::Transform)
        } else if self.raster.index > 0 {
            Some(Target::Raster)
        } else {
            None
        }
    }

    fn redo_target(&self) -> Option<Target> {
        if self.transforms.cursor < self.transforms.entries.len() {
            Some(Target::Transform)
        } else if self.raster.index + 1 < self.raster.entries.len() {
            Some(Target::Raster)
        } else {
            None
        }
    }

    /// What [`commit_undo`](Self::commit_undo) would restore, without moving.
    pub fn undo_step(&self) -> Option<HistoryStep<R>> {
        Some(match self.undo_target()? {
            Target::Transform => {
                HistoryStep::Shapes(self.transforms.entries[self.transforms.cursor - 1].before.clone())
            }
            Target::Raster => {
                HistoryStep::Checkpoint(self.raster.entries[self.raster.index - 1].clone())
            }
        })
    }

    /// What [`commit_redo`](Self::commit_redo) would restore, without moving.
    pub fn redo_step(&self) -> Option<HistoryStep<R>> {
        Some(match self.redo_target()? {
            Target::Transform => {
                HistoryStep::Shapes(self.transforms.entries[self.transforms.cursor].after.clone())
            }
            Target::Raster => {
                HistoryStep::Checkpoint(self.raster.entries[self.raster.index + 1].clone())
            }
        })
    }

    /// Move back one entry on the stack `undo_step` picked.
    pub fn commit_undo(&mut self) {
        match self.undo_target() {
            Some(Target::Transform) => self.transforms.cursor -= 1,
            Some(Target::Raster) => self.raster.index -= 1,
            None => {}
        }
    }

    /// Move forward one entry on the stack `redo_step` picked.
    pub fn commit_redo(&mut self) {
        match self.redo_target() {
            Some(Target::Transform) => self.transforms.cursor += 1,
            Some(Target::Raster) => self.raster.index += 1,
            None => {}
        }
    }

    /// Undo in one go, for callers that restore synchronously.
    pub fn undo(&mut self) -> Option<HistoryStep<R>> {
        let step = self.undo_step()?;
        self.commit_undo();
        Some(step)
    }

    /// Redo in one go, for callers that restore synchronously.
    pub fn redo(&mut self) -> Option<HistoryStep<R>> {
        let step = self.redo_step()?;
        self.commit_redo();
        Some(step)
    }

    /// The checkpoint the raster currently matches.
    pub fn current(&self) -> &Checkpoint<R> {
        &self.raster.entries[self.raster.index]
    }

    pub fn raster_len(&self) -> usize {
        self.raster.entries.len()
    }

    pub fn transform_len(&self) -> usize {
        self.transforms.entries.len()
    }
}
