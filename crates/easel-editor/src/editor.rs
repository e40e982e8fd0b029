//! The editor session: surfaces, shapes, gesture state and history.

use crate::artwork::Artwork;
use crate::config::EditorConfig;
use crate::error::{EditorError, EditorResult};
use crate::shortcuts::{EditorAction, ShortcutRegistry};
use easel_core::selection::hit_test_handles;
use easel_core::tools::generate_stroke_seed;
use easel_core::{
    BrushProfiles, BrushStyle, Checkpoint, Gesture, GesturePhase, HandleId, HistoryEngine,
    HistoryStep, KeyEvent, PointerEvent, SerializableColor, ShapePatch, ShapeStore, ToolKind,
    ToolSettings, clamp_brush_size, resize_from_handle, shape_from_drag,
};
use easel_render::{
    BrushStroke, CpuDecoder, PixmapSurface, RasterSnapshot, SceneOptions, SnapshotDecoder,
    StrokeKind, StrokePainter, Surface, TextRenderer, draw_preview, flatten, repaint,
};
use kurbo::Point;
use peniko::Color;

type DirtyCallback = Box<dyn FnMut(bool)>;

/// One drawing session over a fixed-size surface.
///
/// The raster holds strokes, text and erasing. Shapes live in the store and
/// are drawn over the raster on every repaint of the visible surface. Shape
/// previews go to a separate overlay surface.
pub struct Editor {
    raster: PixmapSurface,
    visible: PixmapSurface,
    overlay: PixmapSurface,
    shapes: ShapeStore,
    history: HistoryEngine<RasterSnapshot>,
    gesture: Gesture,
    /// Present while a stroke is being drawn.
    painter: Option<StrokePainter>,
    settings: ToolSettings,
    profiles: BrushProfiles,
    background: Option<SerializableColor>,
    scene: SceneOptions,
    text: TextRenderer,
    decoder: Box<dyn SnapshotDecoder>,
    on_dirty: Option<DirtyCallback>,
}

impl std::fmt::Debug for Editor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Editor")
            .field("width", &self.width())
            .field("height", &self.height())
            .field("shapes", &self.shapes.len())
            .field("phase", &self.gesture.phase())
            .field("tool", &self.settings.tool)
            .finish()
    }
}

impl Editor {
    pub fn new(config: &EditorConfig) -> EditorResult<Self> {
        let text = match &config.font_path {
            Some(path) => TextRenderer::load(path)?,
            None => TextRenderer::new()?,
        };
        let mut raster = PixmapSurface::new(config.width, config.height)?;
        raster.clear(config.background.map(Color::from));
        let shapes = ShapeStore::new();
        let history = HistoryEngine::new(
            Checkpoint {
                raster: raster.snapshot(),
                shapes: Vec::new(),
            },
            config.history_limit,
        );

        let mut editor = Self {
            visible: PixmapSurface::new(config.width, config.height)?,
            overlay: PixmapSurface::new(config.width, config.height)?,
            raster,
            shapes,
            history,
            gesture: Gesture::Idle,
            painter: None,
            settings: config.tools.clone(),
            profiles: config.brushes.clone(),
            background: config.background,
            scene: SceneOptions::default().with_handle_radius(config.handle_radius),
            text,
            decoder: Box::new(CpuDecoder),
            on_dirty: None,
        };
        editor.repaint();
        log::info!("Editor ready ({}x{})", config.width, config.height);
        Ok(editor)
    }

    /// Replace the snapshot decoder.
    pub fn with_decoder(mut self, decoder: impl SnapshotDecoder + 'static) -> Self {
        self.decoder = Box::new(decoder);
        self
    }

    /// Replace the text renderer.
    pub fn with_text_renderer(mut self, text: TextRenderer) -> Self {
        self.text = text;
        self
    }

    /// Start over on a surface of a new size, discarding content and history.
    pub fn reinitialize(&mut self, width: u32, height: u32) -> EditorResult<()> {
        let mut raster = PixmapSurface::new(width, height)?;
        raster.clear(self.background.map(Color::from));
        self.visible = PixmapSurface::new(width, height)?;
        self.overlay = PixmapSurface::new(width, height)?;
        self.raster = raster;
        self.shapes = ShapeStore::new();
        self.gesture = Gesture::Idle;
        self.painter = None;
        self.scene.hovered_handle = None;
        self.history.reset(Checkpoint {
            raster: self.raster.snapshot(),
            shapes: Vec::new(),
        });
        self.repaint();
        log::info!("Editor reinitialized ({width}x{height})");
        Ok(())
    }

    // --- Accessors ---

    pub fn width(&self) -> u32 {
        self.raster.width()
    }

    pub fn height(&self) -> u32 {
        self.raster.height()
    }

    /// Persistent raster: background, strokes, text.
    pub fn raster(&self) -> &PixmapSurface {
        &self.raster
    }

    /// Raster, shapes and selection decoration.
    pub fn visible(&self) -> &PixmapSurface {
        &self.visible
    }

    /// Shape-tool preview layer, drawn above the visible surface by the host.
    pub fn overlay(&self) -> &PixmapSurface {
        &self.overlay
    }

    pub fn shapes(&self) -> &ShapeStore {
        &self.shapes
    }

    pub fn settings(&self) -> &ToolSettings {
        &self.settings
    }

    pub fn phase(&self) -> GesturePhase {
        self.gesture.phase()
    }

    pub fn hovered_handle(&self) -> Option<HandleId> {
        self.scene.hovered_handle
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn history(&self) -> &HistoryEngine<RasterSnapshot> {
        &self.history
    }

    // --- Dirty tracking ---

    /// Register the dirty-state listener, replacing any previous one.
    pub fn on_dirty_changed(&mut self, callback: impl FnMut(bool) + 'static) {
        self.on_dirty = Some(Box::new(callback));
    }

    /// The host persisted the artwork.
    pub fn mark_saved(&mut self) {
        self.notify_dirty(false);
    }

    fn notify_dirty(&mut self, dirty: bool) {
        if let Some(callback) = self.on_dirty.as_mut() {
            callback(dirty);
        }
    }

    // --- Tool settings ---

    fn require_idle(&self, what: &'static str) -> EditorResult<()> {
        if self.gesture.is_idle() {
            Ok(())
        } else {
            Err(EditorError::GestureInProgress(what))
        }
    }

    pub fn set_tool(&mut self, tool: ToolKind) -> EditorResult<()> {
        self.require_idle("change tool")?;
        if self.settings.tool == ToolKind::Select && tool != ToolKind::Select {
            self.shapes.set_selected(None);
            self.scene.hovered_handle = None;
            self.repaint();
        }
        log::debug!("Tool: {} -> {}", self.settings.tool.name(), tool.name());
        self.settings.tool = tool;
        self.notify_dirty(true);
        Ok(())
    }

    pub fn set_brush_style(&mut self, style: BrushStyle) {
        self.settings.brush_style = style;
        self.notify_dirty(true);
    }

    pub fn set_color(&mut self, color: SerializableColor) {
        self.settings.color = color;
        self.notify_dirty(true);
    }

    pub fn set_brush_size(&mut self, size: f64) {
        self.settings.brush_size = clamp_brush_size(size);
        self.notify_dirty(true);
    }

    pub fn set_opacity(&mut self, opacity: f64) {
        self.settings.opacity = opacity.clamp(0.0, 1.0);
        self.notify_dirty(true);
    }

    pub fn set_stroke_width(&mut self, width: f64) {
        self.settings.stroke_width = width.max(0.0);
        self.notify_dirty(true);
    }

    pub fn set_filled(&mut self, filled: bool) {
        self.settings.filled = filled;
        self.notify_dirty(true);
    }

    pub fn set_font_size(&mut self, size: f64) {
        self.settings.font_size = size.max(1.0);
        self.notify_dirty(true);
    }

    // --- Rendering ---

    fn repaint(&mut self) {
        repaint(&mut self.visible, &self.raster, &self.shapes, &self.scene);
    }

    /// Record the current raster and shape list, discarding redo entries.
    fn checkpoint(&mut self) {
        self.history.push_checkpoint(Checkpoint {
            raster: self.raster.snapshot(),
            shapes: self.shapes.snapshot(),
        });
        self.notify_dirty(true);
    }

    // --- Pointer input ---

    pub fn pointer(&mut self, event: PointerEvent) -> EditorResult<()> {
        match event {
            PointerEvent::Down { position } => self.pointer_down(position),
            PointerEvent::Move { position } => self.pointer_move(position),
            PointerEvent::Up { position } => self.pointer_up(Some(position)),
            PointerEvent::Leave => self.pointer_leave(),
        }
    }

    fn pointer_down(&mut self, point: Point) -> EditorResult<()> {
        if !self.gesture.is_idle() {
            log::debug!("Ignoring pointer down during {:?}", self.gesture.phase());
            return Ok(());
        }

        match self.settings.tool {
            ToolKind::Brush | ToolKind::Eraser => {
                let kind = if self.settings.tool == ToolKind::Eraser {
                    StrokeKind::Eraser
                } else {
                    StrokeKind::Brush(self.settings.brush_style)
                };
                let seed = generate_stroke_seed();
                let stroke = BrushStroke::resolve(kind, &self.settings, &self.profiles);
                log::trace!("Stroke {kind:?} size {} seed {seed:#010x}", stroke.size);
                self.painter = Some(StrokePainter::new(stroke, seed));
                self.gesture = Gesture::DrawingStroke {
                    last: point,
                    painted: false,
                };
            }
            ToolKind::Shape(kind) => {
                self.overlay.clear(None);
                self.gesture = Gesture::DrawingShapePreview {
                    kind,
                    start: point,
                    current: point,
                };
            }
            ToolKind::Select => self.select_down(point),
            ToolKind::Text => {
                self.gesture = Gesture::TextPending { at: point };
            }
        }
        log::debug!("Pointer down at ({:.1}, {:.1}) -> {:?}", point.x, point.y, self.gesture.phase());
        Ok(())
    }

    fn select_down(&mut self, point: Point) {
        // Handles of the current selection take precedence over bodies.
        let radius = self.scene.handle_radius;
        let grabbed = self
            .shapes
            .selected()
            .and_then(|shape| hit_test_handles(shape, point, radius).map(|handle| (shape.clone(), handle)));
        if let Some((original, handle)) = grabbed {
            self.gesture = Gesture::ResizingShape {
                id: original.id(),
                handle,
                original,
                before: self.shapes.snapshot(),
                moved: false,
            };
            return;
        }

        match self.shapes.topmost_at(point) {
            Some(id) => {
                let before = self.shapes.snapshot();
                self.shapes.set_selected(Some(id));
                let origin = self.shapes.get(id).map(|s| s.bounds().origin()).unwrap_or(point);
                self.gesture = Gesture::DraggingShape {
                    id,
                    offset: point - origin,
                    before,
                    moved: false,
                };
            }
            None => self.shapes.set_selected(None),
        }
        self.scene.hovered_handle = None;
        self.repaint();
    }

    fn pointer_move(&mut self, point: Point) -> EditorResult<()> {
        if self.gesture.is_idle() {
            self.update_hover(point);
            return Ok(());
        }
        match &mut self.gesture {
            Gesture::DrawingStroke { last, painted, .. } => {
                if let Some(painter) = self.painter.as_mut() {
                    painter.paint_segment(&mut self.raster, *last, point);
                }
                *last = point;
                *painted = true;
                self.repaint();
            }
            Gesture::DrawingShapePreview { kind, start, current } => {
                *current = point;
                draw_preview(&mut self.overlay, *kind, *start, point, self.settings.shape_style());
            }
            Gesture::DraggingShape { id, offset, moved, .. } => {
                let id = *id;
                let Some(shape) = self.shapes.get(id) else {
                    return Ok(());
                };
                let delta = (point - *offset) - shape.bounds().origin();
                if delta.hypot2() > 0.0 {
                    let mut geometry = shape.geometry.clone();
                    geometry.translate(delta);
                    *moved = true;
                    self.shapes.update_shape(id, ShapePatch::geometry(geometry))?;
                    self.repaint();
                }
            }
            Gesture::ResizingShape {
                id,
                handle,
                original,
                moved,
                ..
            } => {
                let id = *id;
                let resized = resize_from_handle(original, *handle, point);
                *moved = resized.geometry != original.geometry;
                self.shapes.update_shape(id, ShapePatch::geometry(resized.geometry))?;
                self.repaint();
            }
            Gesture::Idle | Gesture::TextPending { .. } => {}
        }
        Ok(())
    }

    fn update_hover(&mut self, point: Point) {
        if self.settings.tool != ToolKind::Select {
            return;
        }
        let hovered = self
            .shapes
            .selected()
            .and_then(|shape| hit_test_handles(shape, point, self.scene.handle_radius));
        if hovered != self.scene.hovered_handle {
            self.scene.hovered_handle = hovered;
            self.repaint();
        }
    }

    fn pointer_up(&mut self, point: Option<Point>) -> EditorResult<()> {
        match std::mem::take(&mut self.gesture) {
            Gesture::Idle => {}
            Gesture::DrawingStroke { last, painted, .. } => {
                if let Some(mut painter) = self.painter.take() {
                    match point {
                        Some(p) if p != last => painter.paint_segment(&mut self.raster, last, p),
                        _ if !painted => painter.paint_segment(&mut self.raster, last, last),
                        _ => {}
                    }
                }
                self.checkpoint();
                self.repaint();
            }
            Gesture::DrawingShapePreview { kind, start, current } => {
                let end = point.unwrap_or(current);
                let shape = shape_from_drag(kind, start, end, self.settings.shape_style());
                let id = self.shapes.add_shape(shape);
                log::debug!("Created {} {id}", kind.name());
                self.overlay.clear(None);
                self.checkpoint();
                self.repaint();
            }
            Gesture::DraggingShape { before, moved, .. } | Gesture::ResizingShape { before, moved, .. } => {
                if moved {
                    self.history.push_transform(before, self.shapes.snapshot());
                    self.checkpoint();
                }
            }
            pending @ Gesture::TextPending { .. } => {
                self.gesture = pending;
            }
        }
        Ok(())
    }

    fn pointer_leave(&mut self) -> EditorResult<()> {
        if matches!(self.gesture, Gesture::DrawingStroke { .. }) {
            return self.pointer_up(None);
        }
        if self.gesture.is_idle() && self.scene.hovered_handle.take().is_some() {
            self.repaint();
        }
        Ok(())
    }

    // --- Keyboard ---

    pub async fn key(&mut self, event: KeyEvent) -> EditorResult<()> {
        let Some(action) = ShortcutRegistry::action_for(&event) else {
            return Ok(());
        };
        match action {
            EditorAction::Undo => {
                self.undo().await?;
            }
            EditorAction::Redo => {
                self.redo().await?;
            }
            EditorAction::DeleteSelection => {
                self.delete_selection()?;
            }
            EditorAction::Cancel => {
                if matches!(self.gesture, Gesture::TextPending { .. }) {
                    self.cancel_text()?;
                }
            }
        }
        Ok(())
    }

    /// Delete the selected shape, abandoning any gesture in progress.
    ///
    /// Returns `false` when nothing is selected.
    pub fn delete_selection(&mut self) -> EditorResult<bool> {
        let Some(id) = self.shapes.selected_id() else {
            return Ok(false);
        };
        if !self.gesture.is_idle() {
            log::debug!("Abandoning {:?} for delete", self.gesture.phase());
            self.gesture = Gesture::Idle;
            self.painter = None;
            self.overlay.clear(None);
        }
        let removed = self.shapes.delete_shape(id)?;
        log::debug!("Deleted {} {id}", removed.kind().name());
        self.scene.hovered_handle = None;
        self.checkpoint();
        self.repaint();
        Ok(true)
    }

    // --- Text ---

    /// Bake `text` into the raster at the pending point.
    ///
    /// Empty or whitespace-only text cancels.
    pub fn submit_text(&mut self, text: &str) -> EditorResult<()> {
        let Gesture::TextPending { at } = self.gesture else {
            return Err(EditorError::NotPendingText);
        };
        if text.trim().is_empty() {
            return self.cancel_text();
        }
        let color = self.settings.color.with_opacity(self.settings.opacity);
        self.text
            .paint_text(&mut self.raster, text, at, self.settings.font_size, color.into());
        self.gesture = Gesture::Idle;
        self.checkpoint();
        self.repaint();
        Ok(())
    }

    pub fn cancel_text(&mut self) -> EditorResult<()> {
        if !matches!(self.gesture, Gesture::TextPending { .. }) {
            return Err(EditorError::NotPendingText);
        }
        self.gesture = Gesture::Idle;
        Ok(())
    }

    // --- History ---

    /// Step back once. Returns `false` when there is nothing to undo.
    ///
    /// If decoding the checkpoint fails, nothing changes and the error is
    /// returned.
    pub async fn undo(&mut self) -> EditorResult<bool> {
        self.require_idle("undo")?;
        let Some(step) = self.history.undo_step() else {
            return Ok(false);
        };
        self.restore(step).await?;
        self.history.commit_undo();
        self.notify_dirty(true);
        Ok(true)
    }

    /// Step forward once. Returns `false` when there is nothing to redo.
    pub async fn redo(&mut self) -> EditorResult<bool> {
        self.require_idle("redo")?;
        let Some(step) = self.history.redo_step() else {
            return Ok(false);
        };
        self.restore(step).await?;
        self.history.commit_redo();
        self.notify_dirty(true);
        Ok(true)
    }

    async fn restore(&mut self, step: HistoryStep<RasterSnapshot>) -> EditorResult<()> {
        match step {
            HistoryStep::Shapes(shapes) => {
                self.shapes.restore(shapes);
            }
            HistoryStep::Checkpoint(checkpoint) => {
                let decoded = self.decoder.decode_snapshot(&checkpoint.raster).await?;
                self.raster.replace_with(decoded)?;
                self.shapes.restore(checkpoint.shapes);
            }
        }
        self.scene.hovered_handle = None;
        self.repaint();
        Ok(())
    }

    // --- Import / export ---

    /// Draw an encoded image at the origin as the session's starting point.
    ///
    /// Shapes are cleared and history restarts from this state.
    pub async fn load_initial_image(&mut self, bytes: &[u8]) -> EditorResult<()> {
        self.require_idle("load an image")?;
        let decoded = self.decoder.decode_image(bytes).await?;
        log::info!(
            "Loaded {}x{} image onto {}x{} surface",
            decoded.width(),
            decoded.height(),
            self.width(),
            self.height()
        );
        self.raster.clear(self.background.map(Color::from));
        self.raster.draw_surface(&decoded);
        self.shapes = ShapeStore::new();
        self.scene.hovered_handle = None;
        self.history.reset(Checkpoint {
            raster: self.raster.snapshot(),
            shapes: Vec::new(),
        });
        self.repaint();
        Ok(())
    }

    /// Flatten raster and shapes for the host. Refused mid-gesture.
    pub fn export_artwork(&self) -> EditorResult<Artwork> {
        self.require_idle("export")?;
        let mut flat = PixmapSurface::new(self.width(), self.height())?;
        flatten(&mut flat, &self.raster, &self.shapes);
        let png = flat.encode_png()?;
        let shapes = self
            .shapes
            .iter()
            .cloned()
            .map(|mut shape| {
                shape.selected = false;
                shape
            })
            .collect();
        log::info!("Exported {} bytes of PNG", png.len());
        Ok(Artwork {
            png,
            pixels: flat.to_rgba(),
            width: self.width(),
            height: self.height(),
            tool: self.settings.tool,
            brush_style: self.settings.brush_style,
            color: self.settings.color,
            shapes,
        })
    }
}
