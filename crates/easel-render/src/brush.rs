//! Brush render engine.
//!
//! A [`StrokePainter`] is created when a stroke begins, with the brush
//! configuration resolved once from the [`BrushProfiles`] table, and paints one
//! segment per pointer move. All texture randomness comes from a per-stroke
//! seed.

use crate::surface::{CompositeMode, Surface};
use easel_core::{BrushProfile, BrushProfiles, BrushStyle, SerializableColor, ToolSettings, clamp_brush_size};
use kurbo::{BezPath, Cap, Join, Point, Stroke, Vec2};
use peniko::Color;

/// Soft bleed strokes are up to this much wider than the nominal size.
const BLEED_SPREAD: f64 = 0.5;

/// Simple xorshift32 generator for brush texture.
#[derive(Debug, Clone)]
pub struct SimpleRng {
    state: u32,
}

impl SimpleRng {
    pub fn new(seed: u32) -> Self {
        Self { state: seed.max(1) }
    }

    pub fn next_u32(&mut self) -> u32 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.state = x;
        x
    }

    /// Random float in range [0, 1]
    pub fn unit(&mut self) -> f64 {
        self.next_u32() as f64 / u32::MAX as f64
    }

    /// Random float in range [-1, 1]
    pub fn next_f64(&mut self) -> f64 {
        self.unit() * 2.0 - 1.0
    }

    /// Random offset scaled by amount
    pub fn offset(&mut self, amount: f64) -> f64 {
        self.next_f64() * amount
    }
}

/// What a stroke does to the raster.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrokeKind {
    Brush(BrushStyle),
    /// Removes raster content with normal-brush geometry.
    Eraser,
}

/// Brush configuration resolved at the start of a stroke.
#[derive(Debug, Clone)]
pub struct BrushStroke {
    pub kind: StrokeKind,
    /// Nominal size in pixels.
    pub size: f64,
    pub opacity: f64,
    pub color: SerializableColor,
    pub profile: BrushProfile,
}

impl BrushStroke {
    /// Resolve the settings and profile for a stroke of `kind`.
    pub fn resolve(kind: StrokeKind, settings: &ToolSettings, profiles: &BrushProfiles) -> Self {
        let style = match kind {
            StrokeKind::Brush(style) => style,
            StrokeKind::Eraser => BrushStyle::Soft,
        };
        Self {
            kind,
            size: clamp_brush_size(settings.brush_size),
            opacity: settings.opacity.clamp(0.0, 1.0),
            color: settings.color,
            profile: profiles.get(style).clone(),
        }
    }

    /// Full width of everything the soft brush can paint along a segment:
    /// underlay, main line and bleed strokes at their widest jitter.
    fn soft_footprint(&self) -> f64 {
        let p = &self.profile;
        let bleed = 1.0 + BLEED_SPREAD + 2.0 * std::f64::consts::SQRT_2 * p.jitter;
        self.size * p.width_scale.max(p.underlay_scale).max(bleed)
    }

    /// The stroke color with `alpha` times the stroke opacity.
    fn color(&self, alpha: f64) -> Color {
        self.color.with_opacity(self.opacity * alpha).into()
    }
}

/// Paints the segments of one stroke.
#[derive(Debug, Clone)]
pub struct StrokePainter {
    stroke: BrushStroke,
    rng: SimpleRng,
}

fn round_stroke(width: f64) -> Stroke {
    Stroke::new(width).with_caps(Cap::Round).with_join(Join::Round)
}

fn segment(from: Point, to: Point) -> BezPath {
    let mut path = BezPath::new();
    path.move_to(from);
    path.line_to(to);
    path
}

/// Draw a round-capped line; a zero-length segment becomes a dot.
fn line<S: Surface>(
    surface: &mut S,
    from: Point,
    to: Point,
    width: f64,
    color: Color,
    mode: CompositeMode,
) {
    if width <= 0.0 {
        return;
    }
    if (to - from).hypot2() < 1e-12 {
        surface.fill_circle(from, width / 2.0, color, mode);
    } else {
        surface.stroke_path(&segment(from, to), color, &round_stroke(width), mode);
    }
}

/// Unit direction of the segment and its perpendicular.
fn frame(from: Point, to: Point) -> (Vec2, Vec2) {
    let d = to - from;
    let len = d.hypot();
    if len < 1e-9 {
        return (Vec2::new(1.0, 0.0), Vec2::new(0.0, 1.0));
    }
    let dir = d / len;
    (dir, Vec2::new(-dir.y, dir.x))
}

impl StrokePainter {
    pub fn new(stroke: BrushStroke, seed: u32) -> Self {
        Self {
            stroke,
            rng: SimpleRng::new(seed),
        }
    }

    pub fn stroke(&self) -> &BrushStroke {
        &self.stroke
    }

    /// Paint the segment between two consecutive pointer samples.
    pub fn paint_segment<S: Surface>(&mut self, surface: &mut S, from: Point, to: Point) {
        match self.stroke.kind {
            StrokeKind::Eraser => self.erase(surface, from, to),
            StrokeKind::Brush(BrushStyle::Soft) => self.soft(surface, from, to),
            StrokeKind::Brush(BrushStyle::Marker) => self.marker(surface, from, to),
            StrokeKind::Brush(BrushStyle::Pencil) => self.pencil(surface, from, to),
            StrokeKind::Brush(BrushStyle::Fine) => self.fine(surface, from, to),
            StrokeKind::Brush(BrushStyle::Droplet) => self.droplet(surface, to),
            StrokeKind::Brush(BrushStyle::Crayon) => self.crayon(surface, from, to),
        }
    }

    /// Clears the whole soft-brush footprint, plus a pixel of antialiased fringe
    /// on each side.
    fn erase<S: Surface>(&mut self, surface: &mut S, from: Point, to: Point) {
        if self.stroke.size <= 0.0 {
            return;
        }
        let color = Color::BLACK.with_alpha(self.stroke.opacity as f32);
        let width = self.stroke.soft_footprint() + 2.0;
        line(surface, from, to, width, color, CompositeMode::DestinationOut);
    }

    fn underlay<S: Surface>(&mut self, surface: &mut S, from: Point, to: Point) {
        let p = &self.stroke.profile;
        if p.underlay_scale > 0.0 {
            let color = self.stroke.color(p.underlay_alpha);
            line(surface, from, to, self.stroke.size * p.underlay_scale, color, CompositeMode::SourceOver);
        }
    }

    fn main_line<S: Surface>(&mut self, surface: &mut S, from: Point, to: Point) {
        let p = &self.stroke.profile;
        let color = self.stroke.color(p.main_alpha);
        line(surface, from, to, self.stroke.size * p.width_scale, color, CompositeMode::SourceOver);
    }

    /// Watercolor: wide translucent underlay, solid center, and randomly
    /// offset overlapping bleed strokes whose count grows with size.
    fn soft<S: Surface>(&mut self, surface: &mut S, from: Point, to: Point) {
        self.underlay(surface, from, to);
        self.main_line(surface, from, to);

        let size = self.stroke.size;
        let p = self.stroke.profile.clone();
        let passes = p.texture_passes + (size / 10.0) as u32;
        let color = self.stroke.color(p.texture_alpha);
        for _ in 0..passes {
            let jitter = size * p.jitter;
            let a = from + Vec2::new(self.rng.offset(jitter), self.rng.offset(jitter));
            let b = to + Vec2::new(self.rng.offset(jitter), self.rng.offset(jitter));
            let width = size * (1.0 + self.rng.unit() * BLEED_SPREAD);
            line(surface, a, b, width, color, CompositeMode::SourceOver);
        }
    }

    fn marker<S: Surface>(&mut self, surface: &mut S, from: Point, to: Point) {
        self.underlay(surface, from, to);
        self.main_line(surface, from, to);

        let size = self.stroke.size;
        let p = self.stroke.profile.clone();
        let texture = self.stroke.color(p.texture_alpha);
        let (dir, perp) = frame(from, to);
        let length = (to - from).hypot();

        if size >= p.hatch_min_size {
            // Diagonal cross-hatch along the segment.
            let steps = ((length / (size * 0.5)).ceil() as usize).max(1);
            let arm = size * 0.4;
            let d1 = (dir + perp) * (arm / 2f64.sqrt());
            let d2 = (dir - perp) * (arm / 2f64.sqrt());
            for i in 0..=steps {
                let c = from.lerp(to, i as f64 / steps as f64);
                line(surface, c - d1, c + d1, 1.0, texture, CompositeMode::SourceOver);
                line(surface, c - d2, c + d2, 1.0, texture, CompositeMode::SourceOver);
            }
        }

        if size >= p.stipple_min_size {
            let dots = p.texture_passes * 2 + (length / size.max(1.0)) as u32;
            let radius = (size * 0.06).max(0.5);
            for _ in 0..dots {
                let c = from.lerp(to, self.rng.unit())
                    + perp * self.rng.offset(size * 0.5)
                    + dir * self.rng.offset(size * 0.2);
                surface.fill_circle(c, radius, texture, CompositeMode::SourceOver);
            }
        }

        if size >= p.edge_min_size {
            // Thick dense center, thin edges.
            line(surface, from, to, size * 0.5, self.stroke.color(p.main_alpha), CompositeMode::SourceOver);
            let edge = perp * (size * p.width_scale * 0.45);
            line(surface, from + edge, to + edge, 1.0, texture, CompositeMode::SourceOver);
            line(surface, from - edge, to - edge, 1.0, texture, CompositeMode::SourceOver);
        }
    }

    /// Crisp main line plus one to `texture_passes` faint dashed companions.
    fn pencil<S: Surface>(&mut self, surface: &mut S, from: Point, to: Point) {
        self.main_line(surface, from, to);

        let size = self.stroke.size;
        let p = self.stroke.profile.clone();
        let (_, perp) = frame(from, to);
        let companions = 1 + self.rng.next_u32() % p.texture_passes.max(1);
        let color = self.stroke.color(p.texture_alpha);
        let width = (size * 0.25).max(0.5);
        let dash = (size * 0.5).max(1.0);
        for _ in 0..companions {
            let offset = perp * self.rng.offset(size * p.jitter);
            let path = segment(from + offset, to + offset);
            let stroke = Stroke::new(width).with_dashes(self.rng.unit() * dash, [dash, dash]);
            surface.stroke_path(&path, color, &stroke, CompositeMode::SourceOver);
        }
    }

    fn fine<S: Surface>(&mut self, surface: &mut S, from: Point, to: Point) {
        self.main_line(surface, from, to);
    }

    /// A drop at the current point with a few smaller splashes around it.
    fn droplet<S: Surface>(&mut self, surface: &mut S, at: Point) {
        let size = self.stroke.size;
        let p = self.stroke.profile.clone();
        surface.fill_circle(at, size * p.width_scale, self.stroke.color(p.main_alpha), CompositeMode::SourceOver);

        let color = self.stroke.color(p.texture_alpha);
        for _ in 0..p.texture_passes {
            let angle = self.rng.unit() * std::f64::consts::TAU;
            let distance = size * (0.6 + self.rng.unit() * p.jitter);
            let radius = size * (0.1 + self.rng.unit() * 0.15);
            let c = at + Vec2::from_angle(angle) * distance;
            surface.fill_circle(c, radius, color, CompositeMode::SourceOver);
        }
    }

    /// Jittered parallel lines, scattered grain and a smudge of nearby color.
    fn crayon<S: Surface>(&mut self, surface: &mut S, from: Point, to: Point) {
        let size = self.stroke.size;
        let p = self.stroke.profile.clone();
        let (_, perp) = frame(from, to);

        let main = self.stroke.color(p.main_alpha);
        let width = (size * p.width_scale).max(0.5);
        for _ in 0..p.texture_passes.max(1) {
            let offset = perp * self.rng.offset(size * p.jitter);
            let wobble = Vec2::new(self.rng.offset(1.0), self.rng.offset(1.0));
            line(surface, from + offset, to + offset + wobble, width, main, CompositeMode::SourceOver);
        }

        let grain = self.stroke.color(p.texture_alpha);
        for _ in 0..p.texture_passes * 2 {
            let c = from.lerp(to, self.rng.unit()) + perp * self.rng.offset(size * 0.6);
            surface.fill_circle(c, (size * 0.05).max(0.5), grain, CompositeMode::SourceOver);
        }

        for _ in 0..p.smudge_samples {
            let c = from.lerp(to, self.rng.unit()) + perp * self.rng.offset(size * 0.5);
            let sampled = match surface.sample(c.x.round() as i64, c.y.round() as i64) {
                Ok(color) => color,
                Err(err) => {
                    log::trace!("smudge skipped: {err}");
                    continue;
                }
            };
            if sampled.a == 0 {
                continue;
            }
            let smudge: Color = sampled.with_opacity(0.2).into();
            surface.fill_circle(c, size * 0.4, smudge, CompositeMode::SourceOver);
        }
    }
}
