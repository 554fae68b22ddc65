//! Viewport transform controller.
//!
//! Owns the pan/zoom affine map from simulation space to canvas space and
//! every programmatic camera movement. Imperative requests arrive as
//! [`CameraCommand`]s pushed by the host and consumed in [`Camera::tick`],
//! so the supersede-don't-queue rule for animations lives in one place: a
//! new command replaces any in-flight animation, and so does a user
//! gesture.

use super::types::GraphState;
use egui::{Pos2, Vec2};

pub const MIN_SCALE: f32 = 0.1;
pub const MAX_SCALE: f32 = 4.0;
pub const ZOOM_IN_FACTOR: f32 = 1.2;
pub const ZOOM_OUT_FACTOR: f32 = 0.8;

/// Width of the docked detail panel that occludes the right edge
pub const PANEL_WIDTH: f32 = 400.0;
/// Below this viewport width the panel overlays instead of docking, so
/// centering ignores it
pub const PANEL_BREAKPOINT: f32 = 768.0;

/// Margin of the safe rectangle used by the follow behavior
const FOLLOW_MARGIN: f32 = 80.0;
/// Delay before a follow re-center fires, so it does not fight a still
/// moving layout
const FOLLOW_SETTLE: f32 = 0.05;

const ZOOM_DURATION: f32 = 0.3;
const RESET_DURATION: f32 = 0.75;
const CENTER_DURATION: f32 = 1.0;
const FOLLOW_DURATION: f32 = 0.6;

/// The pan/zoom affine map: screen = sim * scale + translate
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub translate: Vec2,
    pub scale: f32,
}

impl Transform {
    pub const IDENTITY: Transform = Transform {
        translate: Vec2::ZERO,
        scale: 1.0,
    };

    pub fn apply(&self, pos: Pos2) -> Pos2 {
        Pos2::new(
            pos.x * self.scale + self.translate.x,
            pos.y * self.scale + self.translate.y,
        )
    }

    pub fn invert(&self, pos: Pos2) -> Pos2 {
        Pos2::new(
            (pos.x - self.translate.x) / self.scale,
            (pos.y - self.translate.y) / self.scale,
        )
    }

    fn lerp(a: Transform, b: Transform, t: f32) -> Transform {
        Transform {
            translate: a.translate + (b.translate - a.translate) * t,
            scale: a.scale + (b.scale - a.scale) * t,
        }
    }
}

/// Host-driven camera operations
#[derive(Debug, Clone, PartialEq)]
pub enum CameraCommand {
    ZoomIn,
    ZoomOut,
    Reset,
    CenterOn(String),
}

struct Animation {
    from: Transform,
    to: Transform,
    elapsed: f32,
    duration: f32,
}

pub struct Camera {
    current: Transform,
    animation: Option<Animation>,
    commands: Vec<CameraCommand>,
    follow_timer: Option<f32>,
    last_selection: Option<String>,
}

impl Camera {
    pub fn new() -> Self {
        Self {
            current: Transform::IDENTITY,
            animation: None,
            commands: Vec::new(),
            follow_timer: None,
            last_selection: None,
        }
    }

    pub fn transform(&self) -> Transform {
        self.current
    }

    pub fn scale(&self) -> f32 {
        self.current.scale
    }

    pub fn is_animating(&self) -> bool {
        self.animation.is_some()
    }

    /// Animating, or holding an armed follow timer that needs frames to fire
    pub fn is_busy(&self) -> bool {
        self.animation.is_some() || self.follow_timer.is_some()
    }

    pub fn push(&mut self, command: CameraCommand) {
        self.commands.push(command);
    }

    /// Screen-space pan gesture. Cancels any in-flight animation.
    pub fn pan_by(&mut self, delta: Vec2) {
        self.animation = None;
        self.current.translate += delta;
    }

    /// Cursor-anchored zoom gesture: the sim point under the cursor stays
    /// put. Cancels any in-flight animation.
    pub fn zoom_at(&mut self, cursor: Pos2, factor: f32) {
        self.animation = None;
        let anchor = self.current.invert(cursor);
        let scale = (self.current.scale * factor).clamp(MIN_SCALE, MAX_SCALE);
        self.current = Transform {
            translate: cursor.to_vec2() - anchor.to_vec2() * scale,
            scale,
        };
    }

    /// Advance animations, drain commands, and run the follow behavior.
    /// Called once per frame before painting.
    pub fn tick(
        &mut self,
        dt: f32,
        state: &GraphState,
        viewport: Vec2,
        selection: Option<&str>,
    ) {
        for command in std::mem::take(&mut self.commands) {
            self.execute(command, state, viewport);
        }

        self.follow_selection(dt, state, viewport, selection);

        if let Some(animation) = &mut self.animation {
            animation.elapsed += dt;
            let t = (animation.elapsed / animation.duration).clamp(0.0, 1.0);
            self.current = Transform::lerp(animation.from, animation.to, ease_cubic_out(t));
            if t >= 1.0 {
                self.current = animation.to;
                self.animation = None;
            }
        }
    }

    fn execute(&mut self, command: CameraCommand, state: &GraphState, viewport: Vec2) {
        match command {
            CameraCommand::ZoomIn => self.animate_zoom(ZOOM_IN_FACTOR, viewport),
            CameraCommand::ZoomOut => self.animate_zoom(ZOOM_OUT_FACTOR, viewport),
            CameraCommand::Reset => self.animate_to(Transform::IDENTITY, RESET_DURATION),
            CameraCommand::CenterOn(id) => {
                // The node may have been deleted since the request: no-op
                if let Some(node) = state.node(&id) {
                    let target = self.center_target(node.pos, viewport);
                    self.animate_to(target, CENTER_DURATION);
                }
            }
        }
    }

    /// Zoom by a fixed factor about the viewport center
    fn animate_zoom(&mut self, factor: f32, viewport: Vec2) {
        let center = Pos2::new(viewport.x / 2.0, viewport.y / 2.0);
        let anchor = self.current.invert(center);
        let scale = (self.current.scale * factor).clamp(MIN_SCALE, MAX_SCALE);
        let target = Transform {
            translate: center.to_vec2() - anchor.to_vec2() * scale,
            scale,
        };
        self.animate_to(target, ZOOM_DURATION);
    }

    /// Transform that places `pos` at the focal point: 40% across the
    /// unoccluded width, vertically centered, at a scale of at least 1.5.
    fn center_target(&self, pos: Pos2, viewport: Vec2) -> Transform {
        let visible_w = visible_width(viewport.x);
        let focal = Pos2::new(visible_w * 0.4, viewport.y / 2.0);
        let scale = self.current.scale.max(1.5).clamp(MIN_SCALE, MAX_SCALE);
        Transform {
            translate: focal.to_vec2() - pos.to_vec2() * scale,
            scale,
        }
    }

    fn animate_to(&mut self, to: Transform, duration: f32) {
        self.animation = Some(Animation {
            from: self.current,
            to,
            elapsed: 0.0,
            duration,
        });
    }

    /// Keep the selected node visible: re-center (cheaper, shorter) when
    /// the selection changes or drifts outside the safe rectangle, after a
    /// short settle delay.
    fn follow_selection(
        &mut self,
        dt: f32,
        state: &GraphState,
        viewport: Vec2,
        selection: Option<&str>,
    ) {
        if selection != self.last_selection.as_deref() {
            self.last_selection = selection.map(str::to_owned);
            self.follow_timer = selection.and(Some(0.0));
        }

        let Some(node) = selection.and_then(|id| state.node(id)) else {
            self.follow_timer = None;
            return;
        };

        if self.follow_timer.is_none()
            && self.animation.is_none()
            && !self.in_safe_rect(node.pos, viewport)
        {
            self.follow_timer = Some(0.0);
        }

        if let Some(timer) = &mut self.follow_timer {
            *timer += dt;
            if *timer >= FOLLOW_SETTLE {
                self.follow_timer = None;
                let target = self.center_target(node.pos, viewport);
                self.animate_to(target, FOLLOW_DURATION);
            }
        }
    }

    fn in_safe_rect(&self, pos: Pos2, viewport: Vec2) -> bool {
        let screen = self.current.apply(pos);
        let visible_w = visible_width(viewport.x);
        screen.x >= FOLLOW_MARGIN
            && screen.x <= visible_w - FOLLOW_MARGIN
            && screen.y >= FOLLOW_MARGIN
            && screen.y <= viewport.y - FOLLOW_MARGIN
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}

/// Canvas width not covered by the docked panel
fn visible_width(width: f32) -> f32 {
    if width > PANEL_BREAKPOINT {
        width - PANEL_WIDTH
    } else {
        width
    }
}

fn ease_cubic_out(t: f32) -> f32 {
    let u = 1.0 - t;
    1.0 - u * u * u
}
