//! Active scene to colored quads
//!
//! Every quad carries the layer it belongs to. The renderer draws World
//! quads through the world camera and Ui quads through the fixed screen
//! camera, so each pass sees only its own layer.

use glam::Vec2;

use super::vertex::{Vertex, colors};
use crate::consts::{COLLECTIBLE_SIZE, STAR_RADIUS};
use crate::recap::{ExportFlow, RecapState};
use crate::rgb_hex;
use crate::scene::{App, Scene};
use crate::sim::{Camera, EntityKind, EntityState, Layer, RunState};

/// Meter bar height (px)
const METER_HEIGHT: f32 = 16.0;
/// Aim indicator length (world px)
const AIM_LINE_LENGTH: f32 = 100.0;
/// Sign board center, above the sign's ground point (world px)
const SIGN_BOARD_OFFSET: Vec2 = Vec2::new(0.0, -70.0);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quad {
    pub center: Vec2,
    pub size: Vec2,
    /// Radians, about `center`
    pub rotation: f32,
    pub color: [f32; 4],
    pub layer: Layer,
}

impl Quad {
    pub fn rect(min: Vec2, max: Vec2, color: [f32; 4], layer: Layer) -> Self {
        Self {
            center: (min + max) * 0.5,
            size: max - min,
            rotation: 0.0,
            color,
            layer,
        }
    }

    pub fn square(center: Vec2, side: f32, color: [f32; 4], layer: Layer) -> Self {
        Self {
            center,
            size: Vec2::splat(side),
            rotation: 0.0,
            color,
            layer,
        }
    }

    pub fn rotated(mut self, rotation: f32) -> Self {
        self.rotation = rotation;
        self
    }

    /// Corners in counter-clockwise order starting top-left
    pub fn corners(&self) -> [Vec2; 4] {
        let half = self.size * 0.5;
        let rot = Vec2::from_angle(self.rotation);
        [
            Vec2::new(-half.x, -half.y),
            Vec2::new(-half.x, half.y),
            Vec2::new(half.x, half.y),
            Vec2::new(half.x, -half.y),
        ]
        .map(|c| self.center + rot.rotate(c))
    }
}

/// Text drawn over the canvas at a screen position (CSS px)
#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    pub text: String,
    pub screen: Vec2,
}

/// Everything needed to draw one frame
#[derive(Debug, Clone)]
pub struct DrawList {
    /// None when the scene has no world to show
    pub world_camera: Option<Camera>,
    pub ui_camera: Camera,
    pub clear: [f32; 4],
    pub quads: Vec<Quad>,
    /// Sign distances, placed by the world camera
    pub labels: Vec<Label>,
}

impl DrawList {
    fn new(world_camera: Option<Camera>, viewport: Vec2, clear: [f32; 4]) -> Self {
        Self {
            world_camera,
            ui_camera: Camera::screen(viewport),
            clear,
            quads: Vec::new(),
            labels: Vec::new(),
        }
    }

    fn push(&mut self, quad: Quad) {
        self.quads.push(quad);
    }

    pub fn count(&self, layer: Layer) -> usize {
        self.quads.iter().filter(|q| q.layer == layer).count()
    }

    /// Triangle-list vertices for one layer, in push order
    pub fn vertices(&self, layer: Layer) -> Vec<Vertex> {
        let mut out = Vec::with_capacity(self.count(layer) * 6);
        for quad in self.quads.iter().filter(|q| q.layer == layer) {
            let [a, b, c, d] = quad.corners();
            for p in [a, b, c, a, c, d] {
                out.push(Vertex::new(p.x, p.y, quad.color));
            }
        }
        out
    }
}

/// Build the frame for whatever scene is active
pub fn build(app: &App) -> DrawList {
    match &app.scene {
        Scene::Menu => build_menu(app.viewport),
        Scene::Run(run) => build_run(run),
        Scene::Recap(recap) => build_recap(recap, app.viewport),
    }
}

fn build_menu(viewport: Vec2) -> DrawList {
    let mut list = DrawList::new(None, viewport, colors::SKY);
    let ground_top = viewport.y * (1.0 - crate::consts::GROUND_FRACTION);
    list.push(Quad::rect(
        Vec2::new(0.0, ground_top),
        viewport,
        colors::GROUND,
        Layer::Ui,
    ));
    list
}

fn build_run(run: &RunState) -> DrawList {
    let mut list = DrawList::new(Some(run.camera.clone()), run.viewport, colors::SKY);
    let view = run.camera.visible_rect();

    // Ground band spans whatever is on screen
    list.push(Quad::rect(
        Vec2::new(view.min.x, run.ground_y),
        Vec2::new(view.max.x, view.max.y.max(run.ground_y) + run.viewport.y),
        colors::GROUND,
        Layer::World,
    ));
    list.push(Quad::rect(
        Vec2::new(run.start_x - 40.0, run.ground_y - 6.0),
        Vec2::new(run.launch_pivot.x + 10.0, run.ground_y),
        colors::LAUNCH_PAD,
        Layer::World,
    ));

    for entity in &run.entities {
        let alpha = match entity.state {
            EntityState::Alive => 1.0,
            EntityState::Collected { fade_ms } => {
                (1.0 - fade_ms / run.tuning.collect_fade_ms.max(1.0)).clamp(0.0, 1.0)
            }
        };
        match entity.kind {
            EntityKind::Collectible(color) => list.push(Quad::square(
                entity.pos,
                COLLECTIBLE_SIZE,
                rgb_hex(color.hex(), alpha),
                entity.layer,
            )),
            EntityKind::Star => {
                let mut color = colors::STAR;
                color[3] = alpha;
                let side = STAR_RADIUS * 1.2;
                for offset in [0.0, std::f32::consts::FRAC_PI_4] {
                    list.push(
                        Quad::square(entity.pos, side, color, entity.layer)
                            .rotated(entity.spin + offset),
                    );
                }
            }
            EntityKind::Sign(meters) => {
                let base = entity.pos;
                list.push(Quad::rect(
                    Vec2::new(base.x - 3.0, base.y - 60.0),
                    Vec2::new(base.x + 3.0, base.y),
                    colors::SIGN_POST,
                    entity.layer,
                ));
                list.push(Quad::rect(
                    Vec2::new(base.x - 30.0, base.y - 85.0),
                    Vec2::new(base.x + 30.0, base.y - 55.0),
                    colors::SIGN_BOARD,
                    entity.layer,
                ));
                let board = base + SIGN_BOARD_OFFSET;
                if view.contains(board) {
                    list.labels.push(Label {
                        text: format!("{meters}m"),
                        screen: run.camera.world_to_screen(board),
                    });
                }
            }
        }
    }

    let alpha = if run.player_pulsing {
        0.7 + 0.3 * ((run.time_ms * 0.02) as f32).sin()
    } else {
        1.0
    };
    list.push(Quad::square(
        run.player.pos,
        run.player.size,
        rgb_hex(run.player_color, alpha),
        Layer::World,
    ));

    if run.hud.aim_line {
        let dir = Vec2::from_angle(run.launch_angle);
        list.push(Quad {
            center: run.launch_pivot + dir * (AIM_LINE_LENGTH / 2.0),
            size: Vec2::new(AIM_LINE_LENGTH, 4.0),
            rotation: run.launch_angle,
            color: colors::AIM_LINE,
            layer: Layer::World,
        });
    }

    // UI overlay, laid out against the viewport the run started with
    let vp = run.viewport;
    let meter_min = vp * 0.05;
    let meter_width = vp.x * 0.2;
    let meter = if run.hud.power_meter {
        Some((run.power.level, colors::POWER))
    } else if run.hud.glide_meter {
        Some((run.glide.fill(), colors::GLIDE))
    } else {
        None
    };
    if let Some((fill, color)) = meter {
        list.push(Quad::rect(
            meter_min,
            meter_min + Vec2::new(meter_width, METER_HEIGHT),
            colors::METER_TRACK,
            Layer::Ui,
        ));
        if fill > 0.0 {
            list.push(Quad::rect(
                meter_min,
                meter_min + Vec2::new(meter_width * fill, METER_HEIGHT),
                color,
                Layer::Ui,
            ));
        }
    }

    let slot_y = meter_min.y + METER_HEIGHT + COLLECTIBLE_SIZE;
    for (color, x, _) in run.inventory.hud_slots() {
        list.push(Quad::square(
            Vec2::new(vp.x / 2.0 + x, slot_y),
            COLLECTIBLE_SIZE,
            rgb_hex(color.hex(), 1.0),
            Layer::Ui,
        ));
    }

    list
}

fn build_recap(recap: &RecapState, viewport: Vec2) -> DrawList {
    let mut list = DrawList::new(None, viewport, colors::RECAP_BACKDROP);

    // Composite column, first segment on top
    let edge = viewport.x.min(viewport.y) * 0.3;
    let center = Vec2::new(viewport.x / 2.0, viewport.y * 0.45);
    let top = center.y - edge / 2.0;
    let bottom = center.y + edge / 2.0;
    for seg in &recap.segments {
        list.push(Quad::rect(
            Vec2::new(center.x - edge / 2.0, top + seg.start * edge),
            Vec2::new(center.x + edge / 2.0, top + (seg.start + seg.height) * edge),
            rgb_hex(seg.color, 1.0),
            Layer::Ui,
        ));
    }

    if recap.export == ExportFlow::Generating {
        list.push(
            Quad::square(
                Vec2::new(center.x, bottom + edge * 0.35),
                24.0,
                colors::SPINNER,
                Layer::Ui,
            )
            .rotated(recap.spinner),
        );
    }

    list
}
