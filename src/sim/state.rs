//! Run state and core simulation types
//!
//! Everything a run mutates lives in `RunState`, owned by the active Run
//! scene and dropped when the run hands its summary to the recap.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::body::{Aabb, Body};
use super::camera::Camera;
use super::glide::Glide;
use super::launch::PowerMeter;
use super::timers::{TimerId, Timers};
use crate::consts::*;
use crate::tuning::Tuning;

/// Current phase of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    /// Dragging out the launch angle
    Aiming,
    /// Power meter oscillating, waiting for the commit tap
    Powering,
    /// Airborne (and later sliding to a stop)
    Flying,
}

/// Item categories, in declaration order. This order drives both the HUD
/// and the recap composite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CollectibleColor {
    Red,
    Purple,
    Orange,
}

impl CollectibleColor {
    pub const ALL: [CollectibleColor; 3] = [
        CollectibleColor::Red,
        CollectibleColor::Purple,
        CollectibleColor::Orange,
    ];

    pub fn hex(self) -> u32 {
        match self {
            CollectibleColor::Red => 0xff0000,
            CollectibleColor::Purple => 0x800080,
            CollectibleColor::Orange => 0xffa500,
        }
    }

    pub fn index(self) -> usize {
        match self {
            CollectibleColor::Red => 0,
            CollectibleColor::Purple => 1,
            CollectibleColor::Orange => 2,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            CollectibleColor::Red => "red",
            CollectibleColor::Purple => "purple",
            CollectibleColor::Orange => "orange",
        }
    }
}

/// Collected counts per category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Inventory {
    counts: [u32; CollectibleColor::ALL.len()],
}

/// Horizontal gap between HUD inventory slots (px)
pub const INVENTORY_SLOT_SPACING: f32 = 70.0;

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, color: CollectibleColor) -> u32 {
        self.counts[color.index()]
    }

    pub fn add(&mut self, color: CollectibleColor) -> u32 {
        let count = &mut self.counts[color.index()];
        *count += 1;
        *count
    }

    pub fn total(&self) -> u32 {
        self.counts.iter().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// (color, count) in declaration order
    pub fn iter(&self) -> impl Iterator<Item = (CollectibleColor, u32)> + '_ {
        CollectibleColor::ALL.iter().map(|&c| (c, self.get(c)))
    }

    /// HUD slots for categories collected so far, centered on zero
    pub fn hud_slots(&self) -> Vec<(CollectibleColor, f32, u32)> {
        let visible: Vec<_> = self.iter().filter(|&(_, n)| n > 0).collect();
        let total_width = visible.len().saturating_sub(1) as f32 * INVENTORY_SLOT_SPACING;
        let start = -total_width / 2.0;
        visible
            .into_iter()
            .enumerate()
            .map(|(i, (c, n))| (c, start + i as f32 * INVENTORY_SLOT_SPACING, n))
            .collect()
    }
}

/// Which camera draws a thing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Layer {
    World,
    Ui,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityKind {
    Collectible(CollectibleColor),
    /// Speed power-up
    Star,
    /// Distance marker, in meters
    Sign(u32),
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum EntityState {
    Alive,
    /// Playing the collection fade; no longer collidable
    Collected { fade_ms: f32 },
}

/// A transient world object
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entity {
    pub id: u32,
    pub kind: EntityKind,
    pub pos: Vec2,
    pub layer: Layer,
    pub state: EntityState,
    /// Spin angle (radians), stars only
    pub spin: f32,
}

impl Entity {
    pub fn is_alive(&self) -> bool {
        self.state == EntityState::Alive
    }

    /// Collision box, None for scenery
    pub fn bounds(&self) -> Option<Aabb> {
        match self.kind {
            EntityKind::Collectible(_) => Some(Aabb::from_center(
                self.pos,
                Vec2::splat(COLLECTIBLE_SIZE),
            )),
            EntityKind::Star => Some(Aabb::from_center(self.pos, Vec2::splat(STAR_RADIUS * 2.0))),
            EntityKind::Sign(_) => None,
        }
    }
}

/// How many entities of each kind the scheduler has produced
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpawnCounts {
    pub collectibles: [u32; CollectibleColor::ALL.len()],
    pub stars: u32,
    pub signs: u32,
}

/// Deferred actions a run can schedule
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunAction {
    /// Player has settled: show the end-of-run control
    RevealEndRun,
    /// Star acceleration wears off
    EndStarBoost,
}

/// Record handed from Run to Recap
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub distance: u32,
    pub inventory: Inventory,
    pub colors: Vec<CollectibleColor>,
}

/// Overlay visibility, derived from phase and timers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HudFlags {
    pub aim_line: bool,
    pub power_meter: bool,
    pub glide_meter: bool,
    pub end_run_button: bool,
}

impl Default for HudFlags {
    fn default() -> Self {
        Self {
            aim_line: true,
            power_meter: false,
            glide_meter: false,
            end_run_button: false,
        }
    }
}

/// Complete run state
#[derive(Debug, Clone)]
pub struct RunState {
    pub tuning: Tuning,
    /// Viewport captured at run entry (layout does not follow later resizes)
    pub viewport: Vec2,
    /// Top of the ground band (world y)
    pub ground_y: f32,
    /// Start line (world x)
    pub start_x: f32,
    pub phase: Phase,
    /// Pointer went down during Aiming
    pub aiming: bool,
    pub launch_pivot: Vec2,
    pub launch_angle: f32,
    pub power: PowerMeter,
    pub glide: Glide,
    pub player: Body,
    pub player_color: u32,
    /// Star boost visual feedback
    pub player_pulsing: bool,
    pub star_boost: Option<TimerId>,
    /// Meters, never decreases
    pub distance: u32,
    pub last_spawn_x: f32,
    pub last_sign: u32,
    pub entities: Vec<Entity>,
    pub inventory: Inventory,
    pub spawned: SpawnCounts,
    pub camera: Camera,
    pub timers: Timers<RunAction>,
    pub settle_timer_started: bool,
    pub hud: HudFlags,
    pub time_ms: f64,
    pub rng: Pcg32,
    next_id: u32,
}

/// Player fill before anything is collected
pub const PLAYER_DEFAULT_COLOR: u32 = 0xffffff;

impl RunState {
    /// Fresh run laid out for `viewport`
    pub fn new(seed: u64, viewport: Vec2, tuning: Tuning) -> Self {
        let ground_y = viewport.y - viewport.y * GROUND_FRACTION;
        let start = Vec2::new(viewport.x * 0.1, ground_y - PLAYER_SIZE / 2.0);
        let launch_pivot = Vec2::new(start.x + PLAYER_SIZE / 2.0 + viewport.x * 0.05, start.y);
        let camera = Camera::new(viewport, tuning.launch_pose, start);

        Self {
            viewport,
            ground_y,
            start_x: start.x,
            phase: Phase::Aiming,
            aiming: false,
            launch_pivot,
            launch_angle: tuning.initial_angle_deg.to_radians(),
            power: PowerMeter::default(),
            glide: Glide::new(&tuning),
            player: Body::new(start, PLAYER_SIZE),
            player_color: PLAYER_DEFAULT_COLOR,
            player_pulsing: false,
            star_boost: None,
            distance: 0,
            last_spawn_x: 0.0,
            last_sign: 0,
            entities: Vec::new(),
            inventory: Inventory::new(),
            spawned: SpawnCounts::default(),
            camera,
            timers: Timers::new(),
            settle_timer_started: false,
            hud: HudFlags::default(),
            time_ms: 0.0,
            rng: Pcg32::seed_from_u64(seed),
            next_id: 1,
            tuning,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Add a world entity. Layer is fixed here, at creation.
    pub fn spawn_entity(&mut self, kind: EntityKind, pos: Vec2) -> u32 {
        let id = self.next_entity_id();
        match kind {
            EntityKind::Collectible(c) => self.spawned.collectibles[c.index()] += 1,
            EntityKind::Star => self.spawned.stars += 1,
            EntityKind::Sign(_) => self.spawned.signs += 1,
        }
        self.entities.push(Entity {
            id,
            kind,
            pos,
            layer: Layer::World,
            state: EntityState::Alive,
            spin: 0.0,
        });
        id
    }

    /// Copy out what the recap needs
    pub fn summary(&self) -> RunSummary {
        RunSummary {
            distance: self.distance,
            inventory: self.inventory,
            colors: CollectibleColor::ALL.to_vec(),
        }
    }
}
