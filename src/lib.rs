//! Cat Stack Dash - lane runner with a yarn-built bridge
//!
//! Core modules:
//! - `sim`: Deterministic simulation (level generation, phases, crossing, scoring)
//! - `settings`: Session configuration input
//! - `session`: Level counter and attempt lifecycle
//! - `host`: Collaborator interfaces (world, audio, display)
//! - `web`: Browser binding (wasm32 only)

pub mod error;
pub mod host;
pub mod session;
pub mod settings;
pub mod sim;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use error::{PatternError, PlanError, SettingsError};
pub use session::Session;
pub use settings::Settings;

use glam::Vec3;

use sim::Lane;

/// Game configuration constants
pub mod consts {
    /// Lane x-coordinates (left, center, right)
    pub const LANE_POSITIONS: [f32; 3] = [-2.0, 0.0, 2.0];

    /// Forward movement per tick while collecting (units/frame)
    pub const FORWARD_SPEED: f32 = 0.15;
    /// Forward movement per tick while approaching and crossing the water
    pub const WATER_SPEED: f32 = 0.08;
    /// Lane switch animation length; intents are ignored until it elapses
    pub const LANE_SWITCH_MS: f64 = 150.0;

    /// First row is placed this far from the start marker
    pub const ROW_START: f32 = 10.0;
    /// Rows stop this far short of the end of the traversable distance
    pub const ROW_END_MARGIN: f32 = 5.0;
    /// Closest two rows may be (anything tighter overlaps visually)
    pub const MIN_ROW_SPACING: f32 = 2.0;
    /// Default widest row spacing
    pub const MAX_ROW_SPACING: f32 = 3.0;
    /// Assumed collectibles per row when sizing row spacing
    pub const AVG_COLLECTIBLES_PER_ROW: f32 = 1.5;
    /// Most collectibles a single row can carry
    pub const ROW_COLLECTIBLE_CAP: usize = 3;
    /// Fraction of rows after which an unmet collectible target forces max-yarn rows
    pub const COLLECTIBLE_ESCALATION_PROGRESS: f32 = 0.8;
    /// Floor for weighted pattern selection so no pattern ever weighs zero
    pub const MIN_PATTERN_WEIGHT: f32 = 1.0e-3;
    /// Upper bound of the per-level difficulty bias
    pub const MAX_LEVEL_SCALING: f32 = 0.2;

    /// Entities further behind the runner than this are removed
    pub const DESPAWN_BEHIND_DISTANCE: f32 = 10.0;
    /// Forward distance below which the runner reaches an entity
    pub const COLLISION_THRESHOLD: f32 = 1.5;
    /// Forward movement is suspended this long after a hazard hit
    pub const STUN_DURATION_MS: f64 = 500.0;

    /// Minimum time between two bridge segments
    pub const BRIDGE_BUILD_INTERVAL_MS: f64 = 200.0;
    /// Length of path laid by one held resource
    pub const SEGMENT_LENGTH: f32 = 1.0;
    /// How far past the last built segment the runner may walk
    pub const WALK_BUFFER: f32 = 0.5;
    /// Dry ground between the end of the course and the water's edge
    pub const APPROACH_LENGTH: f32 = 5.0;

    /// Points per whole unit of distance
    pub const DISTANCE_POINTS: u64 = 1;
    /// Points per collectible picked up
    pub const COLLECTED_POINTS: u64 = 10;
    /// Points per unit of bridge built
    pub const CROSSING_POINTS: u64 = 20;

    /// Render heights for visuals handed to the world sink
    pub const COLLECTIBLE_HOVER_HEIGHT: f32 = 1.0;
    pub const HAZARD_HOVER_HEIGHT: f32 = 0.6;
    pub const PATH_HEIGHT: f32 = 0.0;
}

/// X coordinate of a lane's center line
#[inline]
pub fn lane_x(lane: Lane) -> f32 {
    consts::LANE_POSITIONS[lane.index()]
}

/// Convert (lane, forward distance, height) to world space.
///
/// The scene looks down negative Z, so forward progress maps to `-z`.
#[inline]
pub fn world_position(lane: Lane, forward: f32, height: f32) -> Vec3 {
    Vec3::new(lane_x(lane), height, -forward)
}
