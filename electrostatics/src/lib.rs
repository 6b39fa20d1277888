//! Electrostatics Demonstrations
//!
//! Two classroom experiments rendered as interactive widgets:
//!
//! - **Balloon and paper**: a balloon charged by rubbing it on hair attracts
//!   neutral pieces of paper through electrostatic induction
//! - **Ruler and water**: a ruler charged with wool bends a thin stream of
//!   water by pulling on its polar molecules
//!
//! The motion is an illustrative distance heuristic, not an integration of
//! Coulomb forces. The worked calculations in [`worked_examples`] carry the
//! real physics shown to students.

pub mod drag;
pub mod effect;
pub mod jitter;
pub mod timer;
pub mod controller;
pub mod balloon;
pub mod water;
pub mod scene;
pub mod worked_examples;
pub mod equations_ui;
pub mod renderer;

/// Tuning of the two widgets. Lengths are logical pixels relative to the
/// top-left corner of a widget container, times are seconds.
pub mod constants {
    /// Container size shared by both widgets
    pub const CONTAINER_WIDTH: f32 = 600.0;
    pub const CONTAINER_HEIGHT: f32 = 400.0;

    /// Distance below which a paper piece feels the balloon
    pub const ATTRACTION_RADIUS: f32 = 150.0;
    /// Fraction of the piece-to-balloon vector covered per recompute
    pub const PULL_RATE: f32 = 0.05;

    /// Horizontal position of the water column
    pub const STREAM_X: f32 = 150.0;
    /// Ruler distance beyond which the stream is straight
    pub const DEFLECTION_RANGE: f32 = 200.0;
    /// Largest control-point offset of the stream curve
    pub const MAX_CURVATURE: f32 = 80.0;

    /// Stream endpoints
    pub const STREAM_TOP: f32 = 60.0;
    pub const STREAM_BOTTOM: f32 = 400.0;
    pub const STREAM_WIDTH: f32 = 8.0;
    pub const DROPLET_COUNT: usize = 10;

    /// How long rubbing the ruler with wool takes
    pub const CHARGING_DELAY: f32 = 1.5;

    /// Balloon placement
    pub const BALLOON_ANCHOR: (f32, f32) = (200.0, 100.0);
    pub const BALLOON_SIZE: (f32, f32) = (128.0, 160.0);

    /// Ruler placement
    pub const RULER_ANCHOR: (f32, f32) = (300.0, 200.0);
    pub const RULER_SIZE: (f32, f32) = (160.0, 40.0);

    /// Resting places of the paper pieces, in id order
    pub const PAPER_HOME: [(f32, f32); 5] = [
        (100.0, 350.0),
        (200.0, 370.0),
        (300.0, 350.0),
        (150.0, 380.0),
        (250.0, 360.0),
    ];
    pub const PAPER_SIZE: (f32, f32) = (40.0, 24.0);

    /// Rotation of an attracted piece, and the jitter span of a resting one (degrees)
    pub const ATTRACTED_ROTATION: f32 = 45.0;
    pub const RESTING_JITTER: f32 = 10.0;

    /// Visual scale applied to a charged object
    pub const CHARGED_SCALE: f32 = 1.05;
}
