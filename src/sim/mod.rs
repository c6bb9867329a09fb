/// Single-zone thermal model owning the HVAC unit.
pub mod building;
/// Decision clock for the control loop.
pub mod clock;
pub mod controller;
pub mod engine;
pub mod kpi;
/// Cost accounting and reward strategies.
pub mod reward;
/// Per-second sample recording.
pub mod tracker;
pub mod types;
