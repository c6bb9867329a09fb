//! Single-zone building thermal simulator with a ramped furnace/air-conditioner
//! unit, energy cost accounting and pluggable reward strategies.

pub mod config;
pub mod devices;
pub mod error;
pub mod io;
pub mod runner;
/// Building model, decision engine, rewards, and reporting.
pub mod sim;
pub mod weather;
