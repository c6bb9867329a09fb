/// CSV export for step results and per-second samples.
pub mod export;
