//! Fleetwatch Deterministic Simulation Harness
//!
//! This crate runs the fleet runtime on a controlled clock so that a whole
//! operating day can be replayed from a single seed.
//!
//! # Core Principle
//!
//! All sources of non-determinism are intercepted and controlled:
//! - **Time**: Virtual clock advances one tick interval per step
//! - **Randomness**: All jitter derived from a single 64-bit seed
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                         SimWorld                            │
//! │  ┌──────────────────────────────────────────────────────┐   │
//! │  │ SimContext (Virtual Clock + ChaCha8 RNG)             │   │
//! │  └──────────────────────────────────────────────────────┘   │
//! │                            │                                │
//! │  ┌─────────────────────────▼────────────────────────────┐   │
//! │  │ FleetRuntime (assets, zones, transfers, log)         │   │
//! │  └──────────────────────────────────────────────────────┘   │
//! │                            │                                │
//! │  ┌─────────────────────────▼────────────────────────────┐   │
//! │  │ InvariantChecker        SimExport (frames → JSON)    │   │
//! │  └──────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```ignore
//! use fleetwatch_sim::{ScenarioRunner, scenarios::ScenarioId};
//!
//! let result = ScenarioRunner::new(42).run(ScenarioId::Degradation);
//! assert!(result.passed);
//! ```

mod context;
mod exporter;
pub mod fleet;
mod runner;
pub mod scenarios;
mod world;

pub use context::SimContext;
pub use exporter::{AssetPosition, SimEvent, SimExport, SimFrame, TransferPosition};
pub use runner::{InvariantChecker, ScenarioMetrics, ScenarioResult, ScenarioRunner};
pub use world::{SimConfig, SimWorld, StepReport};
