//! Fleetwatch Environment Abstraction Layer
//!
//! This crate provides the "Sans-IO" abstraction allowing the fleet runtime
//! to run both as a **Production** service (tokio) and inside the
//! deterministic **Simulation** harness.
//!
//! # Core Concept
//!
//! The fleet core never reads the clock or a random generator directly:
//! - Time (`now()`, `system_time()`, `sleep()`)
//! - Randomness (`random_unit()`)
//!
//! By deriving all jitter from a single 64-bit seed, any simulation run
//! becomes reproducible via its seed number.
//!
//! # Example
//!
//! ```ignore
//! use fleetwatch_env::FleetContext;
//!
//! async fn tick_loop<Ctx: FleetContext>(ctx: &Ctx) {
//!     loop {
//!         ctx.sleep(Duration::from_secs(2)).await;
//!         tick();
//!     }
//! }
//! ```

mod context;
mod error;
mod tokio_impl;

pub use context::FleetContext;
pub use error::EnvError;
pub use tokio_impl::TokioContext;
