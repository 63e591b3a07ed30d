//! The `logistic_core` crate is the numeric engine behind the logistic growth dashboard.
//! It fits two independent logistic curves against Gause's yeast observations.
//!
//! Key components:
//! - **Traits**: `Scalar` (numeric type abstraction), `DynamicalSystem` (ODEs), `Steppable` (Solvers).
//! - **Solvers**: Numerical integrators (RK4, Tsit5) and an error-controlled grid integrator.
//! - **Model / Params**: The logistic vector field and tolerant ingestion of the page inputs.
//! - **Chart / Dashboard**: Figure assembly and the `recompute` entry point.
pub mod chart;
pub mod dashboard;
pub mod error;
pub mod grid;
pub mod model;
pub mod params;
pub mod reference;
pub mod solvers;
pub mod trajectory;
pub mod traits;

pub use dashboard::{recompute, Dashboard, DashboardConfig};
