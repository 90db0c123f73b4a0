//! Running-workout calories dashboard.
//!
//! Load a workout table once ([`data::loader::load_file`]), then turn each
//! viewer selection into five chart specifications ([`projector::project`]).
//! Rendering and widgets belong to the host; [`state::DashboardState`] is the
//! host-side bookkeeping for dispatching selections.

pub mod chart;
pub mod color;
pub mod data;
pub mod error;
pub mod projector;
pub mod state;

pub use data::category::{AgeCategory, BmiCategory, Bucket, BurnZone, DistanceCategory};
pub use data::filter::{Selection, SelectionOptions};
pub use data::loader::{load_file, prepare};
pub use data::model::{PreparedTable, RawTable, WorkoutRecord};
pub use error::{DataLoadError, UnknownCategory};
pub use projector::{project, ChartSet, DashboardView};
