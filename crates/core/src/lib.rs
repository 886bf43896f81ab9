pub mod config;
pub mod domain;
pub mod errors;
pub mod estimating;

pub use domain::line_item::{EquipmentLine, LaborLine, MaterialLine};
pub use errors::{ApplicationError, InterfaceError};
pub use estimating::{Estimator, Priced, PricingTables, ProjectEstimate};
