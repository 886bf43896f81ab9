//! Construction estimating: unit-cost tables and the calculators built on them.

pub mod calculators;
pub mod money;
pub mod project;
pub mod quantities;
pub mod tables;

pub use calculators::{
    EquipmentCost, Estimator, LaborCost, LookupMiss, MaterialCost, Priced, MATERIAL_WASTE_FACTOR,
};
pub use money::round_currency;
pub use project::{CategoryEstimate, ProjectEstimate, DEFAULT_MARKUP};
pub use quantities::{material_quantity, MaterialQuantity};
pub use tables::{EquipmentRate, LaborRate, PricingEntry, PricingTableError, PricingTables};
