//! Typed argument contracts, one per tool. Arguments are parsed and validated here so the
//! calculators only ever see well-formed input.

use contech_core::domain::line_item::deserialize_optional_size;
use contech_core::{EquipmentLine, LaborLine, MaterialLine};
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ArgumentError {
    #[error("{0}")]
    Schema(#[from] serde_json::Error),
    #[error("{0}")]
    Invalid(String),
}

pub trait ToolRequest: DeserializeOwned {
    fn validate(&self) -> Result<(), ArgumentError> {
        Ok(())
    }
}

pub fn parse_request<T: ToolRequest>(arguments: &Value) -> Result<T, ArgumentError> {
    let request = T::deserialize(arguments)?;
    request.validate()?;
    Ok(request)
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct ListToolsRequest {}

impl ToolRequest for ListToolsRequest {}

#[derive(Clone, Debug, Deserialize)]
pub struct ProposalRequest {
    pub project_name: String,
    pub client_name: String,
    #[serde(default)]
    pub project_description: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub materials: Vec<String>,
    #[serde(default)]
    pub labor_hours: Option<Decimal>,
    pub total_cost: Decimal,
}

impl ToolRequest for ProposalRequest {
    fn validate(&self) -> Result<(), ArgumentError> {
        require_text("project_name", &self.project_name)?;
        require_text("client_name", &self.client_name)?;
        if let Some(hours) = self.labor_hours {
            non_negative("labor_hours", hours)?;
        }
        non_negative("total_cost", self.total_cost)
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct MaterialQuantityRequest {
    pub material_type: String,
    pub length_ft: Decimal,
    #[serde(default)]
    pub diameter_inches: Option<Decimal>,
}

impl ToolRequest for MaterialQuantityRequest {
    fn validate(&self) -> Result<(), ArgumentError> {
        require_text("material_type", &self.material_type)?;
        non_negative("length_ft", self.length_ft)?;
        if let Some(diameter) = self.diameter_inches {
            non_negative("diameter_inches", diameter)?;
        }
        Ok(())
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct MaterialCostRequest {
    pub material_type: String,
    pub quantity: Decimal,
    #[serde(default, deserialize_with = "deserialize_optional_size")]
    pub size: Option<String>,
}

impl ToolRequest for MaterialCostRequest {
    fn validate(&self) -> Result<(), ArgumentError> {
        require_text("material_type", &self.material_type)?;
        non_negative("quantity", self.quantity)
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct LaborCostRequest {
    pub labor_type: String,
    pub hours: Decimal,
}

impl ToolRequest for LaborCostRequest {
    fn validate(&self) -> Result<(), ArgumentError> {
        require_text("labor_type", &self.labor_type)?;
        non_negative("hours", self.hours)
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct EquipmentCostRequest {
    pub equipment_type: String,
    pub days: Decimal,
}

impl ToolRequest for EquipmentCostRequest {
    fn validate(&self) -> Result<(), ArgumentError> {
        require_text("equipment_type", &self.equipment_type)?;
        non_negative("days", self.days)
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct ProjectEstimateRequest {
    #[serde(deserialize_with = "null_as_empty")]
    pub materials: Vec<MaterialLine>,
    #[serde(deserialize_with = "null_as_empty")]
    pub labor: Vec<LaborLine>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub equipment: Vec<EquipmentLine>,
    #[serde(default)]
    pub markup: Option<Decimal>,
}

impl ToolRequest for ProjectEstimateRequest {
    fn validate(&self) -> Result<(), ArgumentError> {
        for (index, line) in self.materials.iter().enumerate() {
            non_negative(&format!("materials[{index}].quantity"), line.quantity)?;
        }
        for (index, line) in self.labor.iter().enumerate() {
            non_negative(&format!("labor[{index}].hours"), line.hours)?;
        }
        for (index, line) in self.equipment.iter().enumerate() {
            non_negative(&format!("equipment[{index}].days"), line.days)?;
        }
        if let Some(markup) = self.markup {
            if markup < Decimal::ZERO || markup > Decimal::ONE {
                return Err(ArgumentError::Invalid(format!(
                    "markup must be a fraction between 0 and 1, got {markup}"
                )));
            }
        }
        Ok(())
    }
}

fn require_text(field: &str, value: &str) -> Result<(), ArgumentError> {
    if value.trim().is_empty() {
        return Err(ArgumentError::Invalid(format!("{field} must not be empty")));
    }
    Ok(())
}

fn non_negative(field: &str, value: Decimal) -> Result<(), ArgumentError> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(ArgumentError::Invalid(format!("{field} must not be negative, got {value}")));
    }
    Ok(())
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}
