use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

/// One material requested for pricing, e.g. `{"type": "pipe", "quantity": 1000, "size": "4"}`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaterialLine {
    #[serde(rename = "type")]
    pub material_type: String,
    pub quantity: Decimal,
    #[serde(
        default,
        deserialize_with = "deserialize_optional_size",
        skip_serializing_if = "Option::is_none"
    )]
    pub size: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LaborLine {
    #[serde(rename = "type")]
    pub labor_type: String,
    pub hours: Decimal,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EquipmentLine {
    #[serde(rename = "type")]
    pub equipment_type: String,
    pub days: Decimal,
}

impl MaterialLine {
    pub fn new(material_type: impl Into<String>, quantity: Decimal, size: Option<&str>) -> Self {
        Self { material_type: material_type.into(), quantity, size: size.map(str::to_string) }
    }
}

impl LaborLine {
    pub fn new(labor_type: impl Into<String>, hours: Decimal) -> Self {
        Self { labor_type: labor_type.into(), hours }
    }
}

impl EquipmentLine {
    pub fn new(equipment_type: impl Into<String>, days: Decimal) -> Self {
        Self { equipment_type: equipment_type.into(), days }
    }
}

/// Accepts a size given either as text (`"4"`, `"3000_psi"`) or as a bare number (`4`).
pub fn deserialize_optional_size<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum SizeValue {
        Text(String),
        Integer(i64),
        Float(f64),
    }

    Ok(Option::<SizeValue>::deserialize(deserializer)?.map(|value| match value {
        SizeValue::Text(text) => text,
        SizeValue::Integer(number) => number.to_string(),
        SizeValue::Float(number) => number.to_string(),
    }))
}
