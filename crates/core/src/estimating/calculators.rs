use std::sync::Arc;

use rust_decimal::Decimal;
use serde::Serialize;

use super::money::{serialize_currency, serialize_percent};
use super::tables::PricingTables;

/// Fraction added to every material subtotal to cover installation loss.
pub const MATERIAL_WASTE_FACTOR: Decimal = Decimal::from_parts(10, 0, 0, false, 2);

/// A pricing miss or an amount past `Decimal::MAX`, carried in-band so callers can report it
/// without failing the whole request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct LookupMiss {
    pub error: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Priced<T> {
    Found(T),
    Missing(LookupMiss),
}

impl<T> Priced<T> {
    pub(crate) fn missing(error: String) -> Self {
        Self::Missing(LookupMiss { error })
    }

    pub(crate) fn out_of_range(subject: &str) -> Self {
        Self::missing(format!("Amount for '{subject}' exceeds the supported numeric range"))
    }

    pub fn found(&self) -> Option<&T> {
        match self {
            Self::Found(value) => Some(value),
            Self::Missing(_) => None,
        }
    }

    pub fn miss(&self) -> Option<&LookupMiss> {
        match self {
            Self::Found(_) => None,
            Self::Missing(miss) => Some(miss),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MaterialCost {
    pub material: String,
    pub quantity: Decimal,
    pub unit: String,
    #[serde(serialize_with = "serialize_currency")]
    pub unit_cost: Decimal,
    #[serde(serialize_with = "serialize_currency")]
    pub subtotal: Decimal,
    #[serde(serialize_with = "serialize_percent")]
    pub waste_factor: Decimal,
    #[serde(serialize_with = "serialize_currency")]
    pub subtotal_with_waste: Decimal,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct LaborCost {
    pub labor_type: String,
    pub hours: Decimal,
    #[serde(serialize_with = "serialize_currency")]
    pub hourly_rate: Decimal,
    #[serde(serialize_with = "serialize_currency")]
    pub total: Decimal,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct EquipmentCost {
    pub equipment: String,
    pub days: Decimal,
    #[serde(serialize_with = "serialize_currency")]
    pub daily_rate: Decimal,
    #[serde(serialize_with = "serialize_currency")]
    pub total: Decimal,
}

/// How a material category turns a user-supplied size into a pricing key and a display label.
struct MaterialFamily {
    key_suffix: &'static str,
    default_key: Option<&'static str>,
    label: Label,
}

enum Label {
    Sized(fn(&str) -> String),
    /// Category name followed by the size, for categories without a dedicated label.
    CategoryAndSize,
}

const PIPE: MaterialFamily =
    MaterialFamily { key_suffix: "_inch", default_key: None, label: Label::Sized(pipe_label) };
const CONCRETE: MaterialFamily = MaterialFamily {
    key_suffix: "_psi",
    default_key: Some("3000_psi"),
    label: Label::Sized(concrete_label),
};
const REBAR: MaterialFamily =
    MaterialFamily { key_suffix: "_rebar", default_key: None, label: Label::Sized(rebar_label) };
const GENERIC: MaterialFamily =
    MaterialFamily { key_suffix: "", default_key: None, label: Label::CategoryAndSize };

impl MaterialFamily {
    fn for_category(category: &str) -> &'static Self {
        match category {
            "pipe" => &PIPE,
            "concrete" => &CONCRETE,
            "rebar" => &REBAR,
            _ => &GENERIC,
        }
    }

    fn resolve_key(&self, size: Option<&str>) -> Option<String> {
        let size = size.map(str::trim).filter(|value| !value.is_empty());
        let Some(size) = size else {
            return self.default_key.map(str::to_string);
        };

        let key = size.trim_start_matches('#').to_ascii_lowercase().replace([' ', '-'], "_");
        if self.key_suffix.is_empty() || key.ends_with(self.key_suffix) {
            Some(key)
        } else {
            Some(format!("{key}{}", self.key_suffix))
        }
    }

    fn label(&self, category: &str, key: &str) -> String {
        let size = key.strip_suffix(self.key_suffix).unwrap_or(key);
        match self.label {
            Label::Sized(render) => render(size),
            Label::CategoryAndSize => format!("{category} {}", size.replace('_', " ")),
        }
    }
}

fn pipe_label(size: &str) -> String {
    format!("{size}-inch pipe")
}

fn concrete_label(size: &str) -> String {
    format!("Concrete {size} psi")
}

fn rebar_label(size: &str) -> String {
    format!("#{size} rebar")
}

/// Deterministic cost calculators over a shared set of [`PricingTables`].
///
/// Every calculator is pure: identical inputs always produce identical output, and a
/// lookup miss or an overflowing amount comes back as [`Priced::Missing`] rather than an error.
#[derive(Clone, Debug)]
pub struct Estimator {
    tables: Arc<PricingTables>,
}

impl Default for Estimator {
    fn default() -> Self {
        Self::new(Arc::new(PricingTables::builtin()))
    }
}

impl Estimator {
    pub fn new(tables: Arc<PricingTables>) -> Self {
        Self { tables }
    }

    pub fn tables(&self) -> &PricingTables {
        &self.tables
    }

    pub fn material_cost(
        &self,
        material_type: &str,
        quantity: Decimal,
        size: Option<&str>,
    ) -> Priced<MaterialCost> {
        let category = material_type.trim().to_ascii_lowercase();
        if !self.tables.has_material_category(&category) {
            return Priced::missing(format!(
                "Material type '{material_type}' not found in pricing database"
            ));
        }

        let family = MaterialFamily::for_category(&category);
        let available = self.tables.material_keys(&category).join(", ");
        let Some(key) = family.resolve_key(size) else {
            return Priced::missing(format!(
                "Material type '{material_type}' requires a size (available: {available})"
            ));
        };

        let Some(entry) = self.tables.material(&category, &key) else {
            return Priced::missing(format!(
                "Size '{}' not found for material type '{material_type}' (available: {available})",
                size.unwrap_or(key.as_str())
            ));
        };

        let amounts = quantity.checked_mul(entry.unit_cost).and_then(|subtotal| {
            subtotal
                .checked_mul(Decimal::ONE + MATERIAL_WASTE_FACTOR)
                .map(|with_waste| (subtotal, with_waste))
        });
        let Some((subtotal, subtotal_with_waste)) = amounts else {
            return Priced::out_of_range(material_type);
        };

        Priced::Found(MaterialCost {
            material: family.label(&category, &key),
            quantity,
            unit: entry.unit.replace('_', " "),
            unit_cost: entry.unit_cost,
            subtotal,
            waste_factor: MATERIAL_WASTE_FACTOR,
            subtotal_with_waste,
        })
    }

    pub fn labor_cost(&self, labor_type: &str, hours: Decimal) -> Priced<LaborCost> {
        let Some(rate) = self.tables.labor(labor_type) else {
            return Priced::missing(format!(
                "Labor type '{labor_type}' not found in rates database"
            ));
        };

        match hours.checked_mul(rate.hourly_rate) {
            Some(total) => Priced::Found(LaborCost {
                labor_type: labor_type.to_string(),
                hours,
                hourly_rate: rate.hourly_rate,
                total,
            }),
            None => Priced::out_of_range(labor_type),
        }
    }

    pub fn equipment_cost(&self, equipment_type: &str, days: Decimal) -> Priced<EquipmentCost> {
        let Some(rate) = self.tables.equipment(equipment_type) else {
            return Priced::missing(format!(
                "Equipment type '{equipment_type}' not found in rates database"
            ));
        };

        match days.checked_mul(rate.daily_rate) {
            Some(total) => Priced::Found(EquipmentCost {
                equipment: equipment_type.to_string(),
                days,
                daily_rate: rate.daily_rate,
                total,
            }),
            None => Priced::out_of_range(equipment_type),
        }
    }
}
