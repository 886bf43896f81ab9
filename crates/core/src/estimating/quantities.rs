use rust_decimal::Decimal;
use serde::Serialize;

use super::calculators::{Priced, MATERIAL_WASTE_FACTOR};
use super::money::serialize_percent;

/// Quantity-only takeoff result; no pricing involved.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MaterialQuantity {
    pub material_type: String,
    pub quantity: Decimal,
    pub unit: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diameter_inches: Option<Decimal>,
    #[serde(serialize_with = "serialize_optional_percent", skip_serializing_if = "Option::is_none")]
    pub waste_factor: Option<Decimal>,
}

/// Linear footage to order for a run of `length_ft`. Pipe gets the material waste allowance;
/// everything else is ordered at the measured length.
pub fn material_quantity(
    material_type: &str,
    length_ft: Decimal,
    diameter_inches: Option<Decimal>,
) -> Priced<MaterialQuantity> {
    let is_pipe = material_type.trim().eq_ignore_ascii_case("pipe");
    let (quantity, waste_factor) = if is_pipe {
        let Some(with_waste) = length_ft.checked_mul(Decimal::ONE + MATERIAL_WASTE_FACTOR) else {
            return Priced::out_of_range(material_type);
        };
        (with_waste.round_dp(2), Some(MATERIAL_WASTE_FACTOR))
    } else {
        (length_ft, None)
    };

    Priced::Found(MaterialQuantity {
        material_type: material_type.to_string(),
        quantity,
        unit: "feet",
        diameter_inches,
        waste_factor,
    })
}

fn serialize_optional_percent<S>(value: &Option<Decimal>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    match value {
        Some(value) => serialize_percent(value, serializer),
        None => serializer.serialize_none(),
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use serde_json::json;

    use super::material_quantity;

    #[test]
    fn pipe_quantity_includes_waste() {
        let priced = material_quantity("Pipe", Decimal::from(500), Some(Decimal::from(4)));
        let quantity = priced.found().expect("pipe quantity");

        assert_eq!(quantity.quantity, Decimal::from(550));
        assert_eq!(quantity.unit, "feet");

        let value = serde_json::to_value(quantity).expect("serialize");
        assert_eq!(value["waste_factor"], json!("10%"));
        assert_eq!(value["diameter_inches"], json!("4"));
    }

    #[test]
    fn other_materials_use_measured_length() {
        let priced = material_quantity("conduit", Decimal::new(1205, 1), None);
        let quantity = priced.found().expect("conduit quantity");

        assert_eq!(quantity.quantity, Decimal::new(1205, 1));

        let value = serde_json::to_value(quantity).expect("serialize");
        assert!(value.get("waste_factor").is_none());
        assert!(value.get("diameter_inches").is_none());
    }

    #[test]
    fn overflowing_pipe_length_is_reported_in_band() {
        let length_ft = Decimal::from_i128_with_scale(75 * 10_i128.pow(27), 0);

        let priced = material_quantity("pipe", length_ft, None);

        assert!(priced.miss().is_some_and(|miss| miss.error.contains("'pipe' exceeds")));
    }
}
