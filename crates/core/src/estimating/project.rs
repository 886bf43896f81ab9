use rust_decimal::Decimal;
use serde::Serialize;

use super::calculators::{EquipmentCost, Estimator, LaborCost, MaterialCost, Priced};
use super::money::serialize_currency;
use crate::domain::line_item::{EquipmentLine, LaborLine, MaterialLine};

/// Overhead and profit applied when a caller does not name a markup.
pub const DEFAULT_MARKUP: Decimal = Decimal::from_parts(15, 0, 0, false, 2);

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CategoryEstimate<T> {
    pub breakdown: Vec<Priced<T>>,
    #[serde(serialize_with = "serialize_currency")]
    pub subtotal: Decimal,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ProjectEstimate {
    pub materials: CategoryEstimate<MaterialCost>,
    pub labor: CategoryEstimate<LaborCost>,
    pub equipment: CategoryEstimate<EquipmentCost>,
    #[serde(serialize_with = "serialize_currency")]
    pub subtotal: Decimal,
    #[serde(serialize_with = "serialize_currency")]
    pub overhead_profit: Decimal,
    #[serde(serialize_with = "serialize_currency")]
    pub markup_percentage: Decimal,
    #[serde(serialize_with = "serialize_currency")]
    pub total: Decimal,
}

impl<T> CategoryEstimate<T> {
    /// `None` when the subtotal leaves the representable range.
    fn collect<I>(items: I, amount: impl Fn(&T) -> Decimal) -> Option<Self>
    where
        I: IntoIterator<Item = Priced<T>>,
    {
        let breakdown = items.into_iter().collect::<Vec<_>>();
        let subtotal = breakdown
            .iter()
            .filter_map(Priced::found)
            .map(amount)
            .try_fold(Decimal::ZERO, Decimal::checked_add)?;
        Some(Self { breakdown, subtotal })
    }
}

impl Estimator {
    /// Prices every line and rolls the results up with markup.
    ///
    /// Lines that miss the pricing tables stay in their breakdown so the caller can see them,
    /// but contribute nothing to the subtotals. Materials roll up at their with-waste amount.
    /// Totals keep full precision here; rounding happens only when the estimate is serialized.
    /// A roll-up that leaves the representable range comes back as [`Priced::Missing`].
    pub fn estimate_project(
        &self,
        materials: &[MaterialLine],
        labor: &[LaborLine],
        equipment: &[EquipmentLine],
        markup: Decimal,
    ) -> Priced<ProjectEstimate> {
        self.roll_up(materials, labor, equipment, markup)
            .map_or_else(|| Priced::out_of_range("project"), Priced::Found)
    }

    fn roll_up(
        &self,
        materials: &[MaterialLine],
        labor: &[LaborLine],
        equipment: &[EquipmentLine],
        markup: Decimal,
    ) -> Option<ProjectEstimate> {
        let materials = CategoryEstimate::collect(
            materials.iter().map(|line| {
                self.material_cost(&line.material_type, line.quantity, line.size.as_deref())
            }),
            |cost: &MaterialCost| cost.subtotal_with_waste,
        )?;
        let labor = CategoryEstimate::collect(
            labor.iter().map(|line| self.labor_cost(&line.labor_type, line.hours)),
            |cost: &LaborCost| cost.total,
        )?;
        let equipment = CategoryEstimate::collect(
            equipment.iter().map(|line| self.equipment_cost(&line.equipment_type, line.days)),
            |cost: &EquipmentCost| cost.total,
        )?;

        let subtotal =
            materials.subtotal.checked_add(labor.subtotal)?.checked_add(equipment.subtotal)?;
        let overhead_profit = subtotal.checked_mul(markup)?;

        Some(ProjectEstimate {
            materials,
            labor,
            equipment,
            subtotal,
            overhead_profit,
            markup_percentage: markup.checked_mul(Decimal::ONE_HUNDRED)?,
            total: subtotal.checked_add(overhead_profit)?,
        })
    }
}
