use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingEntry {
    pub unit: String,
    pub unit_cost: Decimal,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LaborRate {
    pub hourly_rate: Decimal,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EquipmentRate {
    pub daily_rate: Decimal,
}

#[derive(Debug, Error)]
pub enum PricingTableError {
    #[error("could not read pricing file `{path}`: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("could not parse pricing tables: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid pricing tables: {0}")]
    Invalid(String),
}

/// Read-only unit cost data backing every estimating calculator.
///
/// Material prices are keyed by category then size/grade key (`pipe` → `4_inch`);
/// labor and equipment rates by a single type name. All keys are stored lower-cased.
/// Built once at startup and shared behind an `Arc`; nothing mutates it afterwards.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingTables {
    #[serde(default)]
    materials: BTreeMap<String, BTreeMap<String, PricingEntry>>,
    #[serde(default)]
    labor: BTreeMap<String, LaborRate>,
    #[serde(default)]
    equipment: BTreeMap<String, EquipmentRate>,
}

impl PricingTables {
    pub fn builtin() -> Self {
        let mut materials = BTreeMap::new();
        materials.insert(
            "pipe".to_string(),
            entries(&[
                ("4_inch", "linear_foot", 850),
                ("6_inch", "linear_foot", 1200),
                ("8_inch", "linear_foot", 1800),
            ]),
        );
        materials.insert(
            "concrete".to_string(),
            entries(&[("3000_psi", "cubic_yard", 16600), ("4000_psi", "cubic_yard", 18000)]),
        );
        materials.insert(
            "rebar".to_string(),
            entries(&[("4_rebar", "linear_foot", 125), ("5_rebar", "linear_foot", 175)]),
        );

        let labor = [
            ("operator", 8500),
            ("laborer", 3500),
            ("foreman", 5500),
            ("electrician", 6500),
            ("ironworker", 5500),
        ]
        .into_iter()
        .map(|(name, cents)| (name.to_string(), LaborRate { hourly_rate: Decimal::new(cents, 2) }))
        .collect();

        let equipment = [("excavator", 40000), ("auger", 45000), ("compactor", 10000)]
            .into_iter()
            .map(|(name, cents)| {
                (name.to_string(), EquipmentRate { daily_rate: Decimal::new(cents, 2) })
            })
            .collect();

        Self { materials, labor, equipment }
    }

    pub fn load(path: &Path) -> Result<Self, PricingTableError> {
        let raw = fs::read_to_string(path)
            .map_err(|source| PricingTableError::ReadFile { path: path.to_path_buf(), source })?;
        Self::from_toml_str(&raw)
    }

    pub fn from_toml_str(raw: &str) -> Result<Self, PricingTableError> {
        let parsed: Self = toml::from_str(raw)?;
        let tables = parsed.normalized();
        tables.validate()?;
        Ok(tables)
    }

    pub fn material(&self, category: &str, key: &str) -> Option<&PricingEntry> {
        self.materials.get(&lookup_key(category))?.get(&lookup_key(key))
    }

    pub fn has_material_category(&self, category: &str) -> bool {
        self.materials.contains_key(&lookup_key(category))
    }

    /// Size keys priced for a category, in sorted order. Empty when the category is unknown.
    pub fn material_keys(&self, category: &str) -> Vec<&str> {
        self.materials
            .get(&lookup_key(category))
            .map(|sizes| sizes.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }

    pub fn material_categories(&self) -> Vec<&str> {
        self.materials.keys().map(String::as_str).collect()
    }

    pub fn labor(&self, labor_type: &str) -> Option<LaborRate> {
        self.labor.get(&lookup_key(labor_type)).copied()
    }

    pub fn labor_types(&self) -> Vec<&str> {
        self.labor.keys().map(String::as_str).collect()
    }

    pub fn equipment(&self, equipment_type: &str) -> Option<EquipmentRate> {
        self.equipment.get(&lookup_key(equipment_type)).copied()
    }

    pub fn equipment_types(&self) -> Vec<&str> {
        self.equipment.keys().map(String::as_str).collect()
    }

    pub fn material_price_count(&self) -> usize {
        self.materials.values().map(BTreeMap::len).sum()
    }

    fn normalized(self) -> Self {
        let materials = self
            .materials
            .into_iter()
            .map(|(category, sizes)| {
                let sizes =
                    sizes.into_iter().map(|(key, entry)| (lookup_key(&key), entry)).collect();
                (lookup_key(&category), sizes)
            })
            .collect();
        let labor = self.labor.into_iter().map(|(key, rate)| (lookup_key(&key), rate)).collect();
        let equipment =
            self.equipment.into_iter().map(|(key, rate)| (lookup_key(&key), rate)).collect();

        Self { materials, labor, equipment }
    }

    fn validate(&self) -> Result<(), PricingTableError> {
        if self.materials.is_empty() && self.labor.is_empty() && self.equipment.is_empty() {
            return Err(PricingTableError::Invalid(
                "at least one material, labor, or equipment entry is required".to_string(),
            ));
        }

        for (category, sizes) in &self.materials {
            if sizes.is_empty() {
                return Err(PricingTableError::Invalid(format!(
                    "materials.{category} must define at least one size"
                )));
            }
            for (key, entry) in sizes {
                if entry.unit_cost.is_sign_negative() {
                    return Err(PricingTableError::Invalid(format!(
                        "materials.{category}.{key}.unit_cost must not be negative"
                    )));
                }
            }
        }

        if let Some((name, _)) =
            self.labor.iter().find(|(_, rate)| rate.hourly_rate.is_sign_negative())
        {
            return Err(PricingTableError::Invalid(format!(
                "labor.{name}.hourly_rate must not be negative"
            )));
        }

        if let Some((name, _)) =
            self.equipment.iter().find(|(_, rate)| rate.daily_rate.is_sign_negative())
        {
            return Err(PricingTableError::Invalid(format!(
                "equipment.{name}.daily_rate must not be negative"
            )));
        }

        Ok(())
    }
}

fn entries(rows: &[(&str, &str, i64)]) -> BTreeMap<String, PricingEntry> {
    rows.iter()
        .map(|(key, unit, cents)| {
            (
                key.to_string(),
                PricingEntry { unit: unit.to_string(), unit_cost: Decimal::new(*cents, 2) },
            )
        })
        .collect()
}

fn lookup_key(raw: &str) -> String {
    raw.trim().to_ascii_lowercase()
}

#[cfg(test)]
mod tests {
    use std::fs;

    use rust_decimal::Decimal;
    use tempfile::TempDir;

    use super::{PricingTableError, PricingTables};

    #[test]
    fn builtin_tables_carry_reference_prices() {
        let tables = PricingTables::builtin();

        let pipe = tables.material("pipe", "4_inch").expect("4 inch pipe priced");
        assert_eq!(pipe.unit_cost, Decimal::new(850, 2));
        assert_eq!(pipe.unit, "linear_foot");
        assert_eq!(
            tables.labor("operator").map(|rate| rate.hourly_rate),
            Some(Decimal::new(8500, 2))
        );
        assert_eq!(
            tables.equipment("excavator").map(|rate| rate.daily_rate),
            Some(Decimal::new(40000, 2))
        );
        assert_eq!(tables.material_price_count(), 7);
    }

    #[test]
    fn lookups_ignore_case_and_surrounding_whitespace() {
        let tables = PricingTables::builtin();

        assert!(tables.material(" Concrete ", "3000_PSI").is_some());
        assert!(tables.labor("FOREMAN").is_some());
        assert!(tables.equipment("Auger").is_some());
    }

    #[test]
    fn missing_keys_are_absent_not_errors() {
        let tables = PricingTables::builtin();

        assert!(tables.material("pipe", "12_inch").is_none());
        assert!(tables.material("asphalt", "hot_mix").is_none());
        assert!(tables.labor("welder").is_none());
        assert!(tables.equipment("crane").is_none());
        assert!(tables.material_keys("asphalt").is_empty());
    }

    #[test]
    fn toml_tables_are_normalized_on_load() {
        let tables = PricingTables::from_toml_str(
            r#"
[materials.Wire.12_AWG]
unit = "linear_foot"
unit_cost = 0.45

[labor.Welder]
hourly_rate = 72.5

[equipment.Crane]
daily_rate = "1250.00"
"#,
        )
        .expect("tables should parse");

        assert_eq!(
            tables.material("wire", "12_awg").map(|entry| entry.unit_cost),
            Some(Decimal::new(45, 2))
        );
        assert_eq!(tables.material_keys("wire"), vec!["12_awg"]);
        assert_eq!(
            tables.labor("welder").map(|rate| rate.hourly_rate),
            Some(Decimal::new(725, 1))
        );
        assert_eq!(
            tables.equipment("crane").map(|rate| rate.daily_rate),
            Some(Decimal::new(125000, 2))
        );
    }

    #[test]
    fn negative_rates_are_rejected() {
        let error = PricingTables::from_toml_str(
            r#"
[labor.operator]
hourly_rate = -10
"#,
        )
        .expect_err("negative rate should fail validation");

        assert!(matches!(
            error,
            PricingTableError::Invalid(ref message) if message.contains("labor.operator")
        ));
    }

    #[test]
    fn empty_tables_are_rejected() {
        let error = PricingTables::from_toml_str("").expect_err("empty tables should fail");
        assert!(matches!(error, PricingTableError::Invalid(_)));
    }

    #[test]
    fn load_reads_tables_from_disk() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("pricing.toml");
        fs::write(
            &path,
            r#"
[equipment.skid_steer]
daily_rate = 275
"#,
        )
        .expect("write pricing file");

        let tables = PricingTables::load(&path).expect("load pricing file");
        assert_eq!(tables.equipment_types(), vec!["skid_steer"]);
    }

    #[test]
    fn load_reports_missing_file() {
        let dir = TempDir::new().expect("tempdir");
        let error = PricingTables::load(&dir.path().join("absent.toml"))
            .expect_err("missing file should fail");
        assert!(matches!(error, PricingTableError::ReadFile { .. }));
    }
}
