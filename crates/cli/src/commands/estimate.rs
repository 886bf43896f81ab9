use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use contech_core::estimating::{PricingTables, DEFAULT_MARKUP};
use contech_core::{EquipmentLine, Estimator, LaborLine, MaterialLine, Priced};
use rust_decimal::Decimal;

use crate::commands::CommandResult;

#[derive(Debug, Clone, Default)]
pub struct EstimateArgs {
    /// `type:quantity[:size]`
    pub materials: Vec<String>,
    /// `type:hours`
    pub labor: Vec<String>,
    /// `type:days`
    pub equipment: Vec<String>,
    pub markup: Option<String>,
    pub pricing_path: Option<PathBuf>,
}

pub fn run(args: &EstimateArgs) -> CommandResult {
    let request = match parse_args(args) {
        Ok(request) => request,
        Err(message) => return CommandResult::failure("estimate", "invalid_argument", message, 2),
    };

    let tables = match &args.pricing_path {
        Some(path) => match PricingTables::load(path) {
            Ok(tables) => tables,
            Err(error) => {
                return CommandResult::failure("estimate", "pricing_tables", error.to_string(), 3);
            }
        },
        None => PricingTables::builtin(),
    };

    let estimator = Estimator::new(Arc::new(tables));
    match estimator.estimate_project(
        &request.materials,
        &request.labor,
        &request.equipment,
        request.markup,
    ) {
        Priced::Found(estimate) => CommandResult::json("estimate", &estimate),
        Priced::Missing(miss) => CommandResult::failure("estimate", "out_of_range", miss.error, 2),
    }
}

struct ParsedEstimate {
    materials: Vec<MaterialLine>,
    labor: Vec<LaborLine>,
    equipment: Vec<EquipmentLine>,
    markup: Decimal,
}

fn parse_args(args: &EstimateArgs) -> Result<ParsedEstimate, String> {
    if args.materials.is_empty() && args.labor.is_empty() && args.equipment.is_empty() {
        return Err("provide at least one --material, --labor, or --equipment line".to_string());
    }

    let materials = args
        .materials
        .iter()
        .map(|raw| {
            let (kind, amount, size) = parse_line_arg("--material", raw, true)?;
            Ok(MaterialLine::new(kind, amount, size))
        })
        .collect::<Result<Vec<_>, String>>()?;
    let labor = args
        .labor
        .iter()
        .map(|raw| {
            parse_line_arg("--labor", raw, false)
                .map(|(kind, hours, _)| LaborLine::new(kind, hours))
        })
        .collect::<Result<Vec<_>, String>>()?;
    let equipment = args
        .equipment
        .iter()
        .map(|raw| {
            parse_line_arg("--equipment", raw, false)
                .map(|(kind, days, _)| EquipmentLine::new(kind, days))
        })
        .collect::<Result<Vec<_>, String>>()?;

    let markup = match &args.markup {
        Some(raw) => {
            let markup = Decimal::from_str(raw.trim())
                .map_err(|_| format!("--markup `{raw}` is not a number"))?;
            if markup < Decimal::ZERO || markup > Decimal::ONE {
                return Err(format!("--markup must be a fraction between 0 and 1, got {markup}"));
            }
            markup
        }
        None => DEFAULT_MARKUP,
    };

    Ok(ParsedEstimate { materials, labor, equipment, markup })
}

fn parse_line_arg<'a>(
    flag: &str,
    raw: &'a str,
    allow_size: bool,
) -> Result<(&'a str, Decimal, Option<&'a str>), String> {
    let parts = raw.split(':').map(str::trim).collect::<Vec<_>>();
    let (kind, amount, size) = match parts.as_slice() {
        [kind, amount] => (*kind, *amount, None),
        [kind, amount, size] if allow_size => (*kind, *amount, Some(*size)),
        _ => {
            let shape = if allow_size { "type:quantity[:size]" } else { "type:amount" };
            return Err(format!("{flag} `{raw}` must look like {shape}"));
        }
    };

    if kind.is_empty() {
        return Err(format!("{flag} `{raw}` is missing a type"));
    }
    let amount = Decimal::from_str(amount)
        .map_err(|_| format!("{flag} `{raw}` has a non-numeric amount `{amount}`"))?;
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(format!("{flag} `{raw}` must not be negative"));
    }

    Ok((kind, amount, size.filter(|size| !size.is_empty())))
}
