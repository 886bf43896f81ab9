use std::sync::Arc;

use contech_core::estimating::{material_quantity, DEFAULT_MARKUP};
use contech_core::Estimator;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{debug, warn};

use super::catalog::tool_catalog;
use super::proposal::{PlaceholderProposalService, ProposalService};
use super::requests::{
    parse_request, ArgumentError, EquipmentCostRequest, LaborCostRequest, ListToolsRequest,
    MaterialCostRequest, MaterialQuantityRequest, ProjectEstimateRequest, ProposalRequest,
};
use super::ToolKind;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolStatus {
    Success,
    Error,
}

/// `{status, ...payload}`. `status` reports whether dispatch succeeded; a calculator lookup
/// miss is still a success whose payload carries an `error` key.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ToolEnvelope {
    pub status: ToolStatus,
    #[serde(flatten)]
    pub payload: Map<String, Value>,
}

impl ToolEnvelope {
    pub fn success(payload: Map<String, Value>) -> Self {
        Self { status: ToolStatus::Success, payload }
    }

    pub fn error(message: impl Into<String>) -> Self {
        let mut payload = Map::new();
        payload.insert("message".to_string(), Value::String(message.into()));
        Self { status: ToolStatus::Error, payload }
    }

    pub fn is_success(&self) -> bool {
        self.status == ToolStatus::Success
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.payload.get(key)
    }

    pub fn to_json_string(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|error| {
            format!(r#"{{"status":"error","message":"tool result could not be encoded: {error}"}}"#)
        })
    }
}

#[derive(Debug, Error)]
enum ToolFailure {
    #[error("Invalid arguments for {tool}: {source}")]
    Arguments { tool: &'static str, source: ArgumentError },
    #[error("Could not encode result for {tool}: {source}")]
    Encode { tool: &'static str, source: serde_json::Error },
}

#[derive(Clone)]
pub struct ToolDispatcher {
    estimator: Estimator,
    proposals: Arc<dyn ProposalService>,
    default_markup: rust_decimal::Decimal,
}

impl Default for ToolDispatcher {
    fn default() -> Self {
        Self::new(Estimator::default())
    }
}

impl ToolDispatcher {
    pub fn new(estimator: Estimator) -> Self {
        Self {
            estimator,
            proposals: Arc::new(PlaceholderProposalService),
            default_markup: DEFAULT_MARKUP,
        }
    }

    pub fn with_proposal_service(mut self, proposals: Arc<dyn ProposalService>) -> Self {
        self.proposals = proposals;
        self
    }

    pub fn with_default_markup(mut self, markup: rust_decimal::Decimal) -> Self {
        self.default_markup = markup;
        self
    }

    pub fn estimator(&self) -> &Estimator {
        &self.estimator
    }

    pub fn dispatch(&self, tool_name: &str, arguments: &Value) -> ToolEnvelope {
        let Some(kind) = ToolKind::from_name(tool_name) else {
            warn!(
                event_name = "agent.tool.unknown",
                tool = tool_name,
                "model requested an unknown tool"
            );
            return ToolEnvelope::error(format!("Unknown tool: {tool_name}"));
        };

        match self.run(kind, arguments) {
            Ok(payload) => {
                debug!(event_name = "agent.tool.completed", tool = kind.name(), "tool dispatched");
                ToolEnvelope::success(payload)
            }
            Err(failure) => {
                warn!(
                    event_name = "agent.tool.rejected",
                    tool = kind.name(),
                    error = %failure,
                    "tool arguments rejected"
                );
                ToolEnvelope::error(failure.to_string())
            }
        }
    }

    fn run(&self, kind: ToolKind, arguments: &Value) -> Result<Map<String, Value>, ToolFailure> {
        let tool = kind.name();
        let parse_failure = |source| ToolFailure::Arguments { tool, source };
        let encode = |value: Result<Value, serde_json::Error>| {
            value.map(into_object).map_err(|source| ToolFailure::Encode { tool, source })
        };

        match kind {
            ToolKind::ListAvailableTools => {
                parse_request::<ListToolsRequest>(arguments).map_err(parse_failure)?;
                encode(serde_json::to_value(tool_catalog()))
            }
            ToolKind::GenerateProposal => {
                let request: ProposalRequest = parse_request(arguments).map_err(parse_failure)?;
                encode(serde_json::to_value(self.proposals.generate(&request)))
            }
            ToolKind::CalculateMaterials => {
                let request: MaterialQuantityRequest =
                    parse_request(arguments).map_err(parse_failure)?;
                encode(serde_json::to_value(material_quantity(
                    &request.material_type,
                    request.length_ft,
                    request.diameter_inches,
                )))
            }
            ToolKind::CalculateMaterialCost => {
                let request: MaterialCostRequest = parse_request(arguments).map_err(parse_failure)?;
                encode(serde_json::to_value(self.estimator.material_cost(
                    &request.material_type,
                    request.quantity,
                    request.size.as_deref(),
                )))
            }
            ToolKind::CalculateLaborCost => {
                let request: LaborCostRequest = parse_request(arguments).map_err(parse_failure)?;
                encode(serde_json::to_value(
                    self.estimator.labor_cost(&request.labor_type, request.hours),
                ))
            }
            ToolKind::CalculateEquipmentCost => {
                let request: EquipmentCostRequest =
                    parse_request(arguments).map_err(parse_failure)?;
                encode(serde_json::to_value(
                    self.estimator.equipment_cost(&request.equipment_type, request.days),
                ))
            }
            ToolKind::EstimateProjectCost => {
                let request: ProjectEstimateRequest =
                    parse_request(arguments).map_err(parse_failure)?;
                encode(serde_json::to_value(self.estimator.estimate_project(
                    &request.materials,
                    &request.labor,
                    &request.equipment,
                    request.markup.unwrap_or(self.default_markup),
                )))
            }
        }
    }
}

fn into_object(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        other => {
            let mut map = Map::new();
            map.insert("result".to_string(), other);
            map
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use rust_decimal::Decimal;
    use serde_json::json;

    use super::{ToolDispatcher, ToolStatus};
    use crate::tools::proposal::{ProposalArtifact, ProposalService};
    use crate::tools::requests::ProposalRequest;

    #[test]
    fn unknown_tool_is_the_only_dispatch_error() {
        let envelope = ToolDispatcher::default().dispatch("nonexistent_tool", &json!({}));

        assert_eq!(envelope.status, ToolStatus::Error);
        assert_eq!(envelope.get("message"), Some(&json!("Unknown tool: nonexistent_tool")));
    }

    #[test]
    fn list_available_tools_returns_the_catalog() {
        let envelope = ToolDispatcher::default().dispatch("list_available_tools", &json!({}));

        assert!(envelope.is_success());
        assert_eq!(envelope.get("tools").and_then(|tools| tools.as_array()).map(Vec::len), Some(6));
        assert!(envelope.get("summary").is_some());
    }

    #[test]
    fn material_cost_flattens_breakdown_into_envelope() {
        let envelope = ToolDispatcher::default().dispatch(
            "calculate_material_cost",
            &json!({"material_type": "pipe", "quantity": 1000, "size": "4"}),
        );
        let value = serde_json::to_value(&envelope).expect("serialize envelope");

        assert_eq!(value["status"], "success");
        assert_eq!(value["unit_cost"], "8.50");
        assert_eq!(value["subtotal"], "8500.00");
        assert_eq!(value["subtotal_with_waste"], "9350.00");
    }

    #[test]
    fn lookup_miss_is_still_a_successful_dispatch() {
        let envelope = ToolDispatcher::default()
            .dispatch("calculate_labor_cost", &json!({"labor_type": "astronaut", "hours": 4}));

        assert!(envelope.is_success());
        assert_eq!(
            envelope.get("error"),
            Some(&json!("Labor type 'astronaut' not found in rates database"))
        );
    }

    #[test]
    fn equipment_cost_uses_daily_rate() {
        let envelope = ToolDispatcher::default().dispatch(
            "calculate_equipment_cost",
            &json!({"equipment_type": "Excavator", "days": 5}),
        );

        assert_eq!(envelope.get("daily_rate"), Some(&json!("400.00")));
        assert_eq!(envelope.get("total"), Some(&json!("2000.00")));
    }

    #[test]
    fn project_estimate_applies_default_markup() {
        let envelope = ToolDispatcher::default().dispatch(
            "estimate_project_cost",
            &json!({
                "materials": [{"type": "pipe", "quantity": 1000, "size": "4"}],
                "labor": [{"type": "operator", "hours": 40}]
            }),
        );

        assert!(envelope.is_success());
        assert_eq!(envelope.get("subtotal"), Some(&json!("12750.00")));
        assert_eq!(envelope.get("overhead_profit"), Some(&json!("1912.50")));
        assert_eq!(envelope.get("total"), Some(&json!("14662.50")));
    }

    #[test]
    fn configured_default_markup_is_used_when_omitted() {
        let dispatcher = ToolDispatcher::default().with_default_markup(Decimal::new(10, 2));
        let envelope = dispatcher.dispatch(
            "estimate_project_cost",
            &json!({"materials": [], "labor": [{"type": "laborer", "hours": 10}]}),
        );

        assert_eq!(envelope.get("overhead_profit"), Some(&json!("35.00")));
        assert_eq!(envelope.get("markup_percentage"), Some(&json!("10.00")));
    }

    #[test]
    fn calculate_materials_adds_waste_for_pipe_only() {
        let dispatcher = ToolDispatcher::default();

        let pipe = dispatcher
            .dispatch("calculate_materials", &json!({"material_type": "pipe", "length_ft": 500}));
        let wire = dispatcher
            .dispatch("calculate_materials", &json!({"material_type": "wire", "length_ft": 500}));

        assert_eq!(pipe.get("quantity"), Some(&json!("550.00")));
        assert_eq!(pipe.get("waste_factor"), Some(&json!("10%")));
        assert_eq!(wire.get("quantity"), Some(&json!("500")));
        assert!(wire.get("waste_factor").is_none());
    }

    #[test]
    fn overflowing_labor_hours_are_reported_in_band() {
        let envelope = ToolDispatcher::default()
            .dispatch("calculate_labor_cost", &json!({"labor_type": "operator", "hours": 1e27}));

        assert!(envelope.is_success());
        assert_eq!(
            envelope.get("error"),
            Some(&json!("Amount for 'operator' exceeds the supported numeric range"))
        );
    }

    #[test]
    fn overflowing_equipment_days_are_reported_in_band() {
        let envelope = ToolDispatcher::default().dispatch(
            "calculate_equipment_cost",
            &json!({"equipment_type": "excavator", "days": 1e27}),
        );

        assert!(envelope.is_success());
        assert!(envelope.get("error").is_some());
        assert!(envelope.get("total").is_none());
    }

    #[test]
    fn overflowing_material_quantity_is_reported_in_band() {
        let envelope = ToolDispatcher::default().dispatch(
            "calculate_material_cost",
            &json!({"material_type": "pipe", "quantity": 5e27, "size": "8"}),
        );

        assert!(envelope.is_success());
        assert!(envelope.get("error").is_some());
    }

    #[test]
    fn overflowing_pipe_length_is_reported_in_band() {
        let envelope = ToolDispatcher::default().dispatch(
            "calculate_materials",
            &json!({"material_type": "pipe", "length_ft": 7.5e28}),
        );

        assert!(envelope.is_success());
        assert!(envelope.get("error").is_some());
        assert!(envelope.get("quantity").is_none());
    }

    #[test]
    fn overflowing_project_line_stays_out_of_the_total() {
        let envelope = ToolDispatcher::default().dispatch(
            "estimate_project_cost",
            &json!({
                "materials": [{"type": "pipe", "quantity": 5e27, "size": "8"}],
                "labor": [{"type": "operator", "hours": 40}],
                "markup": 0
            }),
        );

        assert!(envelope.is_success());
        let materials = envelope.get("materials").cloned().unwrap_or_default();
        assert!(materials["breakdown"][0]["error"].is_string());
        assert_eq!(envelope.get("total"), Some(&json!("3400.00")));
    }

    #[test]
    fn overflowing_project_total_is_reported_in_band() {
        let labor = vec![json!({"type": "laborer", "hours": 1e26}); 30];
        let envelope = ToolDispatcher::default()
            .dispatch("estimate_project_cost", &json!({"materials": [], "labor": labor}));

        assert!(envelope.is_success());
        assert_eq!(
            envelope.get("error"),
            Some(&json!("Amount for 'project' exceeds the supported numeric range"))
        );
    }

    #[test]
    fn invalid_arguments_produce_error_envelope() {
        let envelope = ToolDispatcher::default()
            .dispatch("calculate_labor_cost", &json!({"labor_type": "operator"}));

        assert_eq!(envelope.status, ToolStatus::Error);
        let message = envelope.get("message").and_then(|m| m.as_str()).unwrap_or_default();
        assert!(message.starts_with("Invalid arguments for calculate_labor_cost:"), "{message}");
    }

    #[test]
    fn proposal_uses_injected_service() {
        struct Fixed;
        impl ProposalService for Fixed {
            fn generate(&self, request: &ProposalRequest) -> ProposalArtifact {
                ProposalArtifact {
                    message: "rendered".to_string(),
                    project_name: request.project_name.clone(),
                    pdf_path: "/tmp/fixed.pdf".to_string(),
                }
            }
        }

        let dispatcher = ToolDispatcher::default().with_proposal_service(Arc::new(Fixed));
        let envelope = dispatcher.dispatch(
            "generate_proposal",
            &json!({"project_name": "Waterline", "client_name": "City", "total_cost": 14662.5}),
        );

        assert_eq!(envelope.get("pdf_path"), Some(&json!("/tmp/fixed.pdf")));
    }

    #[test]
    fn dispatch_is_repeatable() {
        let dispatcher = ToolDispatcher::default();
        let arguments = json!({"material_type": "concrete", "quantity": 12});

        assert_eq!(
            dispatcher.dispatch("calculate_material_cost", &arguments),
            dispatcher.dispatch("calculate_material_cost", &arguments)
        );
    }
}
