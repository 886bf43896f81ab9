//! The fixed set of tools advertised to the chat model and the dispatcher that runs them.

pub mod catalog;
pub mod dispatcher;
pub mod proposal;
pub mod requests;

use serde::Serialize;
use serde_json::{json, Value};

pub use catalog::{tool_catalog, CatalogEntry, ToolCatalog};
pub use dispatcher::{ToolDispatcher, ToolEnvelope, ToolStatus};
pub use proposal::{PlaceholderProposalService, ProposalArtifact, ProposalService};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ToolKind {
    ListAvailableTools,
    GenerateProposal,
    CalculateMaterials,
    CalculateMaterialCost,
    CalculateLaborCost,
    CalculateEquipmentCost,
    EstimateProjectCost,
}

impl ToolKind {
    /// Registration order; also the order tools are advertised to the model.
    pub const ALL: [ToolKind; 7] = [
        Self::ListAvailableTools,
        Self::GenerateProposal,
        Self::CalculateMaterials,
        Self::CalculateMaterialCost,
        Self::CalculateLaborCost,
        Self::CalculateEquipmentCost,
        Self::EstimateProjectCost,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::ListAvailableTools => "list_available_tools",
            Self::GenerateProposal => "generate_proposal",
            Self::CalculateMaterials => "calculate_materials",
            Self::CalculateMaterialCost => "calculate_material_cost",
            Self::CalculateLaborCost => "calculate_labor_cost",
            Self::CalculateEquipmentCost => "calculate_equipment_cost",
            Self::EstimateProjectCost => "estimate_project_cost",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }

    /// One-line summary used by the `/tools` listing.
    pub fn summary(self) -> &'static str {
        match self {
            Self::ListAvailableTools => "Lists all available construction tools",
            Self::GenerateProposal => "Generates a construction proposal PDF",
            Self::CalculateMaterials => "Calculates material quantities needed",
            Self::CalculateMaterialCost => "Calculates material costs using real pricing",
            Self::CalculateLaborCost => "Calculates labor costs based on hourly rates",
            Self::CalculateEquipmentCost => "Calculates equipment rental costs",
            Self::EstimateProjectCost => "Creates a complete project cost estimate",
        }
    }

    /// Guidance for the model on when to pick this tool.
    pub fn description(self) -> &'static str {
        match self {
            Self::ListAvailableTools => {
                "Lists every available construction tool and what it does in plain language. \
                 Use when the user asks what tools exist, what you can do, or what their options are."
            }
            Self::GenerateProposal => {
                "Generates a construction proposal PDF. Use when the user asks to create, \
                 generate, or build a proposal for a construction project."
            }
            Self::CalculateMaterials => {
                "Calculates material quantities needed for a run of a given length. Use when the \
                 user asks about quantities, materials needed, or takeoffs."
            }
            Self::CalculateMaterialCost => {
                "Calculates material cost from the pricing database. Use when the user asks about \
                 material costs, pricing, or cost estimates for pipe, concrete, or rebar."
            }
            Self::CalculateLaborCost => {
                "Calculates labor cost from hourly rates. Use when the user asks about labor \
                 costs, crew costs, or hourly rates."
            }
            Self::CalculateEquipmentCost => {
                "Calculates equipment rental cost from daily rates. Use when the user asks about \
                 equipment costs or rental rates."
            }
            Self::EstimateProjectCost => {
                "Creates a complete project cost estimate covering materials, labor, equipment, \
                 and markup. Use when the user asks for a full estimate, project cost, or bid."
            }
        }
    }

    pub fn parameters(self) -> Value {
        match self {
            Self::ListAvailableTools => json!({
                "type": "object",
                "properties": {},
                "required": []
            }),
            Self::GenerateProposal => json!({
                "type": "object",
                "properties": {
                    "project_name": {"type": "string", "description": "Name of the construction project"},
                    "client_name": {"type": "string", "description": "Name of the client"},
                    "project_description": {"type": "string", "description": "Description of the work"},
                    "materials": {
                        "type": "array",
                        "items": {"type": "string"},
                        "description": "List of materials needed"
                    },
                    "labor_hours": {"type": "number", "description": "Total labor hours"},
                    "total_cost": {"type": "number", "description": "Total project cost"}
                },
                "required": ["project_name", "client_name", "total_cost"]
            }),
            Self::CalculateMaterials => json!({
                "type": "object",
                "properties": {
                    "material_type": {"type": "string", "description": "Type of material (pipe, wire, conduit, etc.)"},
                    "length_ft": {"type": "number", "description": "Length in feet"},
                    "diameter_inches": {"type": "number", "description": "Diameter in inches if applicable"}
                },
                "required": ["material_type", "length_ft"]
            }),
            Self::CalculateMaterialCost => json!({
                "type": "object",
                "properties": {
                    "material_type": {"type": "string", "description": "Type of material (pipe, concrete, rebar)"},
                    "quantity": {"type": "number", "description": "Quantity needed"},
                    "size": {"type": "string", "description": "Size specification (e.g. '4' for 4-inch pipe, '3000_psi' for concrete, '5' for #5 rebar)"}
                },
                "required": ["material_type", "quantity"]
            }),
            Self::CalculateLaborCost => json!({
                "type": "object",
                "properties": {
                    "labor_type": {"type": "string", "description": "Type of laborer (operator, laborer, foreman, electrician, ironworker)"},
                    "hours": {"type": "number", "description": "Number of hours"}
                },
                "required": ["labor_type", "hours"]
            }),
            Self::CalculateEquipmentCost => json!({
                "type": "object",
                "properties": {
                    "equipment_type": {"type": "string", "description": "Type of equipment (excavator, auger, compactor)"},
                    "days": {"type": "number", "description": "Number of days needed"}
                },
                "required": ["equipment_type", "days"]
            }),
            Self::EstimateProjectCost => json!({
                "type": "object",
                "properties": {
                    "materials": {
                        "type": "array",
                        "items": {
                            "type": "object",
                            "properties": {
                                "type": {"type": "string"},
                                "quantity": {"type": "number"},
                                "size": {"type": "string"}
                            },
                            "required": ["type", "quantity"]
                        },
                        "description": "Materials with type, quantity, and size"
                    },
                    "labor": {
                        "type": "array",
                        "items": {
                            "type": "object",
                            "properties": {
                                "type": {"type": "string"},
                                "hours": {"type": "number"}
                            },
                            "required": ["type", "hours"]
                        },
                        "description": "Labor with type and hours"
                    },
                    "equipment": {
                        "type": "array",
                        "items": {
                            "type": "object",
                            "properties": {
                                "type": {"type": "string"},
                                "days": {"type": "number"}
                            },
                            "required": ["type", "days"]
                        },
                        "description": "Optional equipment with type and days"
                    },
                    "markup": {"type": "number", "description": "Markup as a decimal fraction (default 0.15 for 15%)"}
                },
                "required": ["materials", "labor"]
            }),
        }
    }

    pub fn descriptor(self) -> ToolDescriptor {
        ToolDescriptor {
            name: self.name().to_string(),
            description: self.description().to_string(),
            parameters: self.parameters(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ToolDescriptor {
    pub name: String,
    pub description: String,
    pub parameters: Value,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ToolSummary {
    pub name: &'static str,
    pub description: &'static str,
}

/// Descriptors for every [`ToolKind`], built once and shared read-only.
#[derive(Clone, Debug)]
pub struct ToolRegistry {
    descriptors: Vec<ToolDescriptor>,
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self { descriptors: ToolKind::ALL.into_iter().map(ToolKind::descriptor).collect() }
    }
}

impl ToolRegistry {
    pub fn descriptors(&self) -> &[ToolDescriptor] {
        &self.descriptors
    }

    pub fn summaries(&self) -> Vec<ToolSummary> {
        ToolKind::ALL
            .into_iter()
            .map(|kind| ToolSummary { name: kind.name(), description: kind.summary() })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
}
