use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CatalogEntry {
    pub name: &'static str,
    pub description: &'static str,
    pub example: &'static str,
}

/// Plain-language answer to "what can you do". Lists the actionable tools only;
/// `list_available_tools` never appears in its own output.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ToolCatalog {
    pub tools: Vec<CatalogEntry>,
    pub summary: String,
}

const ENTRIES: [CatalogEntry; 6] = [
    CatalogEntry {
        name: "Generate Proposal",
        description: "Creates a construction proposal PDF with project details, materials, labor, and costs.",
        example: "Generate a proposal for a 1000ft waterline project",
    },
    CatalogEntry {
        name: "Calculate Material Quantities",
        description: "Figures out how much material you need for a run, such as pipe, wire, or conduit.",
        example: "How much 4-inch pipe do I need for 500 feet?",
    },
    CatalogEntry {
        name: "Calculate Material Cost",
        description: "Prices pipe, concrete, and rebar from the pricing database, waste allowance included.",
        example: "What's the cost for 1000 feet of 4-inch pipe?",
    },
    CatalogEntry {
        name: "Calculate Labor Cost",
        description: "Prices crew time from hourly rates for operators, laborers, foremen, electricians, and ironworkers.",
        example: "How much will 40 hours of operator time cost?",
    },
    CatalogEntry {
        name: "Calculate Equipment Cost",
        description: "Prices equipment rentals such as excavators, augers, and compactors from daily rates.",
        example: "How much does it cost to rent an excavator for 5 days?",
    },
    CatalogEntry {
        name: "Full Project Estimate",
        description: "Builds a complete estimate with materials, labor, equipment, and overhead markup.",
        example: "Give me a full estimate for installing 1000ft of waterline",
    },
];

pub fn tool_catalog() -> ToolCatalog {
    ToolCatalog {
        tools: ENTRIES.to_vec(),
        summary: format!(
            "I have {} tools available: proposal generation, material quantities, material costs, \
             labor costs, equipment costs, and full project estimates. Tell me what you need and \
             I'll run the right one.",
            ENTRIES.len()
        ),
    }
}
