use serde::Serialize;

use super::requests::ProposalRequest;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ProposalArtifact {
    pub message: String,
    pub project_name: String,
    pub pdf_path: String,
}

/// Seam for the external proposal generator.
pub trait ProposalService: Send + Sync {
    fn generate(&self, request: &ProposalRequest) -> ProposalArtifact;
}

/// Echoes the project name and a synthesized artifact path without rendering anything.
#[derive(Clone, Debug, Default)]
pub struct PlaceholderProposalService;

impl ProposalService for PlaceholderProposalService {
    fn generate(&self, request: &ProposalRequest) -> ProposalArtifact {
        let project_name = request.project_name.clone();
        ProposalArtifact {
            message: format!("Proposal generated for {project_name}"),
            pdf_path: format!("/proposals/{project_name}.pdf"),
            project_name,
        }
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::{PlaceholderProposalService, ProposalService};
    use crate::tools::requests::ProposalRequest;

    #[test]
    fn placeholder_echoes_project_name_into_path() {
        let request = ProposalRequest {
            project_name: "Main St Waterline".to_string(),
            client_name: "City of Springfield".to_string(),
            project_description: None,
            materials: Vec::new(),
            labor_hours: None,
            total_cost: Decimal::new(14_662_50, 2),
        };

        let artifact = PlaceholderProposalService.generate(&request);

        assert_eq!(artifact.message, "Proposal generated for Main St Waterline");
        assert_eq!(artifact.pdf_path, "/proposals/Main St Waterline.pdf");
        assert_eq!(artifact.project_name, "Main St Waterline");
    }
}
