//! # Quotation Export Bundle
//!
//! Denormalized snapshot of an approved quotation, used to render the
//! document sent to the client.

use crate::domain::entities::quotation::{GeneralCost, Quotation, QuotationJob};
use crate::domain::value_objects::{ProjectId, QuotationSummary};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Project and client details printed on an exported quotation.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExportProject {
    /// Project identifier.
    pub project_id: ProjectId,
    /// Project name.
    pub project_name: String,
    /// Site address.
    pub project_address: Option<String>,
    /// Client name.
    pub client_name: Option<String>,
    /// Client email.
    pub client_email: Option<String>,
    /// Client phone.
    pub client_tel: Option<String>,
    /// Client postal address.
    pub client_address: Option<String>,
    /// Client tax identifier.
    pub client_tax_id: Option<String>,
}

impl ExportProject {
    /// Creates project details with only the name set.
    #[must_use]
    pub fn new(project_id: ProjectId, project_name: impl Into<String>) -> Self {
        Self {
            project_id,
            project_name: project_name.into(),
            ..Self::default()
        }
    }
}

/// Everything needed to render an approved quotation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct QuotationExportData {
    /// Project and client details.
    pub project: ExportProject,
    /// Quotation header.
    pub quotation: Quotation,
    /// Job rows.
    pub jobs: Vec<QuotationJob>,
    /// General cost rows, including unestimated categories.
    pub general_costs: Vec<GeneralCost>,
    /// Totals computed from `jobs` and `general_costs`.
    pub summary: QuotationSummary,
}
