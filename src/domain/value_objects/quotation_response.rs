//! # Quotation Response
//!
//! The priced view of a quotation handed to the presentation layer.
//!
//! These types are the sole output contract of the quotation pipeline.
//! Field names serialize in camelCase and money serializes as JSON numbers;
//! renaming a field is a breaking change for consumers.

use crate::domain::value_objects::timestamp::Timestamp;
use crate::domain::value_objects::{QuotationId, QuotationStatus};
use rust_decimal::Decimal;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A job line as shown on a quotation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct QuotationJobDetail {
    /// Job name.
    pub name: String,
    /// Unit of measure.
    pub unit: String,
    /// Quantity.
    #[serde(with = "rust_decimal::serde::float")]
    #[schemars(with = "f64")]
    pub quantity: Decimal,
    /// Per-unit labor cost.
    #[serde(with = "rust_decimal::serde::float")]
    #[schemars(with = "f64")]
    pub labor_cost: Decimal,
    /// Per-unit material cost; zero when not yet estimated.
    #[serde(with = "rust_decimal::serde::float")]
    #[schemars(with = "f64")]
    pub material_cost: Decimal,
    /// Line total; the line labor cost when no total was computed.
    #[serde(with = "rust_decimal::serde::float")]
    #[schemars(with = "f64")]
    pub total_cost: Decimal,
    /// Selling price, only when set.
    #[serde(
        default,
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none"
    )]
    #[schemars(with = "Option<f64>")]
    pub selling_price: Option<Decimal>,
}

/// A general cost line as shown on a quotation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GeneralCostDetail {
    /// Category name.
    pub type_name: String,
    /// Estimated cost.
    #[serde(with = "rust_decimal::serde::float")]
    #[schemars(with = "f64")]
    pub estimated_cost: Decimal,
}

/// Totals of a quotation, each rounded to two decimal places.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct QuotationSummary {
    /// Sum of line labor costs.
    #[serde(with = "rust_decimal::serde::float")]
    #[schemars(with = "f64")]
    pub total_labor_cost: Decimal,
    /// Sum of line material estimates that are present.
    #[serde(with = "rust_decimal::serde::float")]
    #[schemars(with = "f64")]
    pub total_material_cost: Decimal,
    /// Sum of general cost estimates that are present.
    #[serde(with = "rust_decimal::serde::float")]
    #[schemars(with = "f64")]
    pub total_general_cost: Decimal,
    /// Labor + material + general.
    #[serde(rename = "subTotal", with = "rust_decimal::serde::float")]
    #[schemars(with = "f64")]
    pub subtotal: Decimal,
    /// Tax on the subtotal.
    #[serde(with = "rust_decimal::serde::float")]
    #[schemars(with = "f64")]
    pub tax: Decimal,
    /// Subtotal + tax.
    #[serde(with = "rust_decimal::serde::float")]
    #[schemars(with = "f64")]
    pub total: Decimal,
}

/// A priced quotation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct QuotationResponse {
    /// Quotation identifier.
    pub quotation_id: QuotationId,
    /// Current status.
    pub status: QuotationStatus,
    /// Validity date, if set.
    pub valid_date: Option<Timestamp>,
    /// Job lines in repository order.
    pub jobs: Vec<QuotationJobDetail>,
    /// Estimated general costs; unestimated categories are left out.
    pub costs: Vec<GeneralCostDetail>,
    /// Totals.
    pub summary: QuotationSummary,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn summary_uses_stable_keys() {
        let summary = QuotationSummary {
            total_labor_cost: Decimal::from(300),
            total_material_cost: Decimal::from(50),
            total_general_cost: Decimal::from(30),
            subtotal: Decimal::from(380),
            tax: Decimal::new(266, 1),
            total: Decimal::new(4066, 1),
        };
        let value = serde_json::to_value(summary).unwrap();
        assert_eq!(
            value,
            json!({
                "totalLaborCost": 300.0,
                "totalMaterialCost": 50.0,
                "totalGeneralCost": 30.0,
                "subTotal": 380.0,
                "tax": 26.6,
                "total": 406.6
            })
        );
    }

    #[test]
    fn job_detail_omits_absent_selling_price() {
        let detail = QuotationJobDetail {
            name: "Tiling".to_string(),
            unit: "m2".to_string(),
            quantity: Decimal::ONE,
            labor_cost: Decimal::from(10),
            material_cost: Decimal::ZERO,
            total_cost: Decimal::from(10),
            selling_price: None,
        };
        let value = serde_json::to_value(&detail).unwrap();
        assert!(value.get("sellingPrice").is_none());
        assert_eq!(value["materialCost"], json!(0.0));
    }
}
