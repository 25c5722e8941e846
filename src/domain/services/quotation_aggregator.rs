//! # Quotation Aggregator
//!
//! Turns raw job and general-cost rows into a priced [`QuotationResponse`].
//!
//! The aggregator is pure: no I/O, no clock, same output for the same
//! input. Amounts are accumulated at full precision and rounded to two
//! decimal places only when the summary is produced.
//!
//! # Pricing rules
//!
//! - Line labor always counts towards the labor total.
//! - Line material counts only when the line estimate is present; the
//!   displayed per-unit material cost falls back to zero instead.
//! - General costs without an estimate are skipped entirely.
//! - A missing tax percentage means no tax.
//!
//! # Examples
//!
//! ```
//! use boq_quotation::domain::entities::{GeneralCost, Quotation, QuotationJob};
//! use boq_quotation::domain::services::QuotationAggregator;
//! use boq_quotation::domain::value_objects::ProjectId;
//! use rust_decimal::Decimal;
//!
//! let quotation = Quotation::new(ProjectId::new_v4());
//! let jobs = vec![QuotationJob::new("Painting", "m2", Decimal::ONE, Decimal::from(100)).unwrap()];
//! let costs = vec![GeneralCost::new("Transport", None)];
//!
//! let response = QuotationAggregator::build_response(&quotation, &jobs, &costs).unwrap();
//! assert_eq!(response.summary.total, Decimal::from(100));
//! assert!(response.costs.is_empty());
//! ```

use crate::domain::entities::quotation::{GeneralCost, Quotation, QuotationJob};
use crate::domain::errors::DomainResult;
use crate::domain::value_objects::arithmetic::{percent_of, round_money, CheckedArithmetic};
use crate::domain::value_objects::{
    GeneralCostDetail, QuotationJobDetail, QuotationResponse, QuotationSummary,
};
use rust_decimal::Decimal;

/// Full-precision running totals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Totals {
    labor: Decimal,
    material: Decimal,
    general: Decimal,
}

impl Totals {
    fn add_job(&mut self, job: &QuotationJob) -> DomainResult<()> {
        self.labor = self.labor.safe_add(job.total_labor_cost)?;
        if let Some(material) = job.total_estimated_price {
            self.material = self.material.safe_add(material)?;
        }
        Ok(())
    }

    fn add_general_cost(&mut self, estimated: Decimal) -> DomainResult<()> {
        self.general = self.general.safe_add(estimated)?;
        Ok(())
    }

    fn into_summary(self, tax_percentage: Option<Decimal>) -> DomainResult<QuotationSummary> {
        let subtotal = self.labor.safe_add(self.material)?.safe_add(self.general)?;
        let tax = match tax_percentage {
            Some(percentage) => percent_of(subtotal, percentage)?,
            None => Decimal::ZERO,
        };
        let total = subtotal.safe_add(tax)?;

        Ok(QuotationSummary {
            total_labor_cost: round_money(self.labor),
            total_material_cost: round_money(self.material),
            total_general_cost: round_money(self.general),
            subtotal: round_money(subtotal),
            tax: round_money(tax),
            total: round_money(total),
        })
    }
}

/// Pricing pipeline for quotations.
#[derive(Debug, Clone, Copy, Default)]
pub struct QuotationAggregator;

impl QuotationAggregator {
    /// Builds the priced view of a quotation.
    ///
    /// Job lines keep repository order. General costs without an estimate
    /// are left out of both the cost list and the totals.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Arithmetic` if a total overflows.
    pub fn build_response(
        quotation: &Quotation,
        jobs: &[QuotationJob],
        costs: &[GeneralCost],
    ) -> DomainResult<QuotationResponse> {
        let mut totals = Totals::default();

        let mut job_details = Vec::with_capacity(jobs.len());
        for job in jobs {
            job_details.push(Self::job_detail(job));
            totals.add_job(job)?;
        }

        let mut cost_details = Vec::with_capacity(costs.len());
        for cost in costs {
            if let Some(estimated) = cost.estimated_cost {
                cost_details.push(GeneralCostDetail {
                    type_name: cost.type_name.clone(),
                    estimated_cost: estimated,
                });
                totals.add_general_cost(estimated)?;
            }
        }

        Ok(QuotationResponse {
            quotation_id: quotation.id(),
            status: quotation.status(),
            valid_date: quotation.valid_until(),
            jobs: job_details,
            costs: cost_details,
            summary: totals.into_summary(quotation.tax_percentage())?,
        })
    }

    /// Computes only the summary, with the same rules as
    /// [`build_response`](Self::build_response).
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Arithmetic` if a total overflows.
    pub fn summarize(
        tax_percentage: Option<Decimal>,
        jobs: &[QuotationJob],
        costs: &[GeneralCost],
    ) -> DomainResult<QuotationSummary> {
        let mut totals = Totals::default();
        for job in jobs {
            totals.add_job(job)?;
        }
        for estimated in costs.iter().filter_map(|c| c.estimated_cost) {
            totals.add_general_cost(estimated)?;
        }
        totals.into_summary(tax_percentage)
    }

    fn job_detail(job: &QuotationJob) -> QuotationJobDetail {
        let material_cost = match job.estimated_price {
            Some(price) => price,
            None => Decimal::ZERO,
        };
        let total_cost = match job.total {
            Some(total) => total,
            None => job.total_labor_cost,
        };

        QuotationJobDetail {
            name: job.job_name.clone(),
            unit: job.unit.clone(),
            quantity: job.quantity,
            labor_cost: job.labor_cost,
            material_cost,
            total_cost,
            selling_price: job.selling_price,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::errors::DomainError;
    use crate::domain::value_objects::timestamp::Timestamp;
    use crate::domain::value_objects::ProjectId;
    use proptest::prelude::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn quotation_with_tax(tax: Option<Decimal>) -> Quotation {
        let mut q = Quotation::new(ProjectId::new_v4());
        q.set_terms(None, tax).unwrap();
        q
    }

    fn priced_job(labor: &str, material: &str, total: &str) -> QuotationJob {
        QuotationJob::new("Priced", "m2", Decimal::ONE, dec(labor))
            .unwrap()
            .with_estimate(dec(material), dec(material))
            .with_total(dec(total))
    }

    fn labor_only_job(labor: &str) -> QuotationJob {
        QuotationJob::new("Labor only", "m2", Decimal::ONE, dec(labor)).unwrap()
    }

    mod end_to_end {
        use super::*;

        #[test]
        fn reference_project() {
            let quotation = quotation_with_tax(Some(dec("7")));
            let jobs = vec![priced_job("100", "50", "150"), labor_only_job("200")];
            let costs = vec![
                GeneralCost::new("Transport", Some(dec("30"))),
                GeneralCost::new("Insurance", None),
            ];

            let response = QuotationAggregator::build_response(&quotation, &jobs, &costs).unwrap();
            let s = response.summary;

            assert_eq!(s.total_labor_cost, dec("300"));
            assert_eq!(s.total_material_cost, dec("50"));
            assert_eq!(s.total_general_cost, dec("30"));
            assert_eq!(s.subtotal, dec("380"));
            assert_eq!(s.tax, dec("26.6"));
            assert_eq!(s.total, dec("406.6"));
        }

        #[test]
        fn response_carries_quotation_header() {
            let mut quotation = Quotation::new(ProjectId::new_v4());
            let until = Timestamp::now().checked_add_days(15).unwrap();
            quotation.set_terms(Some(until), None).unwrap();

            let response = QuotationAggregator::build_response(&quotation, &[], &[]).unwrap();
            assert_eq!(response.quotation_id, quotation.id());
            assert_eq!(response.status, quotation.status());
            assert_eq!(response.valid_date, Some(until));
            assert_eq!(response.summary, QuotationSummary::default());
        }
    }

    mod job_lines {
        use super::*;

        #[test]
        fn material_display_defaults_to_zero() {
            let quotation = Quotation::new(ProjectId::new_v4());
            let response =
                QuotationAggregator::build_response(&quotation, &[labor_only_job("200")], &[])
                    .unwrap();
            let line = &response.jobs[0];
            assert_eq!(line.material_cost, Decimal::ZERO);
            assert_eq!(line.total_cost, dec("200"));
            assert!(line.selling_price.is_none());
        }

        #[test]
        fn total_prefers_computed_total() {
            let quotation = Quotation::new(ProjectId::new_v4());
            let job = priced_job("100", "50", "175").with_selling_price(dec("220"));
            let response = QuotationAggregator::build_response(&quotation, &[job], &[]).unwrap();
            let line = &response.jobs[0];
            assert_eq!(line.material_cost, dec("50"));
            assert_eq!(line.total_cost, dec("175"));
            assert_eq!(line.selling_price, Some(dec("220")));
        }

        #[test]
        fn material_total_uses_line_estimate_not_unit_price() {
            // unit price present but line estimate absent: shown, not summed
            let mut job = labor_only_job("10");
            job.estimated_price = Some(dec("99"));
            let quotation = Quotation::new(ProjectId::new_v4());
            let response = QuotationAggregator::build_response(&quotation, &[job], &[]).unwrap();
            assert_eq!(response.jobs[0].material_cost, dec("99"));
            assert_eq!(response.summary.total_material_cost, Decimal::ZERO);
        }

        #[test]
        fn zero_material_is_still_counted_as_present() {
            let job = QuotationJob::new("Free", "m", Decimal::ONE, dec("10"))
                .unwrap()
                .with_estimate(Decimal::ZERO, Decimal::ZERO);
            let summary = QuotationAggregator::summarize(None, &[job], &[]).unwrap();
            assert_eq!(summary.total_material_cost, Decimal::ZERO);
            assert_eq!(summary.subtotal, dec("10"));
        }

        #[test]
        fn keeps_repository_order() {
            let quotation = Quotation::new(ProjectId::new_v4());
            let mut first = labor_only_job("1");
            first.job_name = "First".to_string();
            let mut second = labor_only_job("2");
            second.job_name = "Second".to_string();
            let response =
                QuotationAggregator::build_response(&quotation, &[first, second], &[]).unwrap();
            let names: Vec<_> = response.jobs.iter().map(|j| j.name.as_str()).collect();
            assert_eq!(names, ["First", "Second"]);
        }
    }

    mod general_costs {
        use super::*;

        #[test]
        fn absent_estimates_are_skipped() {
            let quotation = Quotation::new(ProjectId::new_v4());
            let costs = vec![
                GeneralCost::new("A", None),
                GeneralCost::new("B", Some(dec("12.5"))),
                GeneralCost::new("C", None),
            ];
            let response = QuotationAggregator::build_response(&quotation, &[], &costs).unwrap();
            assert_eq!(response.costs.len(), 1);
            assert_eq!(response.costs[0].type_name, "B");
            assert_eq!(response.summary.total_general_cost, dec("12.5"));
        }

        #[test]
        fn zero_estimate_is_listed() {
            let quotation = Quotation::new(ProjectId::new_v4());
            let costs = vec![GeneralCost::new("Permit", Some(Decimal::ZERO))];
            let response = QuotationAggregator::build_response(&quotation, &[], &costs).unwrap();
            assert_eq!(response.costs.len(), 1);
        }
    }

    mod tax_and_rounding {
        use super::*;

        #[test]
        fn no_tax_percentage_means_no_tax() {
            let summary =
                QuotationAggregator::summarize(None, &[labor_only_job("123.45")], &[]).unwrap();
            assert_eq!(summary.tax, Decimal::ZERO);
            assert_eq!(summary.total, summary.subtotal);
        }

        #[test]
        fn rounds_half_away_from_zero_at_output() {
            let summary =
                QuotationAggregator::summarize(None, &[labor_only_job("10.005")], &[]).unwrap();
            assert_eq!(summary.total_labor_cost, dec("10.01"));
            assert_eq!(summary.total, dec("10.01"));
        }

        #[test]
        fn accumulates_at_full_precision() {
            // three lines of 0.004 round to 0.01 in total, not to 0.00 each
            let jobs = vec![
                labor_only_job("0.004"),
                labor_only_job("0.004"),
                labor_only_job("0.004"),
            ];
            let summary = QuotationAggregator::summarize(None, &jobs, &[]).unwrap();
            assert_eq!(summary.total_labor_cost, dec("0.01"));
        }

        #[test]
        fn tax_is_rounded_after_multiplication() {
            let summary =
                QuotationAggregator::summarize(Some(dec("7")), &[labor_only_job("0.5")], &[])
                    .unwrap();
            // 0.5 * 7% = 0.035
            assert_eq!(summary.tax, dec("0.04"));
            assert_eq!(summary.total, dec("0.54"));
        }

        #[test]
        fn overflow_is_reported() {
            let jobs = vec![
                QuotationJob::new("Huge", "m", Decimal::ONE, Decimal::MAX).unwrap(),
                QuotationJob::new("Huge", "m", Decimal::ONE, Decimal::MAX).unwrap(),
            ];
            assert!(matches!(
                QuotationAggregator::summarize(None, &jobs, &[]),
                Err(DomainError::Arithmetic(_))
            ));
        }
    }

    mod properties {
        use super::*;

        fn amount() -> impl Strategy<Value = Decimal> {
            (0i64..10_000_000, 0u32..4).prop_map(|(mantissa, scale)| Decimal::new(mantissa, scale))
        }

        fn job() -> impl Strategy<Value = QuotationJob> {
            (amount(), proptest::option::of(amount())).prop_map(|(labor, material)| {
                let job = QuotationJob::new("Job", "u", Decimal::ONE, labor).unwrap();
                match material {
                    Some(m) => job.with_estimate(m, m),
                    None => job,
                }
            })
        }

        fn cost() -> impl Strategy<Value = GeneralCost> {
            proptest::option::of(amount()).prop_map(|estimated| GeneralCost::new("Cost", estimated))
        }

        proptest! {
            #[test]
            fn summary_fields_have_at_most_two_decimals(
                jobs in proptest::collection::vec(job(), 0..20),
                costs in proptest::collection::vec(cost(), 0..10),
                tax in proptest::option::of(0i64..=100),
            ) {
                let summary =
                    QuotationAggregator::summarize(tax.map(Decimal::from), &jobs, &costs).unwrap();
                for value in [
                    summary.total_labor_cost,
                    summary.total_material_cost,
                    summary.total_general_cost,
                    summary.subtotal,
                    summary.tax,
                    summary.total,
                ] {
                    prop_assert!(value.normalize().scale() <= 2);
                }
            }

            #[test]
            fn absent_material_never_contributes(
                jobs in proptest::collection::vec(job(), 0..20),
            ) {
                let expected: Decimal = jobs.iter().filter_map(|j| j.total_estimated_price).sum();
                let summary = QuotationAggregator::summarize(None, &jobs, &[]).unwrap();
                prop_assert_eq!(summary.total_material_cost, round_money(expected));
            }

            #[test]
            fn unestimated_costs_never_listed(
                costs in proptest::collection::vec(cost(), 0..20),
            ) {
                let quotation = Quotation::new(ProjectId::new_v4());
                let response =
                    QuotationAggregator::build_response(&quotation, &[], &costs).unwrap();
                let estimated = costs.iter().filter(|c| c.estimated_cost.is_some()).count();
                prop_assert_eq!(response.costs.len(), estimated);
            }

            #[test]
            fn missing_tax_keeps_total_equal_to_subtotal(
                jobs in proptest::collection::vec(job(), 0..20),
                costs in proptest::collection::vec(cost(), 0..10),
            ) {
                let summary = QuotationAggregator::summarize(None, &jobs, &costs).unwrap();
                prop_assert_eq!(summary.tax, Decimal::ZERO);
                prop_assert_eq!(summary.total, summary.subtotal);
            }

            #[test]
            fn build_response_and_summarize_agree(
                jobs in proptest::collection::vec(job(), 0..20),
                costs in proptest::collection::vec(cost(), 0..10),
            ) {
                let quotation = Quotation::new(ProjectId::new_v4());
                let response =
                    QuotationAggregator::build_response(&quotation, &jobs, &costs).unwrap();
                let summary = QuotationAggregator::summarize(None, &jobs, &costs).unwrap();
                prop_assert_eq!(response.summary, summary);
            }
        }
    }
}
