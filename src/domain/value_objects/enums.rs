//! # Domain Enums
//!
//! Approval states for bills of quantities and quotations.
//!
//! Both lifecycles are one-way: `Draft` → `Approved`. Statuses are persisted
//! as lowercase text (`"draft"`, `"approved"`); unknown values fail to parse
//! rather than being treated as draft.
//!
//! All enums implement `Debug`, `Clone`, `Copy`, `PartialEq`, `Eq`, `Hash`,
//! `Display`, `FromStr`, and Serde traits.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Error returned when parsing an enum from a string fails.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseEnumError {
    /// The value does not name any variant.
    #[error("invalid {0} value: '{1}'")]
    InvalidValue(&'static str, String),
}

/// Approval status of a bill of quantities.
///
/// # Examples
///
/// ```
/// use boq_quotation::domain::value_objects::enums::BoqStatus;
///
/// let status: BoqStatus = "approved".parse().unwrap();
/// assert!(status.is_approved());
/// assert_eq!(status.to_string(), "approved");
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum BoqStatus {
    /// Jobs and costs can still be edited.
    #[default]
    Draft,
    /// Locked; quotations may be derived from it.
    Approved,
}

impl BoqStatus {
    /// Returns true if the BOQ is approved.
    #[inline]
    #[must_use]
    pub const fn is_approved(self) -> bool {
        matches!(self, Self::Approved)
    }

    /// Returns true if the BOQ can still be edited.
    #[inline]
    #[must_use]
    pub const fn is_editable(self) -> bool {
        matches!(self, Self::Draft)
    }

    /// Returns the persisted representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Approved => "approved",
        }
    }
}

impl fmt::Display for BoqStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BoqStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "draft" => Ok(Self::Draft),
            "approved" => Ok(Self::Approved),
            _ => Err(ParseEnumError::InvalidValue("BoqStatus", s.to_string())),
        }
    }
}

/// Approval status of a quotation.
///
/// # Examples
///
/// ```
/// use boq_quotation::domain::value_objects::enums::QuotationStatus;
///
/// assert_eq!(QuotationStatus::default(), QuotationStatus::Draft);
/// assert!(QuotationStatus::Draft.can_transition_to(QuotationStatus::Approved));
/// assert!(!QuotationStatus::Approved.can_transition_to(QuotationStatus::Draft));
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum QuotationStatus {
    /// Terms may still change; not exportable.
    #[default]
    Draft,
    /// Final; exportable once the BOQ is approved too.
    Approved,
}

impl QuotationStatus {
    /// Returns true if the quotation is approved.
    #[inline]
    #[must_use]
    pub const fn is_approved(self) -> bool {
        matches!(self, Self::Approved)
    }

    /// Returns true if the quotation is still a draft.
    #[inline]
    #[must_use]
    pub const fn is_draft(self) -> bool {
        matches!(self, Self::Draft)
    }

    /// Returns true if moving to `target` is a legal transition.
    #[must_use]
    pub const fn can_transition_to(self, target: Self) -> bool {
        matches!((self, target), (Self::Draft, Self::Approved))
    }

    /// Returns the persisted representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Approved => "approved",
        }
    }
}

impl fmt::Display for QuotationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QuotationStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "draft" => Ok(Self::Draft),
            "approved" => Ok(Self::Approved),
            _ => Err(ParseEnumError::InvalidValue(
                "QuotationStatus",
                s.to_string(),
            )),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    mod boq_status {
        use super::*;

        #[test]
        fn default_is_draft() {
            assert_eq!(BoqStatus::default(), BoqStatus::Draft);
            assert!(BoqStatus::default().is_editable());
        }

        #[test]
        fn from_str_is_case_insensitive() {
            assert_eq!("APPROVED".parse::<BoqStatus>().unwrap(), BoqStatus::Approved);
            assert_eq!(" Draft ".parse::<BoqStatus>().unwrap(), BoqStatus::Draft);
        }

        #[test]
        fn from_str_rejects_unknown() {
            let err = "pending".parse::<BoqStatus>().unwrap_err();
            assert_eq!(err.to_string(), "invalid BoqStatus value: 'pending'");
        }

        #[test]
        fn serde_uses_lowercase() {
            let json = serde_json::to_string(&BoqStatus::Approved).unwrap();
            assert_eq!(json, "\"approved\"");
            let back: BoqStatus = serde_json::from_str("\"draft\"").unwrap();
            assert_eq!(back, BoqStatus::Draft);
        }
    }

    mod quotation_status {
        use super::*;

        #[test]
        fn only_draft_to_approved_is_legal() {
            use QuotationStatus::{Approved, Draft};
            assert!(Draft.can_transition_to(Approved));
            assert!(!Draft.can_transition_to(Draft));
            assert!(!Approved.can_transition_to(Approved));
            assert!(!Approved.can_transition_to(Draft));
        }

        #[test]
        fn display_matches_persisted_value() {
            assert_eq!(QuotationStatus::Approved.to_string(), "approved");
            assert_eq!(QuotationStatus::Draft.to_string(), "draft");
        }

        #[test]
        fn from_str_roundtrips_display() {
            for status in [QuotationStatus::Draft, QuotationStatus::Approved] {
                assert_eq!(status.to_string().parse::<QuotationStatus>().unwrap(), status);
            }
        }
    }
}
