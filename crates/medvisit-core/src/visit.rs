//! Visits logged by field representatives.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};
use crate::time::{Timestamp, now_utc};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VisitStatus {
    Completed,
    Pending,
    Cancelled,
}

impl std::fmt::Display for VisitStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Completed => write!(f, "completed"),
            Self::Pending => write!(f, "pending"),
            Self::Cancelled => write!(f, "cancelled"),
        }
    }
}

impl FromStr for VisitStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "completed" => Ok(Self::Completed),
            "pending" => Ok(Self::Pending),
            "cancelled" => Ok(Self::Cancelled),
            other => Err(CoreError::InvalidStatus(other.to_string())),
        }
    }
}

/// One medication delivered or promoted during a visit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisitMedication {
    pub medication_id: String,

    /// Quantity handed over; at least 1.
    pub quantity: u32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Visit {
    pub id: String,
    pub doctor_id: String,

    /// External id of the visitor who logged the visit.
    pub visitor_id: String,

    /// When the visit took place.
    pub date: Timestamp,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub medical_center_id: Option<String>,

    #[serde(default)]
    pub medications: Vec<VisitMedication>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,

    pub status: VisitStatus,

    pub created_at: Timestamp,
}

impl Visit {
    #[must_use]
    pub fn new(
        doctor_id: impl Into<String>,
        visitor_id: impl Into<String>,
        date: Timestamp,
        status: VisitStatus,
    ) -> Self {
        Self {
            id: crate::id::generate_id(),
            doctor_id: doctor_id.into(),
            visitor_id: visitor_id.into(),
            date,
            medical_center_id: None,
            medications: Vec::new(),
            notes: None,
            status,
            created_at: now_utc(),
        }
    }

    /// Checks medication quantities.
    ///
    /// # Errors
    ///
    /// Returns a `Validation` error when any quantity is zero.
    pub fn validate(&self) -> Result<()> {
        for med in &self.medications {
            if med.quantity < 1 {
                return Err(CoreError::validation(format!(
                    "medication {} quantity must be at least 1",
                    med.medication_id
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_visit() -> Visit {
        Visit::new("d1", "v1", now_utc(), VisitStatus::Pending)
    }

    #[test]
    fn test_visit_validate_ok() {
        let mut visit = sample_visit();
        visit.medications.push(VisitMedication {
            medication_id: "m1".to_string(),
            quantity: 3,
            notes: None,
        });
        assert!(visit.validate().is_ok());
    }

    #[test]
    fn test_visit_validate_zero_quantity() {
        let mut visit = sample_visit();
        visit.medications.push(VisitMedication {
            medication_id: "m1".to_string(),
            quantity: 0,
            notes: None,
        });
        assert!(matches!(
            visit.validate(),
            Err(CoreError::Validation { .. })
        ));
    }

    #[test]
    fn test_visit_status_parse() {
        assert_eq!("pending".parse::<VisitStatus>().unwrap(), VisitStatus::Pending);
        assert!("archived".parse::<VisitStatus>().is_err());
    }

    #[test]
    fn test_visit_json_shape() {
        let visit = sample_visit();
        let json = serde_json::to_value(&visit).unwrap();
        assert_eq!(json["doctorId"], "d1");
        assert_eq!(json["visitorId"], "v1");
        assert_eq!(json["status"], "pending");
        assert!(json.get("medicalCenterId").is_none());
    }
}
