//! Catalog entities: doctors, medications, and medical centers.
//!
//! Catalogs are curated by admins; visitors see only the subset named in
//! their profile's assignment sets.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};
use crate::time::{Timestamp, now_utc};

/// A doctor may be linked to at most this many medical centers.
pub const MAX_MEDICAL_CENTERS: usize = 2;

// =============================================================================
// Catalog kinds
// =============================================================================

/// The three catalog collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CatalogKind {
    Doctors,
    Medications,
    MedicalCenters,
}

impl std::fmt::Display for CatalogKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Doctors => write!(f, "doctors"),
            Self::Medications => write!(f, "medications"),
            Self::MedicalCenters => write!(f, "medical-centers"),
        }
    }
}

/// Accessors shared by every catalog entity, used by generic storage and
/// filtering code.
pub trait CatalogEntity: Clone + Send + Sync + 'static {
    const KIND: CatalogKind;

    fn id(&self) -> &str;
    fn created_by(&self) -> &str;
    fn created_at(&self) -> Timestamp;
}

// =============================================================================
// Doctor
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Doctor {
    pub id: String,
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub specialty: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,

    /// Linked medical centers, in the order they were supplied.
    #[serde(default)]
    pub medical_centers: Vec<String>,

    /// External id of the admin who created the record.
    pub created_by: String,

    pub created_at: Timestamp,
}

impl Doctor {
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        medical_centers: Vec<String>,
        created_by: impl Into<String>,
    ) -> Self {
        Self {
            id: crate::id::generate_id(),
            name: name.into(),
            specialty: None,
            email: None,
            phone: None,
            medical_centers,
            created_by: created_by.into(),
            created_at: now_utc(),
        }
    }

    /// Checks the medical-center invariant.
    ///
    /// # Errors
    ///
    /// Returns a `Validation` error when more than [`MAX_MEDICAL_CENTERS`]
    /// centers are linked.
    pub fn validate(&self) -> Result<()> {
        if self.medical_centers.len() > MAX_MEDICAL_CENTERS {
            return Err(CoreError::validation(format!(
                "a doctor can be associated with at most {MAX_MEDICAL_CENTERS} medical centers"
            )));
        }
        Ok(())
    }
}

impl CatalogEntity for Doctor {
    const KIND: CatalogKind = CatalogKind::Doctors;

    fn id(&self) -> &str {
        &self.id
    }

    fn created_by(&self) -> &str {
        &self.created_by
    }

    fn created_at(&self) -> Timestamp {
        self.created_at
    }
}

// =============================================================================
// Medication
// =============================================================================

/// Dispensing unit for a medication.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MedicationUnit {
    Units,
    Boxes,
    Samples,
}

impl std::fmt::Display for MedicationUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Units => write!(f, "units"),
            Self::Boxes => write!(f, "boxes"),
            Self::Samples => write!(f, "samples"),
        }
    }
}

impl FromStr for MedicationUnit {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "units" => Ok(Self::Units),
            "boxes" => Ok(Self::Boxes),
            "samples" => Ok(Self::Samples),
            other => Err(CoreError::InvalidUnit(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Medication {
    pub id: String,
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    pub unit: MedicationUnit,

    pub created_by: String,

    pub created_at: Timestamp,
}

impl Medication {
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        unit: MedicationUnit,
        created_by: impl Into<String>,
    ) -> Self {
        Self {
            id: crate::id::generate_id(),
            name: name.into(),
            description: None,
            unit,
            created_by: created_by.into(),
            created_at: now_utc(),
        }
    }
}

impl CatalogEntity for Medication {
    const KIND: CatalogKind = CatalogKind::Medications;

    fn id(&self) -> &str {
        &self.id
    }

    fn created_by(&self) -> &str {
        &self.created_by
    }

    fn created_at(&self) -> Timestamp {
        self.created_at
    }
}

// =============================================================================
// MedicalCenter
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MedicalCenter {
    pub id: String,
    pub name: String,
    pub address: String,
    pub city: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,

    pub created_by: String,

    pub created_at: Timestamp,
}

impl MedicalCenter {
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        address: impl Into<String>,
        city: impl Into<String>,
        created_by: impl Into<String>,
    ) -> Self {
        Self {
            id: crate::id::generate_id(),
            name: name.into(),
            address: address.into(),
            city: city.into(),
            phone: None,
            created_by: created_by.into(),
            created_at: now_utc(),
        }
    }
}

impl CatalogEntity for MedicalCenter {
    const KIND: CatalogKind = CatalogKind::MedicalCenters;

    fn id(&self) -> &str {
        &self.id
    }

    fn created_by(&self) -> &str {
        &self.created_by
    }

    fn created_at(&self) -> Timestamp {
        self.created_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_doctor_validate_within_limit() {
        let doctor = Doctor::new(
            "Dr. Reyes",
            vec!["c1".to_string(), "c2".to_string()],
            "admin-1",
        );
        assert!(doctor.validate().is_ok());
    }

    #[test]
    fn test_doctor_validate_too_many_centers() {
        let doctor = Doctor::new(
            "Dr. Reyes",
            vec!["c1".to_string(), "c2".to_string(), "c3".to_string()],
            "admin-1",
        );
        let err = doctor.validate().unwrap_err();
        assert!(matches!(err, CoreError::Validation { .. }));
    }

    #[test]
    fn test_doctor_validate_no_centers() {
        let doctor = Doctor::new("Dr. Reyes", Vec::new(), "admin-1");
        assert!(doctor.validate().is_ok());
    }

    #[test]
    fn test_medication_unit_parse() {
        assert_eq!("boxes".parse::<MedicationUnit>().unwrap(), MedicationUnit::Boxes);
        assert!("crates".parse::<MedicationUnit>().is_err());
    }

    #[test]
    fn test_medication_unit_serde() {
        let unit: MedicationUnit = serde_json::from_str("\"samples\"").unwrap();
        assert_eq!(unit, MedicationUnit::Samples);
        assert_eq!(serde_json::to_string(&unit).unwrap(), "\"samples\"");
    }

    #[test]
    fn test_catalog_kind_display() {
        assert_eq!(CatalogKind::Doctors.to_string(), "doctors");
        assert_eq!(CatalogKind::MedicalCenters.to_string(), "medical-centers");
    }

    #[test]
    fn test_catalog_entity_accessors() {
        let center = MedicalCenter::new("Centro Norte", "Av. Luperon 12", "Santiago", "admin-1");
        assert_eq!(center.created_by(), "admin-1");
        assert_eq!(MedicalCenter::KIND, CatalogKind::MedicalCenters);
        assert!(!center.id().is_empty());
    }

    #[test]
    fn test_doctor_json_shape() {
        let doctor = Doctor::new("Dr. Reyes", vec!["c1".to_string()], "admin-1");
        let json = serde_json::to_value(&doctor).unwrap();
        assert_eq!(json["createdBy"], "admin-1");
        assert_eq!(json["medicalCenters"][0], "c1");
        assert!(json.get("specialty").is_none());
    }
}
