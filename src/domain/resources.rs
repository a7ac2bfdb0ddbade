//! Target clinical resource models
//!
//! This module defines the structured resources the translation core emits:
//! document references, immunizations and the medication family, together
//! with the shared building blocks (references, identifiers, codeable
//! concepts, attachments).
//!
//! Every resource id is traceable to exactly one source node id; no two
//! resources emitted in a single mapping run share an id.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Fixed identifier system prefix; the source organization code is appended
pub const IDENTIFIER_SYSTEM_PREFIX: &str = "https://PSSAdaptor/";

/// Fixed profile URLs, one per resource kind
pub mod profile {
    pub const DOCUMENT_REFERENCE: &str =
        "https://fhir.nhs.uk/STU3/StructureDefinition/CareConnect-GPC-DocumentReference-1";
    pub const IMMUNIZATION: &str =
        "https://fhir.nhs.uk/STU3/StructureDefinition/CareConnect-GPC-Immunization-1";
    pub const MEDICATION: &str =
        "https://fhir.nhs.uk/STU3/StructureDefinition/CareConnect-GPC-Medication-1";
    pub const MEDICATION_REQUEST: &str =
        "https://fhir.nhs.uk/STU3/StructureDefinition/CareConnect-GPC-MedicationRequest-1";
    pub const MEDICATION_STATEMENT: &str =
        "https://fhir.nhs.uk/STU3/StructureDefinition/CareConnect-GPC-MedicationStatement-1";
}

/// Builds the resource identifier shared by every mapper:
/// system `https://PSSAdaptor/<organizationCode>`, value = source node id.
pub fn build_identifier(organization_code: &str, value: impl Into<String>) -> Identifier {
    Identifier {
        system: format!("{IDENTIFIER_SYSTEM_PREFIX}{organization_code}"),
        value: value.into(),
    }
}

/// A typed literal reference to another resource (`Practitioner/<id>` etc.)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Reference(String);

impl Reference {
    pub fn practitioner(id: &str) -> Self {
        Self(format!("Practitioner/{id}"))
    }

    pub fn patient(id: &str) -> Self {
        Self(format!("Patient/{id}"))
    }

    pub fn encounter(id: &str) -> Self {
        Self(format!("Encounter/{id}"))
    }

    pub fn organization(id: &str) -> Self {
        Self(format!("Organization/{id}"))
    }

    pub fn medication(id: &str) -> Self {
        Self(format!("Medication/{id}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Reference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A system/value identifier pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identifier {
    pub system: String,
    pub value: String,
}

/// A single coding entry
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coding {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display: Option<String>,
}

/// A codeable concept: codings plus free text
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeableConcept {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub coding: Vec<Coding>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl CodeableConcept {
    /// A concept carrying only free text
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            coding: vec![],
            text: Some(text.into()),
        }
    }

    /// Replaces the concept text, returning the updated concept
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }
}

/// Attachment metadata on a document's content entry
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
}

/// A free-text annotation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Annotation {
    pub text: String,
}

impl Annotation {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

/// Document reference status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentReferenceStatus {
    Current,
}

/// A mapped document reference
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentReference {
    pub id: String,
    pub identifier: Identifier,
    pub profile: String,
    pub status: DocumentReferenceStatus,

    /// Document type; never absent, degraded to a fixed marker concept
    /// when the source carries no usable code
    pub type_code: CodeableConcept,

    pub subject: Reference,
    pub custodian: Reference,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<Reference>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub indexed: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encounter: Option<Reference>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<Attachment>,
}

/// Immunization status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImmunizationStatus {
    Completed,
}

/// A mapped immunization
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Immunization {
    pub id: String,
    pub identifier: Identifier,
    pub profile: String,
    pub status: ImmunizationStatus,
    pub not_given: bool,
    pub primary_source: bool,
    pub patient: Reference,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encounter: Option<Reference>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub practitioner: Option<Reference>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vaccine_code: Option<CodeableConcept>,

    /// Recorded date: composition author time, else availability time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recorded: Option<DateTime<Utc>>,

    /// Clinical date per the effective-time precedence rules
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub notes: Vec<Annotation>,
}

/// A mapped medication (one per consumable entry)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Medication {
    pub id: String,
    pub identifier: Identifier,
    pub profile: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<CodeableConcept>,
}

/// Medication request intent: order (supply-prescribe) or plan
/// (supply-authorise)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MedicationRequestIntent {
    Order,
    Plan,
}

/// Medication request status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MedicationRequestStatus {
    Active,
    Completed,
}

/// A mapped medication request (order or plan)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MedicationRequest {
    pub id: String,
    pub identifier: Identifier,
    pub profile: String,
    pub intent: MedicationRequestIntent,
    pub status: MedicationRequestStatus,
    pub subject: Reference,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<Reference>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requester: Option<Reference>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recorder: Option<Reference>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authored_on: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub medication_reference: Option<Reference>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dosage_text: Option<String>,
}

/// Medication statement status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MedicationStatementStatus {
    Active,
    Completed,
}

/// A mapped medication statement (one per supply-authorise child)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MedicationStatementResource {
    pub id: String,
    pub identifier: Identifier,
    pub profile: String,
    pub status: MedicationStatementStatus,
    pub subject: Reference,

    /// Whether the medication was taken; unknown for transferred records
    pub taken: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<Reference>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effective: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_asserted: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub medication_reference: Option<Reference>,
}

/// A mapped target resource of any kind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "resource_type", rename_all = "snake_case")]
pub enum TargetResource {
    DocumentReference(DocumentReference),
    Immunization(Immunization),
    Medication(Medication),
    MedicationRequest(MedicationRequest),
    MedicationStatement(MedicationStatementResource),
}

impl TargetResource {
    /// The stable resource id (traceable to the originating source node)
    pub fn id(&self) -> &str {
        match self {
            TargetResource::DocumentReference(r) => &r.id,
            TargetResource::Immunization(r) => &r.id,
            TargetResource::Medication(r) => &r.id,
            TargetResource::MedicationRequest(r) => &r.id,
            TargetResource::MedicationStatement(r) => &r.id,
        }
    }

    /// The fixed profile URL for the resource kind
    pub fn profile(&self) -> &str {
        match self {
            TargetResource::DocumentReference(r) => &r.profile,
            TargetResource::Immunization(r) => &r.profile,
            TargetResource::Medication(r) => &r.profile,
            TargetResource::MedicationRequest(r) => &r.profile,
            TargetResource::MedicationStatement(r) => &r.profile,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_identifier() {
        let identifier = build_identifier("B83002", "node-1");
        assert_eq!(identifier.system, "https://PSSAdaptor/B83002");
        assert_eq!(identifier.value, "node-1");
    }

    #[test]
    fn test_reference_constructors() {
        assert_eq!(Reference::practitioner("p1").as_str(), "Practitioner/p1");
        assert_eq!(Reference::encounter("e1").as_str(), "Encounter/e1");
        assert_eq!(Reference::medication("m1").as_str(), "Medication/m1");
    }

    #[test]
    fn test_reference_serializes_as_plain_string() {
        let json = serde_json::to_string(&Reference::patient("pat-1")).unwrap();
        assert_eq!(json, "\"Patient/pat-1\"");
    }

    #[test]
    fn test_document_reference_status_serialization() {
        let json = serde_json::to_string(&DocumentReferenceStatus::Current).unwrap();
        assert_eq!(json, "\"current\"");
    }

    #[test]
    fn test_target_resource_id_accessor() {
        let medication = TargetResource::Medication(Medication {
            id: "med-1".to_string(),
            identifier: build_identifier("ORG", "med-1"),
            profile: profile::MEDICATION.to_string(),
            code: None,
        });
        assert_eq!(medication.id(), "med-1");
        assert_eq!(medication.profile(), profile::MEDICATION);
    }
}
