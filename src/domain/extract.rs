//! EHR extract domain model
//!
//! This module defines the in-memory representation of a received EHR
//! extract: the hierarchical clinical-document tree produced by the external
//! deserialization layer. The core treats the tree as read-only; every type
//! here derives serde traits so a JSON rendition can be loaded by the CLI
//! and by tests.
//!
//! The tree is an explicit tagged union ([`Statement`]) with exhaustive
//! matching, replacing the runtime type checks the source schema invites.

use serde::{Deserialize, Serialize};

/// SNOMED CT code system OID
pub const SNOMED_CODE_SYSTEM: &str = "2.16.840.1.113883.2.1.3.2.4.15";

/// An instance identifier: a root OID/UUID plus an optional extension
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InstanceId {
    /// Root identifier (UUID or OID)
    pub root: String,

    /// Optional extension qualifying the root
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extension: Option<String>,
}

impl InstanceId {
    /// Creates an identifier with a root and no extension
    pub fn new(root: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            extension: None,
        }
    }
}

/// A coded value: code + code system plus display/original text
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Code {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code_system: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_text: Option<String>,

    /// Translations into other code systems
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub translations: Vec<Code>,
}

impl Code {
    /// Returns the SNOMED CT code carried by this element, either directly
    /// or through one of its translations.
    pub fn snomed_code(&self) -> Option<&str> {
        if self.code_system.as_deref() == Some(SNOMED_CODE_SYSTEM) {
            return self.code.as_deref();
        }

        self.translations
            .iter()
            .find(|t| t.code_system.as_deref() == Some(SNOMED_CODE_SYSTEM))
            .and_then(|t| t.code.as_deref())
    }

    /// True when a code value is present
    pub fn has_code(&self) -> bool {
        self.code.is_some()
    }
}

/// An effective-time interval with optional low/high bounds and center point.
///
/// Values are HL7 TS literals (e.g. `20200101103000`) exactly as received.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRange {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub low: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub high: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub center: Option<String>,
}

/// A participant on a statement or composition
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    /// Participation type codes (e.g. `PPRF`, `PRF`, `RESP`)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub type_codes: Vec<String>,

    /// Null flavour marking the participation as not usable
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub null_flavor: Option<String>,

    /// Reference to the participating agent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent_ref: Option<InstanceId>,
}

impl Participant {
    /// True when the participation carries no null flavour
    pub fn is_not_null_flavour(&self) -> bool {
        self.null_flavor.is_none()
    }

    /// True when the first type code equals the given one
    pub fn has_type_code(&self, type_code: &str) -> bool {
        self.type_codes.first().map(String::as_str) == Some(type_code)
    }

    /// Agent id root, when an agent reference is present
    pub fn agent_id(&self) -> Option<&str> {
        self.agent_ref.as_ref().map(|id| id.root.as_str())
    }
}

/// The full received extract for one patient transfer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EhrExtract {
    pub id: InstanceId,

    /// Availability time of the extract itself (HL7 TS literal)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub availability_time: Option<String>,

    #[serde(default)]
    pub compositions: Vec<EhrComposition>,
}

impl EhrExtract {
    /// All compound statements anywhere in the extract, including those
    /// nested inside other compound statements.
    pub fn all_compound_statements(&self) -> Vec<&CompoundStatement> {
        self.compositions
            .iter()
            .flat_map(|c| c.components.iter())
            .flat_map(Statement::self_and_descendant_compounds)
            .collect()
    }
}

/// A source grouping node containing child statements, an author and
/// timing metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EhrComposition {
    pub id: InstanceId,

    /// Composition category code
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<Code>,

    /// Author time (HL7 TS literal)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_time: Option<String>,

    /// Availability time (HL7 TS literal)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub availability_time: Option<String>,

    /// The composition-level participant2 list
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub participants2: Vec<Participant>,

    #[serde(default)]
    pub components: Vec<Statement>,
}

/// A node in the extract tree
///
/// Tagged union over the statement kinds the source schema allows as
/// composition components. Medication statements are a distinct wire-level
/// kind; their classification happens inside the medication mapper because
/// one source statement fans out into several target resources.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Statement {
    Compound(CompoundStatement),
    Narrative(NarrativeStatement),
    Observation(ObservationStatement),
    Medication(MedicationStatement),
}

impl Statement {
    pub fn as_compound(&self) -> Option<&CompoundStatement> {
        match self {
            Statement::Compound(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_narrative(&self) -> Option<&NarrativeStatement> {
        match self {
            Statement::Narrative(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_observation(&self) -> Option<&ObservationStatement> {
        match self {
            Statement::Observation(o) => Some(o),
            _ => None,
        }
    }

    pub fn as_medication(&self) -> Option<&MedicationStatement> {
        match self {
            Statement::Medication(m) => Some(m),
            _ => None,
        }
    }

    /// This statement as a compound plus every compound nested beneath it
    pub fn self_and_descendant_compounds(&self) -> Vec<&CompoundStatement> {
        let mut found = Vec::new();
        if let Statement::Compound(compound) = self {
            found.push(compound);
            for child in &compound.components {
                found.extend(child.self_and_descendant_compounds());
            }
        }
        found
    }
}

/// A container source node: battery, cluster, specimen, diagnostic report
/// or generic template
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompoundStatement {
    pub id: InstanceId,

    /// Class codes; the first entry carries the container class
    /// (e.g. `BATTERY`, `CLUSTER`, `TOPIC`)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub class_codes: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<Code>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidentiality_code: Option<Code>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effective_time: Option<TimeRange>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub availability_time: Option<String>,

    #[serde(default)]
    pub components: Vec<Statement>,
}

impl CompoundStatement {
    /// First class code, when present
    pub fn first_class_code(&self) -> Option<&str> {
        self.class_codes.first().map(String::as_str)
    }

    /// True when the statement carries a code element with a code value
    pub fn has_code(&self) -> bool {
        self.code.as_ref().is_some_and(Code::has_code)
    }

    /// Child observation statements (direct children only)
    pub fn child_observations(&self) -> impl Iterator<Item = &ObservationStatement> {
        self.components.iter().filter_map(Statement::as_observation)
    }

    /// Every compound statement nested beneath this one (self excluded)
    pub fn descendant_compounds(&self) -> Vec<&CompoundStatement> {
        self.components
            .iter()
            .flat_map(Statement::self_and_descendant_compounds)
            .collect()
    }
}

/// Free-text source node, optionally referencing an external document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NarrativeStatement {
    pub id: InstanceId,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidentiality_code: Option<Code>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub availability_time: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub participants: Vec<Participant>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub references: Vec<NarrativeReference>,
}

impl NarrativeStatement {
    /// First reference to an external document, when one exists
    pub fn first_external_document(&self) -> Option<&ExternalDocument> {
        self.references
            .iter()
            .find_map(|r| r.external_document.as_ref())
    }

    /// True when at least one reference refers to an external document
    pub fn has_external_document(&self) -> bool {
        self.first_external_document().is_some()
    }
}

/// A reference entry on a narrative statement
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NarrativeReference {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_document: Option<ExternalDocument>,
}

/// An externally held document referred to by a narrative statement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExternalDocument {
    pub id: InstanceId,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<Code>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidentiality_code: Option<Code>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<AttachmentText>,
}

/// The text element of an external document: declared media type plus the
/// local file reference
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AttachmentText {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
}

/// A coded observation source node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObservationStatement {
    pub id: InstanceId,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<Code>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidentiality_code: Option<Code>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effective_time: Option<TimeRange>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub availability_time: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub participants: Vec<Participant>,

    /// Pertinent annotation texts attached to the observation
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub pertinent_annotations: Vec<String>,
}

/// A medication source node carrying consumables and supply children
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MedicationStatement {
    pub id: InstanceId,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub availability_time: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub participants: Vec<Participant>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub consumables: Vec<Consumable>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub components: Vec<MedicationComponent>,
}

impl MedicationStatement {
    /// Supply-prescribe children
    pub fn supply_prescriptions(&self) -> impl Iterator<Item = &Supply> {
        self.components.iter().filter_map(|c| match c {
            MedicationComponent::SupplyPrescribe(s) => Some(s),
            _ => None,
        })
    }

    /// Supply-authorise children
    pub fn supply_authorisations(&self) -> impl Iterator<Item = &Supply> {
        self.components.iter().filter_map(|c| match c {
            MedicationComponent::SupplyAuthorise(s) => Some(s),
            _ => None,
        })
    }
}

/// A consumable (medicinal product) entry on a medication statement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Consumable {
    pub id: InstanceId,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<Code>,
}

/// A supply child of a medication statement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MedicationComponent {
    SupplyPrescribe(Supply),
    SupplyAuthorise(Supply),
}

/// A supply-prescribe or supply-authorise record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Supply {
    pub id: InstanceId,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<Code>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity_text: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub availability_time: Option<String>,
}
