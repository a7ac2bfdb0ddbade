//! Resource mappers
//!
//! One mapper per target resource family. Each mapper consumes classified
//! source nodes plus the shared [`MappingContext`] and emits target
//! resources. Mapping is pure and conversation-scoped: all inputs are passed
//! in, nothing is cached across runs.

pub mod dates;
pub mod document_reference;
pub mod immunization;
pub mod medication;

use serde::{Deserialize, Serialize};

use crate::core::classify::{self, Category};
use crate::core::resolve::MappedEncounter;
use crate::domain::attachment::AttachmentDescriptor;
use crate::domain::extract::{Code, EhrComposition, EhrExtract, Statement, SNOMED_CODE_SYSTEM};
use crate::domain::resources::{CodeableConcept, Coding, TargetResource};

/// FHIR URI for the SNOMED CT code system
const SNOMED_SYSTEM_URI: &str = "http://snomed.info/sct";

/// Fixed degraded marker concept attached when a source node carries no
/// usable code. Mapping never silently drops a type field.
pub fn degraded_other() -> CodeableConcept {
    CodeableConcept {
        coding: vec![Coding {
            system: Some(SNOMED_SYSTEM_URI.to_string()),
            code: Some("196461000000101".to_string()),
            display: Some("Transfer-degraded record entry".to_string()),
        }],
        text: None,
    }
}

/// Maps a source code element to a codeable concept.
///
/// Text preference: original text over display name when both exist.
/// Returns `None` when the element carries no usable code and no text,
/// leaving degradation to the caller.
pub fn map_codeable_concept(code: &Code) -> Option<CodeableConcept> {
    if code.code.is_none() && code.original_text.is_none() && code.display_name.is_none() {
        return None;
    }

    let system = code.code_system.as_deref().map(|oid| {
        if oid == SNOMED_CODE_SYSTEM {
            SNOMED_SYSTEM_URI.to_string()
        } else {
            oid.to_string()
        }
    });

    let coding = code
        .code
        .as_ref()
        .map(|value| Coding {
            system,
            code: Some(value.clone()),
            display: code.display_name.clone(),
        })
        .into_iter()
        .collect();

    let text = code
        .original_text
        .clone()
        .or_else(|| code.display_name.clone());

    Some(CodeableConcept { coding, text })
}

/// Shared per-conversation mapping context
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MappingContext {
    /// Patient resource id for subject references
    pub patient_id: String,

    /// Source organization ODS code; appended to the identifier system
    pub organization_code: String,

    /// Encounters already mapped for this conversation
    #[serde(default)]
    pub encounter_ids: Vec<String>,

    /// Attachment index for this conversation
    #[serde(default)]
    pub attachments: Vec<AttachmentDescriptor>,

    /// Composition category codes excluded from immunization mapping
    #[serde(default)]
    pub excluded_composition_codes: Vec<String>,
}

impl MappingContext {
    pub(crate) fn encounters(&self) -> Vec<MappedEncounter> {
        self.encounter_ids
            .iter()
            .map(|id| MappedEncounter::new(id.as_str()))
            .collect()
    }
}

/// A statement that produced no target resource, reported for audit
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnmappedStatement {
    pub id: String,
    pub category: Category,
}

/// The finished resource set of one mapping run
#[derive(Debug, Clone, Default, Serialize)]
pub struct MappedResources {
    pub resources: Vec<TargetResource>,

    /// Statements classified to categories this core does not map.
    /// Specimens already nested under a diagnostic report are suppressed.
    pub unmapped: Vec<UnmappedStatement>,
}

/// Runs every mapper family over the extract and assembles the finished
/// resource set.
pub fn map_extract(extract: &EhrExtract, context: &MappingContext) -> MappedResources {
    let encounters = context.encounters();
    let mut resources: Vec<TargetResource> = Vec::new();

    for composition in &extract.compositions {
        resources.extend(
            document_reference::map_document_references(composition, context, &encounters)
                .into_iter()
                .map(TargetResource::DocumentReference),
        );

        if classify::is_valid_immunization_composition(
            composition,
            &context.excluded_composition_codes,
        ) {
            resources.extend(
                immunization::map_immunizations(composition, context, &encounters)
                    .into_iter()
                    .map(TargetResource::Immunization),
            );
        }

        resources.extend(medication::map_medications(
            extract,
            composition,
            context,
            &encounters,
        ));
    }

    let unmapped = audit_unmapped(extract, context);

    tracing::info!(
        resource_count = resources.len(),
        unmapped_count = unmapped.len(),
        "mapping run complete"
    );

    MappedResources {
        resources,
        unmapped,
    }
}

/// Classifies every statement in the extract and reports the ones whose
/// category produces no target resource. Specimens occurring among a
/// diagnostic report's descendants are suppressed: the report already covers
/// them.
fn audit_unmapped(extract: &EhrExtract, context: &MappingContext) -> Vec<UnmappedStatement> {
    let mut unmapped = Vec::new();

    for composition in &extract.compositions {
        for statement in &composition.components {
            audit_statement(extract, composition, statement, context, &mut unmapped);
        }
    }

    unmapped
}

fn audit_statement(
    extract: &EhrExtract,
    composition: &EhrComposition,
    statement: &Statement,
    context: &MappingContext,
    unmapped: &mut Vec<UnmappedStatement>,
) {
    let category = classify::classify(statement, composition, &context.excluded_composition_codes);

    match category {
        Category::DocumentReference
        | Category::Immunization
        | Category::MedicationOrder
        | Category::MedicationPlan
        | Category::MedicationStatement => {}
        Category::Specimen => {
            if let Some(compound) = statement.as_compound() {
                if !classify::has_diagnostic_report_parent(extract, compound) {
                    unmapped.push(UnmappedStatement {
                        id: compound.id.root.clone(),
                        category,
                    });
                }
            }
        }
        _ => unmapped.push(UnmappedStatement {
            id: statement_id(statement).to_string(),
            category,
        }),
    }

    // A blood-pressure battery is reported as one unit; its child
    // observations and narratives belong to the reading.
    if let Statement::Compound(compound) = statement {
        if category != Category::BloodPressure {
            for child in &compound.components {
                audit_statement(extract, composition, child, context, unmapped);
            }
        }
    }
}

fn statement_id(statement: &Statement) -> &str {
    match statement {
        Statement::Compound(c) => &c.id.root,
        Statement::Narrative(n) => &n.id.root,
        Statement::Observation(o) => &o.id.root,
        Statement::Medication(m) => &m.id.root,
    }
}
