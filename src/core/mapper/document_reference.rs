//! Document reference mapping
//!
//! Maps narrative statements that refer to external documents. Document
//! references use the narrative statement id rather than the external
//! document id, matching observed source data. The content entry is
//! populated by the attachment reconciler as an explicit pipeline stage
//! after the base mapping.

use super::{dates, degraded_other, map_codeable_concept, MappingContext};
use crate::core::attachment::reconcile::reconcile_content;
use crate::core::attachment::{ABSENT_ATTACHMENT_TOKEN, LOCAL_REFERENCE_PREFIX, PLACEHOLDER_VALUE};
use crate::core::classify;
use crate::core::resolve::{resolve_encounter, resolve_participant, MappedEncounter};
use crate::domain::extract::{
    EhrComposition, ExternalDocument, NarrativeStatement, Statement,
};
use crate::domain::resources::{
    build_identifier, profile, CodeableConcept, DocumentReference, DocumentReferenceStatus,
    Reference,
};

/// Maps every document-bearing narrative statement of a composition.
pub fn map_document_references(
    composition: &EhrComposition,
    context: &MappingContext,
    encounters: &[MappedEncounter],
) -> Vec<DocumentReference> {
    let mut narratives = Vec::new();
    collect_non_blood_pressure_narratives(&composition.components, &mut narratives);

    narratives
        .into_iter()
        .filter(|narrative| classify::is_document_reference(narrative))
        .filter_map(|narrative| {
            let external = narrative.first_external_document()?;
            Some(map_document_reference(
                narrative, external, composition, context, encounters,
            ))
        })
        .collect()
}

/// Narrative statements anywhere under the given components, excluding
/// those nested inside blood-pressure batteries (whose narratives belong to
/// the blood-pressure reading, not to a document).
fn collect_non_blood_pressure_narratives<'a>(
    statements: &'a [Statement],
    found: &mut Vec<&'a NarrativeStatement>,
) {
    for statement in statements {
        match statement {
            Statement::Narrative(narrative) => found.push(narrative),
            Statement::Compound(compound) if !classify::is_blood_pressure(compound) => {
                collect_non_blood_pressure_narratives(&compound.components, found);
            }
            _ => {}
        }
    }
}

fn map_document_reference(
    narrative: &NarrativeStatement,
    external: &ExternalDocument,
    composition: &EhrComposition,
    context: &MappingContext,
    encounters: &[MappedEncounter],
) -> DocumentReference {
    let id = narrative.id.root.clone();

    let document = DocumentReference {
        identifier: build_identifier(&context.organization_code, id.clone()),
        id,
        profile: profile::DOCUMENT_REFERENCE.to_string(),
        status: DocumentReferenceStatus::Current,
        type_code: document_type(external),
        subject: Reference::patient(&context.patient_id),
        custodian: Reference::organization(&context.organization_code),
        author: resolve_participant(&narrative.participants, composition),
        description: build_description(narrative, external),
        indexed: composition
            .author_time
            .as_deref()
            .and_then(dates::parse_instant),
        created: composition
            .availability_time
            .as_deref()
            .and_then(dates::parse_instant),
        encounter: resolve_encounter(encounters, &composition.id.root),
        content: None,
    };

    reconcile_content(document, external, &context.attachments)
}

/// The document type concept: original text preferred over display name;
/// a source with no usable code degrades to the fixed marker concept.
fn document_type(external: &ExternalDocument) -> CodeableConcept {
    external
        .code
        .as_ref()
        .filter(|code| code.original_text.is_some() || code.display_name.is_some())
        .and_then(map_codeable_concept)
        .unwrap_or_else(degraded_other)
}

fn build_description(
    narrative: &NarrativeStatement,
    external: &ExternalDocument,
) -> Option<String> {
    if let Some(text) = &narrative.text {
        return Some(text.clone());
    }

    let reference = external.text.as_ref()?.reference.as_deref()?;
    if reference.contains(ABSENT_ATTACHMENT_TOKEN) {
        Some(PLACEHOLDER_VALUE.to_string())
    } else {
        Some(reference.replace(LOCAL_REFERENCE_PREFIX, ""))
    }
}
