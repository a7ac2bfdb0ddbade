//! Immunization mapping
//!
//! Maps immunization-coded observation statements that are direct children
//! of a valid immunization composition. The caller pre-filters composition
//! validity through the external allow-list check.

use super::{dates, map_codeable_concept, MappingContext};
use crate::core::classify;
use crate::core::resolve::{resolve_encounter, resolve_participant, MappedEncounter};
use crate::domain::extract::{EhrComposition, ObservationStatement, Statement};
use crate::domain::resources::{
    build_identifier, profile, Annotation, Immunization, ImmunizationStatus, Reference,
};

const END_DATE_PREFIX: &str = "End Date: ";

/// Maps every immunization observation directly under the composition.
pub fn map_immunizations(
    composition: &EhrComposition,
    context: &MappingContext,
    encounters: &[MappedEncounter],
) -> Vec<Immunization> {
    composition
        .components
        .iter()
        .filter_map(Statement::as_observation)
        .filter(|observation| classify::is_immunization(observation))
        .map(|observation| map_immunization(observation, composition, context, encounters))
        .collect()
}

fn map_immunization(
    observation: &ObservationStatement,
    composition: &EhrComposition,
    context: &MappingContext,
    encounters: &[MappedEncounter],
) -> Immunization {
    let id = observation.id.root.clone();
    let (date, end_date_note) = clinical_date(observation);

    let mut notes: Vec<Annotation> = observation
        .pertinent_annotations
        .iter()
        .map(|text| Annotation::new(text.as_str()))
        .collect();
    notes.extend(end_date_note);

    Immunization {
        identifier: build_identifier(&context.organization_code, id.clone()),
        id,
        profile: profile::IMMUNIZATION.to_string(),
        status: ImmunizationStatus::Completed,
        not_given: false,
        primary_source: false,
        patient: Reference::patient(&context.patient_id),
        encounter: resolve_encounter(encounters, &composition.id.root),
        practitioner: resolve_participant(&observation.participants, composition),
        vaccine_code: observation.code.as_ref().and_then(map_codeable_concept),
        recorded: recorded_date(composition),
        date,
        notes,
    }
}

/// Recorded date: composition author time, else composition availability
/// time.
fn recorded_date(composition: &EhrComposition) -> Option<chrono::DateTime<chrono::Utc>> {
    composition
        .author_time
        .as_deref()
        .and_then(dates::parse_instant)
        .or_else(|| {
            composition
                .availability_time
                .as_deref()
                .and_then(dates::parse_instant)
        })
}

/// Clinical date precedence: effective-time center, else low bound, else the
/// observation's own availability time. A high bound without a center is not
/// used as the date; it becomes an `End Date:` annotation instead.
fn clinical_date(
    observation: &ObservationStatement,
) -> (Option<chrono::DateTime<chrono::Utc>>, Option<Annotation>) {
    let effective = observation.effective_time.as_ref();

    let end_date_note = effective
        .filter(|range| range.high.is_some() && range.center.is_none())
        .and_then(|range| range.high.as_deref())
        .and_then(dates::parse_instant)
        .map(|high| Annotation::new(format!("{END_DATE_PREFIX}{}", dates::format_instant(&high))));

    let date = effective
        .and_then(|range| range.center.as_deref())
        .and_then(dates::parse_instant)
        .or_else(|| {
            effective
                .and_then(|range| range.low.as_deref())
                .and_then(dates::parse_instant)
        })
        .or_else(|| {
            observation
                .availability_time
                .as_deref()
                .and_then(dates::parse_instant)
        });

    (date, end_date_note)
}
