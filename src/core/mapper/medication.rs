//! Medication family mapping
//!
//! A single source medication statement fans out into several target
//! resources: a Medication per consumable entry, an order MedicationRequest
//! per supply-prescribe child, a plan MedicationRequest per supply-authorise
//! child, and a MedicationStatement per supply-authorise child. The whole
//! fan-out shares one authored-on date and one requester/recorder pair.

use chrono::{DateTime, Utc};

use super::{dates, map_codeable_concept, MappingContext};
use crate::core::classify::{classify_supply, Category};
use crate::core::resolve::{resolve_encounter, MappedEncounter};
use crate::domain::extract::{
    EhrComposition, EhrExtract, MedicationComponent, MedicationStatement, Participant, Statement,
    Supply,
};
use crate::domain::resources::{
    build_identifier, profile, Medication, MedicationRequest, MedicationRequestIntent,
    MedicationRequestStatus, MedicationStatementResource, MedicationStatementStatus, Reference,
    TargetResource,
};

/// Suffix distinguishing the medication statement emitted for a
/// supply-authorise child from the plan request sharing the same source id
const MEDICATION_STATEMENT_SUFFIX: &str = "-MS";

const TAKEN_UNKNOWN: &str = "unk";

/// Maps every medication statement of a composition, including those nested
/// inside compound container statements.
pub fn map_medications(
    extract: &EhrExtract,
    composition: &EhrComposition,
    context: &MappingContext,
    encounters: &[MappedEncounter],
) -> Vec<TargetResource> {
    let mut medication_statements = Vec::new();
    collect_medication_statements(&composition.components, &mut medication_statements);

    medication_statements
        .into_iter()
        .flat_map(|statement| {
            map_medication_statement(extract, composition, statement, context, encounters)
        })
        .collect()
}

fn collect_medication_statements<'a>(
    statements: &'a [Statement],
    found: &mut Vec<&'a MedicationStatement>,
) {
    for statement in statements {
        match statement {
            Statement::Medication(medication) => found.push(medication),
            Statement::Compound(compound) => {
                collect_medication_statements(&compound.components, found);
            }
            _ => {}
        }
    }
}

/// The fields every resource of one fan-out shares: one subject, one
/// encounter, one requester/recorder pair and one authored-on date.
struct SharedFanOutFields {
    subject: Reference,
    encounter: Option<Reference>,
    requester: Option<Reference>,
    recorder: Option<Reference>,
    authored_on: Option<DateTime<Utc>>,
    medication_reference: Option<Reference>,
}

fn map_medication_statement(
    extract: &EhrExtract,
    composition: &EhrComposition,
    statement: &MedicationStatement,
    context: &MappingContext,
    encounters: &[MappedEncounter],
) -> Vec<TargetResource> {
    let requester = extract_requester(composition, statement);
    let shared = SharedFanOutFields {
        subject: Reference::patient(&context.patient_id),
        encounter: resolve_encounter(encounters, &composition.id.root),
        recorder: requester.clone(),
        requester,
        authored_on: extract_authored_on(extract, composition),
        medication_reference: statement
            .consumables
            .first()
            .map(|consumable| Reference::medication(&consumable.id.root)),
    };

    let mut resources: Vec<TargetResource> = statement
        .consumables
        .iter()
        .map(|consumable| {
            TargetResource::Medication(Medication {
                id: consumable.id.root.clone(),
                identifier: build_identifier(&context.organization_code, consumable.id.root.clone()),
                profile: profile::MEDICATION.to_string(),
                code: consumable.code.as_ref().and_then(map_codeable_concept),
            })
        })
        .collect();

    let mut orders = Vec::new();
    let mut plans = Vec::new();
    let mut medication_statements = Vec::new();

    for component in &statement.components {
        let supply = match component {
            MedicationComponent::SupplyPrescribe(supply)
            | MedicationComponent::SupplyAuthorise(supply) => supply,
        };

        match classify_supply(component) {
            Category::MedicationOrder => orders.push(TargetResource::MedicationRequest(
                build_medication_request(
                    supply,
                    MedicationRequestIntent::Order,
                    MedicationRequestStatus::Completed,
                    &shared,
                    context,
                ),
            )),
            Category::MedicationPlan => {
                plans.push(TargetResource::MedicationRequest(build_medication_request(
                    supply,
                    MedicationRequestIntent::Plan,
                    MedicationRequestStatus::Active,
                    &shared,
                    context,
                )));
                medication_statements.push(TargetResource::MedicationStatement(
                    build_medication_statement(supply, &shared, context),
                ));
            }
            _ => {}
        }
    }

    resources.extend(orders);
    resources.extend(plans);
    resources.extend(medication_statements);
    resources
}

fn build_medication_request(
    supply: &Supply,
    intent: MedicationRequestIntent,
    status: MedicationRequestStatus,
    shared: &SharedFanOutFields,
    context: &MappingContext,
) -> MedicationRequest {
    MedicationRequest {
        id: supply.id.root.clone(),
        identifier: build_identifier(&context.organization_code, supply.id.root.clone()),
        profile: profile::MEDICATION_REQUEST.to_string(),
        intent,
        status,
        subject: shared.subject.clone(),
        context: shared.encounter.clone(),
        requester: shared.requester.clone(),
        recorder: shared.recorder.clone(),
        authored_on: shared.authored_on,
        medication_reference: shared.medication_reference.clone(),
        dosage_text: supply.quantity_text.clone(),
    }
}

fn build_medication_statement(
    supply: &Supply,
    shared: &SharedFanOutFields,
    context: &MappingContext,
) -> MedicationStatementResource {
    let id = format!("{}{MEDICATION_STATEMENT_SUFFIX}", supply.id.root);
    MedicationStatementResource {
        identifier: build_identifier(&context.organization_code, id.clone()),
        id,
        profile: profile::MEDICATION_STATEMENT.to_string(),
        status: MedicationStatementStatus::Active,
        subject: shared.subject.clone(),
        taken: TAKEN_UNKNOWN.to_string(),
        context: shared.encounter.clone(),
        effective: shared.authored_on,
        date_asserted: shared.authored_on,
        medication_reference: shared.medication_reference.clone(),
    }
}

/// The shared authored-on date: composition author time, else the extract's
/// own availability time.
fn extract_authored_on(
    extract: &EhrExtract,
    composition: &EhrComposition,
) -> Option<DateTime<Utc>> {
    composition
        .author_time
        .as_deref()
        .and_then(dates::parse_instant)
        .or_else(|| {
            extract
                .availability_time
                .as_deref()
                .and_then(dates::parse_instant)
        })
}

/// Two-tier requester fallback: a non-null-flavour PPRF or PRF participant
/// on the medication statement itself, else the first non-null-flavour
/// composition participant2.
fn extract_requester(
    composition: &EhrComposition,
    statement: &MedicationStatement,
) -> Option<Reference> {
    let own = statement
        .participants
        .iter()
        .filter(|p| p.is_not_null_flavour())
        .filter(|p| {
            p.type_codes
                .iter()
                .any(|code| code == "PPRF" || code == "PRF")
        })
        .find_map(Participant::agent_id);

    if let Some(id) = own {
        return Some(Reference::practitioner(id));
    }

    composition
        .participants2
        .iter()
        .filter(|p| p.is_not_null_flavour())
        .find_map(Participant::agent_id)
        .map(Reference::practitioner)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::extract::{Code, Consumable, InstanceId};

    fn supply(id: &str) -> Supply {
        Supply {
            id: InstanceId::new(id),
            code: None,
            quantity_text: Some("28 tablets".to_string()),
            availability_time: None,
        }
    }

    fn medication_statement() -> MedicationStatement {
        MedicationStatement {
            id: InstanceId::new("med-stmt-1"),
            availability_time: None,
            participants: vec![Participant {
                type_codes: vec!["PPRF".to_string()],
                null_flavor: None,
                agent_ref: Some(InstanceId::new("prescriber-1")),
            }],
            consumables: vec![Consumable {
                id: InstanceId::new("consumable-1"),
                code: Some(Code {
                    code: Some("322236009".to_string()),
                    display_name: Some("Paracetamol 500mg tablets".to_string()),
                    ..Default::default()
                }),
            }],
            components: vec![
                MedicationComponent::SupplyAuthorise(supply("authorise-1")),
                MedicationComponent::SupplyPrescribe(supply("prescribe-1")),
            ],
        }
    }

    fn extract_with(statement: Statement) -> EhrExtract {
        EhrExtract {
            id: InstanceId::new("extract-1"),
            availability_time: Some("20200601120000".to_string()),
            compositions: vec![EhrComposition {
                id: InstanceId::new("encounter-1"),
                code: None,
                author_time: Some("20200601090000".to_string()),
                availability_time: None,
                participants2: vec![],
                components: vec![statement],
            }],
        }
    }

    fn context() -> MappingContext {
        MappingContext {
            patient_id: "patient-1".to_string(),
            organization_code: "B83002".to_string(),
            encounter_ids: vec!["encounter-1".to_string()],
            attachments: vec![],
            excluded_composition_codes: vec![],
        }
    }

    fn map(extract: &EhrExtract, context: &MappingContext) -> Vec<TargetResource> {
        map_medications(
            extract,
            &extract.compositions[0],
            context,
            &context.encounters(),
        )
    }

    #[test]
    fn test_fan_out_counts_and_shared_authored_on() {
        let extract = extract_with(Statement::Medication(medication_statement()));
        let resources = map(&extract, &context());

        let medications: Vec<_> = resources
            .iter()
            .filter(|r| matches!(r, TargetResource::Medication(_)))
            .collect();
        let orders: Vec<_> = resources
            .iter()
            .filter_map(|r| match r {
                TargetResource::MedicationRequest(req)
                    if req.intent == MedicationRequestIntent::Order =>
                {
                    Some(req)
                }
                _ => None,
            })
            .collect();
        let plans: Vec<_> = resources
            .iter()
            .filter_map(|r| match r {
                TargetResource::MedicationRequest(req)
                    if req.intent == MedicationRequestIntent::Plan =>
                {
                    Some(req)
                }
                _ => None,
            })
            .collect();
        let statements: Vec<_> = resources
            .iter()
            .filter_map(|r| match r {
                TargetResource::MedicationStatement(s) => Some(s),
                _ => None,
            })
            .collect();

        assert_eq!(medications.len(), 1);
        assert_eq!(orders.len(), 1);
        assert_eq!(plans.len(), 1);
        assert_eq!(statements.len(), 1);

        let authored_on = dates::parse_instant("20200601090000");
        assert_eq!(orders[0].authored_on, authored_on);
        assert_eq!(plans[0].authored_on, authored_on);
        assert_eq!(statements[0].effective, authored_on);
        assert_eq!(statements[0].date_asserted, authored_on);
    }

    #[test]
    fn test_statement_id_distinct_from_plan_id() {
        let extract = extract_with(Statement::Medication(medication_statement()));
        let resources = map(&extract, &context());

        let ids: Vec<&str> = resources.iter().map(TargetResource::id).collect();
        assert!(ids.contains(&"authorise-1"));
        assert!(ids.contains(&"authorise-1-MS"));

        let mut unique = ids.clone();
        unique.sort_unstable();
        unique.dedup();
        assert_eq!(unique.len(), ids.len(), "resource ids must be unique");
    }

    #[test]
    fn test_requester_prefers_statement_participant() {
        let extract = extract_with(Statement::Medication(medication_statement()));
        let resources = map(&extract, &context());

        for resource in &resources {
            if let TargetResource::MedicationRequest(request) = resource {
                assert_eq!(
                    request.requester,
                    Some(Reference::practitioner("prescriber-1"))
                );
                assert_eq!(request.recorder, request.requester);
            }
        }
    }

    #[test]
    fn test_requester_falls_back_to_composition_participant2() {
        let mut statement = medication_statement();
        statement.participants.clear();
        let mut extract = extract_with(Statement::Medication(statement));
        extract.compositions[0].participants2 = vec![Participant {
            type_codes: vec!["RESP".to_string()],
            null_flavor: None,
            agent_ref: Some(InstanceId::new("responsible-1")),
        }];

        let resources = map(&extract, &context());
        let request = resources
            .iter()
            .find_map(|r| match r {
                TargetResource::MedicationRequest(req) => Some(req),
                _ => None,
            })
            .unwrap();
        assert_eq!(
            request.requester,
            Some(Reference::practitioner("responsible-1"))
        );
    }

    #[test]
    fn test_authored_on_falls_back_to_extract_availability() {
        let mut extract = extract_with(Statement::Medication(medication_statement()));
        extract.compositions[0].author_time = None;

        let resources = map(&extract, &context());
        let request = resources
            .iter()
            .find_map(|r| match r {
                TargetResource::MedicationRequest(req) => Some(req),
                _ => None,
            })
            .unwrap();
        assert_eq!(request.authored_on, dates::parse_instant("20200601120000"));
    }

    #[test]
    fn test_nested_medication_statements_are_gathered() {
        use crate::domain::extract::CompoundStatement;

        let container = CompoundStatement {
            id: InstanceId::new("container-1"),
            class_codes: vec!["CLUSTER".to_string()],
            code: None,
            confidentiality_code: None,
            effective_time: None,
            availability_time: None,
            components: vec![Statement::Medication(medication_statement())],
        };
        let extract = extract_with(Statement::Compound(container));

        let resources = map(&extract, &context());
        assert_eq!(resources.len(), 4);
    }
}
