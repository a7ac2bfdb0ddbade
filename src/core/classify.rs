//! Statement classification
//!
//! Pure predicate functions deciding which target category a source node
//! represents. Classification is total: every statement maps to exactly one
//! [`Category`], with [`Category::Unclassified`] as the non-fatal gap and
//! [`Category::Template`] as the catch-all for unmatched code-bearing
//! container statements.
//!
//! Rule order matters. [`classify`] evaluates the compound-statement rules
//! in fixed priority (blood pressure, allergy, diagnostic report, specimen,
//! template) and the first match wins.

use serde::Serialize;

use crate::domain::extract::{
    CompoundStatement, EhrComposition, EhrExtract, MedicationComponent, NarrativeStatement,
    ObservationStatement, Statement,
};

/// Read v2 code system OID (legacy allergy codes live here)
const CODE_SYSTEM_READ_CODE_V2: &str = "2.16.840.1.113883.2.1.6.2";

/// Immunization code system OID carried by immunization observation codes
const IMMUNIZATION_CODE_SYSTEM: &str = "2.16.840.1.113883.2.1.3.2.3.15";

/// Allergy structure codes under Read v2
const ALLERGY_CODES: [&str; 2] = ["SN53.00", "14L..00"];

/// Fixed pathology report SNOMED code
const PATHOLOGY_CODE: &str = "16488004";

/// Fixed specimen SNOMED code
const SPECIMEN_CODE: &str = "123038009";

const BATTERY_VALUE: &str = "BATTERY";
const CLUSTER_VALUE: &str = "CLUSTER";

/// Blood pressure battery SNOMED codes
const BLOOD_PRESSURE_BATTERY_CODES: [&str; 6] = [
    "163020007",
    "254063019",
    "254064013",
    "254065014",
    "163034007",
    "163035008",
];

/// Systolic reading SNOMED codes
const SYSTOLIC_CODES: [&str; 5] = [
    "72313002",
    "271649006",
    "400974009",
    "407554009",
    "407556006",
];

/// Diastolic reading SNOMED codes
const DIASTOLIC_CODES: [&str; 5] = [
    "1091811000000102",
    "271650006",
    "400975005",
    "407555005",
    "407557002",
];

/// Target category of a classified source statement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    BloodPressure,
    AllergyIntolerance,
    DiagnosticReport,
    Specimen,
    Template,
    DocumentReference,
    Immunization,
    MedicationOrder,
    MedicationPlan,
    MedicationStatement,
    Unclassified,
}

/// Classifies a statement within its enclosing composition.
///
/// Pure and total: every statement yields exactly one category.
/// `excluded_composition_codes` is the externally supplied allow-list check
/// for immunization compositions: an observation with the immunization code
/// system only classifies as [`Category::Immunization`] when its
/// composition's category code is not excluded.
///
/// A medication source statement classifies as
/// [`Category::MedicationStatement`]; its supply children are classified by
/// [`classify_supply`] during the medication mapper's own traversal, because
/// one source statement fans out into several target resources.
pub fn classify(
    statement: &Statement,
    composition: &EhrComposition,
    excluded_composition_codes: &[String],
) -> Category {
    match statement {
        Statement::Compound(compound) => classify_compound(compound),
        Statement::Narrative(narrative) => classify_narrative(narrative),
        Statement::Observation(observation) => {
            classify_observation(observation, composition, excluded_composition_codes)
        }
        Statement::Medication(_) => Category::MedicationStatement,
    }
}

fn classify_compound(compound: &CompoundStatement) -> Category {
    if is_blood_pressure(compound) {
        Category::BloodPressure
    } else if is_allergy_intolerance(compound) {
        Category::AllergyIntolerance
    } else if is_diagnostic_report(compound) {
        Category::DiagnosticReport
    } else if is_specimen(compound) {
        Category::Specimen
    } else if is_template(compound) {
        Category::Template
    } else {
        Category::Unclassified
    }
}

fn classify_narrative(narrative: &NarrativeStatement) -> Category {
    if is_document_reference(narrative) {
        Category::DocumentReference
    } else {
        Category::Unclassified
    }
}

fn classify_observation(
    observation: &ObservationStatement,
    composition: &EhrComposition,
    excluded_composition_codes: &[String],
) -> Category {
    if is_immunization(observation) && is_valid_immunization_composition(composition, excluded_composition_codes)
    {
        Category::Immunization
    } else {
        Category::Unclassified
    }
}

/// Classifies a supply child of a medication statement: supply-prescribe
/// children are orders, supply-authorise children are plans (each authorise
/// additionally yields a medication statement resource under the plan's
/// category).
pub fn classify_supply(component: &MedicationComponent) -> Category {
    match component {
        MedicationComponent::SupplyPrescribe(_) => Category::MedicationOrder,
        MedicationComponent::SupplyAuthorise(_) => Category::MedicationPlan,
    }
}

/// A narrative statement represents a document reference iff it carries at
/// least one reference to an external document.
pub fn is_document_reference(narrative: &NarrativeStatement) -> bool {
    narrative.has_external_document()
}

/// A battery compound containing exactly one blood-pressure triple:
/// a recognized battery code over exactly one systolic and one diastolic
/// child observation.
pub fn is_blood_pressure(compound: &CompoundStatement) -> bool {
    if compound.first_class_code() != Some(BATTERY_VALUE) {
        return false;
    }

    let battery_code = compound
        .code
        .as_ref()
        .and_then(|code| code.snomed_code())
        .is_some_and(|code| BLOOD_PRESSURE_BATTERY_CODES.contains(&code));
    if !battery_code {
        return false;
    }

    let systolic = count_observations_with_code(compound, &SYSTOLIC_CODES);
    let diastolic = count_observations_with_code(compound, &DIASTOLIC_CODES);
    systolic == 1 && diastolic == 1
}

fn count_observations_with_code(compound: &CompoundStatement, codes: &[&str]) -> usize {
    compound
        .child_observations()
        .filter(|observation| {
            observation
                .code
                .as_ref()
                .and_then(|code| code.snomed_code())
                .is_some_and(|code| codes.contains(&code))
        })
        .count()
}

/// A compound with a legacy Read v2 allergy code, exactly one child
/// component, and that child an observation statement.
pub fn is_allergy_intolerance(compound: &CompoundStatement) -> bool {
    let Some(code) = compound.code.as_ref() else {
        return false;
    };

    code.code
        .as_deref()
        .is_some_and(|c| ALLERGY_CODES.contains(&c))
        && code.code_system.as_deref() == Some(CODE_SYSTEM_READ_CODE_V2)
        && compound.components.len() == 1
        && compound.components[0].as_observation().is_some()
}

/// A CLUSTER compound whose normalized code is the fixed pathology code.
pub fn is_diagnostic_report(compound: &CompoundStatement) -> bool {
    compound.has_code()
        && compound.class_codes.iter().any(|c| c == CLUSTER_VALUE)
        && compound
            .code
            .as_ref()
            .and_then(|code| code.snomed_code())
            .is_some_and(|code| code == PATHOLOGY_CODE)
}

/// A compound whose normalized code is the fixed specimen code.
pub fn is_specimen(compound: &CompoundStatement) -> bool {
    compound.has_code()
        && compound
            .code
            .as_ref()
            .and_then(|code| code.snomed_code())
            .is_some_and(|code| code == SPECIMEN_CODE)
}

/// A BATTERY or CLUSTER compound matching none of the specific categories.
pub fn is_template(compound: &CompoundStatement) -> bool {
    !is_blood_pressure(compound)
        && !is_diagnostic_report(compound)
        && !is_specimen(compound)
        && compound
            .first_class_code()
            .is_some_and(|class| class == BATTERY_VALUE || class == CLUSTER_VALUE)
}

/// An observation whose code system is the immunization OID.
pub fn is_immunization(observation: &ObservationStatement) -> bool {
    observation
        .code
        .as_ref()
        .and_then(|code| code.code_system.as_deref())
        .is_some_and(|system| system == IMMUNIZATION_CODE_SYSTEM)
}

/// Whether a composition is in scope for immunization mapping: its category
/// code must not appear in the externally supplied excluded-codes list.
pub fn is_valid_immunization_composition(
    composition: &EhrComposition,
    excluded_composition_codes: &[String],
) -> bool {
    composition
        .code
        .as_ref()
        .and_then(|code| code.code.as_deref())
        .map_or(true, |code| {
            !excluded_composition_codes.iter().any(|e| e == code)
        })
}

/// Reports whether the given compound statement occurs among the descendant
/// compound statements of any DiagnosticReport-classified statement in the
/// extract. Used to suppress duplicate handling of specimens already nested
/// under a diagnostic report.
pub fn has_diagnostic_report_parent(extract: &EhrExtract, compound: &CompoundStatement) -> bool {
    extract
        .all_compound_statements()
        .into_iter()
        .filter(|candidate| is_diagnostic_report(candidate))
        .flat_map(|report| report.descendant_compounds())
        .any(|descendant| descendant.id == compound.id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::extract::{Code, InstanceId, SNOMED_CODE_SYSTEM};
    use test_case::test_case;

    fn snomed(code: &str) -> Code {
        Code {
            code: Some(code.to_string()),
            code_system: Some(SNOMED_CODE_SYSTEM.to_string()),
            ..Default::default()
        }
    }

    fn read_v2(code: &str) -> Code {
        Code {
            code: Some(code.to_string()),
            code_system: Some(CODE_SYSTEM_READ_CODE_V2.to_string()),
            ..Default::default()
        }
    }

    fn observation(id: &str, code: Option<Code>) -> Statement {
        Statement::Observation(ObservationStatement {
            id: InstanceId::new(id),
            code,
            confidentiality_code: None,
            effective_time: None,
            availability_time: None,
            participants: vec![],
            pertinent_annotations: vec![],
        })
    }

    fn compound(id: &str, class: &str, code: Option<Code>, components: Vec<Statement>) -> CompoundStatement {
        CompoundStatement {
            id: InstanceId::new(id),
            class_codes: vec![class.to_string()],
            code,
            confidentiality_code: None,
            effective_time: None,
            availability_time: None,
            components,
        }
    }

    fn composition(components: Vec<Statement>) -> EhrComposition {
        EhrComposition {
            id: InstanceId::new("comp-1"),
            code: None,
            author_time: None,
            availability_time: None,
            participants2: vec![],
            components,
        }
    }

    fn blood_pressure_compound() -> CompoundStatement {
        compound(
            "bp-1",
            BATTERY_VALUE,
            Some(snomed("163020007")),
            vec![
                observation("sys", Some(snomed("72313002"))),
                observation("dia", Some(snomed("271650006"))),
            ],
        )
    }

    #[test]
    fn test_blood_pressure_triple_classifies() {
        assert_eq!(
            classify(
                &Statement::Compound(blood_pressure_compound()),
                &composition(vec![]),
                &[]
            ),
            Category::BloodPressure
        );
    }

    #[test]
    fn test_blood_pressure_requires_both_readings() {
        let missing_diastolic = compound(
            "bp-2",
            BATTERY_VALUE,
            Some(snomed("163020007")),
            vec![observation("sys", Some(snomed("72313002")))],
        );
        assert!(!is_blood_pressure(&missing_diastolic));
        // Still a battery with a code, so it falls through to Template.
        assert_eq!(classify_compound(&missing_diastolic), Category::Template);
    }

    #[test]
    fn test_allergy_intolerance_classifies() {
        let allergy = compound(
            "al-1",
            CLUSTER_VALUE,
            Some(read_v2("SN53.00")),
            vec![observation("obs", None)],
        );
        assert_eq!(classify_compound(&allergy), Category::AllergyIntolerance);
    }

    #[test]
    fn test_allergy_requires_single_observation_child() {
        let two_children = compound(
            "al-2",
            CLUSTER_VALUE,
            Some(read_v2("14L..00")),
            vec![observation("a", None), observation("b", None)],
        );
        assert!(!is_allergy_intolerance(&two_children));
    }

    #[test_case(CLUSTER_VALUE, PATHOLOGY_CODE => Category::DiagnosticReport; "pathology cluster is a diagnostic report")]
    #[test_case(BATTERY_VALUE, PATHOLOGY_CODE => Category::Template; "pathology code without cluster class falls to template")]
    #[test_case(CLUSTER_VALUE, SPECIMEN_CODE => Category::Specimen; "specimen code wins over template")]
    #[test_case(CLUSTER_VALUE, "999999" => Category::Template; "cluster with other code is a template")]
    fn test_compound_rule_priority(class: &str, code: &str) -> Category {
        classify_compound(&compound("c-1", class, Some(snomed(code)), vec![]))
    }

    #[test]
    fn test_topic_compound_is_unclassified() {
        let topic = compound("t-1", "TOPIC", Some(snomed("999999")), vec![]);
        assert_eq!(classify_compound(&topic), Category::Unclassified);
    }

    #[test]
    fn test_compound_categories_are_mutually_exclusive() {
        let samples = vec![
            blood_pressure_compound(),
            compound(
                "al",
                CLUSTER_VALUE,
                Some(read_v2("SN53.00")),
                vec![observation("obs", None)],
            ),
            compound("dr", CLUSTER_VALUE, Some(snomed(PATHOLOGY_CODE)), vec![]),
            compound("sp", CLUSTER_VALUE, Some(snomed(SPECIMEN_CODE)), vec![]),
            compound("tp", BATTERY_VALUE, Some(snomed("999999")), vec![]),
        ];

        for sample in &samples {
            let matches = [
                is_blood_pressure(sample),
                is_allergy_intolerance(sample),
                is_diagnostic_report(sample),
                is_specimen(sample),
                is_template(sample),
            ]
            .iter()
            .filter(|m| **m)
            .count();
            assert_eq!(matches, 1, "statement {} matched {} rules", sample.id.root, matches);
        }
    }

    #[test]
    fn test_narrative_with_external_document_is_document_reference() {
        use crate::domain::extract::{ExternalDocument, NarrativeReference};

        let narrative = NarrativeStatement {
            id: InstanceId::new("n-1"),
            text: None,
            confidentiality_code: None,
            availability_time: None,
            participants: vec![],
            references: vec![NarrativeReference {
                external_document: Some(ExternalDocument {
                    id: InstanceId::new("doc-1"),
                    code: None,
                    confidentiality_code: None,
                    text: None,
                }),
            }],
        };
        assert_eq!(classify_narrative(&narrative), Category::DocumentReference);

        let plain = NarrativeStatement {
            references: vec![NarrativeReference {
                external_document: None,
            }],
            ..narrative
        };
        assert_eq!(classify_narrative(&plain), Category::Unclassified);
    }

    #[test]
    fn test_immunization_scoped_to_valid_compositions() {
        let immunization = ObservationStatement {
            id: InstanceId::new("imm-1"),
            code: Some(Code {
                code: Some("65027001".to_string()),
                code_system: Some(IMMUNIZATION_CODE_SYSTEM.to_string()),
                ..Default::default()
            }),
            confidentiality_code: None,
            effective_time: None,
            availability_time: None,
            participants: vec![],
            pertinent_annotations: vec![],
        };

        let mut comp = composition(vec![]);
        comp.code = Some(Code {
            code: Some("25671000000102".to_string()),
            ..Default::default()
        });

        let statement = Statement::Observation(immunization);
        assert_eq!(classify(&statement, &comp, &[]), Category::Immunization);
        assert_eq!(
            classify(&statement, &comp, &["25671000000102".to_string()]),
            Category::Unclassified
        );
    }

    #[test]
    fn test_has_diagnostic_report_parent() {
        let nested_specimen = compound("spec-1", CLUSTER_VALUE, Some(snomed(SPECIMEN_CODE)), vec![]);
        let report = compound(
            "dr-1",
            CLUSTER_VALUE,
            Some(snomed(PATHOLOGY_CODE)),
            vec![Statement::Compound(nested_specimen.clone())],
        );
        let standalone = compound("spec-2", CLUSTER_VALUE, Some(snomed(SPECIMEN_CODE)), vec![]);

        let extract = EhrExtract {
            id: InstanceId::new("extract-1"),
            availability_time: None,
            compositions: vec![composition(vec![
                Statement::Compound(report),
                Statement::Compound(standalone.clone()),
            ])],
        };

        assert!(has_diagnostic_report_parent(&extract, &nested_specimen));
        assert!(!has_diagnostic_report_parent(&extract, &standalone));
    }

    #[test]
    fn test_classify_supply() {
        use crate::domain::extract::{MedicationComponent, Supply};

        let supply = Supply {
            id: InstanceId::new("s-1"),
            code: None,
            quantity_text: None,
            availability_time: None,
        };
        assert_eq!(
            classify_supply(&MedicationComponent::SupplyPrescribe(supply.clone())),
            Category::MedicationOrder
        );
        assert_eq!(
            classify_supply(&MedicationComponent::SupplyAuthorise(supply)),
            Category::MedicationPlan
        );
    }
}
