//! Participant and encounter reference resolution
//!
//! Resolution follows a strict priority policy and is referentially
//! transparent: it depends only on the extract tree and the list of already
//! mapped encounters, and may be re-run freely between continuation parts.

use crate::domain::extract::{EhrComposition, Participant};
use crate::domain::resources::Reference;

/// Primary performer participation type code
const PPRF_TYPE_CODE: &str = "PPRF";

/// Performer participation type code
const PRF_TYPE_CODE: &str = "PRF";

/// An already mapped encounter, identified by its source composition id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappedEncounter {
    pub id: String,
}

impl MappedEncounter {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

/// Resolves the practitioner reference for a statement's participants.
///
/// Strict priority, first success wins:
/// 1. a non-null-flavour participant typed `PPRF` with a resolvable agent id
/// 2. the same for `PRF`
/// 3. the enclosing composition's participant2 list, first non-null-flavour
///    entry with a resolvable agent id
pub fn resolve_participant(
    participants: &[Participant],
    composition: &EhrComposition,
) -> Option<Reference> {
    let usable: Vec<&Participant> = participants
        .iter()
        .filter(|p| p.is_not_null_flavour())
        .collect();

    if let Some(id) = agent_id_by_type(&usable, PPRF_TYPE_CODE) {
        return Some(Reference::practitioner(id));
    }

    if let Some(id) = agent_id_by_type(&usable, PRF_TYPE_CODE) {
        return Some(Reference::practitioner(id));
    }

    composition
        .participants2
        .iter()
        .filter(|p| p.is_not_null_flavour())
        .find_map(Participant::agent_id)
        .map(Reference::practitioner)
}

fn agent_id_by_type<'a>(participants: &[&'a Participant], type_code: &str) -> Option<&'a str> {
    participants
        .iter()
        .filter(|p| p.has_type_code(type_code))
        .find_map(|p| p.agent_id())
}

/// Resolves a composition participant2 entry filtered by a specific type
/// code (used for recorder/asserter role separation).
pub fn resolve_participant2_by_type(
    composition: &EhrComposition,
    type_code: &str,
) -> Option<Reference> {
    composition
        .participants2
        .iter()
        .filter(|p| p.is_not_null_flavour())
        .filter(|p| p.has_type_code(type_code))
        .find_map(Participant::agent_id)
        .map(Reference::practitioner)
}

/// Resolves the encounter linked to a composition by exact id match.
///
/// Composition ids are expected to be unique within an extract; under
/// duplicates the first match in list order wins.
pub fn resolve_encounter(encounters: &[MappedEncounter], composition_id: &str) -> Option<Reference> {
    encounters
        .iter()
        .find(|encounter| encounter.id == composition_id)
        .map(|encounter| Reference::encounter(&encounter.id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::extract::InstanceId;

    fn participant(type_code: &str, agent: &str) -> Participant {
        Participant {
            type_codes: vec![type_code.to_string()],
            null_flavor: None,
            agent_ref: Some(InstanceId::new(agent)),
        }
    }

    fn composition_with_participants2(participants2: Vec<Participant>) -> EhrComposition {
        EhrComposition {
            id: InstanceId::new("comp-1"),
            code: None,
            author_time: None,
            availability_time: None,
            participants2,
            components: vec![],
        }
    }

    #[test]
    fn test_pprf_wins_over_prf() {
        let participants = vec![participant("PRF", "prf-agent"), participant("PPRF", "pprf-agent")];
        let resolved =
            resolve_participant(&participants, &composition_with_participants2(vec![]));
        assert_eq!(resolved, Some(Reference::practitioner("pprf-agent")));
    }

    #[test]
    fn test_prf_used_when_no_pprf() {
        let participants = vec![participant("PRF", "prf-agent")];
        let resolved =
            resolve_participant(&participants, &composition_with_participants2(vec![]));
        assert_eq!(resolved, Some(Reference::practitioner("prf-agent")));
    }

    #[test]
    fn test_null_flavour_participants_are_skipped() {
        let mut null_pprf = participant("PPRF", "ignored");
        null_pprf.null_flavor = Some("NI".to_string());

        let participants = vec![null_pprf, participant("PRF", "prf-agent")];
        let resolved =
            resolve_participant(&participants, &composition_with_participants2(vec![]));
        assert_eq!(resolved, Some(Reference::practitioner("prf-agent")));
    }

    #[test]
    fn test_falls_back_to_composition_participant2() {
        let mut null_entry = participant("RESP", "ignored");
        null_entry.null_flavor = Some("NI".to_string());

        let composition = composition_with_participants2(vec![
            null_entry,
            participant("RESP", "p2-agent"),
        ]);
        let resolved = resolve_participant(&[], &composition);
        assert_eq!(resolved, Some(Reference::practitioner("p2-agent")));
    }

    #[test]
    fn test_unresolvable_returns_none() {
        let without_agent = Participant {
            type_codes: vec!["PPRF".to_string()],
            null_flavor: None,
            agent_ref: None,
        };
        let resolved = resolve_participant(
            &[without_agent],
            &composition_with_participants2(vec![]),
        );
        assert_eq!(resolved, None);
    }

    #[test]
    fn test_participant2_by_type() {
        let composition = composition_with_participants2(vec![
            participant("PRF", "other"),
            participant("RESP", "resp-agent"),
        ]);
        assert_eq!(
            resolve_participant2_by_type(&composition, "RESP"),
            Some(Reference::practitioner("resp-agent"))
        );
        assert_eq!(resolve_participant2_by_type(&composition, "ABS"), None);
    }

    #[test]
    fn test_encounter_resolution_is_exact_and_first_match() {
        let encounters = vec![
            MappedEncounter::new("comp-A"),
            MappedEncounter::new("comp-B"),
        ];
        assert_eq!(
            resolve_encounter(&encounters, "comp-B"),
            Some(Reference::encounter("comp-B"))
        );
        assert_eq!(resolve_encounter(&encounters, "comp-C"), None);
        assert_eq!(resolve_encounter(&encounters, "comp-A1"), None);
    }
}
