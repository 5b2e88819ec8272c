//! Participant identity to seat mapping.
//!
//! Populated once when a match begins and immutable afterwards. Lookups go
//! both ways: the service resolves an incoming request's identity to a seat,
//! and events name seats that the transport maps back to identities.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::core::{EngineError, ParticipantId, Result, SeatId, SeatMap};

/// Who sits in a seat.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeatKind {
    /// A connected person.
    Human,
    /// An engine-driven opponent.
    Automated,
}

/// One seat's occupant.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SeatAssignment {
    pub participant: ParticipantId,
    pub kind: SeatKind,
}

impl SeatAssignment {
    #[must_use]
    pub fn new(participant: ParticipantId, kind: SeatKind) -> Self {
        Self { participant, kind }
    }

    #[must_use]
    pub fn human(participant: impl Into<ParticipantId>) -> Self {
        Self::new(participant.into(), SeatKind::Human)
    }

    #[must_use]
    pub fn automated(participant: impl Into<ParticipantId>) -> Self {
        Self::new(participant.into(), SeatKind::Automated)
    }
}

/// Bidirectional participant ↔ seat map for one match.
#[derive(Clone, Debug, Default)]
pub struct PlayerRegistry {
    by_participant: FxHashMap<ParticipantId, SeatId>,
    seats: SeatMap<SeatAssignment>,
}

impl PlayerRegistry {
    /// Bind assignments to seats in order: the first is seat 0.
    pub fn new(assignments: Vec<SeatAssignment>) -> Result<Self> {
        if assignments.len() >= u8::MAX as usize {
            return Err(EngineError::invalid_config(format!(
                "{} seats exceeds the supported maximum",
                assignments.len()
            )));
        }

        let mut by_participant = FxHashMap::default();
        for (index, assignment) in assignments.iter().enumerate() {
            let seat = SeatId::new(index as u8);
            if by_participant.insert(assignment.participant.clone(), seat).is_some() {
                return Err(EngineError::invalid_config(format!(
                    "participant {} holds two seats",
                    assignment.participant
                )));
            }
        }

        let seats = SeatMap::new(assignments.len(), |seat| assignments[seat.index()].clone());
        Ok(Self {
            by_participant,
            seats,
        })
    }

    /// Seat bound to `participant`.
    pub fn seat_of(&self, participant: &ParticipantId) -> Result<SeatId> {
        self.by_participant
            .get(participant)
            .copied()
            .ok_or_else(|| EngineError::UnknownParticipant(participant.clone()))
    }

    #[must_use]
    pub fn assignment(&self, seat: SeatId) -> Option<&SeatAssignment> {
        self.seats.get(seat)
    }

    #[must_use]
    pub fn participant(&self, seat: SeatId) -> Option<&ParticipantId> {
        self.assignment(seat).map(|a| &a.participant)
    }

    #[must_use]
    pub fn kind(&self, seat: SeatId) -> Option<SeatKind> {
        self.assignment(seat).map(|a| a.kind)
    }

    #[must_use]
    pub fn seat_count(&self) -> usize {
        self.seats.seat_count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.seat_count() == 0
    }

    /// Seats occupied by humans, in seat order.
    pub fn human_seats(&self) -> impl Iterator<Item = SeatId> + '_ {
        self.seats
            .iter()
            .filter(|(_, a)| a.kind == SeatKind::Human)
            .map(|(seat, _)| seat)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> PlayerRegistry {
        PlayerRegistry::new(vec![
            SeatAssignment::human("alice"),
            SeatAssignment::automated("bot-1"),
        ])
        .unwrap()
    }

    #[test]
    fn test_lookup_both_ways() {
        let players = registry();

        assert_eq!(players.seat_of(&"alice".into()).unwrap(), SeatId::new(0));
        assert_eq!(players.seat_of(&"bot-1".into()).unwrap(), SeatId::new(1));
        assert_eq!(players.participant(SeatId::new(1)), Some(&ParticipantId::new("bot-1")));
        assert_eq!(players.kind(SeatId::new(0)), Some(SeatKind::Human));
        assert_eq!(players.seat_count(), 2);
    }

    #[test]
    fn test_unknown_participant() {
        let players = registry();
        assert_eq!(
            players.seat_of(&"mallory".into()),
            Err(EngineError::UnknownParticipant("mallory".into()))
        );
        assert_eq!(players.participant(SeatId::new(5)), None);
    }

    #[test]
    fn test_duplicate_participant_rejected() {
        let result = PlayerRegistry::new(vec![
            SeatAssignment::human("alice"),
            SeatAssignment::human("alice"),
        ]);
        assert!(matches!(result, Err(EngineError::InvalidConfiguration { .. })));
    }

    #[test]
    fn test_human_seats() {
        let players = PlayerRegistry::new(vec![
            SeatAssignment::automated("bot-1"),
            SeatAssignment::human("alice"),
            SeatAssignment::human("bob"),
        ])
        .unwrap();

        let humans: Vec<_> = players.human_seats().collect();
        assert_eq!(humans, vec![SeatId::new(1), SeatId::new(2)]);
    }
}
