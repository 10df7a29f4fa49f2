//! Team-size and no-death classification.

use serde::{Deserialize, Serialize};

use crate::models::report::ParticipantRecord;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    pub flawless: bool,
    pub solo: bool,
    pub duo: bool,
    pub trio: bool,
}

/// Classifies participants that are already grouped by membership id.
///
/// Team size counts distinct players, not characters.
pub fn classify(participants: &[ParticipantRecord]) -> Classification {
    let flawless = participants
        .iter()
        .flat_map(|p| p.characters.iter())
        .all(|c| c.deaths == 0);

    let players = participants.len();
    Classification {
        flawless,
        solo: players == 1,
        duo: players == 2,
        trio: players == 3,
    }
}
