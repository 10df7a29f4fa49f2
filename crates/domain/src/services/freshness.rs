//! "Started from the beginning" resolution.
//!
//! The upstream flag only became trustworthy over time, so the rule applied
//! depends on when the activity started. Eras are checked newest first.

use chrono::{DateTime, Utc};
use shared::game_time::{fixed_instant, PacificInstant, PacificZone};
use std::collections::HashSet;

/// Activities whose first two phases both count as a fresh start.
const TWO_PHASE_HASHES: [i64; 2] = [548_750_096, 2_812_525_063];

/// Leviathan hashes where the opening and the second checkpoint count as fresh.
const THREE_CHECKPOINT_HASHES: [i64; 24] = [
    2_693_136_600,
    2_693_136_601,
    2_693_136_602,
    2_693_136_603,
    2_693_136_604,
    2_693_136_605,
    89_727_599,
    287_649_202,
    1_699_948_563,
    1_875_726_950,
    3_916_343_513,
    4_039_317_196,
    417_231_112,
    508_802_457,
    757_116_822,
    771_164_842,
    1_685_065_161,
    1_800_508_819,
    2_449_714_930,
    3_446_541_099,
    4_206_123_728,
    3_912_437_239,
    3_879_860_661,
    3_857_338_478,
];

/// Fixed instants splitting report history into freshness eras.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EraBoundaries {
    /// Before this, phase heuristics replace the flag.
    pub phase_heuristics_end: DateTime<Utc>,
    /// After this, a flawless run also proves a fresh start.
    pub flawless_evidence_start: DateTime<Utc>,
    /// From this point on the flag is trusted as-is.
    pub trusted_flag_start: DateTime<Utc>,
}

impl EraBoundaries {
    pub const PHASE_HEURISTICS_END: PacificInstant =
        PacificInstant::new(2020, 11, 10, 9, PacificZone::Standard);
    pub const FLAWLESS_EVIDENCE_START: PacificInstant =
        PacificInstant::new(2022, 2, 22, 9, PacificZone::Standard);
    pub const TRUSTED_FLAG_START: PacificInstant =
        PacificInstant::new(2022, 5, 24, 10, PacificZone::Daylight);

    pub fn standard() -> Self {
        Self {
            phase_heuristics_end: fixed_instant(Self::PHASE_HEURISTICS_END),
            flawless_evidence_start: fixed_instant(Self::FLAWLESS_EVIDENCE_START),
            trusted_flag_start: fixed_instant(Self::TRUSTED_FLAG_START),
        }
    }

    pub fn era_of(&self, start_time: DateTime<Utc>) -> Era {
        if start_time >= self.trusted_flag_start {
            Era::TrustedFlag
        } else if start_time < self.phase_heuristics_end {
            Era::PhaseHeuristics
        } else if start_time > self.flawless_evidence_start {
            Era::FlawlessEvidence
        } else {
            Era::LegacyFlag
        }
    }
}

impl Default for EraBoundaries {
    fn default() -> Self {
        Self::standard()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Era {
    PhaseHeuristics,
    LegacyFlag,
    FlawlessEvidence,
    TrustedFlag,
}

impl Era {
    pub fn as_str(&self) -> &'static str {
        match self {
            Era::PhaseHeuristics => "phase_heuristics",
            Era::LegacyFlag => "legacy_flag",
            Era::FlawlessEvidence => "flawless_evidence",
            Era::TrustedFlag => "trusted_flag",
        }
    }
}

/// Inputs read from one report.
#[derive(Debug, Clone, Copy)]
pub struct FreshnessInput {
    pub activity_hash: i64,
    pub start_time: DateTime<Utc>,
    pub starting_phase_index: i32,
    pub started_from_beginning: bool,
    pub flawless: bool,
}

#[derive(Debug, Clone)]
pub struct FreshnessResolver {
    boundaries: EraBoundaries,
    two_phase: HashSet<i64>,
    three_checkpoint: HashSet<i64>,
}

impl FreshnessResolver {
    pub fn new(boundaries: EraBoundaries) -> Self {
        Self {
            boundaries,
            two_phase: TWO_PHASE_HASHES.into_iter().collect(),
            three_checkpoint: THREE_CHECKPOINT_HASHES.into_iter().collect(),
        }
    }

    pub fn boundaries(&self) -> &EraBoundaries {
        &self.boundaries
    }

    pub fn resolve(&self, input: FreshnessInput) -> bool {
        match self.boundaries.era_of(input.start_time) {
            Era::TrustedFlag => input.started_from_beginning,
            Era::PhaseHeuristics => {
                self.fresh_by_phase(input.activity_hash, input.starting_phase_index)
            }
            Era::FlawlessEvidence => input.started_from_beginning || input.flawless,
            Era::LegacyFlag => input.started_from_beginning,
        }
    }

    fn fresh_by_phase(&self, activity_hash: i64, phase: i32) -> bool {
        if self.two_phase.contains(&activity_hash) {
            phase <= 1
        } else if self.three_checkpoint.contains(&activity_hash) {
            phase == 0 || phase == 2
        } else {
            phase == 0
        }
    }
}

impl Default for FreshnessResolver {
    fn default() -> Self {
        Self::new(EraBoundaries::standard())
    }
}
