//! Activity identity resolution from manifest display labels.
//!
//! Labels look like `"King's Fall: Master"` or just `"Last Wish"`. The
//! reverse tables are built once from [`ActivityName::ALL`] and
//! [`Difficulty::ALL`] and are read-only afterwards, so a single
//! [`ActivityTaxonomy`] can be shared across workers behind an `Arc`.

use std::collections::HashMap;

use crate::error::ReportError;
use crate::models::activity::{ActivityIdentity, ActivityName, Difficulty};

/// Difficulty spellings that differ from the canonical labels.
const DIFFICULTY_ALIASES: [(&str, Difficulty); 3] = [
    ("standard", Difficulty::Normal),
    ("expert", Difficulty::ChallengeMode),
    ("legend", Difficulty::ChallengeMode),
];

#[derive(Debug, Clone)]
pub struct ActivityTaxonomy {
    names: HashMap<&'static str, ActivityName>,
    difficulties: HashMap<String, Difficulty>,
}

impl ActivityTaxonomy {
    pub fn new() -> Self {
        let names = ActivityName::ALL
            .iter()
            .map(|name| (name.label(), *name))
            .collect();

        let mut difficulties: HashMap<String, Difficulty> = Difficulty::ALL
            .iter()
            .map(|difficulty| (difficulty.label().to_ascii_lowercase(), *difficulty))
            .collect();
        for (alias, difficulty) in DIFFICULTY_ALIASES {
            difficulties.insert(alias.to_string(), difficulty);
        }

        Self {
            names,
            difficulties,
        }
    }

    /// Resolves a `"<Name>"` or `"<Name>: <Difficulty>"` label.
    ///
    /// A missing difficulty segment means [`Difficulty::Normal`].
    pub fn resolve(&self, label: &str) -> Result<ActivityIdentity, ReportError> {
        let mut parts = label.splitn(2, ':');
        let name_part = parts.next().unwrap_or_default().trim();
        let difficulty_part = parts.next().map(str::trim);

        let name = self
            .names
            .get(name_part)
            .copied()
            .ok_or_else(|| ReportError::UnknownActivityName(name_part.to_string()))?;

        let difficulty = match difficulty_part {
            None => Difficulty::Normal,
            Some(segment) => self
                .difficulties
                .get(&segment.to_ascii_lowercase())
                .copied()
                .ok_or_else(|| ReportError::UnknownDifficulty(segment.to_string()))?,
        };

        Ok(ActivityIdentity { name, difficulty })
    }
}

impl Default for ActivityTaxonomy {
    fn default() -> Self {
        Self::new()
    }
}
