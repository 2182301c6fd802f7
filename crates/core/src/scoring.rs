//! Weighted score aggregation for a project's choices.
//!
//! Given the project's criteria (with weights), its choices, and the score
//! records attached to those choices, [`score_choices`] produces for every
//! choice a `criterion_id -> score` map and a weighted `total_score`.
//!
//! The computation is pure and infallible. A missing score record counts as
//! 0, a missing weight counts as 0, and records that reference unknown
//! criteria or choices never show up in the output.

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

use crate::types::DbId;

// ---------------------------------------------------------------------------
// Inputs
// ---------------------------------------------------------------------------

/// Anything that can be scored: exposes its id and disqualification flag.
pub trait Scorable {
    fn id(&self) -> DbId;

    /// Disqualified choices are still scored but always rank last.
    fn is_disqualified(&self) -> bool {
        false
    }
}

/// The slice of a criterion the aggregator needs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeightedCriterion {
    pub id: DbId,
    pub weight: Option<f64>,
}

/// One stored rating of a choice against a criterion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreEntry {
    pub criteria_id: DbId,
    pub choice_id: DbId,
    pub score: i32,
}

// ---------------------------------------------------------------------------
// Outputs
// ---------------------------------------------------------------------------

/// A choice enriched with its per-criterion scores and weighted total.
///
/// Serializes flat: the choice's own fields followed by `scores` and
/// `total_score`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredChoice<C> {
    #[serde(flatten)]
    pub choice: C,
    pub scores: BTreeMap<DbId, i32>,
    pub total_score: f64,
}

/// A scored choice with its 1-based position. Disqualified choices carry no
/// rank.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedChoice<C> {
    pub rank: Option<usize>,
    #[serde(flatten)]
    pub scored: ScoredChoice<C>,
}

// ---------------------------------------------------------------------------
// Aggregation
// ---------------------------------------------------------------------------

/// Score every choice against every criterion.
///
/// Output order matches `choices`. When `scores` holds more than one record
/// for the same `(criteria_id, choice_id)` pair, the later record wins.
pub fn score_choices<C: Scorable>(
    criteria: &[WeightedCriterion],
    choices: Vec<C>,
    scores: &[ScoreEntry],
) -> Vec<ScoredChoice<C>> {
    let lookup: HashMap<(DbId, DbId), i32> = scores
        .iter()
        .map(|s| ((s.choice_id, s.criteria_id), s.score))
        .collect();

    choices
        .into_iter()
        .map(|choice| {
            let choice_id = choice.id();
            let mut choice_scores = BTreeMap::new();
            let mut total_score = 0.0;

            for criterion in criteria {
                let score = lookup
                    .get(&(choice_id, criterion.id))
                    .copied()
                    .unwrap_or(0);
                choice_scores.insert(criterion.id, score);
                total_score += f64::from(score) * criterion.weight.unwrap_or(0.0);
            }

            ScoredChoice {
                choice,
                scores: choice_scores,
                total_score,
            }
        })
        .collect()
}

/// Order scored choices best-first.
///
/// Qualified choices come first by descending `total_score`; ties keep their
/// input order. Disqualified choices follow in input order with `rank: None`.
pub fn rank_choices<C: Scorable>(scored: Vec<ScoredChoice<C>>) -> Vec<RankedChoice<C>> {
    let (mut qualified, disqualified): (Vec<_>, Vec<_>) = scored
        .into_iter()
        .partition(|s| !s.choice.is_disqualified());

    qualified.sort_by(|a, b| b.total_score.total_cmp(&a.total_score));

    qualified
        .into_iter()
        .enumerate()
        .map(|(i, scored)| RankedChoice {
            rank: Some(i + 1),
            scored,
        })
        .chain(
            disqualified
                .into_iter()
                .map(|scored| RankedChoice { rank: None, scored }),
        )
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
