//! Default score planning for newly created criteria and choices.
//!
//! When choices are added to a project that already has criteria (or the
//! other way round), every new `(criterion, choice)` pair gets a zero-valued
//! score record. Seeding is advisory: aggregation already treats a missing
//! record as 0, so a failed or disabled seed never changes a total.

use crate::types::DbId;

/// Score value written for every seeded pair.
pub const DEFAULT_SCORE: i32 = crate::score_input::SCORE_MIN;

/// A `(criterion, choice)` pair that should receive a default score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScoreSeed {
    pub criteria_id: DbId,
    pub choice_id: DbId,
}

/// Pairs for choices just added to a project with `existing_criteria`.
///
/// Ordered by choice, then criterion.
pub fn seeds_for_new_choices(new_choices: &[DbId], existing_criteria: &[DbId]) -> Vec<ScoreSeed> {
    new_choices
        .iter()
        .flat_map(|&choice_id| {
            existing_criteria.iter().map(move |&criteria_id| ScoreSeed {
                criteria_id,
                choice_id,
            })
        })
        .collect()
}

/// Pairs for criteria just added to a project with `existing_choices`.
///
/// Ordered by criterion, then choice.
pub fn seeds_for_new_criteria(new_criteria: &[DbId], existing_choices: &[DbId]) -> Vec<ScoreSeed> {
    new_criteria
        .iter()
        .flat_map(|&criteria_id| {
            existing_choices.iter().map(move |&choice_id| ScoreSeed {
                criteria_id,
                choice_id,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_choice_pairs_with_each_existing_criterion() {
        let seeds = seeds_for_new_choices(&[30], &[1, 2]);
        assert_eq!(
            seeds,
            vec![
                ScoreSeed {
                    criteria_id: 1,
                    choice_id: 30
                },
                ScoreSeed {
                    criteria_id: 2,
                    choice_id: 30
                },
            ]
        );
    }

    #[test]
    fn new_criteria_pair_with_each_existing_choice() {
        let seeds = seeds_for_new_criteria(&[5, 6], &[10, 11, 12]);
        assert_eq!(seeds.len(), 6);
        assert!(seeds.iter().all(|s| [5, 6].contains(&s.criteria_id)));
        assert_eq!(
            seeds[3],
            ScoreSeed {
                criteria_id: 6,
                choice_id: 10
            }
        );
    }

    #[test]
    fn nothing_to_seed_when_either_side_is_empty() {
        assert!(seeds_for_new_choices(&[1, 2], &[]).is_empty());
        assert!(seeds_for_new_choices(&[], &[1, 2]).is_empty());
        assert!(seeds_for_new_criteria(&[], &[3]).is_empty());
    }

    #[test]
    fn default_score_is_the_lowest_valid_score() {
        assert_eq!(DEFAULT_SCORE, 0);
    }
}
