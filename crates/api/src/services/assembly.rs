//! Project assembly: a project together with its criteria and scored choices.

use std::collections::HashMap;

use serde::Serialize;
use tradeoff_core::scoring::{
    rank_choices, score_choices, RankedChoice, ScoreEntry, ScoredChoice, WeightedCriterion,
};
use tradeoff_core::types::{DbId, UserId};
use tradeoff_db::models::choice::Choice;
use tradeoff_db::models::criterion::Criterion;
use tradeoff_db::models::project::Project;
use tradeoff_db::models::score::Score;
use tradeoff_db::store::{ProjectItemQuery, ProjectQuery, ScoreQuery};

use crate::error::AppResult;
use crate::state::AppState;

/// A project with its criteria and every choice scored against them.
#[derive(Debug, Clone, Serialize)]
pub struct ProjectDetail {
    #[serde(flatten)]
    pub project: Project,
    pub criteria: Vec<Criterion>,
    pub choices: Vec<ScoredChoice<Choice>>,
}

/// Choices of one project, best first.
#[derive(Debug, Clone, Serialize)]
pub struct ProjectRanking {
    pub project_id: DbId,
    pub choices: Vec<RankedChoice<Choice>>,
}

/// Assemble an already-authorized project.
pub async fn assemble(state: &AppState, project: Project) -> AppResult<ProjectDetail> {
    let rows = fetch_rows(state, vec![project.id]).await?;
    let (criteria, choices) = score_project(rows.criteria, rows.choices, &rows.scores);
    Ok(ProjectDetail {
        project,
        criteria,
        choices,
    })
}

/// Assemble every project owned by `user`, newest first.
///
/// Rows for all projects are fetched together, so the number of store calls
/// does not grow with the number of projects.
pub async fn assemble_owned(state: &AppState, user: UserId) -> AppResult<Vec<ProjectDetail>> {
    let projects = state
        .call(
            "list_projects",
            state.store.list_projects(&ProjectQuery::owned_by(user)),
        )
        .await?;
    if projects.is_empty() {
        return Ok(Vec::new());
    }

    let rows = fetch_rows(state, projects.iter().map(|p| p.id).collect()).await?;
    let choice_projects: HashMap<DbId, DbId> =
        rows.choices.iter().map(|c| (c.id, c.project_id)).collect();
    let mut criteria_by_project = group_by_project(rows.criteria, |c| c.project_id);
    let mut choices_by_project = group_by_project(rows.choices, |c| c.project_id);
    let mut scores_by_project = group_by_project(rows.scores, |s| {
        choice_projects.get(&s.choice_id).copied().unwrap_or_default()
    });

    let details = projects
        .into_iter()
        .map(|project| {
            let (criteria, choices) = score_project(
                criteria_by_project.remove(&project.id).unwrap_or_default(),
                choices_by_project.remove(&project.id).unwrap_or_default(),
                &scores_by_project.remove(&project.id).unwrap_or_default(),
            );
            ProjectDetail {
                project,
                criteria,
                choices,
            }
        })
        .collect();
    Ok(details)
}

/// Rank the choices of an already-authorized project.
pub async fn rank(state: &AppState, project: &Project) -> AppResult<ProjectRanking> {
    let rows = fetch_rows(state, vec![project.id]).await?;
    let (_, choices) = score_project(rows.criteria, rows.choices, &rows.scores);
    Ok(ProjectRanking {
        project_id: project.id,
        choices: rank_choices(choices),
    })
}

/// Criteria, choices and scores of a set of projects.
struct ProjectRows {
    criteria: Vec<Criterion>,
    choices: Vec<Choice>,
    scores: Vec<Score>,
}

/// Fetch the rows of `project_ids` in at most three store calls.
async fn fetch_rows(state: &AppState, project_ids: Vec<DbId>) -> AppResult<ProjectRows> {
    let items = ProjectItemQuery::in_projects(project_ids);
    let criteria = state
        .call("list_criteria", state.store.list_criteria(&items))
        .await?;
    let choices = state
        .call("list_choices", state.store.list_choices(&items))
        .await?;

    let scores = if choices.is_empty() {
        Vec::new()
    } else {
        let query = ScoreQuery {
            choice_ids: choices.iter().map(|c| c.id).collect(),
        };
        state
            .call("list_scores", state.store.list_scores(&query))
            .await?
    };

    tracing::debug!(
        projects = items.project_ids.len(),
        criteria = criteria.len(),
        choices = choices.len(),
        scores = scores.len(),
        "Fetched project rows"
    );

    Ok(ProjectRows {
        criteria,
        choices,
        scores,
    })
}

/// Aggregate one project's rows.
fn score_project(
    criteria: Vec<Criterion>,
    choices: Vec<Choice>,
    scores: &[Score],
) -> (Vec<Criterion>, Vec<ScoredChoice<Choice>>) {
    let weighted: Vec<WeightedCriterion> = criteria.iter().map(WeightedCriterion::from).collect();
    let entries: Vec<ScoreEntry> = scores.iter().map(ScoreEntry::from).collect();
    let scored = score_choices(&weighted, choices, &entries);
    (criteria, scored)
}

/// Split rows by project, keeping their order within each project.
fn group_by_project<T>(rows: Vec<T>, project_of: impl Fn(&T) -> DbId) -> HashMap<DbId, Vec<T>> {
    let mut groups: HashMap<DbId, Vec<T>> = HashMap::new();
    for row in rows {
        groups.entry(project_of(&row)).or_default().push(row);
    }
    groups
}
