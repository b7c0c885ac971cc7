//! # Commit Policy
//!
//! Gates mutations behind the validation engine. Two ways to commit:
//!
//! - **One at a time** ([`commit`]): with [`CommitMode::Validated`] the mutation
//!   runs against a working copy, the copy is validated, and it replaces the
//!   caller's garden only when no issue exists. A rejection carries every issue
//!   and leaves the caller's garden as it was. [`CommitMode::Unvalidated`]
//!   applies in place and leaves validation to the caller.
//! - **In bulk** ([`commit_batch`]): every mutation is applied in place, in
//!   order, then the final state is validated once. There is no rollback: on
//!   failure the garden keeps every applied mutation. Callers that need
//!   atomicity clone before calling.
//!
//! Structural errors (unknown bed, bad index, blank field) come back from the
//! command itself before it changes anything, and are never turned into
//! validation failures.

use crate::commands::plantings::{self, RemovePlantingParams};
use crate::commands::{CmdResult, Mutation};
use crate::error::{GrowkitError, Result};
use crate::model::Garden;
use crate::validate::validate_garden;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommitMode {
    #[default]
    Validated,
    Unvalidated,
}

impl CommitMode {
    pub fn from_flag(validate: bool) -> Self {
        if validate {
            CommitMode::Validated
        } else {
            CommitMode::Unvalidated
        }
    }
}

pub fn commit(garden: &mut Garden, mutation: &Mutation, mode: CommitMode) -> Result<CmdResult> {
    match mode {
        CommitMode::Unvalidated => mutation.apply(garden),
        CommitMode::Validated => commit_validated(garden, |working| mutation.apply(working)),
    }
}

/// Removes plantings by `(bed, index)` as one operation; see
/// [`plantings::remove_batch`] for the ordering rules.
pub fn remove_plantings(
    garden: &mut Garden,
    removals: &[RemovePlantingParams],
    mode: CommitMode,
) -> Result<CmdResult> {
    match mode {
        CommitMode::Unvalidated => plantings::remove_batch(garden, removals),
        CommitMode::Validated => {
            commit_validated(garden, |working| plantings::remove_batch(working, removals))
        }
    }
}

/// Applies all mutations unvalidated, then validates the final state once.
///
/// A contiguous run of `RemovePlanting` mutations is treated as one removal
/// batch, so its indexes all refer to the state before the run.
pub fn commit_batch(garden: &mut Garden, mutations: &[Mutation]) -> Result<CmdResult> {
    let mut result = CmdResult::default();
    let mut removals: Vec<RemovePlantingParams> = Vec::new();

    for mutation in mutations {
        if let Mutation::RemovePlanting(params) = mutation {
            removals.push(params.clone());
            continue;
        }
        flush_removals(garden, &mut removals, &mut result)?;
        result.merge(mutation.apply(garden)?);
    }
    flush_removals(garden, &mut removals, &mut result)?;

    let issues = validate_garden(garden);
    if !issues.is_empty() {
        tracing::warn!(
            mutations = mutations.len(),
            issues = issues.len(),
            "batch left garden inconsistent"
        );
        return Err(GrowkitError::Validation(issues));
    }
    tracing::info!(mutations = mutations.len(), "batch committed");
    Ok(result)
}

fn flush_removals(
    garden: &mut Garden,
    removals: &mut Vec<RemovePlantingParams>,
    result: &mut CmdResult,
) -> Result<()> {
    if removals.is_empty() {
        return Ok(());
    }
    result.merge(plantings::remove_batch(garden, removals)?);
    removals.clear();
    Ok(())
}

fn commit_validated<F>(garden: &mut Garden, apply: F) -> Result<CmdResult>
where
    F: FnOnce(&mut Garden) -> Result<CmdResult>,
{
    let mut working = garden.clone();
    let result = apply(&mut working)?;

    let issues = validate_garden(&working);
    if !issues.is_empty() {
        tracing::warn!(issues = issues.len(), "commit rejected");
        return Err(GrowkitError::Validation(issues));
    }

    *garden = working;
    Ok(result)
}
