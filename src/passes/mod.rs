// Purpose: Pass protocol shared by all source-reduction passes, plus the registry.
// Inputs/Outputs: Takes a front-end Program and a Rewriter; yields an Outcome or error.
// Invariants: instances() must never request edits; apply() performs exactly one attempt.
// Gotchas: A mid-pass Err leaves earlier edits in place; callers discard the output.

use anyhow::Result;

use crate::rewrite::Rewriter;
use crate::tree::Program;

pub mod rename_param;

/// Result of a completed pass run. "Nothing to do" is an outcome, not an
/// error, so the outer reduction loop can skip the pass silently.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    Applied { edits: usize },
    NoInstances,
}

pub trait Pass {
    fn name(&self) -> &'static str;

    fn description(&self) -> &'static str;

    /// Query-only mode: run discovery and report how many valid instances
    /// the pass would have, without requesting any edits.
    fn instances(&self, program: &Program) -> usize;

    fn apply(&self, program: &Program, rewriter: &mut dyn Rewriter) -> Result<Outcome>;
}

pub fn all() -> Vec<Box<dyn Pass>> {
    vec![Box::new(rename_param::RenameParam::default())]
}

pub fn find(name: &str) -> Option<Box<dyn Pass>> {
    all().into_iter().find(|pass| pass.name() == name)
}

#[cfg(test)]
mod tests {
    use super::{all, find};

    #[test]
    fn registry_resolves_passes_by_name() {
        assert!(!all().is_empty(), "registry must not be empty");
        let pass = find("rename-param").expect("rename-param is registered");
        assert!(
            !pass.description().is_empty(),
            "registered pass needs a description"
        );
        assert!(find("no-such-pass").is_none());
    }
}
