use std::collections::{BTreeSet, HashMap};

use anyhow::Result;
use log::{debug, trace};

use super::{Outcome, Pass};
use crate::rewrite::Rewriter;
use crate::tree::{Decl, FunctionId, FunctionOccurrence, Program};

pub const PASS_NAME: &str = "rename-param";

const DESCRIPTION: &str =
    "rename function parameters to p1, p2, ... to increase readability of reduced code";

#[derive(Clone, Copy, Debug)]
pub struct RenameParamConfig {
    /// Single-character prefix of generated names.
    pub prefix: char,
}

impl Default for RenameParamConfig {
    fn default() -> Self {
        Self { prefix: 'p' }
    }
}

/// How a declared name relates to the canonical `prefix + digits` pattern.
/// `Unnamed` is distinct from `Plain`: an unnamed parameter is skipped
/// silently and never makes the pass eligible.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum NameShape {
    Unnamed,
    Plain,
    Canonical(u32),
}

fn classify_name(name: &str, prefix: char) -> NameShape {
    let mut chars = name.chars();
    let first = match chars.next() {
        None => return NameShape::Unnamed,
        Some(c) => c,
    };
    let rest = chars.as_str();
    // A name of length 1 never matches, even if it equals the prefix.
    if rest.is_empty() || first != prefix {
        return NameShape::Plain;
    }
    if !rest.bytes().all(|b| b.is_ascii_digit()) {
        return NameShape::Plain;
    }
    match rest.parse::<u32>() {
        Ok(value) => NameShape::Canonical(value),
        Err(_) => NameShape::Plain,
    }
}

/// Immutable snapshot of every pre-existing name that constrains renaming,
/// built by one full-program scan before any edit is requested. Global
/// suffixes block reuse everywhere; local suffixes block reuse only inside
/// their owning function; parameters populate neither set.
struct NameSurvey {
    prefix: char,
    global_numbers: BTreeSet<u32>,
    local_numbers: HashMap<FunctionId, BTreeSet<u32>>,
    has_eligible_param: bool,
}

impl NameSurvey {
    fn new(prefix: char) -> Self {
        Self {
            prefix,
            global_numbers: BTreeSet::new(),
            local_numbers: HashMap::new(),
            has_eligible_param: false,
        }
    }

    fn collect(program: &Program, prefix: char) -> Self {
        let mut survey = Self::new(prefix);
        for decl in &program.decls {
            match decl {
                Decl::Var(var) => survey.add_global(&var.name),
                Decl::Function(occ) => {
                    for param in &occ.params {
                        survey.note_param(param.name.as_deref().unwrap_or(""));
                    }
                    if let Some(body) = &occ.body {
                        for local in &body.locals {
                            survey.add_local(occ.function, &local.name);
                        }
                    }
                }
            }
        }
        debug!(
            "name survey: {} global suffixes, {} functions with local suffixes, eligible={}",
            survey.global_numbers.len(),
            survey.local_numbers.len(),
            survey.has_eligible_param
        );
        survey
    }

    fn note_param(&mut self, name: &str) {
        if classify_name(name, self.prefix) == NameShape::Plain {
            self.has_eligible_param = true;
        }
    }

    fn add_global(&mut self, name: &str) {
        if let NameShape::Canonical(n) = classify_name(name, self.prefix) {
            self.global_numbers.insert(n);
        }
    }

    fn add_local(&mut self, function: FunctionId, name: &str) {
        if let NameShape::Canonical(n) = classify_name(name, self.prefix) {
            self.local_numbers.entry(function).or_default().insert(n);
        }
    }

    fn is_free(&self, locals: Option<&BTreeSet<u32>>, postfix: u32) -> bool {
        if self.global_numbers.contains(&postfix) {
            return false;
        }
        locals.map_or(true, |set| !set.contains(&postfix))
    }

    /// Smallest suffix >= `proposed` free for `function`. Each retry must
    /// consume a distinct blocked number, so the search is bounded by the
    /// combined size of the two collision sets; exceeding that bound means
    /// the snapshot is corrupted and the pass must abort.
    fn resolve_postfix(&self, function: FunctionId, proposed: u32) -> u32 {
        let locals = self.local_numbers.get(&function);
        let mut budget = self.global_numbers.len() + locals.map_or(0, |set| set.len());
        let mut postfix = proposed;
        while !self.is_free(locals, postfix) {
            assert!(
                budget > 0,
                "collision search starting at {} for {} exceeded its bound",
                proposed,
                function
            );
            budget -= 1;
            postfix += 1;
        }
        postfix
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct RenameParam {
    pub config: RenameParamConfig,
}

impl RenameParam {
    pub fn new(config: RenameParamConfig) -> Self {
        Self { config }
    }

    fn rename_function(
        &self,
        occ: &FunctionOccurrence,
        survey: &NameSurvey,
        rewriter: &mut dyn Rewriter,
    ) -> Result<usize> {
        let mut edits = 0;
        let mut rename_map: HashMap<usize, String> = HashMap::new();
        // The counter ticks for every parameter so assigned numbers stay
        // positional, and each resolved number feeds back into it so
        // per-function numbering is strictly increasing; sibling
        // parameters can never be assigned the same suffix.
        let mut postfix = 0u32;
        for (index, param) in occ.params.iter().enumerate() {
            postfix += 1;
            let Some(old_name) = param.name.as_deref() else {
                continue;
            };
            postfix = survey.resolve_postfix(occ.function, postfix);
            let new_name = format!("{}{}", self.config.prefix, postfix);
            trace!("{} param {}: {:?} -> {}", occ.function, index, old_name, new_name);
            rewriter.replace_param_decl(param.span, &new_name)?;
            edits += 1;
            if occ.is_definition() {
                rename_map.insert(index, new_name);
            }
        }
        if let Some(body) = &occ.body {
            for reference in &body.param_refs {
                assert_eq!(
                    reference.function, occ.function,
                    "parameter reference escapes its owning function"
                );
                let Some(new_name) = rename_map.get(&reference.index) else {
                    panic!(
                        "reference at {}..{} resolves to parameter {} of {} with no rename-map entry",
                        reference.span.start, reference.span.end, reference.index, occ.function
                    );
                };
                rewriter.replace_param_ref(reference.span, new_name)?;
                edits += 1;
            }
        }
        Ok(edits)
    }
}

impl Pass for RenameParam {
    fn name(&self) -> &'static str {
        PASS_NAME
    }

    fn description(&self) -> &'static str {
        DESCRIPTION
    }

    fn instances(&self, program: &Program) -> usize {
        let survey = NameSurvey::collect(program, self.config.prefix);
        usize::from(survey.has_eligible_param)
    }

    fn apply(&self, program: &Program, rewriter: &mut dyn Rewriter) -> Result<Outcome> {
        let survey = NameSurvey::collect(program, self.config.prefix);
        if !survey.has_eligible_param {
            return Ok(Outcome::NoInstances);
        }
        let mut edits = 0;
        for decl in &program.decls {
            if let Decl::Function(occ) = decl {
                if occ.params.is_empty() {
                    continue;
                }
                edits += self.rename_function(occ, &survey, rewriter)?;
            }
        }
        debug!("rename-param applied, {} edits requested", edits);
        Ok(Outcome::Applied { edits })
    }
}
