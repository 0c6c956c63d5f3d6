use crate::context::Context;
use crate::error::{Error, Result};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Requirement {
    Strips,
    Typing,
    NegativePreconditions,
    DisjunctivePreconditions,
    Equality,
    ExistentialPreconditions,
    UniversalPreconditions,
    QuantifiedPreconditions,
    ConditionalEffects,
    Fluents,
    NumericFluents,
    ObjectFluents,
    Adl,
    DurativeActions,
    DurationInequalities,
    ContinuousEffects,
    DerivedPredicates,
    TimedInitialLiterals,
    Preferences,
    Constraints,
    ActionCosts,
}

const NAMES: &[(&str, Requirement)] = &[
    ("strips", Requirement::Strips),
    ("typing", Requirement::Typing),
    ("negative-preconditions", Requirement::NegativePreconditions),
    ("disjunctive-preconditions", Requirement::DisjunctivePreconditions),
    ("equality", Requirement::Equality),
    ("existential-preconditions", Requirement::ExistentialPreconditions),
    ("universal-preconditions", Requirement::UniversalPreconditions),
    ("quantified-preconditions", Requirement::QuantifiedPreconditions),
    ("conditional-effects", Requirement::ConditionalEffects),
    ("fluents", Requirement::Fluents),
    ("numeric-fluents", Requirement::NumericFluents),
    ("object-fluents", Requirement::ObjectFluents),
    ("adl", Requirement::Adl),
    ("durative-actions", Requirement::DurativeActions),
    ("duration-inequalities", Requirement::DurationInequalities),
    ("continuous-effects", Requirement::ContinuousEffects),
    ("derived-predicates", Requirement::DerivedPredicates),
    ("timed-initial-literals", Requirement::TimedInitialLiterals),
    ("preferences", Requirement::Preferences),
    ("constraints", Requirement::Constraints),
    ("action-costs", Requirement::ActionCosts),
];

// Legacy spellings
const ALIASES: &[(&str, Requirement)] = &[
    ("base-actions", Requirement::Strips),
    ("full-adl", Requirement::Adl),
];

/// Names accepted in compatibility mode and then dropped.
const OBSOLETE: &[&str] = &["goal-utilities", "domain-axioms"];

impl Requirement {
    pub fn name(self) -> &'static str {
        use Requirement::*;
        match self {
            Strips => "strips",
            Typing => "typing",
            NegativePreconditions => "negative-preconditions",
            DisjunctivePreconditions => "disjunctive-preconditions",
            Equality => "equality",
            ExistentialPreconditions => "existential-preconditions",
            UniversalPreconditions => "universal-preconditions",
            QuantifiedPreconditions => "quantified-preconditions",
            ConditionalEffects => "conditional-effects",
            Fluents => "fluents",
            NumericFluents => "numeric-fluents",
            ObjectFluents => "object-fluents",
            Adl => "adl",
            DurativeActions => "durative-actions",
            DurationInequalities => "duration-inequalities",
            ContinuousEffects => "continuous-effects",
            DerivedPredicates => "derived-predicates",
            TimedInitialLiterals => "timed-initial-literals",
            Preferences => "preferences",
            Constraints => "constraints",
            ActionCosts => "action-costs",
        }
    }

    pub fn from_name(name: &str) -> Option<Requirement> {
        NAMES
            .iter()
            .chain(ALIASES)
            .find(|(candidate, _)| *candidate == name)
            .map(|(_, requirement)| *requirement)
    }

    /// Requirements directly implied by this one.
    fn implied(self) -> &'static [Requirement] {
        use Requirement::*;
        match self {
            Adl => &[
                Strips,
                Typing,
                NegativePreconditions,
                DisjunctivePreconditions,
                Equality,
                QuantifiedPreconditions,
                ConditionalEffects,
            ],
            QuantifiedPreconditions => &[ExistentialPreconditions, UniversalPreconditions],
            Fluents => &[NumericFluents, ObjectFluents],
            TimedInitialLiterals => &[DurativeActions],
            _ => &[],
        }
    }
}

impl fmt::Display for Requirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Parses the body of a `:requirements` section up to its closing parenthesis.
pub fn parse_requirements(context: &mut Context) -> Result<Vec<Requirement>> {
    let mut requirements = Vec::new();
    loop {
        context.tokenizer.skip_white_space();
        if context.tokenizer.current_character()? == ')' {
            break;
        }
        context.tokenizer.expect(":")?;
        let location = context.tokenizer.location();
        let name = context.tokenizer.get_identifier()?;

        if let Some(requirement) = Requirement::from_name(&name) {
            if !requirements.contains(&requirement) {
                requirements.push(requirement);
            }
            continue;
        }

        if context.is_compatibility() && OBSOLETE.contains(&name.as_str()) {
            context.warn(
                location,
                format!(
                    "“{}” requirement is not part of the PDDL 3.1 specification, ignoring requirement",
                    name
                ),
            )?;
            continue;
        }

        return Err(Error::parser(
            location,
            format!("unknown PDDL requirement “{}”", name),
        ));
    }
    Ok(requirements)
}

/// Closes `requirements` under the implication table.
///
/// An empty set stands for plain STRIPS.
pub fn compute_derived_requirements(requirements: &mut Vec<Requirement>) {
    if requirements.is_empty() {
        requirements.push(Requirement::Strips);
    }

    let mut index = 0;
    while index < requirements.len() {
        for &implied in requirements[index].implied() {
            if !requirements.contains(&implied) {
                requirements.push(implied);
            }
        }
        index += 1;
    }
}

/// Requirement sets a gated construct is checked against.
///
/// A problem's own set is consulted first, then its domain's. In
/// compatibility mode a missing requirement is added to the innermost set.
pub struct RequirementScope<'r> {
    pub domain: &'r mut Vec<Requirement>,
    pub problem: Option<&'r mut Vec<Requirement>>,
}

impl RequirementScope<'_> {
    pub fn contains(&self, requirement: Requirement) -> bool {
        self.domain.contains(&requirement)
            || self
                .problem
                .as_ref()
                .is_some_and(|problem| problem.contains(&requirement))
    }

    fn add(&mut self, requirement: Requirement) {
        let target: &mut Vec<Requirement> = match self.problem.as_deref_mut() {
            Some(problem) => problem,
            None => &mut *self.domain,
        };
        target.push(requirement);
        compute_derived_requirements(target);
    }
}

pub fn check_requirement(
    context: &mut Context,
    scope: &mut RequirementScope<'_>,
    requirement: Requirement,
) -> Result<()> {
    if scope.contains(requirement) {
        return Ok(());
    }

    if context.is_compatibility() {
        context.warn_here(format!(
            "requirement “{}” used but never declared, silently adding requirement",
            requirement
        ))?;
        scope.add(requirement);
        return Ok(());
    }

    Err(context.error_here(format!(
        "requirement “{}” used but never declared",
        requirement
    )))
}
