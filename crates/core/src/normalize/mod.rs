//! Normalization of a parsed description.
//!
//! Preconditions and goals are reduced to negation normal form and every
//! disjunction or existential quantifier is replaced by a use of a
//! synthesized derived predicate. Domain derived predicates are numbered from
//! 1; the goal's continue after the domain's.

mod effect;
mod precondition;
mod reduction;

use crate::ast;
use crate::context::NormalizationConfig;
use crate::error::{Error, Result};
use crate::normalized::{self, DerivedPredicateDeclaration};

pub fn normalize(
    description: ast::Description,
    config: &NormalizationConfig,
) -> Result<normalized::Description> {
    let ast::Description { domain, problem } = description;
    let domain = normalize_domain(domain, config)?;
    let problem = match problem {
        Some(problem) => Some(normalize_problem(
            problem,
            domain.derived_predicates.len() + 1,
            config,
        )?),
        None => None,
    };
    Ok(normalized::Description { domain, problem })
}

fn normalize_domain(
    domain: ast::Domain,
    config: &NormalizationConfig,
) -> Result<normalized::Domain> {
    let mut derived = DerivedPredicates::new(&config.derived_predicate_prefix, 1);

    let mut actions = Vec::with_capacity(domain.actions.len());
    for action in domain.actions {
        log::debug!("normalizing action “{}”", action.name);
        let precondition = match action.precondition {
            Some(precondition) => Some(derived.normalize_precondition(precondition)?),
            None => None,
        };
        let effect = match action.effect {
            Some(effect) => Some(derived.normalize_effect(effect)?),
            None => None,
        };
        actions.push(normalized::Action {
            name: action.name,
            parameters: action.parameters,
            precondition,
            effect,
        });
    }

    Ok(normalized::Domain {
        name: domain.name,
        requirements: domain.requirements,
        types: domain.types,
        constants: domain.constants,
        predicates: domain.predicates,
        derived_predicates: derived.into_declarations(),
        actions,
        variables: domain.variables,
    })
}

fn normalize_problem(
    problem: ast::Problem,
    first_id: usize,
    config: &NormalizationConfig,
) -> Result<normalized::Problem> {
    let mut derived = DerivedPredicates::new(&config.derived_predicate_prefix, first_id);

    let initial_state = problem
        .initial_state
        .into_iter()
        .map(normalize_fact)
        .collect::<Result<Vec<_>>>()?;

    let goal = match problem.goal {
        Some(goal) => Some(derived.normalize_precondition(goal)?),
        None => None,
    };

    Ok(normalized::Problem {
        name: problem.name,
        domain_name: problem.domain_name,
        requirements: problem.requirements,
        objects: problem.objects,
        derived_predicates: derived.into_declarations(),
        initial_state,
        goal,
        variables: problem.variables,
    })
}

fn normalize_fact(fact: ast::Fact) -> Result<normalized::Fact> {
    normalize_literal(fact)
}

fn normalize_atomic_formula(atomic: ast::AtomicFormula) -> Result<normalized::AtomicFormula> {
    match atomic {
        ast::AtomicFormula::Predicate(predicate) => Ok(normalized::AtomicFormula::Predicate(predicate)),
        ast::AtomicFormula::Unsupported(unsupported) => Err(Error::Normalization {
            location: Some(unsupported.location),
            message: format!(
                "“{}” expressions currently unsupported by normalization",
                unsupported.keyword
            ),
        }),
    }
}

fn normalize_literal(literal: ast::Literal) -> Result<normalized::Literal> {
    Ok(match literal {
        ast::Literal::Atomic(atomic) => normalized::Literal::Atomic(normalize_atomic_formula(atomic)?),
        ast::Literal::Not(atomic) => normalized::Literal::Not(normalize_atomic_formula(atomic)?),
    })
}

/// Allocator for the derived predicates of one domain or problem.
struct DerivedPredicates<'p> {
    prefix: &'p str,
    first_id: usize,
    declarations: Vec<DerivedPredicateDeclaration>,
}

impl<'p> DerivedPredicates<'p> {
    fn new(prefix: &'p str, first_id: usize) -> Self {
        DerivedPredicates {
            prefix,
            first_id,
            declarations: Vec::new(),
        }
    }

    /// Reserves the next id. The declaration is filled in by
    /// [`DerivedPredicates::complete`] once its body is known, so parents
    /// always get lower ids than the predicates their bodies use.
    fn allocate(&mut self) -> usize {
        let id = self.first_id + self.declarations.len();
        self.declarations.push(DerivedPredicateDeclaration {
            id,
            name: format!("{}{}", self.prefix, id),
            parameters: Vec::new(),
            existential_parameters: Vec::new(),
            body: Vec::new(),
        });
        id
    }

    fn complete(&mut self, id: usize, declaration: impl FnOnce(&mut DerivedPredicateDeclaration)) {
        if let Some(entry) = self.declarations.get_mut(id - self.first_id) {
            declaration(entry);
        }
    }

    fn into_declarations(self) -> Vec<DerivedPredicateDeclaration> {
        self.declarations
    }
}
