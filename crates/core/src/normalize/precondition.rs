use super::reduction::reduce;
use super::{normalize_atomic_formula, DerivedPredicates};
use crate::ast::{self, Term, VariableId};
use crate::error::Result;
use crate::normalized::{self, AtomicFormula, DerivedPredicateUse, Literal};

impl DerivedPredicates<'_> {
    /// Turns a precondition into a literal or a flat conjunction of literals.
    pub(super) fn normalize_precondition(
        &mut self,
        precondition: ast::Precondition,
    ) -> Result<normalized::Precondition> {
        match reduce(precondition) {
            ast::Precondition::And(arguments) => {
                let mut literals = Vec::with_capacity(arguments.len());
                for argument in flatten_conjunction(arguments) {
                    literals.push(self.normalize_nested(argument)?);
                }
                Ok(normalized::Precondition::And(literals))
            }
            reduced => Ok(normalized::Precondition::Literal(self.normalize_nested(reduced)?)),
        }
    }

    /// A single literal standing for `precondition`, deriving a new
    /// predicate when it is not already atomic.
    fn normalize_nested(&mut self, precondition: ast::Precondition) -> Result<Literal> {
        match precondition {
            ast::Precondition::Atomic(atomic) => Ok(Literal::Atomic(normalize_atomic_formula(atomic)?)),
            ast::Precondition::Not(argument) => match *argument {
                ast::Precondition::Atomic(atomic) => Ok(Literal::Not(normalize_atomic_formula(atomic)?)),
                other => Ok(Literal::Not(self.derive(other)?)),
            },
            other => Ok(Literal::Atomic(self.derive(other)?)),
        }
    }

    /// Moves `precondition` into a fresh derived predicate and returns its use.
    fn derive(&mut self, precondition: ast::Precondition) -> Result<AtomicFormula> {
        let parameters = free_variables(&precondition);
        let id = self.allocate();

        let (existential_parameters, body) = match precondition {
            ast::Precondition::Exists(parameters, body) => (parameters, *body),
            other => (Vec::new(), other),
        };
        let body = self.disjunctive_normal_form(body)?;

        let arguments = parameters.iter().copied().map(Term::Variable).collect();
        self.complete(id, |declaration| {
            declaration.parameters = parameters;
            declaration.existential_parameters = existential_parameters;
            declaration.body = body;
        });
        Ok(AtomicFormula::DerivedPredicate(DerivedPredicateUse { id, arguments }))
    }

    /// Distributes conjunctions over disjunctions. Quantified subexpressions
    /// become derived predicates of their own.
    fn disjunctive_normal_form(&mut self, precondition: ast::Precondition) -> Result<Vec<Vec<Literal>>> {
        match precondition {
            ast::Precondition::Or(arguments) => {
                let mut disjuncts = Vec::new();
                for argument in arguments {
                    disjuncts.extend(self.disjunctive_normal_form(argument)?);
                }
                Ok(disjuncts)
            }
            ast::Precondition::And(arguments) => {
                let mut disjuncts = vec![Vec::new()];
                for argument in arguments {
                    let argument = self.disjunctive_normal_form(argument)?;
                    disjuncts = cross_product(&disjuncts, &argument);
                }
                Ok(disjuncts)
            }
            ast::Precondition::Imply(..) | ast::Precondition::ForAll(..) => {
                self.disjunctive_normal_form(reduce(precondition))
            }
            other => Ok(vec![vec![self.normalize_nested(other)?]]),
        }
    }
}

fn flatten_conjunction(arguments: Vec<ast::Precondition>) -> Vec<ast::Precondition> {
    let mut flattened = Vec::with_capacity(arguments.len());
    for argument in arguments {
        match argument {
            ast::Precondition::And(nested) => flattened.extend(flatten_conjunction(nested)),
            other => flattened.push(other),
        }
    }
    flattened
}

fn cross_product(left: &[Vec<Literal>], right: &[Vec<Literal>]) -> Vec<Vec<Literal>> {
    let mut product = Vec::with_capacity(left.len() * right.len());
    for l in left {
        for r in right {
            let mut conjunction = l.clone();
            conjunction.extend(r.iter().cloned());
            product.push(conjunction);
        }
    }
    product
}

/// Variables used but not bound inside `precondition`, in order of first
/// occurrence.
fn free_variables(precondition: &ast::Precondition) -> Vec<VariableId> {
    let mut free = Vec::new();
    let mut bound = Vec::new();
    collect_free_variables(precondition, &mut bound, &mut free);
    free
}

fn collect_free_variables(
    precondition: &ast::Precondition,
    bound: &mut Vec<VariableId>,
    free: &mut Vec<VariableId>,
) {
    match precondition {
        ast::Precondition::Atomic(ast::AtomicFormula::Predicate(predicate)) => {
            for term in &predicate.arguments {
                if let Term::Variable(id) = *term {
                    if !bound.contains(&id) && !free.contains(&id) {
                        free.push(id);
                    }
                }
            }
        }
        ast::Precondition::Atomic(ast::AtomicFormula::Unsupported(_)) => {}
        ast::Precondition::Not(argument) => collect_free_variables(argument, bound, free),
        ast::Precondition::And(arguments) | ast::Precondition::Or(arguments) => {
            for argument in arguments {
                collect_free_variables(argument, bound, free);
            }
        }
        ast::Precondition::Imply(antecedent, consequent) => {
            collect_free_variables(antecedent, bound, free);
            collect_free_variables(consequent, bound, free);
        }
        ast::Precondition::Exists(parameters, argument)
        | ast::Precondition::ForAll(parameters, argument) => {
            let depth = bound.len();
            bound.extend(parameters.iter().copied());
            collect_free_variables(argument, bound, free);
            bound.truncate(depth);
        }
    }
}
