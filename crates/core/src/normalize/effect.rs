use super::{normalize_literal, DerivedPredicates};
use crate::ast;
use crate::error::Result;
use crate::normalized;

impl DerivedPredicates<'_> {
    /// Effects keep their shape. Only the conditions of `when` effects are
    /// normalized, like preconditions of the enclosing domain.
    pub(super) fn normalize_effect(&mut self, effect: ast::Effect) -> Result<normalized::Effect> {
        Ok(match effect {
            ast::Effect::Literal(literal) => normalized::Effect::Literal(normalize_literal(literal)?),
            ast::Effect::And(arguments) => normalized::Effect::And(
                arguments
                    .into_iter()
                    .map(|argument| self.normalize_effect(argument))
                    .collect::<Result<_>>()?,
            ),
            ast::Effect::ForAll(parameters, argument) => {
                normalized::Effect::ForAll(parameters, Box::new(self.normalize_effect(*argument)?))
            }
            ast::Effect::When(condition, conditional) => normalized::Effect::When(
                self.normalize_precondition(condition)?,
                normalize_conditional_effect(conditional)?,
            ),
        })
    }
}

fn normalize_conditional_effect(effect: ast::ConditionalEffect) -> Result<normalized::ConditionalEffect> {
    Ok(match effect {
        ast::ConditionalEffect::Literal(literal) => {
            normalized::ConditionalEffect::Literal(normalize_literal(literal)?)
        }
        ast::ConditionalEffect::And(literals) => normalized::ConditionalEffect::And(
            literals
                .into_iter()
                .map(normalize_literal)
                .collect::<Result<_>>()?,
        ),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{AtomicFormula, Predicate, PredicateId, Term, VariableId};
    use crate::error::Location;

    fn predicate(id: usize) -> AtomicFormula {
        AtomicFormula::Predicate(Predicate {
            declaration: PredicateId(id),
            arguments: vec![Term::Variable(VariableId(0))],
        })
    }

    #[test]
    fn when_conditions_allocate_derived_predicates() {
        let mut derived = DerivedPredicates::new("derived-predicate-", 1);
        let effect = ast::Effect::ForAll(
            vec![VariableId(0)],
            Box::new(ast::Effect::When(
                ast::Precondition::Or(vec![
                    ast::Precondition::Atomic(predicate(0)),
                    ast::Precondition::Atomic(predicate(1)),
                ]),
                ast::ConditionalEffect::And(vec![ast::Literal::Not(predicate(2))]),
            )),
        );

        let normalized = derived.normalize_effect(effect).unwrap();
        let normalized::Effect::ForAll(parameters, body) = normalized else {
            panic!("expected a universal effect");
        };
        assert_eq!(parameters, vec![VariableId(0)]);
        let normalized::Effect::When(condition, conditional) = *body else {
            panic!("expected a conditional effect");
        };
        assert_eq!(condition.literals().len(), 1);
        assert!(conditional.literals()[0].is_negated());
        assert_eq!(derived.into_declarations().len(), 1);
    }

    #[test]
    fn unsupported_effects_are_fatal() {
        let mut derived = DerivedPredicates::new("derived-predicate-", 1);
        let effect = ast::Effect::And(vec![ast::Effect::Literal(ast::Literal::Atomic(
            AtomicFormula::Unsupported(ast::Unsupported {
                keyword: "increase".into(),
                text: "(increase (total-cost) 1)".into(),
                location: Location::new("test.pddl", 3, 7),
            }),
        ))]);
        let error = derived.normalize_effect(effect).unwrap_err();
        assert_eq!(
            error.to_string(),
            "test.pddl:3:7 “increase” expressions currently unsupported by normalization"
        );
    }
}
