use crate::ast::Precondition;

/// Rewrites a precondition so that only atoms, `Not`, `And`, `Or` and
/// `Exists` remain and negation sits directly above an atom or an
/// existential quantifier.
///
/// * `(imply a b)` becomes `(or (not a) b)`
/// * `(forall (?x) p)` becomes `(not (exists (?x) (not p)))`
/// * negation is pushed inward with De Morgan's laws, double negation cancels
pub(crate) fn reduce(precondition: Precondition) -> Precondition {
    reduce_with_polarity(precondition, false)
}

fn reduce_with_polarity(precondition: Precondition, negated: bool) -> Precondition {
    match precondition {
        Precondition::Atomic(atomic) if negated => {
            Precondition::Not(Box::new(Precondition::Atomic(atomic)))
        }
        atomic @ Precondition::Atomic(_) => atomic,
        Precondition::Not(argument) => reduce_with_polarity(*argument, !negated),
        Precondition::And(arguments) => {
            let arguments = reduce_all(arguments, negated);
            if negated {
                Precondition::Or(arguments)
            } else {
                Precondition::And(arguments)
            }
        }
        Precondition::Or(arguments) => {
            let arguments = reduce_all(arguments, negated);
            if negated {
                Precondition::And(arguments)
            } else {
                Precondition::Or(arguments)
            }
        }
        Precondition::Imply(antecedent, consequent) => {
            let disjunction = Precondition::Or(vec![Precondition::Not(antecedent), *consequent]);
            reduce_with_polarity(disjunction, negated)
        }
        Precondition::Exists(parameters, argument) => {
            let exists = Precondition::Exists(parameters, Box::new(reduce(*argument)));
            if negated {
                Precondition::Not(Box::new(exists))
            } else {
                exists
            }
        }
        Precondition::ForAll(parameters, argument) => {
            let exists = Precondition::Exists(
                parameters,
                Box::new(Precondition::Not(argument)),
            );
            reduce_with_polarity(Precondition::Not(Box::new(exists)), negated)
        }
    }
}

fn reduce_all(arguments: Vec<Precondition>, negated: bool) -> Vec<Precondition> {
    arguments
        .into_iter()
        .map(|argument| reduce_with_polarity(argument, negated))
        .collect()
}
