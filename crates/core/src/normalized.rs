//! The restricted AST produced by normalization.
//!
//! Preconditions and goals are at most a conjunction of literals. Every
//! disjunction and existential quantifier has been moved into a derived
//! predicate whose body is a disjunction of conjunctions. Declarations and
//! the variable arenas are carried over from the parsed description so that
//! ids keep pointing at the same entries.

use crate::ast::{
    ConstantDeclaration, PredicateDeclaration, PrimitiveTypeDeclaration, VariableDeclaration,
};
use crate::requirements::Requirement;

pub use crate::ast::{ConstantId, Predicate, PredicateId, Term, TypeId, VariableId};

/// Reference to a synthesized derived predicate, by its numeric id.
#[derive(Debug, Clone, PartialEq)]
pub struct DerivedPredicateUse {
    pub id: usize,
    pub arguments: Vec<Term>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AtomicFormula {
    Predicate(Predicate),
    DerivedPredicate(DerivedPredicateUse),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Atomic(AtomicFormula),
    Not(AtomicFormula),
}

impl Literal {
    pub fn atomic(&self) -> &AtomicFormula {
        match self {
            Literal::Atomic(atomic) | Literal::Not(atomic) => atomic,
        }
    }

    pub fn is_negated(&self) -> bool {
        matches!(self, Literal::Not(_))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Precondition {
    Literal(Literal),
    And(Vec<Literal>),
}

impl Precondition {
    /// The literals of this precondition, in order.
    pub fn literals(&self) -> &[Literal] {
        match self {
            Precondition::Literal(literal) => std::slice::from_ref(literal),
            Precondition::And(literals) => literals,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ConditionalEffect {
    Literal(Literal),
    And(Vec<Literal>),
}

impl ConditionalEffect {
    pub fn literals(&self) -> &[Literal] {
        match self {
            ConditionalEffect::Literal(literal) => std::slice::from_ref(literal),
            ConditionalEffect::And(literals) => literals,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    Literal(Literal),
    And(Vec<Effect>),
    ForAll(Vec<VariableId>, Box<Effect>),
    When(Precondition, ConditionalEffect),
}

pub type Fact = Literal;

/// A derived predicate synthesized from a disjunction or an existential
/// quantifier.
///
/// `body` is read as a disjunction of conjunctions. `existential_parameters`
/// are bound inside the body and do not appear in uses.
#[derive(Debug, Clone, PartialEq)]
pub struct DerivedPredicateDeclaration {
    pub id: usize,
    pub name: String,
    pub parameters: Vec<VariableId>,
    pub existential_parameters: Vec<VariableId>,
    pub body: Vec<Vec<Literal>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Action {
    pub name: String,
    pub parameters: Vec<VariableId>,
    pub precondition: Option<Precondition>,
    pub effect: Option<Effect>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Domain {
    pub name: String,
    pub requirements: Vec<Requirement>,
    pub types: Vec<PrimitiveTypeDeclaration>,
    pub constants: Vec<ConstantDeclaration>,
    pub predicates: Vec<PredicateDeclaration>,
    pub derived_predicates: Vec<DerivedPredicateDeclaration>,
    pub actions: Vec<Action>,
    pub variables: Vec<VariableDeclaration>,
}

impl Domain {
    pub fn variable(&self, id: VariableId) -> &VariableDeclaration {
        &self.variables[id.0]
    }

    pub fn predicate(&self, id: PredicateId) -> &PredicateDeclaration {
        &self.predicates[id.0]
    }

    pub fn type_name(&self, id: TypeId) -> &str {
        &self.types[id.0].name
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Problem {
    pub name: String,
    pub domain_name: String,
    pub requirements: Vec<Requirement>,
    pub objects: Vec<ConstantDeclaration>,
    pub derived_predicates: Vec<DerivedPredicateDeclaration>,
    pub initial_state: Vec<Fact>,
    pub goal: Option<Precondition>,
    pub variables: Vec<VariableDeclaration>,
}

impl Problem {
    pub fn variable(&self, id: VariableId) -> &VariableDeclaration {
        &self.variables[id.0]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Description {
    pub domain: Domain,
    pub problem: Option<Problem>,
}

impl Description {
    pub fn constant(&self, id: ConstantId) -> Option<&ConstantDeclaration> {
        match id {
            ConstantId::Domain(index) => self.domain.constants.get(index),
            ConstantId::Problem(index) => self
                .problem
                .as_ref()
                .and_then(|problem| problem.objects.get(index)),
        }
    }

    /// Looks up a derived predicate by id in the domain, then the problem.
    pub fn derived_predicate(&self, id: usize) -> Option<&DerivedPredicateDeclaration> {
        let problem = self
            .problem
            .iter()
            .flat_map(|problem| problem.derived_predicates.iter());
        self.domain
            .derived_predicates
            .iter()
            .chain(problem)
            .find(|declaration| declaration.id == id)
    }
}
