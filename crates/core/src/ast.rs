/// Raw AST produced by the parser.
///
/// Declarations live in append-only arenas owned by the [`Domain`] or
/// [`Problem`]; everything else refers to them by index. Goal variables are
/// stored in the problem's arena, all other variables in the domain's.
use crate::error::Location;
use crate::requirements::Requirement;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeId(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VariableId(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PredicateId(pub usize);

/// Index into either the domain's constants or the problem's objects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConstantId {
    Domain(usize),
    Problem(usize),
}

// ──────────────────────────────────────────────
// Declarations
// ──────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct PrimitiveTypeDeclaration {
    pub name: String,
    pub parents: Vec<TypeId>,
}

impl PrimitiveTypeDeclaration {
    pub fn new(name: impl Into<String>) -> Self {
        PrimitiveTypeDeclaration {
            name: name.into(),
            parents: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Type {
    Primitive(TypeId),
    /// Satisfied by any one of its members.
    Either(Vec<TypeId>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct VariableDeclaration {
    pub name: String,
    pub ty: Option<Type>,
}

impl VariableDeclaration {
    pub fn new(name: impl Into<String>) -> Self {
        VariableDeclaration {
            name: name.into(),
            ty: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConstantDeclaration {
    pub name: String,
    pub ty: Option<Type>,
}

impl ConstantDeclaration {
    pub fn new(name: impl Into<String>) -> Self {
        ConstantDeclaration {
            name: name.into(),
            ty: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PredicateDeclaration {
    pub name: String,
    pub parameters: Vec<VariableId>,
}

// ──────────────────────────────────────────────
// Expressions
// ──────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Term {
    Variable(VariableId),
    Constant(ConstantId),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Predicate {
    pub declaration: PredicateId,
    pub arguments: Vec<Term>,
}

/// Placeholder for a construct that was recognized and skipped.
#[derive(Debug, Clone, PartialEq)]
pub struct Unsupported {
    pub keyword: String,
    /// The skipped expression with whitespace runs collapsed.
    pub text: String,
    pub location: Location,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AtomicFormula {
    Predicate(Predicate),
    Unsupported(Unsupported),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Atomic(AtomicFormula),
    Not(AtomicFormula),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Precondition {
    Atomic(AtomicFormula),
    Not(Box<Precondition>),
    And(Vec<Precondition>),
    Or(Vec<Precondition>),
    Imply(Box<Precondition>, Box<Precondition>),
    Exists(Vec<VariableId>, Box<Precondition>),
    ForAll(Vec<VariableId>, Box<Precondition>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum ConditionalEffect {
    Literal(Literal),
    And(Vec<Literal>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    Literal(Literal),
    And(Vec<Effect>),
    ForAll(Vec<VariableId>, Box<Effect>),
    When(Precondition, ConditionalEffect),
}

pub type Fact = Literal;

// ──────────────────────────────────────────────
// Containers
// ──────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct Action {
    pub name: String,
    pub parameters: Vec<VariableId>,
    pub precondition: Option<Precondition>,
    pub effect: Option<Effect>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Domain {
    pub name: String,
    pub requirements: Vec<Requirement>,
    pub types: Vec<PrimitiveTypeDeclaration>,
    pub constants: Vec<ConstantDeclaration>,
    pub predicates: Vec<PredicateDeclaration>,
    pub actions: Vec<Action>,
    pub variables: Vec<VariableDeclaration>,
}

impl Domain {
    pub fn new(name: impl Into<String>) -> Self {
        Domain {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn type_name(&self, id: TypeId) -> &str {
        &self.types[id.0].name
    }

    pub fn find_type(&self, name: &str) -> Option<TypeId> {
        self.types
            .iter()
            .position(|declaration| declaration.name == name)
            .map(TypeId)
    }

    pub fn variable(&self, id: VariableId) -> &VariableDeclaration {
        &self.variables[id.0]
    }

    pub fn predicate(&self, id: PredicateId) -> &PredicateDeclaration {
        &self.predicates[id.0]
    }

    pub fn add_variable(&mut self, declaration: VariableDeclaration) -> VariableId {
        self.variables.push(declaration);
        VariableId(self.variables.len() - 1)
    }

    pub fn has_requirement(&self, requirement: Requirement) -> bool {
        self.requirements.contains(&requirement)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Problem {
    pub name: String,
    pub domain_name: String,
    pub requirements: Vec<Requirement>,
    pub objects: Vec<ConstantDeclaration>,
    pub initial_state: Vec<Fact>,
    pub goal: Option<Precondition>,
    pub variables: Vec<VariableDeclaration>,
}

impl Problem {
    pub fn new(name: impl Into<String>) -> Self {
        Problem {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn variable(&self, id: VariableId) -> &VariableDeclaration {
        &self.variables[id.0]
    }

    pub fn add_variable(&mut self, declaration: VariableDeclaration) -> VariableId {
        self.variables.push(declaration);
        VariableId(self.variables.len() - 1)
    }

    pub fn has_requirement(&self, requirement: Requirement) -> bool {
        self.requirements.contains(&requirement)
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
}
