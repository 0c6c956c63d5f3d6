/// Recursive-descent PDDL parser.
///
/// Every production returns `Result<Option<T>>`. `Ok(None)` means the input
/// did not start with this production and the cursor is back where it was.
/// `Err` means the production committed and then failed.
use crate::ast::{
    ConstantDeclaration, ConstantId, Description, Domain, Problem, Type, VariableDeclaration,
    VariableId,
};
use crate::context::Context;
use crate::error::Result;
use crate::requirements::{self, Requirement, RequirementScope};

mod action;
mod declarations;
mod description;
mod domain;
mod expressions;
mod problem;

// ──────────────────────────────────────────────
// Parser
// ──────────────────────────────────────────────

pub(crate) struct Parser<'c> {
    ctx: &'c mut Context,
}

/// The declarations a production may refer to.
///
/// Inside a problem, new variables and constants go to the problem; types
/// and predicates always come from the domain.
pub(crate) struct AstContext<'d> {
    pub domain: &'d mut Domain,
    pub problem: Option<&'d mut Problem>,
}

impl<'d> AstContext<'d> {
    pub fn domain(domain: &'d mut Domain) -> Self {
        AstContext {
            domain,
            problem: None,
        }
    }

    pub fn problem(domain: &'d mut Domain, problem: &'d mut Problem) -> Self {
        AstContext {
            domain,
            problem: Some(problem),
        }
    }

    pub fn variables(&self) -> &[VariableDeclaration] {
        match &self.problem {
            Some(problem) => &problem.variables,
            None => &self.domain.variables,
        }
    }

    pub fn add_variable(&mut self, declaration: VariableDeclaration) -> VariableId {
        match self.problem.as_deref_mut() {
            Some(problem) => problem.add_variable(declaration),
            None => self.domain.add_variable(declaration),
        }
    }

    pub fn variable_type_mut(&mut self, id: VariableId) -> &mut Option<Type> {
        match self.problem.as_deref_mut() {
            Some(problem) => &mut problem.variables[id.0].ty,
            None => &mut self.domain.variables[id.0].ty,
        }
    }

    /// Receives new constant declarations: objects in a problem, constants
    /// in a domain.
    pub fn constants_mut(&mut self) -> &mut Vec<ConstantDeclaration> {
        match self.problem.as_deref_mut() {
            Some(problem) => &mut problem.objects,
            None => &mut self.domain.constants,
        }
    }

    /// Problem objects first, then domain constants.
    pub fn find_constant(&self, name: &str) -> Option<ConstantId> {
        let object = self.problem.as_ref().and_then(|problem| {
            problem
                .objects
                .iter()
                .position(|object| object.name == name)
                .map(ConstantId::Problem)
        });
        object.or_else(|| {
            self.domain
                .constants
                .iter()
                .position(|constant| constant.name == name)
                .map(ConstantId::Domain)
        })
    }

    pub fn constant(&self, id: ConstantId) -> Option<&ConstantDeclaration> {
        match id {
            ConstantId::Domain(index) => self.domain.constants.get(index),
            ConstantId::Problem(index) => self
                .problem
                .as_ref()
                .and_then(|problem| problem.objects.get(index)),
        }
    }

    pub fn requirement_scope(&mut self) -> RequirementScope<'_> {
        RequirementScope {
            domain: &mut self.domain.requirements,
            problem: self
                .problem
                .as_deref_mut()
                .map(|problem| &mut problem.requirements),
        }
    }
}

impl<'c> Parser<'c> {
    pub fn new(ctx: &'c mut Context) -> Self {
        Parser { ctx }
    }

    fn check_requirement(&mut self, ast: &mut AstContext<'_>, requirement: Requirement) -> Result<()> {
        let mut scope = ast.requirement_scope();
        requirements::check_requirement(self.ctx, &mut scope, requirement)
    }

    /// Reads the name of the section whose `(` was just consumed.
    fn section_name(&mut self) -> Result<String> {
        self.ctx.tokenizer.skip_white_space();
        self.ctx.tokenizer.get_identifier()
    }
}

/// Parses every section read into the context's tokenizer.
pub fn parse_description(context: &mut Context) -> Result<Description> {
    Parser::new(context).parse_description()
}
