use super::{AstContext, Parser};
use crate::ast::{
    ConstantDeclaration, Domain, PredicateDeclaration, PrimitiveTypeDeclaration, Type, TypeId,
    VariableDeclaration, VariableId,
};
use crate::error::{Error, Result};
use crate::requirements::Requirement;

impl<'c> Parser<'c> {
    // -- Types ---------------------------------------------------

    /// Resolves a type name, declaring `object` on first use.
    pub(super) fn parse_primitive_type(&mut self, domain: &mut Domain) -> Result<TypeId> {
        let tokenizer = &mut self.ctx.tokenizer;
        tokenizer.skip_white_space();
        let location = tokenizer.location();
        let name = tokenizer.get_identifier()?;

        if let Some(id) = domain.find_type(&name) {
            return Ok(id);
        }

        let message = format!("primitive type “{}” used without or before declaration", name);
        if name != "object" {
            if !self.ctx.is_compatibility() {
                return Err(Error::parser(location, message));
            }
            self.ctx
                .warn(location, format!("{}, silently adding declaration", message))?;
        }

        domain.types.push(PrimitiveTypeDeclaration::new(name));
        Ok(TypeId(domain.types.len() - 1))
    }

    /// A primitive type or an `(either …)` expression.
    pub(super) fn parse_type(&mut self, domain: &mut Domain) -> Result<Type> {
        self.ctx.tokenizer.skip_white_space();
        if !self.ctx.tokenizer.test_and_skip("(") {
            return self.parse_primitive_type(domain).map(Type::Primitive);
        }

        if !self.ctx.tokenizer.test_identifier_and_skip("either") {
            return Err(self
                .ctx
                .error_here("expected primitive type or “either” expression"));
        }

        let mut members = Vec::new();
        loop {
            self.ctx.tokenizer.skip_white_space();
            if self.ctx.tokenizer.current_character()? == ')' {
                break;
            }
            let member = self.parse_primitive_type(domain)?;
            if !members.contains(&member) {
                members.push(member);
            }
        }
        if members.is_empty() {
            return Err(self
                .ctx
                .error_here("expected primitive type or “either” expression"));
        }
        self.ctx.tokenizer.expect(")")?;
        Ok(Type::Either(members))
    }

    /// Body of a `:types` section.
    ///
    /// `a b - c` gives `a` and `b` the parent `c`. All names are collected
    /// first so parents may be declared later in the same section.
    pub(super) fn parse_type_declarations(&mut self, domain: &mut Domain) -> Result<()> {
        let start = self.ctx.tokenizer.position();

        let mut declared = Vec::new();
        loop {
            let tokenizer = &mut self.ctx.tokenizer;
            tokenizer.skip_white_space();
            match tokenizer.current_character()? {
                ')' => break,
                '(' => {
                    return Err(self
                        .ctx
                        .error_here("only primitive types are allowed in type section"))
                }
                _ => {}
            }
            let name = tokenizer.get_identifier()?;
            let id = match domain.find_type(&name) {
                Some(id) => id,
                None => {
                    domain.types.push(PrimitiveTypeDeclaration::new(name));
                    TypeId(domain.types.len() - 1)
                }
            };
            declared.push(id);

            tokenizer.skip_white_space();
            if tokenizer.test_identifier_and_skip("-") {
                tokenizer.skip_white_space();
                if tokenizer.current_character()? == '(' {
                    return Err(self
                        .ctx
                        .error_here("only primitive types are allowed in type section"));
                }
                tokenizer.get_identifier()?;
            }
        }

        self.ctx.tokenizer.seek(start);
        let mut pending = Vec::new();
        for id in declared {
            self.ctx.tokenizer.get_identifier()?;
            pending.push(id);
            self.ctx.tokenizer.skip_white_space();
            if !self.ctx.tokenizer.test_identifier_and_skip("-") {
                continue;
            }
            let parent = self.parse_primitive_type(domain)?;
            for child in pending.drain(..) {
                let parents = &mut domain.types[child.0].parents;
                if !parents.contains(&parent) {
                    parents.push(parent);
                }
            }
        }
        Ok(())
    }

    // -- Typed lists ---------------------------------------------

    /// Parses `name… [- type]` groups up to the closing parenthesis.
    ///
    /// `read_name` consumes and registers one name, `assign` types the names
    /// of a group by their index range, `missing` reports an untyped tail.
    fn parse_typed_list(
        &mut self,
        ast: &mut AstContext<'_>,
        mut read_name: impl FnMut(&mut Self, &mut AstContext<'_>) -> Result<()>,
        mut assign: impl FnMut(&mut AstContext<'_>, std::ops::Range<usize>, &Type),
        missing: impl Fn(&AstContext<'_>) -> Option<String>,
    ) -> Result<()> {
        let mut count = 0;
        let mut first_untyped = 0;
        loop {
            self.ctx.tokenizer.skip_white_space();
            if self.ctx.tokenizer.current_character()? == ')' {
                break;
            }
            read_name(self, ast)?;
            count += 1;

            self.ctx.tokenizer.skip_white_space();
            if !self.ctx.tokenizer.test_identifier_and_skip("-") {
                continue;
            }
            self.check_requirement(ast, Requirement::Typing)?;
            let ty = self.parse_type(ast.domain)?;
            assign(ast, first_untyped..count, &ty);
            first_untyped = count;
        }

        if first_untyped < count && !ast.domain.types.is_empty() {
            if let Some(message) = missing(ast) {
                return Err(self.ctx.error_here(message));
            }
        }
        Ok(())
    }

    /// Variable declarations up to the closing parenthesis, added to the
    /// current variable arena.
    pub(super) fn parse_variable_declarations(
        &mut self,
        ast: &mut AstContext<'_>,
    ) -> Result<Vec<VariableId>> {
        let declared = std::cell::RefCell::new(Vec::new());
        self.parse_typed_list(
            ast,
            |parser, ast| {
                let id = parser.parse_variable_declaration(ast)?;
                declared.borrow_mut().push(id);
                Ok(())
            },
            |ast, range, ty| {
                for &id in &declared.borrow()[range] {
                    *ast.variable_type_mut(id) = Some(ty.clone());
                }
            },
            |ast| {
                let &last = declared.borrow().last()?;
                let name = &ast.variables()[last.0].name;
                Some(format!("missing type declaration for variable “?{}”", name))
            },
        )?;
        Ok(declared.into_inner())
    }

    fn parse_variable_declaration(&mut self, ast: &mut AstContext<'_>) -> Result<VariableId> {
        let tokenizer = &mut self.ctx.tokenizer;
        tokenizer.expect("?")?;
        let location = tokenizer.location();
        match tokenizer.get_identifier() {
            Ok(name) if name != "-" => Ok(ast.add_variable(VariableDeclaration::new(name))),
            _ => Err(Error::parser(location, "could not parse variable name")),
        }
    }

    /// Constant declarations up to the closing parenthesis, added to the
    /// domain's constants or the problem's objects.
    pub(super) fn parse_constant_declarations(&mut self, ast: &mut AstContext<'_>) -> Result<()> {
        let start = ast.constants_mut().len();
        self.parse_typed_list(
            ast,
            |parser, ast| {
                parser.ctx.tokenizer.skip_white_space();
                let location = parser.ctx.tokenizer.location();
                let name = parser.ctx.tokenizer.get_identifier()?;
                let constants = ast.constants_mut();
                if constants.iter().any(|constant| constant.name == name) {
                    return Err(Error::parser(
                        location,
                        format!("constant “{}” declared more than once", name),
                    ));
                }
                constants.push(ConstantDeclaration::new(name));
                Ok(())
            },
            |ast, range, ty| {
                let constants = ast.constants_mut();
                for constant in &mut constants[start + range.start..start + range.end] {
                    constant.ty = Some(ty.clone());
                }
            },
            |ast| {
                let constants = match &ast.problem {
                    Some(problem) => &problem.objects,
                    None => &ast.domain.constants,
                };
                let last = constants.last()?;
                Some(format!("missing type declaration for constant “{}”", last.name))
            },
        )
    }

    // -- Predicates ----------------------------------------------

    /// Body of a `:predicates` section.
    pub(super) fn parse_predicate_declarations(&mut self, ast: &mut AstContext<'_>) -> Result<()> {
        loop {
            self.ctx.tokenizer.skip_white_space();
            if self.ctx.tokenizer.current_character()? == ')' {
                return Ok(());
            }
            self.ctx.tokenizer.expect("(")?;
            let name = self.ctx.tokenizer.get_identifier()?;
            let parameters = self.parse_variable_declarations(ast)?;
            self.ctx.tokenizer.expect(")")?;
            ast.domain
                .predicates
                .push(PredicateDeclaration { name, parameters });
        }
    }
}
