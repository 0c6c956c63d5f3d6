use super::{AstContext, Parser};
use crate::ast::{
    AtomicFormula, ConditionalEffect, Effect, Fact, Literal, Precondition, Predicate, PredicateId,
    Term, Unsupported, VariableId,
};
use crate::error::{Error, Result};
use crate::requirements::Requirement;
use crate::scope::Scope;
use crate::signature;

/// A production taking part in a combinator.
type ArgumentParser<'c, T> =
    fn(&mut Parser<'c>, &mut AstContext<'_>, &mut Scope) -> Result<Option<T>>;

const NUMERIC_OPERATORS: &[&str] = &["-", "*", "+", "/", ">", "<", ">=", "<="];

const NUMERIC_EFFECTS: &[&str] = &["=", "assign", "scale-up", "scale-down", "increase", "decrease"];

impl<'c> Parser<'c> {
    // -- Combinators ---------------------------------------------

    /// Matches `(` followed by `keyword` as a whole identifier.
    fn test_opening(&mut self, keyword: &str) -> bool {
        let start = self.ctx.tokenizer.position();
        if self.ctx.tokenizer.test_and_skip("(")
            && self.ctx.tokenizer.test_identifier_and_skip(keyword)
        {
            return true;
        }
        self.ctx.tokenizer.seek(start);
        false
    }

    fn argument_error(&self, keyword: &str) -> Error {
        self.ctx
            .error_here(format!("could not parse argument of “{}” expression", keyword))
    }

    /// `(keyword argument*)`
    fn parse_n_ary<T>(
        &mut self,
        ast: &mut AstContext<'_>,
        scope: &mut Scope,
        keyword: &str,
        requirement: Option<Requirement>,
        parse_argument: ArgumentParser<'c, T>,
    ) -> Result<Option<Vec<T>>> {
        if !self.test_opening(keyword) {
            return Ok(None);
        }
        if let Some(requirement) = requirement {
            self.check_requirement(ast, requirement)?;
        }

        let mut arguments = Vec::new();
        loop {
            self.ctx.tokenizer.skip_white_space();
            if self.ctx.tokenizer.current_character()? == ')' {
                break;
            }
            match parse_argument(self, ast, scope)? {
                Some(argument) => arguments.push(argument),
                None => return Err(self.argument_error(keyword)),
            }
        }

        if arguments.is_empty() {
            self.ctx
                .warn_here(format!("“{}” expressions should not be empty", keyword))?;
        }
        self.ctx.tokenizer.expect(")")?;
        Ok(Some(arguments))
    }

    /// `(keyword left right)`
    fn parse_binary<L, R>(
        &mut self,
        ast: &mut AstContext<'_>,
        scope: &mut Scope,
        keyword: &str,
        requirement: Option<Requirement>,
        parse_left: ArgumentParser<'c, L>,
        parse_right: ArgumentParser<'c, R>,
    ) -> Result<Option<(L, R)>> {
        if !self.test_opening(keyword) {
            return Ok(None);
        }
        if let Some(requirement) = requirement {
            self.check_requirement(ast, requirement)?;
        }

        let left = parse_left(self, ast, scope)?.ok_or_else(|| self.argument_error(keyword))?;
        let right = parse_right(self, ast, scope)?.ok_or_else(|| self.argument_error(keyword))?;
        self.ctx.tokenizer.expect(")")?;
        Ok(Some((left, right)))
    }

    /// `(keyword (variable declarations) body)`
    fn parse_quantified<T>(
        &mut self,
        ast: &mut AstContext<'_>,
        scope: &mut Scope,
        keyword: &str,
        requirement: Option<Requirement>,
        parse_argument: ArgumentParser<'c, T>,
    ) -> Result<Option<(Vec<VariableId>, T)>> {
        if !self.test_opening(keyword) {
            return Ok(None);
        }
        if let Some(requirement) = requirement {
            self.check_requirement(ast, requirement)?;
        }

        self.ctx.tokenizer.expect("(")?;
        let parameters = self.parse_variable_declarations(ast)?;
        self.ctx.tokenizer.expect(")")?;

        scope.push(parameters.clone());
        let body = parse_argument(self, ast, scope)?;
        scope.pop();

        let body = body.ok_or_else(|| self.argument_error(keyword))?;
        self.ctx.tokenizer.expect(")")?;
        Ok(Some((parameters, body)))
    }

    /// `(not argument)`
    fn parse_not<T>(
        &mut self,
        ast: &mut AstContext<'_>,
        scope: &mut Scope,
        parse_argument: ArgumentParser<'c, T>,
    ) -> Result<Option<T>> {
        if !self.test_opening("not") {
            return Ok(None);
        }
        let argument = parse_argument(self, ast, scope)?.ok_or_else(|| self.argument_error("not"))?;
        self.ctx.tokenizer.expect(")")?;
        Ok(Some(argument))
    }

    /// Skips a whole parenthesized expression and keeps its keyword.
    pub(super) fn parse_unsupported(&mut self) -> Result<Unsupported> {
        let start = self.ctx.tokenizer.position();
        self.ctx.tokenizer.expect("(")?;
        self.ctx.tokenizer.skip_white_space();
        let location = self.ctx.tokenizer.location();
        let keyword = self.ctx.tokenizer.get_identifier()?;
        self.ctx.warn(
            location.clone(),
            format!(
                "expression type “{}” currently unsupported in this context, substituting it with placeholder",
                keyword
            ),
        )?;
        self.ctx.tokenizer.skip_section()?;
        let text = self.ctx.tokenizer.text(start, self.ctx.tokenizer.position());
        Ok(Unsupported {
            keyword,
            text: text.split_whitespace().collect::<Vec<_>>().join(" "),
            location,
        })
    }

    /// True if the expression at the cursor opens with one of `keywords`.
    fn test_keywords(&mut self, keywords: &[&str]) -> bool {
        let start = self.ctx.tokenizer.position();
        let found = self.ctx.tokenizer.test_and_skip("(")
            && keywords
                .iter()
                .any(|keyword| self.ctx.tokenizer.test_identifier_and_return(keyword));
        self.ctx.tokenizer.seek(start);
        found
    }

    /// Error for an expression no alternative accepted, naming its keyword.
    fn unknown_expression(&mut self, position: usize, context: &str) -> Error {
        let tokenizer = &mut self.ctx.tokenizer;
        tokenizer.seek(position);
        let location = tokenizer.location();
        let keyword = if tokenizer.test_and_skip("(") {
            tokenizer.get_identifier().unwrap_or_default()
        } else {
            String::new()
        };
        tokenizer.seek(position);
        Error::parser(
            location,
            format!(
                "expression type “{}” unknown or not allowed in {}",
                keyword, context
            ),
        )
    }

    // -- Terms and atomic formulas -------------------------------

    fn parse_constant_term(&mut self, ast: &AstContext<'_>) -> Option<Term> {
        let start = self.ctx.tokenizer.position();
        let found = self
            .ctx
            .tokenizer
            .get_identifier()
            .ok()
            .and_then(|name| ast.find_constant(&name));
        if found.is_none() {
            self.ctx.tokenizer.seek(start);
        }
        found.map(Term::Constant)
    }

    /// `(name term*)` resolved against the domain's predicate declarations.
    pub(super) fn parse_predicate(
        &mut self,
        ast: &mut AstContext<'_>,
        scope: &mut Scope,
    ) -> Result<Option<Predicate>> {
        self.ctx.tokenizer.skip_white_space();
        let start = self.ctx.tokenizer.position();
        if !self.ctx.tokenizer.test_and_skip("(") {
            return Ok(None);
        }
        let name = match self.ctx.tokenizer.get_identifier() {
            Ok(name) => name,
            Err(_) => {
                self.ctx.tokenizer.seek(start);
                return Ok(None);
            }
        };

        let mut arguments = Vec::new();
        loop {
            self.ctx.tokenizer.skip_white_space();
            if self.ctx.tokenizer.current_character()? == ')' {
                break;
            }

            if self.ctx.tokenizer.test_and_skip("?") {
                let location = self.ctx.tokenizer.location();
                let variable = self.ctx.tokenizer.get_identifier()?;
                match scope.find_variable_declaration(&variable, ast.variables()) {
                    Some(id) => arguments.push(Term::Variable(id)),
                    None => {
                        return Err(Error::parser(
                            location,
                            format!("undeclared variable “?{}”", variable),
                        ))
                    }
                }
                continue;
            }

            match self.parse_constant_term(ast) {
                Some(constant) => arguments.push(constant),
                None => {
                    self.ctx.tokenizer.seek(start);
                    return Ok(None);
                }
            }
        }

        let declaration = match self.find_predicate_declaration(ast, &name, &arguments) {
            Some(declaration) => declaration,
            None => {
                let arity_mismatch = ast.domain.predicates.iter().any(|p| p.name == name)
                    && !ast
                        .domain
                        .predicates
                        .iter()
                        .any(|p| p.name == name && p.parameters.len() == arguments.len());
                let location = self.ctx.tokenizer.location_at(start);
                return Err(Error::parser(
                    location,
                    format!(
                        "no matching declaration found for predicate “{}”{}",
                        name,
                        if arity_mismatch { " (arity mismatch)" } else { "" }
                    ),
                ));
            }
        };

        self.ctx.tokenizer.expect(")")?;
        Ok(Some(Predicate {
            declaration,
            arguments,
        }))
    }

    /// First declaration in order whose signature accepts the arguments.
    ///
    /// Overlapping declarations are not an error; later ones are only
    /// reached by arguments the earlier ones reject.
    fn find_predicate_declaration(
        &self,
        ast: &AstContext<'_>,
        name: &str,
        arguments: &[Term],
    ) -> Option<PredicateId> {
        let argument_types: Vec<_> = arguments
            .iter()
            .map(|argument| match argument {
                Term::Variable(id) => ast.variables()[id.0].ty.as_ref(),
                Term::Constant(id) => ast.constant(*id).and_then(|c| c.ty.as_ref()),
            })
            .collect();

        ast.domain
            .predicates
            .iter()
            .position(|declaration| {
                signature::matches(&*ast.domain, name, &argument_types, declaration)
            })
            .map(PredicateId)
    }

    pub(super) fn parse_atomic_formula(
        &mut self,
        ast: &mut AstContext<'_>,
        scope: &mut Scope,
    ) -> Result<Option<AtomicFormula>> {
        self.ctx.tokenizer.skip_white_space();
        if self.test_keywords(&["="]) {
            return self.parse_unsupported().map(|u| Some(AtomicFormula::Unsupported(u)));
        }
        Ok(self
            .parse_predicate(ast, scope)?
            .map(AtomicFormula::Predicate))
    }

    // -- Preconditions -------------------------------------------

    pub(super) fn parse_precondition(
        &mut self,
        ast: &mut AstContext<'_>,
        scope: &mut Scope,
    ) -> Result<Option<Precondition>> {
        self.ctx.tokenizer.skip_white_space();
        let start = self.ctx.tokenizer.position();

        if self.test_keywords(&["preference"]) {
            let unsupported = self.parse_unsupported()?;
            return Ok(Some(Precondition::Atomic(AtomicFormula::Unsupported(
                unsupported,
            ))));
        }

        if let Some(arguments) =
            self.parse_n_ary(ast, scope, "and", None, Self::parse_precondition)?
        {
            return Ok(Some(Precondition::And(arguments)));
        }
        if let Some((parameters, body)) = self.parse_quantified(
            ast,
            scope,
            "forall",
            Some(Requirement::UniversalPreconditions),
            Self::parse_precondition,
        )? {
            return Ok(Some(Precondition::ForAll(parameters, Box::new(body))));
        }

        self.ctx.tokenizer.seek(start);
        self.parse_precondition_body(ast, scope)
    }

    fn parse_precondition_body(
        &mut self,
        ast: &mut AstContext<'_>,
        scope: &mut Scope,
    ) -> Result<Option<Precondition>> {
        self.ctx.tokenizer.skip_white_space();
        let start = self.ctx.tokenizer.position();
        self.ctx.tokenizer.expect("(")?;
        self.ctx.tokenizer.seek(start);

        if self.test_keywords(NUMERIC_OPERATORS) {
            let unsupported = self.parse_unsupported()?;
            return Ok(Some(Precondition::Atomic(AtomicFormula::Unsupported(
                unsupported,
            ))));
        }

        if let Some(arguments) =
            self.parse_n_ary(ast, scope, "and", None, Self::parse_precondition)?
        {
            return Ok(Some(Precondition::And(arguments)));
        }
        if let Some(arguments) = self.parse_n_ary(
            ast,
            scope,
            "or",
            Some(Requirement::DisjunctivePreconditions),
            Self::parse_precondition,
        )? {
            return Ok(Some(Precondition::Or(arguments)));
        }
        if let Some((parameters, body)) = self.parse_quantified(
            ast,
            scope,
            "exists",
            Some(Requirement::ExistentialPreconditions),
            Self::parse_precondition,
        )? {
            return Ok(Some(Precondition::Exists(parameters, Box::new(body))));
        }
        if let Some((parameters, body)) = self.parse_quantified(
            ast,
            scope,
            "forall",
            Some(Requirement::UniversalPreconditions),
            Self::parse_precondition,
        )? {
            return Ok(Some(Precondition::ForAll(parameters, Box::new(body))));
        }
        if let Some(argument) = self.parse_not(ast, scope, Self::parse_precondition)? {
            return Ok(Some(Precondition::Not(Box::new(argument))));
        }
        if let Some((left, right)) = self.parse_binary(
            ast,
            scope,
            "imply",
            Some(Requirement::DisjunctivePreconditions),
            Self::parse_precondition,
            Self::parse_precondition,
        )? {
            return Ok(Some(Precondition::Imply(Box::new(left), Box::new(right))));
        }
        if let Some(atomic) = self.parse_atomic_formula(ast, scope)? {
            return Ok(Some(Precondition::Atomic(atomic)));
        }

        Err(self.unknown_expression(start, "precondition body"))
    }

    // -- Effects -------------------------------------------------

    pub(super) fn parse_effect(
        &mut self,
        ast: &mut AstContext<'_>,
        scope: &mut Scope,
    ) -> Result<Option<Effect>> {
        self.ctx.tokenizer.skip_white_space();
        let start = self.ctx.tokenizer.position();

        if let Some(arguments) = self.parse_n_ary(ast, scope, "and", None, Self::parse_effect)? {
            return Ok(Some(Effect::And(arguments)));
        }
        if let Some((parameters, body)) =
            self.parse_quantified(ast, scope, "forall", None, Self::parse_effect)?
        {
            return Ok(Some(Effect::ForAll(parameters, Box::new(body))));
        }
        if let Some((condition, effect)) = self.parse_binary(
            ast,
            scope,
            "when",
            Some(Requirement::ConditionalEffects),
            Self::parse_precondition,
            Self::parse_conditional_effect,
        )? {
            return Ok(Some(Effect::When(condition, effect)));
        }

        self.ctx.tokenizer.seek(start);
        Ok(self.parse_effect_body(ast, scope)?.map(Effect::Literal))
    }

    fn parse_effect_body(
        &mut self,
        ast: &mut AstContext<'_>,
        scope: &mut Scope,
    ) -> Result<Option<Literal>> {
        self.parse_literal(ast, scope, "effect body")
    }

    fn parse_conditional_effect(
        &mut self,
        ast: &mut AstContext<'_>,
        scope: &mut Scope,
    ) -> Result<Option<ConditionalEffect>> {
        self.ctx.tokenizer.skip_white_space();
        let start = self.ctx.tokenizer.position();

        if let Some(literals) =
            self.parse_n_ary(ast, scope, "and", None, Self::parse_conditional_effect_body)?
        {
            return Ok(Some(ConditionalEffect::And(literals)));
        }

        self.ctx.tokenizer.seek(start);
        Ok(self
            .parse_conditional_effect_body(ast, scope)?
            .map(ConditionalEffect::Literal))
    }

    fn parse_conditional_effect_body(
        &mut self,
        ast: &mut AstContext<'_>,
        scope: &mut Scope,
    ) -> Result<Option<Literal>> {
        self.parse_literal(ast, scope, "conditional effect body")
    }

    /// Numeric effect, `(not atomic)` or atomic, in that order.
    fn parse_literal(
        &mut self,
        ast: &mut AstContext<'_>,
        scope: &mut Scope,
        context: &str,
    ) -> Result<Option<Literal>> {
        self.ctx.tokenizer.skip_white_space();
        let start = self.ctx.tokenizer.position();
        self.ctx.tokenizer.expect("(")?;
        self.ctx.tokenizer.seek(start);

        if self.test_keywords(NUMERIC_EFFECTS) {
            let unsupported = self.parse_unsupported()?;
            return Ok(Some(Literal::Atomic(AtomicFormula::Unsupported(unsupported))));
        }
        if let Some(atomic) = self.parse_not(ast, scope, Self::parse_atomic_formula)? {
            return Ok(Some(Literal::Not(atomic)));
        }
        if let Some(atomic) = self.parse_atomic_formula(ast, scope)? {
            return Ok(Some(Literal::Atomic(atomic)));
        }

        Err(self.unknown_expression(start, context))
    }

    // -- Facts ---------------------------------------------------

    /// An initial state entry. `None` if it is none of the known forms.
    pub(super) fn parse_fact(
        &mut self,
        ast: &mut AstContext<'_>,
        scope: &mut Scope,
    ) -> Result<Option<Fact>> {
        self.ctx.tokenizer.skip_white_space();

        if let Some(atomic) = self.parse_not(ast, scope, Self::parse_atomic_formula)? {
            return Ok(Some(Literal::Not(atomic)));
        }
        if let Some(atomic) = self.parse_atomic_formula(ast, scope)? {
            return Ok(Some(Literal::Atomic(atomic)));
        }
        // Timed initial literal
        if self.test_keywords(&["at"]) {
            let unsupported = self.parse_unsupported()?;
            return Ok(Some(Literal::Atomic(AtomicFormula::Unsupported(unsupported))));
        }

        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing::{compatible, context};
    use super::super::{AstContext, Parser};
    use crate::ast::*;
    use crate::requirements::{compute_derived_requirements, Requirement};
    use crate::scope::Scope;

    // (on ?x ?y) (clear ?x) (handempty), constants a b
    fn blocks(requirements: &[Requirement]) -> Domain {
        let mut domain = Domain::new("blocks");
        domain.requirements = requirements.to_vec();
        compute_derived_requirements(&mut domain.requirements);
        let x = domain.add_variable(VariableDeclaration::new("x"));
        let y = domain.add_variable(VariableDeclaration::new("y"));
        let z = domain.add_variable(VariableDeclaration::new("z"));
        domain.predicates.push(PredicateDeclaration {
            name: "on".into(),
            parameters: vec![x, y],
        });
        domain.predicates.push(PredicateDeclaration {
            name: "clear".into(),
            parameters: vec![z],
        });
        domain.predicates.push(PredicateDeclaration {
            name: "handempty".into(),
            parameters: vec![],
        });
        domain.constants.push(ConstantDeclaration::new("a"));
        domain.constants.push(ConstantDeclaration::new("b"));
        domain
    }

    fn precondition(
        domain: &mut Domain,
        text: &str,
        compatibility: bool,
    ) -> crate::error::Result<Option<Precondition>> {
        let mut ctx = if compatibility { compatible(text) } else { context(text) };
        let parameter = domain.add_variable(VariableDeclaration::new("p"));
        let mut scope = Scope::new();
        scope.push(vec![parameter]);
        let mut ast = AstContext::domain(domain);
        Parser::new(&mut ctx).parse_precondition(&mut ast, &mut scope)
    }

    fn predicate(declaration: usize, arguments: Vec<Term>) -> Precondition {
        Precondition::Atomic(AtomicFormula::Predicate(Predicate {
            declaration: PredicateId(declaration),
            arguments,
        }))
    }

    #[test]
    fn conjunctions_of_predicates() {
        let mut domain = blocks(&[]);
        let parsed = precondition(&mut domain, "(and (on ?p a) (handempty))", false)
            .unwrap()
            .unwrap();
        let p = VariableId(3);
        assert_eq!(
            parsed,
            Precondition::And(vec![
                predicate(0, vec![Term::Variable(p), Term::Constant(ConstantId::Domain(0))]),
                predicate(2, vec![]),
            ])
        );
    }

    #[test]
    fn quantifiers_push_a_scope() {
        let mut domain = blocks(&[Requirement::Adl]);
        let parsed = precondition(
            &mut domain,
            "(forall (?b) (imply (on ?b ?p) (exists (?c) (on ?c ?b))))",
            false,
        )
        .unwrap()
        .unwrap();
        let Precondition::ForAll(parameters, body) = parsed else {
            panic!("expected forall");
        };
        assert_eq!(domain.variable(parameters[0]).name, "b");
        assert!(matches!(*body, Precondition::Imply(_, _)));
    }

    #[test]
    fn forall_needs_universal_preconditions() {
        let mut domain = blocks(&[Requirement::Typing]);
        let error = precondition(&mut domain, "(forall (?b) (clear ?b))", false).unwrap_err();
        assert_eq!(
            error.message(),
            "requirement “universal-preconditions” used but never declared"
        );
    }

    #[test]
    fn disjunction_is_added_in_compatibility_mode() {
        let mut domain = blocks(&[]);
        let parsed = precondition(&mut domain, "(or (clear a) (clear b))", true).unwrap();
        assert!(matches!(parsed, Some(Precondition::Or(_))));
        assert!(domain.has_requirement(Requirement::DisjunctivePreconditions));
    }

    #[test]
    fn undeclared_variables_are_fatal() {
        let mut domain = blocks(&[]);
        let error = precondition(&mut domain, "(clear ?q)", false).unwrap_err();
        assert_eq!(error.message(), "undeclared variable “?q”");
    }

    #[test]
    fn arity_mismatch_is_reported() {
        let mut domain = blocks(&[]);
        let error = precondition(&mut domain, "(on a b a)", false).unwrap_err();
        assert_eq!(
            error.message(),
            "no matching declaration found for predicate “on” (arity mismatch)"
        );

        let error = precondition(&mut domain, "(under a b)", false).unwrap_err();
        assert_eq!(
            error.message(),
            "no matching declaration found for predicate “under”"
        );
    }

    #[test]
    fn overlapping_declarations_resolve_to_the_first() {
        let description = super::super::testing::parse(
            "(define (domain d) (:requirements :typing) (:types a b)
               (:constants x - a y - b)
               (:predicates (p ?v - (either a b)) (p ?v - a))
               (:action act :precondition (and (p x) (p y)) :effect (p x)))",
        )
        .unwrap();
        let action = &description.domain.actions[0];
        let Some(Precondition::And(arguments)) = &action.precondition else {
            panic!("expected a conjunction");
        };
        for argument in arguments {
            let Precondition::Atomic(AtomicFormula::Predicate(predicate)) = argument else {
                panic!("expected a predicate");
            };
            assert_eq!(predicate.declaration, PredicateId(0));
        }
    }

    #[test]
    fn unknown_keywords_are_named() {
        let mut domain = blocks(&[]);
        let error = precondition(&mut domain, "(on a (b))", false).unwrap_err();
        assert_eq!(
            error.message(),
            "expression type “on” unknown or not allowed in precondition body"
        );
    }

    #[test]
    fn unsupported_expressions_become_placeholders() {
        let mut domain = blocks(&[]);
        let parsed = precondition(&mut domain, "(and (= ?p a) (> (f) 2) (clear a))", false)
            .unwrap()
            .unwrap();
        let Precondition::And(arguments) = parsed else {
            panic!("expected and");
        };
        let keywords: Vec<_> = arguments
            .iter()
            .filter_map(|argument| match argument {
                Precondition::Atomic(AtomicFormula::Unsupported(unsupported)) => {
                    Some(unsupported.keyword.as_str())
                }
                _ => None,
            })
            .collect();
        assert_eq!(keywords, ["=", ">"]);
        assert_eq!(arguments.len(), 3);

        let Precondition::Atomic(AtomicFormula::Unsupported(comparison)) = &arguments[1] else {
            panic!("expected a placeholder");
        };
        assert_eq!(comparison.text, "(> (f) 2)");
    }

    #[test]
    fn failed_predicate_parse_restores_the_cursor() {
        let mut domain = blocks(&[]);
        let mut ctx = context("  (clear (nested))");
        let mut scope = Scope::new();
        let mut ast = AstContext::domain(&mut domain);
        let mut parser = Parser::new(&mut ctx);
        assert!(parser.parse_predicate(&mut ast, &mut scope).unwrap().is_none());
        assert_eq!(ctx.tokenizer.position(), 2);
    }

    #[test]
    fn empty_conjunctions_warn() {
        let mut domain = blocks(&[]);
        let mut ctx = context("(and)").with_warnings_as_errors(true);
        let mut scope = Scope::new();
        let mut ast = AstContext::domain(&mut domain);
        let error = Parser::new(&mut ctx)
            .parse_precondition(&mut ast, &mut scope)
            .unwrap_err();
        assert_eq!(error.message(), "“and” expressions should not be empty");
    }

    #[test]
    fn effects_with_conditions() {
        let mut domain = blocks(&[Requirement::ConditionalEffects]);
        let mut ctx = context(
            "(and (not (handempty)) (forall (?b) (when (on ?b a) (and (clear ?b) (not (on ?b a))))) (increase (cost) 1))",
        );
        let mut scope = Scope::new();
        let mut ast = AstContext::domain(&mut domain);
        let effect = Parser::new(&mut ctx)
            .parse_effect(&mut ast, &mut scope)
            .unwrap()
            .unwrap();

        let Effect::And(effects) = effect else {
            panic!("expected and");
        };
        assert!(matches!(effects[0], Effect::Literal(Literal::Not(_))));
        let Effect::ForAll(_, body) = &effects[1] else {
            panic!("expected forall");
        };
        assert!(matches!(
            **body,
            Effect::When(Precondition::Atomic(_), ConditionalEffect::And(ref literals)) if literals.len() == 2
        ));
        assert!(matches!(
            effects[2],
            Effect::Literal(Literal::Atomic(AtomicFormula::Unsupported(_)))
        ));
    }

    #[test]
    fn when_needs_conditional_effects() {
        let mut domain = blocks(&[]);
        let mut ctx = context("(when (clear a) (handempty))");
        let mut scope = Scope::new();
        let mut ast = AstContext::domain(&mut domain);
        let error = Parser::new(&mut ctx)
            .parse_effect(&mut ast, &mut scope)
            .unwrap_err();
        assert_eq!(
            error.message(),
            "requirement “conditional-effects” used but never declared"
        );
    }

    #[test]
    fn disjunctive_effects_are_rejected() {
        let mut domain = blocks(&[Requirement::Adl]);
        let mut ctx = context("(or (clear a) (handempty))");
        let mut scope = Scope::new();
        let mut ast = AstContext::domain(&mut domain);
        let error = Parser::new(&mut ctx)
            .parse_effect(&mut ast, &mut scope)
            .unwrap_err();
        assert_eq!(
            error.message(),
            "expression type “or” unknown or not allowed in effect body"
        );
    }

    #[test]
    fn facts_and_timed_literals() {
        let mut domain = blocks(&[]);
        let mut ctx = context("(not (clear a)) (at 10 (clear b)) (on a b)");
        let mut scope = Scope::new();
        let mut ast = AstContext::domain(&mut domain);
        let mut parser = Parser::new(&mut ctx);

        let negated = parser.parse_fact(&mut ast, &mut scope).unwrap().unwrap();
        assert!(matches!(negated, Literal::Not(AtomicFormula::Predicate(_))));
        let timed = parser.parse_fact(&mut ast, &mut scope).unwrap().unwrap();
        assert!(
            matches!(timed, Literal::Atomic(AtomicFormula::Unsupported(ref u)) if u.keyword == "at")
        );
        let plain = parser.parse_fact(&mut ast, &mut scope).unwrap().unwrap();
        assert!(matches!(plain, Literal::Atomic(AtomicFormula::Predicate(_))));
    }
}
