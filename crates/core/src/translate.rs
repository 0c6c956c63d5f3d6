//! Emits a normalized description as ASP facts and rules.
//!
//! Every identifier is escaped with [`escape_asp`]. Variables are printed as
//! `X1`, `X2`, … numbered per rule group: all rules produced for one action
//! share a numbering, each derived predicate has its own.

use std::collections::HashMap;
use std::fmt::Write;

use crate::ast::{ConstantDeclaration, Type, VariableDeclaration};
use crate::error::{Error, Result};
use crate::escape::escape_asp;
use crate::normalized::{
    Action, AtomicFormula, ConditionalEffect, DerivedPredicateDeclaration, DerivedPredicateUse,
    Description, Domain, Effect, Literal, Precondition, Predicate, Problem, Term, VariableId,
};

pub fn translate(description: &Description) -> Result<String> {
    let mut translator = Translator::new(description);
    translator.translate()?;
    Ok(translator.output)
}

/// Assigns `X<n>` placeholders to variables in order of first use.
#[derive(Debug, Default)]
pub struct VariableIdMap {
    ids: HashMap<VariableId, usize>,
}

impl VariableIdMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn id(&mut self, variable: VariableId) -> usize {
        let next = self.ids.len() + 1;
        *self.ids.entry(variable).or_insert(next)
    }

    pub fn placeholder(&mut self, variable: VariableId) -> String {
        format!("X{}", self.id(variable))
    }
}

// ──────────────────────────────────────────────
// Term rendering
// ──────────────────────────────────────────────

/// `name` or `(name, a1, a2, …)`.
fn compound(name: &str, arguments: &[String]) -> String {
    if arguments.is_empty() {
        return name.to_owned();
    }
    format!("({}, {})", name, arguments.join(", "))
}

fn truth_value(literal: &Literal) -> &'static str {
    if literal.is_negated() {
        "false"
    } else {
        "true"
    }
}

fn rule(head: &str, body: &[String]) -> String {
    if body.is_empty() {
        format!("{}.", head)
    } else {
        format!("{} :- {}.", head, body.join(", "))
    }
}

struct Translator<'d> {
    description: &'d Description,
    output: String,
    conditional_effects: usize,
}

impl<'d> Translator<'d> {
    fn new(description: &'d Description) -> Self {
        Translator {
            description,
            output: String::new(),
            conditional_effects: 0,
        }
    }

    fn domain(&self) -> &'d Domain {
        &self.description.domain
    }

    fn translate(&mut self) -> Result<()> {
        self.translate_domain()?;
        let description = self.description;
        if let Some(problem) = &description.problem {
            writeln!(self.output)?;
            self.translate_problem(problem)?;
        }
        Ok(())
    }

    // -- Terms ---------------------------------------------------

    fn type_term(&self, ty: Option<&Type>) -> Result<String> {
        match ty {
            None => Ok("object".to_owned()),
            Some(Type::Primitive(id)) => Ok(escape_asp(self.domain().type_name(*id)).into_owned()),
            Some(Type::Either(_)) => Err(Error::translator("only primitive types supported currently")),
        }
    }

    /// `has(X<n>, type(t))` for each parameter.
    fn typing_body(
        &self,
        variables: &[VariableDeclaration],
        parameters: &[VariableId],
        ids: &mut VariableIdMap,
    ) -> Result<Vec<String>> {
        parameters
            .iter()
            .map(|&parameter| -> Result<String> {
                let ty = self.type_term(variables[parameter.0].ty.as_ref())?;
                Ok(format!("has({}, type({}))", ids.placeholder(parameter), ty))
            })
            .collect()
    }

    fn term(&self, term: Term, ids: &mut VariableIdMap) -> Result<String> {
        match term {
            Term::Variable(variable) => Ok(ids.placeholder(variable)),
            Term::Constant(id) => {
                let constant = self
                    .description
                    .constant(id)
                    .ok_or_else(|| Error::translator("reference to undeclared constant"))?;
                Ok(format!("constant({})", escape_asp(&constant.name)))
            }
        }
    }

    fn arguments(&self, arguments: &[Term], ids: &mut VariableIdMap) -> Result<Vec<String>> {
        arguments.iter().map(|&argument| self.term(argument, ids)).collect()
    }

    fn predicate_term(&self, predicate: &Predicate, ids: &mut VariableIdMap) -> Result<String> {
        let name = escape_asp(&self.domain().predicate(predicate.declaration).name);
        let arguments = self.arguments(&predicate.arguments, ids)?;
        Ok(compound(&name, &arguments))
    }

    fn derived_predicate_term(&self, usage: &DerivedPredicateUse, ids: &mut VariableIdMap) -> Result<String> {
        let arguments = self.arguments(&usage.arguments, ids)?;
        Ok(compound(&usage.id.to_string(), &arguments))
    }

    fn literal(&self, literal: &Literal, ids: &mut VariableIdMap) -> Result<String> {
        let value = truth_value(literal);
        match literal.atomic() {
            AtomicFormula::Predicate(predicate) => {
                let term = self.predicate_term(predicate, ids)?;
                Ok(format!("variable({}), value({}, {})", term, term, value))
            }
            AtomicFormula::DerivedPredicate(usage) => {
                let term = self.derived_predicate_term(usage, ids)?;
                Ok(format!(
                    "derivedVariable({}), value(derivedVariable({}), {})",
                    term, term, value
                ))
            }
        }
    }

    /// A literal over a plain predicate. `context` names the place that
    /// forbids derived predicates.
    fn predicate_literal(&self, literal: &Literal, ids: &mut VariableIdMap, context: &str) -> Result<String> {
        match literal.atomic() {
            AtomicFormula::Predicate(_) => self.literal(literal, ids),
            AtomicFormula::DerivedPredicate(_) => Err(Error::translator(format!(
                "derived predicates should not {}",
                context
            ))),
        }
    }

    // -- Domain --------------------------------------------------

    fn translate_domain(&mut self) -> Result<()> {
        let domain = self.domain();
        log::debug!("translating domain “{}”", domain.name);
        writeln!(self.output, "% domain")?;

        writeln!(self.output)?;
        self.translate_types()?;

        if !domain.constants.is_empty() {
            writeln!(self.output)?;
            self.translate_constants("constants", &domain.constants)?;
        }

        if !domain.predicates.is_empty() {
            writeln!(self.output)?;
            self.translate_predicates()?;
        }

        if !domain.derived_predicates.is_empty() {
            writeln!(self.output)?;
            self.translate_derived_predicates(&domain.derived_predicates, &domain.variables)?;
        }

        if !domain.actions.is_empty() {
            writeln!(self.output)?;
            self.translate_actions()?;
        }
        Ok(())
    }

    fn translate_types(&mut self) -> Result<()> {
        let types = &self.domain().types;
        writeln!(self.output, "% types")?;

        if types.is_empty() {
            writeln!(self.output, "type(type(object)).")?;
            return Ok(());
        }

        for declaration in types {
            let name = escape_asp(&declaration.name);
            writeln!(self.output, "type(type({})).", name)?;
            for &parent in &declaration.parents {
                let parent = escape_asp(self.domain().type_name(parent));
                writeln!(self.output, "inherits(type({}), type({})).", name, parent)?;
            }
        }

        writeln!(self.output)?;
        writeln!(
            self.output,
            "has(X, type(T2)) :- has(X, type(T1)), inherits(type(T1), type(T2))."
        )?;
        Ok(())
    }

    fn translate_constants(&mut self, heading: &str, constants: &[ConstantDeclaration]) -> Result<()> {
        writeln!(self.output, "% {}", heading)?;
        for constant in constants {
            let name = escape_asp(&constant.name);
            let ty = self.type_term(constant.ty.as_ref())?;
            writeln!(self.output, "constant(constant({})).", name)?;
            writeln!(self.output, "has(constant({}), type({})).", name, ty)?;
        }
        Ok(())
    }

    fn translate_predicates(&mut self) -> Result<()> {
        let domain = self.domain();
        writeln!(self.output, "% variables")?;

        for declaration in &domain.predicates {
            let mut ids = VariableIdMap::new();
            let arguments: Vec<_> = declaration
                .parameters
                .iter()
                .map(|&parameter| ids.placeholder(parameter))
                .collect();
            let head = format!("variable({})", compound(&escape_asp(&declaration.name), &arguments));
            let body = self.typing_body(&domain.variables, &declaration.parameters, &mut ids)?;
            writeln!(self.output, "{}", rule(&head, &body))?;
        }

        writeln!(self.output)?;
        writeln!(self.output, "boolean(true).")?;
        writeln!(self.output, "boolean(false).")?;
        writeln!(self.output)?;
        writeln!(
            self.output,
            "contains(variable(X), value(X, B)) :- variable(X), boolean(B)."
        )?;
        Ok(())
    }

    fn translate_derived_predicates(
        &mut self,
        declarations: &[DerivedPredicateDeclaration],
        variables: &[VariableDeclaration],
    ) -> Result<()> {
        writeln!(self.output, "% derived variables")?;

        for declaration in declarations {
            let mut ids = VariableIdMap::new();
            let arguments: Vec<_> = declaration
                .parameters
                .iter()
                .map(|&parameter| ids.placeholder(parameter))
                .collect();
            let term = compound(&declaration.id.to_string(), &arguments);
            let body = self.typing_body(variables, &declaration.parameters, &mut ids)?;
            writeln!(self.output, "{}", rule(&format!("derivedVariable({})", term), &body))?;

            let mut body = vec![format!("derivedVariable({})", term)];
            body.extend(self.typing_body(variables, &declaration.existential_parameters, &mut ids)?);

            for (index, conjunction) in declaration.body.iter().enumerate() {
                for literal in conjunction {
                    let literal = self.literal(literal, &mut ids)?;
                    let head = format!(
                        "derivedPrecondition(derivedVariable({}), disjunct({}), {})",
                        term,
                        index + 1,
                        literal
                    );
                    writeln!(self.output, "{}", rule(&head, &body))?;
                }
            }
        }
        Ok(())
    }

    fn translate_actions(&mut self) -> Result<()> {
        writeln!(self.output, "% actions")?;
        for action in &self.domain().actions {
            self.translate_action(action)?;
        }
        Ok(())
    }

    fn translate_action(&mut self, action: &'d Action) -> Result<()> {
        let domain = self.domain();
        let mut ids = VariableIdMap::new();

        let arguments: Vec<_> = action
            .parameters
            .iter()
            .map(|&parameter| ids.placeholder(parameter))
            .collect();
        let term = compound(&escape_asp(&action.name), &arguments);
        let body = self.typing_body(&domain.variables, &action.parameters, &mut ids)?;
        writeln!(self.output)?;
        writeln!(self.output, "{}", rule(&format!("action(action({}))", term), &body))?;

        let guard = vec![format!("action(action({}))", term)];
        if let Some(precondition) = &action.precondition {
            for literal in precondition.literals() {
                let literal = self.literal(literal, &mut ids)?;
                let head = format!("precondition(action({}), {})", term, literal);
                writeln!(self.output, "{}", rule(&head, &guard))?;
            }
        }

        if let Some(effect) = &action.effect {
            let mut layers = Vec::new();
            self.translate_effect(effect, &term, &mut layers, &mut ids)?;
        }
        Ok(())
    }

    /// Guard of an effect rule: the action plus the typing of every
    /// enclosing `forall`.
    fn effect_guard(
        &self,
        action: &str,
        layers: &[&'d [VariableId]],
        ids: &mut VariableIdMap,
    ) -> Result<Vec<String>> {
        let mut body = vec![format!("action(action({}))", action)];
        for layer in layers {
            body.extend(self.typing_body(&self.domain().variables, layer, ids)?);
        }
        Ok(body)
    }

    fn translate_effect(
        &mut self,
        effect: &'d Effect,
        action: &str,
        layers: &mut Vec<&'d [VariableId]>,
        ids: &mut VariableIdMap,
    ) -> Result<()> {
        match effect {
            Effect::Literal(literal) => {
                let literal = self.predicate_literal(literal, ids, "appear in effects")?;
                let head = format!(
                    "postcondition(action({}), effect(unconditional), {})",
                    action, literal
                );
                let body = self.effect_guard(action, layers, ids)?;
                writeln!(self.output, "{}", rule(&head, &body))?;
            }
            Effect::And(arguments) => {
                for argument in arguments {
                    self.translate_effect(argument, action, layers, ids)?;
                }
            }
            Effect::ForAll(parameters, argument) => {
                layers.push(parameters);
                self.translate_effect(argument, action, layers, ids)?;
                layers.pop();
            }
            Effect::When(condition, conditional) => {
                self.conditional_effects += 1;
                let number = self.conditional_effects;
                self.translate_conditional_effect(number, condition, conditional, action, layers, ids)?;
            }
        }
        Ok(())
    }

    fn translate_conditional_effect(
        &mut self,
        number: usize,
        condition: &Precondition,
        effect: &ConditionalEffect,
        action: &str,
        layers: &[&'d [VariableId]],
        ids: &mut VariableIdMap,
    ) -> Result<()> {
        let body = self.effect_guard(action, layers, ids)?;

        for literal in condition.literals() {
            let literal = self.literal(literal, ids)?;
            let head = format!("precondition(effect({}), {})", number, literal);
            writeln!(self.output, "{}", rule(&head, &body))?;
        }

        for literal in effect.literals() {
            let literal = self.predicate_literal(literal, ids, "appear in effects")?;
            let head = format!(
                "postcondition(action({}), effect({}), {})",
                action, number, literal
            );
            writeln!(self.output, "{}", rule(&head, &body))?;
        }
        Ok(())
    }

    // -- Problem -------------------------------------------------

    fn translate_problem(&mut self, problem: &'d Problem) -> Result<()> {
        log::debug!("translating problem “{}”", problem.name);
        writeln!(self.output, "% problem")?;

        if !problem.objects.is_empty() {
            writeln!(self.output)?;
            self.translate_constants("objects", &problem.objects)?;
        }

        if !problem.derived_predicates.is_empty() {
            writeln!(self.output)?;
            self.translate_derived_predicates(&problem.derived_predicates, &problem.variables)?;
        }

        writeln!(self.output)?;
        self.translate_initial_state(problem)?;

        if let Some(goal) = &problem.goal {
            writeln!(self.output)?;
            self.translate_goal(goal)?;
        }
        Ok(())
    }

    fn translate_initial_state(&mut self, problem: &Problem) -> Result<()> {
        writeln!(self.output, "% initial state")?;
        for fact in &problem.initial_state {
            let mut ids = VariableIdMap::new();
            let literal = self.predicate_literal(fact, &mut ids, "occur in initial state")?;
            writeln!(self.output, "initialState({}).", literal)?;
        }

        writeln!(self.output)?;
        writeln!(
            self.output,
            "initialState(variable(X), value(X, false)) :- variable(X), not initialState(variable(X), value(X, true))."
        )?;
        Ok(())
    }

    fn translate_goal(&mut self, goal: &Precondition) -> Result<()> {
        writeln!(self.output, "% goal")?;
        for literal in goal.literals() {
            let arguments = match literal.atomic() {
                AtomicFormula::Predicate(predicate) => &predicate.arguments,
                AtomicFormula::DerivedPredicate(usage) => &usage.arguments,
            };
            if arguments.iter().any(|argument| matches!(argument, Term::Variable(_))) {
                return Err(Error::translator("goal descriptions must be variable-free"));
            }

            let mut ids = VariableIdMap::new();
            let literal = self.literal(literal, &mut ids)?;
            writeln!(self.output, "goal({}).", literal)?;
        }
        Ok(())
    }
}
