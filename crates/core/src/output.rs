//! PDDL pretty printer for parsed and normalized descriptions.
//!
//! Nested expressions are indented with tabs, one argument per line.

use std::fmt::{self, Write};

use crate::ast::{
    self, ConstantDeclaration, ConstantId, PredicateDeclaration, PrimitiveTypeDeclaration, Term,
    Type, VariableDeclaration, VariableId,
};
use crate::error::Result;
use crate::normalized::{self, DerivedPredicateDeclaration};
use crate::requirements::Requirement;

pub fn print_description(description: &ast::Description) -> Result<String> {
    let mut printer = Printer::default();
    let domain = &description.domain;
    let symbols = Symbols {
        types: &domain.types,
        predicates: &domain.predicates,
        variables: &domain.variables,
        constants: &domain.constants,
        objects: &[],
        derived: Vec::new(),
    };
    printer.domain(
        &symbols,
        &domain.name,
        &domain.requirements,
        |printer| {
            for action in &domain.actions {
                printer.newline();
                printer.action(&symbols, action)?;
            }
            Ok(())
        },
    )?;

    if let Some(problem) = &description.problem {
        let symbols = Symbols {
            variables: &problem.variables,
            objects: &problem.objects,
            ..symbols
        };
        printer.output.push_str("\n\n");
        printer.problem(&symbols, problem)?;
    }
    printer.output.push('\n');
    Ok(printer.output)
}

pub fn print_normalized_description(description: &normalized::Description) -> Result<String> {
    let mut printer = Printer::default();
    let domain = &description.domain;
    let problem_derived = description
        .problem
        .iter()
        .flat_map(|problem| problem.derived_predicates.iter());
    let symbols = Symbols {
        types: &domain.types,
        predicates: &domain.predicates,
        variables: &domain.variables,
        constants: &domain.constants,
        objects: &[],
        derived: domain.derived_predicates.iter().chain(problem_derived).collect(),
    };
    printer.domain(
        &symbols,
        &domain.name,
        &domain.requirements,
        |printer| {
            for declaration in &domain.derived_predicates {
                printer.newline();
                printer.derived_predicate_declaration(&symbols, declaration)?;
            }
            for action in &domain.actions {
                printer.newline();
                printer.normalized_action(&symbols, action)?;
            }
            Ok(())
        },
    )?;

    if let Some(problem) = &description.problem {
        let symbols = Symbols {
            variables: &problem.variables,
            objects: &problem.objects,
            ..symbols
        };
        printer.output.push_str("\n\n");
        printer.normalized_problem(&symbols, problem)?;
    }
    printer.output.push('\n');
    Ok(printer.output)
}

/// Declarations visible while printing one domain or problem.
struct Symbols<'d> {
    types: &'d [PrimitiveTypeDeclaration],
    predicates: &'d [PredicateDeclaration],
    variables: &'d [VariableDeclaration],
    constants: &'d [ConstantDeclaration],
    objects: &'d [ConstantDeclaration],
    derived: Vec<&'d DerivedPredicateDeclaration>,
}

impl<'d> Symbols<'d> {
    fn type_name(&self, id: ast::TypeId) -> &'d str {
        &self.types[id.0].name
    }

    fn variable(&self, id: VariableId) -> &'d VariableDeclaration {
        &self.variables[id.0]
    }

    fn constant_name(&self, id: ConstantId) -> &'d str {
        match id {
            ConstantId::Domain(index) => &self.constants[index].name,
            ConstantId::Problem(index) => &self.objects[index].name,
        }
    }

    fn derived_predicate(&self, id: usize) -> Option<&'d DerivedPredicateDeclaration> {
        self.derived.iter().copied().find(|declaration| declaration.id == id)
    }
}

#[derive(Default)]
struct Printer {
    output: String,
    indentation: usize,
}

impl Printer {
    fn newline(&mut self) {
        self.output.push('\n');
        for _ in 0..self.indentation {
            self.output.push('\t');
        }
    }

    fn indented(&mut self, body: impl FnOnce(&mut Self) -> fmt::Result) -> fmt::Result {
        self.indentation += 1;
        let result = body(self);
        self.indentation -= 1;
        result
    }

    /// `(keyword` followed by `body` on the next, deeper indented line.
    fn section(&mut self, keyword: &str, body: impl FnOnce(&mut Self) -> fmt::Result) -> fmt::Result {
        self.newline();
        write!(self.output, "({}", keyword)?;
        self.indented(|printer| {
            printer.newline();
            body(printer)
        })?;
        self.output.push(')');
        Ok(())
    }

    /// Problems always carry an `:init` section, even an empty one.
    fn empty_section(&mut self, keyword: &str) {
        self.newline();
        self.output.push('(');
        self.output.push_str(keyword);
        self.output.push(')');
    }

    fn lines<T>(
        &mut self,
        items: &[T],
        mut print: impl FnMut(&mut Self, &T) -> fmt::Result,
    ) -> fmt::Result {
        for (index, item) in items.iter().enumerate() {
            if index > 0 {
                self.newline();
            }
            print(self, item)?;
        }
        Ok(())
    }

    // -- Declarations --------------------------------------------

    fn ty(&mut self, symbols: &Symbols, ty: &Type) -> fmt::Result {
        match ty {
            Type::Primitive(id) => self.output.push_str(symbols.type_name(*id)),
            Type::Either(ids) => {
                self.output.push_str("(either");
                for &id in ids {
                    write!(self.output, " {}", symbols.type_name(id))?;
                }
                self.output.push(')');
            }
        }
        Ok(())
    }

    fn typed_name(&mut self, symbols: &Symbols, name: &str, ty: Option<&Type>) -> fmt::Result {
        self.output.push_str(name);
        if let Some(ty) = ty {
            self.output.push_str(" - ");
            self.ty(symbols, ty)?;
        }
        Ok(())
    }

    fn variable_declarations(&mut self, symbols: &Symbols, parameters: &[VariableId]) -> fmt::Result {
        for (index, &parameter) in parameters.iter().enumerate() {
            if index > 0 {
                self.output.push(' ');
            }
            let declaration = symbols.variable(parameter);
            self.typed_name(symbols, &format!("?{}", declaration.name), declaration.ty.as_ref())?;
        }
        Ok(())
    }

    fn constant_declarations(&mut self, symbols: &Symbols, constants: &[ConstantDeclaration]) -> fmt::Result {
        self.lines(constants, |printer, constant| {
            printer.typed_name(symbols, &constant.name, constant.ty.as_ref())
        })
    }

    fn domain(
        &mut self,
        symbols: &Symbols,
        name: &str,
        requirements: &[Requirement],
        body: impl FnOnce(&mut Self) -> fmt::Result,
    ) -> fmt::Result {
        write!(self.output, "(define (domain {})", name)?;
        self.indented(|printer| {
            printer.requirements(requirements)?;

            if !symbols.types.is_empty() {
                printer.section(":types", |printer| {
                    printer.lines(symbols.types, |printer, declaration| {
                        if declaration.parents.is_empty() {
                            printer.output.push_str(&declaration.name);
                        }
                        for (index, &parent) in declaration.parents.iter().enumerate() {
                            if index > 0 {
                                printer.newline();
                            }
                            write!(printer.output, "{} - {}", declaration.name, symbols.type_name(parent))?;
                        }
                        Ok(())
                    })
                })?;
            }

            if !symbols.constants.is_empty() {
                printer.section(":constants", |printer| {
                    printer.constant_declarations(symbols, symbols.constants)
                })?;
            }

            if !symbols.predicates.is_empty() {
                printer.section(":predicates", |printer| {
                    printer.lines(symbols.predicates, |printer, declaration| {
                        write!(printer.output, "({}", declaration.name)?;
                        if !declaration.parameters.is_empty() {
                            printer.output.push(' ');
                            printer.variable_declarations(symbols, &declaration.parameters)?;
                        }
                        printer.output.push(')');
                        Ok(())
                    })
                })?;
            }

            body(printer)
        })?;
        self.output.push(')');
        Ok(())
    }

    fn requirements(&mut self, requirements: &[Requirement]) -> fmt::Result {
        if requirements.is_empty() {
            return Ok(());
        }
        self.section(":requirements", |printer| {
            printer.lines(requirements, |printer, requirement| {
                write!(printer.output, ":{}", requirement)
            })
        })
    }

    fn problem_header(
        &mut self,
        symbols: &Symbols,
        name: &str,
        domain_name: &str,
        requirements: &[Requirement],
    ) -> fmt::Result {
        write!(self.output, "(define (problem {})", name)?;
        self.indented(|printer| {
            printer.newline();
            write!(printer.output, "(:domain {})", domain_name)?;
            printer.requirements(requirements)?;
            if !symbols.objects.is_empty() {
                printer.section(":objects", |printer| {
                    printer.constant_declarations(symbols, symbols.objects)
                })?;
            }
            Ok(())
        })
    }

    // -- Shared expression shapes --------------------------------

    fn term(&mut self, symbols: &Symbols, term: Term) {
        match term {
            Term::Variable(id) => {
                self.output.push('?');
                self.output.push_str(&symbols.variable(id).name);
            }
            Term::Constant(id) => self.output.push_str(symbols.constant_name(id)),
        }
    }

    fn compound(&mut self, symbols: &Symbols, name: &str, arguments: &[Term]) {
        self.output.push('(');
        self.output.push_str(name);
        for &argument in arguments {
            self.output.push(' ');
            self.term(symbols, argument);
        }
        self.output.push(')');
    }

    fn predicate(&mut self, symbols: &Symbols, predicate: &ast::Predicate) {
        let name = &symbols.predicates[predicate.declaration.0].name;
        self.compound(symbols, name, &predicate.arguments);
    }

    /// `(keyword` with every argument on its own deeper indented line.
    fn n_ary<T>(
        &mut self,
        keyword: &str,
        arguments: &[T],
        mut print: impl FnMut(&mut Self, &T) -> fmt::Result,
    ) -> fmt::Result {
        write!(self.output, "({}", keyword)?;
        self.indented(|printer| {
            for argument in arguments {
                printer.newline();
                print(printer, argument)?;
            }
            Ok(())
        })?;
        self.output.push(')');
        Ok(())
    }

    fn quantified(
        &mut self,
        symbols: &Symbols,
        keyword: &str,
        parameters: &[VariableId],
        argument: impl FnOnce(&mut Self) -> fmt::Result,
    ) -> fmt::Result {
        write!(self.output, "({}", keyword)?;
        self.indented(|printer| {
            printer.newline();
            printer.output.push('(');
            printer.variable_declarations(symbols, parameters)?;
            printer.output.push(')');
            printer.newline();
            argument(printer)
        })?;
        self.output.push(')');
        Ok(())
    }

    fn action_sections(
        &mut self,
        symbols: &Symbols,
        name: &str,
        parameters: &[VariableId],
        precondition: Option<impl FnOnce(&mut Self) -> fmt::Result>,
        effect: Option<impl FnOnce(&mut Self) -> fmt::Result>,
    ) -> fmt::Result {
        write!(self.output, "(:action {}", name)?;
        self.indented(|printer| {
            if !parameters.is_empty() {
                printer.newline();
                printer.output.push_str(":parameters");
                printer.indented(|printer| {
                    printer.newline();
                    printer.output.push('(');
                    printer.variable_declarations(symbols, parameters)?;
                    printer.output.push(')');
                    Ok(())
                })?;
            }
            if let Some(precondition) = precondition {
                printer.newline();
                printer.output.push_str(":precondition");
                printer.indented(|printer| {
                    printer.newline();
                    precondition(printer)
                })?;
            }
            if let Some(effect) = effect {
                printer.newline();
                printer.output.push_str(":effect");
                printer.indented(|printer| {
                    printer.newline();
                    effect(printer)
                })?;
            }
            Ok(())
        })?;
        self.output.push(')');
        Ok(())
    }

    // -- Parsed expressions --------------------------------------

    fn atomic_formula(&mut self, symbols: &Symbols, atomic: &ast::AtomicFormula) {
        match atomic {
            ast::AtomicFormula::Predicate(predicate) => self.predicate(symbols, predicate),
            ast::AtomicFormula::Unsupported(unsupported) => self.output.push_str(&unsupported.text),
        }
    }

    fn literal(&mut self, symbols: &Symbols, literal: &ast::Literal) {
        match literal {
            ast::Literal::Atomic(atomic) => self.atomic_formula(symbols, atomic),
            ast::Literal::Not(atomic) => {
                self.output.push_str("(not ");
                self.atomic_formula(symbols, atomic);
                self.output.push(')');
            }
        }
    }

    fn precondition(&mut self, symbols: &Symbols, precondition: &ast::Precondition) -> fmt::Result {
        use ast::Precondition::*;
        match precondition {
            Atomic(atomic) => self.atomic_formula(symbols, atomic),
            Not(argument) => {
                self.output.push_str("(not ");
                self.precondition(symbols, argument)?;
                self.output.push(')');
            }
            And(arguments) => self.n_ary("and", arguments, |p, a| p.precondition(symbols, a))?,
            Or(arguments) => self.n_ary("or", arguments, |p, a| p.precondition(symbols, a))?,
            Imply(antecedent, consequent) => {
                let arguments = [antecedent.as_ref(), consequent.as_ref()];
                self.n_ary("imply", &arguments, |p, a| p.precondition(symbols, a))?
            }
            Exists(parameters, argument) => self.quantified(symbols, "exists", parameters, |p| {
                p.precondition(symbols, argument)
            })?,
            ForAll(parameters, argument) => self.quantified(symbols, "forall", parameters, |p| {
                p.precondition(symbols, argument)
            })?,
        }
        Ok(())
    }

    fn conditional_effect(&mut self, symbols: &Symbols, effect: &ast::ConditionalEffect) -> fmt::Result {
        match effect {
            ast::ConditionalEffect::Literal(literal) => self.literal(symbols, literal),
            ast::ConditionalEffect::And(literals) => self.n_ary("and", literals, |p, l| {
                p.literal(symbols, l);
                Ok(())
            })?,
        }
        Ok(())
    }

    fn effect(&mut self, symbols: &Symbols, effect: &ast::Effect) -> fmt::Result {
        match effect {
            ast::Effect::Literal(literal) => self.literal(symbols, literal),
            ast::Effect::And(arguments) => self.n_ary("and", arguments, |p, a| p.effect(symbols, a))?,
            ast::Effect::ForAll(parameters, argument) => {
                self.quantified(symbols, "forall", parameters, |p| p.effect(symbols, argument))?
            }
            ast::Effect::When(condition, conditional) => {
                self.output.push_str("(when");
                self.indented(|p| {
                    p.newline();
                    p.precondition(symbols, condition)?;
                    p.newline();
                    p.conditional_effect(symbols, conditional)
                })?;
                self.output.push(')');
            }
        }
        Ok(())
    }

    fn action(&mut self, symbols: &Symbols, action: &ast::Action) -> fmt::Result {
        self.action_sections(
            symbols,
            &action.name,
            &action.parameters,
            action
                .precondition
                .as_ref()
                .map(|precondition| move |p: &mut Self| p.precondition(symbols, precondition)),
            action
                .effect
                .as_ref()
                .map(|effect| move |p: &mut Self| p.effect(symbols, effect)),
        )
    }

    fn problem(&mut self, symbols: &Symbols, problem: &ast::Problem) -> fmt::Result {
        self.problem_header(symbols, &problem.name, &problem.domain_name, &problem.requirements)?;
        self.indented(|printer| {
            if problem.initial_state.is_empty() {
                printer.empty_section(":init");
            } else {
                printer.section(":init", |printer| {
                    printer.lines(&problem.initial_state, |printer, fact| {
                        printer.literal(symbols, fact);
                        Ok(())
                    })
                })?;
            }
            if let Some(goal) = &problem.goal {
                printer.section(":goal", |printer| printer.precondition(symbols, goal))?;
            }
            Ok(())
        })?;
        self.output.push(')');
        Ok(())
    }

    // -- Normalized expressions ----------------------------------

    fn normalized_atomic_formula(&mut self, symbols: &Symbols, atomic: &normalized::AtomicFormula) {
        match atomic {
            normalized::AtomicFormula::Predicate(predicate) => self.predicate(symbols, predicate),
            normalized::AtomicFormula::DerivedPredicate(usage) => {
                let name = match symbols.derived_predicate(usage.id) {
                    Some(declaration) => declaration.name.clone(),
                    None => usage.id.to_string(),
                };
                self.compound(symbols, &name, &usage.arguments);
            }
        }
    }

    fn normalized_literal(&mut self, symbols: &Symbols, literal: &normalized::Literal) {
        match literal {
            normalized::Literal::Atomic(atomic) => self.normalized_atomic_formula(symbols, atomic),
            normalized::Literal::Not(atomic) => {
                self.output.push_str("(not ");
                self.normalized_atomic_formula(symbols, atomic);
                self.output.push(')');
            }
        }
    }

    fn normalized_literals(
        &mut self,
        symbols: &Symbols,
        keyword: &str,
        literals: &[normalized::Literal],
    ) -> fmt::Result {
        self.n_ary(keyword, literals, |p, l| {
            p.normalized_literal(symbols, l);
            Ok(())
        })
    }

    fn normalized_precondition(
        &mut self,
        symbols: &Symbols,
        precondition: &normalized::Precondition,
    ) -> fmt::Result {
        match precondition {
            normalized::Precondition::Literal(literal) => {
                self.normalized_literal(symbols, literal);
                Ok(())
            }
            normalized::Precondition::And(literals) => self.normalized_literals(symbols, "and", literals),
        }
    }

    fn normalized_effect(&mut self, symbols: &Symbols, effect: &normalized::Effect) -> fmt::Result {
        match effect {
            normalized::Effect::Literal(literal) => self.normalized_literal(symbols, literal),
            normalized::Effect::And(arguments) => {
                self.n_ary("and", arguments, |p, a| p.normalized_effect(symbols, a))?
            }
            normalized::Effect::ForAll(parameters, argument) => self.quantified(
                symbols,
                "forall",
                parameters,
                |p| p.normalized_effect(symbols, argument),
            )?,
            normalized::Effect::When(condition, conditional) => {
                self.output.push_str("(when");
                self.indented(|p| {
                    p.newline();
                    p.normalized_precondition(symbols, condition)?;
                    p.newline();
                    match conditional {
                        normalized::ConditionalEffect::Literal(literal) => {
                            p.normalized_literal(symbols, literal);
                            Ok(())
                        }
                        normalized::ConditionalEffect::And(literals) => {
                            p.normalized_literals(symbols, "and", literals)
                        }
                    }
                })?;
                self.output.push(')');
            }
        }
        Ok(())
    }

    fn derived_predicate_declaration(
        &mut self,
        symbols: &Symbols,
        declaration: &DerivedPredicateDeclaration,
    ) -> fmt::Result {
        write!(self.output, "(:derived ({}", declaration.name)?;
        if !declaration.parameters.is_empty() {
            self.output.push(' ');
            self.variable_declarations(symbols, &declaration.parameters)?;
        }
        self.output.push(')');

        let body = |p: &mut Self| {
            p.n_ary("or", &declaration.body, |p, conjunction| {
                p.normalized_literals(symbols, "and", conjunction)
            })
        };
        self.indented(|p| {
            p.newline();
            if declaration.existential_parameters.is_empty() {
                body(p)
            } else {
                p.quantified(symbols, "exists", &declaration.existential_parameters, body)
            }
        })?;
        self.output.push(')');
        Ok(())
    }

    fn normalized_action(&mut self, symbols: &Symbols, action: &normalized::Action) -> fmt::Result {
        self.action_sections(
            symbols,
            &action.name,
            &action.parameters,
            action
                .precondition
                .as_ref()
                .map(|precondition| move |p: &mut Self| p.normalized_precondition(symbols, precondition)),
            action
                .effect
                .as_ref()
                .map(|effect| move |p: &mut Self| p.normalized_effect(symbols, effect)),
        )
    }

    fn normalized_problem(&mut self, symbols: &Symbols, problem: &normalized::Problem) -> fmt::Result {
        self.problem_header(symbols, &problem.name, &problem.domain_name, &problem.requirements)?;
        self.indented(|printer| {
            for declaration in &problem.derived_predicates {
                printer.newline();
                printer.derived_predicate_declaration(symbols, declaration)?;
            }
            if problem.initial_state.is_empty() {
                printer.empty_section(":init");
            } else {
                printer.section(":init", |printer| {
                    printer.lines(&problem.initial_state, |printer, fact| {
                        printer.normalized_literal(symbols, fact);
                        Ok(())
                    })
                })?;
            }
            if let Some(goal) = &problem.goal {
                printer.section(":goal", |printer| printer.normalized_precondition(symbols, goal))?;
            }
            Ok(())
        })?;
        self.output.push(')');
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::NormalizationConfig;
    use crate::normalize::normalize;
    use crate::parser::testing::{parse, BLOCKS_DOMAIN, BLOCKS_PROBLEM};

    #[test]
    fn printed_descriptions_parse_again() {
        let text = format!("{}{}", BLOCKS_DOMAIN, BLOCKS_PROBLEM);
        let description = parse(&text).unwrap();
        let printed = print_description(&description).unwrap();
        assert!(printed.starts_with("(define (domain blocks)\n\t(:requirements\n\t\t:strips\n\t\t:typing)"));

        let reparsed = parse(&printed).unwrap();
        assert_eq!(reparsed.domain.actions.len(), 2);
        assert_eq!(reparsed.domain.actions, description.domain.actions);
        assert_eq!(
            reparsed.problem.unwrap().initial_state,
            description.problem.unwrap().initial_state
        );
    }

    #[test]
    fn empty_initial_states_are_kept() {
        let text = format!(
            "{}(define (problem empty) (:domain blocks) (:objects a - block) (:init) (:goal (clear a)))",
            BLOCKS_DOMAIN
        );
        let description = parse(&text).unwrap();
        let printed = print_description(&description).unwrap();
        assert!(printed.contains("\n\t(:init)\n"));
        let reparsed = parse(&printed).unwrap();
        assert!(reparsed.problem.unwrap().initial_state.is_empty());

        let normalized = normalize(description, &NormalizationConfig::default()).unwrap();
        let printed = print_normalized_description(&normalized).unwrap();
        assert!(printed.contains("\n\t(:init)\n"));
        assert!(parse(&printed).unwrap().problem.is_some());
    }

    #[test]
    fn nested_expressions_are_indented() {
        let description = parse(
            "(define (domain d) (:requirements :adl) (:predicates (p ?x) (q))
               (:action a :parameters (?x) :precondition (and (p ?x) (not (q))) :effect (q)))",
        )
        .unwrap();
        let printed = print_description(&description).unwrap();
        assert!(printed.contains(
            "(:action a\n\t\t:parameters\n\t\t\t(?x)\n\t\t:precondition\n\t\t\t(and\n\t\t\t\t(p ?x)\n\t\t\t\t(not (q)))\n\t\t:effect\n\t\t\t(q))"
        ));
    }

    #[test]
    fn normalized_descriptions_show_derived_predicates() {
        let description = parse(
            "(define (domain d) (:requirements :adl) (:types t) (:predicates (p ?x - t) (q ?x - t))
               (:action a :parameters (?x - t)
                 :precondition (exists (?y - t) (or (p ?y) (q ?x)))))",
        )
        .unwrap();
        let normalized = normalize(description, &NormalizationConfig::default()).unwrap();
        let printed = print_normalized_description(&normalized).unwrap();

        assert!(printed.contains(
            "(:derived (derived-predicate-1 ?x - t)\n\t\t(exists\n\t\t\t(?y - t)\n\t\t\t(or\n\t\t\t\t(and\n\t\t\t\t\t(p ?y))\n\t\t\t\t(and\n\t\t\t\t\t(q ?x)))))"
        ));
        assert!(printed.contains(":precondition\n\t\t\t(derived-predicate-1 ?x)"));
    }
}
