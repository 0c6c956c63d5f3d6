use super::{AstContext, Parser};
use crate::ast::{Action, Domain, VariableId};
use crate::error::{Error, Result};
use crate::scope::Scope;
use crate::tokenizer::Position;

#[derive(Default)]
struct ActionSections {
    parameters: Option<Position>,
    precondition: Option<Position>,
    effect: Option<Position>,
    vars: Option<Position>,
}

impl<'c> Parser<'c> {
    /// `(:action name :parameters (…) :precondition … :effect …)`
    pub(super) fn parse_action(&mut self, domain: &mut Domain) -> Result<Action> {
        self.ctx.tokenizer.expect("(")?;
        self.ctx.tokenizer.expect(":action")?;
        let name = self.ctx.tokenizer.get_identifier()?;
        log::debug!("parsing action “{}”", name);

        let sections = self.find_action_sections()?;
        let end = self.ctx.tokenizer.position();

        let mut ast = AstContext::domain(domain);
        let mut parameters = Vec::new();
        if let Some(position) = sections.parameters {
            self.ctx.tokenizer.seek(position);
            parameters.extend(self.parse_parameter_list(&mut ast)?);
        }
        if let Some(position) = sections.vars {
            self.ctx.tokenizer.seek(position);
            self.ctx.warn_here(
                "“vars” section is not part of the PDDL 3.1 specification, treating it like additional “parameters” section",
            )?;
            parameters.extend(self.parse_parameter_list(&mut ast)?);
        }

        let mut scope = Scope::new();
        scope.push(parameters.clone());

        let precondition = match sections.precondition {
            Some(position) => {
                self.ctx.tokenizer.seek(position);
                if self.test_empty_expression() {
                    None
                } else {
                    Some(
                        self.parse_precondition(&mut ast, &mut scope)?
                            .ok_or_else(|| self.ctx.error_here("could not parse precondition"))?,
                    )
                }
            }
            None => None,
        };

        let effect = match sections.effect {
            Some(position) => {
                self.ctx.tokenizer.seek(position);
                if self.test_empty_expression() {
                    None
                } else {
                    Some(
                        self.parse_effect(&mut ast, &mut scope)?
                            .ok_or_else(|| self.ctx.error_here("could not parse effect"))?,
                    )
                }
            }
            None => None,
        };

        self.ctx.tokenizer.seek(end);
        Ok(Action {
            name,
            parameters,
            precondition,
            effect,
        })
    }

    /// Records where each section's content starts and moves past the
    /// action's closing parenthesis.
    fn find_action_sections(&mut self) -> Result<ActionSections> {
        let mut sections = ActionSections::default();
        loop {
            self.ctx.tokenizer.skip_white_space();
            if self.ctx.tokenizer.test_and_skip(")") {
                return Ok(sections);
            }

            let location = self.ctx.tokenizer.location();
            let keyword = self.ctx.tokenizer.get_identifier()?;
            let slot = match keyword.as_str() {
                ":parameters" => &mut sections.parameters,
                ":precondition" => &mut sections.precondition,
                ":effect" => &mut sections.effect,
                ":vars" if self.ctx.is_compatibility() => &mut sections.vars,
                _ => {
                    return Err(Error::parser(
                        location,
                        format!("unknown action section “{}”", keyword),
                    ))
                }
            };
            if slot.is_some() {
                return Err(Error::parser(
                    location,
                    format!("only one “{}” section allowed", keyword),
                ));
            }

            self.ctx.tokenizer.skip_white_space();
            *slot = Some(self.ctx.tokenizer.position());
            self.ctx.tokenizer.expect("(")?;
            self.ctx.tokenizer.skip_section()?;
        }
    }

    fn parse_parameter_list(&mut self, ast: &mut AstContext<'_>) -> Result<Vec<VariableId>> {
        self.ctx.tokenizer.expect("(")?;
        let parameters = self.parse_variable_declarations(ast)?;
        self.ctx.tokenizer.expect(")")?;
        Ok(parameters)
    }

    /// Skips `()` if it follows.
    fn test_empty_expression(&mut self) -> bool {
        let start = self.ctx.tokenizer.position();
        if self.ctx.tokenizer.test_and_skip("(") && self.ctx.tokenizer.test_and_skip(")") {
            return true;
        }
        self.ctx.tokenizer.seek(start);
        false
    }
}
