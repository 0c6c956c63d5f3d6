use super::{AstContext, Parser};
use crate::ast::Domain;
use crate::error::{Error, Result};
use crate::requirements::{compute_derived_requirements, parse_requirements, Requirement};
use crate::tokenizer::Position;

#[derive(Default)]
struct DomainSections {
    requirements: Option<Position>,
    types: Option<Position>,
    constants: Option<Position>,
    predicates: Option<Position>,
    actions: Vec<Position>,
}

/// Recognized but skipped.
const UNSUPPORTED_SECTIONS: &[&str] = &[":functions", ":constraints", ":durative-action", ":derived"];

impl<'c> Parser<'c> {
    /// `(define (domain name) section*)`
    pub(super) fn parse_domain(&mut self) -> Result<Domain> {
        let tokenizer = &mut self.ctx.tokenizer;
        tokenizer.expect("(")?;
        tokenizer.expect("define")?;
        tokenizer.expect("(")?;
        tokenizer.expect("domain")?;
        let name = tokenizer.get_identifier()?;
        tokenizer.expect(")")?;
        log::debug!("parsing domain “{}”", name);

        let mut domain = Domain::new(name);
        let sections = self.find_domain_sections()?;
        let end = self.ctx.tokenizer.position();

        if let Some(position) = sections.requirements {
            self.ctx.tokenizer.seek(position);
            domain.requirements = parse_requirements(self.ctx)?;
        }
        compute_derived_requirements(&mut domain.requirements);

        if let Some(position) = sections.types {
            self.ctx.tokenizer.seek(position);
            self.check_requirement(&mut AstContext::domain(&mut domain), Requirement::Typing)?;
            self.parse_type_declarations(&mut domain)?;
        }

        if let Some(position) = sections.constants {
            self.ctx.tokenizer.seek(position);
            self.parse_constant_declarations(&mut AstContext::domain(&mut domain))?;
        }

        if let Some(position) = sections.predicates {
            self.ctx.tokenizer.seek(position);
            self.parse_predicate_declarations(&mut AstContext::domain(&mut domain))?;
        }

        for position in sections.actions {
            self.ctx.tokenizer.seek(position);
            let action = self.parse_action(&mut domain)?;
            domain.actions.push(action);
        }

        compute_derived_requirements(&mut domain.requirements);
        self.ctx.tokenizer.seek(end);
        Ok(domain)
    }

    /// Records where each section's content starts and moves past the
    /// domain's closing parenthesis. Actions are recorded at their `(`.
    fn find_domain_sections(&mut self) -> Result<DomainSections> {
        let mut sections = DomainSections::default();
        loop {
            self.ctx.tokenizer.skip_white_space();
            if self.ctx.tokenizer.test_and_skip(")") {
                return Ok(sections);
            }

            let start = self.ctx.tokenizer.position();
            self.ctx.tokenizer.expect("(")?;
            let location = self.ctx.tokenizer.location();
            let keyword = self.section_name()?;
            let content = self.ctx.tokenizer.position();

            let slot = match keyword.as_str() {
                ":requirements" => &mut sections.requirements,
                ":types" => &mut sections.types,
                ":constants" => &mut sections.constants,
                ":predicates" => &mut sections.predicates,
                ":action" => {
                    sections.actions.push(start);
                    self.ctx.tokenizer.skip_section()?;
                    continue;
                }
                keyword if UNSUPPORTED_SECTIONS.contains(&keyword) => {
                    self.ctx.warn(
                        location,
                        format!("“{}” sections currently unsupported, ignoring section", keyword),
                    )?;
                    self.ctx.tokenizer.skip_section()?;
                    continue;
                }
                _ => {
                    return Err(Error::parser(
                        location,
                        format!("unknown domain section “{}”", keyword),
                    ))
                }
            };
            if slot.is_some() {
                return Err(Error::parser(
                    location,
                    format!("only one “{}” section allowed", keyword),
                ));
            }
            *slot = Some(content);
            self.ctx.tokenizer.skip_section()?;
        }
    }
}
