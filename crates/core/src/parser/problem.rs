use super::{AstContext, Parser};
use crate::ast::{Domain, Fact, Problem};
use crate::error::{Error, Location, Result};
use crate::requirements::{compute_derived_requirements, parse_requirements};
use crate::scope::Scope;
use crate::tokenizer::Position;

#[derive(Default)]
struct ProblemSections {
    domain: Option<Position>,
    requirements: Option<Position>,
    objects: Option<Position>,
    initial_state: Option<Position>,
    goal: Option<Position>,
}

const UNSUPPORTED_SECTIONS: &[&str] = &[":constraints", ":metric", ":length"];

impl<'c> Parser<'c> {
    /// `(define (problem name) section*)` against an already parsed domain.
    pub(super) fn parse_problem(&mut self, domain: &mut Domain) -> Result<Problem> {
        let start = self.ctx.tokenizer.location();
        let tokenizer = &mut self.ctx.tokenizer;
        tokenizer.expect("(")?;
        tokenizer.expect("define")?;
        tokenizer.expect("(")?;
        tokenizer.expect("problem")?;
        let name = tokenizer.get_identifier()?;
        tokenizer.expect(")")?;
        log::debug!("parsing problem “{}”", name);

        let mut problem = Problem::new(name);
        let sections = self.find_problem_sections()?;
        let end = self.ctx.tokenizer.position();

        let position = sections.domain.ok_or_else(|| missing(&start, "a corresponding domain"))?;
        self.ctx.tokenizer.seek(position);
        let location = self.ctx.tokenizer.location();
        problem.domain_name = self.ctx.tokenizer.get_identifier()?;
        if problem.domain_name != domain.name {
            return Err(Error::parser(
                location,
                format!(
                    "domains do not match (“{}” and “{}”)",
                    domain.name, problem.domain_name
                ),
            ));
        }

        if let Some(position) = sections.requirements {
            self.ctx.tokenizer.seek(position);
            problem.requirements = parse_requirements(self.ctx)?;
        }
        compute_derived_requirements(&mut problem.requirements);

        if let Some(position) = sections.objects {
            self.ctx.tokenizer.seek(position);
            self.parse_constant_declarations(&mut AstContext::problem(domain, &mut problem))?;
        }

        let position = sections
            .initial_state
            .ok_or_else(|| missing(&start, "an initial state"))?;
        self.ctx.tokenizer.seek(position);
        problem.initial_state = self.parse_initial_state(&mut AstContext::problem(domain, &mut problem))?;

        let position = sections.goal.ok_or_else(|| missing(&start, "a goal"))?;
        self.ctx.tokenizer.seek(position);
        let goal = {
            let mut ast = AstContext::problem(domain, &mut problem);
            self.parse_precondition(&mut ast, &mut Scope::new())?
        };
        problem.goal = Some(goal.ok_or_else(|| self.ctx.error_here("could not parse goal description"))?);

        compute_derived_requirements(&mut problem.requirements);
        self.ctx.tokenizer.seek(end);
        Ok(problem)
    }

    fn parse_initial_state(&mut self, ast: &mut AstContext<'_>) -> Result<Vec<Fact>> {
        let mut scope = Scope::new();
        let mut facts = Vec::new();
        loop {
            self.ctx.tokenizer.skip_white_space();
            if self.ctx.tokenizer.current_character()? == ')' {
                return Ok(facts);
            }
            match self.parse_fact(ast, &mut scope)? {
                Some(fact) => facts.push(fact),
                None => return Err(self.ctx.error_here("invalid initial state fact")),
            }
        }
    }

    fn find_problem_sections(&mut self) -> Result<ProblemSections> {
        let mut sections = ProblemSections::default();
        loop {
            self.ctx.tokenizer.skip_white_space();
            if self.ctx.tokenizer.test_and_skip(")") {
                return Ok(sections);
            }

            self.ctx.tokenizer.expect("(")?;
            let location = self.ctx.tokenizer.location();
            let keyword = self.section_name()?;
            let content = self.ctx.tokenizer.position();

            let slot = match keyword.as_str() {
                ":domain" => &mut sections.domain,
                ":requirements" => &mut sections.requirements,
                ":objects" => &mut sections.objects,
                ":init" => &mut sections.initial_state,
                ":goal" => &mut sections.goal,
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
                        format!("unknown problem section “{}”", keyword),
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

fn missing(location: &Location, what: &str) -> Error {
    Error::parser(
        location.clone(),
        format!("problem description does not specify {}", what),
    )
}
