use super::Parser;
use crate::ast::Description;
use crate::error::{Error, Location, Result};
use crate::tokenizer::Position;

#[derive(Default)]
struct DescriptionSections {
    domain: Option<Position>,
    problem: Option<Position>,
}

impl<'c> Parser<'c> {
    /// A domain and at most one problem, in any order and any number of
    /// sections read into the tokenizer.
    pub(super) fn parse_description(&mut self) -> Result<Description> {
        self.ctx.tokenizer.remove_comments(";", "\n", false);
        let start = self.ctx.tokenizer.location_at(0);

        let sections = self.find_description_sections()?;
        let position = sections
            .domain
            .ok_or_else(|| Error::parser(start, "no PDDL domain specified"))?;

        self.ctx.tokenizer.seek(position);
        let mut domain = self.parse_domain()?;

        let problem = match sections.problem {
            Some(position) => {
                self.ctx.tokenizer.seek(position);
                Some(self.parse_problem(&mut domain)?)
            }
            None => None,
        };

        Ok(Description { domain, problem })
    }

    fn find_description_sections(&mut self) -> Result<DescriptionSections> {
        let mut sections = DescriptionSections::default();
        loop {
            self.ctx.tokenizer.skip_white_space();
            if self.ctx.tokenizer.at_end() {
                return Ok(sections);
            }

            let position = self.ctx.tokenizer.position();
            self.ctx.tokenizer.expect("(")?;

            if self.ctx.tokenizer.test_identifier_and_skip("in-package") {
                self.skip_package_section()?;
                continue;
            }

            self.ctx.tokenizer.expect("define")?;
            self.ctx.tokenizer.expect("(")?;
            self.ctx.tokenizer.skip_white_space();
            let location = self.ctx.tokenizer.location();

            if self.ctx.tokenizer.test_identifier_and_skip("domain") {
                if sections.domain.is_some() {
                    return Err(Error::parser(
                        location,
                        "PDDL description may not contain two domains",
                    ));
                }
                sections.domain = Some(position);
            } else if self.ctx.tokenizer.test_identifier_and_skip("problem") {
                if sections.problem.is_some() {
                    return Err(Error::parser(
                        location,
                        "PDDL description may not contain two problems currently",
                    ));
                }
                sections.problem = Some(position);
            } else {
                let name = self.ctx.tokenizer.get_identifier()?;
                return Err(Error::parser(
                    location,
                    format!("unknown PDDL section “{}”", name),
                ));
            }

            // (domain name) and the enclosing (define …)
            self.ctx.tokenizer.skip_section()?;
            self.ctx.tokenizer.skip_section()?;
        }
    }

    fn skip_package_section(&mut self) -> Result<()> {
        let location: Location = self.ctx.tokenizer.location();
        let message = "“in-package” section is not part of the PDDL 3.1 specification";
        if !self.ctx.is_compatibility() {
            return Err(Error::parser(location, message));
        }
        self.ctx
            .warn(location, format!("{}, ignoring section", message))?;
        self.ctx.tokenizer.skip_section()
    }
}
