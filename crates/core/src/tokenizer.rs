/// Character-level cursor over one or more named input sections.
///
/// Productions save a position, attempt to match, and seek back on failure.
/// Positions are plain offsets into the concatenated buffer, so capture and
/// restore are O(1). Rows and columns are only computed when a diagnostic
/// needs a [`Location`].
use crate::error::{Error, Location, Result};
use std::marker::PhantomData;
use std::str::FromStr;

pub type Position = usize;

/// Character classification used by a [`Tokenizer`].
pub trait TokenizerPolicy {
    /// Applied to every character when a section is read.
    fn transform(character: char) -> char;
    fn is_white_space(character: char) -> bool;
    fn is_blank_space(character: char) -> bool;
    fn is_identifier_character(character: char) -> bool;
}

/// Case-insensitive PDDL classification.
#[derive(Debug, Clone, Copy, Default)]
pub struct PddlPolicy;

impl TokenizerPolicy for PddlPolicy {
    fn transform(character: char) -> char {
        character.to_ascii_lowercase()
    }

    fn is_white_space(character: char) -> bool {
        character.is_whitespace()
    }

    fn is_blank_space(character: char) -> bool {
        character == ' ' || character == '\t'
    }

    fn is_identifier_character(character: char) -> bool {
        let graphic = if character.is_ascii() {
            character.is_ascii_graphic()
        } else {
            !character.is_whitespace() && !character.is_control()
        };
        graphic && !matches!(character, '?' | '(' | ')' | ';')
    }
}

#[derive(Debug, Clone)]
struct Section {
    name: String,
    offset: Position,
}

#[derive(Debug, Clone)]
pub struct Tokenizer<P: TokenizerPolicy = PddlPolicy> {
    content: Vec<char>,
    sections: Vec<Section>,
    position: Position,
    policy: PhantomData<P>,
}

impl<P: TokenizerPolicy> Default for Tokenizer<P> {
    fn default() -> Self {
        Tokenizer {
            content: Vec::new(),
            sections: Vec::new(),
            position: 0,
            policy: PhantomData,
        }
    }
}

impl<P: TokenizerPolicy> Tokenizer<P> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a named section to the buffer.
    pub fn read(&mut self, section_name: impl Into<String>, source: &str) {
        self.sections.push(Section {
            name: section_name.into(),
            offset: self.content.len(),
        });
        self.content.extend(source.chars().map(P::transform));
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn seek(&mut self, position: Position) {
        self.position = position;
    }

    /// The characters between two positions, as read (lowercased for PDDL).
    pub fn text(&self, start: Position, end: Position) -> String {
        let end = end.min(self.content.len());
        let start = start.min(end);
        self.content[start..end].iter().collect()
    }

    pub fn at_end(&self) -> bool {
        self.position >= self.content.len()
    }

    pub fn current_character(&self) -> Result<char> {
        self.content
            .get(self.position)
            .copied()
            .ok_or_else(|| Error::tokenizer(self.location(), "reading past end of file"))
    }

    pub fn advance(&mut self) {
        if !self.at_end() {
            self.position += 1;
        }
    }

    fn peek(&self) -> Option<char> {
        self.content.get(self.position).copied()
    }

    pub fn skip_white_space(&mut self) {
        while self.peek().is_some_and(P::is_white_space) {
            self.position += 1;
        }
    }

    pub fn skip_blank_space(&mut self) {
        while self.peek().is_some_and(P::is_blank_space) {
            self.position += 1;
        }
    }

    /// Moves past the next newline, or to the end of the buffer.
    pub fn skip_line(&mut self) {
        while let Some(character) = self.peek() {
            self.position += 1;
            if character == '\n' {
                break;
            }
        }
    }

    pub fn get_identifier(&mut self) -> Result<String> {
        self.skip_white_space();
        let start = self.position;
        while self.peek().is_some_and(P::is_identifier_character) {
            self.position += 1;
        }
        if self.position == start {
            return Err(Error::tokenizer(self.location(), "could not parse identifier"));
        }
        Ok(self.content[start..self.position].iter().collect())
    }

    /// Reads one token and parses it as `T`.
    pub fn get<T: FromStr>(&mut self) -> Result<T> {
        self.skip_white_space();
        let start = self.position;
        while self.peek().is_some_and(P::is_identifier_character) {
            self.position += 1;
        }
        let token: String = self.content[start..self.position].iter().collect();
        token.parse::<T>().map_err(|_| {
            let location = self.location_at(start);
            self.position = start;
            Error::tokenizer(
                location,
                format!(
                    "could not parse value of type “{}”",
                    short_type_name::<T>()
                ),
            )
        })
    }

    fn matches_at_cursor(&mut self, expected: &str) -> bool {
        if !expected.starts_with(char::is_whitespace) {
            self.skip_white_space();
        }
        for character in expected.chars() {
            if self.peek() != Some(character) {
                return false;
            }
            self.position += 1;
        }
        true
    }

    fn identifier_ends_here(&self) -> bool {
        !self.peek().is_some_and(P::is_identifier_character)
    }

    /// Skips `expected` if it follows, otherwise leaves the cursor alone.
    pub fn test_and_skip(&mut self, expected: &str) -> bool {
        let start = self.position;
        let matched = self.matches_at_cursor(expected);
        if !matched {
            self.position = start;
        }
        matched
    }

    /// Checks whether `expected` follows without moving the cursor.
    pub fn test_and_return(&mut self, expected: &str) -> bool {
        let start = self.position;
        let matched = self.matches_at_cursor(expected);
        self.position = start;
        matched
    }

    /// Like [`Tokenizer::test_and_skip`], but the match must end an identifier.
    pub fn test_identifier_and_skip(&mut self, expected: &str) -> bool {
        let start = self.position;
        let matched = self.matches_at_cursor(expected) && self.identifier_ends_here();
        if !matched {
            self.position = start;
        }
        matched
    }

    pub fn test_identifier_and_return(&mut self, expected: &str) -> bool {
        let start = self.position;
        let matched = self.matches_at_cursor(expected) && self.identifier_ends_here();
        self.position = start;
        matched
    }

    pub fn expect(&mut self, expected: &str) -> Result<()> {
        if self.test_and_skip(expected) {
            return Ok(());
        }
        if !expected.starts_with(char::is_whitespace) {
            self.skip_white_space();
        }
        Err(Error::tokenizer(
            self.location(),
            format!("unexpected value, expected “{}”", expected),
        ))
    }

    /// Skips to just past the parenthesis closing an already opened section.
    pub fn skip_section(&mut self) -> Result<()> {
        let mut open = 1usize;
        while open > 0 {
            match self.current_character()? {
                '(' => open += 1,
                ')' => open -= 1,
                _ => {}
            }
            self.position += 1;
        }
        Ok(())
    }

    /// Blanks every `start` ... `end` span in the buffer.
    ///
    /// Blanked characters become spaces, newlines survive, so positions and
    /// rows stay valid for diagnostics.
    pub fn remove_comments(&mut self, start: &str, end: &str, remove_end: bool) {
        let start: Vec<char> = start.chars().collect();
        let end: Vec<char> = end.chars().collect();
        let mut index = 0;
        while index < self.content.len() {
            if !self.content[index..].starts_with(&start) {
                index += 1;
                continue;
            }
            while index < self.content.len() && !self.content[index..].starts_with(&end) {
                self.blank(index);
                index += 1;
            }
            if index < self.content.len() {
                if remove_end {
                    for offset in 0..end.len() {
                        self.blank(index + offset);
                    }
                }
                index += end.len();
            }
        }
    }

    fn blank(&mut self, index: usize) {
        if let Some(character) = self.content.get_mut(index) {
            if *character != '\n' {
                *character = ' ';
            }
        }
    }

    pub fn location(&self) -> Location {
        self.location_at(self.position)
    }

    /// Resolves `position` to section, row and column.
    pub fn location_at(&self, position: Position) -> Location {
        let position = position.min(self.content.len());
        let section = self
            .sections
            .iter()
            .rev()
            .find(|section| section.offset <= position);
        let (name, offset) = match section {
            Some(section) => (section.name.as_str(), section.offset),
            None => ("", 0),
        };

        let mut row = 1;
        let mut column = 1;
        for &character in &self.content[offset..position] {
            if character == '\n' {
                row += 1;
                column = 1;
            } else {
                column += 1;
            }
        }
        Location::new(name, row, column)
    }
}

fn short_type_name<T>() -> &'static str {
    let full = std::any::type_name::<T>();
    full.rsplit("::").next().unwrap_or(full)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokenizer(text: &str) -> Tokenizer {
        let mut tokenizer = Tokenizer::new();
        tokenizer.read("test", text);
        tokenizer
    }

    #[test]
    fn input_is_lowercased_on_read() {
        let mut t = tokenizer("(DEFINE (Domain BlocksWorld))");
        assert!(t.test_and_skip("("));
        assert_eq!(t.get_identifier().unwrap(), "define");
        t.expect("(").unwrap();
        assert_eq!(t.get_identifier().unwrap(), "domain");
        assert_eq!(t.get_identifier().unwrap(), "blocksworld");
    }

    #[test]
    fn identifiers_stop_at_structural_characters() {
        let mut t = tokenizer("on-table?x)pick_up;comment");
        assert_eq!(t.get_identifier().unwrap(), "on-table");
        assert!(t.test_and_skip("?"));
        assert_eq!(t.get_identifier().unwrap(), "x");
        assert!(t.test_and_skip(")"));
        assert_eq!(t.get_identifier().unwrap(), "pick_up");
        assert_eq!(t.current_character().unwrap(), ';');
    }

    #[test]
    fn empty_identifier_is_an_error() {
        let mut t = tokenizer("   (");
        let error = t.get_identifier().unwrap_err();
        assert_eq!(error.message(), "could not parse identifier");
    }

    #[test]
    fn failed_tests_leave_the_cursor_unchanged() {
        let mut t = tokenizer("  (and (foo))");
        let before = t.position();
        assert!(!t.test_and_skip("(or"));
        assert_eq!(t.position(), before);
        assert!(!t.test_identifier_and_skip("(an"));
        assert_eq!(t.position(), before);
        assert!(t.test_and_return("(and"));
        assert_eq!(t.position(), before);
        assert!(t.test_identifier_and_skip("(and"));
        assert_ne!(t.position(), before);
    }

    #[test]
    fn identifier_tests_require_a_word_boundary() {
        let mut t = tokenizer(":action-costs");
        assert!(t.test_and_return(":action"));
        assert!(!t.test_identifier_and_return(":action"));
        assert!(t.test_identifier_and_return(":action-costs"));
    }

    #[test]
    fn expect_reports_the_expected_value() {
        let mut t = tokenizer("\n  foo");
        let error = t.expect("(").unwrap_err();
        assert_eq!(error.message(), "unexpected value, expected “(”");
        assert_eq!(error.location().unwrap(), &Location::new("test", 2, 3));
    }

    #[test]
    fn reading_past_the_end_fails() {
        let mut t = tokenizer("a");
        t.advance();
        assert!(t.at_end());
        let error = t.current_character().unwrap_err();
        assert_eq!(error.message(), "reading past end of file");
    }

    #[test]
    fn typed_values_are_parsed() {
        let mut t = tokenizer(" 42 abc");
        assert_eq!(t.get::<usize>().unwrap(), 42);
        let error = t.get::<usize>().unwrap_err();
        assert_eq!(error.message(), "could not parse value of type “usize”");
    }

    #[test]
    fn skip_section_stops_after_the_matching_parenthesis() {
        let mut t = tokenizer("= ?x (f ?y)) rest");
        t.skip_section().unwrap();
        assert_eq!(t.get_identifier().unwrap(), "rest");

        let mut unbalanced = tokenizer("(a (b)");
        assert!(unbalanced.skip_section().is_err());
    }

    #[test]
    fn comments_are_blanked_in_place() {
        let mut t = tokenizer("(a ; note (x\n b)");
        t.remove_comments(";", "\n", false);
        assert!(t.test_and_skip("("));
        assert_eq!(t.get_identifier().unwrap(), "a");
        assert_eq!(t.get_identifier().unwrap(), "b");
        assert_eq!(t.location(), Location::new("test", 2, 3));
    }

    #[test]
    fn locations_are_relative_to_their_section() {
        let mut t: Tokenizer = Tokenizer::new();
        t.read("domain.pddl", "(a\n b)\n");
        t.read("problem.pddl", "(c\n  d)");
        let problem_start = 7;
        assert_eq!(t.location_at(0), Location::new("domain.pddl", 1, 1));
        assert_eq!(t.location_at(4), Location::new("domain.pddl", 2, 2));
        assert_eq!(t.location_at(problem_start), Location::new("problem.pddl", 1, 1));
        assert_eq!(
            t.location_at(problem_start + 5),
            Location::new("problem.pddl", 2, 3)
        );
    }

    #[test]
    fn blank_space_does_not_cross_lines() {
        let mut t = tokenizer(" \t\n x");
        t.skip_blank_space();
        assert_eq!(t.current_character().unwrap(), '\n');
        t.skip_line();
        t.skip_blank_space();
        assert_eq!(t.current_character().unwrap(), 'x');
    }
}
