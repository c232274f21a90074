use std::path::PathBuf;

use crate::error::ParseError;
use crate::pipeline::{Output, Pipeline, Stage};

/// A lexical unit of an input line.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// A word with quoting already removed.
    Word(String),
    /// `|`
    Pipe,
    /// `<`
    Less,
    /// `>`
    Great,
    /// `>>`
    DoubleGreat,
}

/// States for the tokenizer state machine.
enum State {
    /// Outside quotes: whitespace and operators end a word
    Normal,
    /// Inside double quotes: whitespace is preserved
    InDoubleQuote,
    /// Inside single quotes: everything is literal
    InSingleQuote,
}

/// Tokenize input into words and redirection/pipe operators.
///
/// Quoted or backslash-escaped operator characters stay part of the word.
pub fn tokenize(input: &str) -> Result<Vec<Token>, ParseError> {
    let mut tokens = Vec::new();
    // `Some` while a word is being built, so `""` still yields an empty argument.
    let mut word: Option<String> = None;
    let mut state = State::Normal;
    let mut chars = input.chars().peekable();

    while let Some(ch) = chars.next() {
        match (&state, ch) {
            // ── Normal state ──
            (State::Normal, ' ' | '\t' | '\n' | '\r') => {
                flush(&mut word, &mut tokens);
            }
            (State::Normal, '|') => {
                flush(&mut word, &mut tokens);
                tokens.push(Token::Pipe);
            }
            (State::Normal, '<') => {
                flush(&mut word, &mut tokens);
                tokens.push(Token::Less);
            }
            (State::Normal, '>') => {
                flush(&mut word, &mut tokens);
                if chars.next_if_eq(&'>').is_some() {
                    tokens.push(Token::DoubleGreat);
                } else {
                    tokens.push(Token::Great);
                }
            }
            (State::Normal, '"') => {
                word.get_or_insert_with(String::new);
                state = State::InDoubleQuote;
            }
            (State::Normal, '\'') => {
                word.get_or_insert_with(String::new);
                state = State::InSingleQuote;
            }
            (State::Normal, '\\') => {
                // A trailing backslash stays literal.
                let escaped = chars.next().unwrap_or('\\');
                word.get_or_insert_with(String::new).push(escaped);
            }
            (State::Normal, c) => {
                word.get_or_insert_with(String::new).push(c);
            }

            // ── InDoubleQuote state: inside "..." ──
            (State::InDoubleQuote, '"') => {
                state = State::Normal;
            }
            (State::InDoubleQuote, '\\') => {
                let current = word.get_or_insert_with(String::new);
                match chars.next_if(|&c| matches!(c, '"' | '\\' | '$' | '`')) {
                    Some(escaped) => current.push(escaped),
                    None => current.push('\\'),
                }
            }
            (State::InDoubleQuote, c) => {
                word.get_or_insert_with(String::new).push(c);
            }

            // ── InSingleQuote state: inside '...' ──
            (State::InSingleQuote, '\'') => {
                state = State::Normal;
            }
            (State::InSingleQuote, c) => {
                word.get_or_insert_with(String::new).push(c);
            }
        }
    }

    if !matches!(state, State::Normal) {
        return Err(ParseError::UnterminatedQuote);
    }
    flush(&mut word, &mut tokens);

    Ok(tokens)
}

fn flush(word: &mut Option<String>, tokens: &mut Vec<Token>) {
    if let Some(text) = word.take() {
        tokens.push(Token::Word(text));
    }
}

/// Redirections and words collected for the stage being built.
#[derive(Default)]
struct StageBuilder {
    argv: Vec<String>,
    input: Option<PathBuf>,
    output: Option<Output>,
}

impl StageBuilder {
    fn is_blank(&self) -> bool {
        self.argv.is_empty() && self.input.is_none() && self.output.is_none()
    }

    fn finish(self) -> Result<Stage, ParseError> {
        if self.argv.is_empty() {
            return Err(ParseError::EmptyCommand);
        }
        let mut stage = Stage::new(self.argv);
        stage.input = self.input;
        if let Some(output) = self.output {
            stage.output = output;
        }
        Ok(stage)
    }
}

/// Parse an input line into a pipeline.
///
/// Returns `Ok(None)` for a blank line.
pub fn parse(input: &str) -> Result<Option<Pipeline>, ParseError> {
    let mut tokens = tokenize(input)?.into_iter();
    let mut stages = Vec::new();
    let mut current = StageBuilder::default();

    while let Some(token) = tokens.next() {
        match token {
            Token::Word(text) => current.argv.push(text),
            Token::Less => {
                let path = expect_target(tokens.next(), "<")?;
                if current.input.replace(path).is_some() {
                    return Err(ParseError::DuplicateInput);
                }
            }
            Token::Great => {
                let path = expect_target(tokens.next(), ">")?;
                set_output(&mut current, Output::Truncate(path))?;
            }
            Token::DoubleGreat => {
                let path = expect_target(tokens.next(), ">>")?;
                set_output(&mut current, Output::Append(path))?;
            }
            Token::Pipe => {
                if current.output.is_some() {
                    return Err(ParseError::OutputBeforePipe);
                }
                stages.push(std::mem::take(&mut current).finish()?);
            }
        }
    }

    if stages.is_empty() && current.is_blank() {
        return Ok(None);
    }
    stages.push(current.finish()?);

    Ok(Pipeline::new(stages))
}

fn set_output(stage: &mut StageBuilder, output: Output) -> Result<(), ParseError> {
    if stage.output.replace(output).is_some() {
        return Err(ParseError::DuplicateOutput);
    }
    Ok(())
}

fn expect_target(token: Option<Token>, op: &'static str) -> Result<PathBuf, ParseError> {
    match token {
        Some(Token::Word(path)) => Ok(PathBuf::from(path)),
        _ => Err(ParseError::MissingRedirectTarget(op)),
    }
}
