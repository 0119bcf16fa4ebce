//! Command line parser with variable expansion, history, and pipes.
//!
//! Supports:
//! - Variable expansion: `$VAR`, `${VAR}`
//! - History expansion: `!!` (last command), `!n` (nth command), `!-n` (nth from last)
//! - Pipe operator: `cmd1 | cmd2`
//! - Quote handling: `"string with spaces"`, `'literal string'`

mod expand;
mod lexer;

pub use lexer::{Lexer, Token, WordPart};

use expand::expand_tokens;
use thiserror::Error;

use crate::core::env::SessionEnv;

// =============================================================================
// Parse Error
// =============================================================================

/// Structured error type for parsing failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// Pipe at the beginning of input: `| grep foo`
    #[error("syntax error near token {}: unexpected '|'", .position + 1)]
    UnexpectedPipe { position: usize },
    /// Empty stage between pipes: `ls | | grep`
    #[error("syntax error near token {}: empty pipe stage", .position + 1)]
    EmptyPipeStage { position: usize },
    /// Pipe at the end with no following command: `ls |`
    #[error("syntax error near token {}: unexpected end after '|'", .position + 1)]
    TrailingPipe { position: usize },
}

// =============================================================================
// Pipeline Representation
// =============================================================================

/// A single command in a pipeline
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedCommand {
    pub name: String,
    pub args: Vec<String>,
}

/// A pipeline of commands connected by pipes
#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    pub commands: Vec<ParsedCommand>,
    /// Syntax error (e.g., empty pipe stage)
    pub error: Option<ParseError>,
}

impl Pipeline {
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn first_command_name(&self) -> Option<&str> {
        self.commands.first().map(|c| c.name.as_str())
    }
}

// =============================================================================
// Parser
// =============================================================================

/// Parse input with variable and history expansion, then build the pipeline.
///
/// `history` holds the commands submitted before this one.
pub fn parse_input(input: &str, history: &[String], env: &SessionEnv) -> Pipeline {
    let tokens = Lexer::new(input).with_env(env).tokenize();
    parse_pipeline(expand_tokens(tokens, history, env))
}

fn parse_pipeline(tokens: Vec<Token>) -> Pipeline {
    let mut pipeline = Pipeline::default();
    let mut words: Vec<String> = Vec::new();
    let mut last_pipe: Option<usize> = None;

    for (idx, token) in tokens.into_iter().enumerate() {
        match token {
            Token::Word(w) if !w.is_empty() => words.push(w),
            Token::Pipe if words.is_empty() => {
                pipeline.error = Some(if pipeline.commands.is_empty() {
                    ParseError::UnexpectedPipe { position: idx }
                } else {
                    ParseError::EmptyPipeStage { position: idx }
                });
                return pipeline;
            }
            Token::Pipe => {
                pipeline.commands.push(to_command(std::mem::take(&mut words)));
                last_pipe = Some(idx);
            }
            _ => {}
        }
    }

    match (words.is_empty(), last_pipe) {
        (false, _) => pipeline.commands.push(to_command(words)),
        (true, Some(position)) => pipeline.error = Some(ParseError::TrailingPipe { position }),
        (true, None) => {}
    }
    pipeline
}

fn to_command(mut words: Vec<String>) -> ParsedCommand {
    let args = words.split_off(1.min(words.len()));
    ParsedCommand {
        name: words.pop().unwrap_or_default(),
        args,
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(input: &str) -> Pipeline {
        parse_input(input, &[], &SessionEnv::activated())
    }

    #[test]
    fn test_parse_pipeline() {
        let pipeline = parse("pip list | grep num | head -5");
        assert_eq!(pipeline.commands.len(), 3);
        assert_eq!(pipeline.commands[0].name, "pip");
        assert_eq!(pipeline.commands[0].args, vec!["list"]);
        assert_eq!(pipeline.commands[1].name, "grep");
        assert_eq!(pipeline.commands[1].args, vec!["num"]);
        assert_eq!(pipeline.commands[2].args, vec!["-5"]);
        assert!(pipeline.error.is_none());
    }

    #[test]
    fn test_history_expansion_uses_previous_commands() {
        let history = vec!["cat data.csv".to_string(), "pwd".to_string()];
        let pipeline = parse_input("!0 | head -2", &history, &SessionEnv::activated());
        assert_eq!(pipeline.first_command_name(), Some("cat"));
        assert_eq!(pipeline.commands[0].args, vec!["data.csv"]);
        assert_eq!(pipeline.commands.len(), 2);
    }

    #[test]
    fn test_variable_expansion_in_args() {
        let pipeline = parse("cd $HOME");
        assert_eq!(pipeline.commands[0].args, vec!["/home/student"]);

        let pipeline = parse("cd $HOME/project/src");
        assert_eq!(pipeline.commands[0].args, vec!["/home/student/project/src"]);

        let pipeline = parse("echo ${USER}_notes.txt \"$USER\"'s");
        assert_eq!(pipeline.commands[0].args, vec!["student_notes.txt", "students"]);
    }

    #[test]
    fn test_empty_input() {
        let pipeline = parse("   ");
        assert!(pipeline.is_empty());
        assert!(pipeline.error.is_none());
    }

    #[test]
    fn test_empty_pipe_leading() {
        assert_eq!(
            parse("| grep foo").error,
            Some(ParseError::UnexpectedPipe { position: 0 })
        );
    }

    #[test]
    fn test_empty_pipe_middle() {
        // tokens: ["ls", "|", "|", "grep", "foo"], second pipe at index 2
        assert_eq!(
            parse("ls | | grep foo").error,
            Some(ParseError::EmptyPipeStage { position: 2 })
        );
    }

    #[test]
    fn test_empty_pipe_trailing() {
        let pipeline = parse("ls |");
        assert_eq!(
            pipeline.error,
            Some(ParseError::TrailingPipe { position: 1 })
        );
        assert_eq!(
            pipeline.error.unwrap().to_string(),
            "syntax error near token 2: unexpected end after '|'"
        );
    }
}
