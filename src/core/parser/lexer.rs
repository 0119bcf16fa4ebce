//! Lexer for tokenizing command lines.
//!
//! Handles:
//! - Word tokenization, joining adjacent bare, quoted and `$VAR` pieces
//! - Pipe operator (`|`)
//! - Variable references (`$VAR`, `${VAR}`)
//! - History expansion (`!!`, `!n`, `!-n`) at the start of a word
//! - Quote handling (single and double quotes)

use std::iter::Peekable;
use std::str::Chars;

use crate::core::env::SessionEnv;

// =============================================================================
// Token Types
// =============================================================================

/// A piece of a word that still needs variable lookup.
#[derive(Debug, Clone, PartialEq)]
pub enum WordPart {
    Literal(String),
    Variable(String),
}

/// Token types produced by the lexer
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// A word with no variable references left
    Word(String),
    /// A word containing `$VAR` or `${VAR}`, e.g. `$HOME/project`
    Expandable(Vec<WordPart>),
    /// Pipe operator `|`
    Pipe,
    /// Last command `!!`
    HistoryLast,
    /// History by index `!n` or `!-n`
    HistoryIndex(i32),
}

// =============================================================================
// Lexer
// =============================================================================

/// Lexer for tokenizing command lines
pub struct Lexer<'a> {
    chars: Peekable<Chars<'a>>,
    /// Variables substituted inside double quotes
    env: Option<&'a SessionEnv>,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer for the given input
    pub fn new(input: &'a str) -> Self {
        Self {
            chars: input.chars().peekable(),
            env: None,
        }
    }

    /// Resolve `$VAR` inside double quotes against a session environment.
    pub fn with_env(mut self, env: &'a SessionEnv) -> Self {
        self.env = Some(env);
        self
    }

    /// Tokenize the entire input into a vector
    pub fn tokenize(self) -> Vec<Token> {
        self.collect()
    }

    fn next_token(&mut self) -> Option<Token> {
        match *self.chars.peek()? {
            '|' => {
                self.chars.next();
                Some(Token::Pipe)
            }
            '!' => self.history_ref().or_else(|| Some(self.word())),
            _ => Some(self.word()),
        }
    }

    /// Read one word up to whitespace or a pipe.
    fn word(&mut self) -> Token {
        let mut parts = Vec::new();
        let mut literal = String::new();

        while let Some(&c) = self.chars.peek() {
            if c.is_whitespace() || c == '|' {
                break;
            }
            self.chars.next();
            match c {
                '"' => literal.push_str(&self.double_quoted()),
                '\'' => literal.push_str(&self.single_quoted()),
                '$' => match self.variable_name() {
                    Ok(name) => {
                        if !literal.is_empty() {
                            parts.push(WordPart::Literal(std::mem::take(&mut literal)));
                        }
                        parts.push(WordPart::Variable(name));
                    }
                    Err(text) => literal.push_str(&text),
                },
                other => literal.push(other),
            }
        }

        if parts.is_empty() {
            return Token::Word(literal);
        }
        if !literal.is_empty() {
            parts.push(WordPart::Literal(literal));
        }
        Token::Expandable(parts)
    }

    /// Read a variable name after `$`.
    ///
    /// Returns the literal text to keep when no name follows or a brace is
    /// left unclosed.
    fn variable_name(&mut self) -> Result<String, String> {
        if self.chars.peek() == Some(&'{') {
            self.chars.next();
            let mut name = String::new();
            for c in self.chars.by_ref() {
                if c == '}' {
                    return if name.is_empty() {
                        Err("$".to_string())
                    } else {
                        Ok(name)
                    };
                }
                name.push(c);
            }
            return Err(format!("${{{}", name));
        }

        let mut name = String::new();
        while let Some(c) = self.chars.next_if(|c| c.is_alphanumeric() || *c == '_') {
            name.push(c);
        }
        if name.is_empty() {
            Err("$".to_string())
        } else {
            Ok(name)
        }
    }

    /// `!!`, `!n` or `!-n`. Anything else starting with `!` is an ordinary
    /// word and leaves the input untouched.
    fn history_ref(&mut self) -> Option<Token> {
        let mut ahead = self.chars.clone();
        ahead.next();

        let mut digits = String::new();
        match ahead.next() {
            Some('!') => {
                self.chars = ahead;
                return Some(Token::HistoryLast);
            }
            Some(c) if c == '-' || c.is_ascii_digit() => digits.push(c),
            _ => return None,
        }
        while let Some(c) = ahead.next_if(char::is_ascii_digit) {
            digits.push(c);
        }

        let n = digits.parse::<i32>().ok()?;
        self.chars = ahead;
        Some(Token::HistoryIndex(n))
    }

    fn double_quoted(&mut self) -> String {
        let mut out = String::new();
        while let Some(c) = self.chars.next() {
            match c {
                '"' => break,
                '\\' => match self.chars.next() {
                    Some('n') => out.push('\n'),
                    Some('t') => out.push('\t'),
                    Some(other) => out.push(other),
                    None => out.push('\\'),
                },
                '$' => {
                    let braced = self.chars.peek() == Some(&'{');
                    match self.variable_name() {
                        Ok(name) => match self.env.and_then(|env| env.get(&name)) {
                            Some(value) => out.push_str(&value),
                            // Keep original if variable not found
                            None if braced => out.push_str(&format!("${{{}}}", name)),
                            None => out.push_str(&format!("${}", name)),
                        },
                        Err(literal) => out.push_str(&literal),
                    }
                }
                other => out.push(other),
            }
        }
        out
    }

    fn single_quoted(&mut self) -> String {
        // Unclosed quote keeps whatever was read
        self.chars.by_ref().take_while(|&c| c != '\'').collect()
    }
}

impl Iterator for Lexer<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Self::Item> {
        while self.chars.next_if(|c| c.is_whitespace()).is_some() {}
        self.next_token()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn words(strs: &[&str]) -> Vec<Token> {
        strs.iter().map(|s| Token::Word(s.to_string())).collect()
    }

    #[test]
    fn test_simple_command() {
        assert_eq!(Lexer::new("ls").tokenize(), words(&["ls"]));
    }

    #[test]
    fn test_command_with_args() {
        assert_eq!(
            Lexer::new("pip install requests==2.31.0").tokenize(),
            words(&["pip", "install", "requests==2.31.0"])
        );
    }

    #[test]
    fn test_pipe() {
        assert_eq!(
            Lexer::new("pip list | grep numpy").tokenize(),
            vec![
                Token::Word("pip".to_string()),
                Token::Word("list".to_string()),
                Token::Pipe,
                Token::Word("grep".to_string()),
                Token::Word("numpy".to_string()),
            ]
        );
    }

    fn var(name: &str) -> WordPart {
        WordPart::Variable(name.to_string())
    }

    fn lit(text: &str) -> WordPart {
        WordPart::Literal(text.to_string())
    }

    #[test]
    fn test_variable() {
        assert_eq!(
            Lexer::new("echo $VIRTUAL_ENV ${HOME}").tokenize(),
            vec![
                Token::Word("echo".to_string()),
                Token::Expandable(vec![var("VIRTUAL_ENV")]),
                Token::Expandable(vec![var("HOME")]),
            ]
        );
    }

    #[test]
    fn test_adjacent_pieces_form_one_word() {
        assert_eq!(
            Lexer::new("cd $HOME/project/src").tokenize(),
            vec![
                Token::Word("cd".to_string()),
                Token::Expandable(vec![var("HOME"), lit("/project/src")]),
            ]
        );
        assert_eq!(
            Lexer::new("echo x\"quoted y\"'!' pre${USER}post").tokenize(),
            vec![
                Token::Word("echo".to_string()),
                Token::Word("xquoted y!".to_string()),
                Token::Expandable(vec![lit("pre"), var("USER"), lit("post")]),
            ]
        );
        assert_eq!(Lexer::new("echo done!").tokenize(), words(&["echo", "done!"]));
    }

    #[test]
    fn test_lone_dollar_and_unclosed_brace() {
        assert_eq!(Lexer::new("$").tokenize(), words(&["$"]));
        assert_eq!(Lexer::new("${HOME").tokenize(), words(&["${HOME"]));
    }

    #[test]
    fn test_history_refs() {
        assert_eq!(Lexer::new("!!").tokenize(), vec![Token::HistoryLast]);
        assert_eq!(Lexer::new("!5").tokenize(), vec![Token::HistoryIndex(5)]);
        assert_eq!(Lexer::new("!-2").tokenize(), vec![Token::HistoryIndex(-2)]);
        assert_eq!(Lexer::new("!pip").tokenize(), words(&["!pip"]));
        assert_eq!(Lexer::new("! !-").tokenize(), words(&["!", "!-"]));
    }

    #[test]
    fn test_single_quotes_are_literal() {
        assert_eq!(
            Lexer::new("echo 'print(\"hi\") $HOME'").tokenize(),
            words(&["echo", "print(\"hi\") $HOME"])
        );
    }

    #[test]
    fn test_double_quotes() {
        assert_eq!(
            Lexer::new("touch \"my notes.txt\"").tokenize(),
            words(&["touch", "my notes.txt"])
        );
    }

    #[test]
    fn test_double_quotes_expand_env() {
        let env = SessionEnv::activated();
        let tokens = Lexer::new("echo \"user=$USER ${MISSING} \\\"q\\\"\"")
            .with_env(&env)
            .tokenize();
        assert_eq!(tokens, words(&["echo", "user=student ${MISSING} \"q\""]));
    }

    #[test]
    fn test_lexer_iterator_count() {
        assert_eq!(Lexer::new("python main.py --verbose").count(), 3);
    }
}
