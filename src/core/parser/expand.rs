//! Token expansion for variables and history.
//!
//! Handles:
//! - Variable expansion inside words (`$VAR` → value, unknown → empty)
//! - History expansion (`!!` → last command, `!n` → nth command, `!-n` → nth from last)

use super::lexer::{Lexer, Token, WordPart};
use crate::core::env::SessionEnv;

/// Expand variables and history references in tokens.
///
/// `history` holds the commands submitted before the current line.
pub fn expand_tokens(tokens: Vec<Token>, history: &[String], env: &SessionEnv) -> Vec<Token> {
    tokens
        .into_iter()
        .flat_map(|token| match token {
            Token::Expandable(parts) => vec![Token::Word(resolve(&parts, env))],
            Token::HistoryLast => recall(history.last(), env),
            Token::HistoryIndex(n) => {
                let entry = if n >= 0 {
                    history.get(n as usize)
                } else {
                    history
                        .len()
                        .checked_add_signed(n as isize)
                        .and_then(|i| history.get(i))
                };
                recall(entry, env)
            }
            other => vec![other],
        })
        .collect()
}

/// Re-tokenize a recalled command without further history expansion.
fn recall(entry: Option<&String>, env: &SessionEnv) -> Vec<Token> {
    let Some(cmd) = entry else {
        return Vec::new();
    };
    let tokens: Vec<Token> = Lexer::new(cmd)
        .with_env(env)
        .filter(|t| !matches!(t, Token::HistoryLast | Token::HistoryIndex(_)))
        .collect();
    tokens
        .into_iter()
        .map(|t| match t {
            Token::Expandable(parts) => Token::Word(resolve(&parts, env)),
            other => other,
        })
        .collect()
}

/// Join word parts, substituting variables. Unknown variables are empty.
fn resolve(parts: &[WordPart], env: &SessionEnv) -> String {
    parts
        .iter()
        .map(|part| match part {
            WordPart::Literal(text) => text.clone(),
            WordPart::Variable(name) => env.get(name).unwrap_or_default(),
        })
        .collect()
}

// =============================================================================
// Tests
// =============================================================================
