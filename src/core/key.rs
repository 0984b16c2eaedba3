//! # Key Tokens
//!
//! The unit the dispatcher matches against the registry. Printable
//! characters are case-sensitive: `a` and `A` are different keys.

use std::fmt;

pub const INTERRUPT_INPUT: &str = "\u{3}";
pub const HELP_MARK_INPUT: &str = "?";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum KeyToken {
    Char(char),
    /// Ctrl+C.
    Interrupt,
    /// `?`
    HelpMark,
}

impl KeyToken {
    /// Maps raw terminal input to a token. Multi-character data (pastes,
    /// escape sequences) is not a key command.
    pub fn from_input(data: &str) -> Option<KeyToken> {
        match data {
            INTERRUPT_INPUT => Some(KeyToken::Interrupt),
            HELP_MARK_INPUT => Some(KeyToken::HelpMark),
            _ => {
                let mut chars = data.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) if !c.is_control() => Some(KeyToken::Char(c)),
                    _ => None,
                }
            }
        }
    }
}

impl fmt::Display for KeyToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyToken::Char(c) => write!(f, "{c}"),
            KeyToken::Interrupt => write!(f, "ctrl+c"),
            KeyToken::HelpMark => write!(f, "?"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_input_special_tokens() {
        assert_eq!(KeyToken::from_input("\u{3}"), Some(KeyToken::Interrupt));
        assert_eq!(KeyToken::from_input("?"), Some(KeyToken::HelpMark));
    }

    #[test]
    fn test_from_input_is_case_sensitive() {
        assert_eq!(KeyToken::from_input("a"), Some(KeyToken::Char('a')));
        assert_eq!(KeyToken::from_input("A"), Some(KeyToken::Char('A')));
        assert_ne!(KeyToken::from_input("a"), KeyToken::from_input("A"));
    }

    #[test]
    fn test_from_input_rejects_sequences_and_controls() {
        assert_eq!(KeyToken::from_input("ab"), None);
        assert_eq!(KeyToken::from_input(""), None);
        assert_eq!(KeyToken::from_input("\u{1b}[A"), None);
        assert_eq!(KeyToken::from_input("\r"), None);
    }
}
