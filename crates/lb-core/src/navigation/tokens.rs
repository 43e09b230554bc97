//! Short-lived tokens standing in for dataset values inside one menu

use std::fmt;
use indexmap::IndexMap;
use uuid::Uuid;

/// Length of a generated token in hex characters
pub const TOKEN_LEN: usize = 8;

/// Opaque menu-scoped identifier carried in button payloads
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Token(String);

impl Token {
    /// Draw a new random token
    pub fn generate() -> Self {
        let hex = Uuid::new_v4().simple().to_string();
        Self(hex[..TOKEN_LEN].to_string())
    }
    
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Token {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for Token {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Token → value map for one rendered menu, in choice order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenMap {
    entries: IndexMap<Token, String>,
}

impl TokenMap {
    /// Issue a fresh token for every value, keeping the given order
    pub fn issue<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut entries = IndexMap::new();
        for value in values {
            let mut token = Token::generate();
            while entries.contains_key(&token) {
                token = Token::generate();
            }
            entries.insert(token, value.into());
        }
        Self { entries }
    }
    
    /// Look up the value a token stands for
    pub fn resolve(&self, token: &Token) -> Option<&str> {
        self.entries.get(token).map(String::as_str)
    }
    
    /// Iterate (token, value) pairs in choice order
    pub fn iter(&self) -> impl Iterator<Item = (&Token, &str)> {
        self.entries.iter().map(|(token, value)| (token, value.as_str()))
    }
    
    pub fn len(&self) -> usize {
        self.entries.len()
    }
    
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    
    #[test]
    fn test_generated_tokens_are_short_hex() {
        let token = Token::generate();
        assert_eq!(token.as_str().len(), TOKEN_LEN);
        assert!(token.as_str().chars().all(|c| c.is_ascii_hexdigit()));
    }
    
    #[test]
    fn test_issue_preserves_order_and_resolves() {
        let map = TokenMap::issue(["PumpA", "PumpB", "PumpC"]);
        let values: Vec<_> = map.iter().map(|(_, value)| value).collect();
        assert_eq!(values, vec!["PumpA", "PumpB", "PumpC"]);
        
        for (token, value) in map.iter() {
            assert_eq!(map.resolve(token), Some(value));
        }
        assert_eq!(map.resolve(&Token::from("zzzzzzzz")), None);
    }
    
    #[test]
    fn test_reissuing_yields_new_tokens() {
        let first = TokenMap::issue(["PumpA"]);
        let second = TokenMap::issue(["PumpA"]);
        let (old, _) = first.iter().next().unwrap();
        let (new, _) = second.iter().next().unwrap();
        assert_ne!(old, new);
    }
}
