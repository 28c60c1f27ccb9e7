// SPDX-FileCopyrightText: 2026 Dialograph contributors
// SPDX-License-Identifier: LicenseRef-Dialograph-Proprietary
//
// All rights reserved.
//
// This file is part of Dialograph and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::borrow::Borrow;
use std::fmt;
use std::marker::PhantomData;
use std::str::FromStr;

/// An opaque identifier for graph objects.
///
/// The format is not enforced beyond being a non-empty token without whitespace; ids
/// produced by [`UuidSource`] are v4 uuids, but imported graphs may carry anything.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Id<T> {
    value: String,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Id<T> {
    pub fn new(value: impl Into<String>) -> Result<Self, IdError> {
        let value = value.into();
        validate_token(&value)?;
        Ok(Self {
            value,
            _marker: PhantomData,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }

    pub fn into_string(self) -> String {
        self.value
    }

    /// Reinterprets the token under another tag, e.g. a freshly drawn [`Token`] as a
    /// [`NodeId`].
    pub fn retag<U>(self) -> Id<U> {
        Id {
            value: self.value,
            _marker: PhantomData,
        }
    }
}

impl<T> fmt::Display for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

impl<T> AsRef<str> for Id<T> {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl<T> Borrow<str> for Id<T> {
    fn borrow(&self) -> &str {
        self.as_str()
    }
}

impl<T> FromStr for Id<T> {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s.to_owned())
    }
}

impl<T> TryFrom<String> for Id<T> {
    type Error = IdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdError {
    Empty,
    ContainsWhitespace,
}

impl fmt::Display for IdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => f.write_str("id must not be empty"),
            Self::ContainsWhitespace => f.write_str("id must not contain whitespace"),
        }
    }
}

impl std::error::Error for IdError {}

fn validate_token(value: &str) -> Result<(), IdError> {
    if value.is_empty() {
        return Err(IdError::Empty);
    }
    if value.chars().any(char::is_whitespace) {
        return Err(IdError::ContainsWhitespace);
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TokenTag {}
pub type Token = Id<TokenTag>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NodeIdTag {}
pub type NodeId = Id<NodeIdTag>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EdgeIdTag {}
pub type EdgeId = Id<EdgeIdTag>;

/// Supplies fresh tokens for new nodes and edges.
///
/// Tokens must be unique for the lifetime of the session that owns the source.
pub trait IdentifierSource {
    fn next_token(&mut self) -> Token;
}

impl<S: IdentifierSource + ?Sized> IdentifierSource for Box<S> {
    fn next_token(&mut self) -> Token {
        (**self).next_token()
    }
}

/// Random v4 uuids.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidSource;

impl IdentifierSource for UuidSource {
    fn next_token(&mut self) -> Token {
        let value = uuid::Uuid::new_v4().hyphenated().to_string();
        Token::new(value).expect("hyphenated uuid is a valid token")
    }
}

/// Deterministic `<prefix><n>` tokens.
#[derive(Debug, Clone)]
pub struct SequentialSource {
    prefix: String,
    next: u64,
}

impl SequentialSource {
    pub fn new(prefix: impl Into<String>) -> Self {
        let mut prefix = prefix.into();
        prefix.retain(|ch| !ch.is_whitespace());
        Self { prefix, next: 1 }
    }
}

impl Default for SequentialSource {
    fn default() -> Self {
        Self::new("id-")
    }
}

impl IdentifierSource for SequentialSource {
    fn next_token(&mut self) -> Token {
        let value = format!("{}{}", self.prefix, self.next);
        self.next = self.next.saturating_add(1);
        Token::new(value).expect("counter suffix keeps the token non-empty")
    }
}

#[cfg(test)]
mod tests {
    use super::{Id, IdError, IdentifierSource, NodeId, SequentialSource, UuidSource};

    #[test]
    fn id_rejects_empty() {
        let result: Result<Id<()>, _> = Id::new("");
        assert_eq!(result, Err(IdError::Empty));
    }

    #[test]
    fn id_rejects_whitespace() {
        let result: Result<Id<()>, _> = Id::new("a b");
        assert_eq!(result, Err(IdError::ContainsWhitespace));
    }

    #[test]
    fn sequential_source_counts_up_and_retags() {
        let mut ids = SequentialSource::new("n ");
        let first: NodeId = ids.next_token().retag();
        let second: NodeId = ids.next_token().retag();
        assert_eq!(first.as_str(), "n1");
        assert_eq!(second.as_str(), "n2");
    }

    #[test]
    fn uuid_source_yields_distinct_tokens() {
        let mut ids = UuidSource;
        assert_ne!(ids.next_token(), ids.next_token());
    }
}
