// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use std::fmt::{self, Display};

/// Result of a search request, as a typed-ahead search field would receive it.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SearchResult {
    pub query: String,
    pub hits: u32,
}

impl SearchResult {
    pub fn new(query: impl Into<String>, hits: u32) -> Self {
        Self {
            query: query.into(),
            hits,
        }
    }
}

impl Display for SearchResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}' ({} hits)", self.query, self.hits)
    }
}

pub fn result_r() -> SearchResult {
    SearchResult::new("r", 9000)
}

pub fn result_ru() -> SearchResult {
    SearchResult::new("ru", 1200)
}

pub fn result_rus() -> SearchResult {
    SearchResult::new("rus", 310)
}

pub fn result_rust() -> SearchResult {
    SearchResult::new("rust", 42)
}
