//! User selections over numbered lists.
//!
//! Menus print zero-based indices; users answer with `all`, a single number,
//! a comma list, or inclusive ranges (`0,2,5-7`). Out-of-range numbers are
//! kept; the download engine reports them per index.

use std::collections::HashSet;

use thiserror::Error;

/// Most indices a single selection may name.
pub const MAX_SELECTED: usize = 10_000;

/// Invalid user input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
    /// The input was empty.
    #[error("no selection given")]
    Empty,

    /// A token was not a number or range.
    #[error("'{token}' is not a valid number")]
    NotANumber {
        /// Offending token.
        token: String,
    },

    /// A range ran backwards.
    #[error("range '{token}' is reversed")]
    ReversedRange {
        /// Offending token.
        token: String,
    },

    /// The selection names more than [`MAX_SELECTED`] indices.
    #[error("selection '{token}' names too many items (at most {max})")]
    TooLarge {
        /// Token that crossed the limit.
        token: String,
        /// The limit.
        max: usize,
    },

    /// A single-choice index did not exist.
    #[error("selected number {index} is wrong (valid: 0..{len})")]
    OutOfRange {
        /// Requested index.
        index: usize,
        /// Number of choices.
        len: usize,
    },
}

/// A parsed selection, independent of the list it will apply to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// Every item.
    All,
    /// Explicit indices in input order, duplicates removed.
    Indices(Vec<usize>),
}

impl Selection {
    /// Parses `all`, `N`, `N,M` and `N-M`.
    ///
    /// # Errors
    ///
    /// Returns [`SelectionError`] for empty input, non-numeric tokens,
    /// reversed ranges and selections naming more than [`MAX_SELECTED`]
    /// indices.
    pub fn parse(input: &str) -> Result<Self, SelectionError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(SelectionError::Empty);
        }
        if input.eq_ignore_ascii_case("all") {
            return Ok(Self::All);
        }

        let mut indices = Vec::new();
        for token in input.split(',').map(str::trim).filter(|t| !t.is_empty()) {
            match token.split_once('-') {
                Some((start, end)) => {
                    let start = parse_number(start, token)?;
                    let end = parse_number(end, token)?;
                    if start > end {
                        return Err(SelectionError::ReversedRange {
                            token: token.to_string(),
                        });
                    }
                    // `end - start` cannot overflow once start <= end.
                    if end - start >= MAX_SELECTED - indices.len() {
                        return Err(too_large(token));
                    }
                    indices.extend(start..=end);
                }
                None => {
                    if indices.len() >= MAX_SELECTED {
                        return Err(too_large(token));
                    }
                    indices.push(parse_number(token, token)?);
                }
            }
        }

        if indices.is_empty() {
            return Err(SelectionError::Empty);
        }
        let mut seen = HashSet::new();
        indices.retain(|index| seen.insert(*index));
        Ok(Self::Indices(indices))
    }

    /// Expands to concrete indices for a list of `len` items.
    ///
    /// Explicit indices are returned as given, even past `len`.
    #[must_use]
    pub fn resolve(&self, len: usize) -> Vec<usize> {
        match self {
            Self::All => (0..len).collect(),
            Self::Indices(indices) => indices.clone(),
        }
    }
}

/// Parses a selection and expands it against a list of `len` items.
///
/// # Errors
///
/// See [`Selection::parse`].
pub fn parse_indices(input: &str, len: usize) -> Result<Vec<usize>, SelectionError> {
    Selection::parse(input).map(|selection| selection.resolve(len))
}

fn too_large(token: &str) -> SelectionError {
    SelectionError::TooLarge {
        token: token.to_string(),
        max: MAX_SELECTED,
    }
}

fn parse_number(value: &str, token: &str) -> Result<usize, SelectionError> {
    value
        .trim()
        .parse()
        .map_err(|_| SelectionError::NotANumber {
            token: token.to_string(),
        })
}

/// Picks one item by index.
///
/// # Errors
///
/// Returns [`SelectionError::OutOfRange`] if `index` is past the end.
pub fn select<T>(items: &[T], index: usize) -> Result<&T, SelectionError> {
    items.get(index).ok_or(SelectionError::OutOfRange {
        index,
        len: items.len(),
    })
}
