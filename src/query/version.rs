//! Version selectors.
//!
//! `first` and `last` pick the earliest and latest `modified` of each
//! object, `all` disables version filtering, and a timestamp picks the
//! version modified at exactly that instant. Several selectors OR together.

use crate::error::DatastoreError;
use crate::timestamp::Timestamp;

const FIRST: &str = "first";
const LAST: &str = "last";
const ALL: &str = "all";

/// One disjunct of a version rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionMatch {
    First,
    Last,
    Exact(Timestamp),
}

/// Earliest and latest `modified` among one object's versions in a collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VersionBounds {
    pub first: Timestamp,
    pub last: Timestamp,
}

impl VersionBounds {
    pub fn of(modified: Timestamp) -> Self {
        Self {
            first: modified,
            last: modified,
        }
    }

    pub fn include(&mut self, modified: Timestamp) {
        if modified < self.first {
            self.first = modified;
        }
        if modified > self.last {
            self.last = modified;
        }
    }
}

/// Declarative version selection handed to the object store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionRule {
    All,
    Any(Vec<VersionMatch>),
}

impl Default for VersionRule {
    fn default() -> Self {
        VersionRule::Any(vec![VersionMatch::Last])
    }
}

impl VersionRule {
    /// Resolve raw selector tokens. Combination rules are checked before any
    /// token is parsed, so `["all", "garbage"]` reports the combination.
    pub fn resolve<S: AsRef<str>>(selectors: &[S]) -> Result<Self, DatastoreError> {
        if selectors.is_empty() {
            return Ok(VersionRule::default());
        }

        let count = |keyword: &str| selectors.iter().filter(|s| s.as_ref() == keyword).count();
        if count(FIRST) > 1 {
            return Err(DatastoreError::InvalidVersionCombination(
                "first may only be given once".into(),
            ));
        }
        if count(LAST) > 1 {
            return Err(DatastoreError::InvalidVersionCombination(
                "last may only be given once".into(),
            ));
        }
        if count(ALL) > 0 && selectors.len() > 1 {
            return Err(DatastoreError::InvalidVersionCombination(
                "all cannot be combined with other selectors".into(),
            ));
        }

        if selectors[0].as_ref() == ALL {
            return Ok(VersionRule::All);
        }

        selectors
            .iter()
            .map(|token| parse_token(token.as_ref()))
            .collect::<Result<Vec<_>, _>>()
            .map(VersionRule::Any)
    }

    /// Whether a version with the given `modified` is selected, given the
    /// bounds of its object.
    pub fn admits(&self, modified: Timestamp, bounds: &VersionBounds) -> bool {
        match self {
            VersionRule::All => true,
            VersionRule::Any(matches) => matches.iter().any(|m| match m {
                VersionMatch::First => modified == bounds.first,
                VersionMatch::Last => modified == bounds.last,
                VersionMatch::Exact(at) => modified == *at,
            }),
        }
    }

    /// True when evaluating the rule needs per-object bounds.
    pub fn needs_bounds(&self) -> bool {
        match self {
            VersionRule::All => false,
            VersionRule::Any(matches) => matches
                .iter()
                .any(|m| matches!(m, VersionMatch::First | VersionMatch::Last)),
        }
    }
}

fn parse_token(token: &str) -> Result<VersionMatch, DatastoreError> {
    match token {
        FIRST => Ok(VersionMatch::First),
        LAST => Ok(VersionMatch::Last),
        other => Timestamp::parse(other)
            .map(VersionMatch::Exact)
            .map_err(|_| DatastoreError::InvalidVersionToken(other.to_string())),
    }
}
