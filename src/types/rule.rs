use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::expr::{Expr, RuleTerm};

/// Which rule class a clause represents.
///
/// The set is open: controller templates may carry rule-bearing annotations
/// beyond the two that drive validation, and those are kept as `Other`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ContextTag {
    /// Applicability condition. The parameter is not applicable while the
    /// condition evaluates false.
    NotApplicable,
    /// The parameter must be supplied while the condition evaluates true.
    Mandatory,
    Other(String),
}

impl ContextTag {
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            ContextTag::NotApplicable => "na",
            ContextTag::Mandatory => "mandatory",
            ContextTag::Other(tag) => tag,
        }
    }
}

impl From<&str> for ContextTag {
    fn from(tag: &str) -> Self {
        match tag {
            "na" => ContextTag::NotApplicable,
            "mandatory" => ContextTag::Mandatory,
            other => ContextTag::Other(other.to_owned()),
        }
    }
}

impl fmt::Display for ContextTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ContextTag {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ContextTag {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let tag = String::deserialize(deserializer)?;
        Ok(ContextTag::from(tag.as_str()))
    }
}

/// One tagged condition of a [`Rule`], with the rule text it was parsed from.
#[derive(Debug, Clone, PartialEq)]
pub struct Clause {
    pub tag: ContextTag,
    pub source: String,
    pub condition: Expr,
}

/// The parsed rules attached to one template parameter, one clause per tag.
///
/// A rule without clauses is vacuously true: the parameter always applies
/// and is never required.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Rule {
    clauses: Vec<Clause>,
}

impl Rule {
    /// The always-applicable rule.
    #[must_use]
    pub const fn always() -> Self {
        Self {
            clauses: Vec::new(),
        }
    }

    /// Add or replace the clause for `clause.tag`.
    pub(crate) fn insert(&mut self, clause: Clause) {
        match self.clauses.iter_mut().find(|c| c.tag == clause.tag) {
            Some(existing) => *existing = clause,
            None => self.clauses.push(clause),
        }
    }

    #[must_use]
    pub fn clause(&self, tag: &ContextTag) -> Option<&Clause> {
        self.clauses.iter().find(|c| &c.tag == tag)
    }

    #[must_use]
    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }

    /// Leaf comparisons of the clause tagged `tag`; empty if there is none.
    #[must_use]
    pub fn terms(&self, tag: &ContextTag) -> Vec<RuleTerm> {
        self.clause(tag)
            .map(|c| c.condition.terms())
            .unwrap_or_default()
    }

    #[must_use]
    pub fn is_always(&self) -> bool {
        self.clauses.is_empty()
    }
}
