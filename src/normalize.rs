//! Rule text normalization.
//!
//! Controller templates emit compact, inconsistently spaced and quoted rule
//! expressions such as `"ADVERTISE_PIP_BGP!=true&&OTHER==false"`. Normalization
//! only changes spacing, quoting and boolean spelling so that the grammar sees
//! single-space delimited operators.

use std::sync::LazyLock;

use regex::Regex;

static BARE_TRUE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\btrue\b").expect("bare true pattern"));

static BARE_FALSE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bfalse\b").expect("bare false pattern"));

static WHITESPACE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s{2,}").expect("whitespace pattern"));

static MULTI_CLAUSE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(\(.*\))(.*)(\(.*\))\s*$").expect("multi-clause pattern")
});

/// Literal substitutions, applied in order before boolean spelling and
/// whitespace collapsing.
const SUBSTITUTIONS: &[(&str, &str)] = &[
    ("\"", ""),
    ("'", ""),
    ("$$", ""),
    ("&&", " and "),
    ("||", " or "),
    ("==", " == "),
    ("!=", " != "),
    ("(", " ( "),
    (")", " ) "),
];

/// Normalize one raw rule string.
#[must_use]
pub fn normalize(raw: &str) -> String {
    let mut rule = raw.to_owned();
    for (from, to) in SUBSTITUTIONS {
        rule = rule.replace(from, to);
    }
    let rule = BARE_TRUE.replace_all(&rule, "True");
    let rule = BARE_FALSE.replace_all(&rule, "False");
    WHITESPACE_RUN.replace_all(&rule, " ").into_owned()
}

/// A rule shaped as two parenthesized clauses joined by infix text,
/// e.g. `( A == 1 ) and ( B == 2 )`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultiClause<'a> {
    pub left: &'a str,
    pub middle: &'a str,
    pub right: &'a str,
}

/// Split a normalized rule into its leading group, middle text and trailing
/// group. Returns `None` when the rule does not have that shape.
#[must_use]
pub fn split_multi_clause(rule: &str) -> Option<MultiClause<'_>> {
    let caps = MULTI_CLAUSE.captures(rule)?;
    Some(MultiClause {
        left: caps.get(1)?.as_str(),
        middle: caps.get(2)?.as_str(),
        right: caps.get(3)?.as_str(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compact_rule_is_spaced() {
        assert_eq!(
            normalize("ADVERTISE_PIP_BGP!=true&&OTHER_PARAM==false"),
            "ADVERTISE_PIP_BGP != True and OTHER_PARAM == False"
        );
    }

    #[test]
    fn quoted_rule_is_unquoted() {
        assert_eq!(
            normalize("\"REPLICATION_MODE=='Multicast'\""),
            "REPLICATION_MODE == Multicast"
        );
    }

    #[test]
    fn dollar_markers_removed() {
        assert_eq!(normalize("$$UNDERLAY_IS_V6$$!=true"), "UNDERLAY_IS_V6 != True");
    }

    #[test]
    fn true_inside_identifier_untouched() {
        assert_eq!(normalize("IS_true_X==1"), "IS_true_X == 1");
        assert_eq!(normalize("untrue==1"), "untrue == 1");
    }

    #[test]
    fn idempotent_on_normalized_text() {
        let once = normalize("(A==1)||(B!=\"x\")");
        assert_eq!(normalize(&once), once);
    }

    #[test]
    fn multi_clause_split() {
        let rule = normalize("(A==1)&&(B==2)");
        let parts = split_multi_clause(&rule).unwrap();
        assert_eq!(parts.left, "( A == 1 )");
        assert_eq!(parts.middle, " and ");
        assert_eq!(parts.right, "( B == 2 )");
    }

    #[test]
    fn multi_clause_takes_last_group_as_right() {
        let rule = normalize("(A==1)&&(B==2)||(C==3)");
        let parts = split_multi_clause(&rule).unwrap();
        assert_eq!(parts.left, "( A == 1 ) and ( B == 2 )");
        assert_eq!(parts.middle, " or ");
        assert_eq!(parts.right, "( C == 3 )");
    }

    #[test]
    fn single_group_is_not_multi_clause() {
        assert!(split_multi_clause("( A == 1 and B == 2 )").is_none());
        assert!(split_multi_clause("A == 1").is_none());
    }
}
