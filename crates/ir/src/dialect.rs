// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Dialect Support
//!
//! This module defines SQL dialects and the identifier rules semantic analysis
//! depends on.
//!
//! ## Dialect Families
//!
//! - **MySQL Family**: MySQL, TiDB and MariaDB
//!   - backtick and double-quote identifiers, unquoted names keep their case
//!   - name lookup is case-insensitive
//!
//! - **PostgreSQL Family**: PostgreSQL and CockroachDB
//!   - double-quote identifiers, unquoted names fold to lower case
//!
//! - **Standard**: the generic dialect used when no connection is configured
//!   - double-quote identifiers, unquoted names fold to upper case
//!
//! ## Identifier Matching
//!
//! Database metadata providers disagree on how names are stored and looked up,
//! so every lookup site goes through [`Dialect::find_by_identifier`], which
//! applies the same three tiers everywhere:
//!
//! 1. exact match
//! 2. match against the canonical form of the requested name
//! 3. case-insensitive match, only when the dialect allows it for this name

use serde::{Deserialize, Serialize};

use crate::kind::{DataKind, PropagationPolicy, PseudoAttribute};

/// Supported SQL dialects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
#[non_exhaustive]
pub enum Dialect {
    /// Generic SQL, used for connection-less analysis
    #[default]
    Generic,
    /// MySQL (5.7, 8.0)
    MySQL,
    /// PostgreSQL (12, 14, 15+)
    PostgreSQL,
    /// TiDB (5.0, 6.0, 7.0, 8.0)
    TiDB,
    /// MariaDB (10.x, 11.x)
    MariaDB,
    /// CockroachDB (21.x, 22.x, 23.x)
    CockroachDB,
}

/// Dialect family groupings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DialectFamily {
    Standard,
    MySQL,
    PostgreSQL,
}

/// How a dialect stores identifiers that were written without quotes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IdentifierCase {
    Upper,
    Lower,
    Mixed,
}

const STANDARD_GLOBALS: &[PseudoAttribute] = &[
    PseudoAttribute::global("CURRENT_DATE", DataKind::Datetime, "Current date"),
    PseudoAttribute::global("CURRENT_TIME", DataKind::Datetime, "Current time of day"),
    PseudoAttribute::global("CURRENT_TIMESTAMP", DataKind::Datetime, "Current date and time"),
    PseudoAttribute::global("CURRENT_USER", DataKind::String, "Name of the current user"),
];

const POSTGRESQL_GLOBALS: &[PseudoAttribute] = &[
    PseudoAttribute::global("current_date", DataKind::Datetime, "Current date"),
    PseudoAttribute::global("current_time", DataKind::Datetime, "Current time of day"),
    PseudoAttribute::global("current_timestamp", DataKind::Datetime, "Current date and time"),
    PseudoAttribute::global("current_user", DataKind::String, "Name of the current user"),
    PseudoAttribute::global("session_user", DataKind::String, "Session user name"),
    PseudoAttribute::global("current_schema", DataKind::String, "Name of the current schema"),
    PseudoAttribute::global("current_catalog", DataKind::String, "Name of the current database"),
];

const MYSQL_GLOBALS: &[PseudoAttribute] = &[
    PseudoAttribute::global("CURRENT_DATE", DataKind::Datetime, "Current date"),
    PseudoAttribute::global("CURRENT_TIME", DataKind::Datetime, "Current time of day"),
    PseudoAttribute::global("CURRENT_TIMESTAMP", DataKind::Datetime, "Current date and time"),
    PseudoAttribute::global("CURRENT_USER", DataKind::String, "Authenticated user name and host"),
    PseudoAttribute::global("LOCALTIME", DataKind::Datetime, "Synonym for NOW()"),
    PseudoAttribute::global("LOCALTIMESTAMP", DataKind::Datetime, "Synonym for NOW()"),
];

const POSTGRESQL_ROWSET: &[PseudoAttribute] = &[
    PseudoAttribute::rowset(
        "ctid",
        DataKind::Rowid,
        PropagationPolicy::TableLocal,
        "Physical location of the row version within its table",
    ),
    PseudoAttribute::rowset(
        "xmin",
        DataKind::Numeric,
        PropagationPolicy::TableLocal,
        "Identity of the inserting transaction for this row version",
    ),
    PseudoAttribute::rowset(
        "xmax",
        DataKind::Numeric,
        PropagationPolicy::TableLocal,
        "Identity of the deleting transaction, or zero",
    ),
    PseudoAttribute::rowset(
        "tableoid",
        DataKind::Numeric,
        PropagationPolicy::TableGlobal,
        "OID of the table containing this row",
    ),
];

const COCKROACHDB_ROWSET: &[PseudoAttribute] = &[PseudoAttribute::rowset(
    "crdb_internal_mvcc_timestamp",
    DataKind::Numeric,
    PropagationPolicy::TableLocal,
    "MVCC timestamp of the row",
)];

impl Dialect {
    /// Returns the family this dialect belongs to
    pub fn family(&self) -> DialectFamily {
        match self {
            Dialect::Generic => DialectFamily::Standard,
            Dialect::MySQL | Dialect::TiDB | Dialect::MariaDB => DialectFamily::MySQL,
            Dialect::PostgreSQL | Dialect::CockroachDB => DialectFamily::PostgreSQL,
        }
    }

    /// Case applied to identifiers written without quotes
    pub fn stores_unquoted_case(&self) -> IdentifierCase {
        match self.family() {
            DialectFamily::Standard => IdentifierCase::Upper,
            DialectFamily::MySQL => IdentifierCase::Mixed,
            DialectFamily::PostgreSQL => IdentifierCase::Lower,
        }
    }

    /// Whether the server resolves object names ignoring case
    pub fn use_case_insensitive_name_lookup(&self) -> bool {
        self.family() == DialectFamily::MySQL
    }

    /// Characters that may open and close a quoted identifier
    pub fn identifier_quotes(&self) -> &'static [char] {
        match self.family() {
            DialectFamily::MySQL => &['`', '"'],
            DialectFamily::Standard | DialectFamily::PostgreSQL => &['"'],
        }
    }

    /// Check whether an identifier is written in quotes
    ///
    /// # Examples
    ///
    /// ```
    /// use unified_sql_lsp_ir::Dialect;
    ///
    /// assert!(Dialect::MySQL.is_quoted_identifier("`Users`"));
    /// assert!(!Dialect::PostgreSQL.is_quoted_identifier("`Users`"));
    /// assert!(Dialect::PostgreSQL.is_quoted_identifier("\"Users\""));
    /// ```
    pub fn is_quoted_identifier(&self, ident: &str) -> bool {
        let mut chars = ident.chars();
        match (chars.next(), chars.next_back()) {
            (Some(open), Some(close)) => open == close && self.identifier_quotes().contains(&open),
            _ => false,
        }
    }

    /// Strip identifier quotes, undoubling escaped quote characters
    ///
    /// Unquoted identifiers are returned unchanged.
    ///
    /// # Examples
    ///
    /// ```
    /// use unified_sql_lsp_ir::Dialect;
    ///
    /// assert_eq!(Dialect::PostgreSQL.unquoted_identifier("\"My \"\"Table\"\"\""), "My \"Table\"");
    /// assert_eq!(Dialect::PostgreSQL.unquoted_identifier("Users"), "Users");
    /// ```
    pub fn unquoted_identifier(&self, ident: &str) -> String {
        if !self.is_quoted_identifier(ident) {
            return ident.to_string();
        }

        let Some(quote) = ident.chars().next() else {
            return ident.to_string();
        };
        let width = quote.len_utf8();
        let inner = &ident[width..ident.len() - width];
        let doubled: String = [quote, quote].iter().collect();
        inner.replace(&doubled, &quote.to_string())
    }

    /// Canonical (stored) form of an identifier as written in query text
    ///
    /// Quoted identifiers keep their exact spelling; unquoted ones are folded
    /// to the case the dialect stores them in.
    ///
    /// # Examples
    ///
    /// ```
    /// use unified_sql_lsp_ir::Dialect;
    ///
    /// assert_eq!(Dialect::PostgreSQL.canonical_identifier("Users"), "users");
    /// assert_eq!(Dialect::PostgreSQL.canonical_identifier("\"Users\""), "Users");
    /// assert_eq!(Dialect::Generic.canonical_identifier("users"), "USERS");
    /// assert_eq!(Dialect::MySQL.canonical_identifier("Users"), "Users");
    /// ```
    pub fn canonical_identifier(&self, ident: &str) -> String {
        if self.is_quoted_identifier(ident) {
            return self.unquoted_identifier(ident);
        }
        match self.stores_unquoted_case() {
            IdentifierCase::Upper => ident.to_uppercase(),
            IdentifierCase::Lower => ident.to_lowercase(),
            IdentifierCase::Mixed => ident.to_string(),
        }
    }

    /// Spelling of a stored name that refers to it when written in a query
    ///
    /// Names that an unquoted identifier would fold to stay bare; any other
    /// name is quoted.
    ///
    /// # Examples
    ///
    /// ```
    /// use unified_sql_lsp_ir::Dialect;
    ///
    /// assert_eq!(Dialect::PostgreSQL.quoted_if_needed("city"), "city");
    /// assert_eq!(Dialect::PostgreSQL.quoted_if_needed("City"), "\"City\"");
    /// assert_eq!(Dialect::MySQL.quoted_if_needed("City"), "City");
    /// ```
    pub fn quoted_if_needed(&self, stored: &str) -> String {
        if !self.is_quoted_identifier(stored) && self.canonical_identifier(stored) == stored {
            return stored.to_string();
        }
        let quote = self.identifier_quotes().first().copied().unwrap_or('"');
        let doubled: String = [quote, quote].iter().collect();
        format!("{quote}{}{quote}", stored.replace(quote, &doubled))
    }

    /// Whether a case-insensitive comparison is acceptable for this name
    pub fn allows_case_insensitive_match(&self, ident: &str) -> bool {
        self.use_case_insensitive_name_lookup()
            || (!self.is_quoted_identifier(ident)
                && self.stores_unquoted_case() == IdentifierCase::Mixed)
    }

    /// Find the item whose name matches `name`, using the three-tier rule
    ///
    /// Returns the first item of the first tier that produced any match.
    pub fn find_by_identifier<'a, T, I, F>(&self, name: &str, items: I, key: F) -> Option<&'a T>
    where
        T: ?Sized + 'a,
        I: IntoIterator<Item = &'a T>,
        I::IntoIter: Clone,
        F: Fn(&T) -> &str,
    {
        self.filter_by_identifier(name, items, key).into_iter().next()
    }

    /// All items matching `name` in the first tier that produced any match
    ///
    /// Used by callers that need to detect ambiguous names.
    pub fn filter_by_identifier<'a, T, I, F>(&self, name: &str, items: I, key: F) -> Vec<&'a T>
    where
        T: ?Sized + 'a,
        I: IntoIterator<Item = &'a T>,
        I::IntoIter: Clone,
        F: Fn(&T) -> &str,
    {
        let items = items.into_iter();

        let exact: Vec<&'a T> = items.clone().filter(|item| key(*item) == name).collect();
        if !exact.is_empty() {
            return exact;
        }

        let canonical = self.canonical_identifier(name);
        let normalized: Vec<&'a T> = items
            .clone()
            .filter(|item| key(*item) == canonical)
            .collect();
        if !normalized.is_empty() || !self.allows_case_insensitive_match(name) {
            return normalized;
        }

        let folded = fold_case(&self.unquoted_identifier(name));
        items
            .filter(|item| fold_case(&self.unquoted_identifier(key(*item))) == folded)
            .collect()
    }

    /// Match a name against a list of candidate names
    ///
    /// # Examples
    ///
    /// ```
    /// use unified_sql_lsp_ir::Dialect;
    ///
    /// let names = ["id", "Name", "email"];
    /// assert_eq!(Dialect::MySQL.match_identifier("NAME", names), Some("Name"));
    /// assert_eq!(Dialect::PostgreSQL.match_identifier("NAME", names), None);
    /// assert_eq!(Dialect::PostgreSQL.match_identifier("ID", names), Some("id"));
    /// ```
    pub fn match_identifier<'a, I>(&self, name: &str, candidates: I) -> Option<&'a str>
    where
        I: IntoIterator<Item = &'a str>,
        I::IntoIter: Clone,
    {
        self.find_by_identifier(name, candidates, |c| c)
    }

    /// Check a single candidate name against `name`
    pub fn matches_identifier(&self, name: &str, candidate: &str) -> bool {
        self.find_by_identifier(name, std::iter::once(candidate), |c| c)
            .is_some()
    }

    /// Session-level variables usable as columns anywhere in a query
    pub fn global_variables(&self) -> &'static [PseudoAttribute] {
        match self.family() {
            DialectFamily::Standard => STANDARD_GLOBALS,
            DialectFamily::MySQL => MYSQL_GLOBALS,
            DialectFamily::PostgreSQL => POSTGRESQL_GLOBALS,
        }
    }

    /// System columns every table row exposes without being declared
    pub fn rowset_pseudo_attributes(&self) -> &'static [PseudoAttribute] {
        match self {
            Dialect::PostgreSQL => POSTGRESQL_ROWSET,
            Dialect::CockroachDB => COCKROACHDB_ROWSET,
            _ => &[],
        }
    }
}

/// Full Unicode case folding, so `ß` and `SS` compare equal
fn fold_case(ident: &str) -> String {
    ident.to_uppercase().to_lowercase()
}
