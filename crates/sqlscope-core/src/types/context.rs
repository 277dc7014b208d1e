use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::Span;

/// The SQL clause the cursor sits in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Clause {
    Select,
    From,
    Join,
    On,
    Where,
    GroupBy,
    Having,
    OrderBy,
    InsertInto,
    Update,
    Set,
    Unknown,
}

impl Clause {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Select => "select",
            Self::From => "from",
            Self::Join => "join",
            Self::On => "on",
            Self::Where => "where",
            Self::GroupBy => "group_by",
            Self::Having => "having",
            Self::OrderBy => "order_by",
            Self::InsertInto => "insert_into",
            Self::Update => "update",
            Self::Set => "set",
            Self::Unknown => "unknown",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum TableKind {
    Table,
    File,
    Function,
    Subquery,
}

/// A relation visible in the cursor's scope.
///
/// `name` is the quote-stripped identifier for tables, the path for files, the
/// full call text for functions, and the alias (or a synthesized `subquery_N`)
/// for subqueries. Only subqueries carry `subquery_text`; the constructors are
/// the only way to build one, and deserialization goes through them too.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", try_from = "RawTableReference")]
pub struct TableReference {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    pub kind: TableKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    subquery_text: Option<String>,
}

/// Wire form of [`TableReference`], checked before it becomes one.
#[derive(Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
struct RawTableReference {
    name: String,
    #[serde(default)]
    alias: Option<String>,
    kind: TableKind,
    #[serde(default)]
    subquery_text: Option<String>,
}

impl TryFrom<RawTableReference> for TableReference {
    type Error = String;

    fn try_from(raw: RawTableReference) -> Result<Self, Self::Error> {
        match (raw.kind, raw.subquery_text) {
            (TableKind::Subquery, Some(text)) => Ok(Self::subquery(raw.name, raw.alias, text)),
            (TableKind::Subquery, None) => Err(format!(
                "subquery reference `{}` is missing subqueryText",
                raw.name
            )),
            (kind, None) => Ok(Self::plain(raw.name, raw.alias, kind)),
            (_, Some(_)) => Err(format!(
                "only subquery references carry subqueryText, `{}` does not",
                raw.name
            )),
        }
    }
}

impl TableReference {
    pub fn table(name: impl Into<String>, alias: Option<String>) -> Self {
        Self::plain(name, alias, TableKind::Table)
    }

    pub fn file(path: impl Into<String>, alias: Option<String>) -> Self {
        Self::plain(path, alias, TableKind::File)
    }

    pub fn function(call: impl Into<String>, alias: Option<String>) -> Self {
        Self::plain(call, alias, TableKind::Function)
    }

    pub fn subquery(
        name: impl Into<String>,
        alias: Option<String>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            alias,
            kind: TableKind::Subquery,
            subquery_text: Some(text.into()),
        }
    }

    fn plain(name: impl Into<String>, alias: Option<String>, kind: TableKind) -> Self {
        Self {
            name: name.into(),
            alias,
            kind,
            subquery_text: None,
        }
    }

    pub fn subquery_text(&self) -> Option<&str> {
        self.subquery_text.as_deref()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CteReference {
    pub name: String,
}

/// Present only when the cursor is inside an open, unterminated quote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct QuoteContext {
    pub in_quote: bool,
    pub quote_char: char,
    /// Absolute byte offset of the opening quote character.
    pub quote_start: usize,
    /// Text typed since the quote opened.
    pub path_prefix: String,
}

/// Everything the completion assembler needs to know about the cursor position.
///
/// Fully determined by `(sql, cursor)`; all offsets are absolute UTF-8 byte
/// offsets into the analyzed buffer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SqlContext {
    pub clause: Clause,
    pub tables: Vec<TableReference>,
    pub ctes: Vec<CteReference>,
    /// The partial word directly before the cursor.
    pub prefix: String,
    pub is_after_dot: bool,
    /// The quote-stripped qualifier chain before the last dot, e.g. `db.schema`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dot_prefix: Option<String>,
    /// Qualifier chain plus prefix, quotes stripped, for lookups.
    pub full_qualified_prefix: String,
    /// Number of bytes typed for the qualified prefix, quotes included, for replacement.
    pub raw_qualified_prefix_length: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quote_context: Option<QuoteContext>,
    pub statement_index: usize,
    pub statement_span: Span,
    /// Span of the innermost query scope containing the cursor.
    pub scope_span: Span,
}

impl SqlContext {
    pub fn empty() -> Self {
        Self {
            clause: Clause::Unknown,
            tables: Vec::new(),
            ctes: Vec::new(),
            prefix: String::new(),
            is_after_dot: false,
            dot_prefix: None,
            full_qualified_prefix: String::new(),
            raw_qualified_prefix_length: 0,
            quote_context: None,
            statement_index: 0,
            statement_span: Span::default(),
            scope_span: Span::default(),
        }
    }

    pub fn in_quote(&self) -> bool {
        self.quote_context.as_ref().is_some_and(|quote| quote.in_quote)
    }

    /// Looks up a visible relation by alias or name, ignoring ASCII case.
    pub fn table_for_qualifier(&self, qualifier: &str) -> Option<&TableReference> {
        self.tables
            .iter()
            .find(|table| {
                table
                    .alias
                    .as_deref()
                    .is_some_and(|alias| alias.eq_ignore_ascii_case(qualifier))
            })
            .or_else(|| {
                self.tables
                    .iter()
                    .find(|table| table.name.eq_ignore_ascii_case(qualifier))
            })
    }
}

impl Default for SqlContext {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clause_serializes_snake_case() {
        let json = serde_json::to_string(&Clause::GroupBy).unwrap();
        assert_eq!(json, "\"group_by\"");
        assert_eq!(Clause::InsertInto.as_str(), "insert_into");
    }

    #[test]
    fn test_subquery_text_only_on_subqueries() {
        let table = TableReference::table("users", None);
        assert_eq!(table.subquery_text(), None);

        let sub = TableReference::subquery("s", Some("s".to_string()), "SELECT 1");
        assert_eq!(sub.kind, TableKind::Subquery);
        assert_eq!(sub.subquery_text(), Some("SELECT 1"));
    }

    #[test]
    fn test_deserialize_goes_through_constructors() {
        let sub: TableReference = serde_json::from_str(
            r#"{"name": "s", "kind": "subquery", "subqueryText": "SELECT 1"}"#,
        )
        .unwrap();
        assert_eq!(sub, TableReference::subquery("s", None, "SELECT 1"));

        let table: TableReference =
            serde_json::from_str(r#"{"name": "users", "alias": "u", "kind": "table"}"#).unwrap();
        assert_eq!(table, TableReference::table("users", Some("u".to_string())));
    }

    #[test]
    fn test_deserialize_rejects_misplaced_subquery_text() {
        let err = serde_json::from_str::<TableReference>(
            r#"{"name": "users", "kind": "table", "subqueryText": "SELECT 1"}"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("only subquery references"));

        assert!(
            serde_json::from_str::<TableReference>(r#"{"name": "s", "kind": "subquery"}"#)
                .is_err()
        );
    }

    #[test]
    fn test_context_serialization_uses_camel_case() {
        let mut context = SqlContext::empty();
        context.tables.push(TableReference::file("data.csv", None));
        let json = serde_json::to_value(&context).unwrap();

        assert_eq!(json["clause"], "unknown");
        assert_eq!(json["isAfterDot"], false);
        assert_eq!(json["rawQualifiedPrefixLength"], 0);
        assert_eq!(json["tables"][0]["kind"], "file");
        assert!(json.get("quoteContext").is_none());
        assert!(json["tables"][0].get("subqueryText").is_none());
    }

    #[test]
    fn test_table_for_qualifier_prefers_alias() {
        let mut context = SqlContext::empty();
        context.tables.push(TableReference::table("o", None));
        context
            .tables
            .push(TableReference::table("orders", Some("o".to_string())));

        let found = context.table_for_qualifier("O").unwrap();
        assert_eq!(found.name, "orders");
    }
}
