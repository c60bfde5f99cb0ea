//! SQL statements for one message table.
//!
//! The table name is validated before it reaches here; it is the only interpolated value.
//! JSON field lookups go through `json_valid` first so a malformed document makes its row
//! not match instead of failing the whole statement.

use crate::models::SearchKind;

/// Expression extracting `path` from the document, NULL when the document is not JSON.
fn field(path: &str) -> String {
    format!("CASE WHEN json_valid(message) THEN json_extract(message, '{path}') END")
}

/// Escapes `LIKE` metacharacters and wraps the query as a `%...%` containment pattern.
pub(crate) fn contains_pattern(query: &str) -> String {
    let mut pattern = String::with_capacity(query.len() + 2);
    pattern.push('%');
    for c in query.chars() {
        if matches!(c, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

pub(crate) struct Statements {
    pub create_table: String,
    pub insert: String,
    pub count: String,
    pub list: String,
    pub load: String,
    pub load_by_row: String,
    pub delete_one: String,
    pub delete_by_row: String,
    pub delete_all: String,
    table: String,
}

impl Statements {
    pub fn new(table: &str) -> Self {
        let identity = field("$.ID");
        Self {
            create_table: format!(
                "CREATE TABLE IF NOT EXISTS {table} (\
                 id INTEGER PRIMARY KEY AUTOINCREMENT, \
                 message JSON NOT NULL)"
            ),
            insert: format!("INSERT INTO {table} (message) VALUES (?)"),
            count: format!("SELECT COUNT(*) FROM {table}"),
            list: format!("SELECT id, message FROM {table} ORDER BY id LIMIT ? OFFSET ?"),
            load: format!(
                "SELECT id, message FROM {table} WHERE {identity} = ? ORDER BY id LIMIT 1"
            ),
            load_by_row: format!("SELECT id, message FROM {table} WHERE id = ?"),
            delete_one: format!("DELETE FROM {table} WHERE {identity} = ?"),
            delete_by_row: format!("DELETE FROM {table} WHERE id = ?"),
            delete_all: format!("DELETE FROM {table}"),
            table: table.to_string(),
        }
    }

    /// Recipients are matched one array element at a time, so JSON quoting and the
    /// separators between addresses never take part in the match.
    fn search_predicate(kind: SearchKind) -> String {
        match kind {
            SearchKind::Recipient => format!(
                "CASE WHEN json_valid(message) THEN EXISTS (\
                 SELECT 1 FROM json_each(message, '{}') \
                 WHERE value LIKE ? ESCAPE '\\') ELSE 0 END",
                kind.json_path()
            ),
            SearchKind::Sender | SearchKind::Body => {
                format!("{} LIKE ? ESCAPE '\\'", field(kind.json_path()))
            }
        }
    }

    pub fn search_page(&self, kind: SearchKind) -> String {
        format!(
            "SELECT id, message FROM {} WHERE {} ORDER BY id LIMIT ? OFFSET ?",
            self.table,
            Self::search_predicate(kind)
        )
    }

    pub fn search_count(&self, kind: SearchKind) -> String {
        format!(
            "SELECT COUNT(*) FROM {} WHERE {}",
            self.table,
            Self::search_predicate(kind)
        )
    }
}
