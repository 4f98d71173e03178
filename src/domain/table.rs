//! Target table description rendered into an `INTO TABLE` block.

use serde::{Deserialize, Serialize};

/// One "load into table X" directive.
///
/// A single run may carry several of these, usually distinguished by a
/// `WHEN` predicate over the same input rows. The clause order produced by
/// [`TableLoadSpec::render`] is a stable contract: extra format clauses come
/// before `TRAILING NULLCOLS`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableLoadSpec {
    pub table: String,
    /// Column expressions: plain names, `name FILLER`, typed `name DATE ...`
    /// clauses, CONSTANT/EXPRESSION clauses, or quoted default expressions.
    #[serde(default)]
    pub columns: Vec<String>,
    #[serde(default)]
    pub terminated_by: Option<String>,
    #[serde(default)]
    pub enclosed_by: Option<String>,
    #[serde(default)]
    pub csv: bool,
    #[serde(default)]
    pub csv_with_embedded: bool,
    #[serde(default)]
    pub trailing_nullcols: bool,
    /// Per-table format overrides, one clause per line, e.g.
    /// `DATE FORMAT "YYYY-MM-DD"`.
    #[serde(default)]
    pub format_clauses: Vec<String>,
    #[serde(default)]
    pub when: Option<String>,
}

impl TableLoadSpec {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            ..Self::default()
        }
    }

    pub fn columns(mut self, columns: Vec<String>) -> Self {
        self.columns = columns;
        self
    }

    /// Appends a plain column name.
    pub fn column(mut self, name: impl Into<String>) -> Self {
        self.columns.push(name.into());
        self
    }

    /// Appends a column present in the source data but not loaded.
    pub fn filler(mut self, name: impl Into<String>) -> Self {
        self.columns.push(format!("{} FILLER", name.into()));
        self
    }

    /// Appends a typed date column with an explicit mask.
    pub fn date_column(mut self, name: impl Into<String>, mask: impl Into<String>) -> Self {
        self.columns
            .push(format!("{} DATE \"{}\"", name.into(), mask.into()));
        self
    }

    /// Appends a column loaded from a constant value instead of the data.
    pub fn constant(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.columns
            .push(format!("{} CONSTANT '{}'", name.into(), value.into()));
        self
    }

    /// Appends a column computed by a SQL expression.
    pub fn expression(mut self, name: impl Into<String>, sql: impl Into<String>) -> Self {
        self.columns
            .push(format!("{} EXPRESSION \"{}\"", name.into(), sql.into()));
        self
    }

    pub fn terminated_by(mut self, delimiter: impl Into<String>) -> Self {
        self.terminated_by = Some(delimiter.into());
        self
    }

    pub fn enclosed_by(mut self, enclosure: impl Into<String>) -> Self {
        self.enclosed_by = Some(enclosure.into());
        self
    }

    /// Switches the FIELDS line to CSV parsing mode.
    pub fn csv(mut self, with_embedded_newlines: bool) -> Self {
        self.csv = true;
        self.csv_with_embedded = with_embedded_newlines;
        self
    }

    pub fn trailing_nullcols(mut self) -> Self {
        self.trailing_nullcols = true;
        self
    }

    pub fn when(mut self, predicate: impl Into<String>) -> Self {
        self.when = Some(predicate.into());
        self
    }

    pub fn format_clause(mut self, clause: impl Into<String>) -> Self {
        self.format_clauses.push(clause.into());
        self
    }

    /// Overrides both DATE and TIMESTAMP masks for this table.
    pub fn date_format(mut self, mask: impl Into<String>) -> Self {
        let mask = mask.into();
        self.format_clauses.push(format!("DATE FORMAT \"{mask}\""));
        self.format_clauses
            .push(format!("TIMESTAMP FORMAT \"{mask}\""));
        self
    }

    /// Renders the full `INTO TABLE` block, newline-terminated.
    ///
    /// Fixed clause order: table, WHEN, FIELDS line, format clauses,
    /// TRAILING NULLCOLS, column block. The FIELDS line is omitted entirely
    /// when neither CSV mode, terminator, nor enclosure is set.
    pub fn render(&self) -> String {
        let mut out = String::new();

        out.push_str(&format!("INTO TABLE {}\n", self.table));

        if let Some(predicate) = &self.when {
            out.push_str(&format!("WHEN {predicate}\n"));
        }

        if let Some(fields) = self.fields_line() {
            out.push_str(&fields);
            out.push('\n');
        }

        for clause in &self.format_clauses {
            out.push_str(clause);
            out.push('\n');
        }

        if self.trailing_nullcols {
            out.push_str("TRAILING NULLCOLS\n");
        }

        out.push_str("(\n");
        let last = self.columns.len().saturating_sub(1);
        for (i, column) in self.columns.iter().enumerate() {
            let comma = if i < last { "," } else { "" };
            out.push_str(&format!("  {column}{comma}\n"));
        }
        out.push_str(")\n");

        out
    }

    fn fields_line(&self) -> Option<String> {
        if !self.csv && self.terminated_by.is_none() && self.enclosed_by.is_none() {
            return None;
        }

        let mut parts = vec!["FIELDS".to_string()];
        if self.csv {
            if self.csv_with_embedded {
                parts.push("CSV WITH EMBEDDED".to_string());
            } else {
                parts.push("CSV WITHOUT EMBEDDED".to_string());
            }
        }
        if let Some(delimiter) = &self.terminated_by {
            parts.push(format!("TERMINATED BY '{delimiter}'"));
        }
        if let Some(enclosure) = &self.enclosed_by {
            parts.push(format!("OPTIONALLY ENCLOSED BY '{enclosure}'"));
        }

        Some(parts.join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn users_spec() -> TableLoadSpec {
        TableLoadSpec::new("users")
            .columns(vec!["id".into(), "name".into(), "email".into()])
            .terminated_by(",")
            .enclosed_by("\"")
            .trailing_nullcols()
    }

    #[test]
    fn renders_clauses_in_fixed_order() {
        let text = users_spec().render();

        let into = text.find("INTO TABLE users").unwrap();
        let fields = text
            .find("FIELDS TERMINATED BY ',' OPTIONALLY ENCLOSED BY '\"'")
            .unwrap();
        let trailing = text.find("TRAILING NULLCOLS").unwrap();
        let open = text.find("(\n").unwrap();
        assert!(into < fields && fields < trailing && trailing < open);

        assert!(text.contains("  id,\n  name,\n  email\n)"));
    }

    #[test]
    fn when_predicate_follows_table_name() {
        let text = users_spec().when("(1:3) = 'ABC'").render();
        assert!(text.starts_with("INTO TABLE users\nWHEN (1:3) = 'ABC'\nFIELDS"));
    }

    #[test]
    fn fields_line_omitted_without_delimiters_or_csv() {
        let text = TableLoadSpec::new("users").column("id").render();
        assert!(!text.contains("FIELDS"));
        assert_eq!(text, "INTO TABLE users\n(\n  id\n)\n");
    }

    #[test]
    fn csv_mode_renders_embedded_variants() {
        let with = TableLoadSpec::new("t").csv(true).render();
        assert!(with.contains("FIELDS CSV WITH EMBEDDED\n"));

        let without = TableLoadSpec::new("t").csv(false).terminated_by(",").render();
        assert!(without.contains("FIELDS CSV WITHOUT EMBEDDED TERMINATED BY ','\n"));
    }

    #[test]
    fn format_clauses_come_before_trailing_nullcols() {
        let text = TableLoadSpec::new("orders")
            .date_format("YYYY-MM-DD")
            .trailing_nullcols()
            .column("id")
            .render();

        let date = text.find("DATE FORMAT \"YYYY-MM-DD\"").unwrap();
        let ts = text.find("TIMESTAMP FORMAT \"YYYY-MM-DD\"").unwrap();
        let trailing = text.find("TRAILING NULLCOLS").unwrap();
        assert!(date < ts && ts < trailing);
    }

    #[test]
    fn empty_column_list_still_renders_parens() {
        let text = TableLoadSpec::new("empty").render();
        assert!(text.ends_with("(\n)\n"));
    }

    #[test]
    fn column_helpers_produce_expected_expressions() {
        let spec = TableLoadSpec::new("t")
            .column("id")
            .filler("ignored")
            .date_column("created_at", "YYYY-MM-DD HH24:MI:SS")
            .constant("source", "import")
            .expression("upper_name", "UPPER(:name)");

        assert_eq!(
            spec.columns,
            vec![
                "id",
                "ignored FILLER",
                "created_at DATE \"YYYY-MM-DD HH24:MI:SS\"",
                "source CONSTANT 'import'",
                "upper_name EXPRESSION \"UPPER(:name)\"",
            ]
        );
    }
}
