//! Control file assembly.
//!
//! The control file skeleton is a fixed, ordered list of typed sections
//! rather than a placeholder-substituted string template, so literal content
//! can never collide with a placeholder token.

use crate::domain::errors::Result;
use crate::domain::input_file::InputFileSpec;
use crate::domain::mode::LoadMode;
use crate::domain::table::TableLoadSpec;

/// The fixed slots of the control file, in emission order.
#[derive(Debug)]
enum Section<'a> {
    Options(&'a [String]),
    LoadData,
    Files(&'a [InputFileSpec]),
    Method(LoadMode),
    Inserts(&'a [TableLoadSpec]),
    BeginData(&'a [Vec<String>]),
}

/// Assembles the complete control file text from a load configuration.
///
/// Pure with respect to its inputs: no I/O, deterministic output.
#[derive(Debug)]
pub struct ControlFileBuilder<'a> {
    options: &'a [String],
    files: &'a [InputFileSpec],
    mode: LoadMode,
    tables: &'a [TableLoadSpec],
    begin_data: Option<&'a [Vec<String>]>,
}

impl<'a> ControlFileBuilder<'a> {
    pub fn new(
        options: &'a [String],
        files: &'a [InputFileSpec],
        mode: LoadMode,
        tables: &'a [TableLoadSpec],
        begin_data: Option<&'a [Vec<String>]>,
    ) -> Self {
        Self {
            options,
            files,
            mode,
            tables,
            begin_data,
        }
    }

    pub fn build(&self) -> Result<String> {
        let mut sections = vec![];
        if !self.options.is_empty() {
            sections.push(Section::Options(self.options));
        }
        sections.push(Section::LoadData);
        sections.push(Section::Files(self.files));
        sections.push(Section::Method(self.mode));
        sections.push(Section::Inserts(self.tables));
        if let Some(rows) = self.begin_data {
            sections.push(Section::BeginData(rows));
        }

        let mut out = String::new();
        for section in &sections {
            render_section(section, &mut out)?;
        }
        Ok(out)
    }
}

fn render_section(section: &Section<'_>, out: &mut String) -> Result<()> {
    match section {
        Section::Options(options) => {
            out.push_str(&format!("OPTIONS({})\n", options.join(", ")));
        }
        Section::LoadData => out.push_str("LOAD DATA\n"),
        Section::Files(files) => {
            for file in *files {
                // InputFileSpec always quotes its path; the bare `*` form
                // that switches sqlldr to inline data is produced here, and
                // only the path token loses its quotes.
                let line = file.to_string();
                let line = if file.is_inline() {
                    match line.strip_prefix("INFILE '*'") {
                        Some(rest) => format!("INFILE *{rest}"),
                        None => line,
                    }
                } else {
                    line
                };
                out.push_str(&line);
                out.push('\n');
            }
        }
        Section::Method(mode) => {
            out.push_str(mode.method().keyword());
            out.push('\n');
        }
        Section::Inserts(tables) => {
            for table in *tables {
                out.push_str(&table.render());
            }
        }
        Section::BeginData(rows) => {
            out.push_str("BEGINDATA\n");
            out.push_str(&serialize_rows(rows)?);
        }
    }
    Ok(())
}

/// Serializes inline rows as comma-separated lines with minimal quoting:
/// a field is quoted only when it contains the delimiter, a quote, or a
/// newline, and internal quotes are doubled.
fn serialize_rows(rows: &[Vec<String>]) -> Result<String> {
    let mut writer = csv::WriterBuilder::new().from_writer(Vec::new());
    for row in rows {
        writer.write_record(row)?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| csv::Error::from(std::io::Error::other(e.to_string())))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
