//! The load orchestrator: fluent configuration, control file persistence,
//! `sqlldr` invocation, and post-run result access.

use crate::config::AppConfig;
use crate::domain::control_file::ControlFileBuilder;
use crate::domain::errors::{LoaderError, Result};
use crate::domain::input_file::InputFileSpec;
use crate::domain::mode::LoadMode;
use crate::domain::table::TableLoadSpec;
use crate::domain::tns::connection_string;
use crate::infrastructure::{CsvHeaderAdapter, LocalDiskAdapter, ShellAdapter};
use crate::ports::{CsvPort, ProcessOutput, ProcessPort, StoragePort};
use log::{info, warn};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(3600);
const NO_OUTPUT: &str = "No output available.";
const NO_LOG: &str = "No log file available.";

/// Replaces a `.ctl` suffix with the given extension, or appends it when the
/// name carries no `.ctl` suffix. Used to derive log/bad/discard siblings.
fn sibling(name: &str, ext: &str) -> String {
    match name.strip_suffix(".ctl") {
        Some(stem) => format!("{stem}.{ext}"),
        None => format!("{name}.{ext}"),
    }
}

/// One logical load run against the external `sqlldr` binary.
///
/// Configured fluently, validated at `execute()` time. Not shareable across
/// threads: each logical load gets its own instance. Re-invoking `execute()`
/// re-runs the whole pipeline against the same configuration.
pub struct SqlLoader {
    config: AppConfig,
    storage: Arc<dyn StoragePort>,
    process: Arc<dyn ProcessPort>,
    csv: Arc<dyn CsvPort>,

    options: Vec<String>,
    input_files: Vec<InputFileSpec>,
    tables: Vec<TableLoadSpec>,
    mode: LoadMode,
    connection: Option<String>,
    begin_data: Option<Vec<Vec<String>>>,
    header_columns: Vec<String>,
    timeout: Duration,
    delete_files: bool,

    // Resolved exactly once per loader, by name or on first render.
    control_file: Option<String>,
    explicit_log: Option<String>,
    resolved_log: Option<String>,

    output: Option<ProcessOutput>,
    log_snapshot: Option<String>,
}

struct Prepared {
    command: String,
    control_text: String,
}

impl SqlLoader {
    pub fn new(
        config: AppConfig,
        storage: Arc<dyn StoragePort>,
        process: Arc<dyn ProcessPort>,
        csv: Arc<dyn CsvPort>,
    ) -> Self {
        Self {
            config,
            storage,
            process,
            csv,
            options: Vec::new(),
            input_files: Vec::new(),
            tables: Vec::new(),
            mode: LoadMode::default(),
            connection: None,
            begin_data: None,
            header_columns: Vec::new(),
            timeout: DEFAULT_TIMEOUT,
            delete_files: false,
            control_file: None,
            explicit_log: None,
            resolved_log: None,
            output: None,
            log_snapshot: None,
        }
    }

    /// Wires the default adapters: local disk at the configured root, shell
    /// process execution, and csv-crate header sniffing.
    pub fn from_config(config: AppConfig) -> Self {
        let storage = Arc::new(LocalDiskAdapter::new(config.disk_root()));
        Self::new(
            config,
            storage,
            Arc::new(ShellAdapter::new()),
            Arc::new(CsvHeaderAdapter::new()),
        )
    }

    // --- fluent configuration -------------------------------------------

    pub fn options(mut self, options: Vec<String>) -> Self {
        self.options = options;
        self
    }

    pub fn option(mut self, option: impl Into<String>) -> Self {
        self.options.push(option.into());
        self
    }

    pub fn in_file(mut self, file: InputFileSpec) -> Self {
        self.input_files.push(file);
        self
    }

    /// Shorthand for a single table with comma-delimited, optionally
    /// double-quote-enclosed fields. Empty `columns` fall back to headers
    /// sniffed by [`SqlLoader::with_headers`].
    pub fn into(self, table: impl Into<String>, columns: Vec<String>) -> Self {
        self.into_table(
            TableLoadSpec::new(table)
                .columns(columns)
                .terminated_by(",")
                .enclosed_by("\""),
        )
    }

    pub fn into_table(mut self, mut table: TableLoadSpec) -> Self {
        if table.columns.is_empty() && !self.header_columns.is_empty() {
            table.columns = self.header_columns.clone();
        }
        self.tables.push(table);
        self
    }

    pub fn mode(mut self, mode: LoadMode) -> Self {
        self.mode = mode;
        self
    }

    /// Names the generated control file. Without this, a random
    /// `<uuid>.ctl` name is generated once on first render.
    pub fn as_control_file(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        self.control_file = Some(if name.ends_with(".ctl") {
            name
        } else {
            format!("{name}.ctl")
        });
        self
    }

    /// Uses an explicit log path; suppresses the generated `log=` clause.
    pub fn logs_to(mut self, path: impl Into<String>) -> Self {
        self.explicit_log = Some(path.into());
        self
    }

    /// Switches to another configured disk for control file storage.
    pub fn disk(mut self, name: impl Into<String>) -> Self {
        self.config.disk = name.into();
        self.storage = Arc::new(LocalDiskAdapter::new(self.config.disk_root()));
        self
    }

    pub fn connection(mut self, name: impl Into<String>) -> Self {
        self.connection = Some(name.into());
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn delete_files_after_run(mut self, delete: bool) -> Self {
        self.delete_files = delete;
        self
    }

    /// Embeds literal rows after a BEGINDATA marker and registers the `*`
    /// input spec when no inline spec exists yet.
    pub fn begin_data(mut self, rows: Vec<Vec<String>>) -> Self {
        if !self.input_files.iter().any(InputFileSpec::is_inline) {
            self.input_files.push(InputFileSpec::inline());
        }
        self.begin_data = Some(rows);
        self
    }

    /// Reads the first input file's header row, adds `skip=1`, and uses the
    /// header names verbatim as the default column list.
    pub fn with_headers(self) -> Result<Self> {
        self.with_headers_mapped(str::to_string)
    }

    /// Like [`SqlLoader::with_headers`], applying a caller-supplied policy to
    /// each header name (e.g. mapping audit columns to FILLER or DATE
    /// expressions).
    pub fn with_headers_mapped<F>(mut self, policy: F) -> Result<Self>
    where
        F: Fn(&str) -> String,
    {
        let first = self
            .input_files
            .iter()
            .find(|f| !f.is_inline())
            .ok_or_else(|| {
                LoaderError::Config("with_headers requires an input file".to_string())
            })?;

        let headers = self.csv.read_header_row(&first.path)?;
        self.header_columns = headers.iter().map(|h| policy(h)).collect();
        self.options.push("skip=1".to_string());
        Ok(self)
    }

    // --- execution ------------------------------------------------------

    /// Runs the full pipeline: validate, render, persist, invoke, capture.
    pub fn execute(&mut self) -> Result<ProcessOutput> {
        self.validate()?;

        let prepared = self.prepare()?;
        info!(
            "Running sqlldr for {} table(s), {} input file(s)",
            self.tables.len(),
            self.input_files.len()
        );

        let output = self.process.run(&prepared.command, self.timeout)?;
        if output.successful() {
            info!("sqlldr finished successfully");
        } else {
            warn!("sqlldr exited with code {:?}", output.exit_code);
        }

        self.capture_log();
        self.output = Some(output.clone());

        if self.delete_files {
            self.cleanup();
        }

        Ok(output)
    }

    fn validate(&self) -> Result<()> {
        if self.tables.is_empty() {
            return Err(LoaderError::Config(
                "At least one table definition is required".to_string(),
            ));
        }
        if self.input_files.is_empty() {
            return Err(LoaderError::Config("Input file is required".to_string()));
        }
        if self.input_files.iter().any(|f| f.path.is_empty()) {
            return Err(LoaderError::Config(
                "Input file path must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Resolves the memoized control file name, generating `<uuid>.ctl` on
    /// first use.
    fn control_file_name(&mut self) -> String {
        self.control_file
            .get_or_insert_with(|| format!("{}.ctl", Uuid::new_v4()))
            .clone()
    }

    /// Input files as rendered: the first concrete file gets bad/discard
    /// siblings of the control file when none were given, so rejects land
    /// in a predictable place and cleanup can find them.
    fn effective_input_files(&self, control_path: &str) -> Vec<InputFileSpec> {
        let mut files = self.input_files.clone();
        if let Some(first) = files.iter_mut().find(|f| !f.is_inline()) {
            if first.bad_file.is_none() {
                first.bad_file = Some(sibling(control_path, "bad"));
            }
            if first.discard_file.is_none() {
                first.discard_file = Some(sibling(control_path, "dis"));
            }
        }
        files
    }

    /// Renders the control file, persists it, and builds the shell command.
    fn prepare(&mut self) -> Result<Prepared> {
        let name = self.control_file_name();
        let control_path = self.storage.path(&name).to_string_lossy().into_owned();

        let files = self.effective_input_files(&control_path);
        let control_text = ControlFileBuilder::new(
            &self.options,
            &files,
            self.mode,
            &self.tables,
            self.begin_data.as_deref(),
        )
        .build()?;

        self.storage.put(&name, &control_text)?;

        let tns = connection_string(&self.config, self.connection.as_deref());
        let mut command = format!(
            "{} userid={} control={}",
            self.config.sqlldr, tns, control_path
        );

        match &self.explicit_log {
            Some(path) => self.resolved_log = Some(path.clone()),
            None => {
                let log_path = sibling(&control_path, "log");
                command.push_str(&format!(" log={log_path}"));
                self.resolved_log = Some(log_path);
            }
        }

        Ok(Prepared {
            command,
            control_text,
        })
    }

    fn capture_log(&mut self) {
        if let Some(path) = &self.resolved_log {
            if Path::new(path).exists() {
                match std::fs::read_to_string(path) {
                    Ok(contents) => self.log_snapshot = Some(contents),
                    Err(e) => warn!("Could not read log file {path}: {e}"),
                }
            }
        }
    }

    /// Best-effort removal of the generated control file and its loader-side
    /// log/bad/discard siblings. Missing files are not an error.
    pub fn cleanup(&self) {
        let Some(name) = &self.control_file else {
            return;
        };

        let mut names = vec![name.clone()];
        names.push(sibling(name, "bad"));
        names.push(sibling(name, "dis"));
        if self.explicit_log.is_none() {
            names.push(sibling(name, "log"));
        }
        for n in names {
            if self.storage.exists(&n) {
                if let Err(e) = self.storage.delete(&n) {
                    warn!("Could not delete {n}: {e}");
                }
            }
        }

        let mut paths: Vec<&String> = Vec::new();
        if let Some(log) = &self.explicit_log {
            paths.push(log);
        }
        for file in &self.input_files {
            paths.extend(file.bad_file.iter());
            paths.extend(file.discard_file.iter());
        }
        for p in paths {
            if Path::new(p).exists() {
                if let Err(e) = std::fs::remove_file(p) {
                    warn!("Could not delete {p}: {e}");
                }
            }
        }
    }

    // --- post-run accessors ---------------------------------------------

    /// False before any run, then the executor's success flag.
    pub fn successful(&self) -> bool {
        self.output.as_ref().is_some_and(ProcessOutput::successful)
    }

    /// The captured run result; errors when no run has happened.
    pub fn result(&self) -> Result<&ProcessOutput> {
        self.output.as_ref().ok_or(LoaderError::NoRunYet)
    }

    pub fn output_text(&self) -> String {
        self.output
            .as_ref()
            .map_or_else(|| NO_OUTPUT.to_string(), |o| o.stdout.clone())
    }

    pub fn error_output(&self) -> String {
        self.output
            .as_ref()
            .map_or_else(|| NO_OUTPUT.to_string(), |o| o.stderr.clone())
    }

    /// Contents of the loader's log file, captured right after the run.
    pub fn logs(&self) -> String {
        self.log_snapshot
            .clone()
            .unwrap_or_else(|| NO_LOG.to_string())
    }

    /// Renders the command and control file (persisting the latter) plus any
    /// captured output, for diagnostics.
    pub fn debug_dump(&mut self) -> Result<String> {
        let prepared = self.prepare()?;

        let mut dump = format!(
            "Command:\n{}\n\nControl File:\n{}\n",
            prepared.command, prepared.control_text
        );
        if let Some(output) = &self.output {
            dump.push_str(&format!(
                "Output:\n{}\n\nError Output:\n{}\nExit Code: {:?}\n",
                output.stdout, output.stderr, output.exit_code
            ));
        }

        Ok(dump)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::path::PathBuf;
    use std::sync::Mutex;

    #[derive(Default)]
    struct MockStorage {
        files: Mutex<HashMap<String, String>>,
    }

    impl StoragePort for MockStorage {
        fn put(&self, name: &str, contents: &str) -> Result<()> {
            self.files
                .lock()
                .unwrap()
                .insert(name.to_string(), contents.to_string());
            Ok(())
        }
        fn exists(&self, name: &str) -> bool {
            self.files.lock().unwrap().contains_key(name)
        }
        fn delete(&self, name: &str) -> Result<()> {
            self.files.lock().unwrap().remove(name);
            Ok(())
        }
        fn path(&self, name: &str) -> PathBuf {
            PathBuf::from("/mock").join(name)
        }
    }

    struct MockProcess {
        commands: Mutex<Vec<String>>,
        exit_code: Option<i32>,
    }

    impl MockProcess {
        fn succeeding() -> Self {
            Self {
                commands: Mutex::new(Vec::new()),
                exit_code: Some(0),
            }
        }
        fn failing(code: i32) -> Self {
            Self {
                commands: Mutex::new(Vec::new()),
                exit_code: Some(code),
            }
        }
        fn run_count(&self) -> usize {
            self.commands.lock().unwrap().len()
        }
        fn last_command(&self) -> String {
            self.commands.lock().unwrap().last().cloned().unwrap()
        }
    }

    impl ProcessPort for MockProcess {
        fn run(&self, command: &str, _timeout: Duration) -> Result<ProcessOutput> {
            self.commands.lock().unwrap().push(command.to_string());
            Ok(ProcessOutput {
                exit_code: self.exit_code,
                stdout: "loaded".to_string(),
                stderr: String::new(),
            })
        }
    }

    struct MockCsv {
        headers: Vec<String>,
    }

    impl CsvPort for MockCsv {
        fn read_header_row(&self, _path: &str) -> Result<Vec<String>> {
            Ok(self.headers.clone())
        }
    }

    fn test_config() -> AppConfig {
        let mut config = AppConfig::default();
        config.connections.insert(
            "oracle".to_string(),
            crate::config::ConnectionConfig {
                username: Some("scott".into()),
                password: Some("tiger".into()),
                host: Some("localhost".into()),
                port: Some(1521),
                database: Some("XE".into()),
            },
        );
        config
    }

    fn loader_with(process: Arc<MockProcess>, storage: Arc<MockStorage>) -> SqlLoader {
        SqlLoader::new(
            test_config(),
            storage,
            process,
            Arc::new(MockCsv { headers: vec![] }),
        )
    }

    fn users_loader(process: Arc<MockProcess>, storage: Arc<MockStorage>) -> SqlLoader {
        loader_with(process, storage)
            .options(vec!["skip=1".into(), "load=2".into()])
            .in_file(InputFileSpec::new("/data/users.dat"))
            .as_control_file("users.ctl")
            .into("users", vec!["id".into(), "name".into(), "email".into()])
    }

    #[test]
    fn sibling_strips_the_ctl_suffix_exactly_once() {
        assert_eq!(sibling("users.ctl", "log"), "users.log");
        assert_eq!(sibling("users", "bad"), "users.bad");
        assert_eq!(sibling("a.ctl.ctl", "bad"), "a.ctl.bad");
    }

    #[test]
    fn execute_without_tables_is_a_config_error() {
        let process = Arc::new(MockProcess::succeeding());
        let mut loader = loader_with(process.clone(), Arc::new(MockStorage::default()))
            .in_file(InputFileSpec::new("users.dat"));

        let err = loader.execute().unwrap_err();
        assert!(matches!(err, LoaderError::Config(_)));
        assert_eq!(process.run_count(), 0);
    }

    #[test]
    fn execute_without_input_files_is_a_config_error() {
        let process = Arc::new(MockProcess::succeeding());
        let mut loader = loader_with(process.clone(), Arc::new(MockStorage::default()))
            .into("users", vec!["id".into()]);

        let err = loader.execute().unwrap_err();
        assert!(matches!(err, LoaderError::Config(_)));
        assert_eq!(process.run_count(), 0);
    }

    #[test]
    fn successful_is_false_before_any_run_then_tracks_exit_code() {
        let process = Arc::new(MockProcess::succeeding());
        let mut loader = users_loader(process, Arc::new(MockStorage::default()));

        assert!(!loader.successful());
        assert!(matches!(loader.result(), Err(LoaderError::NoRunYet)));
        assert_eq!(loader.output_text(), "No output available.");

        loader.execute().unwrap();
        assert!(loader.successful());
        assert_eq!(loader.output_text(), "loaded");
    }

    #[test]
    fn failed_run_is_captured_not_raised() {
        let process = Arc::new(MockProcess::failing(2));
        let mut loader = users_loader(process, Arc::new(MockStorage::default()));

        let output = loader.execute().unwrap();
        assert!(output.failed());
        assert!(!loader.successful());
    }

    #[test]
    fn command_line_has_binary_tns_control_and_log() {
        let process = Arc::new(MockProcess::succeeding());
        let mut loader = users_loader(process.clone(), Arc::new(MockStorage::default()));

        loader.execute().unwrap();
        assert_eq!(
            process.last_command(),
            "sqlldr userid=scott/tiger@localhost:1521/XE \
             control=/mock/users.ctl log=/mock/users.log"
        );
    }

    #[test]
    fn explicit_log_path_suppresses_log_clause() {
        let process = Arc::new(MockProcess::succeeding());
        let mut loader = users_loader(process.clone(), Arc::new(MockStorage::default()))
            .logs_to("/var/log/users-load.log");

        loader.execute().unwrap();
        assert!(!process.last_command().contains(" log="));
    }

    #[test]
    fn control_file_is_persisted_with_rendered_text() {
        let storage = Arc::new(MockStorage::default());
        let mut loader = users_loader(Arc::new(MockProcess::succeeding()), storage.clone());

        loader.execute().unwrap();

        let files = storage.files.lock().unwrap();
        let text = files.get("users.ctl").unwrap();
        assert!(text.contains("OPTIONS(skip=1, load=2)"));
        assert!(text.contains("INFILE '/data/users.dat'"));
        assert!(text.contains("APPEND"));
        assert!(text.contains("INTO TABLE users"));
        assert!(text.contains("FIELDS TERMINATED BY ',' OPTIONALLY ENCLOSED BY '\"'"));
        assert!(text.contains("  id,\n  name,\n  email\n)"));
    }

    #[test]
    fn bad_and_discard_siblings_are_derived_for_the_first_file() {
        let storage = Arc::new(MockStorage::default());
        let mut loader = users_loader(Arc::new(MockProcess::succeeding()), storage.clone());

        loader.execute().unwrap();

        let files = storage.files.lock().unwrap();
        let text = files.get("users.ctl").unwrap();
        assert!(text.contains("BADFILE '/mock/users.bad'"));
        assert!(text.contains("DISCARDFILE '/mock/users.dis'"));
    }

    #[test]
    fn generated_control_name_is_memoized() {
        let storage = Arc::new(MockStorage::default());
        let mut loader = loader_with(Arc::new(MockProcess::succeeding()), storage.clone())
            .in_file(InputFileSpec::new("users.dat"))
            .into("users", vec!["id".into()]);

        loader.execute().unwrap();
        loader.execute().unwrap();

        let files = storage.files.lock().unwrap();
        assert_eq!(files.len(), 1);
        let name = files.keys().next().unwrap();
        assert!(name.ends_with(".ctl"));
    }

    #[test]
    fn headers_become_default_columns() {
        let csv = Arc::new(MockCsv {
            headers: vec!["id".into(), "name".into(), "email".into()],
        });
        let storage = Arc::new(MockStorage::default());
        let mut loader = SqlLoader::new(
            test_config(),
            storage.clone(),
            Arc::new(MockProcess::succeeding()),
            csv,
        )
        .in_file(InputFileSpec::new("/data/users.csv"))
        .as_control_file("users.ctl")
        .with_headers()
        .unwrap()
        .into("users", vec![]);

        loader.execute().unwrap();

        let files = storage.files.lock().unwrap();
        let text = files.get("users.ctl").unwrap();
        assert!(text.contains("OPTIONS(skip=1)"));
        assert!(text.contains("  id,\n  name,\n  email\n)"));
    }

    #[test]
    fn header_policy_can_rewrite_columns() {
        let csv = Arc::new(MockCsv {
            headers: vec!["id".into(), "created_at".into()],
        });
        let loader = SqlLoader::new(
            test_config(),
            Arc::new(MockStorage::default()),
            Arc::new(MockProcess::succeeding()),
            csv,
        )
        .in_file(InputFileSpec::new("/data/t.csv"))
        .with_headers_mapped(|h| {
            if h.ends_with("_at") {
                format!("{h} DATE \"YYYY-MM-DD HH24:MI:SS\"")
            } else {
                h.to_string()
            }
        })
        .unwrap()
        .into("t", vec![]);

        assert_eq!(
            loader.tables[0].columns,
            vec!["id", "created_at DATE \"YYYY-MM-DD HH24:MI:SS\""]
        );
    }

    #[test]
    fn begin_data_registers_the_inline_input_spec() {
        let storage = Arc::new(MockStorage::default());
        let mut loader = loader_with(Arc::new(MockProcess::succeeding()), storage.clone())
            .as_control_file("inline.ctl")
            .begin_data(vec![
                vec!["1".into(), "Jane".into()],
                vec!["2".into(), "with,comma".into()],
            ])
            .into("users", vec!["id".into(), "name".into()]);

        loader.execute().unwrap();

        let files = storage.files.lock().unwrap();
        let text = files.get("inline.ctl").unwrap();
        assert!(text.contains("INFILE *\n"));
        assert!(text.contains("BEGINDATA\n1,Jane\n2,\"with,comma\"\n"));
    }

    #[test]
    fn delete_flag_cleans_up_generated_files() {
        let storage = Arc::new(MockStorage::default());
        let mut loader = users_loader(Arc::new(MockProcess::succeeding()), storage.clone())
            .delete_files_after_run(true);

        loader.execute().unwrap();
        assert!(!storage.exists("users.ctl"));
    }

    #[test]
    fn debug_dump_shows_command_and_control_file() {
        let mut loader = users_loader(
            Arc::new(MockProcess::succeeding()),
            Arc::new(MockStorage::default()),
        );

        let dump = loader.debug_dump().unwrap();
        assert!(dump.starts_with("Command:\nsqlldr userid="));
        assert!(dump.contains("Control File:\n"));
        assert!(!dump.contains("Exit Code"));

        loader.execute().unwrap();
        let dump = loader.debug_dump().unwrap();
        assert!(dump.contains("Output:\nloaded"));
        assert!(dump.contains("Exit Code: Some(0)"));
    }

    #[test]
    fn insert_mode_is_rendered_as_truncate() {
        let storage = Arc::new(MockStorage::default());
        let mut loader = users_loader(Arc::new(MockProcess::succeeding()), storage.clone())
            .mode(LoadMode::Insert);

        loader.execute().unwrap();
        let files = storage.files.lock().unwrap();
        assert!(files.get("users.ctl").unwrap().contains("\nTRUNCATE\n"));
    }
}
