#![allow(dead_code)]

use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use console_additions::console::{Application, Command};

/// Builder for a shared `Application`.
pub struct ApplicationBuilder {
    app: Application,
}

impl ApplicationBuilder {
    pub fn new(name: &str) -> Self {
        Self {
            app: Application::new(name),
        }
    }

    pub fn with_version(mut self, version: &str) -> Self {
        self.app = self.app.with_version(version);
        self
    }

    pub fn with_command<C: Command + 'static>(mut self, command: C) -> Self {
        self.app.add(Arc::new(command));
        self
    }

    pub fn build(self) -> Arc<Application> {
        Arc::new(self.app)
    }
}

/// Builder producing batch file TOML.
#[derive(Default)]
pub struct BatchFileBuilder {
    header: Vec<String>,
    outputs: Vec<String>,
    actions: Vec<String>,
}

impl BatchFileBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: &str) -> Self {
        self.header.push(format!("name = {}", quote(name)));
        self
    }

    pub fn silent(mut self, silent: bool) -> Self {
        self.header.push(format!("silent = {silent}"));
        self
    }

    pub fn verbosity(mut self, verbosity: &str) -> Self {
        self.header.push(format!("verbosity = {}", quote(verbosity)));
        self
    }

    pub fn output(mut self, kind: &str) -> Self {
        self.outputs.push(format!("kind = {}", quote(kind)));
        self
    }

    pub fn file_output(mut self, kind: &str, path: &str, mode: &str, debounce_ms: u64) -> Self {
        self.outputs.push(format!(
            "kind = {}\npath = {}\nmode = {}\ndebounce_ms = {debounce_ms}",
            quote(kind),
            quote(path),
            quote(mode)
        ));
        self
    }

    pub fn command(mut self, command: &str) -> Self {
        self.actions
            .push(format!("type = \"command\"\ncommand = {}", quote(command)));
        self
    }

    pub fn shell(mut self, argv: &[&str]) -> Self {
        let argv: Vec<String> = argv.iter().map(|a| quote(a)).collect();
        self.actions
            .push(format!("type = \"shell\"\nargv = [{}]", argv.join(", ")));
        self
    }

    pub fn message(mut self, text: &str) -> Self {
        self.actions
            .push(format!("type = \"message\"\ntext = {}", quote(text)));
        self
    }

    /// Append raw TOML for an `[[action]]` entry.
    pub fn raw_action(mut self, body: &str) -> Self {
        self.actions.push(body.to_string());
        self
    }

    pub fn to_toml(&self) -> String {
        let mut out = String::new();
        if !self.header.is_empty() {
            out.push_str("[batch]\n");
            for line in &self.header {
                let _ = writeln!(out, "{line}");
            }
            out.push('\n');
        }
        for output in &self.outputs {
            let _ = writeln!(out, "[[output]]\n{output}\n");
        }
        for action in &self.actions {
            let _ = writeln!(out, "[[action]]\n{action}\n");
        }
        out
    }

    /// Write the file as `batch.toml` into `dir` and return its path.
    pub fn write_to(&self, dir: &Path) -> PathBuf {
        let path = dir.join("batch.toml");
        std::fs::write(&path, self.to_toml()).expect("failed to write batch file");
        path
    }
}

/// TOML basic string literal.
fn quote(s: &str) -> String {
    format!("{s:?}")
}
