//! Test environment builder for isolated modhost testing.
//!
//! `TestEnv` owns a temporary application root laid out the way a host
//! expects (`Modules/<Id>/module.toml`, `Modules/<Id>/bin/*.dll`) and an
//! empty config home, so neither the developer's config nor their
//! environment leaks into a test.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use std::time::{Duration, SystemTime};

use tempfile::TempDir;

use modhost::{Config, ModuleHost};

/// Result of running the modhost CLI
#[derive(Debug)]
pub struct TestResult {
    pub success: bool,
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl TestResult {
    /// Combine stdout and stderr
    pub fn combined_output(&self) -> String {
        format!("{}\n{}", self.stdout, self.stderr)
    }

    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.stdout)
            .unwrap_or_else(|e| panic!("stdout is not JSON ({e}):\n{}", self.stdout))
    }
}

/// A fixed point in time files are stamped relative to
pub fn epoch() -> SystemTime {
    SystemTime::UNIX_EPOCH + Duration::from_secs(1_700_000_000)
}

pub struct TestEnv {
    pub app_root: TempDir,
    pub config_home: TempDir,
    pub config: Config,
}

impl TestEnv {
    pub fn new() -> Self {
        Self {
            app_root: tempfile::tempdir().expect("create app root"),
            config_home: tempfile::tempdir().expect("create config home"),
            config: Config::default(),
        }
    }

    /// Physical path of `relative` under the application root
    pub fn path(&self, relative: &str) -> PathBuf {
        self.app_root.path().join(relative)
    }

    /// Physical path of the stored copy of `name`
    pub fn stored(&self, name: &str) -> PathBuf {
        self.path(&format!("App_Data/Dependencies/{name}.dll"))
    }

    /// `Modules/<id>/module.toml` declaring `dependencies`
    pub fn add_module(&self, id: &str, dependencies: &[&str]) -> &Self {
        let dir = self.path(&format!("Modules/{id}"));
        fs::create_dir_all(&dir).expect("create module dir");
        let deps = dependencies
            .iter()
            .map(|d| format!("\"{d}\""))
            .collect::<Vec<_>>()
            .join(", ");
        fs::write(
            dir.join("module.toml"),
            format!("name = \"{id}\"\nversion = \"1.0\"\ndependencies = [{deps}]\n"),
        )
        .expect("write manifest");
        self
    }

    /// Drop `<name>.dll` into the module's `bin`, stamped `age_secs` after `epoch()`
    pub fn add_binary(&self, module: &str, name: &str, age_secs: u64) -> PathBuf {
        let bin = self.path(&format!("Modules/{module}/bin"));
        fs::create_dir_all(&bin).expect("create bin dir");
        let path = bin.join(format!("{name}.dll"));
        fs::write(&path, format!("binary {name} {age_secs}")).expect("write binary");
        set_mtime(&path, epoch() + Duration::from_secs(age_secs));
        path
    }

    pub fn remove_module(&self, id: &str) {
        fs::remove_dir_all(self.path(&format!("Modules/{id}"))).expect("remove module");
    }

    /// Build a host over this application root with `self.config`
    pub fn host(&self) -> ModuleHost {
        ModuleHost::new(self.config.clone(), self.app_root.path()).expect("build host")
    }

    /// Write `content` as `modhost.toml` in the application root
    pub fn write_config(&self, content: &str) {
        fs::write(self.path("modhost.toml"), content).expect("write config");
    }

    /// Run the modhost CLI from the application root
    pub fn run(&self, args: &[&str]) -> TestResult {
        let output = Command::new(env!("CARGO_BIN_EXE_modhost"))
            .current_dir(self.app_root.path())
            .args(args)
            .env("MODHOST_CONFIG_HOME", self.config_home.path())
            .env_remove("MODHOST_APP_ROOT")
            .env_remove("MODHOST_PRECOMPILED_DISABLED")
            .env_remove("MODHOST_BINARY_EXTENSION")
            .env_remove("MODHOST_TIMESTAMP_TOLERANCE_MS")
            .env_remove("MODHOST_LOG")
            .output()
            .expect("Failed to execute modhost");
        output_to_result(output)
    }
}

fn output_to_result(output: Output) -> TestResult {
    TestResult {
        success: output.status.success(),
        exit_code: output.status.code().unwrap_or(-1),
        stdout: String::from_utf8_lossy(&output.stdout).to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
    }
}

pub fn set_mtime(path: &Path, time: SystemTime) {
    fs::File::options()
        .write(true)
        .open(path)
        .and_then(|f| f.set_modified(time))
        .expect("set mtime");
}

pub fn mtime(path: &Path) -> SystemTime {
    fs::metadata(path)
        .and_then(|m| m.modified())
        .expect("read mtime")
}
