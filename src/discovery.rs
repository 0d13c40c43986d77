//! Locates the parts of an installed PostgreSQL instance.
//!
//! Three directories steer the probe, each taken from the command line
//! or, failing that, the environment: `PGDATA` (the cluster directory,
//! home of `postgresql.auto.conf`), `PGINSTALL` (server binaries, used
//! to find `pg_config`), and `PGCONFIG` (an extra place to look for
//! `postgresql.conf`). A path that does not exist on disk is treated as
//! unset at every stage. Whatever `pg_config` reports as `--libdir` and
//! `--sharedir` drives extension enumeration.
//!
//! Probing itself never fails; [`Probe::validate`] turns the missing
//! required pieces into hard errors before the UI is entered.

use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;

use log::warn;
use rustc_hash::FxHashSet;
use thiserror::Error;

use crate::conf;

/// Directory overrides taken from the command line.
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub pgdata: Option<PathBuf>,
    pub pginstall: Option<PathBuf>,
    pub pgconfig: Option<PathBuf>,
}

/// Environment fallbacks, captured once per probe.
#[derive(Debug, Default, Clone)]
struct EnvPaths {
    pgdata: Option<PathBuf>,
    pginstall: Option<PathBuf>,
    pgconfig: Option<PathBuf>,
}

impl EnvPaths {
    fn capture() -> Self {
        Self {
            pgdata: env::var_os("PGDATA").map(PathBuf::from),
            pginstall: env::var_os("PGINSTALL").map(PathBuf::from),
            pgconfig: env::var_os("PGCONFIG").map(PathBuf::from),
        }
    }
}

#[derive(Debug, Error)]
pub enum DiscoveryError {
    #[error("library directory not found (is pg_config under $PGINSTALL/bin or on $PATH?)")]
    LibDir,
    #[error("extension share directory not found (pg_config --sharedir)")]
    ShareDir,
    #[error("postgresql.auto.conf not found (set --pgdata or $PGDATA)")]
    AutoConf,
    #[error("listing {}", path.display())]
    ListDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Where `pg_config` and `data_directory` were resolved from, kept for
/// the `--info` report.
#[derive(Debug, Default)]
pub struct Sources {
    pub pg_config_arg: Option<PathBuf>,
    pub pg_config_env: Option<PathBuf>,
    pub pg_config_path: Option<PathBuf>,
    pub data_dir_arg: Option<PathBuf>,
    pub data_dir_env: Option<PathBuf>,
}

/// Everything the probe resolved. `None` means not found; only
/// [`Probe::validate`] decides what is required.
#[derive(Debug, Default)]
pub struct Probe {
    pub pgdata: Option<PathBuf>,
    pub pg_config: Option<PathBuf>,
    pub libdir: Option<PathBuf>,
    pub sharedir: Option<PathBuf>,
    pub postgresql_conf: Option<PathBuf>,
    pub auto_conf: Option<PathBuf>,
    pub sources: Sources,
}

/// The validated subset the editor needs.
#[derive(Debug, Clone)]
pub struct Installation {
    pub libdir: PathBuf,
    pub sharedir: PathBuf,
    pub postgresql_conf: Option<PathBuf>,
    pub auto_conf: PathBuf,
}

impl Probe {
    pub fn validate(&self) -> Result<Installation, DiscoveryError> {
        let libdir = self.libdir.clone().ok_or(DiscoveryError::LibDir)?;
        let sharedir = self.sharedir.clone().ok_or(DiscoveryError::ShareDir)?;
        let auto_conf = self.auto_conf.clone().ok_or(DiscoveryError::AutoConf)?;
        Ok(Installation {
            libdir,
            sharedir,
            postgresql_conf: self.postgresql_conf.clone(),
            auto_conf,
        })
    }
}

fn existing_dir(path: Option<PathBuf>) -> Option<PathBuf> {
    path.filter(|p| p.is_dir())
}

fn existing_file(path: Option<PathBuf>) -> Option<PathBuf> {
    path.filter(|p| p.is_file())
}

/// `data_directory` from a configuration file, kept only when it names
/// an existing directory.
fn data_directory_of(conf_file: Option<&Path>) -> Option<PathBuf> {
    let conf_file = conf_file?;
    match conf::read_setting(conf_file, "data_directory") {
        Ok(value) => existing_dir(value.map(PathBuf::from)),
        Err(err) => {
            warn!("{err:#}");
            None
        }
    }
}

/// Ask `pg_config` for a directory; an unrunnable binary or a path that
/// does not exist yields `None`.
fn query_pg_config(pg_config: &Path, flag: &str) -> Option<PathBuf> {
    let output = Command::new(pg_config).arg(flag).output().ok()?;
    if !output.status.success() {
        return None;
    }
    let line = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if line.is_empty() {
        None
    } else {
        existing_dir(Some(PathBuf::from(line)))
    }
}

pub fn probe(overrides: &Overrides) -> Probe {
    probe_with(overrides, &EnvPaths::capture())
}

fn probe_with(overrides: &Overrides, env_paths: &EnvPaths) -> Probe {
    let pgdata_arg = existing_dir(overrides.pgdata.clone());
    let pginstall_arg = existing_dir(overrides.pginstall.clone());
    let pgconfig_arg = existing_dir(overrides.pgconfig.clone());
    let pgdata_env = existing_dir(env_paths.pgdata.clone());
    let pginstall_env = existing_dir(env_paths.pginstall.clone());
    let pgconfig_env = existing_dir(env_paths.pgconfig.clone());

    let pg_config_arg = existing_file(pginstall_arg.map(|d| d.join("bin/pg_config")));
    let pg_config_env = existing_file(pginstall_env.map(|d| d.join("bin/pg_config")));
    let pg_config_path = which::which("pg_config").ok();

    let conf_arg = existing_file(pgconfig_arg.map(|d| d.join("postgresql.conf")));
    let conf_env = existing_file(pgconfig_env.map(|d| d.join("postgresql.conf")));
    let data_dir_arg = data_directory_of(conf_arg.as_deref());
    let data_dir_env = data_directory_of(conf_env.as_deref());

    let pg_config = pg_config_arg
        .clone()
        .or_else(|| pg_config_env.clone())
        .or_else(|| pg_config_path.clone());

    // postgresql.conf named via PGCONFIG wins over the one in the data
    // directory; its data_directory setting outranks the environment.
    let (pgdata, postgresql_conf) = if let Some(conf) = conf_arg.clone() {
        let pgdata = pgdata_arg.or_else(|| data_dir_arg.clone()).or(pgdata_env);
        (pgdata, Some(conf))
    } else if let Some(conf) = conf_env.clone() {
        let pgdata = pgdata_arg.or_else(|| data_dir_env.clone()).or(pgdata_env);
        (pgdata, Some(conf))
    } else {
        let pgdata = pgdata_arg.or(pgdata_env);
        let conf = existing_file(pgdata.as_ref().map(|d| d.join("postgresql.conf")));
        (pgdata, conf)
    };

    let auto_conf = existing_file(pgdata.as_ref().map(|d| d.join("postgresql.auto.conf")));

    let libdir = pg_config
        .as_deref()
        .and_then(|p| query_pg_config(p, "--libdir"));
    let sharedir = pg_config
        .as_deref()
        .and_then(|p| query_pg_config(p, "--sharedir"));

    Probe {
        pgdata,
        pg_config,
        libdir,
        sharedir,
        postgresql_conf,
        auto_conf,
        sources: Sources {
            pg_config_arg,
            pg_config_env,
            pg_config_path,
            data_dir_arg,
            data_dir_env,
        },
    }
}

/// List installed extensions: every `<sharedir>/extension/*.control`
/// whose matching `<libdir>/<name>.so` exists, in name order.
pub fn installed_extensions(install: &Installation) -> Result<Vec<String>, DiscoveryError> {
    let list = |path: &Path| -> Result<fs::ReadDir, DiscoveryError> {
        fs::read_dir(path).map_err(|source| DiscoveryError::ListDir {
            path: path.to_path_buf(),
            source,
        })
    };

    let mut shared_objects = FxHashSet::default();
    for entry in list(&install.libdir)?.flatten() {
        let path = entry.path();
        if path.extension().is_some_and(|ext| ext == "so") {
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                shared_objects.insert(stem.to_string());
            }
        }
    }

    let extension_dir = install.sharedir.join("extension");
    let mut names = Vec::new();
    for entry in list(&extension_dir)?.flatten() {
        let path = entry.path();
        if path.extension().is_some_and(|ext| ext == "control") {
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                if shared_objects.contains(stem) {
                    names.push(stem.to_string());
                }
            }
        }
    }
    names.sort();
    Ok(names)
}

fn describe_dir(path: Option<&Path>) -> String {
    match path {
        None => "not set".to_string(),
        Some(p) => format!(
            "set to '{}' ({})",
            p.display(),
            if p.is_dir() { "exists" } else { "does not exist" }
        ),
    }
}

fn found(path: Option<&Path>) -> &'static str {
    if path.is_some() {
        "Found"
    } else {
        "Not found"
    }
}

fn path_or_missing(path: Option<&Path>) -> String {
    match path {
        Some(p) => p.display().to_string(),
        None => "Not found".to_string(),
    }
}

/// Print the full probing report for `--info`.
pub fn print_report(overrides: &Overrides, probe: &Probe) {
    let env_paths = EnvPaths::capture();

    println!("Call parameters:");
    println!("$PGDATA    is {}", describe_dir(overrides.pgdata.as_deref()));
    println!(
        "$PGINSTALL is {}",
        describe_dir(overrides.pginstall.as_deref())
    );
    println!(
        "$PGCONFIG  is {}",
        describe_dir(overrides.pgconfig.as_deref())
    );

    println!("\nEnvironment variables:");
    println!("$PGDATA    is {}", describe_dir(env_paths.pgdata.as_deref()));
    println!(
        "$PGINSTALL is {}",
        describe_dir(env_paths.pginstall.as_deref())
    );
    println!(
        "$PGCONFIG  is {}",
        describe_dir(env_paths.pgconfig.as_deref())
    );

    println!("\nSearching for pg_config:");
    println!(
        "Via argument: {}",
        found(probe.sources.pg_config_arg.as_deref())
    );
    println!(
        "Via env var:  {}",
        found(probe.sources.pg_config_env.as_deref())
    );
    println!(
        "Via $PATH:    {}",
        found(probe.sources.pg_config_path.as_deref())
    );

    println!("\nChecking data_directory in PGCONFIG/postgresql.conf:");
    println!(
        "Via argument: {}",
        found(probe.sources.data_dir_arg.as_deref())
    );
    println!(
        "Via env var:  {}",
        found(probe.sources.data_dir_env.as_deref())
    );

    println!("\nFinal setting:");
    println!("$PGDATA:              {}", path_or_missing(probe.pgdata.as_deref()));
    println!(
        "pg_config:            {}",
        path_or_missing(probe.pg_config.as_deref())
    );
    println!("--libdir:             {}", path_or_missing(probe.libdir.as_deref()));
    println!(
        "--sharedir:           {}",
        path_or_missing(probe.sharedir.as_deref())
    );
    println!(
        "postgresql.conf:      {}",
        path_or_missing(probe.postgresql_conf.as_deref())
    );
    println!(
        "postgresql.auto.conf: {}",
        path_or_missing(probe.auto_conf.as_deref())
    );

    match probe.validate() {
        Ok(_) => println!("\nNecessary data found, it's OK to proceed."),
        Err(err) => println!("\nCan't proceed: {err}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn touch(path: &Path) {
        fs::write(path, "").unwrap();
    }

    fn fake_install(dir: &Path) -> Installation {
        let libdir = dir.join("lib");
        let sharedir = dir.join("share");
        fs::create_dir_all(&libdir).unwrap();
        fs::create_dir_all(sharedir.join("extension")).unwrap();
        Installation {
            libdir,
            sharedir,
            postgresql_conf: None,
            auto_conf: dir.join("postgresql.auto.conf"),
        }
    }

    #[test]
    fn extensions_need_both_control_and_shared_object() {
        let dir = tempfile::tempdir().unwrap();
        let install = fake_install(dir.path());

        touch(&install.libdir.join("pg_cron.so"));
        touch(&install.libdir.join("auth_delay.so"));
        touch(&install.libdir.join("stray.txt"));
        let ext = install.sharedir.join("extension");
        touch(&ext.join("pg_cron.control"));
        touch(&ext.join("auth_delay.control"));
        // control file without a shared object: not loadable, not listed
        touch(&ext.join("plpgsql.control"));

        let names = installed_extensions(&install).unwrap();
        assert_eq!(names, vec!["auth_delay", "pg_cron"]);
    }

    #[test]
    fn empty_install_yields_empty_catalog() {
        let dir = tempfile::tempdir().unwrap();
        let install = fake_install(dir.path());
        assert!(installed_extensions(&install).unwrap().is_empty());
    }

    #[test]
    fn missing_extension_dir_is_a_discovery_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut install = fake_install(dir.path());
        install.sharedir = dir.path().join("nope");
        fs::create_dir_all(&install.sharedir).unwrap();
        assert!(matches!(
            installed_extensions(&install),
            Err(DiscoveryError::ListDir { .. })
        ));
    }

    #[test]
    fn validate_requires_libdir_sharedir_and_auto_conf() {
        let probe = Probe::default();
        assert!(matches!(probe.validate(), Err(DiscoveryError::LibDir)));

        let dir = tempfile::tempdir().unwrap();
        let probe = Probe {
            libdir: Some(dir.path().to_path_buf()),
            sharedir: Some(dir.path().to_path_buf()),
            auto_conf: None,
            ..Probe::default()
        };
        assert!(matches!(probe.validate(), Err(DiscoveryError::AutoConf)));
    }

    #[test]
    fn probe_prefers_arg_over_env_and_skips_missing_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let data_arg = dir.path().join("data-arg");
        let data_env = dir.path().join("data-env");
        fs::create_dir_all(&data_arg).unwrap();
        fs::create_dir_all(&data_env).unwrap();
        touch(&data_arg.join("postgresql.auto.conf"));

        let overrides = Overrides {
            pgdata: Some(data_arg.clone()),
            ..Overrides::default()
        };
        let env_paths = EnvPaths {
            pgdata: Some(data_env),
            ..EnvPaths::default()
        };
        let probe = probe_with(&overrides, &env_paths);
        assert_eq!(probe.pgdata.as_deref(), Some(data_arg.as_path()));
        assert!(probe.auto_conf.is_some());

        // a nonexistent override falls through to the environment
        let overrides = Overrides {
            pgdata: Some(dir.path().join("gone")),
            ..Overrides::default()
        };
        let env_paths = EnvPaths {
            pgdata: Some(data_arg.clone()),
            ..EnvPaths::default()
        };
        let probe = probe_with(&overrides, &env_paths);
        assert_eq!(probe.pgdata.as_deref(), Some(data_arg.as_path()));
    }

    #[test]
    fn probe_reads_data_directory_from_named_conf() {
        let dir = tempfile::tempdir().unwrap();
        let confdir = dir.path().join("etc");
        let data = dir.path().join("cluster");
        fs::create_dir_all(&confdir).unwrap();
        fs::create_dir_all(&data).unwrap();
        fs::write(
            confdir.join("postgresql.conf"),
            format!("data_directory = '{}'\n", data.display()),
        )
        .unwrap();
        touch(&data.join("postgresql.auto.conf"));

        let overrides = Overrides {
            pgconfig: Some(confdir.clone()),
            ..Overrides::default()
        };
        let probe = probe_with(&overrides, &EnvPaths::default());
        assert_eq!(probe.pgdata.as_deref(), Some(data.as_path()));
        assert_eq!(
            probe.postgresql_conf.as_deref(),
            Some(confdir.join("postgresql.conf").as_path())
        );
        assert!(probe.auto_conf.is_some());
    }
}
