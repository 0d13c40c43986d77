//! Command-line surface.

use std::path::PathBuf;

use clap::Parser;

use crate::discovery::Overrides;

/// Select installed PostgreSQL extensions for the preload-libraries settings.
///
/// Displays the installed extensions of an existing PostgreSQL instance
/// and lets you select them for shared/session/local_preload_libraries.
/// The resulting settings are saved to postgresql.auto.conf. Each
/// directory below can also be given as an environment variable of the
/// same name; none is required, but at least the lib/share directories
/// (via pg_config) and postgresql.auto.conf must be resolvable.
#[derive(Parser, Debug)]
#[command(version, about)]
pub struct Cli {
    /// Cluster data directory; postgresql.auto.conf is expected here
    #[arg(long, value_name = "DIR")]
    pub pgdata: Option<PathBuf>,

    /// Directory containing the server binaries; pg_config is searched
    /// in its bin/ subdirectory (or on $PATH when unset)
    #[arg(long, value_name = "DIR")]
    pub pginstall: Option<PathBuf>,

    /// Extra directory to search for postgresql.conf when it is not in
    /// the data directory ('SHOW config_file' tells you where it lives)
    #[arg(long, value_name = "DIR")]
    pub pgconfig: Option<PathBuf>,

    /// Gather info about the installation, print it and exit.
    /// Use as diagnostics in case of problems
    #[arg(long)]
    pub info: bool,

    /// Rewrite the last saved configuration and exit, no UI
    #[arg(long)]
    pub last: bool,
}

impl Cli {
    pub fn overrides(&self) -> Overrides {
        Overrides {
            pgdata: self.pgdata.clone(),
            pginstall: self.pginstall.clone(),
            pgconfig: self.pgconfig.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_overrides_and_modes() {
        let cli = Cli::parse_from([
            "pgpreload",
            "--pgdata",
            "/var/lib/pg",
            "--info",
        ]);
        assert!(cli.info);
        assert!(!cli.last);
        let overrides = cli.overrides();
        assert_eq!(
            overrides.pgdata.as_deref(),
            Some(std::path::Path::new("/var/lib/pg"))
        );
        assert!(overrides.pginstall.is_none());
    }

    #[test]
    fn no_arguments_means_interactive_mode() {
        let cli = Cli::parse_from(["pgpreload"]);
        assert!(!cli.info && !cli.last);
        assert!(cli.pgdata.is_none());
    }
}
