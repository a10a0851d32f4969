//! CLI argument definitions for kestrel-daemon.
//!
//! Uses `clap` v4 derive macros to parse command-line arguments.

use std::path::PathBuf;

use clap::Parser;

/// Kestrel runtime security agent daemon.
///
/// Resolves the configuration document and command-line overrides into
/// the runtime configuration consumed by the rule engine, the output
/// dispatchers, the gRPC server and the plugin loader.
#[derive(Parser, Debug)]
#[command(name = "kestrel-daemon")]
#[command(version, about, long_about = None)]
pub struct DaemonCli {
    /// Path to the kestrel.yaml configuration file.
    #[arg(short, long, default_value = "/etc/kestrel/kestrel.yaml")]
    pub config: PathBuf,

    /// Override a configuration value (key=val or key.subkey=val).
    ///
    /// May be given multiple times; overrides are applied in order,
    /// before any value is read from the configuration file.
    #[arg(short = 'o', long = "option", value_name = "KEY=VAL")]
    pub options: Vec<String>,

    /// Resolve and validate the configuration, then exit.
    #[arg(long)]
    pub validate: bool,

    /// Print the resolved configuration as JSON and exit.
    #[arg(long)]
    pub dump_config: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let cli = DaemonCli::parse_from(["kestrel-daemon"]);
        assert_eq!(cli.config, PathBuf::from("/etc/kestrel/kestrel.yaml"));
        assert!(cli.options.is_empty());
        assert!(!cli.validate);
        assert!(!cli.dump_config);
    }

    #[test]
    fn repeated_options_preserve_order() {
        let cli = DaemonCli::parse_from([
            "kestrel-daemon",
            "-o",
            "log_level=debug",
            "-o",
            "webserver.listen_port=9999",
        ]);
        assert_eq!(
            cli.options,
            vec![
                "log_level=debug".to_owned(),
                "webserver.listen_port=9999".to_owned()
            ]
        );
    }

    #[test]
    fn config_path_short_flag() {
        let cli = DaemonCli::parse_from(["kestrel-daemon", "-c", "/tmp/kestrel.yaml"]);
        assert_eq!(cli.config, PathBuf::from("/tmp/kestrel.yaml"));
    }
}
