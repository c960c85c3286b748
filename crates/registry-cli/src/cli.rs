//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Plugin registry - fetch, reconcile and validate registered plugins
#[derive(Parser, Debug)]
#[command(name = "plugin-registry")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// The command to run
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Fetch metadata of registered plugins and write the registry output
    ///
    /// Examples:
    ///   plugin-registry fetch                      # Every plugin in plugins.yaml
    ///   plugin-registry fetch aiida-diff           # Only aiida-diff
    ///   plugin-registry fetch -r plugins.json -o out.json
    Fetch {
        /// Plugins to process (default: all)
        packages: Vec<String>,

        /// Registry file (.yaml, .yml or .json)
        #[arg(short, long, env = "PLUGIN_REGISTRY", default_value = "plugins.yaml")]
        registry: PathBuf,

        /// Configuration file (TOML)
        #[arg(short, long, env = "PLUGIN_REGISTRY_CONFIG")]
        config: Option<PathBuf>,

        /// Output file, overriding the configured path
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_defaults() {
        let cli = Cli::try_parse_from(["plugin-registry", "fetch"]).unwrap();
        match cli.command {
            Some(Commands::Fetch {
                packages,
                registry,
                config,
                output,
            }) => {
                assert!(packages.is_empty());
                assert_eq!(registry, PathBuf::from("plugins.yaml"));
                assert!(config.is_none());
                assert!(output.is_none());
            }
            other => panic!("Expected fetch, got {other:?}"),
        }
    }

    #[test]
    fn test_fetch_with_packages_and_paths() {
        let cli = Cli::try_parse_from([
            "plugin-registry",
            "-v",
            "fetch",
            "aiida-diff",
            "aiida-core",
            "--registry",
            "reg.json",
            "-o",
            "out.json",
        ])
        .unwrap();
        assert!(cli.verbose);
        assert_eq!(
            cli.command,
            Some(Commands::Fetch {
                packages: vec!["aiida-diff".to_string(), "aiida-core".to_string()],
                registry: PathBuf::from("reg.json"),
                config: None,
                output: Some(PathBuf::from("out.json")),
            })
        );
    }

    #[test]
    fn test_verbose_is_global() {
        let cli = Cli::try_parse_from(["plugin-registry", "fetch", "--verbose"]).unwrap();
        assert!(cli.verbose);
    }
}
