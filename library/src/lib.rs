pub mod builtin;
pub mod config;
pub mod error;
pub mod knob;
pub mod plugin;
pub mod project;

use std::path::PathBuf;

use log::{info, warn};

pub use config::EngineConfig;
pub use error::LibraryError;
use plugin::PluginManager;
use project::NodeGroup;

/// Build the plugin registration table used by the rest of the engine.
pub fn create_plugin_manager(config: &EngineConfig) -> PluginManager {
    let manager = PluginManager::new();
    builtin::register_builtin_plugins(&manager, &config.registry.disabled_plugins);
    info!(
        "Plugin manager ready with {} node types",
        manager.get_all_plugins().len()
    );
    manager
}

const USAGE: &str = "usage: cli <plugins|inspect GROUP.json> [--config FILE]";

struct CliArgs {
    command: String,
    positional: Vec<String>,
    config_path: Option<PathBuf>,
}

fn parse_args(args: &[String]) -> Result<CliArgs, LibraryError> {
    let mut iter = args.iter().skip(1);
    let mut command = None;
    let mut positional = Vec::new();
    let mut config_path = None;

    while let Some(arg) = iter.next() {
        if arg == "--config" {
            let path = iter.next().ok_or_else(|| {
                LibraryError::InvalidArgument("--config requires a path".to_string())
            })?;
            config_path = Some(PathBuf::from(path));
        } else if command.is_none() {
            command = Some(arg.clone());
        } else {
            positional.push(arg.clone());
        }
    }

    Ok(CliArgs {
        command: command.ok_or_else(|| LibraryError::InvalidArgument(USAGE.to_string()))?,
        positional,
        config_path,
    })
}

/// Entry point of the `cli` binary.
pub fn run(args: Vec<String>) -> Result<(), LibraryError> {
    let cli = parse_args(&args)?;

    let (config, config_warning) = match &cli.config_path {
        Some(path) if path.exists() => (EngineConfig::load(path)?, None),
        Some(path) => (
            EngineConfig::default(),
            Some(format!("Config file {} not found, using defaults", path.display())),
        ),
        None => (EngineConfig::default(), None),
    };

    let _ = env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.log.filter.as_str()),
    )
    .try_init();
    if let Some(message) = config_warning {
        warn!("{}", message);
    }

    let manager = create_plugin_manager(&config);

    match cli.command.as_str() {
        "plugins" => {
            for p in manager.get_all_plugins() {
                println!(
                    "{}\t{}\t{}\t{}\t{:?}",
                    p.id, p.name, p.category, p.version, p.render_safety
                );
            }
            Ok(())
        }
        "inspect" => {
            let path = cli.positional.first().ok_or_else(|| {
                LibraryError::InvalidArgument("inspect requires a group file".to_string())
            })?;
            let json = std::fs::read_to_string(path)?;
            let group = NodeGroup::load(&json, &manager)?;
            println!("Group '{}': {} input(s)", group.name(), group.input_ports().len());
            for port in group.input_ports() {
                println!(
                    "  [{}] {} optional={} mask={}",
                    port.index, port.label, port.optional, port.mask
                );
            }
            Ok(())
        }
        other => Err(LibraryError::InvalidArgument(format!(
            "Unknown command '{}'",
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_args() {
        let cli = parse_args(&args(&["cli", "inspect", "g.json", "--config", "c.toml"])).unwrap();
        assert_eq!(cli.command, "inspect");
        assert_eq!(cli.positional, vec!["g.json".to_string()]);
        assert_eq!(cli.config_path, Some(PathBuf::from("c.toml")));
    }

    #[test]
    fn test_parse_args_errors() {
        assert!(parse_args(&args(&["cli"])).is_err());
        assert!(parse_args(&args(&["cli", "plugins", "--config"])).is_err());
    }

    #[test]
    fn test_unknown_command() {
        let result = run(args(&["cli", "frobnicate"]));
        assert!(matches!(result, Err(LibraryError::InvalidArgument(_))));
    }

    #[test]
    fn test_create_plugin_manager_respects_disabled() {
        let manager = create_plugin_manager(&EngineConfig::default());
        assert!(manager.is_registered(builtin::GROUP_INPUT_PLUGIN_ID));

        let mut config = EngineConfig::default();
        config
            .registry
            .disabled_plugins
            .push(builtin::GROUP_INPUT_PLUGIN_ID.to_string());
        let manager = create_plugin_manager(&config);
        assert!(!manager.is_registered(builtin::GROUP_INPUT_PLUGIN_ID));
    }
}
