//! CLI-side configuration resolution: config file + global flags, and
//! translation to `netwatch_core::MonitorConfig`.
//!
//! Core never sees these types -- it receives a pre-built `MonitorConfig`.

use std::path::PathBuf;

use clap::ValueEnum;

use netwatch_config::Config;
use netwatch_core::MonitorConfig;

use crate::cli::{ColorMode, GlobalOpts, OutputFormat};
use crate::error::CliError;
use crate::output;

/// Output settings resolved from flags, env and the `[defaults]` table.
#[derive(Debug, Clone, Copy)]
pub struct OutputOpts {
    pub format: OutputFormat,
    pub color: bool,
    pub quiet: bool,
}

/// Config file path (flag > env > platform default).
pub fn config_path(global: &GlobalOpts) -> PathBuf {
    global
        .config
        .clone()
        .unwrap_or_else(netwatch_config::config_path)
}

/// Load the layered config for this invocation.
pub fn load(global: &GlobalOpts) -> Result<Config, CliError> {
    let path = config_path(global);
    tracing::debug!(path = %path.display(), "loading configuration");
    Ok(netwatch_config::load_config_from(&path)?)
}

/// Apply global flag overrides, then translate to the runtime form.
pub fn resolve_monitor_config(cfg: &Config, global: &GlobalOpts) -> Result<MonitorConfig, CliError> {
    let mut cfg = cfg.clone();
    if !global.endpoints.is_empty() {
        cfg.probe.endpoints.clone_from(&global.endpoints);
    }
    if let Some(timeout) = global.timeout {
        cfg.probe.timeout_secs = timeout;
    }
    Ok(cfg.to_monitor_config()?)
}

/// Resolve output settings (flag > env > config defaults).
pub fn resolve_output(cfg: &Config, global: &GlobalOpts) -> Result<OutputOpts, CliError> {
    let format = match global.output {
        Some(format) => format,
        None => parse_value::<OutputFormat>("defaults.output", &cfg.defaults.output)?,
    };
    let color = match global.color {
        Some(mode) => mode,
        None => parse_value::<ColorMode>("defaults.color", &cfg.defaults.color)?,
    };
    Ok(OutputOpts {
        format,
        color: output::should_color(color),
        quiet: global.quiet,
    })
}

fn parse_value<T: ValueEnum>(field: &str, raw: &str) -> Result<T, CliError> {
    T::from_str(raw, true).map_err(|_| CliError::Validation {
        field: field.into(),
        reason: format!("unsupported value '{raw}'"),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use clap::Parser;

    use super::*;
    use crate::cli::Cli;

    fn global(args: &[&str]) -> GlobalOpts {
        let mut argv = vec!["netwatch"];
        argv.extend_from_slice(args);
        argv.push("check");
        Cli::try_parse_from(argv).unwrap().global
    }

    #[test]
    fn flags_override_probe_section() {
        let g = global(&["-e", "http://127.0.0.1:9/a", "--timeout", "2"]);
        let runtime = resolve_monitor_config(&Config::default(), &g).unwrap();
        assert_eq!(runtime.endpoints.len(), 1);
        assert_eq!(runtime.endpoints[0].as_str(), "http://127.0.0.1:9/a");
        assert_eq!(runtime.probe_timeout.as_secs(), 2);
    }

    #[test]
    fn output_falls_back_to_config_defaults() {
        let mut cfg = Config::default();
        cfg.defaults.output = "yaml".into();
        cfg.defaults.color = "never".into();

        let opts = resolve_output(&cfg, &global(&[])).unwrap();
        assert_eq!(opts.format, OutputFormat::Yaml);
        assert!(!opts.color);

        let opts = resolve_output(&cfg, &global(&["-o", "json"])).unwrap();
        assert_eq!(opts.format, OutputFormat::Json);
    }

    #[test]
    fn unknown_default_output_is_rejected() {
        let mut cfg = Config::default();
        cfg.defaults.output = "xml".into();
        let err = resolve_output(&cfg, &global(&[])).unwrap_err();
        assert_eq!(err.exit_code(), crate::error::exit_code::USAGE);
    }
}
