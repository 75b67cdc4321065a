//! Config subcommand handlers.

use netwatch_config::Config;

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config::{self, OutputOpts};
use crate::error::CliError;
use crate::output;

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        // ── Path ────────────────────────────────────────────────────
        ConfigCommand::Path => {
            println!("{}", config::config_path(global).display());
            Ok(())
        }

        // ── Show: resolved file + env layering ──────────────────────
        ConfigCommand::Show => {
            let cfg = config::load(global)?;
            let out: OutputOpts = config::resolve_output(&cfg, global)?;
            let rendered = output::render_single(
                out.format,
                &cfg,
                |c| {
                    toml::to_string_pretty(c)
                        .unwrap_or_else(|e| format!("<failed to render config: {e}>"))
                },
                |c| c.probe.endpoints.join("\n"),
            );
            output::print_output(&rendered, out.quiet);
            Ok(())
        }

        // ── Init: write defaults ────────────────────────────────────
        ConfigCommand::Init { force } => {
            let path = config::config_path(global);
            if path.exists() && !force {
                return Err(CliError::ConfigExists {
                    path: path.display().to_string(),
                });
            }

            netwatch_config::save_config_to(&Config::default(), &path)?;

            if !global.quiet {
                eprintln!("✓ Configuration written to {}", path.display());
                eprintln!("\n  Test it: netwatch check");
            }
            Ok(())
        }
    }
}
