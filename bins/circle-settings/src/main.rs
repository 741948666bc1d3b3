//! circle-settings CLI
//!
//! Resolves the Gradle build settings of a circle_app checkout, checks the
//! Flutter SDK installation they point at, and regenerates the canonical
//! settings file.

use anyhow::Result;
use circle_build_cli::output::{format_count, health_glyph, Status};
use circle_build_core::config::ToolConfig;
use circle_build_core::error::exit_codes;
use circle_build_core::health::SdkHealthChecker;
use circle_build_core::render;
use circle_build_core::settings::{BuildSettings, SettingsResolver};
use clap::{Parser, Subcommand};
use owo_colors::OwoColorize;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "circle-settings")]
#[command(about = "Build settings tooling for the circle_app Android project")]
#[command(version)]
struct Cli {
    /// Project directory containing local.properties
    #[arg(short, long, global = true, default_value = ".")]
    project_dir: PathBuf,

    /// Tool config file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Increase output verbosity
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve the build settings and print a summary
    Resolve {
        /// Emit the resolved settings as JSON
        #[arg(long)]
        json: bool,
    },

    /// List plugin and dependency repositories in priority order
    Repos {
        /// Emit the repository lists as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show plugin declarations and activation state
    Plugins {
        /// Activate a deferred plugin by id (repeatable)
        #[arg(long)]
        activate: Vec<String>,
        /// Emit the plugin set as JSON
        #[arg(long)]
        json: bool,
    },

    /// Check the Flutter SDK installation the settings point at
    Doctor {
        /// Emit the health report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Regenerate the canonical settings.gradle.kts
    Render {
        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if cli.verbose {
        tracing_subscriber::fmt()
            .with_env_filter("circle_build_core=debug,circle_settings=debug")
            .init();
    }

    match run(&cli) {
        Ok(code) => ExitCode::from(code as u8),
        Err(err) => {
            Status::error(&format!("{}", err));
            ExitCode::from(exit_code_for(&err) as u8)
        }
    }
}

fn run(cli: &Cli) -> Result<i32> {
    let config = ToolConfig::load(&cli.project_dir, cli.config.as_deref())?;

    match &cli.command {
        Commands::Resolve { json } => {
            let settings = resolve(cli, config)?;
            if *json {
                println!("{}", serde_json::to_string_pretty(&settings)?);
            } else {
                print_summary(&settings);
            }
            Ok(exit_codes::SUCCESS)
        }

        Commands::Repos { json } => {
            let settings = resolve(cli, config)?;
            if *json {
                let lists = serde_json::json!({
                    "plugin_repositories": settings.plugin_repositories,
                    "dependency_repositories": settings.dependency_repositories,
                });
                println!("{}", serde_json::to_string_pretty(&lists)?);
            } else {
                Status::header("Plugin repositories");
                for repo in settings.plugin_repositories.iter() {
                    println!("  {}", repo);
                }
                Status::header("Dependency repositories");
                for repo in settings.dependency_repositories.iter() {
                    println!("  {}", repo);
                }
            }
            Ok(exit_codes::SUCCESS)
        }

        Commands::Plugins { activate, json } => {
            let mut settings = resolve(cli, config)?;
            for id in activate {
                settings.plugins.activate(id)?;
            }
            if *json {
                println!("{}", serde_json::to_string_pretty(&settings.plugins)?);
            } else {
                Status::header("Plugins");
                for declaration in settings.plugins.iter() {
                    let state = if settings.plugins.is_active(&declaration.id) {
                        "active".green().to_string()
                    } else {
                        "deferred".dimmed().to_string()
                    };
                    println!(
                        "  {} {} [{}]",
                        declaration.id,
                        declaration.version.dimmed(),
                        state
                    );
                }
            }
            Ok(exit_codes::SUCCESS)
        }

        Commands::Doctor { json } => {
            let report = SdkHealthChecker::new(&cli.project_dir)
                .with_config(config)
                .run();
            if *json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                Status::header("Flutter SDK doctor");
                for check in &report.checks {
                    let mut line = format!("  {}  {}", health_glyph(check.status), check.name);
                    if let Some(message) = &check.message {
                        line.push_str(&format!(" ({})", message));
                    }
                    println!("{}", line);
                }
                println!();
                let failures = report.failures();
                if failures.is_empty() {
                    Status::success("All checks passed");
                } else {
                    Status::warning(&format!(
                        "{} did not pass",
                        format_count(failures.len(), "check", "checks")
                    ));
                }
            }
            if report.status.is_operational() {
                Ok(exit_codes::SUCCESS)
            } else {
                Ok(exit_codes::FAILURE)
            }
        }

        Commands::Render { output } => {
            let settings = resolve(cli, config)?;
            let text = render::render(&settings);
            match output {
                Some(path) => {
                    std::fs::write(path, &text)?;
                    Status::success(&format!("Wrote {}", path.display()));
                }
                None => print!("{}", text),
            }
            Ok(exit_codes::SUCCESS)
        }
    }
}

fn resolve(cli: &Cli, config: ToolConfig) -> Result<BuildSettings> {
    let settings = SettingsResolver::new(&cli.project_dir)
        .with_config(config)
        .resolve()?;
    Ok(settings)
}

fn print_summary(settings: &BuildSettings) {
    Status::header("Resolved build settings");
    Status::key_value("project", &settings.project.root_name);
    Status::key_value("modules", &settings.project.module_names().join(", "));
    Status::key_value("flutter.sdk", &settings.sdk_path);
    Status::key_value("resolution mode", &settings.resolution_mode.to_string());
    Status::key_value(
        "plugin repositories",
        &format_count(settings.plugin_repositories.len(), "entry", "entries"),
    );
    Status::key_value(
        "dependency repositories",
        &format_count(settings.dependency_repositories.len(), "entry", "entries"),
    );
    Status::key_value(
        "plugins",
        &format!(
            "{} ({} active)",
            settings.plugins.len(),
            settings.plugins.active().len()
        ),
    );
}

/// Map structured core errors onto stable process exit codes
fn exit_code_for(err: &anyhow::Error) -> i32 {
    match err.downcast_ref::<circle_build_core::Error>() {
        Some(e) => match e.code.category() {
            "IO" | "Configuration" => exit_codes::CONFIG_ERROR,
            "Repository" => exit_codes::REPOSITORY_ERROR,
            "Plugin" => exit_codes::PLUGIN_ERROR,
            "Validation" => exit_codes::VALIDATION_ERROR,
            _ => exit_codes::FAILURE,
        },
        None => exit_codes::FAILURE,
    }
}
