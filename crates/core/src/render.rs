//! Canonical `settings.gradle.kts` generation
//!
//! Renders a resolved [`BuildSettings`] back to the settings file the build
//! expects. SDK-relative entries are emitted against the `$flutterSdkPath`
//! variable rather than the absolute path resolved on this machine, so the
//! output is portable across checkouts. `circle-settings render` uses this
//! to regenerate a drifted settings file.

use crate::plugin::PluginDeclaration;
use crate::repository::Repository;
use crate::settings::{BuildSettings, FLUTTER_SDK_KEY};
use std::fmt::Write;

/// Render the canonical settings file for a resolved configuration
pub fn render(settings: &BuildSettings) -> String {
    let mut out = String::new();

    render_plugin_management(&mut out, settings);
    out.push('\n');
    render_plugins_block(&mut out, settings);
    out.push('\n');
    render_dependency_resolution(&mut out, settings);
    out.push('\n');
    render_project(&mut out, settings);

    out
}

fn render_sdk_path_lookup(out: &mut String, indent: &str) {
    let _ = writeln!(out, "{}val flutterSdkPath = run {{", indent);
    let _ = writeln!(out, "{}    val properties = java.util.Properties()", indent);
    let _ = writeln!(
        out,
        "{}    file(\"local.properties\").inputStream().use {{ properties.load(it) }}",
        indent
    );
    let _ = writeln!(
        out,
        "{}    properties.getProperty(\"{key}\") ?: error(\"{key} not set in local.properties\")",
        indent,
        key = FLUTTER_SDK_KEY
    );
    let _ = writeln!(out, "{}}}", indent);
}

fn render_plugin_management(out: &mut String, settings: &BuildSettings) {
    out.push_str("pluginManagement {\n");
    render_sdk_path_lookup(out, "    ");

    for repo in settings.plugin_repositories.iter() {
        if let Repository::IncludedBuild { path } = repo {
            let _ = writeln!(
                out,
                "    includeBuild(\"{}\")",
                portable_path(path, &settings.sdk_path)
            );
        }
    }

    out.push_str("    repositories {\n");
    for repo in settings.plugin_repositories.iter() {
        if let Some(call) = public_repository_call(repo) {
            let _ = writeln!(out, "        {}", call);
        }
    }
    out.push_str("    }\n");
    out.push_str("}\n");
}

fn render_plugins_block(out: &mut String, settings: &BuildSettings) {
    out.push_str("plugins {\n");
    for declaration in settings.plugins.iter() {
        let _ = writeln!(out, "    {}", plugin_line(declaration));
    }
    out.push_str("}\n");
}

fn render_dependency_resolution(out: &mut String, settings: &BuildSettings) {
    out.push_str("dependencyResolutionManagement {\n");
    let _ = writeln!(
        out,
        "    repositoriesMode.set(RepositoriesMode.{})",
        settings.resolution_mode
    );
    out.push_str("    repositories {\n");
    render_sdk_path_lookup(out, "        ");
    for repo in settings.dependency_repositories.iter() {
        match repo {
            Repository::Maven { url } if repo.is_sdk_local() => {
                let _ = writeln!(
                    out,
                    "        maven(url = \"{}\")",
                    portable_path(url, &settings.sdk_path)
                );
            }
            Repository::Maven { url } => {
                let _ = writeln!(out, "        maven(url = \"{}\")", url);
            }
            other => {
                if let Some(call) = public_repository_call(other) {
                    let _ = writeln!(out, "        {}", call);
                }
            }
        }
    }
    out.push_str("    }\n");
    out.push_str("}\n");
}

fn render_project(out: &mut String, settings: &BuildSettings) {
    let _ = writeln!(out, "rootProject.name = \"{}\"", settings.project.root_name);
    for module in &settings.project.includes {
        let _ = writeln!(out, "include(\"{}\")", module);
    }
}

fn plugin_line(declaration: &PluginDeclaration) -> String {
    let mut line = format!(
        "id(\"{}\") version \"{}\"",
        declaration.id, declaration.version
    );
    if !declaration.applies_immediately() {
        line.push_str(" apply false");
    }
    line
}

fn public_repository_call(repo: &Repository) -> Option<&'static str> {
    match repo {
        Repository::Google => Some("google()"),
        Repository::MavenCentral => Some("mavenCentral()"),
        Repository::GradlePluginPortal => Some("gradlePluginPortal()"),
        _ => None,
    }
}

/// Replace the machine-local SDK prefix with the `$flutterSdkPath` variable
fn portable_path(path: &str, sdk_path: &str) -> String {
    match path.strip_prefix(sdk_path) {
        Some(rest) => format!("$flutterSdkPath{}", rest),
        None => path.to_string(),
    }
}
