//! The `fetch` command: one complete registry run.

use std::path::Path;

use colored::Colorize;

use registry_core::{Reconciler, RunOutput, run, write_output};
use registry_index::HttpFetcher;
use registry_meta::{Finding, RegistryConfig, Reporter, Severity, load_registry};

use crate::error::Result;

/// Fetch and validate the plugins of `registry_path` and write the output.
///
/// An empty `packages` list selects every plugin.
pub fn run_fetch(
    packages: &[String],
    registry_path: &Path,
    config_path: Option<&Path>,
    output_path: Option<&Path>,
) -> Result<()> {
    let config = match config_path {
        Some(path) => RegistryConfig::load(path)?,
        None => RegistryConfig::default(),
    };
    let registry = load_registry(registry_path)?;
    let output_path = output_path.unwrap_or(config.output.path.as_path());

    let fetcher = HttpFetcher::new(&config.network)?;
    let reconciler = Reconciler::new(&fetcher, &config);
    let mut reporter = Reporter::new();
    let filter = (!packages.is_empty()).then_some(packages);

    let output = run(&registry, filter, &reconciler, &mut reporter);
    write_output(output_path, &output)?;

    if github_actions() {
        for line in annotations(&output.summary) {
            println!("{line}");
        }
    }
    print_report(&output, output_path);
    Ok(())
}

fn github_actions() -> bool {
    std::env::var("GITHUB_ACTIONS").is_ok_and(|v| v == "true")
}

/// One workflow command per finding.
fn annotations(summary: &[Finding]) -> Vec<String> {
    summary
        .iter()
        .map(|finding| {
            let level = match finding.severity {
                Severity::Warning => "warning",
                Severity::Error => "error",
            };
            format!("::{level}::{}", escape_command_data(&finding.to_string()))
        })
        .collect()
}

/// Encode the characters a workflow command message cannot carry verbatim.
fn escape_command_data(data: &str) -> String {
    data.replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

fn print_report(output: &RunOutput, path: &Path) {
    let count = |severity: Severity| {
        output
            .summary
            .iter()
            .filter(|f| f.severity == severity)
            .count()
    };
    let errors = count(Severity::Error);
    let warnings = count(Severity::Warning);

    let status = if errors > 0 {
        "!".red().bold()
    } else if warnings > 0 {
        "!".yellow().bold()
    } else {
        "✓".green().bold()
    };
    println!(
        "{} Processed {} plugins: {} errors, {} warnings",
        status,
        output.plugins.len(),
        errors,
        warnings
    );
    println!("  Wrote {}", path.display().to_string().cyan());
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn finding(entity: &str, severity: Severity, message: &str) -> Finding {
        Finding {
            entity: entity.to_string(),
            severity,
            message: message.to_string(),
        }
    }

    #[test]
    fn test_annotations() {
        let summary = vec![
            finding("aiida-diff", Severity::Warning, "AiiDA version not specified"),
            finding(
                "aiida-broken",
                Severity::Error,
                "Poetry manifest is missing mandatory field 'version'",
            ),
            finding("", Severity::Warning, "Plugin 'x' not found in registry"),
        ];
        assert_eq!(
            annotations(&summary),
            vec![
                "::warning::aiida-diff: AiiDA version not specified",
                "::error::aiida-broken: Poetry manifest is missing mandatory field 'version'",
                "::warning::Plugin 'x' not found in registry",
            ]
        );
    }

    #[test]
    fn test_multiline_finding_stays_one_command() {
        let summary = vec![finding(
            "aiida-diff",
            Severity::Error,
            "Unable to parse setup.json\r\nline 2: 100% broken\n::error::injected",
        )];
        let lines = annotations(&summary);
        assert_eq!(
            lines,
            vec![
                "::error::aiida-diff: Unable to parse setup.json%0D%0Aline 2: 100%25 broken%0A::error::injected"
            ]
        );
        assert!(!lines[0].contains('\n'));
        assert!(!lines[0].contains('\r'));
    }
}
