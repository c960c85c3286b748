//! End-to-end registry runs
//!
//! These tests exercise the complete flow: registry file -> index and
//! manifest retrieval -> reconciliation -> validation -> output file.

use pretty_assertions::assert_eq;
use registry_core::{Reconciler, RunOutput, pip_install_command, run, write_output};
use registry_meta::{RegistryConfig, Reporter, Severity, load_registry};
use registry_test_utils::fixtures::{manifest_fixture, registry_fixture};
use registry_test_utils::wheel::build_wheel;
use registry_test_utils::{IndexRecord, StubFetcher};
use std::fs;
use tempfile::TempDir;

const CORE_WHEEL: &str = "https://files.pythonhosted.org/aiida_core-2.6.2-py3-none-any.whl";
const DIFF_WHEEL: &str = "https://files.pythonhosted.org/aiida_diff-1.2.0-py3-none-any.whl";

/// A fetcher serving every URL of `test-fixtures/registry/plugins.yaml`.
fn fetcher() -> StubFetcher {
    StubFetcher::new()
        .with_text(
            "https://raw.githubusercontent.com/aiidateam/aiida-broken/main/pyproject.toml",
            manifest_fixture("pyproject-broken.toml"),
        )
        .with_text(
            "https://pypi.org/pypi/aiida-core/json",
            IndexRecord::new("2.6.2")
                .summary("AiiDA is a workflow manager for computational science")
                .classifiers(&[
                    "Framework :: AiiDA",
                    "Development Status :: 5 - Production/Stable",
                ])
                .requires_dist(&["click~=8.1", "pydantic~=2.4"])
                .wheel(CORE_WHEEL)
                .to_json(),
        )
        .with_binary(
            CORE_WHEEL,
            build_wheel(
                "aiida_core-2.6.2",
                "[aiida.data]\ncore.int = aiida.orm.nodes.data.int:Int\n",
            ),
        )
        .with_reachable("https://aiida-core.readthedocs.io/")
        .with_text(
            "https://raw.githubusercontent.com/aiidaplugins/aiida-crystal17/master/setup.json",
            manifest_fixture("setup-crystal17.json"),
        )
        .with_text(
            "https://pypi.org/pypi/aiida-diff/json",
            IndexRecord::new("1.2.0")
                .summary("AiiDA demo plugin")
                .author("The AiiDA Team")
                .classifiers(&["Framework :: AiiDA", "Development Status :: 3 - Alpha"])
                .requires_dist(&["aiida-core (>=1.1.0,<2.0.0)"])
                .wheel(DIFF_WHEEL)
                .to_json(),
        )
        .with_binary(
            DIFF_WHEEL,
            build_wheel("aiida_diff-1.2.0", &manifest_fixture("entry_points.txt")),
        )
        .with_text(
            "https://gitlab.com/legacy/aiida-legacy/-/raw/master/setup.cfg",
            manifest_fixture("setup-legacy.cfg"),
        )
        .with_text(
            "https://gitlab.com/legacy/aiida-legacy/-/raw/master/aiida_legacy/__init__.py",
            manifest_fixture("legacy_init.py"),
        )
}

fn run_registry(fetcher: &StubFetcher, filter: Option<&[String]>) -> RunOutput {
    let registry = load_registry(&registry_fixture("plugins.yaml")).unwrap();
    let config = RegistryConfig::default();
    let reconciler = Reconciler::new(fetcher, &config);
    let mut reporter = Reporter::new();
    run(&registry, filter, &reconciler, &mut reporter)
}

#[test]
fn test_full_run() {
    let fetcher = fetcher();
    let output = run_registry(&fetcher, None);

    let names: Vec<&str> = output.plugins.keys().map(String::as_str).collect();
    assert_eq!(
        names,
        vec!["aiida-broken", "aiida-core", "aiida-crystal17", "aiida-diff", "aiida-legacy"]
    );

    let broken = &output.plugins["aiida-broken"];
    assert_eq!(
        broken.diagnostics.errors,
        vec!["Poetry manifest is missing mandatory field 'version'"]
    );
    assert!(broken.entry_points.is_empty());

    let core = &output.plugins["aiida-core"];
    assert_eq!(core.aiida_version.as_deref(), Some("==2.6.2"));
    assert_eq!(core.development_status, "stable");
    assert_eq!(core.entry_points["aiida.data"]["core.int"], "aiida.orm.nodes.data.int:Int");
    assert!(core.diagnostics.is_empty(), "{:?}", core.diagnostics);

    let crystal = &output.plugins["aiida-crystal17"];
    assert_eq!(crystal.version(), Some("0.11.0b1"));
    assert_eq!(crystal.aiida_version.as_deref(), Some(">=1.0.0,<2.0.0"));
    assert_eq!(crystal.development_status, "beta");
    assert!(crystal.entry_points.contains_key("gulp.potentials"));
    assert_eq!(
        crystal.diagnostics.warnings,
        vec!["`development_status` key is deprecated. Use PyPI Trove classifiers in the plugin repository instead."]
    );

    let diff = &output.plugins["aiida-diff"];
    assert_eq!(diff.version(), Some("1.2.0"));
    assert_eq!(diff.aiida_version.as_deref(), Some(">=1.1.0,<2.0.0"));
    assert_eq!(diff.entry_points.len(), 4);
    assert_eq!(
        diff.diagnostics.warnings,
        vec!["Unable to reach documentation URL: https://aiida-diff.readthedocs.io/"]
    );

    let legacy = &output.plugins["aiida-legacy"];
    assert_eq!(legacy.hosted_on.as_deref(), Some("gitlab.com"));
    assert_eq!(legacy.version(), Some("0.3.0"));
    assert_eq!(legacy.aiida_version.as_deref(), Some("~=0.12"));
    assert_eq!(legacy.development_status, "inactive");
    assert_eq!(
        legacy.diagnostics.warnings,
        vec![
            "Missing classifier 'Framework :: AiiDA'",
            "Entry point 'legacy.run' does not start with prefix 'MISSING.'",
        ]
    );

    // Wheel entry points make the manifest unnecessary
    assert!(!fetcher.was_requested(
        "https://raw.githubusercontent.com/aiidateam/aiida-diff/master/pyproject.toml"
    ));
}

#[test]
fn test_summary_matches_per_plugin_diagnostics() {
    let output = run_registry(&fetcher(), None);

    let per_plugin: usize = output
        .plugins
        .values()
        .map(|p| p.diagnostics.errors.len() + p.diagnostics.warnings.len())
        .sum();
    assert_eq!(output.summary.len(), per_plugin);
    assert_eq!(
        output
            .summary
            .iter()
            .filter(|f| f.severity == Severity::Error)
            .count(),
        1
    );
    assert_eq!(output.summary[0].entity, "aiida-broken");
}

#[test]
fn test_install_commands() {
    let output = run_registry(&fetcher(), None);
    let command = |name: &str| pip_install_command(&output.plugins[name]);

    assert_eq!(command("aiida-crystal17").as_deref(), Some("pip install --pre aiida-crystal17"));
    assert_eq!(command("aiida-core").as_deref(), Some("pip install aiida-core"));
    assert_eq!(
        command("aiida-legacy").as_deref(),
        Some("pip install git+https://gitlab.com/legacy/aiida-legacy")
    );
    assert_eq!(command("aiida-broken"), None);
}

#[test]
fn test_filtered_run_only_fetches_selected_plugins() {
    let fetcher = fetcher();
    let filter = vec!["aiida-crystal17".to_string()];

    let output = run_registry(&fetcher, Some(&filter));

    assert_eq!(output.plugins.len(), 1);
    assert_eq!(
        fetcher.requests(),
        vec!["https://raw.githubusercontent.com/aiidaplugins/aiida-crystal17/master/setup.json"]
    );
}

#[test]
fn test_output_document() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("plugins_metadata.json");
    let output = run_registry(&fetcher(), None);

    write_output(&path, &output).unwrap();

    let json: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    let diff = &json["plugins"]["aiida-diff"];
    assert_eq!(diff["aiida_version"], ">=1.1.0,<2.0.0");
    assert_eq!(diff["hosted_on"], "github.com");
    assert_eq!(diff["metadata"]["release_date"], "2024-03-01");
    assert_eq!(diff["pypi_builds"], serde_json::json!(["bdist_wheel", "sdist"]));
    assert_eq!(
        diff["entry_points"]["aiida.parsers"]["diff"],
        "aiida_diff.parsers:DiffParser"
    );
    assert_eq!(json["plugins"]["aiida-broken"]["diagnostics"]["errors"].as_array().unwrap().len(), 1);

    let reloaded: RunOutput = serde_json::from_value(json).unwrap();
    assert_eq!(reloaded, output);
}
