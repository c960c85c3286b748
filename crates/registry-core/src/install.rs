//! `pip install` command shown for each plugin.

use registry_meta::CanonicalPluginRecord;
use registry_meta::constants::PRE_RELEASE_MARKERS;

/// The command that installs the plugin, or `None` without a `pip_url`.
///
/// Direct URLs and VCS references are installed as given. Index packages
/// whose resolved version looks like a pre-release get `--pre`.
pub fn pip_install_command(record: &CanonicalPluginRecord) -> Option<String> {
    let pip_url = record.pip_url.as_deref()?;
    if pip_url.starts_with("http") || pip_url.starts_with("git") {
        return Some(format!("pip install {pip_url}"));
    }

    let pre_release = record
        .version()
        .is_some_and(|version| PRE_RELEASE_MARKERS.iter().any(|m| version.contains(m)));
    if pre_release {
        Some(format!("pip install --pre {pip_url}"))
    } else {
        Some(format!("pip install {pip_url}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use registry_meta::{PluginMetadata, PluginRegistration};
    use rstest::rstest;

    fn record(pip_url: Option<&str>, version: Option<&str>) -> CanonicalPluginRecord {
        let registration = PluginRegistration {
            pip_url: pip_url.map(str::to_string),
            ..PluginRegistration::new("https://github.com/x/aiida-x")
        };
        let mut record = CanonicalPluginRecord::from_registration("aiida-x", &registration);
        record.metadata = version.map(|v| PluginMetadata {
            version: Some(v.to_string()),
            ..Default::default()
        });
        record
    }

    #[rstest]
    #[case(Some("aiida-crystal17"), Some("0.11.0b1"), Some("pip install --pre aiida-crystal17"))]
    #[case(Some("aiida-x"), Some("2.0.0rc3"), Some("pip install --pre aiida-x"))]
    #[case(Some("aiida-x"), Some("1.0.0a2"), Some("pip install --pre aiida-x"))]
    #[case(Some("aiida-core"), Some("2.5.1"), Some("pip install aiida-core"))]
    #[case(Some("aiida-x"), None, Some("pip install aiida-x"))]
    #[case(
        Some("git+https://github.com/x/aiida-x#egg=aiida-x"),
        Some("0.1b1"),
        Some("pip install git+https://github.com/x/aiida-x#egg=aiida-x")
    )]
    #[case(
        Some("https://files.example/aiida_x-0.1b1.tar.gz"),
        Some("0.1b1"),
        Some("pip install https://files.example/aiida_x-0.1b1.tar.gz")
    )]
    #[case(None, Some("1.0"), None)]
    fn test_pip_install_command(
        #[case] pip_url: Option<&str>,
        #[case] version: Option<&str>,
        #[case] expected: Option<&str>,
    ) {
        assert_eq!(pip_install_command(&record(pip_url, version)).as_deref(), expected);
    }
}
