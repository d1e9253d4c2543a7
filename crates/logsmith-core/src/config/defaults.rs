//! Default configuration values

/// Default configuration file name (TOML)
pub const DEFAULT_CONFIG_TOML: &str = "logsmith.toml";

/// Default configuration file name (YAML)
pub const DEFAULT_CONFIG_YAML: &str = "logsmith.yaml";

/// Get list of config file names to search for
pub fn config_file_names() -> Vec<&'static str> {
    vec![
        DEFAULT_CONFIG_TOML,
        DEFAULT_CONFIG_YAML,
        ".logsmith.toml",
        ".logsmith.yaml",
    ]
}

/// Annotated configuration with every default spelled out
pub const DEFAULT_CONFIG_TEMPLATE: &str = r#"# logsmith configuration

[changelog]
file = "CHANGELOG.md"
title = "Release"
preamble = ".changelog"
placeholder = "Security updates"
include_comments = true
include_hashes = false
date_format = "%x"
datetime_format = "%x %X"

[git]
remote = "origin"
default_branch = "main"
tag_match = "v*.*"

[links]
host = "https://github.com"

[releases]
notes_dir = "notes"
changelog = "CHANGELOG.md"
marker_tag = "published"
sign = true
push = true
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::types::Config;

    #[test]
    fn test_template_matches_defaults() {
        let parsed: Config = toml::from_str(DEFAULT_CONFIG_TEMPLATE).unwrap();
        let defaults = Config::default();
        assert_eq!(parsed.changelog.title, defaults.changelog.title);
        assert_eq!(parsed.git.tag_match, defaults.git.tag_match);
        assert_eq!(parsed.releases.marker_tag, defaults.releases.marker_tag);
    }
}
