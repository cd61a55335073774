//! TOML configuration loading, sandboxed with `figment::Jail`.

use std::path::PathBuf;

use ckit_config::{CkitConfig, ConfigError};
use ckit_core::Severity;
use figment::{
    Figment, Jail,
    providers::{Format, Serialized, Toml},
};
use pretty_assertions::assert_eq;

#[test]
fn loads_impact_and_rules_from_toml() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
[impact]
max_depth = 3
stale_threshold = "warning"

[rules]
path = "rules/consistency.toml"
"#,
        )?;

        let config: CkitConfig = Figment::from(Serialized::defaults(CkitConfig::default()))
            .merge(Toml::file("config.toml"))
            .extract()?;

        assert_eq!(config.impact.max_depth, 3);
        assert!(!config.impact.unbounded);
        assert_eq!(config.impact.stale_threshold, Severity::Warning);
        assert_eq!(config.rules.path, Some(PathBuf::from("rules/consistency.toml")));
        Ok(())
    });
}

#[test]
fn partial_sections_keep_defaults() {
    Jail::expect_with(|jail| {
        jail.create_file("config.toml", "[impact]\nunbounded = true\n")?;

        let config: CkitConfig = Figment::from(Serialized::defaults(CkitConfig::default()))
            .merge(Toml::file("config.toml"))
            .extract()?;

        assert!(config.impact.unbounded);
        assert_eq!(config.impact.max_depth, 1);
        assert_eq!(config.impact.stale_threshold, Severity::Info);
        assert!(config.rules.path.is_none());
        Ok(())
    });
}

#[test]
fn project_config_is_picked_up() {
    Jail::expect_with(|jail| {
        let dir = jail.directory().display().to_string();
        jail.set_env("XDG_CONFIG_HOME", dir);
        jail.create_dir(".ckit")?;
        jail.create_file(".ckit/config.toml", "[impact]\nmax_depth = 2\n")?;

        let config = CkitConfig::load().expect("config loads");
        assert_eq!(config.impact.max_depth, 2);
        Ok(())
    });
}

#[test]
fn zero_depth_is_rejected() {
    Jail::expect_with(|jail| {
        let dir = jail.directory().display().to_string();
        jail.set_env("XDG_CONFIG_HOME", dir);
        jail.create_dir(".ckit")?;
        jail.create_file(".ckit/config.toml", "[impact]\nmax_depth = 0\n")?;

        let err = CkitConfig::load().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref field, .. } if field == "impact.max_depth"));
        Ok(())
    });
}

#[test]
fn unknown_severity_is_a_figment_error() {
    Jail::expect_with(|jail| {
        jail.create_file("config.toml", "[impact]\nstale_threshold = \"fatal\"\n")?;

        let figment = Figment::from(Serialized::defaults(CkitConfig::default()))
            .merge(Toml::file("config.toml"));
        assert!(matches!(
            CkitConfig::from_figment(&figment),
            Err(ConfigError::Figment(_))
        ));
        Ok(())
    });
}
