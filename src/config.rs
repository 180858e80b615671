use serde::{Deserialize, Serialize};

use crate::path::WildcardPolicy;

/// Embedded default configuration.
const DEFAULT_CONFIG: &str = include_str!("../config.default.toml");

// ── Final (merged) config types ──

#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub settings: Settings,
    #[serde(default)]
    pub commands: Commands,
    #[serde(default)]
    pub wildcard: WildcardConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Settings {
    /// Lines shown per page by `more`.
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    /// Line that terminates interactive `cat` input.
    #[serde(default = "default_cat_sentinel")]
    pub cat_sentinel: String,
    /// Split stages on `|` only outside quotes.
    /// `false` reproduces the legacy split that ignores quoting.
    #[serde(default = "default_true")]
    pub quote_aware_pipes: bool,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            cat_sentinel: default_cat_sentinel(),
            quote_aware_pipes: true,
            log_level: default_log_level(),
        }
    }
}

fn default_page_size() -> usize {
    10
}

fn default_cat_sentinel() -> String {
    "<stop>".into()
}

fn default_true() -> bool {
    true
}

fn default_log_level() -> String {
    "info".into()
}

#[derive(Debug, Deserialize, Serialize, Default)]
pub struct Commands {
    /// Command names rejected at parse time.
    #[serde(default)]
    pub disabled: Vec<String>,
}

/// Per-command wildcard policy.
/// Commands listed in `include_directories` keep directories in their
/// wildcard matches; every other command matches regular files only.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct WildcardConfig {
    #[serde(default)]
    pub include_directories: Vec<String>,
}

impl WildcardConfig {
    /// The wildcard policy for `command`.
    pub fn policy(&self, command: &str) -> WildcardPolicy {
        if self.include_directories.iter().any(|c| c == command) {
            WildcardPolicy::FilesAndDirectories
        } else {
            WildcardPolicy::FilesOnly
        }
    }
}

// ── Overlay types (user config that merges with defaults) ──

#[derive(Debug, Deserialize, Default)]
struct ConfigOverlay {
    #[serde(default)]
    settings: SettingsOverlay,
    #[serde(default)]
    commands: CommandsOverlay,
    #[serde(default)]
    wildcard: WildcardOverlay,
}

#[derive(Debug, Deserialize, Default)]
struct SettingsOverlay {
    page_size: Option<usize>,
    cat_sentinel: Option<String>,
    quote_aware_pipes: Option<bool>,
    log_level: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
struct CommandsOverlay {
    #[serde(default)]
    replace: bool,
    #[serde(default)]
    disabled: Vec<String>,
    #[serde(default)]
    remove_disabled: Vec<String>,
}

#[derive(Debug, Deserialize, Default)]
struct WildcardOverlay {
    #[serde(default)]
    replace: bool,
    #[serde(default)]
    include_directories: Vec<String>,
    #[serde(default)]
    remove_include_directories: Vec<String>,
}

// ── Merge logic ──

/// Merge a user list into a default list.
/// In replace mode: user list replaces default entirely.
/// In merge mode: remove items first, then extend with additions (deduped).
fn merge_list(base: &mut Vec<String>, add: Vec<String>, remove: &[String], replace: bool) {
    if replace {
        *base = add;
    } else {
        base.retain(|item| !remove.contains(item));
        for item in add {
            if !base.contains(&item) {
                base.push(item);
            }
        }
    }
}

impl Config {
    /// Load the default embedded configuration.
    pub fn default_config() -> Self {
        toml::from_str(DEFAULT_CONFIG).expect("embedded default config must parse")
    }

    /// Load configuration with resolution order:
    /// 1. Start with embedded defaults
    /// 2. Merge user overlay from ~/.config/fsh/config.toml (if exists)
    ///
    /// Lists extend, scalars override. `replace = true` in a section replaces
    /// its defaults entirely; `remove_<field>` lists subtract from them.
    pub fn load() -> Self {
        let mut config = Self::default_config();
        if let Some(overlay) = Self::load_overlay() {
            config.apply_overlay(overlay);
        }
        config
    }

    /// Try to load user overlay from ~/.config/fsh/config.toml.
    fn load_overlay() -> Option<ConfigOverlay> {
        let home = std::env::var_os("HOME")?;
        let path = std::path::Path::new(&home).join(".config/fsh/config.toml");
        let content = std::fs::read_to_string(path).ok()?;
        match toml::from_str(&content) {
            Ok(overlay) => Some(overlay),
            Err(e) => {
                eprintln!("fsh: config parse error: {e}");
                None
            }
        }
    }

    /// Apply an overlay on top of this config (merge semantics).
    fn apply_overlay(&mut self, overlay: ConfigOverlay) {
        let s = overlay.settings;
        if let Some(v) = s.page_size {
            // A zero page would never advance the pager.
            self.settings.page_size = v.max(1);
        }
        if let Some(v) = s.cat_sentinel {
            self.settings.cat_sentinel = v;
        }
        if let Some(v) = s.quote_aware_pipes {
            self.settings.quote_aware_pipes = v;
        }
        if let Some(v) = s.log_level {
            self.settings.log_level = v;
        }

        let c = overlay.commands;
        merge_list(
            &mut self.commands.disabled,
            c.disabled,
            &c.remove_disabled,
            c.replace,
        );

        let w = overlay.wildcard;
        merge_list(
            &mut self.wildcard.include_directories,
            w.include_directories,
            &w.remove_include_directories,
            w.replace,
        );
    }

    /// Whether `command` has been switched off by configuration.
    pub fn is_disabled(&self, command: &str) -> bool {
        self.commands.disabled.iter().any(|c| c == command)
    }

    /// Render the merged configuration as TOML.
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Apply an overlay from a TOML string. Used for testing.
    #[doc(hidden)]
    pub fn apply_overlay_str(&mut self, toml_str: &str) -> Result<(), toml::de::Error> {
        let overlay: ConfigOverlay = toml::from_str(toml_str)?;
        self.apply_overlay(overlay);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_parses() {
        let config = Config::default_config();
        assert_eq!(config.settings.page_size, 10);
        assert_eq!(config.settings.cat_sentinel, "<stop>");
        assert!(config.settings.quote_aware_pipes);
        assert!(config.commands.disabled.is_empty());
    }

    #[test]
    fn default_wildcard_policy() {
        let config = Config::default_config();
        assert_eq!(config.wildcard.policy("ls"), WildcardPolicy::FilesAndDirectories);
        assert_eq!(config.wildcard.policy("cp"), WildcardPolicy::FilesAndDirectories);
        assert_eq!(config.wildcard.policy("rm"), WildcardPolicy::FilesOnly);
        assert_eq!(config.wildcard.policy("cat"), WildcardPolicy::FilesOnly);
    }

    // ── Merge semantics ──

    #[test]
    fn overlay_scalars_override() {
        let mut config = Config::default_config();
        config
            .apply_overlay_str(
                r#"
            [settings]
            page_size = 25
            quote_aware_pipes = false
        "#,
            )
            .unwrap();
        assert_eq!(config.settings.page_size, 25);
        assert!(!config.settings.quote_aware_pipes);
        // Untouched scalars keep their defaults
        assert_eq!(config.settings.cat_sentinel, "<stop>");
    }

    #[test]
    fn overlay_zero_page_size_is_clamped() {
        let mut config = Config::default_config();
        config
            .apply_overlay_str("[settings]\npage_size = 0\n")
            .unwrap();
        assert_eq!(config.settings.page_size, 1);
    }

    #[test]
    fn overlay_disables_commands() {
        let mut config = Config::default_config();
        config
            .apply_overlay_str(
                r#"
            [commands]
            disabled = ["rm", "mv"]
        "#,
            )
            .unwrap();
        assert!(config.is_disabled("rm"));
        assert!(config.is_disabled("mv"));
        assert!(!config.is_disabled("ls"));
    }

    #[test]
    fn overlay_extends_wildcard_list() {
        let mut config = Config::default_config();
        config
            .apply_overlay_str(
                r#"
            [wildcard]
            include_directories = ["rm"]
        "#,
            )
            .unwrap();
        assert_eq!(config.wildcard.policy("rm"), WildcardPolicy::FilesAndDirectories);
        assert_eq!(config.wildcard.policy("ls"), WildcardPolicy::FilesAndDirectories);
    }

    #[test]
    fn overlay_removes_from_wildcard_list() {
        let mut config = Config::default_config();
        config
            .apply_overlay_str(
                r#"
            [wildcard]
            remove_include_directories = ["cp", "mv"]
        "#,
            )
            .unwrap();
        assert_eq!(config.wildcard.policy("cp"), WildcardPolicy::FilesOnly);
        assert_eq!(config.wildcard.policy("mv"), WildcardPolicy::FilesOnly);
        assert_eq!(config.wildcard.policy("ls"), WildcardPolicy::FilesAndDirectories);
    }

    #[test]
    fn overlay_replace_wildcard_list() {
        let mut config = Config::default_config();
        config
            .apply_overlay_str(
                r#"
            [wildcard]
            replace = true
            include_directories = ["cat"]
        "#,
            )
            .unwrap();
        assert_eq!(config.wildcard.include_directories, vec!["cat"]);
    }

    #[test]
    fn overlay_no_duplicates() {
        let mut config = Config::default_config();
        config
            .apply_overlay_str("[wildcard]\ninclude_directories = [\"ls\"]\n")
            .unwrap();
        let count = config
            .wildcard
            .include_directories
            .iter()
            .filter(|s| *s == "ls")
            .count();
        assert_eq!(count, 1);
    }

    #[test]
    fn empty_overlay_changes_nothing() {
        let original = Config::default_config();
        let mut config = Config::default_config();
        config.apply_overlay_str("").unwrap();
        assert_eq!(
            config.wildcard.include_directories,
            original.wildcard.include_directories
        );
        assert_eq!(config.settings.page_size, original.settings.page_size);
    }

    #[test]
    fn dump_round_trips() {
        let config = Config::default_config();
        let text = config.to_toml().unwrap();
        let back: Config = toml::from_str(&text).unwrap();
        assert_eq!(back.settings.page_size, config.settings.page_size);
        assert_eq!(
            back.wildcard.include_directories,
            config.wildcard.include_directories
        );
    }
}
