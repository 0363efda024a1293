//! Classifier rule table: load from JSON, fall back to the built-in Android grouping.
//! Stored under XDG config dir: $XDG_CONFIG_HOME/mibtop/rules.json (fallback ~/.config/mibtop/rules.json)

use serde::{Deserialize, Serialize};
use std::{fs, io, path::Path, path::PathBuf};

use crate::error::RuleError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupEntry {
    pub name: String,
    #[serde(default)]
    pub patterns: Vec<String>,
}

/// Ordered group -> patterns table. Declaration order is priority order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleTable {
    #[serde(default)]
    pub groups: Vec<GroupEntry>,
    #[serde(default = "default_group_name")]
    pub default: String,
}

fn default_group_name() -> String {
    "unknown".into()
}

fn group(name: &str, patterns: &[&str]) -> GroupEntry {
    GroupEntry {
        name: name.into(),
        patterns: patterns.iter().map(|p| p.to_string()).collect(),
    }
}

impl RuleTable {
    pub fn builtin() -> Self {
        Self {
            groups: vec![
                group(
                    "kernel",
                    &[
                        "^k", "^irq/", "^rcu", "msm", "watchdog", "writeback", "bioset",
                        "blockd", "sched", "kgsl", "thermal", "kworker", "jbd2", "ext4",
                    ],
                ),
                group(
                    "android_system",
                    &[
                        "^system_server$",
                        "^zygote",
                        "^logd$",
                        "^servicemanager$",
                        "^hwservicemanager$",
                        "^vndservicemanager$",
                        "^surfaceflinger$",
                        "^audioserver$",
                        "^cameraserver$",
                        "^mediaserver$",
                        "^inputflinger$",
                        "^wificond$",
                        "^lmkd$",
                    ],
                ),
                group(
                    "vendor_services",
                    &[
                        r"^vendor\.",
                        "^hwcomposer$",
                        "^thermalserviced$",
                        "^power_hal$",
                        "^gatekeeperd$",
                        "adsprpcd",
                        "qseecomd",
                    ],
                ),
                group(
                    "networking",
                    &[
                        "^netd$",
                        "^dnsmasq$",
                        "^ip6tables$",
                        "^iptables$",
                        "^wpa_supplicant$",
                        "wcnss_filter",
                        "wpa_supplicant",
                    ],
                ),
                group(
                    "user_apps",
                    &[
                        "^u0_a", r"^com\.", r"^org\.", r"^eu\.", "termux", "android", "gallery",
                        "contacts", "settings", "youtube", "launcher",
                    ],
                ),
            ],
            default: default_group_name(),
        }
    }
}

impl Default for RuleTable {
    fn default() -> Self {
        Self::builtin()
    }
}

pub fn config_dir() -> PathBuf {
    if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME") {
        PathBuf::from(xdg).join("mibtop")
    } else {
        dirs_next::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("mibtop")
    }
}

pub fn rules_path() -> PathBuf {
    config_dir().join("rules.json")
}

fn read_table(path: &Path) -> Result<RuleTable, RuleError> {
    let s = fs::read_to_string(path).map_err(|source| RuleError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&s).map_err(|source| RuleError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Explicit path must exist. Otherwise the config-dir file is used if present, and the
/// built-in table if not. A present but broken file is an error, never silently replaced.
pub fn load_rules(explicit: Option<&Path>) -> Result<RuleTable, RuleError> {
    if let Some(path) = explicit {
        return read_table(path);
    }
    let path = rules_path();
    match read_table(&path) {
        Err(RuleError::Read { source, .. }) if source.kind() == io::ErrorKind::NotFound => {
            tracing::debug!("no rules at {}, using built-in table", path.display());
            Ok(RuleTable::builtin())
        }
        other => other,
    }
}
