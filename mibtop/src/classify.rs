//! Maps process names to semantic groups with ordered, first-match-wins regex rules.

use regex::Regex;
use tracing::debug;

use crate::error::RuleError;
use crate::rules::RuleTable;

#[derive(Debug)]
struct GroupRule {
    name: String,
    patterns: Vec<Regex>,
}

/// Compiled rule table. Classification is total: unmatched names land in the default group.
#[derive(Debug)]
pub struct Classifier {
    groups: Vec<GroupRule>,
    default_group: String,
}

impl Classifier {
    /// Patterns are unanchored partial matches unless they carry `^`/`$` themselves.
    pub fn new(table: &RuleTable) -> Result<Self, RuleError> {
        if table.default.is_empty() {
            return Err(RuleError::EmptyDefault);
        }
        let groups = table
            .groups
            .iter()
            .map(|g| {
                if g.name.is_empty() {
                    return Err(RuleError::EmptyGroupName);
                }
                let patterns = g
                    .patterns
                    .iter()
                    .map(|p| {
                        Regex::new(p).map_err(|source| RuleError::Pattern {
                            group: g.name.clone(),
                            pattern: p.clone(),
                            source,
                        })
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(GroupRule {
                    name: g.name.clone(),
                    patterns,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            groups,
            default_group: table.default.clone(),
        })
    }

    pub fn builtin() -> Self {
        Self::new(&RuleTable::builtin()).expect("built-in rule table compiles")
    }

    pub fn classify(&self, raw_name: &str) -> &str {
        let name = strip_pid_suffix(raw_name);
        for group in &self.groups {
            if group.patterns.iter().any(|re| re.is_match(name)) {
                debug!("{name} -> {}", group.name);
                return &group.name;
            }
        }
        debug!("{name} -> {} (default)", self.default_group);
        &self.default_group
    }

    /// Declared groups in priority order, then the default group.
    pub fn groups(&self) -> impl Iterator<Item = &str> {
        self.groups
            .iter()
            .map(|g| g.name.as_str())
            .chain(std::iter::once(self.default_group.as_str()))
    }

    pub fn default_group(&self) -> &str {
        &self.default_group
    }
}

/// Drop a trailing `" (<digits>)"` PID annotation; any run of whitespace may precede it.
pub fn strip_pid_suffix(name: &str) -> &str {
    let Some(body) = name.strip_suffix(')') else {
        return name;
    };
    let Some(open) = body.rfind('(') else {
        return name;
    };
    let digits = &body[open + 1..];
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return name;
    }
    let head = &body[..open];
    let trimmed = head.trim_end();
    if trimmed.len() == head.len() {
        return name;
    }
    trimmed
}

#[cfg(test)]
mod tests {
    use super::strip_pid_suffix;

    #[test]
    fn strips_only_a_trailing_pid() {
        assert_eq!(strip_pid_suffix("system_server (1234)"), "system_server");
        assert_eq!(strip_pid_suffix("a \t (7)"), "a");
        assert_eq!(strip_pid_suffix("foo (1) (2)"), "foo (1)");
        assert_eq!(strip_pid_suffix(" (42)"), "");
        assert_eq!(strip_pid_suffix("name(42)"), "name(42)");
        assert_eq!(strip_pid_suffix("name (4a)"), "name (4a)");
        assert_eq!(strip_pid_suffix("name ()"), "name ()");
        assert_eq!(strip_pid_suffix("(sd-pam) (99)"), "(sd-pam)");
    }
}
