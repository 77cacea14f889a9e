//! Mapping of categorical attribute values to numbers.
//!
//! Rules live in a line-oriented file made of sections, one per enum key (see
//! [`enum_key`](super::enum_key)). Each rule maps a rank to a regular expression; the first
//! rule, in file order, whose expression matches the whole value supplies the number:
//!
//! ```text
//! # cache health
//! [app.Cache:state]
//! 0 = OK
//! 1 = WARN.*
//! 3 = "DEGRADED"
//! ```

use crate::Result;
use camino::Utf8Path;
use ohno::{IntoAppError, bail};
use regex::Regex;
use std::collections::HashMap;
use std::fs;

const LOG_TARGET: &str = "     enums";

#[derive(Debug)]
struct Rule {
    rank: i64,
    pattern: Regex,
}

/// Rule table loaded once and consulted for every text leaf.
#[derive(Debug, Default)]
pub struct Enums {
    sections: HashMap<String, Vec<Rule>>,
}

impl Enums {
    /// An empty table that resolves nothing.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load rules from a file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read. Malformed lines are skipped with a warning.
    pub fn load(path: &Utf8Path) -> Result<Self> {
        let text = fs::read_to_string(path).into_app_err_with(|| format!("reading enum rule file '{path}'"))?;
        let enums = Self::parse(&text);
        log::info!(target: LOG_TARGET, "Loaded {} enum section(s) from '{path}'", enums.sections.len());
        Ok(enums)
    }

    /// Parse rule file text.
    #[must_use]
    pub fn parse(text: &str) -> Self {
        let mut sections: HashMap<String, Vec<Rule>> = HashMap::new();
        let mut current: Option<String> = None;

        for (index, line) in text.lines().enumerate() {
            let line_nr = index + 1;
            let line = line.trim();

            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            if let Some(id) = line.strip_prefix('[').and_then(|l| l.strip_suffix(']')) {
                if sections.insert(id.to_string(), Vec::new()).is_some() {
                    log::warn!(target: LOG_TARGET, "Line {line_nr}: section [{id}] is defined again, earlier rules are discarded");
                }
                current = Some(id.to_string());
                continue;
            }

            let Some(section_id) = &current else {
                log::debug!(target: LOG_TARGET, "Line {line_nr}: ignoring rule outside of any section");
                continue;
            };

            let rule = match parse_rule(line) {
                Ok(rule) => rule,
                Err(e) => {
                    log::warn!(target: LOG_TARGET, "Line {line_nr}: ignoring malformed rule '{line}': {e:#}");
                    continue;
                }
            };

            let rules = sections.entry(section_id.clone()).or_default();
            if let Some(existing) = rules.iter_mut().find(|r| r.rank == rule.rank) {
                log::warn!(target: LOG_TARGET, "Line {line_nr}: previous definition of {} in [{section_id}] is replaced", rule.rank);
                existing.pattern = rule.pattern;
            } else {
                rules.push(rule);
            }
        }

        Self { sections }
    }

    /// Rank of the first rule in section `key` matching all of `value`.
    ///
    /// Returns `None` when there is no such section or no rule matches.
    #[must_use]
    pub fn resolve(&self, key: &str, value: &str) -> Option<i64> {
        self.sections
            .get(key)?
            .iter()
            .find(|rule| rule.pattern.is_match(value))
            .map(|rule| rule.rank)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}

fn parse_rule(line: &str) -> Result<Rule> {
    let Some((rank, pattern)) = line.split_once('=') else {
        bail!("expected 'rank = pattern'");
    };

    let rank = rank.trim();
    let rank = rank.parse::<i64>().into_app_err_with(|| format!("rank '{rank}' is not an integer"))?;

    let pattern = unquote(pattern.trim());
    let pattern = Regex::new(&format!("^(?:{pattern})$")).into_app_err_with(|| format!("invalid pattern '{pattern}'"))?;

    Ok(Rule { rank, pattern })
}

fn unquote(s: &str) -> &str {
    s.strip_prefix('"').and_then(|s| s.strip_suffix('"')).unwrap_or(s)
}
