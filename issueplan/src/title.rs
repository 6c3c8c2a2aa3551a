//! Issue title construction.
//!
//! Prefix and suffix may contain date tokens: `{{Date}}` (`2025-03-01`),
//! `{{Year}}` (`2025`), `{{Month}}` (`03`) and `{{YearMonth}}` (`2025-03`).

use chrono::{Local, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::errors::TitleError;

static TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{\{\s*([A-Za-z]*)\s*\}\}").expect("title token pattern is valid"));

/// Source of "today" for template expansion.
pub trait Clock {
    fn today(&self) -> NaiveDate;
}

/// Local calendar date.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// Always returns the same date.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

/// Expands date tokens in `template`. `None` and empty templates expand to an empty string.
pub fn expand_template(template: Option<&str>, part: &'static str, today: NaiveDate) -> Result<String, TitleError> {
    let Some(template) = template.filter(|template| !template.is_empty()) else {
        return Ok(String::new());
    };

    let mut expanded = String::with_capacity(template.len());
    let mut literal_start = 0;
    for captures in TOKEN.captures_iter(template) {
        let (Some(whole), Some(name)) = (captures.get(0), captures.get(1)) else {
            continue;
        };
        push_literal(&mut expanded, &template[literal_start..whole.start()], part)?;
        let value = match name.as_str() {
            "Date" => today.format("%Y-%m-%d"),
            "Year" => today.format("%Y"),
            "Month" => today.format("%m"),
            "YearMonth" => today.format("%Y-%m"),
            other => {
                return Err(TitleError::UnknownToken {
                    part,
                    token: other.to_string(),
                });
            }
        };
        expanded.push_str(&value.to_string());
        literal_start = whole.end();
    }
    push_literal(&mut expanded, &template[literal_start..], part)?;
    Ok(expanded)
}

fn push_literal(out: &mut String, literal: &str, part: &'static str) -> Result<(), TitleError> {
    if literal.contains("{{") {
        return Err(TitleError::Unterminated { part });
    }
    out.push_str(literal);
    Ok(())
}

/// Joins `prefix`, `name` and `suffix` with single spaces.
///
/// No separator is added where the prefix already ends, or the suffix already
/// starts, with whitespace. Empty parts are skipped.
pub fn build_title(prefix: &str, name: &str, suffix: &str) -> String {
    let mut title = String::with_capacity(prefix.len() + name.len() + suffix.len() + 2);
    if !prefix.is_empty() {
        title.push_str(prefix);
        if !prefix.ends_with(char::is_whitespace) {
            title.push(' ');
        }
    }
    title.push_str(name);
    if !suffix.is_empty() {
        if !suffix.starts_with(char::is_whitespace) {
            title.push(' ');
        }
        title.push_str(suffix);
    }
    title
}

/// Expands the optional prefix and suffix and builds the final title.
pub fn render_title(
    prefix: Option<&str>,
    name: &str,
    suffix: Option<&str>,
    today: NaiveDate,
) -> Result<String, TitleError> {
    let prefix = expand_template(prefix, "title_prefix", today)?;
    let suffix = expand_template(suffix, "title_suffix", today)?;
    Ok(build_title(&prefix, name, &suffix))
}
