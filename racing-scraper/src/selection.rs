//! Country and category selection
//!
//! Raw selections arrive as comma- or space-separated tokens from the CLI,
//! the environment, the config file, or an interactive prompt. Every source
//! goes through the same resolver:
//!
//! - explicit codes (`AUS`, `nzl`)
//! - 1-based indices into the catalog listing (`3`)
//! - `ALL` for the whole catalog
//! - empty input for the defaults
//!
//! Unknown tokens are dropped; a selection that ends up empty falls back to
//! the defaults. The walker only ever sees the resolved [`Selection`].

use racing_common::catalog::{
    CATEGORIES, COUNTRIES, DEFAULT_CATEGORIES, DEFAULT_COUNTRIES,
};
use std::io::Write;
use tracing::debug;

/// Literal token selecting every catalog entry
pub const ALL_TOKEN: &str = "ALL";

/// Resolved, validated query plan
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub countries: Vec<String>,
    pub categories: Vec<String>,
}

impl Default for Selection {
    fn default() -> Self {
        Self {
            countries: to_owned(DEFAULT_COUNTRIES),
            categories: to_owned(DEFAULT_CATEGORIES),
        }
    }
}

impl Selection {
    /// Resolve both lists from raw token strings
    pub fn resolve(countries: &str, categories: &str) -> Self {
        Self {
            countries: resolve_countries(countries),
            categories: resolve_categories(categories),
        }
    }
}

/// Resolve raw country tokens against the country catalog
pub fn resolve_countries(raw: &str) -> Vec<String> {
    let codes: Vec<&str> = COUNTRIES.iter().map(|c| c.code).collect();
    resolve_tokens(raw, &codes, DEFAULT_COUNTRIES)
}

/// Resolve raw category tokens against the category catalog
pub fn resolve_categories(raw: &str) -> Vec<String> {
    let codes: Vec<&str> = CATEGORIES.iter().map(|c| c.code).collect();
    resolve_tokens(raw, &codes, DEFAULT_CATEGORIES)
}

fn resolve_tokens(raw: &str, catalog: &[&str], defaults: &[&str]) -> Vec<String> {
    let tokens: Vec<&str> = raw
        .split(|c: char| c == ',' || c.is_whitespace())
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect();

    if tokens.iter().any(|t| t.eq_ignore_ascii_case(ALL_TOKEN)) {
        return to_owned(catalog);
    }

    let mut resolved: Vec<String> = Vec::new();
    for token in tokens {
        let code = if let Ok(index) = token.parse::<usize>() {
            index.checked_sub(1).and_then(|i| catalog.get(i)).copied()
        } else {
            catalog.iter().find(|c| c.eq_ignore_ascii_case(token)).copied()
        };

        match code {
            Some(code) if !resolved.iter().any(|r| r == code) => resolved.push(code.to_string()),
            Some(_) => {}
            None => debug!("Ignoring unknown selection token: {}", token),
        }
    }

    if resolved.is_empty() {
        to_owned(defaults)
    } else {
        resolved
    }
}

fn to_owned(codes: &[&str]) -> Vec<String> {
    codes.iter().map(|c| c.to_string()).collect()
}

/// Source of interactive answers
pub trait LineSource {
    /// Show `prompt` and return the answer; `None` when input is closed
    fn read_line(&mut self, prompt: &str) -> Option<String>;
}

/// Terminal prompts backed by rustyline
pub struct TerminalPrompt {
    editor: rustyline::DefaultEditor,
}

impl TerminalPrompt {
    pub fn new() -> racing_common::Result<Self> {
        let editor = rustyline::DefaultEditor::new()
            .map_err(|e| racing_common::Error::Config(format!("Terminal unavailable: {e}")))?;
        Ok(Self { editor })
    }
}

impl LineSource for TerminalPrompt {
    fn read_line(&mut self, prompt: &str) -> Option<String> {
        self.editor.readline(prompt).ok()
    }
}

/// Print the catalogs with their 1-based indices
pub fn print_catalog(out: &mut impl Write) -> std::io::Result<()> {
    writeln!(out, "Countries:")?;
    for (i, country) in COUNTRIES.iter().enumerate() {
        writeln!(out, "  {:>2}. {}  {}", i + 1, country.code, country.name)?;
    }
    writeln!(out, "Categories:")?;
    for (i, category) in CATEGORIES.iter().enumerate() {
        writeln!(out, "  {:>2}. {}  {}", i + 1, category.code, category.name)?;
    }
    Ok(())
}

/// Ask for countries and categories and resolve the answers
///
/// Closed input counts as an empty answer, i.e. the defaults.
pub fn prompt_selection(source: &mut impl LineSource) -> Selection {
    let countries = source
        .read_line(&format!(
            "Countries (codes or numbers, {ALL_TOKEN}, empty for {}): ",
            DEFAULT_COUNTRIES.join(",")
        ))
        .unwrap_or_default();
    let categories = source
        .read_line(&format!(
            "Categories (codes or numbers, {ALL_TOKEN}, empty for {}): ",
            DEFAULT_CATEGORIES.join(",")
        ))
        .unwrap_or_default();

    Selection::resolve(&countries, &categories)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;

    struct Scripted(VecDeque<&'static str>);

    impl LineSource for Scripted {
        fn read_line(&mut self, _prompt: &str) -> Option<String> {
            self.0.pop_front().map(str::to_string)
        }
    }

    #[test]
    fn test_empty_is_default() {
        assert_eq!(resolve_countries(""), vec!["AUS"]);
        assert_eq!(resolve_categories("  "), vec!["T", "G"]);
    }

    #[test]
    fn test_explicit_codes() {
        assert_eq!(resolve_countries("nzl, GBR"), vec!["NZL", "GBR"]);
        assert_eq!(resolve_categories("H"), vec!["H"]);
    }

    #[test]
    fn test_indices_into_sorted_catalog() {
        let third = COUNTRIES[2].code;
        assert_eq!(resolve_countries("3"), vec![third]);
        assert_eq!(resolve_categories("1 3"), vec!["T", "G"]);
    }

    #[test]
    fn test_all_token() {
        assert_eq!(resolve_countries("all").len(), COUNTRIES.len());
        assert_eq!(resolve_categories("AUS, ALL"), vec!["T", "H", "G"]);
    }

    #[test]
    fn test_invalid_tokens_dropped() {
        assert_eq!(resolve_countries("XXX, NZL, 0, 999"), vec!["NZL"]);
    }

    #[test]
    fn test_all_invalid_falls_back_to_default() {
        assert_eq!(resolve_countries("Narnia"), vec!["AUS"]);
        assert_eq!(resolve_categories("Q,0"), vec!["T", "G"]);
    }

    #[test]
    fn test_duplicates_removed_in_order() {
        assert_eq!(resolve_categories("G, g, T, 3"), vec!["G", "T"]);
    }

    #[test]
    fn test_prompt_selection() {
        let mut source = Scripted(VecDeque::from(["GBR,IRL", "T"]));
        let selection = prompt_selection(&mut source);
        assert_eq!(selection.countries, vec!["GBR", "IRL"]);
        assert_eq!(selection.categories, vec!["T"]);
    }

    #[test]
    fn test_prompt_selection_closed_input() {
        let mut source = Scripted(VecDeque::new());
        assert_eq!(prompt_selection(&mut source), Selection::default());
    }

    #[test]
    fn test_print_catalog_lists_indices() {
        let mut out = Vec::new();
        print_catalog(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains(" 1. ARE"));
        assert!(text.contains(" 3. G  Greyhound"));
    }
}
