//! Minimal CSS scanning for the `.cls { fill: ... }` rules exported art carries.
//!
//! Only single-class selectors are understood; anything else is ignored, which leaves those
//! regions with whatever inline fills they already have.

use std::{collections::HashMap, sync::LazyLock};

use regex::{Captures, Regex};

static RULE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([^{}]+)\{([^{}]*)\}").expect("valid regex"));
static CLASS_SELECTOR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*\.(-?[_A-Za-z][_A-Za-z0-9-]*)\s*$").expect("valid regex"));
static CLASS_TOKEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\.(-?[_A-Za-z][_A-Za-z0-9-]*)").expect("valid regex"));
static FILL_DECL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(^|[;{\s])(fill\s*:\s*)([^;}!]*[^;}!\s])(\s*(?:!important)?)")
        .expect("valid regex")
});

/// Class name -> declared fill, resolved in stylesheet order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ClassFills {
    fills: HashMap<String, (String, usize)>,
}

impl ClassFills {
    /// Collect fills from every `<style>` body, in document order.
    pub fn from_stylesheets<'a>(sheets: impl IntoIterator<Item = &'a str>) -> Self {
        let mut out = Self::default();
        let mut order = 0usize;
        for css in sheets {
            for rule in RULE_RE.captures_iter(css) {
                let Some(fill) = declared_fill(&rule[2]) else {
                    order += 1;
                    continue;
                };
                for selector in rule[1].split(',') {
                    if let Some(class) = CLASS_SELECTOR_RE.captures(selector) {
                        out.fills
                            .insert(class[1].to_owned(), (fill.to_owned(), order));
                    }
                }
                order += 1;
            }
        }
        out
    }

    /// Fill for a `class` attribute value. With several matching classes the rule declared
    /// last wins, as it would in the cascade.
    pub fn resolve(&self, class_attr: &str) -> Option<&str> {
        class_attr
            .split_whitespace()
            .filter_map(|c| self.fills.get(c))
            .max_by_key(|(_, order)| *order)
            .map(|(fill, _)| fill.as_str())
    }

    /// Number of classes with a declared fill.
    pub fn len(&self) -> usize {
        self.fills.len()
    }

    /// Whether no class declares a fill.
    pub fn is_empty(&self) -> bool {
        self.fills.is_empty()
    }
}

/// `fill` value from a declaration block or inline `style` attribute.
pub fn declared_fill(decls: &str) -> Option<&str> {
    FILL_DECL_RE
        .captures_iter(decls)
        .last()
        .and_then(|c| c.get(3))
        .map(|m| m.as_str().trim())
}

/// Rewrite every `fill:` value in `css` through `map`; values it returns `None` for stay as
/// written, byte for byte.
pub fn replace_fill_values(css: &str, mut map: impl FnMut(&str) -> Option<String>) -> String {
    FILL_DECL_RE
        .replace_all(css, |c: &Captures<'_>| {
            let value = &c[3];
            let replaced = map(value.trim()).unwrap_or_else(|| value.to_owned());
            format!("{}{}{}{}", &c[1], &c[2], replaced, &c[4])
        })
        .into_owned()
}

/// Inline `style` attribute with its `fill` declarations removed; `None` when nothing is left.
pub fn strip_fill_decl(style: &str) -> Option<String> {
    let kept: Vec<&str> = style
        .split(';')
        .map(str::trim)
        .filter(|d| {
            !d.is_empty()
                && !d
                    .split_once(':')
                    .is_some_and(|(k, _)| k.trim().eq_ignore_ascii_case("fill"))
        })
        .collect();
    (!kept.is_empty()).then(|| kept.join(";"))
}

/// Prefix class selectors of every rule; declaration blocks are left untouched.
pub fn scope_class_selectors(css: &str, prefix: &str) -> String {
    RULE_RE
        .replace_all(css, |c: &Captures<'_>| {
            let selectors = CLASS_TOKEN_RE.replace_all(&c[1], |t: &Captures<'_>| {
                format!(".{prefix}-{}", &t[1])
            });
            format!("{selectors}{{{}}}", &c[2])
        })
        .into_owned()
}

#[cfg(test)]
#[path = "../../tests/unit/recolor/styles.rs"]
mod tests;
