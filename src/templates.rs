use std::path::Path;

use anyhow::Context;
use lazy_static::lazy_static;
use regex::{Captures, Regex};

pub async fn read_template(path: &Path) -> anyhow::Result<String> {
    tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("read template {}", path.display()))
}

fn escape_html(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Replaces `{{ name }}` placeholders with escaped values. Unknown names stay as written.
pub fn fill_template(raw: &str, vars: &[(&str, &str)]) -> String {
    lazy_static! {
        static ref PLACEHOLDER_RE: Regex = Regex::new(r"\{\{\s*([A-Za-z0-9_]+)\s*\}\}").unwrap();
    }
    PLACEHOLDER_RE
        .replace_all(raw, |caps: &Captures| {
            match vars.iter().find(|(name, _)| *name == &caps[1]) {
                Some((_, value)) => escape_html(value),
                None => caps[0].to_string(),
            }
        })
        .into_owned()
}
