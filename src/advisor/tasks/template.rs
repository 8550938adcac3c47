use chrono::NaiveDate;
use serde::{Serialize, Deserialize};
use thiserror::Error;

/// Per-invocation parameters used to fill the task templates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunContext {
  pub symbol: String,
  pub current_date: NaiveDate,
}

impl RunContext {
  pub fn new(symbol: &str, current_date: NaiveDate) -> Self {
    RunContext { symbol: symbol.trim().to_uppercase(), current_date }
  }

  fn lookup(&self, name: &str) -> Option<String> {
    match name {
      "symbol" => Some(self.symbol.clone()),
      "current_date" => Some(self.current_date.format("%Y-%m-%d").to_string()),
      _ => None,
    }
  }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TemplateError {
  #[error("template references unknown variable {{{name}}}")]
  MissingVariable { name: String },
}

fn is_placeholder_char(c: char) -> bool {
  c.is_ascii_alphanumeric() || c == '_'
}

/// Replaces every `{name}` token with the matching RunContext field.
///
/// Brace runs that are not a well-formed `{identifier}` token (JSON snippets,
/// markdown, stray braces) pass through untouched, which also makes resolution
/// idempotent: a fully resolved string resolves to itself.
pub fn resolve(template: &str, context: &RunContext) -> Result<String, TemplateError> {
  let mut output: String = String::with_capacity(template.len());
  let mut chars = template.chars().peekable();

  while let Some(c) = chars.next() {
    if c != '{' {
      output.push(c);
      continue;
    }

    let mut name = String::new();
    let mut closed = false;
    while let Some(&next) = chars.peek() {
      if next == '}' {
        closed = true;
        break;
      }
      if !is_placeholder_char(next) {
        break;
      }
      name.push(next);
      chars.next();
    }

    if closed && !name.is_empty() {
      chars.next(); // consume '}'
      match context.lookup(&name) {
        Some(value) => output.push_str(&value),
        None => return Err(TemplateError::MissingVariable { name }),
      }
    }
    else {
      // Not a placeholder; keep the consumed text as literal.
      output.push('{');
      output.push_str(&name);
    }
  }

  return Ok(output);
}
