//! Syntax highlighting adapter over `syntect`.
//!
//! The adapter never alters characters: concatenating the text of every span
//! yields the input byte for byte. Languages whose grammar is missing from the
//! bundled syntax set come back as a single uncategorized span. TypeScript has
//! no grammar of its own in the bundled set and is parsed as JavaScript.

use std::sync::LazyLock;

use log::debug;
use syntect::easy::ScopeRangeIterator;
use syntect::parsing::{ParseState, ScopeStack, SyntaxSet};
use syntect::util::LinesWithEndings;

use crate::settings::Language;

/// Language to grammar-name table. Must cover every [`Language`].
const GRAMMARS: [(Language, &str); 6] = [
    (Language::JavaScript, "JavaScript"),
    (Language::TypeScript, "JavaScript"),
    (Language::Html, "HTML"),
    (Language::Css, "CSS"),
    (Language::Python, "Python"),
    (Language::Json, "JSON"),
];

/// Scope prefix to token category, checked innermost scope first.
const SCOPE_RULES: &[(&str, TokenCategory)] = &[
    ("constant.numeric", TokenCategory::Number),
    ("constant.language", TokenCategory::Boolean),
    ("keyword.operator", TokenCategory::Operator),
    ("keyword", TokenCategory::Keyword),
    ("storage", TokenCategory::Keyword),
    ("variable.language", TokenCategory::Keyword),
    ("entity.name.function", TokenCategory::Function),
    ("variable.function", TokenCategory::Function),
    ("support.function", TokenCategory::Function),
    ("entity.name.tag", TokenCategory::Tag),
    ("entity.other.attribute-name", TokenCategory::Attribute),
    ("support.type.property-name", TokenCategory::Property),
    ("meta.property-name", TokenCategory::Property),
    ("support", TokenCategory::Builtin),
    ("entity.name", TokenCategory::Builtin),
    ("punctuation", TokenCategory::Punctuation),
];

static SHARED: LazyLock<Highlighter> = LazyLock::new(Highlighter::new);

/// Coarse classification of a highlighted span
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenCategory {
    Comment,
    String,
    Number,
    Boolean,
    Keyword,
    Function,
    Operator,
    Punctuation,
    Tag,
    Attribute,
    Property,
    Builtin,
}

impl TokenCategory {
    /// Class name used in the markup encoding
    pub fn class_name(&self) -> &'static str {
        match self {
            Self::Comment => "comment",
            Self::String => "string",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Keyword => "keyword",
            Self::Function => "function",
            Self::Operator => "operator",
            Self::Punctuation => "punctuation",
            Self::Tag => "tag",
            Self::Attribute => "attr-name",
            Self::Property => "property",
            Self::Builtin => "builtin",
        }
    }
}

/// A run of text with an optional token category
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    pub text: String,
    pub category: Option<TokenCategory>,
}

impl Span {
    pub fn plain(text: impl Into<String>) -> Self {
        Self { text: text.into(), category: None }
    }
}

/// Output of the highlighter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Highlighted {
    spans: Vec<Span>,
}

impl Highlighted {
    /// Unhighlighted text: one span, no category.
    pub fn plain(text: &str) -> Self {
        let spans = if text.is_empty() { Vec::new() } else { vec![Span::plain(text)] };
        Self { spans }
    }

    pub fn spans(&self) -> &[Span] {
        &self.spans
    }

    /// Concatenated span text; always equal to the highlighted input.
    pub fn text(&self) -> String {
        self.spans.iter().map(|s| s.text.as_str()).collect()
    }

    pub fn is_plain(&self) -> bool {
        self.spans.iter().all(|s| s.category.is_none())
    }

    /// Split into display lines on `'\n'`. Always yields `text.split('\n').count()` lines.
    pub fn lines(&self) -> Vec<Vec<Span>> {
        let mut lines: Vec<Vec<Span>> = vec![Vec::new()];
        for span in &self.spans {
            for (i, part) in span.text.split('\n').enumerate() {
                if i > 0 {
                    lines.push(Vec::new());
                }
                if !part.is_empty() {
                    if let Some(line) = lines.last_mut() {
                        line.push(Span { text: part.to_string(), category: span.category });
                    }
                }
            }
        }
        lines
    }

    /// HTML-style markup: categorized spans wrapped in `<span class="token ...">`.
    pub fn to_markup(&self) -> String {
        let mut out = String::with_capacity(self.spans.iter().map(|s| s.text.len()).sum());
        for span in &self.spans {
            match span.category {
                Some(cat) => {
                    out.push_str("<span class=\"token ");
                    out.push_str(cat.class_name());
                    out.push_str("\">");
                    escape_into(&span.text, &mut out);
                    out.push_str("</span>");
                }
                None => escape_into(&span.text, &mut out),
            }
        }
        out
    }

    fn push(&mut self, text: &str, category: Option<TokenCategory>) {
        if text.is_empty() {
            return;
        }
        if let Some(last) = self.spans.last_mut() {
            if last.category == category {
                last.text.push_str(text);
                return;
            }
        }
        self.spans.push(Span { text: text.to_string(), category });
    }
}

fn escape_into(text: &str, out: &mut String) {
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
}

/// Grammar name backing `language`.
pub fn grammar_name(language: Language) -> Option<&'static str> {
    GRAMMARS.iter().find(|(l, _)| *l == language).map(|(_, g)| *g)
}

pub struct Highlighter {
    syntax_set: SyntaxSet,
}

impl Default for Highlighter {
    fn default() -> Self {
        Self::new()
    }
}

impl Highlighter {
    pub fn new() -> Self {
        Self { syntax_set: SyntaxSet::load_defaults_newlines() }
    }

    /// Process-wide instance; loading the syntax set is not free.
    pub fn shared() -> &'static Highlighter {
        &SHARED
    }

    /// Whether a grammar for `language` is available.
    pub fn supports(&self, language: Language) -> bool {
        grammar_name(language)
            .and_then(|name| self.syntax_set.find_syntax_by_name(name))
            .is_some()
    }

    /// Highlight by raw language identifier. Unknown identifiers yield plain text.
    pub fn highlight_identifier(&self, code: &str, language: &str) -> Highlighted {
        match language.parse::<Language>() {
            Ok(lang) => self.highlight(code, lang),
            Err(_) => {
                debug!("No grammar for language '{}', rendering plain text", language);
                Highlighted::plain(code)
            }
        }
    }

    pub fn highlight(&self, code: &str, language: Language) -> Highlighted {
        let syntax = match grammar_name(language).and_then(|n| self.syntax_set.find_syntax_by_name(n)) {
            Some(s) => s,
            None => {
                debug!("Grammar for '{}' unavailable, rendering plain text", language);
                return Highlighted::plain(code);
            }
        };

        let mut out = Highlighted { spans: Vec::new() };
        let mut parse_state = ParseState::new(syntax);
        let mut stack = ScopeStack::new();

        for line in LinesWithEndings::from(code) {
            let ops = match parse_state.parse_line(line, &self.syntax_set) {
                Ok(ops) => ops,
                Err(e) => {
                    debug!("Parse error, line left plain: {}", e);
                    out.push(line, None);
                    continue;
                }
            };
            for (range, op) in ScopeRangeIterator::new(&ops, line) {
                if stack.apply(op).is_err() {
                    stack = ScopeStack::new();
                }
                if range.is_empty() {
                    continue;
                }
                out.push(&line[range], classify(&stack));
            }
        }
        out
    }
}

fn classify(stack: &ScopeStack) -> Option<TokenCategory> {
    let scopes: Vec<String> = stack.as_slice().iter().map(|s| s.build_string()).collect();

    // Whole strings and comments, delimiters included.
    for scope in scopes.iter().rev() {
        if matches_prefix(scope, "comment") {
            return Some(TokenCategory::Comment);
        }
        if matches_prefix(scope, "string") {
            return Some(TokenCategory::String);
        }
    }

    for scope in scopes.iter().rev() {
        if let Some((_, cat)) = SCOPE_RULES.iter().find(|(p, _)| matches_prefix(scope, p)) {
            return Some(*cat);
        }
    }
    None
}

fn matches_prefix(scope: &str, prefix: &str) -> bool {
    scope == prefix || (scope.starts_with(prefix) && scope[prefix.len()..].starts_with('.'))
}
