//! Audio script markup.
//!
//! Scripts are plain text with a small allow list of inline control tags:
//!
//! - pause markers: `<break/>`, `<break time="750ms"/>`
//! - language switch spans: `<lang xml:lang="en-GB">...</lang>`
//!
//! Recognized tags do not count against the visible character budget. Anything else
//! that looks like a tag is treated as ordinary text, so unknown tags are never
//! silently dropped from the count.

use muse_types::LanguageCode;

const PAUSE_TAG: &str = "break";
const LANG_TAG: &str = "lang";
const LANG_ATTR: &str = "xml:lang";
const PAUSE_ATTRS: &[&str] = &["time", "strength"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkupToken<'a> {
    Text(&'a str),
    Pause(&'a str),
    LangOpen {
        raw: &'a str,
        language: Option<LanguageCode>,
    },
    LangClose(&'a str),
    /// Tag-like text outside the allow list, counted as text
    Unknown(&'a str),
}

impl<'a> MarkupToken<'a> {
    pub fn is_control(&self) -> bool {
        matches!(
            self,
            MarkupToken::Pause(_) | MarkupToken::LangOpen { .. } | MarkupToken::LangClose(_)
        )
    }

    /// Source text of the token, borrowed from the markup
    pub fn as_str(&self) -> &'a str {
        match self {
            MarkupToken::Text(s)
            | MarkupToken::Pause(s)
            | MarkupToken::LangClose(s)
            | MarkupToken::Unknown(s) => s,
            MarkupToken::LangOpen { raw, .. } => raw,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MarkupError {
    #[error("Unsupported language in language switch: {0}")]
    UnknownLanguage(String),
    #[error("Language switch spans cannot be nested")]
    NestedLanguage,
    #[error("Closing language tag without opening one")]
    UnexpectedClose,
    #[error("Language switch span is not closed")]
    Unclosed,
}

/// Iterator over markup tokens
pub struct Tokenizer<'a> {
    rest: &'a str,
}

pub fn tokenize(markup: &str) -> Tokenizer<'_> {
    Tokenizer { rest: markup }
}

impl<'a> Iterator for Tokenizer<'a> {
    type Item = MarkupToken<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.rest.is_empty() {
            return None;
        }
        let rest = self.rest;
        match rest.find('<') {
            Some(0) => {
                let end = match rest[1..].find(['<', '>']) {
                    Some(pos) if rest.as_bytes()[pos + 1] == b'>' => pos + 2,
                    // no closing bracket before the next tag start
                    Some(pos) => {
                        self.rest = &rest[pos + 1..];
                        return Some(MarkupToken::Text(&rest[..pos + 1]));
                    }
                    None => {
                        self.rest = "";
                        return Some(MarkupToken::Text(rest));
                    }
                };
                let (tag, tail) = rest.split_at(end);
                self.rest = tail;
                Some(classify_tag(tag))
            }
            Some(pos) => {
                let (text, tail) = rest.split_at(pos);
                self.rest = tail;
                Some(MarkupToken::Text(text))
            }
            None => {
                self.rest = "";
                Some(MarkupToken::Text(rest))
            }
        }
    }
}

fn classify_tag(tag: &str) -> MarkupToken<'_> {
    let inner = tag[1..tag.len() - 1].trim();
    if let Some(name) = inner.strip_prefix('/') {
        return if name.trim() == LANG_TAG {
            MarkupToken::LangClose(tag)
        } else {
            MarkupToken::Unknown(tag)
        };
    }

    let (inner, self_closing) = match inner.strip_suffix('/') {
        Some(inner) => (inner.trim_end(), true),
        None => (inner, false),
    };
    let (name, attrs) = match inner.split_once(char::is_whitespace) {
        Some((name, attrs)) => (name, attrs),
        None => (inner, ""),
    };
    let Some(attrs) = parse_attributes(attrs) else {
        return MarkupToken::Unknown(tag);
    };

    match name {
        PAUSE_TAG if self_closing && attrs.iter().all(|(k, _)| PAUSE_ATTRS.contains(k)) => {
            MarkupToken::Pause(tag)
        }
        LANG_TAG if !self_closing && attrs.len() == 1 && attrs[0].0 == LANG_ATTR => {
            MarkupToken::LangOpen {
                raw: tag,
                language: attrs[0].1.parse().ok(),
            }
        }
        _ => MarkupToken::Unknown(tag),
    }
}

/// Parses `key="value" key2='value'` lists, `None` when malformed
fn parse_attributes(mut s: &str) -> Option<Vec<(&str, &str)>> {
    let mut attrs = Vec::new();
    loop {
        s = s.trim_start();
        if s.is_empty() {
            return Some(attrs);
        }
        let (key, rest) = s.split_once('=')?;
        let key = key.trim();
        if key.is_empty() || key.contains(char::is_whitespace) {
            return None;
        }
        let rest = rest.trim_start();
        let quote = rest.chars().next().filter(|c| *c == '"' || *c == '\'')?;
        let rest = &rest[1..];
        let end = rest.find(quote)?;
        attrs.push((key, &rest[..end]));
        s = &rest[end + 1..];
    }
}

/// Number of characters a listener will hear, control tags excluded
pub fn visible_len(markup: &str) -> usize {
    tokenize(markup)
        .filter(|t| !t.is_control())
        .map(|t| t.as_str().chars().count())
        .sum()
}

/// Checks that language switch spans are well formed
pub fn check_markup(markup: &str) -> Result<(), MarkupError> {
    let mut open = false;
    for token in tokenize(markup) {
        match token {
            MarkupToken::LangOpen { raw, language } => {
                if open {
                    return Err(MarkupError::NestedLanguage);
                }
                if language.is_none() {
                    return Err(MarkupError::UnknownLanguage(raw.to_string()));
                }
                open = true;
            }
            MarkupToken::LangClose(_) => {
                if !open {
                    return Err(MarkupError::UnexpectedClose);
                }
                open = false;
            }
            _ => {}
        }
    }
    if open {
        Err(MarkupError::Unclosed)
    } else {
        Ok(())
    }
}

/// Escapes text for the editing surface
pub fn escape_for_display(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            c => escaped.push(c),
        }
    }
    escaped
}

/// Reverses [`escape_for_display`], text leaves the editing surface this way
pub fn unescape_display(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(pos) = rest.find('&') {
        result.push_str(&rest[..pos]);
        rest = &rest[pos..];
        let (replacement, consumed) = if rest.starts_with("&lt;") {
            ('<', 4)
        } else if rest.starts_with("&gt;") {
            ('>', 4)
        } else if rest.starts_with("&amp;") {
            ('&', 5)
        } else {
            ('&', 1)
        };
        result.push(replacement);
        rest = &rest[consumed..];
    }
    result.push_str(rest);
    result
}
