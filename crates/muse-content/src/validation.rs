use std::fmt::Display;

use muse_types::LanguageCode;

use crate::{collection::LanguageEntries, entry::EntryId, tabs::TabSelection};

/// Field of the resource form that holds language entries
pub const LANGUAGES_FIELD: &str = "languages";

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    Field(String),
    Index(usize),
}

/// Location of a field in the form, e.g. `languages[1].audio.markup`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct FieldPath(Vec<PathSegment>);

impl FieldPath {
    pub fn root() -> Self {
        FieldPath(Vec::new())
    }

    pub fn field(mut self, name: impl Into<String>) -> Self {
        self.0.push(PathSegment::Field(name.into()));
        self
    }

    pub fn index(mut self, index: usize) -> Self {
        self.0.push(PathSegment::Index(index));
        self
    }

    /// Path of a language entry at `index`
    pub fn language(index: usize) -> Self {
        FieldPath::root().field(LANGUAGES_FIELD).index(index)
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.0
    }

    pub fn starts_with(&self, prefix: &FieldPath) -> bool {
        self.0.starts_with(&prefix.0)
    }

    /// Parses dotted paths with bracketed or dotted indices
    pub fn parse(path: &str) -> Self {
        let mut segments = Vec::new();
        for part in path.split('.').filter(|p| !p.is_empty()) {
            let (name, mut indices) = match part.find('[') {
                Some(pos) => (&part[..pos], &part[pos..]),
                None => (part, ""),
            };
            if !name.is_empty() {
                match name.parse::<usize>() {
                    Ok(index) => segments.push(PathSegment::Index(index)),
                    Err(_) => segments.push(PathSegment::Field(name.to_string())),
                }
            }
            while let Some(rest) = indices.strip_prefix('[') {
                let Some(end) = rest.find(']') else {
                    segments.push(PathSegment::Field(rest.to_string()));
                    break;
                };
                let inner = &rest[..end];
                match inner.parse::<usize>() {
                    Ok(index) => segments.push(PathSegment::Index(index)),
                    Err(_) => segments.push(PathSegment::Field(inner.to_string())),
                }
                indices = &rest[end + 1..];
            }
        }
        FieldPath(segments)
    }
}

impl Display for FieldPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, segment) in self.0.iter().enumerate() {
            match segment {
                PathSegment::Field(name) if i == 0 => write!(f, "{name}")?,
                PathSegment::Field(name) => write!(f, ".{name}")?,
                PathSegment::Index(index) => write!(f, "[{index}]")?,
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub path: FieldPath,
    pub message: String,
}

/// Validation errors of a whole form, keyed by field path
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormErrors {
    errors: Vec<FieldError>,
}

impl FormErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_report(report: &garde::Report) -> Self {
        let errors = report
            .iter()
            .map(|(path, error)| FieldError {
                path: FieldPath::parse(&path.to_string()),
                message: error.message().to_string(),
            })
            .collect();
        FormErrors { errors }
    }

    pub fn push(&mut self, path: FieldPath, message: impl Into<String>) {
        self.errors.push(FieldError {
            path,
            message: message.into(),
        });
    }

    pub fn extend(&mut self, other: FormErrors) {
        self.errors.extend(other.errors);
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> + '_ {
        self.errors.iter()
    }

    /// Errors at `prefix` or nested anywhere below it
    pub fn under<'a>(&'a self, prefix: &'a FieldPath) -> impl Iterator<Item = &'a FieldError> + 'a {
        self.errors.iter().filter(move |e| e.path.starts_with(prefix))
    }

    pub fn has_errors_under(&self, prefix: &FieldPath) -> bool {
        self.under(prefix).next().is_some()
    }

    pub fn messages_at(&self, path: &FieldPath) -> Vec<&str> {
        self.errors
            .iter()
            .filter(|e| &e.path == path)
            .map(|e| e.message.as_str())
            .collect()
    }
}

/// Any validation failure nested under the entry at `index`
pub fn tab_has_error(errors: &FormErrors, index: usize) -> bool {
    errors.has_errors_under(&FieldPath::language(index))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TabIndicator {
    Flag(LanguageCode),
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tab {
    pub id: EntryId,
    pub language: LanguageCode,
    pub indicator: TabIndicator,
    pub selected: bool,
}

/// Tab strip for the current entries, errors and selection.
///
/// Computed from scratch on each call, so it always reflects the latest validation run.
pub fn tab_indicators(
    entries: &LanguageEntries,
    selection: &TabSelection,
    errors: &FormErrors,
) -> Vec<Tab> {
    entries
        .iter()
        .enumerate()
        .map(|(index, entry)| Tab {
            id: entry.id(),
            language: entry.language(),
            indicator: if tab_has_error(errors, index) {
                TabIndicator::Error
            } else {
                TabIndicator::Flag(entry.language())
            },
            selected: selection.selected() == Some(entry.id()),
        })
        .collect()
}
