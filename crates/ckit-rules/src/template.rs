//! Issue message templates.
//!
//! Placeholders:
//!
//! | Placeholder      | Renders as                                         |
//! |------------------|----------------------------------------------------|
//! | `{source}`       | id of the changed entity                           |
//! | `{target}`       | id of the affected neighbor                        |
//! | `{relationship}` | kind of the crossed edge                           |
//! | `{field}`        | changed entity's value for the rule condition field |
//! | `{source.NAME}`  | changed entity's `NAME` field                      |
//! | `{target.NAME}`  | neighbor's `NAME` field                            |
//!
//! Missing values render as the empty string. Anything else in braces is
//! kept verbatim.

use ckit_core::{Entity, Relation};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Placeholder {
    Source,
    Target,
    Relationship,
    Field,
    SourceField(String),
    TargetField(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Placeholder(Placeholder),
}

/// Values a template is rendered against.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Bindings<'a> {
    pub changed: &'a Entity,
    pub neighbor: &'a Entity,
    pub relation: Relation,
    pub condition_field: Option<&'a str>,
}

/// A message template, parsed once when the rule set is loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    raw: String,
    segments: Vec<Segment>,
}

impl Template {
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut rest = raw;

        while let Some(open) = rest.find('{') {
            literal.push_str(&rest[..open]);
            let after = &rest[open + 1..];
            let Some(close) = after.find('}') else {
                literal.push_str(&rest[open..]);
                rest = "";
                break;
            };
            let name = &after[..close];
            match placeholder(name) {
                Some(placeholder) => {
                    if !literal.is_empty() {
                        segments.push(Segment::Literal(std::mem::take(&mut literal)));
                    }
                    segments.push(Segment::Placeholder(placeholder));
                }
                None => {
                    literal.push('{');
                    literal.push_str(name);
                    literal.push('}');
                }
            }
            rest = &after[close + 1..];
        }
        literal.push_str(rest);
        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }

        Self {
            raw: raw.to_string(),
            segments,
        }
    }

    /// The template text as authored.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub(crate) fn render(&self, bindings: &Bindings<'_>) -> String {
        let mut out = String::with_capacity(self.raw.len());
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Placeholder(placeholder) => {
                    if let Some(value) = resolve(placeholder, bindings) {
                        out.push_str(&value);
                    }
                }
            }
        }
        out
    }
}

fn placeholder(name: &str) -> Option<Placeholder> {
    match name {
        "source" => Some(Placeholder::Source),
        "target" => Some(Placeholder::Target),
        "relationship" => Some(Placeholder::Relationship),
        "field" => Some(Placeholder::Field),
        _ => {
            if let Some(field) = name.strip_prefix("source.").filter(|f| !f.is_empty()) {
                Some(Placeholder::SourceField(field.to_string()))
            } else {
                name.strip_prefix("target.")
                    .filter(|f| !f.is_empty())
                    .map(|field| Placeholder::TargetField(field.to_string()))
            }
        }
    }
}

fn resolve(placeholder: &Placeholder, bindings: &Bindings<'_>) -> Option<String> {
    match placeholder {
        Placeholder::Source => Some(bindings.changed.id.clone()),
        Placeholder::Target => Some(bindings.neighbor.id.clone()),
        Placeholder::Relationship => Some(bindings.relation.to_string()),
        Placeholder::Field => bindings
            .condition_field
            .and_then(|field| bindings.changed.field_text(field)),
        Placeholder::SourceField(field) => bindings.changed.field_text(field),
        Placeholder::TargetField(field) => bindings.neighbor.field_text(field),
    }
}
