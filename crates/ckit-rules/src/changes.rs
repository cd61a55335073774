use std::collections::BTreeSet;

/// Which fields of a changed entity are considered changed.
///
/// Field-level diffing is done outside the engine. Without a diff every
/// field counts as changed, so `All` is the default.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ChangedFields {
    #[default]
    All,
    Only(BTreeSet<String>),
}

impl ChangedFields {
    pub fn only<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Only(fields.into_iter().map(Into::into).collect())
    }

    #[must_use]
    pub fn contains(&self, field: &str) -> bool {
        match self {
            Self::All => true,
            Self::Only(fields) => fields.contains(field),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_contains_everything() {
        assert!(ChangedFields::All.contains("title"));
        assert!(ChangedFields::default().contains("anything"));
    }

    #[test]
    fn only_contains_listed_fields() {
        let changed = ChangedFields::only(["status", "title"]);
        assert!(changed.contains("status"));
        assert!(!changed.contains("owner"));
    }
}
