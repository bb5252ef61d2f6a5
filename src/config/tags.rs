//! Tag dereferencing.
//!
//! Services may reference a declared tag by name or carry a tag inline. Both
//! shapes are resolved here, once, into a concrete [`Tag`].

use std::collections::HashMap;

use crate::config::schema::{Tag, TagRef, DEFAULT_TAG_COLOR};

/// Name-keyed lookup of the document's declared tags.
#[derive(Debug, Clone, Default)]
pub struct TagLookup {
    tags: HashMap<String, Tag>,
}

impl TagLookup {
    /// Build the lookup. On duplicate names the last declaration wins.
    pub fn from_declared(declared: &[Tag]) -> Self {
        let tags = declared
            .iter()
            .map(|tag| (tag.name.clone(), tag.clone()))
            .collect();
        Self { tags }
    }

    /// Resolve a single reference.
    ///
    /// Unknown names produce a tag in [`DEFAULT_TAG_COLOR`]; inline tags pass
    /// through unchanged.
    pub fn resolve(&self, reference: TagRef) -> Tag {
        match reference {
            TagRef::Inline(tag) => tag,
            TagRef::Name(name) => match self.tags.get(&name) {
                Some(tag) => tag.clone(),
                None => {
                    tracing::debug!(tag = %name, "Undeclared tag, using fallback color");
                    Tag::new(name, DEFAULT_TAG_COLOR)
                }
            },
        }
    }

    /// Resolve references, preserving their order.
    pub fn resolve_all(&self, references: Vec<TagRef>) -> Vec<Tag> {
        references.into_iter().map(|r| self.resolve(r)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup() -> TagLookup {
        TagLookup::from_declared(&[Tag::new("x", "red"), Tag::new("y", "green")])
    }

    #[test]
    fn test_declared_name_resolves() {
        assert_eq!(lookup().resolve(TagRef::Name("x".into())), Tag::new("x", "red"));
    }

    #[test]
    fn test_unknown_name_gets_fallback_color() {
        let tag = lookup().resolve(TagRef::Name("missing".into()));
        assert_eq!(tag, Tag::new("missing", DEFAULT_TAG_COLOR));
    }

    #[test]
    fn test_inline_passes_through() {
        // Inline tags are not looked up, even when the name is declared.
        let inline = Tag::new("x", "purple");
        assert_eq!(lookup().resolve(TagRef::Inline(inline.clone())), inline);
    }

    #[test]
    fn test_last_declaration_wins() {
        let lookup = TagLookup::from_declared(&[Tag::new("x", "red"), Tag::new("x", "black")]);
        assert_eq!(lookup.resolve(TagRef::Name("x".into())), Tag::new("x", "black"));
    }

    #[test]
    fn test_resolve_all_keeps_order() {
        let tags = lookup().resolve_all(vec![
            TagRef::Name("y".into()),
            TagRef::Inline(Tag::new("z", "white")),
            TagRef::Name("x".into()),
        ]);
        let names: Vec<_> = tags.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, ["y", "z", "x"]);
    }
}
