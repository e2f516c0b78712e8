//! Namespace prefix pass over the generic element tree.
//!
//! The pass is type-agnostic: it rewrites every element name in the tree and
//! never looks at what an element means. Attributes live outside the element
//! names, so `xmlns:*` and `xsi:*` declarations stay untouched.

use crate::xml::tree::XmlElement;

/// Puts `prefix:` in front of every element name below and including `tree`.
///
/// Names that already carry the prefix are left alone, so applying the pass
/// twice is the same as applying it once. An empty prefix is a no-op.
pub fn add_prefix(mut tree: XmlElement, prefix: &str) -> XmlElement {
    if prefix.is_empty() {
        return tree;
    }

    let marker = format!("{}:", prefix);
    let mut stack = vec![&mut tree];
    while let Some(element) = stack.pop() {
        if !element.name.starts_with(&marker) {
            element.name.insert_str(0, &marker);
        }
        stack.extend(element.children.iter_mut());
    }
    tree
}

/// Removes `prefix:` from every element name that carries it.
///
/// Names with another prefix, or none, are kept verbatim so the reader can
/// report them as unknown elements.
pub fn strip_prefix(mut tree: XmlElement, prefix: &str) -> XmlElement {
    if prefix.is_empty() {
        return tree;
    }

    let marker = format!("{}:", prefix);
    let mut stack = vec![&mut tree];
    while let Some(element) = stack.pop() {
        if element.name.starts_with(&marker) {
            element.name.drain(..marker.len());
        }
        stack.extend(element.children.iter_mut());
    }
    tree
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> XmlElement {
        let mut root = XmlElement::new("environment");
        root.push_attribute("xmlns:aas", "https://admin-shell.io/aas/3/0");
        let mut section = XmlElement::new("submodels");
        let mut submodel = XmlElement::new("submodel");
        submodel.push(XmlElement::with_text("id", "urn:sm"));
        section.push(submodel);
        root.push(section);
        root
    }

    #[test]
    fn test_add_prefix_reaches_every_element() {
        let prefixed = add_prefix(sample(), "aas");
        let names: Vec<&str> = prefixed.descendants().map(|e| e.name.as_str()).collect();
        assert_eq!(
            names,
            ["aas:environment", "aas:submodels", "aas:submodel", "aas:id"]
        );
        assert_eq!(prefixed.attributes[0].0, "xmlns:aas");
    }

    #[test]
    fn test_add_prefix_is_idempotent() {
        let once = add_prefix(sample(), "aas");
        let twice = add_prefix(once.clone(), "aas");
        assert_eq!(once, twice);
    }

    #[test]
    fn test_strip_prefix_inverts_add_prefix() {
        let stripped = strip_prefix(add_prefix(sample(), "aas"), "aas");
        assert_eq!(stripped, sample());
    }

    #[test]
    fn test_strip_prefix_keeps_foreign_prefixes() {
        let mut root = XmlElement::new("aas:environment");
        root.push(XmlElement::new("other:submodels"));
        let stripped = strip_prefix(root, "aas");
        assert_eq!(stripped.name, "environment");
        assert_eq!(stripped.children[0].name, "other:submodels");
    }

    #[test]
    fn test_empty_prefix_is_noop() {
        assert_eq!(add_prefix(sample(), ""), sample());
    }
}
