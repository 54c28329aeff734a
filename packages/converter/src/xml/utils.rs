//! Navigation helpers over the owned XML tree.

use super::node::XmlNode;

/// Find all child elements with the given tag name.
///
/// # Examples
/// ```
/// use normattiva_converter::xml::{find_children, parse_document};
///
/// let root = parse_document("<corpo><p>1</p><br/><p>2</p></corpo>").unwrap();
/// assert_eq!(find_children(&root, "p").count(), 2);
/// ```
pub fn find_children<'a>(node: &'a XmlNode, tag: &'a str) -> impl Iterator<Item = &'a XmlNode> {
    node.elements().filter(move |child| child.tag == tag)
}

/// Find all descendant elements with the given tag, in document order.
///
/// The starting node itself is not included. Matches nested inside other
/// matches are included, so every `<capo>` is visited even when the export
/// nests sections inside chapters.
pub fn find_descendants<'a>(node: &'a XmlNode, tag: &str) -> Vec<&'a XmlNode> {
    let mut found = Vec::new();
    collect_descendants(node, tag, None, &mut found);
    found
}

/// Find descendant elements with the given tag without entering `boundary`
/// elements.
///
/// Used to collect the articles of one chapter container without picking up
/// those of a nested container, which is visited on its own.
pub fn find_descendants_within<'a>(
    node: &'a XmlNode,
    tag: &str,
    boundary: &str,
) -> Vec<&'a XmlNode> {
    let mut found = Vec::new();
    collect_descendants(node, tag, Some(boundary), &mut found);
    found
}

fn collect_descendants<'a>(
    node: &'a XmlNode,
    tag: &str,
    boundary: Option<&str>,
    found: &mut Vec<&'a XmlNode>,
) {
    for child in node.elements() {
        if boundary == Some(child.tag.as_str()) {
            continue;
        }
        if child.tag == tag {
            found.push(child);
        }
        collect_descendants(child, tag, boundary, found);
    }
}

/// Concatenate the text runs directly inside each child element.
///
/// Text sitting directly in `node` and text nested deeper than one level are
/// ignored. This is how a chapter heading is read: its `num` and `rubrica`
/// children carry the words, while the articles below only contribute
/// whitespace.
pub fn child_element_text(node: &XmlNode) -> String {
    node.elements().map(XmlNode::own_text).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xml::parse_document;

    #[test]
    fn test_find_children() {
        let root = parse_document("<root><item>1</item><other/><item>2</item></root>").unwrap();
        let items: Vec<_> = find_children(&root, "item").collect();
        assert_eq!(items.len(), 2);
        assert_eq!(items[1].own_text(), "2");
    }

    #[test]
    fn test_find_descendants_document_order() {
        let xml = r#"<NIR>
            <capo id="1"><articolo id="1"/></capo>
            <capo id="2"><capo id="3"><articolo id="2"/></capo></capo>
        </NIR>"#;
        let root = parse_document(xml).unwrap();
        let ids: Vec<_> = find_descendants(&root, "capo")
            .iter()
            .filter_map(|c| c.attribute("id"))
            .collect();
        assert_eq!(ids, vec!["1", "2", "3"]);
    }

    #[test]
    fn test_find_descendants_within_boundary() {
        let xml = r#"<capo id="2">
            <articolo id="1"/>
            <capo id="3"><articolo id="2"/></capo>
            <blocco><articolo id="3"/></blocco>
        </capo>"#;
        let root = parse_document(xml).unwrap();
        let ids: Vec<_> = find_descendants_within(&root, "articolo", "capo")
            .iter()
            .filter_map(|a| a.attribute("id"))
            .collect();
        assert_eq!(ids, vec!["1", "3"]);
    }

    #[test]
    fn test_child_element_text() {
        let xml = "<capo id=\"1\">ignored<num>Capo I</num> \
                   <rubrica>(Principi <i>deep</i>generali)</rubrica></capo>";
        let root = parse_document(xml).unwrap();
        assert_eq!(child_element_text(&root), "Capo I(Principi generali)");
    }
}
