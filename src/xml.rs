use roxmltree::{Document, Node};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("expected root element `{expected}`, found `{found}`")]
    UnexpectedRoot {
        expected: &'static str,
        found: String,
    },
}
pub type Result<T> = std::result::Result<T, Error>;

/// Root element of `doc`, checked against `tag`.
pub fn expect_root<'a, 'input>(
    doc: &'a Document<'input>,
    tag: &'static str,
) -> Result<Node<'a, 'input>> {
    let root = doc.root_element();
    if root.has_tag_name(tag) {
        Ok(root)
    } else {
        Err(Error::UnexpectedRoot {
            expected: tag,
            found: root.tag_name().name().to_string(),
        })
    }
}

/// Direct element children of `node` named `tag`, in document order.
pub fn children_by_tag<'a, 'b>(
    node: Node<'a, 'b>,
    tag: &'static str,
) -> impl Iterator<Item = Node<'a, 'b>> {
    node.children()
        .filter(move |n| n.is_element() && n.has_tag_name(tag))
}

/// Text of the first child named `tag`, or `""` when it is missing or empty.
pub fn text_by_tag<'a>(node: Node<'a, '_>, tag: &'static str) -> &'a str {
    children_by_tag(node, tag)
        .next()
        .and_then(|n| n.text())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use roxmltree::Document;

    use super::{children_by_tag, expect_root, text_by_tag, Error};

    const XML: &str = r#"
<data>
    <freq>591000000</freq>
    <empty></empty>
    <chnl><id>1</id></chnl>
    <chnl><id>2</id></chnl>
</data>
    "#;

    #[test]
    fn root_and_text() {
        let doc = Document::parse(XML).unwrap();
        let root = expect_root(&doc, "data").unwrap();

        assert_eq!(text_by_tag(root, "freq"), "591000000");
        assert_eq!(text_by_tag(root, "empty"), "");
        assert_eq!(text_by_tag(root, "missing"), "");

        let ids = children_by_tag(root, "chnl")
            .map(|n| text_by_tag(n, "id"))
            .collect::<Vec<_>>();
        assert_eq!(ids, ["1", "2"]);
    }

    #[test]
    fn wrong_root() {
        let doc = Document::parse("<html><body/></html>").unwrap();
        let err = expect_root(&doc, "data").unwrap_err();
        assert!(matches!(err, Error::UnexpectedRoot { found, .. } if found == "html"));
    }
}
