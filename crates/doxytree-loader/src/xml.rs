//! Small helpers over roxmltree for Doxygen documents

use doxytree_core::TextSegment;
use roxmltree::Node;

/// First child element named `name`.
pub fn child<'a, 'input>(node: Node<'a, 'input>, name: &str) -> Option<Node<'a, 'input>> {
    node.children()
        .find(|c| c.is_element() && c.tag_name().name() == name)
}

/// All child elements named `name`, in document order.
pub fn children<'a, 'input>(
    node: Node<'a, 'input>,
    name: &'static str,
) -> impl Iterator<Item = Node<'a, 'input>> {
    node.children()
        .filter(move |c| c.is_element() && c.tag_name().name() == name)
}

/// Non-empty attribute value.
pub fn attr<'a>(node: Node<'a, '_>, name: &str) -> Option<&'a str> {
    node.attribute(name).filter(|v| !v.trim().is_empty())
}

/// All text below `node` with whitespace runs collapsed.
pub fn flat_text(node: Node) -> String {
    let raw: String = node
        .descendants()
        .filter(|n| n.is_text())
        .filter_map(|n| n.text())
        .collect();
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Flattened text of the first child named `name`, if non-empty.
pub fn child_text(node: Node, name: &str) -> Option<String> {
    child(node, name)
        .map(flat_text)
        .filter(|t| !t.is_empty())
}

/// Description markup (`briefdescription`, `detaileddescription`) as segments.
pub fn description(node: Node) -> Vec<TextSegment> {
    let mut out = Vec::new();
    collect(node, &mut out);
    out
}

fn collect(node: Node, out: &mut Vec<TextSegment>) {
    for c in node.children() {
        if c.is_text() {
            if let Some(text) = c.text() {
                out.push(TextSegment::Text(text.to_string()));
            }
            continue;
        }
        if !c.is_element() {
            continue;
        }

        match c.tag_name().name() {
            "para" => {
                if out.iter().any(|s| !is_blank(s)) {
                    out.push(TextSegment::ParagraphBreak);
                }
                collect(c, out);
            }
            "ref" => match attr(c, "refid") {
                Some(refid) => out.push(TextSegment::Ref {
                    refid: refid.to_string(),
                    text: flat_text(c),
                }),
                None => out.push(TextSegment::Text(flat_text(c))),
            },
            "computeroutput" => out.push(TextSegment::Code(flat_text(c))),
            "bold" => out.push(TextSegment::Bold(description(c))),
            "emphasis" => out.push(TextSegment::Emphasis(description(c))),
            "ulink" => out.push(TextSegment::Link {
                url: c.attribute("url").unwrap_or_default().to_string(),
                text: flat_text(c),
            }),
            "linebreak" => out.push(TextSegment::LineBreak),
            _ => collect(c, out),
        }
    }
}

fn is_blank(segment: &TextSegment) -> bool {
    matches!(segment, TextSegment::Text(t) if t.trim().is_empty())
}
