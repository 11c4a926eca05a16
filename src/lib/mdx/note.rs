//! `note` directives render as highlighted blocks or inline spans.

use super::directive::{DirectiveKind, DirectiveNode, DirectiveTree, Element};

pub const NOTE_CLASS: &str = "note-block";

pub fn retag(tree: DirectiveTree) -> DirectiveTree {
    tree.map(retag_node)
}

fn retag_node(mut node: DirectiveNode) -> DirectiveNode {
    if node.name != "note" {
        return node;
    }

    let tag = match node.kind {
        DirectiveKind::Container | DirectiveKind::Leaf => "div",
        DirectiveKind::Text => "span",
    };
    node.element = Some(Element {
        tag,
        class: Some(NOTE_CLASS),
    });
    node
}
