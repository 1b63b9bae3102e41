//! ASCII outline of the documentation tree.

use crate::model::NodeId;
use crate::tree::Tree;

/// Render the tree below the root, one `kind name` per line.
///
/// Example output:
/// ```text
/// index
/// ├── namespace ui
/// │   └── class ui::Button
/// └── group widgets
/// ```
pub fn outline(tree: &Tree) -> String {
    let mut output = String::from("index\n");
    let children = tree.children(tree.root());
    for (i, &child) in children.iter().enumerate() {
        render_node(&mut output, tree, child, "", i == children.len() - 1);
    }
    output
}

fn render_node(output: &mut String, tree: &Tree, id: NodeId, prefix: &str, is_last: bool) {
    let node = &tree[id];
    let branch = if is_last { "└── " } else { "├── " };
    output.push_str(prefix);
    output.push_str(branch);
    output.push_str(node.kind.as_str());
    output.push(' ');
    output.push_str(&node.name);
    output.push('\n');

    let continuation = if is_last { "    " } else { "│   " };
    let child_prefix = format!("{}{}", prefix, continuation);

    let children = tree.children(id);
    for (i, &child) in children.iter().enumerate() {
        render_node(output, tree, child, &child_prefix, i == children.len() - 1);
    }
}
