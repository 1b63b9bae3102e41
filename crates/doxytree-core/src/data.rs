//! Structured per-node data handed to templates

use serde_json::{Value, json};

use crate::config::Config;
use crate::model::{NodeId, Reference};
use crate::tree::Tree;

/// Short form used for parents and children.
pub fn node_summary(tree: &Tree, id: NodeId, config: &Config) -> Value {
    let node = &tree[id];
    let brief = node
        .detail
        .as_ref()
        .map(|d| d.brief.clone())
        .or_else(|| node.brief.clone())
        .unwrap_or_default();

    json!({
        "refid": node.refid(),
        "kind": node.kind.as_str(),
        "name": node.name,
        "brief": brief,
        "url": config.url_for(tree, id),
    })
}

/// Full data for one node, with its parent and children summarized.
pub fn node_data(tree: &Tree, id: NodeId, config: &Config) -> Value {
    let node = &tree[id];
    let mut data = node_summary(tree, id, config);
    let detail = node.detail.clone().unwrap_or_default();

    let children: Vec<Value> = tree
        .children(id)
        .iter()
        .map(|&c| node_summary(tree, c, config))
        .collect();
    let parent = node.parent.map(|p| node_summary(tree, p, config));

    if let Value::Object(map) = &mut data {
        map.insert("heading".into(), json!(detail.title.unwrap_or_else(|| node.name.clone())));
        map.insert("details".into(), json!(detail.details));
        map.insert(
            "location".into(),
            detail
                .location
                .map(|l| json!({ "file": l.file, "line": l.line }))
                .unwrap_or(Value::Null),
        );
        map.insert("type".into(), json!(detail.type_name.unwrap_or_default()));
        map.insert("definition".into(), json!(detail.definition.unwrap_or_default()));
        map.insert("argsstring".into(), json!(detail.argsstring.unwrap_or_default()));
        map.insert("baseClasses".into(), references(&detail.base_classes));
        map.insert("derivedClasses".into(), references(&detail.derived_classes));
        map.insert("parent".into(), parent.unwrap_or(Value::Null));
        map.insert("children".into(), Value::Array(children));
    }
    data
}

/// The whole tree from the root, every node in its full form.
pub fn index_data(tree: &Tree, config: &Config) -> Value {
    nested(tree, tree.root(), config)
}

fn nested(tree: &Tree, id: NodeId, config: &Config) -> Value {
    let mut data = node_data(tree, id, config);
    let children: Vec<Value> = tree
        .children(id)
        .iter()
        .map(|&c| nested(tree, c, config))
        .collect();
    if let Value::Object(map) = &mut data {
        map.insert("children".into(), Value::Array(children));
    }
    data
}

fn references(refs: &[Reference]) -> Value {
    Value::Array(
        refs.iter()
            .map(|r| json!({ "name": r.name, "refid": r.refid, "url": r.url }))
            .collect(),
    )
}
