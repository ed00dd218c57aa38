//! Cost-based ordering of predicate trees.
//!
//! Operands of every `AND`/`OR` group are sorted so that cheap field tests run
//! before comparisons that need sequence-context lookups.

use crate::query::{NodeKind, QueryNode};

const SEQUENCE_FUNCTION_PREFIX: &str = "sequence_for";

const EQ_COST: u32 = 1;
const IN_COST: u32 = 5;
const DEFAULT_COST: u32 = 10;
const SEQUENCE_LOOKUP_COST: u32 = 100;

/// Merge nested `AND`, `OR` and `XOR` nodes into a parent of the same kind.
pub fn flatten(node: &mut QueryNode) {
    for child in &mut node.children {
        flatten(child);
    }
    if !node.kind.is_commutative() || !node.children.iter().any(|c| c.kind == node.kind) {
        return;
    }

    let children = std::mem::take(&mut node.children);
    for child in children {
        if child.kind == node.kind {
            node.children.extend(child.children);
        } else {
            node.children.push(child);
        }
    }
}

/// Estimated evaluation cost of a predicate.
pub fn node_cost(node: &QueryNode) -> u32 {
    let sequence_lookup = node
        .children
        .first()
        .and_then(QueryNode::function_name)
        .is_some_and(is_sequence_function);

    match (&node.kind, sequence_lookup) {
        (NodeKind::Eq | NodeKind::In, true) => SEQUENCE_LOOKUP_COST,
        (NodeKind::Eq, false) => EQ_COST,
        (NodeKind::In, false) => IN_COST,
        _ => DEFAULT_COST,
    }
}

fn is_sequence_function(name: &str) -> bool {
    name.get(..SEQUENCE_FUNCTION_PREFIX.len())
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case(SEQUENCE_FUNCTION_PREFIX))
}

/// Sort the operands of every `AND`/`OR` node by [`node_cost`], at every depth.
///
/// The sort is stable, so operands of equal cost keep their written order and
/// a second pass leaves the tree unchanged.
pub fn reorder(node: &mut QueryNode) {
    if matches!(node.kind, NodeKind::And | NodeKind::Or) && node.children.len() > 1 {
        node.children.sort_by_key(node_cost);
        log::trace!(
            "reordered {:?} operands by cost {:?}",
            node.kind,
            node.children.iter().map(node_cost).collect::<Vec<_>>()
        );
    }
    for child in &mut node.children {
        reorder(child);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner::Location;
    use rstest::rstest;

    fn leaf(kind: NodeKind) -> QueryNode {
        QueryNode::new(kind, Location::default())
    }

    fn node(kind: NodeKind, children: Vec<QueryNode>) -> QueryNode {
        QueryNode::with_children(kind, children, Location::default())
    }

    fn ident(name: &str) -> QueryNode {
        leaf(NodeKind::Identifier(name.into()))
    }

    fn string(text: &str) -> QueryNode {
        leaf(NodeKind::String(text.into()))
    }

    fn call(name: &str) -> QueryNode {
        node(NodeKind::Function(name.into()), vec![string("gene")])
    }

    fn eq(left: QueryNode, right: QueryNode) -> QueryNode {
        node(NodeKind::Eq, vec![left, right])
    }

    fn assert_sorted(node: &QueryNode) {
        if matches!(node.kind, NodeKind::And | NodeKind::Or) {
            for pair in node.children.windows(2) {
                assert!(node_cost(&pair[0]) <= node_cost(&pair[1]), "unsorted: {node}");
            }
        }
        node.children.iter().for_each(assert_sorted);
    }

    #[rstest]
    #[case(eq(ident("x"), string("v")), 1)]
    #[case(eq(call("Sequence_for_seqfeat"), string("v")), 100)]
    #[case(eq(call("SEQUENCE_FOR_SEQDESC"), string("v")), 100)]
    #[case(eq(call("is_present"), string("v")), 1)]
    #[case(node(NodeKind::In, vec![ident("x"), string("a")]), 5)]
    #[case(node(NodeKind::In, vec![call("sequence_for_x"), string("a")]), 100)]
    #[case(node(NodeKind::Like, vec![ident("x"), string("a%")]), 10)]
    #[case(node(NodeKind::Not, vec![eq(ident("x"), string("v"))]), 10)]
    #[case(ident("x"), 10)]
    fn test_node_cost(#[case] node: QueryNode, #[case] expected: u32) {
        assert_eq!(node_cost(&node), expected);
    }

    #[test]
    fn test_sequence_lookup_moves_last() {
        let mut tree = node(
            NodeKind::And,
            vec![eq(call("Sequence_for_seqfeat"), string("v")), eq(ident("x"), string("v"))],
        );
        reorder(&mut tree);
        assert_eq!(tree.to_string(), r#"x = "v" AND Sequence_for_seqfeat("gene") = "v""#);
    }

    #[test]
    fn test_equal_costs_keep_written_order() {
        let mut tree = node(
            NodeKind::Or,
            vec![
                node(NodeKind::Like, vec![ident("b"), string("%")]),
                eq(ident("a"), string("1")),
                node(NodeKind::Gt, vec![ident("c"), leaf(NodeKind::Int(1))]),
                eq(ident("d"), string("2")),
            ],
        );
        reorder(&mut tree);
        assert_eq!(tree.to_string(), r#"a = "1" OR d = "2" OR b LIKE "%" OR c > 1"#);
    }

    #[test]
    fn test_nested_groups_are_sorted_and_xor_is_left_alone() {
        let inner_xor = node(
            NodeKind::Xor,
            vec![node(NodeKind::In, vec![ident("y"), string("a")]), eq(ident("z"), string("b"))],
        );
        let mut tree = node(
            NodeKind::And,
            vec![
                node(
                    NodeKind::Not,
                    vec![node(
                        NodeKind::Or,
                        vec![eq(call("Sequence_for_x"), string("v")), eq(ident("x"), string("v"))],
                    )],
                ),
                inner_xor.clone(),
                eq(ident("w"), string("v")),
            ],
        );
        reorder(&mut tree);
        assert_sorted(&tree);
        assert_eq!(tree.children[0].kind, NodeKind::Eq);
        assert_eq!(tree.children[2], inner_xor);
        let or = &tree.children[1].children[0];
        assert_eq!(or.children[0].children[0], ident("x"));
    }

    #[test]
    fn test_reorder_is_idempotent() {
        let mut tree = node(
            NodeKind::And,
            vec![
                node(NodeKind::In, vec![call("Sequence_for_a"), string("v")]),
                node(NodeKind::In, vec![ident("b"), string("v")]),
                eq(ident("c"), string("v")),
            ],
        );
        reorder(&mut tree);
        let once = tree.clone();
        reorder(&mut tree);
        assert_eq!(tree, once);
    }

    #[test]
    fn test_flatten_merges_same_kind_only() {
        let mut tree = node(
            NodeKind::And,
            vec![
                node(
                    NodeKind::And,
                    vec![
                        eq(ident("a"), string("1")),
                        node(NodeKind::And, vec![eq(ident("b"), string("2"))]),
                    ],
                ),
                node(
                    NodeKind::Or,
                    vec![
                        node(NodeKind::Or, vec![eq(ident("c"), string("3")), eq(ident("d"), string("4"))]),
                        eq(ident("e"), string("5")),
                    ],
                ),
            ],
        );
        flatten(&mut tree);
        assert_eq!(tree.children.len(), 3);
        assert_eq!(tree.children[2].kind, NodeKind::Or);
        assert_eq!(tree.children[2].children.len(), 3);
        assert_eq!(
            tree.to_string(),
            r#"a = "1" AND b = "2" AND (c = "3" OR d = "4" OR e = "5")"#
        );
    }
}
