use std::fmt;

use super::{DecisionNode, TreeNode};
use crate::PlayDistribution;

impl fmt::Display for TreeNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut last_child = Vec::new();
        render_node(f, self, 0, &mut last_child)
    }
}

/// Writes the guide columns for a line at `level`.
///
/// Each ancestor level draws `|` while it still has children below, and a
/// blank once its last child is being rendered.
fn write_leader<W: fmt::Write>(w: &mut W, level: usize, last_child: &[bool]) -> fmt::Result {
    for &is_last in &last_child[..level] {
        w.write_char(if is_last { ' ' } else { '|' })?;
        w.write_char(' ')?;
    }
    Ok(())
}

fn render_node<W: fmt::Write>(
    w: &mut W,
    node: &TreeNode,
    level: usize,
    last_child: &mut Vec<bool>,
) -> fmt::Result {
    write_leader(w, level, last_child)?;
    match node {
        TreeNode::Decision(decision) => render_decision(w, decision, level, last_child),
        TreeNode::Leaf(distribution) => render_leaf(w, distribution, level, last_child),
    }
}

fn render_decision<W: fmt::Write>(
    w: &mut W,
    decision: &DecisionNode,
    level: usize,
    last_child: &mut Vec<bool>,
) -> fmt::Result {
    writeln!(w, "Split: {}", decision.attribute)?;
    last_child.push(false);
    let last_slot = decision.children.len().saturating_sub(1);
    for (category, slot) in decision.child_slots.iter().enumerate() {
        let Some(slot) = *slot else {
            continue;
        };
        let Some(child) = decision.children.get(slot) else {
            continue;
        };
        if slot == last_slot
            && let Some(flag) = last_child.last_mut()
        {
            *flag = true;
        }
        write_leader(w, level, last_child)?;
        let label = decision
            .attribute
            .category_label(category)
            .unwrap_or_default();
        writeln!(w, "Value:{label}")?;
        render_node(w, child, level + 1, last_child)?;
    }
    last_child.pop();
    Ok(())
}

fn render_leaf<W: fmt::Write>(
    w: &mut W,
    distribution: &PlayDistribution,
    level: usize,
    last_child: &[bool],
) -> fmt::Result {
    for (i, (play_type, summary)) in distribution.iter().enumerate() {
        if i > 0 {
            write_leader(w, level, last_child)?;
        }
        writeln!(w, "{play_type}: {summary}")?;
    }
    Ok(())
}
