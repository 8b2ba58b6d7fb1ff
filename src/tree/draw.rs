use std::fmt::Write;

use bitvec::vec::BitVec;
use itertools::Itertools;

use super::{Forest, ForestLinks, KeyComparer, TreeNodeId};

impl<K, M, C: KeyComparer<K>> Forest<K, M, C> {
    /// Draws the forest as an indented tree, one line per node edge.
    ///
    /// A node below several parents is drawn under each of them; repeated subtrees are
    /// drawn once and then abbreviated with a trailing `…`. Orphans are listed at the end.
    pub fn debug_draw(&self, mut node_display: impl FnMut(&M) -> String) -> String {
        let mut output = String::new();
        let _ = writeln!(
            output,
            "Number of nodes:{} roots:{} orphans:{}",
            self.len(),
            self.n_roots(),
            self.orphans.len()
        );

        fn draw_subtree_recursive<W: Write, K, M, C: KeyComparer<K>>(
            f: &mut W,
            forest: &Forest<K, M, C>,
            node_id: TreeNodeId,
            prefix: &str,
            is_last_child: bool,
            format_node: &mut impl FnMut(&M) -> String,
            drawn: &mut BitVec,
        ) -> Result<(), std::fmt::Error> {
            let connector = if is_last_child {
                "└── "
            } else {
                "├── "
            };
            let label = format_node(&forest[node_id]);

            let children: Vec<_> = forest.iter_children(node_id).collect();
            if drawn[node_id.0] && !children.is_empty() {
                return writeln!(f, "{prefix}{connector}{label} …");
            }
            writeln!(f, "{prefix}{connector}{label}")?;
            drawn.set(node_id.0, true);

            let child_prefix = format!("{}{}", prefix, if is_last_child { "    " } else { "│   " });
            let num_children = children.len();
            for (i, child_id) in children.into_iter().enumerate() {
                draw_subtree_recursive(
                    f,
                    forest,
                    child_id,
                    &child_prefix,
                    i == num_children - 1,
                    format_node,
                    drawn,
                )?;
            }
            Ok(())
        }

        let mut drawn: BitVec = BitVec::repeat(false, self.n_nodes());

        for &root_id in &self.roots {
            let _ = writeln!(output, "{}", node_display(&self[root_id]));
            drawn.set(root_id.0, true);

            let children: Vec<_> = self.iter_children(root_id).collect();
            let num_children = children.len();
            for (i, child_id) in children.into_iter().enumerate() {
                let _ = draw_subtree_recursive(
                    &mut output,
                    self,
                    child_id,
                    "",
                    i == num_children - 1,
                    &mut node_display,
                    &mut drawn,
                );
            }
        }

        if !self.orphans.is_empty() {
            let orphans = self.orphans().map(&mut node_display).join(", ");
            let _ = writeln!(output, "orphans: {orphans}");
        }

        output
    }
}
