//! Line-based diff
//!
//! Recursive longest-common-run divide: find the longest run of consecutive
//! equal lines shared by `old` and `new` (the first such run wins ties), keep
//! it, and diff what lies before and after it. When nothing matches, the
//! whole region becomes a single change.

use colored::Colorize;

/// One node of a diff
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiffNode<'a> {
    /// Line present in both inputs
    Same(&'a str),
    /// Lines removed from `old` and lines inserted from `new` at this point
    Change {
        removed: Vec<&'a str>,
        inserted: Vec<&'a str>,
    },
}

impl DiffNode<'_> {
    pub fn is_change(&self) -> bool {
        matches!(self, DiffNode::Change { .. })
    }
}

/// Diff two sequences of lines
pub fn diff<'a>(old: &[&'a str], new: &[&'a str]) -> Vec<DiffNode<'a>> {
    let mut nodes = Vec::new();
    diff_into(old, new, &mut nodes);
    nodes
}

fn diff_into<'a>(old: &[&'a str], new: &[&'a str], nodes: &mut Vec<DiffNode<'a>>) {
    if old.is_empty() && new.is_empty() {
        return;
    }

    let (old_start, new_start, len) = longest_common_run(old, new);

    if len == 0 {
        nodes.push(DiffNode::Change {
            removed: old.to_vec(),
            inserted: new.to_vec(),
        });
        return;
    }

    diff_into(&old[..old_start], &new[..new_start], nodes);
    nodes.extend(new[new_start..new_start + len].iter().map(|line| DiffNode::Same(*line)));
    diff_into(&old[old_start + len..], &new[new_start + len..], nodes);
}

/// Returns `(old_start, new_start, len)` of the first longest run
fn longest_common_run(old: &[&str], new: &[&str]) -> (usize, usize, usize) {
    // run lengths ending at (previous old line, new line)
    let mut previous = vec![0usize; new.len()];
    let mut current = vec![0usize; new.len()];
    let mut best = (0, 0, 0);

    for (old_index, old_line) in old.iter().enumerate() {
        for (new_index, new_line) in new.iter().enumerate() {
            current[new_index] = if old_line == new_line {
                let run = if new_index > 0 { previous[new_index - 1] } else { 0 } + 1;

                if run > best.2 {
                    best = (old_index + 1 - run, new_index + 1 - run, run);
                }

                run
            } else {
                0
            };
        }

        std::mem::swap(&mut previous, &mut current);
    }

    best
}

/// Render a diff of two multi-line strings.
///
/// Unchanged lines are prefixed with two spaces, removed lines with `- ` and
/// inserted lines with `+ `. Removed lines print before inserted lines.
pub fn render_diff(old: &str, new: &str, color: bool) -> String {
    let old_lines: Vec<&str> = old.split('\n').collect();
    let new_lines: Vec<&str> = new.split('\n').collect();

    let mut lines = Vec::new();

    for node in diff(&old_lines, &new_lines) {
        match node {
            DiffNode::Same(line) => lines.push(format!("  {}", line)),
            DiffNode::Change { removed, inserted } => {
                for line in removed {
                    let line = format!("- {}", line);
                    lines.push(if color { line.red().to_string() } else { line });
                }
                for line in inserted {
                    let line = format!("+ {}", line);
                    lines.push(if color { line.green().to_string() } else { line });
                }
            }
        }
    }

    lines.join("\n")
}
