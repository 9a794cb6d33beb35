//! Balanced binary-tree merge plans.
//!
//! Shards are analyzed independently, so combining their result databases
//! back into one is a pairwise merge problem. This crate emits a shell
//! script that merges N result files in a balanced binary tree, running the
//! two halves of every internal node in parallel subshells. The script
//! relies on `create_empty` and `merge` commands being defined by the
//! environment that sources it.
//!
//! This is architecturally independent of the sharder: no shared state and
//! no shared data format, only the file-naming convention connects them.

/// Generate `count` result-file names: `file0001.db`-style, zero-padded to
/// four digits, numbered from `start`.
pub fn numbered_files(prefix: &str, suffix: &str, start: usize, count: usize) -> Vec<String> {
    (start..start + count)
        .map(|n| format!("{prefix}{n:04}{suffix}"))
        .collect()
}

/// Render the full merge script for the given result files, ending with an
/// `echo` naming the database holding the final result.
pub fn render_plan(files: &[String]) -> String {
    if files.is_empty() {
        return String::new();
    }
    let mut planner = Planner::default();
    let (code, result) = planner.merge(files, "");
    format!("{code}\necho Result is in {result}\n")
}

/// Allocates temporary database names while the plan tree is built.
#[derive(Default)]
struct Planner {
    next_temp: usize,
}

impl Planner {
    /// Emit the plan for merging `dbs` and return it with the name of the
    /// database the merged result ends up in.
    ///
    /// A pair is the leaf case: a fresh numbered temporary receives both
    /// sides. Longer lists split at `len / 2` (odd lists put the extra
    /// element in the right half) and merge the two halves' results into
    /// the left one. A single file needs no work and is its own result.
    fn merge(&mut self, dbs: &[String], indent: &str) -> (String, String) {
        match dbs {
            [only] => (String::new(), only.clone()),
            [left, right] => {
                self.next_temp += 1;
                let temp = format!("{}.db", self.next_temp);
                let code = format!(
                    "  create_empty {temp}\n  merge {temp} {left}\n  merge {temp} {right}\n"
                );
                (code, temp)
            }
            _ => {
                let midpoint = dbs.len() / 2;
                let deeper = format!("{indent}  ");
                let (left_code, left_db) = self.merge(&dbs[..midpoint], &deeper);
                let (right_code, right_db) = self.merge(&dbs[midpoint..], &deeper);
                let body = format!(
                    "(\n{left_code}\n) &\npid_left=$!\n\n(\n{right_code}\n) &\npid_right=$!\n\nwait $pid_left\nwait $pid_right\nmerge {left_db} {right_db}\n"
                );
                (prefix_lines(indent, &body), left_db)
            }
        }
    }
}

/// Prefix every line of `text` with `indent`, dropping the trailing newline.
fn prefix_lines(indent: &str, text: &str) -> String {
    text.lines()
        .map(|line| format!("{indent}{line}"))
        .collect::<Vec<_>>()
        .join("\n")
}
