//! Context block assembly for the generation prompt.

use crate::types::Passage;

/// Render passages as numbered, source-labelled blocks.
///
/// Each passage becomes `"[i] source=<source>\n<text>"` with `i` starting at
/// 1; blocks are separated by a blank line. Order is preserved as given.
pub fn assemble(passages: &[Passage]) -> String {
    passages
        .iter()
        .enumerate()
        .map(|(i, passage)| format!("[{}] source={}\n{}", i + 1, passage.source(), passage.text))
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input() {
        assert_eq!(assemble(&[]), "");
    }

    #[test]
    fn test_numbered_blocks_in_order() {
        let passages = vec![
            Passage::new("Rust has no GC.", "rust.md"),
            Passage::without_source("Borrowing is checked at compile time."),
            Passage::new("Rust has no GC.", "rust.md"),
        ];

        assert_eq!(
            assemble(&passages),
            "[1] source=rust.md\nRust has no GC.\n\n\
             [2] source=unknown\nBorrowing is checked at compile time.\n\n\
             [3] source=rust.md\nRust has no GC."
        );
    }
}
