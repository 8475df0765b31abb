use crate::{line::Line, nav_list::NavList};
use itertools::Itertools;
use logmate_parser::Category;
use std::collections::BTreeMap;

/// occurrences of each category with an independent cursor per category
///
/// categories that never occur are absent, never present with an empty list.
/// keys iterate in label order, which is the order of the control strip.
#[derive(Debug, Clone, Default)]
pub struct CategoryIndex {
    entries: BTreeMap<Category, NavList>,
}

impl CategoryIndex {
    pub fn build(lines: &[Line]) -> Self {
        let mut positions: BTreeMap<Category, Vec<usize>> = BTreeMap::new();
        for line in lines {
            if let Some(cat) = line.category {
                positions.entry(cat).or_default().push(line.index);
            }
        }

        let entries: BTreeMap<Category, NavList> = positions
            .into_iter()
            .map(|(cat, indices)| (cat, NavList::new(indices)))
            .collect();

        log::debug!(
            "Category index built: {}",
            entries
                .iter()
                .map(|(cat, list)| format!("{}={}", cat, list.len()))
                .join(", ")
        );

        Self { entries }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, cat: Category) -> bool {
        self.entries.contains_key(&cat)
    }

    /// present categories, sorted by label
    pub fn categories(&self) -> impl Iterator<Item = Category> + '_ {
        self.entries.keys().copied()
    }

    pub fn occurrences(&self, cat: Category) -> &[usize] {
        self.entries
            .get(&cat)
            .map(|list| list.positions())
            .unwrap_or(&[])
    }

    pub fn count(&self, cat: Category) -> usize {
        self.entries.get(&cat).map_or(0, |list| list.len())
    }

    /// line index under the category cursor, `None` before the first visit
    pub fn current(&self, cat: Category) -> Option<usize> {
        self.entries.get(&cat)?.current()
    }

    /// step to the next occurrence of `cat`, wrapping from last to first
    pub fn next(&mut self, cat: Category) -> Option<usize> {
        self.entries.get_mut(&cat)?.select_next_circular()
    }

    /// step to the previous occurrence of `cat`, wrapping from first to last
    pub fn previous(&mut self, cat: Category) -> Option<usize> {
        self.entries.get_mut(&cat)?.select_previous_circular()
    }

    /// e.g. `ERROR (8/99)`; the bare label when `cat` does not occur
    pub fn label(&self, cat: Category) -> String {
        match self.entries.get(&cat) {
            Some(list) if !list.is_empty() => {
                format!("{} ({}/{})", cat, list.display_position(), list.len())
            }
            _ => cat.label().to_string(),
        }
    }

    /// text of every line of `cat`, joined with newlines
    pub fn collect_text(&self, lines: &[Line], cat: Category) -> String {
        self.occurrences(cat)
            .iter()
            .filter_map(|&index| lines.get(index))
            .map(|line| line.text.as_str())
            .join("\n")
    }
}
