//! Dependency ordering primitives.
//!
//! Containers declare links to other containers by name. Before anything is
//! stopped or started, the set has to be put in an order where every
//! container comes after the containers it links to:
//!
//! - **Restart order** is the sorted order.
//! - **Stop order** is the exact reverse.
//!
//! # Invariants
//!
//! - The output is a permutation of the input
//! - Every item appears after all in-set items it links to
//! - Items with no ordering constraint keep their input order
//! - Links to names outside the set are ignored

use std::collections::HashMap;

use thiserror::Error;

/// Sorting errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SortError {
    /// The link graph has a cycle, so no safe order exists.
    #[error("circular reference detected involving {name}")]
    Cycle { name: String },
}

/// Something that has a name and links to other things by name.
pub trait Dependent {
    /// Unique name of this item.
    fn name(&self) -> &str;

    /// Names of the items this one depends on.
    fn links(&self) -> &[String];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unvisited,
    Visiting,
    Done,
}

/// Sort items so that every item follows its dependencies.
///
/// Depth-first, visiting roots in input order. When two items share a name,
/// links resolve to the first one.
pub fn sort_by_dependencies<T: Dependent>(items: Vec<T>) -> Result<Vec<T>, SortError> {
    let order = {
        let mut index: HashMap<&str, usize> = HashMap::with_capacity(items.len());
        for (i, item) in items.iter().enumerate() {
            index.entry(item.name()).or_insert(i);
        }

        let mut marks = vec![Mark::Unvisited; items.len()];
        let mut order = Vec::with_capacity(items.len());
        for i in 0..items.len() {
            visit(i, &items, &index, &mut marks, &mut order)?;
        }
        order
    };

    let mut slots: Vec<Option<T>> = items.into_iter().map(Some).collect();
    Ok(order.into_iter().filter_map(|i| slots[i].take()).collect())
}

fn visit<T: Dependent>(
    i: usize,
    items: &[T],
    index: &HashMap<&str, usize>,
    marks: &mut [Mark],
    order: &mut Vec<usize>,
) -> Result<(), SortError> {
    match marks[i] {
        Mark::Done => return Ok(()),
        Mark::Visiting => {
            return Err(SortError::Cycle {
                name: items[i].name().to_string(),
            })
        }
        Mark::Unvisited => {}
    }

    marks[i] = Mark::Visiting;

    for link in items[i].links() {
        if let Some(&dep) = index.get(link.as_str()) {
            visit(dep, items, index, marks, order)?;
        }
    }

    marks[i] = Mark::Done;
    order.push(i);

    Ok(())
}
