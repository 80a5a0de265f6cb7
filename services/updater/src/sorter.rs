//! Dependency sorter seam.

use refit_sort::{sort_by_dependencies, SortError};

use crate::container::Container;

/// Orders containers so that each follows the containers it links to.
pub trait DependencySorter: Send + Sync {
    fn sort(&self, containers: Vec<Container>) -> Result<Vec<Container>, SortError>;
}

/// Sorts by declared links using [`refit_sort`].
#[derive(Debug, Default, Clone, Copy)]
pub struct LinkSorter;

impl DependencySorter for LinkSorter {
    fn sort(&self, containers: Vec<Container>) -> Result<Vec<Container>, SortError> {
        sort_by_dependencies(containers)
    }
}
