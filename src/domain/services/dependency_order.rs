//! Dependency ordering of modules
//!
//! Modules are activated after the modules they depend on, so that a
//! loader deciding on a module already knows which loaders won its
//! dependencies.

use std::collections::HashMap;

use crate::domain::entities::ExtensionDescriptor;
use crate::error::{LoaderError, LoaderResult};

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unvisited,
    Visiting,
    Done,
}

pub struct DependencyOrder;

impl DependencyOrder {
    /// Sort descriptors so every module comes after its known dependencies.
    ///
    /// Independent modules keep a stable order by id (ASCII
    /// case-insensitive). Dependencies on modules that are not in the list
    /// are ignored.
    pub fn sort(descriptors: &[ExtensionDescriptor]) -> LoaderResult<Vec<ExtensionDescriptor>> {
        let mut by_key: Vec<(String, usize)> = descriptors
            .iter()
            .enumerate()
            .map(|(idx, d)| (d.id.to_ascii_lowercase(), idx))
            .collect();
        by_key.sort();
        let index: HashMap<&str, usize> = by_key.iter().map(|(k, i)| (k.as_str(), *i)).collect();

        let mut marks = vec![Mark::Unvisited; descriptors.len()];
        let mut ordered = Vec::with_capacity(descriptors.len());
        let mut stack = Vec::new();

        for (_, idx) in &by_key {
            visit(*idx, descriptors, &index, &mut marks, &mut stack, &mut ordered)?;
        }

        Ok(ordered.into_iter().map(|i| descriptors[i].clone()).collect())
    }

    /// Dependencies of `descriptor` that are not part of `descriptors`
    pub fn unknown_dependencies<'a>(
        descriptor: &'a ExtensionDescriptor,
        descriptors: &[ExtensionDescriptor],
    ) -> Vec<&'a str> {
        descriptor
            .dependencies
            .iter()
            .filter(|dep| !descriptors.iter().any(|d| d.id.eq_ignore_ascii_case(dep)))
            .map(String::as_str)
            .collect()
    }
}

fn visit(
    idx: usize,
    descriptors: &[ExtensionDescriptor],
    index: &HashMap<&str, usize>,
    marks: &mut [Mark],
    stack: &mut Vec<usize>,
    ordered: &mut Vec<usize>,
) -> LoaderResult<()> {
    match marks[idx] {
        Mark::Done => return Ok(()),
        Mark::Visiting => {
            let start = stack.iter().position(|&i| i == idx).unwrap_or(0);
            let mut modules: Vec<String> = stack[start..]
                .iter()
                .map(|&i| descriptors[i].id.clone())
                .collect();
            modules.push(descriptors[idx].id.clone());
            return Err(LoaderError::DependencyCycle { modules });
        }
        Mark::Unvisited => {}
    }

    marks[idx] = Mark::Visiting;
    stack.push(idx);

    let mut deps: Vec<usize> = descriptors[idx]
        .dependencies
        .iter()
        .filter_map(|dep| index.get(dep.to_ascii_lowercase().as_str()).copied())
        .collect();
    deps.sort_by_key(|&i| descriptors[i].id.to_ascii_lowercase());

    for dep in deps {
        visit(dep, descriptors, index, marks, stack, ordered)?;
    }

    stack.pop();
    marks[idx] = Mark::Done;
    ordered.push(idx);
    Ok(())
}
