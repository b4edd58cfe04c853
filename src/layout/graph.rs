//! Dependency graph over anchor/stretch references
//!
//! Every element depends on the elements it anchors or stretches to. The graph is
//! ordered with a three-colour depth-first search so that targets come before their
//! dependents; a back edge means the references loop and the layout cannot be solved.

use std::collections::HashMap;

use tracing::warn;

use super::element::ElementArena;
use super::error::LayoutError;

/// Why one element depends on another
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DependencyKind {
    Anchor,
    /// Anchor target whose height the element borrows
    HeightSource,
    Stretch,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dependency {
    pub target: String,
    pub kind: DependencyKind,
}

/// A reference to an id that is not in the arena
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingReference {
    pub element: String,
    pub target: String,
    pub kind: DependencyKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum VisitState {
    Unvisited,
    Visiting,
    Visited,
}

#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    /// Element ids in arena order
    nodes: Vec<String>,
    edges: HashMap<String, Vec<Dependency>>,
    missing: Vec<MissingReference>,
}

impl DependencyGraph {
    /// Collect dependencies for every element, logging references to unknown ids
    pub fn build(arena: &ElementArena) -> Self {
        let mut graph = Self::default();

        for element in arena.iter() {
            let mut deps = vec![];

            if let Some(target) = element.options.anchor_element() {
                let kind = if element.borrows_height() {
                    DependencyKind::HeightSource
                } else {
                    DependencyKind::Anchor
                };
                deps.push(Dependency {
                    target: target.to_string(),
                    kind,
                });
            }
            for directive in element.options.stretch.directives() {
                if let Some(target) = directive.target.element_id() {
                    deps.push(Dependency {
                        target: target.to_string(),
                        kind: DependencyKind::Stretch,
                    });
                }
            }

            for dep in &deps {
                if !arena.contains(&dep.target) {
                    warn!(
                        element = %element.id,
                        target = %dep.target,
                        kind = ?dep.kind,
                        "reference to unknown element; it will never be laid out"
                    );
                    graph.missing.push(MissingReference {
                        element: element.id.clone(),
                        target: dep.target.clone(),
                        kind: dep.kind,
                    });
                }
            }

            graph.nodes.push(element.id.clone());
            graph.edges.insert(element.id.clone(), deps);
        }

        graph
    }

    pub fn dependencies_of(&self, id: &str) -> &[Dependency] {
        self.edges.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn missing_references(&self) -> &[MissingReference] {
        &self.missing
    }

    /// Order ids so every element follows the elements it depends on.
    ///
    /// Fails with [`LayoutError::CircularDependency`] listing the loop, first node
    /// repeated at the end. References to unknown ids are ignored here.
    pub fn topological_order(&self) -> Result<Vec<String>, LayoutError> {
        let mut state: HashMap<&str, VisitState> = self
            .nodes
            .iter()
            .map(|id| (id.as_str(), VisitState::Unvisited))
            .collect();
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut path: Vec<&str> = vec![];

        for id in &self.nodes {
            self.visit(id, &mut state, &mut path, &mut order)?;
        }

        Ok(order)
    }

    fn visit<'a>(
        &'a self,
        id: &'a str,
        state: &mut HashMap<&'a str, VisitState>,
        path: &mut Vec<&'a str>,
        order: &mut Vec<String>,
    ) -> Result<(), LayoutError> {
        match state.get(id) {
            None | Some(VisitState::Visited) => return Ok(()),
            Some(VisitState::Visiting) => {
                let start = path.iter().position(|p| *p == id).unwrap_or(0);
                let mut cycle: Vec<String> = path[start..].iter().map(|p| p.to_string()).collect();
                cycle.push(id.to_string());
                return Err(LayoutError::circular(cycle));
            }
            Some(VisitState::Unvisited) => {}
        }

        state.insert(id, VisitState::Visiting);
        path.push(id);

        for dep in self.dependencies_of(id) {
            self.visit(&dep.target, state, path, order)?;
        }

        path.pop();
        state.insert(id, VisitState::Visited);
        order.push(id.to_string());
        Ok(())
    }
}
