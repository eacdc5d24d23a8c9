//! Skill connectivity module.
//!
//! Provides the `SkillGraph` type, which represents the passive skill tree
//! as an undirected graph. Nodes are skill ids, edges are the connections
//! declared on each skill (plain connections and gateway connections).
//! Used to decide which skills a player may learn next and to validate
//! authored trees.

use crate::id::ResourceId;
use crate::skill::PassiveSkill;
use petgraph::graph::{NodeIndex, UnGraph};
use petgraph::visit::Bfs;
use std::collections::{HashMap, HashSet};

/// Kind of link between two skills.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Connection {
    /// Neighbouring skills in the same tree.
    Direct,
    /// A gateway pair linking two distant parts of the tree.
    Gateway,
}

/// Undirected graph of skills.
///
/// # Examples
///
/// ```rust
/// use skilltree::graph::SkillGraph;
/// use skilltree::skill::PassiveSkill;
/// use skilltree::ResourceId;
/// use std::collections::HashSet;
///
/// let id = |s: &str| ResourceId::parse(s).unwrap();
/// let texture = id("skilltree:textures/icons/void.png");
/// let mut root = PassiveSkill::new(
///     id("skilltree:root"), 24, texture.clone(), texture.clone(), texture.clone(), true,
/// );
/// let leaf = PassiveSkill::new(
///     id("skilltree:leaf"), 16, texture.clone(), texture.clone(), texture, false,
/// );
/// root.connected_skills.push(leaf.id.clone());
///
/// let graph = SkillGraph::from_skills([&root, &leaf]);
///
/// // Nothing learned yet: only starting points are available
/// assert_eq!(graph.learnable(&HashSet::new()), vec![id("skilltree:root")]);
///
/// let learned: HashSet<_> = [id("skilltree:root")].into_iter().collect();
/// assert_eq!(graph.learnable(&learned), vec![id("skilltree:leaf")]);
/// ```
pub struct SkillGraph {
    graph: UnGraph<ResourceId, Connection>,
    node_map: HashMap<ResourceId, NodeIndex>,
    starting_points: Vec<NodeIndex>,
    dangling: Vec<(ResourceId, ResourceId)>,
}

impl SkillGraph {
    /// Create a new empty graph.
    pub fn new() -> Self {
        Self {
            graph: UnGraph::new_undirected(),
            node_map: HashMap::new(),
            starting_points: Vec::new(),
            dangling: Vec::new(),
        }
    }

    /// Build the graph from a set of skills.
    ///
    /// Every skill becomes a node first, then every declared connection
    /// becomes an edge. A connection naming a skill outside the set is
    /// recorded as dangling instead; see [`dangling_connections`].
    ///
    /// A connection declared from both ends produces a single edge.
    ///
    /// [`dangling_connections`]: SkillGraph::dangling_connections
    pub fn from_skills<'a, I>(skills: I) -> Self
    where
        I: IntoIterator<Item = &'a PassiveSkill>,
    {
        let skills: Vec<&PassiveSkill> = skills.into_iter().collect();
        let mut graph = Self::new();
        for skill in &skills {
            let idx = graph.add_node(skill.id.clone());
            if skill.starting_point {
                graph.starting_points.push(idx);
            }
        }
        for skill in &skills {
            for target in &skill.connected_skills {
                graph.connect(&skill.id, target, Connection::Direct);
            }
            for target in &skill.gateways {
                graph.connect(&skill.id, target, Connection::Gateway);
            }
        }
        graph
    }

    /// Add a node to the graph if it doesn't exist.
    ///
    /// If the node already exists, returns the existing node index.
    pub fn add_node(&mut self, id: ResourceId) -> NodeIndex {
        if let Some(&idx) = self.node_map.get(&id) {
            idx
        } else {
            let idx = self.graph.add_node(id.clone());
            self.node_map.insert(id, idx);
            idx
        }
    }

    fn connect(&mut self, from: &ResourceId, to: &ResourceId, connection: Connection) {
        let (Some(&a), Some(&b)) = (self.node_map.get(from), self.node_map.get(to)) else {
            self.dangling.push((from.clone(), to.clone()));
            return;
        };
        if self.graph.find_edge(a, b).is_none() {
            self.graph.add_edge(a, b, connection);
        }
    }

    /// Check if a skill exists in the graph.
    pub fn contains(&self, id: &ResourceId) -> bool {
        self.node_map.contains_key(id)
    }

    /// Number of skills in the graph.
    pub fn len(&self) -> usize {
        self.graph.node_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    /// Connections whose target is not a known skill, as
    /// `(declaring skill, missing target)` pairs.
    pub fn dangling_connections(&self) -> &[(ResourceId, ResourceId)] {
        &self.dangling
    }

    /// Skills linked to `id`, sorted. Empty for an unknown skill.
    pub fn neighbors(&self, id: &ResourceId) -> Vec<ResourceId> {
        let Some(&idx) = self.node_map.get(id) else {
            return Vec::new();
        };
        let mut neighbors: Vec<ResourceId> = self
            .graph
            .neighbors(idx)
            .map(|n| self.graph[n].clone())
            .collect();
        neighbors.sort();
        neighbors
    }

    /// The kind of link between two skills, if they are linked.
    pub fn connection(&self, a: &ResourceId, b: &ResourceId) -> Option<Connection> {
        let a = *self.node_map.get(a)?;
        let b = *self.node_map.get(b)?;
        self.graph
            .find_edge(a, b)
            .map(|edge| self.graph[edge])
    }

    /// Skills the player may learn next, sorted.
    ///
    /// With nothing learned, these are the starting points. Otherwise they
    /// are the unlearned neighbours of learned skills. Learned ids that
    /// are not in the graph are ignored.
    pub fn learnable(&self, learned: &HashSet<ResourceId>) -> Vec<ResourceId> {
        let known: Vec<NodeIndex> = learned
            .iter()
            .filter_map(|id| self.node_map.get(id).copied())
            .collect();

        let mut result: Vec<ResourceId> = if known.is_empty() {
            self.starting_points
                .iter()
                .map(|&idx| self.graph[idx].clone())
                .collect()
        } else {
            known
                .iter()
                .flat_map(|&idx| self.graph.neighbors(idx))
                .map(|idx| &self.graph[idx])
                .filter(|id| !learned.contains(*id))
                .cloned()
                .collect::<HashSet<_>>()
                .into_iter()
                .collect()
        };
        result.sort();
        result
    }

    /// Skills that no starting point can reach, sorted.
    pub fn unreachable(&self) -> Vec<ResourceId> {
        let mut reached = HashSet::new();
        for &start in &self.starting_points {
            if reached.contains(&start) {
                continue;
            }
            let mut bfs = Bfs::new(&self.graph, start);
            while let Some(idx) = bfs.next(&self.graph) {
                reached.insert(idx);
            }
        }

        let mut unreachable: Vec<ResourceId> = self
            .graph
            .node_indices()
            .filter(|idx| !reached.contains(idx))
            .map(|idx| self.graph[idx].clone())
            .collect();
        unreachable.sort();
        unreachable
    }
}

impl Default for SkillGraph {
    fn default() -> Self {
        Self::new()
    }
}
