//! Placement graph: props placed relative to other props.
//!
//! Nodes are evaluated in topological order so an anchor is always placed
//! before anything that hangs off it. A node whose anchor could not be placed
//! is skipped along with its whole subtree; unrelated nodes still go ahead.

use std::collections::VecDeque;

use b612_surface::{
    EntityId, HostPlacement, PlacementSpec, Pose, Sphere, SurfaceError, place, place_ahead_of,
};
use rustc_hash::{FxHashMap, FxHashSet};
use tracing::{debug, warn};

use crate::{EntityRegistry, SceneError};

/// What a node is positioned relative to.
#[derive(Clone, Debug, PartialEq)]
pub enum AnchorRef {
    Agent,
    Entity(EntityId),
}

#[derive(Clone, Debug, PartialEq)]
pub enum Placement {
    /// Offset in the anchor's local frame, pinned to the surface.
    Relative { anchor: AnchorRef, spec: PlacementSpec },
    /// Standing ahead of the anchor, turned to face it.
    AheadOf { anchor: AnchorRef, host: HostPlacement },
}

impl Placement {
    pub fn anchor(&self) -> &AnchorRef {
        match self {
            Self::Relative { anchor, .. } | Self::AheadOf { anchor, .. } => anchor,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct PlacementNode {
    pub id: EntityId,
    pub placement: Placement,
}

/// Outcome of one evaluation pass.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PlacementReport {
    pub placed: Vec<EntityId>,
    pub skipped: Vec<(EntityId, SurfaceError)>,
}

impl PlacementReport {
    pub fn is_complete(&self) -> bool {
        self.skipped.is_empty()
    }
}

/// A validated, acyclic set of placement nodes.
#[derive(Clone, Debug, Default)]
pub struct PlacementGraph {
    nodes: Vec<PlacementNode>,
    /// Node indices, anchors before dependents.
    order: Vec<usize>,
    index: FxHashMap<EntityId, usize>,
    dependents: Vec<Vec<usize>>,
}

impl PlacementGraph {
    /// Validate `nodes` and sort them anchor-first.
    ///
    /// # Errors
    ///
    /// - [`SceneError::DuplicateNode`] if an id appears twice.
    /// - [`SceneError::UnknownAnchor`] if an entity anchor is not a node.
    /// - [`SceneError::PlacementCycle`] listing the nodes on a cycle.
    pub fn build(nodes: Vec<PlacementNode>) -> Result<Self, SceneError> {
        let mut index = FxHashMap::default();
        for (i, node) in nodes.iter().enumerate() {
            if index.insert(node.id.clone(), i).is_some() {
                return Err(SceneError::DuplicateNode(node.id.clone()));
            }
        }

        let mut dependents = vec![Vec::new(); nodes.len()];
        let mut in_degree = vec![0usize; nodes.len()];
        for (i, node) in nodes.iter().enumerate() {
            if let AnchorRef::Entity(anchor) = node.placement.anchor() {
                let &a = index.get(anchor).ok_or_else(|| SceneError::UnknownAnchor {
                    node: node.id.clone(),
                    anchor: anchor.clone(),
                })?;
                dependents[a].push(i);
                in_degree[i] += 1;
            }
        }

        // Kahn's algorithm; ties keep declaration order.
        let mut queue: VecDeque<usize> = (0..nodes.len()).filter(|&i| in_degree[i] == 0).collect();
        let mut order = Vec::with_capacity(nodes.len());
        while let Some(i) = queue.pop_front() {
            order.push(i);
            for &d in &dependents[i] {
                in_degree[d] -= 1;
                if in_degree[d] == 0 {
                    queue.push_back(d);
                }
            }
        }

        if order.len() != nodes.len() {
            let cycle = (0..nodes.len())
                .filter(|&i| in_degree[i] > 0)
                .map(|i| nodes[i].id.clone())
                .collect();
            return Err(SceneError::PlacementCycle(cycle));
        }

        Ok(Self {
            nodes,
            order,
            index,
            dependents,
        })
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Node ids, anchors first.
    pub fn ordered_ids(&self) -> impl Iterator<Item = &EntityId> {
        self.order.iter().map(|&i| &self.nodes[i].id)
    }

    pub fn contains(&self, id: &EntityId) -> bool {
        self.index.contains_key(id)
    }

    /// Place every node.
    pub fn evaluate(
        &self,
        registry: &mut EntityRegistry,
        sphere: &Sphere,
        agent: &Pose,
    ) -> PlacementReport {
        self.evaluate_subset(self.order.iter().copied(), registry, sphere, agent)
    }

    /// Place only the nodes `include` accepts, still anchor-first. Excluded
    /// anchors keep their current pose and are used as they are.
    pub fn evaluate_where(
        &self,
        registry: &mut EntityRegistry,
        sphere: &Sphere,
        agent: &Pose,
        include: impl Fn(&EntityId) -> bool,
    ) -> PlacementReport {
        let subset = self
            .order
            .iter()
            .copied()
            .filter(|&i| include(&self.nodes[i].id));
        self.evaluate_subset(subset, registry, sphere, agent)
    }

    /// Re-place everything that depends (directly or not) on `moved`, but
    /// not `moved` itself.
    pub fn reevaluate_from(
        &self,
        moved: &EntityId,
        registry: &mut EntityRegistry,
        sphere: &Sphere,
        agent: &Pose,
    ) -> PlacementReport {
        let Some(&root) = self.index.get(moved) else {
            return PlacementReport::default();
        };
        let mut affected = FxHashSet::default();
        let mut stack = self.dependents[root].clone();
        while let Some(i) = stack.pop() {
            if affected.insert(i) {
                stack.extend_from_slice(&self.dependents[i]);
            }
        }
        let subset = self.order.iter().copied().filter(|i| affected.contains(i));
        self.evaluate_subset(subset, registry, sphere, agent)
    }

    fn evaluate_subset(
        &self,
        subset: impl Iterator<Item = usize>,
        registry: &mut EntityRegistry,
        sphere: &Sphere,
        agent: &Pose,
    ) -> PlacementReport {
        let mut report = PlacementReport::default();
        let mut failed: FxHashSet<&EntityId> = FxHashSet::default();

        for i in subset {
            let node = &self.nodes[i];
            match self.place_node(node, &failed, registry, sphere, agent) {
                Ok(()) => {
                    debug!(id = %node.id, "placed");
                    report.placed.push(node.id.clone());
                }
                Err(err) => {
                    warn!(id = %node.id, %err, "placement skipped");
                    failed.insert(&node.id);
                    report.skipped.push((node.id.clone(), err));
                }
            }
        }
        report
    }

    fn place_node(
        &self,
        node: &PlacementNode,
        failed: &FxHashSet<&EntityId>,
        registry: &mut EntityRegistry,
        sphere: &Sphere,
        agent: &Pose,
    ) -> Result<(), SurfaceError> {
        let anchor = match node.placement.anchor() {
            AnchorRef::Agent => *agent,
            AnchorRef::Entity(id) if failed.contains(id) => {
                return Err(SurfaceError::NotReady(id.clone()));
            }
            AnchorRef::Entity(id) => registry.pose_ready(id)?,
        };
        let mut pose = registry.pose_ready(&node.id)?;
        match &node.placement {
            Placement::Relative { spec, .. } => place(&mut pose, &anchor, sphere, spec)?,
            Placement::AheadOf { host, .. } => place_ahead_of(&mut pose, &anchor, sphere, host)?,
        }
        registry.set_pose(&node.id, pose)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::AssetGroup;
    use glam::{DQuat, DVec3};

    fn relative(id: &str, anchor: AnchorRef, offset: DVec3) -> PlacementNode {
        PlacementNode {
            id: id.into(),
            placement: Placement::Relative {
                anchor,
                spec: PlacementSpec::new(offset, DVec3::Z),
            },
        }
    }

    fn host(id: &str) -> PlacementNode {
        PlacementNode {
            id: id.into(),
            placement: Placement::AheadOf {
                anchor: AnchorRef::Agent,
                host: HostPlacement {
                    distance: 2.0,
                    height: 0.0,
                    yaw: 20f64.to_radians(),
                },
            },
        }
    }

    fn entity(id: &str) -> AnchorRef {
        AnchorRef::Entity(id.into())
    }

    fn setup(ids: &[&str]) -> (EntityRegistry, Sphere, Pose) {
        let mut registry = EntityRegistry::new();
        let mut group = AssetGroup::new("test");
        for id in ids {
            registry.reserve((*id).into());
            group = group.with(*id, 1.0);
        }
        registry.commit_group(&group).unwrap();
        let sphere = Sphere::new(DVec3::new(0.0, -100.0, -80.0), 5.0).unwrap();
        let agent = Pose::new(DVec3::new(0.0, -94.95, -80.0), DQuat::IDENTITY);
        (registry, sphere, agent)
    }

    #[test]
    fn test_order_puts_anchors_first() {
        // Declared dependents-first on purpose.
        let graph = PlacementGraph::build(vec![
            relative("c", entity("b"), DVec3::X),
            relative("b", entity("a"), DVec3::X),
            host("a"),
        ])
        .unwrap();
        let order: Vec<_> = graph.ordered_ids().map(EntityId::as_str).collect();
        assert_eq!(order, ["a", "b", "c"]);
    }

    #[test]
    fn test_cycle_is_rejected() {
        let result = PlacementGraph::build(vec![
            host("root"),
            relative("a", entity("b"), DVec3::X),
            relative("b", entity("a"), DVec3::X),
        ]);
        match result {
            Err(SceneError::PlacementCycle(ids)) => {
                assert_eq!(ids, vec![EntityId::from("a"), EntityId::from("b")]);
            }
            other => panic!("expected cycle, got {other:?}"),
        }
    }

    #[test]
    fn test_unknown_anchor_and_duplicates_rejected() {
        assert!(matches!(
            PlacementGraph::build(vec![relative("a", entity("ghost"), DVec3::X)]),
            Err(SceneError::UnknownAnchor { .. })
        ));
        assert!(matches!(
            PlacementGraph::build(vec![host("a"), host("a")]),
            Err(SceneError::DuplicateNode(_))
        ));
    }

    #[test]
    fn test_evaluate_pins_every_node() {
        let (mut registry, sphere, agent) = setup(&["host", "table", "bottle"]);
        let graph = PlacementGraph::build(vec![
            host("host"),
            relative("table", entity("host"), DVec3::new(5.0, 0.0, 0.0)),
            relative("bottle", entity("table"), DVec3::new(0.0, 0.0, 1.0)),
        ])
        .unwrap();
        let report = graph.evaluate(&mut registry, &sphere, &agent);
        assert!(report.is_complete());
        assert_eq!(report.placed.len(), 3);
        for id in ["table", "bottle"] {
            let pose = registry.pose_ready(&id.into()).unwrap();
            assert!((pose.position.distance(sphere.center()) - 5.05).abs() < 1e-9);
        }
    }

    #[test]
    fn test_failed_anchor_skips_subtree_only() {
        let (mut registry, sphere, agent) = setup(&["host", "lamp", "bed"]);
        registry.reserve("pending".into());
        let graph = PlacementGraph::build(vec![
            host("host"),
            relative("pending", entity("host"), DVec3::X),
            relative("lamp", entity("pending"), DVec3::X),
            relative("bed", entity("host"), DVec3::new(-10.0, 0.0, -5.0)),
        ])
        .unwrap();
        let report = graph.evaluate(&mut registry, &sphere, &agent);

        assert_eq!(
            report.placed,
            vec![EntityId::from("host"), EntityId::from("bed")]
        );
        assert_eq!(
            report.skipped,
            vec![
                ("pending".into(), SurfaceError::NotReady("pending".into())),
                ("lamp".into(), SurfaceError::NotReady("pending".into())),
            ]
        );
    }

    #[test]
    fn test_evaluate_where_leaves_excluded_nodes_alone() {
        let (mut registry, sphere, agent) = setup(&["host", "table", "bottle"]);
        let graph = PlacementGraph::build(vec![
            host("host"),
            relative("table", entity("host"), DVec3::new(2.0, 0.0, 0.0)),
            relative("bottle", entity("table"), DVec3::new(0.0, 0.0, 1.0)),
        ])
        .unwrap();
        graph.evaluate(&mut registry, &sphere, &agent);
        let host_before = registry.pose_ready(&"host".into()).unwrap();
        let table_before = registry.pose_ready(&"table".into()).unwrap();

        let walked = Pose::new(
            DVec3::new(0.0, -100.0, -74.95),
            DQuat::from_rotation_x(std::f64::consts::FRAC_PI_2),
        );
        let report = graph.evaluate_where(&mut registry, &sphere, &walked, |id| {
            id.as_str() == "bottle"
        });

        assert_eq!(report.placed, vec![EntityId::from("bottle")]);
        assert_eq!(registry.pose_ready(&"host".into()).unwrap(), host_before);
        assert_eq!(registry.pose_ready(&"table".into()).unwrap(), table_before);
    }

    #[test]
    fn test_reevaluate_from_moves_only_dependents() {
        let (mut registry, sphere, agent) = setup(&["host", "table", "bottle", "other"]);
        let graph = PlacementGraph::build(vec![
            host("host"),
            relative("table", entity("host"), DVec3::new(2.0, 0.0, 0.0)),
            relative("bottle", entity("table"), DVec3::new(0.0, 0.0, 1.0)),
            relative("other", AnchorRef::Agent, DVec3::new(0.0, 0.0, 3.0)),
        ])
        .unwrap();
        graph.evaluate(&mut registry, &sphere, &agent);
        let other_before = registry.pose_ready(&"other".into()).unwrap();

        let table_before = registry.pose_ready(&"table".into()).unwrap();
        let mut moved = registry.pose_ready(&"host".into()).unwrap();
        moved.orientation = moved.orientation * DQuat::from_rotation_y(1.0);
        registry.set_pose(&"host".into(), moved).unwrap();

        let report = graph.reevaluate_from(&"host".into(), &mut registry, &sphere, &agent);
        assert_eq!(
            report.placed,
            vec![EntityId::from("table"), EntityId::from("bottle")]
        );
        assert_ne!(registry.pose_ready(&"table".into()).unwrap(), table_before);
        assert_eq!(registry.pose_ready(&"other".into()).unwrap(), other_before);
        assert_eq!(registry.pose_ready(&"host".into()).unwrap(), moved);
    }
}
