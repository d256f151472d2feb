//! Scene definition loaded from RON.

use b612_surface::{
    EntityId, EulerXyz, HostPlacement, PlacementSpec, Sphere, SphereId, SphereRegistry,
    SurfaceError,
};
use glam::DVec3;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{
    AnchorRef, AssetGroup, DialogueScript, LightDef, Placement, PlacementNode, PresetLighting,
    SceneError,
};

const BUILTIN_SCENE: &str = include_str!("../assets/little_prince.ron");

fn default_forward_hint() -> [f64; 3] {
    [0.0, 0.0, 1.0]
}

fn default_height() -> f64 {
    0.05
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SceneDef {
    pub spheres: Vec<SphereDef>,
    #[serde(default)]
    pub lighting: Vec<LightingPresetDef>,
    /// Rewards needed to finish the journey.
    #[serde(default)]
    pub rewards_required: usize,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LightingPresetDef {
    /// Sphere name, or `"default"`.
    pub sphere: String,
    pub lights: Vec<LightDef>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SphereDef {
    pub name: String,
    pub center: [f64; 3],
    pub radius: f64,
    pub quote: String,
    #[serde(default)]
    pub host: Option<HostDef>,
    #[serde(default)]
    pub props: Vec<PropDef>,
}

/// The NPC living on a sphere, placed ahead of the agent.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HostDef {
    pub id: EntityId,
    pub bounding_radius: f64,
    pub distance: f64,
    #[serde(default)]
    pub height: f64,
    #[serde(default)]
    pub yaw_degrees: f64,
    pub dialogue: DialogueScript,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PropDef {
    pub id: EntityId,
    pub bounding_radius: f64,
    /// Defaults to the sphere's host, or the agent if there is none.
    #[serde(default)]
    pub anchor: Option<EntityId>,
    pub offset: [f64; 3],
    #[serde(default = "default_forward_hint")]
    pub forward_hint: [f64; 3],
    #[serde(default)]
    pub rotation_degrees: [f64; 3],
    #[serde(default = "default_height")]
    pub height: f64,
}

impl SceneDef {
    pub fn from_ron(source: &str) -> Result<Self, SceneError> {
        Ok(ron::from_str(source)?)
    }

    /// The six planets shipped with the crate.
    pub fn builtin() -> Result<Self, SceneError> {
        Self::from_ron(BUILTIN_SCENE)
    }

    pub fn sphere_def(&self, name: &str) -> Option<&SphereDef> {
        self.spheres.iter().find(|s| s.name == name)
    }

    /// Register every sphere, in declaration order.
    pub fn register_spheres(&self, registry: &mut SphereRegistry) -> Result<Vec<SphereId>, SceneError> {
        let ids = self
            .spheres
            .iter()
            .map(|def| -> Result<SphereId, SceneError> {
                Ok(registry.register(&def.name, def.sphere()?)?)
            })
            .collect::<Result<Vec<_>, _>>()?;
        info!(spheres = ids.len(), "scene spheres registered");
        Ok(ids)
    }

    pub fn lighting_presets(&self) -> PresetLighting {
        PresetLighting::new(
            self.lighting
                .iter()
                .map(|preset| (preset.sphere.clone(), preset.lights.clone())),
        )
    }
}

impl SphereDef {
    pub fn sphere(&self) -> Result<Sphere, SurfaceError> {
        Sphere::new(DVec3::from_array(self.center), self.radius)
    }

    /// Host first, then props in declaration order.
    pub fn entity_ids(&self) -> impl Iterator<Item = &EntityId> {
        self.host
            .iter()
            .map(|h| &h.id)
            .chain(self.props.iter().map(|p| &p.id))
    }

    /// Everything that has to load before this sphere can be populated.
    pub fn asset_group(&self) -> AssetGroup {
        let mut group = AssetGroup::new(self.name.clone());
        if let Some(host) = &self.host {
            group = group.with(host.id.clone(), host.bounding_radius);
        }
        for prop in &self.props {
            group = group.with(prop.id.clone(), prop.bounding_radius);
        }
        group
    }

    pub fn placement_nodes(&self) -> Vec<PlacementNode> {
        let default_anchor = match &self.host {
            Some(host) => AnchorRef::Entity(host.id.clone()),
            None => AnchorRef::Agent,
        };

        let host = self.host.iter().map(|host| PlacementNode {
            id: host.id.clone(),
            placement: Placement::AheadOf {
                anchor: AnchorRef::Agent,
                host: HostPlacement {
                    distance: host.distance,
                    height: host.height,
                    yaw: host.yaw_degrees.to_radians(),
                },
            },
        });
        let props = self.props.iter().map(|prop| {
            let [rx, ry, rz] = prop.rotation_degrees;
            PlacementNode {
                id: prop.id.clone(),
                placement: Placement::Relative {
                    anchor: prop
                        .anchor
                        .clone()
                        .map_or_else(|| default_anchor.clone(), AnchorRef::Entity),
                    spec: PlacementSpec::new(
                        DVec3::from_array(prop.offset),
                        DVec3::from_array(prop.forward_hint),
                    )
                    .with_rotation(EulerXyz::from_degrees(rx, ry, rz))
                    .with_height(prop.height),
                },
            }
        });
        host.chain(props).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{LightingPresets, NpcDialogue, PlacementGraph};

    #[test]
    fn test_builtin_scene_parses() {
        let scene = SceneDef::builtin().unwrap();
        let names: Vec<_> = scene.spheres.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(
            names,
            ["king", "vanity", "drunkard", "businessman", "lamplighter", "geographer"]
        );
        assert_eq!(scene.rewards_required, 5);
        let drunkard = scene.sphere_def("drunkard").unwrap();
        assert_eq!(drunkard.center, [0.0, -100.0, -80.0]);
        assert_eq!(drunkard.radius, 5.0);
    }

    #[test]
    fn test_builtin_spheres_register_without_overlap() {
        let scene = SceneDef::builtin().unwrap();
        let mut registry = SphereRegistry::new();
        let ids = scene.register_spheres(&mut registry).unwrap();
        assert_eq!(ids.len(), 6);
    }

    #[test]
    fn test_builtin_graphs_and_dialogues_are_valid() {
        let scene = SceneDef::builtin().unwrap();
        for sphere in &scene.spheres {
            let graph = PlacementGraph::build(sphere.placement_nodes()).unwrap();
            assert_eq!(graph.len(), sphere.entity_ids().count());
            if let Some(host) = &sphere.host {
                NpcDialogue::new(host.id.clone(), host.dialogue.clone()).unwrap();
                // The host is placed before anything anchored to it.
                assert_eq!(graph.ordered_ids().next(), Some(&host.id));
            }
        }
    }

    #[test]
    fn test_prop_defaults() {
        let scene = SceneDef::from_ron(
            r#"(spheres: [(
                name: "rose",
                center: (0.0, 0.0, 0.0),
                radius: 2.0,
                quote: "",
                props: [(id: "rose.glass", bounding_radius: 0.2, offset: (1.0, 0.0, 0.0))],
            )])"#,
        )
        .unwrap();
        let sphere = &scene.spheres[0];
        let prop = &sphere.props[0];
        assert_eq!(prop.forward_hint, [0.0, 0.0, 1.0]);
        assert_eq!(prop.height, 0.05);
        assert!(scene.lighting.is_empty());

        let nodes = sphere.placement_nodes();
        assert_eq!(nodes.len(), 1);
        assert_eq!(nodes[0].placement.anchor(), &AnchorRef::Agent);
    }

    #[test]
    fn test_chained_prop_anchor() {
        let scene = SceneDef::builtin().unwrap();
        let nodes = scene.sphere_def("businessman").unwrap().placement_nodes();
        let lamp = nodes
            .iter()
            .find(|n| n.id.as_str() == "businessman.lamp")
            .unwrap();
        assert_eq!(
            lamp.placement.anchor(),
            &AnchorRef::Entity("businessman.ledger".into())
        );
    }

    #[test]
    fn test_lighting_presets_from_scene() {
        let scene = SceneDef::builtin().unwrap();
        let mut lighting = scene.lighting_presets();
        lighting.apply("drunkard");
        assert_eq!(lighting.active_lights().len(), 2);
        lighting.apply("king");
        assert_eq!(lighting.active_preset(), Some("default"));
    }

    #[test]
    fn test_malformed_scene_is_a_parse_error() {
        assert!(matches!(
            SceneDef::from_ron("(spheres: [(name: 3)])"),
            Err(SceneError::Parse(_))
        ));
    }
}
