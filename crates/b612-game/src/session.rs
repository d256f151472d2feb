//! One viewer session: the spheres, what stands on them, the agent, the
//! camera and the view state machine, advanced one fixed update at a time.
//!
//! [`Session::update`] runs every frame in the same order: back and click
//! requests, then the active mode (auto-orbit, zoom step plus SURFACE entry,
//! or locomotion plus camera rig), then dialogue timeouts, then the output
//! snapshot. Nothing in it panics or aborts the frame; rejected requests and
//! failed placements are logged and skipped.

use b612_input::{ActionState, OrbitAxes, WalkAxes};
use b612_player::{Agent, CameraState, RigMode};
use b612_scene::{
    AssetGroup, DialogueEvent, DialogueSink, EntityHandle, EntityRegistry, LightingPresets,
    NpcDialogue, PlacementGraph, RewardLedger, SceneDef, SceneError,
};
use b612_surface::{
    EntityId, Pose, Ray, Sphere, SphereId, SphereRegistry, camera_relative_direction,
    ray_sphere_intersect,
};
use glam::DVec3;
use rustc_hash::{FxHashMap, FxHashSet};
use tracing::{debug, info, warn};

use crate::{FIXED_DT, Settings, TransitionError, ViewMode, ViewModeKind, ViewStateMachine};

/// How long a planet's quote stays up after it is picked: five seconds at
/// 60 updates per second.
pub const QUOTE_DISPLAY_FRAMES: u32 = 300;

/// Input for one update.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameInput {
    pub walk: WalkAxes,
    pub orbit: OrbitAxes,
    /// "Back" was pressed this frame.
    pub back: bool,
    /// Pointer ray of a click this frame.
    pub click: Option<Ray>,
    /// The mini-game overlay reported success this frame.
    pub minigame_complete: bool,
    pub dt: f64,
}

impl Default for FrameInput {
    fn default() -> Self {
        Self {
            walk: WalkAxes::default(),
            orbit: OrbitAxes::default(),
            back: false,
            click: None,
            minigame_complete: false,
            dt: FIXED_DT,
        }
    }
}

impl FrameInput {
    pub fn from_actions(actions: &ActionState, click: Option<Ray>, dt: f64) -> Self {
        Self {
            walk: actions.walk_axes(),
            orbit: actions.orbit_axes(),
            back: actions.back_requested(),
            click,
            minigame_complete: false,
            dt,
        }
    }
}

/// Something that happened during an update, for the presentation layer.
#[derive(Clone, Debug, PartialEq)]
pub enum SessionEvent {
    ZoomStarted(SphereId),
    /// The picked planet introduces itself.
    QuoteShown { sphere: SphereId, text: String },
    QuoteHidden(SphereId),
    EnteredSurface(SphereId),
    ReturnedToOrbit(SphereId),
    DialogueShown { npc: EntityId, text: String },
    DialogueHidden(EntityId),
    MiniGameStarted(EntityId),
    /// Name of the sphere whose reward was granted.
    RewardGranted(String),
    JourneyComplete,
}

/// What the renderer needs after an update.
#[derive(Clone, Debug, PartialEq)]
pub struct FrameOutput {
    pub frame: u64,
    pub mode: ViewModeKind,
    pub camera: CameraState,
    pub visible_spheres: Vec<SphereId>,
    /// Sorted.
    pub visible_entities: Vec<EntityId>,
    /// The agent's pose while it is visible.
    pub agent: Option<Pose>,
    pub events: Vec<SessionEvent>,
}

#[derive(Debug)]
struct SphereContent {
    name: String,
    quote: String,
    graph: PlacementGraph,
    host: Option<EntityId>,
    assets: AssetGroup,
}

/// A planet quote on screen.
#[derive(Debug)]
struct Caption {
    sphere: SphereId,
    speaker: EntityId,
    remaining: u32,
}

pub struct Session<L, S> {
    settings: Settings,
    view: ViewStateMachine,
    spheres: SphereRegistry,
    content: FxHashMap<SphereId, SphereContent>,
    entities: EntityRegistry,
    dialogues: FxHashMap<EntityId, NpcDialogue>,
    camera: CameraState,
    agent: Option<Agent>,
    rewards: RewardLedger,
    rewards_required: usize,
    journey_complete: bool,
    caption: Option<Caption>,
    lighting: L,
    sink: S,
    frame: u64,
    events: Vec<SessionEvent>,
}

impl<L: LightingPresets, S: DialogueSink> Session<L, S> {
    /// Register the scene's spheres and reserve every entity as pending.
    /// Entities become placeable once their group is passed to
    /// [`on_assets_loaded`](Self::on_assets_loaded).
    ///
    /// # Errors
    ///
    /// Overlapping or duplicate spheres, an entity id used twice, an invalid
    /// placement graph or dialogue script.
    pub fn new(
        scene: &SceneDef,
        settings: Settings,
        lighting: L,
        sink: S,
    ) -> Result<Self, SceneError> {
        let mut spheres = SphereRegistry::new();
        let ids = scene.register_spheres(&mut spheres)?;

        let mut entities = EntityRegistry::new();
        let mut content = FxHashMap::default();
        let mut dialogues = FxHashMap::default();
        for (def, id) in scene.spheres.iter().zip(ids) {
            for entity in def.entity_ids() {
                if !entities.reserve(entity.clone()) {
                    return Err(SceneError::DuplicateNode(entity.clone()));
                }
            }
            if let Some(host) = &def.host {
                let dialogue = NpcDialogue::new(host.id.clone(), host.dialogue.clone())?;
                dialogues.insert(host.id.clone(), dialogue);
            }
            content.insert(
                id,
                SphereContent {
                    name: def.name.clone(),
                    quote: def.quote.clone(),
                    graph: PlacementGraph::build(def.placement_nodes())?,
                    host: def.host.as_ref().map(|h| h.id.clone()),
                    assets: def.asset_group(),
                },
            );
        }

        info!(
            spheres = spheres.len(),
            entities = entities.len(),
            "session ready"
        );
        Ok(Self {
            settings,
            view: ViewStateMachine::new(settings.zoom),
            spheres,
            content,
            entities,
            dialogues,
            camera: CameraState::new(settings.home.position, settings.home.target, DVec3::Y),
            agent: None,
            rewards: RewardLedger::new(),
            rewards_required: scene.rewards_required,
            journey_complete: false,
            caption: None,
            lighting,
            sink,
            frame: 0,
            events: Vec::new(),
        })
    }

    /// Asset groups still to be reported by the loader, one per sphere.
    pub fn asset_groups(&self) -> impl Iterator<Item = &AssetGroup> {
        self.content.values().map(|c| &c.assets)
    }

    /// Readiness signal from the loader. If the group belongs to the sphere
    /// currently walked on, its entities are placed right away.
    ///
    /// # Errors
    ///
    /// A member of `group` was never part of the scene.
    pub fn on_assets_loaded(&mut self, group: &AssetGroup) -> Result<(), SceneError> {
        self.entities.commit_group(group)?;
        if let ViewMode::Surface { sphere } = *self.view.mode()
            && self.content.get(&sphere).is_some_and(|c| c.name == group.name)
        {
            self.place_content(sphere);
        }
        Ok(())
    }

    /// Advance one fixed update.
    pub fn update(&mut self, input: &FrameInput) -> FrameOutput {
        self.frame += 1;

        if input.back
            && let Err(err) = self.back()
        {
            debug!(%err, "back ignored");
        }
        if let Some(ray) = &input.click {
            if self.view.kind() == ViewModeKind::Surface {
                self.click_host(ray);
            } else if let Err(err) = self.pick(ray) {
                debug!(%err, "pick ignored");
            }
        }
        if input.minigame_complete {
            self.dispatch_to_host(DialogueEvent::MiniGameComplete);
        }

        match *self.view.mode() {
            ViewMode::Orbit => self.settings.auto_orbit.update(&mut self.camera),
            ViewMode::Zooming { .. } => {
                if let Some(sphere) = self.view.advance_zoom(&mut self.camera) {
                    self.enter_surface(sphere);
                }
            }
            ViewMode::Surface { sphere } => self.surface_update(sphere, input),
        }

        self.tick_dialogues();
        if self.settings.trace_camera {
            debug!(
                frame = self.frame,
                mode = %self.view.kind(),
                position = ?self.camera.position,
                up = ?self.camera.up,
                target = ?self.camera.target,
                "camera"
            );
        }
        self.output()
    }

    /// Start zooming to the sphere under `ray`. Only accepted in ORBIT.
    pub fn pick(&mut self, ray: &Ray) -> Result<SphereId, TransitionError> {
        let sphere = self.view.pick(ray, &self.spheres, &self.camera)?;
        self.events.push(SessionEvent::ZoomStarted(sphere));
        self.show_quote(sphere);
        Ok(sphere)
    }

    /// Return to ORBIT within the call: every sphere shown again, agent and
    /// entities hidden, sphere lighting removed, camera back home.
    pub fn back(&mut self) -> Result<(), TransitionError> {
        let sphere = self.view.back()?;
        self.spheres.show_all();
        self.entities.hide_all();
        if let Some(agent) = self.agent.as_mut() {
            agent.hide();
        }
        self.lighting.clear();

        if let Some(host) = self.content.get(&sphere).and_then(|c| c.host.as_ref())
            && let Some(dialogue) = self.dialogues.get_mut(host)
            && dialogue.dismiss()
        {
            self.sink.hide(host);
        }
        if let Some(caption) = self.caption.take() {
            self.sink.hide(&caption.speaker);
        }

        let home = self.settings.home;
        self.camera = CameraState::new(home.position, home.target, DVec3::Y);
        self.events.push(SessionEvent::ReturnedToOrbit(sphere));
        Ok(())
    }

    pub fn mode(&self) -> &ViewMode {
        self.view.mode()
    }

    pub fn camera(&self) -> &CameraState {
        &self.camera
    }

    pub fn agent(&self) -> Option<&Agent> {
        self.agent.as_ref()
    }

    pub fn spheres(&self) -> &SphereRegistry {
        &self.spheres
    }

    pub fn entities(&self) -> &EntityRegistry {
        &self.entities
    }

    pub fn rewards(&self) -> &RewardLedger {
        &self.rewards
    }

    pub fn lighting(&self) -> &L {
        &self.lighting
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn dialogue(&self, npc: &EntityId) -> Option<&NpcDialogue> {
        self.dialogues.get(npc)
    }

    /// Host of the sphere being walked on, if it has one.
    pub fn current_host(&self) -> Option<(&EntityId, &EntityHandle)> {
        let ViewMode::Surface { sphere } = self.view.mode() else {
            return None;
        };
        let host = self.content.get(sphere)?.host.as_ref()?;
        Some((host, self.entities.get(host)?))
    }

    fn show_quote(&mut self, id: SphereId) {
        let Some(content) = self.content.get(&id).filter(|c| !c.quote.is_empty()) else {
            return;
        };
        if let Some(previous) = self.caption.take() {
            self.sink.hide(&previous.speaker);
        }
        let speaker = EntityId::new(content.name.as_str());
        let text = format!("{}: \"{}\"", content.name, content.quote);
        self.sink.show(&speaker, &text);
        self.events.push(SessionEvent::QuoteShown { sphere: id, text });
        self.caption = Some(Caption {
            sphere: id,
            speaker,
            remaining: QUOTE_DISPLAY_FRAMES,
        });
    }

    fn enter_surface(&mut self, id: SphereId) {
        let Some(sphere) = self.spheres.sphere(id).copied() else {
            warn!(sphere = %id, "entered an unregistered sphere");
            return;
        };
        self.spheres.show_only(id);
        if let Some(agent) = self.agent.as_mut() {
            agent.respawn(id, &sphere, self.settings.spawn);
        } else {
            self.agent = Some(Agent::spawn(
                id,
                &sphere,
                self.settings.spawn,
                self.settings.locomotion,
            ));
        }
        self.place_content(id);
        if let Some(content) = self.content.get(&id) {
            self.lighting.apply(&content.name);
        }
        self.events.push(SessionEvent::EnteredSurface(id));
    }

    /// Place whatever on `id` is not shown yet relative to the agent, and
    /// show what could be placed. Entities still loading are skipped until
    /// their group is committed; entities already standing are left alone.
    fn place_content(&mut self, id: SphereId) {
        let (Some(content), Some(sphere), Some(agent)) = (
            self.content.get(&id),
            self.spheres.sphere(id),
            self.agent.as_ref(),
        ) else {
            return;
        };
        let unplaced: FxHashSet<EntityId> = content
            .graph
            .ordered_ids()
            .filter(|entity| !self.entities.get(entity).is_some_and(|h| h.visible))
            .cloned()
            .collect();
        if unplaced.is_empty() {
            return;
        }
        let report = content.graph.evaluate_where(
            &mut self.entities,
            sphere,
            &agent.pose,
            |entity| unplaced.contains(entity),
        );
        for placed in &report.placed {
            self.entities.set_visible(placed, true);
        }
        if !report.is_complete() {
            warn!(
                sphere = %content.name,
                placed = report.placed.len(),
                skipped = report.skipped.len(),
                "sphere partially populated"
            );
        }
    }

    fn surface_update(&mut self, id: SphereId, input: &FrameInput) {
        let Some(sphere) = self.spheres.sphere(id).copied() else {
            return;
        };
        let mut rig_mode = RigMode::ManualOrbit(input.orbit);
        if let Some(agent) = self.agent.as_mut() {
            let direction = agent
                .local_up(&sphere)
                .ok()
                .and_then(|up| {
                    camera_relative_direction(
                        self.camera.view_dir(),
                        up,
                        input.walk.forward,
                        input.walk.right,
                    )
                })
                .unwrap_or(DVec3::ZERO);
            if agent.walk(&sphere, direction, input.dt).is_moving() {
                rig_mode = RigMode::Follow(agent.follow_target());
            }
        }
        self.settings
            .rig
            .update(&mut self.camera, rig_mode, Some(&sphere));
    }

    fn click_host(&mut self, ray: &Ray) {
        let Some(host) = self.current_host().map(|(id, _)| id.clone()) else {
            return;
        };
        if self.host_hit(&host, ray) {
            self.dispatch(&host, DialogueEvent::Click);
        }
    }

    fn host_hit(&self, host: &EntityId, ray: &Ray) -> bool {
        let Some(handle) = self.entities.get(host).filter(|h| h.visible) else {
            return false;
        };
        let Some(radius) = handle.bounding_radius() else {
            return false;
        };
        Sphere::new(handle.pose.position, radius)
            .ok()
            .and_then(|bounds| ray_sphere_intersect(ray, &bounds))
            .is_some()
    }

    fn dispatch_to_host(&mut self, event: DialogueEvent) {
        if let Some(host) = self.current_host().map(|(id, _)| id.clone()) {
            self.dispatch(&host, event);
        }
    }

    fn dispatch(&mut self, npc: &EntityId, event: DialogueEvent) {
        let Some(line) = self
            .dialogues
            .get_mut(npc)
            .and_then(|dialogue| dialogue.handle(event))
        else {
            return;
        };
        self.sink.show(npc, &line.text);
        self.events.push(SessionEvent::DialogueShown {
            npc: npc.clone(),
            text: line.text,
        });

        if line.starts_minigame {
            info!(%npc, "mini-game started");
            self.events.push(SessionEvent::MiniGameStarted(npc.clone()));
        }
        if line.reward {
            self.grant_reward();
        }
    }

    fn grant_reward(&mut self) {
        let Some(name) = self
            .view
            .mode()
            .sphere()
            .and_then(|id| self.content.get(&id))
            .map(|c| c.name.clone())
        else {
            return;
        };
        if !self.rewards.grant(&name) {
            return;
        }
        self.events.push(SessionEvent::RewardGranted(name));
        if !self.journey_complete && self.rewards.is_complete(self.rewards_required) {
            self.journey_complete = true;
            info!(rewards = self.rewards.count(), "journey complete");
            self.events.push(SessionEvent::JourneyComplete);
        }
    }

    fn tick_dialogues(&mut self) {
        for (npc, dialogue) in &mut self.dialogues {
            if dialogue.tick() {
                self.sink.hide(npc);
                self.events.push(SessionEvent::DialogueHidden(npc.clone()));
            }
        }
        if let Some(caption) = self.caption.as_mut() {
            caption.remaining = caption.remaining.saturating_sub(1);
            if caption.remaining == 0 {
                self.sink.hide(&caption.speaker);
                self.events.push(SessionEvent::QuoteHidden(caption.sphere));
                self.caption = None;
            }
        }
    }

    fn output(&mut self) -> FrameOutput {
        let mut visible_entities: Vec<EntityId> = self
            .entities
            .iter()
            .filter(|(_, handle)| handle.visible)
            .map(|(id, _)| id.clone())
            .collect();
        visible_entities.sort();

        FrameOutput {
            frame: self.frame,
            mode: self.view.kind(),
            camera: self.camera,
            visible_spheres: self
                .spheres
                .iter()
                .filter(|(_, entry)| entry.visible)
                .map(|(id, _)| id)
                .collect(),
            visible_entities,
            agent: self.agent.as_ref().filter(|a| a.visible).map(|a| a.pose),
            events: std::mem::take(&mut self.events),
        }
    }
}
