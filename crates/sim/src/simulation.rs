use blockyard_author::{BlockEditor, EditOutcome};
use blockyard_common::CellCoord;
use blockyard_cull::{VisibilitySelector, VisibleCell};
use blockyard_input::{Action, CameraMode, InputEvent, InputState, MovementIntent};
use blockyard_kernel::{
    BASE_LAYOUT, GOAL_CELL, GoalDetector, GoalState, GridError, GridEvent, MoveOutcome, WorldGrid,
    collision,
};
use blockyard_view::{FirstPersonCamera, OrbitCamera, ViewPose};
use glam::{Mat4, Vec3};

use crate::config::{ConfigError, SimConfig};

/// Frame loop lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    /// Resources are still loading; ticks are refused.
    Loading,
    Running,
    /// Loading failed. The loop never starts.
    Failed,
}

/// Notifications for the embedding shell.
#[derive(Debug, Clone, PartialEq)]
pub enum StatusEvent {
    Ready,
    GoalReached { goal: CellCoord },
    LoadFailed { reason: String },
}

#[derive(Debug, thiserror::Error)]
pub enum SimError {
    #[error("frame loop is not running (state: {0:?})")]
    NotRunning(LoopState),
    #[error(transparent)]
    Grid(#[from] GridError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Everything one tick produced.
#[derive(Debug, Clone)]
pub struct Frame {
    pub tick: u64,
    pub visible: Vec<VisibleCell>,
    pub movement: MoveOutcome,
    /// True only on the tick the goal latched.
    pub goal_reached_now: bool,
    /// Grid changes since the previous tick, drained from the grid's log.
    pub grid_events: Vec<GridEvent>,
    pub view: Mat4,
    pub projection: Mat4,
}

/// One walking session over one grid.
#[derive(Debug)]
pub struct Simulation {
    config: SimConfig,
    grid: WorldGrid,
    camera: FirstPersonCamera,
    orbit: OrbitCamera,
    input: InputState,
    editor: BlockEditor,
    selector: VisibilitySelector,
    goal: GoalDetector,
    goal_state: GoalState,
    state: LoopState,
    status: Vec<StatusEvent>,
    tick: u64,
}

impl Simulation {
    /// Build a session over the built-in layout and goal.
    pub fn new(config: SimConfig) -> Result<Self, SimError> {
        Self::with_layout(config, &BASE_LAYOUT, GOAL_CELL)
    }

    pub fn with_layout<R: AsRef<[u8]>>(
        config: SimConfig,
        rows: &[R],
        goal: CellCoord,
    ) -> Result<Self, SimError> {
        config.validate()?;
        if !config.carve.is_valid_for(goal, rows.len()) {
            tracing::warn!(%goal, "carve parameters clip at the world edge");
        }
        let grid = WorldGrid::courtyard(rows, goal, &config.carve)?;

        let half = grid.size() as f32 / 2.0;
        let start = config.start;
        Ok(Self {
            camera: FirstPersonCamera::new(start.eye, start.yaw, start.pitch),
            orbit: OrbitCamera::new(Vec3::new(half, 0.0, half), half * 1.5),
            input: InputState::new(config.input),
            editor: BlockEditor::new(),
            selector: VisibilitySelector::new(config.render_radius),
            goal: GoalDetector::new(goal, config.goal_threshold),
            goal_state: GoalState::new(),
            state: LoopState::Loading,
            status: Vec::new(),
            tick: 0,
            grid,
            config,
        })
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn grid(&self) -> &WorldGrid {
        &self.grid
    }

    pub fn camera(&self) -> &FirstPersonCamera {
        &self.camera
    }

    pub fn orbit(&self) -> &OrbitCamera {
        &self.orbit
    }

    pub fn goal(&self) -> &GoalDetector {
        &self.goal
    }

    pub fn goal_state(&self) -> &GoalState {
        &self.goal_state
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn editor(&self) -> &BlockEditor {
        &self.editor
    }

    /// Ticks completed so far.
    pub fn tick_count(&self) -> u64 {
        self.tick
    }

    /// The camera that currently drives the view matrix.
    pub fn active_view(&self) -> &dyn ViewPose {
        match self.input.mode {
            CameraMode::FirstPerson => &self.camera,
            CameraMode::Orbit => &self.orbit,
        }
    }

    pub fn camera_mode(&self) -> CameraMode {
        self.input.mode
    }

    pub fn set_camera_mode(&mut self, mode: CameraMode) {
        if self.input.mode != mode {
            tracing::debug!(?mode, "camera mode changed");
            self.input.mode = mode;
        }
    }

    /// Scale the orbit camera's field of view against its starting value.
    pub fn set_orbit_zoom(&mut self, scale: f32) {
        self.orbit.zoom(scale);
    }

    pub fn set_viewport(&mut self, width: f32, height: f32) {
        self.camera.projection.set_aspect(width, height);
        self.orbit.projection.set_aspect(width, height);
    }

    /// Report the outcome of resource loading. Only the first report counts.
    pub fn finish_loading<E: std::fmt::Display>(&mut self, result: Result<(), E>) {
        if self.state != LoopState::Loading {
            tracing::warn!(state = ?self.state, "loading already finished");
            return;
        }
        match result {
            Ok(()) => {
                self.state = LoopState::Running;
                self.status.push(StatusEvent::Ready);
                tracing::info!("frame loop started");
            }
            Err(err) => {
                let reason = err.to_string();
                tracing::error!(%reason, "resource loading failed");
                self.state = LoopState::Failed;
                self.status.push(StatusEvent::LoadFailed { reason });
            }
        }
    }

    /// Feed one input event. Held keys are tracked in every state; actions
    /// only apply while running. Returns the edit result for edit keys.
    pub fn handle_event(&mut self, event: InputEvent) -> Option<EditOutcome> {
        let action = self.input.handle(event);
        if self.state != LoopState::Running {
            return None;
        }
        match action {
            Action::Look { right, up } => {
                self.camera.pan_right(right);
                self.camera.pan_up(up);
                None
            }
            Action::Orbit { dx, dy } => {
                self.orbit.orbit(dx, dy);
                None
            }
            Action::Dolly(delta_y) => {
                self.orbit.dolly(delta_y);
                None
            }
            Action::OrbitStep { forward, pan } => {
                self.orbit.move_forward(forward * self.config.orbit_move_speed);
                self.orbit.pan(pan * self.config.orbit_pan_step);
                None
            }
            Action::AddBlock => Some(self.editor.add_block(
                &mut self.grid,
                self.camera.eye(),
                self.camera.look_point(),
            )),
            Action::DeleteBlock => Some(self.editor.delete_block(
                &mut self.grid,
                self.camera.eye(),
                self.camera.look_point(),
            )),
            Action::Noop => None,
        }
    }

    /// Advance one frame.
    pub fn tick(&mut self) -> Result<Frame, SimError> {
        let _span = tracing::info_span!("sim_tick", tick = self.tick).entered();
        if self.state != LoopState::Running {
            return Err(SimError::NotRunning(self.state));
        }

        // In orbit mode the movement keys step the orbit camera instead.
        let walking = self.input.mode == CameraMode::FirstPerson;
        let turn = self.input.turn_axis();
        if walking && turn != 0.0 {
            self.camera.pan_left(turn * self.config.turn_speed);
        }

        let intent = if walking {
            let (forward, right) = self.camera.planar_basis();
            self.input
                .movement_intent(forward, right, self.config.move_speed)
        } else {
            MovementIntent::NONE
        };
        let movement = collision::step(
            &self.grid,
            self.camera.eye(),
            intent.delta(),
            &self.config.collision,
        );
        self.camera.set_eye(movement.position);

        let goal_reached_now = self.goal.check(&mut self.goal_state, self.camera.eye());
        if goal_reached_now {
            self.status.push(StatusEvent::GoalReached {
                goal: self.goal.goal(),
            });
        }

        let visible = self.selector.select(&self.grid, self.camera.eye());
        tracing::trace!(
            eye = ?self.camera.eye(),
            kind = ?movement.kind,
            visible = visible.len(),
            "frame"
        );

        let grid_events = self.grid.drain_events();
        let pose = self.active_view();
        let frame = Frame {
            tick: self.tick,
            visible,
            movement,
            goal_reached_now,
            grid_events,
            view: pose.view_matrix(),
            projection: pose.projection_matrix(),
        };
        self.tick += 1;
        Ok(frame)
    }

    /// Take all pending status events.
    pub fn drain_status(&mut self) -> Vec<StatusEvent> {
        std::mem::take(&mut self.status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blockyard_input::Key;
    use blockyard_kernel::MoveKind;

    /// Spawn in the corridor below the goal, facing +z (toward it).
    fn corridor_config() -> SimConfig {
        let mut config = SimConfig::default();
        config.start.eye = Vec3::new(28.5, 1.6, 23.5);
        config.start.yaw = 90.0;
        config
    }

    fn running(config: SimConfig) -> Simulation {
        let mut sim = Simulation::new(config).unwrap();
        sim.finish_loading(Ok::<(), String>(()));
        sim
    }

    #[test]
    fn tick_refused_while_loading() {
        let mut sim = Simulation::new(SimConfig::default()).unwrap();
        assert_eq!(sim.state(), LoopState::Loading);
        assert!(matches!(
            sim.tick(),
            Err(SimError::NotRunning(LoopState::Loading))
        ));
    }

    #[test]
    fn ready_event_once_running() {
        let mut sim = running(SimConfig::default());
        assert_eq!(sim.state(), LoopState::Running);
        assert_eq!(sim.drain_status(), vec![StatusEvent::Ready]);
        assert!(sim.drain_status().is_empty());
    }

    #[test]
    fn failed_load_keeps_state_intact() {
        let mut sim = Simulation::new(SimConfig::default()).unwrap();
        let heights: Vec<_> = sim.grid().cells().collect();
        let eye = sim.camera().eye();

        sim.finish_loading(Err("grass.png: not found"));
        assert_eq!(sim.state(), LoopState::Failed);
        assert_eq!(
            sim.drain_status(),
            vec![StatusEvent::LoadFailed {
                reason: "grass.png: not found".into()
            }]
        );
        assert!(matches!(
            sim.tick(),
            Err(SimError::NotRunning(LoopState::Failed))
        ));

        // A later success report does not revive the loop.
        sim.finish_loading(Ok::<(), String>(()));
        assert_eq!(sim.state(), LoopState::Failed);

        assert_eq!(sim.grid().cells().collect::<Vec<_>>(), heights);
        assert_eq!(sim.camera().eye(), eye);
    }

    #[test]
    fn edits_ignored_until_running() {
        let mut sim = Simulation::new(corridor_config()).unwrap();
        assert_eq!(sim.handle_event(InputEvent::KeyDown(Key::AddBlock)), None);
        assert_eq!(sim.editor().applied(), 0);
    }

    #[test]
    fn idle_tick_keeps_eye() {
        let mut sim = running(SimConfig::default());
        let frame = sim.tick().unwrap();
        assert_eq!(frame.tick, 0);
        assert_eq!(frame.movement.kind, MoveKind::Idle);
        assert_eq!(sim.camera().eye(), Vec3::new(2.5, 1.6, 2.5));
        assert_eq!(sim.tick_count(), 1);
    }

    #[test]
    fn walking_up_the_corridor_reaches_goal_once() {
        let mut sim = running(corridor_config());
        sim.drain_status();
        sim.handle_event(InputEvent::KeyDown(Key::Forward));

        let mut latched = 0;
        for _ in 0..40 {
            let frame = sim.tick().unwrap();
            if frame.goal_reached_now {
                latched += 1;
            }
        }
        assert_eq!(latched, 1);
        assert!(sim.goal_state().reached());
        assert_eq!(
            sim.drain_status(),
            vec![StatusEvent::GoalReached {
                goal: GOAL_CELL
            }]
        );
        assert!(sim.camera().eye().z > 27.25);
    }

    #[test]
    fn placed_block_stops_the_walk() {
        let mut sim = running(corridor_config());
        let outcome = sim.handle_event(InputEvent::KeyDown(Key::AddBlock));
        assert_eq!(
            outcome,
            Some(EditOutcome::Added {
                cell: CellCoord::new(28, 24),
                height: 1
            })
        );

        sim.handle_event(InputEvent::KeyDown(Key::Forward));
        for _ in 0..40 {
            sim.tick().unwrap();
        }
        assert!(!sim.goal_state().reached());
        assert!(sim.camera().eye().z + 0.22 < 24.0);
    }

    #[test]
    fn held_turn_key_rotates_each_tick() {
        let mut sim = running(SimConfig::default());
        sim.handle_event(InputEvent::KeyDown(Key::TurnLeft));
        for _ in 0..4 {
            sim.tick().unwrap();
        }
        assert!((sim.camera().yaw() - 10.0).abs() < 1e-4);

        sim.handle_event(InputEvent::KeyDown(Key::TurnRight));
        sim.tick().unwrap();
        assert!((sim.camera().yaw() - 10.0).abs() < 1e-4);
    }

    #[test]
    fn drag_turns_right_and_clamps_pitch() {
        let mut sim = running(SimConfig::default());
        sim.handle_event(InputEvent::PointerDrag { dx: 100.0, dy: 0.0 });
        assert!((sim.camera().yaw() + 15.0).abs() < 1e-4);

        for _ in 0..10 {
            sim.handle_event(InputEvent::PointerDrag { dx: 0.0, dy: -1000.0 });
        }
        assert_eq!(sim.camera().pitch(), blockyard_view::PITCH_LIMIT);
    }

    #[test]
    fn eye_never_enters_solid_cells() {
        let mut sim = running(SimConfig::default());
        for key in [Key::Forward, Key::StrafeRight] {
            sim.handle_event(InputEvent::KeyDown(key));
        }
        let radius = sim.config().collision.agent_radius;
        for _ in 0..200 {
            sim.tick().unwrap();
            let eye = sim.camera().eye();
            assert!(!collision::is_blocked(
                sim.grid(),
                glam::Vec2::new(eye.x, eye.z),
                radius
            ));
            assert_eq!(eye.y, 1.6);
        }
    }

    #[test]
    fn visibility_follows_render_radius() {
        let mut config = SimConfig::default();
        config.render_radius = 2.0;
        let mut sim = running(config);
        let frame = sim.tick().unwrap();
        let eye = sim.camera().eye();
        assert!(!frame.visible.is_empty());
        for cell in &frame.visible {
            let center = cell.coord.center();
            assert!(center.distance(glam::Vec2::new(eye.x, eye.z)) <= 2.0);
        }
    }

    #[test]
    fn orbit_mode_routes_pointer_to_orbit_camera() {
        let mut sim = running(SimConfig::default());
        sim.set_camera_mode(CameraMode::Orbit);
        let yaw = sim.camera().yaw();
        sim.handle_event(InputEvent::PointerDrag { dx: 10.0, dy: 0.0 });
        sim.handle_event(InputEvent::Scroll { delta_y: 100.0 });
        assert_eq!(sim.camera().yaw(), yaw);
        assert!((sim.orbit().yaw() - 3.0).abs() < 1e-4);
        assert!(sim.orbit().radius() > 24.0);

        let frame = sim.tick().unwrap();
        assert_eq!(frame.view, sim.orbit().view_matrix());
    }

    #[test]
    fn orbit_mode_keys_step_orbit_camera_not_walker() {
        let mut sim = running(SimConfig::default());
        sim.set_camera_mode(CameraMode::Orbit);
        let eye = sim.camera().eye();
        let radius = sim.orbit().radius();
        let center = sim.orbit().center();

        sim.handle_event(InputEvent::KeyDown(Key::StrafeLeft));
        assert!((sim.orbit().yaw() - 5.0).abs() < 1e-4);
        sim.handle_event(InputEvent::KeyDown(Key::Forward));
        assert!((sim.orbit().center().distance(center) - 0.2).abs() < 1e-4);
        assert!((sim.orbit().radius() - radius).abs() < 1e-4);

        for _ in 0..10 {
            sim.tick().unwrap();
        }
        assert_eq!(sim.camera().eye(), eye);

        sim.set_camera_mode(CameraMode::FirstPerson);
        sim.tick().unwrap();
        assert!(sim.camera().eye().x > eye.x);
    }

    #[test]
    fn tick_drains_grid_events() {
        let mut sim = running(corridor_config());
        let first = sim.tick().unwrap();
        assert!(matches!(first.grid_events.as_slice(), [GridEvent::Carved { .. }]));

        for _ in 0..100 {
            sim.handle_event(InputEvent::KeyDown(Key::AddBlock));
            sim.handle_event(InputEvent::KeyUp(Key::AddBlock));
            sim.handle_event(InputEvent::KeyDown(Key::DeleteBlock));
            sim.handle_event(InputEvent::KeyUp(Key::DeleteBlock));
            let frame = sim.tick().unwrap();
            assert_eq!(frame.grid_events.len(), 2);
            assert!(sim.grid().events().is_empty());
        }
    }

    #[test]
    fn viewport_and_zoom_reach_the_projection() {
        let mut sim = running(SimConfig::default());
        sim.set_viewport(800.0, 800.0);
        assert_eq!(sim.camera().projection.aspect, 1.0);
        assert_eq!(sim.orbit().projection.aspect, 1.0);

        sim.set_camera_mode(CameraMode::Orbit);
        let before = sim.tick().unwrap().projection;
        sim.set_orbit_zoom(0.5);
        assert_eq!(sim.orbit().projection.fov_degrees, 30.0);
        assert_ne!(sim.tick().unwrap().projection, before);
    }

    #[test]
    fn oversized_ring_still_builds() {
        let config = SimConfig::from_json_str(r#"{ "carve": { "ring": 1073741824 } }"#).unwrap();
        let sim = Simulation::new(config).unwrap();
        assert_eq!(sim.grid().height(GOAL_CELL), Some(0));
    }

    #[test]
    fn invalid_config_is_rejected() {
        let mut config = SimConfig::default();
        config.move_speed = 2.0;
        assert!(matches!(
            Simulation::new(config),
            Err(SimError::Config(ConfigError::Invalid(_)))
        ));
    }

    #[test]
    fn goal_outside_layout_is_grid_error() {
        let rows = vec![vec![0u8; 8]; 8];
        let err = Simulation::with_layout(SimConfig::default(), &rows, CellCoord::new(9, 9))
            .unwrap_err();
        assert!(matches!(err, SimError::Grid(GridError::GoalOutOfBounds(_))));
    }
}
