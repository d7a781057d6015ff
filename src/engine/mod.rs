pub mod core;
pub mod renderer;
pub mod resources;
pub mod scene;

use std::time::Duration;

use anyhow::{Context, Result};
use self::core::{EngineConfig, FixedTimestep, FrameTiming};
use renderer::{Frame, Renderer};
use resources::ResourceManager;
use scene::SceneGraph;

use crate::solar::{self, SolarConfig, SolarSystem};

/// Owns the scene graph and drives it one frame at a time: animate local
/// transforms, propagate world transforms, record draw calls.
pub struct EngineApp {
    config: EngineConfig,
    resources: ResourceManager,
    scene: SceneGraph,
    solar: SolarSystem,
    renderer: Renderer,
    timestep: FixedTimestep,
    timing: FrameTiming,
    elapsed: f32,
}

impl EngineApp {
    pub fn new(config: EngineConfig, solar_config: &SolarConfig) -> Result<Self> {
        let mut resources = ResourceManager::new();
        let (mut scene, solar) = SolarSystem::build(solar_config, &resources, config.aspect_ratio())
            .context("failed to build the solar system scene")?;
        let uploaded = resources.upload_textures(&mut scene);

        let mut renderer = Renderer::new(solar::CAMERA, solar::SUN_HOLDER, solar::POINT_LIGHT);
        for layer in solar.backdrop(solar_config) {
            renderer.add_backdrop(layer);
        }

        tracing::debug!(target: "engine", uploaded, "textures uploaded");
        tracing::info!(target: "engine", "scene graph:\n{}", scene.print_graph());

        Ok(Self {
            timestep: FixedTimestep::from_fps(config.target_fps),
            config,
            resources,
            scene,
            solar,
            renderer,
            timing: FrameTiming::default(),
            elapsed: 0.0,
        })
    }

    /// Run `config.frames` frames on a simulated clock.
    pub fn run(&mut self) -> Result<()> {
        tracing::info!(target: "engine", app = %self.config.app_name, frames = self.config.frames, "Engine starting");

        let frame_duration = Duration::from_secs_f32(self.timestep.frame_duration());
        for _ in 0..self.config.frames {
            self.tick(frame_duration)?;
        }

        tracing::info!(
            target: "engine",
            frames = self.renderer.frame_count(),
            simulated_seconds = self.elapsed,
            "Engine shutdown complete"
        );
        Ok(())
    }

    /// Advance the clock by `delta`, update the scene and render it.
    pub fn tick(&mut self, delta: Duration) -> Result<Frame> {
        self.timing = FrameTiming::from_delta(delta.as_secs_f32());
        self.timestep.accumulate(self.timing.delta_seconds);
        while self.timestep.should_step() {
            self.elapsed += self.timestep.frame_duration();
        }

        self.solar
            .animate(&mut self.scene, self.elapsed)
            .context("failed to animate the scene")?;
        let frame = self.renderer.render(&self.scene)?;

        tracing::debug!(
            target: "engine",
            frame = frame.index,
            frame_delta_ms = %delta.as_millis(),
            fps = self.timing.fps,
            draw_calls = frame.draw_calls.len(),
            scene_nodes = self.scene.len(),
            texture_count = self.resources.texture_count(),
            "frame tick"
        );
        Ok(frame)
    }

    pub fn scene(&self) -> &SceneGraph {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut SceneGraph {
        &mut self.scene
    }

    pub fn solar(&self) -> &SolarSystem {
        &self.solar
    }

    /// Simulated seconds since start.
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }
}
