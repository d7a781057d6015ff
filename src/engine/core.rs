use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub app_name: String,
    pub window_width: u32,
    pub window_height: u32,
    pub target_fps: u32,
    /// Frames to simulate before the headless loop exits.
    pub frames: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            app_name: "Orrery".to_string(),
            window_width: 1280,
            window_height: 720,
            target_fps: 60,
            frames: 600,
        }
    }
}

impl EngineConfig {
    pub fn aspect_ratio(&self) -> f32 {
        self.window_width.max(1) as f32 / self.window_height.max(1) as f32
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct FrameTiming {
    pub delta_seconds: f32,
    pub fps: f32,
}

impl FrameTiming {
    pub fn from_delta(delta_seconds: f32) -> Self {
        let fps = if delta_seconds > 0.0 {
            1.0 / delta_seconds
        } else {
            0.0
        };
        Self { delta_seconds, fps }
    }
}

/// Slack for frame deltas that went through `Duration` and lost a few ulps.
const STEP_EPSILON: f32 = 1e-6;

pub struct FixedTimestep {
    frame_duration: f32,
    accumulator: f32,
}

impl FixedTimestep {
    pub fn from_fps(fps: u32) -> Self {
        let frame_duration = 1.0 / fps.max(1) as f32;
        Self {
            frame_duration,
            accumulator: 0.0,
        }
    }

    pub fn frame_duration(&self) -> f32 {
        self.frame_duration
    }

    pub fn accumulate(&mut self, delta: f32) {
        self.accumulator += delta;
    }

    pub fn should_step(&mut self) -> bool {
        if self.accumulator + STEP_EPSILON >= self.frame_duration {
            self.accumulator -= self.frame_duration;
            true
        } else {
            false
        }
    }
}
