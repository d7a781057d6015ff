use std::path::PathBuf;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SolarConfig {
    pub scene_name: String,
    pub sun: SunConfig,
    pub planets: Vec<PlanetConfig>,
    pub camera: CameraConfig,
    pub stars: StarfieldConfig,
    /// Vertices per orbit ring; 0 disables the rings.
    pub orbit_segments: u32,
    pub sphere_stacks: u32,
    pub sphere_sectors: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SunConfig {
    pub color: [f32; 3],
    pub scale: f32,
    pub light_color: [f32; 3],
    pub light_intensity: f32,
    pub texture: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanetConfig {
    /// Bare body name; the holder becomes `holder_<name>`.
    pub name: String,
    pub color: [f32; 3],
    pub distance: f32,
    /// Orbit period divisor: the planet sweeps `4 / speed_factor` rad/s.
    pub speed_factor: f32,
    #[serde(default = "default_spin")]
    pub spin: f32,
    #[serde(default = "default_scale")]
    pub scale: f32,
    #[serde(default)]
    pub texture: Option<PathBuf>,
    #[serde(default)]
    pub moons: Vec<MoonConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoonConfig {
    pub name: String,
    pub color: [f32; 3],
    pub distance: f32,
    #[serde(default = "default_moon_scale")]
    pub scale: f32,
    /// Orbit angular speed in rad/s around the parent planet.
    #[serde(default = "default_spin")]
    pub speed: f32,
    /// Self-rotation in rad/s, independent of the orbit.
    #[serde(default = "default_spin")]
    pub spin: f32,
    #[serde(default)]
    pub texture: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub position: [f32; 3],
    /// Pitch in degrees; -90 looks straight down onto the orbital plane.
    pub pitch_degrees: f32,
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StarfieldConfig {
    pub count: u32,
    pub extent: f32,
    pub seed: u64,
}

fn default_spin() -> f32 {
    1.0
}

fn default_scale() -> f32 {
    1.0
}

fn default_moon_scale() -> f32 {
    0.5
}

impl Default for SunConfig {
    fn default() -> Self {
        Self {
            color: [1.0, 1.0, 1.0],
            scale: 1.8,
            light_color: [0.5, 0.5, 0.5],
            light_intensity: 0.5,
            texture: None,
        }
    }
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: [0.0, 50.0, 0.0],
            pitch_degrees: -90.0,
            fov_degrees: 60.0,
            near: 0.1,
            far: 200.0,
        }
    }
}

impl Default for StarfieldConfig {
    fn default() -> Self {
        Self {
            count: 3000,
            extent: 100.0,
            seed: 0x5eed,
        }
    }
}

impl PlanetConfig {
    pub fn new(name: impl Into<String>, color: [f32; 3], distance: f32, speed_factor: f32) -> Self {
        Self {
            name: name.into(),
            color,
            distance,
            speed_factor,
            spin: default_spin(),
            scale: default_scale(),
            texture: None,
            moons: Vec::new(),
        }
    }
}

impl Default for SolarConfig {
    fn default() -> Self {
        let bodies: [(&str, [f32; 3]); 8] = [
            ("mercury", [1.0, 1.0, 0.3]),
            ("venus", [0.8, 0.1, 0.4]),
            ("earth", [0.1, 1.0, 0.8]),
            ("mars", [0.8, 0.2, 0.7]),
            ("jupiter", [0.8, 1.0, 0.1]),
            ("saturn", [0.8, 0.4, 0.6]),
            ("uranus", [0.6, 0.7, 0.2]),
            ("neptune", [0.3, 0.3, 0.7]),
        ];

        let planets = bodies
            .iter()
            .enumerate()
            .map(|(i, &(name, color))| {
                // the sun sits at distance 0 with speed factor 1
                let mut planet =
                    PlanetConfig::new(name, color, 4.0 * (i + 1) as f32, (i + 2) as f32);
                if name == "earth" {
                    planet.moons.push(MoonConfig {
                        name: "moon".to_string(),
                        color: [0.3, 0.3, 0.8],
                        distance: 2.0,
                        scale: default_moon_scale(),
                        speed: default_spin(),
                        spin: default_spin(),
                        texture: None,
                    });
                }
                planet
            })
            .collect();

        Self {
            scene_name: "scene_graph_1".to_string(),
            sun: SunConfig::default(),
            planets,
            camera: CameraConfig::default(),
            stars: StarfieldConfig::default(),
            orbit_segments: 720,
            sphere_stacks: 16,
            sphere_sectors: 32,
        }
    }
}
