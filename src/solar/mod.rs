//! Builds the solar-system scene graph and animates it frame by frame.
//!
//! Layout under the root:
//!
//! ```text
//! root
//!     camera
//!     holder_sun
//!         sun_geometry
//!         point_light
//!     holder_<planet>
//!         geometry_<planet>
//!         holder_<moon>
//!             geometry_<moon>
//! ```
//!
//! The driver finds nodes by these exact names, so they only ever come from
//! the constants and helpers below.

pub mod backdrop;
pub mod config;

use std::path::Path;

use anyhow::{ensure, Context, Result};
use glam::{Mat4, Vec3};

use crate::engine::renderer::BackdropLayer;
use crate::engine::resources::{Model, ResourceManager, Texture};
use crate::engine::scene::{
    Camera, Geometry, Node, NodeId, NodeKind, PointLight, SceneError, SceneGraph, SceneResult,
};
pub use config::{CameraConfig, MoonConfig, PlanetConfig, SolarConfig, StarfieldConfig, SunConfig};

pub const ROOT: &str = "root";
pub const CAMERA: &str = "camera";
pub const SUN_HOLDER: &str = "holder_sun";
pub const SUN_GEOMETRY: &str = "sun_geometry";
pub const POINT_LIGHT: &str = "point_light";

/// Angular speed numerator shared by every orbit: a body with speed factor
/// `k` sweeps `ORBIT_RATE / k` radians per second.
pub const ORBIT_RATE: f32 = 4.0;

pub fn holder_name(body: &str) -> String {
    format!("holder_{body}")
}

pub fn geometry_name(body: &str) -> String {
    format!("geometry_{body}")
}

/// Handles and motion parameters of one orbiting body.
#[derive(Debug, Clone)]
struct Body {
    holder: NodeId,
    geometry: NodeId,
    orbit_radius: f32,
    orbit_speed: f32,
    spin: f32,
    scale: f32,
}

impl Body {
    fn holder_transform(&self, time: f32) -> Mat4 {
        Mat4::from_rotation_y(time * self.orbit_speed)
            * Mat4::from_translation(Vec3::new(self.orbit_radius, 0.0, 0.0))
    }

    fn geometry_transform(&self, time: f32) -> Mat4 {
        Mat4::from_rotation_y(time * self.spin) * Mat4::from_scale(Vec3::splat(self.scale))
    }
}

#[derive(Debug, Clone)]
struct Planet {
    body: Body,
    moons: Vec<Body>,
}

/// Time-varying part of the scene: which nodes move and how.
#[derive(Debug, Clone)]
pub struct SolarSystem {
    camera: NodeId,
    light: NodeId,
    sun: Body,
    planets: Vec<Planet>,
}

impl SolarSystem {
    /// Build the scene graph described by `config`. Textures that fail to load
    /// fall back to a solid texture of the body's colour.
    pub fn build(
        config: &SolarConfig,
        resources: &ResourceManager,
        aspect_ratio: f32,
    ) -> Result<(SceneGraph, Self)> {
        ensure!(
            config.stars.extent.is_finite(),
            "starfield extent must be finite, got {}",
            config.stars.extent
        );
        let mut scene = SceneGraph::with_root(config.scene_name.clone(), ROOT);
        let root = scene.root().ok_or(SceneError::NoRoot)?;
        let sphere = Model::uv_sphere(config.sphere_stacks, config.sphere_sectors);

        let camera = create_camera(&mut scene, root, &config.camera, aspect_ratio)
            .context("creating camera")?;

        let sun_config = &config.sun;
        let sun_holder = attach(&mut scene, root, Node::new(SUN_HOLDER))?;
        let sun_color = Vec3::from_array(sun_config.color);
        let sun_geometry = attach(
            &mut scene,
            sun_holder,
            Node::geometry(
                SUN_GEOMETRY,
                Geometry::new(sphere.clone(), sun_color).with_texture(texture_for(
                    resources,
                    SUN_GEOMETRY,
                    sun_config.texture.as_deref(),
                    sun_color,
                )),
            ),
        )?;

        let mut light = PointLight::new();
        light.set_color(Vec3::from_array(sun_config.light_color));
        light.set_intensity(sun_config.light_intensity);
        let light = attach(
            &mut scene,
            sun_holder,
            Node::with_kind(POINT_LIGHT, NodeKind::PointLight(light)),
        )?;

        let sun = Body {
            holder: sun_holder,
            geometry: sun_geometry,
            orbit_radius: 0.0,
            orbit_speed: ORBIT_RATE,
            spin: 1.0,
            scale: sun_config.scale,
        };

        let mut planets = Vec::with_capacity(config.planets.len());
        for planet in &config.planets {
            ensure!(
                planet.speed_factor > 0.0,
                "planet `{}` needs a positive speed factor, got {}",
                planet.name,
                planet.speed_factor
            );
            let body = create_body(
                &mut scene,
                root,
                &sphere,
                resources,
                BodyParams {
                    name: &planet.name,
                    color: planet.color,
                    texture: planet.texture.as_deref(),
                    orbit_radius: planet.distance,
                    orbit_speed: ORBIT_RATE / planet.speed_factor,
                    spin: planet.spin,
                    scale: planet.scale,
                },
            )
            .with_context(|| format!("creating planet `{}`", planet.name))?;

            let moons = planet
                .moons
                .iter()
                .map(|moon| {
                    create_body(
                        &mut scene,
                        body.holder,
                        &sphere,
                        resources,
                        BodyParams {
                            name: &moon.name,
                            color: moon.color,
                            texture: moon.texture.as_deref(),
                            orbit_radius: moon.distance,
                            orbit_speed: moon.speed,
                            spin: moon.spin,
                            scale: moon.scale,
                        },
                    )
                    .with_context(|| format!("creating moon `{}` of `{}`", moon.name, planet.name))
                })
                .collect::<Result<Vec<_>>>()?;

            planets.push(Planet { body, moons });
        }

        tracing::info!(
            scene = %scene.name(),
            nodes = scene.len(),
            planets = planets.len(),
            "solar system built"
        );

        let system = Self {
            camera,
            light,
            sun,
            planets,
        };
        system.animate(&mut scene, 0.0)?;
        Ok((scene, system))
    }

    pub fn camera(&self) -> NodeId {
        self.camera
    }

    pub fn light(&self) -> NodeId {
        self.light
    }

    pub fn sun_holder(&self) -> NodeId {
        self.sun.holder
    }

    pub fn planet_holders(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.planets.iter().map(|planet| planet.body.holder)
    }

    /// Set every body's local transforms for `time` seconds and propagate
    /// world transforms through the whole graph.
    pub fn animate(&self, scene: &mut SceneGraph, time: f32) -> SceneResult<()> {
        let bodies = std::iter::once(&self.sun).chain(
            self.planets
                .iter()
                .flat_map(|planet| std::iter::once(&planet.body).chain(planet.moons.iter())),
        );
        for body in bodies {
            set_local(scene, body.holder, body.holder_transform(time))?;
            set_local(scene, body.geometry, body.geometry_transform(time))?;
        }
        scene.update_world_transforms();
        tracing::trace!(time, "solar system animated");
        Ok(())
    }

    /// Starfield plus one orbit ring per planet.
    pub fn backdrop(&self, config: &SolarConfig) -> Vec<BackdropLayer> {
        let stars = &config.stars;
        let mut layers = vec![BackdropLayer {
            label: "stars".to_string(),
            model: backdrop::starfield(stars.count, stars.extent, stars.seed),
            instances: vec![Mat4::IDENTITY],
        }];
        if config.orbit_segments > 0 {
            layers.push(BackdropLayer {
                label: "orbits".to_string(),
                model: backdrop::orbit_ring(config.orbit_segments),
                instances: self
                    .planets
                    .iter()
                    .map(|planet| {
                        let r = planet.body.orbit_radius;
                        Mat4::from_scale(Vec3::new(r, 1.0, r))
                    })
                    .collect(),
            });
        }
        layers
    }
}

struct BodyParams<'a> {
    name: &'a str,
    color: [f32; 3],
    texture: Option<&'a Path>,
    orbit_radius: f32,
    orbit_speed: f32,
    spin: f32,
    scale: f32,
}

fn create_body(
    scene: &mut SceneGraph,
    parent: NodeId,
    sphere: &Model,
    resources: &ResourceManager,
    params: BodyParams<'_>,
) -> Result<Body> {
    let color = Vec3::from_array(params.color);
    let holder = attach(scene, parent, Node::new(holder_name(params.name)))?;
    let geometry_node = geometry_name(params.name);
    let texture = texture_for(resources, &geometry_node, params.texture, color);
    let geometry = attach(
        scene,
        holder,
        Node::geometry(geometry_node, Geometry::new(sphere.clone(), color).with_texture(texture)),
    )?;

    Ok(Body {
        holder,
        geometry,
        orbit_radius: params.orbit_radius,
        orbit_speed: params.orbit_speed,
        spin: params.spin,
        scale: params.scale,
    })
}

fn create_camera(
    scene: &mut SceneGraph,
    root: NodeId,
    config: &CameraConfig,
    aspect_ratio: f32,
) -> SceneResult<NodeId> {
    let mut camera = Camera::new();
    camera.set_perspective_projection(
        config.fov_degrees.to_radians(),
        aspect_ratio,
        config.near,
        config.far,
    );
    let placement = Mat4::from_translation(Vec3::from_array(config.position))
        * Mat4::from_rotation_x(config.pitch_degrees.to_radians());

    attach(
        scene,
        root,
        Node::with_kind(CAMERA, NodeKind::Camera(camera)).with_local_transform(placement),
    )
}

fn attach(scene: &mut SceneGraph, parent: NodeId, node: Node) -> SceneResult<NodeId> {
    let id = scene.create_node(node);
    scene.add_child(parent, id)?;
    Ok(id)
}

fn set_local(scene: &mut SceneGraph, id: NodeId, transform: Mat4) -> SceneResult<()> {
    scene
        .node_mut(id)
        .ok_or(SceneError::StaleNode(id))?
        .set_local_transform(transform);
    Ok(())
}

fn texture_for(
    resources: &ResourceManager,
    key: &str,
    path: Option<&Path>,
    color: Vec3,
) -> Texture {
    match path.map(|path| resources.load_texture(path)) {
        Some(Ok(texture)) => texture,
        Some(Err(err)) => {
            tracing::warn!(%key, error = %format!("{err:#}"), "texture unavailable, using solid colour");
            Texture::solid(color)
        }
        None => Texture::solid(color),
    }
}
