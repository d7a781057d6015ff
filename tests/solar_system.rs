use std::time::Duration;

use glam::{Mat4, Vec3};
use orrery::config::AppConfig;
use orrery::engine::core::EngineConfig;
use orrery::engine::renderer::Renderer;
use orrery::engine::resources::{DrawMode, ResourceManager};
use orrery::engine::scene::PointLight;
use orrery::engine::EngineApp;
use orrery::solar::{self, MoonConfig, PlanetConfig, SolarConfig, SolarSystem};
use orrery::{Node, NodeId, NodeKind, SceneError, SceneGraph};

fn small_config() -> SolarConfig {
    let mut config = SolarConfig::default();
    config.stars.count = 32;
    config.orbit_segments = 16;
    config.sphere_stacks = 4;
    config.sphere_sectors = 8;
    config
}

fn build(config: &SolarConfig) -> (SceneGraph, SolarSystem) {
    SolarSystem::build(config, &ResourceManager::new(), 16.0 / 9.0).expect("scene builds")
}

fn world_position(scene: &SceneGraph, id: NodeId) -> Vec3 {
    scene.node(id).unwrap().world_transform().transform_point3(Vec3::ZERO)
}

#[test]
fn default_scene_has_the_expected_hierarchy() {
    let (scene, system) = build(&small_config());
    let root = scene.root().unwrap();

    assert_eq!(scene.name(), "scene_graph_1");
    assert_eq!(scene.node(root).unwrap().name(), solar::ROOT);
    // root, camera, sun holder + geometry + light, 8 planets x 2, moon x 2
    assert_eq!(scene.len(), 23);
    assert_eq!(system.planet_holders().count(), 8);

    let camera = scene.get_child(root, solar::CAMERA).unwrap();
    assert_eq!(camera, system.camera());
    assert!(scene.node(camera).unwrap().as_camera().is_some());

    let earth = scene.get_child(root, "holder_earth").unwrap();
    let geometry = scene.get_child(earth, "geometry_earth").unwrap();
    assert!(matches!(scene.node(geometry).unwrap().kind(), NodeKind::Geometry(_)));

    let moon = scene.find_by_path("/root/holder_earth/holder_moon").unwrap();
    assert!(scene.get_child(moon, "geometry_moon").is_some());
}

#[test]
fn sun_light_is_configured_before_first_frame() {
    let (scene, system) = build(&small_config());
    let root = scene.root().unwrap();

    let light = scene
        .get_child(root, solar::SUN_HOLDER)
        .and_then(|sun| scene.get_child(sun, solar::POINT_LIGHT))
        .unwrap();
    assert_eq!(light, system.light());

    let payload = scene.node(light).unwrap().as_point_light().unwrap();
    assert_eq!(payload.color(), Some(Vec3::splat(0.5)));
    assert_eq!(payload.intensity(), Some(0.5));
}

#[test]
fn bodies_start_on_the_x_axis() {
    let (scene, _) = build(&small_config());
    let root = scene.root().unwrap();
    let earth = scene.get_child(root, "holder_earth").unwrap();
    let moon = scene.get_child(earth, "holder_moon").unwrap();
    let sun = scene.get_child(root, solar::SUN_HOLDER).unwrap();

    assert!(world_position(&scene, earth).abs_diff_eq(Vec3::new(12.0, 0.0, 0.0), 1e-5));
    assert!(world_position(&scene, moon).abs_diff_eq(Vec3::new(14.0, 0.0, 0.0), 1e-5));
    assert!(world_position(&scene, sun).abs_diff_eq(Vec3::ZERO, 1e-5));
}

#[test]
fn animation_moves_planets_and_carries_moons() {
    let (mut scene, system) = build(&small_config());
    let root = scene.root().unwrap();
    let earth = scene.get_child(root, "holder_earth").unwrap();
    let moon = scene.get_child(earth, "holder_moon").unwrap();

    let time = 0.75;
    system.animate(&mut scene, time).unwrap();

    // earth has speed factor 4, so it sweeps one radian per second
    let expected_earth = Mat4::from_rotation_y(time).transform_point3(Vec3::new(12.0, 0.0, 0.0));
    assert!(world_position(&scene, earth).abs_diff_eq(expected_earth, 1e-4));

    let moon_node = scene.node(moon).unwrap();
    let composed = scene.node(earth).unwrap().world_transform() * moon_node.local_transform();
    assert!(moon_node.world_transform().abs_diff_eq(composed, 1e-5));
    let separation = (world_position(&scene, moon) - world_position(&scene, earth)).length();
    assert!((separation - 2.0).abs() < 1e-4);
}

#[test]
fn camera_looks_down_from_above() {
    let (scene, system) = build(&small_config());
    let camera = scene.node(system.camera()).unwrap();

    assert!(world_position(&scene, system.camera()).abs_diff_eq(Vec3::new(0.0, 50.0, 0.0), 1e-4));
    let forward = camera.world_transform().transform_vector3(Vec3::NEG_Z);
    assert!(forward.abs_diff_eq(Vec3::NEG_Y, 1e-5));
}

#[test]
fn frame_contains_one_draw_call_per_geometry_node() {
    let config = small_config();
    let engine = EngineConfig {
        frames: 3,
        ..EngineConfig::default()
    };
    let mut app = EngineApp::new(engine, &config).unwrap();

    let frame = app.tick(Duration::from_secs_f32(1.0 / 60.0)).unwrap();
    assert_eq!(frame.index, 0);
    assert_eq!(frame.draw_calls.len(), 10);
    assert!(frame.light.position.abs_diff_eq(Vec3::ZERO, 1e-5));
    assert_eq!(frame.light.intensity, 0.5);

    let earth = frame.draw_call("geometry_earth").unwrap();
    assert!(earth.texture.is_some());
    assert_eq!(earth.draw_mode, DrawMode::Triangles);
    assert_eq!(earth.element_count, 4 * 8 * 6);
    assert_eq!(earth.color, Vec3::new(0.1, 1.0, 0.8));
    let expected = app.scene().node(earth.node).unwrap().world_transform();
    assert_eq!(earth.model_matrix, expected);

    // stars plus one orbit ring per planet
    assert_eq!(frame.backdrop.len(), 9);
    assert_eq!(frame.backdrop[0].draw_mode, DrawMode::Points);
    assert_eq!(frame.backdrop[0].element_count, 32);
}

#[test]
fn engine_advances_simulated_time() {
    let engine = EngineConfig {
        frames: 3,
        target_fps: 60,
        ..EngineConfig::default()
    };
    let mut app = EngineApp::new(engine, &small_config()).unwrap();
    app.run().unwrap();
    assert!((app.elapsed() - 3.0 / 60.0).abs() < 1e-4);

    let next = app.tick(Duration::from_secs_f32(1.0 / 60.0)).unwrap();
    assert_eq!(next.index, 3);
}

#[test]
fn textures_receive_handles_once() {
    let config = small_config();
    let mut resources = ResourceManager::new();
    let (mut scene, _) = SolarSystem::build(&config, &resources, 1.0).unwrap();

    assert_eq!(resources.upload_textures(&mut scene), 10);
    assert_eq!(resources.texture_count(), 10);
    assert_eq!(resources.upload_textures(&mut scene), 0);
}

#[test]
fn missing_texture_file_falls_back_to_solid_colour() {
    let mut config = small_config();
    config.planets[0].texture = Some("does/not/exist.png".into());
    let (scene, _) = build(&config);

    let mercury = scene.find("geometry_mercury").unwrap();
    let texture = scene
        .node(mercury)
        .unwrap()
        .as_geometry()
        .and_then(|geometry| geometry.texture())
        .unwrap();
    assert_eq!((texture.width(), texture.height()), (1, 1));
}

#[test]
fn unconfigured_light_fails_the_frame() {
    let mut scene = SceneGraph::with_root("bare", solar::ROOT);
    let root = scene.root().unwrap();
    let camera = scene.create_node(Node::camera(solar::CAMERA));
    scene.add_child(root, camera).unwrap();
    let sun = scene.create_node(Node::new(solar::SUN_HOLDER));
    scene.add_child(root, sun).unwrap();

    let mut light = PointLight::new();
    light.set_color(Vec3::ONE);
    let light = scene.create_node(Node::with_kind(solar::POINT_LIGHT, NodeKind::PointLight(light)));
    scene.add_child(sun, light).unwrap();

    let mut renderer = Renderer::new(solar::CAMERA, solar::SUN_HOLDER, solar::POINT_LIGHT);
    let err = renderer.render(&scene).unwrap_err();
    assert!(format!("{err:#}").contains("intensity"));
    assert_eq!(
        err.downcast_ref::<SceneError>(),
        Some(&SceneError::UninitializedAttribute {
            node: "/root/holder_sun/point_light".to_string(),
            attribute: "intensity",
        })
    );
    assert_eq!(renderer.frame_count(), 0);
}

#[test]
fn rendering_a_rootless_graph_fails() {
    let scene = SceneGraph::new("empty");
    let mut renderer = Renderer::new(solar::CAMERA, solar::SUN_HOLDER, solar::POINT_LIGHT);

    let err = renderer.render(&scene).unwrap_err();
    assert_eq!(err.downcast_ref::<SceneError>(), Some(&SceneError::NoRoot));
    assert_eq!(renderer.frame_count(), 0);
}

#[test]
fn misspelled_holder_breaks_the_light_lookup() {
    let mut scene = SceneGraph::with_root("typo", solar::ROOT);
    let root = scene.root().unwrap();
    let camera = scene.create_node(Node::camera(solar::CAMERA));
    scene.add_child(root, camera).unwrap();
    let sun = scene.create_node(Node::new("holder_suun"));
    scene.add_child(root, sun).unwrap();

    let mut renderer = Renderer::new(solar::CAMERA, solar::SUN_HOLDER, solar::POINT_LIGHT);
    assert!(renderer.render(&scene).is_err());
}

#[test]
fn duplicate_body_names_are_rejected() {
    let mut config = small_config();
    config.planets.push(PlanetConfig::new("earth", [1.0, 1.0, 1.0], 40.0, 10.0));
    let err = SolarSystem::build(&config, &ResourceManager::new(), 1.0).unwrap_err();
    assert!(format!("{err:#}").contains("holder_earth"));
}

#[test]
fn non_positive_speed_factor_is_rejected() {
    let mut config = small_config();
    config.planets[1].speed_factor = 0.0;
    assert!(SolarSystem::build(&config, &ResourceManager::new(), 1.0).is_err());
}

#[test]
fn moons_may_share_names_across_planets() {
    let mut config = small_config();
    config.planets[3].moons.push(MoonConfig {
        name: "moon".to_string(),
        color: [0.5, 0.5, 0.5],
        distance: 1.5,
        scale: 0.3,
        speed: 2.0,
        spin: 1.0,
        texture: None,
    });
    let (scene, _) = build(&config);
    assert!(scene.find_by_path("/root/holder_mars/holder_moon").is_some());
    assert!(scene.find_by_path("/root/holder_earth/holder_moon").is_some());
}

#[test]
fn same_named_moons_keep_their_own_textures() {
    let mut config = small_config();
    config.planets[3].moons.push(MoonConfig {
        name: "moon".to_string(),
        color: [1.0, 0.0, 0.0],
        distance: 1.5,
        scale: 0.3,
        speed: 2.0,
        spin: 1.0,
        texture: None,
    });
    let mut resources = ResourceManager::new();
    let (mut scene, _) = SolarSystem::build(&config, &resources, 1.0).unwrap();
    resources.upload_textures(&mut scene);

    let texture_at = |path: &str| {
        let id = scene.find_by_path(path).unwrap();
        scene.node(id).unwrap().as_geometry().unwrap().texture().unwrap().clone()
    };
    let earth_moon = texture_at("/root/holder_earth/holder_moon/geometry_moon");
    let mars_moon = texture_at("/root/holder_mars/holder_moon/geometry_moon");

    assert_ne!(earth_moon.pixels(), mars_moon.pixels());
    assert!(earth_moon.handle().is_some());
    assert_ne!(earth_moon.handle(), mars_moon.handle());
}

#[test]
fn moon_spin_is_independent_of_its_orbit() {
    let mut config = small_config();
    let moon = &mut config.planets[2].moons[0];
    moon.speed = 1.0;
    moon.spin = 3.0;
    let (mut scene, system) = build(&config);

    let time = 0.5;
    system.animate(&mut scene, time).unwrap();

    let holder = scene.find_by_path("/root/holder_earth/holder_moon").unwrap();
    let geometry = scene.get_child(holder, "geometry_moon").unwrap();
    let expected_orbit = Mat4::from_rotation_y(time) * Mat4::from_translation(Vec3::new(2.0, 0.0, 0.0));
    let expected_spin = Mat4::from_rotation_y(time * 3.0) * Mat4::from_scale(Vec3::splat(0.5));
    assert!(scene.node(holder).unwrap().local_transform().abs_diff_eq(expected_orbit, 1e-5));
    assert!(scene.node(geometry).unwrap().local_transform().abs_diff_eq(expected_spin, 1e-5));
}

#[test]
fn infinite_starfield_extent_is_rejected() {
    let mut config = small_config();
    config.stars.extent = f32::INFINITY;
    let err = SolarSystem::build(&config, &ResourceManager::new(), 1.0).unwrap_err();
    assert!(format!("{err:#}").contains("extent"));
}

#[test]
fn shipped_configuration_parses() {
    let config = AppConfig::from_ron_str(include_str!("../config/solar_system.ron")).unwrap();
    assert_eq!(config.engine.frames, 600);
    assert_eq!(config.solar.planets.len(), 8);
    let earth = config.solar.planets.iter().find(|p| p.name == "earth").unwrap();
    assert_eq!(earth.moons.len(), 1);
    assert_eq!(earth.moons[0].scale, 0.5);
    assert_eq!(config.solar.planets[0].spin, 1.0);
}

#[test]
fn partial_configuration_fills_in_defaults() {
    let config = AppConfig::from_ron_str("(engine: (frames: 5))").unwrap();
    assert_eq!(config.engine.frames, 5);
    assert_eq!(config.engine.target_fps, 60);
    assert_eq!(config.solar.planets.len(), 8);

    let text = config.to_ron_string().unwrap();
    let reparsed = AppConfig::from_ron_str(&text).unwrap();
    assert_eq!(reparsed.engine.frames, 5);
    assert_eq!(reparsed.solar.scene_name, config.solar.scene_name);

    assert!(AppConfig::from_ron_str("(engine: (frames: \"many\"))").is_err());
}
