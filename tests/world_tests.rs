use phys_scene::{
    BodyDesc, Material, MaterialId, PhysicsWorld, ShapeDesc, SimulationConfig,
    core::BodyEventType,
    error::SimError,
    math::{Point3, Vector3},
};
use approx::assert_relative_eq;

const DT: f32 = 1.0 / 60.0;

fn ground(world: &mut PhysicsWorld, material: MaterialId) {
    world
        .add_body(BodyDesc::new_static(
            ShapeDesc::cuboid(Vector3::new(20.0, 0.5, 20.0)),
            material,
            Vector3::new(0.0, -0.5, 0.0),
        ))
        .unwrap();
}

fn stacked_world() -> PhysicsWorld {
    let mut world = PhysicsWorld::new();
    ground(&mut world, MaterialId::DEFAULT);
    for i in 0..5 {
        world
            .add_body(BodyDesc::new(
                ShapeDesc::cuboid(Vector3::repeat(0.5)),
                1.0,
                MaterialId::DEFAULT,
                Vector3::new(0.1 * i as f32, 0.5 + 1.05 * i as f32, 0.0),
            ))
            .unwrap();
    }
    world
}

#[test]
fn test_gravity_simulation() {
    let mut world = PhysicsWorld::new();
    let ball = world
        .add_body(BodyDesc::new(ShapeDesc::ball(1.0), 1.0, MaterialId::DEFAULT, Vector3::new(0.0, 10.0, 0.0)))
        .unwrap();

    let mut expected_position = Vector3::new(0.0, 10.0, 0.0);
    let mut expected_velocity = Vector3::zeros();

    for _ in 0..60 {
        world.step(DT).unwrap();

        // Semi-implicit Euler, same as the solver
        expected_velocity.y -= 9.81 * DT;
        expected_position.y += expected_velocity.y * DT;

        let state = world.body_state(ball).unwrap();
        assert!((state.position.y - expected_position.y).abs() < 0.1);
        assert!((state.linear_velocity.y - expected_velocity.y).abs() < 0.1);
    }

    assert_relative_eq!(world.get_time(), 1.0, epsilon = 1e-4);
    assert_eq!(world.step_count(), 60);
}

#[test]
fn test_static_body_stays_put() {
    let mut world = PhysicsWorld::new();
    let slab = world
        .add_body(BodyDesc::new_static(
            ShapeDesc::cuboid(Vector3::repeat(1.0)),
            MaterialId::DEFAULT,
            Vector3::new(0.0, 3.0, 0.0),
        ))
        .unwrap();

    for _ in 0..30 {
        world.step(DT).unwrap();
    }

    let state = world.body_state(slab).unwrap();
    assert_eq!(state.position, Vector3::new(0.0, 3.0, 0.0));
    assert_eq!(state.mass, 0.0);
}

#[test]
fn test_step_is_deterministic() {
    let mut a = stacked_world();
    let mut b = stacked_world();

    // Same insertion order gives the same handles
    let bodies_a: Vec<_> = a.get_events().of_type(BodyEventType::Added).iter().map(|e| e.body).collect();
    let bodies_b: Vec<_> = b.get_events().of_type(BodyEventType::Added).iter().map(|e| e.body).collect();
    assert_eq!(bodies_a, bodies_b);
    assert_eq!(bodies_a.len(), 6);

    for _ in 0..120 {
        a.step(DT).unwrap();
        b.step(DT).unwrap();
    }

    for body in bodies_a {
        let sa = a.body_state(body).unwrap();
        let sb = b.body_state(body).unwrap();
        assert_eq!(sa.position.map(f32::to_bits), sb.position.map(f32::to_bits));
        assert_eq!(sa.rotation.coords.map(f32::to_bits), sb.rotation.coords.map(f32::to_bits));
        assert_eq!(sa.linear_velocity.map(f32::to_bits), sb.linear_velocity.map(f32::to_bits));
        assert_eq!(sa.angular_velocity.map(f32::to_bits), sb.angular_velocity.map(f32::to_bits));
    }
}

#[test]
fn test_configure_before_bodies_only() {
    let mut world = PhysicsWorld::new();
    world.configure(Vector3::new(0.0, -1.62, 0.0), 8, 0.002).unwrap();
    assert_eq!(world.get_gravity(), Vector3::new(0.0, -1.62, 0.0));
    assert_eq!(world.get_config().solver_iterations, 8);

    ground(&mut world, MaterialId::DEFAULT);
    let result = world.configure(Vector3::new(0.0, -9.81, 0.0), 10, 0.001);
    assert!(matches!(result, Err(SimError::AlreadyConfigured(_))));
    assert_eq!(world.get_gravity(), Vector3::new(0.0, -1.62, 0.0));
}

#[test]
fn test_invalid_config_is_rejected() {
    let config = SimulationConfig {
        time_step: 0.0,
        ..Default::default()
    };
    assert!(matches!(PhysicsWorld::with_config(config), Err(SimError::InvalidParameter(_))));

    let mut world = PhysicsWorld::new();
    assert!(world.step(-DT).is_err());
    assert!(world.configure(Vector3::new(f32::NAN, 0.0, 0.0), 10, 0.001).is_err());
}

#[test]
fn test_contact_rules_are_unordered() {
    let mut world = PhysicsWorld::new();
    let ice = MaterialId(1);
    let rubber = MaterialId(2);

    world.add_contact_rule(ice, rubber, 0.05, 0.9).unwrap();
    assert_eq!(world.contact_rules().rule(rubber, ice), Some(&Material::new(0.05, 0.9)));
    assert!(world.contact_rules().rule(ice, ice).is_none());

    assert!(world.add_contact_rule(ice, rubber, -1.0, 0.0).is_err());
}

fn peak_rebound_velocity(restitution: f32) -> f32 {
    let floor = MaterialId(1);
    let ball_material = MaterialId(2);

    let mut world = PhysicsWorld::new();
    world.add_contact_rule(floor, ball_material, 0.5, restitution).unwrap();
    ground(&mut world, floor);
    let ball = world
        .add_body(BodyDesc::new(ShapeDesc::ball(0.5), 1.0, ball_material, Vector3::new(0.0, 2.5, 0.0)))
        .unwrap();

    let mut peak = 0.0f32;
    for _ in 0..90 {
        world.step(DT).unwrap();
        peak = peak.max(world.body_state(ball).unwrap().linear_velocity.y);
    }
    peak
}

#[test]
fn test_contact_rule_restitution_applies() {
    let bouncy = peak_rebound_velocity(0.9);
    let dead = peak_rebound_velocity(0.0);

    assert!(bouncy > 3.0, "bouncy ball only reached {}", bouncy);
    assert!(dead < 1.0, "dead ball still reached {}", dead);
}

#[test]
fn test_impulse_and_velocity() {
    let mut world = PhysicsWorld::with_config(SimulationConfig {
        gravity: Vector3::zeros(),
        ..Default::default()
    })
    .unwrap();

    let a = world
        .add_body(BodyDesc::new(ShapeDesc::cuboid(Vector3::repeat(0.5)), 2.0, MaterialId::DEFAULT, Vector3::zeros()))
        .unwrap();
    let b = world
        .add_body(BodyDesc::new(ShapeDesc::cuboid(Vector3::repeat(0.5)), 2.0, MaterialId::DEFAULT, Vector3::new(0.0, 0.0, 10.0)))
        .unwrap();
    world.step(DT).unwrap();

    world.apply_impulse(a, Vector3::new(4.0, 0.0, 0.0)).unwrap();
    world.set_velocity(b, Vector3::new(0.0, 3.0, 0.0)).unwrap();
    world.step(DT).unwrap();

    let sa = world.body_state(a).unwrap();
    let sb = world.body_state(b).unwrap();
    assert!(sa.linear_velocity.x > 0.0);
    assert_relative_eq!(sa.angular_velocity.norm(), 0.0, epsilon = 1e-6);
    assert_relative_eq!(sb.linear_velocity, Vector3::new(0.0, 3.0, 0.0), epsilon = 1e-5);

    // Off-center push adds spin
    world
        .apply_impulse_at(a, Vector3::new(0.0, 0.0, 1.0), Point3::new(0.5, 0.0, 0.0))
        .unwrap();
    world.step(DT).unwrap();
    assert!(world.body_state(a).unwrap().angular_velocity.norm() > 0.0);

    assert!(world.apply_impulse(a, Vector3::new(f32::NAN, 0.0, 0.0)).is_err());
}

#[test]
fn test_remove_body() {
    let mut world = PhysicsWorld::new();
    let body = world
        .add_body(BodyDesc::new(ShapeDesc::ball(0.5), 1.0, MaterialId::DEFAULT, Vector3::zeros()))
        .unwrap();
    assert_eq!(world.get_events().of_type(BodyEventType::Added).len(), 1);

    world.remove_body(body).unwrap();
    assert!(!world.contains(body));
    assert_eq!(world.body_count(), 0);
    assert_eq!(world.get_events().for_body(body).len(), 2);

    assert!(matches!(world.remove_body(body), Err(SimError::ResourceNotFound(_))));
    assert!(world.body_state(body).is_err());
}
