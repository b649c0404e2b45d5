use phys_scene::{
    BodyDesc, ChainSequencer, MaterialId, MeshGeometry, ShapeDesc, SimulationConfig, SimulationContext, SpacingRule,
    chain::ChainConfig,
    error::SimError,
    math::{Axis, Point3, Vector3},
    scene::GeometryId,
};
use approx::assert_relative_eq;

const DT: f32 = 1.0 / 60.0;

fn weightless() -> SimulationContext {
    let _ = env_logger::builder().is_test(true).try_init();
    SimulationContext::new(SimulationConfig {
        gravity: Vector3::zeros(),
        ..Default::default()
    })
    .unwrap()
}

fn domino(ctx: &mut SimulationContext) -> GeometryId {
    ctx.scene.add_geometry(MeshGeometry::cuboid(0.2, 1.0, 0.5))
}

#[test]
fn test_place_along_x() {
    let mut ctx = weightless();
    let geometry = domino(&mut ctx);
    let mut chain = ChainSequencer::new(geometry, 1.0, MaterialId::DEFAULT);

    let placed = chain
        .place(&mut ctx, 10, SpacingRule::Fixed(2.0), Vector3::zeros(), Axis::X.direction())
        .unwrap()
        .len();
    assert_eq!(placed, 10);

    let positions = chain.positions(&ctx).unwrap();
    for (i, position) in positions.iter().enumerate() {
        assert_eq!(*position, Vector3::new(2.0 * i as f32, 0.0, 0.0));
    }
    assert_eq!(chain.lead(), Some(chain.bindings()[0]));
    assert_eq!(ctx.registry.len(), 10);
    assert_eq!(ctx.shapes.cached(), 1);
}

#[test]
fn test_trigger_moves_only_the_lead() {
    let mut ctx = weightless();
    let geometry = domino(&mut ctx);
    let mut chain = ChainSequencer::new(geometry, 1.0, MaterialId::DEFAULT);
    chain
        .place(&mut ctx, 10, SpacingRule::Fixed(2.0), Vector3::zeros(), Axis::X.direction())
        .unwrap();
    ctx.world.step(DT).unwrap();

    chain
        .trigger(&mut ctx, Vector3::new(0.5, 0.0, 0.0), Point3::new(0.0, 0.4, 0.0))
        .unwrap();
    ctx.world.step(DT).unwrap();

    let bodies: Vec<_> = chain
        .bindings()
        .iter()
        .map(|h| ctx.registry.get(*h).unwrap().body)
        .collect();

    let lead = ctx.world.body_state(bodies[0]).unwrap();
    assert!(lead.linear_velocity.x > 0.0);
    assert!(lead.angular_velocity.norm() > 0.0);

    for body in &bodies[1..] {
        let state = ctx.world.body_state(*body).unwrap();
        assert_eq!(state.linear_velocity, Vector3::zeros());
        assert_eq!(state.angular_velocity, Vector3::zeros());
    }
}

#[test]
fn test_trigger_velocity() {
    let mut ctx = weightless();
    let geometry = domino(&mut ctx);
    let mut chain = ChainSequencer::new(geometry, 1.0, MaterialId::DEFAULT);
    chain
        .place(&mut ctx, 3, SpacingRule::Fixed(1.0), Vector3::zeros(), Axis::Z.direction())
        .unwrap();

    chain.trigger_velocity(&mut ctx, Vector3::new(0.0, 0.0, 2.0)).unwrap();

    let lead = ctx.registry.get(chain.bindings()[0]).unwrap().body;
    assert_relative_eq!(ctx.world.body_state(lead).unwrap().linear_velocity, Vector3::new(0.0, 0.0, 2.0));
}

#[test]
fn test_trigger_on_empty_chain_fails() {
    let mut ctx = weightless();
    let geometry = domino(&mut ctx);
    let chain = ChainSequencer::new(geometry, 1.0, MaterialId::DEFAULT);

    let result = chain.trigger(&mut ctx, Vector3::new(1.0, 0.0, 0.0), Point3::origin());
    assert_eq!(result, Err(SimError::EmptySequence));
    assert_eq!(chain.trigger_velocity(&mut ctx, Vector3::x()), Err(SimError::EmptySequence));

    let mut empty = ChainSequencer::new(geometry, 1.0, MaterialId::DEFAULT);
    empty
        .place(&mut ctx, 0, SpacingRule::Fixed(1.0), Vector3::zeros(), Axis::X.direction())
        .unwrap();
    assert!(empty.is_empty());
    assert_eq!(empty.trigger(&mut ctx, Vector3::x(), Point3::origin()), Err(SimError::EmptySequence));
}

#[test]
fn test_spacing_must_clear_extent() {
    let mut ctx = weightless();
    let geometry = domino(&mut ctx);
    let mut chain = ChainSequencer::new(geometry, 1.0, MaterialId::DEFAULT);

    // Dominoes are 0.2 thick along X but 1.0 tall along Y
    let result = chain.place(&mut ctx, 5, SpacingRule::Fixed(0.15), Vector3::zeros(), Axis::X.direction());
    assert!(matches!(result, Err(SimError::InvalidParameter(_))));
    let result = chain.place(&mut ctx, 5, SpacingRule::Fixed(0.6), Vector3::zeros(), Axis::Y.direction());
    assert!(matches!(result, Err(SimError::InvalidParameter(_))));
    assert_eq!(ctx.world.body_count(), 0);
    assert_eq!(ctx.scene.node_count(), 0);

    chain
        .place(&mut ctx, 4, SpacingRule::FromBounds { factor: 3.0 }, Vector3::zeros(), Axis::X.direction())
        .unwrap();
    let positions = chain.positions(&ctx).unwrap();
    assert_relative_eq!(positions[3].x, 1.8, epsilon = 1e-5);
}

#[test]
fn test_explicit_shape_and_replacing() {
    let mut ctx = weightless();
    let geometry = domino(&mut ctx);
    let mut chain = ChainSequencer::new(geometry, 1.0, MaterialId::DEFAULT).with_shape(ShapeDesc::ball(0.25));

    chain
        .place(&mut ctx, 2, SpacingRule::Fixed(1.0), Vector3::zeros(), Axis::X.direction())
        .unwrap();
    assert_eq!(ctx.shapes.cached(), 0);

    let again = chain.place(&mut ctx, 2, SpacingRule::Fixed(1.0), Vector3::zeros(), Axis::X.direction());
    assert!(matches!(again, Err(SimError::AlreadyConfigured(_))));

    chain.clear(&mut ctx).unwrap();
    assert!(chain.is_empty());
    assert_eq!(ctx.world.body_count(), 0);
    assert_eq!(ctx.scene.node_count(), 0);
}

#[test]
fn test_build_from_config_alternates_yaw() {
    let mut ctx = weightless();
    let geometry = domino(&mut ctx);
    let config = ChainConfig {
        count: 4,
        spacing: SpacingRule::Fixed(1.0),
        axis: Axis::X,
        start: Vector3::new(-2.0, 0.5, 0.0),
        yaw_offset: 0.1,
        ..Default::default()
    };

    let chain = ChainSequencer::build(&mut ctx, geometry, &config).unwrap();
    assert_eq!(chain.len(), 4);

    let yaws: Vec<f32> = chain
        .bindings()
        .iter()
        .map(|h| {
            let body = ctx.registry.get(*h).unwrap().body;
            let rotation = ctx.world.body_state(body).unwrap().rotation;
            rotation.scaled_axis().y
        })
        .collect();
    assert_relative_eq!(yaws[0], 0.1, epsilon = 1e-5);
    assert_relative_eq!(yaws[1], -0.1, epsilon = 1e-5);
    assert_relative_eq!(yaws[2], 0.1, epsilon = 1e-5);

    let bad = ChainConfig {
        mass: 0.0,
        ..Default::default()
    };
    assert!(ChainSequencer::build(&mut ctx, geometry, &bad).is_err());
}

#[test]
fn test_chain_reaction_topples_the_row() {
    let _ = env_logger::builder().is_test(true).try_init();
    let mut ctx = SimulationContext::new(SimulationConfig::default()).unwrap();
    ctx.world
        .add_body(BodyDesc::new_static(
            ShapeDesc::cuboid(Vector3::new(20.0, 0.5, 20.0)),
            MaterialId::DEFAULT,
            Vector3::new(0.0, -0.5, 0.0),
        ))
        .unwrap();

    let geometry = domino(&mut ctx);
    let mut chain = ChainSequencer::new(geometry, 1.0, MaterialId::DEFAULT);
    chain
        .place(&mut ctx, 5, SpacingRule::Fixed(0.6), Vector3::new(0.0, 0.5, 0.0), Axis::X.direction())
        .unwrap();

    // Let the row settle, then push the lead near its top
    for _ in 0..10 {
        ctx.world.step(DT).unwrap();
    }
    chain
        .trigger(&mut ctx, Vector3::new(0.6, 0.0, 0.0), Point3::new(0.0, 0.9, 0.0))
        .unwrap();
    for _ in 0..240 {
        ctx.world.step(DT).unwrap();
    }

    let second = ctx.registry.get(chain.bindings()[1]).unwrap().body;
    let tilt = ctx.world.body_state(second).unwrap().rotation.angle();
    assert!(tilt > 0.2, "second domino only tilted {} rad", tilt);
}

#[test]
fn test_invalid_mass_leaves_nothing_behind() {
    let mut ctx = weightless();
    let geometry = domino(&mut ctx);

    for mass in [-1.0, 0.0, f32::NAN] {
        let mut chain = ChainSequencer::new(geometry, mass, MaterialId::DEFAULT);
        let result = chain.place(&mut ctx, 3, SpacingRule::Fixed(1.0), Vector3::zeros(), Axis::X.direction());
        assert!(matches!(result, Err(SimError::InvalidParameter(_))));
        assert!(chain.is_empty());
    }

    assert_eq!(ctx.scene.node_count(), 0);
    assert_eq!(ctx.world.body_count(), 0);
    assert!(ctx.registry.is_empty());
}

#[test]
fn test_failure_midway_rolls_back_the_chain() {
    let mut ctx = weightless();
    let geometry = domino(&mut ctx);
    let mut chain = ChainSequencer::new(geometry, 1.0, MaterialId::DEFAULT);

    // The fourth position overflows to infinity and is refused
    let result = chain.place(&mut ctx, 5, SpacingRule::Fixed(1e38), Vector3::new(1e38, 0.0, 0.0), Axis::X.direction());
    assert!(matches!(result, Err(SimError::InvalidParameter(_))));

    assert!(chain.is_empty());
    assert_eq!(ctx.scene.node_count(), 0);
    assert_eq!(ctx.world.body_count(), 0);
    assert!(ctx.registry.is_empty());

    // The sequencer is usable again afterwards
    chain
        .place(&mut ctx, 2, SpacingRule::Fixed(1.0), Vector3::zeros(), Axis::X.direction())
        .unwrap();
    assert_eq!(ctx.world.body_count(), 2);
}
