//! Bevy integration.
//!
//! A paddle rig lives on the craft's rigid body entity. The pose system reads
//! the hand target entities every frame, constrains them against the Rapier
//! scene and places the paddle entity. The force system runs in
//! `FixedUpdate`, reads the blade entities and accumulates each tick's blade
//! forces, scaled by the tick length, into the craft's [`ExternalImpulse`].
//! Rapier applies and clears that impulse on its next step, however many
//! fixed ticks ran in between.

use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

use crate::blade::{BladeFrame, CraftBody};
use crate::collision::RapierScene;
use crate::config::PaddleConfig;
use crate::controller::PaddleController;
use crate::diagnostics::{PaddleEvent, Side};
use crate::follow::{follow_targets, FollowWithOffset};
use crate::pose::HandPair;
use crate::ripple::RippleField;
use crate::sets::{PaddleFixedSet, PaddleUpdateSet};
use crate::water::WaterOracle;

/// Entities making up one blade.
#[derive(Clone, Copy, Debug, Reflect)]
pub struct BladeLink {
    /// Blade root; its up axis is the blade face normal.
    pub root: Entity,
    /// Blade tip; force application and submersion test point.
    pub tip: Entity,
}

/// Links a craft entity to the entities that drive and display its paddle.
///
/// The paddle entity is expected to be top level: the pose system writes
/// world-space values into its [`Transform`].
#[derive(Component, Clone, Copy, Debug, Reflect)]
#[reflect(Component)]
#[require(PaddleController, ExternalImpulse)]
pub struct PaddleRig {
    pub left_hand: Entity,
    pub right_hand: Entity,
    pub paddle: Entity,
    pub blades: [BladeLink; 2],
}

impl PaddleRig {
    pub fn blade(&self, side: Side) -> BladeLink {
        self.blades[side.index()]
    }
}

/// Water the blades push against. Without it the force system does nothing.
#[derive(Resource)]
pub struct PaddleWater(pub Box<dyn WaterOracle + Send + Sync>);

impl PaddleWater {
    pub fn new(oracle: impl WaterOracle + Send + Sync + 'static) -> Self {
        Self(Box::new(oracle))
    }
}

/// [`CraftBody`] over a Rapier body's [`ExternalImpulse`].
///
/// A force held for `dt` seconds is added as the impulse `force * dt`. Torque
/// is taken about the body's world-space centre of mass.
pub struct ExternalImpulseBody<'a> {
    pub external: &'a mut ExternalImpulse,
    pub center_of_mass: Vec3,
    pub rotation: Quat,
    pub dt: f32,
}

impl CraftBody for ExternalImpulseBody<'_> {
    fn rotation(&self) -> Quat {
        self.rotation
    }

    fn apply_force_at_point(&mut self, force: Vec3, point: Vec3) {
        let impulse = force * self.dt;
        self.external.impulse += impulse;
        self.external.torque_impulse += (point - self.center_of_mass).cross(impulse);
    }
}

#[derive(Default)]
pub struct PaddlePlugin {
    pub config: PaddleConfig,
}

impl Plugin for PaddlePlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(self.config.clone().validated())
            .init_resource::<RippleField>()
            .add_event::<PaddleEvent>()
            .register_type::<PaddleConfig>()
            .register_type::<PaddleRig>()
            .register_type::<PaddleController>()
            .register_type::<FollowWithOffset>()
            .configure_sets(FixedUpdate, (PaddleFixedSet::Water, PaddleFixedSet::Forces).chain())
            .add_systems(Update, update_paddle_pose.in_set(PaddleUpdateSet::Pose))
            .add_systems(
                FixedUpdate,
                (
                    tick_water_clock.in_set(PaddleFixedSet::Water),
                    apply_blade_forces.in_set(PaddleFixedSet::Forces),
                ),
            )
            .add_systems(
                PostUpdate,
                (feed_ripples, follow_targets)
                    .in_set(PaddleUpdateSet::Presentation)
                    .before(TransformSystem::TransformPropagate),
            );
    }
}

pub fn update_paddle_pose(
    config: Res<PaddleConfig>,
    mut rigs: Query<(&PaddleRig, &mut PaddleController)>,
    targets: Query<&GlobalTransform>,
    mut transforms: Query<&mut Transform>,
    rapier_context: Query<(
        &RapierContextColliders,
        &RapierRigidBodySet,
        &RapierQueryPipeline,
    )>,
    mut events: EventWriter<PaddleEvent>,
) {
    let Ok((colliders, bodies, pipeline)) = rapier_context.single() else {
        return;
    };
    let scene = RapierScene::new(colliders, bodies, pipeline);

    for (rig, mut controller) in rigs.iter_mut() {
        let hands = match (targets.get(rig.left_hand), targets.get(rig.right_hand)) {
            (Ok(left), Ok(right)) => Some(HandPair::new(left.translation(), right.translation())),
            _ => None,
        };

        let Some(pose) = controller.pose_tick(&config, hands, &scene, &mut events) else {
            continue;
        };

        if let Ok(mut paddle) = transforms.get_mut(rig.paddle) {
            paddle.translation = pose.midpoint;
            if let Some(rotation) = pose.orientation {
                paddle.rotation = rotation;
            }
        }
    }
}

pub fn tick_water_clock(time: Res<Time<Fixed>>, water: Option<ResMut<PaddleWater>>) {
    if let Some(mut water) = water {
        water.0.set_time(time.elapsed_secs());
    }
}

pub fn apply_blade_forces(
    config: Res<PaddleConfig>,
    time: Res<Time<Fixed>>,
    water: Option<Res<PaddleWater>>,
    mut rigs: Query<(
        &PaddleRig,
        &mut PaddleController,
        &mut ExternalImpulse,
        &GlobalTransform,
        Option<&ReadMassProperties>,
    )>,
    blade_transforms: Query<&GlobalTransform>,
    rapier_context: Query<(
        &RapierContextColliders,
        &RapierRigidBodySet,
        &RapierQueryPipeline,
    )>,
    mut events: EventWriter<PaddleEvent>,
) {
    let Some(water) = water else {
        return;
    };
    let Ok((colliders, bodies, pipeline)) = rapier_context.single() else {
        return;
    };
    let scene = RapierScene::new(colliders, bodies, pipeline);
    let dt = time.delta_secs();

    for (rig, mut controller, mut external, transform, mass) in rigs.iter_mut() {
        let blades = Side::BOTH.map(|side| {
            let link = rig.blade(side);
            let root = blade_transforms.get(link.root).ok()?;
            let tip = blade_transforms.get(link.tip).ok()?;
            Some(BladeFrame {
                tip: tip.translation(),
                face_normal: *root.up(),
            })
        });

        let local_com = mass.map_or(Vec3::ZERO, |m| m.get().local_center_of_mass);
        let (_, rotation, _) = transform.to_scale_rotation_translation();
        let mut body = ExternalImpulseBody {
            external: &mut *external,
            center_of_mass: transform.transform_point(local_com),
            rotation,
            dt,
        };

        controller.physics_tick(
            &config,
            blades,
            dt,
            &scene,
            &water.0,
            &mut body,
            &mut events,
        );
    }
}

pub fn feed_ripples(mut events: EventReader<PaddleEvent>, mut ripples: ResMut<RippleField>) {
    for event in events.read() {
        if let PaddleEvent::Disturbance {
            position,
            radius,
            intensity,
        } = *event
        {
            ripples.add_disturbance(position, radius, intensity);
        }
    }
    ripples.step();
}
