use std::time::Duration;

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use paddle::collision::Obstacle;
use paddle::{
    layers, GerstnerWater, HandPair, PaddleConfig, PaddleController, PaddleEvent, PaddleFixedSet,
    PaddlePlugin, PaddleUpdateSet, RippleField, StaticScene, WaterOracle,
};

use crate::hull::HullBody;
use crate::report::{record_events, SimReport, SimStats};
use crate::scenario::Scenario;
use crate::script::{blade_frames, StrokeScript};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimSettings {
    pub seconds: f32,
    pub fixed_hz: f64,
    pub frame_hz: f64,
    pub seed: u64,
}

impl Default for SimSettings {
    fn default() -> Self {
        Self {
            seconds: 30.0,
            fixed_hz: 50.0,
            frame_hz: 60.0,
            seed: 0,
        }
    }
}

/// Scenery the paddle is kept out of. The hull box follows the hull's
/// position but not its yaw.
#[derive(Resource)]
pub struct SimScene {
    pub scene: StaticScene,
    hull_anchor: Vec3,
}

impl SimScene {
    pub fn new(scenario: &Scenario) -> Self {
        let mut scene = StaticScene::default().with(Obstacle::cuboid(
            scenario.hull.center,
            scenario.hull.half_extents,
            layers::HULL,
        ));
        for post in &scenario.posts {
            scene.add(Obstacle::cuboid(post.center, post.half_extents, layers::WORLD));
        }
        Self {
            scene,
            hull_anchor: Vec3::ZERO,
        }
    }

    pub fn follow_hull(&mut self, hull: &HullBody) {
        let offset = hull.position - self.hull_anchor;
        if offset != Vec3::ZERO {
            self.scene.translate_layers(layers::HULL, offset);
            self.hull_anchor = hull.position;
        }
    }
}

#[derive(Resource)]
pub struct SimWater(pub GerstnerWater);

#[derive(Resource, Default)]
pub struct SimPaddle(pub PaddleController);

fn drive_hands(
    time: Res<Time>,
    config: Res<PaddleConfig>,
    hull: Res<HullBody>,
    scene: Res<SimScene>,
    mut script: ResMut<StrokeScript>,
    mut controller: ResMut<SimPaddle>,
    mut events: EventWriter<PaddleEvent>,
) {
    let local = script.sample(time.elapsed_secs());
    let targets = HandPair::new(hull.to_world(local.left), hull.to_world(local.right));
    controller
        .0
        .pose_tick(&config, Some(targets), &scene.scene, &mut events);
}

fn tick_sim_water(time: Res<Time<Fixed>>, mut water: ResMut<SimWater>) {
    water.0.set_time(time.elapsed_secs());
}

fn paddle_forces(
    time: Res<Time<Fixed>>,
    config: Res<PaddleConfig>,
    script: Res<StrokeScript>,
    water: Res<SimWater>,
    scene: Res<SimScene>,
    mut hull: ResMut<HullBody>,
    mut controller: ResMut<SimPaddle>,
    mut events: EventWriter<PaddleEvent>,
) {
    let blades = controller
        .0
        .hands()
        .map_or([None, None], |hands| blade_frames(hands, script.params.blade_reach));

    controller.0.physics_tick(
        &config,
        blades,
        time.delta_secs(),
        &scene.scene,
        &water.0,
        &mut *hull,
        &mut events,
    );
}

fn integrate_hull(
    time: Res<Time<Fixed>>,
    mut hull: ResMut<HullBody>,
    mut scene: ResMut<SimScene>,
) {
    hull.integrate(time.delta_secs());
    scene.follow_hull(&hull);
}

pub fn build_app(scenario: Scenario, settings: SimSettings, with_logging: bool) -> App {
    let mut app = App::new();
    app.add_plugins(MinimalPlugins);
    if with_logging {
        app.add_plugins(bevy::log::LogPlugin::default());
    }

    app.insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_secs_f64(
        1.0 / settings.frame_hz,
    )));
    app.insert_resource(Time::<Fixed>::from_hz(settings.fixed_hz));

    app.add_plugins(PaddlePlugin {
        config: scenario.paddle.clone(),
    });

    let water = scenario
        .waves
        .to_config(scenario.water_level)
        .with_current(scenario.current);

    app.insert_resource(SimScene::new(&scenario))
        .insert_resource(SimWater(GerstnerWater::new(water)))
        .insert_resource(HullBody::new(&scenario.hull))
        .insert_resource(StrokeScript::new(scenario.stroke.clone(), settings.seed))
        .init_resource::<SimPaddle>()
        .init_resource::<SimStats>()
        .add_systems(Update, drive_hands.in_set(PaddleUpdateSet::Pose))
        .add_systems(
            FixedUpdate,
            (
                tick_sim_water.in_set(PaddleFixedSet::Water),
                (paddle_forces, integrate_hull)
                    .chain()
                    .in_set(PaddleFixedSet::Forces),
            ),
        )
        .add_systems(
            PostUpdate,
            record_events.in_set(PaddleUpdateSet::Presentation),
        );

    app.finish();
    app.cleanup();
    app
}

/// Run `scenario` for `settings.seconds` of simulated time and summarize it.
pub fn run(scenario: Scenario, settings: SimSettings, with_logging: bool) -> SimReport {
    let name = scenario.name.clone();
    let mut app = build_app(scenario, settings, with_logging);

    let frames = (settings.seconds as f64 * settings.frame_hz).round().max(0.0) as u64;
    if with_logging {
        info!(
            "Running scenario '{}': {} frames at {} Hz, physics at {} Hz",
            name, frames, settings.frame_hz, settings.fixed_hz
        );
    }

    for _ in 0..frames {
        app.update();
    }

    let world = app.world();
    let hull = world.resource::<HullBody>();
    let stats = world.resource::<SimStats>();
    let ripples = world.resource::<RippleField>();
    let controller = world.resource::<SimPaddle>();

    SimReport {
        name,
        elapsed: world.resource::<Time>().elapsed_secs(),
        distance: hull.position.with_y(0.0).length(),
        forward_progress: -hull.position.z,
        heading_degrees: hull.yaw.to_degrees(),
        top_speed: stats.top_speed,
        peak_force: stats.peak_force,
        strokes: stats.strokes,
        rollbacks: stats.rollbacks,
        sweep_stops: stats.sweep_stops,
        refused_targets: stats.refused_targets,
        inactive_frames: stats.inactive_frames,
        ripple_energy: ripples.energy(),
        active_at_end: controller.0.is_active(),
    }
}
