//! Arena setup - floor, light and actors spawned from the arena config.

use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

use crate::combat::CombatSet;
use crate::core::{ArenaConfig, DeathEvent, GameRng, GameState};
use crate::enemies::{spawn_elite, spawn_grunt, BodySize};
use crate::player::{spawn_player, Player};

/// Marker for everything torn down on restart.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct ArenaEntity;

/// A mesh and material pair shared by every instance of a prop.
#[derive(Debug, Clone)]
pub struct MeshKit {
    pub mesh: Handle<Mesh>,
    pub material: Handle<StandardMaterial>,
}

impl MeshKit {
    pub fn new(
        meshes: &mut Assets<Mesh>,
        materials: &mut Assets<StandardMaterial>,
        mesh: impl Into<Mesh>,
        color: Color,
    ) -> Self {
        Self {
            mesh: meshes.add(mesh),
            material: materials.add(StandardMaterial {
                base_color: color,
                perceptual_roughness: 0.8,
                ..default()
            }),
        }
    }

    pub fn bundle(&self) -> (Mesh3d, MeshMaterial3d<StandardMaterial>) {
        (Mesh3d(self.mesh.clone()), MeshMaterial3d(self.material.clone()))
    }
}

/// Placeholder geometry for actors and projectiles.
#[derive(Resource, Debug, Clone)]
pub struct ActorMeshes {
    pub grunt: MeshKit,
    pub elite: MeshKit,
    pub shield: MeshKit,
    pub axe: MeshKit,
    pub arrow: MeshKit,
    pub vial: MeshKit,
    /// Unit length along -Z, stretched per frame
    pub chain: MeshKit,
}

impl ActorMeshes {
    pub fn build(meshes: &mut Assets<Mesh>, materials: &mut Assets<StandardMaterial>) -> Self {
        Self {
            grunt: MeshKit::new(meshes, materials, BodySize::GRUNT.mesh(), Color::srgb(0.45, 0.4, 0.35)),
            elite: MeshKit::new(meshes, materials, BodySize::ELITE.mesh(), Color::srgb(0.3, 0.28, 0.32)),
            shield: MeshKit::new(meshes, materials, Cuboid::new(40.0, 60.0, 10.0), Color::srgb(0.5, 0.5, 0.55)),
            axe: MeshKit::new(meshes, materials, Cuboid::new(10.0, 80.0, 30.0), Color::srgb(0.6, 0.58, 0.55)),
            arrow: MeshKit::new(meshes, materials, Cuboid::new(2.0, 2.0, 60.0), Color::srgb(0.55, 0.4, 0.25)),
            vial: MeshKit::new(meshes, materials, Sphere::new(8.0), Color::srgb(0.7, 0.1, 0.15)),
            chain: MeshKit::new(meshes, materials, Cuboid::new(4.0, 4.0, 1.0), Color::srgb(0.35, 0.35, 0.35)),
        }
    }
}

/// Arena plugin - builds the fight on entering `Loading` and handles game over.
pub struct ArenaPlugin;

impl Plugin for ArenaPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(OnEnter(GameState::Loading), setup_arena)
            .add_systems(
                Update,
                watch_player_death
                    .after(CombatSet::Feedback)
                    .run_if(in_state(GameState::InGame)),
            )
            .add_systems(Update, restart_arena.run_if(in_state(GameState::GameOver)));
    }
}

fn setup_arena(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    let config = ArenaConfig::load();
    let actor_meshes = ActorMeshes::build(&mut meshes, &mut materials);

    spawn_floor(&mut commands, &mut meshes, &mut materials, config.floor_half_extent);
    spawn_lights(&mut commands);

    let player = spawn_player(&mut commands, config.player_spawn(), &config);
    commands.entity(player).insert(ArenaEntity);

    spawn_elite(&mut commands, Some(&actor_meshes), config.boss_spawn());
    for position in config.grunt_spawns() {
        spawn_grunt(&mut commands, Some(&actor_meshes), position);
    }

    info!(
        "Arena ready: boss at {:?}, {} grunts",
        config.boss_spawn(),
        config.grunt_spawns.len()
    );

    commands.insert_resource(GameRng::from_config(&config));
    commands.insert_resource(actor_meshes);
    commands.insert_resource(config);
    next_state.set(GameState::InGame);
}

fn spawn_floor(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
    half_extent: f32,
) {
    let depth = 20.0;
    commands.spawn((
        Mesh3d(meshes.add(Cuboid::new(half_extent * 2.0, depth, half_extent * 2.0))),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: Color::srgb(0.28, 0.27, 0.26),
            perceptual_roughness: 0.9,
            ..default()
        })),
        Transform::from_xyz(0.0, -depth / 2.0, 0.0),
        Collider::cuboid(half_extent, depth / 2.0, half_extent),
        ArenaEntity,
    ));
}

fn spawn_lights(commands: &mut Commands) {
    commands.insert_resource(AmbientLight {
        color: Color::srgb(0.6, 0.6, 0.7),
        brightness: 300.0,
    });
    commands.spawn((
        DirectionalLight {
            color: Color::srgb(0.7, 0.7, 0.75),
            illuminance: 4000.0,
            shadows_enabled: true,
            ..default()
        },
        Transform::from_xyz(0.0, 1000.0, 0.0).looking_at(Vec3::new(300.0, 0.0, -500.0), Vec3::Y),
        ArenaEntity,
    ));
}

fn watch_player_death(
    mut death_events: EventReader<DeathEvent>,
    player_query: Query<(), With<Player>>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    for event in death_events.read() {
        if player_query.contains(event.entity) {
            info!("Player died! Transitioning to Game Over...");
            next_state.set(GameState::GameOver);
        }
    }
}

fn restart_arena(
    mut commands: Commands,
    keyboard: Res<ButtonInput<KeyCode>>,
    arena_query: Query<Entity, With<ArenaEntity>>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    if !keyboard.just_pressed(KeyCode::KeyR) {
        return;
    }
    for entity in arena_query.iter() {
        commands.entity(entity).despawn_recursive();
    }
    info!("Restarting arena");
    next_state.set(GameState::Loading);
}
