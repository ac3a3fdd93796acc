//! Third-person camera, keyboard/mouse mapping and player spawning.

use bevy::input::mouse::MouseMotion;
use bevy::prelude::*;
use bevy::window::{CursorGrabMode, PrimaryWindow};
use bevy_rapier3d::prelude::*;

use super::combat::{PlayerCombat, Target};
use super::components::*;
use crate::combat::{MovementBody, Socket, Sockets};
use crate::core::{ArenaConfig, GameState};
use crate::enemies::EnemyBrain;
use crate::tuning::{perception, player};

/// Grab and hide cursor when entering gameplay.
pub fn grab_cursor(mut window_query: Query<&mut Window, With<PrimaryWindow>>) {
    if let Ok(mut window) = window_query.get_single_mut() {
        window.cursor_options.grab_mode = CursorGrabMode::Locked;
        window.cursor_options.visible = false;
    }
}

/// Release cursor when leaving gameplay.
pub fn release_cursor(mut window_query: Query<&mut Window, With<PrimaryWindow>>) {
    if let Ok(mut window) = window_query.get_single_mut() {
        window.cursor_options.grab_mode = CursorGrabMode::None;
        window.cursor_options.visible = true;
    }
}

/// Handle mouse movement for looking around.
///
/// Rotates the player entity horizontally (yaw) and the camera pivot
/// vertically (pitch). The pivot is a child of the player, so yaw carries
/// the camera with it. Frozen while the crossbow turns the player.
pub fn mouse_look(
    mut mouse_motion: EventReader<MouseMotion>,
    config: Res<ArenaConfig>,
    mut player_query: Query<(&mut Transform, &PlayerCombat), With<Player>>,
    mut pivot_query: Query<(&mut Transform, &mut PlayerCamera), Without<Player>>,
) {
    let mut delta = Vec2::ZERO;
    for event in mouse_motion.read() {
        delta += event.delta;
    }

    if delta == Vec2::ZERO {
        return;
    }

    let Ok((mut player_transform, combat)) = player_query.get_single_mut() else {
        return;
    };
    if combat.camera_locked() {
        return;
    }
    let Ok((mut pivot_transform, mut camera)) = pivot_query.get_single_mut() else {
        return;
    };

    let sensitivity = config.mouse_sensitivity * 0.001;
    let y_invert = if config.invert_y { -1.0 } else { 1.0 };

    player_transform.rotate_y(-delta.x * sensitivity);

    camera.pitch -= delta.y * sensitivity * y_invert;
    camera.pitch = camera.pitch.clamp(-1.2, 1.0);

    pivot_transform.rotation = Quat::from_rotation_x(camera.pitch);
}

/// Map keyboard and mouse onto player actions.
///
/// Rejected actions are logged and otherwise ignored.
pub fn player_input(
    keyboard: Res<ButtonInput<KeyCode>>,
    mouse: Res<ButtonInput<MouseButton>>,
    mut player_query: Query<(&Transform, &mut PlayerCombat, &mut MovementBody), With<Player>>,
    enemy_query: Query<(Entity, &Transform, &EnemyBrain), Without<Player>>,
) {
    let Ok((transform, mut combat, mut body)) = player_query.get_single_mut() else {
        return;
    };
    if combat.is_dead() {
        return;
    }

    let mut direction = Vec3::ZERO;
    if keyboard.pressed(KeyCode::KeyW) {
        direction.z -= 1.0;
    }
    if keyboard.pressed(KeyCode::KeyS) {
        direction.z += 1.0;
    }
    if keyboard.pressed(KeyCode::KeyA) {
        direction.x -= 1.0;
    }
    if keyboard.pressed(KeyCode::KeyD) {
        direction.x += 1.0;
    }

    // Rotate direction to face where player is looking (only horizontal)
    let yaw = transform.rotation.to_euler(EulerRot::YXZ).0;
    let movement = Quat::from_rotation_y(yaw) * direction.normalize_or_zero();
    combat.steer(&mut body, movement);

    let forward = transform.forward().as_vec3();

    let sprinting = keyboard.pressed(KeyCode::ShiftLeft);
    if sprinting != combat.is_sprinting() {
        combat.set_sprinting(sprinting);
    }

    let crouching = keyboard.pressed(KeyCode::KeyC) || keyboard.pressed(KeyCode::ControlLeft);
    if crouching != combat.is_crouching() {
        if let Err(reason) = combat.set_crouching(crouching) {
            debug!("Crouch rejected: {}", reason);
        }
    }

    if keyboard.just_pressed(KeyCode::Space) {
        if let Err(reason) = combat.jump_pressed(&mut body, forward) {
            debug!("Jump rejected: {}", reason);
        }
    }

    // Holding the button re-draws as soon as the player is free again
    if mouse.pressed(MouseButton::Right) {
        if let Err(reason) = combat.start_aiming(&body) {
            if mouse.just_pressed(MouseButton::Right) {
                debug!("Aim rejected: {}", reason);
            }
        }
    }
    if mouse.just_released(MouseButton::Right) {
        combat.stop_aiming();
    }

    if mouse.just_pressed(MouseButton::Left) {
        let targets: Vec<Target> = enemy_query
            .iter()
            .map(|(entity, enemy_transform, brain)| Target {
                entity,
                position: enemy_transform.translation,
                alive: !brain.is_dead(),
            })
            .collect();
        if let Err(reason) = combat.attack_pressed(transform.translation, &targets) {
            debug!("Attack rejected: {}", reason);
        }
    }

    if keyboard.just_pressed(KeyCode::KeyQ) {
        if let Err(reason) = combat.start_quick_attack(&mut body) {
            debug!("Quick attack rejected: {}", reason);
        }
    }

    if keyboard.just_pressed(KeyCode::KeyF) {
        if let Err(reason) = combat.use_vial(&mut body) {
            debug!("Vial rejected: {}", reason);
        }
    }

    if keyboard.just_pressed(KeyCode::KeyE) {
        match combat.toggle_bow() {
            Ok(equipped) => debug!("Bow equipped: {}", equipped),
            Err(reason) => debug!("Bow toggle rejected: {}", reason),
        }
    }
}

/// Spawn the player entity with its third-person camera rig.
pub fn spawn_player(commands: &mut Commands, position: Vec3, config: &ArenaConfig) -> Entity {
    let sockets = Sockets::default()
        .with(Socket::RightHand, Vec3::new(30.0, 40.0, -25.0))
        .with(Socket::LeftHand, Vec3::new(-30.0, 40.0, -25.0))
        .with(Socket::Neck, Vec3::new(0.0, 60.0, 0.0))
        .with(Socket::Eyes, Vec3::new(0.0, perception::EYE_HEIGHT, 0.0))
        .with(Socket::ArrowAnchor, Vec3::new(0.0, 20.0, 0.0));

    let player = commands
        .spawn((
            Player,
            PlayerCombat::default(),
            MovementBody::new(player::WALK_SPEED),
            sockets,
            Transform::from_translation(position),
            Visibility::default(),
            // Rapier physics components
            RigidBody::KinematicPositionBased,
            Collider::capsule_y(60.0, 30.0),
            KinematicCharacterController {
                offset: CharacterLength::Absolute(1.0),
                autostep: Some(CharacterAutostep {
                    max_height: CharacterLength::Absolute(40.0),
                    min_width: CharacterLength::Absolute(30.0),
                    include_dynamic_bodies: false,
                }),
                max_slope_climb_angle: 45_f32.to_radians(),
                min_slope_slide_angle: 30_f32.to_radians(),
                snap_to_ground: Some(CharacterLength::Absolute(20.0)),
                ..default()
            },
        ))
        .id();

    // Pivot at shoulder height carries the pitch; the camera sits on a boom behind it.
    commands.entity(player).with_children(|parent| {
        parent
            .spawn((
                PlayerCamera::default(),
                Transform::from_xyz(0.0, config.camera_height, 0.0),
                Visibility::default(),
            ))
            .with_children(|pivot| {
                pivot.spawn((
                    MainCamera,
                    Camera3d::default(),
                    Transform::from_xyz(0.0, 0.0, config.camera_distance),
                ));
            });
    });

    info!("Spawned player at {:?}", position);
    player
}

/// Set up player movement systems.
pub fn setup_movement_systems(app: &mut App) {
    app.add_systems(OnEnter(GameState::InGame), grab_cursor)
        .add_systems(OnExit(GameState::InGame), release_cursor);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::PlayerFrame;

    const DT: f32 = 1.0 / 60.0;

    fn app() -> App {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins)
            .init_resource::<ButtonInput<KeyCode>>()
            .init_resource::<ButtonInput<MouseButton>>()
            .add_systems(Update, player_input);
        app
    }

    fn advance(app: &mut App, seconds: f32) {
        let mut query = app
            .world_mut()
            .query::<(&mut PlayerCombat, &mut MovementBody)>();
        let (mut combat, mut body) = query.single_mut(app.world_mut());
        for _ in 0..(seconds / DT).round() as usize {
            combat.tick(PlayerFrame {
                dt: DT,
                body: &mut body,
                forward: Vec3::NEG_Z,
                boss_distance: None,
            });
        }
    }

    #[test]
    fn held_aim_draws_once_the_swing_ends() {
        let mut app = app();
        let player = app
            .world_mut()
            .spawn((
                Player,
                PlayerCombat::default(),
                MovementBody::new(player::WALK_SPEED),
                Transform::default(),
            ))
            .id();
        advance(&mut app, 0.1);

        app.world_mut()
            .get_mut::<PlayerCombat>(player)
            .unwrap()
            .start_attack(Vec3::ZERO, &[])
            .unwrap();
        app.world_mut()
            .resource_mut::<ButtonInput<MouseButton>>()
            .press(MouseButton::Right);
        app.update();
        assert!(!app.world().get::<PlayerCombat>(player).unwrap().is_aiming());

        advance(&mut app, 1.0);
        app.update();
        assert!(app.world().get::<PlayerCombat>(player).unwrap().is_aiming());
    }
}
