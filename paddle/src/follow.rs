//! Chase transform: keep an entity at a fixed offset in a target's local frame.

use bevy::prelude::*;

/// Follow `target` at `local_offset`, turning only with the target's yaw.
#[derive(Component, Clone, Copy, Debug, Reflect)]
#[reflect(Component)]
pub struct FollowWithOffset {
    pub target: Entity,
    pub local_offset: Vec3,
}

impl FollowWithOffset {
    /// Five meters behind the target.
    pub const DEFAULT_OFFSET: Vec3 = Vec3::new(0.0, 0.0, 5.0);

    pub fn behind(target: Entity) -> Self {
        Self {
            target,
            local_offset: Self::DEFAULT_OFFSET,
        }
    }
}

/// World transform for a follower of `target`.
///
/// Position is `local_offset` carried through the full target transform.
/// Rotation keeps only the target's yaw, so pitch and roll of the target
/// do not tilt the follower.
pub fn follow_with_offset(target: &GlobalTransform, local_offset: Vec3) -> Transform {
    let (_, rotation, _) = target.to_scale_rotation_translation();
    let (yaw, _, _) = rotation.to_euler(EulerRot::YXZ);
    Transform {
        translation: target.transform_point(local_offset),
        rotation: Quat::from_rotation_y(yaw),
        ..default()
    }
}

pub fn follow_targets(
    mut followers: Query<(&FollowWithOffset, &mut Transform)>,
    targets: Query<&GlobalTransform>,
) {
    for (follow, mut transform) in followers.iter_mut() {
        let Ok(target) = targets.get(follow.target) else {
            continue;
        };
        let next = follow_with_offset(target, follow.local_offset);
        transform.translation = next.translation;
        transform.rotation = next.rotation;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn test_offset_is_in_target_frame() {
        let target = GlobalTransform::from(
            Transform::from_xyz(10.0, 0.0, 0.0).with_rotation(Quat::from_rotation_y(FRAC_PI_2)),
        );
        let follower = follow_with_offset(&target, FollowWithOffset::DEFAULT_OFFSET);

        // Facing -X after a quarter turn, so "behind" is +X.
        assert!(follower.translation.distance(Vec3::new(15.0, 0.0, 0.0)) < 1e-4);
        assert!(follower.rotation.angle_between(target.rotation()) < 1e-4);
    }

    #[test]
    fn test_only_yaw_is_copied() {
        let rotation = Quat::from_euler(EulerRot::YXZ, 0.7, 0.3, -0.2);
        let target = GlobalTransform::from(Transform::from_rotation(rotation));
        let follower = follow_with_offset(&target, Vec3::ZERO);

        let expected = Quat::from_rotation_y(0.7);
        assert!(follower.rotation.angle_between(expected) < 1e-4);
        assert!((follower.rotation * Vec3::Y).distance(Vec3::Y) < 1e-5);
    }
}
