use bevy::prelude::*;

#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum PaddleUpdateSet {
    Pose,
    Presentation,
}

#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum PaddleFixedSet {
    Water,
    Forces,
}
