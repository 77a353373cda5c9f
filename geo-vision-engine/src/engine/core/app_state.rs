use bevy::prelude::*;

/// Application lifecycle. Layer discovery must finish before any step is shown.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Hash, States)]
pub enum AppState {
    #[default]
    Cataloguing,
    Presenting,
}
