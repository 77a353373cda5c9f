use bevy::prelude::*;

use crate::engine::loading::progress::LoadingProgress;
use crate::engine::presentation::state_machine::{LayerId, PresentationEngine};
use crate::engine::presentation::step::ColourMode;
use crate::engine::scene::sink::BevySceneSink;
use crate::rpc::web_rpc::WebRpcInterface;

/// A user request against the presentation.
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct PresentationCommand {
    pub action: PresentationAction,
    pub source: CommandSource,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PresentationAction {
    Next,
    Previous,
    GoTo(usize),
    SetColourMode(ColourMode),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandSource {
    Rpc,
    Keyboard,
}

/// Native shortcuts: →/N next, ←/P previous, L lithology, A assay.
pub fn handle_navigation_keyboard(
    mut commands_out: EventWriter<PresentationCommand>,
    #[cfg(not(target_arch = "wasm32"))] keyboard: Res<ButtonInput<KeyCode>>,
) {
    #[cfg(not(target_arch = "wasm32"))]
    {
        let mut send = |action| {
            commands_out.write(PresentationCommand {
                action,
                source: CommandSource::Keyboard,
            });
        };

        if keyboard.any_just_pressed([KeyCode::ArrowRight, KeyCode::KeyN]) {
            send(PresentationAction::Next);
        }
        if keyboard.any_just_pressed([KeyCode::ArrowLeft, KeyCode::KeyP]) {
            send(PresentationAction::Previous);
        }
        if keyboard.just_pressed(KeyCode::KeyL) {
            send(PresentationAction::SetColourMode(ColourMode::Lithology));
        }
        if keyboard.just_pressed(KeyCode::KeyA) {
            send(PresentationAction::SetColourMode(ColourMode::Assay));
        }
    }

    #[cfg(target_arch = "wasm32")]
    {
        let _ = &mut commands_out;
    }
}

/// Apply queued commands in arrival order, one transition each.
pub fn apply_presentation_commands(
    mut events: EventReader<PresentationCommand>,
    mut engine: ResMut<PresentationEngine>,
    mut sink: BevySceneSink,
) {
    for command in events.read() {
        let changed = match command.action {
            PresentationAction::Next => engine.go_next(&mut sink),
            PresentationAction::Previous => engine.go_prev(&mut sink),
            PresentationAction::GoTo(index) => engine.go_to(index, &mut sink),
            PresentationAction::SetColourMode(mode) => engine.set_colour_mode(mode, &mut sink),
        };
        if !changed {
            debug!("{:?} from {:?} had no effect", command.action, command.source);
        }
    }
}

fn layer_tag(layer: LayerId) -> String {
    match layer {
        LayerId::Asset(asset) => asset.step().tag().to_string(),
        LayerId::Drillholes { dataset, mode } => {
            format!("{}:{}", dataset.step().tag(), mode.tag())
        }
    }
}

/// Snapshot of the presentation as sent to the frontend.
pub fn presentation_state_json(
    engine: &PresentationEngine,
    loading_progress: &LoadingProgress,
) -> serde_json::Value {
    let step = engine.current_step();
    serde_json::json!({
        "steps": engine.steps().iter().map(|s| s.tag()).collect::<Vec<_>>(),
        "stepIndex": engine.step_index(),
        "step": step.tag(),
        "title": step.title(),
        "description": step.description(),
        "colourMode": engine.colour_mode().tag(),
        "visibleLayer": engine.visible().map(layer_tag),
        "unavailable": engine.is_step_unavailable(step),
        "unavailableSteps": engine.unavailable_steps().iter().map(|s| s.tag()).collect::<Vec<_>>(),
        "cylinderCount": engine.cylinder_count(),
        "legend": engine.legend().map(|legend| legend.to_json()),
        "progress": loading_progress.to_json(),
    })
}

/// Push the presentation state to the frontend after every effective change.
pub fn publish_presentation_state(
    engine: Res<PresentationEngine>,
    loading_progress: Res<LoadingProgress>,
    mut rpc_interface: ResMut<WebRpcInterface>,
) {
    if !engine.is_changed() && !loading_progress.is_changed() {
        return;
    }
    rpc_interface.send_notification(
        "presentation_state",
        presentation_state_json(&engine, &loading_progress),
    );
}

/// Release every scene resource when the app shuts down.
pub fn teardown_on_exit(
    mut exit_events: EventReader<AppExit>,
    engine: Option<ResMut<PresentationEngine>>,
    mut sink: BevySceneSink,
) {
    if exit_events.read().next().is_none() {
        return;
    }
    if let Some(mut engine) = engine {
        engine.teardown(&mut sink);
    }
    sink.release_shared();
}
