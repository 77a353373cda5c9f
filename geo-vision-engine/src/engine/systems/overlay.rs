use bevy::ecs::hierarchy::ChildSpawnerCommands;
use bevy::prelude::*;

use crate::engine::presentation::legend::Legend;
use crate::engine::presentation::state_machine::PresentationEngine;

#[derive(Component)]
pub struct StepTitleText;

#[derive(Component)]
pub struct StepDescriptionText;

#[derive(Component)]
pub struct LegendPanel;

/// Native text overlay: step heading, description and legend in the top-left corner.
pub fn create_native_overlay(commands: &mut Commands) {
    commands
        .spawn(Node {
            position_type: PositionType::Absolute,
            top: Val::Px(12.0),
            left: Val::Px(12.0),
            flex_direction: FlexDirection::Column,
            row_gap: Val::Px(4.0),
            ..default()
        })
        .with_children(|parent| {
            parent.spawn((
                Text::new("Discovering site layers…"),
                TextFont {
                    font_size: 22.0,
                    ..default()
                },
                TextColor(Color::WHITE),
                StepTitleText,
            ));
            parent.spawn((
                Text::new(""),
                TextFont {
                    font_size: 14.0,
                    ..default()
                },
                TextColor(Color::srgb(0.8, 0.8, 0.8)),
                StepDescriptionText,
            ));
            parent.spawn((
                Node {
                    flex_direction: FlexDirection::Column,
                    row_gap: Val::Px(2.0),
                    margin: UiRect::top(Val::Px(8.0)),
                    ..default()
                },
                LegendPanel,
            ));
        });
}

/// "Step i/n: Title" for the active step.
pub fn step_heading(engine: &PresentationEngine) -> String {
    format!(
        "Step {}/{}: {}",
        engine.step_index() + 1,
        engine.steps().len(),
        engine.current_step().title()
    )
}

/// Step description, flagged when the step's content failed to load.
pub fn step_description(engine: &PresentationEngine) -> String {
    let step = engine.current_step();
    if engine.is_step_unavailable(step) {
        format!("{} (unavailable: failed to load)", step.description())
    } else {
        step.description().to_string()
    }
}

pub fn update_overlay(
    mut commands: Commands,
    engine: Res<PresentationEngine>,
    mut title_query: Query<&mut Text, (With<StepTitleText>, Without<StepDescriptionText>)>,
    mut description_query: Query<&mut Text, (With<StepDescriptionText>, Without<StepTitleText>)>,
    legend_query: Query<Entity, With<LegendPanel>>,
) {
    if !engine.is_changed() {
        return;
    }

    for mut text in &mut title_query {
        text.0 = step_heading(&engine);
    }
    for mut text in &mut description_query {
        text.0 = step_description(&engine);
    }

    for panel in &legend_query {
        let mut panel_commands = commands.entity(panel);
        panel_commands.despawn_related::<Children>();
        if let Some(legend) = engine.legend() {
            panel_commands.with_children(|parent| spawn_legend_rows(parent, legend));
        }
    }
}

fn spawn_legend_rows(parent: &mut ChildSpawnerCommands, legend: &Legend) {
    for entry in legend.entries() {
        parent
            .spawn(Node {
                flex_direction: FlexDirection::Row,
                align_items: AlignItems::Center,
                column_gap: Val::Px(6.0),
                ..default()
            })
            .with_children(|row| {
                row.spawn((
                    Node {
                        width: Val::Px(14.0),
                        height: Val::Px(14.0),
                        ..default()
                    },
                    BackgroundColor(entry.colour),
                ));
                row.spawn((
                    Text::new(entry.label.clone()),
                    TextFont {
                        font_size: 13.0,
                        ..default()
                    },
                    TextColor(Color::WHITE),
                ));
            });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::assets::site_config::SiteConfig;
    use crate::engine::presentation::step::{AssetLayer, PresentationStep};

    #[test]
    fn test_heading_and_unavailable_description() {
        let mut engine = PresentationEngine::new(
            vec![PresentationStep::Satellite, PresentationStep::Topography],
            SiteConfig::default().drillhole_style(),
        );
        assert_eq!(step_heading(&engine), "Step 1/2: Satellite Imagery");
        assert_eq!(
            step_description(&engine),
            PresentationStep::Satellite.description()
        );

        engine.asset_failed(AssetLayer::Satellite);
        assert!(step_description(&engine).ends_with("(unavailable: failed to load)"));
    }
}
