use bevy::prelude::*;

use crate::engine::assets::drillhole::DrillholeDataset;
use crate::engine::assets::site_config::SiteConfig;
use crate::engine::loading::progress::{LoadFailure, LoadStatus, LoadingProgress};
use crate::engine::presentation::drillhole_index::DrillholeIndex;
use crate::engine::presentation::state_machine::PresentationEngine;
use crate::engine::presentation::step::{Dataset, PresentationStep};
use crate::engine::scene::sink::BevySceneSink;

/// Handles for the two record collections. Both must load for either to be used.
#[derive(Resource, Default)]
pub struct DrillholeLoader {
    handles: Option<DrillholeHandles>,
    resolved: bool,
}

struct DrillholeHandles {
    lithology: Handle<DrillholeDataset>,
    assay: Handle<DrillholeDataset>,
}

/// Request both collections if the catalog offered drillhole steps.
pub fn start_drillhole_loading(
    mut loader: ResMut<DrillholeLoader>,
    engine: Res<PresentationEngine>,
    config: Res<SiteConfig>,
    asset_server: Res<AssetServer>,
) {
    if !engine.steps().contains(&PresentationStep::LithologyData) {
        loader.resolved = true;
        return;
    }

    let lithology_path = config.dataset_path(Dataset::Lithology);
    let assay_path = config.dataset_path(Dataset::Assay);
    info!("Loading drillhole records: {}, {}", lithology_path, assay_path);

    loader.handles = Some(DrillholeHandles {
        lithology: asset_server.load(lithology_path),
        assay: asset_server.load(assay_path),
    });
}

/// Hand the collections to the engine once both resolve, or report the failure.
pub fn track_drillhole_loading(
    mut loader: ResMut<DrillholeLoader>,
    mut engine: ResMut<PresentationEngine>,
    mut loading_progress: ResMut<LoadingProgress>,
    mut sink: BevySceneSink,
    asset_server: Res<AssetServer>,
    datasets: Res<Assets<DrillholeDataset>>,
) {
    if loader.resolved {
        return;
    }
    let Some(handles) = &loader.handles else {
        return;
    };

    let status = LoadStatus::from_state(asset_server.get_load_state(&handles.lithology))
        .combine(LoadStatus::from_state(asset_server.get_load_state(&handles.assay)));

    match status {
        LoadStatus::Loading => {}
        LoadStatus::Failed(reason) => {
            loading_progress.record_failure(LoadFailure::Drillholes { reason });
            engine.drillholes_failed(&mut sink);
            loader.resolved = true;
        }
        LoadStatus::Loaded => {
            let (Some(lithology), Some(assay)) =
                (datasets.get(&handles.lithology), datasets.get(&handles.assay))
            else {
                return;
            };

            let index = DrillholeIndex::new(lithology.segments.clone(), assay.segments.clone());
            println!(
                "✓ Drillhole records loaded: {} lithology, {} assay segments",
                index.segments(Dataset::Lithology).len(),
                index.segments(Dataset::Assay).len()
            );

            engine.drillholes_ready(index, &mut sink);
            loading_progress.drillholes_ready = true;
            loader.resolved = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;
    use std::time::Duration;

    use bevy_common_assets::json::JsonAssetPlugin;
    use constants::path::DRILLHOLE_RECORDS_EXTENSION;

    use super::*;
    use crate::engine::scene::drillholes::DrillholeMeshes;
    use crate::engine::scene::sink::LayerEntities;

    const RECORDS: &str = r#"[
        {"holeId": "DH-01", "x": 512000.0, "y": 7100000.0, "z": 400.0, "depthFrom": 0.0, "depthTo": 12.0, "lithology": "BAS", "grade": 0.4}
    ]"#;

    fn write_records(asset_root: &Path, lithology: &str, assay: &str) {
        let config = SiteConfig::default();
        std::fs::create_dir_all(asset_root.join(&config.site_path)).unwrap();
        std::fs::write(asset_root.join(config.dataset_path(Dataset::Lithology)), lithology).unwrap();
        std::fs::write(asset_root.join(config.dataset_path(Dataset::Assay)), assay).unwrap();
    }

    fn records_app(asset_root: &Path) -> App {
        let config = SiteConfig::default();
        let steps = vec![
            PresentationStep::Satellite,
            PresentationStep::LithologyData,
            PresentationStep::AssayData,
        ];
        let mut app = App::new();
        app.add_plugins((
            MinimalPlugins,
            AssetPlugin {
                file_path: asset_root.display().to_string(),
                ..default()
            },
            JsonAssetPlugin::<DrillholeDataset>::new(&[DRILLHOLE_RECORDS_EXTENSION]),
        ))
        .init_asset::<Mesh>()
        .init_asset::<StandardMaterial>()
        .init_resource::<DrillholeLoader>()
        .init_resource::<LoadingProgress>()
        .init_resource::<LayerEntities>()
        .init_resource::<DrillholeMeshes>()
        .insert_resource(PresentationEngine::new(steps, config.drillhole_style()))
        .insert_resource(config)
        .add_systems(Startup, start_drillhole_loading)
        .add_systems(Update, track_drillhole_loading);
        app
    }

    fn run_until_resolved(app: &mut App) {
        for _ in 0..500 {
            app.update();
            if app.world().resource::<DrillholeLoader>().resolved {
                break;
            }
            std::thread::sleep(Duration::from_millis(10));
        }
        // Later frames must not report the outcome again.
        app.update();
        app.update();
    }

    #[test]
    fn test_malformed_assay_fails_both_collections_once() {
        let asset_root = tempfile::tempdir().unwrap();
        write_records(asset_root.path(), RECORDS, "{ not a record list");
        let mut app = records_app(asset_root.path());
        run_until_resolved(&mut app);

        let world = app.world();
        assert!(world.resource::<DrillholeLoader>().resolved);

        let progress = world.resource::<LoadingProgress>();
        assert!(!progress.drillholes_ready);
        assert_eq!(progress.failures.len(), 1);
        assert!(matches!(progress.failures[0], LoadFailure::Drillholes { .. }));

        let engine = world.resource::<PresentationEngine>();
        assert_eq!(
            engine.unavailable_steps(),
            vec![PresentationStep::LithologyData, PresentationStep::AssayData]
        );
    }

    #[test]
    fn test_both_collections_reach_the_engine() {
        let asset_root = tempfile::tempdir().unwrap();
        write_records(asset_root.path(), RECORDS, RECORDS);
        let mut app = records_app(asset_root.path());
        run_until_resolved(&mut app);

        let world = app.world();
        let progress = world.resource::<LoadingProgress>();
        assert!(progress.drillholes_ready);
        assert!(progress.failures.is_empty());
        assert!(world.resource::<PresentationEngine>().unavailable_steps().is_empty());
    }

    #[test]
    fn test_sites_without_drillhole_steps_skip_loading() {
        let asset_root = tempfile::tempdir().unwrap();
        let config = SiteConfig::default();
        let mut app = records_app(asset_root.path());
        app.insert_resource(PresentationEngine::new(
            vec![PresentationStep::Satellite],
            config.drillhole_style(),
        ));
        app.update();

        let loader = app.world().resource::<DrillholeLoader>();
        assert!(loader.resolved);
        assert!(loader.handles.is_none());
        assert!(app.world().resource::<LoadingProgress>().failures.is_empty());
    }
}
