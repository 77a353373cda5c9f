use std::sync::Arc;

use bevy::prelude::*;
use bevy::tasks::{IoTaskPool, Task, block_on, futures_lite::future};

use crate::engine::assets::site_config::SiteConfig;
use crate::engine::core::app_state::AppState;
use crate::engine::loading::probe::{ResourceProbe, platform_probe};
use crate::engine::loading::progress::LoadingProgress;
use crate::engine::presentation::state_machine::PresentationEngine;
use crate::engine::presentation::step::PresentationStep;

/// Discovers which optional layers a deployment ships.
pub struct LayerCatalog {
    config: SiteConfig,
}

impl LayerCatalog {
    pub fn new(config: SiteConfig) -> Self {
        Self { config }
    }

    /// Ordered step sequence for this deployment. Satellite is always first;
    /// every other step appears, in canonical order, only if its resources
    /// probe present. Lithology and assay steps come as a pair. Probes are
    /// one-shot: an erroring probe means "absent" for the whole session.
    pub async fn build_steps(&self, probe: &dyn ResourceProbe) -> Vec<PresentationStep> {
        let mut steps = vec![PresentationStep::Satellite];

        for step in PresentationStep::CANONICAL_ORDER {
            match step {
                PresentationStep::Satellite | PresentationStep::AssayData => continue,
                PresentationStep::LithologyData => {
                    if self.is_present(step, probe).await {
                        steps.push(PresentationStep::LithologyData);
                        steps.push(PresentationStep::AssayData);
                    }
                }
                _ => {
                    if self.is_present(step, probe).await {
                        steps.push(step);
                    }
                }
            }
        }

        steps
    }

    async fn is_present(&self, step: PresentationStep, probe: &dyn ResourceProbe) -> bool {
        for path in self.config.resources_for(step) {
            match probe.exists(&path).await {
                Ok(true) => {}
                Ok(false) => {
                    info!("{} not offered: {} absent", step.title(), path);
                    return false;
                }
                Err(error) => {
                    warn!("{} not offered: {}", step.title(), error);
                    return false;
                }
            }
        }
        true
    }
}

/// In-flight catalog probes.
#[derive(Resource)]
pub struct CatalogTask(Task<Vec<PresentationStep>>);

pub fn start_catalog(mut commands: Commands, config: Res<SiteConfig>) {
    let catalog = LayerCatalog::new(config.clone());
    let probe: Arc<dyn ResourceProbe> = platform_probe(&config);

    info!("Probing site layers under {}/{}", config.asset_root, config.site_path);
    let task = IoTaskPool::get().spawn(async move { catalog.build_steps(probe.as_ref()).await });
    commands.insert_resource(CatalogTask(task));
}

/// Hand the discovered steps to a fresh engine and start presenting.
pub fn poll_catalog(
    mut commands: Commands,
    task: Option<ResMut<CatalogTask>>,
    config: Res<SiteConfig>,
    mut loading_progress: ResMut<LoadingProgress>,
    mut next_state: ResMut<NextState<AppState>>,
) {
    let Some(mut task) = task else {
        return;
    };
    let Some(steps) = block_on(future::poll_once(&mut task.0)) else {
        return;
    };
    commands.remove_resource::<CatalogTask>();

    let tags: Vec<&str> = steps.iter().map(PresentationStep::tag).collect();
    info!("✓ Catalog complete: {}", tags.join(" → "));

    commands.insert_resource(PresentationEngine::new(steps, config.drillhole_style()));
    loading_progress.catalog_complete = true;
    next_state.set(AppState::Presenting);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::loading::probe::ProbeError;
    use bevy::tasks::BoxedFuture;
    use std::collections::HashMap;

    /// Canned probe answers keyed by resource path; unknown paths are absent.
    struct ScriptedProbe {
        answers: HashMap<String, Result<bool, u16>>,
    }

    impl ScriptedProbe {
        fn new(config: &SiteConfig, present: &[PresentationStep]) -> Self {
            let mut answers = HashMap::new();
            for step in present {
                for path in config.resources_for(*step) {
                    answers.insert(path, Ok(true));
                }
            }
            Self { answers }
        }

        fn failing(mut self, path: String) -> Self {
            self.answers.insert(path, Err(503));
            self
        }
    }

    impl ResourceProbe for ScriptedProbe {
        fn exists<'a>(&'a self, path: &'a str) -> BoxedFuture<'a, Result<bool, ProbeError>> {
            Box::pin(async move {
                match self.answers.get(path) {
                    Some(Ok(present)) => Ok(*present),
                    Some(Err(status)) => Err(ProbeError::Status {
                        path: path.to_string(),
                        status: *status,
                    }),
                    None => Ok(false),
                }
            })
        }
    }

    #[test]
    fn test_only_satellite_when_nothing_optional_exists() {
        let config = SiteConfig::default();
        let probe = ScriptedProbe::new(&config, &[]);
        let steps = block_on(LayerCatalog::new(config).build_steps(&probe));
        assert_eq!(steps, vec![PresentationStep::Satellite]);
    }

    #[test]
    fn test_full_deployment_in_canonical_order() {
        let config = SiteConfig::default();
        let probe = ScriptedProbe::new(&config, &PresentationStep::CANONICAL_ORDER);
        let steps = block_on(LayerCatalog::new(config).build_steps(&probe));
        assert_eq!(steps, PresentationStep::CANONICAL_ORDER.to_vec());
    }

    #[test]
    fn test_drillhole_steps_come_as_pair() {
        let config = SiteConfig::default();
        let probe = ScriptedProbe::new(
            &config,
            &[PresentationStep::LithologyData, PresentationStep::OreBody],
        );
        let steps = block_on(LayerCatalog::new(config).build_steps(&probe));
        assert_eq!(
            steps,
            vec![
                PresentationStep::Satellite,
                PresentationStep::LithologyData,
                PresentationStep::AssayData,
                PresentationStep::OreBody,
            ]
        );
    }

    #[test]
    fn test_failed_probe_counts_as_absent() {
        let config = SiteConfig::default();
        let magnetic = config.resources_for(PresentationStep::MagneticMap).remove(0);
        let probe = ScriptedProbe::new(
            &config,
            &[PresentationStep::GeologyMap, PresentationStep::Topography],
        )
        .failing(magnetic);
        let steps = block_on(LayerCatalog::new(config).build_steps(&probe));
        assert_eq!(
            steps,
            vec![
                PresentationStep::Satellite,
                PresentationStep::Topography,
                PresentationStep::GeologyMap,
            ]
        );
    }

    #[test]
    fn test_one_missing_collection_hides_both_drillhole_steps() {
        let config = SiteConfig::default();
        let assay = config.resources_for(PresentationStep::AssayData).remove(1);
        let probe = ScriptedProbe::new(&config, &[PresentationStep::LithologyData]).failing(assay);
        let steps = block_on(LayerCatalog::new(config).build_steps(&probe));
        assert_eq!(steps, vec![PresentationStep::Satellite]);
    }
}
