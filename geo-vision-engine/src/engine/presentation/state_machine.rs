use std::collections::BTreeSet;

use bevy::math::DVec3;
use bevy::prelude::*;

use crate::engine::presentation::colour_policy::ColourPolicy;
use crate::engine::presentation::drillhole_index::DrillholeIndex;
use crate::engine::presentation::legend::Legend;
use crate::engine::presentation::spatial::{SceneFrame, compute_center};
use crate::engine::presentation::step::{AssetLayer, ColourMode, Dataset, PresentationStep};

/// Identity of a visible layer. Equal ids always mean identical scene contents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LayerId {
    Asset(AssetLayer),
    Drillholes { dataset: Dataset, mode: ColourMode },
}

/// One cylinder per renderable segment, already centred and coloured.
#[derive(Debug, Clone, PartialEq)]
pub struct CylinderSpec {
    pub hole_id: String,
    pub translation: Vec3,
    pub length: f32,
    pub radius: f32,
    pub colour: Color,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DrillholeLayer {
    pub dataset: Dataset,
    pub mode: ColourMode,
    pub cylinders: Vec<CylinderSpec>,
}

/// What the sink must materialise for a newly visible layer.
#[derive(Debug, Clone, PartialEq)]
pub enum LayerContent {
    Asset(AssetLayer),
    Drillholes(DrillholeLayer),
}

impl LayerContent {
    pub fn id(&self) -> LayerId {
        match self {
            Self::Asset(asset) => LayerId::Asset(*asset),
            Self::Drillholes(layer) => LayerId::Drillholes {
                dataset: layer.dataset,
                mode: layer.mode,
            },
        }
    }
}

/// Scene changes for one transition. Detach is always applied before attach.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayerDiff {
    pub detach: Option<LayerId>,
    pub attach: Option<LayerContent>,
}

impl LayerDiff {
    pub fn is_empty(&self) -> bool {
        self.detach.is_none() && self.attach.is_none()
    }
}

/// Write surface of the external renderer. The engine is its only caller.
pub trait SceneSink {
    /// Loaded payload a layer asset is built from.
    type Source<'a>;
    type Error: std::fmt::Display;

    /// Build a layer asset once, hidden, at `translation` in scene space.
    fn construct(
        &mut self,
        asset: AssetLayer,
        source: Self::Source<'_>,
        translation: Vec3,
    ) -> Result<(), Self::Error>;

    /// Move a constructed layer asset.
    fn place(&mut self, asset: AssetLayer, translation: Vec3);

    fn attach(&mut self, layer: &LayerContent);

    /// Hide a layer asset, or destroy the step-scoped drillhole set.
    fn detach(&mut self, layer: LayerId);

    /// Release a constructed layer asset. Called at most once per asset.
    fn dispose(&mut self, asset: AssetLayer);
}

/// Drillhole records as seen by the engine.
#[derive(Debug, Clone, Default)]
pub enum DrillholeData {
    #[default]
    Pending,
    Ready {
        index: DrillholeIndex,
        frame: SceneFrame,
    },
    Failed,
}

/// Load outcomes the transition function reads.
#[derive(Debug, Clone, Default)]
pub struct LoadedData {
    ready_assets: BTreeSet<AssetLayer>,
    failed_assets: BTreeSet<AssetLayer>,
    drillholes: DrillholeData,
}

impl LoadedData {
    pub fn is_asset_ready(&self, asset: AssetLayer) -> bool {
        self.ready_assets.contains(&asset)
    }

    pub fn is_asset_failed(&self, asset: AssetLayer) -> bool {
        self.failed_assets.contains(&asset)
    }

    /// Shared frame for every spatial layer. Origin until drillholes arrive.
    pub fn frame(&self) -> SceneFrame {
        match &self.drillholes {
            DrillholeData::Ready { frame, .. } => *frame,
            _ => SceneFrame::default(),
        }
    }
}

/// Styling inputs for cylinder construction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrillholeStyle {
    pub radius: f32,
    pub policy: ColourPolicy,
}

/// Layer that should be visible for (step, mode) given what has loaded.
pub fn desired_layer(step: PresentationStep, mode: ColourMode, data: &LoadedData) -> Option<LayerId> {
    if let Some(asset) = step.asset_layer() {
        return data.is_asset_ready(asset).then_some(LayerId::Asset(asset));
    }

    let dataset = step.dataset()?;
    match data.drillholes {
        DrillholeData::Ready { .. } => Some(LayerId::Drillholes { dataset, mode }),
        DrillholeData::Pending | DrillholeData::Failed => None,
    }
}

/// Pure transition: (previous visible, step, mode, loaded data) → (detach, attach).
pub fn transition(
    previous: Option<LayerId>,
    step: PresentationStep,
    mode: ColourMode,
    data: &LoadedData,
    style: &DrillholeStyle,
) -> LayerDiff {
    let desired = desired_layer(step, mode, data);
    if desired == previous {
        return LayerDiff::default();
    }

    let attach = desired.and_then(|id| match id {
        LayerId::Asset(asset) => Some(LayerContent::Asset(asset)),
        LayerId::Drillholes { dataset, mode } => match &data.drillholes {
            DrillholeData::Ready { index, frame } => Some(LayerContent::Drillholes(DrillholeLayer {
                dataset,
                mode,
                cylinders: build_cylinders(index, frame, dataset, mode, style),
            })),
            _ => None,
        },
    });

    LayerDiff {
        detach: previous,
        attach,
    }
}

/// One cylinder per renderable segment of `dataset`, coloured by `mode`.
/// Depth runs down the vertical axis from the segment's reference point.
pub fn build_cylinders(
    index: &DrillholeIndex,
    frame: &SceneFrame,
    dataset: Dataset,
    mode: ColourMode,
    style: &DrillholeStyle,
) -> Vec<CylinderSpec> {
    index
        .renderable_segments(dataset)
        .map(|segment| {
            let length = segment.length();
            let midpoint = DVec3::new(
                segment.x,
                segment.y,
                segment.z - segment.depth_from - length / 2.0,
            );
            CylinderSpec {
                hole_id: segment.hole_id.clone(),
                translation: frame.to_scene(midpoint),
                length: length as f32,
                radius: style.radius,
                colour: style.policy.colour_for(segment, mode),
            }
        })
        .collect()
}

/// Step/colour-mode state machine. Owns the loaded data and the visible layer,
/// and is the only component that writes to the scene.
#[derive(Resource, Debug)]
pub struct PresentationEngine {
    steps: Vec<PresentationStep>,
    step_index: usize,
    colour_mode: ColourMode,
    data: LoadedData,
    style: DrillholeStyle,
    visible: Option<LayerId>,
    legend: Option<Legend>,
    cylinder_count: usize,
    torn_down: bool,
}

impl PresentationEngine {
    /// Steps are normalised to canonical order, deduplicated, and always start with satellite.
    pub fn new(steps: Vec<PresentationStep>, style: DrillholeStyle) -> Self {
        let mut steps = steps;
        steps.sort();
        steps.dedup();
        if steps.first() != Some(&PresentationStep::Satellite) {
            steps.insert(0, PresentationStep::Satellite);
        }

        Self {
            steps,
            step_index: 0,
            colour_mode: ColourMode::default(),
            data: LoadedData::default(),
            style,
            visible: None,
            legend: None,
            cylinder_count: 0,
            torn_down: false,
        }
    }

    pub fn steps(&self) -> &[PresentationStep] {
        &self.steps
    }

    pub fn step_index(&self) -> usize {
        self.step_index
    }

    pub fn current_step(&self) -> PresentationStep {
        self.steps[self.step_index]
    }

    pub fn colour_mode(&self) -> ColourMode {
        self.colour_mode
    }

    pub fn visible(&self) -> Option<LayerId> {
        self.visible
    }

    pub fn legend(&self) -> Option<&Legend> {
        self.legend.as_ref()
    }

    pub fn cylinder_count(&self) -> usize {
        self.cylinder_count
    }

    /// Whether a step's content failed to load. Such a step stays navigable and empty.
    pub fn is_step_unavailable(&self, step: PresentationStep) -> bool {
        match step.asset_layer() {
            Some(asset) => self.data.is_asset_failed(asset),
            None => matches!(self.data.drillholes, DrillholeData::Failed),
        }
    }

    pub fn unavailable_steps(&self) -> Vec<PresentationStep> {
        self.steps
            .iter()
            .copied()
            .filter(|step| self.is_step_unavailable(*step))
            .collect()
    }

    /// Survey-space models follow the shared frame. Imagery planes stay on the origin.
    fn placement(&self, asset: AssetLayer) -> Vec3 {
        match asset {
            AssetLayer::OreBody => self.data.frame().to_scene(DVec3::ZERO),
            _ => Vec3::ZERO,
        }
    }

    /// Saturating step forward. Returns whether the step changed.
    pub fn go_next(&mut self, sink: &mut impl SceneSink) -> bool {
        let last = self.steps.len() - 1;
        self.go_to(self.step_index.saturating_add(1).min(last), sink)
    }

    /// Saturating step back. Returns whether the step changed.
    pub fn go_prev(&mut self, sink: &mut impl SceneSink) -> bool {
        self.go_to(self.step_index.saturating_sub(1), sink)
    }

    /// Jump to a step index. Out-of-range indices are ignored.
    pub fn go_to(&mut self, index: usize, sink: &mut impl SceneSink) -> bool {
        if self.torn_down || index >= self.steps.len() || index == self.step_index {
            return false;
        }
        self.step_index = index;
        info!(
            "Presentation step {}/{}: {}",
            index + 1,
            self.steps.len(),
            self.current_step().title()
        );
        self.refresh(sink);
        true
    }

    /// Returns whether the mode changed. The scene only changes on drillhole steps.
    pub fn set_colour_mode(&mut self, mode: ColourMode, sink: &mut impl SceneSink) -> bool {
        if self.torn_down || mode == self.colour_mode {
            return false;
        }
        self.colour_mode = mode;
        info!("Colour mode: {}", mode.tag());
        self.refresh(sink);
        true
    }

    /// A layer asset's payload arrived. The engine has the sink construct it once,
    /// then re-derives the scene.
    pub fn asset_ready<S: SceneSink>(
        &mut self,
        asset: AssetLayer,
        source: S::Source<'_>,
        sink: &mut S,
    ) -> Result<(), S::Error> {
        if self.torn_down || self.data.ready_assets.contains(&asset) {
            return Ok(());
        }
        sink.construct(asset, source, self.placement(asset))?;
        self.data.failed_assets.remove(&asset);
        self.data.ready_assets.insert(asset);
        self.refresh(sink);
        Ok(())
    }

    /// A layer asset advertised present failed to load or build. Its step stays empty.
    pub fn asset_failed(&mut self, asset: AssetLayer) {
        if self.torn_down || self.data.ready_assets.contains(&asset) {
            return;
        }
        warn!("{:?} layer unavailable, its step will render empty", asset);
        self.data.failed_assets.insert(asset);
    }

    /// Both drillhole collections loaded. The scene frame is fixed here, once.
    pub fn drillholes_ready(&mut self, index: DrillholeIndex, sink: &mut impl SceneSink) {
        if self.torn_down || matches!(self.data.drillholes, DrillholeData::Ready { .. }) {
            return;
        }
        let frame = SceneFrame::new(compute_center(index.reference_points()));
        info!(
            "Drillholes ready: {} lithology / {} assay holes, centre {:?}",
            index.hole_count(Dataset::Lithology),
            index.hole_count(Dataset::Assay),
            frame.center
        );
        self.data.drillholes = DrillholeData::Ready { index, frame };
        if self.data.ready_assets.contains(&AssetLayer::OreBody) {
            sink.place(AssetLayer::OreBody, self.placement(AssetLayer::OreBody));
        }
        self.refresh(sink);
    }

    /// Drillhole loading failed. Drillhole steps stay navigable and empty.
    pub fn drillholes_failed(&mut self, sink: &mut impl SceneSink) {
        if self.torn_down || matches!(self.data.drillholes, DrillholeData::Ready { .. }) {
            return;
        }
        warn!("Drillhole records unavailable, drillhole steps will render empty");
        self.data.drillholes = DrillholeData::Failed;
        self.refresh(sink);
    }

    /// Re-derive the visible layer for the current state. Returns whether the scene changed.
    pub fn refresh(&mut self, sink: &mut impl SceneSink) -> bool {
        if self.torn_down {
            return false;
        }

        let diff = transition(
            self.visible,
            self.current_step(),
            self.colour_mode,
            &self.data,
            &self.style,
        );
        if diff.is_empty() {
            return false;
        }

        if let Some(previous) = diff.detach {
            sink.detach(previous);
        }
        self.visible = None;
        self.legend = None;
        self.cylinder_count = 0;

        if let Some(content) = &diff.attach {
            sink.attach(content);
            self.visible = Some(content.id());
            if let LayerContent::Drillholes(layer) = content {
                self.cylinder_count = layer.cylinders.len();
                self.legend = self.derive_legend(layer.dataset, layer.mode);
            }
        }

        true
    }

    fn derive_legend(&self, dataset: Dataset, mode: ColourMode) -> Option<Legend> {
        match &self.data.drillholes {
            DrillholeData::Ready { index, .. } => {
                Legend::derive(index.renderable_segments(dataset), mode, &self.style.policy)
            }
            _ => None,
        }
    }

    /// Detach the visible layer and release every constructed asset exactly once.
    pub fn teardown(&mut self, sink: &mut impl SceneSink) {
        if self.torn_down {
            return;
        }
        if let Some(visible) = self.visible.take() {
            sink.detach(visible);
        }
        for asset in std::mem::take(&mut self.data.ready_assets) {
            sink.dispose(asset);
        }
        self.legend = None;
        self.cylinder_count = 0;
        self.torn_down = true;
        info!("Presentation torn down");
    }
}
