//! Per-session pipeline state.

use super::frame::{DiagramSummary, Frame, Notice};
use super::input::Input;
use crate::cloud::{PointCloud, Source};
use crate::config::ViewerConfig;
use crate::engine::{distance_threshold, CacheKey, DiagramCache, PersistenceEngine};
use crate::error::{CloudError, ComputationError};
use crate::filtration::FiltrationParameter;
use crate::projection::project;
use crate::topology::{BettiNumbers, DiagramSet};
use crate::view::{filter, plot_points, DimensionSelection};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Everything one viewer session owns.
///
/// The cloud and the radius are the only inputs that invalidate diagrams;
/// selection and display settings only change what is drawn from them.
#[derive(Debug)]
pub struct Session {
    config: ViewerConfig,
    cloud: Option<Arc<PointCloud>>,
    /// Why the last load produced no cloud
    rejection: Option<Notice>,
    parameter: FiltrationParameter,
    selection: DimensionSelection,
    engine: PersistenceEngine,
    cache: DiagramCache,
    /// Result of the last detached computation, used by the next render
    ready: Option<(CacheKey, Result<Arc<DiagramSet>, ComputationError>)>,
    frames: u64,
}

/// A diagram computation for one (cloud, radius) taken out of the
/// session, so it can run on a blocking thread while the session keeps
/// taking input.
#[derive(Debug)]
pub struct DiagramJob {
    key: CacheKey,
    engine: PersistenceEngine,
    cloud: Arc<PointCloud>,
    radius: f64,
}

impl DiagramJob {
    pub fn key(&self) -> CacheKey {
        self.key
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn run(self) -> Result<DiagramSet, ComputationError> {
        self.engine.compute(&self.cloud, self.radius)
    }
}

impl Session {
    pub fn new(config: ViewerConfig) -> Self {
        let engine = PersistenceEngine::standard().with_max_dimension(config.max_dimension);
        Self {
            parameter: config.parameter(),
            selection: config.selection(),
            cache: DiagramCache::new(config.cache_capacity),
            cloud: None,
            rejection: None,
            engine,
            ready: None,
            frames: 0,
            config,
        }
    }

    /// Swap the persistence engine. It takes its dimension ceiling from
    /// the config; memoized diagrams are discarded.
    pub fn with_engine(mut self, engine: PersistenceEngine) -> Self {
        self.engine = engine.with_max_dimension(self.config.max_dimension);
        self.cache.clear();
        self.ready = None;
        self
    }

    /// Replace the active cloud.
    ///
    /// On failure the previous cloud is dropped as well: a rejected upload
    /// never leaves stale diagrams on screen.
    pub fn load(&mut self, source: &Source) -> Result<(), CloudError> {
        match source.load() {
            Ok(cloud) => {
                info!(
                    source = %source.label(),
                    points = cloud.len(),
                    dimension = cloud.dimension(),
                    "loaded point cloud"
                );
                self.cloud = Some(Arc::new(cloud));
                self.rejection = None;
                Ok(())
            }
            Err(err) => {
                warn!(source = %source.label(), error = %err, "point cloud rejected");
                self.cloud = None;
                self.rejection = Some(match &err {
                    CloudError::UnsupportedDimension(dimension) => Notice::UnsupportedDimension {
                        dimension: *dimension,
                    },
                    other => Notice::Rejected {
                        source: source.label(),
                        reason: other.to_string(),
                    },
                });
                Err(err)
            }
        }
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    pub fn cloud(&self) -> Option<&PointCloud> {
        self.cloud.as_deref()
    }

    pub fn parameter(&self) -> &FiltrationParameter {
        &self.parameter
    }

    pub fn parameter_mut(&mut self) -> &mut FiltrationParameter {
        &mut self.parameter
    }

    pub fn radius(&self) -> f64 {
        self.parameter.get()
    }

    /// Move the slider. Out-of-range values are clamped; returns the
    /// stored radius.
    pub fn set_radius(&mut self, radius: f64) -> f64 {
        self.parameter.set(radius)
    }

    pub fn selection(&self) -> &DimensionSelection {
        &self.selection
    }

    pub fn set_selection(&mut self, selection: DimensionSelection) {
        self.selection = selection;
    }

    pub fn engine(&self) -> &PersistenceEngine {
        &self.engine
    }

    pub fn cache(&self) -> &DiagramCache {
        &self.cache
    }

    /// Number of frames rendered so far
    pub fn frames(&self) -> u64 {
        self.frames
    }

    fn current_key(&self) -> Option<CacheKey> {
        let cloud = self.cloud.as_ref()?;
        Some(CacheKey::new(cloud, self.parameter.get(), self.engine.max_dimension()))
    }

    /// The computation the next render needs, if its diagrams are neither
    /// memoized nor already delivered through [`Session::complete`].
    pub fn prepare(&self) -> Option<DiagramJob> {
        let key = self.current_key()?;
        let delivered = matches!(&self.ready, Some((ready, _)) if *ready == key);
        if delivered || self.cache.contains(&key) {
            return None;
        }
        Some(DiagramJob {
            key,
            engine: self.engine.clone(),
            cloud: Arc::clone(self.cloud.as_ref()?),
            radius: self.parameter.get(),
        })
    }

    /// Hand back the result of a [`DiagramJob`]. Successful sets are
    /// memoized; either way the next render for `key` uses the result.
    pub fn complete(&mut self, key: CacheKey, result: Result<DiagramSet, ComputationError>) {
        let result = result.map(Arc::new);
        if let Ok(set) = &result {
            self.cache.insert(key, Arc::clone(set));
        }
        self.ready = Some((key, result));
    }

    /// Diagrams for the current cloud and radius, memoized.
    ///
    /// `Ok(None)` when no cloud is loaded.
    pub fn diagrams(&mut self) -> Result<Option<Arc<DiagramSet>>, ComputationError> {
        let Some(key) = self.current_key() else {
            return Ok(None);
        };
        if let Some((ready, result)) = self.ready.take() {
            if ready == key {
                return result.map(Some);
            }
        }
        let Some(cloud) = self.cloud.as_ref() else {
            return Ok(None);
        };
        let radius = self.parameter.get();
        let engine = &self.engine;
        self.cache
            .get_or_try_insert(key, || engine.compute(cloud, radius))
            .map(Some)
    }

    /// Apply one input. Returns true when the visible output changed.
    ///
    /// Autoplay and quit belong to the animation driver and are ignored
    /// here.
    pub fn apply(&mut self, input: Input) -> bool {
        match input {
            Input::SetRadius(radius) => {
                let before = self.parameter.get();
                self.set_radius(radius) != before
            }
            Input::SetSelection(selection) => {
                let changed = selection != self.selection;
                self.selection = selection;
                changed
            }
            Input::ShowDimension(dimension, shown) => {
                let changed = self.selection.contains(dimension) != shown;
                self.selection.set(dimension, shown);
                changed
            }
            Input::Load(source) => {
                // A failed load still changes the screen: it shows a notice
                let _ = self.load(&source);
                true
            }
            Input::SetAutoplay(_) | Input::Quit => false,
        }
    }

    /// Run the pipeline for the current state.
    ///
    /// Never fails: rejected sources and backend errors become notices on
    /// the frame.
    pub fn render(&mut self) -> Frame {
        self.frames += 1;
        let seq = self.frames;
        let radius = self.parameter.get();
        let threshold = distance_threshold(radius);

        let Some(cloud) = self.cloud.clone() else {
            let notice = self.rejection.clone().unwrap_or(Notice::NoCloud);
            return Frame::blank(seq, radius, threshold, vec![notice]);
        };

        let primitives = project(&cloud, radius);

        let mut notices = Vec::new();
        let (set, betti) = match self.diagrams() {
            Ok(Some(set)) => {
                let betti = BettiNumbers::at_threshold(&set);
                (set, Some(betti))
            }
            Ok(None) => (
                Arc::new(DiagramSet::empty(self.engine.max_dimension(), threshold)),
                None,
            ),
            Err(err) => {
                warn!(radius, error = %err, "persistence computation failed");
                notices.push(Notice::ComputationFailed {
                    reason: err.to_string(),
                });
                (
                    Arc::new(DiagramSet::empty(self.engine.max_dimension(), threshold)),
                    None,
                )
            }
        };

        let shown = filter(&set, &self.selection);
        let plot = plot_points(&shown, self.config.display_range, self.config.plot_mode);
        let summaries = shown.iter().map(|(_, d)| DiagramSummary::of(d)).collect();
        let diagrams = shown.iter().map(|(_, d)| (*d).clone()).collect();

        debug!(
            seq,
            radius,
            threshold,
            shown = %self.selection,
            cache_hits = self.cache.hits(),
            "rendered frame"
        );

        Frame {
            seq,
            radius,
            threshold,
            dimension: Some(cloud.dimension()),
            points: cloud.len(),
            primitives,
            diagrams,
            summaries,
            plot,
            betti,
            notices,
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(ViewerConfig::default())
    }
}
