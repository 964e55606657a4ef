//! Idle/Playing state machine and the session loop.

use super::clock::Clock;
use crate::config::ViewerConfig;
use crate::error::ComputationError;
use crate::filtration::FiltrationParameter;
use crate::session::{Frame, Input, Session};
use serde::Serialize;
use std::time::Duration;
use tokio::sync::mpsc::error::TryRecvError;
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaybackState {
    Idle,
    Playing,
}

/// What a finished [`AnimationDriver::run`] did
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RunSummary {
    /// Frames handed to the frame callback
    pub frames: u64,
    /// Animation ticks, i.e. radius advances
    pub ticks: u64,
    pub final_radius: f64,
}

/// Steps the radius on a fixed cadence while autoplay is on.
#[derive(Debug, Clone)]
pub struct AnimationDriver {
    state: PlaybackState,
    step: f64,
    cadence: Duration,
    ticks: u64,
}

impl AnimationDriver {
    pub fn new(step: f64, cadence: Duration) -> Self {
        Self {
            state: PlaybackState::Idle,
            step,
            cadence,
            ticks: 0,
        }
    }

    /// Driver using the configured step and cadence, already playing if
    /// autoplay is enabled.
    pub fn from_config(config: &ViewerConfig) -> Self {
        let mut driver = Self::new(config.animation.step, config.animation.cadence());
        if config.autoplay {
            driver.state = PlaybackState::Playing;
        }
        driver
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn is_playing(&self) -> bool {
        self.state == PlaybackState::Playing
    }

    pub fn step(&self) -> f64 {
        self.step
    }

    pub fn cadence(&self) -> Duration {
        self.cadence
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn play(&mut self) {
        self.set_autoplay(true);
    }

    pub fn pause(&mut self) {
        self.set_autoplay(false);
    }

    /// Autoplay checkbox. Takes effect at the next tick.
    pub fn set_autoplay(&mut self, on: bool) {
        let next = if on {
            PlaybackState::Playing
        } else {
            PlaybackState::Idle
        };
        if next != self.state {
            info!(from = ?self.state, to = ?next, "playback state changed");
            self.state = next;
        }
    }

    /// Advance `parameter` by one step, wrapping past the top of its range.
    ///
    /// Returns the new radius, or `None` when idle.
    pub fn advance(&mut self, parameter: &mut FiltrationParameter) -> Option<f64> {
        if !self.is_playing() {
            return None;
        }
        self.ticks += 1;
        Some(parameter.advance_wrapping(self.step))
    }

    /// One animation tick: advance the radius, wait the cadence, re-run
    /// the pipeline. `None` when idle.
    pub async fn tick<C>(&mut self, clock: &C, session: &mut Session) -> Option<Frame>
    where
        C: Clock + ?Sized,
    {
        self.advance_and_wait(clock, session).await?;
        if let Some(job) = session.prepare() {
            let key = job.key();
            let result = tokio::task::spawn_blocking(move || job.run())
                .await
                .unwrap_or_else(|err| Err(ComputationError::backend(err.to_string())));
            session.complete(key, result);
        }
        Some(session.render())
    }

    async fn advance_and_wait<C>(&mut self, clock: &C, session: &mut Session) -> Option<f64>
    where
        C: Clock + ?Sized,
    {
        let radius = self.advance(session.parameter_mut())?;
        debug!(tick = self.ticks, radius, "animation tick");
        clock.sleep(self.cadence).await;
        Some(radius)
    }

    /// Own `session` until a [`Input::Quit`] arrives or every sender is
    /// dropped.
    ///
    /// Renders once up front, then alternates between draining queued
    /// input and either ticking (Playing) or waiting for input (Idle).
    /// Every frame is passed to `on_frame`. Diagrams are computed on the
    /// blocking pool; input arriving meanwhile is applied before the
    /// frame is drawn.
    pub async fn run<C, F>(
        &mut self,
        clock: &C,
        session: &mut Session,
        inputs: &mut UnboundedReceiver<Input>,
        mut on_frame: F,
    ) -> RunSummary
    where
        C: Clock + ?Sized,
        F: FnMut(&Frame),
    {
        info!(state = ?self.state, radius = session.radius(), "animation loop started");
        let start_ticks = self.ticks;
        let mut frames = 0u64;

        let mut quit = self.emit(session, inputs, &mut on_frame, &mut frames).await;

        while !quit {
            let mut dirty = false;
            loop {
                match inputs.try_recv() {
                    Ok(Input::Quit) | Err(TryRecvError::Disconnected) => {
                        quit = true;
                        break;
                    }
                    Ok(input) => dirty |= self.handle(session, input),
                    Err(TryRecvError::Empty) => break,
                }
            }

            if dirty {
                quit |= self.emit(session, inputs, &mut on_frame, &mut frames).await;
            }
            if quit {
                break;
            }

            if self.is_playing() {
                if self.advance_and_wait(clock, session).await.is_some() {
                    quit = self.emit(session, inputs, &mut on_frame, &mut frames).await;
                }
            } else {
                match inputs.recv().await {
                    Some(Input::Quit) | None => break,
                    Some(input) => {
                        if self.handle(session, input) {
                            quit = self.emit(session, inputs, &mut on_frame, &mut frames).await;
                        }
                    }
                }
            }
        }

        let summary = RunSummary {
            frames,
            ticks: self.ticks - start_ticks,
            final_radius: session.radius(),
        };
        info!(
            frames = summary.frames,
            ticks = summary.ticks,
            "animation loop stopped"
        );
        summary
    }

    /// Settle, render and hand one frame to `on_frame`. Returns true when
    /// quit was requested while settling.
    async fn emit<F>(
        &mut self,
        session: &mut Session,
        inputs: &mut UnboundedReceiver<Input>,
        on_frame: &mut F,
        frames: &mut u64,
    ) -> bool
    where
        F: FnMut(&Frame),
    {
        let quit = self.settle(session, inputs).await;
        on_frame(&session.render());
        *frames += 1;
        quit
    }

    /// Run the computations the next render needs on the blocking pool.
    ///
    /// Queued input is applied while a computation is in flight; if it
    /// moves the radius or replaces the cloud, the new state is computed
    /// next. Returns true when quit was requested or every sender is gone.
    async fn settle(&mut self, session: &mut Session, inputs: &mut UnboundedReceiver<Input>) -> bool {
        let mut quit = false;
        while let Some(job) = session.prepare() {
            let key = job.key();
            debug!(radius = job.radius(), "computing diagrams");
            let mut computation = tokio::task::spawn_blocking(move || job.run());

            let result = loop {
                tokio::select! {
                    biased;
                    input = inputs.recv(), if !quit => match input {
                        Some(Input::Quit) | None => quit = true,
                        Some(input) => {
                            self.handle(session, input);
                        }
                    },
                    joined = &mut computation => {
                        break joined.unwrap_or_else(|err| Err(ComputationError::backend(err.to_string())));
                    }
                }
            };
            session.complete(key, result);
        }
        quit
    }

    /// Route one input. Returns true when a re-render is needed.
    fn handle(&mut self, session: &mut Session, input: Input) -> bool {
        match input {
            Input::SetAutoplay(on) => {
                self.set_autoplay(on);
                false
            }
            other => session.apply(other),
        }
    }
}

impl Default for AnimationDriver {
    fn default() -> Self {
        Self::from_config(&ViewerConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::ManualClock;
    use crate::cloud::{Dataset, Source};
    use crate::filtration::RadiusBounds;
    use approx::assert_relative_eq;
    use crate::engine::{PersistenceBackend, PersistenceEngine, RawDiagrams, StandardReduction};
    use ndarray::ArrayView2;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tokio::sync::mpsc;

    fn playing_session(initial: f64) -> (Session, AnimationDriver) {
        let mut config = ViewerConfig::default();
        config.radius.initial = initial;
        config.autoplay = true;
        let driver = AnimationDriver::from_config(&config);
        let mut session = Session::new(config);
        session.load(&Source::Catalog(Dataset::Demo2d)).unwrap();
        (session, driver)
    }

    #[test]
    fn test_state_transitions() {
        let mut driver = AnimationDriver::default();
        assert_eq!(driver.state(), PlaybackState::Idle);
        driver.play();
        assert!(driver.is_playing());
        driver.play();
        assert!(driver.is_playing());
        driver.pause();
        assert_eq!(driver.state(), PlaybackState::Idle);
    }

    #[test]
    fn test_wraps_from_top() {
        let mut driver = AnimationDriver::new(0.05, Duration::from_millis(400));
        let mut parameter = FiltrationParameter::new(RadiusBounds::default(), 0.96);

        assert_eq!(driver.advance(&mut parameter), None);
        driver.play();
        assert_eq!(driver.advance(&mut parameter), Some(0.01));
        assert_relative_eq!(driver.advance(&mut parameter).unwrap(), 0.06, epsilon = 1e-12);
        assert_eq!(driver.ticks(), 2);
    }

    #[tokio::test]
    async fn test_pause_effective_at_next_tick() {
        let clock = ManualClock::new();
        let (mut session, mut driver) = playing_session(0.2);

        let frame = driver.tick(&clock, &mut session).await.unwrap();
        assert_relative_eq!(frame.radius, 0.25, epsilon = 1e-12);

        driver.pause();
        assert!(driver.tick(&clock, &mut session).await.is_none());
        assert_relative_eq!(session.radius(), 0.25, epsilon = 1e-12);
        assert_eq!(clock.now(), Duration::from_millis(400));
    }

    #[tokio::test]
    async fn test_run_wraps_and_keeps_cadence() {
        let clock = ManualClock::new();
        let (mut session, mut driver) = playing_session(0.96);
        let (tx, mut rx) = mpsc::unbounded_channel();

        let mut radii = Vec::new();
        let summary = driver
            .run(&clock, &mut session, &mut rx, |frame| {
                radii.push(frame.radius);
                if radii.len() == 4 {
                    tx.send(Input::Quit).unwrap();
                }
            })
            .await;

        assert_eq!(summary.frames, 4);
        assert_eq!(summary.ticks, 3);
        assert_eq!(radii[0], 0.96);
        assert_eq!(radii[1], 0.01);
        assert_relative_eq!(radii[2], 0.06, epsilon = 1e-12);
        assert_relative_eq!(radii[3], 0.11, epsilon = 1e-12);
        assert_eq!(clock.now(), Duration::from_millis(400) * 3);
        assert_relative_eq!(summary.final_radius, 0.11, epsilon = 1e-12);
    }

    #[tokio::test]
    async fn test_idle_run_applies_queued_input() {
        let clock = ManualClock::new();
        let mut session = Session::default();
        session.load(&Source::Catalog(Dataset::Demo3d)).unwrap();
        let mut driver = AnimationDriver::default();
        let (tx, mut rx) = mpsc::unbounded_channel();

        tx.send(Input::SetRadius(0.3)).unwrap();
        tx.send(Input::ShowDimension(2, false)).unwrap();
        drop(tx);

        let mut last = None;
        let summary = driver
            .run(&clock, &mut session, &mut rx, |frame| last = Some(frame.clone()))
            .await;

        // Queued input lands while the first diagrams are computed, so the
        // only frame already shows it
        assert_eq!(summary.frames, 1);
        assert_eq!(summary.ticks, 0);
        assert_eq!(clock.now(), Duration::ZERO);
        let last = last.unwrap();
        assert_eq!(last.radius, 0.3);
        assert_eq!(last.diagrams.len(), 2);
    }

    #[tokio::test]
    async fn test_autoplay_toggle_through_inputs() {
        let clock = ManualClock::new();
        let mut session = Session::default();
        session.load(&Source::Catalog(Dataset::Demo2d)).unwrap();
        let mut driver = AnimationDriver::default();
        let (tx, mut rx) = mpsc::unbounded_channel();
        tx.send(Input::SetAutoplay(true)).unwrap();

        let mut seen = 0;
        let summary = driver
            .run(&clock, &mut session, &mut rx, |_| {
                seen += 1;
                if seen == 3 {
                    tx.send(Input::SetAutoplay(false)).unwrap();
                    tx.send(Input::Quit).unwrap();
                }
            })
            .await;

        assert_eq!(summary.ticks, 2);
        assert_eq!(driver.state(), PlaybackState::Idle);
        assert_relative_eq!(summary.final_radius, 0.15, epsilon = 1e-12);
    }

    /// Standard reduction whose first call waits for a signal
    struct GatedBackend {
        gate: std::sync::Mutex<Option<std::sync::mpsc::Receiver<()>>>,
        calls: AtomicUsize,
    }

    impl PersistenceBackend for GatedBackend {
        fn compute(
            &self,
            points: ArrayView2<'_, f64>,
            max_dimension: usize,
            distance_threshold: f64,
        ) -> Result<RawDiagrams, ComputationError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(gate) = self.gate.lock().unwrap().take() {
                gate.recv().unwrap();
            }
            StandardReduction.compute(points, max_dimension, distance_threshold)
        }
    }

    #[tokio::test]
    async fn test_input_applied_while_computing() {
        let clock = ManualClock::new();
        let (open, gate) = std::sync::mpsc::channel();
        let backend = Arc::new(GatedBackend {
            gate: std::sync::Mutex::new(Some(gate)),
            calls: AtomicUsize::new(0),
        });
        let mut session = Session::default().with_engine(PersistenceEngine::new(backend.clone()));
        session.load(&Source::Catalog(Dataset::Demo3d)).unwrap();
        let mut driver = AnimationDriver::default();
        let (tx, mut rx) = mpsc::unbounded_channel();

        // The slider moves while the first computation is stuck
        let user = tx.clone();
        let slider = std::thread::spawn(move || {
            user.send(Input::SetRadius(0.3)).unwrap();
            std::thread::sleep(Duration::from_millis(50));
            open.send(()).unwrap();
        });

        let mut radii = Vec::new();
        let summary = driver
            .run(&clock, &mut session, &mut rx, |frame| {
                radii.push(frame.radius);
                tx.send(Input::Quit).unwrap();
            })
            .await;
        slider.join().unwrap();

        assert_eq!(summary.frames, 1);
        assert_eq!(radii, vec![0.3]);
        assert_eq!(backend.calls.load(Ordering::SeqCst), 2);
        // The stale radius is memoized too
        assert_eq!(session.cache().len(), 2);
    }
}
