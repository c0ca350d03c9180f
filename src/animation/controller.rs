use std::cell::{Ref, RefCell, RefMut};
use std::rc::{Rc, Weak};

use crate::animation::opts::AnimationOpts;
use crate::animation::scheduler::{TickFlow, TickHandle, TickScheduler};
use crate::animation::surface::{ChartSurface, FrameMeta};
use crate::data::dataset::ChartDataset;
use crate::data::ledger::{AggregationSource, LedgerPartition};
use crate::foundation::core::{Progress, RunId};
use crate::foundation::error::{ChartError, ChartResult};
use crate::layout::frame::{ChartFrame, compose_frame};
use crate::layout::label::PercentLabels;
use crate::render::backend::{ChartBackend, FrameRGBA};

/// Lifecycle of the most recent animation run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AnimationPhase {
    /// No run was ever started.
    Idle,
    Running,
    /// Progress reached 1 and the tick was cancelled.
    Completed,
    /// Retired by `cancel`, a new `start`/`render`/`clear`, or through its handle.
    Cancelled,
}

/// Counters accumulated over the controller's lifetime.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ControllerStats {
    pub runs_started: u64,
    pub runs_completed: u64,
    pub runs_cancelled: u64,
    pub frames_presented: u64,
    /// Frames that failed to render or present. The surface kept its previous frame.
    pub failed_frames: u64,
}

struct ActiveRun {
    id: RunId,
    dataset: ChartDataset,
    percents: PercentLabels,
    opts: AnimationOpts,
    ticks: u32,
    progress: Progress,
    handle: TickHandle,
    phase: AnimationPhase,
}

struct ControllerCore<S> {
    backend: Box<dyn ChartBackend>,
    surface: S,
    opts: AnimationOpts,
    next_run: u64,
    run: Option<ActiveRun>,
    stats: ControllerStats,
}

impl<S: ChartSurface> ControllerCore<S> {
    fn next_run_id(&mut self) -> RunId {
        self.next_run += 1;
        RunId(self.next_run)
    }

    /// Cancel the live run, if any. Returns `true` when a run was retired.
    fn retire_run(&mut self) -> bool {
        let Some(active) = self.run.as_mut() else {
            return false;
        };
        if active.phase != AnimationPhase::Running {
            return false;
        }
        let externally_cancelled = active.handle.is_cancelled();
        active.handle.cancel();
        active.phase = AnimationPhase::Cancelled;
        self.stats.runs_cancelled += 1;
        tracing::debug!(
            run = active.id.0,
            ticks = active.ticks,
            externally_cancelled,
            "animation run retired"
        );
        !externally_cancelled
    }

    fn draw(&mut self, frame: &ChartFrame, meta: FrameMeta) -> ChartResult<()> {
        let pixels = self.backend.render_frame(frame)?;
        self.present(&pixels, meta)
    }

    fn present(&mut self, pixels: &FrameRGBA, meta: FrameMeta) -> ChartResult<()> {
        self.surface.present(pixels, meta)?;
        self.stats.frames_presented += 1;
        Ok(())
    }

    fn draw_static(&mut self, dataset: &ChartDataset, progress: Progress) -> ChartResult<()> {
        self.retire_run();
        let run = self.next_run_id();
        let percents = PercentLabels::new(dataset);
        let frame = compose_frame(dataset, &percents, progress);
        let meta = FrameMeta {
            run,
            tick: 0,
            progress,
        };
        self.draw(&frame, meta).inspect_err(|e| {
            self.stats.failed_frames += 1;
            tracing::error!(run = run.0, error = %e, "static chart render failed");
        })
    }

    fn advance_run(&mut self, run: RunId) -> TickFlow {
        let Some(active) = self
            .run
            .as_mut()
            .filter(|a| a.id == run && a.phase == AnimationPhase::Running)
        else {
            return TickFlow::Stop;
        };

        active.ticks += 1;
        active.progress = Progress::clamped(active.opts.progress_after(active.ticks));
        let progress = active.progress;
        let tick = active.ticks;
        let frame = compose_frame(&active.dataset, &active.percents, progress);
        let done = progress.is_full();
        if done {
            active.phase = AnimationPhase::Completed;
            active.handle.cancel();
        }

        let meta = FrameMeta {
            run,
            tick,
            progress,
        };
        if let Err(e) = self.draw(&frame, meta) {
            self.stats.failed_frames += 1;
            tracing::error!(run = run.0, tick, error = %e, "animation frame failed; keeping previous frame");
        }

        if done {
            self.stats.runs_completed += 1;
            tracing::debug!(run = run.0, ticks = tick, "animation run completed");
            TickFlow::Stop
        } else {
            TickFlow::Continue
        }
    }
}

fn on_tick<S: ChartSurface>(core: &Weak<RefCell<ControllerCore<S>>>, run: RunId) -> TickFlow {
    let Some(cell) = core.upgrade() else {
        return TickFlow::Stop;
    };
    let Ok(mut core) = cell.try_borrow_mut() else {
        tracing::warn!(run = run.0, "controller busy; tick skipped");
        return TickFlow::Continue;
    };
    core.advance_run(run)
}

/// Owns one chart surface and drives the fill-in animation on it.
///
/// At most one run is live at a time: `start`, `render`, `render_at` and `clear` retire the
/// previous run before touching the surface, and a retired run's tick never draws again.
/// Frames are presented only after a successful render, so a failure leaves the last good frame
/// on display.
pub struct AnimationController<S: ChartSurface + 'static> {
    core: Rc<RefCell<ControllerCore<S>>>,
    scheduler: Rc<dyn TickScheduler>,
}

impl<S: ChartSurface + 'static> AnimationController<S> {
    pub fn new(
        backend: Box<dyn ChartBackend>,
        surface: S,
        scheduler: Rc<dyn TickScheduler>,
        opts: AnimationOpts,
    ) -> ChartResult<Self> {
        opts.validate()?;
        Ok(Self {
            core: Rc::new(RefCell::new(ControllerCore {
                backend,
                surface,
                opts,
                next_run: 0,
                run: None,
                stats: ControllerStats::default(),
            })),
            scheduler,
        })
    }

    /// Replace the pacing used by subsequent `start` calls. A live run keeps its own pacing.
    pub fn set_opts(&self, opts: AnimationOpts) -> ChartResult<()> {
        opts.validate()?;
        self.core_mut()?.opts = opts;
        Ok(())
    }

    pub fn opts(&self) -> AnimationOpts {
        self.core.borrow().opts
    }

    /// Animate `dataset` from progress 0 to 1, replacing any live run.
    ///
    /// Nothing is drawn until the first tick. The returned handle cancels this run only.
    #[tracing::instrument(level = "debug", skip_all, fields(entries = dataset.len()))]
    pub fn start(&self, dataset: ChartDataset) -> ChartResult<TickHandle> {
        let mut core = self.core_mut()?;
        core.retire_run();
        let run = core.next_run_id();
        let opts = core.opts;

        let weak = Rc::downgrade(&self.core);
        let handle = self
            .scheduler
            .schedule_repeating(opts.interval, Box::new(move || on_tick(&weak, run)));

        tracing::debug!(
            run = run.0,
            ticks = opts.total_ticks(),
            interval = ?opts.interval,
            "animation run started"
        );
        core.run = Some(ActiveRun {
            id: run,
            percents: PercentLabels::new(&dataset),
            dataset,
            opts,
            ticks: 0,
            progress: Progress::ZERO,
            handle: handle.clone(),
            phase: AnimationPhase::Running,
        });
        core.stats.runs_started += 1;
        Ok(handle)
    }

    /// Draw the final chart for `dataset` once, retiring any live run.
    pub fn render(&self, dataset: &ChartDataset) -> ChartResult<()> {
        self.core_mut()?.draw_static(dataset, Progress::FULL)
    }

    /// Draw `dataset` at an arbitrary progress in `[0, 1]`, retiring any live run.
    pub fn render_at(&self, dataset: &ChartDataset, progress: f64) -> ChartResult<()> {
        let progress = Progress::new(progress)?;
        self.core_mut()?.draw_static(dataset, progress)
    }

    /// Fetch `partition` from `source` and animate it.
    pub fn start_from(
        &self,
        source: &dyn AggregationSource,
        partition: LedgerPartition,
    ) -> ChartResult<TickHandle> {
        self.start(source.dataset(partition)?)
    }

    /// Fetch `partition` from `source` and draw its final chart.
    pub fn render_from(
        &self,
        source: &dyn AggregationSource,
        partition: LedgerPartition,
    ) -> ChartResult<()> {
        self.render(&source.dataset(partition)?)
    }

    /// Retire the live run. Returns `false` when nothing was running.
    pub fn cancel(&self) -> ChartResult<bool> {
        Ok(self.core_mut()?.retire_run())
    }

    /// Retire the live run and present a fully transparent frame.
    pub fn clear(&self) -> ChartResult<()> {
        let mut core = self.core_mut()?;
        core.retire_run();
        let size = core.backend.frame_size();
        let meta = FrameMeta {
            run: core.next_run_id(),
            tick: 0,
            progress: Progress::ZERO,
        };
        core.present(&FrameRGBA::blank(size, size), meta)
    }

    pub fn phase(&self) -> AnimationPhase {
        let core = self.core.borrow();
        match &core.run {
            None => AnimationPhase::Idle,
            Some(a) if a.phase == AnimationPhase::Running && a.handle.is_cancelled() => {
                AnimationPhase::Cancelled
            }
            Some(a) => a.phase,
        }
    }

    /// Progress of the most recent run; zero before the first start.
    pub fn progress(&self) -> Progress {
        self.core
            .borrow()
            .run
            .as_ref()
            .map_or(Progress::ZERO, |a| a.progress)
    }

    pub fn current_run(&self) -> Option<RunId> {
        self.core.borrow().run.as_ref().map(|a| a.id)
    }

    pub fn stats(&self) -> ControllerStats {
        self.core.borrow().stats
    }

    /// Shared access to the surface, e.g. to inspect what is on display.
    pub fn surface(&self) -> ChartResult<Ref<'_, S>> {
        self.core
            .try_borrow()
            .map(|core| Ref::map(core, |c| &c.surface))
            .map_err(|_| ChartError::Other(anyhow::anyhow!("animation controller is busy")))
    }

    fn core_mut(&self) -> ChartResult<RefMut<'_, ControllerCore<S>>> {
        self.core.try_borrow_mut().map_err(|_| {
            ChartError::Other(anyhow::anyhow!(
                "animation controller is busy (re-entrant call from a backend or surface)"
            ))
        })
    }
}

impl<S: ChartSurface + 'static> Drop for AnimationController<S> {
    fn drop(&mut self) {
        if let Ok(mut core) = self.core.try_borrow_mut() {
            core.retire_run();
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/controller.rs"]
mod tests;
