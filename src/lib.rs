//! Ledgerpie draws animated category pie charts for a personal-finance ledger.
//!
//! Per-category totals are normalized into a [`ChartDataset`], laid out as clockwise wedges from
//! 12 o'clock, rasterized on the CPU, and revealed by an [`AnimationController`] that grows every
//! wedge from nothing to its final share:
//!
//! - Build a [`ChartDataset`] from [`AggregateRecord`]s or an [`AggregationSource`]
//! - Create a backend with [`create_backend`] and a [`ChartSurface`] to show frames on
//! - Drive it with an [`AnimationController`] on a [`TickScheduler`]
#![forbid(unsafe_code)]

mod foundation;

pub(crate) mod animation;
pub(crate) mod config;
pub(crate) mod data;
pub(crate) mod layout;
pub(crate) mod render;

pub use crate::foundation::core::{Point, Progress, Rgba8, RunId};
pub use crate::foundation::error::{ChartError, ChartResult};

pub use crate::animation::controller::{AnimationController, AnimationPhase, ControllerStats};
pub use crate::animation::opts::AnimationOpts;
pub use crate::animation::scheduler::{
    ManualScheduler, TickFlow, TickFn, TickHandle, TickScheduler,
};
pub use crate::animation::surface::{
    ChartSurface, FrameMeta, InMemorySurface, PngSequenceSurface,
};
pub use crate::config::{ChartConfig, ChartInput};
pub use crate::data::color::{ColorDef, FALLBACK_COLOR, PLACEHOLDER_COLOR, resolve_category_color};
pub use crate::data::dataset::ChartDataset;
pub use crate::data::ledger::{
    AggregationSource, Category, InMemoryLedger, LedgerEntry, LedgerPartition,
};
pub use crate::data::money::{format_minor_units, format_signed_minor_units};
pub use crate::data::record::{AggregateRecord, CategoryAggregate};
pub use crate::layout::frame::{ChartFrame, LegendEntry, compose_frame, legend_entries};
pub use crate::layout::label::{LABEL_RADIUS, LabelAnchor, PercentLabels, place_labels};
pub use crate::layout::sector::{
    SWEEP_FLOOR, START_ANGLE_DEG, WedgeGeometry, WedgeKind, layout_sectors,
};
pub use crate::render::backend::{BackendKind, ChartBackend, FrameRGBA, create_backend};
pub use crate::render::cpu::CpuChartBackend;
pub use crate::render::style::{ChartGeometry, ChartStyle};
