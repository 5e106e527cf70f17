pub mod annotate;
pub mod bar;
pub mod bear;
pub mod bull;
pub mod comparison;
pub mod config;
pub mod constant;
pub mod engine;
pub mod frame;
pub mod logging;
pub mod receiver;
pub mod utils;

pub use annotate::{AnnotatedVertex, LineAnnotator};
pub use bar::{PricePoint, PriceSeries};
pub use bear::{BearBox, BearBoxDetector};
pub use bull::{BullBox, BullBoxDetector};
pub use comparison::{ComparisonChart, ComparisonPoint, ComparisonSeries, ComparisonSeriesBuilder};
pub use config::{
    BearBoxConfig, BearBoxConfigPatch, BoxProfileConfig, BullBoxConfig, BullBoxConfigPatch,
    PhasePatch,
};
pub use constant::{BoxExit, Const, DataError, BOX_PALETTE, COLOR_NAMES};
pub use engine::{BearAnalysis, BullAnalysis, CycleAnalysis, CycleAnalysisEngine, CycleInfo};
pub use frame::{bear_box_frame, bull_box_frame, write_box_tables};
pub use logging::{init_logging, init_logging_with_level};
pub use receiver::{group_by_cycle, CycleDataLoader, CycleRow};
