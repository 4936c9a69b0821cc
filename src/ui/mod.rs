pub mod chart;
pub mod table;
pub mod timeframe;

pub use chart::{render_chart, ChartArtifacts};
pub use table::render_table;
pub use timeframe::Timeframe;
