pub mod axes;
pub mod legend;
pub mod margins;
pub mod stats;
