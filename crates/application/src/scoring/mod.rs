//! Scoring module - turns an uploaded file into a result sidecar
//!
//! Uploads are CSV files with a header row. Every row is scored by a
//! [`RowScorer`](leaderboard_domain::RowScorer), strictly in order, and the
//! per-row scores are averaged into a
//! [`SidecarResult`](leaderboard_domain::SidecarResult).

mod evaluators;
mod results;
mod row_scorer;
mod run;
mod upload;

pub use evaluators::*;
pub use results::*;
pub use row_scorer::*;
pub use run::*;
pub use upload::*;
