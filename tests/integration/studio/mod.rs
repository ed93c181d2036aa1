//! Studio domain integration tests

mod export;
mod generation;
mod storyboard;
