//! Linked airline review dashboard.
//!
//! A bar chart, a line chart and a heatmap over one static review dataset.
//! Picking an airline in one chart highlights or filters it in the others
//! through a shared [`selection::SelectionCoordinator`].

pub mod app;
pub mod charts;
pub mod color;
pub mod config;
pub mod data;
pub mod error;
pub mod selection;
pub mod state;
pub mod ui;
