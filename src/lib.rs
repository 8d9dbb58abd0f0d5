pub mod cards;
pub mod config;
pub mod demo;
pub mod error;
pub mod logging;
pub mod lookup;
pub mod metrics;
pub mod provider;
pub mod refresh;
pub mod selection;
pub mod state;
pub mod stats_api;
