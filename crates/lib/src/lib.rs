//! Lintra core library — config, language classification, translation
//! dispatch, LINE channel, and gateway used by the CLI.

pub mod classify;
pub mod config;
pub mod dispatch;
pub mod gateway;
pub mod line;
pub mod translate;
