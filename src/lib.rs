pub mod agenda;
pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod household;
pub mod storage;
pub mod telemetry;
