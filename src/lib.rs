//! Arch Linux 유지보수 및 개발 환경 설치 도구
//!
//! `archmaint`와 `devenv` 두 바이너리가 공유하는 라이브러리입니다.

pub mod cli;
pub mod config;
pub mod devenv;
pub mod error;
pub mod executor;
pub mod history;
pub mod logging;
pub mod maintenance;
pub mod orchestrator;
pub mod ui;

#[cfg(test)]
mod testing;

pub use error::{MaintError, Result};
