//! tracing 기반 내레이터

use hookline_core::Narrator;
use tracing::info;

/// 서술을 `info!` 이벤트로 기록하는 내레이터
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNarrator;

impl Narrator for TracingNarrator {
    fn test_name(&self, name: &str) {
        info!(test = name, "test case");
    }

    fn step(&self, description: &str) {
        info!(step = description, "test step");
    }

    fn log(&self, message: &str) {
        info!(detail = message, "test log");
    }
}
