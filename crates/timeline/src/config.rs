//! 타임라인 엔진 설정
//!
//! [`TimelineConfig`]는 core의 `[emission]`, `[parser]` 섹션을 합쳐
//! 명령 빌더와 파서가 사용하는 값을 제공합니다.
//!
//! # 사용 예시
//! ```
//! use hookline_core::config::HooklineConfig;
//! use hookline_timeline::config::TimelineConfig;
//!
//! let core_config = HooklineConfig::default();
//! let config = TimelineConfig::from_core(&core_config);
//! assert_eq!(config.shell, "sh");
//! ```

use hookline_core::config::HooklineConfig;
use serde::{Deserialize, Serialize};

use crate::error::TimelineError;

/// 타임라인 엔진 설정
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineConfig {
    /// 방출 스크립트를 실행할 셸
    pub shell: String,
    /// 논리 타임스탬프 시계 소스
    pub clock_source: String,
    /// 훅 이벤트 기록 대상
    pub hook_sink: String,
    /// 지연/종료 대기 시간 상한 (초)
    pub max_delay_secs: u32,
    /// 출력 덩어리 하나의 최대 크기 (바이트)
    pub max_blob_bytes: usize,
}

impl Default for TimelineConfig {
    fn default() -> Self {
        Self {
            shell: "sh".to_owned(),
            clock_source: "/proc/uptime".to_owned(),
            hook_sink: "/proc/1/fd/1".to_owned(),
            max_delay_secs: 3600,
            max_blob_bytes: 4 * 1024 * 1024,
        }
    }
}

/// 설정 상한값 상수
const MAX_DELAY_SECS_LIMIT: u32 = 86_400;
const MAX_BLOB_BYTES_LIMIT: usize = 256 * 1024 * 1024;

impl TimelineConfig {
    /// core 설정에서 타임라인 설정을 생성합니다.
    pub fn from_core(core: &HooklineConfig) -> Self {
        Self {
            shell: core.emission.shell.clone(),
            clock_source: core.emission.clock_source.clone(),
            hook_sink: core.emission.hook_sink.clone(),
            max_delay_secs: core.emission.max_delay_secs,
            max_blob_bytes: core.parser.max_blob_bytes,
        }
    }

    /// 설정값의 유효성을 검증합니다.
    pub fn validate(&self) -> Result<(), TimelineError> {
        if self.shell.trim().is_empty() || self.shell.chars().any(char::is_whitespace) {
            return Err(TimelineError::Config {
                field: "shell".to_owned(),
                reason: "must be a single non-empty program name".to_owned(),
            });
        }

        for (field, value) in [
            ("clock_source", &self.clock_source),
            ("hook_sink", &self.hook_sink),
        ] {
            if !is_script_safe_path(value) {
                return Err(TimelineError::Config {
                    field: field.to_owned(),
                    reason: format!("'{value}' must be an absolute path without shell metacharacters"),
                });
            }
        }

        if self.max_delay_secs == 0 || self.max_delay_secs > MAX_DELAY_SECS_LIMIT {
            return Err(TimelineError::Config {
                field: "max_delay_secs".to_owned(),
                reason: format!("must be 1-{MAX_DELAY_SECS_LIMIT}"),
            });
        }

        if self.max_blob_bytes == 0 || self.max_blob_bytes > MAX_BLOB_BYTES_LIMIT {
            return Err(TimelineError::Config {
                field: "max_blob_bytes".to_owned(),
                reason: format!("must be 1-{MAX_BLOB_BYTES_LIMIT}"),
            });
        }

        Ok(())
    }
}

// 스크립트에 따옴표 없이 삽입되는 경로
fn is_script_safe_path(value: &str) -> bool {
    value.len() > 1
        && value.starts_with('/')
        && value
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'/' | b'.' | b'_' | b'-'))
}

/// 타임라인 설정 빌더
#[derive(Default)]
pub struct TimelineConfigBuilder {
    config: TimelineConfig,
}

impl TimelineConfigBuilder {
    /// 새 빌더를 생성합니다.
    pub fn new() -> Self {
        Self::default()
    }

    /// 셸을 설정합니다.
    pub fn shell(mut self, shell: impl Into<String>) -> Self {
        self.config.shell = shell.into();
        self
    }

    /// 시계 소스 경로를 설정합니다.
    pub fn clock_source(mut self, path: impl Into<String>) -> Self {
        self.config.clock_source = path.into();
        self
    }

    /// 훅 이벤트 기록 대상을 설정합니다.
    pub fn hook_sink(mut self, path: impl Into<String>) -> Self {
        self.config.hook_sink = path.into();
        self
    }

    /// 지연 시간 상한(초)을 설정합니다.
    pub fn max_delay_secs(mut self, secs: u32) -> Self {
        self.config.max_delay_secs = secs;
        self
    }

    /// 출력 크기 상한(바이트)을 설정합니다.
    pub fn max_blob_bytes(mut self, bytes: usize) -> Self {
        self.config.max_blob_bytes = bytes;
        self
    }

    /// 설정을 검증하고 `TimelineConfig`를 생성합니다.
    pub fn build(self) -> Result<TimelineConfig, TimelineError> {
        self.config.validate()?;
        Ok(self.config)
    }
}
