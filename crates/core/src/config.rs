//! 설정 관리: hookline.toml 파싱 및 런타임 설정
//!
//! [`HooklineConfig`]는 모든 모듈의 설정을 담는 최상위 구조체입니다.
//!
//! # 설정 로딩 우선순위
//! 1. CLI 인자 (최고 우선)
//! 2. 환경변수 (`HOOKLINE_EMISSION_SHELL=bash` 형식)
//! 3. 설정 파일 (`hookline.toml`)
//! 4. 기본값 (`Default` 구현)
//!
//! # 사용 예시
//! ```no_run
//! # async fn example() -> Result<(), hookline_core::error::HooklineError> {
//! use hookline_core::config::HooklineConfig;
//!
//! // 파일에서 로드 + 환경변수 오버라이드
//! let config = HooklineConfig::load("hookline.toml").await?;
//!
//! // TOML 문자열에서 직접 파싱
//! let config = HooklineConfig::parse("[general]\nlog_level = \"debug\"")?;
//! # Ok(())
//! # }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{ConfigError, HooklineError};

/// Hookline 통합 설정
///
/// `hookline.toml` 파일의 최상위 구조를 나타냅니다.
/// 각 모듈은 자기 섹션만 읽어 사용합니다.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HooklineConfig {
    /// 일반 설정
    #[serde(default)]
    pub general: GeneralConfig,
    /// 이벤트 방출 명령 설정
    #[serde(default)]
    pub emission: EmissionConfig,
    /// 타임라인 파서 설정
    #[serde(default)]
    pub parser: ParserConfig,
}

impl HooklineConfig {
    /// TOML 파일에서 설정을 로드하고 환경변수 오버라이드를 적용합니다.
    ///
    /// 설정 로딩 순서:
    /// 1. TOML 파일 파싱
    /// 2. 환경변수 오버라이드 적용
    /// 3. 유효성 검증
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, HooklineError> {
        let mut config = Self::from_file(path).await?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// TOML 파일에서 설정을 로드합니다 (환경변수 오버라이드 없음).
    pub async fn from_file(path: impl AsRef<Path>) -> Result<Self, HooklineError> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                HooklineError::Config(ConfigError::FileNotFound {
                    path: path.display().to_string(),
                })
            } else {
                HooklineError::Io(e)
            }
        })?;
        let config = Self::parse(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// TOML 문자열에서 설정을 파싱합니다.
    pub fn parse(toml_str: &str) -> Result<Self, HooklineError> {
        toml::from_str(toml_str).map_err(|e| {
            HooklineError::Config(ConfigError::ParseFailed {
                reason: e.to_string(),
            })
        })
    }

    /// 환경변수로 설정값을 오버라이드합니다.
    ///
    /// 환경변수 네이밍 규칙: `HOOKLINE_{SECTION}_{FIELD}`
    /// 예: `HOOKLINE_PARSER_MAX_BLOB_BYTES=1048576`
    pub fn apply_env_overrides(&mut self) {
        // General
        override_string(&mut self.general.log_level, "HOOKLINE_GENERAL_LOG_LEVEL");
        override_string(&mut self.general.log_format, "HOOKLINE_GENERAL_LOG_FORMAT");

        // Emission
        override_string(&mut self.emission.shell, "HOOKLINE_EMISSION_SHELL");
        override_string(
            &mut self.emission.clock_source,
            "HOOKLINE_EMISSION_CLOCK_SOURCE",
        );
        override_string(&mut self.emission.hook_sink, "HOOKLINE_EMISSION_HOOK_SINK");
        override_u32(
            &mut self.emission.max_delay_secs,
            "HOOKLINE_EMISSION_MAX_DELAY_SECS",
        );

        // Parser
        override_usize(
            &mut self.parser.max_blob_bytes,
            "HOOKLINE_PARSER_MAX_BLOB_BYTES",
        );
    }

    /// 설정값의 유효성을 검증합니다.
    pub fn validate(&self) -> Result<(), HooklineError> {
        // log_level 검증
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.general.log_level.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "general.log_level".to_owned(),
                reason: format!("must be one of: {}", valid_levels.join(", ")),
            }
            .into());
        }

        // log_format 검증
        let valid_formats = ["json", "pretty"];
        if !valid_formats.contains(&self.general.log_format.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "general.log_format".to_owned(),
                reason: format!("must be one of: {}", valid_formats.join(", ")),
            }
            .into());
        }

        if self.emission.shell.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "emission.shell".to_owned(),
                reason: "shell must not be empty".to_owned(),
            }
            .into());
        }

        // 스크립트 안에 그대로 삽입되므로 경로는 절대 경로이며 공백/따옴표가 없어야 함
        for (field, value) in [
            ("emission.clock_source", &self.emission.clock_source),
            ("emission.hook_sink", &self.emission.hook_sink),
        ] {
            if !is_plain_absolute_path(value) {
                return Err(ConfigError::InvalidValue {
                    field: field.to_owned(),
                    reason: format!("'{value}' must be an absolute path without whitespace or quotes"),
                }
                .into());
            }
        }

        if self.emission.max_delay_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "emission.max_delay_secs".to_owned(),
                reason: "must be greater than 0".to_owned(),
            }
            .into());
        }

        if self.parser.max_blob_bytes == 0 {
            return Err(ConfigError::InvalidValue {
                field: "parser.max_blob_bytes".to_owned(),
                reason: "must be greater than 0".to_owned(),
            }
            .into());
        }

        Ok(())
    }
}

fn is_plain_absolute_path(value: &str) -> bool {
    value.starts_with('/')
        && !value
            .chars()
            .any(|c| c.is_whitespace() || matches!(c, '\'' | '"' | '`' | '$' | ';' | '\\'))
}

/// 일반 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// 로그 레벨 (trace, debug, info, warn, error)
    pub log_level: String,
    /// 로그 형식 (json, pretty)
    pub log_format: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_owned(),
            log_format: "json".to_owned(),
        }
    }
}

/// 이벤트 방출 명령 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmissionConfig {
    /// 명령을 실행할 셸
    pub shell: String,
    /// 논리 타임스탬프의 기준이 되는 시계 소스 (부팅 후 경과 시간)
    pub clock_source: String,
    /// 훅 이벤트를 기록할 대상 (대상 컨테이너의 stdout)
    pub hook_sink: String,
    /// 허용되는 최대 지연/종료 대기 시간 (초)
    pub max_delay_secs: u32,
}

impl Default for EmissionConfig {
    fn default() -> Self {
        Self {
            shell: "sh".to_owned(),
            clock_source: "/proc/uptime".to_owned(),
            hook_sink: "/proc/1/fd/1".to_owned(),
            max_delay_secs: 3600,
        }
    }
}

/// 타임라인 파서 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// 컨테이너 출력 하나의 최대 크기 (바이트)
    pub max_blob_bytes: usize,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            max_blob_bytes: 4 * 1024 * 1024, // 4MB
        }
    }
}

// --- 환경변수 오버라이드 헬퍼 ---

fn override_string(target: &mut String, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        *target = val;
    }
}

fn override_usize(target: &mut usize, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        match val.parse::<usize>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(
                env_key,
                value = val.as_str(),
                "failed to parse usize from env var, ignoring"
            ),
        }
    }
}

fn override_u32(target: &mut u32, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        match val.parse::<u32>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(
                env_key,
                value = val.as_str(),
                "failed to parse u32 from env var, ignoring"
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_sane_values() {
        let config = HooklineConfig::default();
        assert_eq!(config.general.log_level, "info");
        assert_eq!(config.general.log_format, "json");
        assert_eq!(config.emission.shell, "sh");
        assert_eq!(config.emission.clock_source, "/proc/uptime");
        assert_eq!(config.emission.hook_sink, "/proc/1/fd/1");
        assert_eq!(config.parser.max_blob_bytes, 4 * 1024 * 1024);
    }

    #[test]
    fn default_config_passes_validation() {
        let config = HooklineConfig::default();
        config.validate().unwrap();
    }

    #[test]
    fn from_str_empty_toml_uses_defaults() {
        let config = HooklineConfig::parse("").unwrap();
        assert_eq!(config.general.log_level, "info");
        assert_eq!(config.emission.max_delay_secs, 3600);
    }

    #[test]
    fn from_str_partial_toml_merges_with_defaults() {
        let toml = r#"
[general]
log_level = "debug"

[emission]
shell = "/bin/ash"
"#;
        let config = HooklineConfig::parse(toml).unwrap();
        assert_eq!(config.general.log_level, "debug");
        // log_format은 기본값 유지
        assert_eq!(config.general.log_format, "json");
        assert_eq!(config.emission.shell, "/bin/ash");
        assert_eq!(config.emission.hook_sink, "/proc/1/fd/1");
    }

    #[test]
    fn from_str_invalid_toml_returns_error() {
        let result = HooklineConfig::parse("invalid = [[[toml");
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert!(matches!(
            err,
            HooklineError::Config(ConfigError::ParseFailed { .. })
        ));
    }

    #[test]
    fn validate_rejects_invalid_log_level() {
        let mut config = HooklineConfig::default();
        config.general.log_level = "verbose".to_owned();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("log_level"));
    }

    #[test]
    fn validate_rejects_invalid_log_format() {
        let mut config = HooklineConfig::default();
        config.general.log_format = "xml".to_owned();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("log_format"));
    }

    #[test]
    fn validate_rejects_empty_shell() {
        let mut config = HooklineConfig::default();
        config.emission.shell = "  ".to_owned();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("emission.shell"));
    }

    #[test]
    fn validate_rejects_relative_hook_sink() {
        let mut config = HooklineConfig::default();
        config.emission.hook_sink = "stdout".to_owned();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("hook_sink"));
    }

    #[test]
    fn validate_rejects_clock_source_with_shell_metacharacters() {
        let mut config = HooklineConfig::default();
        config.emission.clock_source = "/proc/uptime; rm -rf /".to_owned();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("clock_source"));
    }

    #[test]
    fn validate_rejects_zero_limits() {
        let mut config = HooklineConfig::default();
        config.emission.max_delay_secs = 0;
        assert!(config.validate().is_err());

        let mut config = HooklineConfig::default();
        config.parser.max_blob_bytes = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("max_blob_bytes"));
    }

    #[test]
    fn env_override_string() {
        let mut val = "original".to_owned();
        // SAFETY: 테스트는 단일 스레드에서 실행되므로 환경변수 조작이 안전합니다.
        unsafe { std::env::set_var("TEST_HOOKLINE_STR", "overridden") };
        override_string(&mut val, "TEST_HOOKLINE_STR");
        assert_eq!(val, "overridden");
        unsafe { std::env::remove_var("TEST_HOOKLINE_STR") };
    }

    #[test]
    fn env_override_usize_invalid_keeps_original() {
        let mut val = 42usize;
        // SAFETY: 테스트는 단일 스레드에서 실행되므로 환경변수 조작이 안전합니다.
        unsafe { std::env::set_var("TEST_HOOKLINE_USIZE_BAD", "forty-two") };
        override_usize(&mut val, "TEST_HOOKLINE_USIZE_BAD");
        assert_eq!(val, 42); // 원래 값 유지
        unsafe { std::env::remove_var("TEST_HOOKLINE_USIZE_BAD") };
    }

    #[test]
    fn env_override_u32_valid() {
        let mut val = 1u32;
        // SAFETY: 테스트는 단일 스레드에서 실행되므로 환경변수 조작이 안전합니다.
        unsafe { std::env::set_var("TEST_HOOKLINE_U32", "600") };
        override_u32(&mut val, "TEST_HOOKLINE_U32");
        assert_eq!(val, 600);
        unsafe { std::env::remove_var("TEST_HOOKLINE_U32") };
    }

    #[test]
    fn env_override_missing_var_keeps_original() {
        let mut val = "original".to_owned();
        override_string(&mut val, "TEST_HOOKLINE_NONEXISTENT_12345");
        assert_eq!(val, "original");
    }

    #[test]
    fn config_serialize_roundtrip() {
        let config = HooklineConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed = HooklineConfig::parse(&toml_str).unwrap();
        assert_eq!(config.general.log_level, parsed.general.log_level);
        assert_eq!(config.emission.hook_sink, parsed.emission.hook_sink);
        assert_eq!(config.parser.max_blob_bytes, parsed.parser.max_blob_bytes);
    }

    #[tokio::test]
    async fn from_file_not_found() {
        let result = HooklineConfig::from_file("/nonexistent/path/hookline.toml").await;
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert!(matches!(
            err,
            HooklineError::Config(ConfigError::FileNotFound { .. })
        ));
    }
}
