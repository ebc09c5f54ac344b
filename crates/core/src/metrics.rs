//! 메트릭 이름 상수
//!
//! 모든 메트릭의 이름을 중앙에서 정의합니다.
//! 각 모듈은 이 상수를 사용하여 `metrics::counter!()`,
//! `metrics::histogram!()` 매크로를 호출합니다.
//!
//! # 네이밍 컨벤션
//!
//! - 접두어: `hookline_`
//! - 모듈명: `timeline_`
//! - 접미어: `_total` (counter), `_seconds` (histogram/latency)
//!
//! # 사용 예시
//!
//! ```ignore
//! use metrics::counter;
//!
//! counter!(hookline_core::metrics::TIMELINE_LINES_PARSED_TOTAL).increment(1);
//! ```

// ─── 레이블 키 상수 ────────────────────────────────────────────────

/// 결과 레이블 키 (success, failure)
pub const LABEL_RESULT: &str = "result";

/// 어서션 종류 레이블 키 (starts, exits, run_together, ...)
pub const LABEL_CHECK: &str = "check";

// ─── Timeline 메트릭 ────────────────────────────────────────────────

/// Timeline: 이벤트로 인식된 라인 수 (counter)
pub const TIMELINE_LINES_PARSED_TOTAL: &str = "hookline_timeline_lines_parsed_total";

/// Timeline: 이벤트 문법에 맞지 않아 무시된 라인 수 (counter)
pub const TIMELINE_LINES_IGNORED_TOTAL: &str = "hookline_timeline_lines_ignored_total";

/// Timeline: 파싱 실패 수 (counter)
pub const TIMELINE_PARSE_ERRORS_TOTAL: &str = "hookline_timeline_parse_errors_total";

/// Timeline: 파싱 소요 시간 (histogram, 초)
pub const TIMELINE_PARSE_DURATION_SECONDS: &str = "hookline_timeline_parse_duration_seconds";

/// Timeline: 평가된 어서션 수 (counter, label: result, check)
pub const TIMELINE_ASSERTIONS_TOTAL: &str = "hookline_timeline_assertions_total";
