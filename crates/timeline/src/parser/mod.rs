//! 타임라인 파서 -- 컨테이너별 캡처 출력을 [`ResultSet`]으로 변환
//!
//! 각 출력 덩어리를 줄 단위로 읽어 [`parse_event_line`]으로 이벤트를 추출하고,
//! 이벤트의 *이름 필드*를 기준으로 타임라인에 배정합니다. 따라서 대상 컨테이너의
//! stdout에 섞여 들어온 훅 이벤트(`PreStop-regular-1|HookStart|...`)는 훅 자신의
//! 타임라인에 들어갑니다.
//!
//! # 사용 예시
//! ```
//! use hookline_timeline::parser::TimelineParser;
//!
//! let parser = TimelineParser::new();
//! let results = parser
//!     .parse([("regular-1", "regular-1|Started|0\nregular-1|Exited|120|0\n")])
//!     .unwrap();
//! assert_eq!(results.get("regular-1").map(|t| t.len()), Some(2));
//! ```

pub mod line;

pub use line::parse_event_line;

use std::collections::BTreeMap;
use std::time::Instant;

use hookline_core::metrics as m;
use tracing::{debug, info, warn};

use crate::config::TimelineConfig;
use crate::error::ParseError;
use crate::event::Event;
use crate::result::ResultSet;

/// 기본 출력 크기 상한 (4MB)
pub const DEFAULT_MAX_BLOB_BYTES: usize = 4 * 1024 * 1024;

/// 캡처 출력 파서
///
/// 상태가 없으므로 여러 워크로드 실행에 재사용할 수 있습니다.
#[derive(Debug, Clone)]
pub struct TimelineParser {
    /// 출력 덩어리 하나의 최대 크기 (바이트)
    max_blob_bytes: usize,
}

impl TimelineParser {
    /// 기본 설정으로 파서를 생성합니다.
    pub fn new() -> Self {
        Self {
            max_blob_bytes: DEFAULT_MAX_BLOB_BYTES,
        }
    }

    /// 설정에서 파서를 생성합니다.
    pub fn from_config(config: &TimelineConfig) -> Self {
        Self {
            max_blob_bytes: config.max_blob_bytes,
        }
    }

    /// 최대 출력 크기를 설정합니다.
    pub fn with_max_blob_bytes(mut self, max: usize) -> Self {
        self.max_blob_bytes = max;
        self
    }

    /// 설정된 최대 출력 크기
    pub fn max_blob_bytes(&self) -> usize {
        self.max_blob_bytes
    }

    /// 기대한 컨테이너 이름별 출력을 파싱합니다.
    ///
    /// - 기대한 이름마다 타임라인 항목이 생성됩니다 (다른 이름의 라인만 있었다면 비어 있음).
    /// - 이벤트 라인이 하나도 없는 출력은 [`ParseError::NoEvents`]입니다.
    /// - 마지막으로 각 타임라인의 단조 증가와 전이 순서를 검증합니다.
    pub fn parse<I, K, V>(&self, blobs: I) -> Result<ResultSet, ParseError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let started_at = Instant::now();
        let result = self.parse_inner(blobs);
        metrics::histogram!(m::TIMELINE_PARSE_DURATION_SECONDS)
            .record(started_at.elapsed().as_secs_f64());

        if let Err(e) = &result {
            metrics::counter!(m::TIMELINE_PARSE_ERRORS_TOTAL).increment(1);
            warn!(container = e.container(), error = %e, "failed to parse captured output");
        }
        result
    }

    fn parse_inner<I, K, V>(&self, blobs: I) -> Result<ResultSet, ParseError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut grouped: BTreeMap<String, Vec<Event>> = BTreeMap::new();
        let mut total_parsed = 0usize;

        for (container, blob) in blobs {
            let container = container.as_ref();
            let blob = blob.as_ref();

            if blob.len() > self.max_blob_bytes {
                return Err(ParseError::TooLarge {
                    container: container.to_owned(),
                    size: blob.len(),
                    max: self.max_blob_bytes,
                });
            }

            let mut parsed = 0usize;
            let mut ignored = 0usize;
            for line in blob.lines() {
                match parse_event_line(line) {
                    Some(event) => {
                        grouped
                            .entry(event.container_name.clone())
                            .or_default()
                            .push(event);
                        parsed += 1;
                    }
                    None if line.trim().is_empty() => {}
                    None => ignored += 1,
                }
            }

            metrics::counter!(m::TIMELINE_LINES_PARSED_TOTAL).increment(parsed as u64);
            metrics::counter!(m::TIMELINE_LINES_IGNORED_TOTAL).increment(ignored as u64);
            debug!(container, parsed, ignored, "scanned captured output");

            if parsed == 0 {
                return Err(ParseError::NoEvents {
                    container: container.to_owned(),
                });
            }
            grouped.entry(container.to_owned()).or_default();
            total_parsed += parsed;
        }

        let results = ResultSet::from_grouped(grouped)?;
        info!(
            timelines = results.len(),
            events = total_parsed,
            "parsed captured output"
        );
        Ok(results)
    }
}

impl Default for TimelineParser {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::EventKind;

    #[test]
    fn routes_hook_lines_by_name_field() {
        let blob = "\
regular-1|Started|0
PreStop-regular-1|HookStart|100
PreStop-regular-1|HookEnd|101
regular-1|Exited|120|0
";
        let results = TimelineParser::new()
            .parse([("regular-1", blob)])
            .unwrap();

        assert_eq!(results.len(), 2);
        let hook = results.get("PreStop-regular-1").unwrap();
        assert_eq!(hook.events()[0].kind, EventKind::HookStart);
        assert_eq!(results.get("regular-1").unwrap().len(), 2);
    }

    #[test]
    fn noise_lines_are_skipped() {
        let blob = "starting up\nregular-1|Started|3\nsome|garbage\n\nregular-1|Exited|9|1\n";
        let results = TimelineParser::new().parse([("regular-1", blob)]).unwrap();
        assert_eq!(results.get("regular-1").unwrap().exit_code(), Some(1));
    }

    #[test]
    fn empty_blob_is_no_events() {
        let err = TimelineParser::new().parse([("regular-1", "")]).unwrap_err();
        assert_eq!(
            err,
            ParseError::NoEvents {
                container: "regular-1".to_owned()
            }
        );
    }

    #[test]
    fn noise_only_blob_is_no_events() {
        let err = TimelineParser::new()
            .parse([("regular-1", "Error: container failed\n")])
            .unwrap_err();
        assert!(matches!(err, ParseError::NoEvents { .. }));
    }

    #[test]
    fn expected_name_without_own_lines_gets_empty_timeline() {
        let blob = "PreStop-regular-1|HookStart|100\nPreStop-regular-1|HookEnd|101\n";
        let results = TimelineParser::new().parse([("regular-1", blob)]).unwrap();
        let timeline = results.get("regular-1").unwrap();
        assert!(timeline.is_empty());
    }

    #[test]
    fn oversized_blob_is_rejected() {
        let parser = TimelineParser::new().with_max_blob_bytes(8);
        let err = parser
            .parse([("regular-1", "regular-1|Started|0\n")])
            .unwrap_err();
        assert!(matches!(err, ParseError::TooLarge { max: 8, .. }));
    }

    #[test]
    fn non_monotonic_timestamps_are_rejected() {
        let blob = "a|Started|10\na|Exited|9|0\n";
        let err = TimelineParser::new().parse([("a", blob)]).unwrap_err();
        assert!(matches!(err, ParseError::NonMonotonic { .. }));
    }

    #[test]
    fn multiple_blobs_are_merged() {
        let results = TimelineParser::new()
            .parse([
                ("a", "a|Started|1\na|Exited|5|0\n".to_owned()),
                ("b", "b|Started|2\n".to_owned()),
            ])
            .unwrap();
        assert_eq!(results.names().collect::<Vec<_>>(), vec!["a", "b"]);
    }

    #[test]
    fn crlf_line_endings_are_accepted() {
        let results = TimelineParser::new()
            .parse([("a", "a|Started|1\r\na|Exited|2|0\r\n")])
            .unwrap();
        assert_eq!(results.get("a").unwrap().len(), 2);
    }
}
