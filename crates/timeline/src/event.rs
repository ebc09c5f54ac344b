//! 라이프사이클 이벤트
//!
//! [`Event`]는 컨테이너(또는 라이프사이클 훅)가 스스로 출력한 한 줄의 마커를 표현합니다.
//! 마커는 `이름|종류|타임스탬프[|종료코드]` 형식이며, [`Event`]의 `Display` 구현이
//! 정확히 이 형식을 생성합니다.
//!
//! # Examples
//!
//! ```
//! use hookline_timeline::{Event, EventKind};
//!
//! let event = Event::exited("regular-1", 120, 0);
//! assert_eq!(event.kind, EventKind::Exited);
//! assert_eq!(event.to_string(), "regular-1|Exited|120|0");
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// 방출 프로세스가 스스로 부여한 논리 타임스탬프
///
/// 수집기 시각이 아니라 방출 측 시계(부팅 후 경과 1/100초)를 기반으로 하며,
/// 한 스트림 안에서 엄격하게 증가합니다.
pub type LogicalTimestamp = u64;

/// 이벤트 라인의 필드 구분자
pub const FIELD_DELIMITER: char = '|';

/// 컨테이너 이름 최대 길이 (DNS-1123 subdomain 상한)
pub const MAX_NAME_LEN: usize = 253;

/// 라이프사이클 이벤트 종류 (닫힌 집합)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    /// 메인 프로세스 시작
    Started,
    /// 라이프사이클 훅 시작
    HookStart,
    /// 라이프사이클 훅 종료
    HookEnd,
    /// 메인 프로세스 종료 (종료 코드 포함)
    Exited,
}

impl EventKind {
    /// 모든 이벤트 종류 (라이프사이클 순서)
    pub const ALL: [EventKind; 4] = [
        EventKind::Started,
        EventKind::HookStart,
        EventKind::HookEnd,
        EventKind::Exited,
    ];

    /// 라이프사이클 순서상의 위치
    ///
    /// 한 타임라인의 이벤트 종류는 이 순위가 엄격하게 증가하는 부분열이어야 합니다.
    pub fn rank(self) -> u8 {
        match self {
            Self::Started => 0,
            Self::HookStart => 1,
            Self::HookEnd => 2,
            Self::Exited => 3,
        }
    }

    /// 와이어 형식 이름
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Started => "Started",
            Self::HookStart => "HookStart",
            Self::HookEnd => "HookEnd",
            Self::Exited => "Exited",
        }
    }

    /// 활성 구간의 시작을 나타내는 종류인지
    pub fn opens_interval(self) -> bool {
        matches!(self, Self::Started | Self::HookStart)
    }

    /// 활성 구간의 끝을 나타내는 종류인지
    pub fn closes_interval(self) -> bool {
        matches!(self, Self::HookEnd | Self::Exited)
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 알 수 없는 이벤트 종류 문자열
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownEventKind(pub String);

impl fmt::Display for UnknownEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown event kind '{}'", self.0)
    }
}

impl std::error::Error for UnknownEventKind {}

impl FromStr for EventKind {
    type Err = UnknownEventKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| UnknownEventKind(s.to_owned()))
    }
}

/// 라이프사이클 이벤트 하나
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// 이벤트를 방출한 컨테이너(또는 훅)의 이름
    pub container_name: String,
    /// 이벤트 종류
    pub kind: EventKind,
    /// 논리 타임스탬프
    pub timestamp: LogicalTimestamp,
    /// 종료 코드 (`Exited`에만 존재)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exit_code: Option<i32>,
}

impl Event {
    /// `Started` 이벤트를 생성합니다.
    pub fn started(container_name: impl Into<String>, timestamp: LogicalTimestamp) -> Self {
        Self::without_payload(container_name, EventKind::Started, timestamp)
    }

    /// `HookStart` 이벤트를 생성합니다.
    pub fn hook_start(container_name: impl Into<String>, timestamp: LogicalTimestamp) -> Self {
        Self::without_payload(container_name, EventKind::HookStart, timestamp)
    }

    /// `HookEnd` 이벤트를 생성합니다.
    pub fn hook_end(container_name: impl Into<String>, timestamp: LogicalTimestamp) -> Self {
        Self::without_payload(container_name, EventKind::HookEnd, timestamp)
    }

    /// `Exited` 이벤트를 생성합니다.
    pub fn exited(
        container_name: impl Into<String>,
        timestamp: LogicalTimestamp,
        exit_code: i32,
    ) -> Self {
        Self {
            container_name: container_name.into(),
            kind: EventKind::Exited,
            timestamp,
            exit_code: Some(exit_code),
        }
    }

    fn without_payload(
        container_name: impl Into<String>,
        kind: EventKind,
        timestamp: LogicalTimestamp,
    ) -> Self {
        Self {
            container_name: container_name.into(),
            kind,
            timestamp,
            exit_code: None,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{FIELD_DELIMITER}{}{FIELD_DELIMITER}{}",
            self.container_name, self.kind, self.timestamp
        )?;
        if let Some(code) = self.exit_code {
            write!(f, "{FIELD_DELIMITER}{code}")?;
        }
        Ok(())
    }
}

/// 방출 스크립트와 이벤트 라인에 그대로 쓸 수 있는 이름인지 검사합니다.
///
/// 허용 문자: ASCII 영숫자, `-`, `_`, `.` (1..=253자)
pub fn is_valid_container_name(name: &str) -> bool {
    !name.is_empty()
        && name.len() <= MAX_NAME_LEN
        && name
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_' | b'.'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_kind_display_matches_wire_names() {
        assert_eq!(EventKind::Started.to_string(), "Started");
        assert_eq!(EventKind::HookStart.to_string(), "HookStart");
        assert_eq!(EventKind::HookEnd.to_string(), "HookEnd");
        assert_eq!(EventKind::Exited.to_string(), "Exited");
    }

    #[test]
    fn event_kind_from_str_is_case_sensitive() {
        assert_eq!("HookEnd".parse::<EventKind>(), Ok(EventKind::HookEnd));
        assert!("exited".parse::<EventKind>().is_err());
        assert!("Starting".parse::<EventKind>().is_err());
    }

    #[test]
    fn ranks_follow_lifecycle_order() {
        let ranks: Vec<u8> = EventKind::ALL.iter().map(|k| k.rank()).collect();
        assert_eq!(ranks, vec![0, 1, 2, 3]);
    }

    #[test]
    fn interval_boundaries() {
        assert!(EventKind::Started.opens_interval());
        assert!(EventKind::HookStart.opens_interval());
        assert!(EventKind::HookEnd.closes_interval());
        assert!(EventKind::Exited.closes_interval());
        assert!(!EventKind::Exited.opens_interval());
    }

    #[test]
    fn event_display_without_exit_code() {
        let event = Event::hook_start("PreStop-regular-1", 100);
        assert_eq!(event.to_string(), "PreStop-regular-1|HookStart|100");
    }

    #[test]
    fn event_display_with_negative_exit_code() {
        let event = Event::exited("main", 7, -1);
        assert_eq!(event.to_string(), "main|Exited|7|-1");
    }

    #[test]
    fn valid_container_names() {
        assert!(is_valid_container_name("regular-1"));
        assert!(is_valid_container_name("PreStop-regular-1"));
        assert!(is_valid_container_name("init_0.v2"));
        assert!(!is_valid_container_name(""));
        assert!(!is_valid_container_name("has space"));
        assert!(!is_valid_container_name("pipe|name"));
        assert!(!is_valid_container_name("quote'd"));
        assert!(!is_valid_container_name(&"a".repeat(MAX_NAME_LEN + 1)));
    }

    #[test]
    fn event_is_send_sync() {
        fn assert_send_sync<T: Send + Sync + 'static>() {}
        assert_send_sync::<Event>();
    }
}
