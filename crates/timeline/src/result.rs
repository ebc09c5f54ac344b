//! 결과 집합 -- 워크로드 실행 하나의 파싱된 타임라인 모음
//!
//! [`ResultSet`]은 파싱 한 번으로 만들어지고 이후에는 읽기 전용입니다.
//! 컨테이너 이름으로 [`ContainerTimeline`]을 조회하며, 이름이 없는 경우
//! ([`AssertionError::UnknownContainer`])와 이름은 있지만 이벤트가 없는 경우를 구분합니다.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::error::{AssertionError, ParseError};
use crate::event::{Event, EventKind, LogicalTimestamp};

/// 컨테이너의 활성 구간
///
/// `end`가 `None`이면 시작은 했지만 종료를 보고하지 못한 열린 구간입니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Interval {
    /// 구간 시작 (`Started` 또는 `HookStart`)
    pub start: LogicalTimestamp,
    /// 구간 끝 (`Exited` 또는 `HookEnd`)
    pub end: Option<LogicalTimestamp>,
}

impl Interval {
    /// 닫힌 구간 `[start, end]`
    pub fn closed(start: LogicalTimestamp, end: LogicalTimestamp) -> Self {
        Self {
            start,
            end: Some(end),
        }
    }

    /// 끝이 없는 구간 `[start, ∞)`
    pub fn open(start: LogicalTimestamp) -> Self {
        Self { start, end: None }
    }

    /// 두 구간이 겹치는지 검사합니다. 경계가 같으면 겹치는 것으로 봅니다.
    pub fn overlaps(&self, other: &Interval) -> bool {
        let self_end = self.end.unwrap_or(LogicalTimestamp::MAX);
        let other_end = other.end.unwrap_or(LogicalTimestamp::MAX);
        self.start <= other_end && other.start <= self_end
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.end {
            Some(end) => write!(f, "[{}, {}]", self.start, end),
            None => write!(f, "[{}, open)", self.start),
        }
    }
}

/// 컨테이너 하나의 이벤트 순서열
///
/// 생성 시점에 타임스탬프 단조 증가와 라이프사이클 순서를 검증하며,
/// 이후에는 변경되지 않습니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContainerTimeline {
    name: String,
    events: Vec<Event>,
}

impl ContainerTimeline {
    /// 이벤트 순서열을 검증하여 타임라인을 만듭니다.
    pub fn new(name: impl Into<String>, events: Vec<Event>) -> Result<Self, ParseError> {
        let name = name.into();

        for event in &events {
            let detail = match (event.kind, event.exit_code) {
                (EventKind::Exited, None) => Some("has no exit code"),
                (kind, Some(_)) if kind != EventKind::Exited => Some("carries an exit code"),
                _ => None,
            };
            if let Some(detail) = detail {
                return Err(ParseError::InvalidPayload {
                    container: name,
                    kind: event.kind,
                    at: event.timestamp,
                    detail,
                });
            }
        }

        for pair in events.windows(2) {
            let (prev, next) = (&pair[0], &pair[1]);
            if next.timestamp <= prev.timestamp {
                return Err(ParseError::NonMonotonic {
                    container: name,
                    previous: prev.timestamp,
                    current: next.timestamp,
                });
            }
            if next.kind.rank() <= prev.kind.rank() {
                return Err(ParseError::IllegalTransition {
                    container: name,
                    from: prev.kind,
                    to: next.kind,
                });
            }
        }

        Ok(Self { name, events })
    }

    /// 컨테이너 이름
    pub fn name(&self) -> &str {
        &self.name
    }

    /// 시간 순 이벤트 목록
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// 이벤트 수
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// 이벤트가 하나도 없는지
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// 특정 종류의 이벤트를 찾습니다.
    pub fn find(&self, kind: EventKind) -> Option<&Event> {
        self.events.iter().find(|e| e.kind == kind)
    }

    /// 활성 구간을 여는 이벤트 (`Started`, 훅 타임라인이면 `HookStart`)
    pub fn start_event(&self) -> Option<&Event> {
        self.events.iter().find(|e| e.kind.opens_interval())
    }

    /// 활성 구간을 닫는 이벤트 (`Exited`, 훅 타임라인이면 `HookEnd`)
    ///
    /// 컨테이너 타임라인에 섞인 `HookEnd`는 구간을 닫지 않습니다.
    pub fn end_event(&self) -> Option<&Event> {
        if self.is_hook() {
            self.find(EventKind::HookEnd)
        } else {
            self.find(EventKind::Exited)
        }
    }

    /// `Exited` 이벤트의 종료 코드
    pub fn exit_code(&self) -> Option<i32> {
        self.find(EventKind::Exited).and_then(|e| e.exit_code)
    }

    /// 훅이 방출한 타임라인인지 (`Started` 없이 훅 이벤트만 존재)
    pub fn is_hook(&self) -> bool {
        self.find(EventKind::Started).is_none()
            && self
                .events
                .iter()
                .any(|e| matches!(e.kind, EventKind::HookStart | EventKind::HookEnd))
    }

    /// 활성 구간. 시작 이벤트가 없으면 `None`
    pub fn interval(&self) -> Option<Interval> {
        let start = self.start_event()?.timestamp;
        Some(Interval {
            start,
            end: self.end_event().map(|e| e.timestamp),
        })
    }
}

/// 워크로드 실행 하나의 전체 결과
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ResultSet {
    timelines: BTreeMap<String, ContainerTimeline>,
}

impl ResultSet {
    /// 이벤트 목록을 이름별로 묶어 결과 집합을 만듭니다.
    ///
    /// 같은 이름의 이벤트는 입력 순서대로 이어 붙이며, 각 타임라인을 검증합니다.
    pub fn from_events<I>(events: I) -> Result<Self, ParseError>
    where
        I: IntoIterator<Item = Event>,
    {
        let mut grouped: BTreeMap<String, Vec<Event>> = BTreeMap::new();
        for event in events {
            grouped
                .entry(event.container_name.clone())
                .or_default()
                .push(event);
        }
        Self::from_grouped(grouped)
    }

    pub(crate) fn from_grouped(grouped: BTreeMap<String, Vec<Event>>) -> Result<Self, ParseError> {
        let mut timelines = BTreeMap::new();
        for (name, events) in grouped {
            let timeline = ContainerTimeline::new(name.clone(), events)?;
            timelines.insert(name, timeline);
        }
        Ok(Self { timelines })
    }

    /// 이름으로 타임라인을 조회합니다.
    pub fn get(&self, name: &str) -> Option<&ContainerTimeline> {
        self.timelines.get(name)
    }

    /// 이름으로 타임라인을 조회하고, 없으면 어서션 에러를 반환합니다.
    pub fn timeline(&self, name: &str) -> Result<&ContainerTimeline, AssertionError> {
        self.timelines
            .get(name)
            .ok_or_else(|| AssertionError::UnknownContainer {
                container: name.to_owned(),
                known: self.names().map(str::to_owned).collect(),
            })
    }

    /// 결과 집합에 포함된 이름 (정렬됨)
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.timelines.keys().map(String::as_str)
    }

    /// 모든 타임라인 (이름 순)
    pub fn timelines(&self) -> impl Iterator<Item = &ContainerTimeline> {
        self.timelines.values()
    }

    /// 타임라인 수
    pub fn len(&self) -> usize {
        self.timelines.len()
    }

    /// 타임라인이 없는지
    pub fn is_empty(&self) -> bool {
        self.timelines.is_empty()
    }

    /// 와이어 형식으로 다시 직렬화합니다.
    ///
    /// 이름별로 한 덩어리씩 만들며, 이벤트가 없는 타임라인은 생략됩니다.
    pub fn to_blobs(&self) -> BTreeMap<String, String> {
        self.timelines
            .values()
            .filter(|t| !t.is_empty())
            .map(|t| {
                let blob = t
                    .events()
                    .iter()
                    .map(|e| format!("{e}\n"))
                    .collect::<String>();
                (t.name().to_owned(), blob)
            })
            .collect()
    }
}

/// 모든 이벤트를 타임스탬프 순으로 나열합니다 (진단용).
impl fmt::Display for ResultSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut events: Vec<&Event> = self.timelines.values().flat_map(|t| t.events()).collect();
        events.sort_by(|a, b| {
            a.timestamp
                .cmp(&b.timestamp)
                .then_with(|| a.container_name.cmp(&b.container_name))
        });
        for event in events {
            writeln!(f, "{event}")?;
        }
        Ok(())
    }
}
