//! 관계형 어서션 -- [`ResultSet`]에 대한 질의
//!
//! 모든 어서션은 중단(panic)하지 않고 `Result<(), AssertionError>`를 반환합니다.
//! 에러에는 비교에 쓰인 값이 담겨 있어 그대로 테스트 실패 메시지로 쓸 수 있습니다.
//!
//! 동률 규칙:
//! - 순서 검사(`starts_before`, `exits_before`, `hook_precedes_exit`)에서 같은 타임스탬프는 실패
//! - 동시 실행 검사(`run_together`)에서 같은 경계는 겹침
//!
//! # 사용 예시
//! ```
//! use hookline_timeline::{Event, ResultSet};
//!
//! let results = ResultSet::from_events([
//!     Event::started("regular-1", 0),
//!     Event::hook_start("PreStop-regular-1", 100),
//!     Event::hook_end("PreStop-regular-1", 101),
//!     Event::exited("regular-1", 120, 0),
//! ])
//! .unwrap();
//!
//! results.run_together("regular-1", "PreStop-regular-1").unwrap();
//! results.exits("regular-1", Some(0)).unwrap();
//! ```

use crate::error::AssertionError;
use crate::event::{Event, EventKind};
use crate::result::{ContainerTimeline, ResultSet};

impl ResultSet {
    /// 컨테이너가 시작했는지 검사합니다.
    ///
    /// 시작 이벤트는 `Started`이며, 훅 타임라인이면 `HookStart`입니다.
    pub fn starts(&self, name: &str) -> Result<(), AssertionError> {
        let timeline = self.timeline(name)?;
        start_of(timeline).map(|_| ())
    }

    /// 컨테이너가 시작하지 않았는지 검사합니다.
    pub fn doesnt_start(&self, name: &str) -> Result<(), AssertionError> {
        let timeline = self.timeline(name)?;
        match timeline.start_event() {
            Some(event) => Err(AssertionError::StartedUnexpectedly {
                container: name.to_owned(),
                at: event.timestamp,
            }),
            None => Ok(()),
        }
    }

    /// 컨테이너가 종료했는지, 지정하면 종료 코드까지 검사합니다.
    pub fn exits(&self, name: &str, expected: Option<i32>) -> Result<(), AssertionError> {
        let timeline = self.timeline(name)?;
        let exited = timeline
            .find(EventKind::Exited)
            .ok_or_else(|| AssertionError::NeverExited {
                container: name.to_owned(),
            })?;

        match (expected, exited.exit_code) {
            (None, _) => Ok(()),
            (Some(want), Some(got)) if got == want => Ok(()),
            (Some(want), Some(got)) => Err(AssertionError::ExitCodeMismatch {
                container: name.to_owned(),
                got,
                want,
            }),
            (Some(want), None) => Err(AssertionError::ExitCodeMissing {
                container: name.to_owned(),
                want,
            }),
        }
    }

    /// 두 컨테이너의 활성 구간이 겹치는지 검사합니다. 인자 순서와 무관합니다.
    ///
    /// 종료 이벤트가 없는 구간은 끝이 열린 것으로 봅니다.
    pub fn run_together(&self, a: &str, b: &str) -> Result<(), AssertionError> {
        let first = self.timeline(a)?;
        let second = self.timeline(b)?;

        let first_interval = first.interval().ok_or_else(|| never_started(a))?;
        let second_interval = second.interval().ok_or_else(|| never_started(b))?;

        if first_interval.overlaps(&second_interval) {
            Ok(())
        } else {
            Err(AssertionError::NotConcurrent {
                first: a.to_owned(),
                first_interval,
                second: b.to_owned(),
                second_interval,
            })
        }
    }

    /// `a`가 `b`보다 엄격하게 먼저 시작했는지 검사합니다.
    pub fn starts_before(&self, a: &str, b: &str) -> Result<(), AssertionError> {
        let first = start_of(self.timeline(a)?)?;
        let second = start_of(self.timeline(b)?)?;
        strictly_before(first, second)
    }

    /// `a`가 `b`보다 엄격하게 먼저 종료했는지 검사합니다.
    pub fn exits_before(&self, a: &str, b: &str) -> Result<(), AssertionError> {
        let first = end_of(self.timeline(a)?)?;
        let second = end_of(self.timeline(b)?)?;
        strictly_before(first, second)
    }

    /// 훅이 대상 컨테이너의 `Exited`보다 먼저 시작했는지 검사합니다.
    pub fn hook_precedes_exit(&self, hook: &str, container: &str) -> Result<(), AssertionError> {
        let hook_start = event_of(self.timeline(hook)?, EventKind::HookStart)?;
        let exited = event_of(self.timeline(container)?, EventKind::Exited)?;
        strictly_before(hook_start, exited)
    }
}

fn never_started(name: &str) -> AssertionError {
    AssertionError::NeverStarted {
        container: name.to_owned(),
    }
}

fn start_of(timeline: &ContainerTimeline) -> Result<&Event, AssertionError> {
    timeline
        .start_event()
        .ok_or_else(|| never_started(timeline.name()))
}

fn end_of(timeline: &ContainerTimeline) -> Result<&Event, AssertionError> {
    timeline
        .end_event()
        .ok_or_else(|| AssertionError::NeverExited {
            container: timeline.name().to_owned(),
        })
}

fn event_of(timeline: &ContainerTimeline, kind: EventKind) -> Result<&Event, AssertionError> {
    timeline
        .find(kind)
        .ok_or_else(|| AssertionError::EventMissing {
            container: timeline.name().to_owned(),
            kind,
        })
}

fn strictly_before(first: &Event, second: &Event) -> Result<(), AssertionError> {
    if first.timestamp < second.timestamp {
        Ok(())
    } else {
        Err(AssertionError::NotBefore {
            first: first.container_name.clone(),
            first_event: first.kind,
            first_at: first.timestamp,
            second: second.container_name.clone(),
            second_event: second.kind,
            second_at: second.timestamp,
        })
    }
}
