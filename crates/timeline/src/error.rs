//! 타임라인 에러 타입
//!
//! - [`ParseError`]: 캡처된 출력이 없거나 손상됨 (워크로드가 계측된 명령을 실행하지 않았을 가능성)
//! - [`AssertionError`]: 올바른 결과 집합이 관계형 검사를 만족하지 못함
//! - [`CommandError`]: 방출 명령 파라미터가 잘못됨
//!
//! [`TimelineError`]는 이들을 모두 포괄하며, `From<TimelineError> for HooklineError`
//! 변환이 구현되어 있어 상위 레이어에서 `?` 연산자로 자연스럽게 전파할 수 있습니다.

use hookline_core::error::{
    CommandError as CoreCommandError, HooklineError, ParseError as CoreParseError,
    VerificationError,
};

use crate::event::{EventKind, LogicalTimestamp};
use crate::result::Interval;

/// 타임라인 파싱 에러
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// 기대한 컨테이너의 출력에서 이벤트 라인을 하나도 찾지 못함
    #[error("no events for container {container}")]
    NoEvents {
        /// 출력을 기대한 컨테이너 이름
        container: String,
    },

    /// 출력 크기 초과
    #[error("output of container {container} too large: {size} bytes (max: {max})")]
    TooLarge {
        /// 컨테이너 이름
        container: String,
        /// 실제 크기 (바이트)
        size: usize,
        /// 허용 최대 크기 (바이트)
        max: usize,
    },

    /// 타임스탬프가 엄격하게 증가하지 않음 (로그 손상 또는 순서가 뒤바뀐 캡처)
    #[error("timestamps of container {container} are not strictly increasing: {previous} then {current}")]
    NonMonotonic {
        /// 컨테이너 이름
        container: String,
        /// 직전 이벤트의 타임스탬프
        previous: LogicalTimestamp,
        /// 문제가 된 이벤트의 타임스탬프
        current: LogicalTimestamp,
    },

    /// 라이프사이클 순서에 맞지 않는 전이
    #[error("illegal lifecycle transition for container {container}: {from} -> {to}")]
    IllegalTransition {
        /// 컨테이너 이름
        container: String,
        /// 직전 이벤트 종류
        from: EventKind,
        /// 문제가 된 이벤트 종류
        to: EventKind,
    },

    /// 종료 코드는 `Exited` 이벤트에만, 그리고 반드시 있어야 함
    #[error("invalid payload for container {container}: {kind}@{at} {detail}")]
    InvalidPayload {
        /// 컨테이너 이름
        container: String,
        /// 문제가 된 이벤트 종류
        kind: EventKind,
        /// 문제가 된 이벤트의 타임스탬프
        at: LogicalTimestamp,
        /// 위반 내용
        detail: &'static str,
    },
}

impl ParseError {
    /// 에러가 가리키는 컨테이너 이름
    pub fn container(&self) -> &str {
        match self {
            Self::NoEvents { container }
            | Self::TooLarge { container, .. }
            | Self::NonMonotonic { container, .. }
            | Self::IllegalTransition { container, .. }
            | Self::InvalidPayload { container, .. } => container,
        }
    }
}

/// 관계형 어서션 실패
///
/// 각 변형은 비교에 사용된 값(타임스탬프, 종료 코드, 구간)을 담고 있어
/// 재실행 없이 원인을 진단할 수 있습니다.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AssertionError {
    /// 결과 집합에 없는 컨테이너 이름
    #[error("unknown container {container} (known: {known:?})")]
    UnknownContainer {
        /// 조회한 이름
        container: String,
        /// 결과 집합에 존재하는 이름들
        known: Vec<String>,
    },

    /// 시작 이벤트가 없음
    #[error("container never started: {container}")]
    NeverStarted {
        /// 컨테이너 이름
        container: String,
    },

    /// 시작하지 않아야 할 컨테이너가 시작함
    #[error("container {container} started unexpectedly at {at}")]
    StartedUnexpectedly {
        /// 컨테이너 이름
        container: String,
        /// 시작 이벤트의 타임스탬프
        at: LogicalTimestamp,
    },

    /// 종료 이벤트가 없음
    #[error("container never exited: {container}")]
    NeverExited {
        /// 컨테이너 이름
        container: String,
    },

    /// 종료 코드 불일치
    #[error("exit code mismatch for container {container}: got {got} want {want}")]
    ExitCodeMismatch {
        /// 컨테이너 이름
        container: String,
        /// 실제 종료 코드
        got: i32,
        /// 기대한 종료 코드
        want: i32,
    },

    /// 종료 코드를 기대했지만 `Exited` 이벤트에 코드가 없음
    #[error("exit code missing for container {container}: want {want}")]
    ExitCodeMissing {
        /// 컨테이너 이름
        container: String,
        /// 기대한 종료 코드
        want: i32,
    },

    /// 두 컨테이너의 활성 구간이 겹치지 않음
    #[error("{first} {first_interval} and {second} {second_interval} did not run together")]
    NotConcurrent {
        /// 첫 번째 컨테이너
        first: String,
        /// 첫 번째 컨테이너의 활성 구간
        first_interval: Interval,
        /// 두 번째 컨테이너
        second: String,
        /// 두 번째 컨테이너의 활성 구간
        second_interval: Interval,
    },

    /// 순서 검사 실패 (같은 타임스탬프도 실패)
    #[error("{first} {first_event}@{first_at} is not before {second} {second_event}@{second_at}")]
    NotBefore {
        /// 먼저 일어나야 하는 쪽
        first: String,
        /// 비교한 이벤트 종류
        first_event: EventKind,
        /// 비교한 타임스탬프
        first_at: LogicalTimestamp,
        /// 나중에 일어나야 하는 쪽
        second: String,
        /// 비교한 이벤트 종류
        second_event: EventKind,
        /// 비교한 타임스탬프
        second_at: LogicalTimestamp,
    },

    /// 비교에 필요한 이벤트가 없음
    #[error("container {container} has no {kind} event")]
    EventMissing {
        /// 컨테이너 이름
        container: String,
        /// 찾은 이벤트 종류
        kind: EventKind,
    },
}

/// 방출 명령 구성 에러
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    /// 스크립트나 이벤트 라인에 쓸 수 없는 이름
    #[error("invalid container name '{name}': expected 1-253 chars of [A-Za-z0-9._-]")]
    InvalidName {
        /// 문제가 된 이름
        name: String,
    },

    /// 훅 명령에는 종료 대기 시간을 지정할 수 없음
    #[error("hook command '{name}' cannot have termination_secs ({secs})")]
    HookWithTermination {
        /// 훅 이름
        name: String,
        /// 지정된 값
        secs: u32,
    },

    /// 셸 `exit`로 표현할 수 없는 종료 코드
    #[error("exit code {code} for '{name}' is outside 0-255")]
    InvalidExitCode {
        /// 컨테이너 이름
        name: String,
        /// 지정된 값
        code: i32,
    },

    /// 허용 범위를 넘는 대기 시간
    #[error("{field} for '{name}' is {value}s (max: {max}s)")]
    DelayTooLong {
        /// 컨테이너 이름
        name: String,
        /// 필드명 (delay_secs, termination_secs)
        field: &'static str,
        /// 지정된 값
        value: u32,
        /// 허용 최대값
        max: u32,
    },
}

/// 타임라인 도메인 에러
#[derive(Debug, thiserror::Error)]
pub enum TimelineError {
    /// 파싱 실패
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// 어서션 실패
    #[error("assertion failed: {0}")]
    Assertion(#[from] AssertionError),

    /// 명령 구성 실패
    #[error("command error: {0}")]
    Command(#[from] CommandError),

    /// 설정 에러
    #[error("config error: {field}: {reason}")]
    Config {
        /// 설정 필드명
        field: String,
        /// 에러 사유
        reason: String,
    },

    /// I/O 에러
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<ParseError> for HooklineError {
    fn from(err: ParseError) -> Self {
        match err {
            ParseError::NoEvents { container } => {
                HooklineError::Parse(CoreParseError::NoEvents { container })
            }
            ParseError::TooLarge { size, max, .. } => {
                HooklineError::Parse(CoreParseError::TooLarge { size, max })
            }
            ParseError::NonMonotonic { .. }
            | ParseError::IllegalTransition { .. }
            | ParseError::InvalidPayload { .. } => {
                HooklineError::Parse(CoreParseError::Corrupt {
                    container: err.container().to_owned(),
                    reason: err.to_string(),
                })
            }
        }
    }
}

impl From<AssertionError> for HooklineError {
    fn from(err: AssertionError) -> Self {
        HooklineError::Verification(VerificationError::AssertionFailed(err.to_string()))
    }
}

impl From<CommandError> for HooklineError {
    fn from(err: CommandError) -> Self {
        let name = match &err {
            CommandError::InvalidName { name }
            | CommandError::HookWithTermination { name, .. }
            | CommandError::InvalidExitCode { name, .. }
            | CommandError::DelayTooLong { name, .. } => name.clone(),
        };
        HooklineError::Command(CoreCommandError::InvalidParams {
            name,
            reason: err.to_string(),
        })
    }
}

impl From<TimelineError> for HooklineError {
    fn from(err: TimelineError) -> Self {
        match err {
            TimelineError::Parse(e) => e.into(),
            TimelineError::Assertion(e) => e.into(),
            TimelineError::Command(e) => e.into(),
            TimelineError::Config { field, reason } => {
                HooklineError::Config(hookline_core::error::ConfigError::InvalidValue {
                    field,
                    reason,
                })
            }
            TimelineError::Io(e) => HooklineError::Io(e),
        }
    }
}
