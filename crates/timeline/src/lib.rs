#![doc = include_str!("../README.md")]
//!
//! # 모듈 구성
//!
//! - [`event`]: 이벤트 종류와 와이어 형식
//! - [`command`]: 이벤트를 방출하는 셸 명령 빌더
//! - [`parser`]: 캡처 출력 → [`ResultSet`] 변환
//! - [`result`]: 타임라인과 결과 집합
//! - [`assertion`]: [`ResultSet`]에 대한 관계형 어서션
//! - [`check`]: 텍스트로 표현 가능한 검사 목록과 [`Verifier`]
//! - [`narrator`]: tracing 기반 [`Narrator`](hookline_core::Narrator) 구현
//! - [`config`]: 엔진 설정 (core 설정 파생)
//! - [`error`]: 도메인 에러 타입

pub mod assertion;
pub mod check;
pub mod command;
pub mod config;
pub mod error;
pub mod event;
pub mod narrator;
pub mod parser;
pub mod result;

// --- 주요 타입 re-export ---

// 이벤트
pub use event::{Event, EventKind, LogicalTimestamp};

// 명령
pub use command::{CommandBuilder, ExecParams, HookKind, prefixed_name};

// 파서
pub use parser::{TimelineParser, parse_event_line};

// 결과
pub use result::{ContainerTimeline, Interval, ResultSet};

// 검사
pub use check::{Check, CheckOutcome, CheckParseError, VerificationReport, Verifier};

// 내레이터
pub use narrator::TracingNarrator;

// 설정
pub use config::{TimelineConfig, TimelineConfigBuilder};

// 에러
pub use error::{AssertionError, CommandError, ParseError, TimelineError};
