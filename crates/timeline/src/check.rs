//! 검사 목록과 검증기
//!
//! [`Check`]는 어서션 하나와 그 인자를 나타내는 닫힌 열거형입니다.
//! 텍스트 형식(`run-together regular-1 PreStop-regular-1`)으로 파싱하고 출력할 수 있어
//! CLI나 설정 파일에서 그대로 사용할 수 있습니다.
//!
//! [`Verifier`]는 검사 목록을 [`ResultSet`]에 대해 실행하며, 진행 상황은 호출자가
//! 주입한 [`Narrator`]로만 서술합니다.
//!
//! # 사용 예시
//! ```
//! use hookline_core::SilentNarrator;
//! use hookline_timeline::{Check, Event, ResultSet, Verifier};
//!
//! let results = ResultSet::from_events([
//!     Event::started("a", 0),
//!     Event::exited("a", 10, 0),
//! ])
//! .unwrap();
//! let checks: Vec<Check> = vec!["starts a".parse().unwrap(), "exits a 0".parse().unwrap()];
//!
//! Verifier::new(&results, &SilentNarrator).verify(&checks).unwrap();
//! ```

use std::fmt;
use std::str::FromStr;

use hookline_core::Narrator;
use hookline_core::metrics as m;
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use tracing::{debug, info};

use crate::error::AssertionError;
use crate::result::ResultSet;

/// 관계형 검사 하나
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "check", rename_all = "kebab-case")]
pub enum Check {
    /// 시작했는지
    Starts {
        /// 대상 이름
        container: String,
    },
    /// 시작하지 않았는지
    DoesntStart {
        /// 대상 이름
        container: String,
    },
    /// 종료했는지 (종료 코드 선택)
    Exits {
        /// 대상 이름
        container: String,
        /// 기대 종료 코드
        #[serde(skip_serializing_if = "Option::is_none")]
        code: Option<i32>,
    },
    /// 활성 구간이 겹치는지
    RunTogether {
        /// 첫 번째 이름
        first: String,
        /// 두 번째 이름
        second: String,
    },
    /// `first`가 먼저 시작했는지
    StartsBefore {
        /// 먼저 시작해야 하는 쪽
        first: String,
        /// 나중에 시작해야 하는 쪽
        second: String,
    },
    /// `first`가 먼저 종료했는지
    ExitsBefore {
        /// 먼저 종료해야 하는 쪽
        first: String,
        /// 나중에 종료해야 하는 쪽
        second: String,
    },
    /// 훅이 대상 컨테이너의 종료 전에 시작했는지
    HookPrecedesExit {
        /// 훅 타임라인 이름
        hook: String,
        /// 대상 컨테이너 이름
        container: String,
    },
}

impl Check {
    /// 검사 종류 키워드 (텍스트 형식의 첫 단어, 메트릭 레이블)
    pub fn keyword(&self) -> &'static str {
        match self {
            Self::Starts { .. } => "starts",
            Self::DoesntStart { .. } => "doesnt-start",
            Self::Exits { .. } => "exits",
            Self::RunTogether { .. } => "run-together",
            Self::StartsBefore { .. } => "starts-before",
            Self::ExitsBefore { .. } => "exits-before",
            Self::HookPrecedesExit { .. } => "hook-precedes-exit",
        }
    }

    /// 결과 집합에 대해 검사를 실행합니다.
    pub fn run(&self, results: &ResultSet) -> Result<(), AssertionError> {
        match self {
            Self::Starts { container } => results.starts(container),
            Self::DoesntStart { container } => results.doesnt_start(container),
            Self::Exits { container, code } => results.exits(container, *code),
            Self::RunTogether { first, second } => results.run_together(first, second),
            Self::StartsBefore { first, second } => results.starts_before(first, second),
            Self::ExitsBefore { first, second } => results.exits_before(first, second),
            Self::HookPrecedesExit { hook, container } => {
                results.hook_precedes_exit(hook, container)
            }
        }
    }
}

impl fmt::Display for Check {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let keyword = self.keyword();
        match self {
            Self::Starts { container } | Self::DoesntStart { container } => {
                write!(f, "{keyword} {container}")
            }
            Self::Exits {
                container,
                code: Some(code),
            } => write!(f, "{keyword} {container} {code}"),
            Self::Exits {
                container,
                code: None,
            } => write!(f, "{keyword} {container}"),
            Self::RunTogether { first, second }
            | Self::StartsBefore { first, second }
            | Self::ExitsBefore { first, second } => write!(f, "{keyword} {first} {second}"),
            Self::HookPrecedesExit { hook, container } => {
                write!(f, "{keyword} {hook} {container}")
            }
        }
    }
}

/// 검사 텍스트 파싱 에러
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CheckParseError {
    /// 빈 문자열
    #[error("empty check")]
    Empty,

    /// 알 수 없는 검사 키워드
    #[error("unknown check '{0}'")]
    UnknownCheck(String),

    /// 인자 개수 불일치
    #[error("check '{check}' expects {expected} argument(s), got {got}")]
    WrongArity {
        /// 검사 키워드
        check: String,
        /// 기대한 인자 수
        expected: &'static str,
        /// 실제 인자 수
        got: usize,
    },

    /// 종료 코드가 정수가 아님
    #[error("invalid exit code '{0}'")]
    InvalidCode(String),
}

impl FromStr for Check {
    type Err = CheckParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut words = s.split_whitespace();
        let keyword = words.next().ok_or(CheckParseError::Empty)?;
        let args: Vec<String> = words.map(str::to_owned).collect();

        let arity = |expected: &'static str| CheckParseError::WrongArity {
            check: keyword.to_owned(),
            expected,
            got: args.len(),
        };

        match keyword {
            "starts" | "doesnt-start" => {
                let [container] = take::<1>(&args).ok_or_else(|| arity("1"))?;
                Ok(if keyword == "starts" {
                    Self::Starts { container }
                } else {
                    Self::DoesntStart { container }
                })
            }
            "exits" => match args.as_slice() {
                [container] => Ok(Self::Exits {
                    container: container.clone(),
                    code: None,
                }),
                [container, code] => {
                    let code = code
                        .parse::<i32>()
                        .map_err(|_| CheckParseError::InvalidCode(code.clone()))?;
                    Ok(Self::Exits {
                        container: container.clone(),
                        code: Some(code),
                    })
                }
                _ => Err(arity("1 or 2")),
            },
            "run-together" | "starts-before" | "exits-before" | "hook-precedes-exit" => {
                let [a, b] = take::<2>(&args).ok_or_else(|| arity("2"))?;
                Ok(match keyword {
                    "run-together" => Self::RunTogether {
                        first: a,
                        second: b,
                    },
                    "starts-before" => Self::StartsBefore {
                        first: a,
                        second: b,
                    },
                    "exits-before" => Self::ExitsBefore {
                        first: a,
                        second: b,
                    },
                    _ => Self::HookPrecedesExit {
                        hook: a,
                        container: b,
                    },
                })
            }
            other => Err(CheckParseError::UnknownCheck(other.to_owned())),
        }
    }
}

fn take<const N: usize>(args: &[String]) -> Option<[String; N]> {
    <[String; N]>::try_from(args.to_vec()).ok()
}

/// 검사 하나의 결과
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckOutcome {
    /// 실행한 검사
    pub check: Check,
    /// 실패 시 어서션 에러
    pub error: Option<AssertionError>,
}

impl CheckOutcome {
    /// 통과했는지
    pub fn passed(&self) -> bool {
        self.error.is_none()
    }
}

impl Serialize for CheckOutcome {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("CheckOutcome", 3)?;
        state.serialize_field("check", &self.check.to_string())?;
        state.serialize_field("passed", &self.passed())?;
        state.serialize_field("error", &self.error.as_ref().map(ToString::to_string))?;
        state.end()
    }
}

/// 검사 목록 전체의 결과
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct VerificationReport {
    /// 실행 순서대로의 결과
    pub outcomes: Vec<CheckOutcome>,
}

impl VerificationReport {
    /// 모든 검사가 통과했는지
    pub fn passed(&self) -> bool {
        self.outcomes.iter().all(CheckOutcome::passed)
    }

    /// 실패한 검사들
    pub fn failures(&self) -> impl Iterator<Item = &CheckOutcome> {
        self.outcomes.iter().filter(|o| !o.passed())
    }

    /// 첫 번째 실패를 에러로 반환합니다.
    pub fn into_result(self) -> Result<(), AssertionError> {
        match self.outcomes.into_iter().find_map(|o| o.error) {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

/// 검사 실행기
pub struct Verifier<'a> {
    results: &'a ResultSet,
    narrator: &'a dyn Narrator,
}

impl<'a> Verifier<'a> {
    /// 결과 집합과 내레이터로 검증기를 생성합니다.
    pub fn new(results: &'a ResultSet, narrator: &'a dyn Narrator) -> Self {
        Self { results, narrator }
    }

    /// 검사를 순서대로 실행하고 첫 실패에서 멈춥니다.
    pub fn verify(&self, checks: &[Check]) -> Result<(), AssertionError> {
        self.evaluate_until_failure(checks).into_result()?;
        info!(checks = checks.len(), "all checks passed");
        Ok(())
    }

    /// 첫 실패까지 실행한 결과를 모읍니다. 실패 이후의 검사는 실행하지 않습니다.
    pub fn evaluate_until_failure(&self, checks: &[Check]) -> VerificationReport {
        let mut outcomes = Vec::with_capacity(checks.len());
        for check in checks {
            let error = self.run_one(check).err();
            let failed = error.is_some();
            outcomes.push(CheckOutcome {
                check: check.clone(),
                error,
            });
            if failed {
                break;
            }
        }
        VerificationReport { outcomes }
    }

    /// 모든 검사를 실행하고 결과를 모읍니다.
    pub fn evaluate(&self, checks: &[Check]) -> VerificationReport {
        let outcomes: Vec<CheckOutcome> = checks
            .iter()
            .map(|check| CheckOutcome {
                check: check.clone(),
                error: self.run_one(check).err(),
            })
            .collect();

        let report = VerificationReport { outcomes };
        info!(
            checks = checks.len(),
            failed = report.failures().count(),
            "verification finished"
        );
        report
    }

    fn run_one(&self, check: &Check) -> Result<(), AssertionError> {
        self.narrator.step(&format!("check: {check}"));
        let result = check.run(self.results);

        let label = match &result {
            Ok(()) => {
                self.narrator.log("passed");
                "success"
            }
            Err(e) => {
                self.narrator.log(&format!("failed: {e}"));
                debug!(check = %check, error = %e, "check failed");
                "failure"
            }
        };
        metrics::counter!(
            m::TIMELINE_ASSERTIONS_TOTAL,
            m::LABEL_RESULT => label,
            m::LABEL_CHECK => check.keyword()
        )
        .increment(1);

        result
    }
}
