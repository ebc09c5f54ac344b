//! 이벤트 방출 명령 빌더
//!
//! 컨테이너(또는 라이프사이클 훅)가 실행할 셸 명령을 만듭니다. 명령은 라이프사이클
//! 지점마다 `이름|종류|타임스탬프[|종료코드]` 한 줄을 출력합니다.
//!
//! - 컨테이너 명령: `Started` 출력 → `delay_secs` 대기 (TERM으로 중단 가능) →
//!   `Exited|code` 출력 → 종료. TERM을 받으면 `termination_secs` 대기 후
//!   `Exited|code`를 출력하고 종료합니다.
//! - 훅 명령 (`dependent_container` 지정): `HookStart` → 대기 → `HookEnd`.
//!   출력은 대상 컨테이너의 stdout(`hook_sink`)으로 보내집니다.
//!
//! 타임스탬프는 시계 소스(부팅 후 경과 시간)를 1/100초 단위로 읽은 값이며,
//! 직전 값보다 크지 않으면 `직전 + 1`로 올려 한 스트림 안에서 엄격하게 증가합니다.
//!
//! 빌더는 순수 함수입니다. 명령을 실행하지 않으며 I/O도 하지 않습니다.
//!
//! # 사용 예시
//! ```
//! use hookline_timeline::command::{CommandBuilder, ExecParams, HookKind, prefixed_name};
//! use hookline_timeline::config::TimelineConfig;
//!
//! let builder = CommandBuilder::new(&TimelineConfig::default());
//!
//! let container = builder
//!     .build("regular-1", &ExecParams::new().delay(100).exit_code(0))
//!     .unwrap();
//! assert_eq!(container[0], "sh");
//! assert_eq!(container[1], "-c");
//!
//! let hook_name = prefixed_name(HookKind::PreStop, "regular-1");
//! let hook = builder
//!     .build(&hook_name, &ExecParams::new().delay(1).hook_for("regular-1"))
//!     .unwrap();
//! assert!(hook[2].contains("PreStop-regular-1|HookStart|"));
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::TimelineConfig;
use crate::error::CommandError;
use crate::event::{EventKind, FIELD_DELIMITER, is_valid_container_name};

/// 방출 명령 파라미터
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecParams {
    /// 시작 후 종료까지 대기 시간 (초)
    pub delay_secs: u32,
    /// TERM 수신 후 종료까지 대기 시간 (초, 훅에는 사용 불가)
    pub termination_secs: u32,
    /// 종료 코드 (0-255)
    pub exit_code: i32,
    /// 지정하면 훅 명령이 되며, 이벤트를 이 컨테이너의 stdout으로 보냅니다.
    pub dependent_container: Option<String>,
}

impl ExecParams {
    /// 모든 값이 0인 파라미터를 생성합니다.
    pub fn new() -> Self {
        Self::default()
    }

    /// 실행 시간(초)을 설정합니다.
    pub fn delay(mut self, secs: u32) -> Self {
        self.delay_secs = secs;
        self
    }

    /// 종료 대기 시간(초)을 설정합니다.
    pub fn termination(mut self, secs: u32) -> Self {
        self.termination_secs = secs;
        self
    }

    /// 종료 코드를 설정합니다.
    pub fn exit_code(mut self, code: i32) -> Self {
        self.exit_code = code;
        self
    }

    /// 훅 명령으로 만들고 대상 컨테이너를 지정합니다.
    pub fn hook_for(mut self, container: impl Into<String>) -> Self {
        self.dependent_container = Some(container.into());
        self
    }

    /// 훅 명령인지
    pub fn is_hook(&self) -> bool {
        self.dependent_container.is_some()
    }
}

/// 라이프사이클 훅 및 프로브 종류
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HookKind {
    /// 종료 직전 훅
    PreStop,
    /// 시작 직후 훅
    PostStart,
    /// 시작 프로브 (실패 시 컨테이너는 `Started`에 도달하지 못함)
    StartupProbe,
}

impl HookKind {
    /// 훅 타임라인 이름의 접두어
    pub fn prefix(self) -> &'static str {
        match self {
            Self::PreStop => "PreStop",
            Self::PostStart => "PostStart",
            Self::StartupProbe => "StartupProbe",
        }
    }
}

impl fmt::Display for HookKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.prefix())
    }
}

/// 훅 타임라인 이름을 만듭니다. (`PreStop` + `regular-1` → `PreStop-regular-1`)
pub fn prefixed_name(kind: HookKind, container: &str) -> String {
    format!("{}-{container}", kind.prefix())
}

/// 방출 명령 빌더
#[derive(Debug, Clone)]
pub struct CommandBuilder {
    shell: String,
    clock_source: String,
    hook_sink: String,
    max_delay_secs: u32,
}

impl CommandBuilder {
    /// 설정에서 빌더를 생성합니다.
    pub fn new(config: &TimelineConfig) -> Self {
        Self {
            shell: config.shell.clone(),
            clock_source: config.clock_source.clone(),
            hook_sink: config.hook_sink.clone(),
            max_delay_secs: config.max_delay_secs,
        }
    }

    /// 명령 토큰 `[shell, "-c", script]`을 만듭니다.
    pub fn build(&self, name: &str, params: &ExecParams) -> Result<Vec<String>, CommandError> {
        self.check(name, params)?;

        let script = match &params.dependent_container {
            Some(dependent) => {
                debug!(hook = name, dependent = dependent.as_str(), "building hook command");
                self.hook_script(name, params)
            }
            None => {
                debug!(container = name, "building container command");
                self.container_script(name, params)
            }
        };

        Ok(vec![self.shell.clone(), "-c".to_owned(), script])
    }

    fn check(&self, name: &str, params: &ExecParams) -> Result<(), CommandError> {
        if !is_valid_container_name(name) {
            return Err(CommandError::InvalidName {
                name: name.to_owned(),
            });
        }
        if let Some(dependent) = &params.dependent_container {
            if !is_valid_container_name(dependent) {
                return Err(CommandError::InvalidName {
                    name: dependent.clone(),
                });
            }
            if params.termination_secs > 0 {
                return Err(CommandError::HookWithTermination {
                    name: name.to_owned(),
                    secs: params.termination_secs,
                });
            }
        }
        if !(0..=255).contains(&params.exit_code) {
            return Err(CommandError::InvalidExitCode {
                name: name.to_owned(),
                code: params.exit_code,
            });
        }
        for (field, value) in [
            ("delay_secs", params.delay_secs),
            ("termination_secs", params.termination_secs),
        ] {
            if value > self.max_delay_secs {
                return Err(CommandError::DelayTooLong {
                    name: name.to_owned(),
                    field,
                    value,
                    max: self.max_delay_secs,
                });
            }
        }
        Ok(())
    }

    // emit KIND [SUFFIX]: 타임스탬프를 읽어 한 줄 출력
    fn emit_function(&self, name: &str, redirect: &str) -> String {
        format!(
            "emit() {{ t=$(awk '{{printf \"%d\", $1 * 100}}' {clock}); \
             if [ \"$t\" -le \"$last\" ]; then t=$((last + 1)); fi; last=$t; \
             echo \"{name}{d}$1{d}$t$2\"{redirect}; }}",
            clock = self.clock_source,
            d = FIELD_DELIMITER,
        )
    }

    fn container_script(&self, name: &str, params: &ExecParams) -> String {
        let code = params.exit_code;
        let exited = format!("emit {} \"{FIELD_DELIMITER}{code}\"", EventKind::Exited);
        // Exited는 한 번만: 트랩 안에서도, 정상 종료 경로에서도 먼저 TERM을 무시
        let disarm = "trap \"\" TERM";
        let on_term = if params.termination_secs > 0 {
            format!("{disarm}; sleep {}; {exited}; exit {code}", params.termination_secs)
        } else {
            format!("{disarm}; {exited}; exit {code}")
        };

        [
            "last=-1".to_owned(),
            self.emit_function(name, ""),
            format!("trap '{on_term}' TERM"),
            format!("emit {}", EventKind::Started),
            // 종료된 뒤에도 남는 sleep이 stdout을 붙잡지 않도록 분리
            format!("sleep {} >/dev/null 2>&1 & wait $!", params.delay_secs),
            "trap '' TERM".to_owned(),
            exited,
            format!("exit {code}"),
        ]
        .join("\n")
    }

    fn hook_script(&self, name: &str, params: &ExecParams) -> String {
        let redirect = format!(" >> {}", self.hook_sink);
        [
            "last=-1".to_owned(),
            self.emit_function(name, &redirect),
            format!("emit {}", EventKind::HookStart),
            format!("sleep {}", params.delay_secs),
            format!("emit {}", EventKind::HookEnd),
            format!("exit {}", params.exit_code),
        ]
        .join("\n")
    }
}

impl Default for CommandBuilder {
    fn default() -> Self {
        Self::new(&TimelineConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn script(name: &str, params: &ExecParams) -> String {
        let tokens = CommandBuilder::default().build(name, params).unwrap();
        assert_eq!(tokens.len(), 3);
        tokens[2].clone()
    }

    #[test]
    fn tokens_use_configured_shell() {
        let config = TimelineConfig {
            shell: "ash".to_owned(),
            ..Default::default()
        };
        let tokens = CommandBuilder::new(&config)
            .build("a", &ExecParams::new())
            .unwrap();
        assert_eq!(tokens[0], "ash");
        assert_eq!(tokens[1], "-c");
    }

    #[test]
    fn container_script_emits_start_then_exit() {
        let s = script("regular-1", &ExecParams::new().delay(100).exit_code(3));
        let started = s.find("emit Started").unwrap();
        let sleep = s.find("sleep 100 >/dev/null 2>&1 & wait $!").unwrap();
        let exited = s.rfind("emit Exited \"|3\"").unwrap();
        assert!(started < sleep && sleep < exited);
        assert!(s.ends_with("exit 3"));
        assert!(s.contains("echo \"regular-1|$1|$t$2\";"));
    }

    #[test]
    fn container_script_traps_term() {
        let s = script("regular-1", &ExecParams::new().delay(100).termination(30));
        assert!(s.contains("trap 'trap \"\" TERM; sleep 30; emit Exited \"|0\"; exit 0' TERM"));
    }

    #[test]
    fn normal_exit_ignores_term_before_reporting() {
        let s = script("regular-1", &ExecParams::new().delay(1).exit_code(2));
        let wait = s.find("wait $!").unwrap();
        let disarm = s.find("\ntrap '' TERM\n").unwrap();
        let exited = s.rfind("\nemit Exited \"|2\"").unwrap();
        assert!(wait < disarm && disarm < exited);
    }

    #[test]
    fn zero_termination_skips_sleep_in_trap() {
        let s = script("regular-1", &ExecParams::new().delay(1));
        assert!(s.contains("trap 'trap \"\" TERM; emit Exited \"|0\"; exit 0' TERM"));
    }

    #[test]
    fn timestamp_is_bumped_when_not_increasing() {
        let s = script("a", &ExecParams::new());
        assert!(s.contains("awk '{printf \"%d\", $1 * 100}' /proc/uptime"));
        assert!(s.contains("if [ \"$t\" -le \"$last\" ]; then t=$((last + 1)); fi"));
    }

    #[test]
    fn hook_script_writes_to_sink() {
        let name = prefixed_name(HookKind::PreStop, "regular-1");
        let s = script(&name, &ExecParams::new().delay(1).hook_for("regular-1"));
        assert!(s.contains("echo \"PreStop-regular-1|$1|$t$2\" >> /proc/1/fd/1;"));
        let start = s.find("emit HookStart").unwrap();
        let end = s.find("emit HookEnd").unwrap();
        assert!(start < end);
        assert!(!s.contains("trap"));
        assert!(!s.contains("Exited"));
    }

    #[test]
    fn hook_rejects_termination_seconds() {
        let err = CommandBuilder::default()
            .build("PreStop-a", &ExecParams::new().termination(5).hook_for("a"))
            .unwrap_err();
        assert_eq!(
            err,
            CommandError::HookWithTermination {
                name: "PreStop-a".to_owned(),
                secs: 5
            }
        );
    }

    #[test]
    fn rejects_unsafe_names() {
        let builder = CommandBuilder::default();
        assert!(matches!(
            builder.build("a'; rm -rf /", &ExecParams::new()),
            Err(CommandError::InvalidName { .. })
        ));
        assert!(matches!(
            builder.build("PreStop-a", &ExecParams::new().hook_for("b|c")),
            Err(CommandError::InvalidName { .. })
        ));
    }

    #[test]
    fn rejects_out_of_range_exit_code() {
        let builder = CommandBuilder::default();
        assert!(matches!(
            builder.build("a", &ExecParams::new().exit_code(256)),
            Err(CommandError::InvalidExitCode { code: 256, .. })
        ));
        assert!(builder.build("a", &ExecParams::new().exit_code(-1)).is_err());
        assert!(builder.build("a", &ExecParams::new().exit_code(255)).is_ok());
    }

    #[test]
    fn rejects_delay_over_limit() {
        let config = TimelineConfig {
            max_delay_secs: 10,
            ..Default::default()
        };
        let err = CommandBuilder::new(&config)
            .build("a", &ExecParams::new().delay(11))
            .unwrap_err();
        assert!(matches!(
            err,
            CommandError::DelayTooLong {
                field: "delay_secs",
                value: 11,
                max: 10,
                ..
            }
        ));
    }

    #[test]
    fn build_is_deterministic() {
        let builder = CommandBuilder::default();
        let params = ExecParams::new().delay(5).termination(2).exit_code(1);
        assert_eq!(
            builder.build("a", &params).unwrap(),
            builder.build("a", &params).unwrap()
        );
    }

    #[test]
    fn prefixed_names() {
        assert_eq!(prefixed_name(HookKind::PreStop, "regular-1"), "PreStop-regular-1");
        assert_eq!(prefixed_name(HookKind::PostStart, "main"), "PostStart-main");
        assert_eq!(
            prefixed_name(HookKind::StartupProbe, "main"),
            "StartupProbe-main"
        );
    }
}
