//! 이벤트 라인 문법
//!
//! ```text
//! name|Kind|timestamp[|exitCode]
//! ```
//!
//! 문법에 맞지 않는 라인은 에러가 아니라 잡음으로 취급하여 `None`을 반환합니다.
//! 캡처된 출력에는 프레임워크나 셸이 출력한 다른 라인이 섞일 수 있기 때문입니다.

use crate::event::{Event, EventKind, FIELD_DELIMITER, is_valid_container_name};

/// 한 줄을 이벤트로 해석합니다.
///
/// 앞뒤 공백과 `\r`은 무시합니다. 다음 조건을 모두 만족해야 이벤트로 인정됩니다.
/// - 필드 3개 또는 4개
/// - 유효한 이름
/// - 네 가지 종류 중 하나 (대소문자 구분)
/// - `u64` 타임스탬프
/// - `Exited`일 때만 `i32` 종료 코드가 존재
pub fn parse_event_line(line: &str) -> Option<Event> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    let mut fields = line.split(FIELD_DELIMITER);
    let name = fields.next()?;
    let kind = fields.next()?;
    let timestamp = fields.next()?;
    let exit_code = fields.next();
    if fields.next().is_some() {
        return None;
    }

    if !is_valid_container_name(name) {
        return None;
    }
    let kind: EventKind = kind.parse().ok()?;
    let timestamp: u64 = parse_decimal(timestamp)?;

    let exit_code = match (kind, exit_code) {
        (EventKind::Exited, Some(code)) => Some(code.parse::<i32>().ok()?),
        (EventKind::Exited, None) | (_, Some(_)) => return None,
        (_, None) => None,
    };

    Some(Event {
        container_name: name.to_owned(),
        kind,
        timestamp,
        exit_code,
    })
}

// u64::from_str는 선행 '+'를 허용하므로 숫자만 받도록 먼저 확인
fn parse_decimal(field: &str) -> Option<u64> {
    if field.is_empty() || !field.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    field.parse().ok()
}
