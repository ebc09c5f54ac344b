//! 에러 타입: 도메인별 에러 정의
//!
//! 각 크레이트는 자체 도메인 에러를 가지며, `From` 변환을 통해
//! [`HooklineError`]로 합쳐집니다.

/// Hookline 최상위 에러 타입
#[derive(Debug, thiserror::Error)]
pub enum HooklineError {
    /// 설정 관련 에러
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// 캡처된 출력 파싱 에러
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// 타임라인 검증(어서션) 실패
    #[error("verification error: {0}")]
    Verification(#[from] VerificationError),

    /// 이벤트 방출 명령 구성 에러
    #[error("command error: {0}")]
    Command(#[from] CommandError),

    /// I/O 에러
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// 설정 관련 에러
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// 설정 파일을 찾을 수 없음
    #[error("config file not found: {path}")]
    FileNotFound { path: String },

    /// 설정 파싱 실패
    #[error("failed to parse config: {reason}")]
    ParseFailed { reason: String },

    /// 유효하지 않은 설정 값
    #[error("invalid config value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}

/// 파싱 에러
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// 기대한 컨테이너 출력에서 이벤트를 하나도 찾지 못함
    #[error("no events for container {container}")]
    NoEvents { container: String },

    /// 이벤트 스트림이 손상됨 (순서 위반, 잘못된 전이 등)
    #[error("corrupt event stream for container {container}: {reason}")]
    Corrupt { container: String, reason: String },

    /// 입력 데이터 초과
    #[error("input too large: {size} bytes (max: {max})")]
    TooLarge { size: usize, max: usize },
}

/// 검증 에러
#[derive(Debug, thiserror::Error)]
pub enum VerificationError {
    /// 관계형 어서션 실패
    #[error("assertion failed: {0}")]
    AssertionFailed(String),
}

/// 명령 구성 에러
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    /// 잘못된 방출 파라미터
    #[error("invalid exec parameters for '{name}': {reason}")]
    InvalidParams { name: String, reason: String },
}
