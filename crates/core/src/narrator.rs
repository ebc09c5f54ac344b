//! 내레이터 trait: 테스트 진행 상황 서술 확장 포인트
//!
//! 검증 엔진은 진행 상황을 전역 헬퍼로 출력하지 않고,
//! 호출자가 주입한 [`Narrator`]를 통해서만 서술합니다.

/// 테스트 단계와 로그를 서술하는 trait
///
/// 구현체는 tracing, 표준 출력, 테스트 기록기 등 무엇이든 될 수 있습니다.
pub trait Narrator: Send + Sync {
    /// 테스트 케이스 이름을 알림
    fn test_name(&self, name: &str);

    /// 새 테스트 단계를 알림
    fn step(&self, description: &str);

    /// 단계 내부의 세부 로그
    fn log(&self, message: &str);
}

/// 아무것도 출력하지 않는 내레이터
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentNarrator;

impl Narrator for SilentNarrator {
    fn test_name(&self, _name: &str) {}

    fn step(&self, _description: &str) {}

    fn log(&self, _message: &str) {}
}
