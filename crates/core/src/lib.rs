#![doc = include_str!("../README.md")]

pub mod config;
pub mod error;
pub mod metrics;
pub mod narrator;

// --- 주요 타입 re-export ---

// 에러
pub use error::{
    CommandError, ConfigError, HooklineError, ParseError, VerificationError,
};

// 설정
pub use config::{EmissionConfig, GeneralConfig, HooklineConfig, ParserConfig};

// 내레이터 trait
pub use narrator::{Narrator, SilentNarrator};
