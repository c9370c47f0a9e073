//! 공통 유틸리티 함수 모듈
//!
//! - [`string_utils`] - 문자열 검증, 정리 유틸리티
//! - [`time_utils`] - BSON 시각 변환
//! - [`display_terminal`] - 기동 화면 출력 함수들

pub mod string_utils;
pub mod time_utils;
pub mod display_terminal;
