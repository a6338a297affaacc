//! CLI 도구 모음.
//!
//! 이 crate는 API 토큰 관리 명령을 제공합니다:
//! - 토큰 목록 조회
//! - 토큰 생성 (값 미지정 시 무작위 생성)
//! - 이름으로 토큰 삭제

pub mod commands;
