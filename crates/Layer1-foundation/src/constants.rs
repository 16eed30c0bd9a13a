//! Constants - Resolve API 열거 테이블
//!
//! 네이티브 API가 받아들이는 값의 목록. 검증 함수는 잘못된 값을
//! `Error::Validation`으로 돌려준다 (API까지 전달하지 않음).

use crate::{Error, Result};

/// OpenPage가 받는 페이지 이름
pub const VALID_PAGES: [&str; 7] = [
    "media", "cut", "edit", "fusion", "color", "fairlight", "deliver",
];

/// 키프레임 모드 (이름 ↔ 정수)
pub const KEYFRAME_MODES: [(&str, i64); 4] = [
    ("All", 0),
    ("All+Dynamic", 1),
    ("Selected", 2),
    ("Selected+Dynamic", 3),
];

/// 마커 색상
pub const MARKER_COLORS: [&str; 16] = [
    "blue", "cyan", "green", "yellow", "red", "pink", "purple", "fuchsia", "rose", "lavender",
    "sky", "mint", "lemon", "sand", "cocoa", "cream",
];

/// 트랙 타입
pub const TRACK_TYPES: [&str; 3] = ["video", "audio", "subtitle"];

/// 레이아웃 프리셋 액션
pub const LAYOUT_PRESET_ACTIONS: [&str; 6] =
    ["load", "save", "update", "delete", "import", "export"];

/// 렌더/번인 프리셋 액션
pub const PRESET_IO_ACTIONS: [&str; 2] = ["import", "export"];

/// GrabAllStills 소스 프레임 (1 - 첫 프레임, 2 - 중간 프레임)
pub const STILL_FRAME_SOURCES: [i64; 2] = [1, 2];

/// 타임라인 내보내기 타입
pub const EXPORT_TYPES: [&str; 17] = [
    "AAF",
    "DRT",
    "EDL",
    "FCP7XML",
    "FCPXML_1_8",
    "FCPXML_1_9",
    "FCPXML_1_10",
    "HDR10_PROFILE_A",
    "HDR10_PROFILE_B",
    "CSV",
    "TAB",
    "DOLBY_VISION_VER_2_9",
    "DOLBY_VISION_VER_4_0",
    "DOLBY_VISION_VER_5_1",
    "OTIO",
    "ALE",
    "ALE_CDL",
];

/// AAF 내보내기 서브타입
pub const AAF_EXPORT_SUBTYPES: [&str; 2] = ["NEW", "EXISTING"];

/// EDL 내보내기 서브타입
pub const EDL_EXPORT_SUBTYPES: [&str; 4] = ["CDL", "SDL", "MISSING_CLIPS", "NONE"];

/// 내보내기 타입 검증 (대문자 비교)
pub fn validate_export_type(export_type: &str) -> Result<()> {
    if EXPORT_TYPES.contains(&export_type.to_uppercase().as_str()) {
        Ok(())
    } else {
        Err(Error::Validation(format!(
            "Invalid export type. Must be one of: {}",
            EXPORT_TYPES.join(", ")
        )))
    }
}

/// 페이지 이름 검증
pub fn validate_page(page: &str) -> Result<()> {
    if VALID_PAGES.contains(&page) {
        Ok(())
    } else {
        Err(Error::Validation(format!(
            "Invalid page name: {}. Must be one of {}",
            page,
            VALID_PAGES.join(", ")
        )))
    }
}

/// 키프레임 모드 이름을 정수로 변환
pub fn keyframe_mode_from_name(name: &str) -> Result<i64> {
    KEYFRAME_MODES
        .iter()
        .find(|(n, _)| *n == name)
        .map(|(_, mode)| *mode)
        .ok_or_else(|| {
            Error::Validation(format!(
                "Invalid keyframe mode: {}. Must be one of {}",
                name,
                KEYFRAME_MODES
                    .iter()
                    .map(|(n, _)| *n)
                    .collect::<Vec<_>>()
                    .join(", ")
            ))
        })
}

/// 키프레임 모드 정수를 이름으로 변환
pub fn keyframe_mode_name(mode: i64) -> Option<&'static str> {
    KEYFRAME_MODES
        .iter()
        .find(|(_, m)| *m == mode)
        .map(|(n, _)| *n)
}

/// 키프레임 모드 정수 범위 검증 (0-3)
pub fn validate_keyframe_mode(mode: i64) -> Result<()> {
    if (0..=3).contains(&mode) {
        Ok(())
    } else {
        Err(Error::Validation(format!(
            "Invalid keyframe mode: {}. Must be 0-3",
            mode
        )))
    }
}

/// 마커 색상 검증 (소문자 비교)
pub fn validate_marker_color(color: &str) -> Result<()> {
    if MARKER_COLORS.contains(&color.to_lowercase().as_str()) {
        Ok(())
    } else {
        Err(Error::Validation(format!(
            "Invalid marker color: {}. Must be one of {}",
            color,
            MARKER_COLORS.join(", ")
        )))
    }
}

/// 트랙 타입 검증 (소문자 비교)
pub fn validate_track_type(track_type: &str) -> Result<()> {
    if TRACK_TYPES.contains(&track_type.to_lowercase().as_str()) {
        Ok(())
    } else {
        Err(Error::Validation(format!(
            "Invalid track type: {}. Must be one of {}",
            track_type,
            TRACK_TYPES.join(", ")
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_page() {
        assert!(validate_page("edit").is_ok());
        assert!(validate_page("Edit").is_err());
        assert!(validate_page("render").is_err());
    }

    #[test]
    fn test_keyframe_mode_roundtrip() {
        assert_eq!(keyframe_mode_from_name("All").unwrap(), 0);
        assert_eq!(keyframe_mode_from_name("Selected+Dynamic").unwrap(), 3);
        assert_eq!(keyframe_mode_name(1), Some("All+Dynamic"));
        assert!(keyframe_mode_from_name("None").is_err());
        assert!(validate_keyframe_mode(4).is_err());
    }

    #[test]
    fn test_validate_marker_color_case_insensitive() {
        assert!(validate_marker_color("Blue").is_ok());
        assert!(validate_marker_color("cocoa").is_ok());
        assert!(validate_marker_color("magenta").is_err());
    }

    #[test]
    fn test_validate_track_type() {
        assert!(validate_track_type("VIDEO").is_ok());
        assert!(validate_track_type("still").is_err());
    }
}
