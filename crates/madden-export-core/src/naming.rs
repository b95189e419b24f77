//! Export file name generation
//!
//! Structured exports: `{platform}_league_{id}_{season}_week_{n}_{label}_{timestamp}.json`
//! Raw exports: `madden_raw_{timestamp}.txt`
//!
//! Components missing from the path metadata are skipped. Timestamps are local
//! time at second resolution, so identical exports within one second share a
//! file name and the later write replaces the earlier one.

use crate::path::PathMetadata;
use chrono::{DateTime, Local};

/// `YYYYMMDD-HHMMSS`
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d-%H%M%S";

/// Prefix for payloads that did not parse as JSON
pub const RAW_PREFIX: &str = "madden_raw";

/// Prefix used when no name component is available
pub const FALLBACK_PREFIX: &str = "madden_export";

/// Format a timestamp for use in file names
pub fn format_timestamp(at: &DateTime<Local>) -> String {
    at.format(TIMESTAMP_FORMAT).to_string()
}

/// File name for a raw (non-JSON) export
pub fn raw_file_name(at: &DateTime<Local>) -> String {
    format!("{}_{}.txt", RAW_PREFIX, format_timestamp(at))
}

/// Ordered, non-empty name components for a structured export
pub fn name_components(metadata: &PathMetadata, label: &str) -> Vec<String> {
    let mut parts = Vec::new();

    if !metadata.platform.is_empty() {
        parts.push(sanitize_component(&metadata.platform));
    }

    if !metadata.league_id.is_empty() {
        parts.push(format!("league_{}", sanitize_component(&metadata.league_id)));
    }

    // Both qualifiers or neither
    if !metadata.season_type.is_empty() && !metadata.week_number.is_empty() {
        parts.push(format!(
            "{}_week_{}",
            sanitize_component(&metadata.season_type),
            sanitize_component(&metadata.week_number)
        ));
    }

    if !label.is_empty() {
        parts.push(sanitize_component(label));
    }

    parts
}

/// File name for a structured (JSON) export
pub fn json_file_name(metadata: &PathMetadata, label: &str, at: &DateTime<Local>) -> String {
    let parts = name_components(metadata, label);
    let base = if parts.is_empty() {
        format!("{}_{}", FALLBACK_PREFIX, sanitize_component(label))
    } else {
        parts.join("_")
    };

    format!("{}_{}.json", base, format_timestamp(at))
}

/// Replace path separators and NUL with `_`, and a bare `..` with `__`, so a
/// component can never leave the data directory. Everything else is kept.
pub fn sanitize_component(component: &str) -> String {
    if component == ".." {
        return "__".to_string();
    }

    component
        .chars()
        .map(|c| match c {
            '/' | '\\' | '\0' => '_',
            c => c,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::classify;
    use chrono::TimeZone;

    fn at() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 9, 8, 13, 5, 9).unwrap()
    }

    #[test]
    fn test_timestamp_format() {
        assert_eq!(format_timestamp(&at()), "20240908-130509");
    }

    #[test]
    fn test_raw_file_name() {
        assert_eq!(raw_file_name(&at()), "madden_raw_20240908-130509.txt");
    }

    #[test]
    fn test_weekly_file_name() {
        let metadata = classify("/export/ps5/12345/week/reg/3/schedules");
        assert_eq!(
            json_file_name(&metadata, "schedules", &at()),
            "ps5_league_12345_reg_week_3_schedules_20240908-130509.json"
        );
    }

    #[test]
    fn test_league_file_name() {
        let metadata = classify("/export/xbox/99/leagueteams");
        assert_eq!(
            json_file_name(&metadata, "leagueteams", &at()),
            "xbox_league_99_leagueteams_20240908-130509.json"
        );
    }

    #[test]
    fn test_partial_qualifiers_are_omitted() {
        let season_only = PathMetadata {
            platform: "ps5".into(),
            season_type: "reg".into(),
            ..Default::default()
        };
        assert_eq!(name_components(&season_only, "passing"), vec!["ps5", "passing"]);

        let week_only = PathMetadata {
            week_number: "4".into(),
            ..Default::default()
        };
        assert_eq!(name_components(&week_only, "passing"), vec!["passing"]);
    }

    #[test]
    fn test_empty_components_use_fallback_prefix() {
        assert_eq!(
            json_file_name(&PathMetadata::default(), "", &at()),
            "madden_export__20240908-130509.json"
        );
        assert_eq!(
            json_file_name(&PathMetadata::default(), "standings", &at()),
            "standings_20240908-130509.json"
        );
    }

    #[test]
    fn test_sanitize_component() {
        assert_eq!(sanitize_component("standings"), "standings");
        assert_eq!(sanitize_component("team-stats_1"), "team-stats_1");
        assert_eq!(sanitize_component("team.stats"), "team.stats");
        assert_eq!(sanitize_component("équipe"), "équipe");
        assert_eq!(sanitize_component("a b/c"), "a b_c");
        assert_eq!(sanitize_component("..\\..\\x"), ".._.._x");
        assert_eq!(sanitize_component("../../etc"), ".._.._etc");
        assert_eq!(sanitize_component("nul\0byte"), "nul_byte");
        assert_eq!(sanitize_component(".."), "__");
    }

    #[test]
    fn test_hostile_label_stays_in_data_dir() {
        let metadata = PathMetadata::default();
        let name = json_file_name(&metadata, "../../etc/passwd", &at());
        assert_eq!(name, "madden_export_.._.._etc_passwd_20240908-130509.json");
        assert!(!name.contains('/'));
    }
}
