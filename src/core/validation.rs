//! Field validation applied before data reaches the model or the backend

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;

use crate::config::{MAX_CHART_LEVEL, MAX_TARGET_SCORE, MIN_CHART_LEVEL};
use crate::error::{AdminError, FieldError, Result};
use crate::models::{ChartType, JacketUpload, NewChartDto, NewSongDto, UpdateChartDto};
use crate::stores::ChartIndex;

static SONG_ID_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+$").unwrap());

// "180" or "141-176"
static BPM_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d+(\.\d+)?(-\d+(\.\d+)?)?$").unwrap());

/// A form value that may arrive as a JSON number or as typed text
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum FieldInput {
    Number(i64),
    Text(String),
}

impl FieldInput {
    fn as_integer(&self) -> Option<i64> {
        match self {
            FieldInput::Number(n) => Some(*n),
            FieldInput::Text(s) => s.trim().parse().ok(),
        }
    }
}

/// Target score input: an integer in [0, 10_000_000], anything else clears it
pub fn parse_target_score(input: Option<&FieldInput>) -> Option<u32> {
    input
        .and_then(FieldInput::as_integer)
        .filter(|n| (0..=i64::from(MAX_TARGET_SCORE)).contains(n))
        .map(|n| n as u32)
}

/// Clear-type input: an index into the rank table, anything else clears it
pub fn parse_target_clear_type(input: Option<&FieldInput>, rank_count: usize) -> Option<u32> {
    input
        .and_then(FieldInput::as_integer)
        .filter(|n| *n >= 0 && (*n as u64) < rank_count as u64)
        .map(|n| n as u32)
}

fn check_level(level: u32, field: &str, errors: &mut Vec<FieldError>) {
    if !(MIN_CHART_LEVEL..=MAX_CHART_LEVEL).contains(&level) {
        errors.push(FieldError::new(
            field,
            format!(
                "level must be between {} and {}",
                MIN_CHART_LEVEL, MAX_CHART_LEVEL
            ),
        ));
    }
}

fn check_required(value: &str, field: &str, errors: &mut Vec<FieldError>) {
    if value.trim().is_empty() {
        errors.push(FieldError::new(field, "required"));
    }
}

fn finish(errors: Vec<FieldError>) -> Result<()> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(AdminError::Validation(errors))
    }
}

/// Validate a new song against the backend's highest song id and the
/// songs already in the catalogue.
pub fn validate_new_song(
    song: &NewSongDto,
    max_song_idx: u32,
    catalogue: Option<&ChartIndex>,
) -> Result<()> {
    let mut errors = Vec::new();

    let songid = song.songid.trim();
    if !SONG_ID_RE.is_match(songid) {
        errors.push(FieldError::new("songid", "must contain digits only"));
    } else {
        match songid.parse::<u32>() {
            Ok(id) if id <= max_song_idx => errors.push(FieldError::new(
                "songid",
                format!("must be greater than {}", max_song_idx),
            )),
            Ok(id) if catalogue.is_some_and(|c| c.contains_song(id)) => {
                errors.push(FieldError::new("songid", "song id already exists"))
            }
            Ok(_) => {}
            Err(_) => errors.push(FieldError::new("songid", "out of range")),
        }
    }

    check_required(&song.title, "title", &mut errors);
    check_required(&song.artist, "artist", &mut errors);
    if !song.bpm.is_empty() && !BPM_RE.is_match(song.bpm.trim()) {
        errors.push(FieldError::new("bpm", "expected N or N-M"));
    }

    if song.difficulties.is_empty() {
        errors.push(FieldError::new("difficulties", "at least one difficulty is required"));
    }
    for (i, diff) in song.difficulties.iter().enumerate() {
        let prefix = format!("difficulties[{}]", i);
        if diff.chart_type.parse::<ChartType>().is_err() {
            errors.push(FieldError::new(format!("{}.type", prefix), "unknown chart type"));
        }
        check_level(diff.level, &format!("{}.level", prefix), &mut errors);
        check_required(&diff.effector_name, &format!("{}.effectorName", prefix), &mut errors);
        check_required(
            &diff.illustrator_name,
            &format!("{}.illustratorName", prefix),
            &mut errors,
        );
    }

    finish(errors)
}

/// Validate a new chart and convert its type code to the long name the
/// backend expects (`MXM` -> `maximum`).
pub fn prepare_new_chart(chart: &NewChartDto) -> Result<NewChartDto> {
    let mut errors = Vec::new();
    let chart_type = match chart.chart_type.parse::<ChartType>() {
        Ok(t) => Some(t),
        Err(_) => {
            errors.push(FieldError::new("type", "unknown chart type"));
            None
        }
    };
    check_level(chart.level, "level", &mut errors);
    check_required(&chart.effector_name, "effectorName", &mut errors);
    check_required(&chart.illustrator_name, "illustratorName", &mut errors);
    finish(errors)?;

    let mut prepared = chart.clone();
    if let Some(t) = chart_type {
        prepared.chart_type = t.as_str().to_string();
    }
    Ok(prepared)
}

pub fn validate_update_chart(chart: &UpdateChartDto) -> Result<()> {
    let mut errors = Vec::new();
    if chart.chart_type.parse::<ChartType>().is_err() {
        errors.push(FieldError::new("type", "unknown chart type"));
    }
    check_level(chart.level, "level", &mut errors);
    check_required(&chart.effector_name, "effectorName", &mut errors);
    check_required(&chart.illustrator_name, "illustratorName", &mut errors);
    finish(errors)
}

/// A jacket needs a song, a chart type and a decodable image
pub fn validate_jacket(upload: &JacketUpload) -> Result<()> {
    let mut errors = Vec::new();
    check_required(&upload.song_idx, "songIdx", &mut errors);
    check_required(&upload.chart_type, "type", &mut errors);
    if upload.bytes.is_empty() {
        errors.push(FieldError::new("image", "required"));
    } else if image::guess_format(&upload.bytes).is_err() {
        errors.push(FieldError::new("image", "not a recognised image format"));
    }
    finish(errors)
}

pub fn validate_version(version: &str) -> Result<&str> {
    let version = version.trim();
    if version.is_empty() {
        return Err(AdminError::invalid("version", "required"));
    }
    Ok(version)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::admin::DifficultyDto;
    use crate::stores::catalogue_store::tests::sample_catalogue;

    fn text(s: &str) -> FieldInput {
        FieldInput::Text(s.to_string())
    }

    #[test]
    fn test_target_score_parsing() {
        assert_eq!(parse_target_score(Some(&text("9800000"))), Some(9_800_000));
        assert_eq!(parse_target_score(Some(&FieldInput::Number(0))), Some(0));
        assert_eq!(parse_target_score(Some(&text(" 10000000 "))), Some(10_000_000));
        assert_eq!(parse_target_score(Some(&text("10000001"))), None);
        assert_eq!(parse_target_score(Some(&FieldInput::Number(-1))), None);
        assert_eq!(parse_target_score(Some(&text("abc"))), None);
        assert_eq!(parse_target_score(Some(&text(""))), None);
        assert_eq!(parse_target_score(None), None);
    }

    #[test]
    fn test_clear_type_bounded_by_rank_table() {
        assert_eq!(parse_target_clear_type(Some(&text("2")), 5), Some(2));
        assert_eq!(parse_target_clear_type(Some(&FieldInput::Number(5)), 5), None);
        assert_eq!(parse_target_clear_type(Some(&text("0")), 0), None);
        assert_eq!(parse_target_clear_type(Some(&text("")), 5), None);
    }

    fn difficulty() -> DifficultyDto {
        DifficultyDto {
            level: 18,
            chart_type: "MXM".into(),
            effector_name: "fx".into(),
            illustrator_name: "il".into(),
            ..Default::default()
        }
    }

    fn song() -> NewSongDto {
        NewSongDto {
            songid: "120".into(),
            title: "New".into(),
            artist: "Someone".into(),
            bpm: "141-176".into(),
            difficulties: vec![difficulty()],
            ..Default::default()
        }
    }

    #[test]
    fn test_valid_song_passes() {
        let index = ChartIndex::build(sample_catalogue());
        validate_new_song(&song(), 100, Some(&index)).unwrap();
    }

    #[test]
    fn test_song_errors_are_collected() {
        let index = ChartIndex::build(sample_catalogue());
        let mut bad = song();
        bad.songid = "12a".into();
        bad.title = "  ".into();
        bad.bpm = "fast".into();
        bad.difficulties[0].level = 21;

        let AdminError::Validation(fields) = validate_new_song(&bad, 100, Some(&index)).unwrap_err()
        else {
            panic!("expected validation error");
        };
        let names: Vec<&str> = fields.iter().map(|f| f.field.as_str()).collect();
        assert_eq!(names, vec!["songid", "title", "bpm", "difficulties[0].level"]);
    }

    #[test]
    fn test_song_id_must_be_new() {
        let index = ChartIndex::build(sample_catalogue());
        let mut low = song();
        low.songid = "50".into();
        assert!(validate_new_song(&low, 100, None).is_err());

        // song 2 is already in the catalogue
        let mut taken = song();
        taken.songid = "2".into();
        assert!(validate_new_song(&taken, 1, Some(&index)).is_err());
    }

    #[test]
    fn test_new_chart_type_is_converted() {
        let chart = NewChartDto {
            song_idx: 1,
            level: 17,
            chart_type: "EXH".into(),
            effector_name: "fx".into(),
            illustrator_name: "il".into(),
            ..Default::default()
        };
        assert_eq!(prepare_new_chart(&chart).unwrap().chart_type, "exhaust");

        let bad = NewChartDto {
            level: 0,
            ..chart
        };
        assert!(prepare_new_chart(&bad).is_err());
    }

    #[test]
    fn test_jacket_requires_image_bytes() {
        let mut upload = JacketUpload {
            song_idx: "1".into(),
            chart_type: "MXM".into(),
            file_name: "a.png".into(),
            content_type: "image/png".into(),
            bytes: b"not an image".to_vec(),
        };
        assert!(validate_jacket(&upload).is_err());

        upload.bytes = b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR".to_vec();
        validate_jacket(&upload).unwrap();
    }

    #[test]
    fn test_version_trimmed() {
        assert_eq!(validate_version(" 2025.1 ").unwrap(), "2025.1");
        assert!(validate_version("   ").is_err());
    }
}
