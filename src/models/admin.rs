//! Request/response bodies of the admin and auth endpoints

use serde::{Deserialize, Serialize};

/// `POST /auth/login` body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub id: String,
    pub pw: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub access_token: String,
}

/// Error body returned by the backend on a failed login
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LoginErrorResponse {
    pub status_code: u16,
    pub timestamp: String,
    pub path: String,
    pub method: String,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RadarDto {
    pub notes: u32,
    pub peak: u32,
    pub tsumami: u32,
    pub tricky: u32,
    pub handtrip: u32,
    pub onehand: u32,
}

/// One difficulty of a new song. Count fields are sent as strings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DifficultyDto {
    pub level: u32,
    #[serde(rename = "type")]
    pub chart_type: String,
    #[serde(rename = "effectorName")]
    pub effector_name: String,
    #[serde(rename = "illustratorName")]
    pub illustrator_name: String,
    pub max_exscore: String,
    pub radar: RadarDto,
    pub max_chain: String,
    pub chip_count: String,
    pub hold_count: String,
    pub tsumami_count: String,
}

/// `POST /admin/song` body
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NewSongDto {
    pub songid: String,
    pub title: String,
    pub artist: String,
    pub version: String,
    pub bpm: String,
    pub genres: Vec<String>,
    pub date: String,
    pub eac_exc: bool,
    pub difficulties: Vec<DifficultyDto>,
}

/// `POST /admin/chart` body
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NewChartDto {
    pub song_idx: u32,
    pub level: u32,
    #[serde(rename = "type")]
    pub chart_type: String,
    pub effector_name: String,
    pub illustrator_name: String,
    pub radar: RadarDto,
}

/// `PUT /admin/chart` body
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateChartDto {
    pub chart_idx: u32,
    pub song_idx: u32,
    pub level: u32,
    #[serde(rename = "type")]
    pub chart_type: String,
    pub effector_name: String,
    pub illustrator_name: String,
    pub radar: RadarDto,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaxSongIdxResponse {
    pub max_song_idx: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VersionResponse {
    #[serde(default)]
    pub version: String,
}

/// Jacket image upload, sent as multipart (songIdx, type, image)
#[derive(Debug, Clone)]
pub struct JacketUpload {
    pub song_idx: String,
    pub chart_type: String,
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_difficulty_field_names() {
        let dto = DifficultyDto {
            level: 18,
            chart_type: "MXM".into(),
            effector_name: "fx".into(),
            ..Default::default()
        };
        let json = serde_json::to_value(&dto).unwrap();
        assert_eq!(json["type"], "MXM");
        assert_eq!(json["effectorName"], "fx");
        assert!(json.get("max_exscore").is_some());
        assert!(json.get("chip_count").is_some());
    }

    #[test]
    fn test_chart_dto_is_camel_case() {
        let json = serde_json::to_value(UpdateChartDto {
            chart_idx: 4,
            song_idx: 2,
            ..Default::default()
        })
        .unwrap();
        assert_eq!(json["chartIdx"], 4);
        assert_eq!(json["songIdx"], 2);
    }
}
