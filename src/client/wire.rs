//! Request and response shapes of the generation service.
//!
//! Every response is a JSON object with a `success` flag; failures carry
//! `error` and optionally `suggestion`, successes carry the stage's fields.

use cinegen_core::{Brief, SceneSpec, StageFailure, StageKind};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageRequest {
    pub scene_id: u32,
    pub scene_content: String,
    pub genre: String,
    pub style: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VideoRequest {
    /// Successful scene images, in scene order
    pub images: Vec<String>,
    pub movie_data: Brief,
}

#[derive(Debug, Serialize)]
pub(crate) struct PosterRequest<'a> {
    pub movie_data: &'a Brief,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ScriptOutput {
    pub script: String,
    pub scenes: Vec<SceneSpec>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ImageOutput {
    pub image_path: String,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct VideoOutput {
    pub video_path: String,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PosterOutput {
    pub poster_path: String,
}

#[derive(Debug, Deserialize)]
struct Status {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    suggestion: Option<String>,
}

/// What a response body turned out to contain.
#[derive(Debug)]
pub(crate) enum Decoded<T> {
    /// `success: true` with every field the stage requires.
    Ok(T),
    /// The service said `success: false`.
    Reported(StageFailure),
    /// Not an envelope we understand.
    Malformed(String),
}

pub(crate) fn decode<T: DeserializeOwned>(body: &str, stage: StageKind) -> Decoded<T> {
    let value: serde_json::Value = match serde_json::from_str(body) {
        Ok(value) => value,
        Err(e) => return Decoded::Malformed(format!("invalid JSON in {} response: {}", stage, e)),
    };

    let status: Status = match serde_json::from_value(value.clone()) {
        Ok(status) => status,
        Err(e) => return Decoded::Malformed(format!("unexpected {} response: {}", stage, e)),
    };

    if !status.success {
        let error = status
            .error
            .filter(|e| !e.trim().is_empty())
            .unwrap_or_else(|| stage.default_error().to_string());
        return Decoded::Reported(StageFailure::service(error, status.suggestion));
    }

    match serde_json::from_value(value) {
        Ok(output) => Decoded::Ok(output),
        Err(e) => Decoded::Malformed(format!("incomplete {} response: {}", stage, e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_script_success() {
        let body = r#"{"success":true,"script":"Scene 1: Dawn\nSun rises.","scenes":[{"id":1,"title":"Scene 1: Dawn","content":"Sun rises."}]}"#;
        match decode::<ScriptOutput>(body, StageKind::Script) {
            Decoded::Ok(out) => {
                assert_eq!(out.scenes.len(), 1);
                assert_eq!(out.scenes[0].title.as_deref(), Some("Scene 1: Dawn"));
                assert!(out.message.is_none());
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn reported_failure_keeps_error_and_suggestion_verbatim() {
        let body = r#"{"success":false,"error":"policy violation","suggestion":"rephrase scene"}"#;
        match decode::<ImageOutput>(body, StageKind::Image) {
            Decoded::Reported(failure) => {
                assert_eq!(failure.error, "policy violation");
                assert_eq!(failure.suggestion.as_deref(), Some("rephrase scene"));
                assert!(!failure.is_transport());
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn missing_error_uses_stage_default() {
        match decode::<VideoOutput>(r#"{"success":false}"#, StageKind::Video) {
            Decoded::Reported(failure) => assert_eq!(failure.error, "Video generation failed"),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn success_without_artifact_is_malformed() {
        assert!(matches!(
            decode::<ImageOutput>(r#"{"success":true}"#, StageKind::Image),
            Decoded::Malformed(_)
        ));
    }

    #[test]
    fn non_json_is_malformed() {
        assert!(matches!(
            decode::<ImageOutput>("<html>Bad Gateway</html>", StageKind::Image),
            Decoded::Malformed(_)
        ));
    }

    #[test]
    fn image_request_wire_names() {
        let request = ImageRequest {
            scene_id: 3,
            scene_content: "A storm".into(),
            genre: "Drama".into(),
            style: "Noir".into(),
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["scene_id"], 3);
        assert_eq!(json["scene_content"], "A storm");
    }
}
