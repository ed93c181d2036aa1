//! Storyboard illustration
//!
//! A screenplay is split on its scene-heading marker and one image is
//! requested per scene, strictly in order. Frames are produced lazily so a
//! caller can stop early without paying for the remaining scenes.

use std::sync::Arc;

use cinema_replicate::{ImageRequest, ImageService};
use serde::Serialize;
use tokio_stream::Stream;

use super::entities::{Prerequisite, Session};
use crate::error::StudioError;

const DEFAULT_TONE: &str = "cinematic";
const DEFAULT_GENRE: &str = "drama";

/// Fixed storyboard parameters
#[derive(Debug, Clone, PartialEq)]
pub struct StoryboardSettings {
    /// Literal scene-heading marker; empty means the whole screenplay is one scene
    pub marker: String,
    pub max_fragment_chars: usize,
    pub width: u32,
    pub height: u32,
}

impl Default for StoryboardSettings {
    fn default() -> Self {
        Self {
            marker: "INT.".to_string(),
            max_fragment_chars: 400,
            width: 1024,
            height: 576,
        }
    }
}

/// Per-request style for the frame prompts
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StyleHints {
    pub genre: Option<String>,
    pub tone: Option<String>,
    pub max_scenes: Option<usize>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SceneFragment {
    /// 1-based scene number
    pub number: usize,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoryboardFrame {
    pub scene: usize,
    pub prompt: String,
    pub image_url: Option<String>,
    pub error: Option<String>,
}

/// Split a screenplay into scene fragments
///
/// Fragments following a marker keep it as their leading text. Whitespace-only
/// fragments are dropped and the rest are cut to `max_chars` characters.
pub fn split_scenes(screenplay: &str, marker: &str, max_chars: usize) -> Vec<SceneFragment> {
    let pieces: Vec<String> = if marker.is_empty() {
        vec![screenplay.to_string()]
    } else {
        let mut pieces = Vec::new();
        let mut rest = screenplay;
        let mut start = 0;
        while let Some(found) = rest[start..].find(marker) {
            let at = start + found;
            pieces.push(rest[..at].to_string());
            rest = &rest[at..];
            start = marker.len();
        }
        pieces.push(rest.to_string());
        pieces
    };

    pieces
        .into_iter()
        .map(|piece| piece.trim().to_string())
        .filter(|piece| !piece.is_empty())
        .enumerate()
        .map(|(index, piece)| SceneFragment {
            number: index + 1,
            text: piece.chars().take(max_chars).collect(),
        })
        .collect()
}

pub fn frame_prompt(fragment: &SceneFragment, genre: &str, tone: &str) -> String {
    format!(
        "Cinematic storyboard frame, {} film, {} tone. {}",
        genre, tone, fragment.text
    )
}

/// Request one image per fragment, yielding frames lazily in scene order
pub fn illustrate(
    images: Arc<dyn ImageService>,
    fragments: Vec<SceneFragment>,
    genre: String,
    tone: String,
    width: u32,
    height: u32,
) -> impl Stream<Item = StoryboardFrame> {
    async_stream::stream! {
        for fragment in fragments {
            let prompt = frame_prompt(&fragment, &genre, &tone);
            let request = ImageRequest {
                prompt: prompt.clone(),
                width,
                height,
            };

            let frame = match images.generate_image(request).await {
                Ok(urls) => StoryboardFrame {
                    scene: fragment.number,
                    prompt,
                    image_url: urls.into_iter().next(),
                    error: None,
                },
                Err(e) => {
                    tracing::warn!(scene = fragment.number, error = %e, "Storyboard frame failed");
                    StoryboardFrame {
                        scene: fragment.number,
                        prompt,
                        image_url: None,
                        error: Some(e.to_string()),
                    }
                }
            };

            yield frame;
        }
    }
}

#[derive(Clone)]
pub struct Storyboarder {
    images: Arc<dyn ImageService>,
    settings: StoryboardSettings,
}

impl Storyboarder {
    pub fn new(images: Arc<dyn ImageService>, settings: StoryboardSettings) -> Self {
        Self { images, settings }
    }

    pub fn settings(&self) -> &StoryboardSettings {
        &self.settings
    }

    /// Frame stream for the session's screenplay
    pub fn frames(
        &self,
        session: &Session,
        hints: StyleHints,
    ) -> Result<impl Stream<Item = StoryboardFrame>, StudioError> {
        let screenplay = session
            .prerequisite(Prerequisite::Screenplay)
            .ok_or(StudioError::MissingPrerequisite(
                Prerequisite::Screenplay.missing_message(),
            ))?;

        let mut fragments = split_scenes(
            screenplay,
            &self.settings.marker,
            self.settings.max_fragment_chars,
        );
        if let Some(max) = hints.max_scenes {
            fragments.truncate(max);
        }

        let genre = non_blank(hints.genre)
            .or_else(|| non_blank(session.genre.clone()))
            .unwrap_or_else(|| DEFAULT_GENRE.to_string());
        let tone = non_blank(hints.tone)
            .or_else(|| non_blank(session.tone.clone()))
            .unwrap_or_else(|| DEFAULT_TONE.to_string());

        tracing::info!(scenes = fragments.len(), "Illustrating storyboard");

        Ok(illustrate(
            self.images.clone(),
            fragments,
            genre,
            tone,
            self.settings.width,
            self.settings.height,
        ))
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::ArtifactKind;
    use cinema_replicate::mock::MockImageService;
    use tokio_stream::StreamExt;

    const SCREENPLAY: &str = "FADE IN:\n\nINT. OFFICE - DAY\nMiller drinks.\n\nINT. ALLEY - NIGHT\nRain falls.\n";

    #[test]
    fn test_split_keeps_marker_and_prologue() {
        let fragments = split_scenes(SCREENPLAY, "INT.", 400);

        assert_eq!(fragments.len(), 3);
        assert_eq!(fragments[0].text, "FADE IN:");
        assert!(fragments[1].text.starts_with("INT. OFFICE - DAY"));
        assert!(fragments[2].text.starts_with("INT. ALLEY - NIGHT"));
        assert_eq!(
            fragments.iter().map(|f| f.number).collect::<Vec<_>>(),
            vec![1, 2, 3]
        );
    }

    #[test]
    fn test_split_without_prologue_yields_one_fragment_per_marker() {
        let fragments = split_scenes("INT. A\none\nINT. B\ntwo", "INT.", 400);
        assert_eq!(fragments.len(), 2);
        assert_eq!(fragments[0].text, "INT. A\none");
    }

    #[test]
    fn test_split_drops_blank_fragments_and_truncates() {
        let text = format!("   \nINT. LONG {}\nINT.   ", "z".repeat(500));
        let fragments = split_scenes(&text, "INT.", 50);

        assert_eq!(fragments.len(), 2);
        assert_eq!(fragments[0].text.chars().count(), 50);
        assert_eq!(fragments[1].text, "INT.");
    }

    #[test]
    fn test_split_with_empty_marker_is_single_scene() {
        let fragments = split_scenes(SCREENPLAY, "", 400);
        assert_eq!(fragments.len(), 1);
    }

    #[test]
    fn test_frame_prompt() {
        let fragment = SceneFragment {
            number: 1,
            text: "INT. OFFICE - DAY".to_string(),
        };
        assert_eq!(
            frame_prompt(&fragment, "Noir", "cinematic"),
            "Cinematic storyboard frame, Noir film, cinematic tone. INT. OFFICE - DAY"
        );
    }

    fn session_with_screenplay() -> Session {
        let mut session = Session::new();
        session.genre = Some("Noir".to_string());
        session.set_artifact(ArtifactKind::Screenplay, SCREENPLAY);
        session
    }

    #[tokio::test]
    async fn test_frames_are_requested_in_scene_order() {
        let images = MockImageService::new();
        let storyboarder = Storyboarder::new(Arc::new(images.clone()), StoryboardSettings::default());

        let frames: Vec<StoryboardFrame> = storyboarder
            .frames(&session_with_screenplay(), StyleHints::default())
            .unwrap()
            .collect()
            .await;

        assert_eq!(frames.len(), 3);
        assert!(frames[1].prompt.contains("INT. OFFICE - DAY"));
        assert!(frames[1].prompt.starts_with("Cinematic storyboard frame, Noir film, cinematic tone."));
        assert_eq!(
            frames[2].image_url.as_deref(),
            Some("https://mock-images.example.com/storyboard/3.png")
        );

        let recorded = images.recorded_requests();
        assert_eq!(recorded.len(), 3);
        assert_eq!(recorded[0].width, 1024);
        assert_eq!(recorded[0].height, 576);
    }

    #[tokio::test]
    async fn test_failed_frame_carries_error_and_sequence_continues() {
        let images = MockImageService::new();
        images.behavior().fail_request(0);
        let storyboarder = Storyboarder::new(Arc::new(images), StoryboardSettings::default());

        let frames: Vec<StoryboardFrame> = storyboarder
            .frames(&session_with_screenplay(), StyleHints::default())
            .unwrap()
            .collect()
            .await;

        assert_eq!(frames.len(), 3);
        assert!(frames[0].image_url.is_none());
        assert!(frames[0].error.is_some());
        assert!(frames[1].image_url.is_some());
    }

    #[tokio::test]
    async fn test_stream_is_lazy_and_bounded() {
        let images = MockImageService::new();
        let storyboarder = Storyboarder::new(Arc::new(images.clone()), StoryboardSettings::default());
        let hints = StyleHints {
            tone: Some("Gritty".to_string()),
            max_scenes: Some(2),
            ..StyleHints::default()
        };

        let stream = storyboarder.frames(&session_with_screenplay(), hints).unwrap();
        tokio::pin!(stream);

        assert!(images.recorded_requests().is_empty());
        let first = stream.next().await.unwrap();
        assert!(first.prompt.contains("Gritty tone."));
        assert_eq!(images.recorded_requests().len(), 1);

        assert!(stream.next().await.is_some());
        assert!(stream.next().await.is_none());
    }

    #[test]
    fn test_frames_require_screenplay() {
        let storyboarder = Storyboarder::new(
            Arc::new(MockImageService::new()),
            StoryboardSettings::default(),
        );
        let result = storyboarder.frames(&Session::new(), StyleHints::default());
        assert!(matches!(
            result,
            Err(StudioError::MissingPrerequisite("No screenplay found in session"))
        ));
    }
}
