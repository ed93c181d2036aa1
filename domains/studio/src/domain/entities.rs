//! Domain entities for the Studio domain
//!
//! A `Session` is the per-user scope holding the story inputs and every
//! generated artifact between requests. Artifacts are opaque text keyed by
//! `ArtifactKind`; kinds order themselves in export order.

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Artifact kind, declared in export order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactKind {
    Screenplay,
    Characters,
    DirectorMode,
    SoundDesign,
    PitchDeck,
}

impl ArtifactKind {
    /// Session key the artifact is stored under
    pub fn key(&self) -> &'static str {
        match self {
            ArtifactKind::Screenplay => "screenplay",
            ArtifactKind::Characters => "characters",
            ArtifactKind::DirectorMode => "director_mode",
            ArtifactKind::SoundDesign => "sound_design",
            ArtifactKind::PitchDeck => "pitch_deck",
        }
    }

    /// Section label used in the export bundle
    pub fn label(&self) -> &'static str {
        match self {
            ArtifactKind::Screenplay => "SCREENPLAY",
            ArtifactKind::Characters => "CHARACTERS",
            ArtifactKind::DirectorMode => "DIRECTOR'S NOTES",
            ArtifactKind::SoundDesign => "SOUND DESIGN",
            ArtifactKind::PitchDeck => "PITCH DECK",
        }
    }
}

impl std::fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.key())
    }
}

/// Artifacts generated from earlier session state rather than request input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DerivedKind {
    Characters,
    DirectorMode,
    PitchDeck,
    SoundDesign,
}

impl DerivedKind {
    pub fn artifact_kind(&self) -> ArtifactKind {
        match self {
            DerivedKind::Characters => ArtifactKind::Characters,
            DerivedKind::DirectorMode => ArtifactKind::DirectorMode,
            DerivedKind::PitchDeck => ArtifactKind::PitchDeck,
            DerivedKind::SoundDesign => ArtifactKind::SoundDesign,
        }
    }

    pub fn prerequisite(&self) -> Prerequisite {
        match self {
            DerivedKind::Characters | DerivedKind::PitchDeck => Prerequisite::Story,
            DerivedKind::DirectorMode | DerivedKind::SoundDesign => Prerequisite::Screenplay,
        }
    }
}

impl std::fmt::Display for DerivedKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.artifact_kind().fmt(f)
    }
}

/// Session value a derived artifact is generated from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Prerequisite {
    Story,
    Screenplay,
}

impl Prerequisite {
    pub fn missing_message(&self) -> &'static str {
        match self {
            Prerequisite::Story => "No story found in session",
            Prerequisite::Screenplay => "No screenplay found in session",
        }
    }
}

/// Inputs of a screenplay generation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScreenplayParams {
    pub story: String,
    pub genre: String,
    pub language: Option<String>,
    pub tone: Option<String>,
    pub scene_count: Option<u8>,
}

impl ScreenplayParams {
    pub fn new(story: impl Into<String>, genre: impl Into<String>) -> Self {
        Self {
            story: story.into(),
            genre: genre.into(),
            language: None,
            tone: None,
            scene_count: None,
        }
    }
}

/// Per-user session state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub id: Uuid,
    pub story: Option<String>,
    pub genre: Option<String>,
    pub language: Option<String>,
    pub tone: Option<String>,
    pub scene_count: Option<u8>,
    artifacts: BTreeMap<ArtifactKind, String>,
    /// Every screenplay generated in this session, oldest first
    pub history: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    /// Create an empty session with a fresh token
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            story: None,
            genre: None,
            language: None,
            tone: None,
            scene_count: None,
            artifacts: BTreeMap::new(),
            history: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn artifact(&self, kind: ArtifactKind) -> Option<&str> {
        self.artifacts.get(&kind).map(String::as_str)
    }

    /// Present artifacts in export order
    pub fn artifacts(&self) -> impl Iterator<Item = (ArtifactKind, &str)> {
        self.artifacts
            .iter()
            .map(|(kind, text)| (*kind, text.as_str()))
    }

    pub fn has_artifacts(&self) -> bool {
        !self.artifacts.is_empty()
    }

    /// Prerequisite text, treating empty values as absent
    pub fn prerequisite(&self, prerequisite: Prerequisite) -> Option<&str> {
        let value = match prerequisite {
            Prerequisite::Story => self.story.as_deref(),
            Prerequisite::Screenplay => self.artifact(ArtifactKind::Screenplay),
        };
        value.filter(|text| !text.trim().is_empty())
    }

    pub fn set_artifact(&mut self, kind: ArtifactKind, text: impl Into<String>) {
        self.artifacts.insert(kind, text.into());
        self.touch();
    }

    /// Store a screenplay together with the inputs it was generated from
    pub fn record_screenplay(&mut self, params: ScreenplayParams, screenplay: impl Into<String>) {
        let screenplay = screenplay.into();
        self.story = Some(params.story);
        self.genre = Some(params.genre);
        self.language = params.language;
        self.tone = params.tone;
        self.scene_count = params.scene_count;
        self.history.push(screenplay.clone());
        self.set_artifact(ArtifactKind::Screenplay, screenplay);
    }

    /// Whether the session has been idle longer than `ttl`
    pub fn is_expired(&self, ttl: Duration, now: DateTime<Utc>) -> bool {
        now - self.updated_at > ttl
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}
