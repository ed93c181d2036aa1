//! Prompt composition and fallback texts
//!
//! Every artifact is generated from a fixed role instruction plus one piece of
//! session context. Fallback texts stand in when the backend fails.

use cinema_llm::CompletionRequest;

use super::entities::{DerivedKind, ScreenplayParams};

/// Ephemeral role instruction plus context for one backend call
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub role: String,
    pub context: String,
}

impl From<GenerationRequest> for CompletionRequest {
    fn from(request: GenerationRequest) -> Self {
        CompletionRequest::new(request.role, request.context)
    }
}

const CHARACTERS_ROLE: &str = "You are an expert character psychologist. Create deep psychological character profiles. Include Age, Background, Motivation, Internal conflict, Fear, Moral flaw.";

const DIRECTOR_MODE_ROLE: &str = "You are a world-class Film Director and Cinematographer. Analyze the screenplay and create a director's shot breakdown. For each scene provide: Camera angle, Shot type, Lighting style, Color grading, Emotional tone.";

const PITCH_DECK_ROLE: &str = "You are a Hollywood Producer. Create a professional movie pitch document. Include: Logline, Tagline, Genre, Target audience, Comparable films, Why this film will succeed.";

const SOUND_DESIGN_ROLE: &str = "You are a professional Sound Designer. Create a sound design plan for the screenplay. Include: Background music genre, Ambient layer details, Foley effects, Dialogue treatment.";

/// Compose the screenplay request from the caller's inputs
pub fn screenplay_request(params: &ScreenplayParams) -> GenerationRequest {
    let mut role = format!(
        "You are a professional Hollywood screenwriter. Write a screenplay in {} cinematic style. Use proper screenplay format: Scene headings in ALL CAPS, Character names centered, Emotional depth, Strong pacing. Visual storytelling.",
        params.genre.to_uppercase()
    );

    if let Some(tone) = present(&params.tone) {
        role.push_str(&format!("\nTone: {}", tone));
    }
    if let Some(language) = present(&params.language) {
        role.push_str(&format!("\nLanguage: {}", language));
    }
    if let Some(scenes) = params.scene_count {
        role.push_str(&format!("\nNumber of scenes: {}", scenes));
    }

    GenerationRequest {
        role,
        context: format!("Story idea: {}", params.story),
    }
}

/// Compose the request for a derived artifact from its prerequisite text
pub fn derived_request(kind: DerivedKind, prerequisite: &str) -> GenerationRequest {
    let (role, context) = match kind {
        DerivedKind::Characters => (
            CHARACTERS_ROLE,
            format!("Based on this story idea: {}", prerequisite),
        ),
        DerivedKind::DirectorMode => (DIRECTOR_MODE_ROLE, format!("Screenplay: {}", prerequisite)),
        DerivedKind::PitchDeck => (PITCH_DECK_ROLE, format!("Story idea: {}", prerequisite)),
        DerivedKind::SoundDesign => (SOUND_DESIGN_ROLE, format!("Screenplay: {}", prerequisite)),
    };

    GenerationRequest {
        role: role.to_string(),
        context,
    }
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

pub fn screenplay_fallback(params: &ScreenplayParams) -> String {
    format!(
        r#"INT. OFFICE - DAY

A dimly lit room. DETECTIVE MILLER sits behind a desk, nursing a glass of whiskey. Rain hammers against the window.

MILLER
(V.O.)
They say time heals all wounds. But in this city, time just festers.

He looks at the photo of a missing girl on his desk.

MILLER
I'm coming for you, kid.

This is a MOCK screenplay for the story: "{}" in the genre "{}".
Please ensure the text generation backend is running for real AI generation."#,
        params.story, params.genre
    )
}

pub fn derived_fallback(kind: DerivedKind) -> &'static str {
    match kind {
        DerivedKind::Characters => {
            "**Detective Miller**\nAge: 45\nMotivation: Redemption for a past failure.\nFlaw: Alcoholism and cynicism.\n\n**The antagonist**\nAge: Unknown\nMotivation: Chaos.\n"
        }
        DerivedKind::DirectorMode => {
            "**Scene 1**\nCamera: Low angle, tracking shot via the window.\nLighting: Low-key, noir style with heavy shadows.\nColor: Desaturated blue cold tones.\n"
        }
        DerivedKind::PitchDeck => {
            "**Title:** The Last Case\n**Logline:** A burnt-out detective must face his demons to save a missing girl.\n**Target Audience:** 18-35, fans of Neo-Noir.\n**Comparable Films:** Se7en, Blade Runner.\n"
        }
        DerivedKind::SoundDesign => {
            "**Scene 1**\nMusic: Slow, melancholic jazz saxophone.\nSFX: Heavy rain, distant sirens, glass clinking.\n"
        }
    }
}
