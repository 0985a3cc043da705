use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SoundOption {
    #[default]
    Chime,
    Bell,
    Gentle,
}

/// Tone parameters for synthesizing a sound.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SoundProfile {
    pub frequency_hz: u32,
    pub duration_ms: u32,
    /// Peak gain, 0.0 ..= 1.0.
    pub volume: f32,
}

impl SoundOption {
    pub const ALL: [SoundOption; 3] = [SoundOption::Chime, SoundOption::Bell, SoundOption::Gentle];

    pub fn as_str(&self) -> &'static str {
        match self {
            SoundOption::Chime => "chime",
            SoundOption::Bell => "bell",
            SoundOption::Gentle => "gentle",
        }
    }

    pub fn profile(&self) -> SoundProfile {
        match self {
            SoundOption::Chime => SoundProfile {
                frequency_hz: 800,
                duration_ms: 400,
                volume: 0.3,
            },
            SoundOption::Bell => SoundProfile {
                frequency_hz: 1000,
                duration_ms: 600,
                volume: 0.4,
            },
            SoundOption::Gentle => SoundProfile {
                frequency_hz: 400,
                duration_ms: 500,
                volume: 0.2,
            },
        }
    }
}

impl std::str::FromStr for SoundOption {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|o| o.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown sound: {s} (expected chime, bell or gentle)"))
    }
}

impl std::fmt::Display for SoundOption {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
