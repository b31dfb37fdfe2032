//! The closed set of narrator voices offered by the speech service.
//!
//! The identifier sent on the wire is the lower-case name.  Descriptions are
//! shown under the voice picker as guidance only; they do not change how a
//! run behaves.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A narrator voice preset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Voice {
    Alloy,
    Echo,
    Fable,
    Onyx,
    Nova,
    Shimmer,
    Ash,
    Ballad,
    Coral,
    Sage,
    Verse,
}

impl Voice {
    /// Every voice, in the order the form lists them.
    pub const ALL: [Voice; 11] = [
        Voice::Alloy,
        Voice::Echo,
        Voice::Fable,
        Voice::Onyx,
        Voice::Nova,
        Voice::Shimmer,
        Voice::Ash,
        Voice::Ballad,
        Voice::Coral,
        Voice::Sage,
        Voice::Verse,
    ];

    /// Identifier sent to the speech API.
    pub fn id(self) -> &'static str {
        match self {
            Voice::Alloy => "alloy",
            Voice::Echo => "echo",
            Voice::Fable => "fable",
            Voice::Onyx => "onyx",
            Voice::Nova => "nova",
            Voice::Shimmer => "shimmer",
            Voice::Ash => "ash",
            Voice::Ballad => "ballad",
            Voice::Coral => "coral",
            Voice::Sage => "sage",
            Voice::Verse => "verse",
        }
    }

    /// Capitalised name used as the picker label.
    pub fn display_name(self) -> &'static str {
        match self {
            Voice::Alloy => "Alloy",
            Voice::Echo => "Echo",
            Voice::Fable => "Fable",
            Voice::Onyx => "Onyx",
            Voice::Nova => "Nova",
            Voice::Shimmer => "Shimmer",
            Voice::Ash => "Ash",
            Voice::Ballad => "Ballad",
            Voice::Coral => "Coral",
            Voice::Sage => "Sage",
            Voice::Verse => "Verse",
        }
    }

    /// Character of the voice and the kind of content it suits.
    pub fn description(self) -> &'static str {
        match self {
            Voice::Alloy => "落ち着いたトーン、聞き取りやすい（解説、ナレーション）",
            Voice::Echo => "明るくフレンドリー、親しみやすい（案内、カジュアルトーク）",
            Voice::Fable => "優しく温かみあり、やや高め（物語、子供向け）",
            Voice::Onyx => "低音で力強く落ち着いた印象（プレゼン、ビジネス）",
            Voice::Nova => "明瞭でエネルギッシュ（ニュース、情報提供）",
            Voice::Shimmer => "軽快で明るいポップな声（エンタメ、CM）",
            Voice::Ash => "クールで落ち着いた声（ドキュメンタリー）",
            Voice::Ballad => "感情豊かで表現力あり（感動ストーリー）",
            Voice::Coral => "柔らかく優しいトーン（リラクゼーション）",
            Voice::Sage => "知的で信頼感あり（教育、講義）",
            Voice::Verse => "詩的で静かな表現（詩の朗読、文学）",
        }
    }
}

impl Default for Voice {
    fn default() -> Self {
        Self::Nova
    }
}

impl fmt::Display for Voice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Returned when a string names no known voice.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown voice: {0}")]
pub struct UnknownVoice(pub String);

impl FromStr for Voice {
    type Err = UnknownVoice;

    /// Case-insensitive; surrounding whitespace is ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Voice::ALL
            .into_iter()
            .find(|v| v.id() == wanted)
            .ok_or_else(|| UnknownVoice(s.to_string()))
    }
}
