//! Theme skinning: a pure mapping from a theme key to presentation
//! tokens. Looked up once per render; never consulted by the engine.

use lovewall_shared::{Theme, ThemeTokens};

pub fn tokens(theme: Theme) -> ThemeTokens {
    match theme {
        Theme::Rose => ThemeTokens {
            heart: "💕",
            accent: "\x1b[95m",
            muted: "\x1b[35m",
            banner: "Be My Valentine?",
        },
        Theme::Midnight => ThemeTokens {
            heart: "🌙",
            accent: "\x1b[94m",
            muted: "\x1b[34m",
            banner: "Whispers After Dark",
        },
        Theme::Retro => ThemeTokens {
            heart: "💾",
            accent: "\x1b[93m",
            muted: "\x1b[33m",
            banner: "LOVE.EXE",
        },
        Theme::Noir => ThemeTokens {
            heart: "🖤",
            accent: "\x1b[90m",
            muted: "\x1b[37m",
            banner: "Confessions in Grayscale",
        },
    }
}
