use crate::types::ThemeMode;

pub struct ThemeDefinition {
    pub css: &'static str,
}

pub fn theme_definition(mode: ThemeMode) -> ThemeDefinition {
    match mode {
        ThemeMode::Dark => ThemeDefinition { css: DARK_THEME },
        ThemeMode::Light => ThemeDefinition { css: LIGHT_THEME },
    }
}

const DARK_THEME: &str = r#"
:root {
    --color-bg-primary: #101418;
    --color-bg-sidebar: #161c22;
    --color-bg-overlay: rgba(0, 0, 0, 0.7);
    --color-text-primary: #e8edf2;
    --color-text-muted: #8b97a3;
    --color-border: #2a333d;
    --color-surface-muted: #1d252e;
    --color-input-border: #313c47;
    --color-input-bg: #101418;
    --color-chat-user-bg: #3178c6;
    --color-chat-user-text: #ffffff;
    --color-chat-bot-bg: #1d252e;
    --color-chat-bot-text: #e8edf2;
    --color-chat-system-bg: #3b2326;
    --color-chat-system-text: #f2b8bd;
    --color-row-active: #24384d;
    --color-danger: #c64531;
    --color-timestamp: #6d7883;
}
body { background: var(--color-bg-primary); color: var(--color-text-primary); }
.sidebar { background: var(--color-bg-sidebar); border-right-color: var(--color-border); }
.composer textarea { background: var(--color-input-bg); color: var(--color-text-primary); border-color: var(--color-input-border); }
.composer textarea:focus { border-color: var(--color-text-muted); }
"#;

const LIGHT_THEME: &str = r#"
:root {
    --color-bg-primary: #ffffff;
    --color-bg-sidebar: #f3f7fa;
    --color-bg-overlay: rgba(255, 255, 255, 0.8);
    --color-text-primary: #1c242c;
    --color-text-muted: #5e6b77;
    --color-border: #b3e5fc;
    --color-surface-muted: #e9eff4;
    --color-input-border: #c4ced6;
    --color-input-bg: #ffffff;
    --color-chat-user-bg: #1d72d2;
    --color-chat-user-text: #ffffff;
    --color-chat-bot-bg: #eef2f6;
    --color-chat-bot-text: #1c242c;
    --color-chat-system-bg: #fbe9e7;
    --color-chat-system-text: #9c2b1b;
    --color-row-active: #d3e8f8;
    --color-danger: #c64531;
    --color-timestamp: #7b8791;
}
body { background: var(--color-bg-primary); color: var(--color-text-primary); }
.sidebar { background: var(--color-bg-sidebar); border-right-color: var(--color-border); }
.composer textarea { background: var(--color-input-bg); color: var(--color-text-primary); border-color: var(--color-input-border); }
.composer textarea:focus { border-color: var(--color-text-muted); }
"#;
