//! Keybinding configuration for the selector and pager.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use serde::{de, Deserialize, Deserializer};

use crate::tui::event::{PagerAction, SelectorAction};

/// Always leave the pager, whatever the config says.
const PAGER_QUIT: &[&str] = &["q", "Esc", "Ctrl+c"];

/// Always leave the selector. `q` is missing because it types into the query.
const SELECTOR_ABORT: &[&str] = &["Esc", "Ctrl+c"];

fn keys(bindings: &[&str]) -> Vec<String> {
    bindings.iter().map(|b| b.to_string()).collect()
}

fn matches_any<S: AsRef<str>>(key: &KeyEvent, bindings: &[S]) -> bool {
    bindings
        .iter()
        .filter_map(|binding| parse_key_string(binding.as_ref()).ok())
        .any(|parsed| parsed.matches(key))
}

/// Key lists must parse in full, so a typo is reported instead of leaving
/// an action unbound.
fn deserialize_keys<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let bindings = Vec::<String>::deserialize(deserializer)?;
    for binding in &bindings {
        parse_key_string(binding)
            .map_err(|e| de::Error::custom(format!("invalid key binding \"{}\": {}", binding, e)))?;
    }
    Ok(bindings)
}

/// Keys understood while paging through an item.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PagerKeys {
    #[serde(deserialize_with = "deserialize_keys")]
    pub quit: Vec<String>,
    #[serde(deserialize_with = "deserialize_keys")]
    pub scroll_up: Vec<String>,
    #[serde(deserialize_with = "deserialize_keys")]
    pub scroll_down: Vec<String>,
    #[serde(deserialize_with = "deserialize_keys")]
    pub page_up: Vec<String>,
    #[serde(deserialize_with = "deserialize_keys")]
    pub page_down: Vec<String>,
    #[serde(deserialize_with = "deserialize_keys")]
    pub top: Vec<String>,
    #[serde(deserialize_with = "deserialize_keys")]
    pub bottom: Vec<String>,
    #[serde(deserialize_with = "deserialize_keys")]
    pub open_in_browser: Vec<String>,
}

impl Default for PagerKeys {
    fn default() -> Self {
        Self {
            quit: keys(&["q", "Esc", "Ctrl+c"]),
            scroll_up: keys(&["k", "Up"]),
            scroll_down: keys(&["j", "Down"]),
            page_up: keys(&["b", "PageUp"]),
            page_down: keys(&["f", "Space", "PageDown"]),
            top: keys(&["g", "Home"]),
            bottom: keys(&["G", "End"]),
            open_in_browser: keys(&["o"]),
        }
    }
}

impl PagerKeys {
    pub fn get_action(&self, key: &KeyEvent) -> PagerAction {
        if matches_any(key, PAGER_QUIT) || matches_any(key, &self.quit) {
            PagerAction::Quit
        } else if matches_any(key, &self.scroll_up) {
            PagerAction::ScrollUp
        } else if matches_any(key, &self.scroll_down) {
            PagerAction::ScrollDown
        } else if matches_any(key, &self.page_up) {
            PagerAction::PageUp
        } else if matches_any(key, &self.page_down) {
            PagerAction::PageDown
        } else if matches_any(key, &self.top) {
            PagerAction::Top
        } else if matches_any(key, &self.bottom) {
            PagerAction::Bottom
        } else if matches_any(key, &self.open_in_browser) {
            PagerAction::OpenInBrowser
        } else {
            PagerAction::None
        }
    }
}

/// Keys understood by the fuzzy selector.
///
/// Plain characters always go to the query, so these should carry a
/// modifier or be a special key.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SelectorKeys {
    #[serde(deserialize_with = "deserialize_keys")]
    pub up: Vec<String>,
    #[serde(deserialize_with = "deserialize_keys")]
    pub down: Vec<String>,
    #[serde(deserialize_with = "deserialize_keys")]
    pub toggle_mark: Vec<String>,
    #[serde(deserialize_with = "deserialize_keys")]
    pub accept: Vec<String>,
    #[serde(deserialize_with = "deserialize_keys")]
    pub abort: Vec<String>,
    #[serde(deserialize_with = "deserialize_keys")]
    pub clear_query: Vec<String>,
}

impl Default for SelectorKeys {
    fn default() -> Self {
        Self {
            up: keys(&["Up", "Ctrl+k", "Ctrl+p"]),
            down: keys(&["Down", "Ctrl+j", "Ctrl+n"]),
            toggle_mark: keys(&["Tab"]),
            accept: keys(&["Enter"]),
            abort: keys(&["Esc", "Ctrl+c", "Ctrl+d"]),
            clear_query: keys(&["Ctrl+u"]),
        }
    }
}

impl SelectorKeys {
    pub fn get_action(&self, key: &KeyEvent) -> SelectorAction {
        if matches_any(key, SELECTOR_ABORT) || matches_any(key, &self.abort) {
            SelectorAction::Abort
        } else if matches_any(key, &self.accept) {
            SelectorAction::Accept
        } else if matches_any(key, &self.up) {
            SelectorAction::Up
        } else if matches_any(key, &self.down) {
            SelectorAction::Down
        } else if matches_any(key, &self.toggle_mark) {
            SelectorAction::ToggleMark
        } else if matches_any(key, &self.clear_query) {
            SelectorAction::ClearQuery
        } else {
            match key.code {
                KeyCode::Backspace => SelectorAction::DeleteChar,
                KeyCode::Char(c)
                    if key.modifiers.difference(KeyModifiers::SHIFT).is_empty() =>
                {
                    SelectorAction::Insert(c)
                }
                _ => SelectorAction::None,
            }
        }
    }
}

/// All keybindings, split by screen.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct KeybindingConfig {
    pub pager: PagerKeys,
    pub selector: SelectorKeys,
}

/// A parsed key binding with code and modifiers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyBinding {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeyBinding {
    /// Check if this binding matches a key event.
    pub fn matches(&self, key: &KeyEvent) -> bool {
        self.code == key.code
            && (self.modifiers == key.modifiers
                || self.modifiers == (key.modifiers & !KeyModifiers::SHIFT))
    }
}

/// Parse a key string such as `"j"`, `"PageDown"`, `"F5"` or `"Ctrl+c"`.
///
/// Modifiers (`Ctrl`, `Shift`, `Alt`) are joined to the key with `+`.
pub fn parse_key_string(s: &str) -> Result<KeyBinding, String> {
    let s = s.trim();
    // A bare "+" is the plus key, not a separator.
    let (prefix, key_part) = match s.rsplit_once('+') {
        Some((prefix, key)) if !key.is_empty() => (Some(prefix), key),
        _ => (None, s),
    };

    let mut modifiers = KeyModifiers::NONE;
    for part in prefix.into_iter().flat_map(|p| p.split('+')) {
        modifiers |= match part.to_lowercase().as_str() {
            "ctrl" | "control" => KeyModifiers::CONTROL,
            "shift" => KeyModifiers::SHIFT,
            "alt" => KeyModifiers::ALT,
            _ => return Err(format!("Unknown modifier: {}", part)),
        };
    }

    Ok(KeyBinding {
        code: parse_key_code(key_part)?,
        modifiers,
    })
}

fn parse_key_code(s: &str) -> Result<KeyCode, String> {
    let mut chars = s.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        return Ok(KeyCode::Char(c));
    }

    let lower = s.to_lowercase();
    if let Some(n) = lower.strip_prefix('f').and_then(|n| n.parse::<u8>().ok()) {
        if (1..=12).contains(&n) {
            return Ok(KeyCode::F(n));
        }
    }

    match lower.as_str() {
        "enter" | "return" => Ok(KeyCode::Enter),
        "tab" => Ok(KeyCode::Tab),
        "backtab" => Ok(KeyCode::BackTab),
        "backspace" | "bs" => Ok(KeyCode::Backspace),
        "delete" | "del" => Ok(KeyCode::Delete),
        "home" => Ok(KeyCode::Home),
        "end" => Ok(KeyCode::End),
        "pageup" | "pgup" => Ok(KeyCode::PageUp),
        "pagedown" | "pgdn" => Ok(KeyCode::PageDown),
        "up" => Ok(KeyCode::Up),
        "down" => Ok(KeyCode::Down),
        "left" => Ok(KeyCode::Left),
        "right" => Ok(KeyCode::Right),
        "esc" | "escape" => Ok(KeyCode::Esc),
        "space" => Ok(KeyCode::Char(' ')),
        _ => Err(format!("Unknown key: {}", s)),
    }
}
