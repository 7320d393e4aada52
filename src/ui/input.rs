/// Keyboard input tracker.
///
/// Tracks which keys are currently held down and maps them onto intents,
/// so the scenes only ever see `Intent`s:
///   - Continuous movement while a key is held
///   - Edge-triggered menu moves and confirm (via `FrameInput`)
///
/// Uses crossterm's keyboard enhancement for Release events when available.
/// Falls back to timeout-based release detection on terminals that don't support it.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use crossterm::event::{
    self, poll, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, KeyboardEnhancementFlags,
    PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
};
use crossterm::{execute, terminal};

use crate::domain::input::Intent;

/// After this duration without a Press/Repeat event, consider the key released.
/// Only used when the terminal doesn't report Release events.
const HOLD_TIMEOUT: Duration = Duration::from_millis(160);

/// Intents a key stands for.
pub fn key_intents(code: KeyCode) -> &'static [Intent] {
    match code {
        KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('A') => &[Intent::Left],
        KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('D') => &[Intent::Right],
        KeyCode::Up | KeyCode::Char('w') | KeyCode::Char('W') => &[Intent::Up, Intent::MenuPrev],
        KeyCode::Down | KeyCode::Char('s') | KeyCode::Char('S') => &[Intent::Down, Intent::MenuNext],
        KeyCode::Tab => &[Intent::MenuNext],
        KeyCode::BackTab => &[Intent::MenuPrev],
        KeyCode::Enter => &[Intent::Confirm],
        KeyCode::Char(' ') => &[Intent::Jump],
        KeyCode::Esc => &[Intent::Cancel],
        KeyCode::Char('p') | KeyCode::Char('P') | KeyCode::Char('q') | KeyCode::Char('Q') => &[Intent::Pause],
        KeyCode::Char('f') | KeyCode::Char('F') => &[Intent::Skip],
        _ => &[],
    }
}

pub struct InputState {
    /// Timestamp of last Press/Repeat event for each key.
    last_active: HashMap<KeyCode, Instant>,

    /// Raw key events collected during drain, for meta-key handling.
    raw_events: Vec<KeyEvent>,

    /// Whether to honor Release events. Only true when keyboard
    /// enhancement is confirmed working.
    pub honor_release: bool,
}

impl InputState {
    pub fn new() -> Self {
        InputState {
            last_active: HashMap::with_capacity(16),
            raw_events: Vec::with_capacity(8),
            honor_release: false,
        }
    }

    /// Ask the terminal for Release events. Stays on timeout-based
    /// release detection if the terminal can't report them.
    pub fn enable_release_events(&mut self) -> std::io::Result<()> {
        if terminal::supports_keyboard_enhancement().unwrap_or(false) {
            execute!(
                std::io::stdout(),
                PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
            )?;
            self.honor_release = true;
        }
        Ok(())
    }

    pub fn disable_release_events(&mut self) -> std::io::Result<()> {
        if self.honor_release {
            execute!(std::io::stdout(), PopKeyboardEnhancementFlags)?;
            self.honor_release = false;
        }
        Ok(())
    }

    /// Drain all pending terminal events and update key states.
    /// Call this once per tick, before the scene update.
    pub fn drain_events(&mut self) {
        self.raw_events.clear();

        while poll(Duration::ZERO).unwrap_or(false) {
            if let Ok(Event::Key(key)) = event::read() {
                self.raw_events.push(key);
                match key.kind {
                    KeyEventKind::Release if self.honor_release => {
                        self.last_active.remove(&key.code);
                    }
                    KeyEventKind::Release => {
                        // Timeout-based expiry handles it.
                    }
                    _ => {
                        self.last_active.insert(key.code, Instant::now());
                    }
                }
            }
        }

        let now = Instant::now();
        self.last_active.retain(|_, t| now.duration_since(*t) < HOLD_TIMEOUT);
    }

    /// Every intent whose key is held right now.
    pub fn intents_down(&self, out: &mut Vec<Intent>) {
        for code in self.last_active.keys() {
            for &intent in key_intents(*code) {
                if !out.contains(&intent) {
                    out.push(intent);
                }
            }
        }
    }

    /// Check if any raw event this tick has Ctrl+C
    pub fn ctrl_c_pressed(&self) -> bool {
        self.raw_events.iter().any(|k| {
            k.modifiers.contains(KeyModifiers::CONTROL)
                && (k.code == KeyCode::Char('c') || k.code == KeyCode::Char('C'))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vertical_keys_also_drive_menus() {
        assert_eq!(key_intents(KeyCode::Up), &[Intent::Up, Intent::MenuPrev]);
        assert_eq!(key_intents(KeyCode::Char('s')), &[Intent::Down, Intent::MenuNext]);
        assert_eq!(key_intents(KeyCode::Char(' ')), &[Intent::Jump]);
        assert!(key_intents(KeyCode::F(5)).is_empty());
    }

    #[test]
    fn held_keys_become_intents_once() {
        let mut input = InputState::new();
        input.last_active.insert(KeyCode::Left, Instant::now());
        input.last_active.insert(KeyCode::Char('a'), Instant::now());
        input.last_active.insert(KeyCode::Enter, Instant::now());
        let mut down = Vec::new();
        input.intents_down(&mut down);
        assert_eq!(down.iter().filter(|&&i| i == Intent::Left).count(), 1);
        assert!(down.contains(&Intent::Confirm));
        assert!(!input.ctrl_c_pressed());
    }
}
