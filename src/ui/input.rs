//! Keyboard state for the demo host.
//!
//! Tracks held keys for continuous actions (fire), collects fresh presses
//! for one-shot host actions, and keeps every typed character so it can be
//! forwarded to the status bar as a `HudEvent::KeyDown`. Terminals without
//! release reporting fall back to a hold timeout.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use crossterm::event::{self, poll, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::sim::event::HudEvent;

/// Without a Press/Repeat for this long, a key counts as released.
const HOLD_TIMEOUT: Duration = Duration::from_millis(160);

/// One-shot requests to the host simulation.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum HostAction {
    MonsterHit,
    SelfDamage,
    WeaponPickup,
    RadSuit,
    Berserk,
    ToggleFullscreen,
    CycleWeapon,
    Respawn,
    ToggleAutomap,
    Quit,
}

/// Host binding for a key, if any. Letters and digits stay free for cheats.
pub fn action_for(code: KeyCode) -> Option<HostAction> {
    match code {
        KeyCode::F(1) => Some(HostAction::MonsterHit),
        KeyCode::F(2) => Some(HostAction::SelfDamage),
        KeyCode::F(3) => Some(HostAction::WeaponPickup),
        KeyCode::F(4) => Some(HostAction::RadSuit),
        KeyCode::F(5) => Some(HostAction::Berserk),
        KeyCode::F(6) => Some(HostAction::ToggleFullscreen),
        KeyCode::F(7) => Some(HostAction::CycleWeapon),
        KeyCode::F(8) => Some(HostAction::Respawn),
        KeyCode::Tab => Some(HostAction::ToggleAutomap),
        KeyCode::Esc => Some(HostAction::Quit),
        _ => None,
    }
}

pub struct InputState {
    /// Last Press/Repeat per key.
    last_active: HashMap<KeyCode, Instant>,
    /// Keys that went from released to held during the last drain.
    fresh_presses: Vec<KeyCode>,
    /// Printable characters typed during the last drain, in order.
    typed: Vec<char>,
    ctrl_c: bool,
    /// Trust Release events; only set when keyboard enhancement is active.
    pub honor_release: bool,
}

impl InputState {
    pub fn new() -> Self {
        InputState {
            last_active: HashMap::with_capacity(16),
            fresh_presses: Vec::with_capacity(8),
            typed: Vec::with_capacity(8),
            ctrl_c: false,
            honor_release: false,
        }
    }

    /// Drain pending terminal events. Call once per frame before ticking.
    pub fn drain_events(&mut self) {
        self.begin_frame();
        while poll(Duration::ZERO).unwrap_or(false) {
            if let Ok(Event::Key(key)) = event::read() {
                self.record(key, Instant::now());
            }
        }
        self.expire(Instant::now());
    }

    fn begin_frame(&mut self) {
        self.fresh_presses.clear();
        self.typed.clear();
        self.ctrl_c = false;
    }

    fn record(&mut self, key: KeyEvent, now: Instant) {
        match key.kind {
            KeyEventKind::Release if self.honor_release => {
                self.last_active.remove(&key.code);
            }
            KeyEventKind::Release => {}
            _ => {
                if key.modifiers.contains(KeyModifiers::CONTROL)
                    && matches!(key.code, KeyCode::Char('c') | KeyCode::Char('C'))
                {
                    self.ctrl_c = true;
                    return;
                }
                let was_held = self.held_at(key.code, now);
                self.last_active.insert(key.code, now);
                if !was_held {
                    self.fresh_presses.push(key.code);
                }
                // Repeats are new keystrokes as far as typing goes.
                if let KeyCode::Char(c) = key.code {
                    self.typed.push(c);
                }
            }
        }
    }

    fn expire(&mut self, now: Instant) {
        self.last_active
            .retain(|_, t| now.duration_since(*t) < HOLD_TIMEOUT);
    }

    pub fn is_held(&self, code: KeyCode) -> bool {
        self.held_at(code, Instant::now())
    }

    pub fn was_pressed(&self, code: KeyCode) -> bool {
        self.fresh_presses.contains(&code)
    }

    /// Host actions triggered this frame, in press order.
    pub fn actions(&self) -> Vec<HostAction> {
        let mut actions: Vec<HostAction> =
            self.fresh_presses.iter().filter_map(|&c| action_for(c)).collect();
        if self.ctrl_c {
            actions.push(HostAction::Quit);
        }
        actions
    }

    /// Typed characters as status bar key events.
    pub fn hud_events(&self) -> impl Iterator<Item = HudEvent> + '_ {
        self.typed
            .iter()
            .filter(|c| **c != ' ')
            .map(|&c| HudEvent::KeyDown(c))
    }

    /// Fire is space held down.
    pub fn fire_held(&self) -> bool {
        self.is_held(KeyCode::Char(' '))
    }

    fn held_at(&self, code: KeyCode, now: Instant) -> bool {
        self.last_active
            .get(&code)
            .map(|t| now.duration_since(*t) < HOLD_TIMEOUT)
            .unwrap_or(false)
    }
}

impl Default for InputState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn release(code: KeyCode) -> KeyEvent {
        let mut k = press(code);
        k.kind = KeyEventKind::Release;
        k
    }

    // ── Bindings ──

    #[test]
    fn function_keys_map_to_actions() {
        assert_eq!(action_for(KeyCode::F(1)), Some(HostAction::MonsterHit));
        assert_eq!(action_for(KeyCode::Tab), Some(HostAction::ToggleAutomap));
        assert_eq!(action_for(KeyCode::Esc), Some(HostAction::Quit));
        assert_eq!(action_for(KeyCode::Char('i')), None);
    }

    // ── Tracking ──

    #[test]
    fn typed_letters_become_hud_events() {
        let mut input = InputState::new();
        let now = Instant::now();
        for c in "idd".chars() {
            input.record(press(KeyCode::Char(c)), now);
        }
        input.record(press(KeyCode::Char(' ')), now);
        let events: Vec<_> = input.hud_events().collect();
        assert_eq!(
            events,
            vec![HudEvent::KeyDown('i'), HudEvent::KeyDown('d'), HudEvent::KeyDown('d')]
        );
        // The second `d` was a repeat, not a fresh press.
        assert_eq!(input.fresh_presses.len(), 3);
    }

    #[test]
    fn fresh_presses_trigger_actions_once() {
        let mut input = InputState::new();
        let now = Instant::now();
        input.record(press(KeyCode::F(6)), now);
        input.record(press(KeyCode::F(6)), now);
        assert_eq!(input.actions(), vec![HostAction::ToggleFullscreen]);
        input.begin_frame();
        assert!(input.actions().is_empty());
    }

    #[test]
    fn ctrl_c_quits() {
        let mut input = InputState::new();
        input.record(
            KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL),
            Instant::now(),
        );
        assert_eq!(input.actions(), vec![HostAction::Quit]);
        assert_eq!(input.hud_events().count(), 0);
    }

    #[test]
    fn hold_times_out_without_release() {
        let mut input = InputState::new();
        let then = Instant::now();
        input.record(press(KeyCode::Char(' ')), then);
        assert!(input.held_at(KeyCode::Char(' '), then));
        input.expire(then + HOLD_TIMEOUT);
        assert!(!input.held_at(KeyCode::Char(' '), then + HOLD_TIMEOUT));
    }

    #[test]
    fn release_honoured_only_when_enabled() {
        let mut input = InputState::new();
        let now = Instant::now();
        input.record(press(KeyCode::Char(' ')), now);
        input.record(release(KeyCode::Char(' ')), now);
        assert!(input.held_at(KeyCode::Char(' '), now));

        input.honor_release = true;
        input.record(release(KeyCode::Char(' ')), now);
        assert!(!input.held_at(KeyCode::Char(' '), now));
    }
}
