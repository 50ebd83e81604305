#![warn(clippy::all, clippy::pedantic)]

use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use log::trace;

use crate::components::{HeldKeys, Input, KeyEdges};

pub const DEFAULT_HOLD_WINDOW: Duration = Duration::from_millis(150);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Left,
    Right,
    Down,
    Up,
    Pause,
    Restart,
    Quit,
}

impl Key {
    #[must_use]
    pub fn from_event(event: &KeyEvent) -> Option<Self> {
        if event.modifiers.contains(KeyModifiers::CONTROL) && event.code == KeyCode::Char('c') {
            return Some(Key::Quit);
        }
        match event.code {
            KeyCode::Left | KeyCode::Char('a') => Some(Key::Left),
            KeyCode::Right | KeyCode::Char('d') => Some(Key::Right),
            KeyCode::Down | KeyCode::Char('s') => Some(Key::Down),
            KeyCode::Up | KeyCode::Char('w' | ' ') => Some(Key::Up),
            KeyCode::Char('p') => Some(Key::Pause),
            KeyCode::Enter => Some(Key::Restart),
            KeyCode::Char('q') | KeyCode::Esc => Some(Key::Quit),
            _ => None,
        }
    }

    fn held_slot(self) -> Option<usize> {
        match self {
            Key::Left => Some(0),
            Key::Right => Some(1),
            Key::Down => Some(2),
            Key::Up => Some(3),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct KeyTracker {
    hold_window: Duration,
    last_seen: [Option<Instant>; 4],
    reports_release: bool,
    pressed: KeyEdges,
    quit: bool,
}

impl KeyTracker {
    #[must_use]
    pub fn new(hold_window: Duration) -> Self {
        Self {
            hold_window,
            last_seen: [None; 4],
            reports_release: false,
            pressed: KeyEdges::default(),
            quit: false,
        }
    }

    #[must_use]
    pub fn quit_requested(&self) -> bool {
        self.quit
    }

    pub fn handle(&mut self, event: &KeyEvent, now: Instant) {
        let Some(key) = Key::from_event(event) else {
            return;
        };
        trace!("Key {key:?} {:?}", event.kind);

        match event.kind {
            KeyEventKind::Press => {
                self.mark_pressed(key);
                if let Some(slot) = key.held_slot() {
                    self.last_seen[slot] = Some(now);
                }
            }
            KeyEventKind::Repeat => {
                if let Some(slot) = key.held_slot() {
                    self.last_seen[slot] = Some(now);
                }
            }
            KeyEventKind::Release => {
                self.reports_release = true;
                if let Some(slot) = key.held_slot() {
                    self.last_seen[slot] = None;
                }
            }
        }
    }

    fn mark_pressed(&mut self, key: Key) {
        match key {
            Key::Left => self.pressed.left = true,
            Key::Right => self.pressed.right = true,
            Key::Up => self.pressed.rotate = true,
            Key::Pause => self.pressed.pause = true,
            Key::Restart => self.pressed.restart = true,
            Key::Quit => self.quit = true,
            Key::Down => {}
        }
    }

    fn is_held(&self, slot: usize, now: Instant) -> bool {
        match self.last_seen[slot] {
            Some(_) if self.reports_release => true,
            Some(seen) => now.saturating_duration_since(seen) <= self.hold_window,
            None => false,
        }
    }

    // Input for the next logic frame. Edges are handed out once.
    pub fn frame_input(&mut self, now: Instant) -> Input {
        let input = Input {
            pressed: self.pressed,
            held: HeldKeys {
                left: self.is_held(0, now),
                right: self.is_held(1, now),
                down: self.is_held(2, now),
                up: self.is_held(3, now),
            },
        };
        self.pressed = KeyEdges::default();
        input
    }
}

impl Default for KeyTracker {
    fn default() -> Self {
        Self::new(DEFAULT_HOLD_WINDOW)
    }
}
