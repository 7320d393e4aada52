/// Abstract input intents and their per-tick snapshot.
///
/// Devices report which intents are down; `FrameInput::advance` folds that
/// into held durations once per tick, so every scene sees one consistent
/// snapshot for the whole update.

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Intent {
    Left,
    Right,
    Up,
    Down,
    Confirm,
    Jump,
    Cancel,
    Pause,
    MenuNext,
    MenuPrev,
    Skip,
}

impl Intent {
    pub const COUNT: usize = 11;

    pub const ALL: [Intent; Intent::COUNT] = [
        Intent::Left,
        Intent::Right,
        Intent::Up,
        Intent::Down,
        Intent::Confirm,
        Intent::Jump,
        Intent::Cancel,
        Intent::Pause,
        Intent::MenuNext,
        Intent::MenuPrev,
        Intent::Skip,
    ];

    fn slot(self) -> usize {
        self as usize
    }
}

#[derive(Clone, Debug, Default)]
pub struct FrameInput {
    held: [u32; Intent::COUNT],
    released: [bool; Intent::COUNT],
}

impl FrameInput {
    /// Step one tick. Intents in `down` extend their hold; the rest reset,
    /// flagging a release if they were held last tick.
    pub fn advance(&mut self, down: &[Intent]) {
        for intent in Intent::ALL {
            let i = intent.slot();
            if down.contains(&intent) {
                self.held[i] = self.held[i].saturating_add(1);
                self.released[i] = false;
            } else {
                self.released[i] = self.held[i] > 0;
                self.held[i] = 0;
            }
        }
    }

    pub fn pressed(&self, intent: Intent) -> bool {
        self.held[intent.slot()] > 0
    }

    /// Rising edge: first tick of a hold.
    pub fn just_pressed(&self, intent: Intent) -> bool {
        self.held[intent.slot()] == 1
    }

    pub fn just_released(&self, intent: Intent) -> bool {
        self.released[intent.slot()]
    }

    pub fn held_duration(&self, intent: Intent) -> u32 {
        self.held[intent.slot()]
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Snapshot with `down` held for exactly one tick.
    pub(crate) fn fresh(down: &[Intent]) -> FrameInput {
        let mut input = FrameInput::default();
        input.advance(down);
        input
    }

    #[test]
    fn hold_counts_up_and_edges_fire_once() {
        let mut input = FrameInput::default();
        input.advance(&[Intent::Jump]);
        assert!(input.just_pressed(Intent::Jump));
        assert_eq!(input.held_duration(Intent::Jump), 1);

        input.advance(&[Intent::Jump]);
        assert!(input.pressed(Intent::Jump));
        assert!(!input.just_pressed(Intent::Jump));
        assert_eq!(input.held_duration(Intent::Jump), 2);

        input.advance(&[]);
        assert!(!input.pressed(Intent::Jump));
        assert!(input.just_released(Intent::Jump));

        input.advance(&[]);
        assert!(!input.just_released(Intent::Jump));
    }

    #[test]
    fn intents_are_independent() {
        let input = fresh(&[Intent::Left, Intent::Confirm]);
        assert!(input.pressed(Intent::Left));
        assert!(input.just_pressed(Intent::Confirm));
        assert!(!input.pressed(Intent::Right));
    }

    #[test]
    fn all_lists_every_slot_once() {
        for (i, intent) in Intent::ALL.iter().enumerate() {
            assert_eq!(intent.slot(), i);
        }
    }
}
