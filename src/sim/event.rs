/// Events emitted during a play step.
/// The scene consumes these for score, transitions and logging.

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GameEvent {
    Jumped,
    Landed,
    TreasureCollected { name: &'static str, value: u32, cell: usize },
    KeyItemAcquired,
    CreatureSpotted { index: usize },
    PlayerKilled { by: &'static str },
    LevelCleared,
}
