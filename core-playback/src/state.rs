//! Playback state machine.
//!
//! ```text
//! Idle/Ended --start--> Playing --pause(true)--> Paused --pause(false)--> Playing
//! any --stop--> Ended
//! Playing/Paused --seek--> Seeking --(engine done)--> previous state
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaybackState {
    #[default]
    Idle,
    Playing,
    Paused,
    Ended,
    /// Transient while the engine completes a seek.
    Seeking,
}

/// Control commands that move the state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackCommand {
    Start,
    Pause,
    Resume,
    Stop,
    Seek,
}

impl PlaybackCommand {
    pub fn name(self) -> &'static str {
        match self {
            PlaybackCommand::Start => "start",
            PlaybackCommand::Pause => "pause",
            PlaybackCommand::Resume => "resume",
            PlaybackCommand::Stop => "stop",
            PlaybackCommand::Seek => "seek",
        }
    }
}

impl PlaybackState {
    /// A session is open against the engine.
    pub fn is_active(self) -> bool {
        matches!(
            self,
            PlaybackState::Playing | PlaybackState::Paused | PlaybackState::Seeking
        )
    }

    /// The cached duration may be used.
    pub fn duration_trusted(self) -> bool {
        self.is_active()
    }

    /// State after `command`, or `None` if the command is not legal here.
    ///
    /// `Start` from Playing/Paused maps to the same state: re-entry is a
    /// no-op, not an error. `Seek` yields `Seeking`; the caller restores the
    /// previous state when the engine returns.
    pub fn apply(self, command: PlaybackCommand) -> Option<PlaybackState> {
        use PlaybackState::*;
        match (self, command) {
            (_, PlaybackCommand::Stop) => Some(Ended),
            (Idle | Ended, PlaybackCommand::Start) => Some(Playing),
            (Playing | Paused, PlaybackCommand::Start) => Some(self),
            (Playing | Paused, PlaybackCommand::Pause) => Some(Paused),
            (Playing | Paused, PlaybackCommand::Resume) => Some(Playing),
            (Playing | Paused, PlaybackCommand::Seek) => Some(Seeking),
            _ => None,
        }
    }
}

impl fmt::Display for PlaybackState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            PlaybackState::Idle => "idle",
            PlaybackState::Playing => "playing",
            PlaybackState::Paused => "paused",
            PlaybackState::Ended => "ended",
            PlaybackState::Seeking => "seeking",
        };
        f.write_str(label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use PlaybackCommand::*;
    use PlaybackState::*;

    const ALL: [PlaybackState; 5] = [Idle, Playing, Paused, Ended, Seeking];

    #[test]
    fn test_stop_is_legal_everywhere() {
        for state in ALL {
            assert_eq!(state.apply(Stop), Some(Ended));
        }
    }

    #[test]
    fn test_start_targets() {
        assert_eq!(Idle.apply(Start), Some(Playing));
        assert_eq!(Ended.apply(Start), Some(Playing));
        assert_eq!(Playing.apply(Start), Some(Playing));
        assert_eq!(Paused.apply(Start), Some(Paused));
        assert_eq!(Seeking.apply(Start), None);
    }

    #[test]
    fn test_no_pause_from_idle() {
        assert_eq!(Idle.apply(Pause), None);
        assert_eq!(Ended.apply(Resume), None);
        assert_eq!(Playing.apply(Pause), Some(Paused));
        assert_eq!(Paused.apply(Resume), Some(Playing));
    }

    #[test]
    fn test_seek_only_with_session() {
        assert_eq!(Playing.apply(Seek), Some(Seeking));
        assert_eq!(Paused.apply(Seek), Some(Seeking));
        assert_eq!(Idle.apply(Seek), None);
        assert_eq!(Ended.apply(Seek), None);
        assert_eq!(Seeking.apply(Seek), None);
    }

    #[test]
    fn test_duration_trust() {
        assert!(Playing.duration_trusted());
        assert!(Seeking.duration_trusted());
        assert!(!Ended.duration_trusted());
        assert!(!Idle.duration_trusted());
    }
}
