use serde::Serialize;

/// Lifecycle state of the player.
///
/// Every flag the UI needs about playback is derived from it rather than stored
/// separately.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase", tag = "state")]
pub enum PlayerState {
    /// No content loaded yet.
    Idle,
    /// A source was given, its metadata is not yet known.
    Loading,
    /// Metadata is known, playback never started.
    Ready,
    Playing {
        /// `jsNow()` timestamp at which playback stalled, if it currently is.
        #[serde(skip)]
        stalled_since: Option<f64>,
    },
    Paused,
    Ended,
    Error {
        fatal: bool,
    },
    /// The player was unmounted. Nothing happens anymore.
    Destroyed,
}

/// Something that happened to the player, which may change its `PlayerState`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum Transition {
    LoadStarted,
    MetadataLoaded,
    /// The media element actually started rendering frames.
    Playing,
    Paused,
    /// Playback cannot continue for now, awaiting data.
    Stalled { at: f64 },
    /// A seek completed.
    Seeked,
    Ended,
    RecoverableError,
    Recovered,
    FatalError,
    Destroyed,
}

impl PlayerState {
    /// Returns the state reached by applying `transition`, or `None` if that transition
    /// makes no sense from the current state and should be ignored.
    pub(crate) fn next(self, transition: Transition) -> Option<PlayerState> {
        use PlayerState::*;
        let next = match (self, transition) {
            (Destroyed, _) => return None,
            (_, Transition::Destroyed) => Destroyed,
            (_, Transition::LoadStarted) => Loading,
            (_, Transition::FatalError) => Error { fatal: true },
            (Error { fatal: true }, _) => return None,

            (Loading, Transition::MetadataLoaded) => Ready,
            (Ready | Paused | Ended | Error { .. }, Transition::Playing) => Playing {
                stalled_since: None,
            },
            (Playing { .. }, Transition::Playing) => Playing {
                stalled_since: None,
            },
            (Playing { stalled_since: None }, Transition::Stalled { at }) => Playing {
                stalled_since: Some(at),
            },
            (Playing { .. } | Ready, Transition::Paused) => Paused,
            (Ended, Transition::Seeked) => Paused,
            (Ready | Playing { .. } | Paused, Transition::Ended) => Ended,
            (Ready | Playing { .. } | Paused, Transition::RecoverableError) => Error { fatal: false },
            (Error { fatal: false }, Transition::Recovered) => Ready,
            _ => return None,
        };
        Some(next)
    }

    pub fn is_playing(&self) -> bool {
        matches!(self, PlayerState::Playing { .. })
    }

    /// `true` when a loading indicator should be displayed.
    pub fn is_loading(&self) -> bool {
        matches!(
            self,
            PlayerState::Loading
                | PlayerState::Playing {
                    stalled_since: Some(_)
                }
        )
    }

    /// `true` if the media element is in a paused state.
    pub fn is_paused(&self) -> bool {
        !self.is_playing()
    }

    pub fn has_ended(&self) -> bool {
        matches!(self, PlayerState::Ended)
    }

    /// `true` if content is loaded and playback commands can be sent.
    pub fn accepts_commands(&self) -> bool {
        matches!(
            self,
            PlayerState::Ready
                | PlayerState::Playing { .. }
                | PlayerState::Paused
                | PlayerState::Ended
                | PlayerState::Error { fatal: false }
        )
    }

    pub fn stalled_since(&self) -> Option<f64> {
        match self {
            PlayerState::Playing { stalled_since } => *stalled_since,
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(transitions: &[Transition]) -> PlayerState {
        transitions
            .iter()
            .fold(PlayerState::Idle, |state, t| state.next(*t).unwrap_or(state))
    }

    #[test]
    fn test_nominal_lifecycle() {
        let state = run(&[Transition::LoadStarted, Transition::MetadataLoaded]);
        assert_eq!(state, PlayerState::Ready);
        assert!(state.is_paused());

        let state = run(&[
            Transition::LoadStarted,
            Transition::MetadataLoaded,
            Transition::Playing,
            Transition::Paused,
            Transition::Playing,
            Transition::Ended,
        ]);
        assert_eq!(state, PlayerState::Ended);
        assert_eq!(state.next(Transition::Seeked), Some(PlayerState::Paused));
    }

    #[test]
    fn test_stalls_are_derived_from_playing() {
        let playing = run(&[
            Transition::LoadStarted,
            Transition::MetadataLoaded,
            Transition::Playing,
        ]);
        assert!(!playing.is_loading());
        let stalled = playing.next(Transition::Stalled { at: 1000. }).unwrap();
        assert!(stalled.is_loading());
        assert!(stalled.is_playing());
        // A second stall keeps the first timestamp
        assert_eq!(stalled.next(Transition::Stalled { at: 2000. }), None);
        assert_eq!(stalled.stalled_since(), Some(1000.));
        let resumed = stalled.next(Transition::Playing).unwrap();
        assert!(!resumed.is_loading());
        assert_eq!(PlayerState::Paused.next(Transition::Stalled { at: 0. }), None);
    }

    #[test]
    fn test_errors() {
        let recovering = run(&[
            Transition::LoadStarted,
            Transition::MetadataLoaded,
            Transition::Playing,
            Transition::RecoverableError,
        ]);
        assert_eq!(recovering, PlayerState::Error { fatal: false });
        assert_eq!(recovering.next(Transition::Recovered), Some(PlayerState::Ready));
        assert!(recovering.next(Transition::Playing).unwrap().is_playing());

        let fatal = recovering.next(Transition::FatalError).unwrap();
        assert_eq!(fatal.next(Transition::Playing), None);
        assert!(!fatal.accepts_commands());
        assert_eq!(fatal.next(Transition::LoadStarted), Some(PlayerState::Loading));
        assert_eq!(
            fatal.next(Transition::Destroyed),
            Some(PlayerState::Destroyed)
        );
    }

    #[test]
    fn test_destroyed_is_terminal() {
        for t in [
            Transition::LoadStarted,
            Transition::Playing,
            Transition::FatalError,
            Transition::Destroyed,
        ] {
            assert_eq!(PlayerState::Destroyed.next(t), None);
        }
    }
}
