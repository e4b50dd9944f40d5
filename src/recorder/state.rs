//! Recorder state machine.
//!
//! [`transition`] is a pure function: it decides the next state, the one media
//! operation to perform, and the presentation updates to apply. Storing the
//! state and performing the effects is left to the caller.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RecorderState {
    #[default]
    BeforeRecording,
    Recording,
    AfterRecording,
    Playing,
}

impl fmt::Display for RecorderState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BeforeRecording => write!(f, "ready"),
            Self::Recording => write!(f, "recording"),
            Self::AfterRecording => write!(f, "recorded"),
            Self::Playing => write!(f, "playing"),
        }
    }
}

/// Inputs that drive the recorder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecorderEvent {
    /// The single record/stop/play key
    PrimaryPressed,
    ResetPressed,
    /// The player reached the end of the recording
    PlaybackCompleted,
}

/// Work handed to the media backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaEffect {
    StartCapture,
    StopCapture,
    StartPlayback,
    StopPlayback,
}

/// Icon of the primary control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimaryIcon {
    Record,
    Stop,
    Play,
}

/// Presentation updates, applied in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Affordance {
    ResetEnabled(bool),
    PrimaryIcon(PrimaryIcon),
    /// `replaying` redraws the captured waveform instead of polling the recorder
    StartVisualizing { replaying: bool },
    StopVisualizing,
    ClearVisualization,
    StartTimer,
    StopTimer,
    ClearTimer,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub next: RecorderState,
    pub media: Option<MediaEffect>,
    pub affordances: Vec<Affordance>,
}

/// Updates every state emits on entry: reset availability and the primary icon.
pub fn entry_affordances(state: RecorderState) -> [Affordance; 2] {
    let reset_enabled = matches!(
        state,
        RecorderState::AfterRecording | RecorderState::Playing
    );
    let icon = match state {
        RecorderState::BeforeRecording => PrimaryIcon::Record,
        RecorderState::Recording | RecorderState::Playing => PrimaryIcon::Stop,
        RecorderState::AfterRecording => PrimaryIcon::Play,
    };
    [Affordance::ResetEnabled(reset_enabled), Affordance::PrimaryIcon(icon)]
}

/// Looks up the transition for `event` in `state`.
///
/// Returns `None` when the event has no meaning in that state, e.g. reset
/// before anything was recorded.
pub fn transition(state: RecorderState, event: RecorderEvent) -> Option<Transition> {
    use RecorderEvent::*;
    use RecorderState::*;

    let (next, media, mut affordances) = match (state, event) {
        (BeforeRecording, PrimaryPressed) => (
            Recording,
            Some(MediaEffect::StartCapture),
            vec![Affordance::StartVisualizing { replaying: false }, Affordance::StartTimer],
        ),
        (Recording, PrimaryPressed) => (
            AfterRecording,
            Some(MediaEffect::StopCapture),
            vec![Affordance::StopVisualizing, Affordance::StopTimer],
        ),
        (AfterRecording, PrimaryPressed) => (
            Playing,
            Some(MediaEffect::StartPlayback),
            vec![Affordance::StartVisualizing { replaying: true }, Affordance::StartTimer],
        ),
        (Playing, PrimaryPressed | PlaybackCompleted) => (
            AfterRecording,
            Some(MediaEffect::StopPlayback),
            vec![Affordance::StopVisualizing, Affordance::StopTimer],
        ),
        (AfterRecording | Playing, ResetPressed) => (
            BeforeRecording,
            (state == Playing).then_some(MediaEffect::StopPlayback),
            vec![
                Affordance::StopVisualizing,
                Affordance::StopTimer,
                Affordance::ClearVisualization,
                Affordance::ClearTimer,
            ],
        ),
        _ => return None,
    };

    affordances.extend(entry_affordances(next));
    Some(Transition {
        next,
        media,
        affordances,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn next(state: RecorderState, event: RecorderEvent) -> RecorderState {
        transition(state, event)
            .unwrap_or_else(|| panic!("{event:?} should apply in {state:?}"))
            .next
    }

    #[test]
    fn primary_key_cycles_through_the_table() {
        let mut state = RecorderState::default();
        assert_eq!(state, RecorderState::BeforeRecording);

        state = next(state, RecorderEvent::PrimaryPressed);
        assert_eq!(state, RecorderState::Recording);
        state = next(state, RecorderEvent::PrimaryPressed);
        assert_eq!(state, RecorderState::AfterRecording);
        state = next(state, RecorderEvent::PrimaryPressed);
        assert_eq!(state, RecorderState::Playing);
        state = next(state, RecorderEvent::PlaybackCompleted);
        assert_eq!(state, RecorderState::AfterRecording);
        state = next(state, RecorderEvent::PrimaryPressed);
        assert_eq!(state, RecorderState::Playing);
        state = next(state, RecorderEvent::PrimaryPressed);
        assert_eq!(state, RecorderState::AfterRecording);
    }

    #[test]
    fn each_transition_carries_its_media_effect() {
        let cases = [
            (RecorderState::BeforeRecording, RecorderEvent::PrimaryPressed, Some(MediaEffect::StartCapture)),
            (RecorderState::Recording, RecorderEvent::PrimaryPressed, Some(MediaEffect::StopCapture)),
            (RecorderState::AfterRecording, RecorderEvent::PrimaryPressed, Some(MediaEffect::StartPlayback)),
            (RecorderState::Playing, RecorderEvent::PrimaryPressed, Some(MediaEffect::StopPlayback)),
            (RecorderState::Playing, RecorderEvent::PlaybackCompleted, Some(MediaEffect::StopPlayback)),
            (RecorderState::Playing, RecorderEvent::ResetPressed, Some(MediaEffect::StopPlayback)),
            (RecorderState::AfterRecording, RecorderEvent::ResetPressed, None),
        ];

        for (state, event, media) in cases {
            assert_eq!(transition(state, event).unwrap().media, media, "{state:?} + {event:?}");
        }
    }

    #[test]
    fn reset_clears_visualization_and_timer() {
        let transition = transition(RecorderState::AfterRecording, RecorderEvent::ResetPressed).unwrap();

        assert_eq!(transition.next, RecorderState::BeforeRecording);
        assert!(transition.affordances.contains(&Affordance::ClearVisualization));
        assert!(transition.affordances.contains(&Affordance::ClearTimer));
        assert!(transition.affordances.contains(&Affordance::ResetEnabled(false)));
        assert!(transition.affordances.contains(&Affordance::PrimaryIcon(PrimaryIcon::Record)));
    }

    #[test]
    fn irrelevant_events_are_ignored() {
        assert!(transition(RecorderState::BeforeRecording, RecorderEvent::ResetPressed).is_none());
        assert!(transition(RecorderState::Recording, RecorderEvent::ResetPressed).is_none());
        assert!(transition(RecorderState::Recording, RecorderEvent::PlaybackCompleted).is_none());
        assert!(transition(RecorderState::AfterRecording, RecorderEvent::PlaybackCompleted).is_none());
    }

    #[test]
    fn reset_is_enabled_only_after_recording_or_while_playing() {
        assert_eq!(entry_affordances(RecorderState::BeforeRecording)[0], Affordance::ResetEnabled(false));
        assert_eq!(entry_affordances(RecorderState::Recording)[0], Affordance::ResetEnabled(false));
        assert_eq!(entry_affordances(RecorderState::AfterRecording)[0], Affordance::ResetEnabled(true));
        assert_eq!(entry_affordances(RecorderState::Playing)[0], Affordance::ResetEnabled(true));
    }

    #[test]
    fn primary_icon_follows_state() {
        let icon = |state| entry_affordances(state)[1];
        assert_eq!(icon(RecorderState::BeforeRecording), Affordance::PrimaryIcon(PrimaryIcon::Record));
        assert_eq!(icon(RecorderState::Recording), Affordance::PrimaryIcon(PrimaryIcon::Stop));
        assert_eq!(icon(RecorderState::AfterRecording), Affordance::PrimaryIcon(PrimaryIcon::Play));
        assert_eq!(icon(RecorderState::Playing), Affordance::PrimaryIcon(PrimaryIcon::Stop));
    }
}
