//! Presentation seam - fire-and-forget animation and audio cues

/// Animation states the host may map onto actual clips
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationCue {
    Idle,
    Walk,
    Run,
    Search,
    Recharge,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioCue {
    /// One-shot bark when a guard confirms a sighting
    SpottedBark,
    /// Loop while actively searching an area
    SearchLoop,
    /// One-shot on capture
    CaptureSting,
    /// Recharge hum loop
    RechargeLoop,
}

/// No feedback is expected from any of these calls
pub trait Presentation {
    fn animation(&mut self, cue: AnimationCue);
    fn audio(&mut self, cue: AudioCue);
    fn stop_audio(&mut self, cue: AudioCue);
}

#[derive(Debug, Default)]
pub struct NullPresentation;

impl Presentation for NullPresentation {
    fn animation(&mut self, _cue: AnimationCue) {}
    fn audio(&mut self, _cue: AudioCue) {}
    fn stop_audio(&mut self, _cue: AudioCue) {}
}

/// Records every cue in order, for assertions in tests
#[derive(Debug, Default)]
pub struct RecordingPresentation {
    pub animations: Vec<AnimationCue>,
    pub audio: Vec<AudioCue>,
}

impl Presentation for RecordingPresentation {
    fn animation(&mut self, cue: AnimationCue) {
        self.animations.push(cue);
    }

    fn audio(&mut self, cue: AudioCue) {
        self.audio.push(cue);
    }

    fn stop_audio(&mut self, _cue: AudioCue) {}
}
