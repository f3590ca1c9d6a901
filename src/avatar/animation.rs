//! Avatar domain: the animation collaborator.

/// Receives fire-and-forget "play this clip" requests.
pub trait AnimationSink {
    fn play(&mut self, clip: &'static str);
}

impl AnimationSink for Vec<&'static str> {
    fn play(&mut self, clip: &'static str) {
        self.push(clip);
    }
}
