use super::framebuffer::Framebuffer;

/// Represents a screen and a speaker.
/// `draw` receives a copy of the framebuffer whenever it changed,
/// `set_tone` is called when the sound timer starts or stops running.
pub trait EmulatorOutput {
    fn draw(&mut self, frame: &Framebuffer);
    fn set_tone(&mut self, on: bool);
}

/// A simple output device that remembers what it was given.
pub struct DummyOutput {
    frames_drawn: usize,
    last_frame: Option<Framebuffer>,
    tone_changes: Vec<bool>,
}

impl DummyOutput {
    pub fn new() -> DummyOutput {
        DummyOutput {
            frames_drawn: 0,
            last_frame: None,
            tone_changes: Vec::new(),
        }
    }

    pub fn frames_drawn(&self) -> usize {
        self.frames_drawn
    }

    pub fn last_frame(&self) -> Option<&Framebuffer> {
        self.last_frame.as_ref()
    }

    pub fn tone(&self) -> bool {
        self.tone_changes.last().copied().unwrap_or(false)
    }

    /// Every `set_tone` call, oldest first.
    pub fn tone_changes(&self) -> &[bool] {
        &self.tone_changes
    }
}

impl Default for DummyOutput {
    fn default() -> Self {
        Self::new()
    }
}

impl EmulatorOutput for DummyOutput {
    fn draw(&mut self, frame: &Framebuffer) {
        self.frames_drawn += 1;
        self.last_frame = Some(*frame);
    }

    fn set_tone(&mut self, on: bool) {
        self.tone_changes.push(on);
    }
}
