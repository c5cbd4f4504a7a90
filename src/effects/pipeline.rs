use crate::effects::pass::EffectPass;
use crate::foundation::error::{StrataError, StrataResult};
use crate::render::frame::FrameRGBA;
use crate::stage::Scene;

/// Result of one pipeline run.
#[derive(Clone, Debug, PartialEq)]
pub struct PipelineOutput {
    /// Output of the last pass that ran; blank when none ran.
    pub frame: FrameRGBA,
    /// Names of the passes that ran, in order.
    pub applied: Vec<String>,
}

/// Ordered passes over a ping-pong buffer pair.
#[derive(Debug)]
pub struct EffectPipeline {
    passes: Vec<Box<dyn EffectPass>>,
    read: FrameRGBA,
    write: FrameRGBA,
}

impl EffectPipeline {
    /// Empty pipeline rendering at `width`×`height`.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            passes: Vec::new(),
            read: FrameRGBA::new(width, height),
            write: FrameRGBA::new(width, height),
        }
    }

    /// Builder form of [`EffectPipeline::push`].
    pub fn with_pass(mut self, pass: impl EffectPass + 'static) -> Self {
        self.push(Box::new(pass));
        self
    }

    /// Append a pass after the existing ones.
    pub fn push(&mut self, pass: Box<dyn EffectPass>) {
        self.passes.push(pass);
    }

    /// Passes in run order.
    pub fn passes(&self) -> &[Box<dyn EffectPass>] {
        &self.passes
    }

    /// First pass called `name`.
    pub fn pass(&self, name: &str) -> Option<&dyn EffectPass> {
        self.passes.iter().find(|p| p.name() == name).map(|p| &**p)
    }

    /// Mutable lookup of the first pass called `name`.
    pub fn pass_mut(&mut self, name: &str) -> Option<&mut (dyn EffectPass + 'static)> {
        self.passes
            .iter_mut()
            .find(|p| p.name() == name)
            .map(|p| &mut **p)
    }

    /// Current buffer size.
    pub fn size(&self) -> (u32, u32) {
        (self.read.width, self.read.height)
    }

    /// Reallocate both buffers.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.read.resize(width, height);
        self.write.resize(width, height);
    }

    /// Run every enabled pass in order, swapping buffers after each.
    ///
    /// Disabled passes are skipped without touching either buffer.
    pub fn render(&mut self, scene: &Scene) -> StrataResult<PipelineOutput> {
        self.read.validate()?;
        self.write.validate()?;
        if !self.read.same_size(&self.write) {
            return Err(StrataError::render(format!(
                "pipeline buffers differ: {}x{} vs {}x{}",
                self.read.width, self.read.height, self.write.width, self.write.height
            )));
        }

        self.read.clear([0; 4]);
        let mut applied = Vec::new();
        for pass in &mut self.passes {
            if !pass.enabled() {
                continue;
            }
            pass.render(&self.read, &mut self.write, scene)?;
            if !self.write.same_size(&self.read) {
                return Err(StrataError::render(format!(
                    "pass '{}' resized its output",
                    pass.name()
                )));
            }
            std::mem::swap(&mut self.read, &mut self.write);
            applied.push(pass.name().to_owned());
        }

        Ok(PipelineOutput {
            frame: self.read.clone(),
            applied,
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/pipeline.rs"]
mod tests;
