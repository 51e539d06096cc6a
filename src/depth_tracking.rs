use crate::{
    error::{Error, Result},
    tag_type::TagType,
    MAX_DEPTH,
};

/// Tracks how deeply lists and compounds are nested while walking a tag stream.
#[derive(Clone, Debug, Default)]
pub struct DepthTracker {
    depth: usize,
}

impl DepthTracker {
    /// Create a new depth tracker
    pub fn new() -> Self {
        Self { depth: 0 }
    }

    /// Update the depth tracker on entering a payload. Only nesting payloads increase the depth;
    /// returns whether the depth changed, so the caller knows to call `exit` afterwards.
    pub fn enter(&mut self, ty: TagType) -> Result<bool> {
        if !matches!(ty, TagType::List | TagType::Compound) {
            return Ok(false);
        }
        self.depth += 1;
        // Check to see if we hit the nesting limit
        if self.depth > MAX_DEPTH {
            return Err(Error::ParseLimit("Depth limit exceeded".to_string()));
        }
        Ok(true)
    }

    /// Drop back out of a nesting payload.
    pub fn exit(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    pub fn depth(&self) -> usize {
        self.depth
    }
}
