//! IES Profiles
//!
//! Light distribution profiles are referenced by filename. Loading the same
//! filename twice returns the same handle.

use rustc_hash::FxHashMap;

/// Opaque reference to a loaded IES profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IesProfileHandle(u32);

impl IesProfileHandle {
    /// Slot of the profile in the profile array uploaded to the GPU.
    #[inline]
    #[must_use]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Default)]
pub struct IesProfileManager {
    profiles: Vec<String>,
    lookup: FxHashMap<String, IesProfileHandle>,
}

impl IesProfileManager {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `filename` and returns its handle.
    pub fn load(&mut self, filename: &str) -> IesProfileHandle {
        if let Some(&handle) = self.lookup.get(filename) {
            return handle;
        }
        let handle = IesProfileHandle(self.profiles.len() as u32);
        self.profiles.push(filename.to_string());
        self.lookup.insert(filename.to_string(), handle);
        log::debug!("Loaded IES profile '{filename}' into slot {}", handle.0);
        handle
    }

    #[must_use]
    pub fn filename(&self, handle: IesProfileHandle) -> Option<&str> {
        self.profiles.get(handle.index()).map(String::as_str)
    }

    #[must_use]
    pub fn get(&self, filename: &str) -> Option<IesProfileHandle> {
        self.lookup.get(filename).copied()
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_is_idempotent() {
        let mut manager = IesProfileManager::new();
        let a = manager.load("x_arrow_diffuse.ies");
        let b = manager.load("x_arrow_diffuse.ies");
        let c = manager.load("soft_display.ies");
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(manager.len(), 2);
        assert_eq!(manager.filename(c), Some("soft_display.ies"));
    }
}
