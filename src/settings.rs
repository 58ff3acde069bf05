//! The one persisted byte: which sequence was showing last.

use crate::log;

/// Trait for abstracting the non-volatile settings slot.
pub trait SettingsStore {
    /// Reads the stored byte.
    fn load(&mut self) -> u8;

    /// Writes the byte.
    fn save(&mut self, value: u8);
}

impl<S: SettingsStore + ?Sized> SettingsStore for &mut S {
    fn load(&mut self) -> u8 {
        (**self).load()
    }

    fn save(&mut self, value: u8) {
        (**self).save(value);
    }
}

/// Sequence index loaded at startup and written back before a restart.
#[derive(Debug)]
pub struct Settings<S> {
    store: S,
    stored: u8,
    sequence: u8,
}

impl<S: SettingsStore> Settings<S> {
    /// Reads the persisted index once.
    pub fn load(mut store: S) -> Self {
        let stored = store.load();
        log::info!("Loaded sequence index {=u8}", stored);
        Self {
            store,
            stored,
            sequence: stored,
        }
    }

    /// Index to persist on the next commit.
    pub fn sequence(&self) -> u8 {
        self.sequence
    }

    /// Index that was persisted when the device started.
    pub fn stored(&self) -> u8 {
        self.stored
    }

    /// Records the index currently selected.
    pub fn set_sequence(&mut self, index: u8) {
        self.sequence = index;
    }

    /// Writes the selected index, skipping the write when the stored byte
    /// already holds it.
    pub fn commit(&mut self) {
        if self.store.load() != self.sequence {
            log::info!("Saving sequence index {=u8}", self.sequence);
            self.store.save(self.sequence);
        }
        self.stored = self.sequence;
    }

    /// Releases the store.
    pub fn free(self) -> S {
        self.store
    }
}
