//! Quran data layer: verse text, per-word timestamps and word-by-word
//! translations, each loaded from an independent JSON store.

pub mod loader;
pub mod sources;

pub use loader::{LoadedVerse, VerseLoader};
pub use sources::{QuranTextStore, Reciter, TimedVerse, TimestampStore, TranslationStore};
