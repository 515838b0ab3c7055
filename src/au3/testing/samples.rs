//! Bundled sample scripts
//!
//! The files live in `samples/` at the crate root and are compiled in, so tests do not
//! depend on the working directory.

const SAMPLES: &[(&str, &str)] = &[
    (
        "000-directives.au3",
        include_str!("../../../samples/000-directives.au3"),
    ),
    (
        "010-declarations.au3",
        include_str!("../../../samples/010-declarations.au3"),
    ),
    (
        "020-if-blocks.au3",
        include_str!("../../../samples/020-if-blocks.au3"),
    ),
    (
        "030-comments.au3",
        include_str!("../../../samples/030-comments.au3"),
    ),
    (
        "040-kitchen-sink.au3",
        include_str!("../../../samples/040-kitchen-sink.au3"),
    ),
];

pub struct Samples;

impl Samples {
    /// Source text of a sample by file name.
    pub fn get(name: &str) -> Option<&'static str> {
        SAMPLES
            .iter()
            .find(|(sample, _)| *sample == name)
            .map(|(_, source)| *source)
    }

    /// File names of every sample, in order.
    pub fn names() -> impl Iterator<Item = &'static str> {
        SAMPLES.iter().map(|(name, _)| *name)
    }

    pub fn all() -> impl Iterator<Item = (&'static str, &'static str)> {
        SAMPLES.iter().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_sample_is_reachable() {
        for name in Samples::names() {
            let source = Samples::get(name).unwrap();
            assert!(!source.trim().is_empty(), "{name} is empty");
        }
        assert!(Samples::get("missing.au3").is_none());
    }
}
