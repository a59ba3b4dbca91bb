use std::fmt;

use serde::Serialize;

/// The OT-extension variants the benchmark harness measures.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Protocol {
    /// Plain base OT run once per message, no extension.
    Primitive,
    Iknp,
    /// IKNP with the ALSZ network optimisation.
    Alsz,
}

impl Protocol {
    /// Registry order, used whenever protocols are compared side by side.
    pub const ALL: [Protocol; 3] = [Protocol::Primitive, Protocol::Iknp, Protocol::Alsz];

    pub fn label(&self) -> &'static str {
        match self {
            Protocol::Primitive => "Primitive",
            Protocol::Iknp => "IKNP",
            Protocol::Alsz => "ALSZ",
        }
    }

    /// Name of the measurement file the harness writes for this protocol.
    pub fn filename(&self) -> &'static str {
        match self {
            Protocol::Primitive => "primitive",
            Protocol::Iknp => "ote",
            Protocol::Alsz => "ote_net",
        }
    }

    /// Reverse lookup of [`Protocol::label`], case-insensitive.
    pub fn from_label(label: &str) -> Option<Protocol> {
        Protocol::ALL
            .into_iter()
            .find(|p| p.label().eq_ignore_ascii_case(label.trim()))
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_order() {
        let labels: Vec<_> = Protocol::ALL.iter().map(Protocol::label).collect();
        assert_eq!(labels, ["Primitive", "IKNP", "ALSZ"]);
    }

    #[test]
    fn test_filenames() {
        assert_eq!(Protocol::Primitive.filename(), "primitive");
        assert_eq!(Protocol::Iknp.filename(), "ote");
        assert_eq!(Protocol::Alsz.filename(), "ote_net");
    }

    #[test]
    fn test_from_label() {
        assert_eq!(Protocol::from_label("iknp"), Some(Protocol::Iknp));
        assert_eq!(Protocol::from_label(" ALSZ "), Some(Protocol::Alsz));
        assert_eq!(Protocol::from_label("KOS"), None);
    }
}
