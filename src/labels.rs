// Labels attached to each uploaded file on the host.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Label {
    Featured,
    Linux,
    OsX,
    Source,
    Windows,
}

impl Label {
    pub fn as_str(self) -> &'static str {
        match self {
            Label::Featured => "Featured",
            Label::Linux => "OpSys-Linux",
            Label::OsX => "OpSys-OSX",
            Label::Source => "Type-Source",
            Label::Windows => "OpSys-Windows",
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Checked in order; only the first hit is applied.
const PLATFORM_MARKERS: [(&str, Label); 4] = [
    ("linux", Label::Linux),
    ("darwin", Label::OsX),
    ("src", Label::Source),
    ("win32", Label::Windows),
];

/// `Featured`, plus the first platform label whose marker appears in
/// `filename`.
pub fn labels_for(filename: &str) -> Vec<Label> {
    let mut labels = vec![Label::Featured];
    if let Some((_, label)) = PLATFORM_MARKERS
        .iter()
        .find(|(marker, _)| filename.contains(marker))
    {
        labels.push(*label);
    }
    labels
}
