use std::fmt;

/// How a cached table is encoded on disk.
///
/// The format only decides the file extension and the codec; it is never part
/// of the logical dataset identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SerializationFormat {
    /// Opaque binary columnar encoding, stored with the `.pkl` extension.
    /// Not meant to be read by other tools.
    #[default]
    Pickled,
    /// UTF-8 comma separated text with a header row. The first column holds
    /// the row labels.
    Csv,
}

impl SerializationFormat {
    pub fn from_pickled(pickled: bool) -> Self {
        if pickled {
            SerializationFormat::Pickled
        } else {
            SerializationFormat::Csv
        }
    }

    /// File extension without the leading dot.
    pub fn extension(&self) -> &'static str {
        match self {
            SerializationFormat::Pickled => "pkl",
            SerializationFormat::Csv => "csv",
        }
    }

    pub(crate) fn from_extension(extension: &str) -> Option<Self> {
        match extension {
            "pkl" => Some(SerializationFormat::Pickled),
            "csv" => Some(SerializationFormat::Csv),
            _ => None,
        }
    }
}

impl fmt::Display for SerializationFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.extension())
    }
}
