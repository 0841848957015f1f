use serde::{Deserialize, Serialize};

/// The three editable buffers of a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// Markup (HTML fragment).
    Structure,
    /// Style sheet (CSS).
    Style,
    /// Behaviour script (JS).
    Behavior,
}

impl SourceKind {
    pub const ALL: [SourceKind; 3] = [SourceKind::Structure, SourceKind::Style, SourceKind::Behavior];

    /// Archive entry name at the archive root.
    pub fn entry_name(&self) -> &'static str {
        match self {
            SourceKind::Structure => "document.html",
            SourceKind::Style => "styles.css",
            SourceKind::Behavior => "script.js",
        }
    }
}

/// Editable source text. At edit time every image or font reference inside
/// these buffers is in inline form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentSource {
    pub structure: String,
    pub style: String,
    pub behavior: String,
}

impl DocumentSource {
    pub fn new(structure: impl Into<String>, style: impl Into<String>, behavior: impl Into<String>) -> Self {
        Self {
            structure: structure.into(),
            style: style.into(),
            behavior: behavior.into(),
        }
    }

    pub fn get(&self, kind: SourceKind) -> &str {
        match kind {
            SourceKind::Structure => &self.structure,
            SourceKind::Style => &self.style,
            SourceKind::Behavior => &self.behavior,
        }
    }

    pub fn set(&mut self, kind: SourceKind, value: impl Into<String>) {
        let value = value.into();
        match kind {
            SourceKind::Structure => self.structure = value,
            SourceKind::Style => self.style = value,
            SourceKind::Behavior => self.behavior = value,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_and_set_by_kind() {
        let mut source = DocumentSource::default();
        source.set(SourceKind::Style, "p { margin: 0; }");
        source.set(SourceKind::Behavior, "console.log(1);");

        assert_eq!(source.get(SourceKind::Structure), "");
        assert_eq!(source.get(SourceKind::Style), "p { margin: 0; }");
        assert_eq!(source.behavior, "console.log(1);");
    }

    #[test]
    fn test_entry_names() {
        let names: Vec<_> = SourceKind::ALL.iter().map(|k| k.entry_name()).collect();
        assert_eq!(names, ["document.html", "styles.css", "script.js"]);
    }
}
