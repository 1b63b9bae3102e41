//! Discovery stages and the kinds each one admits

/// One discovery pass over the manifest. The order of [`Stage::ALL`] matters: later
/// stages may take over entries that earlier stages left at the top level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    /// Namespaces, classes and other language entities; shallow.
    Language,
    /// Groups; deep.
    Group,
    /// Directories and files; deep.
    Container,
}

impl Stage {
    pub const ALL: [Stage; 3] = [Stage::Language, Stage::Group, Stage::Container];

    pub fn allows(self, kind: &str) -> bool {
        match self {
            Stage::Language => matches!(
                kind,
                "namespace"
                    | "class"
                    | "struct"
                    | "interface"
                    | "function"
                    | "variable"
                    | "typedef"
                    | "enum"
            ),
            Stage::Group => kind == "group",
            Stage::Container => kind == "dir" || kind == "file",
        }
    }

    /// Deep resolution also reads brief descriptions at discovery time.
    pub fn deep(self) -> bool {
        !matches!(self, Stage::Language)
    }

    pub fn name(self) -> &'static str {
        match self {
            Stage::Language => "language",
            Stage::Group => "group",
            Stage::Container => "container",
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
