use crate::foundation::version::FxrVersion;

/// Top-level sections addressed by `(offset, count)` pairs in the file header,
/// in header order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Section {
    States,
    Nodes,
    Effects,
    Actions,
    Properties,
    Modifiers,
    ModifierProperties,
    Section10,
    Fields,
    References,
    ExternalValues,
    UnkExternalValues,
}

impl Section {
    pub const COUNT: usize = 12;

    const ALL: [Section; Section::COUNT] = [
        Section::States,
        Section::Nodes,
        Section::Effects,
        Section::Actions,
        Section::Properties,
        Section::Modifiers,
        Section::ModifierProperties,
        Section::Section10,
        Section::Fields,
        Section::References,
        Section::ExternalValues,
        Section::UnkExternalValues,
    ];

    /// Sections present in the header of a file of `version`.
    pub fn for_version(version: FxrVersion) -> &'static [Section] {
        if version.has_cross_references() {
            &Self::ALL
        } else {
            &Self::ALL[..9]
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::States => "states",
            Self::Nodes => "nodes",
            Self::Effects => "effects",
            Self::Actions => "actions",
            Self::Properties => "properties",
            Self::Modifiers => "modifiers",
            Self::ModifierProperties => "modifier properties",
            Self::Section10 => "section10",
            Self::Fields => "fields",
            Self::References => "references",
            Self::ExternalValues => "external values",
            Self::UnkExternalValues => "unknown external values",
        }
    }
}

/// Location of one section as recorded in the header.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SectionEntry {
    pub offset: usize,
    pub count: usize,
}

/// Header table of section locations indexed by [`Section`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SectionTable {
    entries: [SectionEntry; Section::COUNT],
}

impl SectionTable {
    pub fn get(&self, section: Section) -> SectionEntry {
        self.entries[section.index()]
    }

    pub fn set(&mut self, section: Section, entry: SectionEntry) {
        self.entries[section.index()] = entry;
    }
}
