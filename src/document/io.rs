use std::borrow::Cow;

use crate::binary::reader::Reader;
use crate::binary::section::{Section, SectionEntry, SectionTable};
use crate::binary::writer::{Slot, Writer};
use crate::document::model::{CrossReferences, Document};
use crate::document::options::{ReadOptions, WriteOptions};
use crate::document::state::{read_states, write_states};
use crate::foundation::error::{FxrError, FxrResult};
use crate::foundation::version::FxrVersion;
use crate::graph::read::read_graph;
use crate::graph::write::{begin_section, end_section, write_graph};

const MAGIC: &[u8; 4] = b"FXR\0";

impl Document {
    /// Parse a whole file. The file's version must be the one used by
    /// `opts.game`.
    #[tracing::instrument(skip(bytes), fields(len = bytes.len()))]
    pub fn read(bytes: &[u8], opts: &ReadOptions) -> FxrResult<Self> {
        let mut r = Reader::new(bytes);
        r.assert_magic(MAGIC)?;
        r.assert_i16(&[0])?;
        let at = r.position();
        let code = r.read_i16()?;
        let Some(version) = FxrVersion::from_code(code) else {
            return Err(FxrError::format(at, format!("unknown version {code}")));
        };
        if version != opts.game.version() {
            return Err(FxrError::unsupported(
                format!("a version {version} file"),
                opts.game,
            ));
        }
        r.assert_i32(&[1])?;
        let id = r.read_i32()?;

        let mut table = SectionTable::default();
        for &section in Section::for_version(version) {
            table.set(section, read_entry(&mut r)?);
        }
        r.assert_i32(&[0])?;
        r.assert_i32(&[0])?;

        let states = read_states(&mut r, table.get(Section::States))?;
        let root = read_graph(&mut r, &table, opts.game, opts.parse_schema_actions)?;
        let cross_references = if version.has_cross_references() {
            CrossReferences {
                references: read_ids(&mut r, table.get(Section::References))?,
                external_values: read_ids(&mut r, table.get(Section::ExternalValues))?,
                unk_external_values: read_ids(&mut r, table.get(Section::UnkExternalValues))?,
            }
        } else {
            CrossReferences::default()
        };

        tracing::debug!(id, nodes = table.get(Section::Nodes).count, "read document");
        Ok(Self {
            id,
            root,
            states,
            cross_references,
        })
    }

    /// Serialize for `opts.game`. Fails on the first structure that game
    /// cannot store.
    #[tracing::instrument(skip(self), fields(id = self.id))]
    pub fn write(&self, opts: &WriteOptions) -> FxrResult<Vec<u8>> {
        let game = opts.game;
        let version = game.version();
        let refs = if opts.recompute_references {
            Cow::Owned(self.gather_references())
        } else {
            Cow::Borrowed(&self.cross_references)
        };

        let mut w = Writer::new();
        w.write_magic(MAGIC);
        w.write_i16(0);
        w.write_i16(version.code());
        w.write_i32(1);
        w.write_i32(self.id);
        for &section in Section::for_version(version) {
            w.reserve(Slot::section_offset(section))?;
            w.reserve(Slot::section_count(section))?;
        }
        w.write_i32(0);
        w.write_i32(0);

        write_states(&mut w, &self.states)?;
        write_graph(&mut w, &self.root, game)?;
        if version.has_cross_references() {
            for (section, ids) in [
                (Section::References, &refs.references),
                (Section::ExternalValues, &refs.external_values),
                (Section::UnkExternalValues, &refs.unk_external_values),
            ] {
                let offset = begin_section(&mut w, section)?;
                for &id in ids {
                    w.write_i32(id);
                }
                end_section(&mut w, section, offset, ids.len())?;
            }
        }

        let bytes = w.finish()?;
        tracing::debug!(len = bytes.len(), "wrote document");
        Ok(bytes)
    }
}

fn read_entry(r: &mut Reader<'_>) -> FxrResult<SectionEntry> {
    let at = r.position();
    let offset = r.read_i32()?;
    let count = r.read_count()?;
    let offset = usize::try_from(offset)
        .map_err(|_| FxrError::format(at, format!("negative section offset {offset}")))?;
    Ok(SectionEntry { offset, count })
}

fn read_ids(r: &mut Reader<'_>, entry: SectionEntry) -> FxrResult<Vec<i32>> {
    Ok(r.read_words_at(entry.offset, entry.count)?
        .into_iter()
        .map(|w| w as i32)
        .collect())
}
