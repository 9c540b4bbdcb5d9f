//! Block kinds and their static properties.

use std::fmt;

use logix_core::{EngineError, Logger};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum Block {
    None = 0,
    Air = 1,
    Grass = 2,
    Dirt = 3,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockInfo {
    pub is_rendered: bool,
}

impl BlockInfo {
    const fn new(is_rendered: bool) -> Self {
        Self { is_rendered }
    }
}

/// Indexed by block id.
const BLOCK_INFO: &[BlockInfo] = &[
    BlockInfo::new(false), // None
    BlockInfo::new(false), // Air
    BlockInfo::new(true),  // Grass
    BlockInfo::new(true),  // Dirt
];

impl Block {
    pub const ALL: &'static [Block] = &[Block::None, Block::Air, Block::Grass, Block::Dirt];

    pub fn id(self) -> u16 {
        self as u16
    }

    pub fn from_id(id: u16) -> Option<Block> {
        Self::ALL.get(usize::from(id)).copied()
    }

    pub fn info(self) -> BlockInfo {
        BLOCK_INFO
            .get(usize::from(self.id()))
            .copied()
            .unwrap_or(BlockInfo::new(false))
    }

    pub fn name(self) -> &'static str {
        match self {
            Block::None => "None",
            Block::Air => "Air",
            Block::Grass => "Grass",
            Block::Dirt => "Dirt",
        }
    }
}

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Check that every block has an entry in the info table and that ids are
/// dense. Only runs in debug mode; each gap is logged before failing.
pub fn verify_block_table(log: &Logger) -> Result<(), EngineError> {
    if !log.debug_enabled() {
        return Ok(());
    }
    verify_against(log, Block::ALL, BLOCK_INFO)
}

fn verify_against(log: &Logger, blocks: &[Block], table: &[BlockInfo]) -> Result<(), EngineError> {
    let mut missing = false;
    for (index, block) in blocks.iter().enumerate() {
        let dense = usize::from(block.id()) == index;
        if !dense || table.get(index).is_none() {
            log.critical(format!("Missing block information for block '{block}'"));
            missing = true;
        }
    }
    if missing {
        log.debug("---");
        return Err(EngineError::DeveloperMisuse(
            "Some blocks were missing their information.".to_string(),
        ));
    }
    Ok(())
}
