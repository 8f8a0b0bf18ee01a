use std::collections::HashMap;
use std::error::Error;
use std::fs;
use std::path::Path;

use crate::config::BlocksConfig;
use crate::types::{AIR, BlockId, MAX_LIGHT};

const BUILTIN_BLOCKS: &str = include_str!("../blocks.toml");

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BlockType {
    pub id: BlockId,
    pub name: String,
    /// Hides faces of adjacent blocks and stops light.
    pub opaque: bool,
    /// Meshed into the transparent buffer; same-id neighbours do not show a face between them.
    pub translucent: bool,
    pub emission: u8,
}

impl BlockType {
    fn air() -> Self {
        BlockType {
            id: AIR,
            name: "air".to_string(),
            opaque: false,
            translucent: false,
            emission: 0,
        }
    }

    fn unknown(id: BlockId) -> Self {
        BlockType {
            id,
            name: "unknown".to_string(),
            opaque: true,
            translucent: false,
            emission: 0,
        }
    }
}

#[derive(Clone, Debug)]
pub struct BlockRegistry {
    blocks: Vec<Option<BlockType>>,
    by_name: HashMap<String, BlockId>,
    fallback: BlockType,
}

impl Default for BlockRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl BlockRegistry {
    /// Registry containing only air.
    pub fn new() -> Self {
        let mut by_name = HashMap::new();
        by_name.insert("air".to_string(), AIR);
        Self {
            blocks: vec![Some(BlockType::air())],
            by_name,
            fallback: BlockType::unknown(BlockId::MAX),
        }
    }

    /// Registry parsed from the table embedded in this crate.
    pub fn builtin() -> Self {
        match Self::from_toml_str(BUILTIN_BLOCKS) {
            Ok(reg) => reg,
            Err(e) => {
                log::error!("built-in block table failed to parse: {e}");
                Self::new()
            }
        }
    }

    pub fn from_toml_str(toml_str: &str) -> Result<Self, Box<dyn Error>> {
        let cfg: BlocksConfig = toml::from_str(toml_str)?;
        Self::from_config(cfg)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, Box<dyn Error>> {
        let s = fs::read_to_string(path)?;
        Self::from_toml_str(&s)
    }

    pub fn from_config(cfg: BlocksConfig) -> Result<Self, Box<dyn Error>> {
        let mut reg = BlockRegistry::new();
        for def in cfg.blocks {
            let id = def.id.unwrap_or(reg.blocks.len() as u16);
            if id == AIR && def.name != "air" {
                return Err(format!("block '{}' cannot use id 0 (reserved for air)", def.name).into());
            }
            if let Some(prev) = reg.by_name.get(&def.name) {
                if *prev != id {
                    return Err(format!("block name '{}' registered twice", def.name).into());
                }
            }
            let emission = def.emission.unwrap_or(0);
            if emission > MAX_LIGHT {
                return Err(format!(
                    "block '{}' emission {} exceeds {}",
                    def.name, emission, MAX_LIGHT
                )
                .into());
            }
            let translucent = def.translucent.unwrap_or(false);
            let ty = BlockType {
                id,
                name: def.name.clone(),
                opaque: def.opaque.unwrap_or(!translucent),
                translucent,
                emission,
            };
            let slot = id as usize;
            if reg.blocks.len() <= slot {
                reg.blocks.resize(slot + 1, None);
            }
            if id != AIR && reg.blocks[slot].is_some() {
                return Err(format!("block id {id} registered twice").into());
            }
            reg.blocks[slot] = Some(ty);
            reg.by_name.insert(def.name, id);
        }
        if let Some(name) = cfg.unknown_block {
            match reg.id_by_name(&name).and_then(|id| reg.blocks[id as usize].clone()) {
                Some(ty) => {
                    reg.fallback = BlockType {
                        id: BlockId::MAX,
                        name: "unknown".to_string(),
                        ..ty
                    }
                }
                None => return Err(format!("unknown_block '{name}' is not defined").into()),
            }
        }
        Ok(reg)
    }

    /// Definition for `id`; ids missing from the table resolve to the fallback definition.
    #[inline]
    pub fn get(&self, id: BlockId) -> &BlockType {
        self.blocks
            .get(id as usize)
            .and_then(|b| b.as_ref())
            .unwrap_or(&self.fallback)
    }

    #[inline]
    pub fn contains(&self, id: BlockId) -> bool {
        matches!(self.blocks.get(id as usize), Some(Some(_)))
    }

    pub fn id_by_name(&self, name: &str) -> Option<BlockId> {
        self.by_name.get(name).copied()
    }

    #[inline]
    pub fn is_opaque(&self, id: BlockId) -> bool {
        id != AIR && self.get(id).opaque
    }

    #[inline]
    pub fn is_translucent(&self, id: BlockId) -> bool {
        id != AIR && self.get(id).translucent
    }

    #[inline]
    pub fn emission(&self, id: BlockId) -> u8 {
        if id == AIR { 0 } else { self.get(id).emission }
    }

    pub fn len(&self) -> usize {
        self.blocks.iter().filter(|b| b.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_table_parses_and_reserves_air() {
        let reg = BlockRegistry::builtin();
        assert!(reg.len() > 1);
        assert_eq!(reg.id_by_name("air"), Some(AIR));
        assert!(!reg.is_opaque(AIR));
        assert!(!reg.is_translucent(AIR));
    }

    #[test]
    fn translucent_defaults_to_non_opaque() {
        let reg = BlockRegistry::from_toml_str(
            r#"
            [[blocks]]
            name = "glass"
            id = 3
            translucent = true
            "#,
        )
        .expect("registry");
        let glass = reg.id_by_name("glass").unwrap();
        assert!(reg.is_translucent(glass));
        assert!(!reg.is_opaque(glass));
    }

    #[test]
    fn unknown_ids_use_fallback() {
        let reg = BlockRegistry::builtin();
        assert!(!reg.contains(900));
        assert!(reg.is_opaque(900));
        assert_eq!(reg.emission(900), 0);
    }

    #[test]
    fn rejects_duplicate_ids_and_bad_emission() {
        let dup = r#"
            [[blocks]]
            name = "a"
            id = 2
            [[blocks]]
            name = "b"
            id = 2
        "#;
        assert!(BlockRegistry::from_toml_str(dup).is_err());
        let bright = r#"
            [[blocks]]
            name = "sun"
            id = 2
            emission = 40
        "#;
        assert!(BlockRegistry::from_toml_str(bright).is_err());
    }
}
