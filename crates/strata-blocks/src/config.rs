use serde::Deserialize;

#[derive(Clone, Debug, Deserialize)]
pub struct BlocksConfig {
    pub blocks: Vec<BlockDef>,
    /// Name of the block whose traits are used for ids missing from the table.
    #[serde(default)]
    pub unknown_block: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct BlockDef {
    pub name: String,
    #[serde(default)]
    pub id: Option<u16>,
    #[serde(default)]
    pub opaque: Option<bool>,
    #[serde(default)]
    pub translucent: Option<bool>,
    #[serde(default)]
    pub emission: Option<u8>,
}
