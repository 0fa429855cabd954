use anyhow::{Context, Result};
use gail::assets::obj::ObjOptions;
use serde::Deserialize;
use std::path::Path;

use crate::utils;

#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub(crate) struct ObjMeta {
    #[serde(flatten)]
    pub(crate) options: ObjOptions,
    /// Skip the model entirely
    pub(crate) ignore: bool,
}

impl ObjMeta {
    pub(crate) fn parse(path: &Path) -> Result<Self> {
        let data = std::fs::read(path)
            .with_context(|| format!("Could not read meta file: {}", path.display()))?;
        let meta: Self = toml::from_slice(&data)
            .with_context(|| format!("Invalid meta file: {}", path.display()))?;
        Ok(meta)
    }

    /// Meta from a file called `<model>.toml`, alternatively from the folder scoped
    /// `obj.toml`, or else the default meta
    pub(crate) fn lookup(model: &Path) -> Result<Self> {
        let dir = model
            .parent()
            .with_context(|| format!("Path terminates in root or prefix: {}", model.display()))?;

        let own = utils::combine_path(dir, utils::file_name(model)?, "toml");
        if own.is_file() {
            return Self::parse(&own);
        }

        let folder = utils::combine_path(dir, "obj", "toml");
        if folder.is_file() {
            return Self::parse(&folder);
        }

        Ok(Self::default())
    }
}
