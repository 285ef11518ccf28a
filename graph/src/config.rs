use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::Result;

/// How connectors with a column change are drawn
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GraphStyle {
    #[default]
    Rounded,
    Angular,
}

/// Which node is drawn as an open circle when the working tree is dirty
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UncommittedChangesStyle {
    #[default]
    OpenCircleAtTheUncommittedChanges,
    OpenCircleAtTheCheckedOutCommit,
}

/// Row and column dimensions
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Grid {
    /// Column width
    pub x: f32,
    /// Row height
    pub y: f32,
    pub offset_x: f32,
    pub offset_y: f32,
    /// Extra height below an expanded row
    pub expand_y: f32,
}

impl Default for Grid {
    fn default() -> Self {
        Self {
            x: 16.0,
            y: 24.0,
            offset_x: 16.0,
            offset_y: 12.0,
            expand_y: 250.0,
        }
    }
}

/// Presentation parameters. The layout engine itself only reads the palette
/// size; everything else is for renderers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
    pub colours: Vec<String>,
    pub style: GraphStyle,
    pub grid: Grid,
    pub uncommitted_changes: UncommittedChangesStyle,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            colours: [
                "#0085d9", "#d9008f", "#00d90a", "#d98500", "#a300d9", "#ff0000", "#00d9cc",
                "#e138e8",
            ]
            .iter()
            .map(|c| c.to_string())
            .collect(),
            style: GraphStyle::default(),
            grid: Grid::default(),
            uncommitted_changes: UncommittedChangesStyle::default(),
        }
    }
}

impl GraphConfig {
    /// Resolve a palette index to a colour string
    pub fn colour(&self, index: usize) -> &str {
        if self.colours.is_empty() {
            return "#808080";
        }
        &self.colours[index % self.colours.len()]
    }

    pub fn palette_size(&self) -> usize {
        self.colours.len().max(1)
    }
}

/// Which rows are visually de-emphasized
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MuteCommitsConfig {
    pub merge_commits: bool,
    pub commits_not_ancestors_of_head: bool,
}

/// Top-level configuration file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub graph: GraphConfig,
    pub mute: MuteCommitsConfig,
    /// Commits laid out per page
    pub page_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            graph: GraphConfig::default(),
            mute: MuteCommitsConfig::default(),
            page_size: 300,
        }
    }
}

impl Config {
    pub fn from_toml_str(source: &str) -> Result<Self> {
        Ok(toml::from_str(source)?)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let source = std::fs::read_to_string(path)?;
        Self::from_toml_str(&source)
    }
}
