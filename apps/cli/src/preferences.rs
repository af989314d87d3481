use std::{fs, io, path::Path};

use anyhow::Context;
use serde::{Deserialize, Serialize};

/// Viewer preferences kept outside any controller and shared by every view.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
    #[serde(default)]
    pub dark_mode: bool,
}

impl Preferences {
    /// A missing file yields the defaults.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(err) => {
                return Err(err)
                    .with_context(|| format!("failed to read preferences '{}'", path.display()))
            }
        };
        toml::from_str(&contents)
            .with_context(|| format!("failed to parse preferences '{}'", path.display()))
    }

    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let contents = toml::to_string_pretty(self).context("failed to encode preferences")?;
        if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            fs::create_dir_all(parent).with_context(|| {
                format!("failed to create preferences directory '{}'", parent.display())
            })?;
        }
        fs::write(path, contents)
            .with_context(|| format!("failed to write preferences '{}'", path.display()))
    }

    pub fn toggle_dark_mode(&mut self) -> bool {
        self.dark_mode = !self.dark_mode;
        self.dark_mode
    }

    pub fn theme_name(&self) -> &'static str {
        if self.dark_mode {
            "dark"
        } else {
            "light"
        }
    }
}
