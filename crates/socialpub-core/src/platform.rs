use crate::Error;
use std::fmt;
use std::str::FromStr;

/// Platforms with a concrete publisher
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Platform {
    /// Rednote (Xiaohongshu) creator site
    Rednote,
}

impl Platform {
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Rednote => "rednote",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "rednote" | "xiaohongshu" | "xhs" => Ok(Platform::Rednote),
            _ => Err(Error::UnknownPlatform(s.to_string())),
        }
    }
}
