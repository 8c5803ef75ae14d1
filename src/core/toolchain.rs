use serde::{Deserialize, Serialize};
use std::fmt;

/// A vendor toolchain distribution this tool knows how to slim down.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum Toolchain {
    /// SEGGER Embedded Studio for ARM
    Segger,
    /// Arm GNU Toolchain (arm-none-eabi)
    ArmGnu,
}

/// How the downloaded archive turns into a toolchain tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Materialize {
    /// Unpack the archive; the toolchain tree is its contents.
    Extract,
    /// Unpack the archive, then run the bundled installer at this path
    /// (relative to the download directory).
    Install { installer: String },
}

impl Toolchain {
    /// Jobs run in this order when no toolchain is named.
    pub const ALL: [Toolchain; 2] = [Toolchain::Segger, Toolchain::ArmGnu];

    pub fn name(self) -> &'static str {
        match self {
            Toolchain::Segger => "segger",
            Toolchain::ArmGnu => "arm-gnu",
        }
    }

    pub fn version_env_var(self) -> &'static str {
        match self {
            Toolchain::Segger => "SEGGER_EMBEDDED_STUDIO_VERSION",
            Toolchain::ArmGnu => "ARM_GNU_TOOLCHAIN_VERSION",
        }
    }

    pub fn default_version(self) -> &'static str {
        match self {
            Toolchain::Segger => "630",
            Toolchain::ArmGnu => "13.2.rel1",
        }
    }

    pub fn archive_file_name(self, version: &str) -> String {
        match self {
            Toolchain::Segger => format!("Setup_EmbeddedStudio_ARM_v{version}_linux_x64.tar.gz"),
            Toolchain::ArmGnu => {
                format!("arm-gnu-toolchain-{version}-x86_64-arm-none-eabi.tar.xz")
            }
        }
    }

    pub fn download_url(self, version: &str) -> String {
        let file_name = self.archive_file_name(version);
        match self {
            Toolchain::Segger => {
                format!("https://www.segger.com/downloads/embedded-studio/{file_name}")
            }
            Toolchain::ArmGnu => format!(
                "https://developer.arm.com/-/media/Files/downloads/gnu/{version}/binrel/{file_name}"
            ),
        }
    }

    pub fn materialize(self, version: &str) -> Materialize {
        match self {
            Toolchain::Segger => Materialize::Install {
                installer: format!(
                    "arm_segger_embedded_studio_v{version}_linux_x64/install_segger_embedded_studio"
                ),
            },
            Toolchain::ArmGnu => Materialize::Extract,
        }
    }
}

impl fmt::Display for Toolchain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segger_urls() {
        assert_eq!(
            Toolchain::Segger.download_url("630"),
            "https://www.segger.com/downloads/embedded-studio/Setup_EmbeddedStudio_ARM_v630_linux_x64.tar.gz"
        );
        assert_eq!(
            Toolchain::Segger.materialize("630"),
            Materialize::Install {
                installer: "arm_segger_embedded_studio_v630_linux_x64/install_segger_embedded_studio"
                    .to_string()
            }
        );
    }

    #[test]
    fn test_arm_gnu_urls() {
        assert_eq!(
            Toolchain::ArmGnu.download_url("13.2.rel1"),
            "https://developer.arm.com/-/media/Files/downloads/gnu/13.2.rel1/binrel/arm-gnu-toolchain-13.2.rel1-x86_64-arm-none-eabi.tar.xz"
        );
        assert_eq!(Toolchain::ArmGnu.materialize("13.2.rel1"), Materialize::Extract);
    }

    #[test]
    fn test_names_match_serde() {
        for toolchain in Toolchain::ALL {
            let json = serde_json::to_string(&toolchain).unwrap();
            assert_eq!(json, format!("\"{}\"", toolchain.name()));
        }
    }
}
