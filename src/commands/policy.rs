use crate::core::config::Config;
use crate::core::policy::PrunePolicy;
use crate::core::toolchain::Toolchain;
use crate::error::Result;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Toml,
    Json,
}

#[derive(Debug, Serialize)]
struct ResolvedPolicy {
    toolchain: Toolchain,
    version: String,
    url: String,
    output: String,
    #[serde(flatten)]
    policy: PrunePolicy,
}

pub fn show_policies(
    config: &Config,
    toolchain: Option<Toolchain>,
    format: OutputFormat,
) -> Result<()> {
    let toolchains = match toolchain {
        Some(toolchain) => vec![toolchain],
        None => Toolchain::ALL.to_vec(),
    };

    let resolved = toolchains
        .into_iter()
        .map(|toolchain| {
            let job = config.job(toolchain)?;
            Ok(ResolvedPolicy {
                toolchain,
                version: job.version,
                url: job.url,
                output: job.zip_path.display().to_string(),
                policy: job.policy,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    print!("{}", render(&resolved, format)?);
    Ok(())
}

fn render(resolved: &[ResolvedPolicy], format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(format!("{}\n", serde_json::to_string_pretty(resolved)?)),
        OutputFormat::Toml => {
            let mut out = String::new();
            for entry in resolved {
                out.push_str(&format!("# {} {}\n", entry.toolchain, entry.version));
                out.push_str(&entry.policy.to_toml()?);
                out.push('\n');
            }
            Ok(out)
        }
        OutputFormat::Text => {
            let mut out = String::new();
            for entry in resolved {
                out.push_str(&format!("{} {}\n", entry.toolchain, entry.version));
                out.push_str(&format!("  source: {}\n", entry.url));
                out.push_str(&format!("  output: {}\n", entry.output));
                out.push_str("  delete folders:\n");
                for folder in &entry.policy.folders_to_delete {
                    out.push_str(&format!("    - {folder}\n"));
                }
                out.push_str("  keep only:\n");
                for rule in &entry.policy.files_to_keep {
                    out.push_str(&format!("    {}: {}\n", rule.folder, rule.keepers.join(", ")));
                }
                out.push('\n');
            }
            Ok(out)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<ResolvedPolicy> {
        vec![ResolvedPolicy {
            toolchain: Toolchain::Segger,
            version: "630".to_string(),
            url: Toolchain::Segger.download_url("630"),
            output: "zips/segger-630/linux-x64.zip".to_string(),
            policy: PrunePolicy::builtin(Toolchain::Segger).unwrap(),
        }]
    }

    #[test]
    fn test_render_text() {
        let text = render(&sample(), OutputFormat::Text).unwrap();
        assert!(text.starts_with("segger 630\n"));
        assert!(text.contains("    - html\n"));
        assert!(text.contains("    lib: libc_v6m_t_le_eabi_small.a\n"));
    }

    #[test]
    fn test_render_json() {
        let json = render(&sample(), OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value[0]["toolchain"], "segger");
        assert_eq!(value[0]["folders_to_delete"][0], "html");
        assert_eq!(value[0]["files_to_keep"][0]["folder"], "bin");
    }

    #[test]
    fn test_render_toml_reparses_as_policy() {
        let toml = render(&sample(), OutputFormat::Toml).unwrap();
        let policy = PrunePolicy::parse(&toml).unwrap();
        assert_eq!(policy, PrunePolicy::builtin(Toolchain::Segger).unwrap());
    }
}
