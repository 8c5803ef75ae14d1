//! End-to-end toolchain jobs against a mock vendor server.

use flate2::write::GzEncoder;
use flate2::Compression;
use httpmock::prelude::*;
use pretty_assertions::assert_eq;
use std::fs::File;
use std::path::Path;
use tcslim::core::config::{Config, JobConfig, ToolchainOverrides};
use tcslim::core::download::Downloader;
use tcslim::core::pipeline::{run_job, run_jobs};
use tcslim::core::toolchain::Toolchain;
use tcslim::error::TcslimError;
use tempfile::TempDir;
use zip::ZipArchive;

fn tar_gz(entries: &[(&str, &[u8], u32)]) -> Vec<u8> {
    let encoder = GzEncoder::new(Vec::new(), Compression::default());
    let mut builder = tar::Builder::new(encoder);
    for (name, data, mode) in entries {
        let mut header = tar::Header::new_gnu();
        header.set_size(data.len() as u64);
        header.set_mode(*mode);
        header.set_cksum();
        builder.append_data(&mut header, name, *data).unwrap();
    }
    builder.into_inner().unwrap().finish().unwrap()
}

fn zip_entries(path: &Path) -> Vec<String> {
    let archive = ZipArchive::new(File::open(path).unwrap()).unwrap();
    let mut names: Vec<String> = archive.file_names().map(str::to_string).collect();
    names.sort();
    names
}

fn job_for(
    base: &Path,
    toolchain: Toolchain,
    url: String,
    policy: Option<&str>,
) -> JobConfig {
    let mut config = Config::new(base.to_path_buf());
    if let Some(policy) = policy {
        std::fs::write(base.join("policy.toml"), policy).unwrap();
    }
    config.toolchains.insert(
        toolchain.name().to_string(),
        ToolchainOverrides {
            version: None,
            url: Some(url),
            policy: policy.map(|_| "policy.toml".into()),
        },
    );
    config.job_with_env(toolchain, |_| None).unwrap()
}

#[test]
fn extract_job_produces_pruned_archive() {
    let server = MockServer::start();
    let body = tar_gz(&[
        ("arm-gnu-toolchain/bin/arm-none-eabi-gcc", &b"gcc"[..], 0o755),
        ("arm-gnu-toolchain/bin/arm-none-eabi-gdb", &b"gdb"[..], 0o755),
        ("arm-gnu-toolchain/share/doc/manual.pdf", &b"pdf"[..], 0o644),
        ("arm-gnu-toolchain/lib/libgcc.a", &b"lib"[..], 0o644),
    ]);
    let mock = server.mock(|when, then| {
        when.method(GET).path("/arm.tar.gz");
        then.status(200).body(&body);
    });

    let temp = TempDir::new().unwrap();
    let mut job = job_for(
        temp.path(),
        Toolchain::ArmGnu,
        server.url("/arm.tar.gz"),
        Some(
            r#"
folders_to_delete = ["share/doc"]

[[files_to_keep]]
folder = "bin"
keepers = ["arm-none-eabi-gcc"]
"#,
        ),
    );
    // The mock serves gzip rather than xz.
    job.archive_path = job.downloads_dir.join("arm.tar.gz");

    let report = run_job(&job, &Downloader::new().unwrap()).unwrap();

    mock.assert();
    assert_eq!(report.downloaded_bytes, body.len() as u64);
    assert_eq!(report.root, temp.path().join("tools/arm-gnu/arm-gnu-toolchain"));
    assert_eq!(
        report.zip_path,
        temp.path().join("zips/arm-gnu-13.2.rel1/linux-x64.zip")
    );
    assert_eq!(
        zip_entries(&report.zip_path),
        vec![
            "bin/",
            "bin/arm-none-eabi-gcc",
            "lib/",
            "lib/libgcc.a",
            "share/"
        ]
    );
}

#[cfg(unix)]
#[test]
fn install_job_runs_vendor_installer() {
    const INSTALLER: &str = r#"#!/bin/sh
read answer
[ "$answer" = "yes" ] || exit 2
dest="$2"
mkdir -p "$dest/html" "$dest/llvm/bin" "$dest/bin" "$dest/lib" "$dest/samples"
for f in segger-as segger-cc segger-ld version.txt emStudio; do echo "$f" > "$dest/bin/$f"; done
echo libc > "$dest/lib/libc_v6m_t_le_eabi_small.a"
echo other > "$dest/lib/libc_v7em_fpv4_sp_d16_hard_t_le_eabi.a"
echo doc > "$dest/html/index.html"
"#;

    let server = MockServer::start();
    let body = tar_gz(&[(
        "arm_segger_embedded_studio_v630_linux_x64/install_segger_embedded_studio",
        INSTALLER.as_bytes(),
        0o755,
    )]);
    server.mock(|when, then| {
        when.method(GET).path("/ses.tar.gz");
        then.status(200).body(&body);
    });

    let temp = TempDir::new().unwrap();
    let job = job_for(temp.path(), Toolchain::Segger, server.url("/ses.tar.gz"), None);

    let report = run_job(&job, &Downloader::new().unwrap()).unwrap();

    assert_eq!(
        std::fs::read_to_string(temp.path().join("downloads/segger/inputs.txt")).unwrap(),
        "yes\n"
    );
    assert_eq!(report.root, temp.path().join("tools/segger"));
    assert_eq!(
        zip_entries(&temp.path().join("zips/segger-630/linux-x64.zip")),
        vec![
            "bin/",
            "bin/segger-as",
            "bin/segger-cc",
            "bin/segger-ld",
            "bin/version.txt",
            "lib/",
            "lib/libc_v6m_t_le_eabi_small.a"
        ]
    );
}

#[test]
fn failed_job_stops_remaining_jobs() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/missing.tar.gz");
        then.status(500);
    });
    let second = server.mock(|when, then| {
        when.method(GET).path("/second.tar.gz");
        then.status(200).body(tar_gz(&[("bin/tool", &b"x"[..], 0o755)]));
    });

    let temp = TempDir::new().unwrap();
    let first_base = temp.path().join("first");
    let second_base = temp.path().join("second");
    std::fs::create_dir_all(&first_base).unwrap();
    std::fs::create_dir_all(&second_base).unwrap();
    let jobs = vec![
        job_for(&first_base, Toolchain::Segger, server.url("/missing.tar.gz"), None),
        job_for(
            &second_base,
            Toolchain::ArmGnu,
            server.url("/second.tar.gz"),
            Some(""),
        ),
    ];

    let err = run_jobs(&jobs, &Downloader::new().unwrap()).unwrap_err();

    assert!(matches!(err, TcslimError::DownloadError { status: 500, .. }));
    second.assert_hits(0);
    assert!(!jobs[0].zip_path.exists());
    assert!(!jobs[1].zip_path.exists());
}
