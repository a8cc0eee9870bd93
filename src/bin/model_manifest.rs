//! Digest manifest utility for Somnus model artifacts.
//!
//! Writes `manifest.json` next to the model artifact, listing the SHA-256
//! digest of every `.json` file in the directory. The app checks these
//! digests before it uses the model.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin model_manifest -- <model_dir>          # write manifest.json
//! cargo run --bin model_manifest -- <model_dir> --check  # verify existing manifest
//! ```

use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context, Result};

use somnus::adapters::model::{
    sha256_hex, verify_manifest, LogisticClassifier, ModelManifest, MANIFEST_FILE, MODEL_FILE,
};

fn usage() -> String {
    "Usage: model_manifest <model_dir> [--check]".to_string()
}

fn parse_args() -> Result<(PathBuf, bool)> {
    let mut model_dir: Option<PathBuf> = None;
    let mut check = false;

    for arg in env::args().skip(1) {
        match arg.as_str() {
            "--check" => check = true,
            "-h" | "--help" => bail!(usage()),
            _ if model_dir.is_none() => model_dir = Some(PathBuf::from(arg)),
            _ => bail!(usage()),
        }
    }

    let model_dir = model_dir.ok_or_else(|| anyhow!(usage()))?;
    Ok((model_dir, check))
}

/// Digest every `.json` file in `dir` except the manifest itself.
fn collect_digests(dir: &Path) -> Result<BTreeMap<String, String>> {
    let mut files = BTreeMap::new();

    for entry in fs::read_dir(dir).with_context(|| format!("reading {dir:?}"))? {
        let path = entry?.path();
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if !path.is_file() || name == MANIFEST_FILE || !name.ends_with(".json") {
            continue;
        }

        let bytes = fs::read(&path).with_context(|| format!("reading {path:?}"))?;
        files.insert(name.to_string(), sha256_hex(&bytes));
    }

    if files.is_empty() {
        bail!("No model JSON found in {dir:?}");
    }
    Ok(files)
}

fn main() -> Result<()> {
    let (model_dir, check) = parse_args()?;

    let model_dir = if model_dir.is_file() {
        model_dir
            .parent()
            .ok_or_else(|| anyhow!("Model path has no parent directory"))?
            .to_path_buf()
    } else {
        model_dir
    };

    if check {
        verify_manifest(&model_dir, true)?;
        LogisticClassifier::load(&model_dir, true)?;
        println!("OK: {} matches the model files in {model_dir:?}", MANIFEST_FILE);
        return Ok(());
    }

    // Refuse to bless an artifact the app would reject anyway. A stale
    // manifest is ignored here since it is about to be replaced.
    let artifact = model_dir.join(MODEL_FILE);
    let content =
        fs::read_to_string(&artifact).with_context(|| format!("reading {artifact:?}"))?;
    LogisticClassifier::from_json(&content)
        .with_context(|| format!("{artifact:?} is not a usable model"))?;

    let manifest = ModelManifest {
        version: 1,
        files: collect_digests(&model_dir)?,
    };

    let out = model_dir.join(MANIFEST_FILE);
    let json = serde_json::to_string_pretty(&manifest)?;
    fs::write(&out, format!("{json}\n")).with_context(|| format!("writing {out:?}"))?;

    for (name, digest) in &manifest.files {
        println!("{digest}  {name}");
    }
    println!("Wrote {out:?}");
    Ok(())
}
