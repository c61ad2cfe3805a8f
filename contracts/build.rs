use std::env;
use std::fs;
use std::path::PathBuf;

use kukugen::{Artifact, Generator};

type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;

const ARTIFACTS: &[&str] = &[
    "abi/IKukuFarmer.json",
    "abi/SafeERC20.json",
    // Test-only contract covering overloads, structs and constructor args
    "fixtures/RewardVault.json",
];

fn main() -> Result<()> {
    // Tell Cargo to rerun this build script if an artifact changes
    for artifact in ARTIFACTS {
        println!("cargo:rerun-if-changed={artifact}");
    }

    let out_dir = PathBuf::from(env::var("OUT_DIR")?);
    let generator = Generator::default();

    for artifact in ARTIFACTS {
        let artifact = Artifact::load(artifact)?;
        let binding = generator.generate(&artifact.contract)?;
        fs::write(out_dir.join(&binding.file_name), binding.source)?;
    }

    Ok(())
}
