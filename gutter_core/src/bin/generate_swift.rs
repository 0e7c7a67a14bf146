use anyhow::{Context, Result};
use camino::Utf8PathBuf;
use uniffi_bindgen::bindings::SwiftBindingGenerator;

fn main() -> Result<()> {
    let output_dir = std::env::args()
        .nth(1)
        .map(Utf8PathBuf::from)
        .map_or_else(default_output_dir, Ok)?;
    generate_swift_bindings(&output_dir)
}

fn default_output_dir() -> Result<Utf8PathBuf> {
    let manifest_dir = Utf8PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    let workspace_root = manifest_dir
        .parent()
        .context("failed to locate workspace root")?;
    Ok(workspace_root.join("target/bindings/swift"))
}

fn generate_swift_bindings(output_dir: &Utf8PathBuf) -> Result<()> {
    let udl_path = Utf8PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("src/gutter_core.udl");

    std::fs::create_dir_all(output_dir.as_std_path())
        .with_context(|| format!("failed to create {output_dir}"))?;

    uniffi_bindgen::generate_bindings(
        udl_path.as_path(),
        None,
        SwiftBindingGenerator,
        Some(output_dir.as_path()),
        None,
        Some("gutter_core"),
        true,
    )
    .with_context(|| format!("failed to generate Swift bindings from {udl_path}"))?;

    println!("Generated Swift bindings in {output_dir}");

    Ok(())
}
