use std::path::PathBuf;

fn main() {
    let manifest_dir =
        PathBuf::from(std::env::var_os("CARGO_MANIFEST_DIR").expect("CARGO_MANIFEST_DIR is set"));
    let udl_path = manifest_dir.join("src").join("gutter_core.udl");
    println!("cargo:rerun-if-changed={}", udl_path.display());

    let udl_path = udl_path.to_str().expect("UDL path contains invalid UTF-8");
    uniffi_build::generate_scaffolding_for_crate(udl_path, "gutter_core")
        .expect("failed to generate UniFFI scaffolding");
}
