use vergen::EmitBuilder;

// Emits VERGEN_* build and git metadata for the startup log line.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    EmitBuilder::builder()
        .all_build() // Build timestamp, rustc, etc.
        .all_git() // Commit sha, commit timestamp, etc.
        .emit()?;

    Ok(())
}
