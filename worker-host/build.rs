use vergen::EmitBuilder;

fn main() -> anyhow::Result<()> {
    EmitBuilder::builder()
        .all_build()
        .all_git()
        .emit()?;

    Ok(())
}
