/// Bundling is delegated to nih_plug_xtask. Both plugins live in the same
/// library, so one bundle contains the reverb and the chorus:
///
///   cargo xtask bundle loveless-voices --release
///
/// The result ends up in `target/bundled/`.
fn main() -> nih_plug_xtask::Result<()> {
    nih_plug_xtask::main()
}
