//! Entry point for the `learnpath` executable. All logic lives in the
//! library so it can be tested without spawning a process.

fn main() -> anyhow::Result<()> {
    learnpath::run()
}
