//! bearconf: print the options a bootstrapped program would start with.

use anyhow::Result;

fn main() -> Result<()> {
    bearconf::cli::run()
}
